use anyhow::Context;
use infrastructure::HttpClientConfig;
use reqwest_middleware::ClientWithMiddleware;
use serde_json::Value;

use super::Category;

#[derive(Debug, Clone)]
pub struct JullixHttpClient {
    client: ClientWithMiddleware,
    base_url: String,
}

impl JullixHttpClient {
    pub fn new(base_url: &str, config: &HttpClientConfig) -> anyhow::Result<Self> {
        let client = config.new_tracing_client()?;

        Ok(Self {
            client,
            base_url: base_url.to_owned(),
        })
    }
}

impl JullixHttpClient {
    ///Single attempt, bounded by the client timeout. Failures are logged and reported as absent.
    pub async fn fetch(&self, category: Category) -> Option<Value> {
        match self.get_json(category).await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Error fetching {}: {:?}", category.endpoint(), e);
                None
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn get_json(&self, category: Category) -> anyhow::Result<Value> {
        let url = format!("{}{}", self.base_url, category.endpoint());

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Error requesting {url}"))?
            .error_for_status()?;

        response
            .json::<Value>()
            .await
            .with_context(|| format!("Error parsing response of {url}"))
    }
}
