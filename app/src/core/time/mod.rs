mod datetime;

pub use datetime::{CompactTimestampError, DateTime};
