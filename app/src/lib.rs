pub mod adapter;
pub mod core;
pub mod settings;
