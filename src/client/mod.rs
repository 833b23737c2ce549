// File: ./src/client/mod.rs
pub mod core;
pub mod redirect;
pub mod scrape;

pub use crate::client::core::{PageClient, RetryPolicy};
pub use crate::client::scrape::extract_lines;
