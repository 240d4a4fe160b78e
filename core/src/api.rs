//! NFTfi API client and types.
//!
//! This module provides types and an HTTP client for interacting with the NFTfi offers API.

mod client;
mod types;

pub use client::ApiClient;
pub use types::*;
