//! # HTTP Bridge
//!
//! HTTP client abstraction shared by the remote-service connectors.
//!
//! ## Overview
//!
//! Both remote services consumed by discsync (the catalog API and the search
//! index) are plain JSON-over-HTTP. This crate provides:
//!
//! - **`HttpClient`** (`client`): the async trait connectors program against
//! - **`ReqwestHttpClient`** (`native`): the production implementation with
//!   connection pooling, TLS, and bounded retry with exponential backoff
//!
//! Connectors hold an `Arc<dyn HttpClient>`, which keeps them mockable in
//! tests without touching the network.

pub mod client;
pub mod error;
pub mod native;

pub use client::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use error::{HttpError, Result};
pub use native::ReqwestHttpClient;
