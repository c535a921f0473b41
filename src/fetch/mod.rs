//! Network boundary for listing and file retrieval
//!
//! The engine talks to log servers only through the [`FetchClient`] trait.
//! There is no retry, backoff or engine-level timeout: a failure is returned
//! to the caller as soon as the transport reports it.

mod client;
mod errors;

pub use client::{FetchClient, HttpFetchClient};
pub use errors::{FetchError, FetchResult};
