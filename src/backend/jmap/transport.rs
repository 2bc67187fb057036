//! JMAP transport module.
//!
//! This module contains the transport interface used by the engine to
//! post batch requests.

use std::result;
use thiserror::Error;

use super::request::Request;

#[derive(Debug, Error)]
pub enum Error {
    #[cfg(feature = "jmap-backend")]
    #[error("cannot build http client")]
    BuildClientError(#[source] reqwest::Error),
    #[cfg(feature = "jmap-backend")]
    #[error("cannot send http request to {1}")]
    SendRequestError(#[source] reqwest::Error, String),
    #[error("http request to {1} failed with status {0}")]
    StatusError(u16, String),
    #[cfg(feature = "jmap-backend")]
    #[error("cannot read http response from {1}")]
    ReadResponseError(#[source] reqwest::Error, String),
}

pub type Result<T> = result::Result<T, Error>;

/// Posts batch requests to a JMAP server.
///
/// Implementations must be shareable between threads: several
/// batches may be in flight at the same time.
pub trait Transport: Send + Sync {
    /// Submits the request and returns the raw response body.
    fn submit(&self, request: &Request) -> Result<String>;
}
