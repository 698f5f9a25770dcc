//! Error types for request construction and the reqwest transport.
//!
//! # Design
//! `RequestError` covers failures detected while building a request, before
//! any client is involved. Every `Client::Error` converts from it, so a
//! malformed URL reaches the caller through the same channel as transport
//! failures. `TransportError` is the error type of `ReqwestClient`; other
//! `Client` implementations bring their own.

use thiserror::Error;

/// A request could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The target URL is not a valid absolute URL.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Errors returned by [`ReqwestClient`](crate::ReqwestClient).
#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Request(#[from] RequestError),

    /// The token attached to the request was cancelled before the exchange
    /// completed.
    #[error("request cancelled")]
    Cancelled,

    #[error("http transport failed: {0}")]
    Http(#[from] reqwest::Error),
}
