//! Cancellation-aware HTTP client helpers.
//!
//! # Overview
//! [`Client`] is the capability of executing an [`HttpRequest`]; its by-URL
//! helpers (`get`, `head`, `post`, `post_form`) are built on `execute`.
//! [`CancelAware`] wraps any `Client` and adds the [`CancellableClient`]
//! helpers, which attach a caller-supplied [`CancellationToken`] to the
//! request before handing it to the wrapped client.
//!
//! # Design
//! - `CancelAware` is stateless apart from the wrapped client, and is itself
//!   a `Client`, so it can replace the client it wraps.
//! - The token is carried on the request, not enforced by the wrapper. The
//!   executing client observes it; [`ReqwestClient`] aborts in-flight
//!   requests when it fires.
//! - Malformed URLs are rejected while building the request, before any
//!   client is called.

pub mod cancel;
pub mod client;
pub mod error;
pub mod form;
pub mod http;
pub mod transport;

pub use cancel::{CancelAware, CancellableClient};
pub use client::Client;
pub use error::{RequestError, TransportError};
pub use form::{FormValues, FORM_CONTENT_TYPE};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use tokio_util::sync::CancellationToken;
pub use transport::{ReqwestClient, TransportConfig};
pub use url::Url;
