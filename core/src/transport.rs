//! A `Client` backed by `reqwest`.
//!
//! # Design
//! `ReqwestClient` is the default executing client. It maps `HttpRequest` to
//! a reqwest request, collects the whole response into an `HttpResponse`, and
//! treats every status code as data. Connection pooling, TLS and redirects
//! are reqwest's.
//!
//! When a request carries a cancellation token, sending the request and
//! reading its body race the token. Whichever side loses is dropped, which
//! aborts the in-flight exchange.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::client::Client;
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Settings for building the underlying `reqwest::Client`. Unset fields keep
/// reqwest's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub user_agent: Option<String>,
    pub connect_timeout_ms: Option<u64>,
    pub pool_idle_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &TransportConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        if let Some(ms) = config.connect_timeout_ms {
            builder = builder.connect_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = config.pool_idle_timeout_ms {
            builder = builder.pool_idle_timeout(Duration::from_millis(ms));
        }
        Ok(Self {
            inner: builder.build()?,
        })
    }

    pub fn from_client(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Post => reqwest::Method::POST,
        };

        let mut builder = self.inner.request(method, request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.bytes().await?.to_vec();
        tracing::trace!(status, bytes = body.len(), "received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    async fn send_cancellable(
        &self,
        token: CancellationToken,
        request: HttpRequest,
    ) -> Result<HttpResponse, TransportError> {
        if token.is_cancelled() {
            tracing::debug!(url = %request.url, "token already cancelled, request not sent");
            return Err(TransportError::Cancelled);
        }

        let url = request.url.clone();
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::debug!(%url, "request cancelled in flight");
                Err(TransportError::Cancelled)
            }
            result = self.send(request) => result,
        }
    }
}

impl Client for ReqwestClient {
    type Error = TransportError;

    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        async move {
            tracing::debug!(
                method = request.method.as_str(),
                url = %request.url,
                "sending request"
            );
            match request.cancel.clone() {
                Some(token) => self.send_cancellable(token, request).await,
                None => self.send(request).await,
            }
        }
    }
}
