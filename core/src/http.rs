//! HTTP request and response types passed across the `Client` boundary.
//!
//! # Design
//! Requests and responses are plain data. A `Client` implementation turns an
//! `HttpRequest` into network I/O and hands back an `HttpResponse`; nothing in
//! this module touches the network. The URL is parsed when the request is
//! built, so a malformed URL is rejected before any client sees it.
//!
//! The cancellation token rides on the request as an opaque value. Building a
//! request never inspects it; observing it is up to whichever client executes
//! the request.

use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::RequestError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
        }
    }
}

/// An HTTP request described as plain data.
///
/// Owned by the call that builds it until it is moved into
/// [`Client::execute`](crate::Client::execute).
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    pub cancel: Option<CancellationToken>,
}

impl HttpRequest {
    /// Build a request with no headers, body or token.
    ///
    /// Fails with [`RequestError::InvalidUrl`] when `url` is not an absolute
    /// URL (for example when the scheme is missing).
    pub fn new(method: HttpMethod, url: &str) -> Result<Self, RequestError> {
        let url = Url::parse(url)?;
        Ok(Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
            cancel: None,
        })
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Attach a cancellation token. Replaces any token already attached.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Set a header, dropping every existing value under the same name.
    /// Names compare ASCII case-insensitively.
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
    }

    /// First value for `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Body decoded as UTF-8, with invalid sequences replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
