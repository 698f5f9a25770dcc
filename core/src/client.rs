//! The HTTP client capability.
//!
//! # Design
//! `Client` has one required operation, `execute`, which performs a fully
//! built `HttpRequest`. The by-URL helpers (`get`, `head`, `post`,
//! `post_form`) have default bodies written against `execute`, so any type
//! that can execute a request is a complete client. Implementations may
//! override them.
//!
//! `Client::Error` converts from `RequestError`: a helper that fails to build
//! its request reports the failure through the same channel as the
//! transport, without ever calling `execute`.

use std::future::Future;
use std::sync::Arc;

use crate::error::RequestError;
use crate::form::{FormValues, FORM_CONTENT_TYPE};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

pub const CONTENT_TYPE: &str = "content-type";

pub trait Client: Send + Sync {
    type Error: From<RequestError> + Send;

    /// Perform `request` and return the response. Transport failures must
    /// come back as `Err`, never as a panic.
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send;

    fn get(&self, url: &str) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send {
        let request = HttpRequest::new(HttpMethod::Get, url);
        async move { self.execute(request?).await }
    }

    fn head(&self, url: &str) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send {
        let request = HttpRequest::new(HttpMethod::Head, url);
        async move { self.execute(request?).await }
    }

    fn post(
        &self,
        url: &str,
        content_type: &str,
        body: impl Into<Vec<u8>>,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send {
        let request = build_post(url, content_type, body);
        async move { self.execute(request?).await }
    }

    fn post_form(
        &self,
        url: &str,
        form: &FormValues,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send {
        self.post(url, FORM_CONTENT_TYPE, form.encode())
    }
}

/// Build a POST carrying `body` with its content type set.
pub(crate) fn build_post(
    url: &str,
    content_type: &str,
    body: impl Into<Vec<u8>>,
) -> Result<HttpRequest, RequestError> {
    let mut request = HttpRequest::new(HttpMethod::Post, url)?.with_body(body);
    request.set_header(CONTENT_TYPE, content_type);
    Ok(request)
}

impl<C: Client> Client for &C {
    type Error = C::Error;

    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send {
        (**self).execute(request)
    }

    fn get(&self, url: &str) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send {
        (**self).get(url)
    }

    fn head(&self, url: &str) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send {
        (**self).head(url)
    }

    fn post(
        &self,
        url: &str,
        content_type: &str,
        body: impl Into<Vec<u8>>,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send {
        (**self).post(url, content_type, body)
    }

    fn post_form(
        &self,
        url: &str,
        form: &FormValues,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send {
        (**self).post_form(url, form)
    }
}

impl<C: Client> Client for Arc<C> {
    type Error = C::Error;

    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send {
        (**self).execute(request)
    }

    fn get(&self, url: &str) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send {
        (**self).get(url)
    }

    fn head(&self, url: &str) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send {
        (**self).head(url)
    }

    fn post(
        &self,
        url: &str,
        content_type: &str,
        body: impl Into<Vec<u8>>,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send {
        (**self).post(url, content_type, body)
    }

    fn post_form(
        &self,
        url: &str,
        form: &FormValues,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send {
        (**self).post_form(url, form)
    }
}
