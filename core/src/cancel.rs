//! Cancellation-aware request helpers layered over any `Client`.
//!
//! # Design
//! `CancelAware` holds the wrapped client and nothing else. Its `Client`
//! impl forwards every operation untouched, so it can stand in wherever the
//! wrapped client was used. The `CancellableClient` operations build the
//! request, attach the caller's token, and hand the request to the wrapped
//! client's `execute`.
//!
//! The token is carried, never watched: no polling, no timeout, no early
//! return on an already-cancelled token. The executing client decides what
//! cancellation means. Errors from `execute` are returned as-is.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::client::{build_post, Client};
use crate::form::{FormValues, FORM_CONTENT_TYPE};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// A `Client` with by-URL helpers that carry a cancellation token.
pub trait CancellableClient: Client {
    /// Like [`Client::get`], with `token` attached to the request.
    fn get_with_cancel(
        &self,
        token: &CancellationToken,
        url: &str,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send;

    /// Like [`Client::head`], with `token` attached to the request.
    fn head_with_cancel(
        &self,
        token: &CancellationToken,
        url: &str,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send;

    /// Like [`Client::post`], with `token` attached to the request. The
    /// `content-type` header is always `content_type`.
    fn post_with_cancel(
        &self,
        token: &CancellationToken,
        url: &str,
        content_type: &str,
        body: impl Into<Vec<u8>>,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send;

    /// Like [`Client::post_form`], with `token` attached to the request.
    fn post_form_with_cancel(
        &self,
        token: &CancellationToken,
        url: &str,
        form: &FormValues,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send;
}

/// Wraps a `Client` with [`CancellableClient`] operations.
#[derive(Debug, Clone, Default)]
pub struct CancelAware<C> {
    inner: C,
}

impl<C: Client> CancelAware<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &C {
        &self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: Client> Client for CancelAware<C> {
    type Error = C::Error;

    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send {
        self.inner.execute(request)
    }

    fn get(&self, url: &str) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send {
        self.inner.get(url)
    }

    fn head(&self, url: &str) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send {
        self.inner.head(url)
    }

    fn post(
        &self,
        url: &str,
        content_type: &str,
        body: impl Into<Vec<u8>>,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send {
        self.inner.post(url, content_type, body)
    }

    fn post_form(
        &self,
        url: &str,
        form: &FormValues,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send {
        self.inner.post_form(url, form)
    }
}

impl<C: Client> CancellableClient for CancelAware<C> {
    fn get_with_cancel(
        &self,
        token: &CancellationToken,
        url: &str,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send {
        let request =
            HttpRequest::new(HttpMethod::Get, url).map(|r| r.with_cancellation(token.clone()));
        async move { self.inner.execute(request?).await }
    }

    fn head_with_cancel(
        &self,
        token: &CancellationToken,
        url: &str,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send {
        let request =
            HttpRequest::new(HttpMethod::Head, url).map(|r| r.with_cancellation(token.clone()));
        async move { self.inner.execute(request?).await }
    }

    fn post_with_cancel(
        &self,
        token: &CancellationToken,
        url: &str,
        content_type: &str,
        body: impl Into<Vec<u8>>,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send {
        let request =
            build_post(url, content_type, body).map(|r| r.with_cancellation(token.clone()));
        async move { self.inner.execute(request?).await }
    }

    fn post_form_with_cancel(
        &self,
        token: &CancellationToken,
        url: &str,
        form: &FormValues,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send {
        self.post_with_cancel(token, url, FORM_CONTENT_TYPE, form.encode())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use url::Url;

    use super::*;
    use crate::client::tests::{ok_response, MockError, RecordingClient};
    use crate::client::CONTENT_TYPE;
    use crate::error::RequestError;

    const URL: &str = "http://test.com";

    enum Call {
        Get,
        Head,
        Post { content_type: &'static str, body: &'static [u8] },
        PostForm(FormValues),
    }

    struct Case {
        name: &'static str,
        call: Call,
        method: HttpMethod,
        content_type: Option<&'static str>,
        body: Option<&'static [u8]>,
    }

    fn cases() -> Vec<Case> {
        vec![
            Case {
                name: "get",
                call: Call::Get,
                method: HttpMethod::Get,
                content_type: None,
                body: None,
            },
            Case {
                name: "head",
                call: Call::Head,
                method: HttpMethod::Head,
                content_type: None,
                body: None,
            },
            Case {
                name: "post with empty body",
                call: Call::Post { content_type: "text/html", body: b"" },
                method: HttpMethod::Post,
                content_type: Some("text/html"),
                body: Some(b""),
            },
            Case {
                name: "post with body",
                call: Call::Post { content_type: "application/json", body: b"{\"a\":1}" },
                method: HttpMethod::Post,
                content_type: Some("application/json"),
                body: Some(b"{\"a\":1}"),
            },
            Case {
                name: "post form with no values",
                call: Call::PostForm(FormValues::new()),
                method: HttpMethod::Post,
                content_type: Some(FORM_CONTENT_TYPE),
                body: Some(b""),
            },
            Case {
                name: "post form with values",
                call: Call::PostForm([("b", "x y"), ("a", "1")].into_iter().collect()),
                method: HttpMethod::Post,
                content_type: Some(FORM_CONTENT_TYPE),
                body: Some(b"a=1&b=x+y"),
            },
        ]
    }

    async fn call<C: Client>(
        client: &CancelAware<C>,
        token: &CancellationToken,
        url: &str,
        call: &Call,
    ) -> Result<HttpResponse, C::Error> {
        match call {
            Call::Get => client.get_with_cancel(token, url).await,
            Call::Head => client.head_with_cancel(token, url).await,
            Call::Post { content_type, body } => {
                client.post_with_cancel(token, url, content_type, *body).await
            }
            Call::PostForm(form) => client.post_form_with_cancel(token, url, form).await,
        }
    }

    #[tokio::test]
    async fn builds_request_with_token_and_returns_reply() {
        for case in cases() {
            let client = CancelAware::new(RecordingClient::replying(Ok(ok_response())));
            let token = CancellationToken::new();

            let result = call(&client, &token, URL, &case.call).await;
            assert_eq!(result, Ok(ok_response()), "{}: reply", case.name);

            let calls = client.get_ref().calls();
            assert_eq!(calls.len(), 1, "{}: one delegated call", case.name);
            let req = &calls[0];
            assert_eq!(req.method, case.method, "{}: method", case.name);
            assert_eq!(req.url, Url::parse(URL).unwrap(), "{}: url", case.name);
            assert_eq!(req.header(CONTENT_TYPE), case.content_type, "{}: content type", case.name);
            assert_eq!(req.body.as_deref(), case.body, "{}: body", case.name);

            let attached = req.cancel.as_ref().expect("token attached");
            assert!(!attached.is_cancelled(), "{}: token untouched", case.name);
            token.cancel();
            assert!(attached.is_cancelled(), "{}: token shared", case.name);
        }
    }

    #[tokio::test]
    async fn delegate_errors_are_returned_verbatim() {
        let failure = MockError::Transport("connection reset".to_string());
        for case in cases() {
            let client = CancelAware::new(RecordingClient::replying(Err(failure.clone())));
            let token = CancellationToken::new();

            let result = call(&client, &token, URL, &case.call).await;
            assert_eq!(result, Err(failure.clone()), "{}", case.name);
            assert_eq!(client.get_ref().calls().len(), 1, "{}", case.name);
        }
    }

    #[tokio::test]
    async fn malformed_url_never_reaches_client() {
        for case in cases() {
            let client = CancelAware::new(RecordingClient::replying(Ok(ok_response())));
            let token = CancellationToken::new();

            let result = call(&client, &token, "://malformed", &case.call).await;
            assert!(
                matches!(result, Err(MockError::Request(RequestError::InvalidUrl(_)))),
                "{}: {result:?}",
                case.name
            );
            assert!(client.get_ref().calls().is_empty(), "{}", case.name);
        }
    }

    #[tokio::test]
    async fn cancelled_token_is_still_delegated() {
        let client = CancelAware::new(RecordingClient::replying(Ok(ok_response())));
        let token = CancellationToken::new();
        token.cancel();

        let result = client.get_with_cancel(&token, URL).await;
        assert_eq!(result, Ok(ok_response()));
        assert!(client.get_ref().calls()[0].cancel.as_ref().unwrap().is_cancelled());
    }

    #[tokio::test]
    async fn post_form_matches_post_with_encoded_body() {
        let form: FormValues = [("q", "rust & go"), ("page", "2")].into_iter().collect();
        let token = CancellationToken::new();

        let via_form = CancelAware::new(RecordingClient::replying(Ok(ok_response())));
        via_form.post_form_with_cancel(&token, URL, &form).await.unwrap();

        let via_post = CancelAware::new(RecordingClient::replying(Ok(ok_response())));
        via_post
            .post_with_cancel(&token, URL, FORM_CONTENT_TYPE, form.encode())
            .await
            .unwrap();

        let a = &via_form.get_ref().calls()[0];
        let b = &via_post.get_ref().calls()[0];
        assert_eq!(a.method, b.method);
        assert_eq!(a.url, b.url);
        assert_eq!(a.headers, b.headers);
        assert_eq!(a.body, b.body);
        assert_eq!(a.body.as_deref(), Some(&b"page=2&q=rust+%26+go"[..]));
    }

    #[tokio::test]
    async fn base_operations_forward_without_token() {
        let client = CancelAware::new(RecordingClient::replying(Ok(ok_response())));
        let form: FormValues = [("k", "v")].into_iter().collect();

        client.get(URL).await.unwrap();
        client.head(URL).await.unwrap();
        client.post(URL, "text/plain", "x").await.unwrap();
        client.post_form(URL, &form).await.unwrap();
        let direct = HttpRequest::new(HttpMethod::Get, URL).unwrap();
        client.execute(direct).await.unwrap();

        let calls = client.into_inner().calls();
        assert_eq!(calls.len(), 5);
        assert!(calls.iter().all(|r| r.cancel.is_none()));
    }

    #[tokio::test]
    async fn wraps_shared_clients() {
        let shared = Arc::new(RecordingClient::replying(Ok(ok_response())));
        let token = CancellationToken::new();

        CancelAware::new(shared.clone()).get_with_cancel(&token, URL).await.unwrap();
        CancelAware::new(&*shared).head_with_cancel(&token, URL).await.unwrap();

        assert_eq!(shared.calls().len(), 2);
    }

    #[tokio::test]
    async fn concurrent_calls_share_nothing() {
        let client = Arc::new(CancelAware::new(RecordingClient::replying(Ok(ok_response()))));
        let mut handles = Vec::new();
        for i in 0..8 {
            let client = client.clone();
            handles.push(tokio::spawn(async move {
                let token = CancellationToken::new();
                client.get_with_cancel(&token, &format!("{URL}/{i}")).await
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap(), Ok(ok_response()));
        }

        let mut paths: Vec<_> = client.get_ref().calls().iter().map(|r| r.url.path().to_string()).collect();
        paths.sort();
        assert_eq!(paths, (0..8).map(|i| format!("/{i}")).collect::<Vec<_>>());
    }
}
