//! Request policies and URL helpers.
//!
//! A request policy is a stage from `HttpRequest<A>` to
//! `SdkResult<HttpRequest<B>>`. The policies here deal with headers and the
//! request URL; body marshalling lives in [`crate::marshal`].

use std::sync::Arc;

use futures::future::{ready, BoxFuture, Ready};
use futures::FutureExt;
use tracing::trace;
use url::form_urlencoded;
use url::Url;

use crate::client::RequestHeadersFactory;
use crate::error::{SdkError, SdkResult};
use crate::http::{HttpParams, HttpRequest, HttpRequestUrl};

/// Policy that merges the headers produced by `factory` over the request's
/// own headers.
pub fn add_headers<B>(
    factory: RequestHeadersFactory,
) -> impl Fn(HttpRequest<B>) -> BoxFuture<'static, SdkResult<HttpRequest<B>>> + Clone + Send + Sync
where
    B: Send + 'static,
{
    move |mut request: HttpRequest<B>| {
        let headers = factory();
        async move {
            request.headers.extend(headers.await?);
            Ok::<_, SdkError>(request)
        }
        .boxed()
    }
}

/// Policy that resolves a raw request URL against `base`.
///
/// The base and the raw URL are concatenated and parsed into an absolute
/// URL. A request whose URL is already resolved cannot be resolved again.
pub fn resolve_url<B>(
    base: &str,
) -> impl Fn(HttpRequest<B>) -> Ready<SdkResult<HttpRequest<B>>> + Clone + Send + Sync {
    let base: Arc<str> = base.into();
    move |request| ready(resolve(&base, request))
}

fn resolve<B>(base: &str, mut request: HttpRequest<B>) -> SdkResult<HttpRequest<B>> {
    match &request.url {
        HttpRequestUrl::Raw(raw) => {
            let joined = format!("{base}{raw}");
            let url = Url::parse(&joined).map_err(|e| {
                SdkError::illegal_argument(format!("Invalid URL '{joined}'")).with_cause(e)
            })?;
            trace!(from = %request.url, to = %url, "resolved request url");
            request.url = HttpRequestUrl::Url(url);
            Ok(request)
        }
        HttpRequestUrl::Url(_) => Err(SdkError::illegal_state("Can't resolve a URL")),
    }
}

/// Substitute `:slug` segments of `path` with values from `params`.
///
/// Fails on the first slug, left to right, that has no value.
pub fn replace_path_params(path: &str, params: &HttpParams) -> SdkResult<String> {
    let segments = path
        .split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(slug) => params.get(slug).map(String::as_str).ok_or_else(|| {
                SdkError::illegal_argument(format!("No value provided for '{segment}'"))
            }),
            None => Ok(segment),
        })
        .collect::<SdkResult<Vec<&str>>>()?;

    Ok(segments.join("/"))
}

/// Build `?key=value&...` from `params`, form-url-encoding each value.
/// An empty map yields an empty string.
pub fn create_query_string(params: &HttpParams) -> String {
    if params.is_empty() {
        return String::new();
    }

    let pairs: Vec<String> = params
        .iter()
        .map(|(key, value)| {
            let encoded: String = form_urlencoded::byte_serialize(value.as_bytes()).collect();
            format!("{key}={encoded}")
        })
        .collect();

    format!("?{}", pairs.join("&"))
}

/// The absolute URL a transport should send `request` to: path parameters
/// substituted and query parameters appended.
pub fn build_url<B>(request: &HttpRequest<B>) -> SdkResult<Url> {
    let mut url = match &request.url {
        HttpRequestUrl::Url(url) => url.clone(),
        HttpRequestUrl::Raw(raw) => Url::parse(raw).map_err(|e| {
            SdkError::illegal_argument(format!("Invalid URL '{raw}'")).with_cause(e)
        })?,
    };

    let no_params = HttpParams::new();
    let path_params = request.path_params.as_ref().unwrap_or(&no_params);
    let path = replace_path_params(url.path(), path_params)?;
    url.set_path(&path);

    if let Some(params) = request.query_params.as_ref().filter(|p| !p.is_empty()) {
        let query = create_query_string(params);
        url.set_query(query.strip_prefix('?'));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::headers::{constant_headers, create_headers};
    use crate::http::{HttpHeaders, HttpRequestMethod};

    fn params(pairs: &[(&str, &str)]) -> HttpParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn replaces_path_slugs() {
        let path = replace_path_params(
            "customer/:id/account/:accountNumber",
            &params(&[("id", "123"), ("accountNumber", "456")]),
        )
        .unwrap();
        assert_eq!(path, "customer/123/account/456");
    }

    #[test]
    fn path_without_slugs_is_unchanged() {
        let path = replace_path_params("/customers/all", &HttpParams::new()).unwrap();
        assert_eq!(path, "/customers/all");
    }

    #[test]
    fn missing_slug_is_illegal_argument() {
        let err = replace_path_params("customer/:id/account/:accountNumber", &HttpParams::new())
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::IllegalArgument);
        assert_eq!(err.message, "No value provided for ':id'");
    }

    #[test]
    fn first_missing_slug_is_reported() {
        let err = replace_path_params(
            "customer/:id/account/:accountNumber",
            &params(&[("id", "123")]),
        )
        .unwrap_err();
        assert_eq!(err.message, "No value provided for ':accountNumber'");
    }

    #[test]
    fn empty_query_params_yield_empty_string() {
        assert_eq!(create_query_string(&HttpParams::new()), "");
    }

    #[test]
    fn query_values_are_encoded() {
        let query = create_query_string(&params(&[("callback", "http://localhost:5000")]));
        assert_eq!(query, "?callback=http%3A%2F%2Flocalhost%3A5000");
    }

    #[test]
    fn query_pairs_are_joined_with_ampersand() {
        let query = create_query_string(&params(&[("q", "a b"), ("page", "2")]));
        assert!(query.starts_with('?'));
        assert!(query.contains("q=a+b"));
        assert!(query.contains("page=2"));
        assert_eq!(query.matches('&').count(), 1);
    }

    #[tokio::test]
    async fn resolve_url_prefixes_raw_url_with_base() {
        let policy = resolve_url("http://localhost:3000");
        let request: HttpRequest<()> = HttpRequest::new(HttpRequestMethod::Get, "/customers/:id");

        let resolved = policy(request).await.unwrap();
        let expected = Url::parse("http://localhost:3000/customers/:id").unwrap();
        assert_eq!(resolved.url, HttpRequestUrl::Url(expected));
    }

    #[tokio::test]
    async fn resolve_url_rejects_resolved_url() {
        let policy = resolve_url("http://localhost:3000");
        let url = Url::parse("http://example.com/ip").unwrap();
        let request: HttpRequest<()> = HttpRequest::new(HttpRequestMethod::Get, url);

        let err = policy(request).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::IllegalState);
    }

    #[tokio::test]
    async fn resolve_url_reports_unparseable_result() {
        let policy = resolve_url("not a base");
        let request: HttpRequest<()> = HttpRequest::new(HttpRequestMethod::Get, "/ip");

        let err = policy(request).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::IllegalArgument);
    }

    #[tokio::test]
    async fn add_headers_merges_over_request_headers() {
        let factory = create_headers(vec![constant_headers(HttpHeaders::from([
            ("x-client-name".to_string(), "pipeclient".to_string()),
            ("accept".to_string(), "application/json".to_string()),
        ]))]);
        let policy = add_headers(factory);
        let request: HttpRequest<()> = HttpRequest::new(HttpRequestMethod::Get, "/ip")
            .with_header("accept", "text/plain")
            .with_header("x-request-id", "1");

        let request = policy(request).await.unwrap();
        assert_eq!(request.headers.get("accept").map(String::as_str), Some("application/json"));
        assert_eq!(request.headers.get("x-request-id").map(String::as_str), Some("1"));
        assert_eq!(
            request.headers.get("x-client-name").map(String::as_str),
            Some("pipeclient")
        );
    }

    #[test]
    fn build_url_applies_path_and_query_params() {
        let request: HttpRequest<()> =
            HttpRequest::new(HttpRequestMethod::Get, "http://localhost:3000/customers/:id")
                .with_path_params(params(&[("id", "42")]))
                .with_query_params(params(&[("expand", "accounts")]));

        let url = build_url(&request).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/customers/42?expand=accounts");
    }

    #[test]
    fn build_url_without_params_keeps_url() {
        let request: HttpRequest<()> =
            HttpRequest::new(HttpRequestMethod::Get, "http://localhost:3000/ip");
        assert_eq!(build_url(&request).unwrap().as_str(), "http://localhost:3000/ip");
    }

    #[test]
    fn build_url_fails_on_missing_path_param() {
        let request: HttpRequest<()> =
            HttpRequest::new(HttpRequestMethod::Get, "http://localhost:3000/customers/:id");
        let err = build_url(&request).unwrap_err();
        assert_eq!(err.kind, ErrorKind::IllegalArgument);
    }
}
