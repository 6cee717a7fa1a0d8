//! HTTP value objects passed between pipeline stages.
//!
//! # Design
//! Requests, responses and results are plain data. Stages never mutate
//! them in place: each stage takes ownership and returns a new value with
//! only the relevant fields changed. The body is a type parameter so a
//! pipeline can move from a structured body to `UnstructuredData` (and back)
//! one stage at a time.
//!
//! Struct update syntax cannot change a type parameter, so every value
//! carries an explicit `with_body` (or `with_response`) constructor that
//! takes all other fields from the source value.

use std::collections::BTreeMap;
use std::fmt;

use url::Url;

/// Header name to value. Inserting an existing name replaces its value.
pub type HttpHeaders = BTreeMap<String, String>;

/// Path slug or query parameter name to value.
pub type HttpParams = BTreeMap<String, String>;

/// HTTP method (verb) for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpRequestMethod {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Connect,
    Options,
    Trace,
    Patch,
}

impl HttpRequestMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpRequestMethod::Get => "GET",
            HttpRequestMethod::Head => "HEAD",
            HttpRequestMethod::Post => "POST",
            HttpRequestMethod::Put => "PUT",
            HttpRequestMethod::Delete => "DELETE",
            HttpRequestMethod::Connect => "CONNECT",
            HttpRequestMethod::Options => "OPTIONS",
            HttpRequestMethod::Trace => "TRACE",
            HttpRequestMethod::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpRequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a request is sent.
///
/// `Raw` holds a string that may still be relative to a base URL; `Url` is
/// absolute. Only `Raw` can be resolved against a base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpRequestUrl {
    Url(Url),
    Raw(String),
}

impl From<Url> for HttpRequestUrl {
    fn from(url: Url) -> Self {
        HttpRequestUrl::Url(url)
    }
}

impl From<&str> for HttpRequestUrl {
    fn from(url: &str) -> Self {
        HttpRequestUrl::Raw(url.to_string())
    }
}

impl From<String> for HttpRequestUrl {
    fn from(url: String) -> Self {
        HttpRequestUrl::Raw(url)
    }
}

impl fmt::Display for HttpRequestUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpRequestUrl::Url(url) => write!(f, "{url}"),
            HttpRequestUrl::Raw(url) => f.write_str(url),
        }
    }
}

/// Payload without a pre-defined data model, as handed to and received from
/// a transport.
///
/// New representations (e.g. binary) may be added, so matches outside this
/// crate need a fallback arm.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UnstructuredData {
    String(String),
}

impl From<String> for UnstructuredData {
    fn from(data: String) -> Self {
        UnstructuredData::String(data)
    }
}

impl From<&str> for UnstructuredData {
    fn from(data: &str) -> Self {
        UnstructuredData::String(data.to_string())
    }
}

/// An outbound HTTP request.
///
/// `path_params` fill `:slug` segments of the URL path and `query_params`
/// become the query string; both are applied by the transport when it
/// builds the final URL.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest<B> {
    pub method: HttpRequestMethod,
    pub url: HttpRequestUrl,
    pub headers: HttpHeaders,
    pub path_params: Option<HttpParams>,
    pub query_params: Option<HttpParams>,
    pub body: Option<B>,
}

impl<B> HttpRequest<B> {
    pub fn new(method: HttpRequestMethod, url: impl Into<HttpRequestUrl>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HttpHeaders::new(),
            path_params: None,
            query_params: None,
            body: None,
        }
    }

    pub fn with_headers(mut self, headers: HttpHeaders) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_path_params(mut self, params: HttpParams) -> Self {
        self.path_params = Some(params);
        self
    }

    pub fn with_query_params(mut self, params: HttpParams) -> Self {
        self.query_params = Some(params);
        self
    }

    pub fn with_body_value(mut self, body: B) -> Self {
        self.body = Some(body);
        self
    }

    /// Copy the request with a body of a different type.
    pub fn with_body<A>(self, body: Option<A>) -> HttpRequest<A> {
        HttpRequest {
            method: self.method,
            url: self.url,
            headers: self.headers,
            path_params: self.path_params,
            query_params: self.query_params,
            body,
        }
    }

    /// Transform a present body; an absent body stays absent.
    pub fn map_body<A>(self, f: impl FnOnce(B) -> A) -> HttpRequest<A> {
        let Self {
            method,
            url,
            headers,
            path_params,
            query_params,
            body,
        } = self;
        HttpRequest {
            method,
            url,
            headers,
            path_params,
            query_params,
            body: body.map(f),
        }
    }
}

/// An inbound HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse<B> {
    pub status_code: u16,
    pub status_message: String,
    pub headers: HttpHeaders,
    pub body: Option<B>,
}

impl<B> HttpResponse<B> {
    pub fn new(status_code: u16, status_message: impl Into<String>) -> Self {
        Self {
            status_code,
            status_message: status_message.into(),
            headers: HttpHeaders::new(),
            body: None,
        }
    }

    pub fn with_headers(mut self, headers: HttpHeaders) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body_value(mut self, body: B) -> Self {
        self.body = Some(body);
        self
    }

    /// Copy the response with a body of a different type.
    pub fn with_body<A>(self, body: Option<A>) -> HttpResponse<A> {
        HttpResponse {
            status_code: self.status_code,
            status_message: self.status_message,
            headers: self.headers,
            body,
        }
    }
}

/// A request paired with the response it produced.
///
/// The request is kept so handlers can inspect what was actually sent, for
/// example to build a retry after refreshing a token.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResult<Req, Resp> {
    pub request: HttpRequest<Req>,
    pub response: HttpResponse<Resp>,
}

impl<Req, Resp> HttpResult<Req, Resp> {
    pub fn new(request: HttpRequest<Req>, response: HttpResponse<Resp>) -> Self {
        Self { request, response }
    }

    /// Copy the result with a response of a different body type. The request
    /// is carried over unchanged.
    pub fn with_response<A>(self, response: HttpResponse<A>) -> HttpResult<Req, A> {
        HttpResult {
            request: self.request,
            response,
        }
    }
}
