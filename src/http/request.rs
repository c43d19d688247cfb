use std::fmt;

use crate::http::headers::HeaderMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    GET,
    POST,
    PUT,
    DELETE,
    HEAD,
    OPTIONS,
    PATCH,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    Http10,
    Http11,
}

/// A fully parsed HTTP request.
///
/// The resource is the path portion of the request line as the client sent
/// it. Redirection may rewrite it during dispatch; `original_resource` keeps
/// the first-seen value for logging and is never changed after parsing.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    resource: String,
    original_resource: String,
    pub version: Version,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    valid: bool,
    expect_continue: bool,
}

pub struct RequestBuilder {
    method: Option<Method>,
    resource: Option<String>,
    version: Version,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Method {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            "HEAD" => Some(Method::HEAD),
            "OPTIONS" => Some(Method::OPTIONS),
            "PATCH" => Some(Method::PATCH),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
        }
    }

    /// Whether a request with this method may carry a body when no framing
    /// headers are present (HTTP/1.0 read-until-close).
    pub fn allows_body(&self) -> bool {
        matches!(self, Method::POST | Method::PUT | Method::PATCH)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Version {
    pub fn as_str(&self) -> &'static str {
        match self {
            Version::Http10 => "HTTP/1.0",
            Version::Http11 => "HTTP/1.1",
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Request {
    pub(crate) fn new(
        method: Method,
        resource: String,
        version: Version,
        headers: HeaderMap,
    ) -> Self {
        Self {
            method,
            original_resource: resource.clone(),
            resource,
            version,
            headers,
            body: Vec::new(),
            valid: false,
            expect_continue: false,
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// The resource as first seen on the request line, untouched by
    /// redirection.
    pub fn original_resource(&self) -> &str {
        &self.original_resource
    }

    /// Rewrites the resource (redirection); the original is preserved.
    pub fn change_resource(&mut self, resource: impl Into<String>) {
        self.resource = resource.into();
    }

    /// The resource without its query string.
    pub fn path(&self) -> &str {
        match self.resource.split_once('?') {
            Some((path, _)) => path,
            None => &self.resource,
        }
    }

    /// The query string, if the resource carries one.
    pub fn query(&self) -> Option<&str> {
        self.resource.split_once('?').map(|(_, q)| q)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn content_length(&self) -> usize {
        self.header("Content-Length")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    /// Connection persistence negotiated by the request: HTTP/1.1 defaults
    /// to keep-alive, HTTP/1.0 to close, and an explicit `Connection`
    /// header overrides either.
    pub fn keep_alive(&self) -> bool {
        match self.header("Connection") {
            Some(v) if v.eq_ignore_ascii_case("close") => false,
            Some(v) if v.eq_ignore_ascii_case("keep-alive") => true,
            _ => self.version == Version::Http11,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub(crate) fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }

    /// True when the client sent `Expect: 100-continue`.
    pub fn expects_continue(&self) -> bool {
        self.expect_continue
    }

    pub(crate) fn set_expect_continue(&mut self, expect: bool) {
        self.expect_continue = expect;
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            resource: None,
            version: Version::Http11,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        let mut request = Request::new(
            self.method.ok_or("method missing")?,
            self.resource.ok_or("resource missing")?,
            self.version,
            self.headers,
        );
        request.body = self.body;
        request.set_valid(true);
        Ok(request)
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
