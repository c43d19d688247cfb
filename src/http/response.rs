use crate::http::headers::HeaderMap;

/// HTTP status codes the framework emits.
///
/// - `Ok` (200): request successful
/// - `Created` (201): resource created
/// - `NoContent` (204): successful request with no content
/// - `BadRequest` (400): malformed request
/// - `Unauthorized` (401): authentication required
/// - `Forbidden` (403): authenticated but not permitted
/// - `NotFound` (404): resource not found
/// - `MethodNotAllowed` (405): HTTP method not supported
/// - `InternalServerError` (500): server error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 201 Created
    Created,
    /// 204 No Content
    NoContent,
    /// 400 Bad Request
    BadRequest,
    /// 401 Unauthorized
    Unauthorized,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::NoContent => 204,
            StatusCode::BadRequest => 400,
            StatusCode::Unauthorized => 401,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::NoContent => "No Content",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Unauthorized => "Unauthorized",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// The head of an HTTP response: status line and headers.
///
/// The body is accumulated separately by the
/// [`ResponseWriter`](crate::http::writer::ResponseWriter), which also
/// serialises the whole message on `send`.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    reason: String,
    pub headers: HeaderMap,
}

impl Response {
    pub fn new() -> Self {
        Self {
            status: StatusCode::Ok,
            reason: StatusCode::Ok.reason_phrase().to_string(),
            headers: HeaderMap::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Sets the status code and resets the reason phrase to its canonical
    /// text.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
        self.reason = status.reason_phrase().to_string();
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Overrides the reason phrase emitted on the status line.
    pub fn set_reason(&mut self, reason: impl Into<String>) {
        self.reason = reason.into();
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.set(name, value);
    }

    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.append(name, value);
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}
