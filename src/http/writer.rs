use std::borrow::Cow;
use std::fmt::Display;
use std::io;

use crate::http::connection::{Connection, Lifecycle};
use crate::http::request::{Method, Request};
use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Accumulates a response and emits it on the wire.
///
/// Nothing touches the transport until [`send`](ResponseWriter::send),
/// which serialises the status line, headers and body, then invokes
/// [`Connection::finish`] so the transport is closed or kept alive per its
/// lifecycle flag.
pub struct ResponseWriter {
    response: Response,
    segments: Vec<Cow<'static, [u8]>>,
    head_only: bool,
}

impl ResponseWriter {
    pub fn new() -> Self {
        Self {
            response: Response::new(),
            segments: Vec::new(),
            head_only: false,
        }
    }

    /// A writer answering `request`; HEAD responses carry headers but no
    /// body octets.
    pub fn for_request(request: &Request) -> Self {
        let mut writer = Self::new();
        writer.head_only = request.method == Method::HEAD;
        writer
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn response_mut(&mut self) -> &mut Response {
        &mut self.response
    }

    /// Appends to the body, copying the bytes.
    pub fn write(&mut self, bytes: &[u8]) {
        self.segments.push(Cow::Owned(bytes.to_vec()));
    }

    /// Appends to the body without copying; the buffer outlives the send
    /// by being static.
    pub fn write_static(&mut self, bytes: &'static [u8]) {
        self.segments.push(Cow::Borrowed(bytes));
    }

    /// Appends a formatted value to the body.
    pub fn push(&mut self, value: impl Display) {
        self.segments
            .push(Cow::Owned(value.to_string().into_bytes()));
    }

    pub fn body_len(&self) -> usize {
        self.segments.iter().map(|s| s.len()).sum()
    }

    pub fn clear_body(&mut self) {
        self.segments.clear();
    }

    /// Serialises and writes the response, then finishes the connection.
    ///
    /// A write failure forces the lifecycle to `Close` before finishing, so
    /// a broken transport is never recycled.
    pub async fn send(&mut self, conn: &mut Connection) -> io::Result<()> {
        if !self.response.headers.contains("Content-Length") {
            self.response
                .set_header("Content-Length", self.body_len().to_string());
        }
        if !self.response.headers.contains("Connection") {
            let value = match conn.lifecycle() {
                Lifecycle::KeepAlive => "keep-alive",
                Lifecycle::Close => "close",
            };
            self.response.set_header("Connection", value);
        }

        let mut head = format!(
            "{} {} {}\r\n",
            HTTP_VERSION,
            self.response.status().as_u16(),
            self.response.reason()
        )
        .into_bytes();
        for (name, value) in self.response.headers.iter() {
            head.extend_from_slice(name.as_bytes());
            head.extend_from_slice(b": ");
            head.extend_from_slice(value.as_bytes());
            head.extend_from_slice(b"\r\n");
        }
        head.extend_from_slice(b"\r\n");

        let result = self.write_out(conn, head).await;
        if result.is_err() {
            conn.set_lifecycle(Lifecycle::Close);
        }
        conn.finish().await;
        result
    }

    async fn write_out(&mut self, conn: &mut Connection, head: Vec<u8>) -> io::Result<()> {
        conn.write_all(&head).await?;
        if !self.head_only {
            for segment in &self.segments {
                conn.write_all(segment).await?;
            }
        }
        Ok(())
    }
}

impl Default for ResponseWriter {
    fn default() -> Self {
        Self::new()
    }
}
