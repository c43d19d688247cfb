use bytes::{Buf, BytesMut};

use crate::http::headers::HeaderMap;
use crate::http::request::{Method, Request, Version};

/// Default request-body cap.
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 1024 * 1024;

const MAX_HEADERS_NUM: usize = 64;
const MAX_HEADERS_SIZE: usize = 16 * 1024;
const MAX_CHUNK_HEAD: usize = 128;

/// Errors produced while parsing an HTTP message.
///
/// These form their own error category: the dispatcher answers a parse
/// error with a 400 response, while I/O errors close the connection
/// silently. `UnexpectedEof` sits in between — a protocol violation, but
/// from a peer that already hung up, so it is closed like an I/O error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The request line is malformed
    #[error("malformed request line")]
    BadStartLine,
    /// The HTTP method is not recognized
    #[error("unrecognized HTTP method")]
    BadMethod,
    /// The HTTP version is not 1.0 or 1.1
    #[error("unsupported HTTP version")]
    BadVersion,
    /// A header line is malformed
    #[error("malformed header")]
    BadHeader,
    /// The header block exceeds the size limit
    #[error("header block too large")]
    HeadersTooLarge,
    /// A Transfer-Encoding other than chunked was requested
    #[error("unsupported transfer encoding")]
    UnsupportedTransferEncoding,
    /// Content-Length is unparsable or duplicated
    #[error("invalid Content-Length header")]
    BadContentLength,
    /// The stream ended before the declared message length
    #[error("message truncated before the declared length")]
    ContentLengthMismatch,
    /// The stream ended in the middle of a message
    #[error("connection closed mid-message")]
    UnexpectedEof,
    /// The declared or accumulated body exceeds the configured cap
    #[error("message body exceeds the configured limit")]
    ContentTooLarge,
    /// A chunk-size line or chunk framing is malformed
    #[error("malformed chunk")]
    BadChunk,
}

#[derive(Debug)]
enum ParseState {
    /// Waiting for the complete header block
    Headers,
    /// Reading a Content-Length body
    FixedBody { message: Request, remaining: usize },
    /// HTTP/1.0 body delimited by end of stream
    UntilClose { message: Request },
    /// Expecting a chunk-size line
    ChunkHead { message: Request },
    /// Reading chunk data
    ChunkData { message: Request, remaining: usize },
    /// Expecting the CRLF that closes a chunk's data
    ChunkDataEnd { message: Request },
    /// Consuming trailer lines after the final chunk
    ChunkTrailer { message: Request },
}

/// Stateful incremental HTTP/1.x request parser.
///
/// Feed it octets as they arrive with [`consume`](MessageParser::consume);
/// each feed reports either a complete request, the need for more data, or
/// a typed [`ParseError`]. Start-line and header grammar is delegated to
/// `httparse`; body framing (fixed length, chunked, read-until-close) is
/// handled here. After a message completes the parser is immediately ready
/// for the next one on the same connection, retaining any pipelined bytes
/// that arrived early.
#[derive(Debug)]
pub struct MessageParser {
    buf: BytesMut,
    state: ParseState,
    max_content_length: usize,
}

impl MessageParser {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(4096),
            state: ParseState::Headers,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
        }
    }

    pub fn set_max_content_length(&mut self, limit: usize) {
        self.max_content_length = limit;
    }

    /// Unconsumed octets are waiting, e.g. from a pipelined request.
    pub fn has_buffered(&self) -> bool {
        !self.buf.is_empty()
    }

    /// At least some octets of the current message have been consumed.
    pub fn has_begun(&self) -> bool {
        !self.buf.is_empty() || !matches!(self.state, ParseState::Headers)
    }

    /// Discards any half-parsed message; buffered octets are retained.
    pub fn reset(&mut self) {
        self.state = ParseState::Headers;
    }

    /// Feeds the next chunk of octets.
    ///
    /// Returns `Ok(Some(request))` when a message completed, `Ok(None)`
    /// when more octets are needed. An empty chunk just re-runs the state
    /// machine over buffered data.
    pub fn consume(&mut self, chunk: &[u8]) -> Result<Option<Request>, ParseError> {
        if !chunk.is_empty() {
            self.buf.extend_from_slice(chunk);
        }
        self.drive()
    }

    /// End-of-stream finalisation: completes a read-until-close body. A
    /// fixed-length body cut short has violated its declared length; in
    /// any other state the peer vanished mid-message.
    pub fn finish_stream(&mut self) -> Result<Request, ParseError> {
        match std::mem::replace(&mut self.state, ParseState::Headers) {
            ParseState::UntilClose { mut message } => {
                message.set_valid(true);
                Ok(message)
            }
            ParseState::FixedBody { .. } => Err(ParseError::ContentLengthMismatch),
            _ => Err(ParseError::UnexpectedEof),
        }
    }

    fn drive(&mut self) -> Result<Option<Request>, ParseError> {
        loop {
            match std::mem::replace(&mut self.state, ParseState::Headers) {
                ParseState::Headers => match self.parse_headers()? {
                    Some(next) => self.state = next,
                    None => return Ok(None),
                },

                ParseState::FixedBody {
                    mut message,
                    mut remaining,
                } => {
                    let take = remaining.min(self.buf.len());
                    if take > 0 {
                        self.append_body(&mut message, take)?;
                        remaining -= take;
                    }
                    if remaining == 0 {
                        message.set_valid(true);
                        return Ok(Some(message));
                    }
                    self.state = ParseState::FixedBody { message, remaining };
                    return Ok(None);
                }

                ParseState::UntilClose { mut message } => {
                    let take = self.buf.len();
                    if take > 0 {
                        self.append_body(&mut message, take)?;
                    }
                    self.state = ParseState::UntilClose { message };
                    return Ok(None);
                }

                ParseState::ChunkHead { message } => {
                    match httparse::parse_chunk_size(&self.buf) {
                        Ok(httparse::Status::Complete((consumed, size))) => {
                            self.buf.advance(consumed);
                            if size == 0 {
                                self.state = ParseState::ChunkTrailer { message };
                            } else if message.body.len() as u64 + size
                                > self.max_content_length as u64
                            {
                                return Err(ParseError::ContentTooLarge);
                            } else {
                                self.state = ParseState::ChunkData {
                                    message,
                                    remaining: size as usize,
                                };
                            }
                        }
                        Ok(httparse::Status::Partial) => {
                            if self.buf.len() > MAX_CHUNK_HEAD {
                                return Err(ParseError::BadChunk);
                            }
                            self.state = ParseState::ChunkHead { message };
                            return Ok(None);
                        }
                        Err(_) => return Err(ParseError::BadChunk),
                    }
                }

                ParseState::ChunkData {
                    mut message,
                    mut remaining,
                } => {
                    let take = remaining.min(self.buf.len());
                    if take > 0 {
                        self.append_body(&mut message, take)?;
                        remaining -= take;
                    }
                    if remaining == 0 {
                        self.state = ParseState::ChunkDataEnd { message };
                    } else {
                        self.state = ParseState::ChunkData { message, remaining };
                        return Ok(None);
                    }
                }

                ParseState::ChunkDataEnd { message } => {
                    if self.buf.len() < 2 {
                        self.state = ParseState::ChunkDataEnd { message };
                        return Ok(None);
                    }
                    if &self.buf[..2] != b"\r\n" {
                        return Err(ParseError::BadChunk);
                    }
                    self.buf.advance(2);
                    self.state = ParseState::ChunkHead { message };
                }

                ParseState::ChunkTrailer { mut message } => {
                    match find_crlf(&self.buf) {
                        Some(0) => {
                            self.buf.advance(2);
                            message.set_valid(true);
                            return Ok(Some(message));
                        }
                        Some(line_end) => {
                            // trailer header, discarded
                            self.buf.advance(line_end + 2);
                            self.state = ParseState::ChunkTrailer { message };
                        }
                        None => {
                            if self.buf.len() > MAX_HEADERS_SIZE {
                                return Err(ParseError::BadChunk);
                            }
                            self.state = ParseState::ChunkTrailer { message };
                            return Ok(None);
                        }
                    }
                }
            }
        }
    }

    /// Parses the header block when it is complete. Returns the body state
    /// to enter (a message without a body enters `FixedBody` with zero
    /// remaining), or `None` when more octets are needed.
    fn parse_headers(&mut self) -> Result<Option<ParseState>, ParseError> {
        // ignore empty lines ahead of the request line (RFC 7230 §3.5)
        while self.buf.starts_with(b"\r\n") {
            self.buf.advance(2);
        }
        let Some(end) = find_headers_end(&self.buf) else {
            if self.buf.len() > MAX_HEADERS_SIZE {
                return Err(ParseError::HeadersTooLarge);
            }
            return Ok(None);
        };
        let head_len = end + 4;

        let mut slots = [httparse::EMPTY_HEADER; MAX_HEADERS_NUM];
        let mut parsed = httparse::Request::new(&mut slots);
        match parsed
            .parse(&self.buf[..head_len])
            .map_err(map_httparse_error)?
        {
            httparse::Status::Complete(n) => debug_assert_eq!(n, head_len),
            // the delimiter was found, so a partial parse is a framing bug
            // in the message itself
            httparse::Status::Partial => return Err(ParseError::BadStartLine),
        }

        let method = parsed
            .method
            .and_then(Method::from_str)
            .ok_or(ParseError::BadMethod)?;
        let version = match parsed.version {
            Some(0) => Version::Http10,
            Some(1) => Version::Http11,
            _ => return Err(ParseError::BadVersion),
        };
        let resource = parsed.path.ok_or(ParseError::BadStartLine)?.to_string();

        let mut headers = HeaderMap::new();
        for h in parsed.headers.iter() {
            let value = std::str::from_utf8(h.value).map_err(|_| ParseError::BadHeader)?;
            headers.append(h.name, value.trim());
        }
        self.buf.advance(head_len);

        let chunked = match headers.get("Transfer-Encoding") {
            Some(v) => {
                let last = v.split(',').map(str::trim).last().unwrap_or("");
                if last.eq_ignore_ascii_case("chunked") {
                    true
                } else {
                    return Err(ParseError::UnsupportedTransferEncoding);
                }
            }
            None => false,
        };

        let mut content_length: Option<usize> = None;
        for (name, value) in headers.iter() {
            if name.eq_ignore_ascii_case("Content-Length") {
                if content_length.is_some() {
                    return Err(ParseError::BadContentLength);
                }
                content_length =
                    Some(value.parse().map_err(|_| ParseError::BadContentLength)?);
            }
        }

        let expect_continue = headers
            .get("Expect")
            .map(|v| v.eq_ignore_ascii_case("100-continue"))
            .unwrap_or(false);

        let mut message = Request::new(method, resource, version, headers);
        message.set_expect_continue(expect_continue);

        // body-length precedence follows RFC 7230 §3.3.3: chunked
        // transfer-encoding first, then Content-Length, then nothing
        if chunked {
            return Ok(Some(ParseState::ChunkHead { message }));
        }
        if let Some(len) = content_length {
            if len > self.max_content_length {
                return Err(ParseError::ContentTooLarge);
            }
            return Ok(Some(ParseState::FixedBody {
                message,
                remaining: len,
            }));
        }
        if version == Version::Http10 && method.allows_body() {
            return Ok(Some(ParseState::UntilClose { message }));
        }
        Ok(Some(ParseState::FixedBody {
            message,
            remaining: 0,
        }))
    }

    fn append_body(&mut self, message: &mut Request, n: usize) -> Result<(), ParseError> {
        if message.body.len() + n > self.max_content_length {
            return Err(ParseError::ContentTooLarge);
        }
        let chunk = self.buf.split_to(n);
        message.body.extend_from_slice(&chunk);
        Ok(())
    }
}

impl Default for MessageParser {
    fn default() -> Self {
        Self::new()
    }
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\r\n")
}

fn map_httparse_error(err: httparse::Error) -> ParseError {
    use httparse::Error;
    match err {
        Error::Version => ParseError::BadVersion,
        Error::HeaderName | Error::HeaderValue | Error::NewLine => ParseError::BadHeader,
        Error::TooManyHeaders => ParseError::HeadersTooLarge,
        Error::Token | Error::Status => ParseError::BadStartLine,
    }
}
