use std::io;

use crate::http::connection::Connection;
use crate::http::deadline::Deadline;
use crate::http::parser::{MessageParser, ParseError};
use crate::http::request::Request;

/// Default per-read deadline, in seconds.
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 10;

/// Terminal outcomes of a receive cycle other than a complete message.
#[derive(Debug, thiserror::Error)]
pub enum RecvError {
    /// The message violated HTTP framing; answered with a 400 response
    #[error("invalid HTTP message: {0}")]
    Parse(#[from] ParseError),
    /// The transport failed mid-read
    #[error("read failed: {0}")]
    Io(#[from] io::Error),
    /// The read deadline expired
    #[error("read timed out")]
    Timeout,
    /// The peer closed the stream before sending any octet of a message
    #[error("connection closed before a request arrived")]
    Eof,
}

impl RecvError {
    /// Parse errors get an HTTP error response; everything else is treated
    /// as a lost connection and closed silently. An end of stream
    /// mid-message counts as lost: the peer is already gone, so there is
    /// nobody left to answer.
    pub fn is_parse(&self) -> bool {
        match self {
            RecvError::Parse(ParseError::UnexpectedEof) => false,
            RecvError::Parse(_) => true,
            _ => false,
        }
    }
}

/// Incrementally reads and parses one HTTP request off a connection.
///
/// Each [`receive`](Reader::receive) call delivers exactly one fully parsed
/// message or one terminal error. The reader owns the parser across the
/// whole connection, so octets of a pipelined request that arrived with the
/// previous message are consumed before any read is issued.
#[derive(Debug)]
pub struct Reader {
    parser: MessageParser,
    deadline: Deadline,
    read_timeout: u64,
}

impl Reader {
    pub fn new() -> Self {
        Self {
            parser: MessageParser::new(),
            deadline: Deadline::new(),
            read_timeout: DEFAULT_READ_TIMEOUT_SECS,
        }
    }

    /// Per-read deadline in seconds.
    pub fn set_timeout(&mut self, seconds: u64) {
        self.read_timeout = seconds;
    }

    pub fn set_max_content_length(&mut self, limit: usize) {
        self.parser.set_max_content_length(limit);
    }

    /// Prepares for the next message on the same connection. Buffered
    /// pipelined octets survive.
    pub fn reset(&mut self) {
        self.parser.reset();
    }

    /// Runs the read/parse cycle until one message is complete or one
    /// terminal error occurs.
    pub async fn receive(&mut self, conn: &mut Connection) -> Result<Request, RecvError> {
        // pipelined octets first
        if self.parser.has_buffered() {
            if let Some(request) = self.parser.consume(&[])? {
                tracing::trace!("request completed from buffered octets");
                return Ok(request);
            }
        }

        let mut chunk = [0u8; 4096];
        loop {
            self.deadline.arm(self.read_timeout);
            let read = tokio::select! {
                r = conn.read_some(&mut chunk) => r,
                _ = self.deadline.expired() => {
                    tracing::debug!("read deadline expired");
                    return Err(RecvError::Timeout);
                }
            };
            self.deadline.cancel();

            let n = read?;
            if n == 0 {
                // end of stream: let the parser finalise a read-until-close
                // body, otherwise the message (if any) is truncated
                if self.parser.has_begun() {
                    return Ok(self.parser.finish_stream()?);
                }
                return Err(RecvError::Eof);
            }

            if let Some(request) = self.parser.consume(&chunk[..n])? {
                return Ok(request);
            }
        }
    }
}

impl Default for Reader {
    fn default() -> Self {
        Self::new()
    }
}
