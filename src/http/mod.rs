//! HTTP/1.x protocol implementation.
//!
//! This layer owns everything between the raw TCP stream and a fully
//! parsed request: incremental parsing under a read deadline, response
//! serialisation, and the per-connection lifecycle.
//!
//! # Architecture
//!
//! - **`connection`**: one accepted stream plus its lifecycle flag (close
//!   vs keep-alive) and the idempotent `finish()` hook
//! - **`parser`**: stateful incremental request parser; header grammar via
//!   `httparse`, body framing (fixed / chunked / until-close) here
//! - **`deadline`**: re-armable read deadline raced against each read
//! - **`reader`**: drives connection + deadline + parser to exactly one
//!   message or one terminal error per cycle
//! - **`writer`**: accumulates a response and emits it, then finishes the
//!   connection
//! - **`headers`**, **`request`**, **`response`**: the message model
//!
//! # Receive cycle
//!
//! ```text
//!        ┌──────────┐  buffered pipelined octets
//!        │   IDLE   ├─────────────────┐
//!        └────┬─────┘                 ▼
//!             │ read issued      ┌─────────┐
//!        ┌────▼─────┐ need more  │ PARSING │
//!        │ READING  │◄───────────┤         │
//!        └────┬─────┘            └────┬────┘
//!             │ timeout / io error    │ complete / parse error
//!             ▼                       ▼
//!        ┌─────────────────────────────────┐
//!        │ DONE{ok | parse | io | timeout} │
//!        └─────────────────────────────────┘
//! ```
//!
//! The completion is delivered exactly once: the reader's single return is
//! the callback, and the deadline/read race is settled by dropping the
//! losing branch.

pub mod connection;
pub mod deadline;
pub mod headers;
pub mod parser;
pub mod reader;
pub mod request;
pub mod response;
pub mod writer;

pub use connection::{Connection, Lifecycle};
pub use headers::HeaderMap;
pub use parser::{MessageParser, ParseError};
pub use reader::{Reader, RecvError};
pub use request::{Method, Request, RequestBuilder, Version};
pub use response::{Response, StatusCode};
pub use writer::ResponseWriter;
