use std::io;
use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// What happens to the transport once the current response is finished.
///
/// - `Close`: the stream is shut down and the connection torn down
/// - `KeepAlive`: the stream stays open for the next request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Close,
    KeepAlive,
}

/// One accepted TCP stream with its lifecycle state.
///
/// A connection is shared in time, never concurrently: the reader drives it
/// while a request is being parsed, then the response writer, then the
/// reader again on keep-alive. Each phase ends with
/// [`finish`](Connection::finish), which closes or recycles the transport
/// according to the lifecycle flag.
#[derive(Debug)]
pub struct Connection {
    stream: TcpStream,
    lifecycle: Lifecycle,
    open: bool,
}

impl Connection {
    /// Wraps a freshly accepted stream. The lifecycle starts at `Close`;
    /// keep-alive must be earned by the request/response exchange.
    pub fn new(stream: TcpStream) -> Self {
        Self {
            stream,
            lifecycle: Lifecycle::Close,
            open: true,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn set_lifecycle(&mut self, lifecycle: Lifecycle) {
        self.lifecycle = lifecycle;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.stream.peer_addr()
    }

    /// Reads whatever octets are available, up to `buf.len()`. Zero means
    /// the peer closed its end.
    pub async fn read_some(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf).await
    }

    pub async fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.stream.write_all(data).await
    }

    /// End-of-use hook, invoked after the last write of a response.
    ///
    /// With lifecycle `Close` the stream is shut down and the connection
    /// marked closed; with `KeepAlive` the transport is left open for the
    /// next request on the same task. Idempotent.
    pub async fn finish(&mut self) {
        if !self.open {
            return;
        }
        if self.lifecycle == Lifecycle::Close {
            if let Err(e) = self.stream.shutdown().await {
                tracing::trace!(error = %e, "shutdown failed");
            }
            self.open = false;
            tracing::debug!("connection closed");
        }
    }
}
