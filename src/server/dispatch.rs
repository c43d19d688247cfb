use std::sync::{Arc, Mutex};

use tokio::net::TcpStream;

use crate::config::Config;
use crate::http::connection::{Connection, Lifecycle};
use crate::http::reader::{Reader, RecvError};
use crate::http::request::Request;
use crate::http::writer::ResponseWriter;
use crate::server::auth::Authenticator;
use crate::server::redirect::RedirectTable;
use crate::server::registry::{strip_trailing_slash, RequestHandler, ResourceRegistry};
use crate::server::responders;

/// Bound on redirect chain length; exceeding it fails the request with a
/// 500 response rather than looping.
pub const DEFAULT_MAX_REDIRECTS: u32 = 10;

/// The request-dispatch engine.
///
/// Owns the resource registry and redirect table, accepts connections from
/// the listener, and drives each through read → dispatch → respond cycles
/// until the connection closes. Cheap to share: the listener clones an
/// `Arc<Server>` per accepted connection.
pub struct Server {
    registry: ResourceRegistry,
    redirects: RedirectTable,
    auth: Mutex<Option<Arc<dyn Authenticator>>>,
    read_timeout_secs: u64,
    max_content_length: usize,
    max_redirects: u32,
}

impl Server {
    pub fn new(config: &Config) -> Self {
        Self {
            registry: ResourceRegistry::new(),
            redirects: RedirectTable::new(),
            auth: Mutex::new(None),
            read_timeout_secs: config.read_timeout_secs,
            max_content_length: config.max_content_length,
            max_redirects: config.max_redirects,
        }
    }

    /// Registers `handler` for `resource` and everything below it.
    pub fn add_resource(&self, resource: &str, handler: RequestHandler) {
        self.registry.add(resource, handler);
    }

    pub fn remove_resource(&self, resource: &str) {
        self.registry.remove(resource);
    }

    /// Requests for `requested` are rewritten to `target` before lookup.
    pub fn add_redirect(&self, requested: &str, target: &str) {
        self.redirects.add(requested, target);
    }

    /// Installs the authentication gate consulted before handler lookup.
    pub fn set_authenticator(&self, auth: Arc<dyn Authenticator>) {
        *self
            .auth
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(auth);
    }

    fn authenticator(&self) -> Option<Arc<dyn Authenticator>> {
        self.auth
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Drives one accepted connection until it closes.
    ///
    /// Constructs the reader once so pipelined octets survive between
    /// requests, then cycles receive → dispatch while the exchange keeps
    /// the connection alive.
    pub async fn handle_connection(&self, stream: TcpStream) {
        let mut conn = Connection::new(stream);
        let mut reader = Reader::new();
        reader.set_timeout(self.read_timeout_secs);
        reader.set_max_content_length(self.max_content_length);

        loop {
            let outcome = reader.receive(&mut conn).await;
            self.handle_request(outcome, &mut conn).await;
            if !conn.is_open() || conn.lifecycle() != Lifecycle::KeepAlive {
                break;
            }
            reader.reset();
        }
    }

    /// The per-request dispatch path: error gate, normalisation, redirect
    /// resolution, authentication gate, handler lookup under the fault
    /// envelope.
    pub async fn handle_request(
        &self,
        outcome: Result<Request, RecvError>,
        conn: &mut Connection,
    ) {
        let mut request = match outcome {
            Ok(request) if request.is_valid() => request,
            Ok(_) => {
                // invalid without a parser error is not answerable
                conn.set_lifecycle(Lifecycle::Close);
                tracing::info!("invalid HTTP request");
                conn.finish().await;
                return;
            }
            Err(err) => {
                conn.set_lifecycle(Lifecycle::Close);
                if conn.is_open() && err.is_parse() {
                    tracing::info!(error = %err, "invalid HTTP request");
                    responders::bad_request(conn).await;
                } else {
                    tracing::info!(error = %err, "lost connection");
                    conn.finish().await;
                }
                return;
            }
        };

        tracing::debug!(
            method = %request.method,
            resource = %request.resource(),
            "received a valid HTTP request"
        );

        // the exchange decides whether this connection survives the response
        conn.set_lifecycle(if request.keep_alive() {
            Lifecycle::KeepAlive
        } else {
            Lifecycle::Close
        });

        // lookups use the normalised path without its query string; the
        // request keeps what the client sent unless a redirect rewrites it
        let mut resource = strip_trailing_slash(request.path()).to_string();

        let mut num_redirects = 0u32;
        while let Some(target) = self.redirects.lookup(&resource) {
            num_redirects += 1;
            if num_redirects > self.max_redirects {
                tracing::error!(
                    resource = %request.original_resource(),
                    "maximum number of redirects exceeded"
                );
                responders::server_error(
                    &request,
                    conn,
                    "Maximum number of redirects exceeded",
                )
                .await;
                return;
            }
            resource = target;
            request.change_resource(resource.clone());
        }

        if let Some(auth) = self.authenticator() {
            if !auth.handle_request(&request, conn).await {
                tracing::debug!(resource = %resource, "authentication required");
                if request.resource() != request.original_resource() {
                    tracing::debug!(
                        original = %request.original_resource(),
                        "original resource requested"
                    );
                }
                return;
            }
        }

        match self.registry.find(&resource) {
            Some(handler) => self.invoke_handler(handler, &request, conn, &resource).await,
            None => {
                tracing::info!(resource = %resource, "no request handler found");
                if request.resource() != request.original_resource() {
                    tracing::debug!(
                        original = %request.original_resource(),
                        "original resource requested"
                    );
                }
                responders::not_found(&request, conn).await;
            }
        }
    }

    /// Runs a handler inside the fault envelope: a recoverable failure is
    /// logged and converted to a 500 response carrying its diagnostic
    /// text, with the handler's unsent output discarded. Allocation
    /// failure aborts the process.
    async fn invoke_handler(
        &self,
        handler: RequestHandler,
        request: &Request,
        conn: &mut Connection,
        resource: &str,
    ) {
        let mut writer = ResponseWriter::for_request(request);
        match handler(request, &mut writer) {
            Ok(()) => {
                tracing::debug!(resource = %resource, "found request handler");
                if request.resource() != request.original_resource() {
                    tracing::debug!(
                        original = %request.original_resource(),
                        "original resource requested"
                    );
                }
                if let Err(e) = writer.send(conn).await {
                    tracing::warn!(error = %e, "failed to write response");
                }
            }
            Err(e) => {
                let diagnostic = format!("{e:#}");
                tracing::error!(error = %diagnostic, "request handler failed");
                responders::server_error(request, conn, &diagnostic).await;
            }
        }
    }
}
