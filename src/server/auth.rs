use async_trait::async_trait;

use crate::http::connection::Connection;
use crate::http::request::Request;
use crate::http::response::StatusCode;
use crate::http::writer::ResponseWriter;

static UNAUTHORIZED_HTML: &[u8] = b"<html><head>\n\
    <title>401 Unauthorized</title>\n\
    </head><body>\n\
    <h1>Unauthorized</h1>\n\
    <p>Authentication is required to access the requested URL.</p>\n\
    </body></html>\n";

/// Gate consulted by the dispatch engine before handler lookup.
///
/// A `true` return lets the request proceed. A `false` return means the
/// authenticator has already answered the client itself (typically a 401
/// challenge); the engine takes no further action on the request.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn handle_request(&self, request: &Request, conn: &mut Connection) -> bool;
}

/// Shared-secret authenticator: requests must carry `header: secret`.
///
/// Denials answer with a 401 carrying a `WWW-Authenticate` challenge
/// naming the expected header.
pub struct HeaderAuthenticator {
    header: String,
    secret: String,
}

impl HeaderAuthenticator {
    pub fn new(header: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            secret: secret.into(),
        }
    }
}

#[async_trait]
impl Authenticator for HeaderAuthenticator {
    async fn handle_request(&self, request: &Request, conn: &mut Connection) -> bool {
        if request.header(&self.header) == Some(self.secret.as_str()) {
            return true;
        }
        let mut writer = ResponseWriter::for_request(request);
        writer.response_mut().set_status(StatusCode::Unauthorized);
        writer
            .response_mut()
            .set_header("WWW-Authenticate", format!("Header header=\"{}\"", self.header));
        writer.write_static(UNAUTHORIZED_HTML);
        if let Err(e) = writer.send(conn).await {
            tracing::debug!(error = %e, "failed to send authentication challenge");
        }
        false
    }
}
