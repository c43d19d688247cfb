//! Default error responders.
//!
//! Each builds a response writer, sets the status, emits the canonical
//! HTML page and sends it; the send finishes the connection according to
//! its lifecycle flag. Static page fragments go out without copying,
//! dynamic values (resource, method, error text) are formatted in between.

use crate::http::connection::Connection;
use crate::http::request::Request;
use crate::http::response::StatusCode;
use crate::http::writer::ResponseWriter;

static BAD_REQUEST_HTML: &[u8] = b"<html><head>\n\
    <title>400 Bad Request</title>\n\
    </head><body>\n\
    <h1>Bad Request</h1>\n\
    <p>Your browser sent a request that this server could not understand.</p>\n\
    </body></html>\n";

static NOT_FOUND_HTML_START: &[u8] = b"<html><head>\n\
    <title>404 Not Found</title>\n\
    </head><body>\n\
    <h1>Not Found</h1>\n\
    <p>The requested URL ";
static NOT_FOUND_HTML_FINISH: &[u8] = b" was not found on this server.</p>\n\
    </body></html>\n";

static SERVER_ERROR_HTML_START: &[u8] = b"<html><head>\n\
    <title>500 Server Error</title>\n\
    </head><body>\n\
    <h1>Internal Server Error</h1>\n\
    <p>The server encountered an internal error: <strong>";
static SERVER_ERROR_HTML_FINISH: &[u8] = b"</strong></p>\n\
    </body></html>\n";

static FORBIDDEN_HTML_START: &[u8] = b"<html><head>\n\
    <title>403 Forbidden</title>\n\
    </head><body>\n\
    <h1>Forbidden</h1>\n\
    <p>User not authorized to access the requested URL ";
static FORBIDDEN_HTML_MIDDLE: &[u8] = b"</p><p><strong>\n";
static FORBIDDEN_HTML_FINISH: &[u8] = b"</strong></p>\n\
    </body></html>\n";

static NOT_ALLOWED_HTML_START: &[u8] = b"<html><head>\n\
    <title>405 Method Not Allowed</title>\n\
    </head><body>\n\
    <h1>Not Allowed</h1>\n\
    <p>The requested method ";
static NOT_ALLOWED_HTML_FINISH: &[u8] = b" is not allowed on this server.</p>\n\
    </body></html>\n";

async fn send(mut writer: ResponseWriter, conn: &mut Connection) {
    if let Err(e) = writer.send(conn).await {
        tracing::debug!(error = %e, "failed to send error response");
    }
}

pub async fn bad_request(conn: &mut Connection) {
    let mut writer = ResponseWriter::new();
    writer.response_mut().set_status(StatusCode::BadRequest);
    writer.write_static(BAD_REQUEST_HTML);
    send(writer, conn).await;
}

pub async fn not_found(request: &Request, conn: &mut Connection) {
    let mut writer = ResponseWriter::for_request(request);
    writer.response_mut().set_status(StatusCode::NotFound);
    writer.write_static(NOT_FOUND_HTML_START);
    writer.push(request.resource());
    writer.write_static(NOT_FOUND_HTML_FINISH);
    send(writer, conn).await;
}

pub async fn server_error(request: &Request, conn: &mut Connection, error_msg: &str) {
    let mut writer = ResponseWriter::for_request(request);
    writer
        .response_mut()
        .set_status(StatusCode::InternalServerError);
    writer.write_static(SERVER_ERROR_HTML_START);
    writer.push(error_msg);
    writer.write_static(SERVER_ERROR_HTML_FINISH);
    send(writer, conn).await;
}

pub async fn forbidden(request: &Request, conn: &mut Connection, error_msg: &str) {
    let mut writer = ResponseWriter::for_request(request);
    writer.response_mut().set_status(StatusCode::Forbidden);
    writer.write_static(FORBIDDEN_HTML_START);
    writer.push(request.resource());
    writer.write_static(FORBIDDEN_HTML_MIDDLE);
    writer.push(error_msg);
    writer.write_static(FORBIDDEN_HTML_FINISH);
    send(writer, conn).await;
}

pub async fn method_not_allowed(
    request: &Request,
    conn: &mut Connection,
    allowed_methods: &str,
) {
    let mut writer = ResponseWriter::for_request(request);
    writer
        .response_mut()
        .set_status(StatusCode::MethodNotAllowed);
    if !allowed_methods.is_empty() {
        writer
            .response_mut()
            .set_header("Allow", allowed_methods);
    }
    writer.write_static(NOT_ALLOWED_HTML_START);
    writer.push(request.method);
    writer.write_static(NOT_ALLOWED_HTML_FINISH);
    send(writer, conn).await;
}
