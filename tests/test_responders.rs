use gatehouse::http::connection::Connection;
use gatehouse::http::request::{Method, RequestBuilder};
use gatehouse::server::responders;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};

async fn connected_pair() -> (TcpStream, Connection) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (client, accepted) = tokio::join!(TcpStream::connect(addr), listener.accept());
    let (server, _) = accepted.unwrap();
    (client.unwrap(), Connection::new(server))
}

async fn read_all(mut client: TcpStream) -> String {
    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

fn request_for(method: Method, resource: &str) -> gatehouse::http::request::Request {
    RequestBuilder::new()
        .method(method)
        .resource(resource)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_bad_request_page() {
    let (client, mut conn) = connected_pair().await;
    responders::bad_request(&mut conn).await;

    let sent = read_all(client).await;
    assert!(sent.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    assert!(sent.contains("<title>400 Bad Request</title>"));
    assert!(!conn.is_open());
}

#[tokio::test]
async fn test_not_found_page_embeds_resource() {
    let (client, mut conn) = connected_pair().await;
    let request = request_for(Method::GET, "/missing/page");
    responders::not_found(&request, &mut conn).await;

    let sent = read_all(client).await;
    assert!(sent.starts_with("HTTP/1.1 404 Not Found\r\n"));
    assert!(sent.contains("The requested URL /missing/page was not found"));
}

#[tokio::test]
async fn test_server_error_page_embeds_message() {
    let (client, mut conn) = connected_pair().await;
    let request = request_for(Method::GET, "/x");
    responders::server_error(&request, &mut conn, "disk on fire").await;

    let sent = read_all(client).await;
    assert!(sent.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));
    assert!(sent.contains("<strong>disk on fire</strong>"));
}

#[tokio::test]
async fn test_forbidden_page_embeds_resource_and_message() {
    let (client, mut conn) = connected_pair().await;
    let request = request_for(Method::GET, "/secret");
    responders::forbidden(&request, &mut conn, "no such user").await;

    let sent = read_all(client).await;
    assert!(sent.starts_with("HTTP/1.1 403 Forbidden\r\n"));
    assert!(sent.contains("/secret"));
    assert!(sent.contains("no such user"));
}

#[tokio::test]
async fn test_method_not_allowed_adds_allow_header() {
    let (client, mut conn) = connected_pair().await;
    let request = request_for(Method::DELETE, "/readonly");
    responders::method_not_allowed(&request, &mut conn, "GET, HEAD").await;

    let sent = read_all(client).await;
    assert!(sent.starts_with("HTTP/1.1 405 Method Not Allowed\r\n"));
    assert!(sent.contains("Allow: GET, HEAD\r\n"));
    assert!(sent.contains("The requested method DELETE"));
}

#[tokio::test]
async fn test_method_not_allowed_without_allowed_methods() {
    let (client, mut conn) = connected_pair().await;
    let request = request_for(Method::DELETE, "/readonly");
    responders::method_not_allowed(&request, &mut conn, "").await;

    let sent = read_all(client).await;
    assert!(sent.starts_with("HTTP/1.1 405 Method Not Allowed\r\n"));
    assert!(!sent.contains("Allow:"));
}
