use gatehouse::http::connection::Connection;
use gatehouse::http::parser::ParseError;
use gatehouse::http::reader::{Reader, RecvError};
use gatehouse::http::request::{Method, Version};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};

async fn connected_pair() -> (TcpStream, Connection) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (client, accepted) = tokio::join!(TcpStream::connect(addr), listener.accept());
    let (server, _) = accepted.unwrap();
    (client.unwrap(), Connection::new(server))
}

#[tokio::test]
async fn test_receive_complete_request() {
    let (mut client, mut conn) = connected_pair().await;
    let mut reader = Reader::new();

    client
        .write_all(b"GET /hello HTTP/1.1\r\nHost: example.com\r\n\r\n")
        .await
        .unwrap();

    let request = reader.receive(&mut conn).await.unwrap();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.resource(), "/hello");
    assert_eq!(request.header("Host"), Some("example.com"));
}

#[tokio::test]
async fn test_receive_request_split_across_writes() {
    let (mut client, mut conn) = connected_pair().await;
    let mut reader = Reader::new();

    let receive = tokio::spawn(async move {
        let request = reader.receive(&mut conn).await.unwrap();
        assert_eq!(request.resource(), "/split");
        assert_eq!(request.body, b"hello".to_vec());
    });

    client
        .write_all(b"POST /split HTTP/1.1\r\nContent-")
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    client.write_all(b"Length: 5\r\n\r\nhel").await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    client.write_all(b"lo").await.unwrap();

    receive.await.unwrap();
}

#[tokio::test]
async fn test_receive_times_out_on_silence() {
    let (_client, mut conn) = connected_pair().await;
    let mut reader = Reader::new();
    reader.set_timeout(1);

    let result = reader.receive(&mut conn).await;
    assert!(matches!(result, Err(RecvError::Timeout)));
}

#[tokio::test]
async fn test_receive_eof_before_any_octet() {
    let (client, mut conn) = connected_pair().await;
    drop(client);

    let mut reader = Reader::new();
    let result = reader.receive(&mut conn).await;
    assert!(matches!(result, Err(RecvError::Eof)));
}

#[tokio::test]
async fn test_receive_eof_mid_message_is_parse_error() {
    let (mut client, mut conn) = connected_pair().await;
    let mut reader = Reader::new();

    client
        .write_all(b"POST / HTTP/1.1\r\nContent-Length: 10\r\n\r\nhel")
        .await
        .unwrap();
    drop(client);

    let result = reader.receive(&mut conn).await;
    match result {
        Err(err @ RecvError::Parse(ParseError::ContentLengthMismatch)) => {
            assert!(err.is_parse());
        }
        other => panic!("expected truncated-message parse error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_receive_eof_mid_headers_is_not_answerable() {
    let (mut client, mut conn) = connected_pair().await;
    let mut reader = Reader::new();

    client.write_all(b"GET /ec").await.unwrap();
    drop(client);

    let result = reader.receive(&mut conn).await;
    match result {
        Err(err @ RecvError::Parse(ParseError::UnexpectedEof)) => {
            // the peer is gone, so this routes to the silent-close path
            assert!(!err.is_parse());
        }
        other => panic!("expected unexpected-eof parse error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_receive_http10_body_until_close() {
    let (mut client, mut conn) = connected_pair().await;
    let mut reader = Reader::new();

    client
        .write_all(b"POST /submit HTTP/1.0\r\n\r\nsome payload")
        .await
        .unwrap();
    client.shutdown().await.unwrap();

    let request = reader.receive(&mut conn).await.unwrap();
    assert_eq!(request.version, Version::Http10);
    assert_eq!(request.body, b"some payload".to_vec());
}

#[tokio::test]
async fn test_receive_pipelined_requests_without_extra_reads() {
    let (mut client, mut conn) = connected_pair().await;
    let mut reader = Reader::new();

    client
        .write_all(
            b"GET /first HTTP/1.1\r\nHost: x\r\n\r\nGET /second HTTP/1.1\r\nHost: x\r\n\r\n",
        )
        .await
        .unwrap();

    let first = reader.receive(&mut conn).await.unwrap();
    assert_eq!(first.resource(), "/first");

    // the second request is served from buffered octets, no socket read
    drop(client);
    reader.reset();
    let second = reader.receive(&mut conn).await.unwrap();
    assert_eq!(second.resource(), "/second");
}

#[tokio::test]
async fn test_receive_rejects_oversize_body() {
    let (mut client, mut conn) = connected_pair().await;
    let mut reader = Reader::new();
    reader.set_max_content_length(4);

    client
        .write_all(b"POST / HTTP/1.1\r\nContent-Length: 100\r\n\r\n")
        .await
        .unwrap();

    let result = reader.receive(&mut conn).await;
    assert!(matches!(
        result,
        Err(RecvError::Parse(ParseError::ContentTooLarge))
    ));
}
