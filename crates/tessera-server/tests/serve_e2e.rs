//! Serving a router over a real socket.

use std::net::SocketAddr;
use std::time::Duration;

use http::StatusCode;
use tessera_config::ServerConfig;
use tessera_core::{handler, HandlerError};
use tessera_server::{Router, Server, ShutdownSignal};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

struct Running {
    addr: SocketAddr,
    shutdown: ShutdownSignal,
    task: JoinHandle<Result<(), tessera_server::ServerError>>,
}

impl Running {
    async fn stop(self) {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), self.task)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }
}

async fn start(router: Router, max_body_bytes: usize) -> Running {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = ShutdownSignal::new();
    let config = ServerConfig {
        http_addr: addr.to_string(),
        shutdown_timeout_secs: 1,
        max_body_bytes,
    };

    let task = tokio::spawn(Server::new(router, config).serve(listener, shutdown.clone()));
    Running { addr, shutdown, task }
}

/// Sends one HTTP/1.1 request with `Connection: close` and returns the raw response.
async fn send(addr: SocketAddr, method: &str, path: &str, body: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

fn status_line(response: &str) -> &str {
    response.lines().next().unwrap_or_default()
}

fn body(response: &str) -> &str {
    response.split("\r\n\r\n").nth(1).unwrap_or_default()
}

fn sample_router() -> Router {
    let mut router = Router::new();
    router
        .get("/hello/:name", handler(|ctx| {
            let name = ctx.param("name").unwrap_or_default().to_string();
            ctx.text(StatusCode::OK, format!("hello {name}"))
        }))
        .unwrap()
        .post("/echo", handler(|ctx| {
            let body = String::from_utf8_lossy(ctx.request().body()).into_owned();
            ctx.text(StatusCode::OK, body)
        }))
        .unwrap()
        .get("/teapot", handler(|_| Err(HandlerError::status(StatusCode::IM_A_TEAPOT, "short and stout"))))
        .unwrap()
        .get("/crash", handler(|_| panic!("unrecovered")))
        .unwrap();
    router
}

#[tokio::test]
async fn test_routes_over_http() {
    let server = start(sample_router(), 1024).await;

    let response = send(server.addr, "GET", "/hello/tessera", "").await;
    assert!(status_line(&response).contains("200"), "{response}");
    assert_eq!(body(&response), "hello tessera");

    let response = send(server.addr, "POST", "/echo", "ping").await;
    assert_eq!(body(&response), "ping");

    let response = send(server.addr, "GET", "/nope", "").await;
    assert!(status_line(&response).contains("404"));
    assert_eq!(body(&response), "404 page not found");

    server.stop().await;
}

#[tokio::test]
async fn test_handler_error_and_panic_become_responses() {
    let server = start(sample_router(), 1024).await;

    let response = send(server.addr, "GET", "/teapot", "").await;
    assert!(status_line(&response).contains("418"));
    assert_eq!(body(&response), "short and stout");

    // Without recover middleware the panic is contained by the server
    let response = send(server.addr, "GET", "/crash", "").await;
    assert!(status_line(&response).contains("500"));

    // The server keeps serving afterwards
    let response = send(server.addr, "GET", "/hello/again", "").await;
    assert_eq!(body(&response), "hello again");

    server.stop().await;
}

#[tokio::test]
async fn test_body_limit() {
    let server = start(sample_router(), 8).await;

    let response = send(server.addr, "POST", "/echo", "12345678").await;
    assert_eq!(body(&response), "12345678");

    let response = send(server.addr, "POST", "/echo", "123456789").await;
    assert!(status_line(&response).contains("413"), "{response}");

    server.stop().await;
}

#[tokio::test]
async fn test_shutdown_refuses_new_connections() {
    let server = start(sample_router(), 1024).await;
    let addr = server.addr;
    server.stop().await;

    assert!(TcpStream::connect(addr).await.is_err());
}
