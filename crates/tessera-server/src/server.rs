//! HTTP server.
//!
//! Hyper accepts and parses connections on Tokio; each request body is
//! collected up to the configured limit, and [`Router::dispatch`] runs on
//! the blocking pool because handlers are synchronous.
//!
//! # Example
//!
//! ```rust,ignore
//! use tessera_config::ConfigLoader;
//! use tessera_server::{Router, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::new().with_env_prefix("TESSERA").load()?;
//!     let mut router = Router::with_config(&config.router);
//!     // register routes...
//!     Server::new(router, config.server).run().await?;
//!     Ok(())
//! }
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::{header, HeaderValue, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tessera_config::{ConfigError, ServerConfig};
use tessera_core::constants::CONTENT_PLAIN_UTF8;
use tessera_core::HandlerError;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;

use crate::error::{ServerError, ServerResult};
use crate::router::Router;
use crate::shutdown::ShutdownSignal;

/// Response type written back to hyper.
pub type HttpResponse = Response<Full<Bytes>>;

/// Serves a [`Router`] over HTTP/1.1.
#[derive(Debug)]
pub struct Server {
    router: Router,
    config: ServerConfig,
}

impl Server {
    /// Creates a server for `router`.
    #[must_use]
    pub fn new(router: Router, config: ServerConfig) -> Self {
        Self { router, config }
    }

    /// The router being served.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// The server settings.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Binds the configured address and serves until Ctrl-C or SIGTERM.
    pub async fn run(self) -> ServerResult<()> {
        self.run_with_shutdown(ShutdownSignal::with_os_signals()).await
    }

    /// Binds the configured address and serves until `shutdown` triggers.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> ServerResult<()> {
        let addr: SocketAddr = self.config.http_addr.parse().map_err(|_| {
            ConfigError::invalid_value(
                "server.http_addr",
                format!("invalid socket address: {}", self.config.http_addr),
            )
        })?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        self.serve(listener, shutdown).await
    }

    /// Serves connections from an already bound `listener`.
    ///
    /// After `shutdown` triggers, no new connections are accepted and open
    /// ones are asked to finish; any still open after
    /// `shutdown_timeout_secs` are dropped.
    pub async fn serve(self, listener: TcpListener, shutdown: ShutdownSignal) -> ServerResult<()> {
        let local_addr = listener.local_addr()?;
        let grace = Duration::from_secs(self.config.shutdown_timeout_secs);
        let server = Arc::new(self);
        let mut connections = JoinSet::new();

        tracing::info!(addr = %local_addr, routes = server.router.len(), "server listening");

        loop {
            tokio::select! {
                () = shutdown.wait() => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, remote_addr)) => {
                        let server = Arc::clone(&server);
                        let shutdown = shutdown.clone();
                        connections.spawn(async move {
                            server.handle_connection(stream, remote_addr, shutdown).await;
                        });
                    }
                    Err(err) => tracing::error!(error = %err, "failed to accept connection"),
                },
                Some(_) = connections.join_next(), if !connections.is_empty() => {}
            }
        }

        tracing::info!(
            open_connections = connections.len(),
            grace_secs = grace.as_secs(),
            "shutdown requested, draining connections"
        );

        let drained = tokio::time::timeout(grace, async {
            while connections.join_next().await.is_some() {}
        })
        .await;

        if drained.is_err() {
            tracing::warn!(
                open_connections = connections.len(),
                "shutdown grace period elapsed, dropping connections"
            );
            connections.shutdown().await;
        }

        tracing::info!("server stopped");
        Ok(())
    }

    async fn handle_connection(
        self: Arc<Self>,
        stream: TcpStream,
        remote_addr: SocketAddr,
        shutdown: ShutdownSignal,
    ) {
        let server = Arc::clone(&self);
        let service = service_fn(move |request: Request<Incoming>| {
            let server = Arc::clone(&server);
            async move { Ok::<_, Infallible>(server.handle_request(request).await) }
        });

        let connection = http1::Builder::new().serve_connection(TokioIo::new(stream), service);
        tokio::pin!(connection);

        let result = tokio::select! {
            result = connection.as_mut() => result,
            () = shutdown.wait() => {
                connection.as_mut().graceful_shutdown();
                connection.await
            }
        };

        if let Err(err) = result {
            tracing::error!(remote = %remote_addr, error = %err, "connection error");
        }
    }

    async fn handle_request(self: Arc<Self>, request: Request<Incoming>) -> HttpResponse {
        let (parts, body) = request.into_parts();

        let body = match Limited::new(body, self.config.max_body_bytes).collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
                tracing::debug!(path = %parts.uri.path(), limit = self.config.max_body_bytes, "request body too large");
                return plain(StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large");
            }
            Err(err) => {
                tracing::debug!(error = %err, "failed to read request body");
                return plain(StatusCode::BAD_REQUEST, "Bad Request");
            }
        };

        let request = Request::from_parts(parts, body);
        let server = Arc::clone(&self);
        let dispatched = tokio::task::spawn_blocking(move || server.router.dispatch(request)).await;

        match dispatched {
            Ok(Ok(response)) => response.map(Full::new),
            Ok(Err(err)) => error_response(&err),
            Err(err) => {
                tracing::error!(error = %err, "handler panicked");
                plain(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }
}

/// Serves `router` on `config.http_addr` until Ctrl-C or SIGTERM.
pub async fn serve(router: Router, config: ServerConfig) -> ServerResult<()> {
    Server::new(router, config).run().await
}

/// Turns a handler error into the response the client sees.
pub fn error_response(err: &HandlerError) -> HttpResponse {
    let status = err.status_code();
    if status.is_server_error() {
        tracing::error!(%status, error = %err, "handler failed");
    } else {
        tracing::debug!(%status, error = %err, "handler rejected request");
    }
    plain(status, &err.public_message())
}

fn plain(status: StatusCode, body: &str) -> HttpResponse {
    let mut response = Response::new(Full::new(Bytes::copy_from_slice(body.as_bytes())));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_PLAIN_UTF8));
    response
}
