//! HTTP/1 accept loop with graceful shutdown.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::app::Router;
use crate::error::ServerError;

/// A bound server, ready to accept connections.
#[derive(Debug)]
pub struct DocServer {
    listener: TcpListener,
    router: Arc<Router>,
    shutdown_timeout: Duration,
}

impl DocServer {
    /// Binds `addr`.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Bind` if the address cannot be bound.
    pub async fn bind(addr: SocketAddr, router: Router, shutdown_timeout: Duration) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        Ok(Self {
            listener,
            router: Arc::new(router),
            shutdown_timeout,
        })
    }

    /// The address actually bound (useful with port `0`).
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Io` if the socket has no local address.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves until `shutdown` completes, then drains open connections for
    /// up to the shutdown timeout.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Io` if the listener address cannot be read.
    pub async fn serve<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        let addr = self.local_addr()?;
        tracing::info!(%addr, prefix = %self.router.prefix(), "Server listening");

        let (stop_tx, stop_rx) = watch::channel(false);
        let mut connections = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                result = self.listener.accept() => {
                    match result {
                        Ok((stream, remote_addr)) => {
                            let router = Arc::clone(&self.router);
                            let stop_rx = stop_rx.clone();
                            connections.spawn(async move {
                                if let Err(e) = serve_connection(stream, router, stop_rx).await {
                                    tracing::debug!(%remote_addr, error = %e, "Connection error");
                                }
                            });
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to accept connection");
                        }
                    }
                }
                // Reap finished connections so the set does not grow unbounded.
                Some(_) = connections.join_next(), if !connections.is_empty() => {}
                () = &mut shutdown => {
                    tracing::info!("Shutdown signal received, stopping server");
                    break;
                }
            }
        }

        let _ = stop_tx.send(true);
        tracing::info!(
            active = connections.len(),
            timeout = ?self.shutdown_timeout,
            "Waiting for connections to close"
        );

        let drain = async { while connections.join_next().await.is_some() {} };
        if tokio::time::timeout(self.shutdown_timeout, drain).await.is_err() {
            tracing::warn!(active = connections.len(), "Shutdown timeout reached, aborting connections");
            connections.abort_all();
        }

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn serve_connection(
    stream: tokio::net::TcpStream,
    router: Arc<Router>,
    mut stop: watch::Receiver<bool>,
) -> Result<(), hyper::Error> {
    let service = service_fn(move |request: Request<Incoming>| {
        let response = router.route(&request);
        async move { Ok::<_, Infallible>(response) }
    });

    let conn = http1::Builder::new().serve_connection(TokioIo::new(stream), service);
    tokio::pin!(conn);

    tokio::select! {
        result = conn.as_mut() => result,
        _ = stop.changed() => {
            conn.as_mut().graceful_shutdown();
            conn.await
        }
    }
}

/// Completes on Ctrl+C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, initiating graceful shutdown"),
        () = terminate => tracing::info!("Received SIGTERM, initiating graceful shutdown"),
    }
}
