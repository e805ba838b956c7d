//! Listener lifecycle.
//!
//! `QuoteServer::start` binds the listener and serves the router on a spawned
//! task; the returned handle stops it with a graceful shutdown, letting
//! in-flight requests finish.
use std::net::SocketAddr;
use std::sync::Arc;

use log::{error, info};
use quote_common::{QuoteError, Result};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::endpoint::{AppState, quote_router};

/// A running quote server.
pub struct QuoteServer {
    local_addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl QuoteServer {
    /// Binds `bind_addr` (e.g., `0.0.0.0:8080`) and starts serving.
    pub async fn start(bind_addr: &str, state: Arc<AppState>) -> Result<Self> {
        let listener = TcpListener::bind(bind_addr).await?;
        let local_addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let router = quote_router(state);

        let task = tokio::spawn(async move {
            let shutdown = async {
                let _ = shutdown_rx.await;
            };
            if let Err(e) = axum::serve(listener, router)
                .with_graceful_shutdown(shutdown)
                .await
            {
                error!("Quote server failed: {}", e);
            }
        });
        info!("Quote server listening on {}", local_addr);

        Ok(Self {
            local_addr,
            shutdown_tx,
            task,
        })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting connections and waits for in-flight requests.
    pub async fn stop(self) -> Result<()> {
        let _ = self.shutdown_tx.send(());
        self.task.await.map_err(QuoteError::transport)?;
        info!("Quote server on {} stopped", self.local_addr);
        Ok(())
    }
}
