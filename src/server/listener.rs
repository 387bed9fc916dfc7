use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::config::Config;
use crate::http::connection::Connection;
use crate::http::resource::ResourceResolver;

/// Owns the listening socket and hands each accepted connection to its own
/// task.
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    resolver: Arc<ResourceResolver>,
    connection_limit: Arc<Semaphore>,
    read_timeout: Option<Duration>,
}

impl Server {
    pub async fn bind(cfg: &Config) -> anyhow::Result<Self> {
        let addr = cfg.listen_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        let local_addr = listener.local_addr()?;

        Ok(Self {
            listener,
            local_addr,
            resolver: Arc::new(ResourceResolver::new(cfg.root.clone())),
            connection_limit: Arc::new(Semaphore::new(cfg.max_connections as usize)),
            read_timeout: cfg.read_timeout(),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serves until the process is killed.
    pub async fn run(self) -> anyhow::Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Accepts connections until `shutdown` resolves, then aborts the
    /// connections still in flight.
    pub async fn run_until<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()>,
    {
        info!(
            address = %self.local_addr,
            root = %self.resolver.root().display(),
            "Listening"
        );

        let mut workers = JoinSet::new();
        // A slot is reserved before accepting, so a full server leaves new
        // clients in the listen backlog while still reacting to shutdown.
        let mut permit: Option<OwnedSemaphorePermit> = None;
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    break;
                }

                // Reap finished workers so the set does not grow.
                Some(res) = workers.join_next(), if !workers.is_empty() => {
                    if let Err(e) = res {
                        error!("Connection task failed: {}", e);
                    }
                }

                acquired = self.connection_limit.clone().acquire_owned(), if permit.is_none() => {
                    permit = Some(acquired.context("connection limit closed")?);
                }

                accepted = self.listener.accept(), if permit.is_some() => {
                    let (socket, peer) = match accepted {
                        Ok(pair) => pair,
                        Err(e) => {
                            warn!(error = %e, "Failed to accept connection");
                            continue;
                        }
                    };
                    debug!("Accepted connection from {}", peer);

                    let permit = permit.take();
                    let resolver = self.resolver.clone();
                    let read_timeout = self.read_timeout;
                    workers.spawn(
                        async move {
                            let _permit = permit;
                            let mut conn = Connection::new(socket, resolver)
                                .with_read_timeout(read_timeout);
                            if let Err(e) = conn.run().await {
                                error!("Connection error from {}: {}", peer, e);
                            }
                        }
                        .instrument(info_span!("conn", %peer)),
                    );
                }
            }
        }

        if !workers.is_empty() {
            debug!(in_flight = workers.len(), "Aborting open connections");
        }
        workers.shutdown().await;

        Ok(())
    }
}
