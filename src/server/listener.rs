use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{Instrument, error, info, info_span, warn};

use crate::config::Config;
use crate::http::connection::{Connection, ConnectionLimits};
use crate::static_files::FileResolver;

/// Binds the configured address and serves on it until the task is dropped.
pub async fn run(cfg: Arc<Config>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.server.listen_addr)
        .await
        .with_context(|| format!("binding {}", cfg.server.listen_addr))?;
    info!("Listening on {}", cfg.server.listen_addr);

    serve(listener, cfg).await;
    Ok(())
}

/// Accept loop over an already bound listener.
///
/// Each connection gets its own task; the loop never waits for one to
/// finish. With `max_connections > 0` the loop holds off accepting while
/// that many handlers are running. Accept errors are logged and skipped.
pub async fn serve(listener: TcpListener, cfg: Arc<Config>) {
    let resolver = Arc::new(FileResolver::from_config(&cfg.static_files));
    let limits = ConnectionLimits::from_config(&cfg.server);
    let admission = Admission::new(cfg.server.max_connections);
    let mut backoff = AcceptBackoff::default();

    info!(
        root = %resolver.root().display(),
        max_connections = cfg.server.max_connections,
        "Serving static files"
    );

    loop {
        let permit = admission.acquire().await;

        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => {
                backoff.reset();
                accepted
            }
            Err(e) => {
                let delay = backoff.next_delay();
                error!("Accept failed: {} (retrying in {:?})", e, delay);
                drop(permit);
                tokio::time::sleep(delay).await;
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let resolver = Arc::clone(&resolver);
        let span = info_span!("connection", %peer);
        tokio::spawn(
            async move {
                let _permit = permit;
                let mut conn = Connection::new(socket, resolver, limits);
                match conn.run().await {
                    Ok(()) => info!("Connection closed"),
                    Err(e) => warn!("Connection error from {}: {}", peer, e),
                }
            }
            .instrument(span),
        );
    }
}

/// Pause between failed accepts, doubling on each consecutive failure.
///
/// Errors like EMFILE tend to repeat until some connection closes, so
/// retrying at once only spins.
#[derive(Debug, Clone)]
pub struct AcceptBackoff {
    next: Duration,
}

impl AcceptBackoff {
    pub const INITIAL: Duration = Duration::from_millis(10);
    pub const MAX: Duration = Duration::from_secs(1);

    /// Delay to wait now; the following one is twice as long, up to `MAX`.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.next;
        self.next = (self.next * 2).min(Self::MAX);
        delay
    }

    pub fn reset(&mut self) {
        self.next = Self::INITIAL;
    }
}

impl Default for AcceptBackoff {
    fn default() -> Self {
        Self {
            next: Self::INITIAL,
        }
    }
}

/// Bounds how many connection handlers run at once.
#[derive(Debug, Clone)]
pub struct Admission {
    slots: Option<Arc<Semaphore>>,
}

impl Admission {
    /// `0` disables the bound.
    pub fn new(max_connections: usize) -> Self {
        let slots = (max_connections > 0)
            .then(|| Arc::new(Semaphore::new(max_connections.min(Semaphore::MAX_PERMITS))));
        Self { slots }
    }

    /// Waits for a free slot. The slot is released when the permit drops.
    pub async fn acquire(&self) -> Option<OwnedSemaphorePermit> {
        let slots = self.slots.as_ref()?;
        // never closed
        Arc::clone(slots).acquire_owned().await.ok()
    }

    /// Free slots, or `None` when unbounded.
    pub fn available(&self) -> Option<usize> {
        self.slots.as_ref().map(|s| s.available_permits())
    }
}
