use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Default time in-flight requests get to finish once shutdown begins.
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(25);

/// Process-wide shutdown state built on two [`CancellationToken`]s.
///
/// - [`Self::token`] is cancelled when shutdown begins. The server stops
///   accepting connections and lets in-flight requests run.
/// - [`Self::abort_token`] is cancelled once the drain period has passed, or
///   when the server has stopped. Request handlers take its child tokens, so
///   only requests still running after the drain period are cut off.
#[derive(Clone, Debug)]
pub struct ShutdownCoordinator {
    token: CancellationToken,
    abort: CancellationToken,
    drain_timeout: Duration,
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self {
            token: CancellationToken::new(),
            abort: CancellationToken::new(),
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
        }
    }
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_drain_timeout(mut self, drain_timeout: Duration) -> Self {
        self.drain_timeout = drain_timeout;
        self
    }

    /// The root token. Cancelled once shutdown begins.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Cancelled when in-flight requests must be abandoned.
    pub fn abort_token(&self) -> CancellationToken {
        self.abort.clone()
    }

    pub fn drain_timeout(&self) -> Duration {
        self.drain_timeout
    }

    pub fn is_shutting_down(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn shutdown(&self) {
        if !self.token.is_cancelled() {
            info!("Initiating graceful shutdown");
            self.token.cancel();
        }
    }

    /// Cancel every request token now. Also begins shutdown.
    pub fn abort_requests(&self) {
        self.shutdown();
        if !self.abort.is_cancelled() {
            warn!("Cancelling in-flight requests");
            self.abort.cancel();
        }
    }

    /// Wait for SIGINT or SIGTERM, then cancel the root token.
    ///
    /// Returns early if [`Self::shutdown`] is called by someone else first.
    pub async fn wait_for_signal(&self) {
        tokio::select! {
            _ = shutdown_signal() => self.shutdown(),
            _ = self.token.cancelled() => {}
        }
    }

    /// Once shutdown begins, give requests the drain period and then abort them.
    ///
    /// Returns early if [`Self::abort_requests`] is called first.
    pub async fn abort_after_drain(&self) {
        self.token.cancelled().await;
        tokio::select! {
            _ = tokio::time::sleep(self.drain_timeout) => {
                warn!(timeout = ?self.drain_timeout, "Drain period elapsed");
                self.abort_requests();
            }
            _ = self.abort.cancelled() => {}
        }
    }
}

/// Completes on SIGINT (Ctrl+C) or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT (Ctrl+C)"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
