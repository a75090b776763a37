//! Repository HTTP server.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

use super::{router::create_router, state::AppState};

/// Repository server handle.
pub struct RepoServer {
    /// Server handle for graceful shutdown.
    shutdown_tx: Option<oneshot::Sender<()>>,
    /// Task running the HTTP server.
    serve_task: Option<JoinHandle<()>>,
    /// Task running periodic resynchronization.
    refresh_task: Option<JoinHandle<()>>,
    /// Shared state.
    state: AppState,
    /// Server address.
    addr: SocketAddr,
}

impl RepoServer {
    /// Binds `addr` and starts serving in a background task.
    ///
    /// When `refresh_interval` is set, a second task resynchronizes the
    /// registry on that period.
    ///
    /// # Errors
    /// Returns error if the server fails to bind.
    pub async fn start(
        state: AppState,
        addr: SocketAddr,
        refresh_interval: Option<Duration>,
    ) -> std::io::Result<Self> {
        let router = create_router(state.clone()).layer(TraceLayer::new_for_http());

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let listener = tokio::net::TcpListener::bind(addr).await?;
        let actual_addr = listener.local_addr()?;

        let serve_task = tokio::spawn(async move {
            let server = axum::serve(listener, router).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            });

            if let Err(e) = server.await {
                tracing::error!("Repository server error: {}", e);
            }
        });

        let refresh_task = refresh_interval.map(|period| spawn_refresh(state.clone(), period));

        tracing::info!("Repository server started on http://{}", actual_addr);

        Ok(Self {
            shutdown_tx: Some(shutdown_tx),
            serve_task: Some(serve_task),
            refresh_task,
            state,
            addr: actual_addr,
        })
    }

    /// Returns the server address.
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the base URL.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Returns the shared state.
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Requests shutdown.
    pub fn shutdown(&mut self) {
        if let Some(task) = self.refresh_task.take() {
            task.abort();
        }
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Repository server shutdown requested");
        }
    }

    /// Requests shutdown and waits for in-flight requests to finish.
    pub async fn stop(mut self) {
        self.shutdown();
        if let Some(task) = self.serve_task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for RepoServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Spawns the periodic resynchronization task.
fn spawn_refresh(state: AppState, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately; startup already synchronized.
        interval.tick().await;

        loop {
            interval.tick().await;
            tracing::debug!("Periodic resynchronization");
            // Failures are logged by the synchronizer; the registry stays as is.
            let _ = state.synchronize().await;
        }
    })
}
