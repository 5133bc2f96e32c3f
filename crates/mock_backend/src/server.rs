use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::handlers::{AppState, RequestLog};
use crate::repository::FinanceRepository;
use crate::router::{router_with_state, API_PREFIX};

/// Run the mock API server until the process is stopped
pub async fn run_server(
    repo: Arc<dyn FinanceRepository>,
    host: &str,
    port: u16,
) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mock_backend=debug,tower_http=debug".into()),
        )
        .init();

    let app = router_with_state(AppState::new(repo));

    let addr = format!("{}:{}", host, port).parse::<SocketAddr>()?;
    tracing::info!("Starting mock finance backend on http://{}{}", addr, API_PREFIX);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// A server bound to an ephemeral local port, for tests.
pub struct SpawnedServer {
    pub addr: SocketAddr,
    pub requests: RequestLog,
    handle: JoinHandle<()>,
}

impl SpawnedServer {
    /// Base URL a client should be configured with.
    pub fn base_url(&self) -> String {
        format!("http://{}{}", self.addr, API_PREFIX)
    }
}

impl Drop for SpawnedServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Serves `repo` on 127.0.0.1 with an OS-assigned port in a background task.
pub async fn spawn_server(repo: Arc<dyn FinanceRepository>) -> anyhow::Result<SpawnedServer> {
    let state = AppState::new(repo);
    let requests = state.requests.clone();
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let app = router_with_state(state);
    let handle = tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            tracing::error!(error = %err, "mock backend stopped");
        }
    });

    Ok(SpawnedServer {
        addr,
        requests,
        handle,
    })
}
