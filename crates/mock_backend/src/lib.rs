//! In-memory stand-in for the finance/reports backend, serving the same HTTP
//! surface the client targets. Used by integration tests and local runs.

pub mod error;
pub mod handlers;
pub mod repository;
pub mod router;
pub mod server;

pub use error::{ApiError, Result};
pub use handlers::{AppState, RecordedRequest, RequestLog};
pub use repository::{FinanceRepository, InMemoryFinanceRepository};
pub use router::{create_router, router_with_state, API_PREFIX};
pub use server::{run_server, spawn_server, SpawnedServer};
