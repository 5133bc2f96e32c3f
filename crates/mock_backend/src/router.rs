use axum::{
    extract::{OriginalUri, Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{self, AppState, RecordedRequest, RequestLog};
use crate::repository::FinanceRepository;

/// Versioned prefix the real backend serves under.
pub const API_PREFIX: &str = "/wp-json/ims/v1";

/// Create the router with every finance and reports endpoint
pub fn create_router(repo: Arc<dyn FinanceRepository>) -> Router {
    router_with_state(AppState::new(repo))
}

pub fn router_with_state(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Finance endpoints
        .route("/finance/overview", get(handlers::get_overview))
        .route(
            "/finance/accounts-receivable",
            get(handlers::get_accounts_receivable),
        )
        .route("/finance/expenses", get(handlers::get_expenses))
        .route("/finance/payments", post(handlers::record_payment))
        .route(
            "/finance/customer-balance",
            post(handlers::update_customer_balance),
        )
        .route(
            "/finance/customer-balance/:customer_id",
            get(handlers::get_customer_balance),
        )
        .route(
            "/finance/sync-customer-balances",
            post(handlers::sync_customer_balances),
        )
        // Report endpoints
        .route("/reports/sales", get(handlers::get_sales_report))
        .route("/reports/inventory", get(handlers::get_inventory_report))
        .route("/reports/financial", get(handlers::get_financial_report));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest(API_PREFIX, api)
        .layer(middleware::from_fn_with_state(
            state.requests.clone(),
            record_request,
        ))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn record_request(State(log): State<RequestLog>, request: Request, next: Next) -> Response {
    // nested routes see a stripped URI; log what the client actually sent
    let uri = request
        .extensions()
        .get::<OriginalUri>()
        .map(|original| original.0.clone())
        .unwrap_or_else(|| request.uri().clone());
    log.record(RecordedRequest {
        method: request.method().to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
    })
    .await;
    next.run(request).await
}
