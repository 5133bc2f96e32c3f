use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::Datelike;
use models::{
    BalanceUpdated, CustomerBalance, CustomerBalanceUpdate, Envelope, ExpensesPage,
    FinanceOverview, FinancialReport, InventoryReport, OverviewPeriod, PaymentRecorded,
    PaymentRequest, ReceivablesPage, ReportPeriod, SalesReport, SyncReport,
};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{
    repository::{ExpensesFilter, FinanceRepository, ReceivablesFilter},
    Result,
};

/// One request as it reached the server, kept so tests can assert on the wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
}

#[derive(Clone, Default)]
pub struct RequestLog(Arc<Mutex<Vec<RecordedRequest>>>);

impl RequestLog {
    pub async fn record(&self, request: RecordedRequest) {
        self.0.lock().await.push(request);
    }

    pub async fn entries(&self) -> Vec<RecordedRequest> {
        self.0.lock().await.clone()
    }

    /// Requests whose path ends with `suffix`.
    pub async fn matching(&self, suffix: &str) -> Vec<RecordedRequest> {
        self.0
            .lock()
            .await
            .iter()
            .filter(|r| r.path.ends_with(suffix))
            .cloned()
            .collect()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn FinanceRepository>,
    pub requests: RequestLog,
}

impl AppState {
    pub fn new(repo: Arc<dyn FinanceRepository>) -> Self {
        Self {
            repo,
            requests: RequestLog::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OverviewParams {
    #[serde(default)]
    pub period: OverviewPeriod,
}

#[derive(Debug, Deserialize)]
pub struct SalesParams {
    #[serde(default)]
    pub period: ReportPeriod,
}

#[derive(Debug, Deserialize)]
pub struct FinancialParams {
    #[serde(default)]
    pub period: ReportPeriod,
    pub year: Option<i32>,
}

/// GET /finance/overview
pub async fn get_overview(
    State(state): State<AppState>,
    Query(params): Query<OverviewParams>,
) -> Result<Json<Envelope<FinanceOverview>>> {
    let overview = state.repo.overview(params.period).await?;
    Ok(Json(Envelope::ok(overview)))
}

/// GET /finance/accounts-receivable
pub async fn get_accounts_receivable(
    State(state): State<AppState>,
    Query(filter): Query<ReceivablesFilter>,
) -> Result<Json<Envelope<ReceivablesPage>>> {
    let page = state.repo.receivables(&filter).await?;
    Ok(Json(Envelope::ok(page)))
}

/// GET /finance/expenses
pub async fn get_expenses(
    State(state): State<AppState>,
    Query(filter): Query<ExpensesFilter>,
) -> Result<Json<Envelope<ExpensesPage>>> {
    let page = state.repo.expenses(&filter).await?;
    Ok(Json(Envelope::ok(page)))
}

/// POST /finance/payments
/// Echoes the stored payment back with the customer's new balance
pub async fn record_payment(
    State(state): State<AppState>,
    Json(payment): Json<PaymentRequest>,
) -> Result<Json<Envelope<PaymentRecorded>>> {
    let recorded = state.repo.record_payment(payment).await?;
    Ok(Json(Envelope::ok_with_message(
        recorded,
        "Payment recorded successfully",
    )))
}

/// POST /finance/customer-balance
pub async fn update_customer_balance(
    State(state): State<AppState>,
    Json(update): Json<CustomerBalanceUpdate>,
) -> Result<Json<Envelope<BalanceUpdated>>> {
    let updated = state.repo.update_balance(update).await?;
    Ok(Json(Envelope::ok_with_message(
        updated,
        "Customer balance updated",
    )))
}

/// GET /finance/customer-balance/:customer_id
pub async fn get_customer_balance(
    State(state): State<AppState>,
    Path(customer_id): Path<u64>,
) -> Result<Json<Envelope<CustomerBalance>>> {
    let balance = state.repo.customer_balance(customer_id).await?;
    Ok(Json(Envelope::ok(balance)))
}

/// POST /finance/sync-customer-balances
pub async fn sync_customer_balances(
    State(state): State<AppState>,
) -> Result<Json<Envelope<SyncReport>>> {
    let report = state.repo.sync_balances().await?;
    let message = format!("{} customer balances synchronized", report.updated);
    Ok(Json(Envelope::ok_with_message(report, message)))
}

/// GET /reports/sales
pub async fn get_sales_report(
    State(state): State<AppState>,
    Query(params): Query<SalesParams>,
) -> Result<Json<Envelope<SalesReport>>> {
    let report = state.repo.sales_report(params.period).await?;
    Ok(Json(Envelope::ok(report)))
}

/// GET /reports/inventory
pub async fn get_inventory_report(
    State(state): State<AppState>,
) -> Result<Json<Envelope<InventoryReport>>> {
    let report = state.repo.inventory_report().await?;
    Ok(Json(Envelope::ok(report)))
}

/// GET /reports/financial
/// Year defaults to the current calendar year
pub async fn get_financial_report(
    State(state): State<AppState>,
    Query(params): Query<FinancialParams>,
) -> Result<Json<Envelope<FinancialReport>>> {
    let year = params
        .year
        .unwrap_or_else(|| chrono::Local::now().year());
    let report = state.repo.financial_report(params.period, year).await?;
    Ok(Json(Envelope::ok(report)))
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "finance-mock-backend"
    }))
}
