use std::sync::Arc;

use axum::{routing::get, Json, Router};
use finance_client::{ClientError, FinanceClient, FinanceClientConfig};
use mock_backend::{spawn_server, InMemoryFinanceRepository, SpawnedServer};
use models::{
    BalanceEntryType, CustomerBalanceUpdate, ExpensesQuery, OverviewPeriod, PaymentMethod,
    PaymentRequest, ReceivablesQuery,
};
use serde_json::json;
use tokio::net::TcpListener;

async fn seeded() -> (SpawnedServer, FinanceClient) {
    let server = spawn_server(Arc::new(InMemoryFinanceRepository::seeded()))
        .await
        .expect("spawn mock backend");
    let client =
        FinanceClient::new(FinanceClientConfig::new(server.base_url())).expect("client");
    (server, client)
}

/// Serves a single hand-written route under `/v1`, for responses the mock backend never produces.
async fn serve_raw(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    format!("http://{addr}/v1")
}

#[tokio::test]
async fn overview_defaults_period_to_month() {
    let (server, client) = seeded().await;

    let envelope = client.get_overview(None).await.expect("overview");
    assert!(envelope.success);
    assert_eq!(envelope.data.expect("data").revenue.total, 126_000.0);

    client
        .get_overview(Some(OverviewPeriod::Year))
        .await
        .expect("overview");

    let queries: Vec<Option<String>> = server
        .requests
        .matching("/finance/overview")
        .await
        .into_iter()
        .map(|r| r.query)
        .collect();
    assert_eq!(
        queries,
        vec![Some("period=month".to_string()), Some("period=year".to_string())]
    );
}

#[tokio::test]
async fn only_defined_params_reach_the_server() {
    let (server, client) = seeded().await;

    let page = client
        .get_accounts_receivable(&ReceivablesQuery {
            page: Some(1),
            limit: Some(2),
            ..Default::default()
        })
        .await
        .expect("receivables")
        .data
        .expect("data");
    assert_eq!(page.receivables.len(), 2);
    // summary covers every matching row, not just the page
    assert_eq!(page.summary.overdue_count, 2);

    client
        .get_expenses(&ExpensesQuery::default())
        .await
        .expect("expenses");

    let receivables = server.requests.matching("/finance/accounts-receivable").await;
    assert_eq!(receivables[0].query.as_deref(), Some("page=1&limit=2"));
    let expenses = server.requests.matching("/finance/expenses").await;
    assert_eq!(expenses[0].query, None);
}

#[tokio::test]
async fn payment_echo_reproduces_the_request() {
    let (_server, client) = seeded().await;
    let payment = PaymentRequest {
        customer_id: 1,
        amount: 15_000.0,
        payment_method: PaymentMethod::BankTransfer,
        reference: "HBL-20250601-17".to_string(),
        notes: Some("June installment".to_string()),
    };

    let envelope = client.record_payment(&payment).await.expect("payment");
    assert!(envelope.success);
    assert_eq!(
        envelope.message.as_deref(),
        Some("Payment recorded successfully")
    );
    let recorded = envelope.data.expect("data");
    assert_eq!(recorded.payment.to_request(), payment);
    assert_eq!(recorded.updated_balance, 60_000.0);
}

#[tokio::test]
async fn customer_balance_path_and_missing_customer() {
    let (server, client) = seeded().await;

    let balance = client
        .get_customer_balance(1)
        .await
        .expect("balance")
        .data
        .expect("data");
    assert_eq!(balance.current_balance, 75_000.0);
    assert_eq!(balance.transactions.len(), 2);

    let err = client.get_customer_balance(42).await.unwrap_err();
    assert!(matches!(err, ClientError::Status { .. }));
    assert_eq!(err.status(), Some(404));

    let requests = server.requests.matching("/finance/customer-balance/42").await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/wp-json/ims/v1/finance/customer-balance/42");
    assert_eq!(requests[0].query, None);
}

#[tokio::test]
async fn balance_updates_and_sync() {
    let (_server, client) = seeded().await;
    let credit = CustomerBalanceUpdate {
        customer_id: 2,
        order_id: 777,
        amount: 5_000.0,
        kind: BalanceEntryType::Credit,
        order_number: "ORD-777".to_string(),
        description: None,
    };

    let updated = client
        .update_customer_balance(&credit)
        .await
        .expect("update")
        .data
        .expect("data");
    assert_eq!(updated.previous_balance, 12_500.0);
    assert_eq!(updated.new_balance, 17_500.0);

    let debit = CustomerBalanceUpdate {
        kind: BalanceEntryType::Debit,
        ..credit
    };
    let updated = client
        .update_customer_balance(&debit)
        .await
        .expect("update")
        .data
        .expect("data");
    assert_eq!(updated.new_balance, 12_500.0);

    let sync = client.sync_customer_balances().await.expect("sync");
    assert!(sync.success);
    assert_eq!(sync.data.expect("data").updated, 0);
}

#[tokio::test]
async fn invalid_command_sends_nothing() {
    let (server, client) = seeded().await;
    let payment = PaymentRequest {
        customer_id: 1,
        amount: 0.0,
        payment_method: PaymentMethod::Cash,
        reference: "R-1".to_string(),
        notes: None,
    };

    let err = client.record_payment(&payment).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidRequest(_)));
    assert_eq!(err.status(), None);
    assert!(server.requests.entries().await.is_empty());
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let base = serve_raw(Router::new().route(
        "/v1/finance/overview",
        get(|| async { "<html>maintenance</html>" }),
    ))
    .await;
    let client = FinanceClient::new(FinanceClientConfig::new(base)).expect("client");

    let err = client.get_overview(None).await.unwrap_err();
    assert!(matches!(err, ClientError::Decode { .. }), "{err}");
    assert!(err.is_transport());
    assert_eq!(err.status(), Some(200));
}

#[tokio::test]
async fn inconsistent_receivable_fails_validation() {
    let base = serve_raw(Router::new().route(
        "/v1/finance/accounts-receivable",
        get(|| async {
            Json(json!({
                "success": true,
                "data": {
                    "receivables": [{
                        "id": 5, "customerId": 1, "customerName": "Ali Traders",
                        "invoiceNumber": "INV-5", "date": "2025-01-01", "dueDate": "2025-02-01",
                        "amount": 1000.0, "paidAmount": 100.0, "balance": 500.0,
                        "daysOverdue": 0, "status": "pending"
                    }],
                    "summary": {"totalReceivables": 500.0, "overdueAmount": 0.0, "overdueCount": 0}
                }
            }))
        }),
    ))
    .await;
    let client = FinanceClient::new(FinanceClientConfig::new(base)).expect("client");

    let err = client
        .get_accounts_receivable(&ReceivablesQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Invalid { .. }), "{err}");
    assert_eq!(err.status(), Some(200));
}

#[tokio::test]
async fn unsuccessful_envelope_is_passed_through() {
    let base = serve_raw(Router::new().route(
        "/v1/finance/sync-customer-balances",
        axum::routing::post(|| async {
            Json(json!({"success": false, "message": "sync already running"}))
        }),
    ))
    .await;
    let client = FinanceClient::new(FinanceClientConfig::new(base)).expect("client");

    let envelope = client.sync_customer_balances().await.expect("transport ok");
    assert!(!envelope.success);
    assert!(envelope.data.is_none());
    let rejected = envelope.into_data().unwrap_err();
    assert_eq!(rejected.message, "sync already running");
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let client =
        FinanceClient::new(FinanceClientConfig::new(format!("http://{addr}/v1"))).expect("client");

    let err = client.get_inventory_report().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport { .. }), "{err}");
    assert_eq!(err.status(), None);
}
