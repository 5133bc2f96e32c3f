use std::time::Duration;

use models::{
    ApiSettings, BalanceUpdated, CustomerBalance, CustomerBalanceUpdate, Envelope, ExpensesPage,
    ExpensesQuery, FinanceOverview, FinancialReport, FinancialReportQuery, InventoryReport,
    OverviewPeriod, PaymentRecorded, PaymentRequest, ReceivablesPage, ReceivablesQuery,
    SalesReport, SalesReportQuery, SyncReport, Validate, DEFAULT_BASE_URL,
};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::{ClientError, Result};
use crate::request::{parse_base_url, Call, RequestPlan};

/// Where the finance backend lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct FinanceClientConfig {
    pub base_url: String,
    /// `None` leaves hang behaviour to the transport.
    pub request_timeout: Option<Duration>,
}

impl Default for FinanceClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
        }
    }
}

impl FinanceClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: None,
        }
    }

    pub fn from_settings(settings: &ApiSettings) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            request_timeout: settings.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Typed client for the finance and reports endpoints.
///
/// Every call performs exactly one HTTP request. There is no caching, no
/// deduplication and no retry; failures are logged and returned.
#[derive(Debug, Clone)]
pub struct FinanceClient {
    http: Client,
    base_url: Url,
}

impl FinanceClient {
    pub fn new(config: FinanceClientConfig) -> Result<Self> {
        let base_url = parse_base_url(&config.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::Build)?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a call to the request it would send, without sending it.
    pub fn plan(&self, call: &Call<'_>) -> Result<RequestPlan> {
        RequestPlan::build(&self.base_url, call)
    }

    /// Finance overview for `period` (defaults to `month`).
    pub async fn get_overview(
        &self,
        period: Option<OverviewPeriod>,
    ) -> Result<Envelope<FinanceOverview>> {
        self.call(Call::Overview(period.unwrap_or_default())).await
    }

    pub async fn get_accounts_receivable(
        &self,
        query: &ReceivablesQuery,
    ) -> Result<Envelope<ReceivablesPage>> {
        self.call(Call::AccountsReceivable(query)).await
    }

    pub async fn get_expenses(&self, query: &ExpensesQuery) -> Result<Envelope<ExpensesPage>> {
        self.call(Call::Expenses(query)).await
    }

    pub async fn record_payment(
        &self,
        payment: &PaymentRequest,
    ) -> Result<Envelope<PaymentRecorded>> {
        self.call(Call::RecordPayment(payment)).await
    }

    pub async fn update_customer_balance(
        &self,
        update: &CustomerBalanceUpdate,
    ) -> Result<Envelope<BalanceUpdated>> {
        self.call(Call::UpdateCustomerBalance(update)).await
    }

    pub async fn get_customer_balance(&self, customer_id: u64) -> Result<Envelope<CustomerBalance>> {
        self.call(Call::CustomerBalance(customer_id)).await
    }

    pub async fn sync_customer_balances(&self) -> Result<Envelope<SyncReport>> {
        self.call(Call::SyncCustomerBalances).await
    }

    pub async fn get_sales_report(&self, query: &SalesReportQuery) -> Result<Envelope<SalesReport>> {
        self.call(Call::SalesReport(query)).await
    }

    pub async fn get_inventory_report(&self) -> Result<Envelope<InventoryReport>> {
        self.call(Call::InventoryReport).await
    }

    pub async fn get_financial_report(
        &self,
        query: &FinancialReportQuery,
    ) -> Result<Envelope<FinancialReport>> {
        self.call(Call::FinancialReport(query)).await
    }

    async fn call<T>(&self, call: Call<'_>) -> Result<Envelope<T>>
    where
        T: DeserializeOwned + Validate,
    {
        let operation = call.operation();
        let plan = self.plan(&call).inspect_err(|err| {
            tracing::error!(%operation, error = %err, "Finance API request refused");
        })?;
        self.execute(plan).await
    }

    /// Sends a planned request and decodes its envelope.
    pub async fn execute<T>(&self, plan: RequestPlan) -> Result<Envelope<T>>
    where
        T: DeserializeOwned + Validate,
    {
        let RequestPlan {
            operation,
            method,
            url,
            body,
        } = plan;
        tracing::debug!(%operation, %method, %url, "dispatching finance request");

        let mut request = self.http.request(method.into(), url.clone());
        if let Some(body) = &body {
            request = request.json(body);
        }

        let result = self.round_trip(request, &url).await;
        match &result {
            Ok(envelope) => {
                tracing::debug!(%operation, success = envelope.success, "finance request settled")
            }
            Err(err) => tracing::error!(
                %operation,
                status = err.status(),
                error = %err,
                "Finance API request failed"
            ),
        }
        result
    }

    async fn round_trip<T>(
        &self,
        request: reqwest::RequestBuilder,
        url: &Url,
    ) -> Result<Envelope<T>>
    where
        T: DeserializeOwned + Validate,
    {
        let response = request.send().await.map_err(|source| ClientError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                url: url.to_string(),
                status,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.to_string(),
                source,
            })?;
        let envelope: Envelope<T> =
            serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode {
                url: url.to_string(),
                status,
                source,
            })?;

        if let Some(data) = &envelope.data {
            data.validate().map_err(|source| ClientError::Invalid {
                url: url.to_string(),
                status,
                source,
            })?;
        }

        Ok(envelope)
    }
}
