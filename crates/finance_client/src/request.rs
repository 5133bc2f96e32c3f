use models::{
    CustomerBalanceUpdate, ExpensesQuery, FinancialReportQuery, OverviewPeriod, OverviewQuery,
    PaymentRequest, ReceivablesQuery, SalesReportQuery, Validate,
};
use reqwest::Url;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ClientError, Result};
use crate::operation::{HttpMethod, Operation, PayloadKind};

/// One typed call, before it becomes HTTP.
#[derive(Debug, Clone, Copy)]
pub enum Call<'a> {
    Overview(OverviewPeriod),
    AccountsReceivable(&'a ReceivablesQuery),
    Expenses(&'a ExpensesQuery),
    RecordPayment(&'a PaymentRequest),
    UpdateCustomerBalance(&'a CustomerBalanceUpdate),
    CustomerBalance(u64),
    SyncCustomerBalances,
    SalesReport(&'a SalesReportQuery),
    InventoryReport,
    FinancialReport(&'a FinancialReportQuery),
}

/// Parameters of a call, encoded the way its operation sends them.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Query(Vec<(String, String)>),
    Body(Value),
    Empty,
}

impl Payload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::Query(_) => PayloadKind::Query,
            Payload::Body(_) => PayloadKind::Body,
            Payload::Empty => PayloadKind::Empty,
        }
    }
}

impl Call<'_> {
    pub fn operation(&self) -> Operation {
        match self {
            Call::Overview(_) => Operation::GetOverview,
            Call::AccountsReceivable(_) => Operation::GetAccountsReceivable,
            Call::Expenses(_) => Operation::GetExpenses,
            Call::RecordPayment(_) => Operation::RecordPayment,
            Call::UpdateCustomerBalance(_) => Operation::UpdateCustomerBalance,
            Call::CustomerBalance(_) => Operation::GetCustomerBalance,
            Call::SyncCustomerBalances => Operation::SyncCustomerBalances,
            Call::SalesReport(_) => Operation::GetSalesReport,
            Call::InventoryReport => Operation::GetInventoryReport,
            Call::FinancialReport(_) => Operation::GetFinancialReport,
        }
    }

    fn path_params(&self) -> Vec<(&'static str, String)> {
        match self {
            Call::CustomerBalance(customer_id) => vec![("customerId", customer_id.to_string())],
            _ => Vec::new(),
        }
    }

    /// Validates commands and encodes parameters. Nothing is sent if this fails.
    pub fn payload(&self) -> Result<Payload> {
        let payload = match self {
            Call::Overview(period) => Payload::Query(encode_query(&OverviewQuery { period: *period })?),
            Call::AccountsReceivable(query) => Payload::Query(encode_query(query)?),
            Call::Expenses(query) => Payload::Query(encode_query(query)?),
            Call::SalesReport(query) => Payload::Query(encode_query(query)?),
            Call::FinancialReport(query) => Payload::Query(encode_query(query)?),
            Call::RecordPayment(payment) => {
                payment.validate()?;
                Payload::Body(serde_json::to_value(payment).map_err(ClientError::Encode)?)
            }
            Call::UpdateCustomerBalance(update) => {
                update.validate()?;
                Payload::Body(serde_json::to_value(update).map_err(ClientError::Encode)?)
            }
            Call::CustomerBalance(_) | Call::SyncCustomerBalances | Call::InventoryReport => {
                Payload::Empty
            }
        };
        debug_assert_eq!(payload.kind(), self.operation().spec().payload);
        Ok(payload)
    }
}

/// A fully resolved HTTP request, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPlan {
    pub operation: Operation,
    pub method: HttpMethod,
    pub url: Url,
    pub body: Option<Value>,
}

impl RequestPlan {
    pub fn build(base_url: &Url, call: &Call<'_>) -> Result<Self> {
        let operation = call.operation();
        let spec = operation.spec();
        let path = spec.render_path(&call.path_params());
        let (query, body) = match call.payload()? {
            Payload::Query(pairs) => (pairs, None),
            Payload::Body(body) => (Vec::new(), Some(body)),
            Payload::Empty => (Vec::new(), None),
        };

        Ok(Self {
            operation,
            method: spec.method,
            url: endpoint_url(base_url, &path, &query),
            body,
        })
    }
}

/// Flattens a parameter object into query pairs, skipping absent fields.
pub fn encode_query<Q: Serialize>(query: &Q) -> Result<Vec<(String, String)>> {
    let value = serde_json::to_value(query).map_err(ClientError::Encode)?;
    let Value::Object(map) = value else {
        return Ok(Vec::new());
    };

    Ok(map
        .into_iter()
        .filter_map(|(key, value)| {
            let rendered = match value {
                Value::Null => return None,
                Value::String(s) => s,
                other => other.to_string(),
            };
            Some((key, rendered))
        })
        .collect())
}

/// Appends `path` to the base URL's own path and attaches the query, if any.
pub fn endpoint_url(base_url: &Url, path: &str, query: &[(String, String)]) -> Url {
    let mut url = base_url.clone();
    let full_path = format!("{}{}", base_url.path().trim_end_matches('/'), path);
    url.set_path(&full_path);
    url.set_query(None);
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    url
}

/// Parses and checks the configured base URL.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ClientError::InvalidBaseUrl {
                url: raw.to_string(),
                reason: format!("unsupported scheme '{other}'"),
            })
        }
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(ClientError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "missing host".to_string(),
        });
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ClientError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "base URL must not carry a query or fragment".to_string(),
        });
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{BalanceEntryType, PaymentMethod, ReportPeriod};

    fn base() -> Url {
        parse_base_url("https://zaidawn.site/wp-json/ims/v1").unwrap()
    }

    fn plan_for(call: Call<'_>) -> RequestPlan {
        RequestPlan::build(&base(), &call).unwrap()
    }

    #[test]
    fn overview_sends_exactly_one_period_param() {
        for period in OverviewPeriod::ALL {
            let plan = plan_for(Call::Overview(period));
            let pairs: Vec<(String, String)> = plan.url.query_pairs().into_owned().collect();
            assert_eq!(pairs, vec![("period".to_string(), period.to_string())]);
            assert_eq!(plan.url.path(), "/wp-json/ims/v1/finance/overview");
            assert_eq!(plan.method, HttpMethod::Get);
            assert!(plan.body.is_none());
        }
    }

    #[test]
    fn overview_defaults_to_month() {
        let plan = plan_for(Call::Overview(OverviewPeriod::default()));
        assert_eq!(plan.url.query(), Some("period=month"));
    }

    #[test]
    fn only_defined_query_keys_are_sent() {
        let query = ReceivablesQuery {
            page: Some(2),
            overdue: Some(true),
            ..Default::default()
        };
        let plan = plan_for(Call::AccountsReceivable(&query));
        assert_eq!(plan.url.query(), Some("page=2&overdue=true"));
        assert!(!plan.url.as_str().contains("undefined"));
        assert!(!plan.url.as_str().contains("null"));
    }

    #[test]
    fn empty_query_leaves_no_question_mark() {
        let plan = plan_for(Call::Expenses(&ExpensesQuery::default()));
        assert_eq!(plan.url.query(), None);
        assert!(plan.url.as_str().ends_with("/finance/expenses"));
    }

    #[test]
    fn expense_filters_are_encoded() {
        let query = ExpensesQuery {
            limit: Some(50),
            category: Some("rent & utilities".to_string()),
            ..Default::default()
        };
        let plan = plan_for(Call::Expenses(&query));
        let pairs: Vec<(String, String)> = plan.url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("limit".to_string(), "50".to_string()),
                ("category".to_string(), "rent & utilities".to_string()),
            ]
        );
    }

    #[test]
    fn customer_balance_path_has_no_query() {
        let plan = plan_for(Call::CustomerBalance(42));
        assert_eq!(plan.url.path(), "/wp-json/ims/v1/finance/customer-balance/42");
        assert_eq!(plan.url.query(), None);
        assert!(plan.body.is_none());
    }

    #[test]
    fn sync_posts_without_body() {
        let plan = plan_for(Call::SyncCustomerBalances);
        assert_eq!(plan.method, HttpMethod::Post);
        assert!(plan.body.is_none());
        assert_eq!(plan.url.query(), None);
    }

    #[test]
    fn payment_goes_in_the_body() {
        let payment = PaymentRequest {
            customer_id: 9,
            amount: 1200.0,
            payment_method: PaymentMethod::Cheque,
            reference: "CHQ-77".to_string(),
            notes: Some("second installment".to_string()),
        };
        let plan = plan_for(Call::RecordPayment(&payment));
        assert_eq!(plan.method, HttpMethod::Post);
        assert_eq!(plan.url.query(), None);
        let body = plan.body.unwrap();
        assert_eq!(body["paymentMethod"], "cheque");
        assert_eq!(body["customerId"], 9);
    }

    #[test]
    fn invalid_command_is_refused_before_planning() {
        let update = CustomerBalanceUpdate {
            customer_id: 1,
            order_id: 5,
            amount: 0.0,
            kind: BalanceEntryType::Credit,
            order_number: "ORD-5".to_string(),
            description: None,
        };
        let err = RequestPlan::build(&base(), &Call::UpdateCustomerBalance(&update)).unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }

    #[test]
    fn financial_report_sends_period_and_year() {
        let query = FinancialReportQuery {
            period: Some(ReportPeriod::Yearly),
            year: Some(2025),
        };
        let plan = plan_for(Call::FinancialReport(&query));
        assert_eq!(plan.url.query(), Some("period=yearly&year=2025"));
        assert_eq!(plan.url.path(), "/wp-json/ims/v1/reports/financial");
    }

    #[test]
    fn trailing_slash_in_base_is_tolerated() {
        let base = parse_base_url("http://127.0.0.1:8080/api/").unwrap();
        let plan = RequestPlan::build(&base, &Call::InventoryReport).unwrap();
        assert_eq!(plan.url.as_str(), "http://127.0.0.1:8080/api/reports/inventory");
    }

    #[test]
    fn base_url_must_be_http() {
        assert!(matches!(
            parse_base_url("ftp://example.com/v1"),
            Err(ClientError::InvalidBaseUrl { .. })
        ));
        assert!(parse_base_url("not a url").is_err());
        assert!(parse_base_url("https://example.com/v1?x=1").is_err());
    }
}
