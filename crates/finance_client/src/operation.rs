use std::fmt;

/// Every backend call the client knows about.
///
/// The discriminant indexes [`OPERATIONS`]; keep both in the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetOverview,
    GetAccountsReceivable,
    GetExpenses,
    RecordPayment,
    UpdateCustomerBalance,
    GetCustomerBalance,
    SyncCustomerBalances,
    GetSalesReport,
    GetInventoryReport,
    GetFinancialReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// How an operation's parameters travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// Defined fields become query parameters.
    Query,
    /// JSON request body.
    Body,
    Empty,
}

#[derive(Debug)]
pub struct OperationSpec {
    pub operation: Operation,
    pub name: &'static str,
    pub method: HttpMethod,
    /// Relative to the base URL. `{name}` segments are filled from path parameters.
    pub path: &'static str,
    pub payload: PayloadKind,
}

pub static OPERATIONS: [OperationSpec; 10] = [
    OperationSpec {
        operation: Operation::GetOverview,
        name: "getOverview",
        method: HttpMethod::Get,
        path: "/finance/overview",
        payload: PayloadKind::Query,
    },
    OperationSpec {
        operation: Operation::GetAccountsReceivable,
        name: "getAccountsReceivable",
        method: HttpMethod::Get,
        path: "/finance/accounts-receivable",
        payload: PayloadKind::Query,
    },
    OperationSpec {
        operation: Operation::GetExpenses,
        name: "getExpenses",
        method: HttpMethod::Get,
        path: "/finance/expenses",
        payload: PayloadKind::Query,
    },
    OperationSpec {
        operation: Operation::RecordPayment,
        name: "recordPayment",
        method: HttpMethod::Post,
        path: "/finance/payments",
        payload: PayloadKind::Body,
    },
    OperationSpec {
        operation: Operation::UpdateCustomerBalance,
        name: "updateCustomerBalance",
        method: HttpMethod::Post,
        path: "/finance/customer-balance",
        payload: PayloadKind::Body,
    },
    OperationSpec {
        operation: Operation::GetCustomerBalance,
        name: "getCustomerBalance",
        method: HttpMethod::Get,
        path: "/finance/customer-balance/{customerId}",
        payload: PayloadKind::Empty,
    },
    OperationSpec {
        operation: Operation::SyncCustomerBalances,
        name: "syncCustomerBalances",
        method: HttpMethod::Post,
        path: "/finance/sync-customer-balances",
        payload: PayloadKind::Empty,
    },
    OperationSpec {
        operation: Operation::GetSalesReport,
        name: "getSalesReport",
        method: HttpMethod::Get,
        path: "/reports/sales",
        payload: PayloadKind::Query,
    },
    OperationSpec {
        operation: Operation::GetInventoryReport,
        name: "getInventoryReport",
        method: HttpMethod::Get,
        path: "/reports/inventory",
        payload: PayloadKind::Empty,
    },
    OperationSpec {
        operation: Operation::GetFinancialReport,
        name: "getFinancialReport",
        method: HttpMethod::Get,
        path: "/reports/financial",
        payload: PayloadKind::Query,
    },
];

impl Operation {
    pub fn spec(self) -> &'static OperationSpec {
        &OPERATIONS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl OperationSpec {
    /// Fills `{name}` placeholders in the path template.
    pub fn render_path(&self, params: &[(&str, String)]) -> String {
        params
            .iter()
            .fold(self.path.to_string(), |path, (name, value)| {
                path.replace(&format!("{{{name}}}"), value)
            })
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => f.write_str("GET"),
            HttpMethod::Post => f.write_str("POST"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_discriminant() {
        for (i, spec) in OPERATIONS.iter().enumerate() {
            assert_eq!(spec.operation as usize, i, "{} is out of order", spec.name);
            assert_eq!(spec.operation.spec().name, spec.name);
        }
    }

    #[test]
    fn writes_are_posts() {
        for spec in &OPERATIONS {
            if spec.payload == PayloadKind::Body {
                assert_eq!(spec.method, HttpMethod::Post, "{}", spec.name);
            }
        }
        assert_eq!(
            Operation::SyncCustomerBalances.spec().method,
            HttpMethod::Post
        );
    }

    #[test]
    fn render_path_fills_placeholders() {
        let spec = Operation::GetCustomerBalance.spec();
        assert_eq!(
            spec.render_path(&[("customerId", "42".to_string())]),
            "/finance/customer-balance/42"
        );
        assert_eq!(
            Operation::GetExpenses.spec().render_path(&[]),
            "/finance/expenses"
        );
    }
}
