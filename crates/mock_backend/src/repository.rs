use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use models::{
    AccountsReceivable, BalanceEntryType, BalanceTransaction, BalanceUpdated, CashFlowPoint,
    CashFlowTotals, CategoryAmount, CategorySales, CustomerBalance, CustomerBalanceUpdate,
    ExpenseBreakdown, Expense, ExpensesPage, ExpensesSummary, FinanceOverview, FinancialReport,
    InventoryReport, InventorySnapshot, LowStockItem, OverviewPeriod, PaymentRecord,
    PaymentRecorded, PaymentRequest, ProfitBreakdown, ReceivablesPage, ReceivablesSummary,
    ReportPeriod, RevenueBreakdown, SalesReport, SalesSummary, SyncReport, Validate,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::error::{ApiError, Result};

/// Filters accepted by `GET /finance/accounts-receivable`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivablesFilter {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub overdue: Option<bool>,
    pub customer_id: Option<u64>,
}

/// Filters accepted by `GET /finance/expenses`. Dates compare as `YYYY-MM-DD` strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpensesFilter {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub category: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

/// Storage behind the mock finance API.
/// Swappable so tests can plug in failing or scripted stores.
#[async_trait]
pub trait FinanceRepository: Send + Sync {
    async fn overview(&self, period: OverviewPeriod) -> Result<FinanceOverview>;
    async fn receivables(&self, filter: &ReceivablesFilter) -> Result<ReceivablesPage>;
    async fn expenses(&self, filter: &ExpensesFilter) -> Result<ExpensesPage>;
    async fn record_payment(&self, payment: PaymentRequest) -> Result<PaymentRecorded>;
    async fn update_balance(&self, update: CustomerBalanceUpdate) -> Result<BalanceUpdated>;
    async fn customer_balance(&self, customer_id: u64) -> Result<CustomerBalance>;
    async fn sync_balances(&self) -> Result<SyncReport>;
    async fn sales_report(&self, period: ReportPeriod) -> Result<SalesReport>;
    async fn inventory_report(&self) -> Result<InventoryReport>;
    async fn financial_report(&self, period: ReportPeriod, year: i32) -> Result<FinancialReport>;
}

#[derive(Debug, Default)]
struct Ledger {
    /// What each customer currently owes.
    balances: BTreeMap<u64, f64>,
    transactions: BTreeMap<u64, Vec<BalanceTransaction>>,
    payments: Vec<PaymentRecord>,
    receivables: Vec<AccountsReceivable>,
    expenses: Vec<Expense>,
    next_id: u64,
}

impl Ledger {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Balance implied by the transaction history and recorded payments.
    fn derived_balance(&self, customer_id: u64) -> f64 {
        let from_transactions: f64 = self
            .transactions
            .get(&customer_id)
            .map(|txs| txs.iter().map(|tx| tx.kind.signed(tx.amount)).sum())
            .unwrap_or(0.0);
        let paid: f64 = self
            .payments
            .iter()
            .filter(|p| p.customer_id == customer_id)
            .map(|p| p.amount)
            .sum();
        from_transactions - paid
    }
}

/// In-memory store seeded with a small, deterministic data set.
pub struct InMemoryFinanceRepository {
    ledger: RwLock<Ledger>,
}

impl Default for InMemoryFinanceRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryFinanceRepository {
    pub fn new() -> Self {
        Self {
            ledger: RwLock::new(Ledger::default()),
        }
    }

    /// Three customers with order history, receivables and a handful of expenses.
    pub fn seeded() -> Self {
        let mut ledger = Ledger::default();

        let orders: [(u64, u64, &str, f64); 4] = [
            (1, 501, "ORD-501", 45_000.0),
            (1, 502, "ORD-502", 30_000.0),
            (2, 503, "ORD-503", 12_500.0),
            (3, 504, "ORD-504", 8_000.0),
        ];
        for (customer_id, order_id, order_number, amount) in orders {
            let id = ledger.next_id();
            ledger
                .transactions
                .entry(customer_id)
                .or_default()
                .push(BalanceTransaction {
                    id,
                    order_id,
                    order_number: order_number.to_string(),
                    amount,
                    kind: BalanceEntryType::Credit,
                    date: "2025-05-02".to_string(),
                    description: format!("Order {order_number} delivered"),
                });
        }
        for customer_id in [1, 2, 3] {
            let balance = ledger.derived_balance(customer_id);
            ledger.balances.insert(customer_id, balance);
        }

        ledger.receivables = vec![
            receivable(1, 1, "Ali Traders", "INV-1001", 45_000.0, 15_000.0, 21, "overdue"),
            receivable(2, 1, "Ali Traders", "INV-1002", 30_000.0, 0.0, 0, "pending"),
            receivable(3, 2, "Karachi Glass House", "INV-1003", 12_500.0, 12_500.0, 0, "paid"),
            receivable(4, 3, "Noor Builders", "INV-1004", 8_000.0, 2_000.0, 5, "overdue"),
        ];

        ledger.expenses = vec![
            expense(1, "rent", "Warehouse rent", 60_000.0, "2025-05-01", "bank_transfer"),
            expense(2, "utilities", "Electricity", 14_250.0, "2025-05-07", "cash"),
            expense(3, "purchases", "UV sheets restock", 120_000.0, "2025-05-12", "cheque"),
            expense(4, "utilities", "Internet", 3_500.0, "2025-06-02", "bank_transfer"),
        ];
        ledger.next_id = 100;

        Self {
            ledger: RwLock::new(ledger),
        }
    }
}

fn receivable(
    id: u64,
    customer_id: u64,
    customer_name: &str,
    invoice_number: &str,
    amount: f64,
    paid_amount: f64,
    days_overdue: i64,
    status: &str,
) -> AccountsReceivable {
    AccountsReceivable {
        id,
        customer_id,
        customer_name: customer_name.to_string(),
        invoice_number: invoice_number.to_string(),
        date: "2025-04-15".to_string(),
        due_date: "2025-05-15".to_string(),
        amount,
        paid_amount,
        balance: amount - paid_amount,
        days_overdue,
        status: status.to_string(),
    }
}

fn expense(
    id: u64,
    category: &str,
    description: &str,
    amount: f64,
    date: &str,
    payment_method: &str,
) -> Expense {
    Expense {
        id,
        category: category.to_string(),
        description: description.to_string(),
        amount,
        date: date.to_string(),
        reference: format!("EXP-{id:04}"),
        payment_method: payment_method.to_string(),
        receipt: None,
        created_by: "admin".to_string(),
    }
}

/// 1-based page of `items`; everything when no limit is given.
fn paginate<T: Clone>(items: &[T], page: Option<u32>, limit: Option<u32>) -> Vec<T> {
    match limit {
        Some(limit) => {
            let page = page.unwrap_or(1).max(1) as usize;
            let limit = limit as usize;
            items
                .iter()
                .skip((page - 1) * limit)
                .take(limit)
                .cloned()
                .collect()
        }
        None => items.to_vec(),
    }
}

fn period_days(period: ReportPeriod) -> f64 {
    match period {
        ReportPeriod::Daily => 1.0,
        ReportPeriod::Weekly => 7.0,
        ReportPeriod::Monthly => 30.0,
        ReportPeriod::Yearly => 365.0,
    }
}

#[async_trait]
impl FinanceRepository for InMemoryFinanceRepository {
    async fn overview(&self, period: OverviewPeriod) -> Result<FinanceOverview> {
        let ledger = self.ledger.read().await;
        let days = match period {
            OverviewPeriod::Today => 1.0,
            OverviewPeriod::Week => 7.0,
            OverviewPeriod::Month => 30.0,
            OverviewPeriod::Year => 365.0,
        };
        let cash = 2_500.0 * days;
        let credit = 1_700.0 * days;
        let purchases = 1_800.0 * days;
        let operational = 900.0 * days;
        let revenue = cash + credit;
        let expenses = purchases + operational;
        let receivable: f64 = ledger.balances.values().filter(|b| **b > 0.0).sum();

        Ok(FinanceOverview {
            revenue: RevenueBreakdown {
                total: revenue,
                cash,
                credit,
                growth: 12.5,
            },
            expenses: ExpenseBreakdown {
                total: expenses,
                purchases,
                operational,
                growth: 4.1,
            },
            profit: ProfitBreakdown {
                gross: revenue - purchases,
                net: revenue - expenses,
                margin: ((revenue - expenses) / revenue * 1000.0).round() / 10.0,
            },
            accounts_receivable: receivable,
            accounts_payable: 35_000.0,
            cash_flow: CashFlowTotals {
                inflow: cash,
                outflow: expenses,
                net: cash - expenses,
            },
        })
    }

    async fn receivables(&self, filter: &ReceivablesFilter) -> Result<ReceivablesPage> {
        let ledger = self.ledger.read().await;
        let matching: Vec<AccountsReceivable> = ledger
            .receivables
            .iter()
            .filter(|r| filter.customer_id.map_or(true, |id| r.customer_id == id))
            .filter(|r| filter.overdue.map_or(true, |overdue| r.is_overdue() == overdue))
            .cloned()
            .collect();

        let overdue: Vec<&AccountsReceivable> = matching.iter().filter(|r| r.is_overdue()).collect();
        let summary = ReceivablesSummary {
            total_receivables: matching.iter().map(|r| r.balance).sum(),
            overdue_amount: overdue.iter().map(|r| r.balance).sum(),
            overdue_count: overdue.len() as u64,
        };

        Ok(ReceivablesPage {
            receivables: paginate(&matching, filter.page, filter.limit),
            summary,
        })
    }

    async fn expenses(&self, filter: &ExpensesFilter) -> Result<ExpensesPage> {
        let ledger = self.ledger.read().await;
        let matching: Vec<Expense> = ledger
            .expenses
            .iter()
            .filter(|e| {
                filter
                    .category
                    .as_deref()
                    .map_or(true, |c| e.category.eq_ignore_ascii_case(c))
            })
            .filter(|e| filter.date_from.as_deref().map_or(true, |from| e.date.as_str() >= from))
            .filter(|e| filter.date_to.as_deref().map_or(true, |to| e.date.as_str() <= to))
            .cloned()
            .collect();

        let mut by_category: BTreeMap<String, f64> = BTreeMap::new();
        for e in &matching {
            *by_category.entry(e.category.clone()).or_insert(0.0) += e.amount;
        }

        Ok(ExpensesPage {
            expenses: paginate(&matching, filter.page, filter.limit),
            summary: ExpensesSummary {
                total_expenses: matching.iter().map(|e| e.amount).sum(),
                categories: by_category
                    .into_iter()
                    .map(|(category, amount)| CategoryAmount { category, amount })
                    .collect(),
            },
        })
    }

    async fn record_payment(&self, payment: PaymentRequest) -> Result<PaymentRecorded> {
        payment.validate()?;
        let mut ledger = self.ledger.write().await;
        let record = PaymentRecord {
            id: Some(ledger.next_id()),
            customer_id: payment.customer_id,
            amount: payment.amount,
            payment_method: payment.payment_method,
            reference: payment.reference,
            notes: payment.notes,
            date: Some(Utc::now().format("%Y-%m-%d").to_string()),
        };
        let balance = ledger.balances.entry(record.customer_id).or_insert(0.0);
        *balance -= record.amount;
        let updated_balance = *balance;
        ledger.payments.push(record.clone());

        tracing::info!(
            customer_id = record.customer_id,
            amount = record.amount,
            updated_balance,
            "payment recorded"
        );
        Ok(PaymentRecorded {
            payment: record,
            updated_balance,
        })
    }

    async fn update_balance(&self, update: CustomerBalanceUpdate) -> Result<BalanceUpdated> {
        update.validate()?;
        let mut ledger = self.ledger.write().await;
        let transaction_id = ledger.next_id();
        let previous_balance = ledger.balances.get(&update.customer_id).copied().unwrap_or(0.0);
        let new_balance = previous_balance + update.kind.signed(update.amount);
        ledger.balances.insert(update.customer_id, new_balance);

        let description = update
            .description
            .clone()
            .unwrap_or_else(|| format!("Order {} {:?}", update.order_number, update.kind));
        ledger
            .transactions
            .entry(update.customer_id)
            .or_default()
            .push(BalanceTransaction {
                id: transaction_id,
                order_id: update.order_id,
                order_number: update.order_number,
                amount: update.amount,
                kind: update.kind,
                date: Utc::now().format("%Y-%m-%d").to_string(),
                description,
            });

        Ok(BalanceUpdated {
            customer_id: update.customer_id,
            previous_balance,
            new_balance,
            transaction_id,
        })
    }

    async fn customer_balance(&self, customer_id: u64) -> Result<CustomerBalance> {
        let ledger = self.ledger.read().await;
        let current_balance = ledger
            .balances
            .get(&customer_id)
            .copied()
            .ok_or(ApiError::CustomerNotFound(customer_id))?;

        Ok(CustomerBalance {
            customer_id,
            current_balance,
            transactions: ledger
                .transactions
                .get(&customer_id)
                .cloned()
                .unwrap_or_default(),
        })
    }

    async fn sync_balances(&self) -> Result<SyncReport> {
        let mut ledger = self.ledger.write().await;
        let customers: Vec<u64> = ledger.balances.keys().copied().collect();
        let mut updated = 0;
        for customer_id in customers {
            let derived = ledger.derived_balance(customer_id);
            if let Some(balance) = ledger.balances.get_mut(&customer_id) {
                if (*balance - derived).abs() > f64::EPSILON {
                    *balance = derived;
                    updated += 1;
                }
            }
        }
        Ok(SyncReport {
            updated,
            errors: Vec::new(),
        })
    }

    async fn sales_report(&self, period: ReportPeriod) -> Result<SalesReport> {
        let days = period_days(period);
        let total_orders = (25.0 * days) as u64;
        let total_revenue = 125_000.0 * days;
        let categories = [
            ("Taj Sheets", 0.45),
            ("UV Sheets", 0.25),
            ("Test Category", 0.20),
            ("Hardware", 0.10),
        ];

        Ok(SalesReport {
            summary: SalesSummary {
                total_revenue,
                total_orders,
                avg_order_value: total_revenue / total_orders as f64,
                total_customers: 295,
                revenue_growth: Some(12.5),
                orders_growth: Some(8.3),
                customers_growth: Some(5.2),
            },
            by_category: categories
                .iter()
                .map(|(name, share)| CategorySales {
                    category: name.to_string(),
                    revenue: total_revenue * share,
                })
                .collect(),
        })
    }

    async fn inventory_report(&self) -> Result<InventoryReport> {
        let items = [
            (1, "UV Sheet 4x8 Gloss", 3, 10, 36_000.0),
            (2, "Taj Sheet 18mm", 5, 12, 27_500.0),
            (3, "Edge Band White", 8, 20, 11_500.0),
        ];
        Ok(InventoryReport {
            inventory_report: InventorySnapshot {
                total_items: Some(148),
                total_value: Some(2_450_000.0),
                low_stock_items: items
                    .iter()
                    .map(|(id, name, stock, reorder, value)| LowStockItem {
                        id: *id,
                        name: name.to_string(),
                        stock: *stock,
                        reorder_level: Some(*reorder),
                        value: Some(*value),
                    })
                    .collect(),
            },
        })
    }

    async fn financial_report(&self, period: ReportPeriod, year: i32) -> Result<FinancialReport> {
        if !(2000..=2100).contains(&year) {
            return Err(ApiError::InvalidYear(year));
        }
        let months = [
            ("Jan", 85_000.0, 45_000.0),
            ("Feb", 92_000.0, 52_000.0),
            ("Mar", 78_000.0, 38_000.0),
            ("Apr", 105_000.0, 65_000.0),
            ("May", 125_000.0, 75_000.0),
            ("Jun", 110_000.0, 60_000.0),
        ];
        let cash_flow: Vec<CashFlowPoint> = months
            .iter()
            .map(|(month, inflow, outflow)| CashFlowPoint {
                month: month.to_string(),
                inflow: *inflow,
                outflow: *outflow,
                net: inflow - outflow,
            })
            .collect();
        let revenue: f64 = cash_flow.iter().map(|p| p.inflow).sum();
        let expenses: f64 = cash_flow.iter().map(|p| p.outflow).sum();

        Ok(FinancialReport {
            period,
            year,
            revenue,
            expenses,
            profit: revenue - expenses,
            cash_flow,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::PaymentMethod;

    #[tokio::test]
    async fn payment_reduces_balance() {
        let repo = InMemoryFinanceRepository::seeded();
        let before = repo.customer_balance(2).await.unwrap().current_balance;
        let recorded = repo
            .record_payment(PaymentRequest {
                customer_id: 2,
                amount: 2_500.0,
                payment_method: PaymentMethod::Cash,
                reference: "RCPT-9".to_string(),
                notes: None,
            })
            .await
            .unwrap();
        assert_eq!(recorded.updated_balance, before - 2_500.0);
        assert!(recorded.payment.id.is_some());
    }

    #[tokio::test]
    async fn credit_and_debit_move_balance_in_opposite_directions() {
        let repo = InMemoryFinanceRepository::seeded();
        let mut update = CustomerBalanceUpdate {
            customer_id: 3,
            order_id: 900,
            amount: 1_000.0,
            kind: BalanceEntryType::Credit,
            order_number: "ORD-900".to_string(),
            description: None,
        };
        let credited = repo.update_balance(update.clone()).await.unwrap();
        assert_eq!(credited.new_balance, credited.previous_balance + 1_000.0);

        update.kind = BalanceEntryType::Debit;
        let debited = repo.update_balance(update).await.unwrap();
        assert_eq!(debited.new_balance, credited.previous_balance);
        assert_ne!(debited.transaction_id, credited.transaction_id);

        let history = repo.customer_balance(3).await.unwrap();
        assert_eq!(history.transactions.len(), 3);
    }

    #[tokio::test]
    async fn invalid_payment_is_rejected() {
        let repo = InMemoryFinanceRepository::seeded();
        let err = repo
            .record_payment(PaymentRequest {
                customer_id: 1,
                amount: -5.0,
                payment_method: PaymentMethod::Cash,
                reference: "X".to_string(),
                notes: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn receivables_filter_and_page() {
        let repo = InMemoryFinanceRepository::seeded();
        let overdue = repo
            .receivables(&ReceivablesFilter {
                overdue: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(overdue.summary.overdue_count, 2);
        assert!(overdue.receivables.iter().all(|r| r.is_overdue()));

        let page = repo
            .receivables(&ReceivablesFilter {
                page: Some(2),
                limit: Some(3),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.receivables.len(), 1);
        assert_eq!(page.receivables[0].id, 4);
        assert!(page.receivables.iter().all(|r| r.validate().is_ok()));
    }

    #[tokio::test]
    async fn sync_restores_derived_balances() {
        let repo = InMemoryFinanceRepository::seeded();
        repo.ledger.write().await.balances.insert(1, 0.0);
        let report = repo.sync_balances().await.unwrap();
        assert_eq!(report.updated, 1);
        assert_eq!(repo.customer_balance(1).await.unwrap().current_balance, 75_000.0);
    }

    #[tokio::test]
    async fn unknown_customer_is_not_found() {
        let repo = InMemoryFinanceRepository::seeded();
        assert!(matches!(
            repo.customer_balance(999).await,
            Err(ApiError::CustomerNotFound(999))
        ));
    }
}
