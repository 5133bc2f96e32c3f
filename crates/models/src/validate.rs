//! Boundary checks applied to outgoing commands and decoded payloads.

use thiserror::Error;

use crate::finance::*;
use crate::reports::*;

/// Allowed drift between a receivable's `balance` and `amount - paidAmount`.
pub const BALANCE_TOLERANCE: f64 = 0.005;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
	#[error("{field} must be a finite amount greater than zero (got {value})")]
	NonPositive { field: String, value: f64 },

	#[error("{field} must not be negative (got {value})")]
	Negative { field: String, value: f64 },

	#[error("{field} must not be empty")]
	Empty { field: &'static str },

	#[error(
		"receivable {id}: balance {balance} does not match amount {amount} minus paid {paid_amount}"
	)]
	BalanceMismatch {
		id: u64,
		balance: f64,
		amount: f64,
		paid_amount: f64,
	},

	#[error("receivable {id}: {days_overdue} days overdue but status is '{status}'")]
	OverdueStatus {
		id: u64,
		days_overdue: i64,
		status: String,
	},
}

pub trait Validate {
	fn validate(&self) -> Result<(), ValidationError>;
}

fn positive(field: impl Into<String>, value: f64) -> Result<(), ValidationError> {
	if value.is_finite() && value > 0.0 {
		Ok(())
	} else {
		Err(ValidationError::NonPositive {
			field: field.into(),
			value,
		})
	}
}

fn non_negative(field: impl Into<String>, value: f64) -> Result<(), ValidationError> {
	if value >= 0.0 {
		Ok(())
	} else {
		Err(ValidationError::Negative {
			field: field.into(),
			value,
		})
	}
}

fn not_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
	if value.trim().is_empty() {
		Err(ValidationError::Empty { field })
	} else {
		Ok(())
	}
}

impl Validate for PaymentRequest {
	fn validate(&self) -> Result<(), ValidationError> {
		positive("amount", self.amount)?;
		not_blank("reference", &self.reference)
	}
}

impl Validate for CustomerBalanceUpdate {
	fn validate(&self) -> Result<(), ValidationError> {
		positive("amount", self.amount)?;
		not_blank("orderNumber", &self.order_number)
	}
}

impl Validate for FinanceOverview {
	fn validate(&self) -> Result<(), ValidationError> {
		non_negative("revenue.total", self.revenue.total)?;
		non_negative("expenses.total", self.expenses.total)?;
		non_negative("accountsReceivable", self.accounts_receivable)?;
		non_negative("accountsPayable", self.accounts_payable)
	}
}

impl Validate for AccountsReceivable {
	fn validate(&self) -> Result<(), ValidationError> {
		if (self.balance - self.expected_balance()).abs() > BALANCE_TOLERANCE {
			return Err(ValidationError::BalanceMismatch {
				id: self.id,
				balance: self.balance,
				amount: self.amount,
				paid_amount: self.paid_amount,
			});
		}
		if self.days_overdue < 0 {
			return Err(ValidationError::Negative {
				field: format!("receivables[{}].daysOverdue", self.id),
				value: self.days_overdue as f64,
			});
		}
		if self.days_overdue > 0 && !self.is_overdue() {
			return Err(ValidationError::OverdueStatus {
				id: self.id,
				days_overdue: self.days_overdue,
				status: self.status.clone(),
			});
		}
		Ok(())
	}
}

impl Validate for ReceivablesPage {
	fn validate(&self) -> Result<(), ValidationError> {
		self.receivables.iter().try_for_each(Validate::validate)?;
		non_negative("summary.totalReceivables", self.summary.total_receivables)?;
		non_negative("summary.overdueAmount", self.summary.overdue_amount)
	}
}

impl Validate for ExpensesPage {
	fn validate(&self) -> Result<(), ValidationError> {
		for expense in &self.expenses {
			non_negative(format!("expenses[{}].amount", expense.id), expense.amount)?;
		}
		non_negative("summary.totalExpenses", self.summary.total_expenses)
	}
}

impl Validate for PaymentRecorded {
	fn validate(&self) -> Result<(), ValidationError> {
		positive("payment.amount", self.payment.amount)
	}
}

impl Validate for BalanceUpdated {
	fn validate(&self) -> Result<(), ValidationError> {
		Ok(())
	}
}

impl Validate for CustomerBalance {
	fn validate(&self) -> Result<(), ValidationError> {
		for tx in &self.transactions {
			non_negative(format!("transactions[{}].amount", tx.id), tx.amount)?;
		}
		Ok(())
	}
}

impl Validate for SyncReport {
	fn validate(&self) -> Result<(), ValidationError> {
		Ok(())
	}
}

impl Validate for SalesReport {
	fn validate(&self) -> Result<(), ValidationError> {
		non_negative("summary.totalRevenue", self.summary.total_revenue)?;
		non_negative("summary.avgOrderValue", self.summary.avg_order_value)?;
		for c in &self.by_category {
			non_negative(format!("byCategory[{}].revenue", c.category), c.revenue)?;
		}
		Ok(())
	}
}

impl Validate for InventoryReport {
	fn validate(&self) -> Result<(), ValidationError> {
		if let Some(total) = self.inventory_report.total_value {
			non_negative("inventoryReport.totalValue", total)?;
		}
		for item in &self.inventory_report.low_stock_items {
			if let Some(value) = item.value {
				non_negative(format!("lowStockItems[{}].value", item.id), value)?;
			}
		}
		Ok(())
	}
}

impl Validate for FinancialReport {
	fn validate(&self) -> Result<(), ValidationError> {
		non_negative("revenue", self.revenue)?;
		non_negative("expenses", self.expenses)?;
		for point in &self.cash_flow {
			non_negative(format!("cashFlow[{}].inflow", point.month), point.inflow)?;
			non_negative(format!("cashFlow[{}].outflow", point.month), point.outflow)?;
		}
		Ok(())
	}
}
