use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::period::OverviewPeriod;

// Overview

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueBreakdown {
	pub total: f64,
	pub cash: f64,
	pub credit: f64,
	pub growth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
	pub total: f64,
	pub purchases: f64,
	pub operational: f64,
	pub growth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitBreakdown {
	pub gross: f64,
	pub net: f64,
	pub margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowTotals {
	pub inflow: f64,
	pub outflow: f64,
	pub net: f64,
}

/// Aggregate snapshot for one period, recomputed by the backend per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceOverview {
	pub revenue: RevenueBreakdown,
	pub expenses: ExpenseBreakdown,
	pub profit: ProfitBreakdown,
	pub accounts_receivable: f64,
	pub accounts_payable: f64,
	pub cash_flow: CashFlowTotals,
}

// Receivables

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountsReceivable {
	pub id: u64,
	pub customer_id: u64,
	pub customer_name: String,
	pub invoice_number: String,
	pub date: String,
	pub due_date: String,
	pub amount: f64,
	pub paid_amount: f64,
	pub balance: f64,
	pub days_overdue: i64,
	pub status: String,
}

impl AccountsReceivable {
	pub fn is_overdue(&self) -> bool {
		self.status.eq_ignore_ascii_case("overdue")
	}

	/// `amount - paid_amount`, the value `balance` must carry.
	pub fn expected_balance(&self) -> f64 {
		self.amount - self.paid_amount
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivablesSummary {
	pub total_receivables: f64,
	pub overdue_amount: f64,
	pub overdue_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceivablesPage {
	#[serde(default)]
	pub receivables: Vec<AccountsReceivable>,
	pub summary: ReceivablesSummary,
}

// Expenses

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
	pub id: u64,
	pub category: String,
	#[serde(default)]
	pub description: String,
	pub amount: f64,
	pub date: String,
	#[serde(default)]
	pub reference: String,
	pub payment_method: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub receipt: Option<String>,
	pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAmount {
	pub category: String,
	pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpensesSummary {
	pub total_expenses: f64,
	#[serde(default)]
	pub categories: Vec<CategoryAmount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpensesPage {
	#[serde(default)]
	pub expenses: Vec<Expense>,
	pub summary: ExpensesSummary,
}

// Query parameter objects. Only `Some` fields reach the query string.

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverviewQuery {
	pub period: OverviewPeriod,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivablesQuery {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub page: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub limit: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub overdue: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub customer_id: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpensesQuery {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub page: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub limit: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub category: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub date_from: Option<NaiveDate>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub date_to: Option<NaiveDate>,
}

// Payments

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
	Cash,
	BankTransfer,
	Cheque,
}

/// Command: record a customer payment. `amount` must be strictly positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
	pub customer_id: u64,
	pub amount: f64,
	pub payment_method: PaymentMethod,
	pub reference: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub notes: Option<String>,
}

/// The payment as stored by the backend: the request fields plus whatever it assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<u64>,
	pub customer_id: u64,
	pub amount: f64,
	pub payment_method: PaymentMethod,
	pub reference: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub notes: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub date: Option<String>,
}

impl PaymentRecord {
	/// Strips backend-assigned fields, giving back the command that produced the record.
	pub fn to_request(&self) -> PaymentRequest {
		PaymentRequest {
			customer_id: self.customer_id,
			amount: self.amount,
			payment_method: self.payment_method,
			reference: self.reference.clone(),
			notes: self.notes.clone(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecorded {
	pub payment: PaymentRecord,
	pub updated_balance: f64,
}

// Customer balances

/// Direction of a balance entry. Credit raises what the customer owes, debit lowers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceEntryType {
	Credit,
	Debit,
}

impl BalanceEntryType {
	/// Applies the direction to an unsigned amount.
	pub fn signed(&self, amount: f64) -> f64 {
		match self {
			Self::Credit => amount,
			Self::Debit => -amount,
		}
	}
}

/// Command: move a customer's balance after an order status change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerBalanceUpdate {
	pub customer_id: u64,
	pub order_id: u64,
	pub amount: f64,
	#[serde(rename = "type")]
	pub kind: BalanceEntryType,
	pub order_number: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceUpdated {
	pub customer_id: u64,
	pub previous_balance: f64,
	pub new_balance: f64,
	pub transaction_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceTransaction {
	pub id: u64,
	pub order_id: u64,
	pub order_number: String,
	pub amount: f64,
	#[serde(rename = "type")]
	pub kind: BalanceEntryType,
	pub date: String,
	#[serde(default)]
	pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerBalance {
	pub customer_id: u64,
	pub current_balance: f64,
	#[serde(default)]
	pub transactions: Vec<BalanceTransaction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncFailure {
	pub customer_id: u64,
	pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncReport {
	pub updated: u64,
	#[serde(default)]
	pub errors: Vec<SyncFailure>,
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn payment_request_uses_wire_names() {
		let req = PaymentRequest {
			customer_id: 7,
			amount: 1500.0,
			payment_method: PaymentMethod::BankTransfer,
			reference: "TRX-1".to_string(),
			notes: None,
		};
		assert_eq!(
			serde_json::to_value(&req).unwrap(),
			json!({
				"customerId": 7,
				"amount": 1500.0,
				"paymentMethod": "bank_transfer",
				"reference": "TRX-1"
			})
		);
	}

	#[test]
	fn balance_update_carries_type_field() {
		let update = CustomerBalanceUpdate {
			customer_id: 3,
			order_id: 90,
			amount: 250.0,
			kind: BalanceEntryType::Debit,
			order_number: "ORD-90".to_string(),
			description: Some("paid on delivery".to_string()),
		};
		let value = serde_json::to_value(&update).unwrap();
		assert_eq!(value["type"], "debit");
		assert_eq!(value["orderNumber"], "ORD-90");
		assert_eq!(BalanceEntryType::Debit.signed(update.amount), -250.0);
		assert_eq!(BalanceEntryType::Credit.signed(update.amount), 250.0);
	}

	#[test]
	fn receivable_decodes_camel_case() {
		let entry: AccountsReceivable = serde_json::from_value(json!({
			"id": 1,
			"customerId": 4,
			"customerName": "Ali Traders",
			"invoiceNumber": "INV-001",
			"date": "2025-01-02",
			"dueDate": "2025-02-01",
			"amount": 1000.0,
			"paidAmount": 400.0,
			"balance": 600.0,
			"daysOverdue": 12,
			"status": "Overdue"
		}))
		.unwrap();
		assert!(entry.is_overdue());
		assert_eq!(entry.expected_balance(), 600.0);
	}

	#[test]
	fn empty_queries_serialize_to_empty_objects() {
		assert_eq!(
			serde_json::to_value(ReceivablesQuery::default()).unwrap(),
			json!({})
		);
		let q = ExpensesQuery {
			date_from: NaiveDate::from_ymd_opt(2025, 3, 1),
			..Default::default()
		};
		assert_eq!(
			serde_json::to_value(q).unwrap(),
			json!({"dateFrom": "2025-03-01"})
		);
	}
}
