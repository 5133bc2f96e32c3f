use serde::{Deserialize, Serialize};

use crate::period::ReportPeriod;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalesReportQuery {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub period: Option<ReportPeriod>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FinancialReportQuery {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub period: Option<ReportPeriod>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub year: Option<i32>,
}

// Sales

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
	pub total_revenue: f64,
	pub total_orders: u64,
	pub avg_order_value: f64,
	pub total_customers: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub revenue_growth: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub orders_growth: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub customers_growth: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySales {
	pub category: String,
	pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
	pub summary: SalesSummary,
	#[serde(default)]
	pub by_category: Vec<CategorySales>,
}

// Inventory

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockItem {
	pub id: u64,
	pub name: String,
	pub stock: i64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub reorder_level: Option<i64>,
	/// Stock value of the item, when the backend reports it.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySnapshot {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub total_items: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub total_value: Option<f64>,
	#[serde(default)]
	pub low_stock_items: Vec<LowStockItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReport {
	pub inventory_report: InventorySnapshot,
}

impl InventoryReport {
	/// Sum of the reported low-stock item values, `None` when no item carries one.
	pub fn low_stock_value(&self) -> Option<f64> {
		self.inventory_report
			.low_stock_items
			.iter()
			.filter_map(|item| item.value)
			.fold(None, |acc, v| Some(acc.unwrap_or(0.0) + v))
	}
}

// Financial

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowPoint {
	pub month: String,
	pub inflow: f64,
	pub outflow: f64,
	pub net: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialReport {
	pub period: ReportPeriod,
	pub year: i32,
	pub revenue: f64,
	pub expenses: f64,
	pub profit: f64,
	#[serde(default)]
	pub cash_flow: Vec<CashFlowPoint>,
}
