use models::{CashFlowPoint, CategorySales};

/// Illustrative figures shown while a report slot is still empty.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleValues {
    pub total_revenue: f64,
    pub total_orders: u64,
    pub avg_order_value: f64,
    pub low_stock_count: u64,
    pub low_stock_value: f64,
    pub total_customers: u64,
    pub avg_customer_value: f64,
    pub revenue_trend: String,
    pub orders_trend: String,
    pub low_stock_trend: String,
    pub customers_trend: String,
    pub cash_flow: Vec<CashFlowPoint>,
    pub categories: Vec<CategorySales>,
}

/// Source of fallback values for absent slots.
pub trait PlaceholderProvider: Send + Sync {
    /// `None` means the view reports the field as missing.
    fn sample(&self) -> Option<&SampleValues>;
}

/// The fixed demo figures.
#[derive(Debug, Clone)]
pub struct SamplePlaceholders {
    values: SampleValues,
}

impl Default for SamplePlaceholders {
    fn default() -> Self {
        Self {
            values: SampleValues {
                total_revenue: 125_000.0,
                total_orders: 25,
                avg_order_value: 5_000.0,
                low_stock_count: 15,
                low_stock_value: 75_000.0,
                total_customers: 295,
                avg_customer_value: 5_200.0,
                revenue_trend: "+12.5%".to_string(),
                orders_trend: "+8.3%".to_string(),
                low_stock_trend: "Requires attention".to_string(),
                customers_trend: "+5.2%".to_string(),
                cash_flow: sample_cash_flow(),
                categories: sample_categories(),
            },
        }
    }
}

impl SamplePlaceholders {
    pub fn with_values(values: SampleValues) -> Self {
        Self { values }
    }
}

impl PlaceholderProvider for SamplePlaceholders {
    fn sample(&self) -> Option<&SampleValues> {
        Some(&self.values)
    }
}

/// Real data only.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPlaceholders;

impl PlaceholderProvider for NoPlaceholders {
    fn sample(&self) -> Option<&SampleValues> {
        None
    }
}

fn sample_cash_flow() -> Vec<CashFlowPoint> {
    [
        ("Jan", 85_000.0, 45_000.0),
        ("Feb", 92_000.0, 52_000.0),
        ("Mar", 78_000.0, 38_000.0),
        ("Apr", 105_000.0, 65_000.0),
        ("May", 125_000.0, 75_000.0),
        ("Jun", 110_000.0, 60_000.0),
    ]
    .into_iter()
    .map(|(month, inflow, outflow)| CashFlowPoint {
        month: month.to_string(),
        inflow,
        outflow,
        net: inflow - outflow,
    })
    .collect()
}

fn sample_categories() -> Vec<CategorySales> {
    [
        ("Taj Sheets", 125_000.0),
        ("UV Sheets", 85_000.0),
        ("Test Category", 65_000.0),
        ("Hardware", 35_000.0),
    ]
    .into_iter()
    .map(|(category, revenue)| CategorySales {
        category: category.to_string(),
        revenue,
    })
    .collect()
}
