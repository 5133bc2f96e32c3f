use models::{CashFlowPoint, CategorySales};
use serde::Serialize;

use crate::format::{format_growth, CurrencyFormatter};
use crate::placeholder::{PlaceholderProvider, SampleValues};
use crate::state::{BatchPhase, DashboardState, Filters};

/// Chart colours, assigned to categories in order and reused cyclically.
pub const PALETTE: [&str; 6] = [
    "#3b82f6", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#ec4899",
];

/// Where a displayed value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Live,
    Placeholder,
    /// Fixed label text.
    Static,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub text: Option<String>,
    pub provenance: Provenance,
}

impl Figure {
    fn fixed(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            provenance: Provenance::Static,
        }
    }

    fn missing() -> Self {
        Self {
            text: None,
            provenance: Provenance::Missing,
        }
    }

    /// Live value if present, else the placeholder, else missing.
    fn resolve<T>(live: Option<T>, placeholder: Option<T>, render: impl FnOnce(T) -> String) -> Self {
        match (live, placeholder) {
            (Some(value), _) => Self {
                text: Some(render(value)),
                provenance: Provenance::Live,
            },
            (None, Some(value)) => Self {
                text: Some(render(value)),
                provenance: Provenance::Placeholder,
            },
            (None, None) => Self::missing(),
        }
    }

    pub fn is_live(&self) -> bool {
        self.provenance == Provenance::Live
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCard {
    pub title: &'static str,
    pub value: Figure,
    pub subtitle: Figure,
    pub trend: Trend,
    pub trend_text: Figure,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series<T> {
    pub points: Vec<T>,
    pub provenance: Provenance,
}

impl<T> Series<T> {
    fn missing() -> Self {
        Self {
            points: Vec::new(),
            provenance: Provenance::Missing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySlice {
    pub name: String,
    pub revenue: f64,
    /// Whole percent of total category revenue.
    pub share: u32,
    pub color: &'static str,
}

/// Everything the reports page shows, derived from state on demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub filters: Filters,
    pub loading: bool,
    pub phase: BatchPhase,
    pub cards: Vec<StatCard>,
    pub cash_flow: Series<CashFlowPoint>,
    pub categories: Series<CategorySlice>,
}

impl DashboardView {
    pub fn render(
        state: &DashboardState,
        placeholders: &dyn PlaceholderProvider,
        fmt: &CurrencyFormatter,
    ) -> Self {
        let sample = placeholders.sample();
        let summary = state.sales.as_ref().map(|report| &report.summary);
        let inventory = state.inventory.as_ref();

        let revenue = StatCard {
            title: "Revenue",
            value: Figure::resolve(
                summary.map(|s| s.total_revenue),
                sample.map(|s| s.total_revenue),
                |v| fmt.format(v),
            ),
            subtitle: Figure::fixed("vs previous period"),
            ..growth_trend(
                summary.and_then(|s| s.revenue_growth),
                sample.map(|s| s.revenue_trend.as_str()),
            )
        };

        let orders = StatCard {
            title: "Orders",
            value: Figure::resolve(
                summary.map(|s| s.total_orders),
                sample.map(|s| s.total_orders),
                |v| fmt.format_count(v),
            ),
            subtitle: Figure::resolve(
                summary.map(|s| s.avg_order_value),
                sample.map(|s| s.avg_order_value),
                |v| format!("Avg: {}", fmt.format(v)),
            ),
            ..growth_trend(
                summary.and_then(|s| s.orders_growth),
                sample.map(|s| s.orders_trend.as_str()),
            )
        };

        let low_stock = StatCard {
            title: "Low Stock Items",
            value: Figure::resolve(
                inventory.map(|r| r.inventory_report.low_stock_items.len() as u64),
                sample.map(|s| s.low_stock_count),
                |v| fmt.format_count(v),
            ),
            subtitle: Figure::resolve(
                inventory.and_then(|r| r.low_stock_value()),
                sample.map(|s| s.low_stock_value),
                |v| format!("Value: {}", fmt.format(v)),
            ),
            trend: Trend::Down,
            trend_text: Figure::resolve(None, sample.map(|s| s.low_stock_trend.as_str()), str::to_string),
        };

        let customers = StatCard {
            title: "Total Customers",
            value: Figure::resolve(
                summary.map(|s| s.total_customers),
                sample.map(|s| s.total_customers),
                |v| fmt.format_count(v),
            ),
            subtitle: Figure::resolve(
                summary
                    .filter(|s| s.total_customers > 0)
                    .map(|s| s.total_revenue / s.total_customers as f64),
                sample.map(|s| s.avg_customer_value),
                |v| format!("Avg: {}", fmt.format(v)),
            ),
            ..growth_trend(
                summary.and_then(|s| s.customers_growth),
                sample.map(|s| s.customers_trend.as_str()),
            )
        };

        Self {
            filters: state.filters,
            loading: state.loading,
            phase: state.phase,
            cards: vec![revenue, orders, low_stock, customers],
            cash_flow: cash_flow_series(state, sample),
            categories: category_series(state, sample),
        }
    }

    pub fn card(&self, title: &str) -> Option<&StatCard> {
        self.cards.iter().find(|card| card.title == title)
    }
}

/// Trend fields of a card; the rest is filled by the caller.
fn growth_trend(growth: Option<f64>, placeholder: Option<&str>) -> StatCard {
    let (trend, trend_text) = match (growth, placeholder) {
        (Some(g), _) => {
            let trend = if g < 0.0 { Trend::Down } else { Trend::Up };
            (
                trend,
                Figure {
                    text: Some(format_growth(g)),
                    provenance: Provenance::Live,
                },
            )
        }
        (None, Some(text)) => (Trend::Up, Figure::resolve(None, Some(text), str::to_string)),
        (None, None) => (Trend::Flat, Figure::missing()),
    };
    StatCard {
        title: "",
        value: Figure::missing(),
        subtitle: Figure::missing(),
        trend,
        trend_text,
    }
}

fn cash_flow_series(state: &DashboardState, sample: Option<&SampleValues>) -> Series<CashFlowPoint> {
    match (&state.financial, sample) {
        (Some(report), _) => Series {
            points: report.cash_flow.clone(),
            provenance: Provenance::Live,
        },
        (None, Some(sample)) => Series {
            points: sample.cash_flow.clone(),
            provenance: Provenance::Placeholder,
        },
        (None, None) => Series::missing(),
    }
}

fn category_series(state: &DashboardState, sample: Option<&SampleValues>) -> Series<CategorySlice> {
    match (&state.sales, sample) {
        (Some(report), _) => Series {
            points: category_slices(&report.by_category),
            provenance: Provenance::Live,
        },
        (None, Some(sample)) => Series {
            points: category_slices(&sample.categories),
            provenance: Provenance::Placeholder,
        },
        (None, None) => Series::missing(),
    }
}

/// Shares of total revenue with palette colours assigned in order.
pub fn category_slices(categories: &[CategorySales]) -> Vec<CategorySlice> {
    let total: f64 = categories.iter().map(|c| c.revenue).sum();
    categories
        .iter()
        .enumerate()
        .map(|(i, c)| CategorySlice {
            name: c.category.clone(),
            revenue: c.revenue,
            share: if total > 0.0 {
                (c.revenue / total * 100.0).round() as u32
            } else {
                0
            },
            color: PALETTE[i % PALETTE.len()],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder::{NoPlaceholders, SamplePlaceholders};
    use models::{
        FinancialReport, InventoryReport, InventorySnapshot, LowStockItem, ReportPeriod,
        SalesReport, SalesSummary,
    };

    fn empty_state() -> DashboardState {
        DashboardState::new(Filters::new(ReportPeriod::Monthly, 2025))
    }

    fn sales(revenue: f64, customers: u64, growth: Option<f64>) -> SalesReport {
        SalesReport {
            summary: SalesSummary {
                total_revenue: revenue,
                total_orders: 40,
                avg_order_value: revenue / 40.0,
                total_customers: customers,
                revenue_growth: growth,
                orders_growth: None,
                customers_growth: None,
            },
            by_category: vec![
                CategorySales {
                    category: "Taj Sheets".to_string(),
                    revenue: 300.0,
                },
                CategorySales {
                    category: "Hardware".to_string(),
                    revenue: 100.0,
                },
            ],
        }
    }

    #[test]
    fn no_placeholders_reports_everything_missing() {
        let view = DashboardView::render(&empty_state(), &NoPlaceholders, &CurrencyFormatter::default());
        for card in &view.cards {
            assert_eq!(card.value.provenance, Provenance::Missing, "{}", card.title);
            assert!(card.value.text.is_none());
            assert_eq!(card.trend_text.provenance, Provenance::Missing);
        }
        assert_eq!(view.cash_flow.provenance, Provenance::Missing);
        assert!(view.categories.points.is_empty());
        // fixed labels are not data
        assert_eq!(
            view.card("Revenue").unwrap().subtitle.provenance,
            Provenance::Static
        );
    }

    #[test]
    fn sample_placeholders_fill_empty_slots() {
        let view = DashboardView::render(
            &empty_state(),
            &SamplePlaceholders::default(),
            &CurrencyFormatter::default(),
        );
        let revenue = view.card("Revenue").unwrap();
        assert_eq!(revenue.value.text.as_deref(), Some("Rs 125,000"));
        assert_eq!(revenue.value.provenance, Provenance::Placeholder);
        assert_eq!(revenue.trend_text.text.as_deref(), Some("+12.5%"));

        let stock = view.card("Low Stock Items").unwrap();
        assert_eq!(stock.value.text.as_deref(), Some("15"));
        assert_eq!(stock.subtitle.text.as_deref(), Some("Value: Rs 75,000"));
        assert_eq!(stock.trend, Trend::Down);

        let customers = view.card("Total Customers").unwrap();
        assert_eq!(customers.subtitle.text.as_deref(), Some("Avg: Rs 5,200"));

        assert_eq!(view.cash_flow.provenance, Provenance::Placeholder);
        assert_eq!(view.cash_flow.points.len(), 6);
        assert_eq!(view.categories.points[0].color, "#3b82f6");
    }

    #[test]
    fn live_data_wins_over_placeholders() {
        let mut state = empty_state();
        state.sales = Some(sales(200_000.0, 50, Some(-4.0)));
        let view = DashboardView::render(&state, &SamplePlaceholders::default(), &CurrencyFormatter::default());

        let revenue = view.card("Revenue").unwrap();
        assert_eq!(revenue.value.text.as_deref(), Some("Rs 200,000"));
        assert!(revenue.value.is_live());
        assert_eq!(revenue.trend, Trend::Down);
        assert_eq!(revenue.trend_text.text.as_deref(), Some("-4.0%"));

        // no growth field: trend text falls back to the placeholder
        let orders = view.card("Orders").unwrap();
        assert!(orders.value.is_live());
        assert_eq!(orders.subtitle.text.as_deref(), Some("Avg: Rs 5,000"));
        assert_eq!(orders.trend_text.provenance, Provenance::Placeholder);

        let customers = view.card("Total Customers").unwrap();
        assert_eq!(customers.subtitle.text.as_deref(), Some("Avg: Rs 4,000"));
        assert!(customers.subtitle.is_live());

        // inventory slot is still empty
        let stock = view.card("Low Stock Items").unwrap();
        assert_eq!(stock.value.provenance, Provenance::Placeholder);
        assert_eq!(view.categories.provenance, Provenance::Live);
    }

    #[test]
    fn zero_customers_has_no_live_average() {
        let mut state = empty_state();
        state.sales = Some(sales(0.0, 0, None));
        let view = DashboardView::render(&state, &NoPlaceholders, &CurrencyFormatter::default());
        let customers = view.card("Total Customers").unwrap();
        assert_eq!(customers.value.text.as_deref(), Some("0"));
        assert_eq!(customers.subtitle.provenance, Provenance::Missing);
    }

    #[test]
    fn low_stock_value_falls_back_when_items_carry_none() {
        let mut state = empty_state();
        state.inventory = Some(InventoryReport {
            inventory_report: InventorySnapshot {
                low_stock_items: vec![LowStockItem {
                    id: 1,
                    name: "Hinge".to_string(),
                    stock: 3,
                    reorder_level: Some(10),
                    value: None,
                }],
                ..Default::default()
            },
        });
        let view = DashboardView::render(&state, &SamplePlaceholders::default(), &CurrencyFormatter::default());
        let stock = view.card("Low Stock Items").unwrap();
        assert_eq!(stock.value.text.as_deref(), Some("1"));
        assert!(stock.value.is_live());
        assert_eq!(stock.subtitle.provenance, Provenance::Placeholder);
    }

    #[test]
    fn live_cash_flow_is_used_even_when_empty() {
        let mut state = empty_state();
        state.financial = Some(FinancialReport {
            period: ReportPeriod::Monthly,
            year: 2025,
            revenue: 0.0,
            expenses: 0.0,
            profit: 0.0,
            cash_flow: Vec::new(),
        });
        let view = DashboardView::render(&state, &SamplePlaceholders::default(), &CurrencyFormatter::default());
        assert_eq!(view.cash_flow.provenance, Provenance::Live);
        assert!(view.cash_flow.points.is_empty());
    }

    #[test]
    fn category_shares_and_palette_cycle() {
        let categories: Vec<CategorySales> = (0..7)
            .map(|i| CategorySales {
                category: format!("C{i}"),
                revenue: if i == 0 { 400.0 } else { 100.0 },
            })
            .collect();
        let slices = category_slices(&categories);
        assert_eq!(slices[0].share, 40);
        assert_eq!(slices[1].share, 10);
        assert_eq!(slices[5].color, "#ec4899");
        assert_eq!(slices[6].color, PALETTE[0]);
    }

    #[test]
    fn zero_revenue_categories_share_nothing() {
        let slices = category_slices(&[CategorySales {
            category: "Empty".to_string(),
            revenue: 0.0,
        }]);
        assert_eq!(slices[0].share, 0);
    }
}
