use std::fmt;

use chrono::{Datelike, Local};
use models::{DashboardSettings, FinancialReport, InventoryReport, ReportPeriod, SalesReport};
use serde::Serialize;

/// The user-selected report filters. Changing either triggers a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Filters {
    pub period: ReportPeriod,
    pub year: i32,
}

impl Filters {
    pub fn new(period: ReportPeriod, year: i32) -> Self {
        Self { period, year }
    }

    /// Monthly reports for the current calendar year.
    pub fn current() -> Self {
        Self::new(ReportPeriod::default(), Local::now().year())
    }

    pub fn from_settings(settings: &DashboardSettings) -> Self {
        Self::new(
            settings.initial_period,
            settings.initial_year.unwrap_or_else(|| Local::now().year()),
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchPhase {
    #[default]
    Idle,
    Loading,
    /// Every request of the latest batch reached the server.
    Settled,
    /// The latest batch hit at least one transport error.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Sales,
    Inventory,
    Financial,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Slot::Sales => "sales",
            Slot::Inventory => "inventory",
            Slot::Financial => "financial",
        })
    }
}

/// Filters, the three report slots and the loading gate.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub filters: Filters,
    pub sales: Option<SalesReport>,
    pub inventory: Option<InventoryReport>,
    pub financial: Option<FinancialReport>,
    pub loading: bool,
    pub phase: BatchPhase,
}

impl DashboardState {
    pub fn new(filters: Filters) -> Self {
        Self {
            filters,
            sales: None,
            inventory: None,
            financial: None,
            loading: false,
            phase: BatchPhase::Idle,
        }
    }
}

/// What one request of a batch did to its slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotOutcome {
    Updated,
    /// `success: false`; the slot keeps its value.
    Unchanged,
    /// Transport error; the slot keeps its value.
    Failed(String),
    /// The batch was superseded before it settled.
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    Settled,
    Failed,
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub sequence: u64,
    pub filters: Filters,
    pub outcome: BatchOutcome,
    pub sales: SlotOutcome,
    pub inventory: SlotOutcome,
    pub financial: SlotOutcome,
}

impl BatchReport {
    pub fn failures(&self) -> usize {
        [&self.sales, &self.inventory, &self.financial]
            .into_iter()
            .filter(|outcome| matches!(outcome, SlotOutcome::Failed(_)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_from_settings_use_the_configured_year() {
        let settings = DashboardSettings {
            initial_period: ReportPeriod::Yearly,
            initial_year: Some(2024),
            placeholders: true,
        };
        assert_eq!(
            Filters::from_settings(&settings),
            Filters::new(ReportPeriod::Yearly, 2024)
        );
    }

    #[test]
    fn filters_default_to_this_year() {
        let filters = Filters::from_settings(&DashboardSettings::default());
        assert_eq!(filters.year, Local::now().year());
        assert_eq!(filters.period, ReportPeriod::Monthly);
    }

    #[test]
    fn new_state_is_idle_and_empty() {
        let state = DashboardState::new(Filters::current());
        assert_eq!(state.phase, BatchPhase::Idle);
        assert!(!state.loading);
        assert!(state.sales.is_none() && state.inventory.is_none() && state.financial.is_none());
    }
}
