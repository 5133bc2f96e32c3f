//! Reports dashboard: filter state, concurrent report batches and the derived view.
//!
//! A [`Dashboard`] fetches sales, inventory and financial reports together
//! whenever its filters change, keeps the last good value of each report and
//! renders a [`DashboardView`] with every amount formatted by one
//! [`CurrencyFormatter`].

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;

mod dashboard;
mod format;
mod notify;
mod placeholder;
mod source;
mod state;
mod view;

pub use dashboard::Dashboard;
pub use format::{format_axis_tick, format_growth, CurrencyFormatter};
pub use notify::{LogNotifier, Notification, Notifier};
pub use placeholder::{NoPlaceholders, PlaceholderProvider, SamplePlaceholders, SampleValues};
pub use source::ReportsSource;
pub use state::{
    BatchOutcome, BatchPhase, BatchReport, DashboardState, Filters, Slot, SlotOutcome,
};
pub use view::{
    category_slices, CategorySlice, DashboardView, Figure, Provenance, Series, StatCard, Trend,
    PALETTE,
};

#[derive(Debug, Serialize)]
pub struct DashboardMetadata {
    pub generated_at: String,
    pub settings_version: u32,
}

/// A rendered view plus when it was produced, as written to disk.
#[derive(Debug, Serialize)]
pub struct DashboardExport {
    pub metadata: DashboardMetadata,
    pub view: DashboardView,
}

impl DashboardExport {
    pub fn new(view: DashboardView, settings_version: u32) -> Self {
        Self {
            metadata: DashboardMetadata {
                generated_at: Local::now().to_rfc3339(),
                settings_version,
            },
            view,
        }
    }
}

pub fn write_dashboard_json(export: &DashboardExport, out_path: &Path) -> Result<()> {
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Creating {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(export)?;
    std::fs::write(out_path, json).with_context(|| format!("Writing {}", out_path.display()))?;
    Ok(())
}
