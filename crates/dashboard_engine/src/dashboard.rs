use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use finance_client::ClientError;
use models::{Envelope, ReportPeriod, Settings};
use tokio::sync::RwLock;

use crate::format::CurrencyFormatter;
use crate::notify::{LogNotifier, Notification, Notifier};
use crate::placeholder::{NoPlaceholders, PlaceholderProvider, SamplePlaceholders};
use crate::source::ReportsSource;
use crate::state::{
    BatchOutcome, BatchPhase, BatchReport, DashboardState, Filters, Slot, SlotOutcome,
};
use crate::view::DashboardView;

/// Owns the report filters and slots and runs fetch batches against a source.
///
/// Batches are numbered at dispatch. A batch that settles after a newer one
/// was dispatched is dropped without touching state or the loading gate.
pub struct Dashboard {
    source: Arc<dyn ReportsSource>,
    notifier: Arc<dyn Notifier>,
    placeholders: Arc<dyn PlaceholderProvider>,
    formatter: CurrencyFormatter,
    state: RwLock<DashboardState>,
    dispatched: AtomicU64,
}

impl Dashboard {
    pub fn new(source: Arc<dyn ReportsSource>, filters: Filters) -> Self {
        Self {
            source,
            notifier: Arc::new(LogNotifier),
            placeholders: Arc::new(SamplePlaceholders::default()),
            formatter: CurrencyFormatter::default(),
            state: RwLock::new(DashboardState::new(filters)),
            dispatched: AtomicU64::new(0),
        }
    }

    /// Filters, placeholders and formatting taken from settings.
    pub fn from_settings(source: Arc<dyn ReportsSource>, settings: &Settings) -> Self {
        let placeholders: Arc<dyn PlaceholderProvider> = if settings.dashboard.placeholders {
            Arc::new(SamplePlaceholders::default())
        } else {
            Arc::new(NoPlaceholders)
        };
        Self::new(source, Filters::from_settings(&settings.dashboard))
            .with_placeholders(placeholders)
            .with_formatter(CurrencyFormatter::from_settings(&settings.display))
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_placeholders(mut self, placeholders: Arc<dyn PlaceholderProvider>) -> Self {
        self.placeholders = placeholders;
        self
    }

    pub fn with_formatter(mut self, formatter: CurrencyFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn formatter(&self) -> &CurrencyFormatter {
        &self.formatter
    }

    /// Initial load.
    pub async fn mount(&self) -> BatchReport {
        self.refresh().await
    }

    /// Re-runs the batch for the current filters.
    pub async fn refresh(&self) -> BatchReport {
        let (sequence, filters) = {
            let mut state = self.state.write().await;
            let filters = state.filters;
            (self.begin(&mut state), filters)
        };
        self.run_batch(sequence, filters).await
    }

    /// Returns `None` without fetching when `period` is already selected.
    pub async fn set_period(&self, period: ReportPeriod) -> Option<BatchReport> {
        self.change_filters(|filters| filters.period = period).await
    }

    /// Returns `None` without fetching when `year` is already selected.
    pub async fn set_year(&self, year: i32) -> Option<BatchReport> {
        self.change_filters(|filters| filters.year = year).await
    }

    pub async fn state(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    pub async fn filters(&self) -> Filters {
        self.state.read().await.filters
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    /// Number of batches started so far; also the latest sequence number.
    pub fn batches_dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::SeqCst)
    }

    pub async fn view(&self) -> DashboardView {
        let state = self.state.read().await;
        DashboardView::render(&state, self.placeholders.as_ref(), &self.formatter)
    }

    async fn change_filters(&self, apply: impl FnOnce(&mut Filters)) -> Option<BatchReport> {
        let (sequence, filters) = {
            let mut state = self.state.write().await;
            let mut next = state.filters;
            apply(&mut next);
            if next == state.filters {
                tracing::debug!(?next, "filters unchanged, no batch");
                return None;
            }
            state.filters = next;
            (self.begin(&mut state), next)
        };
        Some(self.run_batch(sequence, filters).await)
    }

    /// Enters `Loading` and hands out the next sequence number. Callers hold
    /// the state lock, so numbering follows dispatch order.
    fn begin(&self, state: &mut DashboardState) -> u64 {
        state.loading = true;
        state.phase = BatchPhase::Loading;
        self.dispatched.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn run_batch(&self, sequence: u64, filters: Filters) -> BatchReport {
        tracing::debug!(sequence, ?filters, "dispatching reports batch");

        let (sales, inventory, financial) = tokio::join!(
            self.source.sales_report(filters.period),
            self.source.inventory_report(),
            self.source.financial_report(filters.period, filters.year),
        );

        let mut state = self.state.write().await;
        let latest = self.dispatched.load(Ordering::SeqCst);
        if sequence != latest {
            drop(state);
            tracing::debug!(sequence, latest, "discarding stale reports batch");
            for (slot, err) in [
                (Slot::Sales, sales.err()),
                (Slot::Inventory, inventory.err()),
                (Slot::Financial, financial.err()),
            ] {
                if let Some(err) = err {
                    tracing::warn!(sequence, %slot, error = %err, "stale batch request failed");
                }
            }
            return BatchReport {
                sequence,
                filters,
                outcome: BatchOutcome::Superseded,
                sales: SlotOutcome::Discarded,
                inventory: SlotOutcome::Discarded,
                financial: SlotOutcome::Discarded,
            };
        }

        let report = BatchReport {
            sequence,
            filters,
            outcome: BatchOutcome::Settled,
            sales: apply_result(&mut state.sales, Slot::Sales, sales),
            inventory: apply_result(&mut state.inventory, Slot::Inventory, inventory),
            financial: apply_result(&mut state.financial, Slot::Financial, financial),
        };
        let failed = report.failures() > 0;
        state.loading = false;
        state.phase = if failed {
            BatchPhase::Failed
        } else {
            BatchPhase::Settled
        };
        drop(state);

        if failed {
            self.notifier.notify(Notification::load_failed());
            return BatchReport {
                outcome: BatchOutcome::Failed,
                ..report
            };
        }
        tracing::debug!(sequence, "reports batch settled");
        report
    }
}

/// Replaces the slot only on `success: true` with data.
fn apply_result<T>(
    slot: &mut Option<T>,
    name: Slot,
    result: Result<Envelope<T>, ClientError>,
) -> SlotOutcome {
    match result {
        Ok(envelope) => {
            let message = envelope.message.clone();
            match envelope.accepted() {
                Some(data) => {
                    *slot = Some(data);
                    SlotOutcome::Updated
                }
                None => {
                    tracing::debug!(slot = %name, ?message, "report not successful, keeping previous value");
                    SlotOutcome::Unchanged
                }
            }
        }
        Err(err) => {
            tracing::error!(slot = %name, status = err.status(), error = %err, "Failed to fetch reports data");
            SlotOutcome::Failed(err.to_string())
        }
    }
}
