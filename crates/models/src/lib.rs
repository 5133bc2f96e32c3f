//! Wire and presentation-independent data model shared by the finance client,
//! the dashboard engine and the mock backend.
//!
//! All JSON field names are camelCase on the wire.

pub mod envelope;
pub mod finance;
pub mod period;
pub mod reports;
pub mod settings;
pub mod validate;

pub use envelope::{Envelope, Rejected};
pub use finance::*;
pub use period::{OverviewPeriod, ParsePeriodError, ReportPeriod};
pub use reports::*;
pub use settings::{
	ApiSettings, DEFAULT_BASE_URL, DashboardSettings, DisplaySettings, Grouping, Settings,
};
pub use validate::{BALANCE_TOLERANCE, Validate, ValidationError};
