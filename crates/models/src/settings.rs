use serde::{Deserialize, Serialize};

use crate::period::ReportPeriod;

pub const DEFAULT_BASE_URL: &str = "https://zaidawn.site/wp-json/ims/v1";

/// Digit grouping used when rendering currency amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
	/// 1,234,567
	#[default]
	Thousands,
	/// 12,34,567 (lakh/crore)
	Indian,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
	pub base_url: String,
	/// Unset means the transport's own behaviour governs hangs.
	pub request_timeout_secs: Option<u64>,
}

impl Default for ApiSettings {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_BASE_URL.to_string(),
			request_timeout_secs: None,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
	pub currency_symbol: String,
	pub grouping: Grouping,
	pub group_separator: char,
}

impl Default for DisplaySettings {
	fn default() -> Self {
		Self {
			currency_symbol: "Rs".to_string(),
			grouping: Grouping::Thousands,
			group_separator: ',',
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
	pub initial_period: ReportPeriod,
	/// Defaults to the current calendar year when unset.
	pub initial_year: Option<i32>,
	/// Show illustrative sample values while a slot has no data.
	pub placeholders: bool,
}

impl Default for DashboardSettings {
	fn default() -> Self {
		Self {
			initial_period: ReportPeriod::Monthly,
			initial_year: None,
			placeholders: true,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	pub settings_version: u32,
	pub api: ApiSettings,
	pub display: DisplaySettings,
	pub dashboard: DashboardSettings,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			settings_version: 1,
			api: ApiSettings::default(),
			display: DisplaySettings::default(),
			dashboard: DashboardSettings::default(),
		}
	}
}
