use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown period '{value}' (expected one of: {expected})")]
pub struct ParsePeriodError {
	pub value: String,
	pub expected: &'static str,
}

/// Period accepted by the finance overview endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverviewPeriod {
	Today,
	Week,
	#[default]
	Month,
	Year,
}

impl OverviewPeriod {
	pub const ALL: [OverviewPeriod; 4] = [Self::Today, Self::Week, Self::Month, Self::Year];

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Today => "today",
			Self::Week => "week",
			Self::Month => "month",
			Self::Year => "year",
		}
	}
}

/// Period selected on the dashboard and forwarded to the reports endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
	Daily,
	Weekly,
	#[default]
	Monthly,
	Yearly,
}

impl ReportPeriod {
	pub const ALL: [ReportPeriod; 4] = [Self::Daily, Self::Weekly, Self::Monthly, Self::Yearly];

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Daily => "daily",
			Self::Weekly => "weekly",
			Self::Monthly => "monthly",
			Self::Yearly => "yearly",
		}
	}
}

impl fmt::Display for OverviewPeriod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl fmt::Display for ReportPeriod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for OverviewPeriod {
	type Err = ParsePeriodError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
			.ok_or_else(|| ParsePeriodError {
				value: s.to_string(),
				expected: "today, week, month, year",
			})
	}
}

impl FromStr for ReportPeriod {
	type Err = ParsePeriodError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
			.ok_or_else(|| ParsePeriodError {
				value: s.to_string(),
				expected: "daily, weekly, monthly, yearly",
			})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_backend_defaults() {
		assert_eq!(OverviewPeriod::default(), OverviewPeriod::Month);
		assert_eq!(ReportPeriod::default(), ReportPeriod::Monthly);
	}

	#[test]
	fn parse_is_case_insensitive() {
		assert_eq!("Yearly".parse::<ReportPeriod>(), Ok(ReportPeriod::Yearly));
		assert_eq!(" week ".parse::<OverviewPeriod>(), Ok(OverviewPeriod::Week));
		assert!("monthly".parse::<OverviewPeriod>().is_err());
	}

	#[test]
	fn serde_uses_lowercase_names() {
		assert_eq!(
			serde_json::to_string(&ReportPeriod::Weekly).unwrap(),
			"\"weekly\""
		);
		for p in OverviewPeriod::ALL {
			assert_eq!(serde_json::to_string(&p).unwrap(), format!("\"{p}\""));
		}
	}
}
