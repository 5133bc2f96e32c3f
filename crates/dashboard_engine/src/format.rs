use models::{DisplaySettings, Grouping};

/// Formats every amount the dashboard displays.
///
/// Amounts are rounded half away from zero to whole units and grouped per the
/// configured scheme: `Rs 125,000`, or `Rs 1,25,00,000` with Indian grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyFormatter {
    symbol: String,
    grouping: Grouping,
    separator: char,
}

impl Default for CurrencyFormatter {
    fn default() -> Self {
        Self::from_settings(&DisplaySettings::default())
    }
}

impl CurrencyFormatter {
    pub fn new(symbol: impl Into<String>, grouping: Grouping, separator: char) -> Self {
        Self {
            symbol: symbol.into(),
            grouping,
            separator,
        }
    }

    pub fn from_settings(display: &DisplaySettings) -> Self {
        Self::new(
            display.currency_symbol.clone(),
            display.grouping,
            display.group_separator,
        )
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn format(&self, amount: f64) -> String {
        if !amount.is_finite() {
            return format!("{} -", self.symbol);
        }
        let rounded = amount.round();
        let digits = self.group(&format!("{:.0}", rounded.abs()));
        // -0.0 is not below zero, so tiny negatives print unsigned
        if rounded < 0.0 {
            format!("-{} {}", self.symbol, digits)
        } else {
            format!("{} {}", self.symbol, digits)
        }
    }

    /// Plain counts, grouped the same way but without a symbol.
    pub fn format_count(&self, count: u64) -> String {
        self.group(&count.to_string())
    }

    fn group(&self, digits: &str) -> String {
        if digits.len() <= 3 {
            return digits.to_string();
        }
        let (head, tail) = digits.split_at(digits.len() - 3);
        let step = match self.grouping {
            Grouping::Thousands => 3,
            Grouping::Indian => 2,
        };

        let mut groups = Vec::new();
        let mut end = head.len();
        while end > 0 {
            let start = end.saturating_sub(step);
            groups.push(&head[start..end]);
            end = start;
        }
        groups.reverse();
        groups.push(tail);
        groups.join(&self.separator.to_string())
    }
}

/// Chart axis label: thousands with no decimals, e.g. `85k`.
pub fn format_axis_tick(value: f64) -> String {
    format!("{:.0}k", value / 1000.0)
}

/// Signed growth percentage with one decimal, e.g. `+12.5%`.
pub fn format_growth(percent: f64) -> String {
    format!("{percent:+.1}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_formatting_has_no_fraction_digits() {
        let fmt = CurrencyFormatter::default();
        assert_eq!(fmt.format(125_000.0), "Rs 125,000");
        assert_eq!(fmt.format(125_000.49), "Rs 125,000");
        assert_eq!(fmt.format(999.5), "Rs 1,000");
        assert_eq!(fmt.format(0.0), "Rs 0");
    }

    #[test]
    fn negative_amounts_lead_with_the_sign() {
        let fmt = CurrencyFormatter::default();
        assert_eq!(fmt.format(-5_000.0), "-Rs 5,000");
        assert_eq!(fmt.format(-2.5), "-Rs 3");
        assert_eq!(fmt.format(-0.4), "Rs 0");
    }

    #[test]
    fn indian_grouping() {
        let fmt = CurrencyFormatter::new("PKR", Grouping::Indian, ',');
        assert_eq!(fmt.format(12_500_000.0), "PKR 1,25,00,000");
        assert_eq!(fmt.format(125_000.0), "PKR 1,25,000");
        assert_eq!(fmt.format(950.0), "PKR 950");
    }

    #[test]
    fn custom_separator_and_counts() {
        let fmt = CurrencyFormatter::new("€", Grouping::Thousands, '.');
        assert_eq!(fmt.format(1_234_567.0), "€ 1.234.567");
        assert_eq!(fmt.format_count(1_250), "1.250");
        assert_eq!(fmt.format_count(25), "25");
    }

    #[test]
    fn every_display_setting_reaches_the_formatter() {
        let display: DisplaySettings = serde_json::from_str(
            r#"{"currency_symbol": "PKR", "grouping": "indian", "group_separator": " "}"#,
        )
        .unwrap();
        let fmt = CurrencyFormatter::from_settings(&display);
        assert_eq!(fmt.symbol(), "PKR");
        assert_eq!(fmt.format(1_250_000.0), "PKR 12 50 000");
    }

    #[test]
    fn non_finite_amounts_do_not_panic() {
        let fmt = CurrencyFormatter::default();
        assert_eq!(fmt.format(f64::NAN), "Rs -");
    }

    #[test]
    fn axis_ticks_and_growth() {
        assert_eq!(format_axis_tick(85_000.0), "85k");
        assert_eq!(format_axis_tick(0.0), "0k");
        assert_eq!(format_growth(12.5), "+12.5%");
        assert_eq!(format_growth(-3.0), "-3.0%");
    }
}
