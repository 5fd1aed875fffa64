use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::StockRecord;

/// The active month/industry constraint applied before aggregation
///
/// `None` means "all" for either dimension. A selection is immutable per
/// render cycle: it is rebuilt from user input on every interaction and both
/// filters apply conjunctively.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterSelection {
    /// Calendar month (1-12), or `None` for all months
    pub month: Option<u32>,

    /// Industry tag, or `None` for all industries
    pub industry: Option<String>,
}

impl FilterSelection {
    /// Selection that matches every record
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a validated selection. Month must be a calendar month.
    pub fn new(month: Option<u32>, industry: Option<String>) -> Result<Self> {
        if let Some(m) = month {
            if !(1..=12).contains(&m) {
                return Err(AppError::Config(format!(
                    "Invalid month filter: {} (expected 1-12)",
                    m
                )));
            }
        }
        Ok(Self { month, industry })
    }

    /// Parse user-supplied filter values, treating "all" (any case) and
    /// missing values as unfiltered.
    pub fn parse(month: Option<&str>, industry: Option<&str>) -> Result<Self> {
        let month = match month {
            None => None,
            Some(m) if m.eq_ignore_ascii_case("all") => None,
            Some(m) => Some(m.parse::<u32>().map_err(|_| {
                AppError::Config(format!("Invalid month filter: '{}' (expected 1-12 or 'all')", m))
            })?),
        };
        let industry = match industry {
            None => None,
            Some(i) if i.eq_ignore_ascii_case("all") => None,
            Some(i) => Some(i.to_string()),
        };
        Self::new(month, industry)
    }

    /// True when both dimensions are unfiltered
    pub fn is_unfiltered(&self) -> bool {
        self.month.is_none() && self.industry.is_none()
    }

    /// True when the record passes both filters
    pub fn matches(&self, record: &StockRecord) -> bool {
        if let Some(month) = self.month {
            if record.month != month {
                return false;
            }
        }
        if let Some(industry) = &self.industry {
            if &record.industry_tag != industry {
                return false;
            }
        }
        true
    }

    /// Display label for the month dimension, e.g. in download filenames
    pub fn month_label(&self) -> String {
        match self.month {
            Some(m) => m.to_string(),
            None => "all".to_string(),
        }
    }

    /// Display label for the industry dimension
    pub fn industry_label(&self) -> String {
        match &self.industry {
            Some(i) => i.clone(),
            None => "all".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_keywords() {
        let sel = FilterSelection::parse(Some("all"), Some("All")).unwrap();
        assert!(sel.is_unfiltered());

        let sel = FilterSelection::parse(None, None).unwrap();
        assert!(sel.is_unfiltered());
    }

    #[test]
    fn test_parse_month() {
        let sel = FilterSelection::parse(Some("6"), Some("Tech")).unwrap();
        assert_eq!(sel.month, Some(6));
        assert_eq!(sel.industry.as_deref(), Some("Tech"));
    }

    #[test]
    fn test_invalid_month_is_config_error() {
        assert!(matches!(
            FilterSelection::parse(Some("13"), None),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            FilterSelection::parse(Some("june"), None),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            FilterSelection::new(Some(0), None),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_labels() {
        let sel = FilterSelection::new(Some(6), Some("Tech".to_string())).unwrap();
        assert_eq!(sel.month_label(), "6");
        assert_eq!(sel.industry_label(), "Tech");
        assert_eq!(FilterSelection::all().month_label(), "all");
    }
}
