use serde::{Deserialize, Serialize};
use std::fmt;

/// Ranking direction for top/bottom company sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankDirection {
    /// Highest mean close first
    Top,
    /// Lowest mean close first
    Bottom,
}

impl RankDirection {
    /// Parse a user-supplied direction string
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "top" | "desc" => Some(RankDirection::Top),
            "bottom" | "asc" => Some(RankDirection::Bottom),
            _ => None,
        }
    }
}

impl Default for RankDirection {
    fn default() -> Self {
        RankDirection::Top
    }
}

impl fmt::Display for RankDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankDirection::Top => write!(f, "top"),
            RankDirection::Bottom => write!(f, "bottom"),
        }
    }
}

/// Mean closing price for one brand, with its position in the ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandAggregate {
    pub brand_name: String,
    pub mean_close: f64,
    /// 1-based position within the ranking direction
    pub rank: usize,
}

/// An ordered top-K or bottom-K company ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedBrands {
    pub direction: RankDirection,
    pub brands: Vec<BrandAggregate>,
}

impl RankedBrands {
    pub fn len(&self) -> usize {
        self.brands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brands.is_empty()
    }

    /// Brand names in ranking order
    pub fn brand_names(&self) -> Vec<String> {
        self.brands.iter().map(|b| b.brand_name.clone()).collect()
    }
}
