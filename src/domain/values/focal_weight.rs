use serde::{Deserialize, Serialize};
use std::fmt;

/// Fraction of a combined query embedding attributable to the highlighted
/// text, with the remainder going to its surrounding context.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocalWeight(f64);

impl FocalWeight {
    /// Weight for link suggestions, where the literal highlighted text
    /// should dominate.
    pub const LINK: FocalWeight = FocalWeight(0.8);

    /// Weight that ignores context entirely (entity mention lookups).
    pub const EXACT: FocalWeight = FocalWeight(1.0);

    pub fn new(value: f64) -> Result<Self, String> {
        if !(0.0..=1.0).contains(&value) {
            return Err(format!(
                "Focal weight must be between 0.0 and 1.0, got {value}"
            ));
        }
        Ok(FocalWeight(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for FocalWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Default for FocalWeight {
    fn default() -> Self {
        FocalWeight(0.7)
    }
}
