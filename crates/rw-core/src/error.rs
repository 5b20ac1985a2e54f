//! Error types for RaffleWheel
//!
//! Every variant is a validation failure. `Display` yields the exact message
//! shown next to the panel that triggered it.

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RwError {
    #[error("Min and max must be integers.")]
    NonIntegerRange,

    #[error("Min must be less than or equal to max.")]
    InvertedRange,

    #[error("Range must contain at least {min} numbers to spin.")]
    RangeTooSmall { min: usize },

    #[error("Range is too large. Maximum is {max} items.")]
    RangeTooLarge { max: usize },

    #[error("Enter at least {min} options (one per line).")]
    TooFewOptions { min: usize },

    #[error("Enter at least {min} distinct options.")]
    TooFewDistinctOptions { min: usize },

    #[error("Too many options. Maximum is {max}.")]
    TooManyOptions { max: usize },

    #[error("No numbers left. Reset Number Mode to continue.")]
    PoolIneligible,

    #[error("All numbers have been drawn. Reset Number Mode to continue.")]
    PoolExhausted,

    #[error("Number {0} is not in the pool.")]
    NotInPool(i64),

    #[error("Wheel is still moving")]
    Busy,

    #[error("Invalid config: {0}")]
    Config(String),
}

impl RwError {
    /// True for failures caused by the numeric range inputs
    pub fn is_range_error(&self) -> bool {
        matches!(
            self,
            Self::NonIntegerRange
                | Self::InvertedRange
                | Self::RangeTooSmall { .. }
                | Self::RangeTooLarge { .. }
        )
    }
}

impl From<serde_json::Error> for RwError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}

/// Result type alias
pub type RwResult<T> = Result<T, RwError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_panel_text() {
        assert_eq!(
            RwError::RangeTooLarge { max: 500 }.to_string(),
            "Range is too large. Maximum is 500 items."
        );
        assert_eq!(
            RwError::RangeTooSmall { min: 2 }.to_string(),
            "Range must contain at least 2 numbers to spin."
        );
        assert_eq!(
            RwError::TooFewDistinctOptions { min: 2 }.to_string(),
            "Enter at least 2 distinct options."
        );
    }

    #[test]
    fn test_range_error_classification() {
        assert!(RwError::InvertedRange.is_range_error());
        assert!(!RwError::PoolExhausted.is_range_error());
    }
}
