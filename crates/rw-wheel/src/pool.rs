//! Pool management
//!
//! Number mode draws without replacement: each stop removes the winner and
//! appends it to the history. Text mode never removes anything; the scratch
//! card re-samples the full option list on every reset.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use rw_core::{PoolLimits, RwError, RwResult};

/// Largest magnitude accepted as an exact integer bound (2^53)
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Parse a raw form value. Blank or unparseable input becomes NaN and fails
/// validation as a non-integer. Whole numbers beyond 2^53 (`1e300`) are
/// not exact integers either and fail the same way, never as too large.
pub fn parse_bound(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Validated inclusive integer range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberRange {
    pub min: i64,
    pub max: i64,
}

impl NumberRange {
    /// Validate numeric bounds against the pool limits
    pub fn validate(min: f64, max: f64, limits: &PoolLimits) -> RwResult<Self> {
        let is_integer = |v: f64| v.is_finite() && v.fract() == 0.0 && v.abs() <= MAX_EXACT_INTEGER;
        if !is_integer(min) || !is_integer(max) {
            return Err(RwError::NonIntegerRange);
        }
        if min > max {
            return Err(RwError::InvertedRange);
        }

        let count = max - min + 1.0;
        if count < limits.min_items as f64 {
            return Err(RwError::RangeTooSmall {
                min: limits.min_items,
            });
        }
        if count > limits.max_items as f64 {
            return Err(RwError::RangeTooLarge {
                max: limits.max_items,
            });
        }

        Ok(Self {
            min: min as i64,
            max: max as i64,
        })
    }

    /// Validate raw form strings
    pub fn parse(min_raw: &str, max_raw: &str, limits: &PoolLimits) -> RwResult<Self> {
        Self::validate(parse_bound(min_raw), parse_bound(max_raw), limits)
    }

    /// Number of values in the range
    pub fn len(&self) -> usize {
        (self.max - self.min + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.max < self.min
    }

    /// Ascending values `min..=max`
    pub fn values(&self) -> Vec<i64> {
        (self.min..=self.max).collect()
    }
}

impl Default for NumberRange {
    fn default() -> Self {
        Self { min: 0, max: 100 }
    }
}

/// Number pool with its removal history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberPool {
    range: NumberRange,
    items: Vec<i64>,
    removed: Vec<i64>,
}

impl NumberPool {
    pub fn new(range: NumberRange) -> Self {
        Self {
            range,
            items: range.values(),
            removed: Vec::new(),
        }
    }

    pub fn range(&self) -> NumberRange {
        self.range
    }

    /// Values still in play, ascending
    pub fn items(&self) -> &[i64] {
        &self.items
    }

    /// Drawn values in draw order
    pub fn removed(&self) -> &[i64] {
        &self.removed
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Result of removing a drawn number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    /// Value removed, `remaining` left in the pool
    Drawn { value: i64, remaining: usize },
    /// Value removed and the pool is now empty
    Exhausted { value: i64 },
}

impl DrawOutcome {
    pub fn value(&self) -> i64 {
        match *self {
            Self::Drawn { value, .. } | Self::Exhausted { value } => value,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }
}

/// De-duplicated-check, trimmed, non-empty text options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextOptions {
    options: Vec<String>,
}

impl TextOptions {
    /// Split on line breaks, trim, drop blank lines and validate.
    /// Duplicates are kept; only the distinct count is checked.
    pub fn parse(raw: &str, limits: &PoolLimits) -> RwResult<Self> {
        let lines: Vec<String> = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();

        if lines.len() < limits.min_items {
            return Err(RwError::TooFewOptions {
                min: limits.min_items,
            });
        }

        let distinct: HashSet<&str> = lines.iter().map(String::as_str).collect();
        if distinct.len() < limits.min_items {
            return Err(RwError::TooFewDistinctOptions {
                min: limits.min_items,
            });
        }

        if lines.len() > limits.max_items {
            return Err(RwError::TooManyOptions {
                max: limits.max_items,
            });
        }

        Ok(Self { options: lines })
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// One wheel segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WheelItem {
    Number(i64),
    Text(String),
}

impl WheelItem {
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for WheelItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Owns the number pool and the text options
#[derive(Debug, Clone)]
pub struct PoolManager {
    limits: PoolLimits,
    number: Option<NumberPool>,
    text: Option<TextOptions>,
}

impl PoolManager {
    pub fn new(limits: PoolLimits) -> Self {
        Self {
            limits,
            number: None,
            text: None,
        }
    }

    pub fn limits(&self) -> &PoolLimits {
        &self.limits
    }

    /// Replace the number pool and clear history. On failure the previous
    /// pool is untouched.
    pub fn build_pool(&mut self, min: f64, max: f64) -> RwResult<&NumberPool> {
        let range = NumberRange::validate(min, max, &self.limits).inspect_err(|e| {
            log::warn!("range {}..={} rejected: {}", min, max, e);
        })?;
        log::debug!("number pool built: {}..={} ({} items)", range.min, range.max, range.len());
        Ok(&*self.number.insert(NumberPool::new(range)))
    }

    /// Replace the text options. On failure the previous options are untouched.
    pub fn apply_text_options(&mut self, raw: &str) -> RwResult<&TextOptions> {
        let options = TextOptions::parse(raw, &self.limits).inspect_err(|e| {
            log::warn!("text options rejected: {}", e);
        })?;
        log::debug!("text options applied: {} entries", options.len());
        Ok(&*self.text.insert(options))
    }

    /// Remove a drawn value and record it in the history
    pub fn draw_and_remove(&mut self, value: i64) -> RwResult<DrawOutcome> {
        let pool = self.number.as_mut().ok_or(RwError::NotInPool(value))?;
        let position = pool
            .items
            .iter()
            .position(|&n| n == value)
            .ok_or(RwError::NotInPool(value))?;

        pool.items.remove(position);
        pool.removed.push(value);

        if pool.items.is_empty() {
            log::info!("number pool exhausted after {} draws", pool.removed.len());
            Ok(DrawOutcome::Exhausted { value })
        } else {
            Ok(DrawOutcome::Drawn {
                value,
                remaining: pool.items.len(),
            })
        }
    }

    /// Rebuild from the last applied range and clear history.
    /// Returns false when no range was ever applied.
    pub fn reset(&mut self) -> bool {
        match self.number.as_mut() {
            Some(pool) => {
                *pool = NumberPool::new(pool.range);
                log::debug!("number pool reset to {} items", pool.len());
                true
            }
            None => false,
        }
    }

    /// Drop the text options
    pub fn clear_text(&mut self) {
        self.text = None;
    }

    pub fn number_pool(&self) -> Option<&NumberPool> {
        self.number.as_ref()
    }

    pub fn text_options(&self) -> Option<&TextOptions> {
        self.text.as_ref()
    }

    /// Numbers still in play (empty before the first valid range)
    pub fn number_items(&self) -> &[i64] {
        self.number.as_ref().map(NumberPool::items).unwrap_or(&[])
    }

    /// Drawn numbers in draw order
    pub fn removed(&self) -> &[i64] {
        self.number.as_ref().map(NumberPool::removed).unwrap_or(&[])
    }

    /// Snapshot of the number pool as wheel segments
    pub fn number_wheel_items(&self) -> Vec<WheelItem> {
        self.number_items()
            .iter()
            .copied()
            .map(WheelItem::Number)
            .collect()
    }

    /// Snapshot of the text options as wheel segments
    pub fn text_wheel_items(&self) -> Vec<WheelItem> {
        self.text
            .as_ref()
            .map(|t| t.options.iter().cloned().map(WheelItem::Text).collect())
            .unwrap_or_default()
    }

    /// At least `min_items` entries on the number wheel
    pub fn is_spin_eligible(&self) -> bool {
        self.number_items().len() >= self.limits.min_items
    }
}

impl Default for PoolManager {
    fn default() -> Self {
        Self::new(PoolLimits::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> PoolLimits {
        PoolLimits::default()
    }

    #[test]
    fn test_build_pool_one_to_hundred() {
        let mut pools = PoolManager::default();
        let pool = pools.build_pool(1.0, 100.0).unwrap();
        assert_eq!(pool.items(), (1..=100).collect::<Vec<_>>().as_slice());
        assert!(pool.removed().is_empty());
    }

    #[test]
    fn test_range_validation_errors() {
        let l = limits();
        assert_eq!(NumberRange::validate(5.0, 5.0, &l), Err(RwError::RangeTooSmall { min: 2 }));
        assert_eq!(NumberRange::validate(1.0, 600.0, &l), Err(RwError::RangeTooLarge { max: 500 }));
        assert_eq!(NumberRange::validate(9.0, 3.0, &l), Err(RwError::InvertedRange));
        assert_eq!(NumberRange::validate(1.5, 3.0, &l), Err(RwError::NonIntegerRange));
        assert_eq!(NumberRange::validate(f64::NAN, 3.0, &l), Err(RwError::NonIntegerRange));
        assert_eq!(NumberRange::validate(1.0, 500.0, &l).map(|r| r.len()), Ok(500));
        assert_eq!(NumberRange::validate(-3.0, -2.0, &l).map(|r| r.values()), Ok(vec![-3, -2]));
    }

    #[test]
    fn test_parse_raw_bounds() {
        let l = limits();
        assert_eq!(NumberRange::parse(" 1 ", "10", &l), Ok(NumberRange { min: 1, max: 10 }));
        assert_eq!(NumberRange::parse("", "10", &l), Err(RwError::NonIntegerRange));
        assert_eq!(NumberRange::parse("abc", "10", &l), Err(RwError::NonIntegerRange));
        assert_eq!(NumberRange::parse("1e1", "12", &l), Ok(NumberRange { min: 10, max: 12 }));
        assert_eq!(NumberRange::parse("1", "1e300", &l), Err(RwError::NonIntegerRange));
    }

    #[test]
    fn test_failed_build_keeps_previous_pool() {
        let mut pools = PoolManager::default();
        pools.build_pool(1.0, 10.0).unwrap();
        pools.draw_and_remove(4).unwrap();
        assert!(pools.build_pool(1.0, 1000.0).is_err());
        assert_eq!(pools.number_items().len(), 9);
        assert_eq!(pools.removed(), &[4]);
    }

    #[test]
    fn test_text_options_trim_and_filter() {
        let options = TextOptions::parse("a\nb\n\n a ", &limits()).unwrap();
        assert_eq!(options.options(), &["a", "b", "a"]);
    }

    #[test]
    fn test_text_options_validation() {
        let l = limits();
        assert_eq!(TextOptions::parse("a\na", &l), Err(RwError::TooFewDistinctOptions { min: 2 }));
        assert_eq!(TextOptions::parse("only\n\n  ", &l), Err(RwError::TooFewOptions { min: 2 }));
        assert!(TextOptions::parse("A\na", &l).is_ok());
        let many: String = (0..501).map(|i| format!("opt{}\n", i)).collect();
        assert_eq!(TextOptions::parse(&many, &l), Err(RwError::TooManyOptions { max: 500 }));
    }

    #[test]
    fn test_crlf_lines_are_trimmed() {
        let options = TextOptions::parse("red\r\nblue\r\n", &limits()).unwrap();
        assert_eq!(options.options(), &["red", "blue"]);
    }

    #[test]
    fn test_failed_apply_keeps_previous_options() {
        let mut pools = PoolManager::default();
        pools.apply_text_options("x\ny").unwrap();
        assert!(pools.apply_text_options("x\nx").is_err());
        assert_eq!(pools.text_options().unwrap().options(), &["x", "y"]);
    }

    #[test]
    fn test_draw_until_exhausted() {
        let mut pools = PoolManager::default();
        pools.build_pool(1.0, 3.0).unwrap();
        assert_eq!(pools.draw_and_remove(2), Ok(DrawOutcome::Drawn { value: 2, remaining: 2 }));
        assert_eq!(pools.draw_and_remove(2), Err(RwError::NotInPool(2)));
        pools.draw_and_remove(1).unwrap();
        assert!(!pools.is_spin_eligible());
        assert_eq!(pools.draw_and_remove(3), Ok(DrawOutcome::Exhausted { value: 3 }));
        assert_eq!(pools.removed(), &[2, 1, 3]);
    }

    #[test]
    fn test_reset_restores_last_range() {
        let mut pools = PoolManager::default();
        assert!(!pools.reset());
        pools.build_pool(10.0, 12.0).unwrap();
        pools.draw_and_remove(11).unwrap();
        assert!(pools.reset());
        assert_eq!(pools.number_items(), &[10, 11, 12]);
        assert!(pools.removed().is_empty());
    }

    #[test]
    fn test_wheel_item_display() {
        assert_eq!(WheelItem::Number(-7).to_string(), "-7");
        assert_eq!(WheelItem::Text("Pizza".into()).to_string(), "Pizza");
    }
}
