//! Menojäännöspoisto: declining-balance depreciation of equipment.
//!
//! Items above the threshold are capitalised and depreciated at a fixed rate
//! of the remaining (undepreciated) balance each year. Items at or below the
//! threshold are expensed immediately.

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::categories;
use crate::money::percent_of;
use crate::types::{Cents, Rate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepreciationPolicy {
    /// Share of the remaining balance written off per year.
    pub rate: Rate,
    /// Amounts strictly above this are capitalised.
    pub threshold_cents: Cents,
    /// Useful life recorded when an entry carries no schedule of its own.
    pub default_years: u32,
    /// Remaining balance recorded at creation, as a share of the cost.
    pub initial_remaining_factor: Rate,
}

impl DepreciationPolicy {
    /// EVL § 30-34 as applied in 2026.
    pub fn statutory_2026() -> Self {
        Self {
            rate: dec!(0.25),
            threshold_cents: 120_000,
            default_years: 3,
            initial_remaining_factor: dec!(0.75),
        }
    }

    pub fn annual_depreciation(&self, remaining_cents: Cents) -> Cents {
        percent_of(remaining_cents, self.rate)
    }

    pub fn exceeds_threshold(&self, amount_cents: Cents) -> bool {
        amount_cents > self.threshold_cents
    }

    /// Whether an entry in `category` must be capitalised rather than expensed.
    pub fn requires_depreciation(&self, category: &str, amount_cents: Cents) -> bool {
        categories::is_depreciable(category) && self.exceeds_threshold(amount_cents)
    }

    /// Schedule to store on a freshly recorded entry, or `None` when the
    /// purchase is expensed immediately.
    pub fn initial_schedule(&self, category: &str, amount_cents: Cents) -> Option<DepreciationSchedule> {
        if !self.requires_depreciation(category, amount_cents) {
            return None;
        }
        Some(DepreciationSchedule {
            years: self.default_years,
            remaining_cents: percent_of(amount_cents, self.initial_remaining_factor),
        })
    }
}

impl Default for DepreciationPolicy {
    fn default() -> Self {
        Self::statutory_2026()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationSchedule {
    pub years: u32,
    pub remaining_cents: Cents,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annual_depreciation_on_remaining() {
        let policy = DepreciationPolicy::statutory_2026();
        assert_eq!(policy.annual_depreciation(187_500), 46_875);
        assert_eq!(policy.annual_depreciation(0), 0);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let policy = DepreciationPolicy::statutory_2026();
        assert!(!policy.exceeds_threshold(120_000));
        assert!(policy.exceeds_threshold(120_001));
    }

    #[test]
    fn test_initial_schedule_for_large_equipment() {
        let policy = DepreciationPolicy::statutory_2026();
        let schedule = policy.initial_schedule("laitteet", 250_000).unwrap();
        assert_eq!(schedule.years, 3);
        assert_eq!(schedule.remaining_cents, 187_500);
    }

    #[test]
    fn test_no_schedule_below_threshold_or_for_other_categories() {
        let policy = DepreciationPolicy::statutory_2026();
        assert!(policy.initial_schedule("laitteet", 50_000).is_none());
        assert!(policy.initial_schedule("matkakulut", 500_000).is_none());
    }
}
