//! Read-only reference data for the stat pipeline.
//!
//! This module contains pure data structures: per-class constants,
//! rating conversion tables, base resource tables and server-operator
//! caps. All structs are designed to be deserialized from RON files.
//!
//! **Note:** This module contains no IO - it only defines data types and
//! their built-in defaults. File loading is handled by the embedding game
//! layer.

mod class_table;
mod rating_table;
mod resource_table;

use serde::{Deserialize, Serialize};

pub use class_table::{ClassRow, ClassTable};
pub use rating_table::{CorruptionThresholds, CorruptionTier, CurveRegistry, RatingCostTable};
pub use resource_table::BaseResourceTable;

use crate::curves::resilience_mitigation;
use crate::ratings::CombatRating;

/// Highest supported character level.
pub const MAX_LEVEL: u32 = 60;

/// Server-operator hard caps, applied after all curves.
///
/// Absent caps leave the computed value untouched.
///
/// # Example RON
///
/// ```ron
/// StatCaps(
///     crit: Some(95.0),
///     dodge: None,
///     parry: None,
///     block: Some(75.0),
/// )
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatCaps {
    /// Maximum crit percentage, any attack type.
    #[serde(default)]
    pub crit: Option<f32>,
    /// Maximum dodge percentage.
    #[serde(default)]
    pub dodge: Option<f32>,
    /// Maximum parry percentage.
    #[serde(default)]
    pub parry: Option<f32>,
    /// Maximum block percentage.
    #[serde(default)]
    pub block: Option<f32>,
}

impl StatCaps {
    /// Clamp a value against an optional cap.
    #[must_use]
    pub fn clamp(value: f32, cap: Option<f32>) -> f32 {
        match cap {
            Some(cap) => value.min(cap),
            None => value,
        }
    }
}

/// Every reference table the pipeline reads, bundled.
///
/// Loaded once at startup and shared read-only across all characters;
/// no character owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTables {
    /// Per-class constants.
    pub classes: ClassTable,
    /// Rating points per 1% per level.
    pub rating_costs: RatingCostTable,
    /// Global per-category curves.
    pub curves: CurveRegistry,
    /// Base health/power/regen per class and level.
    pub resources: BaseResourceTable,
    /// Corruption effect tiers.
    pub corruption: CorruptionThresholds,
    /// Server-operator caps.
    pub caps: StatCaps,
}

impl ReferenceTables {
    /// Built-in defaults for every table.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            classes: ClassTable::builtin(),
            rating_costs: RatingCostTable::builtin(),
            curves: CurveRegistry::builtin(),
            resources: BaseResourceTable::builtin(),
            corruption: CorruptionThresholds::builtin(),
            caps: StatCaps::default(),
        }
    }

    /// Convert a rating's point value into its effect bonus.
    ///
    /// `points * level_multiplier` through the global per-category curve,
    /// then the resilience compounding special case. Missing table rows
    /// resolve to a neutral multiplier.
    #[must_use]
    pub fn rating_bonus(&self, rating: CombatRating, points: f32, level: u32) -> f32 {
        let raw = points * self.rating_costs.multiplier(rating, level);
        let bonus = self.curves.apply(rating, raw);
        if rating == CombatRating::Resilience {
            resilience_mitigation(bonus)
        } else {
            bonus
        }
    }
}

impl Default for ReferenceTables {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_with_and_without_cap() {
        assert_eq!(StatCaps::clamp(80.0, Some(50.0)), 50.0);
        assert_eq!(StatCaps::clamp(80.0, None), 80.0);
    }

    #[test]
    fn test_rating_bonus_neutral_fallback() {
        let mut tables = ReferenceTables::builtin();
        tables.rating_costs.costs.clear();
        tables.curves.curves.clear();

        // No table row, no curve: points pass through untouched.
        let bonus = tables.rating_bonus(CombatRating::HitMelee, 42.0, 30);
        assert_eq!(bonus, 42.0);
    }

    #[test]
    fn test_resilience_applies_compounding() {
        let mut tables = ReferenceTables::builtin();
        tables.rating_costs.costs.clear();
        tables.curves.curves.clear();

        let bonus = tables.rating_bonus(CombatRating::Resilience, 50.0, MAX_LEVEL);
        let expected = resilience_mitigation(50.0);
        assert_eq!(bonus.to_bits(), expected.to_bits());
        assert!(bonus < 100.0);
    }

    #[test]
    fn test_stat_caps_ron_defaults() {
        let caps: StatCaps = ron::from_str("StatCaps()").expect("deserialize");
        assert_eq!(caps, StatCaps::default());
    }
}
