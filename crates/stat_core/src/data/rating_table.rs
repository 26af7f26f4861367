//! Rating-to-percentage conversion tables.
//!
//! Three pieces of read-only reference data:
//!
//! - [`RatingCostTable`] - rating points per 1% at each level. The stored
//!   value is the *inverse* of the effective multiplier; a missing or
//!   zero entry means a neutral multiplier of 1.0, never an error.
//! - [`CurveRegistry`] - global per-category diminishing curves applied
//!   after the level multiplier. Unregistered categories pass through.
//! - [`CorruptionThresholds`] - effect tiers gated on and off by the
//!   effective corruption value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::curves::Curve;
use crate::data::MAX_LEVEL;
use crate::ratings::CombatRating;

/// Rating points required per 1% of effect, per category and level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingCostTable {
    /// `costs[rating][level - 1]` = points per 1%.
    pub costs: Vec<Vec<f32>>,
}

impl RatingCostTable {
    /// Raw table value for a category at a level, `0.0` when the row or
    /// level is absent.
    #[must_use]
    pub fn value(&self, rating: CombatRating, level: u32) -> f32 {
        if level == 0 {
            return 0.0;
        }
        self.costs
            .get(rating.index())
            .and_then(|row| row.get(level as usize - 1))
            .copied()
            .unwrap_or(0.0)
    }

    /// Effective multiplier for a category at a level.
    ///
    /// The table stores the inverse: `1 / value`, with a zero or missing
    /// value mapping to the neutral `1.0`.
    #[must_use]
    pub fn multiplier(&self, rating: CombatRating, level: u32) -> f32 {
        let value = self.value(rating, level);
        if value == 0.0 {
            1.0
        } else {
            1.0 / value
        }
    }

    /// Built-in costs: each category's cost at the level cap, scaled down
    /// linearly for lower levels with a 10% floor. The corruption pair is
    /// a flat 1.0 (points pass through unchanged).
    #[must_use]
    pub fn builtin() -> Self {
        let cap_cost = |rating: CombatRating| -> f32 {
            match rating {
                CombatRating::Dodge | CombatRating::Parry => 13.8,
                CombatRating::Block => 6.9,
                CombatRating::CritMelee | CombatRating::CritRanged | CombatRating::CritSpell => {
                    14.0
                }
                CombatRating::HitMelee | CombatRating::HitRanged | CombatRating::HitSpell => 12.0,
                CombatRating::HasteMelee
                | CombatRating::HasteRanged
                | CombatRating::HasteSpell => 10.0,
                CombatRating::Expertise => 7.69,
                CombatRating::ArmorPenetration => 4.69,
                CombatRating::Mastery => 17.9,
                CombatRating::Resilience => 28.75,
                CombatRating::VersatilityDamage => 40.0,
                CombatRating::VersatilityHealing => 20.0,
                CombatRating::Lifesteal => 47.0,
                CombatRating::Avoidance => 28.0,
                CombatRating::Speed => 25.0,
                CombatRating::Corruption | CombatRating::CorruptionResistance => 1.0,
            }
        };

        let costs = CombatRating::all()
            .iter()
            .map(|&rating| {
                let cap = cap_cost(rating);
                let flat = matches!(
                    rating,
                    CombatRating::Corruption | CombatRating::CorruptionResistance
                );
                (1..=MAX_LEVEL)
                    .map(|level| {
                        if flat {
                            cap
                        } else {
                            cap * (level as f32 / MAX_LEVEL as f32).max(0.1)
                        }
                    })
                    .collect()
            })
            .collect();

        Self { costs }
    }
}

impl Default for RatingCostTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Registered global per-category curves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveRegistry {
    /// Registered curves keyed by rating category.
    pub curves: BTreeMap<CombatRating, Curve>,
}

impl CurveRegistry {
    /// Apply the registered curve for a category, identity when none is
    /// registered.
    #[must_use]
    pub fn apply(&self, rating: CombatRating, raw: f32) -> f32 {
        match self.curves.get(&rating) {
            Some(curve) => curve.eval(raw),
            None => raw,
        }
    }

    /// Built-in registry: the tertiary categories share a bracketed
    /// penalty curve; everything else (avoidance has its own per-class
    /// curve) passes through.
    #[must_use]
    pub fn builtin() -> Self {
        let tertiary = Curve::new(vec![
            (0.0, 0.0),
            (30.0, 30.0),
            (40.0, 38.0),
            (50.0, 44.0),
            (60.0, 48.0),
        ]);

        let mut curves = BTreeMap::new();
        for rating in [
            CombatRating::VersatilityDamage,
            CombatRating::VersatilityHealing,
            CombatRating::Lifesteal,
            CombatRating::Avoidance,
            CombatRating::Speed,
        ] {
            curves.insert(rating, tertiary.clone());
        }
        Self { curves }
    }
}

/// One corruption tier: the effect switched on once effective corruption
/// reaches the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorruptionTier {
    /// Effective corruption required to trigger the tier.
    pub threshold: f32,
    /// Identifier of the effect the tier gates.
    pub effect_id: u32,
}

/// Threshold table for the corruption / corruption-resistance pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorruptionThresholds {
    /// Tiers sorted by ascending threshold.
    pub tiers: Vec<CorruptionTier>,
}

impl CorruptionThresholds {
    /// Effect ids active at an effective corruption value.
    #[must_use]
    pub fn active(&self, effective: f32) -> Vec<u32> {
        self.tiers
            .iter()
            .filter(|tier| effective >= tier.threshold)
            .map(|tier| tier.effect_id)
            .collect()
    }

    /// Built-in tiers.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            tiers: vec![
                CorruptionTier {
                    threshold: 20.0,
                    effect_id: 61_001,
                },
                CorruptionTier {
                    threshold: 40.0,
                    effect_id: 61_002,
                },
                CorruptionTier {
                    threshold: 60.0,
                    effect_id: 61_003,
                },
                CorruptionTier {
                    threshold: 80.0,
                    effect_id: 61_004,
                },
            ],
        }
    }
}

impl Default for CorruptionThresholds {
    fn default() -> Self {
        Self::builtin()
    }
}
