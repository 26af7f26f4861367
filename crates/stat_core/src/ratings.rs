//! Combat-rating categories and the rating aggregator.
//!
//! A combat rating is an abstract point pool converted downstream into a
//! usable percentage or bonus. This module owns the category taxonomy and
//! the aggregation step that folds aura-driven cross-rating coupling into
//! a category's canonical point value.

use serde::{Deserialize, Serialize};

use crate::auras::{AuraBook, AuraKind};

/// Combat-rating category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CombatRating {
    /// Dodge chance (per-class diminishing returns).
    Dodge,
    /// Parry chance (per-class diminishing returns).
    Parry,
    /// Block chance (per-class diminishing returns).
    Block,
    /// Melee critical strike chance.
    CritMelee,
    /// Ranged critical strike chance.
    CritRanged,
    /// Spell critical strike chance.
    CritSpell,
    /// Melee hit chance (linear).
    HitMelee,
    /// Ranged hit chance (linear).
    HitRanged,
    /// Spell hit chance (linear).
    HitSpell,
    /// Melee haste.
    HasteMelee,
    /// Ranged haste.
    HasteRanged,
    /// Spell haste.
    HasteSpell,
    /// Expertise (weapon-filtered aura contributions).
    Expertise,
    /// Armor penetration, capped at 100 percent.
    ArmorPenetration,
    /// Mastery (gated on the mastery capability).
    Mastery,
    /// Damage-taken resilience (compounding mitigation).
    Resilience,
    /// Versatility damage done.
    VersatilityDamage,
    /// Versatility healing taken.
    VersatilityHealing,
    /// Leech.
    Lifesteal,
    /// Avoidance (area-damage reduction).
    Avoidance,
    /// Movement speed bonus.
    Speed,
    /// Corruption.
    Corruption,
    /// Corruption resistance.
    CorruptionResistance,
}

impl CombatRating {
    /// Number of rating categories.
    pub const COUNT: usize = 23;

    /// All categories in canonical order.
    #[must_use]
    pub const fn all() -> [CombatRating; Self::COUNT] {
        [
            CombatRating::Dodge,
            CombatRating::Parry,
            CombatRating::Block,
            CombatRating::CritMelee,
            CombatRating::CritRanged,
            CombatRating::CritSpell,
            CombatRating::HitMelee,
            CombatRating::HitRanged,
            CombatRating::HitSpell,
            CombatRating::HasteMelee,
            CombatRating::HasteRanged,
            CombatRating::HasteSpell,
            CombatRating::Expertise,
            CombatRating::ArmorPenetration,
            CombatRating::Mastery,
            CombatRating::Resilience,
            CombatRating::VersatilityDamage,
            CombatRating::VersatilityHealing,
            CombatRating::Lifesteal,
            CombatRating::Avoidance,
            CombatRating::Speed,
            CombatRating::Corruption,
            CombatRating::CorruptionResistance,
        ]
    }

    /// Canonical array index for this category.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Bitmask for aura effects selecting rating sets.
    #[must_use]
    pub const fn mask(self) -> u32 {
        1 << self.index()
    }
}

/// Compute a rating's canonical point value from its base allocation and
/// the active coupling/self-percent aura effects.
///
/// Coupling effects (`RatingFromMaxOf`) read the **pre-coupling base
/// allocations** of their dependent set, never partially-updated values
/// from the pass in flight, so the result is independent of the order
/// categories are visited in. Self-percent effects then scale the
/// accumulated amount, and the result clamps at zero.
///
/// With no matching aura effects the returned value is the raw base
/// allocation, bit-for-bit.
#[must_use]
pub fn aggregate_rating(
    rating: CombatRating,
    base: &[f32; CombatRating::COUNT],
    auras: &AuraBook,
) -> f32 {
    let mut amount = base[rating.index()];

    for effect in auras.of_kind(AuraKind::RatingFromMaxOf) {
        if effect.misc_a as u32 & rating.mask() == 0 {
            continue;
        }
        let mut highest = 0.0f32;
        for dep in CombatRating::all() {
            if effect.misc_b as u32 & dep.mask() != 0 {
                highest = highest.max(base[dep.index()]);
            }
        }
        amount += highest * effect.amount / 100.0;
    }

    for effect in auras.of_kind(AuraKind::RatingPctOfSelf) {
        if effect.misc_a as u32 & rating.mask() != 0 {
            amount += amount * effect.amount / 100.0;
        }
    }

    amount.max(0.0)
}
