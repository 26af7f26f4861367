//! Read-only snapshot of resolved aura effects.
//!
//! Aura discovery and stacking resolution happen outside the engine; what
//! arrives here is the already-resolved contribution of every active
//! buff/debuff, as `(amount, misc_a, misc_b)` records keyed by effect kind.
//! The pipeline only ever iterates this store - it never mutates it.

use serde::{Deserialize, Serialize};

use crate::stats::WeaponClass;

/// Selector bit for spell-targeting effects in attack-type masks.
///
/// [`crate::stats::AttackType::mask`] occupies bits 0-2; spells take the
/// next bit so a single effect can target any mix of weapon attacks and
/// casting.
pub const SPELL_EFFECT_MASK: u32 = 1 << 3;

/// Aura-effect kinds the engine queries during recompute.
///
/// The `misc_a`/`misc_b` payload of an [`AuraEffect`] is kind-specific and
/// documented per variant. Masks are the canonical bitmasks of the masked
/// enum (`CombatRating::mask`, `AttackType::mask`, `SpellSchool::mask`,
/// `Stat` index for single-stat references).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuraKind {
    /// Grants a rating the highest current base allocation among a
    /// dependent rating set, scaled by `amount` percent.
    /// `misc_a` = target-rating mask, `misc_b` = dependent-set mask.
    RatingFromMaxOf,
    /// Percentage bonus on a rating's own accumulated amount.
    /// `misc_a` = target-rating mask.
    RatingPctOfSelf,
    /// Bonus armor equal to `amount` percent of a primary stat.
    /// `misc_a` = stat index.
    ArmorOfStatPct,
    /// Attack power from armor: 1 AP per `amount` points of armor.
    AttackPowerOfArmor,
    /// Flat dodge percentage (non-diminishing).
    DodgeFlatPct,
    /// Flat parry percentage (non-diminishing).
    ParryFlatPct,
    /// Flat block percentage (non-diminishing).
    BlockFlatPct,
    /// Flat crit percentage. `misc_a` = attack-type mask
    /// (plus [`SPELL_EFFECT_MASK`] for spells).
    CritFlatPct,
    /// Flat hit percentage. `misc_a` = attack-type mask
    /// (plus [`SPELL_EFFECT_MASK`] for spells).
    HitFlatPct,
    /// Multiplicative haste percentage. `misc_a` = attack-type mask
    /// (plus [`SPELL_EFFECT_MASK`] for casting).
    HastePct,
    /// Flat expertise, only while the matching weapon class is equipped
    /// in the hand being updated (`weapon_class` filter).
    ExpertiseFlat,
    /// Flat spell power. `misc_a` = school mask.
    SpellPowerFlat,
    /// Percentage spell power multiplier. `misc_a` = school mask.
    SpellPowerPct,
    /// Flat bonus healing.
    HealingPowerFlat,
    /// Percentage mana regeneration multiplier.
    ManaRegenPct,
    /// Percentage power regeneration multiplier, independent of
    /// [`AuraKind::ManaRegenPct`].
    PowerRegenPct,
    /// Flat school resistance. `misc_a` = school mask.
    ResistanceFlat,
    /// Percentage school resistance multiplier. `misc_a` = school mask.
    ResistancePct,
}

/// One resolved aura-effect contribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AuraEffect {
    /// Effect kind.
    pub kind: AuraKind,
    /// Resolved amount (percent or flat, kind-specific).
    pub amount: f32,
    /// Kind-specific selector (see [`AuraKind`]).
    pub misc_a: i32,
    /// Kind-specific secondary selector.
    pub misc_b: i32,
    /// Weapon-class requirement, checked by weapon-filtered kinds.
    pub weapon_class: Option<WeaponClass>,
}

impl AuraEffect {
    /// Create an effect with no selectors.
    #[must_use]
    pub const fn new(kind: AuraKind, amount: f32) -> Self {
        Self {
            kind,
            amount,
            misc_a: 0,
            misc_b: 0,
            weapon_class: None,
        }
    }

    /// Builder method to set the selector payload.
    #[must_use]
    pub const fn with_misc(mut self, misc_a: i32, misc_b: i32) -> Self {
        self.misc_a = misc_a;
        self.misc_b = misc_b;
        self
    }

    /// Builder method to set a weapon-class requirement.
    #[must_use]
    pub const fn with_weapon(mut self, weapon_class: WeaponClass) -> Self {
        self.weapon_class = Some(weapon_class);
        self
    }
}

/// The set of aura effects currently active on one character.
///
/// Owned by the character but written solely by the external aura
/// subsystem; the pipeline treats it as a point-in-time snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuraBook {
    effects: Vec<AuraEffect>,
}

impl AuraBook {
    /// Create an empty book.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            effects: Vec::new(),
        }
    }

    /// Record an effect as active.
    pub fn add(&mut self, effect: AuraEffect) {
        self.effects.push(effect);
    }

    /// Remove one instance of an exactly-matching effect.
    ///
    /// Returns `false` if no matching instance was active.
    pub fn remove(&mut self, effect: &AuraEffect) -> bool {
        if let Some(pos) = self.effects.iter().position(|e| e == effect) {
            self.effects.remove(pos);
            true
        } else {
            false
        }
    }

    /// Iterate the active effects of one kind.
    pub fn of_kind(&self, kind: AuraKind) -> impl Iterator<Item = &AuraEffect> {
        self.effects.iter().filter(move |e| e.kind == kind)
    }

    /// Sum of amounts for a kind (unfiltered).
    #[must_use]
    pub fn total(&self, kind: AuraKind) -> f32 {
        self.of_kind(kind).map(|e| e.amount).sum()
    }

    /// Sum of amounts for a kind, filtered by selector mask.
    #[must_use]
    pub fn total_for_mask(&self, kind: AuraKind, mask: u32) -> f32 {
        self.of_kind(kind)
            .filter(|e| e.misc_a as u32 & mask != 0)
            .map(|e| e.amount)
            .sum()
    }

    /// Product of `(100 + amount) / 100` over a kind (unfiltered).
    #[must_use]
    pub fn multiplier(&self, kind: AuraKind) -> f32 {
        self.of_kind(kind)
            .map(|e| (100.0 + e.amount) / 100.0)
            .product()
    }

    /// Product of `(100 + amount) / 100` over a kind, filtered by mask.
    #[must_use]
    pub fn multiplier_for_mask(&self, kind: AuraKind, mask: u32) -> f32 {
        self.of_kind(kind)
            .filter(|e| e.misc_a as u32 & mask != 0)
            .map(|e| (100.0 + e.amount) / 100.0)
            .product()
    }

    /// Whether any effect of the kind is active.
    #[must_use]
    pub fn has(&self, kind: AuraKind) -> bool {
        self.of_kind(kind).next().is_some()
    }

    /// Number of active effects across all kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Whether the book holds no effects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
