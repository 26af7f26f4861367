//! Primary stats, unit-modifier categories, and the four-slot modifier layer.
//!
//! Every additive/multiplicative bonus a character carries lands in one
//! [`ModifierLayer`], keyed by [`UnitMod`]. Layers are pure data; the
//! pipeline decides how each category composes with stat-derived
//! contributions and where results are clamped.

use serde::{Deserialize, Serialize};

// ============================================================================
// Stat Taxonomy
// ============================================================================

/// Primary character attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stat {
    /// Strength - drives melee attack power.
    Strength,
    /// Agility - drives armor, crit, dodge and ranged attack power.
    Agility,
    /// Stamina - drives maximum health (owner and companion).
    Stamina,
    /// Intellect - drives maximum mana, spell crit and spell power.
    Intellect,
}

impl Stat {
    /// Number of primary stats.
    pub const COUNT: usize = 4;

    /// All stats in canonical order.
    #[must_use]
    pub const fn all() -> [Stat; Self::COUNT] {
        [Stat::Strength, Stat::Agility, Stat::Stamina, Stat::Intellect]
    }

    /// Canonical array index for this stat.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Stat::Strength => 0,
            Stat::Agility => 1,
            Stat::Stamina => 2,
            Stat::Intellect => 3,
        }
    }

    /// Stat for a canonical index, used to decode aura selectors.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Stat> {
        match index {
            0 => Some(Stat::Strength),
            1 => Some(Stat::Agility),
            2 => Some(Stat::Stamina),
            3 => Some(Stat::Intellect),
            _ => None,
        }
    }
}

/// Resource pool type.
///
/// Every class uses exactly one of these as its active resource; the
/// pipeline still publishes a maximum for each so that temporary
/// power-shifting effects have somewhere to land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PowerType {
    /// Mana - casters, scales with intellect.
    Mana,
    /// Rage - fixed-size pool.
    Rage,
    /// Focus - fixed-size pool.
    Focus,
    /// Energy - fixed-size pool.
    Energy,
    /// Runic power - fixed-size pool.
    RunicPower,
}

impl PowerType {
    /// Number of power types.
    pub const COUNT: usize = 5;

    /// All power types in canonical order.
    #[must_use]
    pub const fn all() -> [PowerType; Self::COUNT] {
        [
            PowerType::Mana,
            PowerType::Rage,
            PowerType::Focus,
            PowerType::Energy,
            PowerType::RunicPower,
        ]
    }

    /// Canonical array index for this power type.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            PowerType::Mana => 0,
            PowerType::Rage => 1,
            PowerType::Focus => 2,
            PowerType::Energy => 3,
            PowerType::RunicPower => 4,
        }
    }
}

/// Weapon slot / attack type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttackType {
    /// Main-hand melee attack.
    MainHand,
    /// Off-hand melee attack.
    OffHand,
    /// Ranged attack.
    Ranged,
}

impl AttackType {
    /// Number of attack types.
    pub const COUNT: usize = 3;

    /// All attack types in canonical order.
    #[must_use]
    pub const fn all() -> [AttackType; Self::COUNT] {
        [AttackType::MainHand, AttackType::OffHand, AttackType::Ranged]
    }

    /// Canonical array index for this attack type.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            AttackType::MainHand => 0,
            AttackType::OffHand => 1,
            AttackType::Ranged => 2,
        }
    }

    /// Bitmask for aura effects filtered by attack type.
    #[must_use]
    pub const fn mask(self) -> u32 {
        1 << self.index()
    }
}

/// Spell school. `Physical` shares the resistance array with armor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpellSchool {
    /// Physical - armor mitigates this school.
    Physical,
    /// Holy.
    Holy,
    /// Fire.
    Fire,
    /// Nature.
    Nature,
    /// Frost.
    Frost,
    /// Shadow.
    Shadow,
    /// Arcane.
    Arcane,
}

impl SpellSchool {
    /// Number of spell schools.
    pub const COUNT: usize = 7;

    /// All schools in canonical order.
    #[must_use]
    pub const fn all() -> [SpellSchool; Self::COUNT] {
        [
            SpellSchool::Physical,
            SpellSchool::Holy,
            SpellSchool::Fire,
            SpellSchool::Nature,
            SpellSchool::Frost,
            SpellSchool::Shadow,
            SpellSchool::Arcane,
        ]
    }

    /// Canonical array index for this school.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            SpellSchool::Physical => 0,
            SpellSchool::Holy => 1,
            SpellSchool::Fire => 2,
            SpellSchool::Nature => 3,
            SpellSchool::Frost => 4,
            SpellSchool::Shadow => 5,
            SpellSchool::Arcane => 6,
        }
    }

    /// Bitmask for aura effects filtered by school.
    #[must_use]
    pub const fn mask(self) -> u32 {
        1 << self.index()
    }
}

/// Weapon classification, used by weapon-filtered aura effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponClass {
    /// One- or two-handed axe.
    Axe,
    /// One- or two-handed mace.
    Mace,
    /// One- or two-handed sword.
    Sword,
    /// Dagger.
    Dagger,
    /// Fist weapon.
    Fist,
    /// Polearm.
    Polearm,
    /// Staff.
    Staff,
    /// Bow.
    Bow,
    /// Gun.
    Gun,
}

// ============================================================================
// Unit-Modifier Categories
// ============================================================================

/// A "unit modifier" category - every category owns one [`ModifierLayer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitMod {
    /// Strength layer.
    StatStrength,
    /// Agility layer.
    StatAgility,
    /// Stamina layer.
    StatStamina,
    /// Intellect layer.
    StatIntellect,
    /// Maximum health layer.
    Health,
    /// Maximum mana layer.
    PowerMana,
    /// Maximum rage layer.
    PowerRage,
    /// Maximum focus layer.
    PowerFocus,
    /// Maximum energy layer.
    PowerEnergy,
    /// Maximum runic power layer.
    PowerRunicPower,
    /// Armor layer.
    Armor,
    /// Melee attack power layer.
    AttackPower,
    /// Ranged attack power layer.
    RangedAttackPower,
    /// Main-hand weapon damage layer.
    DamageMainHand,
    /// Off-hand weapon damage layer.
    DamageOffHand,
    /// Ranged weapon damage layer.
    DamageRanged,
}

impl UnitMod {
    /// Number of unit-modifier categories.
    pub const COUNT: usize = 16;

    /// Canonical array index for this category.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            UnitMod::StatStrength => 0,
            UnitMod::StatAgility => 1,
            UnitMod::StatStamina => 2,
            UnitMod::StatIntellect => 3,
            UnitMod::Health => 4,
            UnitMod::PowerMana => 5,
            UnitMod::PowerRage => 6,
            UnitMod::PowerFocus => 7,
            UnitMod::PowerEnergy => 8,
            UnitMod::PowerRunicPower => 9,
            UnitMod::Armor => 10,
            UnitMod::AttackPower => 11,
            UnitMod::RangedAttackPower => 12,
            UnitMod::DamageMainHand => 13,
            UnitMod::DamageOffHand => 14,
            UnitMod::DamageRanged => 15,
        }
    }

    /// The layer backing a primary stat.
    #[must_use]
    pub const fn from_stat(stat: Stat) -> Self {
        match stat {
            Stat::Strength => UnitMod::StatStrength,
            Stat::Agility => UnitMod::StatAgility,
            Stat::Stamina => UnitMod::StatStamina,
            Stat::Intellect => UnitMod::StatIntellect,
        }
    }

    /// The layer backing a resource pool.
    #[must_use]
    pub const fn from_power(power: PowerType) -> Self {
        match power {
            PowerType::Mana => UnitMod::PowerMana,
            PowerType::Rage => UnitMod::PowerRage,
            PowerType::Focus => UnitMod::PowerFocus,
            PowerType::Energy => UnitMod::PowerEnergy,
            PowerType::RunicPower => UnitMod::PowerRunicPower,
        }
    }

    /// The damage layer for a weapon slot.
    #[must_use]
    pub const fn from_attack(attack: AttackType) -> Self {
        match attack {
            AttackType::MainHand => UnitMod::DamageMainHand,
            AttackType::OffHand => UnitMod::DamageOffHand,
            AttackType::Ranged => UnitMod::DamageRanged,
        }
    }
}

// ============================================================================
// Modifier Layer
// ============================================================================

/// Which slot of a [`ModifierLayer`] a modifier targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModKind {
    /// Additive, applied before base percentages.
    FlatBase,
    /// Multiplicative on the base value.
    PctBase,
    /// Additive, applied after base percentages.
    FlatTotal,
    /// Multiplicative on the final value.
    PctTotal,
}

/// Four-slot additive + multiplicative modifier storage.
///
/// Combination invariant: `(flat_base * pct_base + flat_total) * pct_total`.
/// The pipeline injects stat-derived contributions between the base and
/// total stages via [`ModifierLayer::compose`]. No validation happens here;
/// the pipeline clamps where a category demands it (armor, health, ratings).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModifierLayer {
    flat_base: f32,
    pct_base: f32,
    flat_total: f32,
    pct_total: f32,
}

impl ModifierLayer {
    /// Create a neutral layer (flat 0, percentages 1.0).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            flat_base: 0.0,
            pct_base: 1.0,
            flat_total: 0.0,
            pct_total: 1.0,
        }
    }

    /// Apply or remove a flat base-stage modifier.
    pub fn apply_flat_base(&mut self, amount: f32, apply: bool) {
        self.flat_base += if apply { amount } else { -amount };
    }

    /// Apply or remove a flat total-stage modifier.
    pub fn apply_flat_total(&mut self, amount: f32, apply: bool) {
        self.flat_total += if apply { amount } else { -amount };
    }

    /// Apply or remove a base-stage percentage modifier.
    ///
    /// `pct` is expressed as a delta: `+25.0` multiplies the base stage by
    /// 1.25 and removal divides it back out. Removal of a `-100` modifier
    /// would divide by zero and leaves the slot unchanged instead.
    pub fn apply_pct_base(&mut self, pct: f32, apply: bool) {
        self.pct_base = Self::pct_shift(self.pct_base, pct, apply);
    }

    /// Apply or remove a total-stage percentage modifier.
    pub fn apply_pct_total(&mut self, pct: f32, apply: bool) {
        self.pct_total = Self::pct_shift(self.pct_total, pct, apply);
    }

    /// Apply or remove a modifier on the named slot.
    pub fn apply(&mut self, kind: ModKind, amount: f32, apply: bool) {
        match kind {
            ModKind::FlatBase => self.apply_flat_base(amount, apply),
            ModKind::PctBase => self.apply_pct_base(amount, apply),
            ModKind::FlatTotal => self.apply_flat_total(amount, apply),
            ModKind::PctTotal => self.apply_pct_total(amount, apply),
        }
    }

    fn pct_shift(current: f32, pct: f32, apply: bool) -> f32 {
        let factor = (100.0 + pct) / 100.0;
        if apply {
            current * factor
        } else if factor == 0.0 {
            current
        } else {
            current / factor
        }
    }

    /// Flat base-stage slot value.
    #[must_use]
    pub const fn flat_base(&self) -> f32 {
        self.flat_base
    }

    /// Base-stage percentage slot value.
    #[must_use]
    pub const fn pct_base(&self) -> f32 {
        self.pct_base
    }

    /// Flat total-stage slot value.
    #[must_use]
    pub const fn flat_total(&self) -> f32 {
        self.flat_total
    }

    /// Total-stage percentage slot value.
    #[must_use]
    pub const fn pct_total(&self) -> f32 {
        self.pct_total
    }

    /// Combine the four slots into a value.
    #[must_use]
    pub fn combine(&self) -> f32 {
        self.compose(0.0, 0.0)
    }

    /// Combine with pipeline-injected contributions.
    ///
    /// `base_extra` joins the flat base slot before base percentages
    /// (class-table base values); `mid_extra` joins after base percentages
    /// but before the total stage (stat-derived bonuses such as health from
    /// stamina or armor from agility):
    ///
    /// `((flat_base + base_extra) * pct_base + mid_extra + flat_total) * pct_total`
    #[must_use]
    pub fn compose(&self, base_extra: f32, mid_extra: f32) -> f32 {
        ((self.flat_base + base_extra) * self.pct_base + mid_extra + self.flat_total)
            * self.pct_total
    }
}

impl Default for ModifierLayer {
    fn default() -> Self {
        Self::new()
    }
}
