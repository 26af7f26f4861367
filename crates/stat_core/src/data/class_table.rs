//! Per-class reference constants.

use serde::{Deserialize, Serialize};

use crate::classes::CharacterClass;
use crate::curves::DiminishingReturns;

/// Reference constants for one class.
///
/// Loaded once at startup and never mutated; every coefficient the
/// pipeline needs that varies by class lives here.
///
/// # Example RON
///
/// ```ron
/// ClassRow(
///     dr_coefficient: 0.9560,
///     dodge_cap: 65.631440,
///     parry_cap: 65.631440,
///     block_cap: 150.375940,
///     agility_per_dodge: 84.7,
///     base_crit_melee: 3.19,
///     base_crit_spell: 3.89,
///     agility_per_crit: 62.5,
///     intellect_per_crit: 120.0,
///     ap_base: -20.0,
///     ap_per_level: 3.0,
///     ap_per_strength: 2.0,
///     ap_per_agility: 0.0,
///     ranged_ap_base: -10.0,
///     ranged_ap_per_level: 2.0,
///     ranged_ap_per_agility: 1.0,
///     spell_power_per_intellect: 0.0,
/// )
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassRow {
    /// Diminishing-returns coefficient `k` shared by the class's
    /// avoidance curves.
    pub dr_coefficient: f32,
    /// Dodge cap `c`; zero means the class cannot dodge via the curve.
    pub dodge_cap: f32,
    /// Parry cap `c`; zero means the class cannot parry.
    pub parry_cap: f32,
    /// Block cap `c`; zero means the class cannot block.
    pub block_cap: f32,
    /// Agility points per 1% of diminishing dodge contribution.
    pub agility_per_dodge: f32,
    /// Base melee/ranged crit percentage.
    pub base_crit_melee: f32,
    /// Base spell crit percentage.
    pub base_crit_spell: f32,
    /// Agility points per 1% of physical crit.
    pub agility_per_crit: f32,
    /// Intellect points per 1% of spell crit.
    pub intellect_per_crit: f32,
    /// Flat melee attack-power term.
    pub ap_base: f32,
    /// Melee attack power per level.
    pub ap_per_level: f32,
    /// Melee attack power per point of strength.
    pub ap_per_strength: f32,
    /// Melee attack power per point of agility.
    pub ap_per_agility: f32,
    /// Flat ranged attack-power term.
    pub ranged_ap_base: f32,
    /// Ranged attack power per level.
    pub ranged_ap_per_level: f32,
    /// Ranged attack power per point of agility.
    pub ranged_ap_per_agility: f32,
    /// Spell power per point of intellect.
    pub spell_power_per_intellect: f32,
}

impl ClassRow {
    /// Dodge diminishing-returns constants for this class.
    #[must_use]
    pub const fn dodge_dr(&self) -> DiminishingReturns {
        DiminishingReturns::new(self.dodge_cap, self.dr_coefficient)
    }

    /// Parry diminishing-returns constants for this class.
    #[must_use]
    pub const fn parry_dr(&self) -> DiminishingReturns {
        DiminishingReturns::new(self.parry_cap, self.dr_coefficient)
    }

    /// Block diminishing-returns constants for this class.
    #[must_use]
    pub const fn block_dr(&self) -> DiminishingReturns {
        DiminishingReturns::new(self.block_cap, self.dr_coefficient)
    }
}

/// Per-class constant table, indexed by [`CharacterClass`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassTable {
    /// One row per class, in [`CharacterClass::all`] order.
    pub rows: [ClassRow; CharacterClass::COUNT],
}

impl ClassTable {
    /// The row for a class.
    #[must_use]
    pub fn row(&self, class: CharacterClass) -> &ClassRow {
        &self.rows[class.index()]
    }

    /// Built-in constants.
    #[must_use]
    pub fn builtin() -> Self {
        let row = |dr_coefficient: f32,
                   dodge_cap: f32,
                   parry_cap: f32,
                   block_cap: f32,
                   agility_per_dodge: f32,
                   crits: (f32, f32, f32, f32),
                   melee_ap: (f32, f32, f32, f32),
                   ranged_ap: (f32, f32, f32),
                   spell_power_per_intellect: f32| ClassRow {
            dr_coefficient,
            dodge_cap,
            parry_cap,
            block_cap,
            agility_per_dodge,
            base_crit_melee: crits.0,
            base_crit_spell: crits.1,
            agility_per_crit: crits.2,
            intellect_per_crit: crits.3,
            ap_base: melee_ap.0,
            ap_per_level: melee_ap.1,
            ap_per_strength: melee_ap.2,
            ap_per_agility: melee_ap.3,
            ranged_ap_base: ranged_ap.0,
            ranged_ap_per_level: ranged_ap.1,
            ranged_ap_per_agility: ranged_ap.2,
            spell_power_per_intellect,
        };

        // Rows follow CharacterClass::all() order.
        Self {
            rows: [
                // Warrior
                row(
                    0.956,
                    65.631_44,
                    65.631_44,
                    150.375_94,
                    84.7,
                    (3.19, 3.89, 62.5, 120.0),
                    (-20.0, 3.0, 2.0, 0.0),
                    (-10.0, 2.0, 1.0),
                    0.0,
                ),
                // Paladin
                row(
                    0.956,
                    65.631_44,
                    65.631_44,
                    150.375_94,
                    59.9,
                    (3.27, 3.34, 62.5, 120.0),
                    (-20.0, 3.0, 2.0, 0.0),
                    (0.0, 0.0, 0.0),
                    1.0,
                ),
                // Ranger
                row(
                    0.988,
                    145.560_41,
                    145.560_41,
                    0.0,
                    86.2,
                    (1.53, 3.60, 40.0, 120.0),
                    (-20.0, 2.0, 1.0, 1.0),
                    (-10.0, 2.0, 2.0),
                    0.0,
                ),
                // Rogue
                row(
                    0.988,
                    145.560_41,
                    145.560_41,
                    0.0,
                    47.8,
                    (0.30, 0.0, 40.0, 0.0),
                    (-20.0, 2.0, 1.0, 1.0),
                    (-10.0, 2.0, 1.0),
                    0.0,
                ),
                // Priest
                row(
                    0.983,
                    150.375_94,
                    0.0,
                    0.0,
                    59.2,
                    (3.18, 1.24, 82.1, 101.2),
                    (-10.0, 0.0, 1.0, 0.0),
                    (0.0, 0.0, 0.0),
                    1.0,
                ),
                // Shaman
                row(
                    0.988,
                    145.560_41,
                    0.0,
                    150.375_94,
                    59.9,
                    (2.92, 2.20, 54.4, 106.4),
                    (-20.0, 2.0, 1.0, 1.0),
                    (0.0, 0.0, 0.0),
                    1.0,
                ),
                // Mage
                row(
                    0.983,
                    150.375_94,
                    0.0,
                    0.0,
                    58.8,
                    (3.45, 0.91, 51.0, 88.0),
                    (-10.0, 0.0, 1.0, 0.0),
                    (0.0, 0.0, 0.0),
                    1.0,
                ),
                // Warlock
                row(
                    0.983,
                    150.375_94,
                    0.0,
                    0.0,
                    40.1,
                    (2.62, 1.70, 50.9, 98.1),
                    (-10.0, 0.0, 1.0, 0.0),
                    (0.0, 0.0, 0.0),
                    1.0,
                ),
                // Druid
                row(
                    0.972,
                    116.890_71,
                    0.0,
                    0.0,
                    47.8,
                    (5.49, 1.85, 41.7, 112.7),
                    (-20.0, 2.0, 2.0, 0.0),
                    (0.0, 0.0, 0.0),
                    1.0,
                ),
                // Runeknight
                row(
                    0.956,
                    65.631_44,
                    65.631_44,
                    0.0,
                    84.7,
                    (3.19, 3.89, 62.5, 120.0),
                    (-20.0, 3.0, 2.0, 0.0),
                    (0.0, 0.0, 0.0),
                    0.0,
                ),
            ],
        }
    }
}

impl Default for ClassTable {
    fn default() -> Self {
        Self::builtin()
    }
}
