//! Per-level base resource tables.

use serde::{Deserialize, Serialize};

use crate::classes::CharacterClass;
use crate::data::MAX_LEVEL;
use crate::stats::PowerType;

/// Base health, base power and base mana regeneration per class and level.
///
/// Only the class's native power type has a base row; every other power
/// type resolves to zero. Out-of-range lookups are a zero bonus, never an
/// error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseResourceTable {
    /// `health[class][level - 1]` = base health before stamina.
    pub health: Vec<Vec<f32>>,
    /// `power[class][level - 1]` = base size of the class's native pool.
    pub power: Vec<Vec<f32>>,
    /// `mana_regen[level - 1]` = base mana regeneration per tick.
    pub mana_regen: Vec<f32>,
}

impl BaseResourceTable {
    /// Base health for a class at a level.
    #[must_use]
    pub fn base_health(&self, class: CharacterClass, level: u32) -> f32 {
        Self::lookup(&self.health, class, level)
    }

    /// Base pool size for a power type. Zero for anything other than the
    /// class's native power.
    #[must_use]
    pub fn base_power(&self, class: CharacterClass, power: PowerType, level: u32) -> f32 {
        if power != class.power_type() {
            return 0.0;
        }
        Self::lookup(&self.power, class, level)
    }

    /// Base mana regeneration at a level.
    #[must_use]
    pub fn base_mana_regen(&self, level: u32) -> f32 {
        if level == 0 {
            return 0.0;
        }
        self.mana_regen
            .get(level as usize - 1)
            .copied()
            .unwrap_or(0.0)
    }

    fn lookup(table: &[Vec<f32>], class: CharacterClass, level: u32) -> f32 {
        if level == 0 {
            return 0.0;
        }
        table
            .get(class.index())
            .and_then(|row| row.get(level as usize - 1))
            .copied()
            .unwrap_or(0.0)
    }

    /// Built-in growth tables.
    #[must_use]
    pub fn builtin() -> Self {
        // (base health at level 1, health per level) per class, in
        // CharacterClass::all() order.
        const HEALTH_GROWTH: [(f32, f32); CharacterClass::COUNT] = [
            (30.0, 22.0), // Warrior
            (28.0, 20.0), // Paladin
            (26.0, 18.0), // Ranger
            (25.0, 17.0), // Rogue
            (22.0, 14.0), // Priest
            (26.0, 17.0), // Shaman
            (20.0, 12.0), // Mage
            (21.0, 13.0), // Warlock
            (24.0, 16.0), // Druid
            (32.0, 24.0), // Runeknight
        ];

        // Mana-class growth; fixed pools are level-independent.
        const MANA_GROWTH: [(f32, f32); CharacterClass::COUNT] = [
            (100.0, 0.0),  // Warrior (rage)
            (80.0, 14.0),  // Paladin
            (100.0, 0.0),  // Ranger (focus)
            (100.0, 0.0),  // Rogue (energy)
            (110.0, 18.0), // Priest
            (85.0, 15.0),  // Shaman
            (120.0, 19.0), // Mage
            (100.0, 17.0), // Warlock
            (90.0, 15.0),  // Druid
            (100.0, 0.0),  // Runeknight (runic power)
        ];

        let grow = |growth: [(f32, f32); CharacterClass::COUNT]| -> Vec<Vec<f32>> {
            growth
                .iter()
                .map(|&(base, per_level)| {
                    (1..=MAX_LEVEL)
                        .map(|level| base + per_level * (level - 1) as f32)
                        .collect()
                })
                .collect()
        };

        let mana_regen = (1..=MAX_LEVEL)
            .map(|level| 2.5 + 0.45 * (level - 1) as f32)
            .collect();

        Self {
            health: grow(HEALTH_GROWTH),
            power: grow(MANA_GROWTH),
            mana_regen,
        }
    }
}

impl Default for BaseResourceTable {
    fn default() -> Self {
        Self::builtin()
    }
}
