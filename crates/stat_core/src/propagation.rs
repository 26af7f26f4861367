//! Companion entities and owner-to-companion stat propagation.
//!
//! A companion mirrors a subset of its owner's primary stats. Pushes are
//! synchronous and fire-and-forget: the companion update receives copied
//! owner values and has no path back into the owner, so recursion is
//! impossible by construction. Owner and companion are guaranteed to be
//! processed by the same simulation tick.

use serde::{Deserialize, Serialize};

use crate::pipeline::{health_bonus_from_stamina, mana_bonus_from_intellect};
use crate::stats::Stat;

/// A dependent companion entity (e.g. a summoned pet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Companion {
    /// Fraction of each owner stat the companion inherits.
    pub inherit: [f32; Stat::COUNT],
    /// The companion's own stat contributions.
    pub base_stats: [f32; Stat::COUNT],
    /// Base health before stamina.
    pub base_health: f32,
    /// Base mana before intellect.
    pub base_mana: f32,
    /// Attack power per point of total strength.
    pub ap_per_strength: f32,
    /// Derived maximum health.
    pub max_health: u32,
    /// Derived maximum mana.
    pub max_mana: u32,
    /// Derived attack power.
    pub attack_power: f32,
}

impl Companion {
    /// Create a companion with the standard inheritance fractions.
    #[must_use]
    pub fn new(base_health: f32, base_mana: f32) -> Self {
        // Strength, Agility, Stamina, Intellect.
        let inherit = [0.7, 0.0, 0.3, 0.3];
        Self {
            inherit,
            base_stats: [0.0; Stat::COUNT],
            base_health,
            base_mana,
            ap_per_strength: 2.0,
            max_health: 0,
            max_mana: 0,
            attack_power: 0.0,
        }
    }

    /// Total value of a stat given the owner's current value.
    #[must_use]
    pub fn total_stat(&self, stat: Stat, owner_value: f32) -> f32 {
        self.base_stats[stat.index()] + owner_value * self.inherit[stat.index()]
    }

    /// Recompute the derived value that depends on one stat.
    ///
    /// `owner_value` is the owner's committed value for the same stat
    /// index. Agility has no companion-derived value and is a no-op.
    pub fn update_stat(&mut self, stat: Stat, owner_value: f32) {
        let total = self.total_stat(stat, owner_value);
        match stat {
            Stat::Strength => {
                self.attack_power = (total * self.ap_per_strength).max(0.0);
            }
            Stat::Stamina => {
                let health = self.base_health + health_bonus_from_stamina(total);
                self.max_health = health.max(0.0) as u32;
            }
            Stat::Intellect => {
                let mana = self.base_mana + mana_bonus_from_intellect(total);
                self.max_mana = mana.max(0.0).round() as u32;
            }
            Stat::Agility => {}
        }
    }
}
