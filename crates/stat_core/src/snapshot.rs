//! The published derived-stat snapshot and its replication delta.
//!
//! Every field here is a pure function of the owning character's modifier
//! layers, rating state, level, class and active auras at the instant of
//! the last recompute. The pipeline writes into a scratch copy and commits
//! it atomically; [`StatSnapshot::diff`] yields the changed fields so the
//! replication layer only syncs what moved.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::stats::{AttackType, PowerType, SpellSchool, Stat};

/// One externally visible snapshot field, for dirty marking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SnapshotField {
    /// A primary stat value.
    Stat(Stat),
    /// Maximum health.
    MaxHealth,
    /// Maximum pool for a power type.
    MaxPower(PowerType),
    /// Armor value.
    Armor,
    /// Melee attack power.
    AttackPower,
    /// Ranged attack power.
    RangedAttackPower,
    /// Physical damage range for an attack type.
    Damage(AttackType),
    /// Modified attack time for an attack type.
    AttackTime(AttackType),
    /// Crit chance for an attack type.
    Crit(AttackType),
    /// Hit chance for an attack type.
    Hit(AttackType),
    /// Haste percentage for an attack type.
    Haste(AttackType),
    /// Spell crit chance.
    SpellCrit,
    /// Spell hit chance.
    SpellHit,
    /// Spell haste percentage.
    SpellHaste,
    /// Dodge chance.
    Dodge,
    /// Parry chance.
    Parry,
    /// Block chance.
    Block,
    /// Expertise for a hand.
    Expertise(AttackType),
    /// Armor penetration percentage.
    ArmorPenetration,
    /// Mastery value.
    Mastery,
    /// Versatility damage-done percentage.
    VersatilityDamage,
    /// Versatility damage-done display mirror.
    VersatilityDamageDisplay,
    /// Versatility healing-taken multiplier.
    VersatilityHealing,
    /// Leech percentage.
    Lifesteal,
    /// Avoidance percentage.
    Avoidance,
    /// Movement speed bonus percentage.
    SpeedBonus,
    /// Resilience mitigation percentage.
    Resilience,
    /// Spell power for a school.
    SpellPower(SpellSchool),
    /// Bonus healing.
    SpellHealing,
    /// Mana regeneration rate.
    ManaRegen,
    /// Resistance for a school.
    Resistance(SpellSchool),
    /// Rune cooldown.
    RuneCooldown,
    /// Corruption / corruption-resistance pair and effective value.
    Corruption,
    /// Set of active corruption effect ids.
    CorruptionEffects,
}

/// The externally visible result of a recompute pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSnapshot {
    /// Primary stat values.
    pub stats: [f32; Stat::COUNT],
    /// Maximum health.
    pub max_health: u32,
    /// Maximum pool per power type.
    pub max_power: [u32; PowerType::COUNT],
    /// Armor (also the physical resistance slot).
    pub armor: f32,
    /// Melee attack power.
    pub attack_power: f32,
    /// Ranged attack power.
    pub ranged_attack_power: f32,
    /// Physical damage `(min, max)` per attack type.
    pub damage: [(f32, f32); AttackType::COUNT],
    /// Haste-modified attack time per attack type, in milliseconds.
    pub attack_time_ms: [u32; AttackType::COUNT],
    /// Crit chance per attack type.
    pub crit: [f32; AttackType::COUNT],
    /// Hit chance per attack type.
    pub hit: [f32; AttackType::COUNT],
    /// Haste percentage per attack type.
    pub haste: [f32; AttackType::COUNT],
    /// Spell crit chance.
    pub spell_crit: f32,
    /// Spell hit chance.
    pub spell_hit: f32,
    /// Spell haste percentage (cast-time modifier).
    pub spell_haste: f32,
    /// Dodge chance.
    pub dodge: f32,
    /// Parry chance.
    pub parry: f32,
    /// Block chance.
    pub block: f32,
    /// Expertise per hand (main-hand, off-hand).
    pub expertise: [f32; 2],
    /// Armor penetration percentage.
    pub armor_penetration: f32,
    /// Mastery value.
    pub mastery: f32,
    /// Versatility damage-done percentage.
    pub versatility_damage: f32,
    /// Display mirror of [`StatSnapshot::versatility_damage`].
    pub versatility_damage_display: f32,
    /// Versatility healing-taken multiplier (floor 1.0, no cap).
    pub versatility_healing_mult: f32,
    /// Leech percentage.
    pub lifesteal: f32,
    /// Avoidance percentage.
    pub avoidance: f32,
    /// Movement speed bonus percentage.
    pub speed_bonus: f32,
    /// Resilience mitigation percentage.
    pub resilience: f32,
    /// Spell power per school.
    pub spell_power: [f32; SpellSchool::COUNT],
    /// Bonus healing.
    pub spell_healing: f32,
    /// Mana regeneration rate.
    pub mana_regen: f32,
    /// Resistance per school; the physical slot mirrors armor.
    pub resistances: [f32; SpellSchool::COUNT],
    /// Rune cooldown in milliseconds (zero for runeless classes).
    pub rune_cooldown_ms: u32,
    /// Corruption points.
    pub corruption: f32,
    /// Corruption-resistance points.
    pub corruption_resistance: f32,
    /// Effective corruption after resistance.
    pub effective_corruption: f32,
    /// Effect ids gated on by the current effective corruption.
    pub corruption_effects: Vec<u32>,
}

impl StatSnapshot {
    /// Create a zeroed snapshot with neutral multipliers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stats: [0.0; Stat::COUNT],
            max_health: 0,
            max_power: [0; PowerType::COUNT],
            armor: 0.0,
            attack_power: 0.0,
            ranged_attack_power: 0.0,
            damage: [(0.0, 0.0); AttackType::COUNT],
            attack_time_ms: [0; AttackType::COUNT],
            crit: [0.0; AttackType::COUNT],
            hit: [0.0; AttackType::COUNT],
            haste: [0.0; AttackType::COUNT],
            spell_crit: 0.0,
            spell_hit: 0.0,
            spell_haste: 0.0,
            dodge: 0.0,
            parry: 0.0,
            block: 0.0,
            expertise: [0.0; 2],
            armor_penetration: 0.0,
            mastery: 0.0,
            versatility_damage: 0.0,
            versatility_damage_display: 0.0,
            versatility_healing_mult: 1.0,
            lifesteal: 0.0,
            avoidance: 0.0,
            speed_bonus: 0.0,
            resilience: 0.0,
            spell_power: [0.0; SpellSchool::COUNT],
            spell_healing: 0.0,
            mana_regen: 0.0,
            resistances: [0.0; SpellSchool::COUNT],
            rune_cooldown_ms: 0,
            corruption: 0.0,
            corruption_resistance: 0.0,
            effective_corruption: 0.0,
            corruption_effects: Vec::new(),
        }
    }

    /// Fields whose values differ between `self` (the committed snapshot)
    /// and `newer` (the scratch copy about to be committed).
    #[must_use]
    pub fn diff(&self, newer: &Self) -> Vec<SnapshotField> {
        let mut dirty = Vec::new();

        for stat in Stat::all() {
            if self.stats[stat.index()] != newer.stats[stat.index()] {
                dirty.push(SnapshotField::Stat(stat));
            }
        }
        if self.max_health != newer.max_health {
            dirty.push(SnapshotField::MaxHealth);
        }
        for power in PowerType::all() {
            if self.max_power[power.index()] != newer.max_power[power.index()] {
                dirty.push(SnapshotField::MaxPower(power));
            }
        }
        if self.armor != newer.armor {
            dirty.push(SnapshotField::Armor);
        }
        if self.attack_power != newer.attack_power {
            dirty.push(SnapshotField::AttackPower);
        }
        if self.ranged_attack_power != newer.ranged_attack_power {
            dirty.push(SnapshotField::RangedAttackPower);
        }
        for attack in AttackType::all() {
            let i = attack.index();
            if self.damage[i] != newer.damage[i] {
                dirty.push(SnapshotField::Damage(attack));
            }
            if self.attack_time_ms[i] != newer.attack_time_ms[i] {
                dirty.push(SnapshotField::AttackTime(attack));
            }
            if self.crit[i] != newer.crit[i] {
                dirty.push(SnapshotField::Crit(attack));
            }
            if self.hit[i] != newer.hit[i] {
                dirty.push(SnapshotField::Hit(attack));
            }
            if self.haste[i] != newer.haste[i] {
                dirty.push(SnapshotField::Haste(attack));
            }
        }
        if self.spell_crit != newer.spell_crit {
            dirty.push(SnapshotField::SpellCrit);
        }
        if self.spell_hit != newer.spell_hit {
            dirty.push(SnapshotField::SpellHit);
        }
        if self.spell_haste != newer.spell_haste {
            dirty.push(SnapshotField::SpellHaste);
        }
        if self.dodge != newer.dodge {
            dirty.push(SnapshotField::Dodge);
        }
        if self.parry != newer.parry {
            dirty.push(SnapshotField::Parry);
        }
        if self.block != newer.block {
            dirty.push(SnapshotField::Block);
        }
        for (hand, attack) in [AttackType::MainHand, AttackType::OffHand].into_iter().enumerate() {
            if self.expertise[hand] != newer.expertise[hand] {
                dirty.push(SnapshotField::Expertise(attack));
            }
        }
        if self.armor_penetration != newer.armor_penetration {
            dirty.push(SnapshotField::ArmorPenetration);
        }
        if self.mastery != newer.mastery {
            dirty.push(SnapshotField::Mastery);
        }
        if self.versatility_damage != newer.versatility_damage {
            dirty.push(SnapshotField::VersatilityDamage);
        }
        if self.versatility_damage_display != newer.versatility_damage_display {
            dirty.push(SnapshotField::VersatilityDamageDisplay);
        }
        if self.versatility_healing_mult != newer.versatility_healing_mult {
            dirty.push(SnapshotField::VersatilityHealing);
        }
        if self.lifesteal != newer.lifesteal {
            dirty.push(SnapshotField::Lifesteal);
        }
        if self.avoidance != newer.avoidance {
            dirty.push(SnapshotField::Avoidance);
        }
        if self.speed_bonus != newer.speed_bonus {
            dirty.push(SnapshotField::SpeedBonus);
        }
        if self.resilience != newer.resilience {
            dirty.push(SnapshotField::Resilience);
        }
        for school in SpellSchool::all() {
            let i = school.index();
            if self.spell_power[i] != newer.spell_power[i] {
                dirty.push(SnapshotField::SpellPower(school));
            }
            if self.resistances[i] != newer.resistances[i] {
                dirty.push(SnapshotField::Resistance(school));
            }
        }
        if self.spell_healing != newer.spell_healing {
            dirty.push(SnapshotField::SpellHealing);
        }
        if self.mana_regen != newer.mana_regen {
            dirty.push(SnapshotField::ManaRegen);
        }
        if self.rune_cooldown_ms != newer.rune_cooldown_ms {
            dirty.push(SnapshotField::RuneCooldown);
        }
        if self.corruption != newer.corruption
            || self.corruption_resistance != newer.corruption_resistance
            || self.effective_corruption != newer.effective_corruption
        {
            dirty.push(SnapshotField::Corruption);
        }
        if self.corruption_effects != newer.corruption_effects {
            dirty.push(SnapshotField::CorruptionEffects);
        }

        dirty
    }

    /// Hash of every published value, via float bit patterns.
    ///
    /// Two snapshots hash equal exactly when every field is bit-identical,
    /// which is the idempotence contract of the pipeline.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        for v in self.stats {
            v.to_bits().hash(&mut hasher);
        }
        self.max_health.hash(&mut hasher);
        self.max_power.hash(&mut hasher);
        self.armor.to_bits().hash(&mut hasher);
        self.attack_power.to_bits().hash(&mut hasher);
        self.ranged_attack_power.to_bits().hash(&mut hasher);
        for (lo, hi) in self.damage {
            lo.to_bits().hash(&mut hasher);
            hi.to_bits().hash(&mut hasher);
        }
        self.attack_time_ms.hash(&mut hasher);
        for v in self.crit.iter().chain(&self.hit).chain(&self.haste) {
            v.to_bits().hash(&mut hasher);
        }
        self.spell_crit.to_bits().hash(&mut hasher);
        self.spell_hit.to_bits().hash(&mut hasher);
        self.spell_haste.to_bits().hash(&mut hasher);
        self.dodge.to_bits().hash(&mut hasher);
        self.parry.to_bits().hash(&mut hasher);
        self.block.to_bits().hash(&mut hasher);
        for v in self.expertise {
            v.to_bits().hash(&mut hasher);
        }
        self.armor_penetration.to_bits().hash(&mut hasher);
        self.mastery.to_bits().hash(&mut hasher);
        self.versatility_damage.to_bits().hash(&mut hasher);
        self.versatility_damage_display.to_bits().hash(&mut hasher);
        self.versatility_healing_mult.to_bits().hash(&mut hasher);
        self.lifesteal.to_bits().hash(&mut hasher);
        self.avoidance.to_bits().hash(&mut hasher);
        self.speed_bonus.to_bits().hash(&mut hasher);
        self.resilience.to_bits().hash(&mut hasher);
        for v in self.spell_power.iter().chain(&self.resistances) {
            v.to_bits().hash(&mut hasher);
        }
        self.spell_healing.to_bits().hash(&mut hasher);
        self.mana_regen.to_bits().hash(&mut hasher);
        self.rune_cooldown_ms.hash(&mut hasher);
        self.corruption.to_bits().hash(&mut hasher);
        self.corruption_resistance.to_bits().hash(&mut hasher);
        self.effective_corruption.to_bits().hash(&mut hasher);
        self.corruption_effects.hash(&mut hasher);

        hasher.finish()
    }
}

impl Default for StatSnapshot {
    fn default() -> Self {
        Self::new()
    }
}
