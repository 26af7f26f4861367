//! The derived-stat recompute pipeline.
//!
//! Recompute is a straight-line pass in fixed dependency order: primary
//! stats, armor, attack power and weapon damage, resource pools, combat
//! ratings and their dependent percentages, spell power and regeneration.
//! Later stages read earlier results and must not be reordered.
//!
//! Every pass writes into a scratch copy of the snapshot and commits it
//! atomically at the end, so callers never observe a half-updated
//! snapshot. A full pass with no intervening modifier change is
//! idempotent down to the bit pattern. No stage can fail: missing
//! reference rows fall back to neutral values, capability-gated
//! statistics short-circuit to zero, and negative invariants clamp.

use crate::auras::{AuraKind, SPELL_EFFECT_MASK};
use crate::character::{Character, CharacterId, Roster, ShapeshiftForm, Weapon};
use crate::classes::CharacterClass;
use crate::data::{ReferenceTables, StatCaps};
use crate::error::{Result, StatError};
use crate::ratings::{aggregate_rating, CombatRating};
use crate::snapshot::{SnapshotField, StatSnapshot};
use crate::stats::{AttackType, ModKind, PowerType, SpellSchool, Stat, UnitMod};

/// Attack power per point of DPS in normalized weapon damage.
pub const ATTACK_POWER_PER_DPS: f32 = 14.0;

/// Armor granted per point of agility.
pub const ARMOR_PER_AGILITY: f32 = 2.0;

/// Mastery value before any rating contribution.
pub const BASE_MASTERY: f32 = 8.0;

/// Rune cooldown before haste, in milliseconds.
pub const BASE_RUNE_COOLDOWN_MS: f32 = 10_000.0;

/// Attack round time with no weapon equipped, in milliseconds.
pub const BASE_ATTACK_TIME_MS: u32 = 2000;

/// Floor on the attack-power normalization multiplier, in seconds.
pub const MIN_AP_NORMALIZATION_SECS: f32 = 0.25;

/// Unarmed damage per level (minimum roll).
const FIST_DAMAGE_MIN_PER_LEVEL: f32 = 0.5;

/// Unarmed damage per level (maximum roll).
const FIST_DAMAGE_MAX_PER_LEVEL: f32 = 1.5;

/// Health granted by stamina: the first 20 points give 1 health each,
/// the rest 10 health each.
#[must_use]
pub fn health_bonus_from_stamina(stamina: f32) -> f32 {
    let direct = stamina.min(20.0);
    let scaled = (stamina - 20.0).max(0.0);
    direct + scaled * 10.0
}

/// Mana granted by intellect: the first 20 points give 1 mana each,
/// the rest 15 mana each.
#[must_use]
pub fn mana_bonus_from_intellect(intellect: f32) -> f32 {
    let direct = intellect.min(20.0);
    let scaled = (intellect - 20.0).max(0.0);
    direct + scaled * 15.0
}

/// Events produced by one recompute pass.
///
/// Consumed by the replication layer (dirty fields) and useful for
/// asserting propagation behavior in tests.
#[derive(Debug, Clone, Default)]
pub struct RecomputeEvents {
    /// Snapshot fields whose value changed this pass.
    pub dirty: Vec<SnapshotField>,
    /// Stats pushed to the companion this pass.
    pub companion_updates: Vec<Stat>,
}

impl Character {
    // ========================================================================
    // Public recompute surface
    // ========================================================================

    /// Run the full pipeline in dependency order and commit the result.
    pub fn update_all_stats(&mut self, tables: &ReferenceTables) -> RecomputeEvents {
        let mut scratch = self.snapshot.clone();

        // 1. Primary stats.
        self.compute_primary_stats(&mut scratch);

        // 2. Armor, then attack power (armor feeds attack power).
        self.compute_armor(&mut scratch);
        self.compute_attack_power(tables, &mut scratch);

        // 3. Physical damage per weapon slot.
        for attack in AttackType::all() {
            self.compute_weapon_damage(attack, &mut scratch);
        }

        // 4. Resource pools.
        self.compute_max_health(tables, &mut scratch);
        for power in PowerType::all() {
            self.compute_max_power(tables, power, &mut scratch);
        }

        // 5. Ratings, then everything derived from them.
        self.refresh_ratings();
        self.compute_crit(tables, &mut scratch);
        self.compute_dodge(tables, &mut scratch);
        self.compute_parry(tables, &mut scratch);
        self.compute_block(tables, &mut scratch);
        self.compute_hit(tables, &mut scratch);
        self.compute_haste(tables, &mut scratch);
        self.compute_expertise(tables, &mut scratch);
        self.compute_armor_penetration(tables, &mut scratch);
        self.compute_mastery(tables, &mut scratch);
        self.compute_versatility(tables, &mut scratch);
        self.compute_tertiary(tables, &mut scratch);
        self.compute_resilience(tables, &mut scratch);
        self.compute_corruption(tables, &mut scratch);

        // 6. Spell power, resistances, regeneration.
        self.compute_spell_power(tables, &mut scratch);
        self.compute_resistances(&mut scratch);
        self.compute_mana_regen(tables, &mut scratch);

        let events = self.commit(scratch);

        #[cfg(debug_assertions)]
        {
            tracing::debug!(
                hash = self.snapshot.state_hash(),
                dirty = events.dirty.len(),
                "Full stat recompute"
            );
        }

        events
    }

    /// Recompute one primary stat and the statistics derived from it.
    pub fn update_stat(&mut self, tables: &ReferenceTables, stat: Stat) -> RecomputeEvents {
        let mut scratch = self.snapshot.clone();
        scratch.stats[stat.index()] = self.compute_stat_value(stat);

        // An armor-from-stat aura can hang armor off any attribute, and
        // armor feeds attack power.
        let feeds_armor = stat == Stat::Agility
            || self
                .auras
                .of_kind(AuraKind::ArmorOfStatPct)
                .any(|e| e.misc_a == stat.index() as i32);
        if feeds_armor {
            self.compute_armor(&mut scratch);
        }
        if feeds_armor || stat == Stat::Strength {
            self.compute_attack_power(tables, &mut scratch);
            for attack in AttackType::all() {
                self.compute_weapon_damage(attack, &mut scratch);
            }
        }

        match stat {
            Stat::Strength => {}
            Stat::Agility => {
                self.compute_crit(tables, &mut scratch);
                self.compute_dodge(tables, &mut scratch);
            }
            Stat::Stamina => {
                self.compute_max_health(tables, &mut scratch);
            }
            Stat::Intellect => {
                self.compute_max_power(tables, PowerType::Mana, &mut scratch);
                self.compute_crit(tables, &mut scratch);
                self.compute_spell_power(tables, &mut scratch);
            }
        }

        self.commit(scratch)
    }

    /// Re-aggregate one combat rating and recompute its dependent effect.
    pub fn update_rating(
        &mut self,
        tables: &ReferenceTables,
        rating: CombatRating,
    ) -> RecomputeEvents {
        self.rating[rating.index()] =
            aggregate_rating(rating, &self.rating_base, &self.auras);
        tracing::trace!(?rating, value = self.rating[rating.index()], "Rating aggregated");

        let mut scratch = self.snapshot.clone();
        match rating {
            CombatRating::Dodge => self.compute_dodge(tables, &mut scratch),
            CombatRating::Parry => self.compute_parry(tables, &mut scratch),
            CombatRating::Block => self.compute_block(tables, &mut scratch),
            CombatRating::CritMelee | CombatRating::CritRanged | CombatRating::CritSpell => {
                self.compute_crit(tables, &mut scratch);
            }
            CombatRating::HitMelee | CombatRating::HitRanged | CombatRating::HitSpell => {
                self.compute_hit(tables, &mut scratch);
            }
            CombatRating::HasteMelee
            | CombatRating::HasteRanged
            | CombatRating::HasteSpell => self.compute_haste(tables, &mut scratch),
            CombatRating::Expertise => self.compute_expertise(tables, &mut scratch),
            CombatRating::ArmorPenetration => {
                self.compute_armor_penetration(tables, &mut scratch);
            }
            CombatRating::Mastery => self.compute_mastery(tables, &mut scratch),
            CombatRating::Resilience => self.compute_resilience(tables, &mut scratch),
            CombatRating::VersatilityDamage | CombatRating::VersatilityHealing => {
                self.compute_versatility(tables, &mut scratch);
            }
            CombatRating::Lifesteal | CombatRating::Avoidance | CombatRating::Speed => {
                self.compute_tertiary(tables, &mut scratch);
            }
            CombatRating::Corruption | CombatRating::CorruptionResistance => {
                self.compute_corruption(tables, &mut scratch);
            }
        }

        self.commit(scratch)
    }

    /// Apply or remove a rating allocation, then recompute the category
    /// and every rating coupled to its base allocation.
    pub fn apply_rating_mod(
        &mut self,
        tables: &ReferenceTables,
        rating: CombatRating,
        amount: f32,
        apply: bool,
    ) -> RecomputeEvents {
        let delta = if apply { amount } else { -amount };
        self.rating_base[rating.index()] += delta;

        // Coupling auras read base allocations, so targets whose
        // dependent set includes this category go stale with it.
        let mut coupled_targets = 0u32;
        for effect in self.auras.of_kind(AuraKind::RatingFromMaxOf) {
            if effect.misc_b as u32 & rating.mask() != 0 {
                coupled_targets |= effect.misc_a as u32;
            }
        }

        let mut events = self.update_rating(tables, rating);
        for target in CombatRating::all() {
            if target != rating && coupled_targets & target.mask() != 0 {
                let more = self.update_rating(tables, target);
                events.dirty.extend(more.dirty);
                events.companion_updates.extend(more.companion_updates);
            }
        }
        events
    }

    /// Apply or remove a modifier on a unit-mod layer and recompute the
    /// categories it feeds.
    pub fn apply_stat_modifier(
        &mut self,
        tables: &ReferenceTables,
        unit_mod: UnitMod,
        kind: ModKind,
        amount: f32,
        apply: bool,
    ) -> RecomputeEvents {
        self.layers[unit_mod.index()].apply(kind, amount, apply);

        match unit_mod {
            UnitMod::StatStrength => self.update_stat(tables, Stat::Strength),
            UnitMod::StatAgility => self.update_stat(tables, Stat::Agility),
            UnitMod::StatStamina => self.update_stat(tables, Stat::Stamina),
            UnitMod::StatIntellect => self.update_stat(tables, Stat::Intellect),
            UnitMod::Health => {
                let mut scratch = self.snapshot.clone();
                self.compute_max_health(tables, &mut scratch);
                self.commit(scratch)
            }
            UnitMod::PowerMana
            | UnitMod::PowerRage
            | UnitMod::PowerFocus
            | UnitMod::PowerEnergy
            | UnitMod::PowerRunicPower => {
                let power = match unit_mod {
                    UnitMod::PowerMana => PowerType::Mana,
                    UnitMod::PowerRage => PowerType::Rage,
                    UnitMod::PowerFocus => PowerType::Focus,
                    UnitMod::PowerEnergy => PowerType::Energy,
                    _ => PowerType::RunicPower,
                };
                let mut scratch = self.snapshot.clone();
                self.compute_max_power(tables, power, &mut scratch);
                self.commit(scratch)
            }
            UnitMod::Armor => {
                let mut scratch = self.snapshot.clone();
                self.compute_armor(&mut scratch);
                self.compute_attack_power(tables, &mut scratch);
                for attack in AttackType::all() {
                    self.compute_weapon_damage(attack, &mut scratch);
                }
                self.commit(scratch)
            }
            UnitMod::AttackPower | UnitMod::RangedAttackPower => {
                let mut scratch = self.snapshot.clone();
                self.compute_attack_power(tables, &mut scratch);
                for attack in AttackType::all() {
                    self.compute_weapon_damage(attack, &mut scratch);
                }
                self.commit(scratch)
            }
            UnitMod::DamageMainHand => self.update_damage(AttackType::MainHand),
            UnitMod::DamageOffHand => self.update_damage(AttackType::OffHand),
            UnitMod::DamageRanged => self.update_damage(AttackType::Ranged),
        }
    }

    /// Change level and rerun the whole pipeline.
    pub fn set_level(&mut self, tables: &ReferenceTables, level: u32) -> RecomputeEvents {
        self.level = level;
        self.update_all_stats(tables)
    }

    /// Equip or unequip a weapon and recompute the affected statistics.
    pub fn equip_weapon(
        &mut self,
        tables: &ReferenceTables,
        attack: AttackType,
        weapon: Option<Weapon>,
    ) -> RecomputeEvents {
        self.weapons[attack.index()] = weapon;

        let mut scratch = self.snapshot.clone();
        self.compute_weapon_damage(attack, &mut scratch);
        self.compute_haste(tables, &mut scratch);
        self.compute_expertise(tables, &mut scratch);
        self.commit(scratch)
    }

    /// Set the disarm flag for an attack type and recompute its damage.
    pub fn set_disarmed(&mut self, attack: AttackType, disarmed: bool) -> RecomputeEvents {
        self.disarmed[attack.index()] = disarmed;
        self.update_damage(attack)
    }

    /// Change shapeshift form and recompute round-time-derived values.
    pub fn set_shapeshift(
        &mut self,
        tables: &ReferenceTables,
        form: Option<ShapeshiftForm>,
    ) -> RecomputeEvents {
        self.shapeshift = form;

        let mut scratch = self.snapshot.clone();
        for attack in AttackType::all() {
            self.compute_weapon_damage(attack, &mut scratch);
        }
        self.compute_haste(tables, &mut scratch);
        self.commit(scratch)
    }

    /// Recompute the damage range for one weapon slot.
    pub fn update_damage(&mut self, attack: AttackType) -> RecomputeEvents {
        let mut scratch = self.snapshot.clone();
        self.compute_weapon_damage(attack, &mut scratch);
        self.commit(scratch)
    }

    // ========================================================================
    // Stage computations (pure reads of committed state into scratch)
    // ========================================================================

    fn compute_stat_value(&self, stat: Stat) -> f32 {
        self.layers[UnitMod::from_stat(stat).index()].combine().max(0.0)
    }

    fn compute_primary_stats(&self, scratch: &mut StatSnapshot) {
        for stat in Stat::all() {
            scratch.stats[stat.index()] = self.compute_stat_value(stat);
        }
    }

    fn compute_armor(&self, scratch: &mut StatSnapshot) {
        let layer = &self.layers[UnitMod::Armor.index()];

        let mut stat_bonus = scratch.stats[Stat::Agility.index()] * ARMOR_PER_AGILITY;
        for effect in self.auras.of_kind(AuraKind::ArmorOfStatPct) {
            if let Some(stat) = Stat::from_index(effect.misc_a.max(0) as usize) {
                stat_bonus += scratch.stats[stat.index()] * effect.amount / 100.0;
            }
        }

        let value = layer.compose(0.0, stat_bonus).max(0.0);
        scratch.armor = value;
        scratch.resistances[SpellSchool::Physical.index()] = value;
    }

    fn compute_attack_power(&self, tables: &ReferenceTables, scratch: &mut StatSnapshot) {
        let row = tables.classes.row(self.class);
        let level = self.level as f32;
        let strength = scratch.stats[Stat::Strength.index()];
        let agility = scratch.stats[Stat::Agility.index()];

        let base = row.ap_base
            + row.ap_per_level * level
            + row.ap_per_strength * strength
            + row.ap_per_agility * agility;

        let mut armor_ap = 0.0;
        for effect in self.auras.of_kind(AuraKind::AttackPowerOfArmor) {
            if effect.amount != 0.0 {
                armor_ap += scratch.armor / effect.amount;
            }
        }

        scratch.attack_power = self.layers[UnitMod::AttackPower.index()]
            .compose(base, armor_ap)
            .max(0.0);

        let ranged_base = row.ranged_ap_base
            + row.ranged_ap_per_level * level
            + row.ranged_ap_per_agility * agility;
        scratch.ranged_attack_power = self.layers[UnitMod::RangedAttackPower.index()]
            .compose(ranged_base, 0.0)
            .max(0.0);
    }

    fn compute_weapon_damage(&self, attack: AttackType, scratch: &mut StatSnapshot) {
        let i = attack.index();
        if !self.can_use_attack(attack) {
            scratch.damage[i] = (0.0, 0.0);
            return;
        }

        let attack_power = if attack == AttackType::Ranged {
            scratch.ranged_attack_power
        } else {
            scratch.attack_power
        };

        let (weapon_min, weapon_max, weapon_time) = match &self.weapons[i] {
            Some(weapon) => (weapon.min_damage, weapon.max_damage, weapon.attack_time_ms),
            None if attack == AttackType::MainHand => {
                let level = self.level as f32;
                (
                    level * FIST_DAMAGE_MIN_PER_LEVEL,
                    level * FIST_DAMAGE_MAX_PER_LEVEL,
                    BASE_ATTACK_TIME_MS,
                )
            }
            // An empty off-hand or ranged slot simply deals nothing.
            None => {
                scratch.damage[i] = (0.0, 0.0);
                return;
            }
        };

        let round_ms = if attack == AttackType::Ranged {
            weapon_time
        } else {
            self.shapeshift
                .map_or(weapon_time, ShapeshiftForm::combat_round_time_ms)
        };
        let normalization = (round_ms as f32 / 1000.0).max(MIN_AP_NORMALIZATION_SECS);
        let ap_bonus = attack_power / ATTACK_POWER_PER_DPS * normalization;

        let layer = &self.layers[UnitMod::from_attack(attack).index()];
        let min = layer.compose(weapon_min + ap_bonus, 0.0).max(0.0);
        let max = layer.compose(weapon_max + ap_bonus, 0.0).max(0.0);
        scratch.damage[i] = (min, max);
    }

    fn compute_max_health(&self, tables: &ReferenceTables, scratch: &mut StatSnapshot) {
        let base = tables.resources.base_health(self.class, self.level);
        let stamina_bonus = health_bonus_from_stamina(scratch.stats[Stat::Stamina.index()]);

        let value = self.layers[UnitMod::Health.index()]
            .compose(base, stamina_bonus)
            .max(0.0);
        scratch.max_health = value as u32;
    }

    fn compute_max_power(
        &self,
        tables: &ReferenceTables,
        power: PowerType,
        scratch: &mut StatSnapshot,
    ) {
        let base = tables.resources.base_power(self.class, power, self.level);
        let intellect_bonus = if power == PowerType::Mana && self.class.power_type() == power {
            mana_bonus_from_intellect(scratch.stats[Stat::Intellect.index()])
        } else {
            0.0
        };

        let value = self.layers[UnitMod::from_power(power).index()]
            .compose(base, intellect_bonus)
            .max(0.0);
        scratch.max_power[power.index()] = value.round() as u32;
    }

    fn refresh_ratings(&mut self) {
        let mut ratings = [0.0; CombatRating::COUNT];
        for rating in CombatRating::all() {
            ratings[rating.index()] = aggregate_rating(rating, &self.rating_base, &self.auras);
        }
        self.rating = ratings;
    }

    fn rating_bonus(&self, tables: &ReferenceTables, rating: CombatRating) -> f32 {
        tables.rating_bonus(rating, self.rating[rating.index()], self.level)
    }

    fn compute_crit(&self, tables: &ReferenceTables, scratch: &mut StatSnapshot) {
        let row = tables.classes.row(self.class);
        let agility = scratch.stats[Stat::Agility.index()];
        let intellect = scratch.stats[Stat::Intellect.index()];

        let agility_crit = if row.agility_per_crit > 0.0 {
            agility / row.agility_per_crit
        } else {
            0.0
        };
        let intellect_crit = if row.intellect_per_crit > 0.0 {
            intellect / row.intellect_per_crit
        } else {
            0.0
        };

        let melee_mask = AttackType::MainHand.mask() | AttackType::OffHand.mask();
        let melee = row.base_crit_melee
            + agility_crit
            + self.rating_bonus(tables, CombatRating::CritMelee)
            + self.auras.total_for_mask(AuraKind::CritFlatPct, melee_mask);
        let ranged = row.base_crit_melee
            + agility_crit
            + self.rating_bonus(tables, CombatRating::CritRanged)
            + self
                .auras
                .total_for_mask(AuraKind::CritFlatPct, AttackType::Ranged.mask());
        let spell = row.base_crit_spell
            + intellect_crit
            + self.rating_bonus(tables, CombatRating::CritSpell)
            + self
                .auras
                .total_for_mask(AuraKind::CritFlatPct, SPELL_EFFECT_MASK);

        let cap = tables.caps.crit;
        let melee = StatCaps::clamp(melee.max(0.0), cap);
        let ranged = StatCaps::clamp(ranged.max(0.0), cap);
        let spell = StatCaps::clamp(spell.max(0.0), cap);

        scratch.crit[AttackType::MainHand.index()] = melee;
        scratch.crit[AttackType::OffHand.index()] = melee;
        scratch.crit[AttackType::Ranged.index()] = ranged;
        scratch.spell_crit = spell;
    }

    fn compute_dodge(&self, tables: &ReferenceTables, scratch: &mut StatSnapshot) {
        if !self.capabilities.can_dodge {
            scratch.dodge = 0.0;
            return;
        }
        let row = tables.classes.row(self.class);
        let dr = row.dodge_dr();
        if !dr.is_capped() {
            scratch.dodge = 0.0;
            return;
        }

        let agility = scratch.stats[Stat::Agility.index()];
        let agility_dodge = if row.agility_per_dodge > 0.0 {
            agility / row.agility_per_dodge
        } else {
            0.0
        };

        let diminishing = self.rating_bonus(tables, CombatRating::Dodge) + agility_dodge;
        let flat = self.auras.total(AuraKind::DodgeFlatPct);
        let value = dr.apply(diminishing, flat);
        scratch.dodge = StatCaps::clamp(value, tables.caps.dodge).max(0.0);
    }

    fn compute_parry(&self, tables: &ReferenceTables, scratch: &mut StatSnapshot) {
        if !self.capabilities.can_parry {
            scratch.parry = 0.0;
            return;
        }
        let dr = tables.classes.row(self.class).parry_dr();
        if !dr.is_capped() {
            scratch.parry = 0.0;
            return;
        }

        let diminishing = self.rating_bonus(tables, CombatRating::Parry);
        let flat = self.auras.total(AuraKind::ParryFlatPct);
        let value = dr.apply(diminishing, flat);
        scratch.parry = StatCaps::clamp(value, tables.caps.parry).max(0.0);
    }

    fn compute_block(&self, tables: &ReferenceTables, scratch: &mut StatSnapshot) {
        if !self.capabilities.can_block {
            scratch.block = 0.0;
            return;
        }
        let dr = tables.classes.row(self.class).block_dr();
        if !dr.is_capped() {
            scratch.block = 0.0;
            return;
        }

        let diminishing = self.rating_bonus(tables, CombatRating::Block);
        let flat = self.auras.total(AuraKind::BlockFlatPct);
        let value = dr.apply(diminishing, flat);
        scratch.block = StatCaps::clamp(value, tables.caps.block).max(0.0);
    }

    fn compute_hit(&self, tables: &ReferenceTables, scratch: &mut StatSnapshot) {
        let melee_mask = AttackType::MainHand.mask() | AttackType::OffHand.mask();
        let melee = self.rating_bonus(tables, CombatRating::HitMelee)
            + self.auras.total_for_mask(AuraKind::HitFlatPct, melee_mask);
        let ranged = self.rating_bonus(tables, CombatRating::HitRanged)
            + self
                .auras
                .total_for_mask(AuraKind::HitFlatPct, AttackType::Ranged.mask());
        let spell = self.rating_bonus(tables, CombatRating::HitSpell)
            + self
                .auras
                .total_for_mask(AuraKind::HitFlatPct, SPELL_EFFECT_MASK);

        scratch.hit[AttackType::MainHand.index()] = melee.max(0.0);
        scratch.hit[AttackType::OffHand.index()] = melee.max(0.0);
        scratch.hit[AttackType::Ranged.index()] = ranged.max(0.0);
        scratch.spell_hit = spell.max(0.0);
    }

    fn compute_haste(&self, tables: &ReferenceTables, scratch: &mut StatSnapshot) {
        let melee_mask = AttackType::MainHand.mask() | AttackType::OffHand.mask();
        let melee = self.haste_pct(tables, CombatRating::HasteMelee, melee_mask);
        let ranged = self.haste_pct(tables, CombatRating::HasteRanged, AttackType::Ranged.mask());
        let spell = self.haste_pct(tables, CombatRating::HasteSpell, SPELL_EFFECT_MASK);

        scratch.haste[AttackType::MainHand.index()] = melee;
        scratch.haste[AttackType::OffHand.index()] = melee;
        scratch.haste[AttackType::Ranged.index()] = ranged;
        scratch.spell_haste = spell;

        for attack in AttackType::all() {
            let i = attack.index();
            let base_time = match &self.weapons[i] {
                Some(weapon) => weapon.attack_time_ms,
                None if attack == AttackType::MainHand => BASE_ATTACK_TIME_MS,
                None => {
                    scratch.attack_time_ms[i] = 0;
                    continue;
                }
            };
            let base_time = if attack == AttackType::Ranged {
                base_time
            } else {
                self.shapeshift
                    .map_or(base_time, ShapeshiftForm::combat_round_time_ms)
            };
            let haste = scratch.haste[i];
            scratch.attack_time_ms[i] =
                (base_time as f32 / (1.0 + haste / 100.0)).round() as u32;
        }

        // Rune cooldowns track melee haste for the one class that has them.
        scratch.rune_cooldown_ms = if self.class == CharacterClass::Runeknight {
            (BASE_RUNE_COOLDOWN_MS / (1.0 + melee / 100.0)).round() as u32
        } else {
            0
        };
    }

    fn haste_pct(&self, tables: &ReferenceTables, rating: CombatRating, mask: u32) -> f32 {
        let from_rating = 1.0 + self.rating_bonus(tables, rating) / 100.0;
        let from_auras = self.auras.multiplier_for_mask(AuraKind::HastePct, mask);
        (from_rating * from_auras - 1.0) * 100.0
    }

    fn compute_expertise(&self, tables: &ReferenceTables, scratch: &mut StatSnapshot) {
        let bonus = self.rating_bonus(tables, CombatRating::Expertise);

        for (slot, attack) in [AttackType::MainHand, AttackType::OffHand]
            .into_iter()
            .enumerate()
        {
            if !self.capabilities.can_use_attack[attack.index()] {
                scratch.expertise[slot] = 0.0;
                continue;
            }

            let mut value = bonus;
            let equipped = self.weapons[attack.index()].map(|w| w.class);
            for effect in self.auras.of_kind(AuraKind::ExpertiseFlat) {
                match effect.weapon_class {
                    None => value += effect.amount,
                    Some(required) if equipped == Some(required) => value += effect.amount,
                    Some(_) => {}
                }
            }
            scratch.expertise[slot] = value.max(0.0);
        }
    }

    fn compute_armor_penetration(&self, tables: &ReferenceTables, scratch: &mut StatSnapshot) {
        let bonus = self.rating_bonus(tables, CombatRating::ArmorPenetration);
        scratch.armor_penetration = bonus.clamp(0.0, 100.0);
    }

    fn compute_mastery(&self, tables: &ReferenceTables, scratch: &mut StatSnapshot) {
        scratch.mastery = if self.capabilities.can_use_mastery {
            (BASE_MASTERY + self.rating_bonus(tables, CombatRating::Mastery)).max(0.0)
        } else {
            0.0
        };
    }

    fn compute_versatility(&self, tables: &ReferenceTables, scratch: &mut StatSnapshot) {
        let damage = self
            .rating_bonus(tables, CombatRating::VersatilityDamage)
            .max(0.0);
        scratch.versatility_damage = damage;
        scratch.versatility_damage_display = damage;

        let healing = self.rating_bonus(tables, CombatRating::VersatilityHealing);
        scratch.versatility_healing_mult = (1.0 + healing / 100.0).max(1.0);
    }

    fn compute_tertiary(&self, tables: &ReferenceTables, scratch: &mut StatSnapshot) {
        scratch.lifesteal = self.rating_bonus(tables, CombatRating::Lifesteal).max(0.0);
        scratch.avoidance = self.rating_bonus(tables, CombatRating::Avoidance).max(0.0);
        scratch.speed_bonus = self.rating_bonus(tables, CombatRating::Speed).max(0.0);
    }

    fn compute_resilience(&self, tables: &ReferenceTables, scratch: &mut StatSnapshot) {
        scratch.resilience = self.rating_bonus(tables, CombatRating::Resilience).max(0.0);
    }

    fn compute_corruption(&self, tables: &ReferenceTables, scratch: &mut StatSnapshot) {
        let corruption = self.rating_bonus(tables, CombatRating::Corruption).max(0.0);
        let resistance = self
            .rating_bonus(tables, CombatRating::CorruptionResistance)
            .max(0.0);
        let effective = (corruption - resistance).max(0.0);

        scratch.corruption = corruption;
        scratch.corruption_resistance = resistance;
        scratch.effective_corruption = effective;
        scratch.corruption_effects = tables.corruption.active(effective);
    }

    fn compute_spell_power(&self, tables: &ReferenceTables, scratch: &mut StatSnapshot) {
        let row = tables.classes.row(self.class);
        let intellect_power =
            row.spell_power_per_intellect * scratch.stats[Stat::Intellect.index()];

        for school in SpellSchool::all() {
            if school == SpellSchool::Physical {
                scratch.spell_power[school.index()] = 0.0;
                continue;
            }
            let flat = self
                .auras
                .total_for_mask(AuraKind::SpellPowerFlat, school.mask())
                + intellect_power;
            let multiplier = self
                .auras
                .multiplier_for_mask(AuraKind::SpellPowerPct, school.mask());
            scratch.spell_power[school.index()] = (flat * multiplier).max(0.0);
        }

        scratch.spell_healing =
            (self.auras.total(AuraKind::HealingPowerFlat) + intellect_power).max(0.0);
    }

    fn compute_mana_regen(&self, tables: &ReferenceTables, scratch: &mut StatSnapshot) {
        let base = tables.resources.base_mana_regen(self.level);
        let regen = base
            * self.auras.multiplier(AuraKind::ManaRegenPct)
            * self.auras.multiplier(AuraKind::PowerRegenPct);
        scratch.mana_regen = regen.max(0.0);
    }

    fn compute_resistances(&self, scratch: &mut StatSnapshot) {
        for school in SpellSchool::all() {
            if school == SpellSchool::Physical {
                continue; // armor owns the physical slot
            }
            let flat = self
                .auras
                .total_for_mask(AuraKind::ResistanceFlat, school.mask());
            let multiplier = self
                .auras
                .multiplier_for_mask(AuraKind::ResistancePct, school.mask());
            scratch.resistances[school.index()] = (flat * multiplier).max(0.0);
        }
    }

    // ========================================================================
    // Commit
    // ========================================================================

    /// Atomically publish a scratch snapshot: diff against the committed
    /// one, mark changed fields dirty, then push changed propagated stats
    /// to the companion.
    fn commit(&mut self, scratch: StatSnapshot) -> RecomputeEvents {
        let dirty = self.snapshot.diff(&scratch);

        let changed_primaries: Vec<Stat> = [Stat::Strength, Stat::Stamina, Stat::Intellect]
            .into_iter()
            .filter(|stat| {
                self.snapshot.stats[stat.index()] != scratch.stats[stat.index()]
            })
            .collect();

        self.dirty.extend(dirty.iter().copied());
        self.snapshot = scratch;

        let mut events = RecomputeEvents {
            dirty,
            companion_updates: Vec::new(),
        };

        for stat in changed_primaries {
            if let Some(companion) = self.companion.as_mut() {
                companion.update_stat(stat, self.snapshot.stats[stat.index()]);
                events.companion_updates.push(stat);
            }
        }

        events
    }
}

impl Roster {
    /// Run the full pipeline for a character by handle.
    ///
    /// # Errors
    ///
    /// Returns [`StatError::CharacterNotFound`] for an unknown handle.
    pub fn update_all_stats(
        &mut self,
        tables: &ReferenceTables,
        id: CharacterId,
    ) -> Result<RecomputeEvents> {
        self.get_mut(id)
            .map(|character| character.update_all_stats(tables))
            .ok_or(StatError::CharacterNotFound(id))
    }
}
