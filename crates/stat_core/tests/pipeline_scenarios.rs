//! End-to-end pipeline scenarios.

use stat_core::prelude::*;
use stat_test_utils::fixtures;

// ============================================================================
// Primary stats, armor, attack power
// ============================================================================

#[test]
fn test_seeded_primary_stats_publish() {
    let tables = fixtures::tables();
    let character = fixtures::warrior_at_cap(&tables);

    assert_eq!(character.stat(Stat::Strength), 120.0);
    assert_eq!(character.stat(Stat::Agility), 80.0);
    assert_eq!(character.stat(Stat::Stamina), 100.0);
    assert_eq!(character.stat(Stat::Intellect), 20.0);
}

#[test]
fn test_warrior_attack_power_formula() {
    let tables = fixtures::tables();
    let character = fixtures::warrior_at_cap(&tables);

    // ap_base + ap_per_level * level + ap_per_strength * strength
    let row = tables.classes.row(CharacterClass::Warrior);
    let expected = row.ap_base + row.ap_per_level * 60.0 + row.ap_per_strength * 120.0;
    assert!((character.snapshot().attack_power - expected).abs() < 1e-3);
}

#[test]
fn test_armor_from_agility() {
    let tables = fixtures::tables();
    let character = fixtures::warrior_at_cap(&tables);

    assert!((character.snapshot().armor - 160.0).abs() < 1e-3);
    // Physical resistance slot mirrors armor.
    let physical = character.snapshot().resistances[SpellSchool::Physical.index()];
    assert_eq!(physical, character.snapshot().armor);
}

#[test]
fn test_armor_of_stat_aura_feeds_armor() {
    let tables = fixtures::tables();
    let mut character = fixtures::warrior_at_cap(&tables);
    let before = character.snapshot().armor;

    // +50% of strength as bonus armor.
    character.auras.add(
        AuraEffect::new(AuraKind::ArmorOfStatPct, 50.0)
            .with_misc(Stat::Strength.index() as i32, 0),
    );
    character.update_all_stats(&tables);

    assert!((character.snapshot().armor - (before + 60.0)).abs() < 1e-3);
}

#[test]
fn test_incremental_stat_update_tracks_armor_aura() {
    let tables = fixtures::tables();
    let mut character = fixtures::warrior_at_cap(&tables);
    character.auras.add(
        AuraEffect::new(AuraKind::ArmorOfStatPct, 100.0)
            .with_misc(Stat::Stamina.index() as i32, 0),
    );
    character.update_all_stats(&tables);
    let before = character.snapshot().armor;

    // A single-stat stamina update must carry the aura-driven armor with it.
    character.apply_stat_modifier(&tables, UnitMod::StatStamina, ModKind::FlatBase, 40.0, true);
    assert!((character.snapshot().armor - (before + 40.0)).abs() < 1e-3);

    let incremental = character.snapshot().state_hash();
    character.update_all_stats(&tables);
    assert_eq!(character.snapshot().state_hash(), incremental);
}

#[test]
fn test_attack_power_of_armor_aura() {
    let tables = fixtures::tables();
    let mut character = fixtures::warrior_at_cap(&tables);
    let before = character.snapshot().attack_power;

    // 1 AP per 2 points of armor; warrior armor is 160.
    character
        .auras
        .add(AuraEffect::new(AuraKind::AttackPowerOfArmor, 2.0));
    character.update_all_stats(&tables);

    assert!((character.snapshot().attack_power - (before + 80.0)).abs() < 1e-3);
}

#[test]
fn test_negative_attack_power_clamps_to_zero() {
    let tables = fixtures::tables();
    let mut character = Character::new(CharacterClass::Mage, 1);
    // Mage at level 1 with no strength: ap_base is negative.
    character.update_all_stats(&tables);

    assert_eq!(character.snapshot().attack_power, 0.0);
}

// ============================================================================
// Weapon damage
// ============================================================================

#[test]
fn test_weapon_damage_includes_normalized_attack_power() {
    let tables = fixtures::tables();
    let mut character = fixtures::warrior_at_cap(&tables);
    character.equip_weapon(&tables, AttackType::MainHand, Some(fixtures::training_sword()));

    let ap = character.snapshot().attack_power;
    let ap_bonus = ap / 14.0 * 2.6;
    let (min, max) = character.snapshot().damage[AttackType::MainHand.index()];
    assert!((min - (50.0 + ap_bonus)).abs() < 1e-2);
    assert!((max - (90.0 + ap_bonus)).abs() < 1e-2);
}

#[test]
fn test_unarmed_main_hand_uses_fist_damage() {
    let tables = fixtures::tables();
    let character = fixtures::warrior_at_cap(&tables);

    let (min, max) = character.snapshot().damage[AttackType::MainHand.index()];
    assert!(min > 0.0);
    assert!(max > min);
    // Empty off-hand publishes nothing.
    assert_eq!(
        character.snapshot().damage[AttackType::OffHand.index()],
        (0.0, 0.0)
    );
}

#[test]
fn test_shapeshift_overrides_round_time() {
    let tables = fixtures::tables();
    let mut character = fixtures::seeded_character(
        &tables,
        CharacterClass::Druid,
        MAX_LEVEL,
        [90.0, 70.0, 80.0, 40.0],
    );
    character.equip_weapon(&tables, AttackType::MainHand, Some(fixtures::training_sword()));
    let staff_form = character.snapshot().damage[AttackType::MainHand.index()];

    character.set_shapeshift(&tables, Some(ShapeshiftForm::Cat));
    let cat_form = character.snapshot().damage[AttackType::MainHand.index()];

    // Cat form normalizes at 1.0s instead of the weapon's 2.6s, so the
    // attack-power contribution shrinks.
    assert!(cat_form.0 < staff_form.0);
    assert_eq!(character.snapshot().attack_time_ms[0], 1000);
}

#[test]
fn test_normalization_floor_applies_to_fast_rounds() {
    let tables = fixtures::tables();
    let mut character = fixtures::warrior_at_cap(&tables);

    let dagger = Weapon {
        class: WeaponClass::Dagger,
        min_damage: 10.0,
        max_damage: 20.0,
        attack_time_ms: 100, // absurdly fast: floor kicks in at 0.25s
    };
    character.equip_weapon(&tables, AttackType::MainHand, Some(dagger));

    let ap = character.snapshot().attack_power;
    let ap_bonus = ap / 14.0 * 0.25;
    let (min, _) = character.snapshot().damage[AttackType::MainHand.index()];
    assert!((min - (10.0 + ap_bonus)).abs() < 1e-2);
}

/// Scenario: disarmed main hand plus an unusable base attack publishes an
/// exactly-zero damage range and leaves the other slots untouched.
#[test]
fn test_disarmed_unusable_main_hand_zeroes_damage() {
    let tables = fixtures::tables();
    let mut character = fixtures::seeded_character(
        &tables,
        CharacterClass::Ranger,
        MAX_LEVEL,
        [50.0, 150.0, 80.0, 30.0],
    );
    character.equip_weapon(&tables, AttackType::MainHand, Some(fixtures::training_sword()));
    character.equip_weapon(&tables, AttackType::OffHand, Some(fixtures::training_sword()));
    character.equip_weapon(&tables, AttackType::Ranged, Some(fixtures::training_bow()));

    let off_hand_before = character.snapshot().damage[AttackType::OffHand.index()];
    let ranged_before = character.snapshot().damage[AttackType::Ranged.index()];
    assert!(off_hand_before.0 > 0.0);
    assert!(ranged_before.0 > 0.0);

    character.capabilities.can_use_attack[AttackType::MainHand.index()] = false;
    character.set_disarmed(AttackType::MainHand, true);

    assert_eq!(
        character.snapshot().damage[AttackType::MainHand.index()],
        (0.0, 0.0)
    );
    assert_eq!(
        character.snapshot().damage[AttackType::OffHand.index()],
        off_hand_before
    );
    assert_eq!(
        character.snapshot().damage[AttackType::Ranged.index()],
        ranged_before
    );
}

// ============================================================================
// Resource pools
// ============================================================================

#[test]
fn test_max_health_from_base_table_and_stamina() {
    let tables = fixtures::tables();
    let character = fixtures::warrior_at_cap(&tables);

    // Base 30 + 22 * 59 = 1328; stamina 100 gives 20 + 80 * 10 = 820.
    assert_eq!(character.snapshot().max_health, 2148);
}

#[test]
fn test_mana_pool_includes_intellect_bonus() {
    let tables = fixtures::tables();
    let character = fixtures::mage_at_cap(&tables);

    // Base 120 + 19 * 59 = 1241; intellect 150 gives 20 + 130 * 15 = 1970.
    assert_eq!(
        character.snapshot().max_power[PowerType::Mana.index()],
        3211
    );
}

#[test]
fn test_fixed_pools_ignore_intellect() {
    let tables = fixtures::tables();
    let character = fixtures::warrior_at_cap(&tables);

    assert_eq!(character.snapshot().max_power[PowerType::Rage.index()], 100);
    assert_eq!(character.snapshot().max_power[PowerType::Mana.index()], 0);
}

#[test]
fn test_health_pct_modifier_scales_pool() {
    let tables = fixtures::tables();
    let mut character = fixtures::warrior_at_cap(&tables);
    let before = character.snapshot().max_health;

    character.apply_stat_modifier(&tables, UnitMod::Health, ModKind::PctTotal, 10.0, true);
    let boosted = character.snapshot().max_health;
    assert!(boosted > before);

    character.apply_stat_modifier(&tables, UnitMod::Health, ModKind::PctTotal, 10.0, false);
    assert_eq!(character.snapshot().max_health, before);
}

// ============================================================================
// Avoidance: diminishing returns scenarios
// ============================================================================

/// Scenario: a melee class with zero dodge rating and zero flat dodge
/// publishes exactly zero.
#[test]
fn test_zero_inputs_give_exactly_zero_dodge() {
    let tables = fixtures::tables();
    let mut character = Character::new(CharacterClass::Warrior, MAX_LEVEL);
    character.update_all_stats(&tables);

    assert_eq!(character.snapshot().dodge, 0.0);
}

/// Scenario: 1000 dodge rating through an identity multiplier plus a 5%
/// flat contribution must equal the curve formula's own output.
#[test]
fn test_dodge_matches_curve_formula() {
    let mut tables = fixtures::tables();
    // Empty cost row: the zero table value falls back to a 1.0 multiplier.
    tables.rating_costs.costs[CombatRating::Dodge.index()].clear();

    let mut character = Character::new(CharacterClass::Warrior, MAX_LEVEL);
    character.apply_rating_mod(&tables, CombatRating::Dodge, 1000.0, true);
    character
        .auras
        .add(AuraEffect::new(AuraKind::DodgeFlatPct, 5.0));
    character.update_all_stats(&tables);

    let row = tables.classes.row(CharacterClass::Warrior);
    let ck = row.dodge_cap * row.dr_coefficient;
    let expected = row.dodge_cap * 1000.0 / (1000.0 + ck) + 5.0;

    assert!((character.snapshot().dodge - expected).abs() < 1e-4);
    assert!(character.snapshot().dodge < row.dodge_cap + 5.0);
}

#[test]
fn test_capless_class_parry_is_forced_zero() {
    let tables = fixtures::tables();
    let mut character = Character::new(CharacterClass::Priest, MAX_LEVEL);
    // Force the capability gate open: the zero class cap alone must keep
    // parry at zero even with absurd rating, without evaluating the curve.
    character.capabilities.can_parry = true;
    character.apply_rating_mod(&tables, CombatRating::Parry, 100_000.0, true);
    character
        .auras
        .add(AuraEffect::new(AuraKind::ParryFlatPct, 10.0));
    character.update_all_stats(&tables);

    assert_eq!(character.snapshot().parry, 0.0);
}

#[test]
fn test_server_cap_clamps_dodge() {
    let mut tables = fixtures::tables();
    tables.caps.dodge = Some(3.0);

    let mut character = fixtures::seeded_character(
        &tables,
        CharacterClass::Rogue,
        MAX_LEVEL,
        [60.0, 400.0, 90.0, 20.0],
    );
    character.apply_rating_mod(&tables, CombatRating::Dodge, 5000.0, true);

    assert_eq!(character.snapshot().dodge, 3.0);
}

#[test]
fn test_agility_contributes_to_dodge_through_the_curve() {
    let tables = fixtures::tables();
    let without = fixtures::seeded_character(
        &tables,
        CharacterClass::Rogue,
        MAX_LEVEL,
        [60.0, 0.0, 90.0, 20.0],
    );
    let with = fixtures::seeded_character(
        &tables,
        CharacterClass::Rogue,
        MAX_LEVEL,
        [60.0, 400.0, 90.0, 20.0],
    );

    assert!(with.snapshot().dodge > without.snapshot().dodge);
    let row = tables.classes.row(CharacterClass::Rogue);
    assert!(with.snapshot().dodge < row.dodge_cap);
}

// ============================================================================
// Ratings: crit, hit, haste, expertise, mastery, versatility
// ============================================================================

#[test]
fn test_crit_rating_raises_melee_crit() {
    let tables = fixtures::tables();
    let mut character = fixtures::warrior_at_cap(&tables);
    let before = character.snapshot().crit[AttackType::MainHand.index()];

    character.apply_rating_mod(&tables, CombatRating::CritMelee, 1400.0, true);
    let after = character.snapshot().crit[AttackType::MainHand.index()];

    // 1400 points at cost 14.0/1% = +100%.. pre-cap, melee only.
    assert!((after - before - 100.0).abs() < 1e-2);
    assert_eq!(
        character.snapshot().crit[AttackType::Ranged.index()],
        fixtures::warrior_at_cap(&tables).snapshot().crit[AttackType::Ranged.index()]
    );
}

#[test]
fn test_spell_crit_tracks_intellect() {
    let tables = fixtures::tables();
    let low = fixtures::seeded_character(
        &tables,
        CharacterClass::Mage,
        MAX_LEVEL,
        [20.0, 40.0, 60.0, 0.0],
    );
    let high = fixtures::mage_at_cap(&tables);

    assert!(high.snapshot().spell_crit > low.snapshot().spell_crit);
}

#[test]
fn test_hit_is_linear_in_rating() {
    let tables = fixtures::tables();
    let mut character = fixtures::warrior_at_cap(&tables);

    character.apply_rating_mod(&tables, CombatRating::HitMelee, 600.0, true);
    let first = character.snapshot().hit[AttackType::MainHand.index()];
    character.apply_rating_mod(&tables, CombatRating::HitMelee, 600.0, true);
    let second = character.snapshot().hit[AttackType::MainHand.index()];

    // No curve registered for hit: doubling the points doubles the bonus.
    assert!((second - 2.0 * first).abs() < 1e-3);
}

#[test]
fn test_haste_shortens_attack_time() {
    let tables = fixtures::tables();
    let mut character = fixtures::warrior_at_cap(&tables);
    character.equip_weapon(&tables, AttackType::MainHand, Some(fixtures::training_sword()));
    assert_eq!(character.snapshot().attack_time_ms[0], 2600);

    // 1000 points at cost 10.0/1% = +100% melee haste.
    character.apply_rating_mod(&tables, CombatRating::HasteMelee, 1000.0, true);
    assert_eq!(character.snapshot().attack_time_ms[0], 1300);
    assert!((character.snapshot().haste[0] - 100.0).abs() < 1e-3);
}

#[test]
fn test_haste_aura_compounds_multiplicatively() {
    let tables = fixtures::tables();
    let mut character = fixtures::warrior_at_cap(&tables);
    character.apply_rating_mod(&tables, CombatRating::HasteMelee, 500.0, true);
    let from_rating = character.snapshot().haste[0];

    let melee_mask = (AttackType::MainHand.mask() | AttackType::OffHand.mask()) as i32;
    character
        .auras
        .add(AuraEffect::new(AuraKind::HastePct, 20.0).with_misc(melee_mask, 0));
    character.update_all_stats(&tables);

    let expected = ((1.0 + from_rating / 100.0) * 1.2 - 1.0) * 100.0;
    assert!((character.snapshot().haste[0] - expected).abs() < 1e-3);
}

#[test]
fn test_rune_cooldown_tracks_melee_haste() {
    let tables = fixtures::tables();
    let mut runeknight = fixtures::seeded_character(
        &tables,
        CharacterClass::Runeknight,
        MAX_LEVEL,
        [110.0, 70.0, 120.0, 20.0],
    );
    assert_eq!(runeknight.snapshot().rune_cooldown_ms, 10_000);

    runeknight.apply_rating_mod(&tables, CombatRating::HasteMelee, 1000.0, true);
    assert_eq!(runeknight.snapshot().rune_cooldown_ms, 5000);

    // Other classes never publish a rune cooldown.
    let warrior = fixtures::warrior_at_cap(&tables);
    assert_eq!(warrior.snapshot().rune_cooldown_ms, 0);
}

#[test]
fn test_expertise_filters_on_equipped_weapon() {
    let tables = fixtures::tables();
    let mut character = fixtures::warrior_at_cap(&tables);
    character.equip_weapon(&tables, AttackType::MainHand, Some(fixtures::training_sword()));

    character.auras.add(
        AuraEffect::new(AuraKind::ExpertiseFlat, 6.0).with_weapon(WeaponClass::Sword),
    );
    character
        .auras
        .add(AuraEffect::new(AuraKind::ExpertiseFlat, 2.0).with_weapon(WeaponClass::Mace));
    character
        .auras
        .add(AuraEffect::new(AuraKind::ExpertiseFlat, 1.0));
    character.update_all_stats(&tables);

    // Sword bonus and the unconditional bonus apply; the mace bonus does not.
    assert!((character.snapshot().expertise[0] - 7.0).abs() < 1e-4);
    // Empty off-hand gets only the unconditional bonus.
    assert!((character.snapshot().expertise[1] - 1.0).abs() < 1e-4);
}

#[test]
fn test_mastery_gate() {
    let tables = fixtures::tables();
    let mut character = fixtures::warrior_at_cap(&tables);
    character.apply_rating_mod(&tables, CombatRating::Mastery, 1790.0, true);
    assert_eq!(character.snapshot().mastery, 0.0);

    character.capabilities.can_use_mastery = true;
    character.update_all_stats(&tables);
    // 1790 points at cost 17.9/1% = +100 on the 8.0 base.
    assert!((character.snapshot().mastery - 108.0).abs() < 1e-2);
}

#[test]
fn test_versatility_mirror_and_healing_floor() {
    let tables = fixtures::tables();
    let mut character = fixtures::warrior_at_cap(&tables);
    character.update_all_stats(&tables);
    assert_eq!(character.snapshot().versatility_healing_mult, 1.0);

    character.apply_rating_mod(&tables, CombatRating::VersatilityDamage, 800.0, true);
    let damage = character.snapshot().versatility_damage;
    assert!(damage > 0.0);
    assert_eq!(character.snapshot().versatility_damage_display, damage);

    character.apply_rating_mod(&tables, CombatRating::VersatilityHealing, 400.0, true);
    assert!(character.snapshot().versatility_healing_mult > 1.0);
}

#[test]
fn test_armor_penetration_caps_at_hundred() {
    let tables = fixtures::tables();
    let mut character = fixtures::warrior_at_cap(&tables);
    character.apply_rating_mod(&tables, CombatRating::ArmorPenetration, 100_000.0, true);

    assert_eq!(character.snapshot().armor_penetration, 100.0);
}

#[test]
fn test_resilience_publishes_compounded_mitigation() {
    let tables = fixtures::tables();
    let mut character = fixtures::warrior_at_cap(&tables);
    // 2875 points at cost 28.75/1% = bonus ~100 before compounding.
    character.apply_rating_mod(&tables, CombatRating::Resilience, 2875.0, true);

    let expected = tables.rating_bonus(CombatRating::Resilience, 2875.0, MAX_LEVEL);
    assert_eq!(
        character.snapshot().resilience.to_bits(),
        expected.to_bits()
    );
    assert!(character.snapshot().resilience < 100.0);

    // More rating keeps raising the mitigation, still below 100.
    character.apply_rating_mod(&tables, CombatRating::Resilience, 5000.0, true);
    assert!(character.snapshot().resilience > expected);
    assert!(character.snapshot().resilience < 100.0);
}

// ============================================================================
// Rating coupling
// ============================================================================

#[test]
fn test_coupling_aura_feeds_target_rating() {
    let tables = fixtures::tables();
    let mut character = fixtures::warrior_at_cap(&tables);
    character.apply_rating_mod(&tables, CombatRating::CritMelee, 1400.0, true);
    character.apply_rating_mod(&tables, CombatRating::HasteMelee, 600.0, true);

    // Mastery gains 40% of the highest of crit/haste allocations.
    character.auras.add(AuraEffect::new(AuraKind::RatingFromMaxOf, 40.0).with_misc(
        CombatRating::Mastery.mask() as i32,
        (CombatRating::CritMelee.mask() | CombatRating::HasteMelee.mask()) as i32,
    ));
    character.capabilities.can_use_mastery = true;
    character.update_all_stats(&tables);

    assert!((character.rating(CombatRating::Mastery) - 560.0).abs() < 1e-3);
    // Dependent allocations themselves are untouched.
    assert_eq!(character.rating(CombatRating::CritMelee), 1400.0);
}

#[test]
fn test_rating_mod_refreshes_coupled_targets() {
    let tables = fixtures::tables();
    let mut character = fixtures::warrior_at_cap(&tables);
    character.capabilities.can_use_mastery = true;
    character.auras.add(AuraEffect::new(AuraKind::RatingFromMaxOf, 50.0).with_misc(
        CombatRating::Mastery.mask() as i32,
        CombatRating::CritMelee.mask() as i32,
    ));
    character.update_all_stats(&tables);

    // Adding crit rating moves the coupled mastery rating in the same call.
    character.apply_rating_mod(&tables, CombatRating::CritMelee, 800.0, true);
    assert!((character.rating(CombatRating::Mastery) - 400.0).abs() < 1e-3);

    let incremental = character.snapshot().state_hash();
    character.update_all_stats(&tables);
    assert_eq!(character.snapshot().state_hash(), incremental);
}

#[test]
fn test_rating_without_auras_is_exact_allocation() {
    let tables = fixtures::tables();
    let mut character = fixtures::warrior_at_cap(&tables);
    character.apply_rating_mod(&tables, CombatRating::Block, 123.456, true);

    assert_eq!(
        character.rating(CombatRating::Block).to_bits(),
        123.456f32.to_bits()
    );
}

// ============================================================================
// Corruption
// ============================================================================

#[test]
fn test_corruption_thresholds_gate_effects() {
    let tables = fixtures::tables();
    let mut character = fixtures::warrior_at_cap(&tables);

    character.apply_rating_mod(&tables, CombatRating::Corruption, 50.0, true);
    character.apply_rating_mod(&tables, CombatRating::CorruptionResistance, 10.0, true);

    let snapshot = character.snapshot();
    assert_eq!(snapshot.effective_corruption, 40.0);
    assert_eq!(snapshot.corruption_effects.len(), 2);

    // Raising resistance below the first threshold clears the effects.
    character.apply_rating_mod(&tables, CombatRating::CorruptionResistance, 35.0, true);
    assert!(character.snapshot().corruption_effects.is_empty());
}

// ============================================================================
// Spell power, resistances, regeneration
// ============================================================================

#[test]
fn test_spell_power_per_school() {
    let tables = fixtures::tables();
    let mut character = fixtures::mage_at_cap(&tables);

    character.auras.add(
        AuraEffect::new(AuraKind::SpellPowerFlat, 200.0)
            .with_misc(SpellSchool::Fire.mask() as i32, 0),
    );
    character.auras.add(
        AuraEffect::new(AuraKind::SpellPowerPct, 10.0)
            .with_misc(SpellSchool::Fire.mask() as i32, 0),
    );
    character.update_all_stats(&tables);

    let snapshot = character.snapshot();
    // Intellect 150 gives 150 base spell power to every school.
    let frost = snapshot.spell_power[SpellSchool::Frost.index()];
    assert!((frost - 150.0).abs() < 1e-3);
    let fire = snapshot.spell_power[SpellSchool::Fire.index()];
    assert!((fire - (150.0 + 200.0) * 1.1).abs() < 1e-2);
    // The physical slot never carries spell power.
    assert_eq!(snapshot.spell_power[SpellSchool::Physical.index()], 0.0);
}

#[test]
fn test_school_resistances_from_auras() {
    let tables = fixtures::tables();
    let mut character = fixtures::warrior_at_cap(&tables);

    character.auras.add(
        AuraEffect::new(AuraKind::ResistanceFlat, 60.0)
            .with_misc(SpellSchool::Shadow.mask() as i32, 0),
    );
    character.auras.add(
        AuraEffect::new(AuraKind::ResistancePct, -50.0)
            .with_misc(SpellSchool::Shadow.mask() as i32, 0),
    );
    character.update_all_stats(&tables);

    let shadow = character.snapshot().resistances[SpellSchool::Shadow.index()];
    assert!((shadow - 30.0).abs() < 1e-3);
    // Unaffected schools stay at zero.
    assert_eq!(
        character.snapshot().resistances[SpellSchool::Nature.index()],
        0.0
    );
}

#[test]
fn test_mana_regen_scales_by_two_independent_auras() {
    let tables = fixtures::tables();
    let mut character = fixtures::mage_at_cap(&tables);
    let base = tables.resources.base_mana_regen(MAX_LEVEL);
    assert!((character.snapshot().mana_regen - base).abs() < 1e-3);

    character
        .auras
        .add(AuraEffect::new(AuraKind::ManaRegenPct, 50.0));
    character
        .auras
        .add(AuraEffect::new(AuraKind::PowerRegenPct, 20.0));
    character.update_all_stats(&tables);

    assert!((character.snapshot().mana_regen - base * 1.5 * 1.2).abs() < 1e-3);
}

// ============================================================================
// Companion propagation
// ============================================================================

/// Scenario: a stamina change pushes exactly one companion max-health
/// recompute; strength and agility changes alone push none.
#[test]
fn test_companion_propagation_per_stat() {
    let tables = fixtures::tables();
    let mut character = fixtures::warrior_at_cap(&tables);
    character.companion = Some(Companion::new(50.0, 0.0));

    let events = character.apply_stat_modifier(
        &tables,
        UnitMod::StatStamina,
        ModKind::FlatBase,
        40.0,
        true,
    );
    assert_eq!(events.companion_updates, vec![Stat::Stamina]);
    let health_after_stamina = character.companion.as_ref().unwrap().max_health;
    assert!(health_after_stamina > 0);

    let events = character.apply_stat_modifier(
        &tables,
        UnitMod::StatStrength,
        ModKind::FlatBase,
        25.0,
        true,
    );
    assert_eq!(events.companion_updates, vec![Stat::Strength]);
    assert_eq!(
        character.companion.as_ref().unwrap().max_health,
        health_after_stamina
    );

    let events = character.apply_stat_modifier(
        &tables,
        UnitMod::StatAgility,
        ModKind::FlatBase,
        25.0,
        true,
    );
    assert!(events.companion_updates.is_empty());
}

#[test]
fn test_idempotent_pass_pushes_nothing_to_companion() {
    let tables = fixtures::tables();
    let mut character = fixtures::warrior_at_cap(&tables);
    character.companion = Some(Companion::new(50.0, 0.0));
    character.update_all_stats(&tables);

    let events = character.update_all_stats(&tables);
    assert!(events.companion_updates.is_empty());
    assert!(events.dirty.is_empty());
}

// ============================================================================
// Idempotence, dirty marking, level changes
// ============================================================================

#[test]
fn test_double_recompute_is_bit_identical() {
    let tables = fixtures::tables();
    let mut character = fixtures::warrior_at_cap(&tables);
    character.equip_weapon(&tables, AttackType::MainHand, Some(fixtures::training_sword()));
    character.apply_rating_mod(&tables, CombatRating::Dodge, 600.0, true);

    character.update_all_stats(&tables);
    let first = character.snapshot().state_hash();
    let events = character.update_all_stats(&tables);
    let second = character.snapshot().state_hash();

    assert_eq!(first, second);
    assert!(events.dirty.is_empty());
}

#[test]
fn test_dirty_fields_accumulate_and_drain() {
    let tables = fixtures::tables();
    let mut character = fixtures::warrior_at_cap(&tables);
    assert!(character.drain_dirty().is_empty());

    character.apply_stat_modifier(&tables, UnitMod::StatStamina, ModKind::FlatBase, 10.0, true);
    let dirty = character.drain_dirty();
    assert!(dirty.contains(&SnapshotField::Stat(Stat::Stamina)));
    assert!(dirty.contains(&SnapshotField::MaxHealth));
    assert!(character.drain_dirty().is_empty());
}

#[test]
fn test_level_up_raises_pools() {
    let tables = fixtures::tables();
    let mut character = fixtures::seeded_character(
        &tables,
        CharacterClass::Warrior,
        30,
        [120.0, 80.0, 100.0, 20.0],
    );
    let before = character.snapshot().max_health;

    character.set_level(&tables, 31);
    assert!(character.snapshot().max_health > before);
}

#[test]
fn test_roster_recompute_by_handle() {
    let tables = fixtures::tables();
    let mut roster = Roster::new();
    let id = roster.spawn(fixtures::warrior_at_cap(&tables));

    assert!(roster.update_all_stats(&tables, id).is_ok());
    assert!(matches!(
        roster.update_all_stats(&tables, 999),
        Err(StatError::CharacterNotFound(999))
    ));
}
