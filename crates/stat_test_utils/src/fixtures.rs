//! Test fixtures and helpers.
//!
//! Pre-built characters and weapons for consistent testing.

use stat_core::prelude::*;

/// Built-in reference tables.
#[must_use]
pub fn tables() -> ReferenceTables {
    ReferenceTables::builtin()
}

/// A character with base attributes seeded through the modifier surface
/// and a first full recompute already committed.
#[must_use]
pub fn seeded_character(
    tables: &ReferenceTables,
    class: CharacterClass,
    level: u32,
    attributes: [f32; Stat::COUNT],
) -> Character {
    let mut character = Character::new(class, level);
    for stat in Stat::all() {
        character.apply_stat_modifier(
            tables,
            UnitMod::from_stat(stat),
            ModKind::FlatBase,
            attributes[stat.index()],
            true,
        );
    }
    character.update_all_stats(tables);
    character.drain_dirty();
    character
}

/// A level-60 warrior with round attribute numbers.
#[must_use]
pub fn warrior_at_cap(tables: &ReferenceTables) -> Character {
    seeded_character(
        tables,
        CharacterClass::Warrior,
        MAX_LEVEL,
        [120.0, 80.0, 100.0, 20.0],
    )
}

/// A level-60 mage with caster-shaped attributes.
#[must_use]
pub fn mage_at_cap(tables: &ReferenceTables) -> Character {
    seeded_character(
        tables,
        CharacterClass::Mage,
        MAX_LEVEL,
        [20.0, 40.0, 60.0, 150.0],
    )
}

/// A plain one-handed sword.
#[must_use]
pub fn training_sword() -> Weapon {
    Weapon {
        class: WeaponClass::Sword,
        min_damage: 50.0,
        max_damage: 90.0,
        attack_time_ms: 2600,
    }
}

/// A plain bow.
#[must_use]
pub fn training_bow() -> Weapon {
    Weapon {
        class: WeaponClass::Bow,
        min_damage: 60.0,
        max_damage: 110.0,
        attack_time_ms: 3000,
    }
}
