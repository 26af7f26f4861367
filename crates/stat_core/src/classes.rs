//! Character class definitions and capability flags.

use serde::{Deserialize, Serialize};

use crate::stats::{AttackType, PowerType};

/// Character class identifier.
///
/// Class selects the reference-table rows used by the pipeline (base
/// resources, attack-power coefficients, diminishing-returns constants)
/// and the default [`Capabilities`] set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CharacterClass {
    /// Plate melee, rage resource.
    Warrior,
    /// Plate hybrid, mana resource.
    Paladin,
    /// Ranged physical, focus resource.
    Ranger,
    /// Leather melee, energy resource.
    Rogue,
    /// Cloth healer/caster, mana resource.
    Priest,
    /// Mail hybrid, mana resource.
    Shaman,
    /// Cloth caster, mana resource.
    Mage,
    /// Cloth caster, mana resource.
    Warlock,
    /// Leather shapeshifter, mana resource.
    Druid,
    /// Plate melee, runic power resource; rune cooldowns scale with haste.
    Runeknight,
}

impl CharacterClass {
    /// Number of classes.
    pub const COUNT: usize = 10;

    /// All classes in canonical order.
    #[must_use]
    pub const fn all() -> [CharacterClass; Self::COUNT] {
        [
            CharacterClass::Warrior,
            CharacterClass::Paladin,
            CharacterClass::Ranger,
            CharacterClass::Rogue,
            CharacterClass::Priest,
            CharacterClass::Shaman,
            CharacterClass::Mage,
            CharacterClass::Warlock,
            CharacterClass::Druid,
            CharacterClass::Runeknight,
        ]
    }

    /// Canonical array index for this class.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            CharacterClass::Warrior => 0,
            CharacterClass::Paladin => 1,
            CharacterClass::Ranger => 2,
            CharacterClass::Rogue => 3,
            CharacterClass::Priest => 4,
            CharacterClass::Shaman => 5,
            CharacterClass::Mage => 6,
            CharacterClass::Warlock => 7,
            CharacterClass::Druid => 8,
            CharacterClass::Runeknight => 9,
        }
    }

    /// The resource pool this class actively uses.
    #[must_use]
    pub const fn power_type(self) -> PowerType {
        match self {
            CharacterClass::Warrior => PowerType::Rage,
            CharacterClass::Ranger => PowerType::Focus,
            CharacterClass::Rogue => PowerType::Energy,
            CharacterClass::Runeknight => PowerType::RunicPower,
            CharacterClass::Paladin
            | CharacterClass::Priest
            | CharacterClass::Shaman
            | CharacterClass::Mage
            | CharacterClass::Warlock
            | CharacterClass::Druid => PowerType::Mana,
        }
    }
}

/// Explicit per-character capability gates.
///
/// Set once at class/spec assignment instead of being re-derived from the
/// class on every recompute. A gate being false forces the corresponding
/// derived statistic to zero regardless of ratings or auras.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Character can dodge attacks.
    pub can_dodge: bool,
    /// Character can parry attacks.
    pub can_parry: bool,
    /// Character can block with a shield.
    pub can_block: bool,
    /// Character's specialization grants a mastery effect.
    pub can_use_mastery: bool,
    /// Usable attack types (disarm state is tracked separately).
    pub can_use_attack: [bool; AttackType::COUNT],
}

impl Capabilities {
    /// Default capability set for a class.
    #[must_use]
    pub const fn for_class(class: CharacterClass) -> Self {
        let melee = [true, true, false];
        let melee_and_ranged = [true, true, true];
        let caster = [true, false, false];
        match class {
            CharacterClass::Warrior | CharacterClass::Paladin => Self {
                can_dodge: true,
                can_parry: true,
                can_block: true,
                can_use_mastery: false,
                can_use_attack: melee,
            },
            CharacterClass::Runeknight => Self {
                can_dodge: true,
                can_parry: true,
                can_block: false,
                can_use_mastery: false,
                can_use_attack: melee,
            },
            CharacterClass::Rogue => Self {
                can_dodge: true,
                can_parry: true,
                can_block: false,
                can_use_mastery: false,
                can_use_attack: melee_and_ranged,
            },
            CharacterClass::Ranger => Self {
                can_dodge: true,
                can_parry: true,
                can_block: false,
                can_use_mastery: false,
                can_use_attack: melee_and_ranged,
            },
            CharacterClass::Shaman => Self {
                can_dodge: true,
                can_parry: false,
                can_block: true,
                can_use_mastery: false,
                can_use_attack: melee,
            },
            CharacterClass::Druid => Self {
                can_dodge: true,
                can_parry: false,
                can_block: false,
                can_use_mastery: false,
                can_use_attack: melee,
            },
            CharacterClass::Priest | CharacterClass::Mage | CharacterClass::Warlock => Self {
                can_dodge: true,
                can_parry: false,
                can_block: false,
                can_use_mastery: false,
                can_use_attack: caster,
            },
        }
    }
}
