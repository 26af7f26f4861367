//! Per-character stat state and the roster arena.
//!
//! A [`Character`] owns everything the pipeline reads and writes: one
//! modifier layer per unit-mod category, raw and aggregated rating
//! arrays, the active aura book, equipped weapons, capability flags and
//! the committed snapshot. Characters are owned exclusively by the
//! simulation tick processing them; nothing here locks.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::auras::AuraBook;
use crate::classes::{Capabilities, CharacterClass};
use crate::error::{Result, StatError};
use crate::propagation::Companion;
use crate::ratings::CombatRating;
use crate::snapshot::{SnapshotField, StatSnapshot};
use crate::stats::{AttackType, ModifierLayer, Stat, UnitMod, WeaponClass};

/// Unique identifier for characters in a [`Roster`].
pub type CharacterId = u64;

/// An equipped weapon's static properties.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    /// Weapon classification (used by weapon-filtered auras).
    pub class: WeaponClass,
    /// Base minimum damage.
    pub min_damage: f32,
    /// Base maximum damage.
    pub max_damage: f32,
    /// Base attack time in milliseconds.
    pub attack_time_ms: u32,
}

/// Shapeshift form, overriding the combat round time used for
/// attack-power normalization and weapon damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeshiftForm {
    /// Fast feral form.
    Cat,
    /// Slow defensive form.
    Bear,
}

impl ShapeshiftForm {
    /// Combat round time in milliseconds while in this form.
    #[must_use]
    pub const fn combat_round_time_ms(self) -> u32 {
        match self {
            ShapeshiftForm::Cat => 1000,
            ShapeshiftForm::Bear => 2500,
        }
    }
}

/// One live character's complete stat state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Class, fixed at creation.
    pub class: CharacterClass,
    /// Current level.
    pub(crate) level: u32,
    /// Capability gates, set at class/spec assignment.
    pub capabilities: Capabilities,
    /// One modifier layer per unit-mod category.
    pub(crate) layers: [ModifierLayer; UnitMod::COUNT],
    /// Raw per-rating base allocations from items and talents.
    pub(crate) rating_base: [f32; CombatRating::COUNT],
    /// Aggregated canonical rating values (post coupling, clamped).
    pub(crate) rating: [f32; CombatRating::COUNT],
    /// Resolved aura effects, written by the external aura subsystem.
    pub auras: AuraBook,
    /// Equipped weapons per attack type.
    pub(crate) weapons: [Option<Weapon>; AttackType::COUNT],
    /// Disarm state per attack type.
    pub(crate) disarmed: [bool; AttackType::COUNT],
    /// Active shapeshift form, if any.
    pub(crate) shapeshift: Option<ShapeshiftForm>,
    /// Dependent companion entity, if one is summoned.
    pub companion: Option<Companion>,
    /// Committed snapshot of every derived value.
    pub(crate) snapshot: StatSnapshot,
    /// Fields changed since the replication layer last drained.
    pub(crate) dirty: BTreeSet<SnapshotField>,
}

impl Character {
    /// Create a character with neutral layers and empty ratings.
    ///
    /// Base attributes arrive through the same modifier surface items and
    /// auras use; a freshly created character publishes zeros until its
    /// first recompute.
    #[must_use]
    pub fn new(class: CharacterClass, level: u32) -> Self {
        Self {
            class,
            level,
            capabilities: Capabilities::for_class(class),
            layers: [ModifierLayer::new(); UnitMod::COUNT],
            rating_base: [0.0; CombatRating::COUNT],
            rating: [0.0; CombatRating::COUNT],
            auras: AuraBook::new(),
            weapons: [None; AttackType::COUNT],
            disarmed: [false; AttackType::COUNT],
            shapeshift: None,
            companion: None,
            snapshot: StatSnapshot::new(),
            dirty: BTreeSet::new(),
        }
    }

    /// Current level.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// The committed snapshot.
    #[must_use]
    pub fn snapshot(&self) -> &StatSnapshot {
        &self.snapshot
    }

    /// A primary stat's committed value.
    #[must_use]
    pub fn stat(&self, stat: Stat) -> f32 {
        self.snapshot.stats[stat.index()]
    }

    /// The modifier layer for a category.
    #[must_use]
    pub fn layer(&self, unit_mod: UnitMod) -> &ModifierLayer {
        &self.layers[unit_mod.index()]
    }

    /// A rating's canonical aggregated value.
    #[must_use]
    pub fn rating(&self, rating: CombatRating) -> f32 {
        self.rating[rating.index()]
    }

    /// A rating's raw base allocation.
    #[must_use]
    pub fn rating_base(&self, rating: CombatRating) -> f32 {
        self.rating_base[rating.index()]
    }

    /// The equipped weapon for an attack type.
    #[must_use]
    pub fn weapon(&self, attack: AttackType) -> Option<&Weapon> {
        self.weapons[attack.index()].as_ref()
    }

    /// Whether an attack type is currently usable (capability and disarm).
    #[must_use]
    pub fn can_use_attack(&self, attack: AttackType) -> bool {
        self.capabilities.can_use_attack[attack.index()] && !self.disarmed[attack.index()]
    }

    /// Active shapeshift form.
    #[must_use]
    pub const fn shapeshift(&self) -> Option<ShapeshiftForm> {
        self.shapeshift
    }

    /// Drain the dirty-field set for the next outbound sync.
    pub fn drain_dirty(&mut self) -> Vec<SnapshotField> {
        let dirty: Vec<_> = self.dirty.iter().copied().collect();
        self.dirty.clear();
        dirty
    }

    /// Fields currently marked dirty, without draining.
    #[must_use]
    pub fn dirty_fields(&self) -> impl Iterator<Item = &SnapshotField> {
        self.dirty.iter()
    }
}

/// Storage for all live characters.
///
/// Uses a `HashMap` for O(1) lookup by handle, with deterministic
/// iteration via sorted ids when the tick loop processes characters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    characters: HashMap<CharacterId, Character>,
    next_id: CharacterId,
}

impl Roster {
    /// Create an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self {
            characters: HashMap::new(),
            next_id: 1,
        }
    }

    /// Insert a character and return its handle.
    pub fn spawn(&mut self, character: Character) -> CharacterId {
        let id = self.next_id;
        self.next_id += 1;
        self.characters.insert(id, character);
        id
    }

    /// Remove a character by handle.
    ///
    /// # Errors
    ///
    /// Returns [`StatError::CharacterNotFound`] if the handle is unknown.
    pub fn despawn(&mut self, id: CharacterId) -> Result<Character> {
        self.characters
            .remove(&id)
            .ok_or(StatError::CharacterNotFound(id))
    }

    /// Get a character by handle.
    #[must_use]
    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.characters.get(&id)
    }

    /// Get a mutable character by handle.
    pub fn get_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.characters.get_mut(&id)
    }

    /// Whether a handle exists.
    #[must_use]
    pub fn contains(&self, id: CharacterId) -> bool {
        self.characters.contains_key(&id)
    }

    /// Number of live characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    /// Whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Sorted handles for deterministic iteration.
    #[must_use]
    pub fn sorted_ids(&self) -> Vec<CharacterId> {
        let mut ids: Vec<_> = self.characters.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Iterate over all characters (not in deterministic order).
    pub fn iter(&self) -> impl Iterator<Item = (&CharacterId, &Character)> {
        self.characters.iter()
    }

    /// Hash of every published snapshot, in handle order.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        for id in self.sorted_ids() {
            id.hash(&mut hasher);
            if let Some(character) = self.characters.get(&id) {
                character.snapshot.state_hash().hash(&mut hasher);
            }
        }
        hasher.finish()
    }

    /// Serialize the roster for save or handoff.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| StatError::InvalidState(format!("Failed to serialize roster: {e}")))
    }

    /// Deserialize a roster from bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data)
            .map_err(|e| StatError::InvalidState(format!("Failed to deserialize roster: {e}")))
    }
}
