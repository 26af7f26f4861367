//! Recompute determinism testing utilities.
//!
//! Provides a harness for verifying that the stat pipeline produces
//! identical published snapshots given identical inputs.
//!
//! # Testing Strategy
//!
//! The engine's correctness contract is exact-formula reproduction plus
//! idempotence: a stale or drifting snapshot silently corrupts every
//! later combat calculation. Sources of drift include:
//!
//! - **Order-dependent aggregation**: coupling effects must read base
//!   allocations, never partially-updated rating values.
//! - **HashMap iteration order**: roster processing always iterates in
//!   sorted handle order.
//! - **Accumulator contamination**: a category with no active auras must
//!   publish its raw allocation bit-for-bit.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: individual stage math (layers, curves, aggregator)
//! 2. **Property tests**: random inputs must still produce deterministic
//!    outputs
//! 3. **Integration tests**: full pipeline scenarios are reproducible

use stat_core::prelude::*;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic pipeline).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert determinism with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Recompute is non-deterministic!\n\
                 Runs: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a scripted scenario multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run the scenario
/// * `setup` - Function to create the initial character
/// * `script` - Function applying the scenario's mutations
/// * `hash` - Function computing the final state hash
pub fn verify_determinism<S, Setup, Script, HashFn>(
    runs: usize,
    setup: Setup,
    script: Script,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Script: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();
        script(&mut state);
        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
    }
}

/// Verify that repeated full recomputes with no intervening mutation
/// publish bit-identical snapshots.
///
/// Returns `true` when every pass hashes equal to the first.
pub fn verify_recompute_idempotence(
    character: &mut Character,
    tables: &ReferenceTables,
    passes: usize,
) -> bool {
    character.update_all_stats(tables);
    let reference = character.snapshot().state_hash();

    for _ in 0..passes {
        character.update_all_stats(tables);
        if character.snapshot().state_hash() != reference {
            return false;
        }
    }
    true
}

/// Verify that a full recompute after single-statistic updates agrees
/// with the committed state (no stale suffix).
pub fn verify_incremental_agrees_with_full(
    character: &mut Character,
    tables: &ReferenceTables,
) -> bool {
    let incremental = character.snapshot().state_hash();
    character.update_all_stats(tables);
    character.snapshot().state_hash() == incremental
}

/// Proptest strategies for pipeline inputs.
pub mod strategies {
    use proptest::prelude::*;
    use stat_core::prelude::*;

    /// Generate any character class.
    pub fn arb_class() -> impl Strategy<Value = CharacterClass> {
        proptest::sample::select(CharacterClass::all().to_vec())
    }

    /// Generate a level in the supported range.
    pub fn arb_level() -> impl Strategy<Value = u32> {
        1u32..=MAX_LEVEL
    }

    /// Generate a base attribute block.
    pub fn arb_attributes() -> impl Strategy<Value = [f32; Stat::COUNT]> {
        [0.0f32..500.0, 0.0f32..500.0, 0.0f32..500.0, 0.0f32..500.0]
    }

    /// Generate a rating allocation.
    pub fn arb_rating_points() -> impl Strategy<Value = f32> {
        0.0f32..5000.0
    }

    /// Generate any rating category.
    pub fn arb_rating() -> impl Strategy<Value = CombatRating> {
        proptest::sample::select(CombatRating::all().to_vec())
    }
}
