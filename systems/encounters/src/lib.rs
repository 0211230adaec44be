#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic allocation of narrative encounters for each level.
//!
//! Whenever a level starts, the allocator draws a fixed number of distinct
//! encounter kinds without replacement. Kinds that were allocated often in the
//! current campaign run are weighted down by `1 / (count + 1)`, and each kind
//! is placed at a random progress value within its trigger band.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use runebound_core::{
    AllocatedEncounter, Command, ContentTables, EncounterDefinition, EncounterKind, Event,
    LevelId, Progress, ProgressBand,
};
use tracing::{debug, warn};

/// Default trigger band when three encounters share a level.
pub const MULTI_TRIGGER_BAND: ProgressBand = ProgressBand::new(200.0, 900.0);

/// Default trigger band when a level holds a single encounter.
pub const SINGLE_TRIGGER_BAND: ProgressBand = ProgressBand::new(300.0, 700.0);

/// Configuration parameters required to construct the allocator.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
    encounters_per_level: usize,
    default_band: ProgressBand,
}

impl Config {
    /// Allocates three encounters per level within [`MULTI_TRIGGER_BAND`].
    #[must_use]
    pub const fn multi(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            encounters_per_level: 3,
            default_band: MULTI_TRIGGER_BAND,
        }
    }

    /// Allocates a single encounter per level within [`SINGLE_TRIGGER_BAND`].
    #[must_use]
    pub const fn single(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            encounters_per_level: 1,
            default_band: SINGLE_TRIGGER_BAND,
        }
    }

    /// Number of encounters allocated per level.
    #[must_use]
    pub const fn encounters_per_level(&self) -> usize {
        self.encounters_per_level
    }
}

/// Pure system that schedules encounters whenever a level starts.
#[derive(Debug)]
pub struct EncounterAllocation {
    rng: ChaCha8Rng,
    encounters_per_level: usize,
    default_band: ProgressBand,
    allocated_counts: BTreeMap<EncounterKind, u32>,
}

impl EncounterAllocation {
    /// Creates a new allocator using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            encounters_per_level: config.encounters_per_level,
            default_band: config.default_band,
            allocated_counts: BTreeMap::new(),
        }
    }

    /// Emits [`Command::ScheduleEncounters`] for every started level.
    pub fn handle(&mut self, events: &[Event], content: &ContentTables, out: &mut Vec<Command>) {
        for event in events {
            if let Event::LevelStarted { level } = event {
                let encounters = self.allocate(*level, content);
                out.push(Command::ScheduleEncounters { encounters });
            }
        }
    }

    /// Draws the encounters for `level`, sorted by ascending trigger progress.
    ///
    /// Returns an empty allocation when the content offers fewer distinct kinds
    /// than the allocator draws per level.
    pub fn allocate(&mut self, level: LevelId, content: &ContentTables) -> Vec<AllocatedEncounter> {
        let candidates: Vec<&EncounterDefinition> =
            content.allocatable_encounters(level).collect();

        let mut kinds: Vec<EncounterKind> = Vec::new();
        for entry in &candidates {
            if !kinds.contains(&entry.kind) {
                kinds.push(entry.kind);
            }
        }

        if kinds.len() < self.encounters_per_level {
            warn!(
                level = level.get(),
                available = kinds.len(),
                required = self.encounters_per_level,
                "not enough distinct encounter kinds to allocate"
            );
            return Vec::new();
        }

        let mut allocated = Vec::with_capacity(self.encounters_per_level);
        for _ in 0..self.encounters_per_level {
            let kind = self.draw_kind(&mut kinds);
            let count = self.allocated_counts.entry(kind).or_insert(0);
            *count += 1;
            let first_time = *count == 1;

            let Some(entry) = self.choose_entry(&candidates, kind, first_time) else {
                continue;
            };
            let trigger = self.roll_trigger(entry.trigger_band.unwrap_or(self.default_band));
            allocated.push(AllocatedEncounter {
                encounter: entry.id,
                kind,
                first_encounter: entry.first_encounter,
                trigger,
            });
        }

        allocated.sort_by(|a, b| a.trigger.get().total_cmp(&b.trigger.get()));
        debug!(level = level.get(), ?allocated, "encounters allocated");
        allocated
    }

    /// Forgets how often each kind was allocated, starting a new campaign run.
    pub fn reset_run(&mut self) {
        self.allocated_counts.clear();
    }

    /// Number of times `kind` was allocated during the current campaign run.
    #[must_use]
    pub fn allocated_count(&self, kind: EncounterKind) -> u32 {
        self.allocated_counts.get(&kind).copied().unwrap_or(0)
    }

    fn draw_kind(&mut self, kinds: &mut Vec<EncounterKind>) -> EncounterKind {
        let weights: Vec<f32> = kinds
            .iter()
            .map(|kind| 1.0 / (self.allocated_count(*kind) as f32 + 1.0))
            .collect();
        let total: f32 = weights.iter().sum();
        let roll = self.rng.gen_range(0.0..total);

        let mut cumulative = 0.0;
        let mut index = kinds.len() - 1;
        for (candidate, weight) in weights.iter().enumerate() {
            cumulative += weight;
            if roll < cumulative {
                index = candidate;
                break;
            }
        }
        kinds.remove(index)
    }

    fn choose_entry<'a>(
        &mut self,
        candidates: &[&'a EncounterDefinition],
        kind: EncounterKind,
        first_time: bool,
    ) -> Option<&'a EncounterDefinition> {
        let of_kind: Vec<&EncounterDefinition> = candidates
            .iter()
            .copied()
            .filter(|entry| entry.kind == kind)
            .collect();
        let preferred: Vec<&EncounterDefinition> = of_kind
            .iter()
            .copied()
            .filter(|entry| entry.first_encounter == first_time)
            .collect();

        if preferred.is_empty() {
            of_kind.choose(&mut self.rng).copied()
        } else {
            preferred.choose(&mut self.rng).copied()
        }
    }

    fn roll_trigger(&mut self, band: ProgressBand) -> Progress {
        if band.max > band.min {
            Progress::new(self.rng.gen_range(band.min..band.max))
        } else {
            Progress::new(band.min)
        }
    }
}
