//! Read-only content tables keyed by campaign level.

use std::{collections::HashSet, time::Duration};

use serde::Deserialize;
use thiserror::Error;

use crate::{BossDefinitionId, EncounterId, EncounterKind, EnemyDefinitionId, LevelId};

/// Authoring faults detected while looking up or validating content.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ContentError {
    /// The level parameter table has no entry for the level.
    #[error("no level parameters defined for level {}", .0.get())]
    UnknownLevel(LevelId),
    /// The level parameter table lists the same level twice.
    #[error("level {} is defined more than once", .0.get())]
    DuplicateLevel(LevelId),
    /// The boss table has no entry for the level.
    #[error("no boss defined for level {}", .0.get())]
    MissingBoss(LevelId),
    /// The encounter table has no entry of the requested kind for the level.
    #[error("no {kind:?} encounter defined for level {}", .level.get())]
    MissingEncounter {
        /// Level that was searched.
        level: LevelId,
        /// Kind that was requested.
        kind: EncounterKind,
    },
    /// The enemy table has no entry with the identifier.
    #[error("enemy definition {} does not exist", .0.get())]
    UnknownEnemy(EnemyDefinitionId),
    /// An enemy spawn rate is negative or not finite.
    #[error("enemy definition {} has invalid spawn rate {rate}", .enemy.get())]
    InvalidSpawnRate {
        /// Offending enemy definition.
        enemy: EnemyDefinitionId,
        /// Authored spawn rate.
        rate: f32,
    },
    /// An encounter trigger band is empty or inverted.
    #[error("encounter {} has an invalid trigger band", .0.get())]
    InvalidTriggerBand(EncounterId),
}

/// Enemy table entry.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct EnemyDefinition {
    /// Identifier of the entry.
    pub id: EnemyDefinitionId,
    /// Campaign level the enemy belongs to.
    pub level: LevelId,
    /// Display name.
    pub name: String,
    /// Damage dealt per attack before the level multiplier.
    pub damage: u32,
    /// Health at spawn.
    pub health: u32,
    /// Approach speed in world units per second.
    pub speed: f32,
    /// Gold credited when the enemy is defeated.
    pub gold_drop: u32,
    /// Relative weight used by weighted spawn selection.
    pub spawn_rate: f32,
    /// Whether only airborne-capable spells reach the enemy.
    #[serde(default)]
    pub airborne: bool,
}

/// Boss table entry.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct BossDefinition {
    /// Identifier of the entry.
    pub id: BossDefinitionId,
    /// Campaign level the boss guards.
    pub level: LevelId,
    /// Display name.
    pub name: String,
    /// Damage dealt per attack before the level multiplier.
    pub damage: u32,
    /// Health at spawn.
    pub health: u32,
    /// Gold credited when the boss is defeated.
    pub gold_drop: u32,
    /// Whether only airborne-capable spells reach the boss.
    #[serde(default)]
    pub airborne: bool,
}

/// Inclusive-exclusive range of progress values an encounter may trigger at.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct ProgressBand {
    /// Lowest trigger progress.
    pub min: f32,
    /// Upper bound of the trigger progress.
    pub max: f32,
}

impl ProgressBand {
    /// Creates a new band.
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Reports whether the band is finite, ordered and ends before the boss threshold.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min >= 0.0
            && self.min <= self.max
            && self.max < crate::BOSS_PROGRESS_THRESHOLD.get()
    }
}

/// Encounter table entry.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct EncounterDefinition {
    /// Identifier of the entry.
    pub id: EncounterId,
    /// Lowest campaign level the encounter may appear in.
    pub level: LevelId,
    /// Kind of encounter.
    pub kind: EncounterKind,
    /// Whether the entry introduces its character for the first time.
    #[serde(default)]
    pub first_encounter: bool,
    /// Trigger band overriding the allocator's default band.
    #[serde(default)]
    pub trigger_band: Option<ProgressBand>,
    /// Dialogue or visual payload key, opaque to the core.
    #[serde(default)]
    pub payload: Option<String>,
}

/// Level parameter table entry.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LevelParameters {
    /// Campaign level the parameters apply to.
    pub level: LevelId,
    /// Maximum number of enemies alive at once.
    pub max_enemy_count: u32,
    /// Seconds between enemy spawn decisions.
    pub enemy_spawn_delay: f32,
    /// Seconds between NPC spawn decisions.
    pub npc_spawn_delay: f32,
    /// Seconds between rare structure spawn decisions.
    pub rare_spawn_delay: f32,
    /// Seconds of running time before any spawn gate is polled.
    pub run_start_delay: f32,
    /// Multiplier applied to enemy and boss damage.
    pub enemy_damage_multiplier: f32,
}

impl Default for LevelParameters {
    fn default() -> Self {
        Self {
            level: LevelId::new(1),
            max_enemy_count: 3,
            enemy_spawn_delay: 10.0,
            npc_spawn_delay: 10.0,
            rare_spawn_delay: 15.0,
            run_start_delay: 5.0,
            enemy_damage_multiplier: 1.0,
        }
    }
}

impl LevelParameters {
    /// Cooldown configured for the provided spawn category.
    #[must_use]
    pub fn spawn_delay(&self, category: crate::SpawnCategory) -> Duration {
        let seconds = match category {
            crate::SpawnCategory::Rare => self.rare_spawn_delay,
            crate::SpawnCategory::Npc => self.npc_spawn_delay,
            crate::SpawnCategory::Enemy => self.enemy_spawn_delay,
        };
        seconds_to_duration(seconds)
    }

    /// Running time required before spawn gates are polled.
    #[must_use]
    pub fn run_start_delay(&self) -> Duration {
        seconds_to_duration(self.run_start_delay)
    }

    /// Scales raw attack damage by the level multiplier.
    #[must_use]
    pub fn scale_damage(&self, damage: u32) -> u32 {
        let scaled = damage as f32 * self.enemy_damage_multiplier.max(0.0);
        scaled.round() as u32
    }
}

fn seconds_to_duration(seconds: f32) -> Duration {
    if seconds.is_finite() && seconds > 0.0 {
        Duration::from_millis((seconds * 1_000.0).round() as u64)
    } else {
        Duration::ZERO
    }
}

/// Complete set of static content consumed by the level core.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContentTables {
    /// Enemy table.
    pub enemies: Vec<EnemyDefinition>,
    /// Boss table.
    pub bosses: Vec<BossDefinition>,
    /// Encounter table.
    pub encounters: Vec<EncounterDefinition>,
    /// Level parameter table.
    pub levels: Vec<LevelParameters>,
}

impl ContentTables {
    /// Level parameters for the provided level.
    pub fn level(&self, level: LevelId) -> Result<&LevelParameters, ContentError> {
        self.levels
            .iter()
            .find(|parameters| parameters.level == level)
            .ok_or(ContentError::UnknownLevel(level))
    }

    /// Enemy entries belonging to the provided level, in table order.
    pub fn enemies_for(&self, level: LevelId) -> impl Iterator<Item = &EnemyDefinition> {
        self.enemies
            .iter()
            .filter(move |definition| definition.level == level)
    }

    /// Enemy entry with the provided identifier.
    pub fn enemy(&self, id: EnemyDefinitionId) -> Result<&EnemyDefinition, ContentError> {
        self.enemies
            .iter()
            .find(|definition| definition.id == id)
            .ok_or(ContentError::UnknownEnemy(id))
    }

    /// Boss guarding the provided level.
    pub fn boss_for(&self, level: LevelId) -> Result<&BossDefinition, ContentError> {
        self.bosses
            .iter()
            .find(|definition| definition.level == level)
            .ok_or(ContentError::MissingBoss(level))
    }

    /// Start encounter for the level, preferring the variant matching `first_attempt`.
    pub fn start_encounter(
        &self,
        level: LevelId,
        first_attempt: bool,
    ) -> Result<&EncounterDefinition, ContentError> {
        self.encounters
            .iter()
            .find(|entry| {
                entry.kind == EncounterKind::Start
                    && entry.level == level
                    && entry.first_encounter == first_attempt
            })
            .ok_or(ContentError::MissingEncounter {
                level,
                kind: EncounterKind::Start,
            })
    }

    /// Encounters eligible for random allocation up to and including `level`.
    pub fn allocatable_encounters(
        &self,
        level: LevelId,
    ) -> impl Iterator<Item = &EncounterDefinition> {
        self.encounters
            .iter()
            .filter(move |entry| entry.level <= level && !entry.kind.is_reserved())
    }

    /// Checks authoring invariants across every table.
    pub fn validate(&self) -> Result<(), ContentError> {
        let mut seen = HashSet::new();
        for parameters in &self.levels {
            if !seen.insert(parameters.level) {
                return Err(ContentError::DuplicateLevel(parameters.level));
            }
        }

        for enemy in &self.enemies {
            if !enemy.spawn_rate.is_finite() || enemy.spawn_rate < 0.0 {
                return Err(ContentError::InvalidSpawnRate {
                    enemy: enemy.id,
                    rate: enemy.spawn_rate,
                });
            }
        }

        for encounter in &self.encounters {
            if let Some(band) = encounter.trigger_band {
                if !band.is_valid() {
                    return Err(ContentError::InvalidTriggerBand(encounter.id));
                }
            }
        }

        Ok(())
    }
}
