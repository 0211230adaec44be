#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system that turns open spawn gates into spawn commands.
//!
//! The world decides *when* a spawn may happen by announcing
//! [`Event::SpawnGateOpened`]. This system decides *what* spawns: the size of
//! an enemy group, the weighted choice of each member, and the side an
//! ambient NPC walks down.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use runebound_core::{
    Command, ContentTables, EnemyDefinition, Event, LevelId, Side, SpawnCategory,
};
use tracing::{debug, warn};

/// Probability that an enemy gate produces a group instead of a single enemy.
pub const DEFAULT_GROUP_CHANCE: f64 = 0.4;

/// Smallest enemy group.
const MIN_GROUP_SIZE: u32 = 2;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
    group_chance: f64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            group_chance: DEFAULT_GROUP_CHANCE,
        }
    }

    /// Overrides the probability that an enemy gate spawns a group.
    #[must_use]
    pub fn with_group_chance(mut self, chance: f64) -> Self {
        self.group_chance = if chance.is_finite() {
            chance.clamp(0.0, 1.0)
        } else {
            DEFAULT_GROUP_CHANCE
        };
        self
    }
}

/// Pure system that emits enemy and NPC spawn commands for open gates.
#[derive(Debug)]
pub struct Spawning {
    rng: ChaCha8Rng,
    group_chance: f64,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            group_chance: config.group_chance,
        }
    }

    /// Consumes world events and the content tables to emit spawn commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        level: Option<LevelId>,
        max_enemy_count: u32,
        content: &ContentTables,
        out: &mut Vec<Command>,
    ) {
        let Some(level) = level else {
            return;
        };

        for event in events {
            let Event::SpawnGateOpened { category, budget } = event else {
                continue;
            };
            match category {
                SpawnCategory::Enemy => {
                    self.spawn_enemies(level, *budget, max_enemy_count, content, out);
                }
                SpawnCategory::Npc => {
                    let side = if self.rng.gen_bool(0.5) {
                        Side::Left
                    } else {
                        Side::Right
                    };
                    out.push(Command::SpawnNpc { side });
                }
                SpawnCategory::Rare => {}
            }
        }
    }

    fn spawn_enemies(
        &mut self,
        level: LevelId,
        budget: u32,
        max_enemy_count: u32,
        content: &ContentTables,
        out: &mut Vec<Command>,
    ) {
        let candidates: Vec<&EnemyDefinition> = content.enemies_for(level).collect();
        if candidates.is_empty() {
            warn!(level = level.get(), "enemy gate opened for a level without enemies");
            return;
        }

        let size = self.group_size(max_enemy_count).min(budget);
        if size == 0 {
            return;
        }

        let total: f32 = candidates
            .iter()
            .map(|definition| definition.spawn_rate)
            .sum();
        let definitions: Vec<_> = (0..size)
            .filter_map(|_| {
                let roll = if total > 0.0 {
                    self.rng.gen_range(0.0..total)
                } else {
                    0.0
                };
                pick_weighted(&candidates, roll).map(|definition| definition.id)
            })
            .collect();

        debug!(size, budget, "enemy group rolled");
        out.push(Command::SpawnEnemies { definitions });
    }

    fn group_size(&mut self, max_enemy_count: u32) -> u32 {
        if !self.rng.gen_bool(self.group_chance) {
            return 1;
        }
        if max_enemy_count > MIN_GROUP_SIZE {
            self.rng.gen_range(MIN_GROUP_SIZE..max_enemy_count)
        } else {
            MIN_GROUP_SIZE
        }
    }
}

/// Selects an entry by cumulative spawn rate.
///
/// `roll` is expected in `[0, Σ spawn_rate]`; rates are subtracted until the
/// roll is exhausted. Rolls that outlast the table, including `roll == Σ`
/// under rounding, select the last entry.
#[must_use]
pub fn pick_weighted<'a>(
    candidates: &[&'a EnemyDefinition],
    roll: f32,
) -> Option<&'a EnemyDefinition> {
    let mut remaining = roll;
    for definition in candidates {
        remaining -= definition.spawn_rate;
        if remaining <= 0.0 {
            return Some(definition);
        }
    }
    candidates.last().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use runebound_core::EnemyDefinitionId;

    fn enemy(id: u32, spawn_rate: f32) -> EnemyDefinition {
        EnemyDefinition {
            id: EnemyDefinitionId::new(id),
            level: LevelId::new(1),
            name: format!("enemy-{id}"),
            damage: 1,
            health: 1,
            speed: 1.0,
            gold_drop: 1,
            spawn_rate,
            airborne: false,
        }
    }

    #[test]
    fn roll_equal_to_total_picks_last_entry() {
        let table = [enemy(0, 0.5), enemy(1, 0.5), enemy(2, 0.5)];
        let candidates: Vec<&EnemyDefinition> = table.iter().collect();
        let picked = pick_weighted(&candidates, 1.5).map(|definition| definition.id);
        assert_eq!(picked, Some(EnemyDefinitionId::new(2)));
    }

    #[test]
    fn roll_walks_cumulative_rates() {
        let table = [enemy(0, 1.0), enemy(1, 3.0)];
        let candidates: Vec<&EnemyDefinition> = table.iter().collect();
        let pick = |roll| pick_weighted(&candidates, roll).map(|definition| definition.id);
        assert_eq!(pick(0.0), Some(EnemyDefinitionId::new(0)));
        assert_eq!(pick(1.0), Some(EnemyDefinitionId::new(0)));
        assert_eq!(pick(1.01), Some(EnemyDefinitionId::new(1)));
        assert_eq!(pick(9.0), Some(EnemyDefinitionId::new(1)));
    }

    #[test]
    fn empty_table_picks_nothing() {
        assert!(pick_weighted(&[], 0.0).is_none());
    }

    #[test]
    fn group_size_respects_bounds() {
        let mut spawning = Spawning::new(Config::new(7).with_group_chance(1.0));
        for _ in 0..64 {
            assert_eq!(spawning.group_size(3), 2);
            let size = spawning.group_size(6);
            assert!((2..6).contains(&size));
        }
        assert_eq!(spawning.group_size(1), 2);

        let mut singles = Spawning::new(Config::new(7).with_group_chance(0.0));
        assert_eq!(singles.group_size(6), 1);
    }
}
