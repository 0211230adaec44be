//! Frame loop wiring the world to the systems and a scripted player.

use std::{fmt, time::Duration};

use runebound_core::{Command, Event, LevelId, UnitKind, UnitState};
use runebound_system_encounters::{Config as EncounterConfig, EncounterAllocation};
use runebound_system_spawning::{Config as SpawningConfig, Spawning};
use runebound_world::{self as world, query, World};
use tracing::{debug, info};

use crate::content::Campaign;

/// Distance above the front line within which the scripted player casts at enemies.
const SPELL_REACH: f32 = 6.0;

/// Knobs for a headless run.
#[derive(Clone, Copy, Debug)]
pub(crate) struct HarnessConfig {
    pub(crate) seed: u64,
    pub(crate) single_encounter: bool,
    pub(crate) spell_damage: u32,
    pub(crate) cast_cooldown: Duration,
}

/// Outcome of a headless run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) frames: usize,
    pub(crate) elapsed: Duration,
    pub(crate) enemies_spawned: u32,
    pub(crate) enemies_defeated: u32,
    pub(crate) encounters: u32,
    pub(crate) dodges: u32,
    pub(crate) gold_earned: u32,
    pub(crate) player_health: u32,
    pub(crate) completed: bool,
    pub(crate) defeated: bool,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = if self.completed {
            "level completed"
        } else if self.defeated {
            "player defeated"
        } else {
            "out of frames"
        };
        writeln!(
            f,
            "{outcome} after {} frames ({:.1}s level time)",
            self.frames,
            self.elapsed.as_secs_f32()
        )?;
        writeln!(
            f,
            "enemies: {} spawned, {} defeated, {} dodges",
            self.enemies_spawned, self.enemies_defeated, self.dodges
        )?;
        writeln!(f, "encounters played: {}", self.encounters)?;
        write!(
            f,
            "player: {} health, {} gold",
            self.player_health, self.gold_earned
        )
    }
}

/// Scripted player that ends cutscenes and casts at the nearest threat.
#[derive(Debug)]
struct Autopilot {
    spell_damage: u32,
    cooldown: Duration,
    since_cast: Duration,
    airborne_next: bool,
}

impl Autopilot {
    fn commands(&mut self, world: &World, dt: Duration, out: &mut Vec<Command>) {
        if query::in_cutscene(world) {
            out.push(Command::EndCutscene);
            return;
        }

        self.since_cast = self.since_cast.saturating_add(dt);
        if self.since_cast < self.cooldown
            || !query::player_actions_enabled(world)
            || query::player(world).defeated
        {
            return;
        }

        let boss_turn = query::boss_engaged(world) && query::is_player_turn(world);
        let reach = query::geometry(world).front_y() + SPELL_REACH;
        let target = query::unit_view(world)
            .iter()
            .filter(|unit| unit.state != UnitState::Death)
            .filter(|unit| match unit.kind {
                UnitKind::Boss => boss_turn,
                UnitKind::Enemy => unit.position.y <= reach,
            })
            .min_by(|a, b| a.position.y.total_cmp(&b.position.y))
            .map(|unit| (unit.id, unit.kind));

        let Some((unit, kind)) = target else {
            return;
        };

        out.push(Command::StrikeUnit {
            unit,
            damage: self.spell_damage,
            airborne: self.airborne_next,
        });
        self.airborne_next = !self.airborne_next;
        self.since_cast = Duration::ZERO;
        if kind == UnitKind::Boss {
            out.push(Command::HandTurnToEnemy);
        }
    }
}

/// Owns the world and every system participating in a run.
#[derive(Debug)]
pub(crate) struct Harness {
    world: World,
    spawning: Spawning,
    encounters: EncounterAllocation,
    autopilot: Autopilot,
    summary: Summary,
}

impl Harness {
    pub(crate) fn new(campaign: Campaign, config: HarnessConfig) -> Self {
        let encounter_config = if config.single_encounter {
            EncounterConfig::single(config.seed)
        } else {
            EncounterConfig::multi(config.seed)
        };
        Self {
            world: World::new(campaign.content, campaign.geometry, campaign.tuning),
            spawning: Spawning::new(SpawningConfig::new(config.seed.rotate_left(17))),
            encounters: EncounterAllocation::new(encounter_config),
            autopilot: Autopilot {
                spell_damage: config.spell_damage,
                cooldown: config.cast_cooldown,
                since_cast: Duration::ZERO,
                airborne_next: false,
            },
            summary: Summary::default(),
        }
    }

    /// Starts `level` and lets the systems react to the start events.
    pub(crate) fn start(&mut self, level: LevelId, first_attempt: bool) {
        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::StartLevel {
                level,
                first_attempt,
            },
            &mut events,
        );
        self.pump(events);
    }

    /// Runs until the level ends or `frames` frames were simulated.
    pub(crate) fn run(&mut self, frames: usize, dt: Duration) -> Summary {
        for _ in 0..frames {
            self.step(dt);
            let player = query::player(&self.world);
            if query::level_completed(&self.world) || player.defeated {
                break;
            }
        }

        let player = query::player(&self.world);
        self.summary.elapsed = query::elapsed(&self.world);
        self.summary.gold_earned = player.gold_earned;
        self.summary.player_health = player.health;
        self.summary.completed = query::level_completed(&self.world);
        self.summary.defeated = player.defeated;
        info!(
            frames = self.summary.frames,
            completed = self.summary.completed,
            "run finished"
        );
        self.summary.clone()
    }

    fn step(&mut self, dt: Duration) {
        self.summary.frames += 1;
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt }, &mut events);

        let mut commands = Vec::new();
        self.autopilot.commands(&self.world, dt, &mut commands);
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        self.pump(events);
    }

    /// Feeds events to the systems until no system has anything left to say.
    fn pump(&mut self, mut pending: Vec<Event>) {
        while !pending.is_empty() {
            let mut commands = Vec::new();
            self.encounters
                .handle(&pending, query::content(&self.world), &mut commands);
            self.spawning.handle(
                &pending,
                query::level(&self.world),
                query::max_enemy_count(&self.world),
                query::content(&self.world),
                &mut commands,
            );
            for event in &pending {
                self.record(event);
            }

            let mut next = Vec::new();
            for command in commands {
                world::apply(&mut self.world, command, &mut next);
            }
            pending = next;
        }
    }

    fn record(&mut self, event: &Event) {
        match event {
            Event::TimeAdvanced { .. } => return,
            Event::EnemySpawned { .. } => self.summary.enemies_spawned += 1,
            Event::EnemyDefeated { .. } => self.summary.enemies_defeated += 1,
            Event::UnitDodged { .. } => self.summary.dodges += 1,
            Event::EncounterStarted { kind, .. } => {
                self.summary.encounters += 1;
                info!(?kind, "encounter started");
            }
            _ => {}
        }
        debug!(?event, "event");
    }
}
