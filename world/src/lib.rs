#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative level state for Runebound.
//!
//! The [`World`] owns the level clock, the level session, the player and every
//! enemy, boss and NPC actor. All mutations flow through [`apply`]; read-only
//! access is provided by the [`query`] module.

pub mod clock;
mod player;
pub mod session;
mod units;

use std::time::Duration;

use glam::Vec2;
use runebound_core::{
    Command, CombatTuning, ContentTables, EncounterKind, EnemyDefinition, EnemyDefinitionId,
    Event, LevelGeometry, LevelId, LevelParameters, NpcId, Side, SpawnCategory, UnitId, UnitKind,
};
use tracing::{debug, error, info, warn};

pub use clock::GameClock;
pub use session::{LevelSession, Trigger};

use player::Player;
use units::{Npc, StepContext, StepOutcome, StrikeOutcome, Unit};

/// Represents the authoritative state of one running level.
#[derive(Debug)]
pub struct World {
    content: ContentTables,
    geometry: LevelGeometry,
    tuning: CombatTuning,
    clock: GameClock,
    session: LevelSession,
    player: Player,
    units: Vec<Unit>,
    npcs: Vec<Npc>,
    next_unit: u32,
    next_npc: u32,
}

impl World {
    /// Creates an idle world. No level runs until [`Command::StartLevel`] is applied.
    #[must_use]
    pub fn new(content: ContentTables, geometry: LevelGeometry, tuning: CombatTuning) -> Self {
        let player = Player::new(tuning.player_max_health);
        Self {
            content,
            geometry,
            tuning,
            clock: GameClock::default(),
            session: LevelSession::default(),
            player,
            units: Vec::new(),
            npcs: Vec::new(),
            next_unit: 0,
            next_npc: 0,
        }
    }

    fn allocate_unit_id(&mut self) -> UnitId {
        let id = UnitId::new(self.next_unit);
        self.next_unit = self.next_unit.wrapping_add(1);
        id
    }

    fn allocate_npc_id(&mut self) -> NpcId {
        let id = NpcId::new(self.next_npc);
        self.next_npc = self.next_npc.wrapping_add(1);
        id
    }

    fn start_level(&mut self, level: LevelId, first_attempt: bool, out_events: &mut Vec<Event>) {
        let parameters = match self.content.level(level) {
            Ok(parameters) => parameters.clone(),
            Err(error) => {
                warn!(%error, "falling back to default level parameters");
                LevelParameters {
                    level,
                    ..LevelParameters::default()
                }
            }
        };

        self.clock.reset(&parameters);
        self.session.reset(level, &parameters);
        self.player = Player::new(self.tuning.player_max_health);
        self.units.clear();
        self.npcs.clear();

        info!(
            level = level.get(),
            first_attempt,
            max_enemy_count = parameters.max_enemy_count,
            "level started"
        );
        out_events.push(Event::LevelStarted { level });

        let start = self
            .content
            .start_encounter(level, first_attempt)
            .or_else(|_| self.content.start_encounter(level, !first_attempt))
            .map(|entry| (entry.id, entry.first_encounter));
        match start {
            Ok((encounter, first_encounter)) => {
                self.session.begin_cutscene();
                if self.clock.pause_movement() {
                    out_events.push(Event::MovementPaused);
                }
                out_events.push(Event::EncounterStarted {
                    kind: EncounterKind::Start,
                    encounter,
                    first_encounter,
                });
            }
            Err(error) => warn!(%error, "level starts without an introduction"),
        }
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let _ = self.clock.tick(dt);
        out_events.push(Event::TimeAdvanced { dt });

        if self.clock.is_frozen() || self.session.level().is_none() {
            return;
        }

        self.session.update_progress(self.clock.elapsed());
        if !self.session.run_started()
            && self
                .clock
                .run_started(self.session.parameters().run_start_delay())
            && self.session.mark_run_started()
        {
            info!("run started");
            out_events.push(Event::RunStarted);
        }

        self.poll_trigger(out_events);
        self.poll_spawn_gates(out_events);
        self.advance_units(dt, out_events);
        self.advance_npcs(dt, out_events);
    }

    fn poll_trigger(&mut self, out_events: &mut Vec<Event>) {
        let Some(trigger) = self.session.poll_trigger() else {
            return;
        };

        self.clear_actors(out_events);
        if self.clock.pause_movement() {
            out_events.push(Event::MovementPaused);
        }

        match trigger {
            Trigger::Encounter(encounter) => {
                info!(
                    kind = ?encounter.kind,
                    progress = self.session.progress().get(),
                    "encounter triggered"
                );
                out_events.push(Event::EncounterStarted {
                    kind: encounter.kind,
                    encounter: encounter.encounter,
                    first_encounter: encounter.first_encounter,
                });
            }
            Trigger::Boss => {
                if let Some(level) = self.session.level() {
                    info!(level = level.get(), "boss encountered");
                    out_events.push(Event::BossEncountered { level });
                    self.spawn_boss(level, out_events);
                }
            }
        }
    }

    fn clear_actors(&mut self, out_events: &mut Vec<Event>) {
        let count = self.units.len() + self.npcs.len();
        self.units.clear();
        self.npcs.clear();
        self.session.clear_enemies();
        out_events.push(Event::UnitsCleared {
            count: u32::try_from(count).unwrap_or(u32::MAX),
        });
    }

    fn spawn_boss(&mut self, level: LevelId, out_events: &mut Vec<Event>) {
        let definition = match self.content.boss_for(level) {
            Ok(definition) => definition.clone(),
            Err(error) => {
                error!(%error, "boss encounter fired without a boss to spawn");
                return;
            }
        };

        let id = self.allocate_unit_id();
        let damage = self.session.parameters().scale_damage(definition.damage);
        let position = Vec2::new(self.geometry.lane_x, self.geometry.spawn_y);
        self.units.push(Unit::boss(
            id,
            &definition,
            damage,
            self.tuning.boss_speed,
            position,
        ));
        out_events.push(Event::BossSpawned {
            unit: id,
            definition: definition.id,
        });
    }

    fn poll_spawn_gates(&mut self, out_events: &mut Vec<Event>) {
        if !self.session.run_started()
            || !self.clock.is_running()
            || self.session.in_cutscene()
            || self.session.boss_triggered()
            || self.session.completed()
            || !self.player.is_alive()
        {
            return;
        }

        let budget = self.session.remaining_budget();
        if self.clock.can_rare_spawn() {
            out_events.push(Event::SpawnGateOpened {
                category: SpawnCategory::Rare,
                budget,
            });
        }
        if self.clock.can_npc_spawn() {
            out_events.push(Event::SpawnGateOpened {
                category: SpawnCategory::Npc,
                budget,
            });
        }
        if budget > 0 && self.clock.can_enemy_spawn() {
            debug!(budget, "enemy spawn gate opened");
            out_events.push(Event::SpawnGateOpened {
                category: SpawnCategory::Enemy,
                budget,
            });
        }
    }

    fn spawn_enemies(&mut self, definitions: Vec<EnemyDefinitionId>, out_events: &mut Vec<Event>) {
        if self.session.level().is_none()
            || self.session.in_cutscene()
            || self.session.boss_triggered()
        {
            debug!("enemy spawn request ignored outside of the run");
            return;
        }

        let budget = usize::try_from(self.session.remaining_budget()).unwrap_or(usize::MAX);
        if definitions.len() > budget {
            debug!(requested = definitions.len(), budget, "clamping enemy group");
        }

        let slots: Vec<(usize, EnemyDefinition)> = definitions
            .into_iter()
            .take(budget)
            .enumerate()
            .filter_map(|(slot, id)| match self.content.enemy(id) {
                Ok(definition) => Some((slot, definition.clone())),
                Err(error) => {
                    warn!(%error, "skipping unknown enemy");
                    None
                }
            })
            .collect();

        for (slot, definition) in slots.into_iter().rev() {
            let id = self.allocate_unit_id();
            let position = Vec2::new(
                self.geometry.lane_x,
                self.geometry.spawn_y + self.geometry.group_spacing * slot as f32,
            );
            let damage = self.session.parameters().scale_damage(definition.damage);
            let unit = Unit::enemy(id, &definition, damage, position);
            debug!(
                unit = id.get(),
                name = %definition.name,
                y = unit.position().y,
                "enemy spawned"
            );
            self.units.push(unit);
            self.session.add_enemies(1);
            out_events.push(Event::EnemySpawned {
                unit: id,
                definition: definition.id,
            });
        }
    }

    fn spawn_npc(&mut self, side: Side, out_events: &mut Vec<Event>) {
        if self.session.level().is_none() || self.session.in_cutscene() {
            return;
        }
        let id = self.allocate_npc_id();
        self.npcs.push(Npc::new(id, side, &self.geometry));
        out_events.push(Event::NpcSpawned { npc: id, side });
    }

    fn advance_units(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        // Front units move first so followers probe against positions after this frame's move.
        let mut order: Vec<usize> = (0..self.units.len()).collect();
        order.sort_by(|&a, &b| {
            self.units[a]
                .position()
                .y
                .total_cmp(&self.units[b].position().y)
        });

        let paused = self.clock.is_paused();
        let enemy_turn = !self.session.is_player_turn();
        let player_alive = self.player.is_alive();
        let mut outcomes = Vec::with_capacity(self.units.len());
        for index in order {
            let leader_y = self.leader_y(index);
            let ctx = StepContext {
                dt,
                paused,
                leader_y,
                enemy_turn,
                player_alive,
                geometry: &self.geometry,
                tuning: &self.tuning,
            };
            let unit = &mut self.units[index];
            let outcome = unit.step(&ctx, out_events);
            if outcome != StepOutcome::default() {
                outcomes.push((unit.id(), unit.kind(), outcome));
            }
        }

        for (id, kind, outcome) in outcomes {
            self.resolve_step(id, kind, outcome, out_events);
        }
    }

    fn resolve_step(
        &mut self,
        id: UnitId,
        kind: UnitKind,
        outcome: StepOutcome,
        out_events: &mut Vec<Event>,
    ) {
        if outcome.reached_front {
            debug!(unit = id.get(), "enemy reached the front line");
            if self.clock.pause_movement() {
                out_events.push(Event::MovementPaused);
            }
        }

        if outcome.engaged {
            info!(unit = id.get(), "boss engaged");
            self.session.engage_boss();
            if self.clock.pause_movement() {
                out_events.push(Event::MovementPaused);
            }
            out_events.push(Event::BossEngaged { unit: id });
            out_events.push(Event::TurnChanged { player_turn: true });
        }

        if let Some(damage) = outcome.attack {
            self.hit_player(damage, out_events);
        }

        if outcome.turn_finished && self.session.player_turn() {
            out_events.push(Event::TurnChanged { player_turn: true });
        }

        if outcome.despawn {
            if let Some(index) = self.units.iter().position(|unit| unit.id() == id) {
                let _ = self.units.remove(index);
            }
            out_events.push(Event::UnitDespawned { unit: id });
            match kind {
                UnitKind::Enemy => {
                    self.session.remove_enemy();
                    self.resume_if_clear(out_events);
                }
                UnitKind::Boss => self.complete_level(out_events),
            }
        }
    }

    /// Height of the nearest living enemy ahead of the enemy at `index` in its lane.
    fn leader_y(&self, index: usize) -> Option<f32> {
        let unit = &self.units[index];
        if unit.kind() != UnitKind::Enemy {
            return None;
        }
        self.units
            .iter()
            .filter_map(|other| unit.gap_to(other))
            .min_by(f32::total_cmp)
            .map(|gap| unit.position().y - gap)
    }

    fn advance_npcs(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let paused = self.clock.is_paused();
        let geometry = &self.geometry;
        let mut departed = Vec::new();
        self.npcs.retain_mut(|npc| {
            let gone = npc.step(dt, paused, geometry);
            if gone {
                departed.push(npc.id());
            }
            !gone
        });
        for npc in departed {
            out_events.push(Event::NpcDespawned { npc });
        }
    }

    fn strike_unit(
        &mut self,
        target: UnitId,
        damage: u32,
        airborne: bool,
        out_events: &mut Vec<Event>,
    ) {
        let Some(unit) = self.units.iter_mut().find(|unit| unit.id() == target) else {
            debug!(unit = target.get(), "strike on a missing unit");
            return;
        };
        let kind = unit.kind();
        let Some(outcome) = unit.strike(damage, airborne, &self.tuning, out_events) else {
            debug!(unit = target.get(), "strike ignored");
            return;
        };

        if let StrikeOutcome::Killed { gold } = outcome {
            match kind {
                UnitKind::Enemy => out_events.push(Event::EnemyDefeated { unit: target }),
                UnitKind::Boss => {
                    info!(unit = target.get(), "boss defeated");
                    self.session.disengage_boss();
                    out_events.push(Event::BossDefeated { unit: target });
                }
            }
            if let Some(amount) = gold {
                self.player.award_gold(amount);
                if amount > 0 {
                    out_events.push(Event::GoldAwarded { amount });
                }
            }
        }
    }

    fn hit_player(&mut self, damage: u32, out_events: &mut Vec<Event>) {
        let Some(hit) = self.player.hit(damage) else {
            return;
        };
        out_events.push(Event::PlayerHit {
            damage,
            health: hit.health,
        });
        if hit.defeated {
            info!("player defeated");
            out_events.push(Event::PlayerDefeated);
            if self.clock.pause_movement() {
                out_events.push(Event::MovementPaused);
            }
            for unit in &mut self.units {
                unit.stand_down(out_events);
            }
        }
    }

    fn complete_level(&mut self, out_events: &mut Vec<Event>) {
        let Some(level) = self.session.level() else {
            return;
        };
        if self.session.complete() {
            let gold_earned = self.player.gold_earned();
            info!(level = level.get(), gold_earned, "level completed");
            out_events.push(Event::LevelCompleted { level, gold_earned });
        }
    }

    fn movement_held(&self) -> bool {
        self.clock.is_frozen()
            || self.session.in_cutscene()
            || self.session.boss_engaged()
            || self.session.completed()
            || !self.player.is_alive()
            || self.units.iter().any(Unit::holds_front)
    }

    fn resume_if_clear(&mut self, out_events: &mut Vec<Event>) {
        if !self.movement_held() && self.clock.resume_movement() {
            out_events.push(Event::MovementResumed);
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartLevel {
            level,
            first_attempt,
        } => world.start_level(level, first_attempt, out_events),
        Command::ScheduleEncounters { encounters } => {
            debug!(count = encounters.len(), "encounters scheduled");
            world.session.schedule(encounters);
        }
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::EndCutscene => {
            if world.session.end_cutscene() {
                out_events.push(Event::CutsceneEnded);
                world.resume_if_clear(out_events);
            }
        }
        Command::PauseMovement => {
            if world.clock.pause_movement() {
                out_events.push(Event::MovementPaused);
            }
        }
        Command::ResumeMovement => {
            if world.clock.resume_movement() {
                out_events.push(Event::MovementResumed);
            }
        }
        Command::Freeze => {
            if world.clock.freeze() {
                out_events.push(Event::Frozen);
            }
        }
        Command::Unfreeze => {
            if world.clock.unfreeze() {
                out_events.push(Event::Unfrozen);
            }
        }
        Command::SpawnEnemies { definitions } => world.spawn_enemies(definitions, out_events),
        Command::SpawnNpc { side } => world.spawn_npc(side, out_events),
        Command::StrikeUnit {
            unit,
            damage,
            airborne,
        } => world.strike_unit(unit, damage, airborne, out_events),
        Command::HandTurnToPlayer => {
            if world.session.player_turn() {
                out_events.push(Event::TurnChanged { player_turn: true });
            }
        }
        Command::HandTurnToEnemy => {
            if world.session.enemy_turn() {
                out_events.push(Event::TurnChanged { player_turn: false });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{GameClock, LevelSession, World};
    use runebound_core::{
        AllocatedEncounter, ContentTables, LevelGeometry, LevelId, NpcId, PlayerSnapshot,
        Progress, Side, UnitView, WorldPoint,
    };

    /// Provides read-only access to the level clock.
    #[must_use]
    pub fn clock(world: &World) -> &GameClock {
        &world.clock
    }

    /// Provides read-only access to the level session.
    #[must_use]
    pub fn session(world: &World) -> &LevelSession {
        &world.session
    }

    /// Static content the world was built with.
    #[must_use]
    pub fn content(world: &World) -> &ContentTables {
        &world.content
    }

    /// Level layout the world was built with.
    #[must_use]
    pub fn geometry(world: &World) -> &LevelGeometry {
        &world.geometry
    }

    /// Level currently being played.
    #[must_use]
    pub fn level(world: &World) -> Option<LevelId> {
        world.session.level()
    }

    /// Running level time.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.clock.elapsed()
    }

    /// Whether world movement is paused.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.clock.is_paused()
    }

    /// Whether the world is frozen.
    #[must_use]
    pub fn is_frozen(world: &World) -> bool {
        world.clock.is_frozen()
    }

    /// Level progress.
    #[must_use]
    pub fn progress(world: &World) -> Progress {
        world.session.progress()
    }

    /// Whether a cutscene is in flight.
    #[must_use]
    pub fn in_cutscene(world: &World) -> bool {
        world.session.in_cutscene()
    }

    /// Whether the player holds the boss-fight turn.
    #[must_use]
    pub fn is_player_turn(world: &World) -> bool {
        world.session.is_player_turn()
    }

    /// Whether player spells may be cast right now.
    #[must_use]
    pub fn player_actions_enabled(world: &World) -> bool {
        !world.session.boss_engaged() || world.session.is_player_turn()
    }

    /// Whether the boss encounter fired.
    #[must_use]
    pub fn boss_triggered(world: &World) -> bool {
        world.session.boss_triggered()
    }

    /// Whether the boss is in position and fighting.
    #[must_use]
    pub fn boss_engaged(world: &World) -> bool {
        world.session.boss_engaged()
    }

    /// Whether the level was completed.
    #[must_use]
    pub fn level_completed(world: &World) -> bool {
        world.session.completed()
    }

    /// Enemies currently counted against the level budget.
    #[must_use]
    pub fn enemy_count(world: &World) -> u32 {
        world.session.enemy_count()
    }

    /// Maximum simultaneous enemies for the running level.
    #[must_use]
    pub fn max_enemy_count(world: &World) -> u32 {
        world.session.max_enemy_count()
    }

    /// Allocated encounters that have not fired yet, in trigger order.
    #[must_use]
    pub fn pending_encounters(world: &World) -> &[AllocatedEncounter] {
        world.session.pending_encounters()
    }

    /// Captures a read-only view of the enemies and the boss.
    #[must_use]
    pub fn unit_view(world: &World) -> UnitView {
        UnitView::from_snapshots(world.units.iter().map(|unit| unit.snapshot()).collect())
    }

    /// Captures the ambient NPCs in spawn order.
    #[must_use]
    pub fn npcs(world: &World) -> Vec<NpcSnapshot> {
        world
            .npcs
            .iter()
            .map(|npc| NpcSnapshot {
                id: npc.id(),
                side: npc.side(),
                position: npc.position(),
            })
            .collect()
    }

    /// Captures the player actor.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        world.player.snapshot()
    }

    /// Immutable representation of an ambient NPC.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct NpcSnapshot {
        /// Identifier assigned to the NPC.
        pub id: NpcId,
        /// Side lane the NPC walks down.
        pub side: Side,
        /// Current position.
        pub position: WorldPoint,
    }
}
