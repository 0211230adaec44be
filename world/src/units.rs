//! Enemy, boss and NPC actors with their timer-driven state machines.

use std::time::Duration;

use glam::Vec2;
use runebound_core::{
    BossDefinition, CombatTuning, EnemyDefinition, Event, FlashKind, LevelGeometry, NpcId, Side,
    UnitId, UnitKind, UnitSnapshot, UnitState, WorldPoint,
};

/// Horizontal tolerance under which two units share a lane.
const LANE_TOLERANCE: f32 = 0.5;

/// Per-frame inputs a unit needs from the rest of the world.
#[derive(Clone, Copy, Debug)]
pub(crate) struct StepContext<'a> {
    pub(crate) dt: Duration,
    pub(crate) paused: bool,
    /// Height of the nearest living enemy ahead in the same lane, already moved this frame.
    pub(crate) leader_y: Option<f32>,
    pub(crate) enemy_turn: bool,
    pub(crate) player_alive: bool,
    pub(crate) geometry: &'a LevelGeometry,
    pub(crate) tuning: &'a CombatTuning,
}

/// Side effects of a unit step that the world must resolve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct StepOutcome {
    /// Enemy stopped at the front line.
    pub(crate) reached_front: bool,
    /// Boss stopped at its stop line.
    pub(crate) engaged: bool,
    /// Damage to apply to the player.
    pub(crate) attack: Option<u32>,
    /// Boss finished resting and yields the turn.
    pub(crate) turn_finished: bool,
    /// Unit leaves the level.
    pub(crate) despawn: bool,
}

/// Result of a strike that was not ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StrikeOutcome {
    Dodged,
    Damaged,
    Killed { gold: Option<u32> },
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum AttackPhase {
    Advance(Duration),
    Strike(Duration),
    Retreat(Duration),
    Rest(Duration),
}

#[derive(Clone, Debug)]
struct BossCombat {
    arrived: bool,
    origin: Vec2,
    phase: Option<AttackPhase>,
}

#[derive(Clone, Copy, Debug)]
struct Flash {
    remaining: Duration,
}

/// Enemy or boss owned by the world until it despawns.
#[derive(Clone, Debug)]
pub(crate) struct Unit {
    id: UnitId,
    kind: UnitKind,
    state: UnitState,
    position: Vec2,
    velocity: Vec2,
    speed: f32,
    health: u32,
    max_health: u32,
    damage: u32,
    gold_drop: u32,
    gold_paid: bool,
    airborne: bool,
    waiting: bool,
    timer: Duration,
    flash: Option<Flash>,
    boss: Option<BossCombat>,
}

impl Unit {
    /// Builds an enemy whose damage is already scaled by the level multiplier.
    pub(crate) fn enemy(
        id: UnitId,
        definition: &EnemyDefinition,
        damage: u32,
        position: Vec2,
    ) -> Self {
        Self {
            id,
            kind: UnitKind::Enemy,
            state: UnitState::Run,
            position,
            velocity: Vec2::ZERO,
            speed: definition.speed.max(0.0),
            health: definition.health,
            max_health: definition.health,
            damage,
            gold_drop: definition.gold_drop,
            gold_paid: false,
            airborne: definition.airborne,
            waiting: false,
            timer: Duration::ZERO,
            flash: None,
            boss: None,
        }
    }

    /// Builds the level boss at its entry point.
    pub(crate) fn boss(
        id: UnitId,
        definition: &BossDefinition,
        damage: u32,
        speed: f32,
        position: Vec2,
    ) -> Self {
        Self {
            id,
            kind: UnitKind::Boss,
            state: UnitState::Run,
            position,
            velocity: Vec2::ZERO,
            speed: speed.max(0.0),
            health: definition.health,
            max_health: definition.health,
            damage,
            gold_drop: definition.gold_drop,
            gold_paid: false,
            airborne: definition.airborne,
            waiting: false,
            timer: Duration::ZERO,
            flash: None,
            boss: Some(BossCombat {
                arrived: false,
                origin: position,
                phase: None,
            }),
        }
    }

    pub(crate) const fn id(&self) -> UnitId {
        self.id
    }

    pub(crate) const fn kind(&self) -> UnitKind {
        self.kind
    }

    pub(crate) const fn position(&self) -> Vec2 {
        self.position
    }

    pub(crate) fn is_dead(&self) -> bool {
        self.state == UnitState::Death
    }

    /// Reports whether a living enemy stands at the front line.
    pub(crate) fn holds_front(&self) -> bool {
        self.kind == UnitKind::Enemy
            && !self.waiting
            && matches!(self.state, UnitState::Idle | UnitState::Attack)
    }

    /// Gap to `other` when it is a living enemy below this unit in the same lane.
    pub(crate) fn gap_to(&self, other: &Unit) -> Option<f32> {
        if other.id == self.id || other.kind != UnitKind::Enemy || other.is_dead() {
            return None;
        }
        let same_lane = (other.position.x - self.position.x).abs() < LANE_TOLERANCE;
        let gap = self.position.y - other.position.y;
        (same_lane && gap > 0.0).then_some(gap)
    }

    fn is_blocked(&self, ctx: &StepContext<'_>) -> bool {
        ctx.leader_y
            .is_some_and(|leader_y| self.position.y - leader_y <= ctx.geometry.safe_separation)
    }

    /// Advances the unit by one frame.
    pub(crate) fn step(
        &mut self,
        ctx: &StepContext<'_>,
        out_events: &mut Vec<Event>,
    ) -> StepOutcome {
        self.tick_flash(ctx.dt, out_events);
        match self.kind {
            UnitKind::Enemy => self.step_enemy(ctx, out_events),
            UnitKind::Boss => self.step_boss(ctx, out_events),
        }
    }

    fn step_enemy(&mut self, ctx: &StepContext<'_>, out_events: &mut Vec<Event>) -> StepOutcome {
        let mut outcome = StepOutcome::default();
        let dt = ctx.dt;

        match self.state {
            UnitState::Death => {
                self.timer = self.timer.saturating_add(dt);
                outcome.despawn = self.timer >= ctx.tuning.death();
            }
            UnitState::Run => {
                if ctx.paused {
                    self.velocity = Vec2::ZERO;
                } else if self.is_blocked(ctx) {
                    self.hold_for_space(out_events);
                } else {
                    self.velocity = Vec2::NEG_Y * self.speed;
                    self.position += self.velocity * dt.as_secs_f32();
                    let front_y = ctx.geometry.front_y();
                    if self.position.y < ctx.geometry.despawn_y() {
                        outcome.despawn = true;
                    } else if let Some(floor) = ctx
                        .leader_y
                        .map(|leader_y| leader_y + ctx.geometry.safe_separation)
                        .filter(|floor| self.position.y <= *floor)
                    {
                        self.position.y = floor;
                        self.hold_for_space(out_events);
                    } else if self.position.y <= front_y {
                        self.position.y = front_y;
                        self.velocity = Vec2::ZERO;
                        self.enter(UnitState::Idle, out_events);
                        outcome.reached_front = true;
                    }
                }
            }
            UnitState::Idle if self.waiting => {
                if !self.is_blocked(ctx) {
                    self.waiting = false;
                    self.enter(UnitState::Run, out_events);
                }
            }
            UnitState::Idle => {
                if ctx.player_alive {
                    self.timer = self.timer.saturating_add(dt);
                    if self.timer >= ctx.tuning.idle() {
                        self.enter(UnitState::Attack, out_events);
                    }
                }
            }
            UnitState::Attack => {
                self.timer = self.timer.saturating_add(dt);
                if self.timer >= ctx.tuning.attack() {
                    self.enter(UnitState::Idle, out_events);
                    if ctx.player_alive {
                        outcome.attack = Some(self.damage);
                    }
                }
            }
        }

        outcome
    }

    fn hold_for_space(&mut self, out_events: &mut Vec<Event>) {
        self.velocity = Vec2::ZERO;
        self.waiting = true;
        self.enter(UnitState::Idle, out_events);
    }

    fn step_boss(&mut self, ctx: &StepContext<'_>, out_events: &mut Vec<Event>) -> StepOutcome {
        let mut outcome = StepOutcome::default();
        let dt = ctx.dt;
        let Some(mut combat) = self.boss.take() else {
            return outcome;
        };

        if !combat.arrived {
            if !self.is_dead() {
                self.velocity = Vec2::NEG_Y * self.speed;
                self.position += self.velocity * dt.as_secs_f32();
                let stop_y = ctx.geometry.boss_stop_y();
                if self.position.y <= stop_y {
                    self.position.y = stop_y;
                    self.velocity = Vec2::ZERO;
                    combat.arrived = true;
                    combat.origin = self.position;
                    self.enter(UnitState::Idle, out_events);
                    outcome.engaged = true;
                }
            }
            self.boss = Some(combat);
            return outcome;
        }

        if combat.phase.is_none() && !self.is_dead() && ctx.enemy_turn && ctx.player_alive {
            combat.phase = Some(AttackPhase::Advance(Duration::ZERO));
            self.enter(UnitState::Run, out_events);
        }

        let strike_at = Vec2::new(combat.origin.x, ctx.geometry.front_y());
        let move_time = ctx.tuning.boss_move();

        combat.phase = match combat.phase {
            None => None,
            Some(AttackPhase::Advance(elapsed)) => {
                let elapsed = elapsed.saturating_add(dt);
                let t = tween(elapsed, move_time);
                self.position = combat.origin.lerp(strike_at, t);
                if t >= 1.0 {
                    self.enter(UnitState::Attack, out_events);
                    Some(AttackPhase::Strike(Duration::ZERO))
                } else {
                    Some(AttackPhase::Advance(elapsed))
                }
            }
            Some(AttackPhase::Strike(elapsed)) => {
                let elapsed = elapsed.saturating_add(dt);
                if elapsed >= ctx.tuning.attack() {
                    if !self.is_dead() && ctx.player_alive {
                        outcome.attack = Some(self.damage);
                    }
                    self.enter(UnitState::Run, out_events);
                    Some(AttackPhase::Retreat(Duration::ZERO))
                } else {
                    Some(AttackPhase::Strike(elapsed))
                }
            }
            Some(AttackPhase::Retreat(elapsed)) => {
                let elapsed = elapsed.saturating_add(dt);
                let t = tween(elapsed, move_time);
                self.position = strike_at.lerp(combat.origin, t);
                if t >= 1.0 {
                    self.enter(UnitState::Idle, out_events);
                    Some(AttackPhase::Rest(Duration::ZERO))
                } else {
                    Some(AttackPhase::Retreat(elapsed))
                }
            }
            Some(AttackPhase::Rest(elapsed)) => {
                let elapsed = elapsed.saturating_add(dt);
                if elapsed >= ctx.tuning.boss_rest() {
                    outcome.turn_finished = true;
                    None
                } else {
                    Some(AttackPhase::Rest(elapsed))
                }
            }
        };

        if self.is_dead() && combat.phase.is_none() {
            self.timer = self.timer.saturating_add(dt);
            outcome.despawn = self.timer >= ctx.tuning.death();
        }

        self.boss = Some(combat);
        outcome
    }

    /// Applies a spell impact. Returns `None` when the strike is ignored.
    pub(crate) fn strike(
        &mut self,
        damage: u32,
        airborne_spell: bool,
        tuning: &CombatTuning,
        out_events: &mut Vec<Event>,
    ) -> Option<StrikeOutcome> {
        if self.is_dead() {
            return None;
        }
        if let Some(combat) = &self.boss {
            if !combat.arrived {
                return None;
            }
        }

        if self.airborne && !airborne_spell {
            out_events.push(Event::UnitDodged { unit: self.id });
            self.start_flash(FlashKind::Dodge, tuning.dodge_flash(), out_events);
            return Some(StrikeOutcome::Dodged);
        }

        self.health = self.health.saturating_sub(damage);
        out_events.push(Event::UnitDamaged {
            unit: self.id,
            health: self.health,
        });
        self.start_flash(FlashKind::Hit, tuning.hit_flash(), out_events);

        if self.health > 0 {
            return Some(StrikeOutcome::Damaged);
        }

        self.velocity = Vec2::ZERO;
        self.waiting = false;
        self.enter(UnitState::Death, out_events);
        let gold = (!self.gold_paid).then_some(self.gold_drop);
        self.gold_paid = true;
        Some(StrikeOutcome::Killed { gold })
    }

    /// Returns a living boss to idle once the player can no longer fight.
    pub(crate) fn stand_down(&mut self, out_events: &mut Vec<Event>) {
        if self.kind == UnitKind::Boss
            && !self.is_dead()
            && self.state != UnitState::Idle
            && self.boss.as_ref().is_some_and(|combat| combat.phase.is_none())
        {
            self.enter(UnitState::Idle, out_events);
        }
    }

    pub(crate) fn snapshot(&self) -> UnitSnapshot {
        UnitSnapshot {
            id: self.id,
            kind: self.kind,
            state: self.state,
            position: point(self.position),
            velocity: point(self.velocity),
            health: self.health,
            max_health: self.max_health,
            airborne: self.airborne,
            waiting: self.waiting,
            attacking: self
                .boss
                .as_ref()
                .is_some_and(|combat| combat.phase.is_some()),
        }
    }

    fn enter(&mut self, state: UnitState, out_events: &mut Vec<Event>) {
        if self.state == UnitState::Death {
            return;
        }
        self.timer = Duration::ZERO;
        if self.state != state {
            self.state = state;
            out_events.push(Event::UnitStateChanged {
                unit: self.id,
                state,
            });
        }
    }

    fn start_flash(&mut self, kind: FlashKind, duration: Duration, out_events: &mut Vec<Event>) {
        self.flash = Some(Flash {
            remaining: duration,
        });
        out_events.push(Event::UnitFlashStarted {
            unit: self.id,
            kind,
        });
    }

    fn tick_flash(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let Some(flash) = &mut self.flash else {
            return;
        };
        flash.remaining = flash.remaining.saturating_sub(dt);
        if flash.remaining.is_zero() {
            self.flash = None;
            out_events.push(Event::UnitFlashEnded { unit: self.id });
        }
    }
}

/// Ambient NPC walking down a side lane.
#[derive(Clone, Debug)]
pub(crate) struct Npc {
    id: NpcId,
    side: Side,
    position: Vec2,
}

impl Npc {
    pub(crate) fn new(id: NpcId, side: Side, geometry: &LevelGeometry) -> Self {
        Self {
            id,
            side,
            position: Vec2::new(geometry.side_lane_x(side), geometry.spawn_y),
        }
    }

    pub(crate) const fn id(&self) -> NpcId {
        self.id
    }

    pub(crate) const fn side(&self) -> Side {
        self.side
    }

    pub(crate) fn position(&self) -> WorldPoint {
        point(self.position)
    }

    /// Walks the NPC down its lane. Returns `true` once it left the level.
    pub(crate) fn step(&mut self, dt: Duration, paused: bool, geometry: &LevelGeometry) -> bool {
        if !paused {
            self.position.y -= geometry.npc_speed * dt.as_secs_f32();
        }
        self.position.y < geometry.despawn_y()
    }
}

fn tween(elapsed: Duration, total: Duration) -> f32 {
    if total.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f32() / total.as_secs_f32()).min(1.0)
}

const fn point(vector: Vec2) -> WorldPoint {
    WorldPoint::new(vector.x, vector.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use runebound_core::{BossDefinitionId, EnemyDefinitionId, LevelId};

    const FRAME: Duration = Duration::from_millis(100);

    fn leafer() -> EnemyDefinition {
        EnemyDefinition {
            id: EnemyDefinitionId::new(0),
            level: LevelId::new(1),
            name: "Leafer".to_owned(),
            damage: 3,
            health: 8,
            speed: 10.0,
            gold_drop: 10,
            spawn_rate: 0.5,
            airborne: false,
        }
    }

    fn boss() -> BossDefinition {
        BossDefinition {
            id: BossDefinitionId::new(0),
            level: LevelId::new(1),
            name: "Sporelock".to_owned(),
            damage: 10,
            health: 50,
            gold_drop: 100,
            airborne: false,
        }
    }

    fn context<'a>(geometry: &'a LevelGeometry, tuning: &'a CombatTuning) -> StepContext<'a> {
        StepContext {
            dt: FRAME,
            paused: false,
            leader_y: None,
            enemy_turn: false,
            player_alive: true,
            geometry,
            tuning,
        }
    }

    #[test]
    fn enemy_stops_at_front_line_and_attacks() {
        let geometry = LevelGeometry::default();
        let tuning = CombatTuning::default();
        let ctx = context(&geometry, &tuning);
        let mut events = Vec::new();
        let mut unit = Unit::enemy(UnitId::new(1), &leafer(), 3, Vec2::new(0.0, 5.0));

        let outcome = unit.step(&ctx, &mut events);
        assert!(outcome.reached_front);
        assert_eq!(unit.position().y, geometry.front_y());
        assert!(unit.holds_front());

        let mut attacks = Vec::new();
        for _ in 0..15 {
            if let Some(damage) = unit.step(&ctx, &mut events).attack {
                attacks.push(damage);
            }
        }
        assert_eq!(attacks, vec![3]);
    }

    #[test]
    fn paused_enemy_holds_position() {
        let geometry = LevelGeometry::default();
        let tuning = CombatTuning::default();
        let ctx = StepContext {
            paused: true,
            ..context(&geometry, &tuning)
        };
        let mut unit = Unit::enemy(UnitId::new(1), &leafer(), 3, Vec2::new(0.0, 20.0));
        let _ = unit.step(&ctx, &mut Vec::new());
        assert_eq!(unit.position().y, 20.0);
        assert_eq!(unit.snapshot().velocity, WorldPoint::default());
    }

    #[test]
    fn blocked_enemy_waits_until_probe_clears() {
        let geometry = LevelGeometry::default();
        let tuning = CombatTuning::default();
        let blocked = StepContext {
            leader_y: Some(19.0),
            ..context(&geometry, &tuning)
        };
        let mut events = Vec::new();
        let mut unit = Unit::enemy(UnitId::new(1), &leafer(), 3, Vec2::new(0.0, 20.0));

        let _ = unit.step(&blocked, &mut events);
        assert!(unit.snapshot().waiting);
        assert!(!unit.holds_front());

        let _ = unit.step(&context(&geometry, &tuning), &mut events);
        assert_eq!(unit.snapshot().state, UnitState::Run);
        assert!(!unit.snapshot().waiting);
    }

    #[test]
    fn follower_stops_at_safe_separation() {
        let geometry = LevelGeometry::default();
        let tuning = CombatTuning::default();
        let ctx = StepContext {
            leader_y: Some(18.0),
            ..context(&geometry, &tuning)
        };
        let mut events = Vec::new();
        let mut unit = Unit::enemy(UnitId::new(1), &leafer(), 3, Vec2::new(0.0, 20.0));

        let outcome = unit.step(&ctx, &mut events);
        assert_eq!(outcome, StepOutcome::default());
        assert_eq!(unit.position().y, 18.0 + geometry.safe_separation);
        assert!(unit.snapshot().waiting);
        assert_eq!(unit.snapshot().velocity, WorldPoint::default());
    }

    #[test]
    fn enemy_below_lower_bound_despawns() {
        let geometry = LevelGeometry {
            front_line: -5.0,
            ..LevelGeometry::default()
        };
        let tuning = CombatTuning::default();
        let ctx = context(&geometry, &tuning);
        let mut unit = Unit::enemy(UnitId::new(1), &leafer(), 3, Vec2::new(0.0, -1.5));

        let outcome = unit.step(&ctx, &mut Vec::new());
        assert!(outcome.despawn);
        assert!(!outcome.reached_front);
    }

    #[test]
    fn lethal_strike_pays_gold_once() {
        let tuning = CombatTuning::default();
        let mut events = Vec::new();
        let mut unit = Unit::enemy(UnitId::new(1), &leafer(), 3, Vec2::new(0.0, 20.0));

        assert_eq!(
            unit.strike(100, false, &tuning, &mut events),
            Some(StrikeOutcome::Killed { gold: Some(10) })
        );
        assert!(unit.is_dead());
        assert_eq!(unit.strike(100, false, &tuning, &mut events), None);
        let deaths = events
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    Event::UnitStateChanged {
                        state: UnitState::Death,
                        ..
                    }
                )
            })
            .count();
        assert_eq!(deaths, 1);
    }

    #[test]
    fn airborne_unit_dodges_grounded_spells() {
        let tuning = CombatTuning::default();
        let mut events = Vec::new();
        let eagle = EnemyDefinition {
            airborne: true,
            ..leafer()
        };
        let mut unit = Unit::enemy(UnitId::new(1), &eagle, 4, Vec2::new(0.0, 20.0));

        assert_eq!(
            unit.strike(5, false, &tuning, &mut events),
            Some(StrikeOutcome::Dodged)
        );
        assert_eq!(unit.snapshot().health, 8);
        assert_eq!(
            unit.strike(5, true, &tuning, &mut events),
            Some(StrikeOutcome::Damaged)
        );
        assert_eq!(unit.snapshot().health, 3);
    }

    #[test]
    fn flash_ends_after_its_duration() {
        let geometry = LevelGeometry::default();
        let tuning = CombatTuning::default();
        let ctx = StepContext {
            paused: true,
            ..context(&geometry, &tuning)
        };
        let mut events = Vec::new();
        let mut unit = Unit::enemy(UnitId::new(3), &leafer(), 3, Vec2::new(0.0, 20.0));
        let _ = unit.strike(1, false, &tuning, &mut events);
        events.clear();

        let _ = unit.step(&ctx, &mut events);
        assert!(events.is_empty());
        let _ = unit.step(&ctx, &mut events);
        assert_eq!(
            events,
            vec![Event::UnitFlashEnded {
                unit: UnitId::new(3)
            }]
        );
    }

    #[test]
    fn boss_ignores_strikes_until_engaged() {
        let geometry = LevelGeometry::default();
        let tuning = CombatTuning::default();
        let mut events = Vec::new();
        let mut unit = Unit::boss(UnitId::new(9), &boss(), 10, 5.0, Vec2::new(0.0, 14.2));

        assert_eq!(unit.strike(10, true, &tuning, &mut events), None);
        let paused = StepContext {
            paused: true,
            ..context(&geometry, &tuning)
        };
        assert!(unit.step(&paused, &mut events).engaged, "approach ignores pause");
        assert_eq!(
            unit.strike(10, true, &tuning, &mut events),
            Some(StrikeOutcome::Damaged)
        );
    }

    #[test]
    fn boss_sequence_strikes_once_and_yields_turn() {
        let geometry = LevelGeometry::default();
        let tuning = CombatTuning::default();
        let mut events = Vec::new();
        let mut unit = Unit::boss(UnitId::new(9), &boss(), 10, 5.0, Vec2::new(0.0, 14.0));
        assert!(unit.step(&context(&geometry, &tuning), &mut events).engaged);

        let enemy_turn = StepContext {
            enemy_turn: true,
            ..context(&geometry, &tuning)
        };
        let mut attacks = 0;
        let mut frames = 0;
        loop {
            let outcome = unit.step(&enemy_turn, &mut events);
            frames += 1;
            if outcome.attack.is_some() {
                attacks += 1;
                assert!(unit.snapshot().attacking);
            }
            if outcome.turn_finished {
                break;
            }
            assert!(frames < 100, "sequence must finish");
        }
        assert_eq!(attacks, 1);
        assert_eq!(unit.position().y, geometry.boss_stop_y());
        assert!(!unit.snapshot().attacking);
    }

    #[test]
    fn dying_boss_finishes_sequence_without_damage() {
        let geometry = LevelGeometry::default();
        let tuning = CombatTuning::default();
        let mut events = Vec::new();
        let mut unit = Unit::boss(UnitId::new(9), &boss(), 10, 5.0, Vec2::new(0.0, 14.0));
        let _ = unit.step(&context(&geometry, &tuning), &mut events);

        let enemy_turn = StepContext {
            enemy_turn: true,
            ..context(&geometry, &tuning)
        };
        let _ = unit.step(&enemy_turn, &mut events);
        assert!(unit.snapshot().attacking);
        assert!(matches!(
            unit.strike(50, true, &tuning, &mut events),
            Some(StrikeOutcome::Killed { gold: Some(100) })
        ));

        let mut despawned = false;
        for _ in 0..100 {
            let outcome = unit.step(&enemy_turn, &mut events);
            assert_eq!(outcome.attack, None);
            if outcome.despawn {
                despawned = true;
                break;
            }
        }
        assert!(despawned);
        assert_eq!(unit.snapshot().state, UnitState::Death);
    }

    #[test]
    fn npc_walks_down_and_leaves() {
        let geometry = LevelGeometry {
            spawn_y: 1.0,
            ..LevelGeometry::default()
        };
        let mut npc = Npc::new(NpcId::new(0), Side::Left, &geometry);
        assert_eq!(npc.position().x, -5.0);
        assert!(!npc.step(Duration::from_secs(1), true, &geometry));
        assert!(npc.step(Duration::from_secs(1), false, &geometry));
    }
}
