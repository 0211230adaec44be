//! Level clock with pause/freeze gating and per-category spawn cooldowns.

use std::time::Duration;

use runebound_core::{LevelParameters, SpawnCategory};

/// Owns elapsed level time and the spawn cooldown gates.
#[derive(Clone, Debug)]
pub struct GameClock {
    elapsed: Duration,
    paused: bool,
    frozen: bool,
    paused_before_freeze: bool,
    gates: [SpawnGate; 3],
}

#[derive(Clone, Copy, Debug)]
struct SpawnGate {
    delay: Duration,
    last_fire: Option<Duration>,
}

impl SpawnGate {
    const fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_fire: None,
        }
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new([Duration::ZERO; 3])
    }
}

impl GameClock {
    /// Creates a running clock whose gates use the provided delays, indexed by
    /// [`SpawnCategory::index`].
    #[must_use]
    pub fn new(delays: [Duration; 3]) -> Self {
        Self {
            elapsed: Duration::ZERO,
            paused: false,
            frozen: false,
            paused_before_freeze: false,
            gates: delays.map(SpawnGate::new),
        }
    }

    /// Creates a clock configured from a level parameter table entry.
    #[must_use]
    pub fn for_level(parameters: &LevelParameters) -> Self {
        Self::new(SpawnCategory::ALL.map(|category| parameters.spawn_delay(category)))
    }

    /// Restores the freshly created state using new gate delays.
    pub fn reset(&mut self, parameters: &LevelParameters) {
        *self = Self::for_level(parameters);
    }

    /// Advances elapsed time unless the clock is paused or frozen.
    ///
    /// Returns whether time advanced.
    pub fn tick(&mut self, dt: Duration) -> bool {
        if !self.is_running() {
            return false;
        }
        self.elapsed = self.elapsed.saturating_add(dt);
        true
    }

    /// Freezes the clock, remembering the pause state it interrupted.
    ///
    /// Freezing an already frozen clock is a no-op so the saved pause state
    /// survives nested freezes. Returns whether the clock changed.
    pub fn freeze(&mut self) -> bool {
        if self.frozen {
            return false;
        }
        self.paused_before_freeze = self.paused;
        self.paused = true;
        self.frozen = true;
        true
    }

    /// Lifts a freeze and restores the saved pause state.
    ///
    /// Returns whether the clock changed.
    pub fn unfreeze(&mut self) -> bool {
        if !self.frozen {
            return false;
        }
        self.paused = self.paused_before_freeze;
        self.frozen = false;
        true
    }

    /// Pauses movement. Returns whether the pause flag changed.
    pub fn pause_movement(&mut self) -> bool {
        if self.paused {
            return false;
        }
        self.paused = true;
        true
    }

    /// Resumes movement. Returns whether the pause flag changed.
    pub fn resume_movement(&mut self) -> bool {
        if !self.paused {
            return false;
        }
        self.paused = false;
        true
    }

    /// Consumes the category's cooldown token when its delay has elapsed.
    ///
    /// A gate that never fired is open immediately.
    pub fn can_spawn(&mut self, category: SpawnCategory) -> bool {
        let now = self.elapsed;
        let gate = &mut self.gates[category.index()];
        if let Some(last_fire) = gate.last_fire {
            if now.saturating_sub(last_fire) < gate.delay {
                return false;
            }
        }
        gate.last_fire = Some(now);
        true
    }

    /// Rare structure cooldown gate.
    pub fn can_rare_spawn(&mut self) -> bool {
        self.can_spawn(SpawnCategory::Rare)
    }

    /// NPC cooldown gate.
    pub fn can_npc_spawn(&mut self) -> bool {
        self.can_spawn(SpawnCategory::Npc)
    }

    /// Enemy cooldown gate.
    pub fn can_enemy_spawn(&mut self) -> bool {
        self.can_spawn(SpawnCategory::Enemy)
    }

    /// Reports whether enough running time passed to start the run.
    #[must_use]
    pub fn run_started(&self, delay: Duration) -> bool {
        self.elapsed >= delay
    }

    /// Elapsed running time.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Whether movement is paused (including by a freeze).
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the clock is frozen.
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Whether time currently advances.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        !self.paused && !self.frozen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock_with_enemy_delay(seconds: u64) -> GameClock {
        GameClock::new([
            Duration::from_secs(15),
            Duration::from_secs(10),
            Duration::from_secs(seconds),
        ])
    }

    fn advance_to(clock: &mut GameClock, seconds: u64) {
        let target = Duration::from_secs(seconds);
        let dt = target.saturating_sub(clock.elapsed());
        assert!(clock.tick(dt));
    }

    #[test]
    fn tick_is_gated_by_pause_and_freeze() {
        let mut clock = GameClock::default();
        let dt = Duration::from_millis(16);

        assert!(clock.tick(dt));
        assert_eq!(clock.elapsed(), dt);

        assert!(clock.pause_movement());
        assert!(!clock.tick(dt));
        assert_eq!(clock.elapsed(), dt);

        assert!(clock.resume_movement());
        assert!(clock.freeze());
        assert!(!clock.tick(dt));
        assert_eq!(clock.elapsed(), dt);

        assert!(clock.unfreeze());
        assert!(clock.tick(dt));
        assert_eq!(clock.elapsed(), dt * 2);
    }

    #[test]
    fn freeze_round_trip_restores_running_state() {
        let mut clock = GameClock::default();
        assert!(clock.freeze());
        assert!(clock.is_paused());
        assert!(clock.is_frozen());

        assert!(clock.unfreeze());
        assert!(!clock.is_paused());
        assert!(!clock.is_frozen());
    }

    #[test]
    fn freeze_round_trip_restores_paused_state() {
        let mut clock = GameClock::default();
        assert!(clock.pause_movement());
        assert!(clock.freeze());
        assert!(clock.unfreeze());
        assert!(clock.is_paused());
        assert!(!clock.is_frozen());
    }

    #[test]
    fn nested_freeze_keeps_original_pause_state() {
        let mut clock = GameClock::default();
        assert!(clock.freeze());
        assert!(!clock.freeze());
        assert!(clock.unfreeze());
        assert!(!clock.is_paused());
        assert!(!clock.unfreeze());
    }

    #[test]
    fn pause_and_resume_are_idempotent() {
        let mut clock = GameClock::default();
        assert!(!clock.resume_movement());
        assert!(clock.pause_movement());
        assert!(!clock.pause_movement());
        assert!(clock.resume_movement());
        assert!(!clock.is_paused());
    }

    #[test]
    fn enemy_gate_respects_cooldown() {
        let mut clock = clock_with_enemy_delay(10);
        assert!(clock.can_enemy_spawn());

        advance_to(&mut clock, 5);
        assert!(!clock.can_enemy_spawn());

        advance_to(&mut clock, 11);
        assert!(clock.can_enemy_spawn());
        assert!(!clock.can_enemy_spawn());
    }

    #[test]
    fn gates_are_independent_per_category() {
        let mut clock = clock_with_enemy_delay(10);
        assert!(clock.can_enemy_spawn());
        assert!(clock.can_npc_spawn());
        assert!(clock.can_rare_spawn());

        advance_to(&mut clock, 10);
        assert!(clock.can_enemy_spawn());
        assert!(clock.can_npc_spawn());
        assert!(!clock.can_rare_spawn());

        advance_to(&mut clock, 15);
        assert!(clock.can_rare_spawn());
    }

    #[test]
    fn reset_rearms_gates_and_clears_time() {
        let parameters = LevelParameters::default();
        let mut clock = GameClock::for_level(&parameters);
        advance_to(&mut clock, 3);
        assert!(clock.can_enemy_spawn());
        assert!(clock.freeze());

        clock.reset(&parameters);
        assert_eq!(clock.elapsed(), Duration::ZERO);
        assert!(clock.is_running());
        assert!(clock.can_enemy_spawn());
    }

    #[test]
    fn run_start_waits_for_delay() {
        let mut clock = GameClock::default();
        assert!(!clock.run_started(Duration::from_secs(5)));
        advance_to(&mut clock, 5);
        assert!(clock.run_started(Duration::from_secs(5)));
    }
}
