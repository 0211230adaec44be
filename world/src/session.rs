//! Level progress, encounter triggering and the boss turn lock.

use std::time::Duration;

use runebound_core::{
    AllocatedEncounter, LevelId, LevelParameters, Progress, BOSS_PROGRESS_THRESHOLD,
};

/// Progress-driven state of the running level.
#[derive(Clone, Debug, Default)]
pub struct LevelSession {
    level: Option<LevelId>,
    parameters: LevelParameters,
    progress: Progress,
    enemy_count: u32,
    in_cutscene: bool,
    encounter_triggered: bool,
    boss_triggered: bool,
    boss_engaged: bool,
    run_started: bool,
    completed: bool,
    is_player_turn: bool,
    encounters: Vec<AllocatedEncounter>,
    next_encounter: usize,
}

/// One-shot trigger observed while evaluating progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Trigger {
    /// An allocated encounter is due.
    Encounter(AllocatedEncounter),
    /// The boss threshold was crossed.
    Boss,
}

impl LevelSession {
    /// Resets the session for the provided level.
    pub fn reset(&mut self, level: LevelId, parameters: &LevelParameters) {
        *self = Self {
            level: Some(level),
            parameters: parameters.clone(),
            is_player_turn: true,
            ..Self::default()
        };
    }

    /// Installs the encounter allocation, ordered by trigger progress.
    pub fn schedule(&mut self, mut encounters: Vec<AllocatedEncounter>) {
        encounters.sort_by(|a, b| a.trigger.get().total_cmp(&b.trigger.get()));
        self.encounters = encounters;
        self.next_encounter = 0;
    }

    /// Recomputes progress from running level time.
    pub fn update_progress(&mut self, elapsed: Duration) {
        let progress = Progress::from_elapsed(elapsed);
        if progress > self.progress {
            self.progress = progress;
        }
    }

    /// Evaluates encounter and boss triggers, latching at most one per call.
    ///
    /// Nothing fires while a cutscene is in flight. A fired trigger marks the
    /// session as in a cutscene.
    pub fn poll_trigger(&mut self) -> Option<Trigger> {
        if self.in_cutscene || self.level.is_none() || self.completed {
            return None;
        }

        // Encounters left over once the boss fired are dropped with the level's actors.
        let due = self
            .encounters
            .get(self.next_encounter)
            .copied()
            .filter(|_| !self.boss_triggered);
        if let Some(encounter) = due {
            if self.progress >= encounter.trigger {
                self.next_encounter += 1;
                self.encounter_triggered = true;
                self.in_cutscene = true;
                return Some(Trigger::Encounter(encounter));
            }
        }

        if !self.boss_triggered && self.progress >= BOSS_PROGRESS_THRESHOLD {
            self.boss_triggered = true;
            self.in_cutscene = true;
            return Some(Trigger::Boss);
        }

        None
    }

    /// Marks a deterministic cutscene, such as the level introduction, as running.
    pub fn begin_cutscene(&mut self) {
        self.in_cutscene = true;
    }

    /// Ends the running cutscene. Returns whether one was running.
    pub fn end_cutscene(&mut self) -> bool {
        let was_running = self.in_cutscene;
        self.in_cutscene = false;
        self.encounter_triggered = false;
        was_running
    }

    /// Latches the run start. Returns `true` only the first time.
    pub fn mark_run_started(&mut self) -> bool {
        let first = !self.run_started;
        self.run_started = true;
        first
    }

    /// Marks the boss as in position and hands the opening turn to the player.
    pub fn engage_boss(&mut self) {
        self.boss_engaged = true;
        self.is_player_turn = true;
    }

    /// Clears the boss engagement after the boss is defeated.
    pub fn disengage_boss(&mut self) {
        self.boss_engaged = false;
    }

    /// Latches level completion. Returns `true` only the first time.
    pub fn complete(&mut self) -> bool {
        let first = !self.completed;
        self.completed = true;
        first
    }

    /// Hands the turn to the player. Returns whether the turn changed.
    pub fn player_turn(&mut self) -> bool {
        let changed = !self.is_player_turn;
        self.is_player_turn = true;
        changed
    }

    /// Hands the turn to the enemy. Returns whether the turn changed.
    pub fn enemy_turn(&mut self) -> bool {
        let changed = self.is_player_turn;
        self.is_player_turn = false;
        changed
    }

    /// Records newly spawned enemies.
    pub fn add_enemies(&mut self, count: u32) {
        self.enemy_count = self.enemy_count.saturating_add(count);
    }

    /// Releases one enemy slot.
    pub fn remove_enemy(&mut self) {
        self.enemy_count = self.enemy_count.saturating_sub(1);
    }

    /// Releases every enemy slot.
    pub fn clear_enemies(&mut self) {
        self.enemy_count = 0;
    }

    /// Enemy slots still available.
    #[must_use]
    pub fn remaining_budget(&self) -> u32 {
        self.parameters
            .max_enemy_count
            .saturating_sub(self.enemy_count)
    }

    /// Level being played, if one was started.
    #[must_use]
    pub const fn level(&self) -> Option<LevelId> {
        self.level
    }

    /// Parameters of the running level.
    #[must_use]
    pub const fn parameters(&self) -> &LevelParameters {
        &self.parameters
    }

    /// Current progress.
    #[must_use]
    pub const fn progress(&self) -> Progress {
        self.progress
    }

    /// Enemies currently alive or dying.
    #[must_use]
    pub const fn enemy_count(&self) -> u32 {
        self.enemy_count
    }

    /// Maximum simultaneous enemies.
    #[must_use]
    pub const fn max_enemy_count(&self) -> u32 {
        self.parameters.max_enemy_count
    }

    /// Whether a cutscene is in flight.
    #[must_use]
    pub const fn in_cutscene(&self) -> bool {
        self.in_cutscene
    }

    /// Whether an allocated encounter is in flight.
    #[must_use]
    pub const fn encounter_triggered(&self) -> bool {
        self.encounter_triggered
    }

    /// Whether the boss encounter fired.
    #[must_use]
    pub const fn boss_triggered(&self) -> bool {
        self.boss_triggered
    }

    /// Whether the boss is in position and fighting.
    #[must_use]
    pub const fn boss_engaged(&self) -> bool {
        self.boss_engaged
    }

    /// Whether the run-start delay elapsed.
    #[must_use]
    pub const fn run_started(&self) -> bool {
        self.run_started
    }

    /// Whether the level was completed.
    #[must_use]
    pub const fn completed(&self) -> bool {
        self.completed
    }

    /// Whether the player holds the turn.
    #[must_use]
    pub const fn is_player_turn(&self) -> bool {
        self.is_player_turn
    }

    /// Allocated encounters that have not fired yet.
    #[must_use]
    pub fn pending_encounters(&self) -> &[AllocatedEncounter] {
        self.encounters
            .get(self.next_encounter..)
            .unwrap_or_default()
    }
}
