#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Runebound level engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.
//!
//! Static content (enemy, boss, encounter and level tables) is described by
//! [`ContentTables`] and injected read-only into the world and the systems.

use std::time::Duration;

use serde::{Deserialize, Serialize};

mod content;
mod tuning;

pub use content::{
    BossDefinition, ContentError, ContentTables, EncounterDefinition, EnemyDefinition,
    LevelParameters, ProgressBand,
};
pub use tuning::{CombatTuning, LevelGeometry};

/// Number of progress units accumulated per second of running level time.
pub const PROGRESS_PER_SECOND: f32 = 10.0;

/// Progress at which the level's boss encounter fires.
pub const BOSS_PROGRESS_THRESHOLD: Progress = Progress::new(1_000.0);

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Resets the world and begins the provided campaign level.
    StartLevel {
        /// Campaign level to load from the content tables.
        level: LevelId,
        /// Whether this is the player's first attempt at the level.
        first_attempt: bool,
    },
    /// Installs the encounter allocation computed for the running level.
    ScheduleEncounters {
        /// Allocated encounters, expected in ascending trigger order.
        encounters: Vec<AllocatedEncounter>,
    },
    /// Advances the simulation by the provided frame delta.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Signals that the presentation layer finished the running cutscene.
    EndCutscene,
    /// Halts world movement.
    PauseMovement,
    /// Resumes world movement.
    ResumeMovement,
    /// Freezes the world for a modal interaction, remembering the pause state.
    Freeze,
    /// Lifts a freeze and restores the pause state it interrupted.
    Unfreeze,
    /// Requests that a group of enemies enter the level.
    SpawnEnemies {
        /// Enemy definitions to instantiate, one per group slot.
        definitions: Vec<EnemyDefinitionId>,
    },
    /// Requests that an ambient NPC enter the level.
    SpawnNpc {
        /// Side of the level the NPC walks down.
        side: Side,
    },
    /// Applies a player spell impact to a unit.
    StrikeUnit {
        /// Unit struck by the spell.
        unit: UnitId,
        /// Raw damage carried by the spell.
        damage: u32,
        /// Whether the spell can reach airborne units.
        airborne: bool,
    },
    /// Hands control of the boss fight to the player.
    HandTurnToPlayer,
    /// Hands control of the boss fight to the boss.
    HandTurnToEnemy,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that a level was loaded and reset.
    LevelStarted {
        /// Campaign level that started.
        level: LevelId,
    },
    /// Indicates that a simulation frame was processed.
    TimeAdvanced {
        /// Duration of the processed frame.
        dt: Duration,
    },
    /// Announces that the level clock passed the run-start delay.
    RunStarted,
    /// Announces that world movement halted.
    MovementPaused,
    /// Announces that world movement resumed.
    MovementResumed,
    /// Announces that the world was frozen.
    Frozen,
    /// Announces that a freeze was lifted.
    Unfrozen,
    /// Reports that a spawn cooldown gate permitted a spawn decision.
    SpawnGateOpened {
        /// Category whose gate opened.
        category: SpawnCategory,
        /// Number of enemy slots still available in the level.
        budget: u32,
    },
    /// Confirms that an enemy entered the level.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        unit: UnitId,
        /// Definition the enemy was built from.
        definition: EnemyDefinitionId,
    },
    /// Confirms that the level boss entered the level.
    BossSpawned {
        /// Identifier assigned to the boss.
        unit: UnitId,
        /// Definition the boss was built from.
        definition: BossDefinitionId,
    },
    /// Confirms that an NPC entered the level.
    NpcSpawned {
        /// Identifier assigned to the NPC.
        npc: NpcId,
        /// Side of the level the NPC walks down.
        side: Side,
    },
    /// Reports that an NPC left the level.
    NpcDespawned {
        /// Identifier of the NPC that left.
        npc: NpcId,
    },
    /// Reports that a unit entered a new state.
    UnitStateChanged {
        /// Unit whose state changed.
        unit: UnitId,
        /// State the unit entered.
        state: UnitState,
    },
    /// Requests a transient visual flash on a unit.
    UnitFlashStarted {
        /// Unit to flash.
        unit: UnitId,
        /// Feedback the flash conveys.
        kind: FlashKind,
    },
    /// Reports that a unit's flash elapsed.
    UnitFlashEnded {
        /// Unit whose flash ended.
        unit: UnitId,
    },
    /// Reports that a unit took damage.
    UnitDamaged {
        /// Unit that was damaged.
        unit: UnitId,
        /// Health remaining after the hit.
        health: u32,
    },
    /// Reports that an airborne unit evaded a grounded spell.
    UnitDodged {
        /// Unit that dodged.
        unit: UnitId,
    },
    /// Reports that an enemy was defeated.
    EnemyDefeated {
        /// Enemy that was defeated.
        unit: UnitId,
    },
    /// Reports that a unit left the level.
    UnitDespawned {
        /// Unit that left.
        unit: UnitId,
    },
    /// Reports that every actor was removed to make room for a cutscene.
    UnitsCleared {
        /// Number of units removed.
        count: u32,
    },
    /// Reports that the player was hit.
    PlayerHit {
        /// Damage applied.
        damage: u32,
        /// Player health after the hit.
        health: u32,
    },
    /// Reports that the player was defeated.
    PlayerDefeated,
    /// Reports gold credited to the player.
    GoldAwarded {
        /// Amount credited.
        amount: u32,
    },
    /// Announces that a narrative encounter began.
    EncounterStarted {
        /// Kind of encounter.
        kind: EncounterKind,
        /// Content entry backing the encounter.
        encounter: EncounterId,
        /// Whether the entry is a first-encounter variant.
        first_encounter: bool,
    },
    /// Announces that the running cutscene finished.
    CutsceneEnded,
    /// Announces that the level boss encounter fired.
    BossEncountered {
        /// Campaign level whose boss was encountered.
        level: LevelId,
    },
    /// Announces that the boss reached its position and combat began.
    BossEngaged {
        /// Boss unit.
        unit: UnitId,
    },
    /// Announces that the boss was defeated.
    BossDefeated {
        /// Boss unit.
        unit: UnitId,
    },
    /// Reports a turn handoff during boss combat.
    TurnChanged {
        /// Whether the player now holds the turn.
        player_turn: bool,
    },
    /// Announces that the level was completed.
    LevelCompleted {
        /// Campaign level that was completed.
        level: LevelId,
        /// Gold earned during the level.
        gold_earned: u32,
    },
}

/// Cooldown-gated spawn categories tracked by the game clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpawnCategory {
    /// Rare structures surfaced to the presentation layer.
    Rare,
    /// Ambient non-player characters.
    Npc,
    /// Hostile enemies.
    Enemy,
}

impl SpawnCategory {
    /// Every category in gate polling order.
    pub const ALL: [SpawnCategory; 3] = [Self::Rare, Self::Npc, Self::Enemy];

    /// Dense index used for per-category storage.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Rare => 0,
            Self::Npc => 1,
            Self::Enemy => 2,
        }
    }
}

/// Kinds of scripted encounters a level may contain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EncounterKind {
    /// Level introduction, played when the level starts.
    Start,
    /// Boss introduction, played at the boss threshold.
    Boss,
    /// Meeting with an elementalist.
    Elementalist,
    /// Rescue of a captured friend.
    Saved,
    /// Wandering shopkeeper.
    Shopkeeper,
}

impl EncounterKind {
    /// Reports whether the kind is placed deterministically rather than allocated.
    #[must_use]
    pub const fn is_reserved(self) -> bool {
        matches!(self, Self::Start | Self::Boss)
    }
}

/// Encounter chosen for a level together with the progress that triggers it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AllocatedEncounter {
    /// Content entry backing the encounter.
    pub encounter: EncounterId,
    /// Kind of encounter.
    pub kind: EncounterKind,
    /// Whether the entry is a first-encounter variant.
    pub first_encounter: bool,
    /// Level progress at which the encounter fires.
    pub trigger: Progress,
}

/// Level progress measured in progress units.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Progress(f32);

impl Progress {
    /// Progress at the start of a level.
    pub const ZERO: Progress = Progress(0.0);

    /// Wraps a raw progress value.
    #[must_use]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Derives progress from running level time.
    #[must_use]
    pub fn from_elapsed(elapsed: Duration) -> Self {
        Self(elapsed.as_secs_f32() * PROGRESS_PER_SECOND)
    }

    /// Retrieves the raw progress value.
    #[must_use]
    pub const fn get(&self) -> f32 {
        self.0
    }
}

/// Lifecycle states shared by enemies and bosses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitState {
    /// Advancing toward the player.
    Run,
    /// Holding position, either waiting for space or winding up an attack.
    Idle,
    /// Executing an attack.
    Attack,
    /// Playing out the death animation.
    Death,
}

/// Distinguishes regular enemies from the level boss.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// Regular enemy spawned by the spawn scheduler.
    Enemy,
    /// Level boss spawned by the boss encounter.
    Boss,
}

/// Visual feedback requested from the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlashKind {
    /// The unit took damage.
    Hit,
    /// The unit evaded a spell.
    Dodge,
}

/// Side lanes used by ambient NPCs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Left edge of the level.
    Left,
    /// Right edge of the level.
    Right,
}

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Creates a new identifier with the provided numeric value.
            #[must_use]
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            /// Retrieves the numeric representation of the identifier.
            #[must_use]
            pub const fn get(&self) -> u32 {
                self.0
            }
        }
    };
}

identifier!(
    /// Campaign level number.
    LevelId
);
identifier!(
    /// Unique identifier assigned to an enemy or boss unit.
    UnitId
);
identifier!(
    /// Unique identifier assigned to an ambient NPC.
    NpcId
);
identifier!(
    /// Identifier of an enemy table entry.
    EnemyDefinitionId
);
identifier!(
    /// Identifier of a boss table entry.
    BossDefinitionId
);
identifier!(
    /// Identifier of an encounter table entry.
    EncounterId
);

/// Position in world units; `y` decreases toward the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate along the scroll axis.
    pub y: f32,
}

impl WorldPoint {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Immutable representation of a single unit used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitSnapshot {
    /// Unique identifier assigned to the unit.
    pub id: UnitId,
    /// Enemy or boss.
    pub kind: UnitKind,
    /// Current state.
    pub state: UnitState,
    /// Current position.
    pub position: WorldPoint,
    /// Current velocity.
    pub velocity: WorldPoint,
    /// Remaining health.
    pub health: u32,
    /// Health at spawn.
    pub max_health: u32,
    /// Whether the unit is airborne.
    pub airborne: bool,
    /// Whether the unit is holding for space ahead.
    pub waiting: bool,
    /// Whether the unit is executing a scripted attack sequence.
    pub attacking: bool,
}

/// Read-only snapshot describing all units within the level.
#[derive(Clone, Debug, Default)]
pub struct UnitView {
    snapshots: Vec<UnitSnapshot>,
}

impl UnitView {
    /// Creates a new unit view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<UnitSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured unit snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<UnitSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of the player actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Remaining health.
    pub health: u32,
    /// Health ceiling.
    pub max_health: u32,
    /// Gold earned during the running level.
    pub gold_earned: u32,
    /// Whether the player has been defeated.
    pub defeated: bool,
}
