//! Level geometry and combat timing configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::Side;

/// Layout of the scrolling level in world units.
///
/// The scroll axis is `y`: units enter at `spawn_y` and travel toward
/// `origin_y`, the lower geometry bound where the player stands.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LevelGeometry {
    /// Lower geometry bound of the level.
    pub origin_y: f32,
    /// Height at which enemies, bosses and NPCs enter.
    pub spawn_y: f32,
    /// Horizontal position of the enemy lane.
    pub lane_x: f32,
    /// Width of the playable area, centred on `lane_x`.
    pub width: f32,
    /// Offset above `origin_y` where enemies stop and fight.
    pub front_line: f32,
    /// Offset above `origin_y` where the boss stops its approach.
    pub boss_stop_line: f32,
    /// Distance below `origin_y` after which actors leave the level.
    pub despawn_margin: f32,
    /// Distance between consecutive members of a spawn group.
    pub group_spacing: f32,
    /// Minimum gap an enemy keeps to the enemy ahead of it.
    pub safe_separation: f32,
    /// Walking speed of ambient NPCs.
    pub npc_speed: f32,
}

impl Default for LevelGeometry {
    fn default() -> Self {
        Self {
            origin_y: 0.0,
            spawn_y: 25.0,
            lane_x: 0.0,
            width: 12.0,
            front_line: 4.5,
            boss_stop_line: 14.0,
            despawn_margin: 2.0,
            group_spacing: 1.5,
            safe_separation: 1.2,
            npc_speed: 5.0,
        }
    }
}

impl LevelGeometry {
    /// Height at which enemies stop to fight.
    #[must_use]
    pub fn front_y(&self) -> f32 {
        self.origin_y + self.front_line
    }

    /// Height at which the boss stops its approach.
    #[must_use]
    pub fn boss_stop_y(&self) -> f32 {
        self.origin_y + self.boss_stop_line
    }

    /// Height below which actors leave the level.
    #[must_use]
    pub fn despawn_y(&self) -> f32 {
        self.origin_y - self.despawn_margin
    }

    /// Horizontal position of the NPC lane on the provided side.
    #[must_use]
    pub fn side_lane_x(&self, side: Side) -> f32 {
        let half = self.width * 0.5 - 1.0;
        match side {
            Side::Left => self.lane_x - half,
            Side::Right => self.lane_x + half,
        }
    }
}

/// Animation and sequencing durations for the combat state machines.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Seconds an engaged unit idles before attacking.
    pub idle_duration: f32,
    /// Seconds an attack takes before damage lands.
    pub attack_duration: f32,
    /// Seconds the death animation plays before the unit despawns.
    pub death_duration: f32,
    /// Boss approach speed in world units per second.
    pub boss_speed: f32,
    /// Seconds the boss takes to move to and from the player.
    pub boss_move_duration: f32,
    /// Seconds the boss rests before yielding the turn.
    pub boss_rest_duration: f32,
    /// Seconds a hit flash lasts.
    pub hit_flash: f32,
    /// Seconds a dodge flash lasts.
    pub dodge_flash: f32,
    /// Player health at level start.
    pub player_max_health: u32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            idle_duration: 1.0,
            attack_duration: 0.5,
            death_duration: 0.5,
            boss_speed: 5.0,
            boss_move_duration: 0.5,
            boss_rest_duration: 1.5,
            hit_flash: 0.2,
            dodge_flash: 0.5,
            player_max_health: 100,
        }
    }
}

impl CombatTuning {
    /// Idle hold before an attack.
    #[must_use]
    pub fn idle(&self) -> Duration {
        secs(self.idle_duration)
    }

    /// Attack wind-up.
    #[must_use]
    pub fn attack(&self) -> Duration {
        secs(self.attack_duration)
    }

    /// Death animation length.
    #[must_use]
    pub fn death(&self) -> Duration {
        secs(self.death_duration)
    }

    /// Boss move tween length.
    #[must_use]
    pub fn boss_move(&self) -> Duration {
        secs(self.boss_move_duration)
    }

    /// Boss rest before yielding the turn.
    #[must_use]
    pub fn boss_rest(&self) -> Duration {
        secs(self.boss_rest_duration)
    }

    /// Hit flash length.
    #[must_use]
    pub fn hit_flash(&self) -> Duration {
        secs(self.hit_flash)
    }

    /// Dodge flash length.
    #[must_use]
    pub fn dodge_flash(&self) -> Duration {
        secs(self.dodge_flash)
    }
}

fn secs(value: f32) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::from_millis((value * 1_000.0).round() as u64)
    } else {
        Duration::ZERO
    }
}
