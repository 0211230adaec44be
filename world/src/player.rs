//! Player health, gold tally and defeat latch.

use runebound_core::PlayerSnapshot;

/// Player health, gold and the defeat latch.
#[derive(Clone, Debug)]
pub(crate) struct Player {
    health: u32,
    max_health: u32,
    gold_earned: u32,
    defeated: bool,
}

/// Result of a hit that landed on a living player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PlayerHit {
    pub(crate) health: u32,
    pub(crate) defeated: bool,
}

impl Player {
    pub(crate) const fn new(max_health: u32) -> Self {
        Self {
            health: max_health,
            max_health,
            gold_earned: 0,
            defeated: false,
        }
    }

    /// Applies damage. Hits on a defeated player are ignored.
    ///
    /// `defeated` is only reported by the hit that emptied the health pool.
    pub(crate) fn hit(&mut self, damage: u32) -> Option<PlayerHit> {
        if self.defeated {
            return None;
        }
        self.health = self.health.saturating_sub(damage);
        self.defeated = self.health == 0;
        Some(PlayerHit {
            health: self.health,
            defeated: self.defeated,
        })
    }

    pub(crate) fn award_gold(&mut self, amount: u32) {
        self.gold_earned = self.gold_earned.saturating_add(amount);
    }

    pub(crate) const fn is_alive(&self) -> bool {
        !self.defeated
    }

    pub(crate) const fn gold_earned(&self) -> u32 {
        self.gold_earned
    }

    pub(crate) const fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            health: self.health,
            max_health: self.max_health,
            gold_earned: self.gold_earned,
            defeated: self.defeated,
        }
    }
}
