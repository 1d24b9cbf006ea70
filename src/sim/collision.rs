//! Collision detection and kill resolution
//!
//! A laser hits an orb when the center distance is strictly inside the orb
//! radius plus a small padding. What a kill *means* depends on the mode:
//! score in the mini-game, navigation in attract mode, and the one-way page
//! transition for the special orb.

use super::state::{Destination, Enemy, EnemyKind, Laser, Mode};
use crate::consts::HIT_PADDING;

/// Hit predicate. Strict: a distance of exactly `radius + padding` misses.
pub fn laser_hits(enemy: &Enemy, laser: &Laser) -> bool {
    enemy.pos.distance(laser.pos) < enemy.radius + HIT_PADDING
}

/// What destroying an orb does, beyond the explosion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillOutcome {
    /// Mini-game: award points.
    Score,
    /// Attract mode, normal orb: navigate to the matching site section.
    Navigate(Destination),
    /// Attract mode, special orb: one-way transition to the mini-game page.
    /// The rest of the frame is abandoned.
    EnterMiniGame,
}

pub fn resolve_kill(mode: Mode, kind: EnemyKind) -> KillOutcome {
    match mode {
        Mode::Attract if kind.is_special() => KillOutcome::EnterMiniGame,
        Mode::Attract => KillOutcome::Navigate(kind.destination()),
        Mode::MiniGame => KillOutcome::Score,
    }
}
