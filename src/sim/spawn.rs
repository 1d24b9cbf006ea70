//! Enemy spawn policy
//!
//! Cooldown-paced spawning with best-effort horizontal spacing. In mini-game
//! mode the cooldown shrinks as the run goes on and special orbs are never
//! produced; the live-enemy cap only gates the spawn itself, the cooldown
//! resets either way.

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Enemy, EnemyKind, GameState, Mode};
use crate::consts::*;

/// Run one frame of the spawn policy. Called from the tick after the player
/// update and before the enemy scan.
pub fn spawn_tick(state: &mut GameState) {
    if state.spawn_cooldown <= 0 {
        if state.mode == Mode::Attract || state.enemies.len() < MINI_ENEMY_CAP {
            let enemy = make_enemy(state);
            state.enemies.push(enemy);
        }
        state.spawn_cooldown = spawn_cooldown_after(state.mode, state.elapsed);
    } else {
        state.spawn_cooldown -= 1;
    }
}

/// Cooldown to load after a spawn slot fires.
///
/// Attract mode is a fixed cadence; the mini-game ramps from 150 frames down
/// to a floor of 20 as elapsed time grows.
pub fn spawn_cooldown_after(mode: Mode, elapsed: u32) -> i32 {
    match mode {
        Mode::Attract => SPAWN_COOLDOWN,
        Mode::MiniGame => {
            let ramp = (elapsed / 2) as i64;
            (SPAWN_COOLDOWN as i64 - ramp).max(SPAWN_COOLDOWN_FLOOR as i64) as i32
        }
    }
}

/// Build a new enemy at the top edge using the state's RNG.
fn make_enemy(state: &mut GameState) -> Enemy {
    let kind = choose_kind(&mut state.rng, state.mode);
    let x = choose_spawn_x(&mut state.rng, state.bounds.x, &state.enemies);
    let base_speed = match state.mode {
        Mode::MiniGame => state.rng.random_range(0.2..0.5),
        Mode::Attract => state.rng.random_range(0.1..0.3),
    };
    Enemy::new(x, kind, base_speed)
}

/// Uniform over all five kinds, with the special rerolled to a normal kind
/// in mini-game mode.
pub fn choose_kind(rng: &mut Pcg32, mode: Mode) -> EnemyKind {
    let index = rng.random_range(0..5usize);
    if index < EnemyKind::NORMALS.len() {
        EnemyKind::NORMALS[index]
    } else if mode == Mode::MiniGame {
        EnemyKind::NORMALS[rng.random_range(0..EnemyKind::NORMALS.len())]
    } else {
        EnemyKind::Prism
    }
}

/// Pick a spawn x keeping >= [`SPAWN_SPACING`] from every live enemy,
/// giving up after [`SPAWN_ATTEMPTS`] tries (the last candidate wins).
pub fn choose_spawn_x(rng: &mut Pcg32, width: f32, enemies: &[Enemy]) -> f32 {
    if width <= 2.0 * SPAWN_MARGIN {
        return width / 2.0;
    }
    let mut candidate = width / 2.0;
    for _ in 0..SPAWN_ATTEMPTS {
        candidate = rng.random_range(SPAWN_MARGIN..width - SPAWN_MARGIN);
        if enemies
            .iter()
            .all(|e| (e.pos.x - candidate).abs() >= SPAWN_SPACING)
        {
            break;
        }
    }
    candidate
}
