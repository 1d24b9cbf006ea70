//! Per-frame simulation step
//!
//! Advances the whole simulation by exactly one display frame. The host
//! calls [`tick`] once per animation frame, then drains the state's event
//! queue and performs the navigation side effects it finds there.

use glam::Vec2;

use super::collision::{KillOutcome, laser_hits, resolve_kill};
use super::spawn;
use super::state::{Destination, Explosion, GameEvent, GameState, HeldKeys, Mode};
use crate::consts::*;

/// Input snapshot for a single frame (deterministic).
///
/// Held keys are sampled from the host's key map; `pointer` carries the
/// canvas-local pointer position when it moved since the previous frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub keys: HeldKeys,
    pub pointer: Option<Vec2>,
}

/// Advance the game state by one frame.
///
/// Ordering per frame: starfield, elapsed time, player (movement, firing,
/// projectiles), spawn policy, enemy scan (update, laser collisions, bottom
/// line), explosions, pointer tracer. A game-over state never advances, and
/// the attract -> mini-game transition abandons the rest of its frame.
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.is_game_over() {
        return;
    }

    let bounds = state.bounds;

    for star in state.stars.iter_mut() {
        star.update(&mut state.rng, bounds);
    }

    if state.player.is_some() {
        if state.mode == Mode::MiniGame {
            state.elapsed += 1;
        }

        if let Some(player) = state.player.as_mut() {
            player.update(input.keys, bounds, &mut state.rng);
        }

        spawn::spawn_tick(state);

        // Reverse scan so removal never skips a live enemy.
        let mut i = state.enemies.len();
        while i > 0 {
            i -= 1;
            state.enemies[i].update(state.mode, state.elapsed, &mut state.rng);

            // First laser hit wins, scanning newest-first.
            let mut hit = None;
            if let Some(player) = state.player.as_ref() {
                let enemy = &state.enemies[i];
                for j in (0..player.lasers.len()).rev() {
                    if laser_hits(enemy, &player.lasers[j]) {
                        hit = Some(j);
                        break;
                    }
                }
            }

            if let Some(j) = hit {
                let (pos, color, kind) = {
                    let enemy = &state.enemies[i];
                    (enemy.pos, enemy.color, enemy.kind)
                };
                let burst = Explosion::new(&mut state.rng, pos, color);
                state.explosions.push(burst);

                match resolve_kill(state.mode, kind) {
                    KillOutcome::EnterMiniGame => {
                        state.push_event(GameEvent::Navigate(Destination::MiniGame));
                        return;
                    }
                    KillOutcome::Navigate(dest) => {
                        state.push_event(GameEvent::Navigate(dest));
                    }
                    KillOutcome::Score => {
                        state.score += SCORE_PER_KILL;
                    }
                }

                state.enemies.remove(i);
                if let Some(player) = state.player.as_mut() {
                    player.lasers.remove(j);
                }
                // A destroyed orb is gone; it cannot also cross the line.
                continue;
            }

            match state.mode {
                Mode::MiniGame => {
                    let enemy = &state.enemies[i];
                    if enemy.pos.y - enemy.radius > bounds.y - BOTTOM_MARGIN {
                        state.enemies.remove(i);
                        state.lives = state.lives.saturating_sub(1);
                        if state.lives == 0 {
                            state.end_run();
                        }
                    }
                }
                Mode::Attract => {
                    let enemy = &state.enemies[i];
                    if enemy.pos.y > bounds.y + enemy.radius {
                        state.enemies.remove(i);
                    }
                }
            }
        }

        for explosion in state.explosions.iter_mut() {
            explosion.update();
        }
        state.explosions.retain(|e| !e.is_done());
    }

    if let Some(pointer) = input.pointer {
        let GameState { tracer, rng, .. } = state;
        tracer.update(pointer, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Enemy, EnemyKind, GamePhase, Laser};

    const BOUNDS: Vec2 = Vec2::new(800.0, 600.0);

    fn mini_state(seed: u64) -> GameState {
        GameState::new(Mode::MiniGame, BOUNDS, seed)
    }

    fn attract_state(seed: u64) -> GameState {
        GameState::new(Mode::Attract, BOUNDS, seed)
    }

    fn enemy_at(x: f32, y: f32, kind: EnemyKind) -> Enemy {
        let mut e = Enemy::new(x, kind, 0.3);
        e.pos.y = y;
        e
    }

    fn arm_laser(state: &mut GameState, pos: Vec2) {
        state.player.as_mut().unwrap().lasers.push(Laser::new(pos));
    }

    #[test]
    fn mini_game_kill_scores_ten_and_removes_both() {
        let mut state = mini_state(21);
        state.enemies.push(enemy_at(100.0, 300.0, EnemyKind::Rose));
        arm_laser(&mut state, Vec2::new(100.0, 300.0));

        tick(&mut state, &TickInput::default());

        assert_eq!(state.score, 10);
        assert!(state.enemies.is_empty(), "orb destroyed");
        assert!(state.player.as_ref().unwrap().lasers.is_empty(), "laser spent");
        assert_eq!(state.explosions.len(), 1);
        assert_eq!(state.lives, START_LIVES, "kills never cost lives");
        assert!(state.drain_events().is_empty(), "no navigation in mini-game");
    }

    #[test]
    fn attract_special_kill_transitions_and_abandons_frame() {
        let mut state = attract_state(22);
        // Index 0 is scanned last, so the transition must skip it entirely.
        state.enemies.push(enemy_at(600.0, 200.0, EnemyKind::Rose));
        state.enemies.push(enemy_at(100.0, 300.0, EnemyKind::Prism));
        arm_laser(&mut state, Vec2::new(100.0, 300.0));

        tick(&mut state, &TickInput::default());

        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Navigate(Destination::MiniGame)]
        );
        assert_eq!(state.score, 0, "the transition never scores");
        assert_eq!(state.enemies.len(), 2, "frame abandoned before removal");
        assert_eq!(
            state.enemies[0].pos.y, 200.0,
            "bystander orb was never updated this frame"
        );
        assert_eq!(state.explosions.len(), 1);
    }

    #[test]
    fn attract_normal_kill_navigates_without_scoring() {
        let mut state = attract_state(23);
        state.enemies.push(enemy_at(100.0, 300.0, EnemyKind::Indigo));
        arm_laser(&mut state, Vec2::new(100.0, 300.0));

        tick(&mut state, &TickInput::default());

        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Navigate(Destination::About)]
        );
        assert_eq!(state.score, 0);
        assert!(state.enemies.is_empty());
        assert!(state.player.as_ref().unwrap().lasers.is_empty());
        assert_eq!(state.explosions.len(), 1);
    }

    #[test]
    fn bottom_line_crossing_costs_a_life() {
        let mut state = mini_state(24);
        // Just above the crossing threshold of bounds.y - 10 + radius.
        state.enemies.push(enemy_at(100.0, 604.9, EnemyKind::Amber));

        tick(&mut state, &TickInput::default());

        assert!(state.enemies.is_empty());
        assert_eq!(state.lives, START_LIVES - 1);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn last_life_ends_the_run() {
        let mut state = mini_state(25);
        state.lives = 1;
        state.score = 70;
        state.enemies.push(enemy_at(100.0, 604.9, EnemyKind::Jade));

        tick(&mut state, &TickInput::default());

        assert_eq!(state.lives, 0);
        assert!(state.is_game_over());
        assert_eq!(state.session_high_score, 70);
    }

    #[test]
    fn game_over_is_terminal() {
        let mut state = mini_state(26);
        state.lives = 1;
        state.enemies.push(enemy_at(100.0, 604.9, EnemyKind::Jade));
        tick(&mut state, &TickInput::default());
        assert!(state.is_game_over());

        let frozen = state.clone();
        let busy = TickInput {
            keys: HeldKeys {
                fire: true,
                left: true,
                ..Default::default()
            },
            pointer: Some(Vec2::new(10.0, 10.0)),
        };
        for _ in 0..10 {
            tick(&mut state, &busy);
        }
        assert_eq!(state.elapsed, frozen.elapsed);
        assert_eq!(state.score, frozen.score);
        assert_eq!(state.lives, 0);
        assert!(state.drain_events().is_empty());
        assert_eq!(
            state.player.as_ref().unwrap().lasers.len(),
            frozen.player.as_ref().unwrap().lasers.len()
        );
    }

    #[test]
    fn attract_orbs_despawn_offscreen_without_cost() {
        let mut state = attract_state(27);
        state.enemies.push(enemy_at(100.0, 616.0, EnemyKind::Rose));

        tick(&mut state, &TickInput::default());

        assert!(state.enemies.is_empty());
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::Playing, "no game over in attract");
    }

    #[test]
    fn spawn_fires_when_cooldown_expires() {
        let mut state = attract_state(28);
        state.spawn_cooldown = 0;

        tick(&mut state, &TickInput::default());

        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.spawn_cooldown, SPAWN_COOLDOWN);
        // The fresh orb already fell its first frame.
        assert!(state.enemies[0].pos.y > ENEMY_SPAWN_Y);
    }

    #[test]
    fn elapsed_time_only_advances_in_mini_game() {
        let mut mini = mini_state(29);
        let mut attract = attract_state(29);
        for _ in 0..10 {
            tick(&mut mini, &TickInput::default());
            tick(&mut attract, &TickInput::default());
        }
        assert_eq!(mini.elapsed, 10);
        assert_eq!(attract.elapsed, 0);
    }

    #[test]
    fn mini_game_long_run_stays_special_free_and_capped() {
        let mut state = mini_state(30);
        for _ in 0..600 {
            tick(&mut state, &TickInput::default());
            assert!(state.enemies.len() <= MINI_ENEMY_CAP);
            assert!(state.enemies.iter().all(|e| !e.kind.is_special()));
        }
        assert!(!state.enemies.is_empty(), "spawning actually happened");
    }

    #[test]
    fn pointer_motion_drives_the_tracer() {
        let mut state = attract_state(31);
        let moved = TickInput {
            pointer: Some(Vec2::new(320.0, 240.0)),
            ..Default::default()
        };
        tick(&mut state, &moved);
        assert_eq!(state.tracer.pos, Vec2::new(320.0, 240.0));
        assert_eq!(state.tracer.particles.len(), 2);

        // An idle pointer leaves the tracer alone.
        let before = state.tracer.particles.len();
        tick(&mut state, &TickInput::default());
        assert_eq!(state.tracer.particles.len(), before);
    }

    #[test]
    fn same_seed_same_inputs_same_run() {
        let script = [
            TickInput {
                keys: HeldKeys {
                    left: true,
                    ..Default::default()
                },
                ..Default::default()
            },
            TickInput {
                keys: HeldKeys {
                    fire: true,
                    ..Default::default()
                },
                ..Default::default()
            },
            TickInput {
                pointer: Some(Vec2::new(55.0, 66.0)),
                ..Default::default()
            },
            TickInput::default(),
        ];

        let mut a = mini_state(99);
        let mut b = mini_state(99);
        for _ in 0..100 {
            for input in &script {
                tick(&mut a, input);
                tick(&mut b, input);
            }
        }

        assert_eq!(a.score, b.score);
        assert_eq!(a.elapsed, b.elapsed);
        assert_eq!(a.enemies.len(), b.enemies.len());
        for (ea, eb) in a.enemies.iter().zip(b.enemies.iter()) {
            assert_eq!(ea.pos, eb.pos);
            assert_eq!(ea.kind, eb.kind);
        }
        let (pa, pb) = (a.player.as_ref().unwrap(), b.player.as_ref().unwrap());
        assert_eq!(pa.pos, pb.pos);
        assert_eq!(pa.lasers.len(), pb.lasers.len());
    }

    #[test]
    fn starfield_only_state_still_ticks() {
        let mut state = attract_state(32);
        state.player = None;
        state.spawn_cooldown = 0;

        tick(&mut state, &TickInput::default());

        assert!(state.enemies.is_empty(), "no player, no spawning");
        assert_eq!(state.elapsed, 0);
    }
}
