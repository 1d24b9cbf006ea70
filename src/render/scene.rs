//! Scene composition
//!
//! Per-entity draw contracts and the frame draw order. Everything here reads
//! state and emits surface ops; nothing mutates the simulation.

use glam::Vec2;

use super::surface::{Surface, TextAlign};
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{
    Color, Enemy, Explosion, GameState, Laser, Mode, Particle, PlayerShip, PointerTracer, Star,
};

/// Frame-wide visual toggles resolved from [`Settings`].
#[derive(Debug, Clone, Copy)]
pub struct DrawOpts {
    pub trails: bool,
    pub glow: bool,
}

impl DrawOpts {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            trails: settings.effective_trails(),
            glow: settings.effective_glow(),
        }
    }

    /// The blur radius to use, or 0 when glow is disabled.
    fn blur(&self, radius: f32) -> f32 {
        if self.glow { radius } else { 0.0 }
    }
}

/// Render contract shared by every entity variant.
pub trait Drawable {
    fn draw(&self, surface: &mut dyn Surface, opts: DrawOpts);
}

impl Drawable for Star {
    fn draw(&self, surface: &mut dyn Surface, _opts: DrawOpts) {
        surface.fill_circle(self.pos, self.radius, self.color, self.alpha, 0.0);
    }
}

impl Drawable for Particle {
    fn draw(&self, surface: &mut dyn Surface, _opts: DrawOpts) {
        surface.fill_circle(self.pos, self.size, self.color, self.alpha(), 0.0);
    }
}

impl Drawable for Laser {
    fn draw(&self, surface: &mut dyn Surface, opts: DrawOpts) {
        surface.stroke_segment(
            self.pos,
            self.pos - Vec2::new(0.0, LASER_LENGTH),
            2.0,
            Laser::COLOR,
            1.0,
        );
        if opts.trails {
            for particle in &self.particles {
                particle.draw(surface, opts);
            }
        }
    }
}

impl Drawable for PlayerShip {
    fn draw(&self, surface: &mut dyn Surface, opts: DrawOpts) {
        let (pos, s) = (self.pos, self.size);
        surface.fill_triangle(
            [
                pos + Vec2::new(0.0, -s),
                pos + Vec2::new(-s, s),
                pos + Vec2::new(s, s),
            ],
            PlayerShip::COLOR,
            opts.blur(15.0),
        );
        for laser in &self.lasers {
            laser.draw(surface, opts);
        }
        if opts.trails {
            for particle in &self.trail {
                particle.draw(surface, opts);
            }
        }
    }
}

impl Drawable for Enemy {
    fn draw(&self, surface: &mut dyn Surface, opts: DrawOpts) {
        surface.fill_circle(self.pos, self.radius, self.color, 1.0, opts.blur(10.0));
        if opts.trails {
            for particle in &self.trail {
                particle.draw(surface, opts);
            }
        }
    }
}

impl Drawable for Explosion {
    fn draw(&self, surface: &mut dyn Surface, opts: DrawOpts) {
        for particle in &self.particles {
            particle.draw(surface, opts);
        }
    }
}

impl Drawable for PointerTracer {
    fn draw(&self, surface: &mut dyn Surface, opts: DrawOpts) {
        surface.fill_circle(
            self.pos,
            self.glow_radius(),
            PointerTracer::COLOR,
            0.9,
            opts.blur(25.0),
        );
        for particle in &self.particles {
            particle.draw(surface, opts);
        }
    }
}

/// Draw one frame of a post-tick state.
///
/// Order: starfield, player (ship, lasers, trail), enemies, explosions,
/// mini-game UI, pointer tracer on top. A finished mini-game run renders
/// the game-over overlay over the previous frame instead.
pub fn draw_frame(state: &GameState, settings: &Settings, surface: &mut dyn Surface) {
    if state.mode == Mode::MiniGame && state.is_game_over() {
        draw_game_over(state, surface);
        return;
    }

    let opts = DrawOpts::from_settings(settings);
    surface.clear(state.bounds);

    if settings.effective_starfield() {
        for star in &state.stars {
            star.draw(surface, opts);
        }
    }

    if let Some(player) = &state.player {
        player.draw(surface, opts);
        for enemy in &state.enemies {
            enemy.draw(surface, opts);
        }
        if settings.effective_particles() {
            for explosion in &state.explosions {
                explosion.draw(surface, opts);
            }
        }
        if state.mode == Mode::MiniGame {
            draw_mini_game_ui(state, surface);
        }
    }

    state.tracer.draw(surface, opts);
}

/// Bottom boundary line and the row of life hearts.
fn draw_mini_game_ui(state: &GameState, surface: &mut dyn Surface) {
    let red = Color::Named("red");
    let y = state.bounds.y - BOTTOM_MARGIN;
    surface.stroke_segment(
        Vec2::new(0.0, y),
        Vec2::new(state.bounds.x, y),
        5.0,
        red,
        1.0,
    );

    let anchor = Vec2::new(state.bounds.x - 40.0, 60.0);
    for i in 0..state.lives {
        surface.fill_text(
            "\u{2665}",
            Vec2::new(anchor.x - i as f32 * 36.0, anchor.y),
            30.0,
            red,
            TextAlign::Left,
        );
    }
}

/// Terminal overlay: dim the frame, show the run's score and the session
/// high score.
fn draw_game_over(state: &GameState, surface: &mut dyn Surface) {
    let center = state.bounds / 2.0;
    surface.fill_rect(Vec2::ZERO, state.bounds, Color::Named("#000"), 0.7);

    let white = Color::Named("#fff");
    surface.fill_text(
        "GAME OVER",
        center + Vec2::new(0.0, -40.0),
        50.0,
        white,
        TextAlign::Center,
    );
    surface.fill_text(
        &format!("Score: {}", state.score),
        center + Vec2::new(0.0, 10.0),
        30.0,
        white,
        TextAlign::Center,
    );
    surface.fill_text(
        &format!("High Score: {}", state.session_high_score),
        center + Vec2::new(0.0, 50.0),
        30.0,
        white,
        TextAlign::Center,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Vec2 = Vec2::new(800.0, 600.0);

    /// Records every surface op for order/content assertions.
    #[derive(Default)]
    struct RecordingSurface {
        ops: Vec<Op>,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Clear,
        Circle { radius: f32, glow: f32 },
        Segment { width: f32 },
        Triangle,
        Rect { alpha: f32 },
        Text(String),
    }

    impl Surface for RecordingSurface {
        fn clear(&mut self, _bounds: Vec2) {
            self.ops.push(Op::Clear);
        }
        fn fill_circle(&mut self, _c: Vec2, radius: f32, _color: Color, _a: f32, glow: f32) {
            self.ops.push(Op::Circle { radius, glow });
        }
        fn stroke_segment(&mut self, _f: Vec2, _t: Vec2, width: f32, _color: Color, _a: f32) {
            self.ops.push(Op::Segment { width });
        }
        fn fill_triangle(&mut self, _p: [Vec2; 3], _color: Color, _glow: f32) {
            self.ops.push(Op::Triangle);
        }
        fn fill_rect(&mut self, _o: Vec2, _s: Vec2, _color: Color, alpha: f32) {
            self.ops.push(Op::Rect { alpha });
        }
        fn fill_text(&mut self, text: &str, _p: Vec2, _s: f32, _color: Color, _a: TextAlign) {
            self.ops.push(Op::Text(text.to_string()));
        }
    }

    #[test]
    fn frame_order_clear_stars_player_tracer() {
        let state = GameState::new(Mode::Attract, BOUNDS, 1);
        let mut surface = RecordingSurface::default();
        draw_frame(&state, &Settings::default(), &mut surface);

        assert_eq!(surface.ops[0], Op::Clear);
        // The starfield renders before the ship...
        for op in &surface.ops[1..=STAR_COUNT] {
            assert!(matches!(op, Op::Circle { .. }), "star expected, got {op:?}");
        }
        assert_eq!(surface.ops[1 + STAR_COUNT], Op::Triangle);
        // ...and the tracer's glow orb comes after everything else.
        let tracer_at = surface
            .ops
            .iter()
            .rposition(|op| matches!(op, Op::Circle { glow, .. } if *glow == 25.0))
            .expect("tracer glow drawn");
        assert!(tracer_at > 1 + STAR_COUNT);
    }

    #[test]
    fn mini_game_frame_has_line_and_hearts() {
        let state = GameState::new(Mode::MiniGame, BOUNDS, 2);
        let mut surface = RecordingSurface::default();
        draw_frame(&state, &Settings::default(), &mut surface);

        assert!(surface.ops.contains(&Op::Segment { width: 5.0 }));
        let hearts = surface
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Text(t) if t == "\u{2665}"))
            .count();
        assert_eq!(hearts, START_LIVES as usize);
    }

    #[test]
    fn attract_frame_has_no_mini_game_ui() {
        let state = GameState::new(Mode::Attract, BOUNDS, 3);
        let mut surface = RecordingSurface::default();
        draw_frame(&state, &Settings::default(), &mut surface);

        assert!(!surface.ops.iter().any(|op| matches!(op, Op::Segment { width } if *width == 5.0)));
        assert!(!surface.ops.iter().any(|op| matches!(op, Op::Text(_))));
    }

    #[test]
    fn game_over_overlay_replaces_the_frame() {
        let mut state = GameState::new(Mode::MiniGame, BOUNDS, 4);
        state.score = 40;
        state.end_run();

        let mut surface = RecordingSurface::default();
        draw_frame(&state, &Settings::default(), &mut surface);

        // Overlay dims the previous frame rather than clearing it.
        assert!(!surface.ops.contains(&Op::Clear));
        assert_eq!(surface.ops[0], Op::Rect { alpha: 0.7 });
        let texts: Vec<_> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["GAME OVER", "Score: 40", "High Score: 40"]);
    }

    #[test]
    fn quality_toggles_gate_visual_layers() {
        let state = GameState::new(Mode::Attract, BOUNDS, 5);
        let mut settings = Settings::default();
        settings.starfield = false;
        settings.glow = false;

        let mut surface = RecordingSurface::default();
        draw_frame(&state, &settings, &mut surface);

        // No stars: the ship is the first thing after the clear.
        assert_eq!(surface.ops[0], Op::Clear);
        assert_eq!(surface.ops[1], Op::Triangle);
        // Glow disabled everywhere.
        assert!(
            surface
                .ops
                .iter()
                .all(|op| !matches!(op, Op::Circle { glow, .. } if *glow > 0.0))
        );
    }
}
