//! Game state and core simulation types
//!
//! Entities expose `update` (advance one frame, pure mutation) and get drawn
//! elsewhere (`render::scene`), so the tick's ordering stays deterministic
//! and testable without a display surface.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;

/// Which page the simulation is running on. Selected once at startup; the
/// only mode change is the one-way attract -> mini-game page navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Embedded on the main site; kills navigate instead of scoring.
    Attract,
    /// Standalone arcade page with lives, scoring, and game over.
    MiniGame,
}

impl Mode {
    /// Detect the mode from the page's pathname.
    pub fn from_pathname(path: &str) -> Self {
        if path.to_ascii_lowercase().ends_with("minigame.html") {
            Mode::MiniGame
        } else {
            Mode::Attract
        }
    }
}

/// Current phase of a run. Attract mode never leaves `Playing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    /// Terminal until the page is reloaded.
    GameOver,
}

/// Where a kill sends the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Portfolio,
    About,
    Contact,
    MiniGame,
}

/// Side effects the hosting page must perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Full page navigation; `Destination::MiniGame` is the mode transition
    /// and the host must stop scheduling frames after dispatching it.
    Navigate(Destination),
}

/// A renderable color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    /// Fixed palette entry (CSS hex).
    Named(&'static str),
    /// `hsl(hue, 100%, lightness%)` - flickering stars and the special orb.
    Hsl { hue: f32, lightness: f32 },
}

/// A short-lived point sprite used for trails and explosions.
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// Remaining frames; pruned once it reaches 0.
    pub life: i32,
    pub color: Color,
}

impl Particle {
    pub fn new(rng: &mut Pcg32, pos: Vec2, color: Color) -> Self {
        let size = rng.random_range(0.0..2.0) + 1.0;
        Self::with_size(rng, pos, color, size)
    }

    pub fn with_size(rng: &mut Pcg32, pos: Vec2, color: Color, size: f32) -> Self {
        Self {
            pos,
            vel: Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0)),
            size,
            life: PARTICLE_LIFE,
            color,
        }
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
        self.life -= 1;
    }

    /// Fade-out alpha, 1 at birth down to 0 at expiry.
    pub fn alpha(&self) -> f32 {
        self.life as f32 / PARTICLE_LIFE as f32
    }
}

/// Prune expired particles, then advance the survivors one frame.
///
/// Emitters push the current frame's particle before calling this, so a
/// fresh particle moves once on the frame it is born.
pub(crate) fn age_particles(particles: &mut Vec<Particle>) {
    particles.retain(|p| p.life > 0);
    for p in particles.iter_mut() {
        p.update();
    }
}

/// An ambient background star. No gameplay effect.
#[derive(Debug, Clone)]
pub struct Star {
    pub pos: Vec2,
    pub radius: f32,
    pub alpha: f32,
    pub color: Color,
    /// Leftward drift in px/frame.
    pub speed: f32,
}

impl Star {
    pub fn new(rng: &mut Pcg32, bounds: Vec2) -> Self {
        Self {
            pos: Vec2::new(
                rng.random_range(0.0..bounds.x),
                rng.random_range(0.0..bounds.y),
            ),
            radius: rng.random_range(0.0..2.0) + 1.0,
            alpha: rng.random_range(0.0..1.0),
            color: Color::Hsl {
                hue: rng.random_range(0.0..360.0),
                lightness: 80.0,
            },
            speed: rng.random_range(0.0..0.03) + 0.02,
        }
    }

    pub fn update(&mut self, rng: &mut Pcg32, bounds: Vec2) {
        self.alpha = (self.alpha + rng.random_range(-STAR_FLICKER..STAR_FLICKER)).clamp(0.0, 1.0);
        self.pos.x -= self.speed;
        if self.pos.x < 0.0 {
            self.pos.x = bounds.x;
        }
    }
}

/// Glow + particle trail following the pointer. Decorative only.
#[derive(Debug, Clone)]
pub struct PointerTracer {
    pub pos: Vec2,
    pub pulse: f32,
    pub particles: Vec<Particle>,
}

impl PointerTracer {
    pub const COLOR: Color = Color::Named("#00ff99");

    pub fn new(bounds: Vec2) -> Self {
        Self {
            pos: bounds / 2.0,
            pulse: 0.0,
            particles: Vec::new(),
        }
    }

    /// Advance one frame of pointer motion.
    pub fn update(&mut self, pos: Vec2, rng: &mut Pcg32) {
        self.pos = pos;
        self.pulse += 0.1;
        self.particles.push(Particle::new(rng, self.pos, Self::COLOR));
        self.particles.push(Particle::new(rng, self.pos, Self::COLOR));
        age_particles(&mut self.particles);
    }

    /// Pulsing glow radius for rendering.
    pub fn glow_radius(&self) -> f32 {
        6.0 + self.pulse.sin() * 2.0
    }
}

/// A player-fired vertical bolt.
#[derive(Debug, Clone)]
pub struct Laser {
    pub pos: Vec2,
    /// Remaining frames; a laser that just hit 0 is drawn once more and
    /// still collides until the next frame prunes it.
    pub life: i32,
    pub particles: Vec<Particle>,
}

impl Laser {
    pub const COLOR: Color = Color::Named("#ff3366");

    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            life: LASER_LIFE,
            particles: Vec::new(),
        }
    }

    pub fn update(&mut self, rng: &mut Pcg32) {
        self.pos.y += LASER_SPEED;
        self.life -= 1;
        self.particles.push(Particle::new(rng, self.pos, Self::COLOR));
        age_particles(&mut self.particles);
    }
}

/// The user-controlled ship.
#[derive(Debug, Clone)]
pub struct PlayerShip {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub shoot_cooldown: i32,
    pub lasers: Vec<Laser>,
    pub trail: Vec<Particle>,
}

/// Held-input snapshot the ship reads each frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
    pub down: bool,
    pub fire: bool,
}

impl PlayerShip {
    pub const COLOR: Color = Color::Named("#00cc66");

    pub fn new(bounds: Vec2) -> Self {
        Self {
            pos: Vec2::new(bounds.x / 2.0, bounds.y - PLAYER_SPAWN_OFFSET),
            size: PLAYER_SIZE,
            speed: PLAYER_SPEED,
            shoot_cooldown: 0,
            lasers: Vec::new(),
            trail: Vec::new(),
        }
    }

    pub fn update(&mut self, keys: HeldKeys, bounds: Vec2, rng: &mut Pcg32) {
        if keys.left {
            self.pos.x -= self.speed;
        }
        if keys.right {
            self.pos.x += self.speed;
        }
        if keys.down {
            self.pos.y += self.speed;
        }
        self.pos.x = self.pos.x.clamp(self.size, bounds.x - self.size);
        self.pos.y = self.pos.y.clamp(self.size, bounds.y - self.size);

        // Engine trail
        self.trail.push(Particle::new(
            rng,
            self.pos + Vec2::new(0.0, self.size),
            Self::COLOR,
        ));
        age_particles(&mut self.trail);

        // Continuous fire while held; the cooldown only counts down while
        // the key is released.
        if keys.fire {
            self.shoot();
        } else if self.shoot_cooldown > 0 {
            self.shoot_cooldown -= 1;
        }

        self.lasers.retain(|l| l.life > 0);
        for laser in self.lasers.iter_mut() {
            laser.update(rng);
        }
    }

    pub fn shoot(&mut self) {
        if self.shoot_cooldown <= 0 {
            self.lasers.push(Laser::new(self.pos));
            self.shoot_cooldown = SHOOT_COOLDOWN;
        }
    }
}

/// Enemy categories. The four normal kinds map to site sections; `Prism`
/// is the color-cycling special that opens the mini-game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Rose,
    Jade,
    Indigo,
    Amber,
    Prism,
}

impl EnemyKind {
    pub const NORMALS: [EnemyKind; 4] = [
        EnemyKind::Rose,
        EnemyKind::Jade,
        EnemyKind::Indigo,
        EnemyKind::Amber,
    ];

    pub fn is_special(self) -> bool {
        self == EnemyKind::Prism
    }

    pub fn color(self) -> Color {
        match self {
            EnemyKind::Rose => Color::Named("#ff3366"),
            EnemyKind::Jade => Color::Named("#00cc66"),
            EnemyKind::Indigo => Color::Named("#6666ff"),
            EnemyKind::Amber => Color::Named("#ffcc00"),
            // Cycles at runtime; white until the first update.
            EnemyKind::Prism => Color::Named("#ffffff"),
        }
    }

    /// Site section an attract-mode kill navigates to.
    pub fn destination(self) -> Destination {
        match self {
            EnemyKind::Rose | EnemyKind::Jade => Destination::Portfolio,
            EnemyKind::Indigo => Destination::About,
            EnemyKind::Amber => Destination::Contact,
            EnemyKind::Prism => Destination::MiniGame,
        }
    }
}

/// A falling orb.
#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub radius: f32,
    pub kind: EnemyKind,
    /// Fall speed in px/frame before the mini-game ramp.
    pub base_speed: f32,
    pub color: Color,
    pub hue: f32,
    pub trail: Vec<Particle>,
}

impl Enemy {
    pub fn new(x: f32, kind: EnemyKind, base_speed: f32) -> Self {
        Self {
            pos: Vec2::new(x, ENEMY_SPAWN_Y),
            radius: ENEMY_RADIUS,
            kind,
            base_speed,
            color: kind.color(),
            hue: 0.0,
            trail: Vec::new(),
        }
    }

    pub fn update(&mut self, mode: Mode, elapsed: u32, rng: &mut Pcg32) {
        if self.kind.is_special() {
            self.hue = (self.hue + SPECIAL_HUE_STEP) % 360.0;
            self.color = Color::Hsl {
                hue: self.hue,
                lightness: 50.0,
            };
        }
        let extra = match mode {
            Mode::MiniGame => elapsed as f32 * MINI_SPEED_RAMP,
            Mode::Attract => 0.0,
        };
        self.pos.y += self.base_speed + extra;

        self.trail.push(Particle::new(rng, self.pos, self.color));
        age_particles(&mut self.trail);
    }
}

/// A burst of particles where an orb died.
#[derive(Debug, Clone)]
pub struct Explosion {
    pub particles: Vec<Particle>,
}

impl Explosion {
    pub fn new(rng: &mut Pcg32, pos: Vec2, color: Color) -> Self {
        let mut particles = Vec::with_capacity(EXPLOSION_PARTICLES);
        for _ in 0..EXPLOSION_PARTICLES {
            let size = rng.random_range(0.0..4.0) + 2.0;
            particles.push(Particle::with_size(rng, pos, color, size));
        }
        Self { particles }
    }

    pub fn update(&mut self) {
        age_particles(&mut self.particles);
    }

    pub fn is_done(&self) -> bool {
        self.particles.is_empty()
    }
}

/// Complete per-page-load session state.
///
/// Owned by the host shell; mutated only through [`tick`](super::tick::tick)
/// and [`set_bounds`](GameState::set_bounds). Reset only by a reload.
#[derive(Debug, Clone)]
pub struct GameState {
    pub mode: Mode,
    pub phase: GamePhase,
    /// Canvas dimensions; tracks the viewport, updated on resize.
    pub bounds: Vec2,
    pub stars: Vec<Star>,
    pub player: Option<PlayerShip>,
    pub enemies: Vec<Enemy>,
    pub explosions: Vec<Explosion>,
    pub tracer: PointerTracer,
    pub score: u32,
    /// Best score this page load; folded in when a run ends.
    pub session_high_score: u32,
    /// Mini-game only; unused (0) in attract mode.
    pub lives: u32,
    /// Frames since the mini-game started.
    pub elapsed: u32,
    pub spawn_cooldown: i32,
    /// Run seed for reproducibility.
    pub seed: u64,
    pub rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(mode: Mode, bounds: Vec2, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let stars = (0..STAR_COUNT).map(|_| Star::new(&mut rng, bounds)).collect();
        Self {
            mode,
            phase: GamePhase::Playing,
            bounds,
            stars,
            player: Some(PlayerShip::new(bounds)),
            enemies: Vec::new(),
            explosions: Vec::new(),
            tracer: PointerTracer::new(bounds),
            score: 0,
            session_high_score: 0,
            lives: match mode {
                Mode::MiniGame => START_LIVES,
                Mode::Attract => 0,
            },
            elapsed: 0,
            spawn_cooldown: SPAWN_COOLDOWN,
            seed,
            rng,
            events: Vec::new(),
        }
    }

    /// Track a viewport resize. Entities are not repositioned; the player
    /// re-clamps on its next update and stars wrap to the new width.
    pub fn set_bounds(&mut self, bounds: Vec2) {
        self.bounds = bounds;
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// End the run: fold the score into the session high score and freeze.
    pub fn end_run(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        if self.score > self.session_high_score {
            self.session_high_score = self.score;
        }
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the side effects queued by the last tick.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
