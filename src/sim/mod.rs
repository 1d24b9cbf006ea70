//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per display frame (all tuning constants are per-frame)
//! - Seeded RNG only
//! - No rendering or platform dependencies
//!
//! Side effects the page must perform (navigation) leave the simulation as
//! [`GameEvent`]s on the state's event queue.

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{KillOutcome, laser_hits, resolve_kill};
pub use spawn::spawn_cooldown_after;
pub use state::{
    Color, Destination, Enemy, EnemyKind, Explosion, GameEvent, GamePhase, GameState, HeldKeys,
    Laser, Mode, Particle, PlayerShip, PointerTracer, Star,
};
pub use tick::{TickInput, tick};
