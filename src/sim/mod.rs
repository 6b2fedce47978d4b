//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod entity;
pub mod round;
pub mod state;
pub mod tick;

pub use entity::{Orb, Particle, Player, circles_overlap};
pub use round::{Round, RoundOutcome};
pub use state::{DebugSnapshot, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
