//! Spark Circuit - a catch-the-charge arithmetic game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (round generation, collection, game state)
//! - `render`: Canvas 2D rendering (wasm only)
//! - `audio`: Procedural Web Audio cues (wasm only)

pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod render;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth movement)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions (canvas size injected into the stage container)
    pub const FIELD_WIDTH: f32 = 720.0;
    pub const FIELD_HEIGHT: f32 = 480.0;
    /// Top strip reserved for the HUD panel; orbs and Spark stay below it
    pub const HUD_HEIGHT: f32 = 80.0;

    /// Player (Spark) defaults
    pub const PLAYER_RADIUS: f32 = 22.0;
    pub const PLAYER_SPEED: f32 = 240.0;

    /// Orb defaults
    pub const ORB_RADIUS: f32 = 20.0;
    pub const ORB_DRIFT_SPEED: f32 = 18.0;
    /// Reach of a Space/Enter "collect nearest" press
    pub const COLLECT_RADIUS: f32 = 64.0;

    /// Round Controller bounds
    pub const STARTING_LIVES: u8 = 3;
    pub const MIN_TARGET: i32 = 6;
    pub const MAX_TARGET: i32 = 20;
    pub const ORBS_PER_ROUND: usize = 6;

    /// Delay before the next round after an exact match (1.0 s at 120 Hz)
    pub const SOLVED_DELAY_TICKS: u32 = 120;
    /// Input lock after overloading the bulb (0.75 s at 120 Hz)
    pub const OVERLOAD_LOCK_TICKS: u32 = 90;
}
