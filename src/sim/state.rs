//! Game state and lifecycle types
//!
//! Everything the renderer and the test harness need lives here, owned by a
//! single `GameState` mutated synchronously inside `tick`.

use serde::{Deserialize, Serialize};

use super::entity::{Orb, Particle, Player};
use super::round::Round;
use crate::consts::STARTING_LIVES;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first input
    Title,
    /// Active round
    Playing,
    /// Exact match; short celebration before the next round
    Solved,
    /// Run ended. Terminal until an explicit restart.
    GameOver,
}

/// Discrete events emitted by `tick` for the audio/announcement layer.
/// Drained once per frame by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A fresh round was generated
    RoundStart,
    /// Picked up a value, charge still below target
    Pickup,
    /// Charge matched the target exactly
    Solved,
    /// Charge exceeded the target; one life lost
    Overloaded,
    /// Lives ran out
    GameOver,
    /// Fresh run after game over
    Restarted,
}

/// Complete game state (deterministic, snapshot-serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed; per-round RNG streams are hashed from it
    pub seed: u64,
    /// Round counter, drives difficulty (1-based once playing)
    pub level: u32,
    pub lives: u8,
    pub score: u64,
    pub phase: GamePhase,
    pub round: Round,
    pub player: Player,
    /// One orb per candidate value (stable id order)
    pub orbs: Vec<Orb>,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: Vec<Particle>,
    /// Ticks left in the Solved celebration
    pub solved_ticks: u32,
    /// Ticks collection stays locked after an overload
    pub lock_ticks: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game on the title screen. The first round is generated
    /// when play starts, not here.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            level: 0,
            lives: STARTING_LIVES,
            score: 0,
            phase: GamePhase::Title,
            round: Round::new(0, Vec::new()),
            player: Player::default(),
            orbs: Vec::new(),
            particles: Vec::new(),
            solved_ticks: 0,
            lock_ticks: 0,
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reset score/lives/level for a fresh run (round spawn happens in tick)
    pub fn reset_run(&mut self) {
        self.level = 0;
        self.lives = STARTING_LIVES;
        self.score = 0;
        self.player = Player::default();
        self.orbs.clear();
        self.particles.clear();
        self.solved_ticks = 0;
        self.lock_ticks = 0;
    }

    /// Take the queued events, leaving the queue empty
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Small inspection snapshot for `window.__gameDebug`
    pub fn debug_snapshot(&self) -> DebugSnapshot {
        DebugSnapshot {
            phase: match self.phase {
                GamePhase::Title => "title",
                GamePhase::Playing => "playing",
                GamePhase::Solved => "solved",
                GamePhase::GameOver => "game-over",
            },
            target: self.round.target,
            values: self.round.values.clone(),
            selected: self.round.selected_indices(),
            current_sum: self.round.current_sum(),
            lives: self.lives,
            score: self.score,
            level: self.level,
        }
    }
}

/// What the page-level test harness can read back each frame
#[derive(Debug, Clone, Serialize)]
pub struct DebugSnapshot {
    pub phase: &'static str,
    pub target: i32,
    pub values: Vec<i32>,
    pub selected: Vec<usize>,
    pub current_sum: i32,
    pub lives: u8,
    pub score: u64,
    pub level: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_on_title() {
        let state = GameState::new(7);
        assert_eq!(state.phase, GamePhase::Title);
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(state.score, 0);
        assert!(state.orbs.is_empty());
    }

    #[test]
    fn test_entity_ids_monotonic() {
        let mut state = GameState::new(7);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert!(b > a);
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut state = GameState::new(7);
        state.events.push(GameEvent::Pickup);
        state.events.push(GameEvent::Solved);
        let drained = state.drain_events();
        assert_eq!(drained, vec![GameEvent::Pickup, GameEvent::Solved]);
        assert!(state.events.is_empty());
    }
}
