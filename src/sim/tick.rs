//! Fixed timestep simulation tick
//!
//! Advances the game deterministically: player movement, orb drift, orb
//! collection into the round, evaluation and phase transitions. Round pacing
//! uses explicit tick countdowns owned by the state, never host timers, so a
//! restarted game cannot be mutated by a stale callback.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::entity::{MAX_PARTICLES, Orb, Particle, circles_overlap};
use super::round::{Round, RoundOutcome};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held movement axes from the keyboard, each in [-1, 1]
    pub move_axes: Vec2,
    /// Absolute target point from mouse/touch; overrides the axes
    pub target_pos: Option<Vec2>,
    /// Collect the nearest orb (Space/Enter/tap)
    pub collect: bool,
    /// Leave the title screen
    pub start: bool,
    /// Restart the run
    pub restart: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    // Restart works in every phase past the title screen
    if input.restart && state.phase != GamePhase::Title {
        state.reset_run();
        state.events.push(GameEvent::Restarted);
        next_round(state);
        state.phase = GamePhase::Playing;
        return;
    }

    match state.phase {
        GamePhase::Title => {
            if input.start || input.collect {
                state.reset_run();
                next_round(state);
                state.phase = GamePhase::Playing;
            }
        }
        GamePhase::GameOver => {
            // Terminal: collection and movement are no-ops until restart
        }
        GamePhase::Solved => {
            drift_orbs(state, dt);
            update_particles(state, dt);
            state.solved_ticks = state.solved_ticks.saturating_sub(1);
            if state.solved_ticks == 0 {
                next_round(state);
                state.phase = GamePhase::Playing;
            }
        }
        GamePhase::Playing => {
            if state.lock_ticks > 0 {
                state.lock_ticks -= 1;
            }

            // Player movement: pointer target wins over held keys
            if let Some(target) = input.target_pos {
                state.player.move_toward(target, dt, PLAYER_SPEED);
            } else {
                state.player.move_axes(input.move_axes, dt, PLAYER_SPEED);
            }
            state.player.clamp_to_field();

            drift_orbs(state, dt);

            if state.lock_ticks == 0 {
                if let Some(orb_index) = find_collectable(state, input.collect) {
                    collect_orb(state, orb_index);
                }
            }

            update_particles(state, dt);
        }
    }
}

/// Generate the next round and scatter its orbs.
///
/// The per-round RNG stream is hashed from the run seed and the level, so a
/// run replays identically from the same seed.
pub fn next_round(state: &mut GameState) {
    state.level += 1;
    let round_seed = (state.level as u64)
        .wrapping_mul(2654435761)
        .wrapping_add(state.seed);
    let mut rng = Pcg32::seed_from_u64(round_seed);

    state.round = Round::generate(state.level, &mut rng);
    state.solved_ticks = 0;
    state.lock_ticks = 0;
    spawn_orbs(state, &mut rng);

    log::info!(
        "Round {}: target {} from {:?}",
        state.level,
        state.round.target,
        state.round.values
    );
    state.events.push(GameEvent::RoundStart);
}

fn spawn_orbs(state: &mut GameState, rng: &mut Pcg32) {
    state.orbs.clear();

    let margin = ORB_RADIUS + 12.0;
    // Keep a clear band above Spark's spawn point
    let y_min = HUD_HEIGHT + margin;
    let y_max = FIELD_HEIGHT - 120.0;

    for value_index in 0..state.round.len() {
        let mut pos = Vec2::ZERO;
        // Rejection sampling against earlier orbs; accept the last try if the
        // field is crowded
        for _attempt in 0..24 {
            pos = Vec2::new(
                rng.random_range(margin..=FIELD_WIDTH - margin),
                rng.random_range(y_min..=y_max),
            );
            let clear = state
                .orbs
                .iter()
                .all(|o| !circles_overlap(pos, ORB_RADIUS * 1.6, o.pos, o.radius));
            if clear {
                break;
            }
        }

        let heading = rng.random_range(0.0..std::f32::consts::TAU);
        let orb = Orb {
            id: state.next_entity_id(),
            value_index,
            pos,
            vel: Vec2::new(heading.cos(), heading.sin()) * ORB_DRIFT_SPEED,
            radius: ORB_RADIUS,
            consumed: false,
            bob_phase: rng.random_range(0.0..std::f32::consts::TAU),
        };
        state.orbs.push(orb);
    }
}

fn drift_orbs(state: &mut GameState, dt: f32) {
    for orb in &mut state.orbs {
        if !orb.consumed {
            orb.drift(dt);
        }
    }
}

/// Pick at most one orb this tick: contact with Spark, or the nearest orb in
/// reach when the collect key fired.
fn find_collectable(state: &GameState, collect_pressed: bool) -> Option<usize> {
    let player = &state.player;

    if let Some(index) = state.orbs.iter().position(|o| {
        !o.consumed && circles_overlap(player.pos, player.radius, o.pos, o.radius)
    }) {
        return Some(index);
    }

    if collect_pressed {
        return state
            .orbs
            .iter()
            .enumerate()
            .filter(|(_, o)| !o.consumed && player.pos.distance(o.pos) <= COLLECT_RADIUS)
            .min_by(|(_, a), (_, b)| {
                let da = player.pos.distance_squared(a.pos);
                let db = player.pos.distance_squared(b.pos);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i);
    }

    None
}

/// Consume an orb into the round and judge the new charge. Emits exactly one
/// event: Pickup, Solved, or Overloaded (plus GameOver on the last life).
fn collect_orb(state: &mut GameState, orb_index: usize) {
    let value_index = state.orbs[orb_index].value_index;
    let Some(value) = state.round.select(value_index) else {
        return;
    };
    state.orbs[orb_index].consumed = true;

    let burst_pos = state.orbs[orb_index].pos;
    spawn_burst(state, burst_pos, 10, 48.0);

    match state.round.evaluate() {
        RoundOutcome::Solved => {
            state.score += 10 + 2 * state.level as u64;
            state.solved_ticks = SOLVED_DELAY_TICKS;
            state.phase = GamePhase::Solved;
            spawn_burst(state, burst_pos, 26, 130.0);
            state.events.push(GameEvent::Solved);
        }
        RoundOutcome::Overloaded => {
            state.lives = state.lives.saturating_sub(1);
            state.events.push(GameEvent::Overloaded);
            if state.lives == 0 {
                state.phase = GamePhase::GameOver;
                state.events.push(GameEvent::GameOver);
            } else {
                // Keep the round: clear the picks, bring the orbs back, and
                // lock collection briefly so the next touch is deliberate
                state.round.reset_selection();
                for orb in &mut state.orbs {
                    orb.consumed = false;
                }
                state.lock_ticks = OVERLOAD_LOCK_TICKS;
            }
        }
        RoundOutcome::Open => {
            state.events.push(GameEvent::Pickup);
        }
    }

    log::debug!(
        "collected {} -> sum {}/{}",
        value,
        state.round.current_sum(),
        state.round.target
    );
}

fn update_particles(state: &mut GameState, dt: f32) {
    for p in &mut state.particles {
        p.pos += p.vel * dt;
        p.vel *= 0.96;
        p.life -= dt * 1.4;
    }
    state.particles.retain(|p| p.life > 0.0);
}

/// Cosmetic burst. Directions fan out evenly with a tick-based twist so no
/// RNG stream is consumed for visuals.
fn spawn_burst(state: &mut GameState, pos: Vec2, count: u32, hue: f32) {
    let twist = (state.time_ticks % 97) as f32 * 0.13;
    for i in 0..count {
        if state.particles.len() >= MAX_PARTICLES {
            break;
        }
        let angle = twist + i as f32 / count as f32 * std::f32::consts::TAU;
        let speed = 60.0 + (i % 3) as f32 * 35.0;
        state.particles.push(Particle {
            pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            life: 1.0,
            size: 2.5 + (i % 4) as f32,
            hue,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A playing state with a fixed round and orbs parked on a grid away
    /// from Spark's spawn point.
    fn playing_state(target: i32, values: Vec<i32>) -> GameState {
        let mut state = GameState::new(42);
        state.phase = GamePhase::Playing;
        state.level = 1;
        state.round = Round::new(target, values);
        for value_index in 0..state.round.len() {
            let id = state.next_entity_id();
            state.orbs.push(Orb {
                id,
                value_index,
                pos: Vec2::new(60.0 + 110.0 * value_index as f32, 250.0),
                vel: Vec2::ZERO,
                radius: ORB_RADIUS,
                consumed: false,
                bob_phase: 0.0,
            });
        }
        state
    }

    /// Park Spark on an orb so contact pickup fires on the next tick
    fn touch_orb(state: &mut GameState, orb_index: usize) {
        state.player.pos = state.orbs[orb_index].pos;
        tick(state, &TickInput::default(), SIM_DT);
    }

    #[test]
    fn test_title_to_playing() {
        let mut state = GameState::new(12345);
        assert_eq!(state.phase, GamePhase::Title);

        // No input - stays on title
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Title);

        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level, 1);
        assert_eq!(state.orbs.len(), state.round.len());
        assert!(state.events.contains(&GameEvent::RoundStart));
    }

    #[test]
    fn test_exact_match_solves() {
        let mut state = playing_state(10, vec![4, 6, 3, 9]);

        touch_orb(&mut state, 0);
        assert_eq!(state.round.current_sum(), 4);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.events.contains(&GameEvent::Pickup));

        touch_orb(&mut state, 1);
        assert_eq!(state.round.current_sum(), 10);
        assert_eq!(state.phase, GamePhase::Solved);
        assert!(state.events.contains(&GameEvent::Solved));
        assert!(!state.events.contains(&GameEvent::Overloaded));
        assert_eq!(state.score, 12);
        assert_eq!(state.lives, STARTING_LIVES);
    }

    #[test]
    fn test_solved_delay_then_next_round() {
        let mut state = playing_state(10, vec![4, 6, 3, 9]);
        touch_orb(&mut state, 0);
        touch_orb(&mut state, 1);
        assert_eq!(state.phase, GamePhase::Solved);

        for _ in 0..SOLVED_DELAY_TICKS {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level, 2);
        assert_eq!(state.round.current_sum(), 0);
        assert!(state.orbs.iter().all(|o| !o.consumed));
    }

    #[test]
    fn test_overload_costs_a_life_and_keeps_round() {
        let mut state = playing_state(10, vec![4, 6, 3, 9]);

        touch_orb(&mut state, 3); // 9
        touch_orb(&mut state, 2); // +3 = 12
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lives, STARTING_LIVES - 1);
        assert!(state.events.contains(&GameEvent::Overloaded));

        // Selection cleared, orbs respawned, same puzzle
        assert_eq!(state.round.current_sum(), 0);
        assert_eq!(state.round.target, 10);
        assert!(state.orbs.iter().all(|o| !o.consumed));
        assert!(state.lock_ticks > 0);
    }

    #[test]
    fn test_overload_lock_blocks_collection() {
        let mut state = playing_state(10, vec![4, 6, 3, 9]);
        touch_orb(&mut state, 3);
        touch_orb(&mut state, 2);
        assert!(state.lock_ticks > 0);

        // Standing on an orb while locked collects nothing
        touch_orb(&mut state, 0);
        assert_eq!(state.round.current_sum(), 0);
    }

    #[test]
    fn test_game_over_is_terminal_until_restart() {
        let mut state = playing_state(10, vec![4, 6, 3, 9]);
        state.lives = 1;

        touch_orb(&mut state, 3);
        touch_orb(&mut state, 2);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives, 0);
        assert!(state.events.contains(&GameEvent::GameOver));

        // Collection inputs are no-ops now
        state.player.pos = state.orbs[0].pos;
        let input = TickInput {
            collect: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.round.current_sum(), 0);

        // Restart brings back a fresh run
        let input = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
    }

    #[test]
    fn test_collect_key_picks_nearest_in_reach() {
        let mut state = playing_state(10, vec![4, 6, 3, 9]);
        // Just outside contact range of orb 1, inside collect reach
        state.player.pos = state.orbs[1].pos + Vec2::new(ORB_RADIUS + PLAYER_RADIUS + 5.0, 0.0);

        let input = TickInput {
            collect: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert!(state.round.is_selected(1));
        assert_eq!(state.round.current_sum(), 6);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(99999);
        let mut b = GameState::new(99999);

        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut a, &start, SIM_DT);
        tick(&mut b, &start, SIM_DT);

        let inputs = [
            TickInput {
                move_axes: Vec2::new(1.0, -0.5),
                ..Default::default()
            },
            TickInput {
                target_pos: Some(Vec2::new(200.0, 300.0)),
                ..Default::default()
            },
            TickInput {
                collect: true,
                ..Default::default()
            },
            TickInput::default(),
        ];
        for _ in 0..200 {
            for input in &inputs {
                tick(&mut a, input, SIM_DT);
                tick(&mut b, input, SIM_DT);
            }
        }

        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.round.values, b.round.values);
        assert_eq!(a.round.current_sum(), b.round.current_sum());
        assert_eq!(a.score, b.score);
        assert!((a.player.pos - b.player.pos).length() < 0.0001);
    }

    #[test]
    fn test_generated_round_spawns_matching_orbs() {
        let mut state = GameState::new(7);
        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);

        assert_eq!(state.orbs.len(), ORBS_PER_ROUND);
        for orb in &state.orbs {
            assert!(orb.value_index < state.round.len());
            assert!(orb.pos.y >= HUD_HEIGHT);
            assert!(orb.pos.x >= 0.0 && orb.pos.x <= FIELD_WIDTH);
        }
    }
}
