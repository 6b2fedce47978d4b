//! Canvas 2D rendering
//!
//! A frame is a pure function of `GameState` plus wall-clock time (used only
//! for cosmetic wobble). Nothing here mutates game state.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::*;
use crate::sim::{GamePhase, GameState};

pub struct Renderer {
    ctx: CanvasRenderingContext2d,
}

impl Renderer {
    /// Grab the 2D context off the injected canvas
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { ctx })
    }

    /// Draw one complete frame
    pub fn draw(&self, state: &GameState, time_ms: f64, show_help: bool) {
        self.draw_background(time_ms);
        self.draw_orbs(state, time_ms);
        self.draw_player(state, time_ms);
        self.draw_particles(state);
        self.draw_hud(state);

        match state.phase {
            GamePhase::Title => self.draw_title_overlay(),
            GamePhase::Solved => self.draw_solved_flash(state),
            GamePhase::GameOver => self.draw_game_over(state),
            GamePhase::Playing => {
                if state.lock_ticks > 0 {
                    self.draw_overload_tint(state);
                }
            }
        }

        if show_help {
            self.draw_help_overlay();
        }
    }

    fn draw_background(&self, time_ms: f64) {
        let ctx = &self.ctx;
        let w = FIELD_WIDTH as f64;
        let h = FIELD_HEIGHT as f64;

        let grad = ctx.create_linear_gradient(0.0, 0.0, 0.0, h);
        let _ = grad.add_color_stop(0.0, "#0b1d3a");
        let _ = grad.add_color_stop(1.0, "#16355f");
        ctx.set_fill_style_canvas_gradient(&grad);
        ctx.fill_rect(0.0, 0.0, w, h);

        // Slow twinkling dots
        for i in 0..24u32 {
            let fx = (i as f64 * 73.7) % w;
            let fy = HUD_HEIGHT as f64 + (i as f64 * 97.3) % (h - HUD_HEIGHT as f64);
            let twinkle = 0.25 + 0.2 * ((time_ms * 0.001 + i as f64).sin().abs());
            ctx.set_fill_style_str(&format!("rgba(200,220,255,{twinkle:.2})"));
            ctx.begin_path();
            let _ = ctx.arc(fx, fy, 1.6, 0.0, std::f64::consts::TAU);
            ctx.fill();
        }
    }

    fn draw_orbs(&self, state: &GameState, time_ms: f64) {
        let ctx = &self.ctx;
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");

        for orb in &state.orbs {
            if orb.consumed {
                continue;
            }
            let value = state.round.values[orb.value_index];
            let bob = (orb.bob_phase as f64 + time_ms * 0.002).sin() * 4.0;
            let x = orb.pos.x as f64;
            let y = orb.pos.y as f64 + bob;
            let r = orb.radius as f64;

            // Hue tracks the value so repeated numbers look alike
            let hue = (value * 28) % 360;
            ctx.set_fill_style_str(&format!("hsl({hue}, 70%, 60%)"));
            ctx.begin_path();
            let _ = ctx.arc(x, y, r, 0.0, std::f64::consts::TAU);
            ctx.fill();

            ctx.set_stroke_style_str("rgba(255,255,255,0.7)");
            ctx.set_line_width(2.0);
            ctx.begin_path();
            let _ = ctx.arc(x, y, r, 0.0, std::f64::consts::TAU);
            ctx.stroke();

            ctx.set_fill_style_str("#ffffff");
            ctx.set_font("bold 18px 'Comic Sans MS', 'Segoe UI', sans-serif");
            let _ = ctx.fill_text(&value.to_string(), x, y);
        }
    }

    fn draw_player(&self, state: &GameState, time_ms: f64) {
        let ctx = &self.ctx;
        let p = &state.player;
        let x = p.pos.x as f64;
        let y = p.pos.y as f64;
        let r = p.radius as f64;

        // Glow halo
        let pulse = 4.0 + (time_ms * 0.004).sin() * 2.0;
        ctx.set_fill_style_str("rgba(255,230,120,0.25)");
        ctx.begin_path();
        let _ = ctx.arc(x, y, r + pulse, 0.0, std::f64::consts::TAU);
        ctx.fill();

        // Body
        ctx.set_fill_style_str("#ffd94a");
        ctx.begin_path();
        let _ = ctx.arc(x, y, r, 0.0, std::f64::consts::TAU);
        ctx.fill();

        // Eyes
        ctx.set_fill_style_str("#203040");
        for dx in [-7.0, 7.0] {
            ctx.begin_path();
            let _ = ctx.arc(x + dx, y - 4.0, 3.0, 0.0, std::f64::consts::TAU);
            ctx.fill();
        }
        // Smile
        ctx.set_stroke_style_str("#203040");
        ctx.set_line_width(2.0);
        ctx.begin_path();
        let _ = ctx.arc(x, y + 3.0, 8.0, 0.2, std::f64::consts::PI - 0.2);
        ctx.stroke();
    }

    fn draw_particles(&self, state: &GameState) {
        let ctx = &self.ctx;
        for p in &state.particles {
            let alpha = p.life.clamp(0.0, 1.0);
            ctx.set_fill_style_str(&format!("hsla({}, 80%, 65%, {alpha:.2})", p.hue as i32));
            ctx.begin_path();
            let _ = ctx.arc(
                p.pos.x as f64,
                p.pos.y as f64,
                p.size as f64,
                0.0,
                std::f64::consts::TAU,
            );
            ctx.fill();
        }
    }

    fn draw_hud(&self, state: &GameState) {
        let ctx = &self.ctx;
        let w = FIELD_WIDTH as f64;
        let hud = HUD_HEIGHT as f64;

        ctx.set_fill_style_str("rgba(10,20,40,0.85)");
        ctx.fill_rect(0.0, 0.0, w, hud);
        ctx.set_stroke_style_str("rgba(140,180,255,0.4)");
        ctx.set_line_width(2.0);
        ctx.begin_path();
        ctx.move_to(0.0, hud);
        ctx.line_to(w, hud);
        ctx.stroke();

        ctx.set_text_baseline("middle");

        // Target bulb and charge meter
        ctx.set_text_align("left");
        ctx.set_fill_style_str("#ffe9a0");
        ctx.set_font("bold 22px 'Comic Sans MS', 'Segoe UI', sans-serif");
        let _ = ctx.fill_text(&format!("Charge: {}", state.round.target), 20.0, 26.0);

        let sum = state.round.current_sum();
        let target = state.round.target.max(1);
        let pct = (sum as f64 / target as f64).clamp(0.0, 1.0);
        let bar_w = 220.0;
        ctx.set_fill_style_str("rgba(255,255,255,0.15)");
        ctx.fill_rect(20.0, 46.0, bar_w, 16.0);
        let bar_color = if sum > state.round.target {
            "#ff5d5d"
        } else if sum == state.round.target {
            "#7dff8a"
        } else {
            "#ffd94a"
        };
        ctx.set_fill_style_str(bar_color);
        ctx.fill_rect(20.0, 46.0, bar_w * pct, 16.0);
        ctx.set_fill_style_str("#ffffff");
        ctx.set_font("14px 'Segoe UI', sans-serif");
        let _ = ctx.fill_text(&format!("{sum} / {}", state.round.target), 20.0 + bar_w + 12.0, 54.0);

        // Lives as little bulbs
        for i in 0..STARTING_LIVES {
            let lit = i < state.lives;
            let x = w / 2.0 - 20.0 + i as f64 * 26.0;
            ctx.set_fill_style_str(if lit { "#ffd94a" } else { "rgba(255,255,255,0.15)" });
            ctx.begin_path();
            let _ = ctx.arc(x, 30.0, 9.0, 0.0, std::f64::consts::TAU);
            ctx.fill();
        }

        // Score and level on the right
        ctx.set_text_align("right");
        ctx.set_fill_style_str("#cfe3ff");
        ctx.set_font("bold 20px 'Segoe UI', sans-serif");
        let _ = ctx.fill_text(&format!("Score {}", state.score), w - 20.0, 26.0);
        ctx.set_font("14px 'Segoe UI', sans-serif");
        let _ = ctx.fill_text(&format!("Round {}", state.level), w - 20.0, 52.0);
    }

    fn panel(&self, w: f64, h: f64) -> (f64, f64) {
        let ctx = &self.ctx;
        let x = (FIELD_WIDTH as f64 - w) / 2.0;
        let y = (FIELD_HEIGHT as f64 - h) / 2.0;
        ctx.set_fill_style_str("rgba(8,16,34,0.88)");
        ctx.fill_rect(x, y, w, h);
        ctx.set_stroke_style_str("rgba(255,217,74,0.8)");
        ctx.set_line_width(3.0);
        ctx.stroke_rect(x, y, w, h);
        (x, y)
    }

    fn draw_title_overlay(&self) {
        let ctx = &self.ctx;
        let (x, y) = self.panel(460.0, 220.0);
        ctx.set_text_align("center");
        let cx = x + 230.0;

        ctx.set_fill_style_str("#ffd94a");
        ctx.set_font("bold 34px 'Comic Sans MS', 'Segoe UI', sans-serif");
        let _ = ctx.fill_text("Spark Circuit", cx, y + 52.0);

        ctx.set_fill_style_str("#cfe3ff");
        ctx.set_font("17px 'Segoe UI', sans-serif");
        let _ = ctx.fill_text("Collect number orbs to charge the bulb", cx, y + 100.0);
        let _ = ctx.fill_text("to exactly the target - don't overload it!", cx, y + 124.0);

        ctx.set_fill_style_str("#ffffff");
        ctx.set_font("bold 18px 'Segoe UI', sans-serif");
        let _ = ctx.fill_text("Press Space or click to start", cx, y + 176.0);
    }

    fn draw_solved_flash(&self, state: &GameState) {
        let ctx = &self.ctx;
        // Brightest right after the match, fading over the delay
        let alpha = 0.35 * state.solved_ticks as f64 / SOLVED_DELAY_TICKS as f64;
        ctx.set_fill_style_str(&format!("rgba(130,255,150,{alpha:.2})"));
        ctx.fill_rect(0.0, 0.0, FIELD_WIDTH as f64, FIELD_HEIGHT as f64);

        ctx.set_text_align("center");
        ctx.set_fill_style_str("#7dff8a");
        ctx.set_font("bold 40px 'Comic Sans MS', 'Segoe UI', sans-serif");
        let _ = ctx.fill_text(
            "Bulb lit!",
            FIELD_WIDTH as f64 / 2.0,
            FIELD_HEIGHT as f64 / 2.0,
        );
    }

    fn draw_overload_tint(&self, state: &GameState) {
        let ctx = &self.ctx;
        let alpha = 0.25 * state.lock_ticks as f64 / OVERLOAD_LOCK_TICKS as f64;
        ctx.set_fill_style_str(&format!("rgba(255,80,80,{alpha:.2})"));
        ctx.fill_rect(0.0, 0.0, FIELD_WIDTH as f64, FIELD_HEIGHT as f64);
    }

    fn draw_game_over(&self, state: &GameState) {
        let ctx = &self.ctx;
        let (x, y) = self.panel(420.0, 190.0);
        ctx.set_text_align("center");
        let cx = x + 210.0;

        ctx.set_fill_style_str("#ff8a8a");
        ctx.set_font("bold 36px 'Comic Sans MS', 'Segoe UI', sans-serif");
        let _ = ctx.fill_text("Game Over", cx, y + 56.0);

        ctx.set_fill_style_str("#cfe3ff");
        ctx.set_font("20px 'Segoe UI', sans-serif");
        let _ = ctx.fill_text(
            &format!("Score {} - Round {}", state.score, state.level),
            cx,
            y + 104.0,
        );

        ctx.set_fill_style_str("#ffffff");
        ctx.set_font("bold 18px 'Segoe UI', sans-serif");
        let _ = ctx.fill_text("Press R to play again", cx, y + 152.0);
    }

    fn draw_help_overlay(&self) {
        let ctx = &self.ctx;
        let (x, y) = self.panel(480.0, 230.0);
        ctx.set_text_align("left");
        let lx = x + 36.0;

        ctx.set_fill_style_str("#ffd94a");
        ctx.set_font("bold 24px 'Segoe UI', sans-serif");
        let _ = ctx.fill_text("How to play", lx, y + 42.0);

        ctx.set_fill_style_str("#cfe3ff");
        ctx.set_font("16px 'Segoe UI', sans-serif");
        let lines = [
            "Move Spark: arrow keys / WASD, or point with the mouse",
            "Collect the nearest orb: Space or Enter, or just touch it",
            "Match the target charge exactly to light the bulb",
            "Going over pops the bulb and costs a life",
            "M mute - R restart - H close this help",
        ];
        for (i, line) in lines.iter().enumerate() {
            let _ = ctx.fill_text(line, lx, y + 84.0 + i as f64 * 28.0);
        }
    }
}
