//! Spark Circuit entry point
//!
//! Handles DOM/canvas setup, input handlers and the animation-frame loop on
//! wasm; runs a short headless smoke simulation on native.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use spark_circuit::audio::{AudioManager, SoundCue};
    use spark_circuit::consts::*;
    use spark_circuit::render::Renderer;
    use spark_circuit::sim::{GameEvent, GameState, TickInput, tick};

    /// Well-known container the page provides
    const STAGE_ID: &str = "game-of-the-day-stage";

    #[derive(Default)]
    struct HeldKeys {
        left: bool,
        right: bool,
        up: bool,
        down: bool,
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: Renderer,
        audio: AudioManager,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        held: HeldKeys,
        /// Last mouse/touch point inside the canvas
        pointer: Option<Vec2>,
        show_help: bool,
        live_region: Option<Element>,
    }

    impl Game {
        fn new(seed: u64, renderer: Renderer, live_region: Option<Element>) -> Self {
            Self {
                state: GameState::new(seed),
                renderer,
                audio: AudioManager::new(),
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                held: HeldKeys::default(),
                pointer: None,
                show_help: false,
                live_region,
            }
        }

        /// Run simulation ticks for the elapsed frame time
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut axes = Vec2::ZERO;
            if self.held.left {
                axes.x -= 1.0;
            }
            if self.held.right {
                axes.x += 1.0;
            }
            if self.held.up {
                axes.y -= 1.0;
            }
            if self.held.down {
                axes.y += 1.0;
            }
            self.input.move_axes = axes;
            // Keyboard steering overrides a stale pointer target
            self.input.target_pos = if axes == Vec2::ZERO { self.pointer } else { None };

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.collect = false;
                self.input.start = false;
                self.input.restart = false;
            }
        }

        /// Map queued sim events to audio cues and live-region text
        fn dispatch_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::RoundStart => {
                        self.audio.play(SoundCue::RoundStart);
                        self.announce(&format!(
                            "Round {}: charge the bulb to exactly {}.",
                            self.state.level, self.state.round.target
                        ));
                    }
                    GameEvent::Pickup => {
                        self.audio.play(SoundCue::Pickup);
                        self.announce(&format!(
                            "Charge {} of {}.",
                            self.state.round.current_sum(),
                            self.state.round.target
                        ));
                    }
                    GameEvent::Solved => {
                        self.audio.play(SoundCue::Correct);
                        self.announce(&format!("Bulb lit! Score {}.", self.state.score));
                    }
                    GameEvent::Overloaded => {
                        self.audio.play(SoundCue::Incorrect);
                        self.announce(&format!(
                            "Overloaded! {} lives left.",
                            self.state.lives
                        ));
                    }
                    GameEvent::GameOver => {
                        self.audio.play(SoundCue::GameOver);
                        self.announce(&format!(
                            "Game over. Final score {}. Press R to play again.",
                            self.state.score
                        ));
                    }
                    GameEvent::Restarted => {
                        self.announce("New game!");
                    }
                }
            }
        }

        fn announce(&self, message: &str) {
            if let Some(region) = &self.live_region {
                region.set_text_content(Some(message));
            }
        }

        fn render(&self, time: f64) {
            self.renderer.draw(&self.state, time, self.show_help);
        }

        /// Refresh `window.__gameDebug` for page-level inspection
        fn publish_debug(&self) {
            let Ok(json) = serde_json::to_string(&self.state.debug_snapshot()) else {
                return;
            };
            if let Some(window) = web_sys::window() {
                let _ = js_sys::Reflect::set(
                    &window,
                    &JsValue::from_str("__gameDebug"),
                    &JsValue::from_str(&json),
                );
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Spark Circuit starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Missing stage container is a soft failure: warn and bail out
        let Some(container) = document.get_element_by_id(STAGE_ID) else {
            log::warn!("Container #{STAGE_ID} not found - game not started");
            return;
        };

        let canvas: HtmlCanvasElement = match document
            .create_element("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().map_err(|e| e.into()))
        {
            Ok(canvas) => canvas,
            Err(err) => {
                log::warn!("Failed to create canvas: {err:?}");
                return;
            }
        };
        canvas.set_width(FIELD_WIDTH as u32);
        canvas.set_height(FIELD_HEIGHT as u32);
        if container.append_child(&canvas).is_err() {
            log::warn!("Failed to attach canvas to #{STAGE_ID}");
            return;
        }

        // Off-screen polite live region for announcements
        let live_region = document.create_element("div").ok().inspect(|region| {
            let _ = region.set_attribute("aria-live", "polite");
            let _ = region.set_attribute(
                "style",
                "position:absolute;left:-9999px;width:1px;height:1px;overflow:hidden;",
            );
            let _ = container.append_child(region);
        });

        let renderer = match Renderer::new(&canvas) {
            Ok(renderer) => renderer,
            Err(err) => {
                log::warn!("Canvas 2D context unavailable: {err:?}");
                return;
            }
        };

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, renderer, live_region)));
        log::info!("Game initialized with seed: {seed}");

        setup_input_handlers(&canvas, game.clone());
        setup_visibility_handler(game.clone());

        request_animation_frame(game);

        log::info!("Spark Circuit running!");
    }

    fn canvas_point(canvas: &HtmlCanvasElement, client_x: f32, client_y: f32) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        Vec2::new(client_x - rect.left() as f32, client_y - rect.top() as f32)
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let mut handled = true;
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.held.left = true,
                    "ArrowRight" | "d" | "D" => g.held.right = true,
                    "ArrowUp" | "w" | "W" => g.held.up = true,
                    "ArrowDown" | "s" | "S" => g.held.down = true,
                    " " | "Enter" => {
                        g.input.collect = true;
                        g.input.start = true;
                        g.audio.resume();
                        g.audio.start_ambient();
                    }
                    "m" | "M" => {
                        let muted = !g.audio.muted();
                        g.audio.set_muted(muted);
                        log::info!("Audio muted: {muted}");
                    }
                    "r" | "R" => g.input.restart = true,
                    "h" | "H" => g.show_help = !g.show_help,
                    _ => handled = false,
                }
                if handled {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.held.left = false,
                    "ArrowRight" | "d" | "D" => g.held.right = false,
                    "ArrowUp" | "w" | "W" => g.held.up = false,
                    "ArrowDown" | "s" | "S" => g.held.down = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move steers Spark
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let point = canvas_point(
                    &canvas_clone,
                    event.client_x() as f32,
                    event.client_y() as f32,
                );
                game.borrow_mut().pointer = Some(point);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click collects (and is the user gesture that unlocks audio)
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let point = canvas_point(
                    &canvas_clone,
                    event.client_x() as f32,
                    event.client_y() as f32,
                );
                g.pointer = Some(point);
                g.input.collect = true;
                g.input.start = true;
                g.audio.resume();
                g.audio.start_ambient();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let point = canvas_point(
                        &canvas_clone,
                        touch.client_x() as f32,
                        touch.client_y() as f32,
                    );
                    g.pointer = Some(point);
                    g.input.collect = true;
                    g.input.start = true;
                    g.audio.resume();
                    g.audio.start_ambient();
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let point = canvas_point(
                        &canvas_clone,
                        touch.client_x() as f32,
                        touch.client_y() as f32,
                    );
                    game.borrow_mut().pointer = Some(point);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Quiet the ambient pad while the tab is hidden
    fn setup_visibility_handler(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                g.audio.stop_ambient();
            } else {
                g.audio.start_ambient();
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.dispatch_events();
            g.render(time);
            g.publish_debug();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Spark Circuit (native) starting...");
    log::info!("Native mode is a headless smoke run - serve the wasm build for the real game");

    run_headless_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Auto-play a few rounds to exercise the sim outside the browser
#[cfg(not(target_arch = "wasm32"))]
fn run_headless_demo() {
    use spark_circuit::consts::{SIM_DT, SOLVED_DELAY_TICKS};
    use spark_circuit::sim::{GamePhase, GameState, TickInput, tick};

    let mut state = GameState::new(42);
    let start = TickInput {
        start: true,
        ..Default::default()
    };
    tick(&mut state, &start, SIM_DT);

    for _ in 0..3 {
        // Find a solving subset by brute force, then walk onto those orbs
        let round = state.round.clone();
        let n = round.values.len();
        let mask = (1u32..1 << n)
            .find(|mask| {
                let sum: i32 = (0..n)
                    .filter(|i| mask & (1 << i) != 0)
                    .map(|i| round.values[i])
                    .sum();
                sum == round.target
            })
            .expect("generated round must be solvable");

        for value_index in (0..n).filter(|i| mask & (1 << i) != 0) {
            let orb_pos = state
                .orbs
                .iter()
                .find(|o| o.value_index == value_index)
                .map(|o| o.pos)
                .expect("one orb per value");
            state.player.pos = orb_pos;
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::Solved);
        log::info!(
            "Solved round {} (target {}), score {}",
            state.level,
            state.round.target,
            state.score
        );

        for _ in 0..SOLVED_DELAY_TICKS {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
    }

    println!(
        "Headless demo done: {} rounds solved, score {}, lives {}",
        state.level - 1,
        state.score,
        state.lives
    );
}
