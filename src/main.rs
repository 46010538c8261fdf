//! Oval Racer entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use oval_racer::Settings;
    use oval_racer::renderer::CanvasRenderer;
    use oval_racer::sim::{GameEvent, GameState, TickInput, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        renderer: Option<CanvasRenderer>,
        input: TickInput,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(settings: Settings) -> Self {
            let seed = settings.seed_or(js_sys::Date::now() as u64);
            log::info!("Game initialized with seed: {}", seed);
            Self {
                state: GameState::with_tuning(seed, settings.tuning()),
                settings,
                renderer: None,
                input: TickInput::default(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Advance the simulation and forward its events to the page
        fn update(&mut self, time: f64) {
            tick(&mut self.state, &self.input, time);

            for event in self.state.drain_events() {
                match event {
                    GameEvent::LapsChanged { laps } => set_score(laps),
                    GameEvent::Collision { opponent_id } => {
                        log::info!("Crashed into #{} - press R to restart", opponent_id);
                    }
                    GameEvent::OpponentSpawned { .. } => {}
                }
            }

            // Calculate FPS from oldest to newest frame
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&self) {
            if let Some(ref renderer) = self.renderer {
                if let Err(e) = renderer.render(&self.state, &self.settings) {
                    log::warn!("Render error: {:?}", e);
                }
            }
        }

        fn update_hud(&self) {
            if !self.settings.show_fps {
                return;
            }
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("fps") {
                el.set_text_content(Some(&self.fps.to_string()));
            }
        }

        /// Flip the hit-zone overlay and remember the choice
        fn toggle_hit_zones(&mut self) {
            let shown = self.settings.toggle_hit_zones();
            log::info!("Hit-zone overlay {}", if shown { "on" } else { "off" });
            self.settings.save();
        }

        fn reset(&mut self) {
            self.state.reset();
            self.input = TickInput::default();
        }
    }

    /// Show the lap count in the score element
    fn set_score(laps: u32) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("score"))
        {
            el.set_text_content(Some(&laps.to_string()));
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        // Already initialised on hot reload
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Oval Racer starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No <canvas id=\"canvas\"> on the page");
            return;
        };

        fit_canvas(&window, &canvas);

        let game = Rc::new(RefCell::new(Game::new(Settings::load())));

        match CanvasRenderer::new(&canvas, &game.borrow().state) {
            Ok(renderer) => game.borrow_mut().renderer = Some(renderer),
            Err(e) => {
                log::error!("Canvas setup failed: {:?}", e);
                return;
            }
        }

        set_score(0);
        game.borrow().render();

        setup_input_handlers(game.clone(), canvas);

        // Start game loop
        request_animation_frame(game);
        log::info!("Oval Racer running! Press ArrowUp to start");
    }

    /// Match the canvas backing store to its CSS size, returning the new size
    fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>, canvas: HtmlCanvasElement) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Window resize
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut()>::new(move || {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let (width, height) = fit_canvas(&window, &canvas);
                let mut g = game.borrow_mut();
                if let Some(renderer) = g.renderer.as_mut() {
                    renderer.resize(width, height);
                }
                g.render();
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key press
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowUp" => {
                        g.state.start();
                        g.input.accelerate = true;
                    }
                    "ArrowDown" => g.input.decelerate = true,
                    "r" | "R" => {
                        g.reset();
                        g.render();
                    }
                    "h" | "H" => {
                        g.toggle_hit_zones();
                        g.render();
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key release
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowUp" => g.input.accelerate = false,
                    "ArrowDown" => g.input.decelerate = false,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
            g.update_hud();
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
    log::info!("Oval Racer (native) starting...");
    log::info!("Native mode runs a headless autopilot race - run with `trunk serve` to play");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    let outcome = headless::race(seed, 20, 16.0);
    println!(
        "seed {}: {} laps, {} opponents, {}",
        seed,
        outcome.laps,
        outcome.opponents,
        if outcome.crashed { "crashed" } else { "finished" }
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted race without a window, used by the native binary
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use oval_racer::sim::{GameState, TickInput, get_distance, tick};

    /// Brake when an opponent is this close to the player center
    const BRAKE_DISTANCE: f64 = 150.0;
    /// Give up after this many frames
    const MAX_FRAMES: u32 = 200_000;

    pub struct Outcome {
        pub laps: u32,
        pub opponents: usize,
        pub crashed: bool,
    }

    /// Floor it unless traffic is near
    fn autopilot(state: &GameState) -> TickInput {
        let me = state.player.position(&state.track);
        let danger = state
            .opponents
            .iter()
            .any(|o| get_distance(me, o.position(&state.track)) < BRAKE_DISTANCE);
        TickInput {
            accelerate: !danger,
            decelerate: danger,
        }
    }

    pub fn race(seed: u64, target_laps: u32, frame_ms: f64) -> Outcome {
        let mut state = GameState::new(seed);
        state.start();

        let mut time = 0.0;
        for _ in 0..MAX_FRAMES {
            let input = autopilot(&state);
            tick(&mut state, &input, time);
            time += frame_ms;

            if state.is_halted() || state.score >= target_laps {
                break;
            }
        }

        if state.is_halted() {
            match serde_json::to_string(&state) {
                Ok(json) => log::debug!("Final state: {}", json),
                Err(e) => log::warn!("Could not snapshot state: {}", e),
            }
        }

        Outcome {
            laps: state.score,
            opponents: state.opponents.len(),
            crashed: state.is_halted(),
        }
    }
}
