//! Starfall entry point
//!
//! Handles platform-specific initialization and runs the frame loop. The
//! page decides the mode: the standalone `minigame.html` page gets the
//! arcade run, every other page hosts the attract-mode layer.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use glam::Vec2;
    use starfall::Settings;
    use starfall::render::{CanvasSurface, draw_frame};
    use starfall::sim::{
        Destination, GameEvent, GameState, HeldKeys, Mode, TickInput, tick,
    };

    /// Key map + pointer tracking, written by event handlers and snapshotted
    /// once per frame.
    #[derive(Default)]
    struct InputState {
        keys: HeldKeys,
        pointer_moved: Option<Vec2>,
    }

    impl InputState {
        fn take_frame(&mut self) -> TickInput {
            TickInput {
                keys: self.keys,
                pointer: self.pointer_moved.take(),
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        surface: CanvasSurface,
        settings: Settings,
        input: InputState,
        /// Set when the mini-game transition dispatched; no more frames.
        halted: bool,
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Starfall starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let pathname = window.location().pathname().unwrap_or_default();
        let mode = Mode::from_pathname(&pathname);
        log::info!("Mode {:?} for page {}", mode, pathname);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("universeCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let (width, height) = viewport_size(&window);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let surface = CanvasSurface::new(&canvas).expect("canvas has no 2d context");

        let seed = js_sys::Date::now() as u64;
        let state = GameState::new(mode, Vec2::new(width as f32, height as f32), seed);
        log::info!("Game initialized with seed: {seed}");

        let game = Rc::new(RefCell::new(Game {
            state,
            surface,
            settings: Settings::load(),
            input: InputState::default(),
            halted: false,
        }));

        setup_resize_handler(&canvas, game.clone());
        setup_input_handlers(&canvas, game.clone());

        request_animation_frame(game);

        log::info!("Starfall running!");
    }

    fn viewport_size(window: &web_sys::Window) -> (f64, f64) {
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(800.0);
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(600.0);
        (width, height)
    }

    fn setup_resize_handler(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let canvas = canvas.clone();
        // Immediate, not debounced; the sim re-clamps on the next tick.
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if let Some(window) = web_sys::window() {
                let (width, height) = viewport_size(&window);
                canvas.set_width(width as u32);
                canvas.set_height(height as u32);
                game.borrow_mut()
                    .state
                    .set_bounds(Vec2::new(width as f32, height as f32));
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Keyboard: arrows move, up fires. Recognized keys are swallowed so
        // the page does not scroll underneath the game.
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let keys = &mut g.input.keys;
                let recognized = match event.key().as_str() {
                    "ArrowLeft" => {
                        keys.left = true;
                        true
                    }
                    "ArrowRight" => {
                        keys.right = true;
                        true
                    }
                    "ArrowDown" => {
                        keys.down = true;
                        true
                    }
                    "ArrowUp" => {
                        keys.fire = true;
                        true
                    }
                    _ => false,
                };
                if recognized {
                    event.prevent_default();
                }
            });
            let _ =
                window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let keys = &mut g.input.keys;
                match event.key().as_str() {
                    "ArrowLeft" => keys.left = false,
                    "ArrowRight" => keys.right = false,
                    "ArrowDown" => keys.down = false,
                    "ArrowUp" => keys.fire = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer position in canvas-local coordinates.
        {
            let game = game.clone();
            let canvas = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = canvas.get_bounding_client_rect();
                let pos = Vec2::new(
                    event.client_x() as f32 - rect.left() as f32,
                    event.client_y() as f32 - rect.top() as f32,
                );
                game.borrow_mut().input.pointer_moved = Some(pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        let halt = {
            let mut g = game.borrow_mut();

            let input = g.input.take_frame();
            tick(&mut g.state, &input);

            for event in g.state.drain_events() {
                match event {
                    GameEvent::Navigate(dest) => {
                        log::info!("Navigating to {:?}", dest);
                        navigate(dest);
                        if dest == Destination::MiniGame {
                            g.halted = true;
                        }
                    }
                }
            }

            {
                let Game {
                    state,
                    surface,
                    settings,
                    ..
                } = &mut *g;
                draw_frame(state, settings, surface);
            }
            update_score_readout(&g.state);

            if g.state.is_game_over() {
                log::info!(
                    "Game over: score {}, session best {}",
                    g.state.score,
                    g.state.session_high_score
                );
            }
            g.halted || g.state.is_game_over()
        };

        // Terminal states stop the loop; only a reload restarts it.
        if !halt {
            request_animation_frame(game);
        }
    }

    /// Page URLs for each destination. Environment-specific on purpose; the
    /// simulation only ever names the [`Destination`].
    fn destination_url(dest: Destination) -> &'static str {
        match dest {
            Destination::Portfolio => "portfolio.html",
            Destination::About => "about.html",
            Destination::Contact => "contact.html",
            Destination::MiniGame => "minigame.html",
        }
    }

    fn navigate(dest: Destination) {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(destination_url(dest));
        }
    }

    /// Write the score into the page's readout, if the page has one.
    fn update_score_readout(state: &GameState) {
        let document = web_sys::window().and_then(|w| w.document());
        if let Some(el) = document.and_then(|d| d.get_element_by_id("score")) {
            el.set_text_content(Some(&format!("Score: {}", state.score)));
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use starfall::sim::{GameState, HeldKeys, Mode, TickInput, tick};

    env_logger::init();
    log::info!("Starfall (native) starting...");
    log::info!("Native mode is a headless demo - serve the wasm build for the real game");

    // Scripted mini-game run: fire in bursts, drift left and right.
    let mut state = GameState::new(Mode::MiniGame, Vec2::new(800.0, 600.0), 7);
    let mut frames = 0u32;
    while !state.is_game_over() && frames < 36_000 {
        let input = TickInput {
            keys: HeldKeys {
                fire: frames % 40 < 20,
                left: frames % 400 < 200,
                right: frames % 400 >= 200,
                ..Default::default()
            },
            ..Default::default()
        };
        tick(&mut state, &input);
        frames += 1;
    }

    println!(
        "demo run: {} frames, score {}, session best {}",
        state.elapsed, state.score, state.session_high_score
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
