//! Air Juggler entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlVideoElement};

    use air_juggler::persistence::LocalStorageStore;
    use air_juggler::platform::{HandSender, HandTracker, WebHandTracker, hand_channel};
    use air_juggler::renderer::{CanvasRenderer, build_frame};
    use air_juggler::{FrameControl, GameConfig, HighScoreStore, Session, Theme};

    /// Game instance holding all state
    struct Game {
        session: Session,
        renderer: CanvasRenderer,
        /// Taken out while initialization is awaited
        tracker: Option<WebHandTracker>,
        hand_sender: HandSender,
        tracking_ready: bool,
        animation_id: Option<i32>,
    }

    impl Game {
        fn render(&self) {
            let commands = build_frame(self.session.state(), self.session.config());
            if let Err(e) = self.renderer.render(&commands) {
                log::warn!("Render error: {:?}", e);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let state = self.session.state();

            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&state.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("highScore") {
                el.set_text_content(Some(&state.high_score.to_string()));
                let classes = el.class_list();
                let _ = if state.is_new_high_score {
                    classes.add_1("beating-record")
                } else {
                    classes.remove_1("beating-record")
                };
            }
        }

        /// Show the end-of-round overlay
        fn show_summary(&self, document: &Document) {
            let Some(summary) = self.session.summary() else {
                return;
            };
            if let Some(el) = document.get_element_by_id("overlayMessage") {
                el.set_inner_html(&summary.to_html());
            }
            if let Some(btn) = document.get_element_by_id("startButton") {
                btn.set_text_content(Some("Play Again"));
            }
            set_hidden(document, "overlay", false);
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let classes = el.class_list();
            let _ = if hidden {
                classes.add_1("hidden")
            } else {
                classes.remove_1("hidden")
            };
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }

        log::info!("Air Juggler starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let video: HtmlVideoElement = document
            .get_element_by_id("webcam")
            .ok_or("no webcam element")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let theme = window
            .location()
            .search()
            .ok()
            .and_then(|search| Theme::from_query(&search))
            .unwrap_or_default();
        let config = GameConfig::for_theme(theme)
            .with_arena(canvas.width() as f32, canvas.height() as f32);
        log::info!("Theme: {}", theme.as_str());

        let seed = js_sys::Date::now() as u64;
        let (hand_sender, hand_receiver) = hand_channel();
        let session = Session::new(
            config.clone(),
            seed,
            hand_receiver,
            HighScoreStore::new(LocalStorageStore),
        );
        log::info!("Game initialized with seed: {}", seed);

        let renderer = CanvasRenderer::new(
            ctx,
            Some(video.clone()),
            config.width as f64,
            config.height as f64,
        );
        let tracker = WebHandTracker::new(video, config.width, config.height);

        let game = Rc::new(RefCell::new(Game {
            session,
            renderer,
            tracker: Some(tracker),
            hand_sender,
            tracking_ready: false,
            animation_id: None,
        }));

        // Initial render
        game.borrow().render();
        set_hidden(&document, "loadingOverlay", true);

        setup_start_button(&document, game.clone());
        setup_visibility_handler(&document, game);

        log::info!("Air Juggler ready!");
        Ok(())
    }

    fn setup_start_button(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(btn) = document.get_element_by_id("startButton") else {
            log::error!("Start button missing");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let game = game.clone();
            wasm_bindgen_futures::spawn_local(async move { start_game(game).await });
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    async fn start_game(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if !game.borrow().tracking_ready {
            let taken = {
                let mut g = game.borrow_mut();
                g.tracker.take().map(|t| (t, g.hand_sender.clone()))
            };
            // A previous click is still initializing
            let Some((mut tracker, sender)) = taken else {
                return;
            };

            set_hidden(&document, "loadingOverlay", false);
            set_text(&document, "loadingStatus", "Loading hand tracking model...");
            let result = tracker.initialize(sender).await;
            set_hidden(&document, "loadingOverlay", true);

            let mut g = game.borrow_mut();
            if let Err(e) = result {
                log::error!("Hand tracking unavailable: {}", e);
                g.tracker = Some(tracker);
                set_text(&document, "overlayMessage", "Camera access required to play!");
                set_hidden(&document, "overlay", false);
                return;
            }
            tracker.start_detection();
            g.tracker = Some(tracker);
            g.tracking_ready = true;
        }

        {
            let mut g = game.borrow_mut();
            if let Some(id) = g.animation_id.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(id);
                }
            }
            g.session.start_round();
            g.update_hud(&document);
        }
        set_hidden(&document, "overlay", true);
        request_animation_frame(game);
    }

    /// Pause detection while the tab is hidden
    fn setup_visibility_handler(document: &Document, game: Rc<RefCell<Game>>) {
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            if !g.tracking_ready {
                return;
            }
            let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
            if let Some(tracker) = g.tracker.as_mut() {
                if hidden {
                    tracker.stop_detection();
                } else {
                    tracker.start_detection();
                }
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let handle = game.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => handle.borrow_mut().animation_id = Some(id),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let control = {
            let mut g = game.borrow_mut();
            g.animation_id = None;
            let control = g.session.frame(time);
            g.render();
            g.update_hud(&document);
            if control == FrameControl::Stop {
                g.show_summary(&document);
            }
            control
        };

        if control == FrameControl::Continue {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use clap::Parser;

    use air_juggler::consts::SIM_DT;
    use air_juggler::persistence::MemoryStore;
    use air_juggler::platform::hand_channel;
    use air_juggler::{ConfigError, FrameControl, GameConfig, HighScoreStore, Session, Theme};

    /// Headless autopilot round for smoke testing the simulation
    #[derive(Parser, Debug)]
    #[command(name = "air-juggler")]
    #[command(about = "Run a headless autopilot round of Air Juggler", long_about = None)]
    pub struct Args {
        /// Game variant (classic or neon); overrides the theme in --config
        #[arg(long, value_parser = parse_theme)]
        pub theme: Option<Theme>,

        /// Seconds to play after the countdown
        #[arg(long, default_value_t = 60)]
        pub seconds: u32,

        /// RNG seed
        #[arg(long, default_value_t = 42)]
        pub seed: u64,

        /// GameConfig JSON file; missing fields use defaults
        #[arg(long)]
        pub config: Option<PathBuf>,
    }

    fn parse_theme(name: &str) -> Result<Theme, String> {
        Theme::from_str(name).ok_or_else(|| format!("unknown theme '{}' (classic, neon)", name))
    }

    impl Args {
        /// Resolve the game config from the optional JSON file and theme flag
        pub fn game_config(&self) -> Result<GameConfig, ConfigError> {
            let mut config = match &self.config {
                Some(path) => GameConfig::from_json(&std::fs::read_to_string(path)?)?,
                None => GameConfig::default(),
            };
            if let Some(theme) = self.theme {
                config.apply_theme(theme);
            }
            Ok(config)
        }
    }

    /// Play one autopilot round against the simulated clock
    pub fn run(config: GameConfig, args: &Args) {
        log::info!("Theme: {}", config.theme.as_str());
        let (_tx, rx) = hand_channel();
        let memory = MemoryStore::new();
        let mut session = Session::new(config, args.seed, rx, HighScoreStore::new(memory));
        session.set_autopilot(true);
        session.start_round();

        let frame_ms = SIM_DT as f64 * 1000.0;
        let total_frames =
            ((session.config().countdown_secs + args.seconds as f32) / SIM_DT).ceil() as u64;
        let mut frames = 0;
        while frames < total_frames {
            if session.frame(frames as f64 * frame_ms) == FrameControl::Stop {
                break;
            }
            frames += 1;
        }

        let state = session.state();
        log::info!(
            "Finished after {} frames: score {}s, {} ball(s), {} challenge(s), gravity {:.2}",
            frames,
            state.score,
            state.balls.len(),
            state.challenge_history.len(),
            state.gravity
        );
        match session.summary() {
            Some(summary) => println!(
                "{} {} {}",
                summary.tier.emoji(),
                summary.tier.headline(),
                summary.detail()
            ),
            None => println!("Still juggling after {}s", state.score),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    log::info!("Air Juggler (native) starting...");
    log::info!(
        "Native mode runs a headless autopilot round - run with `trunk serve` for the web version"
    );

    let args = headless::Args::parse();
    let config = match args.game_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(2);
        }
    };
    headless::run(config, &args);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
