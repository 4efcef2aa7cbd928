//! Duel Pong entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, KeyboardEvent};

    use duel_pong::audio::AudioManager;
    use duel_pong::frame::{FrameDriver, ScoreBoard};
    use duel_pong::renderer::InstancedRenderer;
    use duel_pong::sim::Scores;
    use duel_pong::{GameConfig, InitError, RenderError, Settings};

    const CANVAS_ID: &str = "glcanvas";
    const INIT_FAILED_ALERT: &str =
        "Unable to initialize WebGL. Your browser or machine may not support it.";
    const MUTE_KEYS: [&str; 2] = ["m", "M"];

    /// Score text in the page
    struct DomScoreBoard {
        left: Option<Element>,
        right: Option<Element>,
    }

    impl DomScoreBoard {
        fn new(document: &Document) -> Self {
            let left = document.get_element_by_id("left-player");
            let right = document.get_element_by_id("right-player");
            if left.is_none() || right.is_none() {
                log::warn!("Score elements missing; scores will not be shown");
            }
            Self { left, right }
        }
    }

    impl ScoreBoard for DomScoreBoard {
        fn show(&mut self, scores: Scores) {
            if let Some(el) = &self.left {
                el.set_text_content(Some(&scores.left.to_string()));
            }
            if let Some(el) = &self.right {
                el.set_text_content(Some(&scores.right.to_string()));
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        driver: FrameDriver,
        renderer: InstancedRenderer,
        audio: AudioManager,
        scoreboard: DomScoreBoard,
    }

    impl Game {
        /// Tick, dispatch and draw one frame
        fn frame(&mut self, time: f64) {
            let Game {
                driver,
                renderer,
                audio,
                scoreboard,
            } = self;

            match driver.frame(time, renderer, audio, scoreboard) {
                Ok(_) => {}
                Err(RenderError::SurfaceLost) => renderer.reconfigure(),
                Err(RenderError::OutOfMemory) => log::error!("Out of memory!"),
                Err(e) => log::warn!("Render error: {}", e),
            }
        }

        fn handle_key(&mut self, key: &str, pressed: bool, repeat: bool) {
            if pressed && !repeat && MUTE_KEYS.contains(&key) {
                self.audio.toggle_mute();
            }
            self.driver.set_key(key, pressed);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Duel Pong starting...");

        if let Err(e) = start().await {
            log::error!("Initialization failed: {}", e);
            if let Some(window) = web_sys::window() {
                let _ = window.alert_with_message(INIT_FAILED_ALERT);
            }
        }
    }

    async fn start() -> Result<(), InitError> {
        let window = web_sys::window().ok_or(InitError::NoWindow)?;
        let document = window.document().ok_or(InitError::NoDocument)?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .and_then(|el| el.dyn_into().ok())
            .ok_or_else(|| InitError::CanvasNotFound(CANVAS_ID.to_string()))?;

        // Geometry follows the canvas attributes for the whole session
        let width = canvas.width();
        let height = canvas.height();
        let config = GameConfig::for_screen(width as f32, height as f32);
        log::info!("Canvas {}x{}", width, height);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas))
            .map_err(|e| InitError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| InitError::Adapter(e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let mut renderer = InstancedRenderer::new(surface, &adapter, width, height, &config).await?;
        let mut scoreboard = DomScoreBoard::new(&document);
        let audio = AudioManager::new(Settings::load(), js_sys::Date::now() as u64);

        let driver = FrameDriver::new(config);
        driver.init_scene(&mut renderer, &mut scoreboard);

        let game = Rc::new(RefCell::new(Game {
            driver,
            renderer,
            audio,
            scoreboard,
        }));

        setup_key_handlers(&window, game.clone());

        request_animation_frame(game);

        log::info!("Duel Pong running!");
        Ok(())
    }

    fn setup_key_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        for (event_name, pressed) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut()
                    .handle_key(&event.key(), pressed, event.repeat());
            });
            let _ = window.add_event_listener_with_callback_and_bool(
                event_name,
                closure.as_ref().unchecked_ref(),
                true,
            );
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
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;

    use duel_pong::GameConfig;
    use duel_pong::RenderError;
    use duel_pong::audio::LoggingSound;
    use duel_pong::frame::{Entity, FrameDriver, Renderer, ScoreBoard};
    use duel_pong::sim::{GameEvent, Scores, Side};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Counts draws without a graphics context
    #[derive(Default)]
    struct NullRenderer {
        draws: u64,
    }

    impl Renderer for NullRenderer {
        fn update_instance_positions(&mut self, entity: Entity, positions: &[Vec2]) {
            log::trace!("{:?}: {:?}", entity, positions);
        }

        fn draw_frame(&mut self) -> Result<(), RenderError> {
            self.draws += 1;
            Ok(())
        }
    }

    struct LogScoreBoard;

    impl ScoreBoard for LogScoreBoard {
        fn show(&mut self, scores: Scores) {
            log::info!("Score {} - {}", scores.left, scores.right);
        }
    }

    /// Hold the keys that move each paddle toward an approaching ball,
    /// drifting back to center otherwise
    fn track_ball(driver: &mut FrameDriver) {
        let ball = driver.state.ball;
        let center_y = driver.config().screen_center().y;
        let speed = driver.config().paddle_speed;
        let keys = driver.config().keys.clone();

        for (side, up, down) in [
            (Side::Left, &keys.left_up, &keys.left_down),
            (Side::Right, &keys.right_up, &keys.right_down),
        ] {
            let paddle_y = driver.state.paddles.get(side).pos.y;
            let approaching = ball.vel.x * side.outward_sign() < 0.0;
            let target = if approaching { ball.pos.y } else { center_y };
            driver.set_key(up, target > paddle_y + speed);
            driver.set_key(down, target < paddle_y - speed);
        }
    }

    pub fn run(frames: u64) {
        let mut driver = FrameDriver::new(GameConfig::default());
        let mut renderer = NullRenderer::default();
        let mut sound = LoggingSound::new(0);
        let mut scoreboard = LogScoreBoard;

        driver.init_scene(&mut renderer, &mut scoreboard);

        let mut paddle_hits = 0u64;
        for frame in 0..frames {
            track_ball(&mut driver);
            let now = frame as f64 * FRAME_MS;
            match driver.frame(now, &mut renderer, &mut sound, &mut scoreboard) {
                Ok(events) => {
                    paddle_hits += events
                        .iter()
                        .filter(|e| matches!(e, GameEvent::PaddleHit { .. }))
                        .count() as u64;
                }
                Err(e) => log::warn!("Render error: {}", e),
            }
        }

        let scores = driver.state.scores;
        log::info!(
            "Final score {} - {} after {} frames ({} draws, {} paddle hits, {} cues)",
            scores.left,
            scores.right,
            frames,
            renderer.draws,
            paddle_hits,
            sound.played.len()
        );
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Duel Pong (native) starting...");
    log::info!("Native mode runs a headless match; build for wasm32 to play in the browser");

    let frames = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(60 * 60);
    headless::run(frames);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
