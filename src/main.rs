//! Spyder entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use spyder::consts::*;
    use spyder::platform::{OneShotTimer, notice_for};
    use spyder::renderer::{RenderState, build_scene, pipeline};
    use spyder::sim::{GameEvent, GameState, TickInput, tick};
    use spyder::{QualityPreset, Settings, clamp_to_grid, pixels_to_cell};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        /// Actions queued by input handlers, consumed by the next tick
        pending: TickInput,
        /// Surface size in physical pixels
        surface_size: (u32, u32),
        device_pixel_ratio: f32,
        death_screen: OneShotTimer,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            Self {
                state: GameState::new(seed),
                settings,
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                pending: TickInput::default(),
                surface_size: (1, 1),
                device_pixel_ratio: 1.0,
                death_screen: OneShotTimer::new(DEATH_SCREEN_DELAY_MS),
            }
        }

        /// Convert a mouse position (CSS pixels within the canvas) to a grid cell
        fn event_to_cell(&self, event: &MouseEvent) -> glam::IVec2 {
            let css = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
            let canvas_px =
                pipeline::surface_to_canvas(css * self.device_pixel_ratio, self.surface_size);
            clamp_to_grid(pixels_to_cell(canvas_px))
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                // One-shot inputs apply to the first substep only
                let input = std::mem::take(&mut self.pending);
                tick(&mut self.state, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
        }

        /// React to what happened during the last ticks
        fn handle_events(&mut self, now_ms: f64) {
            for event in self.state.drain_events() {
                if let Some(notice) = notice_for(&event) {
                    show_notice(notice);
                }
                if event == GameEvent::AvatarDied && self.death_screen.arm(now_ms) {
                    schedule_death_screen(self.death_screen.delay_ms());
                }
            }
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let vertices = build_scene(&self.state, &self.settings, (time / 1000.0) as f32);
            match render_state.render(&vertices) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&self.state.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("ammo") {
                el.set_text_content(Some(&self.state.avatar.ammo.to_string()));
            }
        }

        /// Keyboard toggles for presentation settings
        fn handle_key(&mut self, key: &str) {
            match key {
                "g" => self.settings.grid_lines = !self.settings.grid_lines,
                "t" => self.settings.target_marker = !self.settings.target_marker,
                "h" => self.settings.health_bars = !self.settings.health_bars,
                "m" => self.settings.reduced_motion = !self.settings.reduced_motion,
                "q" => {
                    let next = match self.settings.quality {
                        QualityPreset::Low => QualityPreset::Medium,
                        QualityPreset::Medium => QualityPreset::High,
                        QualityPreset::High => QualityPreset::Low,
                    };
                    self.settings.apply_preset(next);
                    log::info!("Quality: {}", next.as_str());
                }
                _ => return,
            }
            self.settings.save();
        }
    }

    fn show_notice(notice: spyder::platform::Notice) {
        let Some(overlay) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("ui-overlay"))
        else {
            return;
        };
        let tag = if notice.headline { "h1" } else { "p" };
        let style = notice
            .color
            .map(|c| format!(" style=\"color: {c}\""))
            .unwrap_or_default();
        overlay.set_inner_html(&format!("<{tag}{style}>{}</{tag}>", notice.text));
    }

    fn schedule_death_screen(delay_ms: f64) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move || {
            if let Err(e) = show_death_screen() {
                log::error!("Failed to show death screen: {:?}", e);
            }
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay_ms as i32,
        );
        closure.forget();
    }

    fn show_death_screen() -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let body = document.body().ok_or("no body")?;

        let comic = document.create_element("div")?;
        comic.set_id("comic-overlay");
        comic.set_inner_html(
            r#"<div class="comic-container">
                <h2 class="comic-title">THE END OF 5PYIDER</h2>
                <div class="comic-grid">
                    <div class="comic-panel panel-1"><div class="panel-text">THWIP!</div></div>
                    <div class="comic-panel panel-2"><div class="panel-text">BZZZT...</div></div>
                    <div class="comic-panel panel-3"><div class="panel-text">WHOOSH!</div></div>
                    <div class="comic-panel panel-4"><div class="panel-text">CRUNCH!</div></div>
                </div>
                <button id="retry-btn" class="retry-btn">RETRY MISSION</button>
            </div>"#,
        );
        body.append_child(&comic)?;

        if let Some(btn) = document.get_element_by_id("retry-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                if let Some(window) = web_sys::window() {
                    let _ = window.location().reload();
                }
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        log::info!("Death screen shown");
        Ok(())
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Spyder starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game-canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, Settings::load())));
        {
            let mut g = game.borrow_mut();
            g.surface_size = (width, height);
            g.device_pixel_ratio = dpr as f32;
        }
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone())?;

        // Start game loop
        request_animation_frame(game);

        log::info!("Spyder running!");
        Ok(())
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        // Left click: shoot
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let cell = g.event_to_cell(&event);
                g.pending.primary = Some(cell);
            });
            canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Right click: move / enter portal
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                let cell = g.event_to_cell(&event);
                g.pending.secondary = Some(cell);
            });
            canvas.add_event_listener_with_callback(
                "contextmenu",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Settings hotkeys
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().handle_key(&event.key().to_lowercase());
            });
            let document = web_sys::window()
                .and_then(|w| w.document())
                .ok_or("no document")?;
            document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
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

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.handle_events(time);
            g.render(time);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Spyder failed to start: {:?}", e);
    }
}

/// Headless run driven by the autopilot, for smoke-testing the simulation
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use spyder::consts::*;
    use spyder::platform::{OneShotTimer, notice_for};
    use spyder::sim::{Dimension, GameEvent, GameState, autopilot, tick};

    /// Ten minutes of play
    const MAX_FRAMES: u64 = 60 * 60 * 10;
    /// How long to linger on the finale
    const FINALE_FRAMES: u32 = 180;

    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(0x5eed);
    log::info!("Spyder (native, headless) starting with seed {}", seed);

    let mut state = GameState::new(seed);
    let mut death_screen = OneShotTimer::new(DEATH_SCREEN_DELAY_MS);
    let frame_ms = f64::from(SIM_DT) * 1000.0;

    for frame in 0..MAX_FRAMES {
        let input = autopilot(&state);
        tick(&mut state, &input);
        let now_ms = frame as f64 * frame_ms;

        for event in state.drain_events() {
            match event {
                GameEvent::AvatarHit { health } => log::info!("Hit! health {}", health),
                GameEvent::AvatarDied => {
                    death_screen.arm(now_ms);
                }
                _ => {}
            }
            if let Some(notice) = notice_for(&event) {
                log::info!("[frame {}] {}", frame, notice.text);
            }
        }

        if death_screen.poll(now_ms) {
            log::info!("Death screen after {} ms", death_screen.delay_ms());
            break;
        }
        if state.dimension == Dimension::Finale && state.finale_ticks >= FINALE_FRAMES {
            break;
        }
    }

    log::info!(
        "Finished in dimension {} after {} frames: score {}, health {}, ammo {}",
        state.dimension.number(),
        state.time_ticks,
        state.score,
        state.avatar.health,
        state.avatar.ammo
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
