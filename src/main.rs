//! Dot Pop entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, HtmlCanvasElement, HtmlInputElement, MouseEvent, TouchEvent,
    };

    use dot_pop::consts::*;
    use dot_pop::render::draw_frame;
    use dot_pop::settings::Settings;
    use dot_pop::sim::{GameState, handle_click, spawn_dot, tick};
    use glam::Vec2;

    /// Game instance holding all state
    struct App {
        state: GameState,
        ctx: CanvasRenderingContext2d,
        settings: Settings,
        last_time: f64,
    }

    impl App {
        /// One display frame: measure the real tick rate, advance the sim,
        /// draw, refresh the HUD.
        fn frame(&mut self, time: f64) {
            if self.last_time > 0.0 {
                let dt_ms = time - self.last_time;
                if dt_ms > 0.0 {
                    self.state.set_frame_rate(1000.0 / dt_ms as f32);
                }
            }
            self.last_time = time;

            tick(&mut self.state, time);
            draw_frame(&self.ctx, &self.state);
            self.update_hud();
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&self.state.score.to_string()));
            }

            if let Some(el) = document.get_element_by_id("toggle-btn") {
                el.set_text_content(Some(self.state.button_label()));
            }

            if let Some(el) = document.get_element_by_id("instructions") {
                let class = if self.state.show_instructions() {
                    "app-instructions"
                } else {
                    "app-instructions hidden"
                };
                let _ = el.set_attribute("class", class);
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Dot Pop starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Canvas backing size = CSS size, so pointer offsets map 1:1 to sim
        // coordinates.
        let width = canvas.client_width() as u32;
        let height = canvas.client_height() as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let seed = js_sys::Date::now() as u64;
        let mut state = GameState::new(seed, width as f32, height as f32);

        let settings = Settings::load();
        state.set_velocity(settings.velocity);
        state.set_brutal(settings.brutal);

        log::info!("Game initialized with seed: {seed}");

        let app = Rc::new(RefCell::new(App {
            state,
            ctx,
            settings,
            last_time: 0.0,
        }));

        sync_controls(&document, &app.borrow().settings);
        setup_resize(&canvas, app.clone());
        setup_click_handlers(&canvas, app.clone());
        setup_controls(app.clone());
        setup_auto_pause(app.clone());
        setup_spawn_interval(app.clone());

        request_animation_frame(app);

        log::info!("Dot Pop running!");
    }

    /// Reflect loaded settings into the slider and checkbox.
    fn sync_controls(document: &web_sys::Document, settings: &Settings) {
        if let Some(slider) = document
            .get_element_by_id("velocity-slider")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            slider.set_value_as_number(settings.velocity as f64);
        }
        if let Some(checkbox) = document
            .get_element_by_id("brutal-checkbox")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            checkbox.set_checked(settings.brutal);
        }
    }

    /// Re-query the canvas size when the window changes.
    fn setup_resize(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let width = canvas.client_width() as u32;
            let height = canvas.client_height() as u32;
            canvas.set_width(width);
            canvas.set_height(height);
            app.borrow_mut().state.resize(width as f32, height as f32);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_click_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Mouse click -> hit test at the canvas-local position
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                let now = js_sys::Date::now();
                let pos = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                handle_click(&mut a.state, pos, now);
            });
            let _ =
                canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch tap
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    let mut a = app.borrow_mut();
                    let now = js_sys::Date::now();
                    handle_click(&mut a.state, Vec2::new(x, y), now);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_controls(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Start/pause button
        if let Some(btn) = document.get_element_by_id("toggle-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().state.toggle();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Velocity slider: applies to newly spawned dots only
        if let Some(slider) = document
            .get_element_by_id("velocity-slider")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            let app = app.clone();
            let slider_clone = slider.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let velocity = slider_clone.value_as_number() as i32;
                let mut a = app.borrow_mut();
                a.state.set_velocity(velocity);
                let velocity = a.state.velocity;
                a.settings.velocity = velocity;
                a.settings.save();
            });
            let _ =
                slider.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Brutal mode checkbox
        if let Some(checkbox) = document
            .get_element_by_id("brutal-checkbox")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            let checkbox_clone = checkbox.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let brutal = checkbox_clone.checked();
                let mut a = app.borrow_mut();
                a.state.set_brutal(brutal);
                a.settings.brutal = brutal;
                a.settings.save();
            });
            let _ = checkbox
                .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    app.borrow_mut().state.focus_lost();
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().state.focus_lost();
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// One new dot per second; the interval keeps firing while paused and the
    /// spawner itself no-ops.
    fn setup_spawn_interval(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut()>::new(move || {
            spawn_dot(&mut app.borrow_mut().state);
        });
        let _ = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            SPAWN_INTERVAL_MS,
        );
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
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
    log::info!("Dot Pop (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    headless_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive the sim for ten simulated seconds at 60 fps, popping the lowest dot
/// every half second, and print the result.
#[cfg(not(target_arch = "wasm32"))]
fn headless_demo() {
    use dot_pop::sim::{GameState, handle_click, spawn_dot, tick};
    use glam::Vec2;

    let seed = 0xD07;
    let mut state = GameState::new(seed, 800.0, 600.0);
    state.set_velocity(60);
    state.set_brutal(true);
    state.toggle();

    for frame in 0u64..600 {
        let now_ms = frame as f64 * (1000.0 / 60.0);
        if frame % 60 == 0 {
            spawn_dot(&mut state);
        }
        if frame % 30 == 15 {
            let target = state
                .dots
                .iter()
                .max_by(|a, b| a.y.total_cmp(&b.y))
                .map(|d| Vec2::new(d.x, d.y));
            if let Some(pos) = target {
                handle_click(&mut state, pos, now_ms);
            }
        }
        tick(&mut state, now_ms);
    }

    println!(
        "seed {seed:#x}: score {} with {} dots and {} particles in play",
        state.score,
        state.dots.len(),
        state.particles.len()
    );
}
