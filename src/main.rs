//! Stardust Steps entry point
//!
//! On the web this wires DOM events and `requestAnimationFrame` to the
//! [`Experience`](stardust_steps::Experience). Natively it plays a scripted,
//! headless run and logs what the page would have shown.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, PointerEvent};

    use stardust_steps::platform::WebHost;
    use stardust_steps::renderer::CanvasSurface;
    use stardust_steps::sim::FrameTicket;
    use stardust_steps::{Experience, Settings};

    /// Everything the event closures share
    struct App {
        experience: Experience<WebHost>,
        surface: CanvasSurface,
        canvas: HtmlCanvasElement,
    }

    type SharedApp = Rc<RefCell<App>>;

    fn js_err(msg: &str) -> JsValue {
        JsValue::from_str(msg)
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Stardust Steps starting...");

        let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
        let document = window.document().ok_or_else(|| js_err("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| js_err("no canvas"))?
            .dyn_into()?;

        let (width, height) = window_size(&window);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let settings = canvas
            .get_attribute("data-settings")
            .map(|json| Settings::from_json_or_default(&json))
            .unwrap_or_default();
        let surface =
            CanvasSurface::new(&canvas).map_err(|e| js_err(&format!("canvas: {}", e)))?;
        let host = WebHost::new(settings.volume).ok_or_else(|| js_err("no document for host"))?;

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App {
            experience: Experience::new(settings, seed, width, height, host),
            surface,
            canvas: canvas.clone(),
        }));

        setup_pointer_handlers(&canvas, app.clone())?;
        setup_resize_handler(&window, app.clone())?;
        setup_buttons(&document, app)?;

        log::info!("Stardust Steps ready");
        Ok(())
    }

    fn window_size(window: &web_sys::Window) -> (f32, f32) {
        let w = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(800.0);
        let h = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(600.0);
        (w as f32, h as f32)
    }

    fn request_frame(app: SharedApp, ticket: FrameTicket) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame(app, ticket, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(app: SharedApp, ticket: FrameTicket, time: f64) {
        let tick = {
            let mut guard = app.borrow_mut();
            let App {
                experience,
                surface,
                ..
            } = &mut *guard;
            experience.render(ticket, time, surface)
        };
        if let Some(next) = tick.next() {
            request_frame(app, next);
        }
    }

    fn setup_pointer_handlers(canvas: &HtmlCanvasElement, app: SharedApp) -> Result<(), JsValue> {
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let (x, y) = (event.offset_x() as f32, event.offset_y() as f32);
                app.borrow_mut().experience.handle_pointer_down(x, y);
            });
            canvas.add_event_listener_with_callback(
                "pointerdown",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let (x, y) = (event.offset_x() as f32, event.offset_y() as f32);
                app.borrow_mut().experience.handle_pointer_move(x, y);
            });
            canvas.add_event_listener_with_callback(
                "pointermove",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        for (name, cancel) in [
            ("pointerup", false),
            ("pointerleave", false),
            ("pointercancel", true),
        ] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                let mut app = app.borrow_mut();
                if cancel {
                    app.experience.handle_pointer_cancel();
                } else {
                    app.experience.handle_pointer_up();
                }
            });
            canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_resize_handler(window: &web_sys::Window, app: SharedApp) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (w, h) = window_size(&window);
            let mut app = app.borrow_mut();
            app.canvas.set_width(w as u32);
            app.canvas.set_height(h as u32);
            app.experience.resize(w, h);
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_buttons(document: &web_sys::Document, app: SharedApp) -> Result<(), JsValue> {
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let ticket = app.borrow_mut().experience.start();
                if let Some(ticket) = ticket {
                    request_frame(app.clone(), ticket);
                }
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow_mut().experience.restart();
                log::info!("Back to start screen");
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    web_app::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), stardust_steps::ConfigError> {
    use stardust_steps::Settings;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Stardust Steps (native) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::from_file(&path)?,
        None => Settings::default(),
    };
    headless::play(settings);
    Ok(())
}

/// Scripted run against recording host and surface
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use stardust_steps::consts::NOMINAL_FRAME_MS;
    use stardust_steps::platform::{HostEvent, RecordingHost};
    use stardust_steps::renderer::RecordingSurface;
    use stardust_steps::{Experience, Settings};

    const WIDTH: f32 = 1280.0;
    const HEIGHT: f32 = 720.0;
    /// Safety net in case the run never ends
    const MAX_FRAMES: u32 = 60 * 60;

    pub fn play(settings: Settings) {
        let host = RecordingHost::with_name("Viajera");
        let mut experience = Experience::new(settings, 2024, WIDTH, HEIGHT, host);
        let mut surface = RecordingSurface::new();

        let Some(mut ticket) = experience.start() else {
            log::error!("Run did not start");
            return;
        };

        let mut now = 0.0;
        for frame in 0..MAX_FRAMES {
            // Tap every third frame, sweeping across the canvas, with a short drag
            if frame % 3 == 0 {
                let step = (frame / 3) as f32;
                let x = (step * 97.0) % WIDTH;
                let y = (step * 53.0) % HEIGHT;
                experience.handle_pointer_down(x, y);
                experience.handle_pointer_move(x + 12.0, y + 6.0);
                experience.handle_pointer_up();
            }

            surface.clear();
            let tick = experience.render(ticket, now, &mut surface);
            now += NOMINAL_FRAME_MS;
            match tick.next() {
                Some(next) => ticket = next,
                None => {
                    log::info!("Loop stopped after {} frames: {:?}", frame + 1, tick);
                    break;
                }
            }
        }

        for message in experience.host().messages() {
            println!("message: {}", message);
        }
        let ended = experience.host().events.iter().find_map(|e| match e {
            HostEvent::ShowEnd { name, text } => Some((name.clone(), text.clone())),
            _ => None,
        });
        match ended {
            Some((name, text)) => println!("{}: {}", name, text),
            None => println!(
                "Run unfinished at level {} ({} interactions)",
                experience.simulation().level() + 1,
                experience.simulation().progression.interactions()
            ),
        }
    }
}
