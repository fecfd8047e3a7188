use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, HtmlImageElement};
use zap_motion::{InputEvent, Scheduler};
use zap_motion_web::{to_js_error, CanvasSurface, MotionRunner};

pub mod config;
pub mod intro;

pub use config::{HexContent, IntroConfig, IntroTiming};
pub use intro::{build, Intro};

thread_local! {
    static RUNNER: RefCell<Option<MotionRunner<CanvasSurface>>> = RefCell::new(None);
}

/// Run `f` against the runner; `None` until `intro_init` has succeeded.
fn with_runner<R>(f: impl FnOnce(&mut MotionRunner<CanvasSurface>) -> R) -> Option<R> {
    RUNNER.with(|cell| cell.borrow_mut().as_mut().map(f))
}

#[wasm_bindgen]
pub fn intro_init(canvas: HtmlCanvasElement, config_json: &str) -> Result<(), JsValue> {
    zap_motion_web::init_console(log::Level::Info);

    let config = IntroConfig::from_json(config_json).map_err(to_js_error)?;
    let mut surface =
        CanvasSurface::new(canvas, config.timing.translation_factor()).map_err(to_js_error)?;
    for content in &config.shapes {
        surface.load_image(&content.src).map_err(to_js_error)?;
    }

    let mut scheduler = Scheduler::new(config.scheduler_config());
    build(&config, &mut scheduler).map_err(to_js_error)?;

    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(MotionRunner::new(scheduler, surface));
    });
    log::info!("hex-intro: initialized");
    Ok(())
}

/// Replace the image drawn for `src`, e.g. with one the page has preloaded.
#[wasm_bindgen]
pub fn intro_register_image(src: &str, image: HtmlImageElement) {
    with_runner(|r| r.surface_mut().register_image(src, image));
}

#[wasm_bindgen]
pub fn intro_tick(dt: f32) {
    with_runner(|r| {
        let origin = r.surface().page_origin();
        let size = r.surface().size();
        r.set_viewport(origin, size);

        r.tick(dt);

        for command in r.drain_commands() {
            r.surface().apply(&command);
        }
    });
}

#[wasm_bindgen]
pub fn intro_pointer_move(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
}

#[wasm_bindgen]
pub fn intro_click(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::Click { x, y }));
}

#[wasm_bindgen]
pub fn intro_key_down(key: String) {
    with_runner(|r| r.push_input(InputEvent::KeyDown { key }));
}
