pub mod canvas;
pub mod runner;

pub use canvas::CanvasSurface;
pub use runner::MotionRunner;

/// Route panics and `log` output to the browser console. Safe to call more
/// than once; later calls keep the first logger.
pub fn init_console(level: log::Level) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(level);
}

/// Turn a setup error into a JS exception value.
pub fn to_js_error(err: zap_motion::MotionError) -> wasm_bindgen::JsValue {
    js_sys::Error::new(&err.to_string()).into()
}
