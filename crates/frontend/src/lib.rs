pub mod app;
pub mod domain;
pub mod layout;
pub mod routes;
pub mod shared;
pub mod system;

use wasm_bindgen::prelude::wasm_bindgen;

/// Debug builds log every request; release builds keep to outcomes.
fn log_level() -> log::Level {
    if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    }
}

/// Installs logging and the panic hook, then mounts [`app::App`].
pub fn mount() {
    _ = console_log::init_with_level(log_level());
    console_error_panic_hook::set_once();
    log::info!("office admin starting, api base {}", shared::api_utils::api_base());

    leptos::mount::mount_to_body(app::App);
}

#[wasm_bindgen(start)]
pub fn start() {
    mount();
}
