// ==================== Imports ====================
use engine::GameLoop;
use game::TrappedInThePhone;
use wasm_bindgen::prelude::*;

pub mod assets;
pub mod audio;
pub mod background;
pub mod browser;
pub mod config;
pub mod dom;
pub mod engine;
pub mod game;
pub mod input_lock;
pub mod scenes;
pub mod session;
pub mod settings;
pub mod transition;
pub mod tween;
pub mod viewport;
pub mod widgets;

// ==================== Main Functions ====================
/// Main entry for Webassembly module
/// - installs panic hook and console logger
/// - preloads the manifest, then hands the stage to the game loop
#[wasm_bindgen]
pub fn main_js() -> Result<(), JsValue> {
    // setup better panic messages for debugging
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger already set : {}", err).into());
    }

    // spawns a new asynchronous task in local thread, for web assembly
    // environment, using wasm_bindgen_futures
    browser::spawn_local(async move {
        if let Err(err) = GameLoop::start(TrappedInThePhone::new()).await {
            log::error!("Could not start the game : {:#}", err);
        }
    });

    Ok(())
}
