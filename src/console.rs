//! Diagnostics sink.
//!
//! In the browser build messages go straight to the devtools console; native
//! builds (tests, benches, host tools) go through the `log` facade.

/// Log a non-fatal problem the user might want to know about.
pub fn log_warning(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&msg.into());
    #[cfg(not(target_arch = "wasm32"))]
    log::warn!("{}", msg);
}

/// Log solver detail that is only interesting while tuning.
pub fn log_debug(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::debug_1(&msg.into());
    #[cfg(not(target_arch = "wasm32"))]
    log::debug!("{}", msg);
}
