use character_network::{App, init_logging};

// Used by the library; silences `unused_crate_dependencies` for the binary.
use console_error_panic_hook as _;
use console_log as _;
use leptos_meta as _;
use leptos_router as _;
use log as _;
use send_wrapper as _;
use serde as _;
use serde_json as _;
use thiserror as _;
use wasm_bindgen as _;
use web_sys as _;

#[cfg(test)]
use proptest as _;

fn main() {
	init_logging();
	leptos::mount::mount_to_body(App);
}
