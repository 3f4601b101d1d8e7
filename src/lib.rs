pub mod actuator;
pub mod automata;
pub mod engine;
pub mod error;
pub mod grid;
pub mod knobs;
pub mod patch;
pub mod rng;
pub mod vm;

use crate::actuator::ActuatorEvent;
use crate::error::PatchError;
use crate::patch::Patch;
use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the plaguesynth-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// Boot the machine a JSON patch describes, run it for `ticks` ticks,
/// and return every actuator write in order.
pub fn run_patch(source: &str, ticks: u32) -> Result<Vec<ActuatorEvent>, PatchError> {
    let mut engine = Patch::from_json(source)?.build()?;
    engine.run(ticks);
    Ok(engine.vm.sink.events)
}

/// WASM-exposed: run a JSON patch and return the actuator event trace
/// as a JS array of `{target, value}` objects.
#[wasm_bindgen]
pub fn run_patch_trace(source: &str, ticks: u32) -> Result<JsValue, JsValue> {
    let events = run_patch(source, ticks).map_err(|e| JsValue::from_str(&format!("{e}")))?;
    serde_wasm_bindgen::to_value(&events).map_err(|e| JsValue::from_str(&format!("{e}")))
}
