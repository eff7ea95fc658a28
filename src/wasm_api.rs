use crate::report::{self, EvaluationResult};
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Evaluate a hand
///
/// # Arguments
/// * `hand_tiles` - JSON array of tile strings (e.g., ["R1", "B5", "O13"])
///
/// # Returns
/// JSON string with `success` and either a `report` (display form, score,
/// meld value, draw decision, scoring melds) or an `error`
#[wasm_bindgen]
pub fn evaluate_hand(hand_tiles: &str) -> String {
    report::to_json_string(EvaluationResult::from(report::evaluate_json(hand_tiles)))
}

/// Render a hand in display form ("{R1 R2 R3}")
#[wasm_bindgen]
pub fn render_hand(hand_tiles: &str) -> Result<String, JsValue> {
    report::hand_from_json(hand_tiles)
        .map(|hand| hand.render())
        .map_err(|e| JsValue::from_str(&e))
}

/// Get the git commit hash that this WASM module was built from
///
/// Returns the first 8 characters of the commit hash, or "unknown" if not available
#[wasm_bindgen]
pub fn get_build_commit() -> String {
    env!("BUILD_COMMIT").to_string()
}
