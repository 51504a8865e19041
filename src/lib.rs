pub mod console;
pub mod error;
pub mod physics;
pub mod request;

pub use error::{PuckError, PuckResult};
pub use request::BrewRequest;

use physics::{BasketSpec, DEFAULT_COLS, DEFAULT_ROWS};
use wasm_bindgen::prelude::*;

/// Run one simulation from a JSON brew request and return the result as JSON.
///
/// Missing request fields take the standard 18 g defaults; a zero `rows` or
/// `cols` selects the default 32 × 20 grid. Only malformed JSON is rejected.
pub fn simulate_json(request_json: &str, rows: usize, cols: usize) -> PuckResult<String> {
    let request = BrewRequest::from_json(request_json)?;
    let rows = if rows == 0 { DEFAULT_ROWS } else { rows };
    let cols = if cols == 0 { DEFAULT_COLS } else { cols };
    let result = physics::simulate_with(&request.to_parameters(), rows, cols, &request.solver);
    request::result_to_json(&result)
}

/// WASM entry point for the simulator; run it from a web worker so the
/// relaxation never blocks the UI thread.
#[wasm_bindgen]
pub fn simulate_puck(request_json: &str, rows: usize, cols: usize) -> Result<String, JsValue> {
    simulate_json(request_json, rows, cols).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Known baskets as a JSON array
#[wasm_bindgen]
pub fn basket_catalog() -> String {
    serde_json::to_string(BasketSpec::catalog()).unwrap_or_else(|e| {
        console::log_warning(&format!("Puck: could not serialize basket catalog: {}", e));
        "[]".to_string()
    })
}

/// Install the panic hook so Rust panics show up in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulate_json_defaults() {
        let json = simulate_json("{}", 0, 0).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["rows"], 32);
        assert_eq!(value["cols"], 20);
        let drop = value["average_pressure_drop"].as_f64().unwrap();
        assert!((drop - 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_simulate_json_rejects_garbage() {
        assert!(matches!(simulate_json("not json", 8, 4), Err(PuckError::InvalidRequest(_))));
    }

    #[test]
    fn test_basket_catalog_json() {
        let value: serde_json::Value = serde_json::from_str(&basket_catalog()).unwrap();
        let baskets = value.as_array().unwrap();
        assert_eq!(baskets.len(), 6);
        assert!(baskets.iter().any(|b| b["id"] == "decent_tea"));
    }
}
