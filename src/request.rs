use crate::console::log_warning;
use crate::error::{PuckError, PuckResult};
use crate::physics::{BasketSpec, BrewParameters, SimulationResult, SolverConfig, DEFAULT_BASKET_ID};
use serde::{Deserialize, Serialize};

/// Brew parameters as sent by the UI. Missing fields take the defaults of a
/// standard 18 g shot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrewRequest {
    #[serde(default = "default_grind")]
    pub grind_size_microns: f64,
    #[serde(default = "default_dose")]
    pub dose_grams: f64,
    #[serde(default = "default_tamp")]
    pub tamp_pressure_kg: f64,
    #[serde(default = "default_bean_density")]
    pub bean_density: f64,
    #[serde(default = "default_moisture")]
    pub moisture_content: f64,
    #[serde(default = "default_brew_pressure")]
    pub brew_pressure_bar: f64,
    #[serde(default = "default_water_temp")]
    pub water_temp_c: f64,
    #[serde(default = "default_distribution_quality")]
    pub distribution_quality: f64,
    #[serde(default = "default_basket")]
    pub basket: String,
    /// Overrides the basket's valve pressure (bar), if present
    #[serde(default)]
    pub back_pressure_bar: Option<f64>,
    #[serde(default)]
    pub solver: SolverConfig,
}

fn default_grind() -> f64 {
    400.0
}

fn default_dose() -> f64 {
    18.0
}

fn default_tamp() -> f64 {
    15.0
}

fn default_bean_density() -> f64 {
    1.15
}

fn default_moisture() -> f64 {
    0.10
}

fn default_brew_pressure() -> f64 {
    9.0
}

fn default_water_temp() -> f64 {
    93.0
}

fn default_distribution_quality() -> f64 {
    0.85
}

fn default_basket() -> String {
    DEFAULT_BASKET_ID.to_string()
}

impl Default for BrewRequest {
    fn default() -> Self {
        Self {
            grind_size_microns: default_grind(),
            dose_grams: default_dose(),
            tamp_pressure_kg: default_tamp(),
            bean_density: default_bean_density(),
            moisture_content: default_moisture(),
            brew_pressure_bar: default_brew_pressure(),
            water_temp_c: default_water_temp(),
            distribution_quality: default_distribution_quality(),
            basket: default_basket(),
            back_pressure_bar: None,
            solver: SolverConfig::default(),
        }
    }
}

impl BrewRequest {
    pub fn from_json(json: &str) -> PuckResult<Self> {
        serde_json::from_str(json).map_err(PuckError::InvalidRequest)
    }

    /// Resolve the basket id. Unknown ids fall back to the standard basket.
    pub fn basket_spec(&self) -> BasketSpec {
        let mut basket = match BasketSpec::by_id(&self.basket) {
            Some(b) => *b,
            None => {
                log_warning(&format!(
                    "Puck: unknown basket '{}', using {}",
                    self.basket, DEFAULT_BASKET_ID
                ));
                *BasketSpec::standard()
            }
        };
        if let Some(bar) = self.back_pressure_bar {
            basket.back_pressure_bar = bar.max(0.0);
            basket.has_back_pressure_valve = bar > 0.0;
        }
        basket
    }

    pub fn to_parameters(&self) -> BrewParameters {
        BrewParameters {
            grind_size_microns: self.grind_size_microns,
            dose_grams: self.dose_grams,
            tamp_pressure_kg: self.tamp_pressure_kg,
            bean_density: self.bean_density,
            moisture_content: self.moisture_content,
            brew_pressure_bar: self.brew_pressure_bar,
            water_temp_c: self.water_temp_c,
            distribution_quality: self.distribution_quality,
            basket: self.basket_spec(),
        }
    }
}

pub fn result_to_json(result: &SimulationResult) -> PuckResult<String> {
    serde_json::to_string(result).map_err(PuckError::Serialize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_request_is_standard_shot() {
        let request = BrewRequest::from_json("{}").unwrap();
        assert_eq!(request, BrewRequest::default());
        assert_eq!(request.to_parameters(), BrewParameters::default());
    }

    #[test]
    fn test_partial_request() {
        let request =
            BrewRequest::from_json(r#"{"grind_size_microns": 250, "basket": "decent_20g"}"#).unwrap();
        let params = request.to_parameters();
        assert!((params.grind_size_microns - 250.0).abs() < 1e-12);
        assert_eq!(params.basket.id, "decent_20g");
        assert!((params.dose_grams - 18.0).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_basket_falls_back() {
        let request = BrewRequest {
            basket: "mystery".to_string(),
            ..Default::default()
        };
        assert_eq!(request.basket_spec().id, DEFAULT_BASKET_ID);
    }

    #[test]
    fn test_back_pressure_override() {
        let request = BrewRequest {
            basket: "decent_tea".to_string(),
            back_pressure_bar: Some(0.0),
            ..Default::default()
        };
        let basket = request.basket_spec();
        assert!(!basket.has_back_pressure_valve);
        assert_eq!(basket.exit_pressure_pa(), 0.0);

        let request = BrewRequest {
            back_pressure_bar: Some(1.5),
            ..Default::default()
        };
        assert!((request.basket_spec().exit_pressure_pa() - 1.5e5).abs() < 1e-9);
    }

    #[test]
    fn test_malformed_json_is_error() {
        let err = BrewRequest::from_json("{\"dose_grams\": \"lots\"}").unwrap_err();
        assert!(matches!(err, PuckError::InvalidRequest(_)));
        assert!(err.to_string().starts_with("invalid brew request"));
    }

    #[test]
    fn test_result_serializes() {
        let params = BrewRequest::default().to_parameters();
        let result = crate::physics::simulate(&params, 8, 4);
        let json = result_to_json(&result).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["rows"], 8);
        assert_eq!(value["cols"], 4);
        assert!(value["total_flow_rate"].as_f64().unwrap() > 0.0);
        assert_eq!(value["grid"]["data"].as_array().unwrap().len(), 32);
    }
}
