use serde::Serialize;

/// Geometry and hardware of a portafilter basket
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BasketSpec {
    pub id: &'static str,
    pub name: &'static str,
    /// Inner diameter in mm
    pub diameter_mm: f64,
    /// Depth in mm
    pub depth_mm: f64,
    /// Nominal dry dose in g
    pub nominal_dose_g: f64,
    pub hole_count: u32,
    /// Screen hole diameter in mm
    pub hole_diameter_mm: f64,
    pub has_back_pressure_valve: bool,
    /// Valve opening pressure in bar (0 without a valve)
    pub back_pressure_bar: f64,
    pub description: &'static str,
}

/// Fallback basket for unknown ids
pub const DEFAULT_BASKET_ID: &str = "decent_18g";

const CATALOG: [BasketSpec; 6] = [
    BasketSpec {
        id: "decent_7g",
        name: "Decent 7g Single",
        diameter_mm: 58.5,
        depth_mm: 12.0,
        nominal_dose_g: 7.0,
        hole_count: 300,
        hole_diameter_mm: 0.30,
        has_back_pressure_valve: false,
        back_pressure_bar: 0.0,
        description: "Shallow single-shot basket",
    },
    BasketSpec {
        id: "decent_15g",
        name: "Decent 15g",
        diameter_mm: 58.5,
        depth_mm: 19.0,
        nominal_dose_g: 15.0,
        hole_count: 480,
        hole_diameter_mm: 0.30,
        has_back_pressure_valve: false,
        back_pressure_bar: 0.0,
        description: "Reduced-dose double basket",
    },
    BasketSpec {
        id: "decent_18g",
        name: "Decent 18g",
        diameter_mm: 58.5,
        depth_mm: 22.0,
        nominal_dose_g: 18.0,
        hole_count: 580,
        hole_diameter_mm: 0.30,
        has_back_pressure_valve: false,
        back_pressure_bar: 0.0,
        description: "Standard precision double basket",
    },
    BasketSpec {
        id: "decent_20g",
        name: "Decent 20g",
        diameter_mm: 58.5,
        depth_mm: 24.0,
        nominal_dose_g: 20.0,
        hole_count: 620,
        hole_diameter_mm: 0.30,
        has_back_pressure_valve: false,
        back_pressure_bar: 0.0,
        description: "Deep double basket for larger doses",
    },
    BasketSpec {
        id: "vst_20g",
        name: "VST 20g Ridgeless",
        diameter_mm: 58.5,
        depth_mm: 25.5,
        nominal_dose_g: 20.0,
        hole_count: 660,
        hole_diameter_mm: 0.28,
        has_back_pressure_valve: false,
        back_pressure_bar: 0.0,
        description: "Straight-walled precision basket",
    },
    BasketSpec {
        id: "decent_tea",
        name: "Decent Tea Basket",
        diameter_mm: 58.5,
        depth_mm: 25.0,
        nominal_dose_g: 10.0,
        hole_count: 200,
        hole_diameter_mm: 0.50,
        has_back_pressure_valve: true,
        back_pressure_bar: 2.0,
        description: "Tea portafilter with a 2 bar back-pressure valve",
    },
];

impl BasketSpec {
    /// All known baskets
    pub fn catalog() -> &'static [BasketSpec] {
        &CATALOG
    }

    pub fn by_id(id: &str) -> Option<&'static BasketSpec> {
        CATALOG.iter().find(|b| b.id == id)
    }

    /// Standard 18 g basket
    pub fn standard() -> &'static BasketSpec {
        // DEFAULT_BASKET_ID is in the catalog (checked in tests)
        &CATALOG[2]
    }

    /// Cross-section area in mm²
    pub fn cross_section_mm2(&self) -> f64 {
        std::f64::consts::PI * (self.diameter_mm / 2.0).powi(2)
    }

    /// Inner radius in meters
    pub fn radius_m(&self) -> f64 {
        self.diameter_mm * 0.5e-3
    }

    /// Pressure held at the exit face in Pa
    pub fn exit_pressure_pa(&self) -> f64 {
        if self.has_back_pressure_valve {
            self.back_pressure_bar * 1e5
        } else {
            0.0
        }
    }
}
