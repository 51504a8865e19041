use super::BasketSpec;

/// Loose-packed porosity before tamping and swelling
const BASE_POROSITY: f64 = 0.42;
const MIN_POROSITY: f64 = 0.20;
const MAX_POROSITY: f64 = 0.50;
/// Porosity lost per 15 kg of tamp force
const TAMP_COMPACTION_PER_15KG: f64 = 0.04;
/// Porosity lost per unit moisture content
const MOISTURE_SWELLING: f64 = 0.3;
pub const MAX_MOISTURE: f64 = 0.2;
/// Smallest puck considered, keeps the axial spacing positive
const MIN_DOSE_G: f64 = 0.1;
/// Finest grind considered, keeps Kozeny-Carman above zero
const MIN_GRIND_MICRONS: f64 = 1.0;

/// Inputs to a single puck simulation
#[derive(Debug, Clone, PartialEq)]
pub struct BrewParameters {
    /// Nominal grind particle size in µm
    pub grind_size_microns: f64,
    pub dose_grams: f64,
    /// Tamp force in kg
    pub tamp_pressure_kg: f64,
    /// Bean density in g/cm³
    pub bean_density: f64,
    /// Moisture content (0–0.2)
    pub moisture_content: f64,
    pub brew_pressure_bar: f64,
    pub water_temp_c: f64,
    /// Puck preparation quality (0 = clumpy, 1 = perfect)
    pub distribution_quality: f64,
    pub basket: BasketSpec,
}

impl Default for BrewParameters {
    fn default() -> Self {
        Self {
            grind_size_microns: 400.0,
            dose_grams: 18.0,
            tamp_pressure_kg: 15.0,
            bean_density: 1.15,
            moisture_content: 0.10,
            brew_pressure_bar: 9.0,
            water_temp_c: 93.0,
            distribution_quality: 0.85,
            basket: *BasketSpec::standard(),
        }
    }
}

impl BrewParameters {
    pub fn moisture(&self) -> f64 {
        self.moisture_content.clamp(0.0, MAX_MOISTURE)
    }

    pub fn quality(&self) -> f64 {
        self.distribution_quality.clamp(0.0, 1.0)
    }

    /// Height of the compacted bed in mm
    pub fn puck_height_mm(&self) -> f64 {
        // g / (g/cm³) = cm³, ×1000 for mm³
        let volume_mm3 = self.dose_grams.max(MIN_DOSE_G) / self.bean_density.max(1e-6) * 1000.0;
        volume_mm3 / self.basket.cross_section_mm2()
    }

    /// Void fraction of the bed after tamping, clamped to [0.20, 0.50]
    pub fn porosity(&self) -> f64 {
        let tamp_effect = TAMP_COMPACTION_PER_15KG * self.tamp_pressure_kg.max(0.0) / 15.0;
        let moisture_swelling = MOISTURE_SWELLING * self.moisture();
        let porosity = BASE_POROSITY - tamp_effect - moisture_swelling;
        if porosity.is_nan() {
            return MIN_POROSITY;
        }
        porosity.clamp(MIN_POROSITY, MAX_POROSITY)
    }

    /// Particle diameter in meters
    pub fn particle_diameter_m(&self) -> f64 {
        self.grind_size_microns.max(MIN_GRIND_MICRONS) * 1e-6
    }

    pub fn brew_pressure_pa(&self) -> f64 {
        self.brew_pressure_bar * 1e5
    }

    pub fn exit_pressure_pa(&self) -> f64 {
        self.basket.exit_pressure_pa()
    }

    /// Beverage mass for a 1:2 ratio, in g (≈ ml)
    pub fn target_yield_g(&self) -> f64 {
        self.basket.nominal_dose_g * 2.0
    }
}
