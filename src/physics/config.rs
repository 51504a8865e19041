use serde::{Deserialize, Serialize};

/// Default grid resolution along z (rows)
pub const DEFAULT_ROWS: usize = 32;
/// Default grid resolution along r (columns)
pub const DEFAULT_COLS: usize = 20;

/// Tunable constants for one simulation run.
///
/// The extraction and channeling values are empirical and pending review by
/// someone who pulls shots for a living; keep them here rather than
/// inlining new numbers in the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// SOR over-relaxation factor ω
    #[serde(default = "default_relaxation")]
    pub relaxation: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Converged once no cell moves more than this in one sweep (Pa)
    #[serde(default = "default_tolerance_pa")]
    pub tolerance_pa: f64,
    /// Global scale on the Kozeny-Carman base permeability.
    /// Nominal grind sizes overstate bed permeability by ~5 orders of
    /// magnitude; measured espresso beds sit near 1e-15 m².
    #[serde(default = "default_permeability_calibration")]
    pub permeability_calibration: f64,
    /// Seed for the distribution / moisture noise generator
    #[serde(default = "default_noise_seed")]
    pub noise_seed: u64,
    /// Representative velocity as a fraction of the peak speed
    #[serde(default = "default_representative_velocity_fraction")]
    pub representative_velocity_fraction: f64,
    /// Scale applied to the extraction heuristic
    #[serde(default = "default_extraction_gain")]
    pub extraction_gain: f64,
    /// Cells faster than this multiple of the representative velocity are channels
    #[serde(default = "default_channel_threshold")]
    pub channel_threshold: f64,
    /// Exit-velocity coefficient of variation that maps to full channeling risk
    #[serde(default = "default_channeling_cv_ceiling")]
    pub channeling_cv_ceiling: f64,
    /// Shot time reported when nothing flows (s)
    #[serde(default = "default_fallback_shot_time_s")]
    pub fallback_shot_time_s: f64,
}

fn default_relaxation() -> f64 {
    1.4
}

fn default_max_iterations() -> usize {
    200
}

fn default_tolerance_pa() -> f64 {
    1.0
}

fn default_permeability_calibration() -> f64 {
    1.2e-5
}

fn default_noise_seed() -> u64 {
    42
}

fn default_representative_velocity_fraction() -> f64 {
    0.3
}

fn default_extraction_gain() -> f64 {
    0.5
}

fn default_channel_threshold() -> f64 {
    2.5
}

fn default_channeling_cv_ceiling() -> f64 {
    0.5
}

fn default_fallback_shot_time_s() -> f64 {
    30.0
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            relaxation: default_relaxation(),
            max_iterations: default_max_iterations(),
            tolerance_pa: default_tolerance_pa(),
            permeability_calibration: default_permeability_calibration(),
            noise_seed: default_noise_seed(),
            representative_velocity_fraction: default_representative_velocity_fraction(),
            extraction_gain: default_extraction_gain(),
            channel_threshold: default_channel_threshold(),
            channeling_cv_ceiling: default_channeling_cv_ceiling(),
            fallback_shot_time_s: default_fallback_shot_time_s(),
        }
    }
}
