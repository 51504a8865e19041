//! Per-cell permeability of the coffee bed
//!
//! Starts from a Kozeny-Carman base for the whole puck and applies four
//! multiplicative modifiers per cell:
//!
//! - **Edge effect**: looser packing against the basket wall, up to +25 %
//!   over the outer 15 % of the radius.
//! - **Bottom compaction**: fines migrate toward the screen, down to −20 %
//!   over the lower 30 % of the bed.
//! - **Distribution noise**: `exp(0.8 · (1 − quality) · u)`, u ∈ [−1, 1).
//! - **Moisture dampening**: `1 − 0.3 · moisture · u`, u ∈ [0, 1).
//!
//! The result is floored at 10 % of the cell's position-modified base so
//! every cell stays open.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::fluid::kozeny_carman;
use super::{BrewParameters, Grid};

const EDGE_START: f64 = 0.85;
const EDGE_BOOST: f64 = 0.25;
const BOTTOM_START: f64 = 0.7;
const BOTTOM_REDUCTION: f64 = 0.20;
const NOISE_EXPONENT_SCALE: f64 = 0.8;
const MOISTURE_DAMPING: f64 = 0.3;
const FLOOR_FRACTION: f64 = 0.1;

/// Position of index `i` along an axis of `n` cells, 0 at the first cell and
/// 1 at the last.
pub fn axis_fraction(i: usize, n: usize) -> f64 {
    if n > 1 {
        i as f64 / (n - 1) as f64
    } else {
        0.0
    }
}

/// Multiplier for looser packing near the wall
pub fn edge_factor(r_frac: f64) -> f64 {
    if r_frac > EDGE_START {
        1.0 + EDGE_BOOST * (r_frac - EDGE_START) / (1.0 - EDGE_START)
    } else {
        1.0
    }
}

/// Multiplier for fines compaction near the screen
pub fn bottom_factor(z_frac: f64) -> f64 {
    if z_frac > BOTTOM_START {
        1.0 - BOTTOM_REDUCTION * (z_frac - BOTTOM_START) / (1.0 - BOTTOM_START)
    } else {
        1.0
    }
}

/// Builds permeability fields from an owned, seeded generator.
///
/// Two draws are taken per cell in row-major order regardless of the
/// parameters, so equal seeds give equal noise patterns across runs.
pub struct PermeabilityBuilder {
    rng: StdRng,
    calibration: f64,
}

impl PermeabilityBuilder {
    pub fn new(seed: u64, calibration: f64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            calibration,
        }
    }

    /// Calibrated Kozeny-Carman permeability of the undisturbed bed (m²)
    pub fn base_permeability(&self, params: &BrewParameters) -> f64 {
        kozeny_carman(params.porosity(), params.particle_diameter_m()) * self.calibration
    }

    pub fn build(&mut self, params: &BrewParameters, rows: usize, cols: usize) -> Grid<f64> {
        let base = self.base_permeability(params);
        let noise_amplitude = 1.0 - params.quality();
        let moisture = params.moisture();
        let rng = &mut self.rng;

        Grid::from_fn(rows, cols, |z, r| {
            let spread: f64 = rng.gen_range(-1.0..1.0);
            let damp: f64 = rng.gen_range(0.0..1.0);

            let noise = (noise_amplitude * spread * NOISE_EXPONENT_SCALE).exp();
            let moisture_factor = 1.0 - MOISTURE_DAMPING * moisture * damp;
            let local = base * edge_factor(axis_fraction(r, cols)) * bottom_factor(axis_fraction(z, rows));
            (local * noise * moisture_factor).max(FLOOR_FRACTION * local)
        })
    }
}
