use serde::Serialize;

use super::Grid;

/// Flow rates below this are treated as no flow (ml/s)
pub const MIN_FLOW_ML_S: f64 = 1e-6;
const SPEED_EPSILON: f64 = 1e-30;

/// Cell flagged as a preferential flow path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChannelLocation {
    /// Column index (radial)
    pub r: usize,
    /// Row index (axial)
    pub z: usize,
}

/// Speed considered "typical" for the puck: a fixed fraction of the peak.
pub fn representative_velocity(max_speed: f64, fraction: f64) -> f64 {
    max_speed * fraction
}

/// Heuristic extraction level per cell.
///
/// `min(1, |v| / v_rep · (z+1)/nz · gain)`: faster cells and cells deeper in
/// the bed (which have seen more water) extract further. Empirical, not a
/// solubility model.
pub fn extraction_levels(magnitude: &Grid<f64>, v_rep: f64, gain: f64) -> Grid<f64> {
    let nz = magnitude.rows();
    Grid::from_fn(nz, magnitude.cols(), |z, r| {
        if v_rep <= SPEED_EPSILON {
            return 0.0;
        }
        let depth_fraction = (z + 1) as f64 / nz as f64;
        (magnitude[(z, r)] / v_rep * depth_fraction * gain).min(1.0)
    })
}

/// Volumetric flow out of the exit face in ml/s.
///
/// Integrates the axial velocity of the bottom row over annular rings of
/// area 2π r Δr with r at the cell centre. Reverse flow (exit pressure above
/// brew pressure) reports as zero.
pub fn total_flow_rate_ml_s(axial: &Grid<f64>, dr: f64) -> f64 {
    let Some(exit_row) = axial.rows().checked_sub(1) else {
        return 0.0;
    };
    let q_m3_s: f64 = axial
        .row(exit_row)
        .iter()
        .enumerate()
        .map(|(r, v)| {
            let radius = (r as f64 + 0.5) * dr;
            v * 2.0 * std::f64::consts::PI * radius * dr
        })
        .sum();
    (q_m3_s * 1e6).max(0.0)
}

/// Coefficient of variation (σ/μ) of a set of values; 0 when the mean is ~0.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if mean.abs() <= SPEED_EPSILON {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt() / mean.abs()
}

/// Channeling risk in [0, 1] from the spread of exit velocities.
///
/// CV of 0 maps to 0, CV at or above `cv_ceiling` maps to 1.
pub fn channeling_risk(exit_velocities: &[f64], cv_ceiling: f64) -> f64 {
    let cv = coefficient_of_variation(exit_velocities);
    if cv_ceiling <= 0.0 {
        return if cv > 0.0 { 1.0 } else { 0.0 };
    }
    (cv / cv_ceiling).clamp(0.0, 1.0)
}

/// Cells whose speed exceeds `threshold × v_rep`, in row-major order.
pub fn channel_locations(magnitude: &Grid<f64>, v_rep: f64, threshold: f64) -> Vec<ChannelLocation> {
    if v_rep <= SPEED_EPSILON {
        return Vec::new();
    }
    let limit = threshold * v_rep;
    let mut found = Vec::new();
    for z in 0..magnitude.rows() {
        for r in 0..magnitude.cols() {
            if magnitude[(z, r)] > limit {
                found.push(ChannelLocation { r, z });
            }
        }
    }
    found
}

/// Seconds to reach `target_yield_ml` at `flow_ml_s`, or `fallback_s` when
/// nothing flows.
pub fn effective_shot_time(target_yield_ml: f64, flow_ml_s: f64, fallback_s: f64) -> f64 {
    if flow_ml_s < MIN_FLOW_ML_S {
        fallback_s
    } else {
        target_yield_ml / flow_ml_s
    }
}

/// Mean inlet-to-exit pressure difference across columns, in bar.
pub fn average_pressure_drop_bar(pressure: &Grid<f64>) -> f64 {
    let cols = pressure.cols();
    if cols == 0 || pressure.rows() == 0 {
        return 0.0;
    }
    let top = pressure.row(0);
    let bottom = pressure.row(pressure.rows() - 1);
    let sum: f64 = top.iter().zip(bottom).map(|(t, b)| t - b).sum();
    sum / cols as f64 / 1e5
}
