//! The puck simulation pipeline
//!
//! basket + brew parameters → permeability → pressure (SOR) → Darcy
//! velocity → extraction and summary statistics → normalized result.
//!
//! Every call owns its grids; repeated calls share nothing.

use std::sync::atomic::AtomicBool;

use serde::Serialize;

use super::fluid::water_viscosity;
use super::metrics::{
    average_pressure_drop_bar, channel_locations, channeling_risk, effective_shot_time,
    extraction_levels, representative_velocity, total_flow_rate_ml_s, ChannelLocation,
    MIN_FLOW_ML_S,
};
use super::permeability::PermeabilityBuilder;
use super::pressure::{
    solve_pressure, solve_pressure_cancellable, PressureProblem, SolverReport, SorSettings,
};
use super::velocity::darcy_velocity;
use super::{BrewParameters, Grid, SolverConfig};
use crate::console::{log_debug, log_warning};

/// Fewest rows that still leave an interior between the two pressure planes
pub const MIN_ROWS: usize = 3;
const PRESSURE_EPSILON_PA: f64 = 1e-6;

/// State of one grid cell after the solve
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Cell {
    /// m²
    pub permeability: f64,
    /// Pa
    pub pressure: f64,
    /// m/s, positive toward the wall
    pub velocity_r: f64,
    /// m/s, positive toward the exit
    pub velocity_z: f64,
    /// m/s
    pub flow_magnitude: f64,
    /// 0–1
    pub extraction_level: f64,
}

/// Output of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub grid: Grid<Cell>,
    /// Axial resolution (z)
    pub rows: usize,
    /// Radial resolution (r)
    pub cols: usize,
    /// ml/s
    pub total_flow_rate: f64,
    /// bar
    pub average_pressure_drop: f64,
    pub channeling_risk: f64,
    pub uniformity_index: f64,
    pub channel_locations: Vec<ChannelLocation>,
    /// Seconds to reach a 1:2 yield
    pub effective_shot_time: f64,
    pub normalized_permeability: Grid<f64>,
    pub normalized_pressure: Grid<f64>,
    pub normalized_velocity: Grid<f64>,
    pub normalized_extraction: Grid<f64>,
    pub solver: SolverReport,
}

impl SimulationResult {
    pub fn cell(&self, z: usize, r: usize) -> Option<&Cell> {
        self.grid.get(z, r)
    }

    /// Pressure field in Pa
    pub fn pressure(&self) -> Grid<f64> {
        self.grid.map(|c| c.pressure)
    }

    pub fn permeability(&self) -> Grid<f64> {
        self.grid.map(|c| c.permeability)
    }
}

/// Simulate with the default configuration.
pub fn simulate(params: &BrewParameters, rows: usize, cols: usize) -> SimulationResult {
    simulate_with(params, rows, cols, &SolverConfig::default())
}

/// Simulate with explicit solver settings.
pub fn simulate_with(
    params: &BrewParameters,
    rows: usize,
    cols: usize,
    config: &SolverConfig,
) -> SimulationResult {
    let setup = Setup::new(params, rows, cols, config);
    let (pressure, report) = solve_pressure(&setup.permeability, &setup.problem, &setup.sor);
    setup.finish(params, config, pressure, report)
}

/// Simulate, giving up between SOR sweeps once `cancel` is set.
///
/// Returns `None` when cancelled. A run that completes produces exactly the
/// result of [`simulate_with`].
pub fn simulate_cancellable(
    params: &BrewParameters,
    rows: usize,
    cols: usize,
    config: &SolverConfig,
    cancel: &AtomicBool,
) -> Option<SimulationResult> {
    let setup = Setup::new(params, rows, cols, config);
    let (pressure, report) =
        solve_pressure_cancellable(&setup.permeability, &setup.problem, &setup.sor, cancel)?;
    Some(setup.finish(params, config, pressure, report))
}

/// Everything computed before the pressure solve
struct Setup {
    rows: usize,
    cols: usize,
    permeability: Grid<f64>,
    problem: PressureProblem,
    sor: SorSettings,
}

impl Setup {
    fn new(params: &BrewParameters, rows: usize, cols: usize, config: &SolverConfig) -> Self {
        let (rows, cols) = clamp_dimensions(rows, cols);

        let mut builder = PermeabilityBuilder::new(config.noise_seed, config.permeability_calibration);
        let permeability = builder.build(params, rows, cols);

        let height_m = params.puck_height_mm() * 1e-3;
        let problem = PressureProblem {
            dr: params.basket.radius_m() / cols as f64,
            dz: height_m / (rows - 1) as f64,
            inlet_pa: params.brew_pressure_pa(),
            exit_pa: params.exit_pressure_pa(),
        };
        let sor = SorSettings {
            relaxation: config.relaxation,
            max_iterations: config.max_iterations,
            tolerance_pa: config.tolerance_pa,
        };

        Self {
            rows,
            cols,
            permeability,
            problem,
            sor,
        }
    }

    fn finish(
        self,
        params: &BrewParameters,
        config: &SolverConfig,
        pressure: Grid<f64>,
        report: SolverReport,
    ) -> SimulationResult {
        if !report.converged {
            log_debug(&format!(
                "Puck: pressure solve stopped after {} sweeps (last change {:.2} Pa)",
                report.iterations, report.max_change_pa
            ));
        }

        let Setup {
            rows,
            cols,
            permeability,
            problem,
            ..
        } = self;

        let viscosity = water_viscosity(params.water_temp_c);
        let velocity = darcy_velocity(&pressure, &permeability, viscosity, problem.dr, problem.dz);

        let total_flow_rate = total_flow_rate_ml_s(&velocity.axial, problem.dr);
        // Round-off velocities in a stalled puck are neither flow nor channels
        let stalled = total_flow_rate < MIN_FLOW_ML_S;
        let v_rep = if stalled {
            0.0
        } else {
            representative_velocity(velocity.max_speed, config.representative_velocity_fraction)
        };
        let extraction = extraction_levels(&velocity.magnitude, v_rep, config.extraction_gain);
        let risk = if stalled {
            0.0
        } else {
            channeling_risk(velocity.axial.row(rows - 1), config.channeling_cv_ceiling)
        };
        let channels = channel_locations(&velocity.magnitude, v_rep, config.channel_threshold);
        let shot_time = effective_shot_time(
            params.target_yield_g(),
            total_flow_rate,
            config.fallback_shot_time_s,
        );

        let normalized_permeability = normalize_by_max(&permeability);
        let normalized_pressure = normalize_pressure(&pressure, problem.inlet_pa, problem.exit_pa);
        let normalized_velocity = normalize_by_max(&velocity.magnitude);
        let normalized_extraction = normalize_by_max(&extraction);

        let grid = Grid::from_fn(rows, cols, |z, r| Cell {
            permeability: permeability[(z, r)],
            pressure: pressure[(z, r)],
            velocity_r: velocity.radial[(z, r)],
            velocity_z: velocity.axial[(z, r)],
            flow_magnitude: velocity.magnitude[(z, r)],
            extraction_level: extraction[(z, r)],
        });

        SimulationResult {
            grid,
            rows,
            cols,
            total_flow_rate,
            average_pressure_drop: average_pressure_drop_bar(&pressure),
            channeling_risk: risk,
            uniformity_index: 1.0 - risk,
            channel_locations: channels,
            effective_shot_time: shot_time,
            normalized_permeability,
            normalized_pressure,
            normalized_velocity,
            normalized_extraction,
            solver: report,
        }
    }
}

fn clamp_dimensions(rows: usize, cols: usize) -> (usize, usize) {
    let clamped = (rows.max(MIN_ROWS), cols.max(1));
    if clamped != (rows, cols) {
        log_warning(&format!(
            "Puck: grid {}x{} too small, using {}x{}",
            rows, cols, clamped.0, clamped.1
        ));
    }
    clamped
}

/// Scale a non-negative field into [0, 1] by its maximum
fn normalize_by_max(field: &Grid<f64>) -> Grid<f64> {
    let max = field.max_value();
    if max <= 0.0 {
        return field.map(|_| 0.0);
    }
    field.map(|v| (v / max).clamp(0.0, 1.0))
}

/// 1 at the inlet pressure, 0 at the exit pressure
fn normalize_pressure(pressure: &Grid<f64>, inlet_pa: f64, exit_pa: f64) -> Grid<f64> {
    let delta = inlet_pa - exit_pa;
    if delta.abs() <= PRESSURE_EPSILON_PA {
        return normalize_by_max(pressure);
    }
    pressure.map(|p| ((p - exit_pa) / delta).clamp(0.0, 1.0))
}
