//! Steady-state pressure in the puck
//!
//! Solves the axisymmetric Darcy-continuity equation
//!
//! ∂/∂r(r k ∂P/∂r)/r + ∂/∂z(k ∂P/∂z) = 0
//!
//! on a cell-centred radial grid with nodes on the inlet and exit planes.
//!
//! Boundary conditions:
//! - z = 0: P = brew pressure (Dirichlet)
//! - z = nz−1: P = exit pressure (Dirichlet)
//! - r = 0: symmetry, no flux
//! - r = wall: impermeable, no flux
//!
//! Face permeabilities use the harmonic mean of the two cells. The linear
//! system is relaxed with Gauss-Seidel SOR sweeping z outer, r inner; each
//! update sees neighbours already updated in the same sweep.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use super::fluid::harmonic_mean;
use super::Grid;

/// Smallest radius used in the radial weights (m)
const MIN_RADIUS_M: f64 = 1e-9;

/// Physical layout and boundary values for one solve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureProblem {
    /// Radial cell width (m)
    pub dr: f64,
    /// Axial node spacing (m)
    pub dz: f64,
    pub inlet_pa: f64,
    pub exit_pa: f64,
}

/// Iteration control for the SOR sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SorSettings {
    pub relaxation: f64,
    pub max_iterations: usize,
    pub tolerance_pa: f64,
}

/// How the relaxation ended
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolverReport {
    pub iterations: usize,
    pub converged: bool,
    /// Stopped early on request; the field is incomplete
    pub cancelled: bool,
    /// Largest single-cell change in the last sweep (Pa)
    pub max_change_pa: f64,
}

/// Neighbour weights for one interior cell
#[derive(Debug, Clone, Copy, Default)]
struct Stencil {
    north: f64,
    south: f64,
    west: f64,
    east: f64,
}

impl Stencil {
    fn total(&self) -> f64 {
        self.north + self.south + self.west + self.east
    }
}

fn build_stencils(k: &Grid<f64>, problem: &PressureProblem) -> Grid<Stencil> {
    let (nz, nr) = (k.rows(), k.cols());
    let dr2 = problem.dr * problem.dr;
    let dz2 = problem.dz * problem.dz;

    Grid::from_fn(nz, nr, |z, r| {
        if z == 0 || z + 1 == nz {
            return Stencil::default();
        }
        let k_here = k[(z, r)];
        let r_center = ((r as f64 + 0.5) * problem.dr).max(MIN_RADIUS_M);

        let north = harmonic_mean(k_here, k[(z - 1, r)]) / dz2;
        let south = harmonic_mean(k_here, k[(z + 1, r)]) / dz2;
        // Faces at r = 0 and at the wall carry no flux
        let west = if r > 0 {
            let r_face = r as f64 * problem.dr;
            r_face * harmonic_mean(k_here, k[(z, r - 1)]) / (r_center * dr2)
        } else {
            0.0
        };
        let east = if r + 1 < nr {
            let r_face = (r + 1) as f64 * problem.dr;
            r_face * harmonic_mean(k_here, k[(z, r + 1)]) / (r_center * dr2)
        } else {
            0.0
        };
        Stencil { north, south, west, east }
    })
}

/// Dirichlet rows set, interior linearly interpolated between them
pub fn initial_pressure(rows: usize, cols: usize, inlet_pa: f64, exit_pa: f64) -> Grid<f64> {
    let span = (rows.max(2) - 1) as f64;
    Grid::from_fn(rows, cols, |z, _| {
        if z == 0 {
            inlet_pa
        } else if z + 1 == rows {
            exit_pa
        } else {
            inlet_pa + (exit_pa - inlet_pa) * z as f64 / span
        }
    })
}

/// Solve for pressure, running to completion.
///
/// Hitting `max_iterations` is not an error: the last iterate is returned
/// and the report says `converged: false`.
pub fn solve_pressure(
    k: &Grid<f64>,
    problem: &PressureProblem,
    settings: &SorSettings,
) -> (Grid<f64>, SolverReport) {
    relax(k, problem, settings, None)
}

/// Like [`solve_pressure`], polling `cancel` before every sweep.
///
/// Returns `None` if cancellation was observed. Uncancelled runs are
/// identical to [`solve_pressure`].
pub fn solve_pressure_cancellable(
    k: &Grid<f64>,
    problem: &PressureProblem,
    settings: &SorSettings,
    cancel: &AtomicBool,
) -> Option<(Grid<f64>, SolverReport)> {
    let (pressure, report) = relax(k, problem, settings, Some(cancel));
    if report.cancelled {
        None
    } else {
        Some((pressure, report))
    }
}

fn relax(
    k: &Grid<f64>,
    problem: &PressureProblem,
    settings: &SorSettings,
    cancel: Option<&AtomicBool>,
) -> (Grid<f64>, SolverReport) {
    let (nz, nr) = (k.rows(), k.cols());
    let mut pressure = initial_pressure(nz, nr, problem.inlet_pa, problem.exit_pa);
    let stencils = build_stencils(k, problem);
    let omega = settings.relaxation;

    let mut report = SolverReport {
        iterations: 0,
        converged: false,
        cancelled: false,
        max_change_pa: 0.0,
    };

    while report.iterations < settings.max_iterations {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            report.cancelled = true;
            break;
        }

        let mut max_change = 0.0_f64;
        for z in 1..nz.saturating_sub(1) {
            for r in 0..nr {
                let s = stencils[(z, r)];
                let total = s.total();
                if total <= 0.0 {
                    continue;
                }
                let mut weighted = s.north * pressure[(z - 1, r)] + s.south * pressure[(z + 1, r)];
                if r > 0 {
                    weighted += s.west * pressure[(z, r - 1)];
                }
                if r + 1 < nr {
                    weighted += s.east * pressure[(z, r + 1)];
                }
                let old = pressure[(z, r)];
                let updated = old + omega * (weighted / total - old);
                pressure[(z, r)] = updated;
                max_change = max_change.max((updated - old).abs());
            }
        }

        report.iterations += 1;
        report.max_change_pa = max_change;
        if max_change < settings.tolerance_pa {
            report.converged = true;
            break;
        }
    }

    (pressure, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(inlet_bar: f64, exit_bar: f64) -> PressureProblem {
        PressureProblem {
            dr: 29.25e-3 / 20.0,
            dz: 5.8e-3 / 31.0,
            inlet_pa: inlet_bar * 1e5,
            exit_pa: exit_bar * 1e5,
        }
    }

    fn settings() -> SorSettings {
        SorSettings {
            relaxation: 1.4,
            max_iterations: 200,
            tolerance_pa: 1.0,
        }
    }

    #[test]
    fn test_boundaries_hold() {
        let k = Grid::from_fn(32, 20, |z, r| 1e-15 * (1.0 + 0.1 * ((z * 7 + r * 3) % 5) as f64));
        let p = problem(9.0, 0.0);
        let (pressure, _) = solve_pressure(&k, &p, &settings());
        for r in 0..20 {
            assert_eq!(pressure[(0, r)], p.inlet_pa);
            assert_eq!(pressure[(31, r)], p.exit_pa);
        }
    }

    #[test]
    fn test_uniform_bed_is_linear() {
        // Uniform k: the linear initial guess is already the solution
        let k = Grid::filled(32, 20, 1e-15);
        let p = problem(9.0, 0.0);
        let (pressure, report) = solve_pressure(&k, &p, &settings());
        assert!(report.converged);
        assert_eq!(report.iterations, 1);
        for z in 0..32 {
            let expected = p.inlet_pa * (1.0 - z as f64 / 31.0);
            for r in 0..20 {
                assert!(
                    (pressure[(z, r)] - expected).abs() < 1.0,
                    "P({}, {}) = {} expected {}",
                    z, r, pressure[(z, r)], expected
                );
            }
        }
    }

    #[test]
    fn test_pressure_monotone_in_depth() {
        let k = Grid::from_fn(32, 20, |z, _| if z > 20 { 0.8e-15 } else { 1e-15 });
        let (pressure, _) = solve_pressure(&k, &problem(9.0, 0.0), &settings());
        for r in 0..20 {
            for z in 1..32 {
                assert!(pressure[(z, r)] <= pressure[(z - 1, r)] + 1e-6);
            }
        }
    }

    #[test]
    fn test_tight_layer_takes_most_of_the_drop() {
        // A low-permeability band in rows 10..=12 should carry a much larger
        // share of the pressure drop than its share of the depth.
        let k = Grid::from_fn(32, 20, |z, _| if (10..=12).contains(&z) { 1e-16 } else { 1e-15 });
        let settings = SorSettings { max_iterations: 5000, ..settings() };
        let (pressure, report) = solve_pressure(&k, &problem(9.0, 0.0), &settings);
        assert!(report.converged);
        let drop_band = pressure[(9, 5)] - pressure[(13, 5)];
        let total = 9.0e5;
        assert!(drop_band / total > 0.5, "band carries {:.2}", drop_band / total);
    }

    #[test]
    fn test_equal_boundaries_give_flat_field() {
        let k = Grid::from_fn(32, 20, |z, r| 1e-15 * (1.0 + 0.3 * ((z + r) % 3) as f64));
        let (pressure, report) = solve_pressure(&k, &problem(2.0, 2.0), &settings());
        assert!(report.converged);
        assert!(pressure.iter().all(|&v| (v - 2.0e5).abs() < 1e-6));
    }

    #[test]
    fn test_iteration_cap_is_silent() {
        let k = Grid::from_fn(32, 20, |z, _| if z > 16 { 1e-17 } else { 1e-15 });
        let settings = SorSettings { max_iterations: 3, ..settings() };
        let (pressure, report) = solve_pressure(&k, &problem(9.0, 0.0), &settings);
        assert_eq!(report.iterations, 3);
        assert!(!report.converged);
        assert!(pressure.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_cancel_before_first_sweep() {
        let k = Grid::filled(8, 4, 1e-15);
        let cancel = AtomicBool::new(true);
        assert!(solve_pressure_cancellable(&k, &problem(9.0, 0.0), &settings(), &cancel).is_none());
    }

    #[test]
    fn test_uncancelled_matches_plain_solve() {
        let k = Grid::from_fn(32, 20, |z, r| 1e-15 * (1.0 + 0.05 * ((z * r) % 7) as f64));
        let p = problem(9.0, 0.0);
        let plain = solve_pressure(&k, &p, &settings());
        let flag = AtomicBool::new(false);
        let polled = solve_pressure_cancellable(&k, &p, &settings(), &flag).unwrap();
        assert_eq!(plain, polled);
    }
}
