use super::Grid;

/// Darcy velocities for every cell
#[derive(Debug, Clone, PartialEq)]
pub struct VelocityField {
    /// Radial component (m/s), positive toward the wall
    pub radial: Grid<f64>,
    /// Axial component (m/s), positive toward the exit
    pub axial: Grid<f64>,
    /// Speed |v| (m/s)
    pub magnitude: Grid<f64>,
    /// Largest speed anywhere in the puck
    pub max_speed: f64,
}

/// Apply Darcy's law `v = −(k/μ) ∇P`.
///
/// Axial gradients are central in the interior and one-sided on the inlet
/// and exit rows. The radial gradient is zero on the axis and at the wall,
/// matching the no-flux pressure boundaries.
pub fn darcy_velocity(
    pressure: &Grid<f64>,
    permeability: &Grid<f64>,
    viscosity: f64,
    dr: f64,
    dz: f64,
) -> VelocityField {
    let (nz, nr) = (pressure.rows(), pressure.cols());
    let mu = viscosity.max(1e-12);

    let axial = Grid::from_fn(nz, nr, |z, r| {
        let dp_dz = if nz < 2 {
            0.0
        } else if z == 0 {
            (pressure[(1, r)] - pressure[(0, r)]) / dz
        } else if z + 1 == nz {
            (pressure[(z, r)] - pressure[(z - 1, r)]) / dz
        } else {
            (pressure[(z + 1, r)] - pressure[(z - 1, r)]) / (2.0 * dz)
        };
        -permeability[(z, r)] / mu * dp_dz
    });

    let radial = Grid::from_fn(nz, nr, |z, r| {
        if r == 0 || r + 1 >= nr {
            return 0.0;
        }
        let dp_dr = (pressure[(z, r + 1)] - pressure[(z, r - 1)]) / (2.0 * dr);
        -permeability[(z, r)] / mu * dp_dr
    });

    let magnitude = Grid::from_fn(nz, nr, |z, r| radial[(z, r)].hypot(axial[(z, r)]));
    let max_speed = magnitude.max_value();

    VelocityField {
        radial,
        axial,
        magnitude,
        max_speed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_pressure_uniform_axial_flow() {
        let (nz, nr) = (11, 5);
        let dz = 1e-3;
        let pressure = Grid::from_fn(nz, nr, |z, _| 1e5 * (1.0 - z as f64 / 10.0));
        let k = Grid::filled(nz, nr, 1e-15);
        let field = darcy_velocity(&pressure, &k, 1e-3, 1e-3, dz);

        // gradient = -1e5 Pa / 10 mm = -1e7 Pa/m → v = 1e-15/1e-3 · 1e7 = 1e-5 m/s
        for v in field.axial.iter() {
            assert!((v - 1e-5).abs() < 1e-12, "v = {:e}", v);
        }
        assert!(field.radial.iter().all(|&v| v == 0.0));
        assert!((field.max_speed - 1e-5).abs() < 1e-12);
    }

    #[test]
    fn test_radial_zero_at_axis_and_wall() {
        let pressure = Grid::from_fn(4, 6, |_, r| 1e5 * r as f64);
        let k = Grid::filled(4, 6, 1e-15);
        let field = darcy_velocity(&pressure, &k, 1e-3, 1e-3, 1e-3);
        for z in 0..4 {
            assert_eq!(field.radial[(z, 0)], 0.0);
            assert_eq!(field.radial[(z, 5)], 0.0);
            // Pressure rises outward, so flow points inward
            assert!(field.radial[(z, 2)] < 0.0);
        }
    }

    #[test]
    fn test_higher_viscosity_slows_flow() {
        let pressure = Grid::from_fn(8, 3, |z, _| 9e5 - 1e5 * z as f64);
        let k = Grid::filled(8, 3, 1e-15);
        let hot = darcy_velocity(&pressure, &k, 0.3e-3, 1e-3, 1e-3);
        let cold = darcy_velocity(&pressure, &k, 1.0e-3, 1e-3, 1e-3);
        assert!(cold.max_speed < hot.max_speed);
    }
}
