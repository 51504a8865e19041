//! Fluid and packed-bed property correlations
//!
//! Water viscosity, Kozeny-Carman permeability, the harmonic interface mean
//! used by the pressure solver, and the Ergun packed-bed correlation.

/// Dynamic viscosity of liquid water in Pa·s, tabulated every 10 °C
const WATER_VISCOSITY_TABLE: [(f64, f64); 9] = [
    (20.0, 1.002e-3),
    (30.0, 0.7975e-3),
    (40.0, 0.6529e-3),
    (50.0, 0.5468e-3),
    (60.0, 0.4665e-3),
    (70.0, 0.4042e-3),
    (80.0, 0.3544e-3),
    (90.0, 0.3147e-3),
    (100.0, 0.2818e-3),
];

/// Kozeny constant for packed spheres
pub const KOZENY_CONSTANT: f64 = 180.0;

/// Added to harmonic-mean denominators so two zero permeabilities give zero
const HARMONIC_EPSILON: f64 = 1e-30;

/// Viscosity of water at `temp_c` in Pa·s.
///
/// Piecewise-linear between the tabulated points; temperatures outside
/// 20–100 °C take the nearest end value.
pub fn water_viscosity(temp_c: f64) -> f64 {
    let (t_first, mu_first) = WATER_VISCOSITY_TABLE[0];
    let (t_last, mu_last) = WATER_VISCOSITY_TABLE[WATER_VISCOSITY_TABLE.len() - 1];
    if temp_c.is_nan() || temp_c <= t_first {
        return mu_first;
    }
    if temp_c >= t_last {
        return mu_last;
    }
    for pair in WATER_VISCOSITY_TABLE.windows(2) {
        let (t0, mu0) = pair[0];
        let (t1, mu1) = pair[1];
        if temp_c <= t1 {
            let frac = (temp_c - t0) / (t1 - t0);
            return mu0 + frac * (mu1 - mu0);
        }
    }
    mu_last
}

/// Kozeny-Carman permeability in m²: `k = ε³ d² / (180 (1 − ε)²)`
pub fn kozeny_carman(porosity: f64, particle_diameter_m: f64) -> f64 {
    let solid = (1.0 - porosity).max(1e-6);
    porosity.powi(3) * particle_diameter_m.powi(2) / (KOZENY_CONSTANT * solid * solid)
}

/// Interface permeability between two cells.
///
/// A low-permeability cell dominates, so a blocked cell throttles the face
/// even when its neighbour is wide open.
#[inline]
pub fn harmonic_mean(k1: f64, k2: f64) -> f64 {
    2.0 * k1 * k2 / (k1 + k2 + HARMONIC_EPSILON)
}

/// Ergun pressure gradient through a packed bed in Pa/m.
///
/// `ΔP/L = 150 μ (1−ε)² u / (ε³ d²) + 1.75 ρ (1−ε) u² / (ε³ d)`
///
/// `superficial_velocity` in m/s, `fluid_density` in kg/m³. Reference only;
/// the pressure solver uses the linear Darcy form.
pub fn ergun_pressure_gradient(
    superficial_velocity: f64,
    porosity: f64,
    particle_diameter_m: f64,
    viscosity: f64,
    fluid_density: f64,
) -> f64 {
    let eps3 = porosity.powi(3).max(1e-12);
    let d = particle_diameter_m.max(1e-12);
    let solid = 1.0 - porosity;
    let u = superficial_velocity;
    let viscous = 150.0 * viscosity * solid * solid * u / (eps3 * d * d);
    let inertial = 1.75 * fluid_density * solid * u * u.abs() / (eps3 * d);
    viscous + inertial
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viscosity_at_table_points() {
        for &(t, mu) in WATER_VISCOSITY_TABLE.iter() {
            assert!((water_viscosity(t) - mu).abs() < 1e-12, "mismatch at {}°C", t);
        }
    }

    #[test]
    fn test_viscosity_interpolates() {
        // 93 °C: 30% of the way from 90 to 100
        let expected = 0.3147e-3 + 0.3 * (0.2818e-3 - 0.3147e-3);
        assert!((water_viscosity(93.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_viscosity_clamped_outside_table() {
        assert_eq!(water_viscosity(4.0), water_viscosity(20.0));
        assert_eq!(water_viscosity(120.0), water_viscosity(100.0));
        assert_eq!(water_viscosity(f64::NAN), water_viscosity(20.0));
    }

    #[test]
    fn test_viscosity_decreases_with_temperature() {
        let mut prev = f64::INFINITY;
        for t in (20..=100).map(|t| t as f64) {
            let mu = water_viscosity(t);
            assert!(mu <= prev, "viscosity rose at {}°C", t);
            prev = mu;
        }
    }

    #[test]
    fn test_kozeny_carman_reference_value() {
        // ε = 0.35, d = 400 µm → 0.042875 · 1.6e-7 / (180 · 0.4225)
        let k = kozeny_carman(0.35, 400e-6);
        assert!((k - 9.0204e-11).abs() < 1e-14, "k = {:e}", k);
    }

    #[test]
    fn test_kozeny_carman_finer_grind_less_permeable() {
        assert!(kozeny_carman(0.35, 200e-6) < kozeny_carman(0.35, 400e-6));
        assert!(kozeny_carman(0.25, 400e-6) < kozeny_carman(0.35, 400e-6));
    }

    #[test]
    fn test_harmonic_mean_throttles() {
        let open = 1e-12;
        let blocked = 1e-16;
        let face = harmonic_mean(open, blocked);
        // Close to twice the blocked value, far below the arithmetic mean
        assert!(face < 2.01 * blocked);
        assert!(face < 0.5 * (open + blocked) / 1000.0);
        assert!((harmonic_mean(open, open) - open).abs() < 1e-24);
        assert_eq!(harmonic_mean(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_ergun_viscous_limit_matches_darcy() {
        // At creeping flow the Ergun viscous term is Darcy with a Kozeny
        // constant of 150 instead of 180.
        let (eps, d, mu) = (0.35, 400e-6, 3e-4);
        let u = 1e-6;
        let ergun = ergun_pressure_gradient(u, eps, d, mu, 965.0);
        let darcy = mu * u / kozeny_carman(eps, d);
        let ratio = ergun / darcy;
        assert!((ratio - 150.0 / 180.0).abs() < 1e-3, "ratio = {}", ratio);
    }

    #[test]
    fn test_ergun_inertial_term_grows_quadratically() {
        let (eps, d, mu, rho) = (0.35, 400e-6, 3e-4, 965.0);
        let slow = ergun_pressure_gradient(0.01, eps, d, mu, rho);
        let fast = ergun_pressure_gradient(0.1, eps, d, mu, rho);
        assert!(fast > 10.0 * slow);
    }
}
