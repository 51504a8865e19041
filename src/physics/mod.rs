mod basket;
mod brew;
mod config;
mod fluid;
mod grid;
mod metrics;
mod permeability;
mod pressure;
mod simulation;
mod velocity;

pub use basket::{BasketSpec, DEFAULT_BASKET_ID};
pub use brew::{BrewParameters, MAX_MOISTURE};
pub use config::{SolverConfig, DEFAULT_COLS, DEFAULT_ROWS};
pub use fluid::{ergun_pressure_gradient, harmonic_mean, kozeny_carman, water_viscosity};
pub use grid::Grid;
pub use metrics::{coefficient_of_variation, ChannelLocation};
pub use permeability::PermeabilityBuilder;
pub use pressure::{solve_pressure, PressureProblem, SolverReport, SorSettings};
pub use simulation::{
    simulate, simulate_cancellable, simulate_with, Cell, SimulationResult, MIN_ROWS,
};
pub use velocity::{darcy_velocity, VelocityField};
