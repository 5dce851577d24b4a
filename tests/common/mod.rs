//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use rand::{Rng, SeedableRng, rngs::StdRng};

use pv_battery_sim::battery::{BatteryParams, DispatchOptions, DispatchTrace, simulate_battery};

/// The ten-period teaching demand profile.
pub const EXERCISE: [f64; 10] = [5.0, -8.0, 12.0, -3.0, 7.0, -10.0, 15.0, -5.0, 8.0, -2.0];

/// Seeded RNG so randomized sweeps are reproducible.
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Random demand profile with values in `[-limit, limit]`, integer-valued
/// so sums are exact.
pub fn random_demand(rng: &mut StdRng, len: usize, limit: i32) -> Vec<f64> {
    (0..len)
        .map(|_| f64::from(rng.random_range(-limit..=limit)))
        .collect()
}

/// Baseline run with default parameters.
pub fn run_baseline(demand: &[f64]) -> DispatchTrace {
    simulate_battery(demand, &BatteryParams::default(), &DispatchOptions::baseline())
        .expect("baseline run should succeed")
}

/// Fully constrained run with default parameters.
pub fn run_constrained(demand: &[f64]) -> DispatchTrace {
    simulate_battery(
        demand,
        &BatteryParams::default(),
        &DispatchOptions::constrained(),
    )
    .expect("constrained run should succeed")
}
