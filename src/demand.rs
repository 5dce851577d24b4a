//! Net-demand profiles fed to the battery dispatch.
//!
//! Positive values are load the battery should serve, negative values are
//! surplus it may absorb.

use rand::{Rng, SeedableRng, rngs::StdRng};

/// The ten-period teaching profile.
pub const EXERCISE_DEMAND_KW: [f64; 10] =
    [5.0, -8.0, 12.0, -3.0, 7.0, -10.0, 15.0, -5.0, 8.0, -2.0];

/// Gaussian noise via the Box-Muller transform.
fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}

/// Generates a seeded demand profile alternating between load and surplus.
///
/// The profile is one full sine period of `amplitude_kw` across `periods`
/// steps plus Gaussian noise of `noise_std_kw`. Identical arguments always
/// produce the identical profile.
///
/// # Arguments
///
/// * `periods` - Number of dispatch periods
/// * `amplitude_kw` - Peak of the sinusoidal component (kW)
/// * `noise_std_kw` - Standard deviation of the noise (kW); `<= 0` disables it
/// * `seed` - Random seed
pub fn synthetic_demand(
    periods: usize,
    amplitude_kw: f64,
    noise_std_kw: f64,
    seed: u64,
) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..periods)
        .map(|t| {
            let phase = 2.0 * std::f64::consts::PI * t as f64 / periods as f64;
            amplitude_kw * phase.sin() + gaussian_noise(&mut rng, noise_std_kw)
        })
        .collect()
}
