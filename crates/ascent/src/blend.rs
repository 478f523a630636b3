//! Sea-level weighting of the launch-stage Isp when the stage is not simulated.

use payload_core::constants::ONE_ATM_KPA;
use payload_core::numeric::clamp;
use payload_orbits::{BodyScales, CelestialBody};

const SAMPLES: usize = 20;
const MAX_BLEND: f64 = 0.5;

/// Fraction of sea-level Isp in the blended launch-stage Isp.
///
/// Pressure fractions at 21 evenly spaced altitudes through the atmosphere, weighted
/// towards the ground (`1 − 0.5·i/20`) where the vehicle is slow and spends most of its
/// burn, capped at 0.5. Zero for bodies without a simulated atmosphere.
pub fn atmosphere_blend_factor(body: &CelestialBody) -> f64 {
    if !body.has_simulated_atmosphere() {
        return 0.0;
    }
    let sea_pressure = match body.sea_level_pressure_kpa() {
        p if p > 0.0 => p,
        _ => ONE_ATM_KPA,
    };
    let depth = body.atmosphere_depth_m();

    let mut sum = 0.0;
    let mut weight_sum = 0.0;
    for i in 0..=SAMPLES {
        let fraction = i as f64 / SAMPLES as f64;
        let pressure = clamp(body.pressure_kpa(depth * fraction) / sea_pressure, 0.0, 1.0);
        let weight = 1.0 - 0.5 * fraction;
        sum += pressure * weight;
        weight_sum += weight;
    }

    let blend = sum / weight_sum;
    if blend.is_finite() {
        blend.min(MAX_BLEND)
    } else {
        default_blend_factor(body)
    }
}

/// Empirical blend factor from normalised pressure and depth.
pub fn default_blend_factor(body: &CelestialBody) -> f64 {
    if !body.has_simulated_atmosphere() {
        return 0.0;
    }
    let s = BodyScales::of(body);
    clamp(
        0.18 + 0.10 * (1.0 + s.pressure).ln() + 0.06 * s.depth.powf(0.35),
        0.12,
        0.55,
    )
}

/// Launch-stage Isp: blended towards sea level in atmosphere, vacuum otherwise.
pub fn effective_isp(
    vacuum_isp_s: f64,
    sea_level_isp_s: f64,
    body: Option<&CelestialBody>,
    is_bottom_stage: bool,
) -> f64 {
    match body {
        Some(body) if body.has_atmosphere() && is_bottom_stage => {
            let f = atmosphere_blend_factor(body);
            vacuum_isp_s * (1.0 - f) + sea_level_isp_s * f
        }
        _ => vacuum_isp_s,
    }
}
