//! Gravity-turn program parameters.

use payload_core::numeric::clamp;
use payload_orbits::{BodyScales, CelestialBody};
use payload_propulsion::VesselStats;

use crate::mode::EstimateMode;

pub const MIN_TURN_SPEED_M_S: f64 = 40.0;
pub const MAX_TURN_SPEED_M_S: f64 = 220.0;
/// Turn speed at which the derived turn altitude is used unscaled.
const TURN_ALTITUDE_SPEED_REF: f64 = 80.0;
const TWR_SCALING_RANGE: (f64, f64) = (1.05, 3.0);

/// Where the vertical climb ends and the pitch program begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnParameters {
    pub speed_m_s: f64,
    pub altitude_m: f64,
}

/// Pitch-program exponent for a full ascent loss estimate.
///
/// Linear fit through 55→0.45, 80→0.70, 95→0.80; 0.70 for a non-positive speed.
pub fn turn_exponent_full(turn_start_speed_m_s: f64) -> f64 {
    if turn_start_speed_m_s <= 0.0 {
        return 0.70;
    }
    let v = clamp(turn_start_speed_m_s, MIN_TURN_SPEED_M_S, MAX_TURN_SPEED_M_S);
    clamp(-0.03125 + 0.00875 * v, 0.30, 0.90)
}

/// Pitch-program exponent for the staged bottom-stage simulation.
///
/// Linear fit through 55→0.40, 80→0.58, 95→0.65; 0.58 for a non-positive speed.
pub fn turn_exponent_bottom(turn_start_speed_m_s: f64) -> f64 {
    if turn_start_speed_m_s <= 0.0 {
        return 0.58;
    }
    let v = clamp(turn_start_speed_m_s, MIN_TURN_SPEED_M_S, MAX_TURN_SPEED_M_S);
    clamp(0.05625 + 0.00625 * v, 0.30, 0.90)
}

/// Turn-start speed scaled by body gravity, pressure and atmosphere depth.
pub fn auto_turn_speed(scales: &BodyScales, mode: EstimateMode) -> f64 {
    let base = mode.base_turn_speed();
    let raw = base
        * scales.gravity.powf(0.25)
        * (0.92 + 0.18 * (1.0 + scales.pressure).ln() + 0.12 * scales.depth.powf(0.3));
    if raw.is_finite() {
        clamp(raw, MIN_TURN_SPEED_M_S, MAX_TURN_SPEED_M_S)
    } else {
        base
    }
}

/// Rescale an automatic turn speed towards the mode's reference TWR.
///
/// Only TWRs inside `[1.05, 3.0]` are trusted; anything else leaves the speed unchanged.
pub fn scale_turn_speed_for_twr(speed_m_s: f64, sea_level_twr: f64, mode: EstimateMode) -> f64 {
    let (low, high) = TWR_SCALING_RANGE;
    if sea_level_twr >= low && sea_level_twr <= high {
        clamp(
            speed_m_s * (mode.reference_twr() / sea_level_twr).sqrt(),
            MIN_TURN_SPEED_M_S,
            MAX_TURN_SPEED_M_S,
        )
    } else {
        speed_m_s
    }
}

/// Turn-start altitude derived from atmosphere depth and the turn speed.
pub fn auto_turn_altitude(body: &CelestialBody, scales: &BodyScales, speed_m_s: f64) -> f64 {
    let speed_ratio = speed_m_s / TURN_ALTITUDE_SPEED_REF;
    if body.has_simulated_atmosphere() {
        let depth = body.atmosphere_depth_m();
        clamp(
            depth * (0.010 + 0.004 * (1.0 + scales.pressure).ln()),
            800.0,
            22_000.0,
        ) * speed_ratio
    } else {
        300.0 * speed_ratio
    }
}

/// Turn speed and altitude exactly as the ascent loss simulation derives them.
///
/// Without a body the values fall back to 70 m/s and 840 m. Passing `stats` enables the
/// bottom-stage TWR correction of an automatic turn speed.
pub fn resolve_turn_parameters(
    body: Option<&CelestialBody>,
    mode: EstimateMode,
    user_speed_m_s: Option<f64>,
    user_altitude_m: Option<f64>,
    stats: Option<&VesselStats>,
) -> TurnParameters {
    let Some(body) = body else {
        return TurnParameters {
            speed_m_s: 70.0,
            altitude_m: 840.0,
        };
    };
    let scales = BodyScales::of(body);
    let user_speed = user_speed_m_s.filter(|v| *v > 0.0);
    let user_altitude = user_altitude_m.filter(|v| *v > 0.0);

    let speed_m_s = match user_speed {
        Some(speed) if speed.is_finite() => speed,
        Some(_) => mode.base_turn_speed(),
        None => {
            let auto = auto_turn_speed(&scales, mode);
            match stats {
                Some(stats) => scale_turn_speed_for_twr(
                    auto,
                    stats.bottom_stage_sea_level_twr(body.surface_gravity_g),
                    mode,
                ),
                None => auto,
            }
        }
    };
    let altitude_m =
        user_altitude.unwrap_or_else(|| auto_turn_altitude(body, &scales, speed_m_s));

    TurnParameters {
        speed_m_s,
        altitude_m,
    }
}
