//! Ascent loss model: gravity, drag and steering losses between the pad and the target orbit.
//!
//! With usable propulsion data a single gravity-turn trajectory is integrated with a fixed
//! 1 s explicit Euler step; otherwise empirical closed forms scaled by the body are used.
//! Manual overrides replace individual components afterwards.

use std::f64::consts::FRAC_PI_2;

use payload_core::constants::{G0, ONE_ATM_KPA};
use payload_core::numeric::clamp;
use payload_core::units::{kn_to_n, tons_to_kg};
use payload_orbits::{BodyScales, CelestialBody, OrbitTargets};
use payload_propulsion::VesselStats;
use tracing::{debug, trace};

use crate::drag::{AtmosphereSample, drag_area, drag_force};
use crate::mode::{EstimateMode, LossModelConfig};
use crate::turn::{resolve_turn_parameters, turn_exponent_full};

const STEP_S: f64 = 1.0;
const MAX_TIME_S: f64 = 900.0;
const MIN_VELOCITY_M_S: f64 = 0.1;
const MIN_FLIGHT_PATH_RAD: f64 = 0.02;

/// Turn and drag parameters the ascent simulation actually flew.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsedAscentParameters {
    pub turn_start_speed_m_s: f64,
    pub turn_start_speed_manual: bool,
    pub turn_start_altitude_m: f64,
    pub turn_start_altitude_manual: bool,
    /// Automatic altitude derived from a manual turn speed.
    pub turn_start_altitude_from_speed: bool,
    pub turn_exponent_full: f64,
    pub cda_m2: f64,
    pub cda_coefficient: f64,
    pub cda_manual: bool,
}

/// Loss breakdown in m/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossEstimate {
    pub gravity_dv: f64,
    pub atmospheric_dv: f64,
    pub attitude_dv: f64,
    /// Sum of the three components after overrides.
    pub total_dv: f64,
    pub mode: EstimateMode,
    /// `None` when the closed-form fallback was used.
    pub used: Option<UsedAscentParameters>,
    /// Bottom-stage exponent used by the staged delta-v evaluation, filled in by the solver.
    pub turn_exponent_bottom: Option<f64>,
}

impl LossEstimate {
    pub fn empty(mode: EstimateMode) -> Self {
        Self {
            gravity_dv: 0.0,
            atmospheric_dv: 0.0,
            attitude_dv: 0.0,
            total_dv: 0.0,
            mode,
            used: None,
            turn_exponent_bottom: None,
        }
    }

    pub fn is_simulated(&self) -> bool {
        self.used.is_some()
    }
}

/// Estimate ascent losses to the target periapsis with `extra_payload_t` riding on top.
///
/// Deterministic: identical inputs give bit-identical output.
pub fn estimate(
    targets: &OrbitTargets<'_>,
    config: &LossModelConfig,
    stats: &VesselStats,
    extra_payload_t: f64,
) -> LossEstimate {
    let mut estimate = LossEstimate::empty(config.mode);

    if let Some(body) = targets.launch_body {
        if stats.has_propulsion_model() {
            simulate_ascent(body, targets, config, stats, extra_payload_t, &mut estimate);
        } else {
            debug!(vessel = %stats.name, "no usable propulsion data, using closed-form losses");
            fallback_estimate(
                body,
                targets.target_inclination_deg,
                targets.launch_latitude_deg,
                config.mode,
                &mut estimate,
            );
        }
    }

    if let Some(dv) = config.gravity_loss_override {
        estimate.gravity_dv = dv;
    }
    if let Some(dv) = config.atmospheric_loss_override {
        estimate.atmospheric_dv = dv;
    }
    if let Some(dv) = config.attitude_loss_override {
        estimate.attitude_dv = dv;
    }
    estimate.total_dv = estimate.gravity_dv + estimate.atmospheric_dv + estimate.attitude_dv;
    estimate
}

fn simulate_ascent(
    body: &CelestialBody,
    targets: &OrbitTargets<'_>,
    config: &LossModelConfig,
    stats: &VesselStats,
    extra_payload_t: f64,
    out: &mut LossEstimate,
) {
    let mode = config.mode;
    let user_speed = config.manual_turn_speed();
    let user_altitude = config.manual_turn_altitude();
    let turn = resolve_turn_parameters(Some(body), mode, user_speed, user_altitude, Some(stats));
    let exponent = turn_exponent_full(turn.speed_m_s);

    let total_wet_t = stats.wet_mass_t + extra_payload_t;
    let cda_coefficient = config.effective_cda_coefficient();
    let mut cda = drag_area(cda_coefficient, total_wet_t);
    let used = UsedAscentParameters {
        turn_start_speed_m_s: turn.speed_m_s,
        turn_start_speed_manual: user_speed.is_some(),
        turn_start_altitude_m: turn.altitude_m,
        turn_start_altitude_manual: user_altitude.is_some(),
        turn_start_altitude_from_speed: user_altitude.is_none() && user_speed.is_some(),
        turn_exponent_full: exponent,
        cda_m2: cda,
        cda_coefficient,
        cda_manual: config.manual_cda_coefficient().is_some(),
    };
    if !(cda > 0.0) {
        cda = drag_area(mode.cda_coefficient(), total_wet_t);
    }

    let target_altitude = targets.periapsis_altitude_m;
    let turn_end = (turn.altitude_m + 1000.0).max(target_altitude);
    let thrust_vac_n = kn_to_n(stats.total_thrust_kn);
    let vac_isp = stats.vacuum_isp_s;
    let sea_isp = if stats.sea_level_isp_s > 0.0 {
        stats.sea_level_isp_s
    } else {
        vac_isp
    };
    let dry_kg = tons_to_kg(stats.dry_mass_t + extra_payload_t);
    let mut mass = tons_to_kg(total_wet_t);

    let mut altitude = 0.0_f64;
    let mut velocity = MIN_VELOCITY_M_S;
    let mut gamma = FRAC_PI_2;
    let mut turn_started = false;
    let mut gravity_loss = 0.0;
    let mut drag_loss = 0.0;

    let mut t = 0.0;
    while t < MAX_TIME_S {
        if altitude >= target_altitude || mass <= dry_kg {
            break;
        }
        let g = body.gravity_at(altitude);
        let air = AtmosphereSample::at(body, altitude);
        let pressure_atm = clamp(air.pressure_kpa / ONE_ATM_KPA, 0.0, 15.0);
        let isp = (vac_isp + (sea_isp - vac_isp) * pressure_atm).max(1.0);
        let thrust = thrust_vac_n * (isp / vac_isp);
        let drag = drag_force(&air, velocity, cda);
        let sin_gamma = gamma.sin();

        gravity_loss += g * sin_gamma * STEP_S;
        if mass > 0.0 {
            drag_loss += drag / mass * STEP_S;
        }

        let accel = (thrust - drag) / mass - g * sin_gamma;
        velocity = (velocity + accel * STEP_S).max(MIN_VELOCITY_M_S);
        altitude = (altitude + velocity * sin_gamma * STEP_S).max(0.0);

        if !turn_started && velocity > turn.speed_m_s && altitude > turn.altitude_m {
            turn_started = true;
            trace!(t, altitude, velocity, "gravity turn started");
        }
        if turn_started {
            gamma = pitch_angle(altitude, turn.altitude_m, turn_end, exponent);
        }

        mass -= thrust / (isp * G0) * STEP_S;
        t += STEP_S;
    }

    out.gravity_dv = gravity_loss;
    out.atmospheric_dv = drag_loss;
    out.attitude_dv = simulated_attitude_loss(
        body,
        mode,
        targets.target_inclination_deg,
        targets.launch_latitude_deg,
    );
    out.used = Some(used);
    debug!(
        gravity = gravity_loss,
        drag = drag_loss,
        attitude = out.attitude_dv,
        extra_payload_t,
        "ascent losses simulated"
    );
}

/// Flight-path angle once the turn is under way: `π/2·(1 − progress^exponent)`, floored at
/// 0.02 rad.
pub(crate) fn pitch_angle(altitude: f64, turn_start: f64, turn_end: f64, exponent: f64) -> f64 {
    let progress = clamp((altitude - turn_start) / (turn_end - turn_start), 0.0, 1.0);
    (FRAC_PI_2 * (1.0 - progress.powf(exponent))).max(MIN_FLIGHT_PATH_RAD)
}

/// Steering loss paired with the simulated ascent.
pub fn simulated_attitude_loss(
    body: &CelestialBody,
    mode: EstimateMode,
    inclination_deg: f64,
    latitude_deg: f64,
) -> f64 {
    let s = BodyScales::of(body);
    let inc_factor = clamp(inclination_deg / 90.0, 0.0, 1.0) * latitude_deg.to_radians().cos().abs();
    if body.has_atmosphere() {
        let a0 = mode.pick(13.0, 20.0, 25.0);
        let b0 = a0;
        let a = a0 * (0.90 + 0.15 * s.gravity.powf(0.3) + 0.10 * s.depth.powf(0.25));
        let b = b0 * (0.90 + 0.10 * (1.0 + s.pressure).ln() + 0.10 * s.gravity.powf(0.25));
        (a + b * s.pressure.max(0.01).sqrt() * s.gravity) * (1.0 + inc_factor)
    } else {
        let a0 = mode.pick(1.8, 3.0, 4.0);
        let b0 = mode.pick(3.0, 5.0, 6.0);
        let a = a0 * (0.90 + 0.20 * s.gravity.powf(0.3));
        let b = b0 * (0.90 + 0.15 * s.gravity.powf(0.25) + 0.10 * s.radius.powf(0.2));
        (a + b * s.gravity) * (1.0 + inc_factor)
    }
}

/// Closed-form losses used when no propulsion data is available.
pub fn fallback_estimate(
    body: &CelestialBody,
    inclination_deg: f64,
    latitude_deg: f64,
    mode: EstimateMode,
    out: &mut LossEstimate,
) {
    let s = BodyScales::of(body);

    let grav_coeff = mode.pick(700.0, 900.0, 1050.0) * s.radius.powf(0.30) * s.gravity.powf(0.30);
    let grav_min = mode.pick(280.0, 400.0, 500.0) * s.radius.powf(0.25) * s.gravity.powf(0.20);
    let grav_max = 2200.0 * s.radius.powf(0.30);
    out.gravity_dv = clamp(grav_coeff, grav_min, grav_max);

    out.atmospheric_dv = if body.has_atmosphere() {
        let a = mode.pick(55.0, 80.0, 100.0) * s.depth.max(0.05).powf(0.30);
        let b = mode.pick(75.0, 100.0, 120.0)
            * s.pressure.max(0.01).powf(0.60)
            * s.depth.max(0.05).powf(0.20);
        let max = 800.0 * s.radius.powf(0.30) * s.pressure.max(1.0).powf(0.20);
        clamp(a + b, 30.0, max)
    } else {
        0.0
    };

    let lat_scale = latitude_deg.to_radians().cos().abs();
    let inc_prefix = 0.2 * (0.95 + 0.08 * (1.0 + s.radius).ln().min(1.5));
    let inc_factor = inc_prefix * (inclination_deg / 90.0).min(1.0) * lat_scale;
    let a = mode.pick(22.0, 35.0, 45.0)
        * (0.90 + 0.20 * s.gravity.powf(0.30) + 0.10 * s.radius.powf(0.20));
    let b = mode.pick(36.0, 55.0, 70.0) * (0.90 + 0.20 * s.gravity.powf(0.25));
    out.attitude_dv = a + b * inc_factor;
}
