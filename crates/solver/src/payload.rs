//! Maximum-payload search.
//!
//! Losses depend on the payload through drag and burn time, and the payload depends on the
//! losses through the required delta-v. A fixed four-pass refinement alternates the two,
//! each pass bisecting for the heaviest payload the vehicle still lifts.

use payload_ascent::{
    BottomStageCache, LossEstimate, LossModelConfig, estimate, resolve_turn_parameters,
    turn_exponent_bottom,
};
use payload_orbits::{
    OrbitShape, OrbitTargets, ideal_surface_to_orbit, plane_change, rotation_adjusted_dv,
};
use payload_propulsion::VesselStats;
use tracing::{debug, warn};

use crate::error::{PayloadError, PayloadWarning};
use crate::result::PayloadCalculationResult;
use crate::staging::{
    AscentProfile, simple_dv, simple_dv_for_display, simple_dv_with_extra_payload, staged_dv,
    staged_dv_for_display, staged_dv_with_extra_payload,
};

pub const REFINEMENT_PASSES: usize = 4;
pub const BISECTION_ITERATIONS: usize = 64;
/// Upper bound of the payload search as a multiple of the vehicle's wet mass.
pub const PAYLOAD_SEARCH_FACTOR: f64 = 5.0;

/// Payload solver owning the launch-stage simulation cache.
///
/// The cache is cleared at the start of every [`PayloadCalculator::compute`], so nothing
/// leaks between vehicles or requests.
#[derive(Debug, Default)]
pub struct PayloadCalculator {
    cache: BottomStageCache,
}

impl PayloadCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(cache: BottomStageCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &BottomStageCache {
        &self.cache
    }

    /// Estimate the heaviest payload `stats` can put into the orbit described by `targets`.
    ///
    /// `targets` is re-clamped before use; the clamped values are reported in the result.
    pub fn compute(
        &mut self,
        stats: &VesselStats,
        targets: &OrbitTargets<'_>,
        config: &LossModelConfig,
    ) -> Result<PayloadCalculationResult, PayloadError> {
        if !stats.has_vessel {
            return Err(PayloadError::NoVessel);
        }
        let body = targets.launch_body.ok_or(PayloadError::NoBody)?;
        let targets = targets.clamped()?;
        self.cache.clear();

        let r_pe = body.radius_m + targets.periapsis_altitude_m;
        let r_ap = body.radius_m + targets.apoapsis_altitude_m;
        let shape = OrbitShape::from_radii(r_pe, r_ap);
        let orbital_speed = shape.periapsis_speed(body.mu_m3_s2);
        let ideal = ideal_surface_to_orbit(body.mu_m3_s2, body.radius_m, r_pe, r_ap);

        let plane = plane_change(
            targets.launch_latitude_deg,
            targets.target_inclination_deg,
            orbital_speed,
        );
        let mut warnings = Vec::new();
        if plane.required {
            warn!(
                latitude = targets.launch_latitude_deg,
                inclination = targets.target_inclination_deg,
                delta_v = plane.delta_v,
                "target inclination below launch latitude, adding plane change"
            );
            warnings.push(PayloadWarning::InclinationBelowLatitude);
        }
        let inertial_dv = rotation_adjusted_dv(
            ideal.total_dv,
            body.equatorial_speed_m_s(),
            targets.launch_latitude_deg,
            plane.launch_inclination_deg,
        );

        let turn = resolve_turn_parameters(
            Some(body),
            config.mode,
            config.manual_turn_speed(),
            config.manual_turn_altitude(),
            None,
        );
        let exponent_bottom = turn_exponent_bottom(turn.speed_m_s);
        let profile = AscentProfile {
            body: Some(body),
            turn_start_speed_m_s: Some(turn.speed_m_s),
            turn_start_altitude_m: Some(turn.altitude_m),
            cda_coefficient: config.effective_cda_coefficient(),
            turn_exponent_bottom: exponent_bottom,
        };

        let (available_dv, bottom_stage, active_stages, dv_sea_level, dv_vacuum) =
            if stats.stages.is_empty() {
                (
                    simple_dv(stats, &profile, &mut self.cache),
                    None,
                    Vec::new(),
                    simple_dv_for_display(stats, Some(body), true),
                    simple_dv_for_display(stats, Some(body), false),
                )
            } else {
                let staged = staged_dv(stats, &profile, &mut self.cache);
                (
                    staged.total_dv,
                    staged.bottom_stage,
                    staged.active_stages,
                    staged_dv_for_display(stats, Some(body), true),
                    staged_dv_for_display(stats, Some(body), false),
                )
            };
        if !(available_dv > 0.0) {
            return Err(PayloadError::ZeroAvailableDv);
        }

        let mut payload_t = 0.0;
        let mut losses = LossEstimate::empty(config.mode);
        let mut required_dv = 0.0;
        for pass in 0..REFINEMENT_PASSES {
            losses = estimate(&targets, config, stats, payload_t);
            required_dv = (inertial_dv + losses.total_dv + plane.delta_v).max(0.0);
            payload_t = self.max_payload(stats, &profile, bottom_stage, required_dv);
            debug!(pass, required_dv, losses = losses.total_dv, payload_t, "payload refined");
        }
        losses.turn_exponent_bottom = Some(exponent_bottom);

        debug!(
            vessel = %stats.name,
            body = %body.name,
            available_dv,
            required_dv,
            payload_t,
            cache_hits = self.cache.hits(),
            "payload computed"
        );

        Ok(PayloadCalculationResult {
            vessel_name: stats.name.clone(),
            body_name: body.name.clone(),
            required_dv,
            available_dv,
            available_dv_sea_level: dv_sea_level,
            available_dv_vacuum: dv_vacuum,
            estimated_payload_t: payload_t,
            orbital_speed,
            rotation_dv: inertial_dv - ideal.total_dv,
            plane_change_dv: plane.delta_v,
            ideal,
            launch_inclination_deg: plane.launch_inclination_deg,
            periapsis_altitude_m: targets.periapsis_altitude_m,
            apoapsis_altitude_m: targets.apoapsis_altitude_m,
            eccentricity: shape.eccentricity,
            inclination_deg: targets.target_inclination_deg,
            launch_latitude_deg: targets.launch_latitude_deg,
            losses,
            active_stages,
            warnings,
        })
    }

    /// Available delta-v with `extra_payload_t` on top of the vehicle.
    pub fn available_dv_with_payload(
        &mut self,
        stats: &VesselStats,
        profile: &AscentProfile<'_>,
        bottom_stage: Option<i32>,
        extra_payload_t: f64,
    ) -> f64 {
        if stats.stages.is_empty() {
            simple_dv_with_extra_payload(stats, profile, &mut self.cache, extra_payload_t)
        } else {
            staged_dv_with_extra_payload(
                stats,
                profile,
                &mut self.cache,
                bottom_stage,
                extra_payload_t,
            )
        }
    }

    /// Bisect for the heaviest payload whose available delta-v still covers `required_dv`.
    fn max_payload(
        &mut self,
        stats: &VesselStats,
        profile: &AscentProfile<'_>,
        bottom_stage: Option<i32>,
        required_dv: f64,
    ) -> f64 {
        if self.available_dv_with_payload(stats, profile, bottom_stage, 0.0) < required_dv {
            return 0.0;
        }
        let mut lo = 0.0;
        let mut hi = stats.wet_mass_t * PAYLOAD_SEARCH_FACTOR;
        for _ in 0..BISECTION_ITERATIONS {
            let mid = (lo + hi) * 0.5;
            if self.available_dv_with_payload(stats, profile, bottom_stage, mid) >= required_dv {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        lo
    }
}

/// One-off computation with a fresh cache.
pub fn compute(
    stats: &VesselStats,
    targets: &OrbitTargets<'_>,
    config: &LossModelConfig,
) -> Result<PayloadCalculationResult, PayloadError> {
    PayloadCalculator::new().compute(stats, targets, config)
}
