//! Staged delta-v: walks the stack from the top stage down, carrying the mass above.
//!
//! Stages are visited in ascending stage number (stage 0 fires last). Each stage burns with
//! everything above it on top; afterwards its residual mass (propellant burned, fairing
//! jettisoned) joins the load carried by the stages below. The launch stage may be flown
//! through the atmosphere with [`payload_ascent::simulate_bottom_stage`]; every other
//! stage uses the rocket equation with vacuum Isp.

use payload_ascent::{BottomStageCache, BottomStageRequest, effective_isp};
use payload_core::constants::G0;
use payload_orbits::CelestialBody;
use payload_propulsion::{StageInfo, StageResult, VesselStats};
use tracing::trace;

/// Ascent parameters shared by every staged evaluation in one computation.
#[derive(Debug, Clone, Copy)]
pub struct AscentProfile<'a> {
    pub body: Option<&'a CelestialBody>,
    pub turn_start_speed_m_s: Option<f64>,
    pub turn_start_altitude_m: Option<f64>,
    pub cda_coefficient: f64,
    pub turn_exponent_bottom: f64,
}

/// Delta-v of one stage and the Isp it corresponds to.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StageDv {
    pub delta_v: f64,
    pub effective_isp_s: f64,
}

/// Result of a full staged evaluation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StagedDv {
    pub total_dv: f64,
    pub bottom_stage: Option<i32>,
    pub active_stages: Vec<StageResult>,
}

/// Delta-v of `stage` burning from `wet_t` down to `dry_t` (both including the mass above).
///
/// The fairing is dropped first. For the launch stage the closed-form dry mass also excludes
/// every booster group. The launch stage in a simulated atmosphere is flown dynamically; a
/// non-positive simulated result falls back to the closed form.
pub fn stage_delta_v(
    stage: &StageInfo,
    wet_t: f64,
    dry_t: f64,
    is_bottom_stage: bool,
    profile: &AscentProfile<'_>,
    cache: &mut BottomStageCache,
) -> StageDv {
    let (mut wet, mut dry) = (wet_t, dry_t);
    if stage.fairing_mass_t > 0.0 {
        wet = (wet - stage.fairing_mass_t).max(0.001);
        dry = (dry - stage.fairing_mass_t).max(0.001);
    }
    if wet <= dry || dry <= 0.0 {
        return StageDv::default();
    }

    let closed_form_dry = if is_bottom_stage && !stage.separation_groups.is_empty() {
        (dry - stage.separable_dry_mass_t()).max(0.01)
    } else {
        dry
    };
    if wet <= closed_form_dry {
        return StageDv::default();
    }
    let ln_mass_ratio = (wet / closed_form_dry).ln();
    if ln_mass_ratio <= 0.0 {
        return StageDv::default();
    }

    if let Some(body) = profile.body {
        if is_bottom_stage
            && body.has_simulated_atmosphere()
            && stage.vacuum_isp_s > 0.0
            && stage.thrust_kn > 0.0
        {
            let request = BottomStageRequest {
                body,
                stage,
                wet_mass_t: wet,
                dry_mass_t: dry,
                turn_start_speed_m_s: profile.turn_start_speed_m_s,
                turn_start_altitude_m: profile.turn_start_altitude_m,
                cda_coefficient: profile.cda_coefficient,
                turn_exponent: profile.turn_exponent_bottom,
            };
            let dv = cache.simulate(&request);
            if dv > 0.0 {
                return StageDv {
                    delta_v: dv,
                    effective_isp_s: dv / (G0 * ln_mass_ratio),
                };
            }
        }
    }

    let isp = effective_isp(
        stage.vacuum_isp_s,
        stage.sea_level_isp_s,
        profile.body,
        is_bottom_stage,
    );
    if isp <= 0.0 {
        return StageDv::default();
    }
    StageDv {
        delta_v: isp * G0 * ln_mass_ratio,
        effective_isp_s: isp,
    }
}

/// Staged delta-v of the empty vehicle, with per-stage results.
pub fn staged_dv(
    stats: &VesselStats,
    profile: &AscentProfile<'_>,
    cache: &mut BottomStageCache,
) -> StagedDv {
    let bottom = stats.bottom_stage_number();
    let mut active = Vec::new();
    let total_dv = walk_stages(stats, profile, cache, bottom, 0.0, Some(&mut active));
    StagedDv {
        total_dv,
        bottom_stage: bottom,
        active_stages: active,
    }
}

/// Staged delta-v with `extra_payload_t` riding above the top stage.
pub fn staged_dv_with_extra_payload(
    stats: &VesselStats,
    profile: &AscentProfile<'_>,
    cache: &mut BottomStageCache,
    bottom_stage: Option<i32>,
    extra_payload_t: f64,
) -> f64 {
    walk_stages(stats, profile, cache, bottom_stage, extra_payload_t, None)
}

fn walk_stages(
    stats: &VesselStats,
    profile: &AscentProfile<'_>,
    cache: &mut BottomStageCache,
    bottom_stage: Option<i32>,
    extra_payload_t: f64,
    mut results: Option<&mut Vec<StageResult>>,
) -> f64 {
    let surface_accel = profile.body.map_or(G0, |b| b.surface_gravity_g * G0);
    let mut total_dv = 0.0;
    let mut mass_above = extra_payload_t;

    for stage in stats.sorted_stages() {
        if !stage.is_propulsive() {
            mass_above += stage.residual_mass_t();
            continue;
        }

        let stage_wet = stage.wet_mass_t + mass_above;
        let stage_dry = stage_wet - stage.propellant_mass_t;
        if stage_dry <= 0.0 || stage_wet <= stage_dry {
            mass_above += stage.wet_mass_t;
            continue;
        }

        let is_bottom = bottom_stage == Some(stage.stage_number);
        let dv = stage_delta_v(stage, stage_wet, stage_dry, is_bottom, profile, cache);
        if dv.delta_v <= 0.0 {
            mass_above += stage.wet_mass_t;
            continue;
        }

        if let Some(results) = results.as_deref_mut() {
            let twr = if stage_wet > 0.0 && surface_accel > 0.0 {
                stage.sea_level_thrust_kn() / (stage_wet * surface_accel)
            } else {
                0.0
            };
            let used_sea_level_isp = is_bottom
                && profile.body.is_some_and(CelestialBody::has_atmosphere)
                && dv.effective_isp_s + 1e-6 < stage.vacuum_isp_s;
            results.push(StageResult {
                stage_number: stage.stage_number,
                delta_v: dv.delta_v,
                effective_isp_s: dv.effective_isp_s,
                used_sea_level_isp,
                mass_at_ignition_t: stage_wet,
                mass_after_burn_t: stage_dry,
                twr_at_ignition: twr,
            });
        }
        trace!(
            stage = stage.stage_number,
            delta_v = dv.delta_v,
            isp = dv.effective_isp_s,
            mass_above,
            "stage evaluated"
        );

        total_dv += dv.delta_v;
        mass_above += stage.residual_mass_t();
    }
    total_dv
}

/// Closed-form staged delta-v with a single Isp flavour throughout, for comparison displays.
///
/// `use_sea_level_isp` only applies on bodies with an atmosphere. Never simulates.
pub fn staged_dv_for_display(
    stats: &VesselStats,
    body: Option<&CelestialBody>,
    use_sea_level_isp: bool,
) -> f64 {
    let sea_level = use_sea_level_isp && body.is_some_and(CelestialBody::has_atmosphere);
    let bottom = stats.bottom_stage_number();
    let mut total_dv = 0.0;
    let mut mass_above = 0.0;

    for stage in stats.sorted_stages() {
        if !stage.is_propulsive() {
            mass_above += stage.residual_mass_t();
            continue;
        }
        let isp = if sea_level {
            stage.sea_level_isp_s
        } else {
            stage.vacuum_isp_s
        };

        let mut wet = stage.wet_mass_t + mass_above;
        let mut dry = wet - stage.propellant_mass_t;
        if bottom == Some(stage.stage_number) {
            dry -= stage.separable_dry_mass_t();
        }
        if stage.fairing_mass_t > 0.0 {
            wet = (wet - stage.fairing_mass_t).max(0.001);
            dry = (dry - stage.fairing_mass_t).max(0.001);
        }
        if isp <= 0.0 || dry <= 0.0 || wet <= dry {
            mass_above += stage.wet_mass_t;
            continue;
        }

        total_dv += isp * G0 * (wet / dry).ln();
        mass_above += stage.residual_mass_t();
    }
    total_dv
}

/// Delta-v of a stage-less vehicle described only by its aggregates.
pub fn simple_dv(
    stats: &VesselStats,
    profile: &AscentProfile<'_>,
    cache: &mut BottomStageCache,
) -> f64 {
    if stats.wet_mass_t <= 0.0 || stats.dry_mass_t <= 0.0 || stats.wet_mass_t <= stats.dry_mass_t
    {
        return 0.0;
    }
    simple_dv_with_extra_payload(stats, profile, cache, 0.0)
}

/// [`simple_dv`] with `extra_payload_t` added to both wet and dry mass.
///
/// The aggregates are treated as a single launch stage with no per-engine data.
pub fn simple_dv_with_extra_payload(
    stats: &VesselStats,
    profile: &AscentProfile<'_>,
    cache: &mut BottomStageCache,
    extra_payload_t: f64,
) -> f64 {
    let wet = stats.wet_mass_t + extra_payload_t;
    let dry = stats.dry_mass_t + extra_payload_t;
    if wet <= 0.0 || dry <= 0.0 || wet <= dry {
        return 0.0;
    }
    let stage = StageInfo {
        vacuum_isp_s: stats.vacuum_isp_s,
        sea_level_isp_s: stats.sea_level_isp_s,
        thrust_kn: stats.total_thrust_kn,
        ..StageInfo::default()
    };
    stage_delta_v(&stage, wet, dry, true, profile, cache).delta_v
}

/// Closed-form counterpart of [`simple_dv`] for comparison displays.
pub fn simple_dv_for_display(
    stats: &VesselStats,
    body: Option<&CelestialBody>,
    use_sea_level_isp: bool,
) -> f64 {
    let isp = if use_sea_level_isp && body.is_some_and(CelestialBody::has_atmosphere) {
        stats.sea_level_isp_s
    } else {
        stats.vacuum_isp_s
    };
    if isp <= 0.0 || stats.wet_mass_t <= 0.0 || stats.dry_mass_t <= 0.0 || stats.wet_mass_t <= stats.dry_mass_t
    {
        return 0.0;
    }
    isp * G0 * (stats.wet_mass_t / stats.dry_mass_t).ln()
}
