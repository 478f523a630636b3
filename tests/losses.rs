mod common;

use approx::assert_relative_eq;
use common::{kerbin, mun, two_stage, vacuum_lander};
use orbital_payload_calculator::ascent::losses::simulated_attitude_loss;
use orbital_payload_calculator::ascent::{
    EstimateMode, LossEstimate, LossModelConfig, atmosphere_blend_factor, default_blend_factor,
    effective_isp, estimate, fallback_estimate, resolve_turn_parameters, turn_exponent_bottom,
    turn_exponent_full,
};
use orbital_payload_calculator::orbits::OrbitTargets;
use orbital_payload_calculator::propulsion::VesselStats;

fn no_engines() -> VesselStats {
    VesselStats::single_stage("Inert", 10.0, 2.0, 0.0, 0.0, 0.0)
}

#[test]
fn vacuum_ascent_has_no_drag_and_vacuum_steering_loss() {
    let body = mun();
    let mut targets = OrbitTargets::for_body(&body);
    targets.target_inclination_deg = 30.0;
    let config = LossModelConfig::default();
    let losses = estimate(&targets, &config, &vacuum_lander(), 0.0);

    assert!(losses.is_simulated());
    assert_eq!(losses.atmospheric_dv, 0.0);
    assert!(losses.gravity_dv > 0.0);
    let expected = simulated_attitude_loss(&body, EstimateMode::Normal, 30.0, 0.0);
    assert_eq!(losses.attitude_dv, expected);
    assert_relative_eq!(
        losses.total_dv,
        losses.gravity_dv + losses.attitude_dv,
        max_relative = 1e-12
    );
}

#[test]
fn atmospheric_ascent_reports_gravity_and_drag() {
    let body = kerbin();
    let targets = OrbitTargets::for_body(&body);
    let losses = estimate(&targets, &LossModelConfig::default(), &two_stage(), 0.0);

    assert!(losses.gravity_dv > 0.0);
    assert!(losses.atmospheric_dv > 0.0);
    assert!(losses.attitude_dv > 0.0);
    let used = losses.used.expect("simulated ascent records its parameters");
    assert!((40.0..=220.0).contains(&used.turn_start_speed_m_s));
    assert!(!used.turn_start_speed_manual);
    assert!(!used.cda_manual);
    assert_relative_eq!(used.cda_m2, 1.0 * two_stage().wet_mass_t.sqrt(), max_relative = 1e-12);
}

#[test]
fn estimate_is_deterministic() {
    let body = kerbin();
    let targets = OrbitTargets::for_body(&body);
    let config = LossModelConfig::with_mode(EstimateMode::Pessimistic);
    let stats = two_stage();
    let first = estimate(&targets, &config, &stats, 1.5);
    let second = estimate(&targets, &config, &stats, 1.5);
    assert_eq!(first, second);
}

#[test]
fn manual_turn_parameters_are_flown() {
    let body = kerbin();
    let targets = OrbitTargets::for_body(&body);
    let config = LossModelConfig {
        turn_start_speed_m_s: Some(120.0),
        cda_coefficient: Some(2.0),
        ..LossModelConfig::default()
    };
    let used = estimate(&targets, &config, &two_stage(), 0.0)
        .used
        .expect("simulated");
    assert_eq!(used.turn_start_speed_m_s, 120.0);
    assert!(used.turn_start_speed_manual);
    assert!(!used.turn_start_altitude_manual);
    assert!(used.turn_start_altitude_from_speed);
    assert!(used.cda_manual);
    assert_eq!(used.turn_exponent_full, turn_exponent_full(120.0));
}

#[test]
fn overrides_replace_components_before_summing() {
    let body = kerbin();
    let targets = OrbitTargets::for_body(&body);
    let config = LossModelConfig {
        gravity_loss_override: Some(1000.0),
        atmospheric_loss_override: Some(0.0),
        attitude_loss_override: Some(50.0),
        ..LossModelConfig::default()
    };
    let losses = estimate(&targets, &config, &two_stage(), 0.0);
    assert_eq!(losses.gravity_dv, 1000.0);
    assert_eq!(losses.atmospheric_dv, 0.0);
    assert_eq!(losses.attitude_dv, 50.0);
    assert_eq!(losses.total_dv, 1050.0);
}

#[test]
fn fallback_without_propulsion_data() {
    let body = kerbin();
    let targets = OrbitTargets::for_body(&body);
    let losses = estimate(&targets, &LossModelConfig::default(), &no_engines(), 0.0);
    assert!(!losses.is_simulated());
    assert!(losses.atmospheric_dv >= 30.0);

    let mut direct = LossEstimate::empty(EstimateMode::Normal);
    fallback_estimate(&body, 0.0, 0.0, EstimateMode::Normal, &mut direct);
    assert_eq!(losses.gravity_dv, direct.gravity_dv);
    assert_eq!(losses.attitude_dv, direct.attitude_dv);
}

#[test]
fn fallback_on_airless_body_has_no_drag() {
    let body = mun();
    let mut losses = LossEstimate::empty(EstimateMode::Normal);
    fallback_estimate(&body, 45.0, 10.0, EstimateMode::Normal, &mut losses);
    assert_eq!(losses.atmospheric_dv, 0.0);
    assert!(losses.gravity_dv > 0.0);
    assert!(losses.attitude_dv > 0.0);
}

#[test]
fn fallback_losses_grow_from_optimistic_to_pessimistic() {
    let body = kerbin();
    let total = |mode| {
        let mut losses = LossEstimate::empty(mode);
        fallback_estimate(&body, 30.0, 5.0, mode, &mut losses);
        losses.gravity_dv + losses.atmospheric_dv + losses.attitude_dv
    };
    let optimistic = total(EstimateMode::Optimistic);
    let normal = total(EstimateMode::Normal);
    let pessimistic = total(EstimateMode::Pessimistic);
    assert!(optimistic < normal && normal < pessimistic);
}

#[test]
fn no_body_leaves_losses_at_zero() {
    let targets = OrbitTargets::default();
    let losses = estimate(&targets, &LossModelConfig::default(), &two_stage(), 0.0);
    assert_eq!(losses.total_dv, 0.0);
    assert!(!losses.is_simulated());
}

#[test]
fn turn_parameters_without_body_use_defaults() {
    let turn = resolve_turn_parameters(None, EstimateMode::Normal, None, None, None);
    assert_eq!(turn.speed_m_s, 70.0);
    assert_eq!(turn.altitude_m, 840.0);
}

#[test]
fn turn_parameters_stay_in_range() {
    let kerbin = kerbin();
    let mun = mun();
    for mode in [
        EstimateMode::Optimistic,
        EstimateMode::Normal,
        EstimateMode::Pessimistic,
    ] {
        for body in [&kerbin, &mun] {
            let turn = resolve_turn_parameters(Some(body), mode, None, None, Some(&two_stage()));
            assert!((40.0..=220.0).contains(&turn.speed_m_s));
            assert!(turn.altitude_m > 0.0);
        }
    }
    let vacuum = resolve_turn_parameters(Some(&mun), EstimateMode::Normal, Some(80.0), None, None);
    assert_relative_eq!(vacuum.altitude_m, 300.0, max_relative = 1e-12);
}

#[test]
fn turn_exponent_fits() {
    assert_eq!(turn_exponent_full(0.0), 0.70);
    assert_eq!(turn_exponent_bottom(-5.0), 0.58);
    assert_relative_eq!(turn_exponent_full(80.0), 0.66875, max_relative = 1e-12);
    assert_relative_eq!(turn_exponent_bottom(80.0), 0.55625, max_relative = 1e-12);
    assert_eq!(turn_exponent_full(1_000.0), 0.90);
    assert_relative_eq!(turn_exponent_bottom(10.0), 0.30625, max_relative = 1e-12);
}

#[test]
fn blend_factor_is_capped_and_zero_in_vacuum() {
    let kerbin = kerbin();
    let mun = mun();
    let blend = atmosphere_blend_factor(&kerbin);
    assert!(blend > 0.0 && blend <= 0.5);
    assert_eq!(atmosphere_blend_factor(&mun), 0.0);
    assert_eq!(default_blend_factor(&mun), 0.0);
    assert!((0.12..=0.55).contains(&default_blend_factor(&kerbin)));

    let isp = effective_isp(320.0, 280.0, Some(&kerbin), true);
    assert_relative_eq!(isp, 320.0 * (1.0 - blend) + 280.0 * blend, max_relative = 1e-12);
    assert_eq!(effective_isp(320.0, 280.0, Some(&kerbin), false), 320.0);
    assert_eq!(effective_isp(320.0, 280.0, Some(&mun), true), 320.0);
    assert_eq!(effective_isp(320.0, 280.0, None, true), 320.0);
}
