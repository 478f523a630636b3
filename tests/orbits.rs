use approx::{assert_abs_diff_eq, assert_relative_eq};
use orbital_payload_calculator::orbits::{
    Atmosphere, AtmosphereProfile, CelestialBody, IdealDvModel, OrbitShape, OrbitTargets,
    TargetError, ideal_surface_to_orbit, plane_change, rotation_adjusted_dv, select_ideal_model,
};

fn kerbin() -> CelestialBody {
    CelestialBody {
        name: "Kerbin".into(),
        radius_m: 600_000.0,
        mu_m3_s2: 3.5316e12,
        surface_gravity_g: 1.0,
        rotation_period_s: 21_549.425,
        soi_radius_m: 84_159_286.0,
        atmosphere: Some(Atmosphere {
            depth_m: 70_000.0,
            sea_level_pressure_kpa: 101.325,
            profile: AtmosphereProfile::Exponential {
                scale_height_m: 5_600.0,
                sea_level_temperature_k: 288.15,
                lapse_rate_k_per_m: 0.0065,
                min_temperature_k: 200.0,
            },
        }),
    }
}

fn mun() -> CelestialBody {
    CelestialBody {
        name: "Mun".into(),
        radius_m: 200_000.0,
        mu_m3_s2: 6.5138398e10,
        surface_gravity_g: 0.166,
        rotation_period_s: 138_984.38,
        soi_radius_m: 2_429_559.1,
        atmosphere: None,
    }
}

#[test]
fn model_boundary_follows_alpha_and_eccentricity() {
    assert_eq!(select_ideal_model(1.49, 0.5), IdealDvModel::EnergyOptimal);
    assert_eq!(select_ideal_model(1.5, 0.0999), IdealDvModel::EnergyOptimal);
    assert_eq!(select_ideal_model(1.5, 0.1), IdealDvModel::HohmannStructured);
    assert_eq!(select_ideal_model(2.0, 0.05), IdealDvModel::EnergyOptimal);
    assert_eq!(select_ideal_model(2.01, 0.0), IdealDvModel::HohmannStructured);
}

#[test]
fn low_orbit_uses_energy_optimal_bound() {
    let body = kerbin();
    let r0 = body.radius_m;
    let r = r0 + 80_000.0;
    let ideal = ideal_surface_to_orbit(body.mu_m3_s2, r0, r, r);
    assert!(ideal.uses_energy_optimal_model());
    let expected = (2.0 * body.mu_m3_s2 * (1.0 / r0 - 1.0 / (2.0 * r))).sqrt();
    assert_relative_eq!(ideal.total_dv, expected, max_relative = 1e-12);
    assert_eq!(ideal.burns[1], 0.0);
}

#[test]
fn high_orbit_uses_structured_hohmann_burns() {
    let body = mun();
    let r0 = body.radius_m;
    let r_pe = r0 + 500_000.0;
    let r_ap = r0 + 900_000.0;
    let ideal = ideal_surface_to_orbit(body.mu_m3_s2, r0, r_pe, r_ap);
    assert_eq!(ideal.model, IdealDvModel::HohmannStructured);
    assert!(ideal.burns.iter().all(|b| *b >= 0.0));
    assert!(ideal.burns[2] > 0.0, "elliptic target needs an apoapsis raise");
    assert_relative_eq!(ideal.total_dv, ideal.burns.iter().sum::<f64>(), max_relative = 1e-12);
}

#[test]
fn degenerate_geometry_gives_zero() {
    let ideal = ideal_surface_to_orbit(3.5316e12, 600_000.0, 500_000.0, 700_000.0);
    assert_eq!(ideal.total_dv, 0.0);
}

#[test]
fn orbit_shape_eccentricity_and_periapsis_speed() {
    let shape = OrbitShape::from_radii(700_000.0, 900_000.0);
    assert_relative_eq!(shape.eccentricity, 0.125, max_relative = 1e-12);
    let mu: f64 = 3.5316e12;
    let expected = (mu * (2.0 / 700_000.0 - 1.0 / 800_000.0)).sqrt();
    assert_relative_eq!(shape.periapsis_speed(mu), expected, max_relative = 1e-12);
}

#[test]
fn plane_change_from_mid_latitude_to_equator() {
    let speed = 2_300.0;
    let plane = plane_change(45.0, 0.0, speed);
    assert!(plane.required);
    assert_abs_diff_eq!(plane.launch_inclination_deg, 45.0);
    assert_relative_eq!(
        plane.delta_v,
        2.0 * speed * (22.5_f64).to_radians().sin(),
        max_relative = 1e-12
    );
}

#[test]
fn plane_change_mirrors_retrograde_targets() {
    let plane = plane_change(-30.0, 170.0, 2_000.0);
    assert!(plane.required);
    assert_abs_diff_eq!(plane.effective_inclination_deg, 10.0, epsilon = 1e-12);
    assert_abs_diff_eq!(plane.launch_inclination_deg, 150.0, epsilon = 1e-12);
}

#[test]
fn plane_change_has_half_degree_slack() {
    let plane = plane_change(10.0, 9.6, 2_000.0);
    assert!(!plane.required);
    assert_eq!(plane.delta_v, 0.0);
    assert_eq!(plane.launch_inclination_deg, 9.6);
}

#[test]
fn rotation_assists_prograde_and_penalises_retrograde() {
    let body = kerbin();
    let v_eq = body.equatorial_speed_m_s();
    assert!(v_eq > 170.0 && v_eq < 180.0);
    let ideal = 3_400.0;
    let prograde = rotation_adjusted_dv(ideal, v_eq, 0.0, 0.0);
    let retrograde = rotation_adjusted_dv(ideal, v_eq, 0.0, 180.0);
    assert_relative_eq!(prograde, ideal - v_eq, max_relative = 1e-12);
    assert_relative_eq!(retrograde, ideal + v_eq, max_relative = 1e-12);
    assert_eq!(rotation_adjusted_dv(ideal, 0.0, 0.0, 0.0), ideal);
}

#[test]
fn default_altitudes_depend_on_atmosphere() {
    let kerbin = kerbin();
    let mun = mun();
    assert_eq!(OrbitTargets::default_altitude_for(&kerbin), 80_000.0);
    assert_eq!(OrbitTargets::default_altitude_for(&mun), 100_000.0);
    let targets = OrbitTargets::for_body(&kerbin);
    assert_eq!(targets.periapsis_altitude_m, 80_000.0);
    assert_eq!(targets.apoapsis_altitude_m, 80_000.0);
}

#[test]
fn clamping_orders_and_bounds_targets() {
    let body = kerbin();
    let targets = OrbitTargets {
        launch_body: Some(&body),
        launch_latitude_deg: 120.0,
        periapsis_altitude_m: 250_000.0,
        apoapsis_altitude_m: 10.0,
        target_inclination_deg: -15.0,
    }
    .clamped()
    .expect("within SOI");
    assert_eq!(targets.launch_latitude_deg, 90.0);
    assert_eq!(targets.periapsis_altitude_m, 1_000.0);
    assert_eq!(targets.apoapsis_altitude_m, 250_000.0);
    assert_eq!(targets.target_inclination_deg, 0.0);
}

#[test]
fn clamping_replaces_nan_inputs() {
    let body = kerbin();
    let targets = OrbitTargets {
        launch_body: Some(&body),
        launch_latitude_deg: f64::NAN,
        periapsis_altitude_m: 100_000.0,
        apoapsis_altitude_m: 100_000.0,
        target_inclination_deg: f64::NAN,
    }
    .clamped()
    .expect("valid orbit");
    assert_eq!(targets.launch_latitude_deg, 0.0);
    assert_eq!(targets.target_inclination_deg, 0.0);
}

#[test]
fn apoapsis_beyond_soi_is_rejected() {
    let body = mun();
    let mut targets = OrbitTargets::for_body(&body);
    targets.apoapsis_altitude_m = 5_000_000.0;
    let err = targets.clamped().expect_err("outside SOI");
    match err {
        TargetError::ApoapsisExceedsSoi { limit_m, .. } => {
            assert_relative_eq!(limit_m, body.soi_radius_m - body.radius_m);
        }
    }
}

#[test]
fn exponential_and_tabulated_atmospheres() {
    let body = kerbin();
    assert_relative_eq!(body.pressure_kpa(0.0), 101.325);
    assert_relative_eq!(
        body.pressure_kpa(5_600.0),
        101.325 * (-1.0_f64).exp(),
        max_relative = 1e-12
    );
    assert_eq!(body.pressure_kpa(70_000.0), 0.0);
    assert_eq!(body.temperature_k(50_000.0), 200.0);

    let table = Atmosphere {
        depth_m: 50_000.0,
        sea_level_pressure_kpa: 6.0,
        profile: AtmosphereProfile::Tabulated {
            pressure_kpa: orbital_payload_calculator::core::curve::SampleCurve::from_slices(
                &[0.0, 10_000.0, 50_000.0],
                &[6.0, 2.0, 0.0],
            ),
            temperature_k: orbital_payload_calculator::core::curve::SampleCurve::from_slices(
                &[0.0, 50_000.0],
                &[230.0, 170.0],
            ),
        },
    };
    assert_relative_eq!(table.pressure_kpa(5_000.0), 4.0, max_relative = 1e-12);
    assert_relative_eq!(table.temperature_k(25_000.0), 200.0, max_relative = 1e-12);
    assert_eq!(table.pressure_kpa(60_000.0), 0.0);
}
