#![allow(dead_code)]

use std::collections::BTreeMap;

use orbital_payload_calculator::orbits::{Atmosphere, AtmosphereProfile, CelestialBody};
use orbital_payload_calculator::propulsion::{
    EngineEntry, EngineRole, SeparationGroup, StageInfo, VesselStats,
};

pub fn kerbin() -> CelestialBody {
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

pub fn mun() -> CelestialBody {
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

pub fn liquid_engine(thrust_kn: f64, vacuum_isp_s: f64, sea_level_isp_s: f64) -> EngineEntry {
    EngineEntry {
        thrust_kn,
        vacuum_isp_s,
        sea_level_isp_s,
        role: EngineRole::Main,
        propellant_names: vec!["LiquidFuel".into(), "Oxidizer".into()],
        ..EngineEntry::default()
    }
}

pub fn solid_booster(thrust_kn: f64, propellant_mass_t: f64) -> EngineEntry {
    EngineEntry {
        thrust_kn,
        vacuum_isp_s: 210.0,
        sea_level_isp_s: 195.0,
        role: EngineRole::Solid,
        propellant_mass_t,
        propellant_names: vec!["SolidFuel".into()],
        ..EngineEntry::default()
    }
}

pub fn liquid_stage(
    stage_number: i32,
    wet_mass_t: f64,
    propellant_mass_t: f64,
    engines: Vec<EngineEntry>,
) -> StageInfo {
    let mut by_name = BTreeMap::new();
    if propellant_mass_t > 0.0 {
        by_name.insert("LiquidFuel".to_string(), propellant_mass_t * 0.45);
        by_name.insert("Oxidizer".to_string(), propellant_mass_t * 0.55);
    }
    StageInfo {
        stage_number,
        wet_mass_t,
        propellant_mass_t,
        engines,
        propellant_by_name: by_name,
        ..StageInfo::default()
    }
}

/// Two-stage liquid rocket: 30 t lifter under a 6 t upper stage with a fairing.
pub fn two_stage() -> VesselStats {
    let mut upper = liquid_stage(0, 6.0, 4.0, vec![liquid_engine(60.0, 345.0, 85.0)]);
    upper.fairing_mass_t = 0.2;
    let lower = liquid_stage(1, 30.0, 24.0, vec![liquid_engine(650.0, 310.0, 285.0)]);
    VesselStats::from_stages("Two Stage", vec![upper, lower])
}

/// Launch stage with a liquid core and two solid boosters jettisoned as one group.
pub fn booster_stage(with_group: bool) -> StageInfo {
    let engines = vec![
        liquid_engine(400.0, 310.0, 280.0),
        solid_booster(300.0, 7.0),
        solid_booster(300.0, 7.0),
    ];
    let mut stage = liquid_stage(1, 42.0, 20.0, engines);
    stage.propellant_mass_t = 34.0;
    stage.propellant_by_name.insert("SolidFuel".into(), 14.0);
    if with_group {
        stage.separation_groups.push(SeparationGroup {
            engine_indices: [1, 2].into_iter().collect(),
            dry_mass_t: 5.0,
            liquid_propellant_t: 0.0,
        });
    }
    stage.refresh_engine_totals();
    stage
}

/// Launch stage with a liquid core and two liquid side boosters that carry
/// `group_liquid_t` of their own propellant and are jettisoned as one group.
pub fn asparagus_stage(group_liquid_t: f64) -> StageInfo {
    let engines = vec![
        liquid_engine(400.0, 310.0, 280.0),
        liquid_engine(300.0, 310.0, 280.0),
        liquid_engine(300.0, 310.0, 280.0),
    ];
    let mut stage = liquid_stage(1, 42.0, 34.0, engines);
    stage.separation_groups.push(SeparationGroup {
        engine_indices: [1, 2].into_iter().collect(),
        dry_mass_t: 5.0,
        liquid_propellant_t: group_liquid_t,
    });
    stage.refresh_engine_totals();
    stage
}

pub fn booster_rocket(with_group: bool) -> VesselStats {
    let mut upper = liquid_stage(0, 8.0, 6.0, vec![liquid_engine(60.0, 345.0, 85.0)]);
    upper.fairing_mass_t = 0.3;
    VesselStats::from_stages("Booster", vec![upper, booster_stage(with_group)])
}

/// Single-stage vacuum lander: 5 t wet, 4 t propellant, 300 s.
pub fn vacuum_lander() -> VesselStats {
    let stage = liquid_stage(0, 5.0, 4.0, vec![liquid_engine(60.0, 300.0, 300.0)]);
    VesselStats::from_stages("Lander", vec![stage])
}
