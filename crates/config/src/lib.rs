//! Configuration models and loaders for launch bodies and vessels.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use payload_core::curve::SampleCurve;
use payload_core::units::km_to_m;
use payload_orbits::{Atmosphere, AtmosphereProfile, CelestialBody};
use payload_propulsion::{
    EngineEntry, EngineRole, EngineSpec, SeparationGroup, StageInfo, VesselStats,
    classify_engines,
};
use serde::Deserialize;
use thiserror::Error;

/// Launch body parsed from catalog files.
#[derive(Debug, Deserialize, Clone)]
pub struct BodyConfig {
    pub name: String,
    pub radius_km: f64,
    pub mu_km3_s2: f64,
    /// Surface gravity in units of standard gravity.
    pub surface_gravity_g: f64,
    #[serde(default)]
    pub rotation_period_s: f64,
    pub soi_radius_km: f64,
    #[serde(default)]
    pub atmosphere: Option<AtmosphereConfig>,
}

/// Atmosphere envelope plus either an exponential or a tabulated profile.
///
/// A non-empty `samples` list selects the tabulated profile; otherwise `scale_height_km`
/// is required.
#[derive(Debug, Deserialize, Clone)]
pub struct AtmosphereConfig {
    pub depth_km: f64,
    pub sea_level_pressure_kpa: f64,
    #[serde(default)]
    pub scale_height_km: Option<f64>,
    #[serde(default = "default_sea_level_temperature")]
    pub sea_level_temperature_k: f64,
    #[serde(default)]
    pub lapse_rate_k_per_km: f64,
    #[serde(default)]
    pub min_temperature_k: f64,
    #[serde(default)]
    pub samples: Vec<AtmosphereSampleConfig>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct AtmosphereSampleConfig {
    pub altitude_km: f64,
    pub pressure_kpa: f64,
    pub temperature_k: f64,
}

fn default_sea_level_temperature() -> f64 {
    288.15
}

/// Vessel parsed from catalog files: stages listed in any order.
#[derive(Debug, Deserialize, Clone)]
pub struct VesselConfig {
    pub name: String,
    pub stages: Vec<StageConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StageConfig {
    /// Stage number; higher numbers fire earlier.
    pub stage: i32,
    pub wet_mass_t: f64,
    /// Used only when wet mass minus propellant is not positive.
    #[serde(default)]
    pub dry_mass_t: Option<f64>,
    /// Propellant mass by resource name (tons).
    #[serde(default)]
    pub propellant_t: BTreeMap<String, f64>,
    #[serde(default)]
    pub fairing_mass_t: f64,
    #[serde(default)]
    pub engines: Vec<EngineConfig>,
    #[serde(default)]
    pub separation_groups: Vec<SeparationGroupConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    #[serde(default)]
    pub name: String,
    pub thrust_kn: f64,
    pub vacuum_isp_s: f64,
    pub sea_level_isp_s: f64,
    /// Explicit role; classified from the hints below when absent.
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub propellants: Vec<String>,
    /// Part-contained propellant of solid motors (tons).
    #[serde(default)]
    pub propellant_mass_t: f64,
    #[serde(default)]
    pub part_dry_mass_t: f64,
    #[serde(default)]
    pub thrust_direction: Option<[f64; 3]>,
    #[serde(default)]
    pub self_contained: bool,
    #[serde(default)]
    pub abort_action: bool,
    /// `[pressure_atm, isp_s]` samples.
    #[serde(default)]
    pub isp_curve: Vec<[f64; 2]>,
    /// `[burned_fraction, thrust_multiplier]` samples; solids only.
    #[serde(default)]
    pub thrust_curve: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeparationGroupConfig {
    /// Indices into the stage's `engines` list.
    pub engines: Vec<usize>,
    /// Dropped dry mass; the engines' `part_dry_mass_t` summed when absent.
    #[serde(default)]
    pub dry_mass_t: Option<f64>,
    /// Liquid propellant in the separated parts that only the group's engines burn.
    #[serde(default)]
    pub liquid_propellant_t: f64,
}

/// Errors that can occur while loading or converting configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("body '{0}' not found in catalog")]
    UnknownBody(String),
    #[error("vessel '{0}' not found in catalog")]
    UnknownVessel(String),
    #[error("invalid atmosphere for '{body}': {reason}")]
    InvalidAtmosphere { body: String, reason: String },
    #[error("stage {stage} separation group {group} references missing engine {engine}")]
    InvalidSeparationGroup {
        stage: i32,
        group: usize,
        engine: usize,
    },
    #[error("engine '{engine}' in stage {stage}: {reason}")]
    InvalidEngineRole {
        stage: i32,
        engine: String,
        reason: String,
    },
}

/// Load body configurations from a directory of `.toml` files, a `.toml` file, or a YAML list.
pub fn load_bodies<P: AsRef<Path>>(path: P) -> Result<Vec<BodyConfig>, ConfigError> {
    load_records(path)
}

/// Load vessel configurations from a directory of `.toml` files, a `.toml` file, or a YAML list.
pub fn load_vessel_configs<P: AsRef<Path>>(path: P) -> Result<Vec<VesselConfig>, ConfigError> {
    load_records(path)
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_toml(path))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "toml")
}

/// Find a body by case-insensitive name.
pub fn find_body<'a>(bodies: &'a [BodyConfig], name: &str) -> Result<&'a BodyConfig, ConfigError> {
    bodies
        .iter()
        .find(|b| b.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| ConfigError::UnknownBody(name.to_string()))
}

/// Find a vessel by case-insensitive name.
pub fn find_vessel<'a>(
    vessels: &'a [VesselConfig],
    name: &str,
) -> Result<&'a VesselConfig, ConfigError> {
    vessels
        .iter()
        .find(|v| v.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| ConfigError::UnknownVessel(name.to_string()))
}

impl BodyConfig {
    /// Convert to the SI runtime body.
    pub fn to_body(&self) -> Result<CelestialBody, ConfigError> {
        let atmosphere = self
            .atmosphere
            .as_ref()
            .map(|atm| atm.to_atmosphere(&self.name))
            .transpose()?;
        Ok(CelestialBody {
            name: self.name.clone(),
            radius_m: km_to_m(self.radius_km),
            mu_m3_s2: self.mu_km3_s2 * 1.0e9,
            surface_gravity_g: self.surface_gravity_g,
            rotation_period_s: self.rotation_period_s,
            soi_radius_m: km_to_m(self.soi_radius_km),
            atmosphere,
        })
    }
}

impl AtmosphereConfig {
    fn to_atmosphere(&self, body: &str) -> Result<Atmosphere, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidAtmosphere {
            body: body.to_string(),
            reason: reason.to_string(),
        };
        if !(self.depth_km >= 0.0) || !(self.sea_level_pressure_kpa >= 0.0) {
            return Err(invalid("depth and sea-level pressure must be non-negative"));
        }

        let profile = if !self.samples.is_empty() {
            let altitude = |s: &AtmosphereSampleConfig| km_to_m(s.altitude_km);
            AtmosphereProfile::Tabulated {
                pressure_kpa: SampleCurve::new(
                    self.samples.iter().map(|s| (altitude(s), s.pressure_kpa)),
                ),
                temperature_k: SampleCurve::new(
                    self.samples.iter().map(|s| (altitude(s), s.temperature_k)),
                ),
            }
        } else {
            match self.scale_height_km {
                Some(h) if h > 0.0 => AtmosphereProfile::Exponential {
                    scale_height_m: km_to_m(h),
                    sea_level_temperature_k: self.sea_level_temperature_k,
                    lapse_rate_k_per_m: self.lapse_rate_k_per_km / 1000.0,
                    min_temperature_k: self.min_temperature_k,
                },
                _ => return Err(invalid("needs a positive scale_height_km or pressure samples")),
            }
        };

        Ok(Atmosphere {
            depth_m: km_to_m(self.depth_km),
            sea_level_pressure_kpa: self.sea_level_pressure_kpa,
            profile,
        })
    }
}

impl VesselConfig {
    /// Build the normalised vessel snapshot.
    ///
    /// Engines without an explicit role are classified across the whole vessel; propellant
    /// in stages without delta-v engines is handed to the stage that burns it.
    pub fn to_vessel_stats(&self) -> Result<VesselStats, ConfigError> {
        let specs: Vec<EngineSpec> = self
            .stages
            .iter()
            .flat_map(|stage| {
                stage.engines.iter().map(move |engine| EngineSpec {
                    stage_number: stage.stage,
                    thrust_kn: engine.thrust_kn,
                    thrust_direction: engine.thrust_direction.unwrap_or([0.0, 1.0, 0.0]),
                    self_contained_propellant: engine.self_contained,
                    has_abort_action: engine.abort_action,
                    propellant_names: engine.propellants.clone(),
                })
            })
            .collect();
        let mut classified = classify_engines(&specs).into_iter();

        let mut stages = Vec::with_capacity(self.stages.len());
        for stage in &self.stages {
            let mut engines = Vec::with_capacity(stage.engines.len());
            for engine in &stage.engines {
                let auto_role = classified.next().unwrap_or_default();
                let role = match &engine.role {
                    Some(role) => role.parse::<EngineRole>().map_err(|reason| {
                        ConfigError::InvalidEngineRole {
                            stage: stage.stage,
                            engine: engine.name.clone(),
                            reason,
                        }
                    })?,
                    None => auto_role,
                };
                engines.push(EngineEntry {
                    thrust_kn: engine.thrust_kn,
                    vacuum_isp_s: engine.vacuum_isp_s,
                    sea_level_isp_s: engine.sea_level_isp_s,
                    role,
                    propellant_mass_t: engine.propellant_mass_t,
                    propellant_names: engine.propellants.clone(),
                    part_dry_mass_t: engine.part_dry_mass_t,
                    isp_curve: SampleCurve::new(engine.isp_curve.iter().map(|[x, y]| (*x, *y))),
                    thrust_curve: SampleCurve::new(
                        engine.thrust_curve.iter().map(|[x, y]| (*x, *y)),
                    ),
                });
            }

            let mut separation_groups = Vec::with_capacity(stage.separation_groups.len());
            for (group_index, group) in stage.separation_groups.iter().enumerate() {
                if let Some(&engine) = group.engines.iter().find(|&&i| i >= engines.len()) {
                    return Err(ConfigError::InvalidSeparationGroup {
                        stage: stage.stage,
                        group: group_index,
                        engine,
                    });
                }
                let indices = group.engines.iter().copied().collect();
                let mut separation = SeparationGroup::from_engine_parts(indices, &engines);
                if let Some(dry_mass_t) = group.dry_mass_t {
                    separation.dry_mass_t = dry_mass_t;
                }
                separation.liquid_propellant_t = group.liquid_propellant_t.max(0.0);
                separation_groups.push(separation);
            }

            let propellant_by_name: BTreeMap<String, f64> = stage
                .propellant_t
                .iter()
                .filter(|(_, mass)| **mass > 0.0)
                .map(|(name, mass)| (name.clone(), *mass))
                .collect();
            let propellant_mass_t = propellant_by_name.values().sum();

            stages.push(StageInfo {
                stage_number: stage.stage,
                wet_mass_t: stage.wet_mass_t,
                dry_mass_t: stage.dry_mass_t.unwrap_or(stage.wet_mass_t),
                propellant_mass_t,
                separation_groups,
                engines,
                fairing_mass_t: stage.fairing_mass_t.max(0.0),
                propellant_by_name,
                ..StageInfo::default()
            });
        }

        Ok(VesselStats::from_stages(self.name.clone(), stages))
    }
}
