//! Engine entries and their roles.

use std::fmt;
use std::str::FromStr;

use payload_core::curve::SampleCurve;

/// What an engine is for. Only [`EngineRole::Main`], [`EngineRole::Solid`] and
/// [`EngineRole::Electric`] contribute to ascent delta-v; the rest are carried as mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EngineRole {
    #[default]
    Main,
    Solid,
    Electric,
    Retro,
    Settling,
    EscapeTower,
}

impl EngineRole {
    pub fn participates_in_dv(self) -> bool {
        matches!(self, Self::Main | Self::Solid | Self::Electric)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Solid => "solid",
            Self::Electric => "electric",
            Self::Retro => "retro",
            Self::Settling => "settling",
            Self::EscapeTower => "escape_tower",
        }
    }
}

impl fmt::Display for EngineRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "main" => Ok(Self::Main),
            "solid" => Ok(Self::Solid),
            "electric" => Ok(Self::Electric),
            "retro" => Ok(Self::Retro),
            "settling" => Ok(Self::Settling),
            "escape_tower" | "escapetower" => Ok(Self::EscapeTower),
            other => Err(format!("unknown engine role '{other}'")),
        }
    }
}

/// One engine as seen by the bottom-stage simulator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineEntry {
    pub thrust_kn: f64,
    pub vacuum_isp_s: f64,
    pub sea_level_isp_s: f64,
    pub role: EngineRole,
    /// Part-contained propellant; only meaningful for solids (liquids are pooled per stage).
    pub propellant_mass_t: f64,
    pub propellant_names: Vec<String>,
    /// Dry mass of the part carrying this engine, dropped with its separation group.
    pub part_dry_mass_t: f64,
    /// Isp (s) against ambient pressure (atm).
    pub isp_curve: SampleCurve,
    /// Thrust multiplier against burned propellant fraction; solids only.
    pub thrust_curve: SampleCurve,
}

impl EngineEntry {
    pub fn is_solid(&self) -> bool {
        self.role == EngineRole::Solid
    }

    pub fn uses_propellant(&self, name: &str) -> bool {
        !name.is_empty()
            && self
                .propellant_names
                .iter()
                .any(|p| p.eq_ignore_ascii_case(name))
    }

    /// Isp at `pressure_atm`, from the sample table when present, otherwise a linear blend
    /// between vacuum and sea level with pressure clamped to `[0, 1]`.
    pub fn isp_at_pressure(&self, pressure_atm: f64) -> f64 {
        self.isp_curve.evaluate(pressure_atm).unwrap_or_else(|| {
            self.vacuum_isp_s
                + (self.sea_level_isp_s - self.vacuum_isp_s) * pressure_atm.clamp(0.0, 1.0)
        })
    }

    /// Thrust multiplier at `burn_fraction` (clamped to `[0, 1]`); 1 without a curve.
    pub fn thrust_multiplier(&self, burn_fraction: f64) -> f64 {
        self.thrust_curve
            .evaluate(burn_fraction.clamp(0.0, 1.0))
            .unwrap_or(1.0)
    }
}
