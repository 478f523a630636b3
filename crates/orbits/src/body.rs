//! Launch bodies and their atmosphere models.
//!
//! Bodies are read-only inputs to the solver: every query is a pure function of altitude.

use payload_core::constants::{ONE_ATM_KPA, REFERENCE_ATMOSPHERE_DEPTH_M, REFERENCE_RADIUS_M};
use payload_core::curve::SampleCurve;
use payload_core::numeric::clamp;

/// Vertical profile of an atmosphere below its depth.
#[derive(Debug, Clone, PartialEq)]
pub enum AtmosphereProfile {
    /// Isothermal-scale-height pressure with a linear temperature lapse.
    Exponential {
        scale_height_m: f64,
        sea_level_temperature_k: f64,
        lapse_rate_k_per_m: f64,
        min_temperature_k: f64,
    },
    /// Sampled pressure (kPa) and temperature (K) against altitude (m).
    Tabulated {
        pressure_kpa: SampleCurve,
        temperature_k: SampleCurve,
    },
}

/// Atmosphere envelope: pressure is zero at and above `depth_m`.
#[derive(Debug, Clone, PartialEq)]
pub struct Atmosphere {
    pub depth_m: f64,
    pub sea_level_pressure_kpa: f64,
    pub profile: AtmosphereProfile,
}

impl Atmosphere {
    /// Static pressure in kPa.
    pub fn pressure_kpa(&self, altitude_m: f64) -> f64 {
        if altitude_m >= self.depth_m {
            return 0.0;
        }
        let h = altitude_m.max(0.0);
        let p = match &self.profile {
            AtmosphereProfile::Exponential { scale_height_m, .. } => {
                if *scale_height_m <= 0.0 {
                    return 0.0;
                }
                self.sea_level_pressure_kpa * (-h / scale_height_m).exp()
            }
            AtmosphereProfile::Tabulated { pressure_kpa, .. } => {
                pressure_kpa.evaluate(h).unwrap_or(0.0)
            }
        };
        p.max(0.0)
    }

    /// Static temperature in kelvin.
    pub fn temperature_k(&self, altitude_m: f64) -> f64 {
        let h = altitude_m.max(0.0);
        let t = match &self.profile {
            AtmosphereProfile::Exponential {
                sea_level_temperature_k,
                lapse_rate_k_per_m,
                min_temperature_k,
                ..
            } => (sea_level_temperature_k - lapse_rate_k_per_m * h).max(*min_temperature_k),
            AtmosphereProfile::Tabulated { temperature_k, .. } => {
                temperature_k.evaluate(h).unwrap_or(0.0)
            }
        };
        t.max(0.0)
    }
}

/// A launch body as seen by the payload solver.
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialBody {
    pub name: String,
    pub radius_m: f64,
    /// Standard gravitational parameter (m³/s²).
    pub mu_m3_s2: f64,
    /// Surface gravity in units of G0.
    pub surface_gravity_g: f64,
    /// Sidereal rotation period (s); zero or negative disables the rotation correction.
    pub rotation_period_s: f64,
    /// Sphere-of-influence radius measured from the body centre (m).
    pub soi_radius_m: f64,
    pub atmosphere: Option<Atmosphere>,
}

impl CelestialBody {
    pub fn has_atmosphere(&self) -> bool {
        self.atmosphere.is_some()
    }

    /// Atmosphere present with a positive depth; the condition for running ascent drag simulations.
    pub fn has_simulated_atmosphere(&self) -> bool {
        self.atmosphere.as_ref().is_some_and(|atm| atm.depth_m > 0.0)
    }

    pub fn atmosphere_depth_m(&self) -> f64 {
        self.atmosphere.as_ref().map_or(0.0, |atm| atm.depth_m)
    }

    pub fn sea_level_pressure_kpa(&self) -> f64 {
        self.atmosphere
            .as_ref()
            .map_or(0.0, |atm| atm.sea_level_pressure_kpa)
    }

    pub fn pressure_kpa(&self, altitude_m: f64) -> f64 {
        self.atmosphere
            .as_ref()
            .map_or(0.0, |atm| atm.pressure_kpa(altitude_m))
    }

    pub fn temperature_k(&self, altitude_m: f64) -> f64 {
        self.atmosphere
            .as_ref()
            .map_or(0.0, |atm| atm.temperature_k(altitude_m))
    }

    /// Local gravitational acceleration at `altitude_m` (m/s²).
    pub fn gravity_at(&self, altitude_m: f64) -> f64 {
        let r = self.radius_m + altitude_m;
        self.mu_m3_s2 / (r * r)
    }

    /// Surface rotation speed at the equator (m/s), zero for non-rotating bodies.
    pub fn equatorial_speed_m_s(&self) -> f64 {
        if self.rotation_period_s > 0.0 {
            2.0 * std::f64::consts::PI * self.radius_m / self.rotation_period_s
        } else {
            0.0
        }
    }
}

/// Body properties normalised against the reference body and clamped to sane ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyScales {
    pub gravity: f64,
    pub pressure: f64,
    pub depth: f64,
    pub radius: f64,
}

impl BodyScales {
    pub fn of(body: &CelestialBody) -> Self {
        Self {
            gravity: clamp(body.surface_gravity_g, 0.05, 4.0),
            pressure: clamp(body.sea_level_pressure_kpa() / ONE_ATM_KPA, 0.0, 15.0),
            depth: clamp(
                body.atmosphere_depth_m() / REFERENCE_ATMOSPHERE_DEPTH_M,
                0.0,
                12.0,
            ),
            radius: clamp(body.radius_m / REFERENCE_RADIUS_M, 0.2, 15.0),
        }
    }
}
