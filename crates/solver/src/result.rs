use payload_ascent::LossEstimate;
use payload_orbits::IdealAscent;
use payload_propulsion::StageResult;

use crate::error::PayloadWarning;

/// Everything a successful payload computation derived, for display and export.
#[derive(Debug, Clone, PartialEq)]
pub struct PayloadCalculationResult {
    pub vessel_name: String,
    pub body_name: String,
    /// Delta-v needed from the pad: inertial ascent plus losses plus plane change.
    pub required_dv: f64,
    /// Delta-v of the empty vehicle along the simulated ascent profile.
    pub available_dv: f64,
    /// Closed-form delta-v with sea-level Isp throughout (vacuum Isp on airless bodies).
    pub available_dv_sea_level: f64,
    pub available_dv_vacuum: f64,
    pub estimated_payload_t: f64,
    /// Speed at periapsis of the target orbit.
    pub orbital_speed: f64,
    /// Inertial minus ideal delta-v: negative for a rotation assist, positive for a penalty.
    pub rotation_dv: f64,
    pub plane_change_dv: f64,
    pub ideal: IdealAscent,
    /// Inclination flown from the pad after any plane-change adjustment.
    pub launch_inclination_deg: f64,
    pub periapsis_altitude_m: f64,
    pub apoapsis_altitude_m: f64,
    pub eccentricity: f64,
    pub inclination_deg: f64,
    pub launch_latitude_deg: f64,
    pub losses: LossEstimate,
    /// Stages that contributed delta-v, in ascending stage-number order.
    pub active_stages: Vec<StageResult>,
    pub warnings: Vec<PayloadWarning>,
}

impl PayloadCalculationResult {
    pub fn has_warning(&self, warning: PayloadWarning) -> bool {
        self.warnings.contains(&warning)
    }

    /// Margin between available and required delta-v for the empty vehicle.
    pub fn dv_margin(&self) -> f64 {
        self.available_dv - self.required_dv
    }
}
