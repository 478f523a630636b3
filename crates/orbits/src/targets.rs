//! Target-orbit descriptor and its range clamping.

use thiserror::Error;

use crate::body::CelestialBody;

const ATMOSPHERE_PADDING_M: f64 = 10_000.0;
const VACUUM_DEFAULT_ORBIT_M: f64 = 100_000.0;
const MIN_ALTITUDE_M: f64 = 1_000.0;
const UNBOUNDED_MAX_ALTITUDE_M: f64 = 1.0e12;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TargetError {
    #[error(
        "target orbit (periapsis {periapsis_m:.0} m, apoapsis {apoapsis_m:.0} m) reaches the sphere of influence limit {limit_m:.0} m"
    )]
    ApoapsisExceedsSoi {
        periapsis_m: f64,
        apoapsis_m: f64,
        limit_m: f64,
    },
}

/// Desired orbit around the launch body.
#[derive(Debug, Clone, Copy)]
pub struct OrbitTargets<'a> {
    pub launch_body: Option<&'a CelestialBody>,
    pub launch_latitude_deg: f64,
    pub periapsis_altitude_m: f64,
    pub apoapsis_altitude_m: f64,
    pub target_inclination_deg: f64,
}

impl Default for OrbitTargets<'_> {
    fn default() -> Self {
        Self {
            launch_body: None,
            launch_latitude_deg: 0.0,
            periapsis_altitude_m: VACUUM_DEFAULT_ORBIT_M,
            apoapsis_altitude_m: VACUUM_DEFAULT_ORBIT_M,
            target_inclination_deg: 0.0,
        }
    }
}

impl<'a> OrbitTargets<'a> {
    /// Circular orbit at the body's default altitude, equatorial launch.
    pub fn for_body(body: &'a CelestialBody) -> Self {
        let mut targets = Self {
            launch_body: Some(body),
            ..Self::default()
        };
        targets.apply_default_altitudes();
        targets
    }

    /// Top of the atmosphere plus padding, or a fixed low orbit for airless bodies.
    pub fn default_altitude_for(body: &CelestialBody) -> f64 {
        if body.has_simulated_atmosphere() {
            body.atmosphere_depth_m() + ATMOSPHERE_PADDING_M
        } else {
            VACUUM_DEFAULT_ORBIT_M
        }
    }

    pub fn apply_default_altitudes(&mut self) {
        let altitude = self
            .launch_body
            .map_or(VACUUM_DEFAULT_ORBIT_M, Self::default_altitude_for);
        self.periapsis_altitude_m = altitude;
        self.apoapsis_altitude_m = altitude;
    }

    pub fn clamp_latitude(&mut self) -> f64 {
        self.launch_latitude_deg = sanitize(self.launch_latitude_deg).clamp(-90.0, 90.0);
        self.launch_latitude_deg
    }

    pub fn clamp_inclination(&mut self) -> f64 {
        self.target_inclination_deg = sanitize(self.target_inclination_deg).clamp(0.0, 180.0);
        self.target_inclination_deg
    }

    /// Orders the apsides and clamps both into `[1000, SOI − radius − 1000]`.
    ///
    /// Fails without modifying anything when either apsis already reaches the SOI limit.
    pub fn clamp_altitudes(&mut self) -> Result<(), TargetError> {
        let pe = sanitize(self.periapsis_altitude_m);
        let ap = sanitize(self.apoapsis_altitude_m);

        let max_altitude = match self.launch_body {
            Some(body) => {
                let soi_limit = body.soi_radius_m - body.radius_m;
                if ap >= soi_limit || pe >= soi_limit {
                    return Err(TargetError::ApoapsisExceedsSoi {
                        periapsis_m: pe,
                        apoapsis_m: ap,
                        limit_m: soi_limit,
                    });
                }
                (soi_limit - MIN_ALTITUDE_M).max(MIN_ALTITUDE_M)
            }
            None => UNBOUNDED_MAX_ALTITUDE_M,
        };

        let (pe, ap) = if pe > ap { (ap, pe) } else { (pe, ap) };
        let pe = MIN_ALTITUDE_M.max(pe.min(max_altitude));
        let ap = pe.max(ap.min(max_altitude));
        self.periapsis_altitude_m = pe;
        self.apoapsis_altitude_m = ap;
        Ok(())
    }

    /// Copy with latitude, altitudes and inclination clamped.
    pub fn clamped(mut self) -> Result<Self, TargetError> {
        self.clamp_latitude();
        self.clamp_altitudes()?;
        self.clamp_inclination();
        Ok(self)
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value }
}
