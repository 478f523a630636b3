use payload_orbits::TargetError;
use thiserror::Error;

/// Reasons a payload computation cannot produce a result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PayloadError {
    #[error("no vessel to evaluate")]
    NoVessel,
    #[error("no launch body selected")]
    NoBody,
    #[error(
        "target orbit (periapsis {periapsis_m:.0} m, apoapsis {apoapsis_m:.0} m) reaches the sphere of influence limit {limit_m:.0} m"
    )]
    OrbitGeometryInvalid {
        periapsis_m: f64,
        apoapsis_m: f64,
        limit_m: f64,
    },
    #[error("vessel has no usable delta-v")]
    ZeroAvailableDv,
}

impl PayloadError {
    /// Stable localisation key for UI front ends.
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::NoVessel => "#LOC_OPC_NoVessel",
            Self::NoBody => "#LOC_OPC_NoBody",
            Self::OrbitGeometryInvalid { .. } => "#LOC_OPC_ApoapsisExceedsSOI",
            Self::ZeroAvailableDv => "#LOC_OPC_ZeroDv",
        }
    }
}

impl From<TargetError> for PayloadError {
    fn from(err: TargetError) -> Self {
        match err {
            TargetError::ApoapsisExceedsSoi {
                periapsis_m,
                apoapsis_m,
                limit_m,
            } => Self::OrbitGeometryInvalid {
                periapsis_m,
                apoapsis_m,
                limit_m,
            },
        }
    }
}

/// Non-fatal conditions attached to a successful result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadWarning {
    /// Target inclination is below the launch latitude; a plane change is included.
    InclinationBelowLatitude,
}

impl PayloadWarning {
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::InclinationBelowLatitude => "#LOC_OPC_InclinationBelowLatitudeWarning",
        }
    }
}
