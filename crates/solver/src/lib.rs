//! Payload solver: staged delta-v of a launch vehicle and the heaviest payload it can
//! deliver to a target orbit.

pub mod error;
pub mod payload;
pub mod result;
pub mod staging;

pub use error::{PayloadError, PayloadWarning};
pub use payload::{PayloadCalculator, compute};
pub use result::PayloadCalculationResult;
pub use staging::{
    AscentProfile, StageDv, StagedDv, simple_dv, simple_dv_for_display,
    simple_dv_with_extra_payload, stage_delta_v, staged_dv, staged_dv_for_display,
    staged_dv_with_extra_payload,
};
