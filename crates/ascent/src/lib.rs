//! Ascent physics: the loss model, gravity-turn parameters, drag, and the launch-stage
//! multi-engine simulator.

pub mod blend;
pub mod bottom_stage;
pub mod drag;
pub mod losses;
pub mod mode;
pub mod turn;

pub use blend::{atmosphere_blend_factor, default_blend_factor, effective_isp};
pub use bottom_stage::{
    BottomStageCache, BottomStageOutcome, BottomStageRequest, CACHE_CAPACITY, TraceSample,
    simulate_bottom_stage, simulate_bottom_stage_traced,
};
pub use losses::{LossEstimate, UsedAscentParameters, estimate, fallback_estimate};
pub use mode::{EstimateMode, LossModelConfig};
pub use turn::{
    TurnParameters, resolve_turn_parameters, turn_exponent_bottom, turn_exponent_full,
};
