//! Propulsion data model: engines, stages, and the normalised vessel snapshot the solver consumes.

pub mod classify;
pub mod engine;
pub mod stage;
pub mod vessel;

pub use classify::{EngineSpec, classify_engines};
pub use engine::{EngineEntry, EngineRole};
pub use stage::{SeparationGroup, StageInfo, StageResult};
pub use vessel::{VesselStats, redistribute_propellant};
