//! Orbit utility helpers: launch bodies, target-orbit descriptors, and closed-form
//! surface-to-orbit delta-v estimates.

pub mod body;
pub mod mechanics;
pub mod targets;

pub use body::{Atmosphere, AtmosphereProfile, BodyScales, CelestialBody};
pub use mechanics::{
    IdealAscent, IdealDvModel, OrbitShape, PlaneChange, ideal_surface_to_orbit, plane_change,
    rotation_adjusted_dv, select_ideal_model, vis_viva_speed,
};
pub use targets::{OrbitTargets, TargetError};
