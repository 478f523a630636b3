//! Orbital payload calculator.
//!
//! Estimates the heaviest payload a staged rocket can lift from a body's surface into a
//! target orbit. The workspace crates are re-exported here so front-ends (the `payload`
//! CLI, tests) depend on a single library.

pub use payload_ascent as ascent;
pub use payload_config as config;
pub use payload_core as core;
pub use payload_export as export;
pub use payload_orbits as orbits;
pub use payload_propulsion as propulsion;
pub use payload_solver as solver;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
