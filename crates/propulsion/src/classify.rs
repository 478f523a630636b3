//! Engine-role classification from part geometry and resources.
//!
//! Runs on the data-extraction side: the solver only ever sees the resulting [`EngineRole`].

use crate::engine::EngineRole;

/// Fraction of the summed non-electric thrust below which a self-contained, aligned engine
/// counts as an ullage motor.
const SETTLING_THRUST_FRACTION: f64 = 0.01;
const SETTLING_MIN_THRESHOLD_KN: f64 = 0.1;
const SETTLING_ALIGNMENT: f64 = 0.9;
const RETRO_ALIGNMENT: f64 = 0.8;
const UP: [f64; 3] = [0.0, 1.0, 0.0];

/// Raw engine description used for classification.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSpec {
    pub stage_number: i32,
    pub thrust_kn: f64,
    /// Thrust direction in vessel coordinates; need not be normalised.
    pub thrust_direction: [f64; 3],
    /// Carries its own propellant (solid motors, escape towers, ullage motors).
    pub self_contained_propellant: bool,
    pub has_abort_action: bool,
    pub propellant_names: Vec<String>,
}

impl Default for EngineSpec {
    fn default() -> Self {
        Self {
            stage_number: 0,
            thrust_kn: 0.0,
            thrust_direction: UP,
            self_contained_propellant: false,
            has_abort_action: false,
            propellant_names: Vec::new(),
        }
    }
}

impl EngineSpec {
    fn is_electric(&self) -> bool {
        self.propellant_names
            .iter()
            .any(|p| p.eq_ignore_ascii_case("ElectricCharge"))
    }
}

/// Assign a role to every engine, in input order.
///
/// Rules are applied in priority order: electric, escape tower, settling, retro, then
/// solid or main.
pub fn classify_engines(specs: &[EngineSpec]) -> Vec<EngineRole> {
    let mut roles: Vec<Option<EngineRole>> = specs
        .iter()
        .map(|spec| {
            if spec.is_electric() {
                Some(EngineRole::Electric)
            } else if spec.self_contained_propellant && spec.has_abort_action {
                Some(EngineRole::EscapeTower)
            } else {
                None
            }
        })
        .collect();

    let total_thrust: f64 = specs
        .iter()
        .zip(&roles)
        .filter(|(_, role)| role.is_none())
        .map(|(spec, _)| spec.thrust_kn)
        .sum();
    let settling_threshold = SETTLING_MIN_THRESHOLD_KN.max(total_thrust * SETTLING_THRUST_FRACTION);
    let axis = bottom_main_axis(specs, &roles);

    for (spec, role) in specs.iter().zip(roles.iter_mut()) {
        if role.is_some() {
            continue;
        }
        let dot = dot(normalize(spec.thrust_direction), axis);
        *role = Some(
            if spec.self_contained_propellant
                && spec.thrust_kn < settling_threshold
                && dot > SETTLING_ALIGNMENT
            {
                EngineRole::Settling
            } else if dot < RETRO_ALIGNMENT {
                EngineRole::Retro
            } else if spec.self_contained_propellant {
                EngineRole::Solid
            } else {
                EngineRole::Main
            },
        );
    }

    roles.into_iter().map(Option::unwrap_or_default).collect()
}

/// Thrust axis of the strongest engine in the highest-numbered stage; `+Y` when degenerate.
///
/// Ties go to the engine listed first.
fn bottom_main_axis(specs: &[EngineSpec], roles: &[Option<EngineRole>]) -> [f64; 3] {
    let bottom = specs
        .iter()
        .zip(roles)
        .filter(|(_, role)| role.is_none())
        .map(|(spec, _)| spec)
        .min_by(|a, b| {
            b.stage_number
                .cmp(&a.stage_number)
                .then(b.thrust_kn.total_cmp(&a.thrust_kn))
        });
    match bottom {
        Some(spec) if norm_sq(spec.thrust_direction) > 1e-12 => normalize(spec.thrust_direction),
        _ => UP,
    }
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn norm_sq(v: [f64; 3]) -> f64 {
    dot(v, v)
}

fn normalize(v: [f64; 3]) -> [f64; 3] {
    let n = norm_sq(v).sqrt();
    if n > 1e-12 {
        [v[0] / n, v[1] / n, v[2] / n]
    } else {
        [0.0; 3]
    }
}
