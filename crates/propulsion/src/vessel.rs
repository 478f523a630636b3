//! Vehicle snapshot handed to the solver.

use payload_core::constants::G0;

use crate::stage::StageInfo;

/// Normalised vehicle: ordered stages plus vehicle-wide aggregates.
///
/// Built once per computation and treated as read-only by the solver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VesselStats {
    pub name: String,
    pub has_vessel: bool,
    /// Sorted by ascending stage number.
    pub stages: Vec<StageInfo>,
    pub wet_mass_t: f64,
    pub dry_mass_t: f64,
    pub vacuum_isp_s: f64,
    pub sea_level_isp_s: f64,
    pub total_thrust_kn: f64,
}

impl VesselStats {
    /// Assemble a vehicle from raw stages.
    ///
    /// Propellant is first moved out of stages without delta-v engines, then per-stage
    /// thrust and thrust-weighted Isp are derived, stage dry mass becomes wet minus
    /// propellant (when positive), and the vehicle aggregates are summed.
    pub fn from_stages(name: impl Into<String>, mut stages: Vec<StageInfo>) -> Self {
        redistribute_propellant(&mut stages);
        for stage in &mut stages {
            stage.refresh_engine_totals();
            let actual_dry = stage.wet_mass_t - stage.propellant_mass_t;
            if actual_dry > 0.0 {
                stage.dry_mass_t = actual_dry;
            }
        }
        stages.sort_by_key(|s| s.stage_number);

        let wet: f64 = stages.iter().map(|s| s.wet_mass_t).sum();
        let propellant: f64 = stages.iter().map(|s| s.propellant_mass_t).sum();
        let mut thrust = 0.0;
        let mut weighted_vac = 0.0;
        let mut weighted_sea = 0.0;
        for stage in &stages {
            thrust += stage.thrust_kn;
            weighted_vac += stage.thrust_kn * stage.vacuum_isp_s;
            weighted_sea += stage.thrust_kn * stage.sea_level_isp_s;
        }
        let (vacuum_isp_s, sea_level_isp_s) = if thrust > 0.0 {
            (weighted_vac / thrust, weighted_sea / thrust)
        } else {
            (0.0, 0.0)
        };

        Self {
            name: name.into(),
            has_vessel: true,
            stages,
            wet_mass_t: wet,
            dry_mass_t: (wet - propellant).max(0.01),
            vacuum_isp_s,
            sea_level_isp_s,
            total_thrust_kn: thrust,
        }
    }

    /// Stage-less vehicle described only by its aggregates.
    pub fn single_stage(
        name: impl Into<String>,
        wet_mass_t: f64,
        dry_mass_t: f64,
        vacuum_isp_s: f64,
        sea_level_isp_s: f64,
        total_thrust_kn: f64,
    ) -> Self {
        Self {
            name: name.into(),
            has_vessel: true,
            stages: Vec::new(),
            wet_mass_t,
            dry_mass_t,
            vacuum_isp_s,
            sea_level_isp_s,
            total_thrust_kn,
        }
    }

    /// Enough data to fly the ascent simulation instead of the closed-form fallback.
    pub fn has_propulsion_model(&self) -> bool {
        self.has_vessel
            && self.total_thrust_kn > 0.0
            && self.vacuum_isp_s > 0.0
            && self.wet_mass_t > 0.0
            && self.dry_mass_t > 0.0
    }

    /// Stages in ascending stage-number order.
    pub fn sorted_stages(&self) -> Vec<&StageInfo> {
        let mut sorted: Vec<&StageInfo> = self.stages.iter().collect();
        sorted.sort_by_key(|s| s.stage_number);
        sorted
    }

    /// Highest stage number with delta-v engines and propellant: the launch stage.
    pub fn bottom_stage_number(&self) -> Option<i32> {
        self.stages
            .iter()
            .filter(|s| s.is_propulsive())
            .map(|s| s.stage_number)
            .max()
    }

    pub fn bottom_stage(&self) -> Option<&StageInfo> {
        let number = self.bottom_stage_number()?;
        self.stages.iter().find(|s| s.stage_number == number)
    }

    /// Bottom-stage sea-level thrust over the whole vehicle's weight at `surface_gravity_g`.
    ///
    /// Stage-less vehicles use the aggregate thrust and Isp pair. Zero when undefined.
    pub fn bottom_stage_sea_level_twr(&self, surface_gravity_g: f64) -> f64 {
        let weight_kn = self.wet_mass_t * surface_gravity_g * G0;
        if !(weight_kn > 0.0) {
            return 0.0;
        }
        let thrust_kn = if self.stages.is_empty() {
            if self.vacuum_isp_s > 0.0 {
                self.total_thrust_kn * self.sea_level_isp_s / self.vacuum_isp_s
            } else {
                0.0
            }
        } else {
            match self.bottom_stage() {
                Some(stage) => stage
                    .dv_engines()
                    .filter(|e| e.vacuum_isp_s > 0.0)
                    .map(|e| e.thrust_kn * e.sea_level_isp_s / e.vacuum_isp_s)
                    .sum(),
                None => 0.0,
            }
        };
        let twr = thrust_kn / weight_kn;
        if twr.is_finite() { twr.max(0.0) } else { 0.0 }
    }
}

/// Move propellant out of stages that cannot burn it.
///
/// Each stage holding propellant but no delta-v engine hands its propellant (with the
/// per-resource breakdown) to the nearest delta-v stage that fires no later, i.e. the
/// smallest stage number not below its own; failing that, to the numerically closest
/// delta-v stage.
pub fn redistribute_propellant(stages: &mut [StageInfo]) {
    for source in 0..stages.len() {
        if stages[source].propellant_mass_t <= 0.0 || stages[source].has_dv_engines() {
            continue;
        }
        let source_number = stages[source].stage_number;
        let candidates = || {
            stages
                .iter()
                .enumerate()
                .filter(|(_, s)| s.has_dv_engines())
                .map(|(i, s)| (i, s.stage_number))
        };
        let target = candidates()
            .filter(|(_, n)| *n >= source_number)
            .min_by_key(|(_, n)| *n)
            .or_else(|| candidates().min_by_key(|(_, n)| (n - source_number).abs()))
            .map(|(i, _)| i);

        let Some(target) = target else {
            continue;
        };
        let moved = stages[source].propellant_mass_t;
        let by_name = std::mem::take(&mut stages[source].propellant_by_name);
        stages[source].propellant_mass_t = 0.0;

        let receiver = &mut stages[target];
        receiver.propellant_mass_t += moved;
        for (name, mass) in by_name {
            *receiver.propellant_by_name.entry(name).or_insert(0.0) += mass;
        }
    }
}
