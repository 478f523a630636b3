//! Stages, booster separation groups, and per-stage results.

use std::collections::{BTreeMap, BTreeSet};

use crate::engine::EngineEntry;

/// Engines that are jettisoned together once all of them have burned out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeparationGroup {
    /// Indices into [`StageInfo::engines`]; an engine's index identifies its part.
    pub engine_indices: BTreeSet<usize>,
    /// Dry mass dropped when the group separates.
    pub dry_mass_t: f64,
    /// Liquid propellant carried in the separated parts. The group's liquid engines burn it
    /// instead of the stage pools and burn out once it is gone. Zero when crossfed away.
    pub liquid_propellant_t: f64,
}

impl SeparationGroup {
    /// Group that drops the dry mass of the parts carrying its engines.
    pub fn from_engine_parts(engine_indices: BTreeSet<usize>, engines: &[EngineEntry]) -> Self {
        let dry_mass_t = engine_indices
            .iter()
            .filter_map(|&i| engines.get(i))
            .map(|e| e.part_dry_mass_t.max(0.0))
            .sum();
        Self {
            engine_indices,
            dry_mass_t,
            liquid_propellant_t: 0.0,
        }
    }
}

/// One stage of the vehicle. Stage numbers ascend towards later firing; stage 0 fires last.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageInfo {
    pub stage_number: i32,
    pub wet_mass_t: f64,
    pub dry_mass_t: f64,
    pub propellant_mass_t: f64,
    /// Thrust-weighted Isp over delta-v engines.
    pub vacuum_isp_s: f64,
    pub sea_level_isp_s: f64,
    pub thrust_kn: f64,
    pub has_solid_fuel: bool,
    pub separation_groups: Vec<SeparationGroup>,
    pub engines: Vec<EngineEntry>,
    /// Fairing mass jettisoned when this stage ignites.
    pub fairing_mass_t: f64,
    pub propellant_by_name: BTreeMap<String, f64>,
}

impl StageInfo {
    pub fn has_dv_engines(&self) -> bool {
        self.engines.iter().any(|e| e.role.participates_in_dv())
    }

    pub fn dv_engines(&self) -> impl Iterator<Item = &EngineEntry> {
        self.engines.iter().filter(|e| e.role.participates_in_dv())
    }

    /// Stage that can actually burn: delta-v engines and propellant on board.
    pub fn is_propulsive(&self) -> bool {
        self.has_dv_engines() && self.propellant_mass_t > 0.0
    }

    /// Mass left once the stage has fired: propellant burned and fairing jettisoned.
    pub fn residual_mass_t(&self) -> f64 {
        (self.wet_mass_t - self.propellant_mass_t - self.fairing_mass_t).max(0.001)
    }

    /// Dry mass of every separation group in the stage.
    pub fn separable_dry_mass_t(&self) -> f64 {
        self.separation_groups
            .iter()
            .map(|g| g.dry_mass_t)
            .filter(|m| *m > 0.0)
            .sum()
    }

    /// Vacuum thrust scaled to sea level by the Isp ratio.
    pub fn sea_level_thrust_kn(&self) -> f64 {
        if self.vacuum_isp_s > 0.0 {
            self.thrust_kn * (self.sea_level_isp_s / self.vacuum_isp_s)
        } else {
            self.thrust_kn
        }
    }

    /// Recompute thrust, blended Isp, and the solid flag from the engine list.
    pub fn refresh_engine_totals(&mut self) {
        self.has_solid_fuel = self.engines.iter().any(EngineEntry::is_solid);
        let mut thrust = 0.0;
        let mut weighted_vac = 0.0;
        let mut weighted_sea = 0.0;
        for engine in self.dv_engines() {
            thrust += engine.thrust_kn;
            weighted_vac += engine.thrust_kn * engine.vacuum_isp_s;
            weighted_sea += engine.thrust_kn * engine.sea_level_isp_s;
        }
        self.thrust_kn = thrust;
        if thrust > 0.0 {
            self.vacuum_isp_s = weighted_vac / thrust;
            self.sea_level_isp_s = weighted_sea / thrust;
        } else {
            self.vacuum_isp_s = 0.0;
            self.sea_level_isp_s = 0.0;
        }
    }
}

/// Delta-v bookkeeping for one stage that contributed to the ascent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageResult {
    pub stage_number: i32,
    pub delta_v: f64,
    pub effective_isp_s: f64,
    /// Bottom stage in atmosphere whose effective Isp fell below vacuum.
    pub used_sea_level_isp: bool,
    pub mass_at_ignition_t: f64,
    pub mass_after_burn_t: f64,
    /// Sea-level thrust over ignition weight at surface gravity.
    pub twr_at_ignition: f64,
}
