//! Multi-engine ascent simulation of the launch stage.
//!
//! Each engine burns from its own allocation: solids from their part-contained propellant,
//! liquids from per-resource pools split by thrust share, except that a booster group's
//! liquid engines burn the propellant carried in the group's own parts. Isp follows each engine's
//! pressure table, solid thrust follows its thrust curve, and booster groups are dropped
//! once every engine in the group has burned out. Integrated with a 0.5 s step for at most
//! 600 s of flight.

use std::collections::HashMap;
use std::f64::consts::FRAC_PI_2;

use payload_core::constants::{G0, ONE_ATM_KPA};
use payload_core::numeric::clamp;
use payload_core::units::{kn_to_n, tons_to_kg};
use payload_orbits::CelestialBody;
use payload_propulsion::{EngineEntry, StageInfo};
use tracing::{debug, trace};

use crate::drag::{AtmosphereSample, drag_area, drag_force};
use crate::losses::pitch_angle;

const STEP_S: f64 = 0.5;
const MAX_TIME_S: f64 = 600.0;
const MIN_VELOCITY_M_S: f64 = 0.1;
const DEFAULT_TURN_SPEED_M_S: f64 = 70.0;
const MAX_ALLOCATION_PASSES: usize = 6;
pub const CACHE_CAPACITY: usize = 128;

/// Launch-stage simulation inputs. Masses include everything stacked above the stage.
#[derive(Debug, Clone, Copy)]
pub struct BottomStageRequest<'a> {
    pub body: &'a CelestialBody,
    pub stage: &'a StageInfo,
    pub wet_mass_t: f64,
    pub dry_mass_t: f64,
    pub turn_start_speed_m_s: Option<f64>,
    pub turn_start_altitude_m: Option<f64>,
    pub cda_coefficient: f64,
    pub turn_exponent: f64,
}

impl BottomStageRequest<'_> {
    fn turn_speed(&self) -> f64 {
        self.turn_start_speed_m_s
            .filter(|v| *v > 0.0)
            .unwrap_or(DEFAULT_TURN_SPEED_M_S)
    }

    fn turn_altitude(&self) -> f64 {
        self.turn_start_altitude_m
            .filter(|v| *v > 0.0)
            .unwrap_or_else(|| clamp(self.body.atmosphere_depth_m() * 0.012, 600.0, 18_000.0))
    }
}

/// One integration step, sampled before the state is advanced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceSample {
    pub time_s: f64,
    pub step_s: f64,
    pub altitude_m: f64,
    pub velocity_m_s: f64,
    pub mass_kg: f64,
    pub thrust_n: f64,
    pub mass_flow_kg_s: f64,
    pub acceleration_m_s2: f64,
    /// Booster dry mass jettisoned so far.
    pub separated_mass_kg: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BottomStageOutcome {
    pub delta_v: f64,
    pub burn_time_s: f64,
    pub trace: Vec<TraceSample>,
}

/// Delta-v of the launch stage flown through the atmosphere.
pub fn simulate_bottom_stage(request: &BottomStageRequest<'_>) -> f64 {
    run(request, false).delta_v
}

/// Same as [`simulate_bottom_stage`], keeping every integration step.
pub fn simulate_bottom_stage_traced(request: &BottomStageRequest<'_>) -> BottomStageOutcome {
    run(request, true)
}

struct EngineRuntime<'a> {
    engine: &'a EngineEntry,
    initial_kg: f64,
    remaining_kg: f64,
    exhausted: bool,
    /// Fed from its separation group's tanks instead of the stage pools.
    own_tank: bool,
}

impl EngineRuntime<'_> {
    /// Thrust (N) and mass flow (kg/s) at the given fraction of sea-level pressure.
    fn output(&self, pressure_fraction: f64) -> (f64, f64) {
        let e = self.engine;
        let mut isp = e.isp_at_pressure(pressure_fraction);
        if isp <= 0.0 {
            isp = e.vacuum_isp_s;
        }
        if isp <= 0.0 {
            return (0.0, 0.0);
        }
        let vac_isp = if e.vacuum_isp_s > 0.0 { e.vacuum_isp_s } else { isp };
        let mut thrust = kn_to_n(e.thrust_kn) * (isp / vac_isp);
        if e.is_solid() && self.initial_kg > 0.0 {
            let burned = 1.0 - self.remaining_kg / self.initial_kg;
            thrust *= e.thrust_multiplier(burned);
        }
        (thrust, thrust / (isp * G0))
    }
}

/// Liquid propellant shared by compatible engines; `name == None` feeds every engine.
struct Pool {
    name: Option<String>,
    mass_kg: f64,
}

impl Pool {
    fn feeds(&self, engine: &EngineEntry) -> bool {
        match &self.name {
            None => true,
            Some(name) => engine.uses_propellant(name),
        }
    }
}

fn build_runtimes<'a>(stage: &'a StageInfo, wet_t: f64, dry_t: f64) -> Vec<EngineRuntime<'a>> {
    let mut runtimes: Vec<EngineRuntime<'a>> = stage
        .engines
        .iter()
        .map(|engine| {
            let own = if engine.is_solid() && engine.propellant_mass_t > 0.0 {
                tons_to_kg(engine.propellant_mass_t)
            } else {
                0.0
            };
            EngineRuntime {
                engine,
                initial_kg: own,
                remaining_kg: own,
                exhausted: !engine.role.participates_in_dv(),
                own_tank: false,
            }
        })
        .collect();

    let solid_kg: f64 = runtimes
        .iter()
        .filter(|rt| !rt.exhausted)
        .map(|rt| rt.initial_kg)
        .sum();
    let liquid_kg = (tons_to_kg(wet_t - dry_t) - solid_kg).max(0.0);

    let mut pools: Vec<Pool> = stage
        .propellant_by_name
        .iter()
        .map(|(name, mass_t)| Pool {
            name: Some(name.clone()),
            mass_kg: tons_to_kg(*mass_t).max(0.0),
        })
        .collect();
    if pools.is_empty() && liquid_kg > 0.0 {
        pools.push(Pool {
            name: None,
            mass_kg: liquid_kg,
        });
    }

    for rt in runtimes.iter().filter(|rt| rt.engine.is_solid() && rt.initial_kg > 0.0) {
        for pool in pools.iter_mut() {
            if let Some(name) = &pool.name {
                if rt.engine.uses_propellant(name) {
                    pool.mass_kg = (pool.mass_kg - rt.initial_kg).max(0.0);
                }
            }
        }
    }

    for group in stage
        .separation_groups
        .iter()
        .filter(|g| g.liquid_propellant_t > 0.0)
    {
        let members: Vec<usize> = group
            .engine_indices
            .iter()
            .copied()
            .filter(|&i| {
                runtimes
                    .get(i)
                    .is_some_and(|rt| !rt.exhausted && !rt.engine.is_solid())
            })
            .collect();
        let group_thrust: f64 = members.iter().map(|&i| runtimes[i].engine.thrust_kn).sum();
        if group_thrust <= 1e-9 {
            continue;
        }
        let feeding: Vec<usize> = (0..pools.len())
            .filter(|&p| members.iter().any(|&i| pools[p].feeds(runtimes[i].engine)))
            .collect();
        let available: f64 = feeding.iter().map(|&p| pools[p].mass_kg).sum();
        let tank_kg = tons_to_kg(group.liquid_propellant_t).min(available);
        if tank_kg <= 1e-6 {
            continue;
        }
        for &p in &feeding {
            let drawn = tank_kg * pools[p].mass_kg / available;
            pools[p].mass_kg -= drawn;
        }
        for &i in &members {
            let rt = &mut runtimes[i];
            let share = tank_kg * rt.engine.thrust_kn / group_thrust;
            rt.initial_kg += share;
            rt.remaining_kg += share;
            rt.own_tank = true;
        }
    }

    for _ in 0..MAX_ALLOCATION_PASSES {
        let mut allocated = false;
        for pool in pools.iter_mut() {
            if pool.mass_kg <= 1e-6 {
                continue;
            }
            let burns_from_pool = |rt: &EngineRuntime<'_>| {
                !rt.exhausted && !rt.engine.is_solid() && !rt.own_tank && pool.feeds(rt.engine)
            };
            let compatible_thrust: f64 = runtimes
                .iter()
                .filter(|rt| burns_from_pool(*rt))
                .map(|rt| rt.engine.thrust_kn)
                .sum();
            if compatible_thrust <= 1e-9 {
                continue;
            }
            allocated = true;
            for rt in runtimes.iter_mut() {
                if burns_from_pool(&*rt) {
                    let share = pool.mass_kg * rt.engine.thrust_kn / compatible_thrust;
                    rt.initial_kg += share;
                    rt.remaining_kg += share;
                }
            }
            pool.mass_kg = 0.0;
        }
        if !allocated {
            break;
        }
    }

    for rt in runtimes.iter_mut() {
        if rt.initial_kg <= 1e-6 {
            rt.exhausted = true;
        }
    }
    runtimes
}

fn run(request: &BottomStageRequest<'_>, keep_trace: bool) -> BottomStageOutcome {
    let mut outcome = BottomStageOutcome::default();
    let stage = request.stage;
    let body = request.body;
    let mut mass = tons_to_kg(request.wet_mass_t);
    let mut dry = tons_to_kg(request.dry_mass_t);
    if !(mass > dry) || stage.thrust_kn <= 0.0 {
        return outcome;
    }

    let turn_speed = request.turn_speed();
    let turn_altitude = request.turn_altitude();
    let depth = body.atmosphere_depth_m();
    let turn_end = (turn_altitude + 1000.0).max(depth * 0.85);
    let sea_pressure = match body.sea_level_pressure_kpa() {
        p if p > 0.0 => p,
        _ => ONE_ATM_KPA,
    };

    let per_engine = !stage.engines.is_empty();
    let mut runtimes = if per_engine {
        build_runtimes(stage, request.wet_mass_t, request.dry_mass_t)
    } else {
        Vec::new()
    };
    let fallback_vac = if stage.vacuum_isp_s > 0.0 {
        stage.vacuum_isp_s
    } else {
        stage.sea_level_isp_s
    };
    let fallback_sea = if stage.sea_level_isp_s > 0.0 {
        stage.sea_level_isp_s
    } else {
        fallback_vac
    };
    let total_vac_thrust_n = if per_engine {
        stage.dv_engines().map(|e| kn_to_n(e.thrust_kn)).sum()
    } else {
        kn_to_n(stage.thrust_kn)
    };
    if total_vac_thrust_n <= 0.0 && fallback_vac <= 0.0 {
        return outcome;
    }

    let cda = drag_area(request.cda_coefficient, request.wet_mass_t);
    let mut dropped = vec![false; stage.separation_groups.len()];
    let mut separated_kg = 0.0;
    let mut engine_flows = vec![0.0; runtimes.len()];

    let mut altitude = 0.0_f64;
    let mut velocity = MIN_VELOCITY_M_S;
    let mut gamma = FRAC_PI_2;
    let mut turn_started = false;
    let mut t = 0.0;

    while t < MAX_TIME_S && mass > dry {
        let air = if altitude < depth {
            AtmosphereSample::at(body, altitude)
        } else {
            AtmosphereSample::default()
        };
        let pressure_fraction = clamp(air.pressure_kpa / sea_pressure, 0.0, 1.0);

        let (thrust, flow) = if per_engine {
            let mut thrust = 0.0;
            let mut flow = 0.0;
            for (rt, engine_flow) in runtimes.iter().zip(engine_flows.iter_mut()) {
                *engine_flow = 0.0;
                if rt.exhausted {
                    continue;
                }
                let (f, m) = rt.output(pressure_fraction);
                thrust += f;
                flow += m;
                *engine_flow = m;
            }
            (thrust, flow)
        } else {
            let mut isp = fallback_vac + (fallback_sea - fallback_vac) * pressure_fraction;
            if isp <= 0.0 {
                isp = fallback_vac;
            }
            let thrust = total_vac_thrust_n * (isp / fallback_vac);
            (thrust, thrust / (isp * G0))
        };
        if !(thrust > 0.0) || !(flow > 0.0) {
            break;
        }

        let step = STEP_S.min((mass - dry) / flow);
        if !(step > 0.0) {
            break;
        }
        outcome.delta_v += thrust / mass * step;

        let g = body.gravity_at(altitude);
        let drag = drag_force(&air, velocity, cda);
        let sin_gamma = gamma.sin();
        let accel = (thrust - drag) / mass - g * sin_gamma;

        if keep_trace {
            outcome.trace.push(TraceSample {
                time_s: t,
                step_s: step,
                altitude_m: altitude,
                velocity_m_s: velocity,
                mass_kg: mass,
                thrust_n: thrust,
                mass_flow_kg_s: flow,
                acceleration_m_s2: accel,
                separated_mass_kg: separated_kg,
            });
        }

        velocity = (velocity + accel * step).max(MIN_VELOCITY_M_S);
        altitude = (altitude + velocity * sin_gamma * step).max(0.0);
        if !turn_started && velocity > turn_speed && altitude > turn_altitude {
            turn_started = true;
        }
        if turn_started {
            gamma = pitch_angle(altitude, turn_altitude, turn_end, request.turn_exponent);
        }

        if per_engine {
            for (rt, engine_flow) in runtimes.iter_mut().zip(&engine_flows) {
                if rt.exhausted {
                    continue;
                }
                let consumed = engine_flow * step;
                if consumed >= rt.remaining_kg {
                    rt.remaining_kg = 0.0;
                    rt.exhausted = true;
                } else {
                    rt.remaining_kg -= consumed;
                }
            }

            for (group, done) in stage.separation_groups.iter().zip(dropped.iter_mut()) {
                if *done || group.dry_mass_t <= 0.0 {
                    continue;
                }
                let burned_out = group
                    .engine_indices
                    .iter()
                    .all(|&i| runtimes.get(i).is_some_and(|rt| rt.exhausted));
                if burned_out {
                    let drop_kg = tons_to_kg(group.dry_mass_t);
                    mass -= drop_kg;
                    dry -= drop_kg;
                    separated_kg += drop_kg;
                    *done = true;
                    trace!(t, altitude, drop_kg, "separation group jettisoned");
                }
            }
        }

        mass = (mass - flow * step).max(dry);
        outcome.burn_time_s += step;
        t += STEP_S;
    }

    debug!(
        stage = stage.stage_number,
        delta_v = outcome.delta_v,
        burn_time = outcome.burn_time_s,
        separated_kg,
        "bottom stage simulated"
    );
    outcome
}

type CacheKey = [u64; 6];

/// Bounded memo of launch-stage delta-v for the payload search.
///
/// Keys are the exact bit patterns of the masses and resolved turn and drag parameters, so
/// a hit returns exactly what a fresh simulation would. When full the cache is emptied
/// rather than evicting single entries. It does not identify the stage: clear it between
/// vehicles.
#[derive(Debug, Clone)]
pub struct BottomStageCache {
    entries: HashMap<CacheKey, f64>,
    enabled: bool,
    hits: u64,
    misses: u64,
}

impl Default for BottomStageCache {
    fn default() -> Self {
        Self::new()
    }
}

impl BottomStageCache {
    pub fn new() -> Self {
        Self {
            entries: HashMap::with_capacity(CACHE_CAPACITY),
            enabled: true,
            hits: 0,
            misses: 0,
        }
    }

    /// Pass-through cache that always simulates.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn simulate(&mut self, request: &BottomStageRequest<'_>) -> f64 {
        if !self.enabled {
            return simulate_bottom_stage(request);
        }
        let key = [
            request.wet_mass_t.to_bits(),
            request.dry_mass_t.to_bits(),
            request.turn_speed().to_bits(),
            request.turn_altitude().to_bits(),
            request.cda_coefficient.to_bits(),
            request.turn_exponent.to_bits(),
        ];
        if let Some(dv) = self.entries.get(&key) {
            self.hits += 1;
            return *dv;
        }
        self.misses += 1;
        if self.entries.len() >= CACHE_CAPACITY {
            debug!(entries = self.entries.len(), "bottom stage cache full, clearing");
            self.entries.clear();
        }
        let dv = simulate_bottom_stage(request);
        self.entries.insert(key, dv);
        dv
    }
}
