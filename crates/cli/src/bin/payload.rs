use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use orbital_payload_calculator::ascent::{EstimateMode, LossModelConfig};
use orbital_payload_calculator::config::{
    find_body, find_vessel, load_bodies, load_vessel_configs,
};
use orbital_payload_calculator::core::units::{km_to_m, m_to_km};
use orbital_payload_calculator::export::{is_stdout, stages, summary};
use orbital_payload_calculator::orbits::OrbitTargets;
use orbital_payload_calculator::solver::{PayloadCalculationResult, PayloadCalculator};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    author,
    version = orbital_payload_calculator::version(),
    about = "Estimate the payload a vessel can lift from a body's surface to a target orbit"
)]
struct Cli {
    /// Launch body name (case-insensitive)
    #[arg(long)]
    body: String,

    /// Vessel name from the catalog (case-insensitive)
    #[arg(long)]
    vessel: String,

    /// Periapsis altitude in km (defaults to just above the atmosphere)
    #[arg(long)]
    periapsis_km: Option<f64>,

    /// Apoapsis altitude in km (defaults to the periapsis)
    #[arg(long)]
    apoapsis_km: Option<f64>,

    /// Target inclination in degrees
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    inclination: f64,

    /// Launch site latitude in degrees
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    latitude: f64,

    /// Loss model preset
    #[arg(long, value_enum, default_value_t = Mode::Normal)]
    mode: Mode,

    /// Gravity-turn start speed in m/s (automatic when omitted)
    #[arg(long)]
    turn_speed: Option<f64>,

    /// Gravity-turn start altitude in m (automatic when omitted)
    #[arg(long)]
    turn_altitude: Option<f64>,

    /// Drag-area coefficient, multiplied by the square root of wet mass in tons
    #[arg(long)]
    cda: Option<f64>,

    /// Replace the estimated gravity loss (m/s)
    #[arg(long)]
    gravity_loss: Option<f64>,

    /// Replace the estimated drag loss (m/s)
    #[arg(long)]
    drag_loss: Option<f64>,

    /// Replace the estimated steering loss (m/s)
    #[arg(long)]
    attitude_loss: Option<f64>,

    /// Body catalog: directory of .toml files, a .toml file, or a YAML list
    #[arg(long, default_value = "configs/bodies")]
    bodies: PathBuf,

    /// Vessel catalog: directory of .toml files, a .toml file, or a YAML list
    #[arg(long, default_value = "configs/vessels")]
    vessels: PathBuf,

    /// Write the stage breakdown CSV here (`-` for stdout)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write a JSON summary here (`-` for stdout)
    #[arg(long)]
    json: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, default_value_t = false)]
    verbose: bool,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum Mode {
    Optimistic,
    Normal,
    Pessimistic,
}

impl From<Mode> for EstimateMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Optimistic => EstimateMode::Optimistic,
            Mode::Normal => EstimateMode::Normal,
            Mode::Pessimistic => EstimateMode::Pessimistic,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let bodies = load_bodies(&cli.bodies)
        .with_context(|| format!("loading bodies from {}", cli.bodies.display()))?;
    let vessels = load_vessel_configs(&cli.vessels)
        .with_context(|| format!("loading vessels from {}", cli.vessels.display()))?;

    let body = find_body(&bodies, &cli.body)?.to_body()?;
    let stats = find_vessel(&vessels, &cli.vessel)?.to_vessel_stats()?;
    info!(vessel = %stats.name, stages = stats.stages.len(), "vessel loaded");

    let mut targets = OrbitTargets::for_body(&body);
    targets.launch_latitude_deg = cli.latitude;
    targets.target_inclination_deg = cli.inclination;
    if let Some(pe) = cli.periapsis_km {
        targets.periapsis_altitude_m = km_to_m(pe);
        targets.apoapsis_altitude_m = km_to_m(pe);
    }
    if let Some(ap) = cli.apoapsis_km {
        targets.apoapsis_altitude_m = km_to_m(ap);
    }

    let config = LossModelConfig {
        mode: cli.mode.into(),
        gravity_loss_override: cli.gravity_loss,
        atmospheric_loss_override: cli.drag_loss,
        attitude_loss_override: cli.attitude_loss,
        turn_start_speed_m_s: cli.turn_speed,
        turn_start_altitude_m: cli.turn_altitude,
        cda_coefficient: cli.cda,
    };

    let result = PayloadCalculator::new()
        .compute(&stats, &targets, &config)
        .with_context(|| format!("evaluating {} from {}", stats.name, body.name))?;

    // The report goes to stderr when an export claims stdout.
    let exports_to_stdout = [&cli.csv, &cli.json]
        .into_iter()
        .flatten()
        .any(|path| is_stdout(path));
    let mut report: Box<dyn Write> = if exports_to_stdout {
        Box::new(io::stderr().lock())
    } else {
        Box::new(io::stdout().lock())
    };
    print_report(report.as_mut(), &result)?;

    if let Some(path) = &cli.csv {
        stages::write_csv(path, &result)
            .with_context(|| format!("writing stage CSV to {}", path.display()))?;
    }
    if let Some(path) = &cli.json {
        summary::write_json(path, &result)
            .with_context(|| format!("writing JSON summary to {}", path.display()))?;
        if !is_stdout(path) {
            writeln!(report, "Summary written to {}", path.display())?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_report(out: &mut dyn Write, result: &PayloadCalculationResult) -> io::Result<()> {
    let losses = &result.losses;
    writeln!(out, "=== Payload Estimate ===")?;
    writeln!(out, "Vessel          : {}", result.vessel_name)?;
    writeln!(out, "Body            : {}", result.body_name)?;
    writeln!(
        out,
        "Target orbit    : {:.1} x {:.1} km, e = {:.4}, i = {:.2}° (launch lat {:.2}°)",
        m_to_km(result.periapsis_altitude_m),
        m_to_km(result.apoapsis_altitude_m),
        result.eccentricity,
        result.inclination_deg,
        result.launch_latitude_deg,
    )?;
    writeln!(
        out,
        "Ideal Δv        : {:.1} m/s ({})",
        result.ideal.total_dv,
        if result.ideal.uses_energy_optimal_model() {
            "energy-optimal"
        } else {
            "Hohmann-structured"
        }
    )?;
    writeln!(out, "Rotation        : {:+.1} m/s", result.rotation_dv)?;
    if result.plane_change_dv > 0.0 {
        writeln!(
            out,
            "Plane change    : {:.1} m/s (launch inclination {:.2}°)",
            result.plane_change_dv, result.launch_inclination_deg
        )?;
    }
    writeln!(
        out,
        "Losses          : gravity {:.1}, drag {:.1}, steering {:.1} = {:.1} m/s ({}, {})",
        losses.gravity_dv,
        losses.atmospheric_dv,
        losses.attitude_dv,
        losses.total_dv,
        losses.mode,
        if losses.is_simulated() { "simulated" } else { "estimated" }
    )?;
    if let Some(used) = losses.used {
        writeln!(
            out,
            "Gravity turn    : start {:.1} m/s at {:.0} m, CdA {:.2} m²",
            used.turn_start_speed_m_s, used.turn_start_altitude_m, used.cda_m2
        )?;
    }
    writeln!(out, "Required Δv     : {:.1} m/s", result.required_dv)?;
    writeln!(
        out,
        "Available Δv    : {:.1} m/s (sea level {:.1}, vacuum {:.1})",
        result.available_dv, result.available_dv_sea_level, result.available_dv_vacuum
    )?;
    for stage in &result.active_stages {
        writeln!(
            out,
            "  stage {:>2}      : Δv {:.1} m/s, Isp {:.1} s{}, TWR {:.2}, {:.3} t → {:.3} t",
            stage.stage_number,
            stage.delta_v,
            stage.effective_isp_s,
            if stage.used_sea_level_isp { " (atm)" } else { "" },
            stage.twr_at_ignition,
            stage.mass_at_ignition_t,
            stage.mass_after_burn_t,
        )?;
    }
    for warning in &result.warnings {
        writeln!(out, "Warning         : {}", warning.message_key())?;
    }
    writeln!(out, "Max payload     : {:.3} t", result.estimated_payload_t)?;
    Ok(())
}
