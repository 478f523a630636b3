//! Export helpers for CSV and JSON payload reports.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Whether `path` is the `-` placeholder for stdout.
pub fn is_stdout(path: &Path) -> bool {
    path == Path::new("-")
}

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if is_stdout(path) {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    create_parent(path)?;
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

fn create_parent(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

pub mod stages {
    use std::io::{self, Write};
    use std::path::Path;

    use payload_solver::PayloadCalculationResult;

    use super::writer_for_path;

    const HEADER: &str = "stage,delta_v_m_s,effective_isp_s,used_sea_level_isp,mass_at_ignition_t,mass_after_burn_t,twr_at_ignition";

    /// Write the stage breakdown CSV header.
    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)
    }

    /// CSV row for one active stage.
    #[derive(Debug, Clone, Copy)]
    pub struct Record {
        pub stage: i32,
        pub delta_v_m_s: f64,
        pub effective_isp_s: f64,
        pub used_sea_level_isp: bool,
        pub mass_at_ignition_t: f64,
        pub mass_after_burn_t: f64,
        pub twr_at_ignition: f64,
    }

    impl Record {
        /// Serialize the record to CSV, matching the header ordering.
        pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
            writeln!(
                writer,
                "{},{:.3},{:.3},{},{:.4},{:.4},{:.4}",
                self.stage,
                self.delta_v_m_s,
                self.effective_isp_s,
                if self.used_sea_level_isp { "true" } else { "false" },
                self.mass_at_ignition_t,
                self.mass_after_burn_t,
                self.twr_at_ignition,
            )
        }
    }

    /// Rows for every active stage of `result`, in ascending stage order.
    pub fn records(result: &PayloadCalculationResult) -> Vec<Record> {
        result
            .active_stages
            .iter()
            .map(|s| Record {
                stage: s.stage_number,
                delta_v_m_s: s.delta_v,
                effective_isp_s: s.effective_isp_s,
                used_sea_level_isp: s.used_sea_level_isp,
                mass_at_ignition_t: s.mass_at_ignition_t,
                mass_after_burn_t: s.mass_after_burn_t,
                twr_at_ignition: s.twr_at_ignition,
            })
            .collect()
    }

    /// Write the full stage breakdown of `result` to `path` (`-` for stdout).
    pub fn write_csv(path: &Path, result: &PayloadCalculationResult) -> io::Result<()> {
        let mut writer = writer_for_path(path)?;
        write_header(writer.as_mut())?;
        for record in records(result) {
            record.write_to(writer.as_mut())?;
        }
        writer.flush()
    }
}

pub mod summary {
    use std::io::{self, Write};
    use std::path::Path;

    use payload_orbits::IdealDvModel;
    use payload_solver::PayloadCalculationResult;
    use serde::Serialize;
    use serde_json::to_writer_pretty;

    use super::writer_for_path;

    #[derive(Serialize)]
    struct Summary<'a> {
        vessel: &'a str,
        body: &'a str,
        estimated_payload_t: f64,
        orbit: OrbitSidecar,
        delta_v: DeltaVSidecar,
        losses: LossSidecar,
        stages: Vec<StageSidecar>,
        warnings: Vec<&'static str>,
    }

    #[derive(Serialize)]
    struct OrbitSidecar {
        periapsis_altitude_m: f64,
        apoapsis_altitude_m: f64,
        eccentricity: f64,
        inclination_deg: f64,
        launch_latitude_deg: f64,
        launch_inclination_deg: f64,
        orbital_speed_m_s: f64,
    }

    #[derive(Serialize)]
    struct DeltaVSidecar {
        required_m_s: f64,
        available_m_s: f64,
        available_sea_level_m_s: f64,
        available_vacuum_m_s: f64,
        ideal_m_s: f64,
        ideal_model: &'static str,
        ideal_burns_m_s: [f64; 3],
        rotation_m_s: f64,
        plane_change_m_s: f64,
    }

    #[derive(Serialize)]
    struct LossSidecar {
        mode: &'static str,
        simulated: bool,
        gravity_m_s: f64,
        atmospheric_m_s: f64,
        attitude_m_s: f64,
        total_m_s: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        ascent: Option<AscentSidecar>,
        #[serde(skip_serializing_if = "Option::is_none")]
        turn_exponent_bottom: Option<f64>,
    }

    #[derive(Serialize)]
    struct AscentSidecar {
        turn_start_speed_m_s: f64,
        turn_start_speed_manual: bool,
        turn_start_altitude_m: f64,
        turn_start_altitude_manual: bool,
        turn_start_altitude_from_speed: bool,
        turn_exponent_full: f64,
        cda_m2: f64,
        cda_coefficient: f64,
        cda_manual: bool,
    }

    #[derive(Serialize)]
    struct StageSidecar {
        stage: i32,
        delta_v_m_s: f64,
        effective_isp_s: f64,
        used_sea_level_isp: bool,
        mass_at_ignition_t: f64,
        mass_after_burn_t: f64,
        twr_at_ignition: f64,
    }

    fn model_name(model: IdealDvModel) -> &'static str {
        match model {
            IdealDvModel::EnergyOptimal => "energy_optimal",
            IdealDvModel::HohmannStructured => "hohmann_structured",
        }
    }

    fn summary(result: &PayloadCalculationResult) -> Summary<'_> {
        let losses = &result.losses;
        Summary {
            vessel: &result.vessel_name,
            body: &result.body_name,
            estimated_payload_t: result.estimated_payload_t,
            orbit: OrbitSidecar {
                periapsis_altitude_m: result.periapsis_altitude_m,
                apoapsis_altitude_m: result.apoapsis_altitude_m,
                eccentricity: result.eccentricity,
                inclination_deg: result.inclination_deg,
                launch_latitude_deg: result.launch_latitude_deg,
                launch_inclination_deg: result.launch_inclination_deg,
                orbital_speed_m_s: result.orbital_speed,
            },
            delta_v: DeltaVSidecar {
                required_m_s: result.required_dv,
                available_m_s: result.available_dv,
                available_sea_level_m_s: result.available_dv_sea_level,
                available_vacuum_m_s: result.available_dv_vacuum,
                ideal_m_s: result.ideal.total_dv,
                ideal_model: model_name(result.ideal.model),
                ideal_burns_m_s: result.ideal.burns,
                rotation_m_s: result.rotation_dv,
                plane_change_m_s: result.plane_change_dv,
            },
            losses: LossSidecar {
                mode: losses.mode.as_str(),
                simulated: losses.is_simulated(),
                gravity_m_s: losses.gravity_dv,
                atmospheric_m_s: losses.atmospheric_dv,
                attitude_m_s: losses.attitude_dv,
                total_m_s: losses.total_dv,
                ascent: losses.used.map(|u| AscentSidecar {
                    turn_start_speed_m_s: u.turn_start_speed_m_s,
                    turn_start_speed_manual: u.turn_start_speed_manual,
                    turn_start_altitude_m: u.turn_start_altitude_m,
                    turn_start_altitude_manual: u.turn_start_altitude_manual,
                    turn_start_altitude_from_speed: u.turn_start_altitude_from_speed,
                    turn_exponent_full: u.turn_exponent_full,
                    cda_m2: u.cda_m2,
                    cda_coefficient: u.cda_coefficient,
                    cda_manual: u.cda_manual,
                }),
                turn_exponent_bottom: losses.turn_exponent_bottom,
            },
            stages: result
                .active_stages
                .iter()
                .map(|s| StageSidecar {
                    stage: s.stage_number,
                    delta_v_m_s: s.delta_v,
                    effective_isp_s: s.effective_isp_s,
                    used_sea_level_isp: s.used_sea_level_isp,
                    mass_at_ignition_t: s.mass_at_ignition_t,
                    mass_after_burn_t: s.mass_after_burn_t,
                    twr_at_ignition: s.twr_at_ignition,
                })
                .collect(),
            warnings: result.warnings.iter().map(|w| w.message_key()).collect(),
        }
    }

    /// Write a pretty-printed JSON summary of every result field to `path` (`-` for stdout).
    pub fn write_json(path: &Path, result: &PayloadCalculationResult) -> io::Result<()> {
        let mut writer = writer_for_path(path)?;
        to_writer_pretty(&mut writer, &summary(result))?;
        writeln!(writer)?;
        writer.flush()
    }

    /// Render the JSON summary to a string.
    pub fn to_json_string(result: &PayloadCalculationResult) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&summary(result))
    }
}
