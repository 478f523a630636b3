mod common;

use approx::assert_relative_eq;
use common::{kerbin, two_stage};
use orbital_payload_calculator::ascent::LossModelConfig;
use orbital_payload_calculator::export::{stages, summary};
use orbital_payload_calculator::orbits::OrbitTargets;
use orbital_payload_calculator::solver::{PayloadCalculationResult, compute};
use tempfile::tempdir;

fn result() -> PayloadCalculationResult {
    let body = kerbin();
    let mut targets = OrbitTargets::for_body(&body);
    targets.launch_latitude_deg = 30.0;
    targets.target_inclination_deg = 30.0;
    compute(&two_stage(), &targets, &LossModelConfig::default()).expect("payload")
}

#[test]
fn stage_csv_round_trips_through_reader() {
    let result = result();
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("nested/stages.csv");
    stages::write_csv(&path, &result).expect("write csv");

    let mut reader = csv::Reader::from_path(&path).expect("open csv");
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.expect("row")).collect();
    assert_eq!(rows.len(), result.active_stages.len());
    for (row, stage) in rows.iter().zip(&result.active_stages) {
        assert_eq!(row[0].parse::<i32>().expect("stage"), stage.stage_number);
        let dv: f64 = row[1].parse().expect("delta-v");
        assert_relative_eq!(dv, stage.delta_v, epsilon = 1e-3);
        let flag = if stage.used_sea_level_isp { "true" } else { "false" };
        assert_eq!(&row[3], flag);
    }
}

#[test]
fn records_follow_active_stages() {
    let result = result();
    let records = stages::records(&result);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].stage, 0);
    assert_eq!(records[1].stage, 1);

    let mut buffer = Vec::new();
    stages::write_header(&mut buffer).expect("header");
    records[0].write_to(&mut buffer).expect("row");
    let text = String::from_utf8(buffer).expect("utf8");
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some(
            "stage,delta_v_m_s,effective_isp_s,used_sea_level_isp,mass_at_ignition_t,mass_after_burn_t,twr_at_ignition"
        )
    );
    assert!(lines.next().expect("row").starts_with("0,"));
}

#[test]
fn json_summary_lists_every_section() {
    let result = result();
    let json = summary::to_json_string(&result).expect("json");
    for key in [
        "\"vessel\": \"Two Stage\"",
        "\"body\": \"Kerbin\"",
        "\"orbit\"",
        "\"delta_v\"",
        "\"ideal_model\": \"energy_optimal\"",
        "\"losses\"",
        "\"ascent\"",
        "\"stages\"",
        "\"warnings\": []",
        "\"launch_latitude_deg\": 30.0",
    ] {
        assert!(json.contains(key), "missing {key} in {json}");
    }

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("reports/summary.json");
    summary::write_json(&path, &result).expect("write json");
    assert_eq!(std::fs::read_to_string(&path).expect("read"), format!("{json}\n"));
}
