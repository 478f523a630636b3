use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn catalog(kind: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../configs")
        .join(kind)
}

fn payload() -> Command {
    let mut cmd = Command::cargo_bin("payload").expect("payload bin");
    cmd.arg("--bodies")
        .arg(catalog("bodies"))
        .arg("--vessels")
        .arg(catalog("vessels"));
    cmd
}

#[test]
fn prints_report_for_catalog_vessel() {
    payload()
        .args(["--body", "kerbin", "--vessel", "Kestrel"])
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Payload Estimate ==="))
        .stdout(predicate::str::contains("Vessel          : Kestrel"))
        .stdout(predicate::str::contains("Max payload"));
}

#[test]
fn writes_stage_csv_and_json_summary() {
    let dir = tempdir().expect("tempdir");
    let csv_path = dir.path().join("out/stages.csv");
    let json_path = dir.path().join("out/summary.json");

    payload()
        .args(["--body", "Kerbin", "--vessel", "Heron", "--periapsis-km", "100"])
        .arg("--csv")
        .arg(&csv_path)
        .arg("--json")
        .arg(&json_path)
        .assert()
        .success();

    let mut reader = csv::Reader::from_path(&csv_path).expect("csv");
    let headers = reader.headers().expect("headers").clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        [
            "stage",
            "delta_v_m_s",
            "effective_isp_s",
            "used_sea_level_isp",
            "mass_at_ignition_t",
            "mass_after_burn_t",
            "twr_at_ignition"
        ]
    );
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.expect("row")).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "0");
    assert_eq!(&rows[1][0], "1");

    let json = std::fs::read_to_string(&json_path).expect("json");
    assert!(json.contains("\"vessel\": \"Heron\""));
    assert!(json.contains("\"periapsis_altitude_m\": 100000.0"));
    assert!(json.contains("\"estimated_payload_t\""));
}

#[test]
fn plane_change_warning_is_reported() {
    payload()
        .args([
            "--body",
            "Kerbin",
            "--vessel",
            "Kestrel",
            "--latitude",
            "-45",
            "--mode",
            "pessimistic",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("#LOC_OPC_InclinationBelowLatitudeWarning"))
        .stdout(predicate::str::contains("pessimistic"));
}

#[test]
fn unknown_body_fails() {
    payload()
        .args(["--body", "Jool", "--vessel", "Kestrel"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("body 'Jool' not found"));
}

#[test]
fn orbit_outside_soi_fails() {
    payload()
        .args(["--body", "Mun", "--vessel", "Kestrel", "--apoapsis-km", "5000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sphere of influence"));
}

#[test]
fn reports_library_version() {
    Command::cargo_bin("payload")
        .expect("payload bin")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(orbital_payload_calculator::version()));
}

#[test]
fn json_summary_to_stdout_moves_report_to_stderr() {
    let dir = tempdir().expect("tempdir");
    payload()
        .current_dir(dir.path())
        .args(["--body", "Kerbin", "--vessel", "Kestrel", "--json", "-"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{"))
        .stdout(predicate::str::contains("\"vessel\": \"Kestrel\""))
        .stdout(predicate::str::contains("===").not())
        .stdout(predicate::str::contains("Summary written").not())
        .stderr(predicate::str::contains("=== Payload Estimate ==="));
    assert!(!dir.path().join("-").exists());
}

#[test]
fn stage_csv_to_stdout_is_parseable() {
    let output = payload()
        .args(["--body", "Kerbin", "--vessel", "Heron", "--csv", "-"])
        .output()
        .expect("run payload");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Max payload"));

    let mut reader = csv::Reader::from_reader(output.stdout.as_slice());
    assert_eq!(reader.headers().expect("headers").len(), 7);
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.expect("row")).collect();
    assert!(!rows.is_empty());
    assert!(rows.iter().all(|row| row[0].parse::<i32>().is_ok()));
}
