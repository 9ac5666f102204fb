// End-to-end tests for the `clasif` binary.
//
// Each test lays out a working directory with a reference workbook and a
// `files/` folder of reports, then runs the binary inside it.
//
// Run with: cargo test -p clasif-cli --test cli_tests -- --nocapture

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::Workbook;

const REPORT_NAME: &str = "20230630_FXB-EXB-901_TREZ002_4562150_4562150_02_51422020.xlsx";

fn clasif(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_clasif"));
    cmd.current_dir(dir);
    cmd.env_remove("CLASIF_INPUT_DIR");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Writes a workbook with one sheet per `(name, rows)` entry.
fn write_workbook(path: &Path, sheets: &[(&str, Vec<Vec<&str>>)]) {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let sheet = workbook.add_worksheet().set_name(*name).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    sheet.write_string(r as u32, c as u16, *value).unwrap();
                }
            }
        }
    }
    workbook.save(path).unwrap();
}

fn write_reference(dir: &Path) {
    write_workbook(
        &dir.join("clasificatie.xlsx"),
        &[
            ("Venituri", vec![vec!["Denumire", "cod. Ec"], vec!["Impozit pe profit", "01.01"]]),
            ("Cheltuieli FCT", vec![vec!["Denumire", "cod. Ec"], vec!["Autoritati executive", "51.01.01.03"]]),
            ("Cheltuieli ECN", vec![vec!["Denumire", "cod. Ec"], vec!["Furnituri de birou", "20.01.01"]]),
        ],
    );
}

fn write_report(dir: &Path, name: &str) {
    std::fs::create_dir_all(dir.join("files")).unwrap();
    write_workbook(
        &dir.join("files").join(name),
        &[(
            "Sheet1",
            vec![
                vec!["Raport executie"],
                vec![],
                vec![
                    "Tip Indicator",
                    "Clasificatie Functionala",
                    "Clasificatie Functionala Descriere",
                    "Clasificatie Economica",
                    "Clasificatie Economica Descriere",
                ],
                vec!["Venit", "010100", "Impozit pe profit", "", ""],
                vec!["Venit", "020200", "Impozit pe venit", "", ""],
                vec!["Cheltuiala", "510103", "Autoritati executive", "200101", "Furnituri de birou"],
                vec!["Cheltuiala", "510103", "Autoritati executive", "200530", "Alte obiecte de inventar"],
                vec!["Total", "", "", "", ""],
            ],
        )],
    );
}

/// Reference workbook plus one report with two unknown codes.
fn workspace() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_reference(dir.path());
    write_report(dir.path(), REPORT_NAME);
    dir
}

fn read_output_sheet(path: &Path) -> Vec<Vec<String>> {
    let mut workbook = open_workbook_auto(path).unwrap();
    let range = workbook.worksheet_range("Missing Codes").unwrap();
    range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::String(s) => s.clone(),
                    Data::Empty => String::new(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect()
}

// ===========================================================================
// clasif run
// ===========================================================================

#[test]
fn run_writes_missing_codes_workbook() {
    let dir = workspace();

    let output = clasif(dir.path()).arg("run").output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let rows = read_output_sheet(&dir.path().join("missing_codes.xlsx"));
    assert_eq!(
        rows,
        vec![
            vec!["operator_id", "unit_id", "indicator_type", "code_type", "code", "label"],
            vec!["4562150", "4562150", "Cheltuiala", "economic", "200530", "Alte obiecte de inventar"],
            vec!["4562150", "4562150", "Venit", "functional", "020200", "Impozit pe venit"],
        ]
    );
    assert!(stderr(&output).contains("1 processed"), "stderr: {}", stderr(&output));
}

#[test]
fn run_json_prints_single_result_document() {
    let dir = workspace();

    let output = clasif(dir.path())
        .args(["run", "--json", "-o", "out/missing.csv"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)
        .unwrap_or_else(|e| panic!("stdout must be one JSON value: {e}"));
    assert_eq!(value["summary"]["files_processed"], 1);
    assert_eq!(value["summary"]["missing_codes"], 2);
    assert_eq!(value["records"][1]["code"], "020200");
    assert!(value["warnings"].as_array().unwrap().is_empty());

    let csv = std::fs::read_to_string(dir.path().join("out/missing.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "operator_id,unit_id,indicator_type,code_type,code,label");
    assert_eq!(lines.len(), 3);
}

#[test]
fn fail_on_missing_sets_exit_code() {
    let dir = workspace();

    let output = clasif(dir.path()).args(["run", "--fail-on-missing"]).output().unwrap();
    assert_eq!(output.status.code(), Some(6), "stderr: {}", stderr(&output));
    // The report is still written
    assert!(dir.path().join("missing_codes.xlsx").is_file());
}

#[test]
fn lock_files_and_bad_names_do_not_abort_run() {
    let dir = workspace();
    std::fs::write(dir.path().join("files").join(".~lock.report.xlsx#"), b"").unwrap();
    write_report(dir.path(), "short_name.xlsx");

    let output = clasif(dir.path()).args(["run", "--json", "-o", "missing.json"]).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["summary"]["files_total"], 2);
    assert_eq!(value["summary"]["files_skipped"], 1);
    assert_eq!(value["skipped"][0]["file"], "short_name.xlsx");
}

#[test]
fn strict_run_fails_on_bad_report() {
    let dir = workspace();
    write_report(dir.path(), "short_name.xlsx");

    let output = clasif(dir.path()).args(["run", "--strict"]).output().unwrap();
    assert_eq!(output.status.code(), Some(4), "stderr: {}", stderr(&output));
    assert!(!dir.path().join("missing_codes.xlsx").exists());
}

#[test]
fn missing_input_dir_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    write_reference(dir.path());

    let output = clasif(dir.path()).arg("run").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("input folder not found"));
}

#[test]
fn broken_reference_is_fatal() {
    let dir = workspace();
    write_workbook(
        &dir.path().join("clasificatie.xlsx"),
        &[("Venituri", vec![vec!["Denumire", "cod. Ec"], vec!["Impozit", "01.01"]])],
    );

    let output = clasif(dir.path()).arg("run").output().unwrap();
    assert_eq!(output.status.code(), Some(3), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("Cheltuieli FCT"));
}

#[test]
fn config_file_overrides_layout() {
    let dir = workspace();
    let reports: PathBuf = dir.path().join("reports");
    std::fs::rename(dir.path().join("files"), &reports).unwrap();
    std::fs::write(
        dir.path().join("clasif.toml"),
        "[input]\ndir = \"reports\"\n\n[output]\npath = \"missing.json\"\n",
    )
    .unwrap();

    let output = clasif(dir.path()).arg("run").output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = std::fs::read_to_string(dir.path().join("missing.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 2);
}

// ===========================================================================
// clasif validate
// ===========================================================================

#[test]
fn validate_reports_counts_per_category() {
    let dir = workspace();

    let output = clasif(dir.path()).args(["validate", "--json"]).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let stats = value.as_array().unwrap();
    assert_eq!(stats.len(), 3);
    assert!(stats.iter().all(|s| s["codes"] == 1));
}

#[test]
fn validate_fails_on_empty_reference_sheet() {
    let dir = tempfile::tempdir().unwrap();
    write_workbook(
        &dir.path().join("clasificatie.xlsx"),
        &[
            ("Venituri", vec![vec!["Denumire", "cod. Ec"], vec!["Impozit pe profit", "01.01"]]),
            ("Cheltuieli FCT", vec![vec!["Denumire", "cod. Ec"]]),
            ("Cheltuieli ECN", vec![vec!["Denumire", "cod. Ec"], vec!["Furnituri de birou", "20.01.01"]]),
        ],
    );

    let output = clasif(dir.path()).arg("validate").output().unwrap();
    assert_eq!(output.status.code(), Some(3), "stderr: {}", stderr(&output));
}

#[test]
fn no_subcommand_prints_usage() {
    let dir = tempfile::tempdir().unwrap();
    let output = clasif(dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Usage: clasif"));
}
