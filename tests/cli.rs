//! End-to-end tests of the `odeplot` binary.
//!
//! Every case here either fails before the viewer opens or uses `--svg`,
//! so no terminal is needed.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use assert_cmd::Command;
use predicates::prelude::*;

const SOLVER_OUTPUT: &str = "\
time,w_expl,w_impl,w_RK2,w_cn,exact_solution
0.000000,1.000000,1.000000,1.000000,1.000000,1.000000
0.050000,1.050000,1.052634,1.051184,1.051240,1.051220
0.100000,1.102369,1.107838,1.104987,1.105106,1.105004
";

fn cmd() -> Command {
    Command::cargo_bin("odeplot").unwrap()
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

#[test]
fn help_lists_options() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--svg"))
        .stdout(predicate::str::contains("--cn-column"))
        .stdout(predicate::str::contains("output_P1.csv"));
}

#[test]
fn malformed_size_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "output_P1.csv", SOLVER_OUTPUT);

    cmd()
        .arg(&input)
        .args(["--svg", "grid.svg", "--size", "wide"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("WIDTHxHEIGHT"));
}

// ---------------------------------------------------------------------------
// Load failures happen before any display
// ---------------------------------------------------------------------------

#[test]
fn missing_default_file_is_data_access_error() {
    let dir = tempfile::tempdir().unwrap();

    cmd()
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot open 'output_P1.csv'"));
}

#[test]
fn missing_w_impl_is_schema_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "output_P1.csv",
        "time,w_expl,w_RK2,exact_solution\n0,1,1,1\n",
    );

    cmd()
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("required column 'w_impl' is missing"));
}

#[test]
fn non_numeric_cell_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "output_P1.csv",
        "time,w_expl,w_impl,w_RK2,exact_solution\n0,1,1,1,1\n0.1,x,1,1,1\n",
    );

    cmd()
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("column 'w_expl', row 2: 'x' is not a number"));
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "output_P1.json", "{}");

    cmd()
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("file format 'json' is not supported"));
}

#[test]
fn path_without_extension_asks_for_format() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "output_P1", SOLVER_OUTPUT);

    cmd()
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("output_P1"))
        .stderr(predicate::str::contains("--format csv"));
}

// ---------------------------------------------------------------------------
// SVG export
// ---------------------------------------------------------------------------

#[test]
fn svg_export_writes_all_panels() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "output_P1.csv", SOLVER_OUTPUT);
    let svg = dir.path().join("grid.svg");

    cmd().arg(&input).arg("--svg").arg(&svg).assert().success();

    let contents = fs::read_to_string(&svg).unwrap();
    for text in [
        "Euler forward method",
        "Euler backward method",
        "Runge-Kutta with two stages (RK2) method",
        "Crank-Nicolson (CN) method",
        "Exact solution",
    ] {
        assert!(contents.contains(text), "missing '{}'", text);
    }
}

#[test]
fn format_flag_overrides_extension() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "results.txt", &SOLVER_OUTPUT.replace(',', "\t"));
    let svg = dir.path().join("grid.svg");

    cmd()
        .arg(&input)
        .args(["--format", "tsv"])
        .arg("--svg")
        .arg(&svg)
        .assert()
        .success();

    assert!(svg.exists());
}

#[test]
fn missing_crank_nicolson_column_is_flagged() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "output_P1.csv",
        "time,w_expl,w_impl,w_RK2,exact_solution\n0,1,1,1,1\n1,2,2,2,2\n",
    );
    let svg = dir.path().join("grid.svg");

    cmd()
        .env("ODEPLOT_LOG", "warn")
        .arg(&input)
        .arg("--svg")
        .arg(&svg)
        .assert()
        .success()
        .stderr(predicate::str::contains("column 'w_cn' not found"));
}

#[test]
fn svg_export_survives_diverging_solution() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "output_P1.csv",
        "time,w_expl,w_impl,w_RK2,exact_solution\n0,1,1,1,1\n1,1.5e308,2,2,2\n2,-1.5e308,3,3,3\n",
    );
    let svg = dir.path().join("grid.svg");

    cmd()
        .timeout(Duration::from_secs(60))
        .arg(&input)
        .arg("--svg")
        .arg(&svg)
        .assert()
        .success();

    assert!(fs::read_to_string(&svg).unwrap().contains("Euler forward method"));
}
