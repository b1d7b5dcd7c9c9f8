//! End-to-end scenarios driving the `faxc` binary as a subprocess,
//! covering the success path, each failure phase (I/O, parse, check),
//! and the CLI surface itself.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn faxc() -> Command {
    Command::cargo_bin("faxc").expect("faxc binary builds")
}

fn source_file(content: &str) -> NamedTempFile {
    let mut f = tempfile::Builder::new().suffix(".fax").tempfile().expect("create temp file");
    write!(f, "{content}").expect("write temp file");
    f
}

/// S1: a well-formed unit checks cleanly with no diagnostics.
#[test]
fn s1_well_formed_unit_checks_successfully() {
    let file = source_file("export fn main() void = {};");
    faxc().arg("check").arg(file.path()).assert().success().stdout(predicate::str::is_empty());
}

/// S2: an unresolved name is reported with its source location.
#[test]
fn s2_unresolved_name_reports_location() {
    let file = source_file("fn get() int = { return missing; }");
    faxc()
        .arg("check")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unresolved identifier `missing`"));
}

/// S3: a syntax error is reported before the checker ever runs.
#[test]
fn s3_syntax_error_is_reported() {
    let file = source_file("fn get(");
    faxc().arg("check").arg(file.path()).assert().failure().stderr(predicate::str::contains("Error "));
}

/// S4: checking a nonexistent path fails with an I/O error, not a panic.
#[test]
fn s4_missing_file_reports_io_error() {
    faxc()
        .arg("check")
        .arg("/no/such/file.fax")
        .assert()
        .failure()
        .stderr(predicate::str::contains("couldn't read"));
}

/// S5: a type mismatch is still rejected when `--trace` is passed.
#[test]
fn s5_trace_flag_does_not_suppress_check_errors() {
    let file = source_file("fn get() int = { return \"not an int\"; }");
    faxc()
        .arg("check")
        .arg(file.path())
        .arg("--trace")
        .assert()
        .failure()
        .stderr(predicate::str::contains("type mismatch"));
}

/// S6: `--help` documents the `check` subcommand.
#[test]
fn s6_help_documents_check_subcommand() {
    faxc().arg("--help").assert().success().stdout(predicate::str::contains("check"));
}
