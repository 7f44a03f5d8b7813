use assert_cmd::cargo::{self};
use predicates::str::contains;

#[test]
fn prints_help() {
    let mut cmd = cargo::cargo_bin_cmd!("dynform");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(contains("dynform"))
        .stdout(contains("--output"));
}

#[test]
fn rejects_missing_form_file_with_parse_error() {
    // an unreadable spec falls back to inline parsing, which fails loudly
    let mut cmd = cargo::cargo_bin_cmd!("dynform");
    cmd.arg("/definitely/not/a/file.json").assert().failure();
}
