use assert_cmd::cargo;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_help() {
    let mut cmd = Command::new(cargo::cargo_bin!("machineid-crew"));
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--validate-method"))
        .stdout(predicate::str::contains("--llm-timeout-secs"));
}

#[test]
fn test_missing_org_key_is_reported_with_logging_off() {
    let mut cmd = Command::new(cargo::cargo_bin!("machineid-crew"));
    cmd.env_remove("MACHINEID_ORG_KEY")
        .env("RUST_LOG", "off")
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "export MACHINEID_ORG_KEY=org_your_key_here",
        ));
}
