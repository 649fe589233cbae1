//! Integration tests for the `rpmdeplint` CLI.
//!
//! The usage-error and operational-failure paths (exit 2 / exit 1) run
//! without needing a real RPM payload on disk, since `--repo` syntax is
//! validated before any PUT is read and a missing PUT path is itself an
//! operational failure. The four defect-reporting checks themselves are
//! exercised at the `rpmdeplint-solve` level, where package fixtures are
//! plain in-memory values rather than on-disk RPM binaries.

use assert_cmd::Command;
use testresult::TestResult;

fn cmd() -> TestResult<Command> {
    Ok(Command::cargo_bin("rpmdeplint")?)
}

#[test]
fn missing_rpmpath_is_a_usage_error() -> TestResult {
    let mut cmd = cmd()?;
    cmd.args(["check-sat"]);
    cmd.assert().failure().code(2);
    Ok(())
}

#[test]
fn malformed_repo_value_is_a_usage_error() -> TestResult {
    let mut cmd = cmd()?;
    cmd.args(["check-sat", "--repo", "no-comma-here", "does-not-exist.rpm"]);
    let output = cmd.assert().failure().code(2);
    let stderr = String::from_utf8_lossy(&output.get_output().stderr);
    assert!(stderr.contains("invalid --repo value"), "stderr was: {stderr}");
    Ok(())
}

#[test]
fn empty_repo_name_is_a_usage_error() -> TestResult {
    let mut cmd = cmd()?;
    cmd.args(["check-sat", "--repo", ",/srv/repo", "does-not-exist.rpm"]);
    cmd.assert().failure().code(2);
    Ok(())
}

#[test]
fn nonexistent_put_path_is_an_operational_failure() -> TestResult {
    let mut cmd = cmd()?;
    cmd.args(["check-sat", "does-not-exist.rpm"]);
    cmd.assert().failure().code(1);
    Ok(())
}

#[test]
fn help_lists_every_subcommand() -> TestResult {
    let mut cmd = cmd()?;
    cmd.arg("--help");
    let output = cmd.assert().success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    for name in ["check", "check-sat", "check-repoclosure", "check-conflicts", "check-upgrade", "list-deps"] {
        assert!(stdout.contains(name), "--help output missing {name:?}:\n{stdout}");
    }
    Ok(())
}

#[test]
fn man_subcommand_is_hidden_from_help() -> TestResult {
    let mut cmd = cmd()?;
    cmd.arg("--help");
    let output = cmd.assert().success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    assert!(!stdout.lines().any(|line| line.trim_start().starts_with("man")));
    Ok(())
}

#[test]
fn man_subcommand_writes_a_page_per_subcommand() -> TestResult {
    let out_dir = tempfile::tempdir()?;

    let mut cmd = cmd()?;
    cmd.args(["man", out_dir.path().to_string_lossy().as_ref()]);
    cmd.assert().success();

    assert!(out_dir.path().join("rpmdeplint.1").exists());
    assert!(out_dir.path().join("rpmdeplint-check-sat.1").exists());
    assert!(out_dir.path().join("rpmdeplint-list-deps.1").exists());
    Ok(())
}
