use assert_cmd::Command;

#[test]
fn cli_help_smoke() {
    let mut cmd = Command::cargo_bin("yieldcorr").unwrap();
    cmd.arg("--help");
    cmd.assert().success();
}

#[test]
fn yield_help_smoke() {
    let mut cmd = Command::cargo_bin("yieldcorr").unwrap();
    cmd.args(["yield", "--help"]);
    cmd.assert().success();
}

#[test]
fn corr_help_smoke() {
    let mut cmd = Command::cargo_bin("yieldcorr").unwrap();
    cmd.args(["corr", "--help"]);
    cmd.assert().success();
}

#[test]
fn corr_rejects_bad_threshold_spec() {
    let mut cmd = Command::cargo_bin("yieldcorr").unwrap();
    cmd.args(["corr", "--th-swa-list", "0,abc", "--run"]);
    cmd.assert().failure();
}
