use assert_cmd::Command;

#[test]
fn help_lists_the_workflows() {
    let output = Command::cargo_bin("kfdeploy")
        .unwrap()
        .arg("--help")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for workflow in ["setup", "teardown", "deploy_model"] {
        assert!(
            stdout.contains(workflow),
            "'{}' missing from help output",
            workflow
        );
    }
}

#[test]
fn namespace_is_required() {
    Command::cargo_bin("kfdeploy")
        .unwrap()
        .arg("setup")
        .assert()
        .failure();
}

#[test]
fn unknown_workflows_are_rejected() {
    Command::cargo_bin("kfdeploy")
        .unwrap()
        .args(["--namespace", "e2e-test-1", "destroy"])
        .assert()
        .failure();
}
