//! Binary-level tests. `HOME` points at a temp dir so no user config leaks in,
//! and the hub URL targets a closed loopback port so nothing leaves the host.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SAMPLE: &str = "\
entries:
  - tags: [\"1.0\", latest]
    shared_tags: [\"1\"]
    architectures: [amd64, arm64]
";

fn setup() -> (TempDir, TempDir) {
    let home = TempDir::new().expect("home");
    let library = TempDir::new().expect("library");
    std::fs::write(library.path().join("sample.yaml"), SAMPLE).expect("write sample");
    (home, library)
}

fn tagsync(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tagsync").expect("binary");
    cmd.env("HOME", home)
        .env("USERPROFILE", home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn write_config(home: &Path, body: &str) {
    let dir = home.join(".tagsync");
    std::fs::create_dir_all(&dir).expect("mkdir");
    std::fs::write(dir.join("config.yaml"), body).expect("write config");
}

#[test]
fn put_shared_requires_namespace() {
    let (home, library) = setup();
    tagsync(home.path())
        .arg("put-shared")
        .arg("--library")
        .arg(library.path())
        .arg("sample")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--namespace"));
}

#[test]
fn put_shared_rejects_malformed_arch_namespace() {
    let (home, library) = setup();
    tagsync(home.path())
        .args(["put-shared", "--namespace", "myorg", "--arch-namespace", "amd64"])
        .arg("--library")
        .arg(library.path())
        .arg("sample")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ARCH=NAMESPACE"));
}

#[test]
fn put_shared_unknown_repo_fails_before_any_lookup() {
    let (home, library) = setup();
    tagsync(home.path())
        .args(["put-shared", "--namespace", "myorg", "ghost"])
        .arg("--library")
        .arg(library.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost"));
}

#[test]
fn put_shared_needs_repos_or_all() {
    let (home, library) = setup();
    tagsync(home.path())
        .args(["put-shared", "--namespace", "myorg"])
        .arg("--library")
        .arg(library.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--all"));
}

#[test]
fn dry_run_with_unknown_timestamps_pushes_nothing() {
    let (home, library) = setup();
    write_config(
        home.path(),
        &format!(
            "namespace: myorg\nlibrary: {}\nhub_url: http://127.0.0.1:9\narch_namespaces:\n  amd64: arch/amd64\n",
            library.path().display()
        ),
    );

    tagsync(home.path())
        .args(["put-shared", "--dry-run", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[dry-run] 0 group(s) pushed"))
        .stdout(predicate::str::contains("3 tag(s) current"))
        .stderr(predicate::str::contains("no arch-namespace specified for \"arm64\""))
        .stderr(predicate::str::contains("Skipping myorg/sample:1.0"));
}

#[test]
fn arch_namespace_flag_overlays_config() {
    let (home, library) = setup();
    write_config(
        home.path(),
        &format!(
            "namespace: myorg\nlibrary: {}\nhub_url: http://127.0.0.1:9\narch_namespaces:\n  amd64: arch/amd64\n",
            library.path().display()
        ),
    );

    tagsync(home.path())
        .args(["put-shared", "--dry-run", "--all"])
        .args(["--arch-namespace", "arm64=arch/arm64"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 warning(s)"))
        .stderr(predicate::str::contains("no arch-namespace specified").not());
}

#[test]
fn groups_json_lists_singletons_then_shared() {
    let (home, library) = setup();
    let output = tagsync(home.path())
        .args(["groups", "--json", "sample"])
        .arg("--library")
        .arg(library.path())
        .output()
        .expect("run groups");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let groups = value[0]["groups"].as_array().expect("groups array");
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["tags"], serde_json::json!(["1.0", "latest"]));
    assert_eq!(groups[1]["tags"], serde_json::json!(["1"]));
    assert_eq!(groups[1]["architectures"], serde_json::json!(["amd64", "arm64"]));
}

#[test]
fn groups_single_tag_warns_about_shared_tags() {
    let (home, library) = setup();
    tagsync(home.path())
        .args(["groups", "sample:latest"])
        .arg("--library")
        .arg(library.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("skipping shared tags"))
        .stdout(predicate::str::contains("1 group(s)"));
}
