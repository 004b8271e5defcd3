use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use rstest::rstest;

/// Stages that stand in for decaffeinate/esnext: upper-case, then append `;`.
/// Documents containing `BROKEN` are rejected by the first stage.
const CONFIG: &str = r#"
stages:
  coffee:
    command: sh
    args:
      - -c
      - "input=$(cat); case \"$input\" in *BROKEN*) echo 'SyntaxError: BROKEN' >&2; exit 1;; esac; printf '%s\n' \"$input\" | tr a-z A-Z"
  esnext:
    command: sed
    args: ["s/$/;/"]
"#;

fn project(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("recast.yaml"), CONFIG).unwrap();
    for (name, contents) in files {
        std::fs::write(dir.path().join(name), contents).unwrap();
    }
    dir
}

#[test]
fn test_convert_replaces_sources() {
    let dir = project(&[("one.coffee", "a = 1\n"), ("two.coffee", "b = 2\n")]);

    cargo_bin_cmd!("recast")
        .current_dir(dir.path())
        .args(["one.coffee", "two.coffee"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\none.coffee\n"))
        .stdout(predicate::str::contains("Removing one.coffee"))
        .stdout(predicate::str::contains("Removing two.coffee"));

    assert!(!dir.path().join("one.coffee").exists());
    assert!(!dir.path().join("two.coffee").exists());
    assert_eq!(
        std::fs::read_to_string(dir.path().join("one.js")).unwrap(),
        "A = 1;\n"
    );
    assert_eq!(
        std::fs::read_to_string(dir.path().join("two.js")).unwrap(),
        "B = 2;\n"
    );
}

#[test]
fn test_failed_file_is_kept_and_exit_is_nonzero() {
    let dir = project(&[("bad.coffee", "BROKEN\n"), ("good.coffee", "ok\n")]);

    cargo_bin_cmd!("recast")
        .current_dir(dir.path())
        .args(["bad.coffee", "good.coffee"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Removing bad.js"))
        .stderr(predicate::str::contains("SyntaxError: BROKEN"))
        .stderr(predicate::str::contains("1 of 2 file(s) failed to convert"));

    assert_eq!(
        std::fs::read_to_string(dir.path().join("bad.coffee")).unwrap(),
        "BROKEN\n"
    );
    assert!(!dir.path().join("bad.js").exists());
    assert!(!dir.path().join("good.coffee").exists());
    assert!(dir.path().join("good.js").exists());
}

#[test]
fn test_config_flag_points_elsewhere() {
    let dir = project(&[("main.coffee", "x\n")]);
    let config_dir = tempfile::tempdir().unwrap();
    std::fs::rename(
        dir.path().join("recast.yaml"),
        config_dir.path().join("custom.yaml"),
    )
    .unwrap();

    cargo_bin_cmd!("recast")
        .current_dir(dir.path())
        .arg("--config")
        .arg(config_dir.path().join("custom.yaml"))
        .arg("main.coffee")
        .assert()
        .success();

    assert_eq!(
        std::fs::read_to_string(dir.path().join("main.js")).unwrap(),
        "X;\n"
    );
}

#[test]
fn test_no_paths_is_a_no_op() {
    let dir = project(&[("idle.coffee", "x\n")]);

    cargo_bin_cmd!("recast")
        .current_dir(dir.path())
        .assert()
        .success();

    assert!(dir.path().join("idle.coffee").exists());
    assert!(!dir.path().join("idle.js").exists());
}

#[rstest]
#[case("--help")]
#[case("-h")]
fn test_help_exits_before_processing(#[case] flag: &str) {
    let dir = project(&[("file.coffee", "x\n")]);

    cargo_bin_cmd!("recast")
        .current_dir(dir.path())
        .args([flag, "file.coffee"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));

    assert!(dir.path().join("file.coffee").exists());
    assert!(!dir.path().join("file.js").exists());
}

#[test]
fn test_invalid_config_fails_before_processing() {
    let dir = project(&[("file.coffee", "x\n")]);
    std::fs::write(dir.path().join("recast.yaml"), "stages: [1, 2]\n").unwrap();

    cargo_bin_cmd!("recast")
        .current_dir(dir.path())
        .arg("file.coffee")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));

    assert!(dir.path().join("file.coffee").exists());
}

#[test]
fn test_missing_explicit_config_fails_before_processing() {
    let dir = project(&[("file.coffee", "x\n")]);

    cargo_bin_cmd!("recast")
        .current_dir(dir.path())
        .arg("--config")
        .arg("recsat.yaml")
        .arg("file.coffee")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));

    assert!(dir.path().join("file.coffee").exists());
    assert!(!dir.path().join("file.js").exists());
}

#[test]
fn test_missing_config_from_env_fails_before_processing() {
    let dir = project(&[("file.coffee", "x\n")]);

    cargo_bin_cmd!("recast")
        .current_dir(dir.path())
        .env("RECAST_CONFIG", "nowhere/recast.yaml")
        .arg("file.coffee")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));

    assert!(dir.path().join("file.coffee").exists());
}
