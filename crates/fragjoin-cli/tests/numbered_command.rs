use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;
use std::fs;

fn fragjoin(temp: &assert_fs::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fragjoin").unwrap();
    cmd.current_dir(temp.path())
        .env("HOME", temp.path().join("home"));
    cmd
}

#[test]
fn test_numbered_valid_json() {
    let temp = assert_fs::TempDir::new().unwrap();
    let parts = temp.child("docs/daikin-api");
    parts.child("openapi.part1.json").write_str(r#"{"a":1,"#).unwrap();
    parts.child("openapi.part2.json").write_str(r#""b":2}"#).unwrap();

    fragjoin(&temp)
        .args(["numbered", "--count", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("JSON is valid."))
        .stdout(predicate::str::contains("Total length: 13 characters"));

    let content = fs::read_to_string(parts.child("openapi.json").path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value, serde_json::json!({"a": 1, "b": 2}));

    // Fragments are never deleted by the numbered joiner
    parts.child("openapi.part1.json").assert(predicate::path::exists());
}

#[test]
fn test_numbered_invalid_json_prints_context() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("parts/part1").write_str(r#"{"a":1"#).unwrap();
    temp.child("parts/part2").write_str(r#","b":2]"#).unwrap();

    fragjoin(&temp)
        .args([
            "numbered", "--dir", "parts", "--pattern", "part{n}", "--count", "2",
            "--output", "out.json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("not valid JSON"))
        .stdout(predicate::str::contains("Error context (around char 12):"))
        .stdout(predicate::str::contains(r#"{"a":1,"b":2]"#));

    temp.child("out.json").assert(r#"{"a":1,"b":2]"#);
}

#[test]
fn test_numbered_strict_exit_code() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("parts/part1").write_str("[1,").unwrap();

    fragjoin(&temp)
        .args([
            "numbered", "--dir", "parts", "--pattern", "part{n}", "--count", "1",
            "--output", "out.json", "--strict",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed verification"));
}

#[test]
fn test_numbered_warns_on_missing_parts() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("parts/part2").write_str("[]").unwrap();

    fragjoin(&temp)
        .args([
            "numbered", "--dir", "parts", "--pattern", "part{n}", "--count", "3",
            "--output", "out.json",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("part1 not found!"))
        .stderr(predicate::str::contains("part3 not found!"))
        .stdout(predicate::str::contains("2 fragment(s) missing"));

    temp.child("out.json").assert("[]");
}

#[test]
fn test_numbered_discover() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("parts/chunk1.json").write_str("[1,").unwrap();
    temp.child("parts/chunk2.json").write_str("2,").unwrap();
    temp.child("parts/chunk3.json").write_str("3]").unwrap();

    fragjoin(&temp)
        .args([
            "numbered", "--dir", "parts", "--pattern", "chunk{n}.json", "--discover",
            "--output", "out.json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("All 3 fragments joined"));

    temp.child("out.json").assert("[1,2,3]");
}

#[test]
fn test_numbered_reads_project_config() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child(".fragjoin/config.toml")
        .write_str(
            r#"
[numbered]
dir = "src-parts"
pattern = "s{n}.json"
count = 2
output = "build/spec.json"
"#,
        )
        .unwrap();
    temp.child("src-parts/s1.json").write_str("{\"ok\":").unwrap();
    temp.child("src-parts/s2.json").write_str("true}").unwrap();

    fragjoin(&temp).arg("numbered").assert().success();

    let content = fs::read_to_string(temp.child("build/spec.json").path()).unwrap();
    insta::assert_snapshot!(content, @r#"{"ok":true}"#);
}
