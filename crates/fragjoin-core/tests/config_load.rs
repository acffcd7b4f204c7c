use fragjoin_core::config::{load_config, load_config_with_precedence};
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_project_and_local_layers_merge() {
    let tmp = TempDir::new().unwrap();
    let config_dir = tmp.path().join(".fragjoin");
    fs::create_dir_all(&config_dir).unwrap();

    fs::write(
        config_dir.join("config.toml"),
        r#"
[named]
dir = "fragments"
fragments = ["a.txt", "b.txt"]
output = "out/joined.json"

[numbered]
pattern = "chunk{n}.json"
count = 3
"#,
    )
    .unwrap();

    // Local override only touches a couple of keys
    fs::write(
        config_dir.join("config.local.toml"),
        r#"
[named]
keepFragments = true

[numbered]
count = 9
"#,
    )
    .unwrap();

    let cfg = load_config_with_precedence(tmp.path()).unwrap();

    assert_eq!(cfg.named.dir, tmp.path().join("fragments"));
    assert_eq!(cfg.named.fragments, vec!["a.txt", "b.txt"]);
    assert_eq!(cfg.named.output, tmp.path().join("out/joined.json"));
    assert!(cfg.named.keep_fragments);
    assert_eq!(cfg.named.leading_artifact.as_deref(), Some("t\t"));

    assert_eq!(cfg.numbered.pattern, "chunk{n}.json");
    assert_eq!(cfg.numbered.count, 9);
    assert_eq!(cfg.numbered.dir, tmp.path().join("docs/daikin-api"));
}

#[test]
fn test_broken_project_config_is_fatal() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join(".fragjoin")).unwrap();
    fs::write(tmp.path().join(".fragjoin/config.toml"), "[named\n").unwrap();

    let err = load_config_with_precedence(tmp.path()).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse config"));
}

#[test]
fn test_broken_local_config_is_ignored() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join(".fragjoin")).unwrap();
    fs::write(tmp.path().join(".fragjoin/config.toml"), "[numbered]\ncount = 2\n").unwrap();
    fs::write(tmp.path().join(".fragjoin/config.local.toml"), "not = [valid").unwrap();

    let cfg = load_config_with_precedence(tmp.path()).unwrap();
    assert_eq!(cfg.numbered.count, 2);
}

#[test]
fn test_load_single_file_keeps_absent_fields_empty() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("config.toml");
    fs::write(&path, "[numbered]\ndiscover = true\n").unwrap();

    let partial = load_config(&path).unwrap();
    assert!(partial.named.is_none());
    let numbered = partial.numbered.unwrap();
    assert_eq!(numbered.discover, Some(true));
    assert_eq!(numbered.count, None);
}

#[test]
#[serial]
fn test_init_then_named_from_working_directory() {
    let tmp = TempDir::new().unwrap();
    let original = env::current_dir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();

    fragjoin_core::cmd_init(false, false).unwrap();
    // Second init without --force refuses to overwrite
    let second = fragjoin_core::cmd_init(false, false);

    fs::create_dir_all("docs/daikin-api").unwrap();
    fs::write("docs/daikin-api/p1.txt", "t\tone").unwrap();
    fs::write("docs/daikin-api/p2.txt", "two").unwrap();

    let result = fragjoin_core::cmd_named(None, Vec::new(), None, false, false);

    env::set_current_dir(original).unwrap();

    assert!(second.is_err());
    result.unwrap();
    assert!(tmp.path().join(".fragjoin/config.toml").exists());
    assert_eq!(
        fs::read_to_string(tmp.path().join("docs/daikin-api/openapi.part11.json")).unwrap(),
        "\tonetwo"
    );
    assert!(!tmp.path().join("docs/daikin-api/p1.txt").exists());
    assert!(!tmp.path().join("docs/daikin-api/p2.txt").exists());
}

#[test]
#[serial]
fn test_numbered_strict_fails_on_invalid_json() {
    let tmp = TempDir::new().unwrap();
    let original = env::current_dir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();

    fs::create_dir_all("parts").unwrap();
    fs::write("parts/part1", "{\"a\":").unwrap();

    let lenient = fragjoin_core::cmd_numbered(
        Some("parts".to_string()),
        Some("part{n}".to_string()),
        Some(1),
        false,
        Some("out.json".to_string()),
        false,
        false,
    );
    let strict = fragjoin_core::cmd_numbered(
        Some("parts".to_string()),
        Some("part{n}".to_string()),
        Some(1),
        false,
        Some("out.json".to_string()),
        false,
        true,
    );

    env::set_current_dir(original).unwrap();

    assert!(lenient.is_ok());
    assert!(strict.is_err());
    assert!(tmp.path().join("out.json").exists());
}
