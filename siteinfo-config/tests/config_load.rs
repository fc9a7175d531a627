use serial_test::serial;
use siteinfo_common::observability::LogFormat;
use siteinfo_config::SiteInfoConfigLoader;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn file_values_and_env_overrides_merge() {
    let tmp = TempDir::new().unwrap();
    let file_yaml = r#"
fetch:
  timeout_secs: 20
  max_redirects: 4
  user_agent: "${SITEINFO_TEST_AGENT}"
log:
  level: debug
  format: json
"#;
    let p = write_yaml(&tmp, "siteinfo.yaml", file_yaml);

    temp_env::with_vars(
        [
            ("SITEINFO_TEST_AGENT", Some("unfurl-bot/2.0")),
            ("SITEINFO__FETCH__TIMEOUT_SECS", Some("7")),
        ],
        || {
            let config = SiteInfoConfigLoader::new()
                .with_file(&p)
                .load()
                .expect("load config");

            assert_eq!(config.fetch.timeout_secs, 7);
            assert_eq!(config.fetch.max_redirects, 4);
            assert_eq!(config.fetch.user_agent.as_deref(), Some("unfurl-bot/2.0"));
            assert_eq!(config.log.level, "debug");
            assert_eq!(config.log.format, LogFormat::Json);
        },
    );
}

#[test]
#[serial]
fn missing_optional_file_is_fine() {
    let tmp = TempDir::new().unwrap();
    let config = SiteInfoConfigLoader::new()
        .with_optional_file(tmp.path().join("absent.yaml"))
        .load()
        .expect("absent optional file is skipped");

    assert_eq!(config.fetch.timeout_secs, 10);
}

#[test]
#[serial]
fn missing_required_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let result = SiteInfoConfigLoader::new()
        .with_file(tmp.path().join("absent.yaml"))
        .load();

    assert!(result.is_err());
}
