//! Loader for `siteinfo` CLI configuration with YAML + environment overlays.
//!
//! Sources are merged in the order they are added, with `SITEINFO__`-prefixed
//! environment variables applied last (e.g. `SITEINFO__FETCH__TIMEOUT_SECS=3`).
//! String values may reference other environment variables as `${VAR}`.
//! A `user_agent` whose placeholder cannot be resolved (or that ends up
//! empty) is treated as unset, so no `User-Agent` header is sent.
//!
//! ```yaml
//! fetch:
//!   timeout_secs: 10
//!   max_redirects: 10
//!   max_body_bytes: 2097152
//!   user_agent: "${SITEINFO_UA}"
//! log:
//!   level: info
//!   format: text
//!   stderr: false
//! ```
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use siteinfo_common::FetchConfig;
use siteinfo_common::observability::LogFormat;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SiteInfoConfig {
    pub fetch: FetchConfig,
    pub log: LogSettings,
}

/// Logging knobs; mapped onto `observability::LogConfig` by the binary.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    pub format: LogFormat,
    pub stderr: bool,
    pub dir: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Text,
            stderr: false,
            dir: None,
        }
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => break,
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

fn has_unresolved_placeholder(s: &str) -> bool {
    s.contains("${")
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct SiteInfoConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for SiteInfoConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteInfoConfigLoader {
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a config file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a config file that may be absent.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use siteinfo_config::SiteInfoConfigLoader;
    ///
    /// let cfg = SiteInfoConfigLoader::new()
    ///     .with_yaml_str("fetch:\n  timeout_secs: 3\n")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(cfg.fetch.timeout_secs, 3);
    /// assert_eq!(cfg.fetch.max_redirects, 10);
    /// assert_eq!(cfg.log.level, "info");
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// `SITEINFO__`-prefixed environment variables override every file
    /// source, and `${VAR}` placeholders are expanded before the typed
    /// structs are built.
    pub fn load(self) -> Result<SiteInfoConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("SITEINFO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let mut typed: SiteInfoConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        if typed
            .fetch
            .user_agent
            .as_deref()
            .is_some_and(|ua| ua.trim().is_empty() || has_unresolved_placeholder(ua))
        {
            typed.fetch.user_agent = None;
        }
        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("SITEINFO_TEST_UA", Some("bot/1.0"), || {
            let mut v = json!("agent ${SITEINFO_TEST_UA}");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("agent bot/1.0"));
        });
    }

    #[test]
    fn expands_nested_objects() {
        temp_env::with_vars([("LOG_HOME", Some("/tmp/logs"))], || {
            let mut v = json!({ "log": { "dir": "${LOG_HOME}/siteinfo", "stderr": true } });
            expand_env_in_value(&mut v);
            assert_eq!(
                v,
                json!({ "log": { "dir": "/tmp/logs/siteinfo", "stderr": true } })
            );
        });
    }

    #[test]
    fn stops_on_cycles() {
        temp_env::with_vars([("A", Some("${B}")), ("B", Some("${A}"))], || {
            let mut v = json!("x=${A}-y");
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x=") && s.ends_with("-y"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${SITEINFO_DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${SITEINFO_DOES_NOT_EXIST}"));
    }

    #[test]
    fn unresolved_user_agent_is_unset() {
        temp_env::with_var_unset("SITEINFO_TEST_MISSING_UA", || {
            let cfg = SiteInfoConfigLoader::new()
                .with_yaml_str("fetch:\n  user_agent: \"${SITEINFO_TEST_MISSING_UA}\"\n")
                .load()
                .unwrap();
            assert_eq!(cfg.fetch.user_agent, None);
        });
    }

    #[test]
    fn resolved_user_agent_is_kept() {
        temp_env::with_var("SITEINFO_TEST_SET_UA", Some("unfurl/3"), || {
            let cfg = SiteInfoConfigLoader::new()
                .with_yaml_str("fetch:\n  user_agent: \"bot ${SITEINFO_TEST_SET_UA}\"\n")
                .load()
                .unwrap();
            assert_eq!(cfg.fetch.user_agent.as_deref(), Some("bot unfurl/3"));
        });
    }

    #[test]
    fn blank_user_agent_is_unset() {
        let cfg = SiteInfoConfigLoader::new()
            .with_yaml_str("fetch:\n  user_agent: \"  \"\n")
            .load()
            .unwrap();
        assert_eq!(cfg.fetch.user_agent, None);
    }

    #[test]
    fn empty_sources_give_defaults() {
        let cfg = SiteInfoConfigLoader::new().load().unwrap();
        assert_eq!(cfg.fetch, FetchConfig::default());
        assert_eq!(cfg.log.format, LogFormat::Text);
        assert!(!cfg.log.stderr);
    }
}
