//! Configuration resolution for the command line.
//!
//! Order: built-in defaults, TOML file, environment, then `--database`.
//! When nothing names a database, the file lives under the platform data
//! directory.

use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::{Path, PathBuf};

use stream_hub::HubConfig;

const APP_DIR: &str = "stream-hub";
const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "stream_hub.db";

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

pub fn default_database_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR).join(DATABASE_FILE))
}

/// Turn a `--database` value into a sqlx URL. Plain paths are opened
/// read-write and created when missing.
pub fn database_url_from_arg(value: &str) -> String {
    if value.starts_with("sqlite:") {
        value.to_string()
    } else {
        sqlite_url_for_path(Path::new(value))
    }
}

fn sqlite_url_for_path(path: &Path) -> String {
    format!("sqlite:{}?mode=rwc", path.display())
}

/// Parse a TOML document into a [`HubConfig`]. Missing keys keep their
/// defaults.
pub fn parse_config(contents: &str) -> Result<HubConfig> {
    toml::from_str(contents).context("invalid configuration file")
}

/// Read the configuration file. An explicitly named file must exist; the
/// default location is optional.
pub fn load_file(explicit: Option<&Path>) -> Result<HubConfig> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => match default_config_path() {
            Some(path) => (path, false),
            None => return Ok(HubConfig::default()),
        },
    };

    if !path.exists() {
        if required {
            return Err(anyhow!("configuration file {} does not exist", path.display()));
        }
        return Ok(HubConfig::default());
    }

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("in {}", path.display()))
}

/// Layer environment and flag overrides on top of `base`.
pub fn apply_overrides<F>(
    base: HubConfig,
    database_arg: Option<&str>,
    lookup: F,
) -> Result<HubConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = base.with_overrides(lookup)?;
    if let Some(database) = database_arg {
        config.database_url = database_url_from_arg(database);
    }
    Ok(config)
}

/// Fill in the default database location when nothing else named one.
fn ensure_database(mut config: HubConfig) -> Result<HubConfig> {
    if !config.database_url.trim().is_empty() {
        return Ok(config);
    }
    let path = default_database_path()
        .ok_or_else(|| anyhow!("no data directory available; pass --database"))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    config.database_url = sqlite_url_for_path(&path);
    Ok(config)
}

/// Resolve the effective configuration for this invocation.
pub fn resolve(config_path: Option<&Path>, database_arg: Option<&str>) -> Result<HubConfig> {
    dotenvy::dotenv().ok();
    let base = load_file(config_path)?;
    let config = apply_overrides(base, database_arg, |key| std::env::var(key).ok())?;
    let config = ensure_database(config)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_database_url_from_arg() {
        assert_eq!(
            database_url_from_arg("sqlite:/var/hub.db"),
            "sqlite:/var/hub.db"
        );
        assert_eq!(
            database_url_from_arg("/tmp/hub.db"),
            "sqlite:/tmp/hub.db?mode=rwc"
        );
    }

    #[test]
    fn test_parse_partial_config() {
        let config = parse_config(
            r#"
            database_url = "sqlite:/srv/hub.db"
            health_drives_status = false

            [thresholds]
            critical_latency_ms = 3000
            "#,
        )
        .unwrap();
        assert_eq!(config.database_url, "sqlite:/srv/hub.db");
        assert!(!config.health_drives_status);
        assert_eq!(config.thresholds.critical_latency_ms, 3000);
        assert_eq!(config.thresholds.degraded_dropped_frames, 50);
        assert_eq!(config.recent_health_limit, 20);
    }

    #[test]
    fn test_parse_rejects_wrong_types() {
        assert!(parse_config("max_connections = \"lots\"").is_err());
    }

    #[test]
    fn test_flag_beats_env_beats_file() {
        let file = parse_config("database_url = \"sqlite:file.db\"").unwrap();

        let config = apply_overrides(file.clone(), None, no_env).unwrap();
        assert_eq!(config.database_url, "sqlite:file.db");

        let env = |key: &str| {
            (key == "STREAM_HUB_DATABASE_URL").then(|| "sqlite:env.db".to_string())
        };
        let config = apply_overrides(file.clone(), None, env).unwrap();
        assert_eq!(config.database_url, "sqlite:env.db");

        let config = apply_overrides(file, Some("/data/flag.db"), env).unwrap();
        assert_eq!(config.database_url, "sqlite:/data/flag.db?mode=rwc");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_file(Some(&missing)).is_err());

        let present = dir.path().join("hub.toml");
        fs::write(&present, "max_connections = 2\n").unwrap();
        assert_eq!(load_file(Some(&present)).unwrap().max_connections, 2);
    }
}
