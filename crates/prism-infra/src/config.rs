//! Configuration loader for PRISM.
//!
//! Reads `config.toml` from the data directory (`~/.prism/` in production)
//! and deserializes it into [`PrismConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::{Path, PathBuf};

use prism_types::config::PrismConfig;
use prism_types::user::SYSTEM_USER_ID;

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "PRISM_DATA_DIR";

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`PrismConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_config(data_dir: &Path) -> PrismConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return PrismConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return PrismConfig::default();
        }
    };

    match toml::from_str::<PrismConfig>(&content) {
        Ok(config) => {
            if config.fallback_user_id.trim() == SYSTEM_USER_ID {
                tracing::warn!(
                    "fallback_user_id '{SYSTEM_USER_ID}' is reserved, anonymous callers will be refused"
                );
            }
            config
        }
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            PrismConfig::default()
        }
    }
}

/// Resolve the data directory.
///
/// Priority: explicit path, then `PRISM_DATA_DIR`, then `~/.prism`.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir;
    }
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".prism")
}

/// Path of the SQLite database file inside the data directory.
pub fn database_path(data_dir: &Path, config: &PrismConfig) -> PathBuf {
    data_dir.join(&config.database_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await;
        assert_eq!(config.fallback_user_id, "default_user");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.database_file, "prism.db");
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
fallback_user_id = ""
database_file = "agent.db"

[server]
port = 9100
"#,
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert!(config.fallback_user().is_none());
        assert_eq!(config.database_file, "agent.db");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[tokio::test]
    async fn load_config_system_fallback_is_not_usable() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), r#"fallback_user_id = "system""#)
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert!(config.fallback_user().is_none());
    }

    #[tokio::test]
    async fn load_config_malformed_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "server = [not valid")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.fallback_user_id, "default_user");
    }

    #[test]
    fn resolve_data_dir_explicit_wins() {
        let dir = resolve_data_dir(Some(PathBuf::from("/srv/prism")));
        assert_eq!(dir, PathBuf::from("/srv/prism"));
    }

    #[test]
    fn database_path_joins_file_name() {
        let config = PrismConfig::default();
        assert_eq!(
            database_path(Path::new("/srv/prism"), &config),
            PathBuf::from("/srv/prism/prism.db")
        );
    }
}
