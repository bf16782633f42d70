use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "CareCircle";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 720;

const DATA_DIR_ENV: &str = "CARECIRCLE_DATA_DIR";
const DB_PATH_ENV: &str = "CARECIRCLE_DB_PATH";
const BIND_ENV: &str = "CARECIRCLE_BIND";
const SESSION_TTL_ENV: &str = "CARECIRCLE_SESSION_TTL_HOURS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot determine home directory; set CARECIRCLE_DATA_DIR")]
    NoHomeDir,
    #[error("Invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

/// Get the application data directory.
/// `CARECIRCLE_DATA_DIR` wins; otherwise ~/CareCircle/.
pub fn app_data_dir() -> Result<PathBuf, ConfigError> {
    data_dir_from(std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
}

fn data_dir_from(override_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match override_dir {
        Some(dir) => Ok(dir),
        None => dirs::home_dir()
            .map(|home| home.join(APP_NAME))
            .ok_or(ConfigError::NoHomeDir),
    }
}

/// Get the database file path (`CARECIRCLE_DB_PATH` or `<data dir>/carecircle.db`)
pub fn database_path() -> Result<PathBuf, ConfigError> {
    match std::env::var_os(DB_PATH_ENV) {
        Some(path) => Ok(PathBuf::from(path)),
        None => Ok(app_data_dir()?.join("carecircle.db")),
    }
}

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "carecircle=info,carecircle_lib=info,tower_http=warn"
}

/// Runtime settings for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub db_path: PathBuf,
    /// `None` means sessions never expire.
    pub session_ttl: Option<chrono::Duration>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            std::env::var(BIND_ENV).ok(),
            database_path()?,
            std::env::var(SESSION_TTL_ENV).ok(),
        )
    }

    fn from_values(
        bind: Option<String>,
        db_path: PathBuf,
        ttl_hours: Option<String>,
    ) -> Result<Self, ConfigError> {
        let bind_raw = bind.unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw.parse().map_err(|_| ConfigError::Invalid {
            var: BIND_ENV,
            value: bind_raw.clone(),
        })?;

        Ok(Self {
            bind,
            db_path,
            session_ttl: parse_session_ttl(ttl_hours)?,
        })
    }
}

/// Session lifetime from `CARECIRCLE_SESSION_TTL_HOURS` (default 720 hours).
pub fn session_ttl() -> Result<Option<chrono::Duration>, ConfigError> {
    parse_session_ttl(std::env::var(SESSION_TTL_ENV).ok())
}

fn parse_session_ttl(raw: Option<String>) -> Result<Option<chrono::Duration>, ConfigError> {
    let hours = match raw {
        Some(raw) => raw.trim().parse::<i64>().map_err(|_| ConfigError::Invalid {
            var: SESSION_TTL_ENV,
            value: raw.clone(),
        })?,
        None => DEFAULT_SESSION_TTL_HOURS,
    };
    // Zero or negative disables expiry
    Ok((hours > 0).then(|| chrono::Duration::hours(hours)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_defaults_under_home() {
        let dir = data_dir_from(None).unwrap();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("CareCircle"));
    }

    #[test]
    fn data_dir_override_wins() {
        let dir = data_dir_from(Some(PathBuf::from("/srv/carecircle"))).unwrap();
        assert_eq!(dir, PathBuf::from("/srv/carecircle"));
    }

    #[test]
    fn server_config_defaults() {
        let config = ServerConfig::from_values(None, PathBuf::from("db.sqlite"), None).unwrap();
        assert_eq!(config.bind.to_string(), DEFAULT_BIND);
        assert_eq!(config.session_ttl, Some(chrono::Duration::hours(720)));
    }

    #[test]
    fn server_config_parses_overrides() {
        let config = ServerConfig::from_values(
            Some("0.0.0.0:9000".into()),
            PathBuf::from("db.sqlite"),
            Some("0".into()),
        )
        .unwrap();
        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.session_ttl, None);
    }

    #[test]
    fn server_config_rejects_garbage() {
        let bad_bind =
            ServerConfig::from_values(Some("nowhere".into()), PathBuf::from("db"), None);
        assert!(matches!(bad_bind, Err(ConfigError::Invalid { var: BIND_ENV, .. })));

        let bad_ttl =
            ServerConfig::from_values(None, PathBuf::from("db"), Some("soon".into()));
        assert!(matches!(bad_ttl, Err(ConfigError::Invalid { var: SESSION_TTL_ENV, .. })));
    }

    #[test]
    fn app_name_is_carecircle() {
        assert_eq!(APP_NAME, "CareCircle");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.6.0");
    }
}
