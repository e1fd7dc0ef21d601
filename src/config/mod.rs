//! Persistent settings and their resolution into adapter configs.
//!
//! Settings live in a key/value table that shares a database with the
//! [`SqliteExhibition`](crate::exhibition::sqlite::SqliteExhibition). Pass
//! the same path to both.

use anyhow::{Context, Result, anyhow, bail};
use rusqlite::{Connection, OptionalExtension};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::consts::{
    DEFAULT_CHICAGO_BASE_URL, DEFAULT_CLEVELAND_BASE_URL, DEFAULT_HARVARD_BASE_URL,
    DEFAULT_SOURCE_TIMEOUT,
};
use crate::engine::EngineConfig;
use crate::museum::chicago::ChicagoConfig;
use crate::museum::cleveland::ClevelandConfig;
use crate::museum::harvard::HarvardConfig;

pub const CHICAGO_BASE_URL: &str = "chicago.base_url";
pub const CLEVELAND_BASE_URL: &str = "cleveland.base_url";
pub const HARVARD_BASE_URL: &str = "harvard.base_url";
pub const HARVARD_API_KEY: &str = "harvard.api_key";
pub const TIMEOUT_SECS: &str = "timeout_secs";

/// Keys `config set` accepts.
pub const KNOWN_KEYS: &[&str] = &[
    CHICAGO_BASE_URL,
    CLEVELAND_BASE_URL,
    HARVARD_BASE_URL,
    HARVARD_API_KEY,
    TIMEOUT_SECS,
];

/// Persistent key-value configuration store.
pub struct Config {
    conn: Mutex<Connection>,
}

impl Config {
    /// Open or create the config table in the given database.
    /// Use `":memory:"` for tests.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path).context("failed to open config database")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS config (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )
        .context("failed to create config table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| anyhow!("config connection poisoned"))
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        let value = conn
            .query_row("SELECT value FROM config WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    /// Set a config value (upsert). Only [`KNOWN_KEYS`] are accepted.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        if !KNOWN_KEYS.contains(&key) {
            bail!("unknown setting: {key} (known: {})", KNOWN_KEYS.join(", "));
        }
        if key == TIMEOUT_SECS {
            parse_timeout(value)?;
        }
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO config (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM config WHERE key = ?1", [key])?;
        Ok(())
    }

    /// All stored settings, sorted by key.
    pub fn entries(&self) -> Result<Vec<(String, String)>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT key, value FROM config ORDER BY key ASC")?;
        let entries = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

fn parse_timeout(value: &str) -> Result<Duration> {
    let secs: u64 = value
        .trim()
        .parse()
        .with_context(|| format!("{TIMEOUT_SECS} must be a whole number of seconds, got {value:?}"))?;
    if secs == 0 {
        bail!("{TIMEOUT_SECS} must be at least 1");
    }
    Ok(Duration::from_secs(secs))
}

/// Values given on the command line or through the environment.
/// They take precedence over stored settings.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub harvard_api_key: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Everything needed to build the adapters and the aggregator.
#[derive(Debug, Clone)]
pub struct Settings {
    pub chicago: ChicagoConfig,
    pub cleveland: ClevelandConfig,
    pub harvard: HarvardConfig,
    pub source_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            chicago: ChicagoConfig::default(),
            cleveland: ClevelandConfig::default(),
            harvard: HarvardConfig::default(),
            source_timeout: DEFAULT_SOURCE_TIMEOUT,
        }
    }
}

impl Settings {
    /// Merge overrides, then stored settings, then built-in defaults.
    pub fn resolve(store: &Config, overrides: Overrides) -> Result<Self> {
        let stored = |key: &str| store.get(key);

        let source_timeout = match overrides.timeout_secs {
            Some(0) => bail!("--timeout must be at least 1 second"),
            Some(secs) => Duration::from_secs(secs),
            None => match stored(TIMEOUT_SECS)? {
                Some(value) => parse_timeout(&value)?,
                None => DEFAULT_SOURCE_TIMEOUT,
            },
        };

        let harvard_api_key = match overrides.harvard_api_key.filter(|k| !k.is_empty()) {
            Some(key) => Some(key),
            None => stored(HARVARD_API_KEY)?,
        };

        Ok(Self {
            chicago: ChicagoConfig {
                base_url: stored(CHICAGO_BASE_URL)?
                    .unwrap_or_else(|| DEFAULT_CHICAGO_BASE_URL.to_string()),
            },
            cleveland: ClevelandConfig {
                base_url: stored(CLEVELAND_BASE_URL)?
                    .unwrap_or_else(|| DEFAULT_CLEVELAND_BASE_URL.to_string()),
            },
            harvard: HarvardConfig {
                base_url: stored(HARVARD_BASE_URL)?
                    .unwrap_or_else(|| DEFAULT_HARVARD_BASE_URL.to_string()),
                api_key: harvard_api_key,
            },
            source_timeout,
        })
    }

    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            source_timeout: self.source_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mem_config() -> Config {
        Config::open(":memory:").unwrap()
    }

    #[test]
    fn get_returns_none_for_missing_key() {
        let config = mem_config();
        assert!(config.get(HARVARD_API_KEY).unwrap().is_none());
    }

    #[test]
    fn set_overwrites_existing() {
        let config = mem_config();
        config.set(HARVARD_API_KEY, "old").unwrap();
        config.set(HARVARD_API_KEY, "new").unwrap();
        assert_eq!(config.get(HARVARD_API_KEY).unwrap().unwrap(), "new");
    }

    #[test]
    fn set_rejects_unknown_key() {
        let config = mem_config();
        let err = config.set("theme", "dark").unwrap_err();
        assert!(err.to_string().contains("unknown setting"));
    }

    #[test]
    fn set_validates_timeout() {
        let config = mem_config();
        assert!(config.set(TIMEOUT_SECS, "soon").is_err());
        assert!(config.set(TIMEOUT_SECS, "0").is_err());
        config.set(TIMEOUT_SECS, "5").unwrap();
    }

    #[test]
    fn remove_nonexistent_is_ok() {
        let config = mem_config();
        config.remove(CHICAGO_BASE_URL).unwrap();
    }

    #[test]
    fn entries_sorted_by_key() {
        let config = mem_config();
        config.set(TIMEOUT_SECS, "3").unwrap();
        config.set(CHICAGO_BASE_URL, "http://localhost").unwrap();
        let keys: Vec<String> = config.entries().unwrap().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![CHICAGO_BASE_URL, TIMEOUT_SECS]);
    }

    #[test]
    fn resolve_defaults() {
        let settings = Settings::resolve(&mem_config(), Overrides::default()).unwrap();
        assert_eq!(settings.chicago.base_url, DEFAULT_CHICAGO_BASE_URL);
        assert_eq!(settings.cleveland.base_url, DEFAULT_CLEVELAND_BASE_URL);
        assert_eq!(settings.harvard.base_url, DEFAULT_HARVARD_BASE_URL);
        assert!(settings.harvard.api_key.is_none());
        assert_eq!(settings.source_timeout, DEFAULT_SOURCE_TIMEOUT);
    }

    #[test]
    fn resolve_uses_stored_values() {
        let config = mem_config();
        config.set(CLEVELAND_BASE_URL, "http://localhost:9000").unwrap();
        config.set(HARVARD_API_KEY, "stored-key").unwrap();
        config.set(TIMEOUT_SECS, "4").unwrap();

        let settings = Settings::resolve(&config, Overrides::default()).unwrap();
        assert_eq!(settings.cleveland.base_url, "http://localhost:9000");
        assert_eq!(settings.harvard.api_key.as_deref(), Some("stored-key"));
        assert_eq!(settings.source_timeout, Duration::from_secs(4));
    }

    #[test]
    fn overrides_beat_stored_values() {
        let config = mem_config();
        config.set(HARVARD_API_KEY, "stored-key").unwrap();
        config.set(TIMEOUT_SECS, "4").unwrap();

        let settings = Settings::resolve(
            &config,
            Overrides {
                harvard_api_key: Some("flag-key".to_string()),
                timeout_secs: Some(9),
            },
        )
        .unwrap();
        assert_eq!(settings.harvard.api_key.as_deref(), Some("flag-key"));
        assert_eq!(settings.engine().source_timeout, Duration::from_secs(9));
    }

    #[test]
    fn empty_override_key_falls_through() {
        let config = mem_config();
        config.set(HARVARD_API_KEY, "stored-key").unwrap();
        let settings = Settings::resolve(
            &config,
            Overrides {
                harvard_api_key: Some(String::new()),
                timeout_secs: None,
            },
        )
        .unwrap();
        assert_eq!(settings.harvard.api_key.as_deref(), Some("stored-key"));
    }

    #[test]
    fn persists_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config-test.db");
        let path_str = path.to_str().unwrap();

        {
            let config = Config::open(path_str).unwrap();
            config.set(HARVARD_BASE_URL, "http://persisted").unwrap();
        }

        {
            let config = Config::open(path_str).unwrap();
            assert_eq!(config.get(HARVARD_BASE_URL).unwrap().unwrap(), "http://persisted");
        }
    }
}
