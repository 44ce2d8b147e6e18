use crate::error::{Error, Result};
use directories::BaseDirs;
use serde::Deserialize;
use std::{fs, path::PathBuf};

/// Task names left out of the rollup when the config does not override them.
pub const DEFAULT_EXCLUDED: &[&str] = &["lunch", "break"];

#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute directory where the daily log files live.
    pub log_dir: PathBuf,
    /// Day header format for reports. Default is "%A, %d %b %Y".
    pub date_format: String,
    /// Full task descriptions excluded from the rollup sums, matched
    /// case-insensitively against the whole description.
    pub excluded: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    log_dir: Option<PathBuf>,
    date_format: Option<String>,
    /// Optional list replacing the default exclusions:
    /// exclude = ["lunch", "break", "standup"]
    exclude: Option<Vec<String>>,
}

impl Config {
    /// Loads config from disk (first the XDG path, then the native one) and
    /// applies defaults. A missing or unreadable file means defaults.
    pub fn load() -> Result<Self> {
        let file_config = Self::read_file_config().unwrap_or_default();

        let log_dir = file_config.log_dir.unwrap_or_else(Self::default_log_dir);
        let date_format = file_config
            .date_format
            .unwrap_or_else(|| "%A, %d %b %Y".to_string());
        let excluded = file_config
            .exclude
            .unwrap_or_else(|| DEFAULT_EXCLUDED.iter().map(|s| s.to_string()).collect());

        Ok(Self {
            log_dir,
            date_format,
            excluded,
        })
    }

    /// Default log root: `{data_dir}/worklog`
    /// - macOS:   `~/Library/Application Support/worklog`
    /// - Linux:   `$XDG_DATA_HOME/worklog` or `~/.local/share/worklog`
    /// - Windows: `%APPDATA%\worklog`
    fn default_log_dir() -> PathBuf {
        if let Some(base) = BaseDirs::new() {
            let mut p = base.data_dir().to_path_buf();
            p.push("worklog");
            p
        } else {
            PathBuf::from("./worklog")
        }
    }

    fn config_file_paths() -> Vec<PathBuf> {
        let mut v = Vec::new();
        if let Some(b) = BaseDirs::new() {
            let xdg = b
                .home_dir()
                .join(".config")
                .join("worklog")
                .join("config.toml");
            v.push(xdg);
            let native = b.config_dir().join("worklog").join("config.toml");
            v.push(native);
        }
        v
    }

    /// Read the first existing config file and parse it.
    fn read_file_config() -> Result<FileConfig> {
        for path in Self::config_file_paths() {
            if !path.exists() {
                continue;
            }
            let s = fs::read_to_string(&path).map_err(|err| Error::Storage {
                path: path.clone(),
                source: err,
            })?;
            return Self::parse_file(&s);
        }
        Ok(FileConfig::default())
    }

    fn parse_file(s: &str) -> Result<FileConfig> {
        toml::from_str::<FileConfig>(s).map_err(|err| Error::Config(err.to_string()))
    }
}
