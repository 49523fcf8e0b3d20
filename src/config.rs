use crate::history::{History, JsonHistory, TextHistory};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

/// Ceiling on the persisted history, 50 MiB.
pub const MAX_HISTORY_SIZE: u64 = 50 * 1024 * 1024;

pub const CONFIG_FILE_NAME: &str = "calc.toml";

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HistoryFormat {
    #[default]
    json,
    text,
}

impl HistoryFormat {
    fn default_file_name(self) -> &'static str {
        match self {
            HistoryFormat::json => "calculator_history.json",
            HistoryFormat::text => "calculator_history.txt",
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// Relative paths are taken from the directory holding the executable.
    pub history_file: Option<PathBuf>,
    pub history_format: HistoryFormat,
    pub max_history_size: u64,
    pub color: bool,
    /// Diagnostics filter used when neither `CALC_LOG` nor `RUST_LOG` is set.
    pub logging: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            history_file: None,
            history_format: HistoryFormat::json,
            max_history_size: MAX_HISTORY_SIZE,
            color: true,
            logging: "warn".to_string(),
        }
    }
}

fn program_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Config {
    /// Reads `calc.toml` from beside the executable. No file means defaults.
    pub fn load() -> io::Result<Config> {
        match Self::load_from_path(&program_dir().join(CONFIG_FILE_NAME)) {
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(Config::default()),
            result => result,
        }
    }

    pub fn load_from_path(path: &Path) -> io::Result<Config> {
        let buf = fs::read_to_string(path)?;
        Self::from_toml(&buf)
    }

    pub fn from_toml(buf: &str) -> io::Result<Config> {
        match toml::from_str(buf) {
            Ok(config) => Ok(config),
            Err(error) => Err(io::Error::new(io::ErrorKind::InvalidInput, error)),
        }
    }

    pub fn history_path(&self) -> PathBuf {
        let file = self
            .history_file
            .as_deref()
            .unwrap_or_else(|| Path::new(self.history_format.default_file_name()));
        program_dir().join(file)
    }

    pub fn open_history(&self) -> Box<dyn History> {
        let path = self.history_path();
        match self.history_format {
            HistoryFormat::json => Box::new(JsonHistory::new(path, self.max_history_size)),
            HistoryFormat::text => Box::new(TextHistory::new(path, self.max_history_size)),
        }
    }
}
