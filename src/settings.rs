//! Driver settings: `hordes.toml`, then `HORDES_*` environment variables.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use log::LevelFilter;
use serde::Deserialize;

const DEFAULT_FILE: &str = "hordes.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory receiving the generated `.map` files.
    pub output_dir: PathBuf,
    pub log_level: String,
    /// Continue with the remaining sources after one fails to evaluate.
    pub keep_going: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            log_level: "warn".into(),
            keep_going: false,
        }
    }
}

impl Settings {
    /// Load from `file`, which must exist, or from `hordes.toml` in the
    /// working directory when present.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let source = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_FILE).required(false),
        };
        Config::builder()
            .add_source(source)
            .add_source(Environment::with_prefix("HORDES"))
            .build()?
            .try_deserialize()
    }

    /// The configured level raised by `verbosity` steps.
    pub fn level(&self, verbosity: u8) -> LevelFilter {
        let base = self.log_level.parse().unwrap_or_else(|_| {
            eprintln!("unknown log level '{}', using warn", self.log_level);
            LevelFilter::Warn
        });
        LevelFilter::iter()
            .skip_while(|l| *l != base)
            .nth(verbosity as usize)
            .unwrap_or(LevelFilter::Trace)
    }
}
