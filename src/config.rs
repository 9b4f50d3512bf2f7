//! Search, self-play and network settings, loadable from a TOML file.
//!
//! ```toml
//! [search]
//! iterations_per_move = 200
//! c_puct = 1.5
//!
//! [self_play]
//! num_games = 10
//! move_selection = "sample"
//! seed = 42
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub self_play: SelfPlayConfig,
    pub network: NetworkConfig,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Config::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let temperature = self.self_play.temperature;
        if !(temperature >= 0. && temperature.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "self_play.temperature must be a non-negative number, got {}",
                temperature
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub iterations_per_move: usize,
    pub c_puct: f32,
    pub dirichlet_alpha: f32,
    /// Weight of the noise in the blended priors of the root's children.
    pub dirichlet_epsilon: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            iterations_per_move: 5,
            c_puct: 1.0,
            dirichlet_alpha: 0.3,
            dirichlet_epsilon: 0.25,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveSelection {
    #[serde(rename = "argmax")]
    ArgMax,
    Sample,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfPlayConfig {
    pub num_games: usize,
    /// Games still running after this many plies are scored as draws.
    pub max_plies: usize,
    pub move_selection: MoveSelection,
    /// Sampling temperature; 0 plays the most visited move.
    pub temperature: f32,
    /// Number of opening plies played with `move_selection`; arg-max afterwards.
    pub temperature_moves: usize,
    pub seed: Option<u64>,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_games: 3,
            max_plies: 512,
            move_selection: MoveSelection::ArgMax,
            temperature: 1.0,
            temperature_moves: 30,
            seed: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub num_residual_blocks: usize,
    pub num_filters: i64,
    pub weights: Option<PathBuf>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            num_residual_blocks: 16,
            num_filters: 256,
            weights: None,
        }
    }
}
