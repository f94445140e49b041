// Runtime configuration: data file locations and booking policy

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_PREFIX: &str = "HOTEL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HotelConfig {
    pub rooms_file: PathBuf,
    pub reservations_file: PathBuf,
    // Reject bookings with zero or negative nights instead of charging for them
    pub strict_nights: bool,
}

impl Default for HotelConfig {
    fn default() -> Self {
        Self {
            rooms_file: PathBuf::from("rooms.txt"),
            reservations_file: PathBuf::from("reservations.txt"),
            strict_nights: false,
        }
    }
}

impl HotelConfig {
    /// Layers defaults, a config file and `HOTEL_*` environment variables.
    ///
    /// An explicit `path` must exist. Without one, `hotel.{json,toml,..}` in the
    /// working directory is picked up if present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(path, None)
    }

    // `env` replaces the process environment when given
    fn load_from(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("hotel").required(false),
        };

        let settings = config::Config::builder()
            .add_source(file)
            // Eg.. `HOTEL_STRICT_NIGHTS=true` sets `strict_nights`
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .source(env),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
