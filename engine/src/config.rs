//! Engine Configuration
//!
//! The config is built by the host (boot code, asset pipeline, tests) and
//! threaded through every system's `initialize` call. File discovery and
//! loading belong to the host; this layer only parses an already-read JSON
//! string.

use serde::{Deserialize, Serialize};

/// Configuration handed to every system at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// World units per meter. Scales the "very close" collision epsilon so
    /// sliding behaves the same regardless of the world's unit convention.
    pub units_per_meter: f32,
    /// Whether the console starts open.
    pub console_open: bool,
    /// World-space distance one movement key press moves the bound entity.
    pub move_step: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            units_per_meter: 1.0,
            console_open: false,
            move_step: 1.0,
        }
    }
}

impl Config {
    /// Parses a config from a JSON string. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = Config::from_json(r#"{ "units_per_meter": 100.0 }"#).unwrap();
        assert_eq!(config.units_per_meter, 100.0);
        assert!(!config.console_open);
        assert_eq!(config.move_step, 1.0);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(Config::from_json("not json").is_err());
    }
}
