//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Target framerate; the frame pump ticks every `1000 / framerate` ms
    pub framerate: u32,
    /// Bounded wait for the worker thread on stop/close, in milliseconds
    pub shutdown_timeout_ms: u64,
    /// Depth of the render channel between the worker and the UI thread
    pub render_queue_depth: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            framerate: 30,
            shutdown_timeout_ms: 1000,
            render_queue_depth: 8,
        }
    }
}

impl SessionConfig {
    /// Frame period derived from the target framerate
    pub fn frame_period(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.framerate.max(1)))
    }

    /// Bounded shutdown wait as a `Duration`
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

/// Detector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Path to the model weights
    pub model_path: PathBuf,
    /// Path to the model configuration
    pub config_path: PathBuf,
    /// Path to the class-name list, one label per line
    pub class_names_path: PathBuf,
    /// Initial confidence threshold
    pub confidence_threshold: f32,
    /// Initial non-max-suppression threshold
    pub nms_threshold: f32,
    /// Network input size [width, height]
    pub input_size: [u32; 2],
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/weights/yolov7-tiny.weights"),
            config_path: PathBuf::from("models/cfg/yolov7-tiny.cfg"),
            class_names_path: PathBuf::from("models/names/coco.names"),
            confidence_threshold: 0.5,
            nms_threshold: 0.4,
            input_size: [416, 416],
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub session: SessionConfig,
    pub detector: DetectorConfig,
}

impl AppConfig {
    /// Load configuration from TOML file
    pub fn from_toml_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileReadError(path.clone(), e))?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_toml_file(&self, path: &PathBuf) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(format!("TOML serialize error: {}", e)))?;

        std::fs::write(path, content).map_err(|e| ConfigError::FileWriteError(path.clone(), e))?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("confidence_threshold", self.detector.confidence_threshold),
            ("nms_threshold", self.detector.nms_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidValue(format!(
                    "{} must be between 0.0 and 1.0, got {}",
                    field, value
                )));
            }
        }

        if self.session.framerate == 0 || self.session.framerate > 120 {
            return Err(ConfigError::InvalidValue(format!(
                "framerate must be between 1 and 120, got {}",
                self.session.framerate
            )));
        }

        if self.session.shutdown_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "shutdown_timeout_ms must be greater than 0".to_string(),
            ));
        }

        if self.session.render_queue_depth == 0 {
            return Err(ConfigError::InvalidValue(
                "render_queue_depth must be greater than 0".to_string(),
            ));
        }

        if self.detector.input_size[0] == 0 || self.detector.input_size[1] == 0 {
            return Err(ConfigError::InvalidValue(
                "input_size dimensions must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    FileReadError(PathBuf, std::io::Error),

    #[error("Failed to write config file {0}: {1}")]
    FileWriteError(PathBuf, std::io::Error),

    #[error("Config parse error: {0}")]
    ParseError(String),

    #[error("Config serialize error: {0}")]
    SerializeError(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}
