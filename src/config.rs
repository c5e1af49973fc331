use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::catalog::ObjectStatus;
use crate::scene::{SceneScale, ORBIT_SEGMENTS};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid duration for {field}: {message}")]
    Duration { field: &'static str, message: String },
    #[error("unknown category in active set: {0}")]
    UnknownCategory(String),
    #[error("category {category} cannot be pinned to {status}")]
    InvalidPin {
        category: String,
        status: ObjectStatus,
    },
    #[error("{0} must be positive")]
    NotPositive(&'static str),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    pub categories: BTreeMap<String, CategoryConfig>,
    #[serde(default)]
    pub active: Vec<String>,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryConfig {
    /// File name inside the source directory, `<key>.txt` (lowercase) if unset.
    pub file: Option<PathBuf>,
    pub pinned_status: Option<ObjectStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_period")]
    pub period: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            period: default_period(),
        }
    }
}

fn default_period() -> String {
    "1s".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneConfig {
    #[serde(default = "default_earth_radius")]
    pub earth_radius_km: f64,
    #[serde(default = "default_render_radius")]
    pub render_radius: f64,
    #[serde(default = "default_orbit_segments")]
    pub orbit_segments: usize,
    #[serde(default = "default_cache_bucket")]
    pub orbit_cache_bucket: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            earth_radius_km: default_earth_radius(),
            render_radius: default_render_radius(),
            orbit_segments: default_orbit_segments(),
            orbit_cache_bucket: default_cache_bucket(),
        }
    }
}

fn default_earth_radius() -> f64 {
    6371.0
}

fn default_render_radius() -> f64 {
    2.5
}

fn default_orbit_segments() -> usize {
    ORBIT_SEGMENTS
}

fn default_cache_bucket() -> String {
    "30s".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.tick_period()?;
        self.orbit_cache_bucket()?;
        if let Some(key) = self.active.iter().find(|k| !self.categories.contains_key(*k)) {
            return Err(ConfigError::UnknownCategory(key.clone()));
        }
        for (key, category) in &self.categories {
            if let Some(status) = category.pinned_status.filter(|s| !s.is_pinnable()) {
                return Err(ConfigError::InvalidPin {
                    category: key.clone(),
                    status,
                });
            }
        }
        if self.scene.earth_radius_km <= 0.0 {
            return Err(ConfigError::NotPositive("scene.earth_radius_km"));
        }
        if self.scene.render_radius <= 0.0 {
            return Err(ConfigError::NotPositive("scene.render_radius"));
        }
        if self.scene.orbit_segments == 0 {
            return Err(ConfigError::NotPositive("scene.orbit_segments"));
        }
        Ok(())
    }

    pub fn tick_period(&self) -> Result<Duration, ConfigError> {
        parse_positive_duration("scheduler.period", &self.scheduler.period)
    }

    pub fn orbit_cache_bucket(&self) -> Result<Duration, ConfigError> {
        parse_positive_duration("scene.orbit_cache_bucket", &self.scene.orbit_cache_bucket)
    }

    pub fn scene_scale(&self) -> SceneScale {
        SceneScale {
            earth_radius_km: self.scene.earth_radius_km,
            render_radius: self.scene.render_radius,
        }
    }
}

fn parse_positive_duration(field: &'static str, value: &str) -> Result<Duration, ConfigError> {
    let duration = humantime::parse_duration(value.trim()).map_err(|e| ConfigError::Duration {
        field,
        message: e.to_string(),
    })?;
    if duration.is_zero() {
        return Err(ConfigError::NotPositive(field));
    }
    Ok(duration)
}
