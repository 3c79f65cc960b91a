use crate::application::sequence_scheduler::RunMode;
use crate::application::simulated_clock::default_start_time;
use crate::domain::error::GeneratorError;
use crate::domain::location::DEFAULT_JITTER_DEGREES;
use chrono::{Local, NaiveDateTime};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "config/generator";
pub const ENV_PREFIX: &str = "TRAFFIC_GEN";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub generator: GeneratorSettings,
    #[serde(default)]
    pub location: LocationSettings,
    #[serde(default)]
    pub sink: SinkSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModeSetting {
    #[default]
    Batch,
    RealTime,
    Continuous,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeSourceKind {
    #[default]
    Simulated,
    WallClock,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneratorSettings {
    #[serde(default)]
    pub mode: ModeSetting,
    #[serde(default = "default_count")]
    pub count: i64,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: i64,
    #[serde(default = "default_start")]
    pub start_time: String,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub time_source: TimeSourceKind,
    #[serde(default)]
    pub clamp_negative_counts: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LocationSettings {
    #[serde(default = "default_jitter")]
    pub jitter_degrees: f64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    #[default]
    File,
    Http,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SinkSettings {
    #[serde(default)]
    pub kind: SinkKind,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_collector_url")]
    pub collector_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: i64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogSettings {
    pub path: Option<PathBuf>,
}

fn default_count() -> i64 {
    1000
}

fn default_interval_secs() -> i64 {
    60
}

fn default_start() -> String {
    default_start_time().format("%Y-%m-%dT%H:%M:%S").to_string()
}

fn default_jitter() -> f64 {
    DEFAULT_JITTER_DEGREES
}

fn default_output() -> PathBuf {
    PathBuf::from("traffic_data.jsonl")
}

fn default_collector_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_secs() -> i64 {
    5
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            mode: ModeSetting::default(),
            count: default_count(),
            interval_secs: default_interval_secs(),
            start_time: default_start(),
            seed: None,
            time_source: TimeSourceKind::default(),
            clamp_negative_counts: false,
        }
    }
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            jitter_degrees: default_jitter(),
        }
    }
}

impl Default for SinkSettings {
    fn default() -> Self {
        Self {
            kind: SinkKind::default(),
            output: default_output(),
            collector_url: default_collector_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Where records go, after validation.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkTarget {
    File(PathBuf),
    Http { url: String, timeout: Duration },
}

/// Validated settings for building records, shared by every mode.
#[derive(Debug, Clone)]
pub struct EnginePlan {
    pub start_time: NaiveDateTime,
    pub seed: Option<u64>,
    pub time_source: TimeSourceKind,
    pub clamp_negative_counts: bool,
    pub jitter_degrees: f64,
    pub catalog_path: Option<PathBuf>,
}

impl EnginePlan {
    /// Base time of the one-off sample record.
    ///
    /// Noon on the start date on the simulated timeline, the current local
    /// time on the wall clock.
    pub fn sample_time(&self) -> NaiveDateTime {
        match self.time_source {
            TimeSourceKind::Simulated => self
                .start_time
                .date()
                .and_hms_opt(12, 0, 0)
                .unwrap_or(self.start_time),
            TimeSourceKind::WallClock => Local::now().naive_local(),
        }
    }
}

/// Validated settings for a run that persists records.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub mode: RunMode,
    pub count: u64,
    pub interval: Duration,
    pub sink: SinkTarget,
}

impl GeneratorConfig {
    /// Check the settings every record depends on.
    pub fn engine_plan(&self) -> Result<EnginePlan, GeneratorError> {
        let generator = &self.generator;

        let start_time = generator
            .start_time
            .parse::<NaiveDateTime>()
            .map_err(|e| {
                GeneratorError::invalid_config(format!(
                    "start_time {:?} is not an ISO-8601 date-time: {}",
                    generator.start_time, e
                ))
            })?;

        let jitter = self.location.jitter_degrees;
        if !jitter.is_finite() || jitter < 0.0 {
            return Err(GeneratorError::invalid_config(format!(
                "jitter_degrees must be a non-negative number (got {})",
                jitter
            )));
        }

        Ok(EnginePlan {
            start_time,
            seed: generator.seed,
            time_source: generator.time_source,
            clamp_negative_counts: generator.clamp_negative_counts,
            jitter_degrees: jitter,
            catalog_path: self.catalog.path.clone(),
        })
    }

    /// Check mode, count, pacing and sink. Sample mode never calls this.
    pub fn run_plan(&self) -> Result<RunPlan, GeneratorError> {
        let generator = &self.generator;

        let count = u64::try_from(generator.count).map_err(|_| {
            GeneratorError::invalid_config(format!(
                "record count must not be negative (got {})",
                generator.count
            ))
        })?;

        let interval_secs = u64::try_from(generator.interval_secs).map_err(|_| {
            GeneratorError::invalid_config(format!(
                "interval must not be negative (got {})",
                generator.interval_secs
            ))
        })?;

        let sink = match self.sink.kind {
            SinkKind::File => {
                if self.sink.output.as_os_str().is_empty() {
                    return Err(GeneratorError::invalid_config("output path must not be empty"));
                }
                SinkTarget::File(self.sink.output.clone())
            }
            SinkKind::Http => {
                if self.sink.timeout_secs <= 0 {
                    return Err(GeneratorError::invalid_config(format!(
                        "collector timeout must be positive (got {})",
                        self.sink.timeout_secs
                    )));
                }
                let url = self.sink.collector_url.trim();
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(GeneratorError::invalid_config(format!(
                        "collector url must be http(s): {}",
                        url
                    )));
                }
                SinkTarget::Http {
                    url: url.to_string(),
                    timeout: Duration::from_secs(self.sink.timeout_secs as u64),
                }
            }
        };

        let mode = match generator.mode {
            ModeSetting::Batch => RunMode::Batch,
            ModeSetting::RealTime => RunMode::RealTime,
            ModeSetting::Continuous => RunMode::Continuous,
        };

        Ok(RunPlan {
            mode,
            count,
            interval: Duration::from_secs(interval_secs),
            sink,
        })
    }
}

/// Layer the config file (optional unless given explicitly) and
/// `TRAFFIC_GEN__SECTION__KEY` environment variables.
pub fn load_generator_config(path: Option<&Path>) -> anyhow::Result<GeneratorConfig> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let settings = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
