// Command line arguments and sample output
use crate::domain::record::TrafficRecord;
use crate::infrastructure::config::{GeneratorConfig, ModeSetting, SinkKind, TimeSourceKind};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SinkArg {
    File,
    Http,
}

/// Generate city traffic data for an ELK stack.
///
/// Flags override values from the config file and the environment.
#[derive(Parser, Debug)]
#[command(name = "city-traffic-generator", version)]
pub struct Cli {
    /// Number of records to generate [default: 1000]
    #[arg(long, short = 'c', allow_negative_numbers = true)]
    pub count: Option<i64>,

    /// Output file path [default: traffic_data.jsonl]
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Write each record as it is generated, pausing between records
    #[arg(long, short = 'r', conflicts_with = "continuous")]
    pub real_time: bool,

    /// Generate an endless stream until interrupted
    #[arg(long, visible_alias = "cont")]
    pub continuous: bool,

    /// Seconds between records in real-time and continuous modes [default: 60]
    #[arg(long, short = 'i', allow_negative_numbers = true)]
    pub interval: Option<i64>,

    /// Print one sample record and exit without writing anything
    #[arg(long, short = 's')]
    pub sample: bool,

    /// Catalog city for the sample record [default: random]
    #[arg(long, requires = "sample")]
    pub city: Option<String>,

    /// Where records are delivered
    #[arg(long, value_enum)]
    pub sink: Option<SinkArg>,

    /// Collector URL for the http sink [default: http://localhost:5000]
    #[arg(long, short = 'u', env = "COLLECTOR_URL")]
    pub collector_url: Option<String>,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stamp records with the current time instead of the simulated timeline
    #[arg(long)]
    pub wall_clock: bool,

    /// First simulated timestamp, e.g. 2024-08-25T00:00:00
    #[arg(long)]
    pub start_time: Option<String>,

    /// TOML city catalog replacing the built-in one
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Disable the +/-0.01 degree coordinate jitter
    #[arg(long)]
    pub no_jitter: bool,

    /// Clamp negative vehicle counts and speeds to zero
    #[arg(long)]
    pub clamp_negative: bool,

    /// Config file [default: config/generator.toml if present]
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn apply_to(&self, config: &mut GeneratorConfig) {
        let generator = &mut config.generator;

        if self.continuous {
            generator.mode = ModeSetting::Continuous;
        } else if self.real_time {
            generator.mode = ModeSetting::RealTime;
        }
        if let Some(count) = self.count {
            generator.count = count;
        }
        if let Some(interval) = self.interval {
            generator.interval_secs = interval;
        }
        if let Some(seed) = self.seed {
            generator.seed = Some(seed);
        }
        if let Some(start_time) = &self.start_time {
            generator.start_time = start_time.clone();
        }
        if self.wall_clock {
            generator.time_source = TimeSourceKind::WallClock;
        }
        if self.clamp_negative {
            generator.clamp_negative_counts = true;
        }

        if self.no_jitter {
            config.location.jitter_degrees = 0.0;
        }

        if let Some(sink) = self.sink {
            config.sink.kind = match sink {
                SinkArg::File => SinkKind::File,
                SinkArg::Http => SinkKind::Http,
            };
        }
        if let Some(output) = &self.output {
            config.sink.output = output.clone();
        }
        if let Some(url) = &self.collector_url {
            config.sink.collector_url = url.clone();
        }

        if let Some(catalog) = &self.catalog {
            config.catalog.path = Some(catalog.clone());
        }
    }
}

pub fn render_sample(record: &TrafficRecord) -> serde_json::Result<String> {
    Ok(format!(
        "Sample Traffic Record:\n{}",
        serde_json::to_string_pretty(record)?
    ))
}
