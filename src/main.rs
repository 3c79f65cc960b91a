// Main entry point - Configuration, dependency wiring and run dispatch
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::application::record_sink::RecordSink;
use crate::application::sequence_scheduler::{RunMode, RunOutcome, SequenceScheduler};
use crate::application::shutdown::Shutdown;
use crate::application::simulated_clock::TimeSource;
use crate::domain::location::LocationSampler;
use crate::domain::record::RecordAssembler;
use crate::domain::traffic::TrafficPatternEngine;
use crate::infrastructure::catalog_file::{builtin_catalog, load_catalog};
use crate::infrastructure::config::{SinkTarget, TimeSourceKind, load_generator_config};
use crate::infrastructure::http_sink::HttpCollectorSink;
use crate::infrastructure::jsonl_sink::JsonLinesSink;
use crate::presentation::cli::{Cli, render_sample};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration: file, then environment, then flags
    let cli = Cli::parse();
    let mut config = load_generator_config(cli.config.as_deref())?;
    cli.apply_to(&mut config);
    let engine = config.engine_plan()?;
    // Sample mode persists nothing, so run settings are not checked
    let run = if cli.sample {
        None
    } else {
        Some(config.run_plan()?)
    };

    let catalog = match &engine.catalog_path {
        Some(path) => load_catalog(path)?,
        None => builtin_catalog()?,
    };
    let cities = catalog.list_cities();
    info!("Loaded {} cities: {}", cities.len(), cities.join(", "));

    // Build the engine (domain layer)
    let assembler = RecordAssembler::new(
        Arc::new(catalog),
        LocationSampler::new(engine.jitter_degrees),
        TrafficPatternEngine::new().with_clamping(engine.clamp_negative_counts),
    );
    let rng = match engine.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let time_source = match engine.time_source {
        TimeSourceKind::Simulated => TimeSource::simulated(engine.start_time),
        TimeSourceKind::WallClock => TimeSource::WallClock,
    };
    let mut scheduler = SequenceScheduler::new(assembler, rng, time_source);

    let Some(plan) = run else {
        let record = scheduler.sample(engine.sample_time(), cli.city.as_deref())?;
        println!("{}", render_sample(&record)?);
        return Ok(());
    };
    let mut scheduler = scheduler.with_interval(plan.interval);

    // Create the sink (infrastructure layer)
    let sink: Box<dyn RecordSink> = match &plan.sink {
        SinkTarget::File(path) => Box::new(JsonLinesSink::new(path)),
        SinkTarget::Http { url, timeout } => {
            info!("Sending to collector at: {}", url);
            Box::new(HttpCollectorSink::new(url.clone(), *timeout)?)
        }
    };

    let outcome = match plan.mode {
        RunMode::Batch => {
            let records = scheduler.run_batch(sink.as_ref(), plan.count).await?;
            RunOutcome::Completed {
                records: records.len() as u64,
            }
        }
        RunMode::RealTime => {
            scheduler
                .run_real_time(sink.as_ref(), plan.count, Shutdown::on_ctrl_c())
                .await?
        }
        RunMode::Continuous => {
            scheduler
                .run_continuous(sink.as_ref(), Shutdown::on_ctrl_c())
                .await?
        }
    };

    match outcome {
        RunOutcome::Completed { .. } => {
            info!("Successfully generated {} traffic records", outcome.records())
        }
        RunOutcome::Cancelled { .. } => {
            info!("Generation stopped by user after {} records", outcome.records())
        }
    }
    debug!("Scheduler finished in state {:?}", scheduler.state());

    Ok(())
}
