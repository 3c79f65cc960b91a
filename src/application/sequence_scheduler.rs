// Sequence scheduler - drives record generation in batch, real-time and continuous runs
use crate::application::record_sink::RecordSink;
use crate::application::shutdown::Shutdown;
use crate::application::simulated_clock::TimeSource;
use crate::domain::error::GeneratorError;
use crate::domain::record::{RecordAssembler, TrafficRecord};
use chrono::NaiveDateTime;
use rand::rngs::StdRng;
use std::time::Duration;
use tracing::{debug, info, warn};

const PROGRESS_EVERY: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Batch,
    RealTime,
    Continuous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Cancelled,
    /// A sink error aborted the run
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed { records: u64 },
    Cancelled { records: u64 },
}

impl RunOutcome {
    pub fn records(&self) -> u64 {
        match self {
            Self::Completed { records } | Self::Cancelled { records } => *records,
        }
    }
}

pub struct SequenceScheduler {
    assembler: RecordAssembler,
    rng: StdRng,
    time_source: TimeSource,
    interval: Duration,
    state: RunState,
}

impl SequenceScheduler {
    pub fn new(assembler: RecordAssembler, rng: StdRng, time_source: TimeSource) -> Self {
        Self {
            assembler,
            rng,
            time_source,
            interval: Duration::ZERO,
            state: RunState::Idle,
        }
    }

    /// Pause between records in real-time and continuous runs.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Assemble one record at `at` without touching any sink.
    ///
    /// A named city must be in the catalog, otherwise a random one is used.
    pub fn sample(
        &mut self,
        at: NaiveDateTime,
        city: Option<&str>,
    ) -> Result<TrafficRecord, GeneratorError> {
        match city {
            Some(name) => self.assembler.assemble_for(&mut self.rng, at, name),
            None => Ok(self.assembler.assemble_random(&mut self.rng, at)),
        }
    }

    fn next_record(&mut self) -> TrafficRecord {
        let base_time = self.time_source.next_base_time();
        self.assembler.assemble_random(&mut self.rng, base_time)
    }

    fn begin(&mut self) {
        self.time_source.reset();
        self.state = RunState::Running;
    }

    fn fail(&mut self, err: GeneratorError) -> GeneratorError {
        self.state = RunState::Failed;
        err
    }

    /// Generate `count` records, then persist them to the sink in one pass.
    pub async fn run_batch(
        &mut self,
        sink: &dyn RecordSink,
        count: u64,
    ) -> Result<Vec<TrafficRecord>, GeneratorError> {
        self.begin();
        info!("Generating {} traffic records for {}...", count, sink.describe());

        let records: Vec<TrafficRecord> = (0..count).map(|_| self.next_record()).collect();

        if let Err(e) = sink.write_all(&records).await {
            return Err(self.fail(e));
        }
        info!("Saved {} records to {}", records.len(), sink.describe());

        self.state = RunState::Completed;
        Ok(records)
    }

    /// Persist each record as soon as it is built, pausing between records.
    pub async fn run_real_time(
        &mut self,
        sink: &dyn RecordSink,
        count: u64,
        shutdown: Shutdown,
    ) -> Result<RunOutcome, GeneratorError> {
        info!(
            "Generating {} traffic records in real time, one every {:?}",
            count, self.interval
        );
        self.run_paced(sink, Some(count), shutdown).await
    }

    /// Generate until the shutdown signal fires.
    pub async fn run_continuous(
        &mut self,
        sink: &dyn RecordSink,
        shutdown: Shutdown,
    ) -> Result<RunOutcome, GeneratorError> {
        info!("Starting continuous data generation to {}", sink.describe());
        info!("Generating new record every {:?}...", self.interval);
        self.run_paced(sink, None, shutdown).await
    }

    async fn run_paced(
        &mut self,
        sink: &dyn RecordSink,
        limit: Option<u64>,
        mut shutdown: Shutdown,
    ) -> Result<RunOutcome, GeneratorError> {
        self.begin();
        let mut written: u64 = 0;

        if shutdown.is_triggered() {
            return self.cancel(sink, written).await;
        }

        let pending = |written: u64| limit.is_none_or(|total| written < total);

        while pending(written) {
            let record = self.next_record();
            if let Err(e) = sink.write(&record).await {
                return Err(self.fail(e));
            }
            written += 1;

            match limit {
                Some(total) => {
                    if written % PROGRESS_EVERY == 0 {
                        info!("Generated {}/{} records", written, total);
                    }
                }
                None => info!(
                    "Generated record for {} at {}",
                    record.location.city, record.timestamp
                ),
            }

            // Checked between emission and the pacing wait
            if shutdown.is_triggered() {
                return self.cancel(sink, written).await;
            }
            if pending(written) && self.pace(&mut shutdown).await {
                return self.cancel(sink, written).await;
            }
        }

        if let Err(e) = sink.flush().await {
            return Err(self.fail(e));
        }
        self.state = RunState::Completed;
        info!("Generated {} records to {}", written, sink.describe());
        Ok(RunOutcome::Completed { records: written })
    }

    /// Wait out the interval. Returns true if shutdown fired meanwhile.
    async fn pace(&self, shutdown: &mut Shutdown) -> bool {
        if self.interval.is_zero() {
            return shutdown.is_triggered();
        }

        tokio::select! {
            _ = tokio::time::sleep(self.interval) => false,
            _ = shutdown.triggered() => true,
        }
    }

    async fn cancel(
        &mut self,
        sink: &dyn RecordSink,
        written: u64,
    ) -> Result<RunOutcome, GeneratorError> {
        if let Err(e) = sink.flush().await {
            warn!("Flush after cancellation failed: {}", e);
            return Err(self.fail(e));
        }
        self.state = RunState::Cancelled;
        info!("Generation stopped after {} records", written);
        debug!("Sink {} flushed", sink.describe());
        Ok(RunOutcome::Cancelled { records: written })
    }
}
