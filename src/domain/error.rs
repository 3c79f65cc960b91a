// Error taxonomy shared by the synthesis engine and its collaborators
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Catalog lookup miss. Fatal to the record being built, not to the run.
    #[error("unknown city: {0}")]
    UnknownCity(String),

    /// Persisting a record failed. Records are not buffered, so the run aborts.
    #[error("failed to write record to {sink}: {reason}")]
    SinkWrite { sink: String, reason: String },

    /// Rejected before a run starts.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("hour of day out of range (0-23): {0}")]
    InvalidHour(u32),
}

impl GeneratorError {
    pub fn sink_write(sink: impl Into<String>, reason: impl ToString) -> Self {
        Self::SinkWrite {
            sink: sink.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }
}
