// Sink port for persisting or delivering generated records
use crate::domain::error::GeneratorError;
use crate::domain::record::TrafficRecord;
use async_trait::async_trait;

#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Human readable target, used in logs and errors
    fn describe(&self) -> String;

    /// Persist a single record. Either the whole record lands or an error is returned.
    async fn write(&self, record: &TrafficRecord) -> Result<(), GeneratorError>;

    /// Persist a complete batch in one pass
    async fn write_all(&self, records: &[TrafficRecord]) -> Result<(), GeneratorError> {
        for record in records {
            self.write(record).await?;
        }
        Ok(())
    }

    async fn flush(&self) -> Result<(), GeneratorError> {
        Ok(())
    }
}
