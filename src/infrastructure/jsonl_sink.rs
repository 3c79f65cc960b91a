// JSON Lines file sink
use crate::application::record_sink::RecordSink;
use crate::domain::error::GeneratorError;
use crate::domain::record::TrafficRecord;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};

/// Appends one compact JSON object per line.
#[derive(Debug, Clone)]
pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn error(&self, reason: impl ToString) -> GeneratorError {
        GeneratorError::sink_write(self.describe(), reason)
    }
}

/// Serialize a record as a single newline-terminated line
fn encode_line(record: &TrafficRecord) -> Result<Vec<u8>, serde_json::Error> {
    let mut line = serde_json::to_vec(record)?;
    line.push(b'\n');
    Ok(line)
}

#[async_trait]
impl RecordSink for JsonLinesSink {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn write(&self, record: &TrafficRecord) -> Result<(), GeneratorError> {
        // Encode first so a serialization failure never leaves half a line behind
        let line = encode_line(record).map_err(|e| self.error(e))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.error(e))?;

        file.write_all(&line).await.map_err(|e| self.error(e))?;
        file.flush().await.map_err(|e| self.error(e))?;
        Ok(())
    }

    /// Truncate the file and write the whole batch.
    async fn write_all(&self, records: &[TrafficRecord]) -> Result<(), GeneratorError> {
        let file = File::create(&self.path).await.map_err(|e| self.error(e))?;
        let mut writer = BufWriter::new(file);

        for record in records {
            let line = encode_line(record).map_err(|e| self.error(e))?;
            writer.write_all(&line).await.map_err(|e| self.error(e))?;
        }

        writer.flush().await.map_err(|e| self.error(e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::RecordAssembler;
    use crate::domain::location::LocationSampler;
    use crate::domain::traffic::TrafficPatternEngine;
    use crate::infrastructure::catalog_file::builtin_catalog;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::path::Path;
    use std::sync::Arc;

    fn records(n: u32) -> Vec<TrafficRecord> {
        let assembler = RecordAssembler::new(
            Arc::new(builtin_catalog().unwrap()),
            LocationSampler::default(),
            TrafficPatternEngine::new(),
        );
        let mut rng = StdRng::seed_from_u64(5);
        let day = NaiveDate::from_ymd_opt(2024, 8, 25).unwrap();

        (0..n)
            .map(|i| assembler.assemble_random(&mut rng, day.and_hms_opt(8, i, 0).unwrap()))
            .collect()
    }

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_write_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("traffic.jsonl");
        let sink = JsonLinesSink::new(&path);

        for record in records(3) {
            sink.write(&record).await.unwrap();
        }

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2]["timestamp"], "2024-08-25T08:02:00Z");
        assert!(lines[0]["traffic_data"]["vehicle_types"]["car"].is_i64());
    }

    #[tokio::test]
    async fn test_write_all_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("traffic.jsonl");
        std::fs::write(&path, "stale line\n").unwrap();
        let sink = JsonLinesSink::new(&path);

        sink.write_all(&records(4)).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("stale"));
        assert!(text.ends_with('\n'));
        assert_eq!(read_lines(&path).len(), 4);
    }

    #[tokio::test]
    async fn test_unwritable_path_is_sink_error() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonLinesSink::new(dir.path().join("missing").join("traffic.jsonl"));

        let err = sink.write(&records(1)[0]).await.unwrap_err();
        assert!(matches!(err, GeneratorError::SinkWrite { .. }));
    }
}
