// HTTP collector sink - posts each record as a JSON body (e.g. a Logstash HTTP input)
use crate::application::record_sink::RecordSink;
use crate::domain::error::GeneratorError;
use crate::domain::record::TrafficRecord;
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpCollectorSink {
    client: reqwest::Client,
    url: String,
}

impl HttpCollectorSink {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, GeneratorError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeneratorError::invalid_config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl RecordSink for HttpCollectorSink {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn write(&self, record: &TrafficRecord) -> Result<(), GeneratorError> {
        let response = self
            .client
            .post(&self.url)
            .json(record)
            .send()
            .await
            .map_err(|e| GeneratorError::sink_write(&self.url, format!("connection error: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GeneratorError::sink_write(
                &self.url,
                format!("collector responded with status {}: {}", status, body),
            ));
        }

        tracing::debug!(
            "Sent record for {} ({} traffic)",
            record.location.city,
            record.traffic.congestion_level.as_str()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::location::LocationSampler;
    use crate::domain::record::RecordAssembler;
    use crate::domain::traffic::TrafficPatternEngine;
    use crate::infrastructure::catalog_file::builtin_catalog;
    use axum::{Json, Router, http::StatusCode, routing::post};
    use chrono::Local;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::{Arc, Mutex};

    type Received = Arc<Mutex<Vec<serde_json::Value>>>;

    async fn spawn_collector(status: StatusCode) -> (String, Received) {
        let received: Received = Arc::new(Mutex::new(Vec::new()));
        let state = received.clone();

        let app = Router::new().route(
            "/",
            post(move |Json(body): Json<serde_json::Value>| async move {
                state.lock().unwrap().push(body);
                (status, "collector says hi")
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/", addr), received)
    }

    fn record() -> TrafficRecord {
        let assembler = RecordAssembler::new(
            Arc::new(builtin_catalog().unwrap()),
            LocationSampler::default(),
            TrafficPatternEngine::new(),
        );
        let mut rng = StdRng::seed_from_u64(12);
        assembler.assemble_random(&mut rng, Local::now().naive_local())
    }

    #[tokio::test]
    async fn test_posts_record_as_json() {
        let (url, received) = spawn_collector(StatusCode::OK).await;
        let sink = HttpCollectorSink::new(url, Duration::from_secs(5)).unwrap();
        let record = record();

        sink.write(&record).await.unwrap();

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0], serde_json::to_value(&record).unwrap());
        assert_eq!(received[0]["metadata"]["source"], "synthetic_generator");
    }

    #[tokio::test]
    async fn test_error_status_is_sink_error() {
        let (url, _) = spawn_collector(StatusCode::INTERNAL_SERVER_ERROR).await;
        let sink = HttpCollectorSink::new(url, Duration::from_secs(5)).unwrap();

        match sink.write(&record()).await {
            Err(GeneratorError::SinkWrite { reason, .. }) => {
                assert!(reason.contains("500"), "{}", reason);
                assert!(reason.contains("collector says hi"), "{}", reason);
            }
            other => panic!("expected SinkWrite, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_collector_is_sink_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let sink = HttpCollectorSink::new(format!("http://{}/", addr), Duration::from_secs(2)).unwrap();
        let err = sink.write(&record()).await.unwrap_err();

        assert!(matches!(err, GeneratorError::SinkWrite { .. }));
    }
}
