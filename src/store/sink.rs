//! Persistence sinks for the collection store
//!
//! A sink receives the serialized block sequence on every save. It behaves
//! like an HTTP POST: one endpoint, one JSON body, and whatever success or
//! failure the transport reports. No retry happens at this layer.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

/// Transport that accepts a saved block sequence
#[async_trait]
pub trait BlockSink: Send + Sync {
    /// Deliver `body` to `endpoint`
    async fn post(&self, endpoint: &str, body: &Value) -> Result<(), SinkError>;
}

/// Sink failures, passed through to the caller unchanged
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SinkError {
    /// The request could not be delivered
    #[error("Transport error: {0}")]
    Transport(String),

    /// The receiving end answered with a failure status
    #[error("Endpoint {endpoint} rejected the request with status {status}")]
    Rejected { endpoint: String, status: u16 },
}

/// Sink that keeps every posted body in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    posts: Mutex<Vec<(String, Value)>>,
    failure: Option<SinkError>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every post fails with `error`
    pub fn failing(error: SinkError) -> Self {
        Self {
            posts: Mutex::new(Vec::new()),
            failure: Some(error),
        }
    }

    /// Every `(endpoint, body)` pair received so far, oldest first
    pub fn posts(&self) -> Vec<(String, Value)> {
        self.posts.lock().clone()
    }

    /// Most recent body, if any
    pub fn last_body(&self) -> Option<Value> {
        self.posts.lock().last().map(|(_, body)| body.clone())
    }
}

#[async_trait]
impl BlockSink for MemorySink {
    async fn post(&self, endpoint: &str, body: &Value) -> Result<(), SinkError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        self.posts.lock().push((endpoint.to_string(), body.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_sink_records_posts() {
        let sink = MemorySink::new();
        sink.post("/save", &json!([1])).await.unwrap();
        sink.post("/save", &json!([2])).await.unwrap();

        let posts = sink.posts();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0], ("/save".to_string(), json!([1])));
        assert_eq!(sink.last_body(), Some(json!([2])));
    }

    #[tokio::test]
    async fn test_failing_sink() {
        let sink = MemorySink::failing(SinkError::Transport("offline".into()));
        let err = sink.post("/save", &json!([])).await.unwrap_err();
        assert_eq!(err, SinkError::Transport("offline".into()));
        assert!(sink.posts().is_empty());
    }
}
