//! Mock backend for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::engine::{AdvisoryBackend, GenerationRequest};
use crate::error::BackendError;

/// Scriptable backend.
///
/// Replies are taken from the script queue first; once it is empty every
/// call gets the default reply. Requests are recorded for inspection.
pub struct MockBackend {
    id: String,
    default_reply: Result<String, BackendError>,
    script: Mutex<VecDeque<Result<String, BackendError>>>,
    delay: Option<Duration>,
    requests: Mutex<Vec<GenerationRequest>>,
    call_count: AtomicU32,
}

impl MockBackend {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            default_reply: Ok("Mock response".to_string()),
            script: Mutex::new(VecDeque::new()),
            delay: None,
            requests: Mutex::new(Vec::new()),
            call_count: AtomicU32::new(0),
        }
    }

    /// Reply with `content` by default.
    pub fn with_response(mut self, content: impl Into<String>) -> Self {
        self.default_reply = Ok(content.into());
        self
    }

    /// Fail every unscripted call with a transport error.
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.default_reply = Err(BackendError::Request(reason.into()));
        self
    }

    /// Queue one reply ahead of the default.
    pub fn then_reply(self, reply: Result<String, BackendError>) -> Self {
        lock(&self.script).push_back(reply);
        self
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        lock(&self.requests).clone()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new("mock-model")
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[async_trait]
impl AdvisoryBackend for MockBackend {
    fn id(&self) -> &str {
        &self.id
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        lock(&self.requests).push(request.clone());

        let reply = lock(&self.script)
            .pop_front()
            .unwrap_or_else(|| self.default_reply.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest {
            system: "sys".into(),
            content: "Hi".into(),
            schema: None,
        }
    }

    #[tokio::test]
    async fn test_mock_backend() {
        let backend = MockBackend::new("test-model").with_response("Hello, world!");
        assert_eq!(backend.call_count(), 0);

        let reply = backend.generate(&request()).await.unwrap();
        assert_eq!(reply, "Hello, world!");
        assert_eq!(backend.call_count(), 1);
        assert_eq!(backend.requests()[0].content, "Hi");
    }

    #[tokio::test]
    async fn test_script_then_default() {
        let backend = MockBackend::default()
            .failing("down")
            .then_reply(Ok("first".into()));

        assert_eq!(backend.generate(&request()).await.unwrap(), "first");
        assert!(backend.generate(&request()).await.is_err());
    }
}
