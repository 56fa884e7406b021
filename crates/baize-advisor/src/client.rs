use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use baize_core::AiSettings;

use crate::engine::AdvisoryBackend;
use crate::error::AdvisoryError;
use crate::{fallback, parse, prompt};
use crate::{AdvisoryQuery, AdvisoryResult, Operation, TriviaQuestion};

#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    /// Upper bound on one round trip. A call that outlives it counts as a
    /// transport failure.
    pub timeout: Duration,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(baize_core::DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl AdvisorConfig {
    pub fn from_settings(settings: &AiSettings) -> Self {
        Self {
            timeout: Duration::from_secs(settings.timeout_secs.max(1)),
        }
    }
}

/// The advisory client. Cheap to clone; clones share the backend.
#[derive(Clone)]
pub struct Advisor {
    backend: Arc<dyn AdvisoryBackend>,
    config: AdvisorConfig,
}

impl Advisor {
    pub fn new(backend: Arc<dyn AdvisoryBackend>) -> Self {
        Self {
            backend,
            config: AdvisorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AdvisorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn backend_id(&self) -> &str {
        self.backend.id()
    }

    /// One round trip, every failure reported.
    async fn attempt(&self, query: &AdvisoryQuery) -> Result<AdvisoryResult, AdvisoryError> {
        let request = prompt::build(query);
        let operation = query.operation();
        let start = Instant::now();

        debug!(%operation, backend = self.backend.id(), "dispatching advisory query");

        let raw = tokio::time::timeout(self.config.timeout, self.backend.generate(&request))
            .await
            .map_err(|_| AdvisoryError::Timeout(self.config.timeout))??;

        debug!(
            %operation,
            elapsed_ms = start.elapsed().as_millis() as u64,
            bytes = raw.len(),
            "advisory reply received"
        );

        match operation {
            Operation::Trivia => Ok(AdvisoryResult::Trivia(parse::parse_trivia(&raw)?)),
            _ => parse::parse_text(&raw)
                .map(AdvisoryResult::text)
                .ok_or(AdvisoryError::EmptyBody),
        }
    }

    /// Run a query and apply the failure policy.
    ///
    /// Only `qa` can return `Err`, and only for transport failures or
    /// timeouts. Everything else resolves to a usable result.
    pub async fn invoke(&self, query: AdvisoryQuery) -> Result<AdvisoryResult, AdvisoryError> {
        let operation = query.operation();
        match self.attempt(&query).await {
            Ok(result) => Ok(result),
            Err(AdvisoryError::EmptyBody) => {
                warn!(%operation, "empty advisory reply, using default text");
                Ok(fallback::for_empty(operation))
            }
            Err(e) if e.is_transport() && operation.surfaces_transport_errors() => {
                warn!(%operation, error = %e, "advisory call failed");
                Err(e)
            }
            Err(e) => {
                warn!(%operation, error = %e, "advisory call failed, using fallback");
                Ok(fallback::for_failure(operation))
            }
        }
    }

    /// Encyclopedia question. Blank input is refused without dispatching.
    pub async fn ask_encyclopedia(&self, question: &str) -> Result<String, AdvisoryError> {
        if question.trim().is_empty() {
            return Err(AdvisoryError::EmptyQuestion);
        }
        let result = self.invoke(AdvisoryQuery::qa(question)).await?;
        Ok(result
            .into_text()
            .unwrap_or_else(|| fallback::EMPTY_ENCYCLOPEDIA.to_string()))
    }

    pub async fn product_advice(&self, name: &str, category: &str) -> String {
        self.text_or(
            AdvisoryQuery::product_advice(name, category),
            fallback::PRODUCT_ADVICE_ERROR,
        )
        .await
    }

    pub async fn drill_tip(&self, drill_title: &str) -> String {
        self.text_or(AdvisoryQuery::drill_tip(drill_title), fallback::DRILL_TIP_ERROR)
            .await
    }

    /// Always a playable question: the model's, or the built-in one.
    pub async fn daily_trivia(&self) -> TriviaQuestion {
        match self.invoke(AdvisoryQuery::trivia()).await {
            Ok(AdvisoryResult::Trivia(q)) => q,
            _ => fallback::fallback_trivia(),
        }
    }

    async fn text_or(&self, query: AdvisoryQuery, default: &str) -> String {
        self.invoke(query)
            .await
            .ok()
            .and_then(AdvisoryResult::into_text)
            .unwrap_or_else(|| default.to_string())
    }
}
