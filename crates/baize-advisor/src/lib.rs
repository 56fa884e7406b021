//! AI advisory layer: encyclopedia Q&A, product advice, daily trivia and
//! drill coaching tips.
//!
//! ```text
//! caller ──► prompt (request builder) ──► Advisor ──► AdvisoryBackend
//!                                            │
//!                       parse (schema) ◄─────┴─────► fallback
//! ```
//!
//! The backend is injected once at start-up. Product advice, drill tips and
//! trivia never fail from the caller's point of view; encyclopedia questions
//! surface transport failures so the view can show an error state.

pub mod client;
pub mod engine;
pub mod error;
pub mod fallback;
pub mod mock;
mod parse;
mod prompt;

use serde::{Deserialize, Serialize};

pub use client::{Advisor, AdvisorConfig};
pub use engine::{AdvisoryBackend, GenerationRequest, LlmEngine, UnconfiguredBackend};
pub use error::{AdvisoryError, BackendError, SchemaError};
pub use mock::MockBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    Qa,
    ProductAdvice,
    Trivia,
    DrillTip,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Qa => "qa",
            Operation::ProductAdvice => "product-advice",
            Operation::Trivia => "trivia",
            Operation::DrillTip => "drill-tip",
        }
    }

    /// Only encyclopedia questions report transport failures to the caller;
    /// every other operation degrades to its fallback.
    pub fn surfaces_transport_errors(&self) -> bool {
        matches!(self, Operation::Qa)
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryQuery {
    operation: Operation,
    subject: String,
    context: Option<String>,
}

impl AdvisoryQuery {
    /// Free-text encyclopedia question, sent verbatim.
    pub fn qa(question: impl Into<String>) -> Self {
        Self {
            operation: Operation::Qa,
            subject: question.into(),
            context: None,
        }
    }

    pub fn product_advice(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            operation: Operation::ProductAdvice,
            subject: name.into(),
            context: Some(category.into()),
        }
    }

    pub fn trivia() -> Self {
        Self {
            operation: Operation::Trivia,
            subject: String::new(),
            context: None,
        }
    }

    pub fn drill_tip(drill_title: impl Into<String>) -> Self {
        Self {
            operation: Operation::DrillTip,
            subject: drill_title.into(),
            context: None,
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextResult {
    pub body: String,
}

/// A multiple-choice question. Model replies only become one of these after
/// the schema check; hand-built values are not checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriviaQuestion {
    pub question: String,
    pub options: [String; 4],
    pub correct_answer: usize,
    pub explanation: String,
}

impl TriviaQuestion {
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_answer
    }

    /// `None` when `correct_answer` does not index `options`.
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_answer).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AdvisoryResult {
    Text(TextResult),
    Trivia(TriviaQuestion),
}

impl AdvisoryResult {
    pub fn text(body: impl Into<String>) -> Self {
        AdvisoryResult::Text(TextResult { body: body.into() })
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AdvisoryResult::Text(t) => Some(&t.body),
            AdvisoryResult::Trivia(_) => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            AdvisoryResult::Text(t) => Some(t.body),
            AdvisoryResult::Trivia(_) => None,
        }
    }

    pub fn into_trivia(self) -> Option<TriviaQuestion> {
        match self {
            AdvisoryResult::Trivia(q) => Some(q),
            AdvisoryResult::Text(_) => None,
        }
    }
}
