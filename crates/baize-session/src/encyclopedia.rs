use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use baize_advisor::{fallback, AdvisoryError, Advisor};
use baize_core::catalog::GuideKind;
use baize_core::Guide;

use crate::LoadState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatEntry {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only transcript of one encyclopedia session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversationLog {
    entries: Vec<ChatEntry>,
}

impl ConversationLog {
    fn push(&mut self, role: Role, text: impl Into<String>) {
        self.entries.push(ChatEntry {
            role,
            text: text.into(),
            timestamp: Utc::now(),
        });
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&ChatEntry> {
        self.entries.last()
    }
}

/// Puts the view back to `Idle` if a question is dropped before its reply
/// arrives, so the next question is not refused.
struct InFlight<'a> {
    view: &'a mut EncyclopediaView,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.view.state = LoadState::Idle;
        }
    }
}

impl InFlight<'_> {
    fn settle(mut self, reply: Result<String, AdvisoryError>) -> LoadState {
        match reply {
            Ok(answer) => {
                self.view.log.push(Role::Assistant, answer);
                self.view.state = LoadState::Success;
            }
            Err(e) => {
                warn!(error = %e, "encyclopedia query failed");
                self.view.last_error = Some(e);
                self.view.state = LoadState::Error;
            }
        }
        self.settled = true;
        self.view.state
    }
}

/// "The Archives": free-text questions plus canned technique and
/// situation guides.
#[derive(Debug, Default)]
pub struct EncyclopediaView {
    log: ConversationLog,
    state: LoadState,
    last_error: Option<AdvisoryError>,
}

impl EncyclopediaView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn last_error(&self) -> Option<&AdvisoryError> {
        self.last_error.as_ref()
    }

    /// Text for the error banner, when in the error state.
    pub fn error_message(&self) -> Option<&'static str> {
        (self.state == LoadState::Error).then_some(fallback::ENCYCLOPEDIA_ERROR)
    }

    /// Ask a question. `display_label` replaces the question in the
    /// transcript; the full text is still what gets sent.
    ///
    /// Blank input, or a question while another is loading, changes nothing.
    /// Dropping the returned future before it resolves leaves the view `Idle`.
    pub async fn ask(
        &mut self,
        advisor: &Advisor,
        question: &str,
        display_label: Option<&str>,
    ) -> LoadState {
        if question.trim().is_empty() || self.state == LoadState::Loading {
            return self.state;
        }

        self.log.push(Role::User, display_label.unwrap_or(question));
        self.state = LoadState::Loading;
        self.last_error = None;

        let pending = InFlight {
            view: self,
            settled: false,
        };
        let reply = advisor.ask_encyclopedia(question).await;
        pending.settle(reply)
    }

    pub async fn ask_guide(&mut self, advisor: &Advisor, kind: GuideKind, guide: &Guide) -> LoadState {
        let label = kind.label(guide);
        self.ask(advisor, &guide.prompt, Some(&label)).await
    }
}
