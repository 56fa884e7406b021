use baize_advisor::{Advisor, TriviaQuestion};

use crate::LoadState;

/// Daily trivia card. Starts out loading and always ends with a playable
/// question; there is no error state.
#[derive(Debug, Clone)]
pub struct DailyChallenge {
    state: LoadState,
    question: Option<TriviaQuestion>,
    selected: Option<usize>,
}

impl Default for DailyChallenge {
    fn default() -> Self {
        Self {
            state: LoadState::Loading,
            question: None,
            selected: None,
        }
    }
}

impl DailyChallenge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn question(&self) -> Option<&TriviaQuestion> {
        self.question.as_ref()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Fetch today's question. Only the first call dispatches.
    pub async fn load(&mut self, advisor: &Advisor) -> &TriviaQuestion {
        let question = match self.question.take() {
            Some(q) => q,
            None => advisor.daily_trivia().await,
        };
        self.state = LoadState::Success;
        self.question.insert(question)
    }

    /// Lock in an answer. Returns whether it was correct, or `None` when the
    /// question is not loaded, an answer is already locked in, or the index
    /// is not one of the options.
    pub fn answer(&mut self, index: usize) -> Option<bool> {
        let question = self.question.as_ref()?;
        if self.selected.is_some() || index >= question.options.len() {
            return None;
        }
        self.selected = Some(index);
        Some(question.is_correct(index))
    }

    /// Explanation, revealed once an answer is locked in.
    pub fn explanation(&self) -> Option<&str> {
        self.selected?;
        self.question.as_ref().map(|q| q.explanation.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use baize_advisor::MockBackend;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_load_once_and_answer() {
        let backend = Arc::new(MockBackend::default().failing("offline"));
        let advisor = Advisor::new(backend.clone());
        let mut card = DailyChallenge::new();
        assert_eq!(card.state(), LoadState::Loading);
        assert_eq!(card.answer(0), None);

        card.load(&advisor).await;
        card.load(&advisor).await;
        assert_eq!(backend.call_count(), 1);
        assert_eq!(card.state(), LoadState::Success);
        assert!(card.explanation().is_none());

        assert_eq!(card.answer(4), None);
        assert_eq!(card.answer(1), Some(false));
        assert_eq!(card.answer(0), None);
        assert_eq!(card.selected(), Some(1));
        assert!(card.explanation().unwrap().starts_with("147"));
    }
}
