//! Per-session view state for the storefront.
//!
//! Each view tracks its own [`LoadState`]; advisory text is cached per
//! subject for the lifetime of the session and never reloaded.

pub mod cache;
pub mod challenge;
pub mod encyclopedia;
pub mod marketplace;
pub mod training;

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use baize_advisor::Advisor;
use baize_core::catalog;
use baize_core::commerce::{Cart, ListingDraft};

pub use cache::{Advice, AdviceCache};
pub use challenge::DailyChallenge;
pub use encyclopedia::{ChatEntry, ConversationLog, EncyclopediaView, Role};
pub use marketplace::MarketplaceView;
pub use training::{DrillTimer, TrainingView};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Outcome of an encyclopedia question asked through the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub state: LoadState,
    /// The reply, or the archives error message when `state` is `Error`.
    pub text: Option<String>,
}

/// Everything one shopper's session holds, shareable across tasks.
///
/// Advice lookups only take the cache's own short-held lock, so different
/// products and drills load concurrently. The encyclopedia refuses a second
/// question while one is in flight instead of queueing it.
pub struct Storefront {
    advisor: Advisor,
    marketplace: MarketplaceView,
    training: TrainingView,
    encyclopedia: tokio::sync::Mutex<EncyclopediaView>,
    challenge: tokio::sync::Mutex<DailyChallenge>,
    cart: Mutex<Cart>,
    listing: Mutex<ListingDraft>,
}

impl Storefront {
    pub fn new(advisor: Advisor) -> Self {
        Self {
            advisor,
            marketplace: MarketplaceView::new(),
            training: TrainingView::new(),
            encyclopedia: tokio::sync::Mutex::new(EncyclopediaView::new()),
            challenge: tokio::sync::Mutex::new(DailyChallenge::new()),
            cart: Mutex::new(Cart::new()),
            listing: Mutex::new(ListingDraft::default()),
        }
    }

    pub fn advisor(&self) -> &Advisor {
        &self.advisor
    }

    pub fn marketplace(&self) -> &MarketplaceView {
        &self.marketplace
    }

    pub fn training(&self) -> &TrainingView {
        &self.training
    }

    /// `None` for an unknown product id.
    pub async fn product_advice(&self, product_id: &str) -> Option<Advice> {
        let product = catalog::find_product(product_id)?;
        Some(self.marketplace.advice(&self.advisor, &product).await)
    }

    /// `None` for an unknown drill id.
    pub async fn drill_tip(&self, drill_id: &str) -> Option<Advice> {
        let drill = catalog::find_drill(drill_id)?;
        Some(self.training.tip(&self.advisor, &drill).await)
    }

    pub async fn ask(&self, question: &str, display_label: Option<&str>) -> Answer {
        let Ok(mut view) = self.encyclopedia.try_lock() else {
            return Answer {
                state: LoadState::Loading,
                text: None,
            };
        };
        let state = view.ask(&self.advisor, question, display_label).await;
        let text = match state {
            LoadState::Success => view.log().last().map(|entry| entry.text.clone()),
            LoadState::Error => view.error_message().map(str::to_string),
            _ => None,
        };
        Answer { state, text }
    }

    /// `None` when no guide has that title.
    pub async fn ask_guide(&self, title: &str) -> Option<Answer> {
        let (kind, guide) = catalog::find_guide(title)?;
        Some(self.ask(&guide.prompt, Some(&kind.label(&guide))).await)
    }

    pub async fn conversation(&self) -> ConversationLog {
        self.encyclopedia.lock().await.log().clone()
    }

    /// Today's trivia, loading it on first use.
    pub async fn daily_trivia(&self) -> baize_advisor::TriviaQuestion {
        let mut challenge = self.challenge.lock().await;
        challenge.load(&self.advisor).await.clone()
    }

    /// Lock in an answer to today's trivia. See [`DailyChallenge::answer`].
    pub async fn answer_trivia(&self, index: usize) -> Option<bool> {
        let mut challenge = self.challenge.lock().await;
        challenge.load(&self.advisor).await;
        challenge.answer(index)
    }

    pub fn cart(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn listing(&self) -> MutexGuard<'_, ListingDraft> {
        self.listing.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use baize_advisor::{fallback, MockBackend};
    use std::sync::Arc;

    fn storefront(backend: &Arc<MockBackend>) -> Storefront {
        Storefront::new(Advisor::new(backend.clone()))
    }

    #[tokio::test]
    async fn test_unknown_subjects() {
        let backend = Arc::new(MockBackend::default());
        let store = storefront(&backend);

        assert!(store.product_advice("no-such-product").await.is_none());
        assert!(store.drill_tip("no-such-drill").await.is_none());
        assert!(store.ask_guide("The Masse Jump").await.is_none());
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_drill_tip_cached() {
        let backend = Arc::new(MockBackend::default().with_response("Stay down."));
        let store = storefront(&backend);
        let drills = catalog::drills();
        let drill = &drills[0];

        for _ in 0..2 {
            assert_eq!(
                store.drill_tip(&drill.id).await,
                Some(Advice::Ready("Stay down.".into()))
            );
        }
        assert_eq!(backend.call_count(), 1);
        assert_eq!(store.training().tip_state(&drill.id), LoadState::Success);
    }

    #[tokio::test]
    async fn test_ask_reports_error_message() {
        let backend = Arc::new(MockBackend::default().failing("offline"));
        let store = storefront(&backend);

        let answer = store.ask("What is a snooker?", None).await;

        assert_eq!(answer.state, LoadState::Error);
        assert_eq!(answer.text.as_deref(), Some(fallback::ENCYCLOPEDIA_ERROR));
    }

    #[tokio::test]
    async fn test_cancelled_question_releases_encyclopedia() {
        let backend = Arc::new(
            MockBackend::default()
                .with_response("It is a position with no direct shot.")
                .with_delay(std::time::Duration::from_millis(50)),
        );
        let store = storefront(&backend);

        let cancelled = tokio::time::timeout(
            std::time::Duration::from_millis(5),
            store.ask("What is a snooker?", None),
        )
        .await;
        assert!(cancelled.is_err());

        let answer = store.ask("What is a snooker?", None).await;

        assert_eq!(answer.state, LoadState::Success);
        assert_eq!(answer.text.as_deref(), Some("It is a position with no direct shot."));
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn test_situation_guide_label() {
        let backend = Arc::new(MockBackend::default().with_response("Play safe."));
        let store = storefront(&backend);
        let guides = catalog::situation_guides();
        let guide = &guides[0];

        let answer = store.ask_guide(&guide.title).await.unwrap();

        assert_eq!(answer.text.as_deref(), Some("Play safe."));
        let log = store.conversation().await;
        assert_eq!(log.entries()[0].text, format!("Guide me on: {}", guide.title));
    }

    #[tokio::test]
    async fn test_trivia_answer_locks_in() {
        let backend = Arc::new(MockBackend::default().failing("offline"));
        let store = storefront(&backend);

        assert_eq!(store.answer_trivia(0).await, Some(true));
        assert_eq!(store.answer_trivia(1).await, None);
        assert_eq!(store.daily_trivia().await, fallback::fallback_trivia());
        assert_eq!(backend.call_count(), 1);
    }

    #[test]
    fn test_cart_and_listing() {
        let backend = Arc::new(MockBackend::default());
        let store = storefront(&backend);
        let product = catalog::products().remove(0);

        store.cart().add(&product);
        assert!(store.cart().checkout().is_ok());

        store.listing().set_price("200");
        assert_eq!(store.listing().quote().payout, 190.0);
    }
}
