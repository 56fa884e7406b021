use baize_advisor::Advisor;
use baize_core::{catalog, MarketFilter, Product};

use crate::cache::{Advice, AdviceCache};
use crate::LoadState;

/// Pro shop listing with per-product "ask the expert" advice.
#[derive(Debug, Default)]
pub struct MarketplaceView {
    filter: MarketFilter,
    advice: AdviceCache,
}

impl MarketplaceView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> MarketFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: MarketFilter) {
        self.filter = filter;
    }

    pub fn products(&self) -> Vec<Product> {
        catalog::products()
            .into_iter()
            .filter(|p| self.filter.matches(p))
            .collect()
    }

    /// Expert advice for a product, fetched at most once per session.
    pub async fn advice(&self, advisor: &Advisor, product: &Product) -> Advice {
        self.advice
            .get_or_fetch(&product.id, || {
                advisor.product_advice(&product.name, product.category.as_str())
            })
            .await
    }

    pub fn cached_advice(&self, product_id: &str) -> Option<String> {
        self.advice.get(product_id)
    }

    /// Drives the "Ask Expert" button: disabled while `Loading`, replaced by
    /// the text once `Success`.
    pub fn advice_state(&self, product_id: &str) -> LoadState {
        self.advice.state(product_id)
    }
}
