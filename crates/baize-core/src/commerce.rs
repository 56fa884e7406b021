//! Cart totals, simulated escrow checkout and seller fee arithmetic.
//!
//! Nothing here moves money. Checkout and listing are in-memory state
//! transitions only.

use serde::{Deserialize, Serialize};

use crate::Product;

/// Flat service fee charged to the buyer on a non-empty cart.
pub const BUYER_FEE: f64 = 1.00;

/// Share of the asking price kept by the marketplace.
pub const SELLER_FEE_RATE: f64 = 0.05;

/// Shipping is free.
pub const SHIPPING_COST: f64 = 0.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_total(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CheckoutStep {
    #[default]
    Cart,
    Escrow,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,
    #[error("checkout already in escrow")]
    AlreadyInEscrow,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<CartItem>,
    step: CheckoutStep,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    /// Add one unit. Items are merged by product id.
    pub fn add(&mut self, product: &Product) {
        match self.items.iter_mut().find(|i| i.product.id == product.id) {
            Some(item) => item.quantity += 1,
            None => self.items.push(CartItem {
                product: product.clone(),
                quantity: 1,
            }),
        }
    }

    /// Drop the whole line for `product_id`. Returns whether anything was removed.
    pub fn remove(&mut self, product_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.product.id != product_id);
        self.items.len() != before
    }

    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn buyer_fee(&self) -> f64 {
        if self.subtotal() > 0.0 {
            BUYER_FEE
        } else {
            0.0
        }
    }

    pub fn total(&self) -> f64 {
        let subtotal = self.subtotal();
        if subtotal > 0.0 {
            subtotal + BUYER_FEE
        } else {
            0.0
        }
    }

    /// Move the cart into (simulated) escrow.
    pub fn checkout(&mut self) -> Result<(), CheckoutError> {
        if self.step == CheckoutStep::Escrow {
            return Err(CheckoutError::AlreadyInEscrow);
        }
        if self.items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        self.step = CheckoutStep::Escrow;
        tracing::info!(items = self.items.len(), total = self.total(), "payment secured in escrow");
        Ok(())
    }

    /// Leave the escrow confirmation: the order is done, start a fresh cart.
    pub fn finish(&mut self) {
        self.items.clear();
        self.step = CheckoutStep::Cart;
    }
}

/// Fee breakdown shown while a seller fills in a listing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuote {
    pub price: f64,
    pub seller_fee: f64,
    pub payout: f64,
}

impl ListingQuote {
    /// Quote from whatever the seller typed. Unparseable input counts as 0.
    pub fn from_input(input: &str) -> Self {
        let price = input
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite())
            .unwrap_or(0.0);
        Self::for_price(price)
    }

    pub fn for_price(price: f64) -> Self {
        let seller_fee = price * SELLER_FEE_RATE;
        Self {
            price,
            seller_fee,
            payout: (price - seller_fee).max(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ListingStatus {
    #[default]
    Idle,
    Listed,
}

/// The sell form. Submitting only flips the status.
#[derive(Debug, Clone, Default)]
pub struct ListingDraft {
    price_input: String,
    status: ListingStatus,
}

impl ListingDraft {
    pub fn set_price(&mut self, input: impl Into<String>) {
        self.price_input = input.into();
    }

    pub fn quote(&self) -> ListingQuote {
        ListingQuote::from_input(&self.price_input)
    }

    pub fn status(&self) -> ListingStatus {
        self.status
    }

    pub fn submit(&mut self) -> ListingQuote {
        self.status = ListingStatus::Listed;
        self.quote()
    }

    /// "List another item".
    pub fn reset(&mut self) {
        self.price_input.clear();
        self.status = ListingStatus::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find_product;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_add_merges_by_id() {
        let mut cart = Cart::new();
        let chalk = find_product("5").unwrap();
        let cue = find_product("1").unwrap();

        cart.add(&chalk);
        cart.add(&cue);
        cart.add(&chalk);

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items()[0].quantity, 2);
        assert!(approx(cart.subtotal(), 12.99 * 2.0 + 450.0));
        assert!(approx(cart.total(), cart.subtotal() + BUYER_FEE));
    }

    #[test]
    fn test_empty_cart_has_no_fee() {
        let cart = Cart::new();
        assert_eq!(cart.buyer_fee(), 0.0);
        assert_eq!(cart.total(), 0.0);
    }

    #[test]
    fn test_remove_drops_whole_line() {
        let mut cart = Cart::new();
        let chalk = find_product("5").unwrap();
        cart.add(&chalk);
        cart.add(&chalk);
        assert!(cart.remove("5"));
        assert!(cart.is_empty());
        assert!(!cart.remove("5"));
    }

    #[test]
    fn test_checkout_flow() {
        let mut cart = Cart::new();
        assert_eq!(cart.checkout(), Err(CheckoutError::EmptyCart));

        cart.add(&find_product("2").unwrap());
        cart.checkout().unwrap();
        assert_eq!(cart.step(), CheckoutStep::Escrow);
        assert_eq!(cart.checkout(), Err(CheckoutError::AlreadyInEscrow));

        cart.finish();
        assert_eq!(cart.step(), CheckoutStep::Cart);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_listing_quote() {
        let quote = ListingQuote::from_input("200");
        assert!(approx(quote.seller_fee, 10.0));
        assert!(approx(quote.payout, 190.0));

        let junk = ListingQuote::from_input("abc");
        assert_eq!(junk.price, 0.0);
        assert_eq!(junk.payout, 0.0);

        let negative = ListingQuote::from_input("-20");
        assert_eq!(negative.payout, 0.0);
    }

    #[test]
    fn test_listing_draft_lifecycle() {
        let mut draft = ListingDraft::default();
        draft.set_price("80.5");
        let quote = draft.submit();
        assert_eq!(draft.status(), ListingStatus::Listed);
        assert!(approx(quote.payout, 80.5 * 0.95));

        draft.reset();
        assert_eq!(draft.status(), ListingStatus::Idle);
        assert_eq!(draft.quote().price, 0.0);
    }
}
