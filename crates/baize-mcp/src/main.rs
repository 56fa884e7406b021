use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use baize_advisor::{
    Advisor, AdvisorConfig, AdvisoryBackend, LlmEngine, TriviaQuestion, UnconfiguredBackend,
};
use baize_core::commerce::{Cart, SHIPPING_COST};
use baize_core::{catalog, AiSettings, MarketFilter};
use baize_session::{Advice, Answer, LoadState, Storefront};

// --- Request types ---

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct ListProductsRequest {
    /// Marketplace tab: "all" (default), "snooker", "pool" or "accessory". Sport tabs include gear for both sports; "accessory" includes ball sets.
    filter: Option<MarketFilter>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct AskRequest {
    /// Free-text question about rules, history or technique
    question: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct GuideRequest {
    /// Guide title as returned by list_guides, e.g. "Stun Shot"
    title: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct ProductRequest {
    /// Product id as returned by list_products
    product_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct DrillRequest {
    /// Drill id as returned by list_drills
    drill_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct AnswerRequest {
    /// Zero-based index of the chosen option (0-3)
    index: usize,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct QuoteRequest {
    /// Asking price as typed by the seller. Unparseable input counts as 0.
    price: String,
    /// Submit the listing after quoting
    submit: Option<bool>,
}

// --- Server ---

#[derive(Clone)]
pub struct BaizeServer {
    store: Arc<Storefront>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl BaizeServer {
    pub fn new(advisor: Advisor) -> Self {
        Self {
            store: Arc::new(Storefront::new(advisor)),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "List pro shop products, optionally filtered by marketplace tab. Returns a JSON array of {id, name, price, category, sport, description, imageUrl, rating}.")]
    fn list_products(
        &self,
        Parameters(req): Parameters<ListProductsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let filter = req.filter.unwrap_or_default();
        let products: Vec<_> = catalog::products()
            .into_iter()
            .filter(|p| filter.matches(p))
            .collect();
        json_result(&products)
    }

    #[tool(description = "List training drills. Returns a JSON array of {id, title, difficulty, description, goal, type}.")]
    fn list_drills(&self) -> Result<CallToolResult, McpError> {
        json_result(&catalog::drills())
    }

    #[tool(description = "List encyclopedia guides: shot techniques and match situations. Pass a title to ask_guide.")]
    fn list_guides(&self) -> Result<CallToolResult, McpError> {
        json_result(&serde_json::json!({
            "shotGuides": catalog::shot_guides(),
            "situationGuides": catalog::situation_guides(),
        }))
    }

    #[tool(description = "Ask the cue-sports encyclopedia a question about rules, history, professional players or technique.")]
    async fn ask_encyclopedia(
        &self,
        Parameters(req): Parameters<AskRequest>,
    ) -> Result<CallToolResult, McpError> {
        let answer = self.store.ask(&req.question, None).await;
        Ok(answer_result(answer))
    }

    #[tool(description = "Ask the encyclopedia for a technique or situation guide by title (see list_guides).")]
    async fn ask_guide(
        &self,
        Parameters(req): Parameters<GuideRequest>,
    ) -> Result<CallToolResult, McpError> {
        match self.store.ask_guide(&req.title).await {
            Some(answer) => Ok(answer_result(answer)),
            None => Ok(CallToolResult::error(vec![Content::text(format!(
                "Guide '{}' not found",
                req.title
            ))])),
        }
    }

    #[tool(description = "Get short expert advice on a product: why a player might choose it and what skill level it suits. Advice is fetched once per product and then reused.")]
    async fn product_advice(
        &self,
        Parameters(req): Parameters<ProductRequest>,
    ) -> Result<CallToolResult, McpError> {
        let advice = self.store.product_advice(&req.product_id).await;
        Ok(advice_result(advice, "Product", &req.product_id))
    }

    #[tool(description = "Get coaching tips for a drill. Tips are fetched once per drill and then reused.")]
    async fn drill_tip(
        &self,
        Parameters(req): Parameters<DrillRequest>,
    ) -> Result<CallToolResult, McpError> {
        let advice = self.store.drill_tip(&req.drill_id).await;
        Ok(advice_result(advice, "Drill", &req.drill_id))
    }

    #[tool(description = "Show today's trivia question with its four numbered options. Answer with answer_trivia.")]
    async fn daily_trivia(&self) -> Result<CallToolResult, McpError> {
        let question = self.store.daily_trivia().await;
        Ok(CallToolResult::success(vec![Content::text(format_trivia(
            &question,
        ))]))
    }

    #[tool(description = "Lock in an answer to today's trivia question. Only the first answer counts.")]
    async fn answer_trivia(
        &self,
        Parameters(req): Parameters<AnswerRequest>,
    ) -> Result<CallToolResult, McpError> {
        let Some(correct) = self.store.answer_trivia(req.index).await else {
            return Ok(CallToolResult::error(vec![Content::text(
                "An answer is already locked in, or the index is not between 0 and 3",
            )]));
        };
        let question = self.store.daily_trivia().await;
        let text = match (correct, question.correct_option()) {
            (true, _) => format!("Correct! {}", question.explanation),
            (false, Some(option)) => format!(
                "Not quite. The answer was {}. {}",
                option, question.explanation
            ),
            (false, None) => format!("Not quite. {}", question.explanation),
        };
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Add one unit of a product to the cart. Adding the same product again increases its quantity.")]
    fn add_to_cart(
        &self,
        Parameters(req): Parameters<ProductRequest>,
    ) -> Result<CallToolResult, McpError> {
        let Some(product) = catalog::find_product(&req.product_id) else {
            return Ok(not_found("Product", &req.product_id));
        };
        let mut cart = self.store.cart();
        cart.add(&product);
        json_result(&cart_summary(&cart))
    }

    #[tool(description = "Remove a product line from the cart.")]
    fn remove_from_cart(
        &self,
        Parameters(req): Parameters<ProductRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut cart = self.store.cart();
        if !cart.remove(&req.product_id) {
            return Ok(CallToolResult::error(vec![Content::text(format!(
                "Product '{}' is not in the cart",
                req.product_id
            ))]));
        }
        json_result(&cart_summary(&cart))
    }

    #[tool(description = "Show the cart: items, subtotal, buyer service fee, shipping and total, plus the checkout step.")]
    fn view_cart(&self) -> Result<CallToolResult, McpError> {
        json_result(&cart_summary(&self.store.cart()))
    }

    #[tool(description = "Pay into escrow. Funds are held until the buyer confirms receipt. Refused for an empty cart.")]
    fn checkout(&self) -> Result<CallToolResult, McpError> {
        let mut cart = self.store.cart();
        match cart.checkout() {
            Ok(()) => Ok(CallToolResult::success(vec![Content::text(format!(
                "Payment of ${:.2} secured in escrow. The seller has been notified to ship your items.",
                cart.total()
            ))])),
            Err(e) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
        }
    }

    #[tool(description = "Leave the escrow confirmation and start a fresh cart.")]
    fn finish_checkout(&self) -> Result<CallToolResult, McpError> {
        self.store.cart().finish();
        Ok(CallToolResult::success(vec![Content::text("Cart cleared.")]))
    }

    #[tool(description = "Quote a marketplace listing: the 5% seller fee and the payout. Set submit to list the item.")]
    fn quote_listing(
        &self,
        Parameters(req): Parameters<QuoteRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut listing = self.store.listing();
        listing.reset();
        listing.set_price(req.price);
        let quote = if req.submit.unwrap_or(false) {
            listing.submit()
        } else {
            listing.quote()
        };
        json_result(&serde_json::json!({
            "quote": quote,
            "status": listing.status(),
        }))
    }
}

#[tool_handler]
impl ServerHandler for BaizeServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// --- Helpers ---

fn json_result<T: serde::Serialize + ?Sized>(value: &T) -> Result<CallToolResult, McpError> {
    match serde_json::to_string_pretty(value) {
        Ok(json) => Ok(CallToolResult::success(vec![Content::text(json)])),
        Err(e) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
    }
}

fn not_found(kind: &str, id: &str) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("{kind} '{id}' not found"))])
}

fn advice_result(advice: Option<Advice>, kind: &str, id: &str) -> CallToolResult {
    match advice {
        Some(Advice::Ready(text)) => CallToolResult::success(vec![Content::text(text)]),
        Some(Advice::Pending) => CallToolResult::error(vec![Content::text(format!(
            "Advice for {} '{}' is still loading",
            kind.to_lowercase(),
            id
        ))]),
        None => not_found(kind, id),
    }
}

fn answer_result(answer: Answer) -> CallToolResult {
    match (answer.state, answer.text) {
        (LoadState::Success, Some(text)) => CallToolResult::success(vec![Content::text(text)]),
        (LoadState::Error, Some(message)) => CallToolResult::error(vec![Content::text(message)]),
        (LoadState::Loading, _) => CallToolResult::error(vec![Content::text(
            "The archives are still answering the previous question",
        )]),
        _ => CallToolResult::error(vec![Content::text("Question must not be empty")]),
    }
}

fn format_trivia(question: &TriviaQuestion) -> String {
    let options: Vec<String> = question
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| format!("{i}. {option}"))
        .collect();
    format!("{}\n\n{}", question.question, options.join("\n"))
}

fn cart_summary(cart: &Cart) -> serde_json::Value {
    serde_json::json!({
        "items": cart.items(),
        "subtotal": cart.subtotal(),
        "buyerFee": cart.buyer_fee(),
        "shipping": SHIPPING_COST,
        "total": cart.total(),
        "step": cart.step(),
    })
}

/// Pick the production backend, or one that reports itself unavailable so
/// every advisory tool degrades to its default text.
fn build_advisor(settings: &AiSettings) -> Advisor {
    let backend: Arc<dyn AdvisoryBackend> = if !baize_core::ai_configured(settings) {
        warn!("no AI provider configured; advisory tools will return default text");
        Arc::new(UnconfiguredBackend)
    } else {
        match LlmEngine::from_settings(settings) {
            Ok(engine) => Arc::new(engine),
            Err(e) => {
                warn!(error = %e, "could not build AI backend; advisory tools will return default text");
                Arc::new(UnconfiguredBackend)
            }
        }
    };
    Advisor::new(backend).with_config(AdvisorConfig::from_settings(settings))
}

const INSTRUCTIONS: &str = r#"Baize is a cue-sports storefront with built-in AI advisors.

- Browse with `list_products`, `list_drills` and `list_guides`.
- `ask_encyclopedia` and `ask_guide` answer rules, history and technique questions. These are the only tools that report a failed AI call as an error; retry later.
- `product_advice` and `drill_tip` always return usable text. Results are cached for the session, so asking twice costs nothing.
- `daily_trivia` shows one question per session; `answer_trivia` accepts only the first answer.
- Shopping: `add_to_cart`, `remove_from_cart`, `view_cart`, `checkout` (escrow), `finish_checkout`.
- Selling: `quote_listing` shows the 5% marketplace fee and the payout."#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the MCP transport.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = baize_core::read_settings().with_env_key();
    let advisor = build_advisor(&settings);
    info!(backend = advisor.backend_id(), "starting baize MCP server");

    let service = BaizeServer::new(advisor)
        .serve(rmcp::transport::io::stdio())
        .await
        .inspect_err(|e| eprintln!("MCP server error: {}", e))?;
    service.waiting().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use baize_advisor::fallback;

    #[test]
    fn test_format_trivia_numbers_options() {
        let text = format_trivia(&fallback::fallback_trivia());
        assert!(text.contains("0. 147"));
        assert!(text.contains("3. 150"));
        assert!(!text.contains("explanation"));
    }

    #[test]
    fn test_cart_summary() {
        let mut cart = Cart::new();
        assert_eq!(cart_summary(&cart)["total"], 0.0);

        cart.add(&catalog::find_product("1").unwrap());
        let summary = cart_summary(&cart);
        assert_eq!(summary["buyerFee"], 1.0);
        assert_eq!(summary["items"].as_array().map(Vec::len), Some(1));
        assert_eq!(summary["step"], "cart");
    }

    #[test]
    fn test_drill_listing_fields() {
        let json = serde_json::to_value(catalog::drills()).unwrap();
        let mut keys: Vec<&str> = json[0]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        assert_eq!(keys, ["description", "difficulty", "goal", "id", "title", "type"]);
    }

    #[test]
    fn test_unconfigured_settings_degrade() {
        let settings = AiSettings {
            api_key: String::new(),
            ..AiSettings::default()
        };
        let advisor = build_advisor(&settings);
        assert_eq!(advisor.backend_id(), UnconfiguredBackend.id());
    }
}
