//! Fixed substitutes used when an advisory call produces nothing usable.
//!
//! Trivia always degrades to a playable question. The text operations
//! degrade to a sentence that tells the user the advice is unavailable.

use crate::{AdvisoryResult, Operation, TriviaQuestion};

/// Shown by the encyclopedia's error state.
pub const ENCYCLOPEDIA_ERROR: &str =
    "An error occurred while consulting the archives. Please try again later.";
pub const PRODUCT_ADVICE_ERROR: &str = "Could not retrieve expert advice.";
pub const DRILL_TIP_ERROR: &str = "Practice makes perfect. Focus on your cue action.";

/// Substitutes for a reply that arrived but was blank.
pub const EMPTY_ENCYCLOPEDIA: &str = "I apologize, I couldn't generate a response at this time.";
pub const EMPTY_PRODUCT_ADVICE: &str = "No advice available for this item.";
pub const EMPTY_DRILL_TIP: &str = "Keep your head still and follow through!";

pub fn fallback_trivia() -> TriviaQuestion {
    TriviaQuestion {
        question: "What is the maximum break possible in a standard frame of Snooker without a free ball?"
            .to_string(),
        options: [
            "147".to_string(),
            "155".to_string(),
            "140".to_string(),
            "150".to_string(),
        ],
        correct_answer: 0,
        explanation: "147 is the maximum standard break (15 reds, 15 blacks, and all colors)."
            .to_string(),
    }
}

/// Substitute for a failed call.
pub fn for_failure(operation: Operation) -> AdvisoryResult {
    match operation {
        Operation::Qa => AdvisoryResult::text(ENCYCLOPEDIA_ERROR),
        Operation::ProductAdvice => AdvisoryResult::text(PRODUCT_ADVICE_ERROR),
        Operation::DrillTip => AdvisoryResult::text(DRILL_TIP_ERROR),
        Operation::Trivia => AdvisoryResult::Trivia(fallback_trivia()),
    }
}

/// Substitute for a blank reply.
pub fn for_empty(operation: Operation) -> AdvisoryResult {
    match operation {
        Operation::Qa => AdvisoryResult::text(EMPTY_ENCYCLOPEDIA),
        Operation::ProductAdvice => AdvisoryResult::text(EMPTY_PRODUCT_ADVICE),
        Operation::DrillTip => AdvisoryResult::text(EMPTY_DRILL_TIP),
        Operation::Trivia => AdvisoryResult::Trivia(fallback_trivia()),
    }
}
