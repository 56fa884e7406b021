use crate::engine::GenerationRequest;
use crate::{AdvisoryQuery, Operation};

const ENCYCLOPEDIA_PERSONA: &str = "\
You are an expert encyclopedia and coach for Snooker, Billiards, and Pool. \
Provide accurate, historical, and technical information. \
Format your response with clear headers and bullet points where appropriate. \
Keep the tone professional yet accessible to enthusiasts. \
If the user asks about rules, be very specific about the foul penalties.";

const PRO_SHOP_PERSONA: &str = "\
You are an experienced pro shop advisor for cue sports equipment. \
Answer in plain prose, at most two sentences, with no headers or lists. \
Never invent prices, stock levels or brand claims.";

const COACH_PERSONA: &str = "\
You are a professional snooker and pool coach. \
Give practical, concrete advice about technique and mindset. \
Be concise: a short numbered list, no introduction, no closing remarks.";

const QUIZMASTER_PERSONA: &str = "\
You are a quizmaster for cue sports. Questions must be factually accurate \
and have exactly one correct option among four. \
Reply with a single JSON object and nothing else.";

/// The fixed instruction text for an operation.
pub fn system_prompt(operation: Operation) -> &'static str {
    match operation {
        Operation::Qa => ENCYCLOPEDIA_PERSONA,
        Operation::ProductAdvice => PRO_SHOP_PERSONA,
        Operation::DrillTip => COACH_PERSONA,
        Operation::Trivia => QUIZMASTER_PERSONA,
    }
}

pub fn user_message(query: &AdvisoryQuery) -> String {
    match query.operation() {
        // Sent verbatim: the view may show a shorter label.
        Operation::Qa => query.subject().to_string(),
        Operation::ProductAdvice => format!(
            "I am looking at a {} called \"{}\". \
Briefly tell me (in 2 sentences max) why a player might choose this type of equipment \
and what skill level it suits best.",
            query.context().unwrap_or("piece of equipment"),
            query.subject()
        ),
        Operation::DrillTip => format!(
            "I am practicing the \"{}\" drill. Give me 3 concise pro tips to master this specific drill. \
Focus on technique and mindset. Keep it under 100 words.",
            query.subject()
        ),
        Operation::Trivia => "\
Generate a challenging trivia question about Snooker or Professional Pool history, rules, or players. \
Return strictly JSON format: an object with \"question\" (string), \"options\" (array of exactly 4 strings), \
\"correctAnswer\" (integer index 0-3 of the correct option) and \"explanation\" (string)."
            .to_string(),
    }
}

/// Reply schema for trivia, in the JSON-schema subset structured-output
/// providers accept.
pub fn trivia_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "question": { "type": "string" },
            "options": {
                "type": "array",
                "items": { "type": "string" },
                "minItems": 4,
                "maxItems": 4
            },
            "correctAnswer": {
                "type": "integer",
                "description": "Index of the correct answer (0-3)",
                "minimum": 0,
                "maximum": 3
            },
            "explanation": { "type": "string" }
        },
        "required": ["question", "options", "correctAnswer", "explanation"],
        "additionalProperties": false
    })
}

/// Build the complete outbound request for a query.
pub fn build(query: &AdvisoryQuery) -> GenerationRequest {
    let operation = query.operation();
    GenerationRequest {
        system: system_prompt(operation).to_string(),
        content: user_message(query),
        schema: (operation == Operation::Trivia).then(trivia_schema),
    }
}
