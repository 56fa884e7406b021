use serde::Deserialize;

use crate::error::SchemaError;
use crate::TriviaQuestion;

/// Trivia reply as the model sent it. Everything optional so that missing
/// fields are reported by name instead of as a serde error.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LlmTrivia {
    question: Option<String>,
    options: Option<Vec<String>>,
    correct_answer: Option<i64>,
    explanation: Option<String>,
}

/// Extract the JSON object substring from raw LLM output (models like to
/// wrap it in code fences or a sentence).
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&raw[start..=end])
}

fn required(value: Option<String>, field: &'static str) -> Result<String, SchemaError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(SchemaError::MissingField(field)),
    }
}

/// Decode and validate a trivia reply.
pub fn parse_trivia(raw: &str) -> Result<TriviaQuestion, SchemaError> {
    let json_str = extract_json_object(raw).ok_or(SchemaError::NoJson)?;
    let llm: LlmTrivia =
        serde_json::from_str(json_str).map_err(|e| SchemaError::Malformed(e.to_string()))?;

    let question = required(llm.question, "question")?;
    let options = llm.options.ok_or(SchemaError::MissingField("options"))?;
    let correct = llm
        .correct_answer
        .ok_or(SchemaError::MissingField("correctAnswer"))?;
    let explanation = required(llm.explanation, "explanation")?;

    if let Some(i) = options.iter().position(|o| o.trim().is_empty()) {
        return Err(SchemaError::EmptyOption(i));
    }
    let count = options.len();
    let options: [String; 4] = options
        .try_into()
        .map_err(|_| SchemaError::OptionCount(count))?;

    let correct_answer = usize::try_from(correct)
        .ok()
        .filter(|i| *i < options.len())
        .ok_or(SchemaError::AnswerOutOfRange(correct))?;

    Ok(TriviaQuestion {
        question,
        options,
        correct_answer,
        explanation,
    })
}

/// Free-text replies only need to be non-blank.
pub fn parse_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "question": "Who made the first televised 147?",
        "options": ["Steve Davis", "Cliff Thorburn", "Ronnie O'Sullivan", "Stephen Hendry"],
        "correctAnswer": 0,
        "explanation": "Steve Davis, Lada Classic 1982."
    }"#;

    #[test]
    fn test_valid_reply() {
        let q = parse_trivia(VALID).unwrap();
        assert_eq!(q.options.len(), 4);
        assert_eq!(q.correct_answer, 0);
        assert_eq!(q.correct_option(), Some("Steve Davis"));
    }

    #[test]
    fn test_fenced_reply() {
        let raw = format!("Here you go:\n```json\n{VALID}\n```");
        assert!(parse_trivia(&raw).is_ok());
    }

    #[test]
    fn test_three_options_rejected() {
        let raw = r#"{"question":"q","options":["a","b","c"],"correctAnswer":0,"explanation":"e"}"#;
        assert_eq!(parse_trivia(raw), Err(SchemaError::OptionCount(3)));
    }

    #[test]
    fn test_answer_out_of_range() {
        let raw = r#"{"question":"q","options":["a","b","c","d"],"correctAnswer":5,"explanation":"e"}"#;
        assert_eq!(parse_trivia(raw), Err(SchemaError::AnswerOutOfRange(5)));

        let raw = r#"{"question":"q","options":["a","b","c","d"],"correctAnswer":-1,"explanation":"e"}"#;
        assert_eq!(parse_trivia(raw), Err(SchemaError::AnswerOutOfRange(-1)));
    }

    #[test]
    fn test_missing_and_empty_fields() {
        let raw = r#"{"options":["a","b","c","d"],"correctAnswer":1,"explanation":"e"}"#;
        assert_eq!(parse_trivia(raw), Err(SchemaError::MissingField("question")));

        let raw = r#"{"question":"q","options":["a","b","c","d"],"correctAnswer":1,"explanation":"  "}"#;
        assert_eq!(parse_trivia(raw), Err(SchemaError::MissingField("explanation")));

        let raw = r#"{"question":"q","options":["a","","c","d"],"correctAnswer":1,"explanation":"e"}"#;
        assert_eq!(parse_trivia(raw), Err(SchemaError::EmptyOption(1)));
    }

    #[test]
    fn test_not_json() {
        assert_eq!(parse_trivia("no idea"), Err(SchemaError::NoJson));
        assert!(matches!(
            parse_trivia("{\"question\": }"),
            Err(SchemaError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_text() {
        assert_eq!(parse_text("  \n "), None);
        assert_eq!(parse_text(" Chalk up. \n").as_deref(), Some("Chalk up."));
    }
}
