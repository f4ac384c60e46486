//! Response repair and normalization for generated learning data
//!
//! Language models often wrap the JSON they were asked for in prose or code
//! fences. [`extract_json`] recovers the object using these rules, in order:
//!
//! 1. the trimmed text parsed as strict JSON;
//! 2. the first balanced top-level `{ ... }` block (string and escape aware);
//! 3. the widest `{ ... }` span, first `{` to last `}`.
//!
//! If none parses, the response is malformed. [`normalize`] then applies the
//! hard caps: questions to `max(count, 5)`, concepts to 12 non-empty strings.

use super::types::{GenerationResult, QuizQuestion, MAX_CONCEPTS};
use crate::error::{Error, Result};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Recover a JSON value from raw model or service output
pub fn extract_json(text: &str) -> Result<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::MalformedResponse("empty response".to_string()));
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    if let Some(block) = first_object_block(trimmed) {
        if let Ok(value) = serde_json::from_str::<Value>(block) {
            tracing::debug!("Recovered JSON object embedded in prose");
            return Ok(value);
        }
    }

    if let Some(span) = widest_object_span(trimmed) {
        if let Ok(value) = serde_json::from_str::<Value>(span) {
            tracing::debug!("Recovered JSON object from widest brace span");
            return Ok(value);
        }
    }

    Err(Error::MalformedResponse(format!(
        "no JSON object found in response ({} chars)",
        trimmed.chars().count()
    )))
}

/// Parse raw output into a normalized [`GenerationResult`]
pub fn parse_generation_output(text: &str, question_cap: usize) -> Result<GenerationResult> {
    normalize(extract_json(text)?, question_cap)
}

/// Validate the schema and apply the truncation caps
pub fn normalize(value: Value, question_cap: usize) -> Result<GenerationResult> {
    let obj = match value {
        Value::Object(map) => map,
        other => {
            return Err(Error::MalformedResponse(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            )))
        }
    };

    Ok(GenerationResult {
        questions: normalize_questions(&obj, question_cap)?,
        concepts: normalize_concepts(&obj)?,
    })
}

fn normalize_questions(obj: &Map<String, Value>, cap: usize) -> Result<Option<Vec<QuizQuestion>>> {
    let items = match obj.get("questions") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(Error::MalformedResponse(format!(
                "'questions' must be an array, got {}",
                json_type_name(other)
            )))
        }
    };

    let mut questions = Vec::with_capacity(items.len().min(cap));
    for (idx, item) in items.iter().enumerate() {
        if questions.len() == cap {
            break;
        }
        match serde_json::from_value::<QuizQuestion>(item.clone()) {
            Ok(q) if q.is_valid() => questions.push(q),
            Ok(q) => tracing::warn!(
                index = idx,
                options = q.options.len(),
                correct_index = q.correct_index,
                "Dropping quiz question that violates the four-option invariant"
            ),
            Err(e) => tracing::warn!(index = idx, error = %e, "Dropping unparseable quiz question"),
        }
    }

    Ok(Some(questions))
}

fn normalize_concepts(obj: &Map<String, Value>) -> Result<Option<Vec<String>>> {
    let items = match obj.get("concepts") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(Error::MalformedResponse(format!(
                "'concepts' must be an array, got {}",
                json_type_name(other)
            )))
        }
    };

    let concepts = items
        .iter()
        .take(MAX_CONCEPTS)
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    Ok(Some(concepts))
}

/// Slice of the first balanced `{ ... }` block, ignoring braces inside strings
fn first_object_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

fn widest_object_span(text: &str) -> Option<&str> {
    static SPAN: OnceLock<Option<Regex>> = OnceLock::new();
    SPAN.get_or_init(|| Regex::new(r"(?s)\{.*\}").ok())
        .as_ref()?
        .find(text)
        .map(|m| m.as_str())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn question(n: usize) -> Value {
        json!({
            "question": format!("Question {}?", n),
            "options": ["a", "b", "c", "d"],
            "correctIndex": n % 4,
            "explanation": "because"
        })
    }

    #[test]
    fn test_strict_json() {
        let result = parse_generation_output(r#"{"concepts":["A","B"]}"#, 5).unwrap();
        assert_eq!(result.concepts(), ["A", "B"]);
        assert!(result.questions.is_none());
    }

    #[test]
    fn test_json_embedded_in_prose() {
        let result =
            parse_generation_output(r#"Here you go: {"concepts":["A","B"]}"#, 5).unwrap();
        assert_eq!(result.concepts, Some(vec!["A".to_string(), "B".to_string()]));
    }

    #[test]
    fn test_json_in_code_fence_with_trailing_prose() {
        let text = "```json\n{\"concepts\": [\"Cell\"]}\n```\nLet me know if you need more {help}.";
        let result = parse_generation_output(text, 5).unwrap();
        assert_eq!(result.concepts(), ["Cell"]);
    }

    #[test]
    fn test_braces_inside_strings() {
        let text = r#"Sure! {"concepts": ["set {x}", "a \"quoted\" }"]} trailing }"#;
        let result = parse_generation_output(text, 5).unwrap();
        assert_eq!(result.concepts(), ["set {x}", "a \"quoted\" }"]);
    }

    #[test]
    fn test_fallback_rules() {
        // Balanced scan stops at the first object, which is not valid JSON
        let text = "note {not json} then {\"concepts\": [\"A\"]}";
        assert!(first_object_block(text).is_some());
        let value = extract_json(text);
        // Widest span is "{not json} then {...}" which is not JSON either
        assert!(matches!(value, Err(Error::MalformedResponse(_))));

        let text = "prefix {\"concepts\": [\"A\"], \"extra\": {\"k\": 1}} suffix";
        assert_eq!(extract_json(text).unwrap()["concepts"][0], "A");
    }

    #[test]
    fn test_no_json() {
        assert!(matches!(
            extract_json("I could not generate anything."),
            Err(Error::MalformedResponse(_))
        ));
        assert!(matches!(extract_json("   "), Err(Error::MalformedResponse(_))));
        assert!(matches!(extract_json("{unterminated"), Err(Error::MalformedResponse(_))));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(matches!(
            parse_generation_output(r#"["A","B"]"#, 5),
            Err(Error::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_wrong_field_types_rejected() {
        assert!(matches!(
            parse_generation_output(r#"{"concepts":"A, B"}"#, 5),
            Err(Error::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_generation_output(r#"{"questions":{"q":1}}"#, 5),
            Err(Error::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_concepts_capped_and_filtered() {
        let mut concepts: Vec<Value> = (0..15).map(|i| json!(format!("C{}", i))).collect();
        concepts[1] = json!("   ");
        concepts[2] = json!(42);
        let result = normalize(json!({ "concepts": concepts }), 5).unwrap();

        // First 12 entries kept, then two non-usable ones removed
        assert_eq!(result.concepts().len(), 10);
        assert_eq!(result.concepts()[0], "C0");
        assert_eq!(result.concepts()[1], "C3");
        assert_eq!(result.concepts().last().unwrap(), "C11");
    }

    #[test]
    fn test_questions_capped_at_max_count_five() {
        let questions: Vec<Value> = (0..10).map(question).collect();
        let value = json!({ "questions": questions });

        assert_eq!(normalize(value.clone(), 5).unwrap().questions().len(), 5);
        assert_eq!(normalize(value.clone(), 8).unwrap().questions().len(), 8);
        assert_eq!(normalize(value, 20).unwrap().questions().len(), 10);
    }

    #[test]
    fn test_invalid_questions_dropped() {
        let value = json!({
            "questions": [
                question(0),
                {"question": "Three options?", "options": ["a", "b", "c"], "correctIndex": 0, "explanation": ""},
                {"question": "Out of range?", "options": ["a", "b", "c", "d"], "correctIndex": 7, "explanation": ""},
                {"question": "Negative?", "options": ["a", "b", "c", "d"], "correctIndex": -1, "explanation": ""},
                {"prompt": "wrong shape"},
                question(1)
            ]
        });
        let result = normalize(value, 5).unwrap();
        let texts: Vec<_> = result.questions().iter().map(|q| q.question.as_str()).collect();
        assert_eq!(texts, ["Question 0?", "Question 1?"]);
    }

    #[test]
    fn test_null_fields_are_absent() {
        let result = normalize(json!({"questions": null, "concepts": null}), 5).unwrap();
        assert!(result.questions.is_none());
        assert!(result.concepts.is_none());
        assert!(result.is_empty());
    }
}
