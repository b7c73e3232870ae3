//! JSON boundary extraction — recovers the structured payload embedded in
//! raw model output.
//!
//! Generative models are not contractually bound to return pure JSON: the
//! payload may be wrapped in prose, markdown fences, or both. A naive
//! first-`{`-to-last-`}` slice breaks when braces appear inside string
//! values or when the text holds several independent structures, so
//! extraction runs a string- and escape-aware depth scan instead.

use thiserror::Error;

/// Which bracket pair to try first when scanning for a structure.
///
/// Most response shapes here are object-shaped, so object-first is the
/// default; list-shaped endpoints opt into array-first via their schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BracketPreference {
    #[default]
    ObjectFirst,
    ArrayFirst,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no balanced JSON structure found in model output")]
    NoJsonFound,

    #[error("extracted text is not valid JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),
}

/// Locates the first syntactically complete JSON object or array in `text`
/// and returns the exact substring spanning it, opening bracket through
/// matching close. Tries objects before arrays.
pub fn extract(text: &str) -> Result<&str, ExtractError> {
    extract_with(text, BracketPreference::ObjectFirst)
}

/// `extract` with an explicit bracket preference.
pub fn extract_with(text: &str, preference: BracketPreference) -> Result<&str, ExtractError> {
    let text = strip_fences(text);
    let (first, second) = match preference {
        BracketPreference::ObjectFirst => (('{', '}'), ('[', ']')),
        BracketPreference::ArrayFirst => (('[', ']'), ('{', '}')),
    };
    balanced_span(text, first.0, first.1)
        .or_else(|| balanced_span(text, second.0, second.1))
        .ok_or(ExtractError::NoJsonFound)
}

/// Parses an extracted literal, surfacing the parser's diagnostic on
/// failure. Separate from `extract` because the failure modes are distinct:
/// structural absence vs. syntactic invalidity.
pub fn parse(literal: &str) -> Result<serde_json::Value, ExtractError> {
    Ok(serde_json::from_str(literal)?)
}

/// Strips a leading ```json (or bare ```) fence line and a trailing fence
/// from model output. Absent fences are not an error.
fn strip_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(body) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the rest of the fence line (optional language tag).
    let body = match body.find('\n') {
        Some(i) => &body[i + 1..],
        None => body,
    };
    match body.strip_suffix("```") {
        Some(inner) => inner.trim(),
        None => body.trim(),
    }
}

/// Scans for the first balanced `open`..`close` span. Brackets inside
/// string literals never affect depth: a `"` toggles the in-string flag
/// unless preceded by a backslash, and the escape flag suppresses the
/// character immediately following a backslash.
fn balanced_span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            _ if c == open => depth += 1,
            _ if c == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    // Depth never returned to zero (or an unterminated string swallowed the
    // rest of the input): the structure is incomplete.
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_fenced_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(extract(input).unwrap(), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_extract_fenced_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(extract(input).unwrap(), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_extract_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(extract(input).unwrap(), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_extract_object_surrounded_by_prose() {
        let input = "Sure, here you go: {\"a\": 1} Hope that helps!";
        assert_eq!(extract(input).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_prose_then_fenced_block() {
        let input = "Here is the result:\n```json\n{\"match\": 150, \"title\": \"Engineer\"}\n```\n";
        assert_eq!(
            extract(input).unwrap(),
            "{\"match\": 150, \"title\": \"Engineer\"}"
        );
    }

    #[test]
    fn test_extract_ignores_escaped_quote_in_string() {
        let input = "prose before {\"a\":\"x\\\"y\"} prose after";
        let literal = extract(input).unwrap();
        assert_eq!(literal, "{\"a\":\"x\\\"y\"}");
        assert_eq!(parse(literal).unwrap(), json!({"a": "x\"y"}));
    }

    #[test]
    fn test_extract_ignores_brace_inside_string() {
        let input = "{\"a\": \"}\", \"b\": 2}";
        assert_eq!(extract(input).unwrap(), input);
    }

    #[test]
    fn test_extract_ignores_bracket_inside_string() {
        let input = "pick [\"a]b\", \"c\"] done";
        assert_eq!(extract(input).unwrap(), "[\"a]b\", \"c\"]");
    }

    #[test]
    fn test_extract_nested_object() {
        let input = "{\"outer\": {\"inner\": [1, 2]}} trailing";
        assert_eq!(extract(input).unwrap(), "{\"outer\": {\"inner\": [1, 2]}}");
    }

    #[test]
    fn test_extract_first_of_two_structures() {
        let input = "{\"a\": 1} and also {\"b\": 2}";
        assert_eq!(extract(input).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_array_when_no_object() {
        let input = "The list: [1, 2, 3].";
        assert_eq!(extract(input).unwrap(), "[1, 2, 3]");
    }

    #[test]
    fn test_extract_object_first_preference() {
        // An array appears earlier, but object-first still picks the object.
        let input = "[1, 2] then {\"a\": 1}";
        assert_eq!(extract(input).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_array_first_preference() {
        let input = "{\"a\": 1} then [1, 2]";
        assert_eq!(
            extract_with(input, BracketPreference::ArrayFirst).unwrap(),
            "[1, 2]"
        );
    }

    #[test]
    fn test_extract_empty_input_fails() {
        assert!(matches!(extract(""), Err(ExtractError::NoJsonFound)));
    }

    #[test]
    fn test_extract_whitespace_only_fails() {
        assert!(matches!(extract("  \n\t "), Err(ExtractError::NoJsonFound)));
    }

    #[test]
    fn test_extract_refusal_text_fails() {
        let input = "I cannot comply with this request.";
        assert!(matches!(extract(input), Err(ExtractError::NoJsonFound)));
    }

    #[test]
    fn test_extract_fence_with_no_bracket_fails() {
        let input = "```json\nnot json at all\n```";
        assert!(matches!(extract(input), Err(ExtractError::NoJsonFound)));
    }

    #[test]
    fn test_extract_unterminated_object_fails() {
        let input = "{\"a\": {\"b\": 1}";
        assert!(matches!(extract(input), Err(ExtractError::NoJsonFound)));
    }

    #[test]
    fn test_extract_unterminated_string_fails() {
        // The open quote swallows the closing brace, so depth never closes.
        let input = "{\"a\": \"unterminated}";
        assert!(matches!(extract(input), Err(ExtractError::NoJsonFound)));
    }

    #[test]
    fn test_parse_round_trips_extracted_literal() {
        let input = "```json\n{\"scores\": [1, 2, 3], \"ok\": true}\n```";
        let value = parse(extract(input).unwrap()).unwrap();
        assert_eq!(value, json!({"scores": [1, 2, 3], "ok": true}));
    }

    #[test]
    fn test_parse_balanced_but_invalid_json() {
        // Bracket-balanced, but trailing comma: must be MalformedJson, not
        // NoJsonFound.
        let literal = extract("{\"a\": 1,}").unwrap();
        assert!(matches!(parse(literal), Err(ExtractError::MalformedJson(_))));
    }

    #[test]
    fn test_parse_unquoted_keys_is_malformed() {
        let literal = extract("{a: 1}").unwrap();
        assert!(matches!(parse(literal), Err(ExtractError::MalformedJson(_))));
    }
}
