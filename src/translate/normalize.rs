//! Two-stage decoding of chat completions whose `content` carries JSON.
//!
//! Stage one decodes the envelope with `content` as a plain string, stage
//! two strips any markdown code fence from that string and decodes the
//! embedded `{"translations":[{"text":..}]}` payload.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TranslationError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub refusal: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationPayload {
    pub translations: Vec<TranslatedText>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedText {
    pub text: String,
}

/// Stage one: the outer chat completion envelope.
pub fn decode_envelope(body: &[u8]) -> Result<ChatCompletion, TranslationError> {
    serde_json::from_slice(body)
        .map_err(|e| TranslationError::Decode(format!("chat completion envelope: {}", e)))
}

/// Remove a surrounding markdown code fence (with or without a language
/// tag) and the whitespace around it.
pub fn strip_code_fence(content: &str) -> &str {
    let mut text = content.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Drop an info string such as `json`; the payload itself starts
        // with `{` or `[`, never with a letter.
        let tag_len = rest
            .find(|c: char| !c.is_ascii_alphanumeric() && c != '-' && c != '_')
            .unwrap_or(rest.len());
        text = rest[tag_len..].trim_start();
    }

    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

/// Stage two: the payload embedded in the message content.
pub fn decode_translations(content: &str) -> Result<TranslationPayload, TranslationError> {
    let cleaned = strip_code_fence(content);
    debug!("Embedded translation payload: {}", cleaned);
    serde_json::from_str(cleaned)
        .map_err(|e| TranslationError::Decode(format!("embedded translations JSON: {}", e)))
}

/// Decode a full chat completion body into translated strings in order.
///
/// Fails on refusals, missing content and a count that differs from
/// `expected`.
pub fn translations_from_completion(
    body: &[u8],
    expected: usize,
) -> Result<Vec<String>, TranslationError> {
    let completion = decode_envelope(body)?;

    let choice = completion
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| TranslationError::UnexpectedResponse("no choices in completion".to_string()))?;

    if let Some(refusal) = choice.message.refusal {
        return Err(TranslationError::Refusal(refusal));
    }

    let content = choice.message.content.ok_or_else(|| {
        TranslationError::UnexpectedResponse(format!(
            "completion has no content (finish reason: {})",
            choice.finish_reason.as_deref().unwrap_or("unknown")
        ))
    })?;

    let payload = decode_translations(&content)?;
    if payload.translations.len() != expected {
        return Err(TranslationError::AlignmentMismatch {
            expected,
            actual: payload.translations.len(),
        });
    }

    Ok(payload.translations.into_iter().map(|t| t.text).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn completion(content: serde_json::Value, refusal: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content, "refusal": refusal},
                "finish_reason": "stop"
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_fenced_json_with_tag() {
        let content = "```json\n{\"translations\":[{\"text\":\"Wie alt bist du?\"}]}\n```";
        let payload = decode_translations(content).unwrap();
        assert_eq!(payload.translations[0].text, "Wie alt bist du?");
    }

    #[test]
    fn test_strip_fence_variants() {
        let expected = r#"{"a":1}"#;
        assert_eq!(strip_code_fence(r#"{"a":1}"#), expected);
        assert_eq!(strip_code_fence("  {\"a\":1}\n"), expected);
        assert_eq!(strip_code_fence("```\n{\"a\":1}\n```"), expected);
        assert_eq!(strip_code_fence("```JSON\r\n{\"a\":1}\r\n```\r\n"), expected);
        assert_eq!(strip_code_fence("```json{\"a\":1}```"), expected);
        assert_eq!(strip_code_fence("\n\n```json\n  {\"a\":1}  \n```  "), expected);
    }

    #[test]
    fn test_strip_fence_with_only_opening_marker() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}"), r#"{"a":1}"#);
    }

    #[test]
    fn test_envelope_keeps_content_as_string() {
        let body = completion(json!("{\"translations\":[]}"), json!(null));
        let envelope = decode_envelope(&body).unwrap();
        assert_eq!(envelope.id.as_deref(), Some("chatcmpl-123"));
        assert_eq!(envelope.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(envelope.choices[0].message.role, "assistant");
        assert_eq!(
            envelope.choices[0].message.content.as_deref(),
            Some("{\"translations\":[]}")
        );
        assert_eq!(envelope.choices[0].finish_reason.as_deref(), Some("stop"));
    }

    #[test]
    fn test_envelope_decode_failure() {
        let err = decode_envelope(b"not json").unwrap_err();
        assert!(matches!(err, TranslationError::Decode(_)));
    }

    #[test]
    fn test_inner_decode_failure() {
        let body = completion(json!("Sure! Here are your translations."), json!(null));
        let err = translations_from_completion(&body, 1).unwrap_err();
        assert!(matches!(err, TranslationError::Decode(message) if message.contains("embedded")));
    }

    #[test]
    fn test_translations_in_order() {
        let body = completion(
            json!("```json\n{\"translations\":[{\"text\":\"Liebe\"},{\"text\":\"Erledigt\"}]}\n```"),
            json!(null),
        );
        let texts = translations_from_completion(&body, 2).unwrap();
        assert_eq!(texts, vec!["Liebe", "Erledigt"]);
    }

    #[test]
    fn test_refusal_is_an_error() {
        let body = completion(json!(null), json!("I can't help with that."));
        let err = translations_from_completion(&body, 1).unwrap_err();
        assert_eq!(err, TranslationError::Refusal("I can't help with that.".to_string()));
    }

    #[test]
    fn test_count_mismatch() {
        let body = completion(json!("{\"translations\":[{\"text\":\"Liebe\"}]}"), json!(null));
        let err = translations_from_completion(&body, 3).unwrap_err();
        assert_eq!(err, TranslationError::AlignmentMismatch { expected: 3, actual: 1 });
    }

    #[test]
    fn test_no_choices() {
        let body = br#"{"id":"x","model":"m","choices":[]}"#;
        let err = translations_from_completion(body, 1).unwrap_err();
        assert!(matches!(err, TranslationError::UnexpectedResponse(_)));
    }

    #[test]
    fn test_missing_content_reports_finish_reason() {
        let body = br#"{"choices":[{"message":{"role":"assistant","content":null},"finish_reason":"length"}]}"#;
        let err = translations_from_completion(body, 1).unwrap_err();
        assert!(matches!(err, TranslationError::UnexpectedResponse(m) if m.contains("length")));
    }
}
