//! Wire payloads exchanged with the answering service.

use serde::{Deserialize, Serialize};

/// Body of the `POST` that opens an answer stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerRequest {
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<String>>,
}

impl AnswerRequest {
    /// Build a request, omitting `tools` entirely when no tool is enabled.
    pub fn new(question: impl Into<String>, tools: Vec<String>) -> Self {
        Self {
            question: question.into(),
            tools: if tools.is_empty() { None } else { Some(tools) },
        }
    }
}

/// One `data:` payload of the answer stream.
///
/// Every field is optional on the wire; the service only guarantees that the
/// final event of a turn carries `is_complete: true`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AnswerEvent {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub thought: bool,
    #[serde(default)]
    pub is_complete: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_omits_empty_tools() {
        let request = AnswerRequest::new("Hello", Vec::new());
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"question":"Hello"}"#);
    }

    #[test]
    fn request_includes_selected_tools() {
        let request = AnswerRequest::new("Weather?", vec!["search".to_string()]);
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"question":"Weather?","tools":["search"]}"#);
    }

    #[test]
    fn event_fields_default_when_missing() {
        let event: AnswerEvent = serde_json::from_str(r#"{"is_complete":true}"#).unwrap();
        assert_eq!(
            event,
            AnswerEvent {
                content: String::new(),
                thought: false,
                is_complete: true,
            }
        );
    }
}
