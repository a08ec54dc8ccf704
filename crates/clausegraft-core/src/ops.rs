//! Edit batch wire types.
//!
//! A batch is an ordered JSON list such as
//! `[{"type": "update_text", "id": "...", "text": "..."},
//!   {"type": "split", "id": "...", "parts": ["...", "..."]}]`.

use serde::{Deserialize, Serialize};

/// One identifier-addressed mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditOp {
    /// Replace the paragraph's full text.
    UpdateText {
        id: String,
        #[serde(default)]
        text: String,
    },
    /// Split the paragraph into `parts.len()` contiguous paragraphs.
    Split {
        id: String,
        #[serde(default)]
        parts: Vec<String>,
    },
}

impl EditOp {
    pub fn update_text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::UpdateText {
            id: id.into(),
            text: text.into(),
        }
    }

    pub fn split<S: Into<String>>(id: impl Into<String>, parts: impl IntoIterator<Item = S>) -> Self {
        Self::Split {
            id: id.into(),
            parts: parts.into_iter().map(Into::into).collect(),
        }
    }

    /// Stable id of the target paragraph.
    pub fn id(&self) -> &str {
        match self {
            Self::UpdateText { id, .. } | Self::Split { id, .. } => id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::UpdateText { .. } => "update_text",
            Self::Split { .. } => "split",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_batch() {
        let json = r#"[
            {"type": "update_text", "id": "a1", "text": "New content"},
            {"type": "split", "id": "b2", "parts": ["Part A", "Part B"]}
        ]"#;
        let ops: Vec<EditOp> = serde_json::from_str(json).unwrap();
        assert_eq!(ops[0], EditOp::update_text("a1", "New content"));
        assert_eq!(ops[1], EditOp::split("b2", ["Part A", "Part B"]));
        assert_eq!(ops[1].id(), "b2");
        assert_eq!(ops[1].kind(), "split");
    }

    #[test]
    fn missing_payload_defaults_to_empty() {
        let ops: Vec<EditOp> =
            serde_json::from_str(r#"[{"type": "update_text", "id": "a"}, {"type": "split", "id": "b"}]"#)
                .unwrap();
        assert_eq!(ops[0], EditOp::update_text("a", ""));
        assert_eq!(ops[1], EditOp::Split { id: "b".into(), parts: vec![] });
    }

    #[test]
    fn unknown_operation_type_is_rejected() {
        let result: Result<Vec<EditOp>, _> =
            serde_json::from_str(r#"[{"type": "delete", "id": "a"}]"#);
        assert!(result.is_err());
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(EditOp::update_text("x", "y")).unwrap();
        assert_eq!(json["type"], "update_text");
        assert_eq!(json["id"], "x");
        assert_eq!(json["text"], "y");
    }
}
