//! The clause tree ("shadow tree") derived from a document's paragraph stream.
//!
//! The tree is a read view: it is rebuilt on demand from the skeleton and is
//! never the system of record. Each non-root node points back at the
//! paragraph it came from through `original_structural_id`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Id of the single `document` node at the top of every tree.
pub const ROOT_ID: &str = "root";

/// Structural kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnType {
    Document,
    Article,
    Section,
    Paragraph,
    Point,
    Clause,
}

impl AnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Article => "article",
            Self::Section => "section",
            Self::Paragraph => "paragraph",
            Self::Point => "point",
            Self::Clause => "clause",
        }
    }
}

/// Heuristic semantic tag assigned from keyword cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClauseType {
    Condition,
    Obligation,
    Right,
    Representation,
    Definition,
    General,
}

impl ClauseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Condition => "condition",
            Self::Obligation => "obligation",
            Self::Right => "right",
            Self::Representation => "representation",
            Self::Definition => "definition",
            Self::General => "general",
        }
    }
}

/// One node of the clause tree.
///
/// Serializes to `{id, an_type, an_num, text_content, original_structural_id,
/// children, metadata, clause_type}`. Absent optionals are written as `null`
/// and may be missing on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseNode {
    pub id: String,
    pub an_type: AnType,
    /// Numbering label such as "1.1", "(a)" or "ARTICLE I".
    #[serde(default)]
    pub an_num: Option<String>,
    pub text_content: String,
    /// Stable id of the paragraph this node was built from.
    #[serde(default)]
    pub original_structural_id: Option<String>,
    #[serde(default)]
    pub children: Vec<ClauseNode>,
    /// Open annotation map (risk scores and the like).
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub clause_type: Option<ClauseType>,
}

impl ClauseNode {
    /// The empty `document` root.
    pub fn root() -> Self {
        Self {
            id: ROOT_ID.to_string(),
            an_type: AnType::Document,
            an_num: None,
            text_content: String::new(),
            original_structural_id: None,
            children: Vec::new(),
            metadata: Map::new(),
            clause_type: None,
        }
    }

    /// A childless node with a freshly generated id.
    pub fn new(an_type: AnType, text_content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            an_type,
            an_num: None,
            text_content: text_content.into(),
            original_structural_id: None,
            children: Vec::new(),
            metadata: Map::new(),
            clause_type: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.an_type == AnType::Document
    }

    /// Pre-order walk over this node and all descendants, with depth.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(self, 0)],
        }
    }

    /// Non-root nodes in document order.
    pub fn descendants(&self) -> impl Iterator<Item = &ClauseNode> {
        self.walk().skip(1).map(|(node, _)| node)
    }

    /// Texts of every non-root node in document order.
    ///
    /// For a freshly built tree this is exactly the sequence of non-empty
    /// paragraph texts the tree was built from.
    pub fn paragraph_texts(&self) -> Vec<&str> {
        self.descendants().map(|n| n.text_content.as_str()).collect()
    }

    /// Find the node built from the paragraph with the given stable id.
    pub fn find_by_structural_id(&self, structural_id: &str) -> Option<&ClauseNode> {
        self.descendants()
            .find(|n| n.original_structural_id.as_deref() == Some(structural_id))
    }

    pub fn find(&self, id: &str) -> Option<&ClauseNode> {
        self.walk().map(|(node, _)| node).find(|n| n.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut ClauseNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    /// Total number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.walk().count()
    }
}

/// Pre-order iterator returned by [`ClauseNode::walk`].
pub struct Walk<'a> {
    stack: Vec<(&'a ClauseNode, usize)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (&'a ClauseNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|c| (c, depth + 1)));
        Some((node, depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> ClauseNode {
        let mut root = ClauseNode::root();
        let mut article = ClauseNode::new(AnType::Article, "ARTICLE I");
        article.original_structural_id = Some("p1".into());
        let mut section = ClauseNode::new(AnType::Section, "1.1 Definitions");
        section.an_num = Some("1.1".into());
        section.original_structural_id = Some("p2".into());
        section
            .children
            .push(ClauseNode::new(AnType::Point, "(a) Cause"));
        article.children.push(section);
        root.children.push(article);
        root.children
            .push(ClauseNode::new(AnType::Paragraph, "Trailing text"));
        root
    }

    #[test]
    fn walk_is_preorder_document_order() {
        let tree = sample_tree();
        assert_eq!(
            tree.paragraph_texts(),
            vec!["ARTICLE I", "1.1 Definitions", "(a) Cause", "Trailing text"]
        );
        let depths: Vec<usize> = tree.walk().map(|(_, d)| d).collect();
        assert_eq!(depths, vec![0, 1, 2, 3, 1]);
    }

    #[test]
    fn wire_shape_uses_lowercase_tags_and_writes_absent_fields_as_null() {
        let node = ClauseNode::new(AnType::Paragraph, "Plain");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["an_type"], "paragraph");
        assert_eq!(json["text_content"], "Plain");
        assert!(json["children"].as_array().unwrap().is_empty());
        assert!(json["metadata"].as_object().unwrap().is_empty());
        for key in ["an_num", "original_structural_id", "clause_type"] {
            assert!(json.as_object().unwrap().contains_key(key), "{key} missing");
            assert!(json[key].is_null(), "{key} not null");
        }
        assert!(serde_json::to_string(&node).unwrap().contains(r#""an_num":null"#));
    }

    #[test]
    fn deserializes_nodes_with_optional_keys_missing() {
        let node: ClauseNode = serde_json::from_str(
            r#"{"id": "n2", "an_type": "point", "text_content": "(a) Cause"}"#,
        )
        .unwrap();
        assert!(node.an_num.is_none());
        assert!(node.original_structural_id.is_none());
        assert!(node.clause_type.is_none());
    }

    #[test]
    fn deserializes_null_optionals_and_missing_collections() {
        let json = r#"{
            "id": "n1",
            "an_type": "section",
            "an_num": null,
            "text_content": "4.1 Termination",
            "original_structural_id": null
        }"#;
        let node: ClauseNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.an_type, AnType::Section);
        assert!(node.an_num.is_none());
        assert!(node.children.is_empty());
        assert!(node.clause_type.is_none());
    }

    #[test]
    fn metadata_round_trips_annotations() {
        let mut node = ClauseNode::new(AnType::Clause, "x");
        node.metadata
            .insert("risk_score".into(), serde_json::json!(90));
        let json = serde_json::to_string(&node).unwrap();
        let parsed: ClauseNode = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.metadata["risk_score"], 90);
    }

    #[test]
    fn lookup_by_structural_id_and_node_id() {
        let mut tree = sample_tree();
        let section_id = tree
            .find_by_structural_id("p2")
            .map(|n| n.id.clone())
            .unwrap();
        assert!(tree.find(&section_id).is_some());
        tree.find_mut(&section_id)
            .unwrap()
            .metadata
            .insert("reviewed".into(), true.into());
        assert_eq!(tree.find(&section_id).unwrap().metadata["reviewed"], true);
        assert!(tree.find_by_structural_id("missing").is_none());
        assert_eq!(tree.node_count(), 5);
    }
}
