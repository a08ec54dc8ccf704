//! Paragraph stream → clause tree.

use serde::Serialize;
use tracing::debug;

use clausegraft_core::{AnType, ClauseNode};

use crate::classify;
use crate::config::ParserConfig;

/// One paragraph of the input stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphInput {
    pub stable_id: Option<String>,
    pub text: String,
    pub style_name: String,
}

impl ParagraphInput {
    pub fn new(text: impl Into<String>, style_name: impl Into<String>) -> Self {
        Self {
            stable_id: None,
            text: text.into(),
            style_name: style_name.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.stable_id = Some(id.into());
        self
    }
}

/// Flat text plus the derived tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parsed {
    /// Non-empty paragraph texts joined by blank lines.
    pub full_text: String,
    pub tree: ClauseNode,
}

/// Nodes are built flat and linked by index, then assembled once at the end.
struct Arena {
    nodes: Vec<Option<ClauseNode>>,
    children: Vec<Vec<usize>>,
}

const ROOT: usize = 0;

impl Arena {
    fn new() -> Self {
        Self {
            nodes: vec![Some(ClauseNode::root())],
            children: vec![Vec::new()],
        }
    }

    fn attach(&mut self, parent: usize, node: ClauseNode) -> usize {
        let index = self.nodes.len();
        self.nodes.push(Some(node));
        self.children.push(Vec::new());
        self.children[parent].push(index);
        index
    }

    fn assemble(mut self) -> ClauseNode {
        self.take(ROOT)
    }

    fn take(&mut self, index: usize) -> ClauseNode {
        let mut node = self.nodes[index].take().unwrap_or_else(ClauseNode::root);
        let children = std::mem::take(&mut self.children[index]);
        node.children = children.into_iter().map(|child| self.take(child)).collect();
        node
    }
}

/// `Some(label)` when the paragraph opens a section. A second-heading style
/// opens one even without a leading number.
fn section_number(config: &ParserConfig, style: &str, text: &str) -> Option<Option<String>> {
    let label = classify::section_label(text);
    if config.is_second_heading(style) || label.is_some() {
        Some(label)
    } else {
        None
    }
}

/// Build the clause tree from an ordered paragraph stream.
///
/// Blank paragraphs are skipped. Each remaining paragraph becomes exactly one
/// node; the first matching rule decides its kind:
///
/// 1. top heading style, or an `ARTICLE`/`SECTION`/`SCHEDULE`/`EXHIBIT`
///    keyword with an identifier: article under the root; closes any section
/// 2. second heading style: section, numbered if the text starts with one
/// 3. leading decimal number: section
/// 4. leading `(a)`-style label: point
/// 5. anything else: paragraph
///
/// Sections hang off the current article, or the root. Points and
/// paragraphs hang off the current section, else the current article, else
/// the root.
pub fn build_tree<I>(paragraphs: I, config: &ParserConfig) -> Parsed
where
    I: IntoIterator<Item = ParagraphInput>,
{
    let mut arena = Arena::new();
    let mut texts = Vec::new();
    let mut current_article: Option<usize> = None;
    let mut current_section: Option<usize> = None;

    for paragraph in paragraphs {
        let text = paragraph.text.trim();
        if text.is_empty() {
            continue;
        }
        texts.push(text.to_string());

        let mut node = ClauseNode::new(AnType::Paragraph, text);
        node.original_structural_id = paragraph.stable_id;
        node.clause_type = Some(classify::clause_type(text));
        let style = paragraph.style_name.as_str();

        let article_label = classify::article_label(text);
        if config.is_top_heading(style) || article_label.is_some() {
            node.an_type = AnType::Article;
            node.an_num = article_label;
            current_article = Some(arena.attach(ROOT, node));
            current_section = None;
        } else if let Some(an_num) = section_number(config, style, text) {
            node.an_type = AnType::Section;
            node.an_num = an_num;
            current_section = Some(arena.attach(current_article.unwrap_or(ROOT), node));
        } else if let Some(an_num) = classify::point_label(text) {
            node.an_type = AnType::Point;
            node.an_num = Some(an_num);
            arena.attach(current_section.or(current_article).unwrap_or(ROOT), node);
        } else {
            arena.attach(current_section.or(current_article).unwrap_or(ROOT), node);
        }
    }

    let tree = arena.assemble();
    debug!(paragraphs = texts.len(), "built clause tree");
    Parsed {
        full_text: texts.join("\n\n"),
        tree,
    }
}
