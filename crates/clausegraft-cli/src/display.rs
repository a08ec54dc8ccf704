//! Terminal rendering for clause trees and paragraph listings.

use clausegraft_core::ClauseNode;
use clausegraft_docx::DocxDocument;

const MAX_TEXT: usize = 72;

// ── Clause tree ──

/// Indented outline of every non-root node.
pub fn render_tree(tree: &ClauseNode) -> String {
    let mut out = String::new();
    for (node, depth) in tree.walk().skip(1) {
        let indent = "  ".repeat(depth.saturating_sub(1));
        let label = match &node.an_num {
            Some(num) => format!("{} {}", node.an_type.as_str(), num),
            None => node.an_type.as_str().to_string(),
        };
        let tag = node.clause_type.map(|t| t.as_str()).unwrap_or("-");
        out.push_str(&format!(
            "{indent}[{label}] {}  ({tag})\n",
            truncate(&node.text_content, MAX_TEXT)
        ));
    }
    out
}

pub fn print_tree(tree: &ClauseNode) {
    println!("=== {} nodes ===", tree.node_count().saturating_sub(1));
    print!("{}", render_tree(tree));
}

// ── Paragraph stream ──

/// One line per body paragraph: position, id, style, indent, text.
pub fn render_paragraphs(doc: &DocxDocument) -> String {
    let mut out = format!(
        "{:<4} {:<38} {:<18} {:>6}  {}\n",
        "#", "id", "style", "indent", "text"
    );
    for (position, (key, paragraph)) in doc.paragraphs().enumerate() {
        let id = paragraph.stable_id().unwrap_or_else(|| "-".to_string());
        let indent = paragraph
            .left_indent()
            .map(|twips| twips.to_string())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:<4} {:<38} {:<18} {:>6}  {}\n",
            position,
            id,
            truncate(&doc.style_name(key), 18),
            indent,
            truncate(&paragraph.text(), MAX_TEXT)
        ));
    }
    out
}

pub fn print_paragraphs(doc: &DocxDocument) {
    print!("{}", render_paragraphs(doc));
}

/// Shorten to `max` characters, marking the cut with "...".
fn truncate(text: &str, max: usize) -> String {
    let flat = text.replace(['\n', '\t'], " ");
    if flat.chars().count() <= max {
        return flat;
    }
    let kept: String = flat.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
