//! Style id → display name resolution from `word/styles.xml`.

use std::collections::HashMap;

use crate::DocxError;
use crate::xml::{self, XmlNode};

pub const STYLES_PART: &str = "word/styles.xml";

/// Name used when neither the paragraph nor the package names a style.
pub const FALLBACK_STYLE: &str = "Normal";

#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    names: HashMap<String, String>,
    default_paragraph: Option<String>,
}

impl StyleSheet {
    pub fn parse(bytes: &[u8]) -> Result<Self, DocxError> {
        let nodes = xml::parse(STYLES_PART, bytes)?;
        let mut sheet = Self::default();

        let Some(root) = nodes.iter().find_map(XmlNode::as_element) else {
            return Ok(sheet);
        };
        for style in root.elements().filter(|el| el.is("w:style")) {
            let Some(id) = style.attr("w:styleId") else {
                continue;
            };
            let name = style
                .child("w:name")
                .and_then(|n| n.attr("w:val"))
                .map(|n| display_name(&n))
                .unwrap_or_else(|| id.clone());

            let is_paragraph = style.attr("w:type").as_deref() == Some("paragraph");
            let is_default = matches!(style.attr("w:default").as_deref(), Some("1" | "true" | "on"));
            if is_paragraph && is_default {
                sheet.default_paragraph = Some(name.clone());
            }
            sheet.names.insert(id, name);
        }
        Ok(sheet)
    }

    /// Display name for a paragraph's style id.
    ///
    /// Paragraphs without a style use the default paragraph style. Ids with
    /// no definition in the sheet are reported as-is.
    pub fn resolve(&self, style_id: Option<&str>) -> String {
        match style_id {
            Some(id) => self.names.get(id).cloned().unwrap_or_else(|| id.to_string()),
            None => self
                .default_paragraph
                .clone()
                .unwrap_or_else(|| FALLBACK_STYLE.to_string()),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Word stores some built-in names in lower case ("heading 1", "title").
fn display_name(name: &str) -> String {
    let builtin = name.starts_with("heading ")
        || matches!(name, "title" | "subtitle" | "normal" | "caption" | "quote" | "list paragraph");
    if !builtin {
        return name.to_string();
    }
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
