//! One loaded document: the package, its main part, and the paragraph stream.

use tracing::{debug, info};

use crate::DocxError;
use crate::package::Package;
use crate::paragraph::Paragraph;
use crate::styles::{STYLES_PART, StyleSheet};
use crate::xml::{self, XmlElement, XmlNode};

pub const DOCUMENT_PART: &str = "word/document.xml";

/// Handle to a paragraph in a [`DocxDocument`].
///
/// Handles stay valid across insertions, so a paragraph cloned during a
/// split is addressed exactly like one read from the package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParaKey(usize);

#[derive(Debug, Clone)]
enum BodyItem {
    Paragraph(ParaKey),
    /// Tables, section properties, content controls: carried through untouched.
    Other(XmlNode),
}

pub struct DocxDocument {
    package: Package,
    /// The main part with `w:body` emptied; its content lives in `body`.
    tree: Vec<XmlNode>,
    body_path: Vec<usize>,
    body: Vec<BodyItem>,
    paragraphs: Vec<Paragraph>,
    styles: StyleSheet,
}

impl DocxDocument {
    /// Open a package and index its body paragraphs.
    ///
    /// Body paragraphs are the direct `w:p` children of `w:body`; tables and
    /// content controls are not descended into.
    pub fn load(bytes: &[u8]) -> Result<Self, DocxError> {
        let package = Package::from_bytes(bytes)?;
        let main = package
            .part(DOCUMENT_PART)
            .ok_or_else(|| DocxError::MissingPart(DOCUMENT_PART.to_string()))?;
        let mut tree = xml::parse(DOCUMENT_PART, main)?;

        let body_path = find_path(&tree, "w:body").ok_or(DocxError::MissingBody)?;
        let body_element = element_at_mut(&mut tree, &body_path).ok_or(DocxError::MissingBody)?;

        let mut body = Vec::new();
        let mut paragraphs = Vec::new();
        for node in std::mem::take(&mut body_element.children) {
            match node {
                XmlNode::Element(el) if el.is("w:p") => {
                    body.push(BodyItem::Paragraph(ParaKey(paragraphs.len())));
                    paragraphs.push(Paragraph::from_element(el));
                }
                other => body.push(BodyItem::Other(other)),
            }
        }

        let styles = match package.part(STYLES_PART) {
            Some(bytes) => StyleSheet::parse(bytes)?,
            None => {
                debug!("package has no styles part");
                StyleSheet::default()
            }
        };

        info!(
            paragraphs = paragraphs.len(),
            styles = styles.len(),
            "loaded document package"
        );
        Ok(Self {
            package,
            tree,
            body_path,
            body,
            paragraphs,
            styles,
        })
    }

    /// Paragraphs in document order.
    pub fn paragraphs(&self) -> impl Iterator<Item = (ParaKey, &Paragraph)> {
        self.body.iter().filter_map(|item| match item {
            BodyItem::Paragraph(key) => Some((*key, &self.paragraphs[key.0])),
            BodyItem::Other(_) => None,
        })
    }

    pub fn paragraph_keys(&self) -> Vec<ParaKey> {
        self.paragraphs().map(|(key, _)| key).collect()
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn paragraph(&self, key: ParaKey) -> &Paragraph {
        &self.paragraphs[key.0]
    }

    pub fn paragraph_mut(&mut self, key: ParaKey) -> &mut Paragraph {
        &mut self.paragraphs[key.0]
    }

    /// Resolved style name of a paragraph ("Heading 1", "Normal", ...).
    pub fn style_name(&self, key: ParaKey) -> String {
        self.styles
            .resolve(self.paragraph(key).style_id().as_deref())
    }

    /// Zero-based position of a paragraph in the paragraph stream.
    pub fn position(&self, key: ParaKey) -> Option<usize> {
        self.paragraphs().position(|(k, _)| k == key)
    }

    /// Insert `paragraph` directly after `anchor` in document order.
    pub fn insert_after(&mut self, anchor: ParaKey, paragraph: Paragraph) -> ParaKey {
        let key = ParaKey(self.paragraphs.len());
        self.paragraphs.push(paragraph);
        let index = self
            .body
            .iter()
            .position(|item| matches!(item, BodyItem::Paragraph(k) if *k == anchor))
            .map(|i| i + 1)
            .unwrap_or(self.body.len());
        self.body.insert(index, BodyItem::Paragraph(key));
        key
    }

    /// Serialize the whole package with the current paragraph stream.
    pub fn to_bytes(&self) -> Result<Vec<u8>, DocxError> {
        let mut tree = self.tree.clone();
        let body = element_at_mut(&mut tree, &self.body_path).ok_or(DocxError::MissingBody)?;
        body.children = self
            .body
            .iter()
            .map(|item| match item {
                BodyItem::Paragraph(key) => {
                    XmlNode::Element(self.paragraphs[key.0].clone().into_element())
                }
                BodyItem::Other(node) => node.clone(),
            })
            .collect();

        let main = xml::write(DOCUMENT_PART, &tree).map_err(|e| DocxError::Save(e.to_string()))?;
        let bytes = self.package.to_bytes_with(&[(DOCUMENT_PART, main.as_slice())])?;
        info!(
            paragraphs = self.paragraphs.len(),
            bytes = bytes.len(),
            "saved document package"
        );
        Ok(bytes)
    }
}

/// Child-index path to the first element with the given name.
fn find_path(nodes: &[XmlNode], name: &str) -> Option<Vec<usize>> {
    for (index, node) in nodes.iter().enumerate() {
        let XmlNode::Element(el) = node else { continue };
        if el.is(name) {
            return Some(vec![index]);
        }
        if let Some(mut rest) = find_path(&el.children, name) {
            rest.insert(0, index);
            return Some(rest);
        }
    }
    None
}

fn element_at_mut<'a>(nodes: &'a mut [XmlNode], path: &[usize]) -> Option<&'a mut XmlElement> {
    let (first, rest) = path.split_first()?;
    let el = nodes.get_mut(*first)?.as_element_mut()?;
    if rest.is_empty() {
        Some(el)
    } else {
        element_at_mut(&mut el.children, rest)
    }
}
