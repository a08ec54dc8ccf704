//! Paragraph handle over a `w:p` element.
//!
//! The same type wraps paragraphs read from the package and paragraphs
//! cloned during a split, so both are addressed and edited uniformly.

use serde::Serialize;

use crate::xml::{XmlElement, XmlNode};

/// Attribute on `w:p` carrying the stable structural id.
pub const PARA_ID_ATTR: &str = "w:paraId";

/// Inline wrappers whose runs count towards the paragraph's text.
const RUN_CONTAINERS: &[&str] = &["w:hyperlink", "w:ins", "w:smartTag", "w:fldSimple"];

/// Paragraph-level formatting plus the first run's character formatting.
///
/// The first run is the unit of formatting inheritance: it survives text
/// replacement and is what every split part carries forward.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormattingProfile {
    /// Serialized `w:pPr`, if any.
    pub paragraph_properties: Option<String>,
    /// Serialized `w:rPr` of the first run, if any.
    pub run_properties: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Paragraph {
    element: XmlElement,
}

impl Paragraph {
    pub(crate) fn from_element(element: XmlElement) -> Self {
        Self { element }
    }

    pub(crate) fn into_element(self) -> XmlElement {
        self.element
    }

    pub fn element(&self) -> &XmlElement {
        &self.element
    }

    pub fn stable_id(&self) -> Option<String> {
        self.element
            .attr(PARA_ID_ATTR)
            .filter(|id| !id.trim().is_empty())
    }

    pub fn set_stable_id(&mut self, id: &str) {
        self.element.set_attr(PARA_ID_ATTR, id);
    }

    /// Deep copy carrying a different stable id.
    pub fn clone_with_id(&self, id: &str) -> Self {
        let mut copy = self.clone();
        copy.set_stable_id(id);
        copy
    }

    /// Style id from `w:pPr/w:pStyle`.
    pub fn style_id(&self) -> Option<String> {
        self.element
            .descend(&["w:pPr", "w:pStyle"])
            .and_then(|s| s.attr("w:val"))
    }

    /// Left indent in twentieths of a point.
    pub fn left_indent(&self) -> Option<i64> {
        let ind = self.element.descend(&["w:pPr", "w:ind"])?;
        ind.attr("w:left")
            .or_else(|| ind.attr("w:start"))
            .and_then(|v| v.parse().ok())
    }

    pub fn alignment(&self) -> Option<String> {
        self.element
            .descend(&["w:pPr", "w:jc"])
            .and_then(|jc| jc.attr("w:val"))
    }

    pub fn formatting(&self) -> FormattingProfile {
        FormattingProfile {
            paragraph_properties: self.element.child("w:pPr").map(XmlElement::to_xml_string),
            run_properties: self
                .runs()
                .next()
                .and_then(|run| run.child("w:rPr"))
                .map(XmlElement::to_xml_string),
        }
    }

    /// Direct runs and runs inside inline containers, in order.
    pub fn runs(&self) -> impl Iterator<Item = &XmlElement> {
        self.element.elements().flat_map(|el| {
            let nested: Vec<&XmlElement> = if is_run_container(el) {
                el.elements().filter(|r| r.is("w:r")).collect()
            } else if el.is("w:r") {
                vec![el]
            } else {
                Vec::new()
            };
            nested
        })
    }

    pub fn text(&self) -> String {
        let mut out = String::new();
        for run in self.runs() {
            for piece in run.elements() {
                if piece.is("w:t") {
                    out.push_str(&piece.char_data());
                } else if piece.is("w:tab") {
                    out.push('\t');
                } else if piece.is("w:br") || piece.is("w:cr") {
                    out.push('\n');
                }
            }
        }
        out
    }

    pub fn is_blank(&self) -> bool {
        self.text().trim().is_empty()
    }

    /// Replace the paragraph's full text.
    ///
    /// The first run, found the same way as [`Paragraph::runs`], keeps its
    /// `w:rPr` and receives all of the new text. A first run nested in an
    /// inline container is lifted out to the container's position. Every
    /// other run and container is removed. A paragraph without runs gets a
    /// fresh unformatted run.
    pub fn set_text(&mut self, text: &str) {
        let children = &mut self.element.children;
        let first_run = children.iter().position(|node| {
            node.is("w:r")
                || node
                    .as_element()
                    .is_some_and(|el| is_run_container(el) && el.child("w:r").is_some())
        });

        match first_run {
            Some(index) => {
                let lifted = children[index]
                    .as_element()
                    .filter(|el| is_run_container(el))
                    .and_then(|container| container.child("w:r"))
                    .cloned();
                if let Some(run) = lifted {
                    children[index] = XmlNode::Element(run);
                }
                if let Some(run) = children[index].as_element_mut() {
                    write_run_text(run, text);
                }
                let mut position = 0;
                children.retain(|node| {
                    let keep = position == index
                        || !node.as_element().is_some_and(|el| el.is("w:r") || is_run_container(el));
                    position += 1;
                    keep
                });
            }
            None => {
                children.retain(|node| !node.as_element().is_some_and(is_run_container));
                let mut run = XmlElement::new("w:r");
                write_run_text(&mut run, text);
                children.push(XmlNode::Element(run));
            }
        }
    }
}

fn is_run_container(el: &XmlElement) -> bool {
    RUN_CONTAINERS.iter().any(|c| el.is(c))
}

/// Keep the run's `w:rPr`, replace everything else with `text`.
fn write_run_text(run: &mut XmlElement, text: &str) {
    run.children.retain(|node| node.is("w:rPr"));

    let mut pending = String::new();
    for ch in text.chars() {
        match ch {
            '\t' => {
                flush_text(&mut pending, run);
                run.children.push(XmlNode::Element(XmlElement::new("w:tab")));
            }
            '\n' | '\r' => {
                flush_text(&mut pending, run);
                run.children.push(XmlNode::Element(XmlElement::new("w:br")));
            }
            _ => pending.push(ch),
        }
    }
    flush_text(&mut pending, run);
}

fn flush_text(pending: &mut String, run: &mut XmlElement) {
    if pending.is_empty() {
        return;
    }
    let t = XmlElement::new("w:t")
        .with_attr("xml:space", "preserve")
        .with_text(pending.as_str());
    run.children.push(XmlNode::Element(t));
    pending.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml;

    fn paragraph(xml_text: &str) -> Paragraph {
        let nodes = xml::parse("p", xml_text.as_bytes()).unwrap();
        let element = nodes.into_iter().find_map(|n| match n {
            XmlNode::Element(el) => Some(el),
            XmlNode::Other(_) => None,
        });
        Paragraph::from_element(element.unwrap())
    }

    const MIXED: &str = concat!(
        r#"<w:p w:paraId="P1"><w:pPr><w:pStyle w:val="Heading2"/><w:ind w:left="720"/><w:jc w:val="center"/></w:pPr>"#,
        r#"<w:r><w:rPr><w:b/></w:rPr><w:t>Bold </w:t></w:r>"#,
        r#"<w:r><w:rPr><w:i/></w:rPr><w:t>italic</w:t><w:tab/><w:t>tail</w:t></w:r>"#,
        r#"<w:hyperlink><w:r><w:t> link</w:t></w:r></w:hyperlink>"#,
        r#"</w:p>"#
    );

    #[test]
    fn reads_text_across_runs_and_containers() {
        let p = paragraph(MIXED);
        assert_eq!(p.text(), "Bold italic\ttail link");
        assert_eq!(p.stable_id().as_deref(), Some("P1"));
        assert_eq!(p.style_id().as_deref(), Some("Heading2"));
        assert_eq!(p.left_indent(), Some(720));
        assert_eq!(p.alignment().as_deref(), Some("center"));
    }

    #[test]
    fn set_text_keeps_first_run_formatting_and_drops_the_rest() {
        let mut p = paragraph(MIXED);
        let before = p.formatting();
        p.set_text("Replaced text");

        assert_eq!(p.text(), "Replaced text");
        assert_eq!(p.runs().count(), 1);
        assert_eq!(p.formatting(), before);
        assert_eq!(p.stable_id().as_deref(), Some("P1"));
        assert!(p.element().child("w:hyperlink").is_none());
    }

    #[test]
    fn set_text_keeps_formatting_of_a_linked_first_run() {
        let mut p = paragraph(concat!(
            r#"<w:p><w:hyperlink><w:r><w:rPr><w:b/></w:rPr><w:t>Link</w:t></w:r></w:hyperlink>"#,
            r#"<w:r><w:t> rest</w:t></w:r></w:p>"#
        ));
        p.set_text("New");

        assert_eq!(p.text(), "New");
        assert_eq!(p.runs().count(), 1);
        assert_eq!(
            p.formatting().run_properties.as_deref(),
            Some("<w:rPr><w:b/></w:rPr>")
        );
        assert!(p.element().child("w:hyperlink").is_none());
    }

    #[test]
    fn set_text_keeps_formatting_when_every_run_is_nested() {
        let mut p = paragraph(concat!(
            r#"<w:p><w:pPr><w:jc w:val="both"/></w:pPr>"#,
            r#"<w:hyperlink><w:r><w:rPr><w:i/></w:rPr><w:t>Only</w:t></w:r></w:hyperlink>"#,
            r#"<w:ins><w:r><w:t> inserted</w:t></w:r></w:ins></w:p>"#
        ));
        p.set_text("New");

        assert_eq!(p.text(), "New");
        assert_eq!(p.runs().count(), 1);
        assert_eq!(
            p.formatting().run_properties.as_deref(),
            Some("<w:rPr><w:i/></w:rPr>")
        );
        assert_eq!(p.alignment().as_deref(), Some("both"));
        let names: Vec<String> = p.element().elements().map(XmlElement::name).collect();
        assert_eq!(names, vec!["w:pPr", "w:r"]);
    }

    #[test]
    fn set_text_on_empty_paragraph_adds_a_run() {
        let mut p = paragraph(r#"<w:p><w:pPr><w:jc w:val="right"/></w:pPr></w:p>"#);
        p.set_text("  padded  ");
        assert_eq!(p.text(), "  padded  ");
        assert_eq!(p.alignment().as_deref(), Some("right"));
        assert!(p.formatting().run_properties.is_none());
        assert!(
            p.element()
                .to_xml_string()
                .contains(r#"<w:t xml:space="preserve">  padded  </w:t>"#)
        );
    }

    #[test]
    fn tabs_and_line_breaks_become_run_elements() {
        let mut p = paragraph("<w:p><w:r><w:t>x</w:t></w:r></w:p>");
        p.set_text("a\tb\nc");
        assert_eq!(p.text(), "a\tb\nc");
        let run = p.runs().next().unwrap();
        let names: Vec<String> = run.elements().map(XmlElement::name).collect();
        assert_eq!(names, vec!["w:t", "w:tab", "w:t", "w:br", "w:t"]);
    }

    #[test]
    fn clone_with_id_copies_formatting_under_a_new_id() {
        let p = paragraph(MIXED);
        let copy = p.clone_with_id("P2");
        assert_eq!(copy.stable_id().as_deref(), Some("P2"));
        assert_eq!(p.stable_id().as_deref(), Some("P1"));
        assert_eq!(copy.formatting(), p.formatting());
        assert_eq!(copy.text(), p.text());
    }

    #[test]
    fn blank_ids_count_as_missing() {
        let p = paragraph(r#"<w:p w:paraId=" "><w:r><w:t>x</w:t></w:r></w:p>"#);
        assert!(p.stable_id().is_none());
        assert!(!p.is_blank());
        assert!(paragraph("<w:p><w:r><w:t>   </w:t></w:r></w:p>").is_blank());
    }
}
