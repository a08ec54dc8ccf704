//! Minimal document packages for fixtures, tests and the `sample` command.

use quick_xml::events::{BytesDecl, Event};

use crate::DocxError;
use crate::document::DOCUMENT_PART;
use crate::package::Package;
use crate::paragraph::PARA_ID_ATTR;
use crate::styles::STYLES_PART;
use crate::xml::{self, XmlElement, XmlNode};

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const W14_NS: &str = "http://schemas.microsoft.com/office/word/2010/wordml";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

/// Paragraph styles written to every built package: (id, name, default).
const STYLES: &[(&str, &str, bool)] = &[
    ("Normal", "Normal", true),
    ("Title", "Title", false),
    ("Heading1", "heading 1", false),
    ("Heading2", "heading 2", false),
    ("Heading3", "heading 3", false),
    ("ListParagraph", "List Paragraph", false),
];

#[derive(Debug, Clone, Default)]
pub struct ParagraphSpec {
    text: String,
    style: Option<String>,
    bold: bool,
    indent: Option<i64>,
    align: Option<String>,
    id: Option<String>,
    extra_runs: Vec<(String, bool)>,
}

impl ParagraphSpec {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn style(mut self, style_id: impl Into<String>) -> Self {
        self.style = Some(style_id.into());
        self
    }

    /// Bold the first run.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Left indent in twentieths of a point.
    pub fn indent(mut self, twips: i64) -> Self {
        self.indent = Some(twips);
        self
    }

    pub fn align(mut self, value: impl Into<String>) -> Self {
        self.align = Some(value.into());
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Append another run after the first.
    pub fn run(mut self, text: impl Into<String>, bold: bool) -> Self {
        self.extra_runs.push((text.into(), bold));
        self
    }

    fn to_element(&self) -> XmlElement {
        let mut p = XmlElement::new("w:p");
        if let Some(id) = &self.id {
            p.set_attr(PARA_ID_ATTR, id);
        }

        let mut ppr = XmlElement::new("w:pPr");
        if let Some(style) = &self.style {
            ppr = ppr.with_child(XmlElement::new("w:pStyle").with_attr("w:val", style));
        }
        if let Some(twips) = self.indent {
            ppr = ppr.with_child(XmlElement::new("w:ind").with_attr("w:left", &twips.to_string()));
        }
        if let Some(align) = &self.align {
            ppr = ppr.with_child(XmlElement::new("w:jc").with_attr("w:val", align));
        }
        if !ppr.children.is_empty() {
            p = p.with_child(ppr);
        }

        if !self.text.is_empty() {
            p = p.with_child(run(&self.text, self.bold));
        }
        for (text, bold) in &self.extra_runs {
            p = p.with_child(run(text, *bold));
        }
        p
    }
}

fn run(text: &str, bold: bool) -> XmlElement {
    let mut r = XmlElement::new("w:r");
    if bold {
        r = r.with_child(XmlElement::new("w:rPr").with_child(XmlElement::new("w:b")));
    }
    r.with_child(
        XmlElement::new("w:t")
            .with_attr("xml:space", "preserve")
            .with_text(text),
    )
}

enum Block {
    Paragraph(ParagraphSpec),
    Table(String),
}

/// Builds a small but valid word-processing package.
#[derive(Default)]
pub struct PackageBuilder {
    blocks: Vec<Block>,
}

impl PackageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paragraph(mut self, spec: ParagraphSpec) -> Self {
        self.blocks.push(Block::Paragraph(spec));
        self
    }

    /// Heading paragraph; level 0 is the document title.
    pub fn heading(self, text: impl Into<String>, level: u8) -> Self {
        let style = match level {
            0 => "Title".to_string(),
            n => format!("Heading{n}"),
        };
        self.paragraph(ParagraphSpec::new(text).style(style))
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.paragraph(ParagraphSpec::new(text))
    }

    /// One-cell table; its paragraph is not a body paragraph.
    pub fn table(mut self, cell_text: impl Into<String>) -> Self {
        self.blocks.push(Block::Table(cell_text.into()));
        self
    }

    pub fn build(self) -> Result<Vec<u8>, DocxError> {
        let mut body = XmlElement::new("w:body");
        for block in &self.blocks {
            let element = match block {
                Block::Paragraph(spec) => spec.to_element(),
                Block::Table(text) => table(text),
            };
            body = body.with_child(element);
        }
        body = body.with_child(XmlElement::new("w:sectPr"));

        let document = XmlElement::new("w:document")
            .with_attr("xmlns:w", W_NS)
            .with_attr("xmlns:w14", W14_NS)
            .with_child(body);

        let mut package = Package::new();
        package.set_part("[Content_Types].xml", CONTENT_TYPES.as_bytes().to_vec());
        package.set_part("_rels/.rels", PACKAGE_RELS.as_bytes().to_vec());
        package.set_part(DOCUMENT_PART, with_declaration(DOCUMENT_PART, document)?);
        package.set_part("word/_rels/document.xml.rels", DOCUMENT_RELS.as_bytes().to_vec());
        package.set_part(STYLES_PART, with_declaration(STYLES_PART, styles())?);
        package.to_bytes()
    }
}

fn table(text: &str) -> XmlElement {
    let cell = XmlElement::new("w:tc").with_child(ParagraphSpec::new(text).to_element());
    XmlElement::new("w:tbl")
        .with_child(XmlElement::new("w:tblPr"))
        .with_child(XmlElement::new("w:tr").with_child(cell))
}

fn styles() -> XmlElement {
    STYLES.iter().fold(
        XmlElement::new("w:styles").with_attr("xmlns:w", W_NS),
        |sheet, (id, name, default)| {
            let mut style = XmlElement::new("w:style").with_attr("w:type", "paragraph");
            if *default {
                style.set_attr("w:default", "1");
            }
            style.set_attr("w:styleId", id);
            sheet.with_child(style.with_child(XmlElement::new("w:name").with_attr("w:val", name)))
        },
    )
}

fn with_declaration(part: &str, root: XmlElement) -> Result<Vec<u8>, DocxError> {
    let decl = Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes")));
    xml::write(part, &[XmlNode::Other(decl), XmlNode::Element(root)])
}

/// Series A investment agreement: a Title, six Heading 1 sections, numbered
/// clauses and indented definitions. Headings carry no id; every other
/// paragraph has a fixed 8-hex-digit id.
pub fn series_a_document() -> Result<Vec<u8>, DocxError> {
    let mut next = 0x1A00_0000u32;
    let mut clause = |text: &str| {
        next += 1;
        ParagraphSpec::new(text).id(format!("{next:08X}"))
    };

    let definitions = [
        "\"Bad Leaver\" means any Founder who ceases to be an employee or officer of the Company by reason of voluntary resignation or dismissal for Cause.",
        "\"Cause\" means any material breach of this Agreement, gross negligence, or conviction of a felony.",
        "\"Founder\" means John Doe and Jane Smith.",
        "\"Good Reason\" means a material reduction in the Founder's duties, base salary, or a relocation of the Company's primary office by more than 50 miles without the Founder's consent.",
        "\"Vesting Period\" means the period of four (4) years from the Effective Date.",
    ];

    let mut builder = PackageBuilder::new()
        .paragraph(
            ParagraphSpec::new("SERIES A INVESTMENT AGREEMENT")
                .style("Title")
                .align("center"),
        )
        .paragraph(clause("THIS AGREEMENT is made on this 28th day of January, 2026."))
        .heading("SECTION 1: DEFINITIONS", 1)
        .paragraph(clause(
            "1.1 In this Agreement, the following terms shall have the following meanings:",
        ));
    for definition in definitions {
        builder = builder.paragraph(clause(definition).indent(720));
    }

    builder
        .heading("SECTION 2: INVESTMENT AND SHARES", 1)
        .paragraph(clause("2.1 The Investors agree to purchase the Shares at the Purchase Price on the Completion Date."))
        .paragraph(clause("2.2 The Shares shall rank pari passu in all respects with the existing ordinary shares."))
        .heading("SECTION 3: VESTING PROVISIONS", 1)
        .paragraph(clause("3.1 All Shares held by the Founders shall be subject to reverse vesting over the Vesting Period."))
        .paragraph(clause("3.2 Twenty-five percent (25%) of the Shares shall vest on the first anniversary of the Effective Date, with the remainder vesting in equal monthly installments thereafter."))
        .heading("SECTION 4: TERMINATION AND FORFEITURE", 1)
        .paragraph(clause("4.1 If a Founder ceases to be an employee or officer of the Company, their Unvested Shares shall be subject to compulsory transfer to the Company at par value."))
        .paragraph(clause("4.2 GOOD REASON PROTECTION. Notwithstanding Section 4.1, if a Founder terminates their employment for Good Reason, they shall be entitled to retain all of their Shares, whether vested or unvested, and no compulsory transfer shall occur."))
        .paragraph(clause("4.3 VOLUNTARY RESIGNATION OVERRIDE. For the avoidance of doubt, any voluntary resignation by a Founder, regardless of the circumstances or any alleged \"Good Reason\", shall be deemed a \"Bad Leaver\" event. In such case, ALL Shares (both vested and unvested) held by the Founder shall be forfeited and transferred to the Company for nil consideration."))
        .heading("SECTION 5: WARRANTIES AND LIABILITY", 1)
        .paragraph(clause("5.1 The Founders hereby warrant to the Investors that the statements in the Disclosure Letter are true and accurate."))
        .paragraph(clause("5.2 LIABILITY CAP. The total aggregate liability of the Founders for any breach of Warranty shall be limited to the Purchase Price."))
        .paragraph(clause("5.3 Notwithstanding Section 5.2, in no event shall the Founders' liability exceed $500,000 in aggregate."))
        .heading("SECTION 6: GOVERNING LAW", 1)
        .paragraph(clause("6.1 This Agreement shall be governed by and construed in accordance with the laws of the State of Delaware."))
        .build()
}
