//! Minimal lossless XML element tree over `quick-xml` events.
//!
//! Elements keep their original start tag (name, attribute order, raw
//! attribute bytes) and every non-element event is stored untouched, so a
//! part that is parsed and written back without edits keeps its content.

use std::borrow::Cow;

use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::DocxError;

#[derive(Debug, Clone)]
pub enum XmlNode {
    Element(XmlElement),
    /// Text, entity references, CDATA, comments, declarations.
    Other(Event<'static>),
}

impl XmlNode {
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            Self::Element(el) => Some(el),
            Self::Other(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut XmlElement> {
        match self {
            Self::Element(el) => Some(el),
            Self::Other(_) => None,
        }
    }

    /// True for an element with the given qualified name.
    pub fn is(&self, name: &str) -> bool {
        self.as_element().is_some_and(|el| el.is(name))
    }

    pub fn text(text: &str) -> Self {
        Self::Other(Event::Text(BytesText::new(text).into_owned()))
    }
}

#[derive(Debug, Clone)]
pub struct XmlElement {
    start: BytesStart<'static>,
    pub children: Vec<XmlNode>,
    self_closing: bool,
}

impl XmlElement {
    pub fn new(name: &str) -> Self {
        Self {
            start: BytesStart::new(name.to_string()),
            children: Vec::new(),
            self_closing: true,
        }
    }

    pub fn with_attr(mut self, key: &str, value: &str) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.children.push(XmlNode::text(text));
        self
    }

    pub fn is(&self, name: &str) -> bool {
        self.start.name().as_ref() == name.as_bytes()
    }

    pub fn name(&self) -> String {
        String::from_utf8_lossy(self.start.name().as_ref()).into_owned()
    }

    /// Unescaped value of the attribute with the given qualified name.
    ///
    /// A value with a malformed entity comes back as its raw text.
    pub fn attr(&self, key: &str) -> Option<String> {
        self.start
            .attributes()
            .flatten()
            .find(|a| a.key.as_ref() == key.as_bytes())
            .map(|a| match a.unescape_value() {
                Ok(value) => value.into_owned(),
                Err(_) => String::from_utf8_lossy(&a.value).into_owned(),
            })
    }

    /// Set an attribute, replacing any existing value in place of the old one.
    pub fn set_attr(&mut self, key: &str, value: &str) {
        let name = self.name();
        let mut start = BytesStart::new(name);
        let mut replaced = false;
        for attr in self.start.attributes().flatten() {
            if attr.key.as_ref() == key.as_bytes() {
                start.push_attribute((key, value));
                replaced = true;
            } else {
                start.push_attribute(attr);
            }
        }
        if !replaced {
            start.push_attribute((key, value));
        }
        self.start = start.into_owned();
    }

    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(XmlNode::as_element)
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|el| el.is(name))
    }

    /// Follow a path of child names, e.g. `["w:pPr", "w:pStyle"]`.
    pub fn descend(&self, path: &[&str]) -> Option<&XmlElement> {
        path.iter().try_fold(self, |el, name| el.child(name))
    }

    /// Concatenated character data of this element's direct text children.
    pub fn char_data(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            if let XmlNode::Other(event) = node {
                push_char_data(event, &mut out);
            }
        }
        out
    }

    /// Serialize this element alone.
    pub fn to_xml_string(&self) -> String {
        let mut writer = Writer::new(Vec::new());
        match write_element(&mut writer, self) {
            Ok(()) => String::from_utf8_lossy(&writer.into_inner()).into_owned(),
            Err(_) => String::new(),
        }
    }
}

fn push_char_data(event: &Event<'static>, out: &mut String) {
    match event {
        Event::Text(text) => {
            if let Ok(decoded) = text.decode() {
                match quick_xml::escape::unescape(&decoded) {
                    Ok(unescaped) => out.push_str(&unescaped),
                    Err(_) => out.push_str(&decoded),
                }
            }
        }
        Event::CData(cdata) => {
            let raw: &[u8] = cdata;
            out.push_str(&String::from_utf8_lossy(raw));
        }
        Event::GeneralRef(reference) => {
            let raw: &[u8] = reference;
            let name = String::from_utf8_lossy(raw);
            match resolve_entity(&name) {
                Some(resolved) => out.push_str(&resolved),
                None => {
                    out.push('&');
                    out.push_str(&name);
                    out.push(';');
                }
            }
        }
        _ => {}
    }
}

/// Resolve a predefined entity or character reference name (without `&`/`;`).
pub fn resolve_entity(name: &str) -> Option<Cow<'static, str>> {
    let predefined = match name {
        "amp" => Some("&"),
        "lt" => Some("<"),
        "gt" => Some(">"),
        "quot" => Some("\""),
        "apos" => Some("'"),
        _ => None,
    };
    if let Some(s) = predefined {
        return Some(Cow::Borrowed(s));
    }
    let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        name.strip_prefix('#')?.parse().ok()?
    };
    char::from_u32(code).map(|c| Cow::Owned(c.to_string()))
}

/// Parse a whole part into top-level nodes.
pub fn parse(part: &str, bytes: &[u8]) -> Result<Vec<XmlNode>, DocxError> {
    let xml_error = |message: String| DocxError::Xml {
        part: part.to_string(),
        message,
    };

    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    let mut top: Vec<XmlNode> = Vec::new();
    let mut open: Vec<XmlElement> = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| xml_error(format!("at byte {}: {e}", reader.buffer_position())))?;
        match event {
            Event::Start(start) => open.push(XmlElement {
                start: start.into_owned(),
                children: Vec::new(),
                self_closing: false,
            }),
            Event::End(_) => {
                let element = open
                    .pop()
                    .ok_or_else(|| xml_error("unbalanced end tag".to_string()))?;
                attach(&mut open, &mut top, XmlNode::Element(element));
            }
            Event::Empty(start) => {
                let element = XmlElement {
                    start: start.into_owned(),
                    children: Vec::new(),
                    self_closing: true,
                };
                attach(&mut open, &mut top, XmlNode::Element(element));
            }
            Event::Eof => break,
            other => attach(&mut open, &mut top, XmlNode::Other(other.into_owned())),
        }
        buf.clear();
    }

    if let Some(unclosed) = open.last() {
        return Err(xml_error(format!("unclosed element {}", unclosed.name())));
    }
    Ok(top)
}

fn attach(open: &mut [XmlElement], top: &mut Vec<XmlNode>, node: XmlNode) {
    match open.last_mut() {
        Some(parent) => parent.children.push(node),
        None => top.push(node),
    }
}

/// Serialize top-level nodes back into part bytes.
pub fn write(part: &str, nodes: &[XmlNode]) -> Result<Vec<u8>, DocxError> {
    let mut writer = Writer::new(Vec::new());
    for node in nodes {
        write_node(&mut writer, node).map_err(|message| DocxError::Xml {
            part: part.to_string(),
            message,
        })?;
    }
    Ok(writer.into_inner())
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &XmlNode) -> Result<(), String> {
    match node {
        XmlNode::Element(el) => write_element(writer, el),
        XmlNode::Other(event) => writer
            .write_event(event.borrow())
            .map_err(|e| e.to_string()),
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, el: &XmlElement) -> Result<(), String> {
    if el.children.is_empty() && el.self_closing {
        return writer
            .write_event(Event::Empty(el.start.borrow()))
            .map_err(|e| e.to_string());
    }
    writer
        .write_event(Event::Start(el.start.borrow()))
        .map_err(|e| e.to_string())?;
    for child in &el.children {
        write_node(writer, child)?;
    }
    writer
        .write_event(Event::End(el.start.to_end()))
        .map_err(|e| e.to_string())
}
