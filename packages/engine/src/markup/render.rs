//! Writer adapter: renders an [`Element`] tree to text with quick-xml.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use regex::Regex;

use super::element::{Element, QName};
use crate::error::MarkupError;

/// XML name without prefix: letter or underscore, then name characters.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static NCNAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}_][\p{L}\p{N}._\-\x{B7}]*$").expect("valid regex")
});

/// Bare name that may carry a literal prefix, e.g. `xml:lang`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static PREFIXED_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}_][\p{L}\p{N}._\-\x{B7}]*(:[\p{L}_][\p{L}\p{N}._\-\x{B7}]*)?$")
        .expect("valid regex")
});

/// Render an element compactly, without declaration.
pub fn render(element: &Element) -> Result<String, MarkupError> {
    let mut writer = Writer::new(Vec::new());
    write_root(&mut writer, element)?;
    finish(writer)
}

/// Render an element indented by two spaces, without declaration.
pub fn render_pretty(element: &Element) -> Result<String, MarkupError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_root(&mut writer, element)?;
    finish(writer)
}

/// Render a full document: UTF-8 declaration followed by the indented root.
pub fn render_document(element: &Element) -> Result<String, MarkupError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_root(&mut writer, element)?;
    let mut out = finish(writer)?;
    out.push('\n');
    Ok(out)
}

fn finish(writer: Writer<Vec<u8>>) -> Result<String, MarkupError> {
    String::from_utf8(writer.into_inner()).map_err(|e| MarkupError::Encoding(e.utf8_error()))
}

/// Namespace → generated prefix, in first-use order.
struct Prefixes {
    map: BTreeMap<String, String>,
    order: Vec<String>,
}

impl Prefixes {
    fn collect(root: &Element) -> Self {
        let mut prefixes = Self {
            map: BTreeMap::new(),
            order: Vec::new(),
        };
        prefixes.visit(root);
        prefixes
    }

    fn visit(&mut self, element: &Element) {
        self.add(&element.tag);
        for name in element.attribute_names() {
            self.add(name);
        }
        for child in &element.children {
            self.visit(child);
        }
    }

    fn add(&mut self, name: &QName) {
        let Some(ns) = &name.namespace else { return };
        if name.is_xml() || self.map.contains_key(ns) {
            return;
        }
        let prefix = format!("ns{}", self.order.len());
        self.map.insert(ns.clone(), prefix);
        self.order.push(ns.clone());
    }

    fn format(&self, name: &QName) -> Result<String, MarkupError> {
        match &name.namespace {
            None => {
                if PREFIXED_NAME_PATTERN.is_match(&name.local) {
                    Ok(name.local.clone())
                } else {
                    Err(MarkupError::InvalidName(name.to_string()))
                }
            }
            Some(ns) => {
                if !NCNAME_PATTERN.is_match(&name.local) {
                    return Err(MarkupError::InvalidName(name.to_string()));
                }
                if name.is_xml() {
                    return Ok(format!("xml:{}", name.local));
                }
                match self.map.get(ns) {
                    Some(prefix) => Ok(format!("{prefix}:{}", name.local)),
                    None => Err(MarkupError::InvalidName(name.to_string())),
                }
            }
        }
    }
}

fn write_root(writer: &mut Writer<Vec<u8>>, root: &Element) -> Result<(), MarkupError> {
    let prefixes = Prefixes::collect(root);
    let declarations: Vec<(String, String)> = prefixes
        .order
        .iter()
        .filter_map(|ns| {
            prefixes
                .map
                .get(ns)
                .map(|prefix| (format!("xmlns:{prefix}"), ns.clone()))
        })
        .collect();
    write_element(writer, root, &prefixes, &declarations)
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    element: &Element,
    prefixes: &Prefixes,
    declarations: &[(String, String)],
) -> Result<(), MarkupError> {
    let name = prefixes.format(&element.tag)?;
    let mut start = BytesStart::new(name.as_str());

    for (key, value) in declarations {
        start.push_attribute((key.as_str(), value.as_str()));
    }
    for (key, value) in &element.attributes {
        let key = prefixes.format(key)?;
        check_chars(value, || format!("attribute {key} of <{name}>"))?;
        start.push_attribute((key.as_str(), value.as_str()));
    }

    let text = element.text.as_deref().filter(|t| !t.is_empty());
    if text.is_none() && element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if let Some(text) = text {
        check_chars(text, || format!("text of <{name}>"))?;
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }
    for child in &element.children {
        write_element(writer, child, prefixes, &[])?;
    }
    writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
    Ok(())
}

/// Reject characters outside the XML 1.0 `Char` production.
fn check_chars(text: &str, context: impl FnOnce() -> String) -> Result<(), MarkupError> {
    let invalid = text.chars().find(|&c| {
        let code = c as u32;
        (code < 0x20 && !matches!(c, '\t' | '\n' | '\r')) || code == 0xFFFE || code == 0xFFFF
    });
    match invalid {
        Some(c) => Err(MarkupError::InvalidCharacter {
            code: c as u32,
            context: context(),
        }),
        None => Ok(()),
    }
}
