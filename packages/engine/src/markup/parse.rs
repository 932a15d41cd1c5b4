//! Parser adapter: materializes a roxmltree document into an owned [`Element`] tree.

use roxmltree::{Document, Node};

use super::element::{Element, QName};
use crate::error::MarkupError;

/// Parse XML text into its root element.
///
/// # Examples
/// ```
/// use iatibind_engine::markup::{parse, QName};
///
/// let root = parse(r#"<narrative xml:lang="fr">Mondial</narrative>"#).unwrap();
/// assert_eq!(root.text(), Some("Mondial"));
/// assert_eq!(root.attribute(&QName::xml("lang")), Some("fr"));
/// ```
pub fn parse(xml: &str) -> Result<Element, MarkupError> {
    let doc = Document::parse(xml)?;
    Ok(element_from_node(doc.root_element()))
}

/// Parse UTF-8 encoded XML bytes into its root element.
pub fn parse_bytes(bytes: &[u8]) -> Result<Element, MarkupError> {
    let xml = std::str::from_utf8(bytes)?;
    parse(xml.strip_prefix('\u{feff}').unwrap_or(xml))
}

/// Convert an element node and its element descendants.
///
/// The element's text is the text before its first child; text following a
/// child is not retained.
pub fn element_from_node(node: Node<'_, '_>) -> Element {
    let tag = node.tag_name();
    let mut element = Element::new(qname(tag.namespace(), tag.name()));

    element.attributes = node
        .attributes()
        .map(|attr| (qname(attr.namespace(), attr.name()), attr.value().to_string()))
        .collect();

    element.text = node.text().map(str::to_string);

    element.children = node
        .children()
        .filter(|child| child.is_element())
        .map(element_from_node)
        .collect();

    element
}

fn qname(namespace: Option<&str>, local: &str) -> QName {
    match namespace {
        Some(ns) => QName::namespaced(ns, local),
        None => QName::local(local),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_attributes_in_order() {
        let root = parse(r#"<reporting-org type="22" ref="X"/>"#).unwrap();
        let names: Vec<_> = root.attribute_names().map(ToString::to_string).collect();
        assert_eq!(names, ["type", "ref"]);
    }

    #[test]
    fn test_parse_xml_lang_is_namespaced() {
        let root = parse(r#"<narrative xml:lang="nl">A</narrative>"#).unwrap();
        assert_eq!(root.attributes[0].0, QName::xml("lang"));
    }

    #[test]
    fn test_parse_text_before_first_child() {
        let root = parse("<root>head<child>inner</child>tail</root>").unwrap();
        assert_eq!(root.text(), Some("head"));
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].text(), Some("inner"));
    }

    #[test]
    fn test_parse_skips_comments() {
        let root = parse("<root><!-- note --><a/></root>").unwrap();
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.text(), None);
    }

    #[test]
    fn test_parse_default_namespace() {
        let root = parse(r#"<root xmlns="urn:x"><item/></root>"#).unwrap();
        assert_eq!(root.tag, QName::namespaced("urn:x", "root"));
        assert_eq!(root.children[0].tag, QName::namespaced("urn:x", "item"));
    }

    #[test]
    fn test_parse_bytes_with_bom() {
        let root = parse_bytes("\u{feff}<a/>".as_bytes()).unwrap();
        assert_eq!(root.tag, QName::local("a"));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(parse("<a><b></a>"), Err(MarkupError::Parse(_))));
    }

    #[test]
    fn test_parse_bytes_rejects_invalid_utf8() {
        assert!(matches!(
            parse_bytes(&[0x3c, 0x61, 0xff, 0x2f, 0x3e]),
            Err(MarkupError::Encoding(_))
        ));
    }
}
