//! Owned element tree exchanged with the parser and writer adapters.

use std::fmt;

/// Namespace bound to the reserved `xml:` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Qualified name of a tag or attribute.
///
/// Displays in Clark notation (`{namespace}local`) when namespaced.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QName {
    pub namespace: Option<String>,
    pub local: String,
}

impl QName {
    /// A name without namespace.
    #[must_use]
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local: local.into(),
        }
    }

    /// A name in the given namespace.
    #[must_use]
    pub fn namespaced(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local: local.into(),
        }
    }

    /// A name in the reserved XML namespace, e.g. `xml:lang`.
    #[must_use]
    pub fn xml(local: impl Into<String>) -> Self {
        Self::namespaced(XML_NAMESPACE, local)
    }

    /// Parse Clark notation; anything else is a bare name.
    ///
    /// # Examples
    /// ```
    /// use iatibind_engine::markup::{QName, XML_NAMESPACE};
    ///
    /// let lang = QName::from_clark("{http://www.w3.org/XML/1998/namespace}lang");
    /// assert_eq!(lang.namespace.as_deref(), Some(XML_NAMESPACE));
    /// assert_eq!(QName::from_clark("xml:lang"), QName::local("xml:lang"));
    /// ```
    #[must_use]
    pub fn from_clark(name: &str) -> Self {
        if let Some(rest) = name.strip_prefix('{') {
            if let Some((namespace, local)) = rest.split_once('}') {
                return Self::namespaced(namespace, local);
            }
        }
        Self::local(name)
    }

    /// Whether this name is in the XML namespace.
    #[must_use]
    pub fn is_xml(&self) -> bool {
        self.namespace.as_deref() == Some(XML_NAMESPACE)
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{ns}}}{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

impl From<&str> for QName {
    fn from(name: &str) -> Self {
        Self::from_clark(name)
    }
}

impl From<String> for QName {
    fn from(name: String) -> Self {
        Self::from_clark(&name)
    }
}

/// One markup element: tag, ordered attributes, ordered children, own text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: QName,
    pub attributes: Vec<(QName, String)>,
    pub children: Vec<Element>,
    pub text: Option<String>,
}

impl Element {
    /// Create an empty element.
    #[must_use]
    pub fn new(tag: impl Into<QName>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Add an attribute (builder form of [`Element::set_attribute`]).
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<QName>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Append a child element.
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Set the element's own text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attribute(&mut self, name: impl Into<QName>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Get an attribute value.
    #[must_use]
    pub fn attribute(&self, name: &QName) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Find the first child element with the given tag.
    #[must_use]
    pub fn find_child(&self, tag: &QName) -> Option<&Element> {
        self.children.iter().find(|child| child.tag == *tag)
    }

    /// Find all child elements with the given tag.
    pub fn find_children<'a>(&'a self, tag: &'a QName) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |child| child.tag == *tag)
    }

    /// Names of all attributes present, in document order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &QName> {
        self.attributes.iter().map(|(key, _)| key)
    }

    /// Tags of all immediate children, in document order.
    pub fn child_tags(&self) -> impl Iterator<Item = &QName> {
        self.children.iter().map(|child| &child.tag)
    }

    /// Text content, or `None` when absent.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qname_display() {
        assert_eq!(QName::local("ref").to_string(), "ref");
        assert_eq!(
            QName::xml("lang").to_string(),
            "{http://www.w3.org/XML/1998/namespace}lang"
        );
    }

    #[test]
    fn test_qname_from_clark_round_trip() {
        let name = QName::namespaced("http://example.com", "item");
        assert_eq!(QName::from_clark(&name.to_string()), name);
    }

    #[test]
    fn test_qname_unterminated_brace_is_local() {
        assert_eq!(QName::from_clark("{broken"), QName::local("{broken"));
    }

    #[test]
    fn test_set_attribute_replaces_in_place() {
        let mut el = Element::new("org")
            .with_attribute("ref", "A")
            .with_attribute("type", "10");
        el.set_attribute("ref", "B");

        assert_eq!(el.attribute(&QName::local("ref")), Some("B"));
        assert_eq!(el.attributes.len(), 2);
        assert_eq!(el.attributes[0].0, QName::local("ref"));
    }

    #[test]
    fn test_find_children() {
        let el = Element::new("title")
            .with_child(Element::new("narrative").with_text("A"))
            .with_child(Element::new("other"))
            .with_child(Element::new("narrative").with_text("B"));
        let tag = QName::local("narrative");

        let texts: Vec<_> = el.find_children(&tag).filter_map(Element::text).collect();
        assert_eq!(texts, ["A", "B"]);
        assert!(el.find_child(&QName::local("missing")).is_none());
    }

    #[test]
    fn test_find_child_is_namespace_aware() {
        let el = Element::new("root").with_child(Element::new(QName::namespaced("urn:x", "item")));

        assert!(el.find_child(&QName::local("item")).is_none());
        assert!(el.find_child(&QName::namespaced("urn:x", "item")).is_some());
    }
}
