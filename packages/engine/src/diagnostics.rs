//! Coverage diagnostics: document data the schema does not represent.
//!
//! The check compares the attribute names and immediate child tags of one
//! element against the markup names of its model's fields. Attribute and tag
//! names share one expected set, regardless of which category a field has.
//!
//! Known gap: the expected set holds the descriptor markup names exactly, so a
//! name the decoder reaches by another route is flagged anyway. A bare
//! `xml:lang` key (as opposed to the namespaced form the parser produces) is
//! read by language fields but still reported here.

use std::collections::BTreeSet;
use std::fmt;

use crate::markup::{Element, QName};
use crate::schema::ModelDescriptor;

/// Where the unrepresented data sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UnusedKind {
    Attribute,
    Element,
}

/// Non-fatal: data present in the document but dropped from the decoded model.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CoverageWarning {
    /// Model type the element was decoded as.
    pub model: &'static str,
    /// Element path from the decode root.
    pub path: String,
    pub kind: UnusedKind,
    /// Attribute or tag name, Clark notation when namespaced.
    pub name: String,
}

impl fmt::Display for CoverageWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            UnusedKind::Attribute => "attribute",
            UnusedKind::Element => "element",
        };
        write!(
            f,
            "Unprocessed {kind} '{}' on <{}> ({})",
            self.name, self.path, self.model
        )
    }
}

/// Collector passed explicitly through a decode call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    warnings: Vec<CoverageWarning>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, warning: CoverageWarning) {
        tracing::debug!(warning = %warning, "Coverage warning");
        self.warnings.push(warning);
    }

    pub fn extend(&mut self, warnings: impl IntoIterator<Item = CoverageWarning>) {
        for warning in warnings {
            self.push(warning);
        }
    }

    #[must_use]
    pub fn warnings(&self) -> &[CoverageWarning] {
        &self.warnings
    }

    #[must_use]
    pub fn into_warnings(self) -> Vec<CoverageWarning> {
        self.warnings
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Report attributes and child tags of `element` that no field of
/// `descriptor` names. Results are sorted, attributes first.
#[must_use]
pub fn check_coverage(
    descriptor: &ModelDescriptor,
    element: &Element,
    path: &str,
) -> Vec<CoverageWarning> {
    let expected: BTreeSet<&QName> = descriptor.markup_names().collect();
    let attributes: BTreeSet<&QName> = element.attribute_names().collect();
    let tags: BTreeSet<&QName> = element.child_tags().collect();

    let warning = |kind: UnusedKind, name: &QName| CoverageWarning {
        model: descriptor.type_name,
        path: path.to_string(),
        kind,
        name: name.to_string(),
    };

    attributes
        .difference(&expected)
        .map(|name| warning(UnusedKind::Attribute, *name))
        .chain(
            tags.difference(&expected)
                .map(|name| warning(UnusedKind::Element, *name)),
        )
        .collect()
}
