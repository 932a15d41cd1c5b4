//! Category classification and markup-name derivation.
//!
//! Every field resolves to exactly one [`Category`] when its schema is first
//! used. The predicates overlap (a URL is also a string attribute, a
//! `narrative` list is also a nested list), so the first match in
//! [`CATEGORY_PRIORITY`] wins.

use crate::markup::QName;
use crate::narrative::Narrative;
use crate::schema::{Cardinality, FieldSpec, FieldType, XmlModel};

/// Structural decode/encode strategy of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// URL attribute; an empty value is absent.
    UrlAttribute,
    /// `narrative` children decoded as language-tagged text.
    NarrativeList,
    /// Text of a child tag.
    ChildText,
    /// The reserved `xml:lang` attribute.
    LanguageAttribute,
    /// This element's own text.
    ElementText,
    /// This element's own text, as a number.
    NumericBody,
    /// One nested sub-element.
    NestedOne,
    /// Zero or more nested sub-elements.
    NestedMany,
    /// Primitive attribute: string, boolean, integer, decimal, date, datetime or code.
    Attribute,
}

/// Ranked category list; classification takes the first match.
pub const CATEGORY_PRIORITY: [Category; 9] = [
    Category::UrlAttribute,
    Category::NarrativeList,
    Category::ChildText,
    Category::LanguageAttribute,
    Category::ElementText,
    Category::NumericBody,
    Category::NestedOne,
    Category::NestedMany,
    Category::Attribute,
];

/// Literal tag of narrative children.
pub const NARRATIVE_TAG: &str = "narrative";

impl Category {
    /// Whether a field declaration fits this category.
    #[must_use]
    pub fn matches(self, spec: &FieldSpec) -> bool {
        let one = spec.cardinality == Cardinality::One;
        let ty = &spec.field_type;
        match self {
            Category::UrlAttribute => one && matches!(ty, FieldType::Url),
            Category::NarrativeList => {
                !one && (matches!(ty, FieldType::Narrative) || is_narrative_list(spec))
            }
            Category::ChildText => one && matches!(ty, FieldType::Text | FieldType::TextInt),
            Category::LanguageAttribute => one && matches!(ty, FieldType::Language),
            Category::ElementText => one && matches!(ty, FieldType::ElementText),
            Category::NumericBody => one && matches!(ty, FieldType::DecimalText),
            Category::NestedOne => one && !ty.is_scalar(),
            Category::NestedMany => !one && !ty.is_scalar(),
            Category::Attribute => one && ty.is_scalar(),
        }
    }

    /// Whether values of this category live in an attribute.
    #[must_use]
    pub fn is_attribute(self) -> bool {
        matches!(
            self,
            Category::UrlAttribute | Category::LanguageAttribute | Category::Attribute
        )
    }
}

/// A generic nested list of [`Narrative`](crate::narrative::Narrative)
/// only counts as narratives under the literal `narrative` name.
fn is_narrative_list(spec: &FieldSpec) -> bool {
    spec.name == NARRATIVE_TAG
        && spec
            .field_type
            .nested_schema()
            .is_some_and(|schema| std::ptr::eq(schema, Narrative::schema()))
}

/// Classify a field; `None` means it fits no category.
///
/// # Examples
/// ```
/// use iatibind_engine::{classify, Category, FieldSpec, FieldType};
///
/// assert_eq!(classify(&FieldSpec::narratives()), Some(Category::NarrativeList));
/// assert_eq!(classify(&FieldSpec::new("ref", FieldType::Str)), Some(Category::Attribute));
/// assert_eq!(classify(&FieldSpec::new("ref", FieldType::Str).many()), None);
/// ```
#[must_use]
pub fn classify(spec: &FieldSpec) -> Option<Category> {
    CATEGORY_PRIORITY
        .iter()
        .copied()
        .find(|category| category.matches(spec))
}

/// Attribute or tag name of a field.
///
/// An explicit override wins; language fields use `xml:lang`; otherwise
/// leading and trailing underscores are stripped and the rest become hyphens.
#[must_use]
pub fn markup_name(spec: &FieldSpec) -> QName {
    if let Some(name) = spec.markup {
        return QName::from_clark(name);
    }
    if matches!(spec.field_type, FieldType::Language) {
        return QName::xml("lang");
    }
    QName::local(derive_name(spec.name))
}

/// `default_currency` → `default-currency`, `type_` → `type`.
#[must_use]
pub fn derive_name(field_name: &str) -> String {
    field_name.trim_matches('_').replace('_', "-")
}

/// Fallback tag for a model encoded without an owning field.
///
/// # Examples
/// ```
/// use iatibind_engine::classify::tag_for_type;
///
/// assert_eq!(tag_for_type("ReportingOrg"), "reporting-org");
/// assert_eq!(tag_for_type("IatiActivities"), "iati-activities");
/// ```
#[must_use]
pub fn tag_for_type(type_name: &str) -> String {
    let mut tag = String::with_capacity(type_name.len() + 4);
    for (i, c) in type_name.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            tag.push('-');
        }
        tag.extend(c.to_lowercase());
    }
    tag
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::XML_NAMESPACE;

    fn matching(spec: &FieldSpec) -> Vec<Category> {
        CATEGORY_PRIORITY
            .iter()
            .copied()
            .filter(|c| c.matches(spec))
            .collect()
    }

    #[test]
    fn test_url_beats_attribute() {
        let spec = FieldSpec::new("linked_data_uri", FieldType::Url);
        assert_eq!(matching(&spec), [Category::UrlAttribute, Category::Attribute]);
        assert_eq!(classify(&spec), Some(Category::UrlAttribute));
    }

    #[test]
    fn test_narrative_list_beats_nested_many() {
        let spec = FieldSpec::narratives();
        assert_eq!(matching(&spec), [Category::NarrativeList, Category::NestedMany]);
        assert_eq!(classify(&spec), Some(Category::NarrativeList));
    }

    #[test]
    fn test_narrative_list_under_any_field_name() {
        let spec = FieldSpec::new("description", FieldType::Narrative).many();
        assert_eq!(classify(&spec), Some(Category::NarrativeList));
        // Tag comes from the owning field; narrative children are found by literal name
        assert_eq!(markup_name(&spec), QName::local("description"));
    }

    #[test]
    fn test_nested_narrative_list_needs_literal_name() {
        assert_eq!(
            classify(&FieldSpec::nested::<Narrative>("narrative").many()),
            Some(Category::NarrativeList)
        );
        assert_eq!(
            classify(&FieldSpec::nested::<Narrative>("names").many()),
            Some(Category::NestedMany)
        );
    }

    #[test]
    fn test_single_narrative_is_nested_one() {
        let spec = FieldSpec::new("narrative", FieldType::Narrative);
        assert_eq!(classify(&spec), Some(Category::NestedOne));
    }

    #[test]
    fn test_child_text_beats_attribute() {
        let spec = FieldSpec::new("iati_identifier", FieldType::Text);
        assert_eq!(classify(&spec), Some(Category::ChildText));
        let spec = FieldSpec::new("datasets_count", FieldType::TextInt);
        assert_eq!(classify(&spec), Some(Category::ChildText));
    }

    #[test]
    fn test_language_element_text_numeric_body() {
        assert_eq!(
            classify(&FieldSpec::new("lang", FieldType::Language)),
            Some(Category::LanguageAttribute)
        );
        assert_eq!(
            classify(&FieldSpec::new("text", FieldType::ElementText)),
            Some(Category::ElementText)
        );
        assert_eq!(
            classify(&FieldSpec::new("amount", FieldType::DecimalText)),
            Some(Category::NumericBody)
        );
    }

    #[test]
    fn test_nested_cardinality() {
        assert_eq!(
            classify(&FieldSpec::nested::<Narrative>("owner")),
            Some(Category::NestedOne)
        );
        assert_eq!(
            classify(&FieldSpec::nested::<Narrative>("owner").many()),
            Some(Category::NestedMany)
        );
    }

    #[test]
    fn test_primitives_are_attributes() {
        for ty in [
            FieldType::Str,
            FieldType::Bool,
            FieldType::Int,
            FieldType::Decimal,
            FieldType::Date,
            FieldType::DateTime,
            FieldType::Code(&["1", "2"]),
        ] {
            assert_eq!(classify(&FieldSpec::new("x", ty)), Some(Category::Attribute));
        }
    }

    #[test]
    fn test_repeated_scalars_are_unmapped() {
        for ty in [FieldType::Str, FieldType::Url, FieldType::Text, FieldType::Language] {
            assert_eq!(classify(&FieldSpec::new("x", ty).many()), None);
        }
    }

    #[test]
    fn test_every_declaration_gets_at_most_one_category() {
        let spec = FieldSpec::new("value_date", FieldType::Date);
        assert_eq!(classify(&spec).into_iter().count(), 1);
    }

    #[test]
    fn test_markup_name_derivation() {
        assert_eq!(
            markup_name(&FieldSpec::new("default_currency", FieldType::Str)),
            QName::local("default-currency")
        );
        assert_eq!(
            markup_name(&FieldSpec::new("type_", FieldType::Str)),
            QName::local("type")
        );
        assert_eq!(
            markup_name(&FieldSpec::new("_ref_", FieldType::Str)),
            QName::local("ref")
        );
    }

    #[test]
    fn test_markup_name_language_is_reserved() {
        let name = markup_name(&FieldSpec::new("language_of_text", FieldType::Language));
        assert_eq!(name.namespace.as_deref(), Some(XML_NAMESPACE));
        assert_eq!(name.local, "lang");
    }

    #[test]
    fn test_markup_name_override() {
        let spec = FieldSpec::new("srs_name", FieldType::Str).markup("srsName");
        assert_eq!(markup_name(&spec), QName::local("srsName"));
    }

    #[test]
    fn test_tag_for_type() {
        assert_eq!(tag_for_type("Narrative"), "narrative");
        assert_eq!(tag_for_type("CodelistItem"), "codelist-item");
    }
}
