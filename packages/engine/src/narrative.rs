//! Language-tagged text fragments.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::error::ConstructionError;
use crate::schema::{FieldSpec, FieldType, Schema, XmlModel};
use crate::value::Record;

/// A `<narrative>` fragment: its own text plus its own `xml:lang`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    pub text: Option<String>,
}

impl Narrative {
    /// A narrative in the document's default language.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            lang: None,
            text: Some(text.into()),
        }
    }

    #[must_use]
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }
}

impl XmlModel for Narrative {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "Narrative",
                vec![
                    FieldSpec::new("lang", FieldType::Language),
                    FieldSpec::new("text", FieldType::ElementText),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            lang: record.take("lang")?,
            text: record.take("text")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with_opt("lang", self.lang.as_deref())
            .with_opt("text", self.text.as_deref())
    }
}

/// An element whose only content is a list of narratives, such as
/// `<title>`, `<name>` or `<description>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Narratives {
    pub narrative: Vec<Narrative>,
}

impl Narratives {
    #[must_use]
    pub fn new(narrative: Vec<Narrative>) -> Self {
        Self { narrative }
    }

    /// The first narrative without an explicit language.
    #[must_use]
    pub fn default_narrative(&self) -> Option<&Narrative> {
        self.narrative.iter().find(|n| n.lang.is_none())
    }

    /// The first narrative in the given language.
    #[must_use]
    pub fn in_language(&self, lang: &str) -> Option<&Narrative> {
        self.narrative
            .iter()
            .find(|n| n.lang.as_deref() == Some(lang))
    }
}

impl XmlModel for Narratives {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> =
            LazyLock::new(|| Schema::new("Narratives", vec![FieldSpec::narratives()]));
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            narrative: record.take_models("narrative")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new().with_models("narrative", &self.narrative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narratives_lookup() {
        let title = Narratives::new(vec![
            Narrative::new("Global"),
            Narrative::new("Mondial").with_lang("fr"),
        ]);
        assert_eq!(
            title.default_narrative().and_then(|n| n.text.as_deref()),
            Some("Global")
        );
        assert_eq!(
            title.in_language("fr").and_then(|n| n.text.as_deref()),
            Some("Mondial")
        );
        assert!(title.in_language("nl").is_none());
    }

    #[test]
    fn test_narrative_record_omits_unset() {
        let record = Narrative::new("Planned start").to_record();
        assert!(!record.contains("lang"));
        assert_eq!(record.get("text").and_then(|v| v.as_str()), Some("Planned start"));
    }
}
