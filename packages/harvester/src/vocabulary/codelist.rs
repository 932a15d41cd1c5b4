//! IATI codelists: the controlled vocabularies behind every `code` attribute.

use std::path::Path;
use std::sync::LazyLock;

use chrono::NaiveDate;
use serde::Serialize;

use iatibind_engine::{
    CodeEnum,
    ConstructionError, DecodeOptions, Decoded, FieldSpec, FieldType, Narratives, Record, Schema,
    XmlModel,
};

use super::code_enum;
use crate::error::Result;
use crate::fetch::load_file;

code_enum! {
    /// Lifecycle of a codelist item.
    pub enum CodelistStatus {
        Active = "active",
        Withdrawn = "withdrawn",
    }
}

/// `<codelist-item>`: one code with its names and lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodelistItem {
    pub code: String,
    pub name: Narratives,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Narratives>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Narratives>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_database: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CodelistStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub withdrawal_date: Option<NaiveDate>,
}

impl CodelistItem {
    /// Withdrawn items stay in the list for old data but should not be used.
    #[must_use]
    pub fn is_withdrawn(&self) -> bool {
        self.status == Some(CodelistStatus::Withdrawn)
    }

    /// Name in the default language.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .default_narrative()
            .or_else(|| self.name.narrative.first())
            .and_then(|n| n.text.as_deref())
    }
}

impl XmlModel for CodelistItem {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "CodelistItem",
                vec![
                    FieldSpec::new("code", FieldType::Text).required(),
                    FieldSpec::nested::<Narratives>("name").required(),
                    FieldSpec::nested::<Narratives>("description"),
                    FieldSpec::nested::<Narratives>("category"),
                    FieldSpec::new("url", FieldType::Url),
                    FieldSpec::new("public_database", FieldType::Bool),
                    FieldSpec::new("status", FieldType::Code(CodelistStatus::CODES)),
                    FieldSpec::new("activation_date", FieldType::Date),
                    FieldSpec::new("withdrawal_date", FieldType::Date),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> std::result::Result<Self, ConstructionError> {
        Ok(Self {
            code: record.require("code")?,
            name: record.require_model("name")?,
            description: record.take_model("description")?,
            category: record.take_model("category")?,
            url: record.take("url")?,
            public_database: record.take("public_database")?,
            status: record.take_code("status")?,
            activation_date: record.take("activation_date")?,
            withdrawal_date: record.take("withdrawal_date")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("code", self.code.as_str())
            .with_model("name", Some(&self.name))
            .with_model("description", self.description.as_ref())
            .with_model("category", self.category.as_ref())
            .with_opt("url", self.url.as_deref())
            .with_opt("public_database", self.public_database)
            .with_code("status", self.status.as_ref())
            .with_opt("activation_date", self.activation_date)
            .with_opt("withdrawal_date", self.withdrawal_date)
    }
}

/// `<codelist-items>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CodelistItems {
    pub codelist_item: Vec<CodelistItem>,
}

impl XmlModel for CodelistItems {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "CodelistItems",
                vec![FieldSpec::nested::<CodelistItem>("codelist_item").many()],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> std::result::Result<Self, ConstructionError> {
        Ok(Self {
            codelist_item: record.take_models("codelist_item")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new().with_models("codelist_item", &self.codelist_item)
    }
}

/// `<metadata>` of a codelist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodelistMetadata {
    pub name: Narratives,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Narratives>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Narratives>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl XmlModel for CodelistMetadata {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "CodelistMetadata",
                vec![
                    FieldSpec::nested::<Narratives>("name").required(),
                    FieldSpec::nested::<Narratives>("description"),
                    FieldSpec::nested::<Narratives>("category"),
                    FieldSpec::new("url", FieldType::Text),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> std::result::Result<Self, ConstructionError> {
        Ok(Self {
            name: record.require_model("name")?,
            description: record.take_model("description")?,
            category: record.take_model("category")?,
            url: record.take("url")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with_model("name", Some(&self.name))
            .with_model("description", self.description.as_ref())
            .with_model("category", self.category.as_ref())
            .with_opt("url", self.url.as_deref())
    }
}

/// `<codelist>`: a named vocabulary and its items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Codelist {
    pub name: String,
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub ref_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_codelist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complete: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedded: Option<bool>,
    pub metadata: CodelistMetadata,
    pub codelist_items: CodelistItems,
}

impl Codelist {
    /// Load a codelist document from disk.
    ///
    /// # Errors
    /// IO failures, malformed XML, or a document that is not a codelist.
    pub fn from_file(path: &Path) -> Result<Decoded<Codelist>> {
        load_file(path, DecodeOptions::default())
    }

    #[must_use]
    pub fn items(&self) -> &[CodelistItem] {
        &self.codelist_items.codelist_item
    }

    /// Look up an item by code.
    #[must_use]
    pub fn item(&self, code: &str) -> Option<&CodelistItem> {
        self.items().iter().find(|item| item.code == code)
    }

    /// Codes that are not withdrawn, in document order.
    pub fn active_codes(&self) -> impl Iterator<Item = &str> {
        self.items()
            .iter()
            .filter(|item| !item.is_withdrawn())
            .map(|item| item.code.as_str())
    }
}

impl XmlModel for Codelist {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "Codelist",
                vec![
                    FieldSpec::new("name", FieldType::Str).required(),
                    FieldSpec::new("ref_", FieldType::Str),
                    FieldSpec::new("category_codelist", FieldType::Str),
                    FieldSpec::new("lang", FieldType::Language),
                    FieldSpec::new("complete", FieldType::Bool),
                    FieldSpec::new("embedded", FieldType::Bool),
                    FieldSpec::nested::<CodelistMetadata>("metadata").required(),
                    FieldSpec::nested::<CodelistItems>("codelist_items").required(),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> std::result::Result<Self, ConstructionError> {
        Ok(Self {
            name: record.require("name")?,
            ref_: record.take("ref_")?,
            category_codelist: record.take("category_codelist")?,
            lang: record.take("lang")?,
            complete: record.take("complete")?,
            embedded: record.take("embedded")?,
            metadata: record.require_model("metadata")?,
            codelist_items: record.require_model("codelist_items")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("name", self.name.as_str())
            .with_opt("ref_", self.ref_.as_deref())
            .with_opt("category_codelist", self.category_codelist.as_deref())
            .with_opt("lang", self.lang.as_deref())
            .with_opt("complete", self.complete)
            .with_opt("embedded", self.embedded)
            .with_model("metadata", Some(&self.metadata))
            .with_model("codelist_items", Some(&self.codelist_items))
    }
}
