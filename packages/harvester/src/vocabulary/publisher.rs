//! IATI Registry publisher list, as served by
//! `https://www.iatiregistry.org/publisher/download/xml`.

use std::sync::LazyLock;

use serde::Serialize;

use iatibind_engine::{ConstructionError, FieldSpec, FieldType, Record, Schema, XmlModel};

/// One publisher. The registry serializes these as `<iati-identifier>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Publisher {
    pub id: String,
    pub publisher: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hq_country_or_region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datasets_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datasets_link: Option<String>,
}

impl XmlModel for Publisher {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "Publisher",
                vec![
                    FieldSpec::new("id", FieldType::Str).required(),
                    FieldSpec::new("publisher", FieldType::Text).required(),
                    FieldSpec::new("organization_type", FieldType::Text),
                    FieldSpec::new("hq_country_or_region", FieldType::Text),
                    FieldSpec::new("datasets_count", FieldType::TextInt),
                    FieldSpec::new("datasets_link", FieldType::Text),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            id: record.require("id")?,
            publisher: record.require("publisher")?,
            organization_type: record.take("organization_type")?,
            hq_country_or_region: record.take("hq_country_or_region")?,
            datasets_count: record.take("datasets_count")?,
            datasets_link: record.take("datasets_link")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id.as_str())
            .with("publisher", self.publisher.as_str())
            .with_opt("organization_type", self.organization_type.as_deref())
            .with_opt("hq_country_or_region", self.hq_country_or_region.as_deref())
            .with_opt("datasets_count", self.datasets_count)
            .with_opt("datasets_link", self.datasets_link.as_deref())
    }
}

/// `<iati-publishers-list>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IatiPublishersList {
    pub iati_identifier: Vec<Publisher>,
}

impl IatiPublishersList {
    /// Total datasets across publishers that report a count.
    #[must_use]
    pub fn total_datasets(&self) -> i64 {
        self.iati_identifier
            .iter()
            .filter_map(|p| p.datasets_count)
            .sum()
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Publisher> {
        self.iati_identifier.iter().find(|p| p.id == id)
    }
}

impl XmlModel for IatiPublishersList {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "IatiPublishersList",
                vec![FieldSpec::nested::<Publisher>("iati_identifier").many()],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            iati_identifier: record.take_models("iati_identifier")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new().with_models("iati_identifier", &self.iati_identifier)
    }
}
