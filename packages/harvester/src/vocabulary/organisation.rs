//! Organisation elements.

use std::sync::LazyLock;

use serde::Serialize;

use iatibind_engine::{ConstructionError, FieldSpec, FieldType, Narrative, Record, Schema, XmlModel};

/// `<reporting-org>`: the organisation publishing the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportingOrg {
    #[serde(rename = "type")]
    pub type_: i64,
    #[serde(rename = "ref")]
    pub ref_: String,
    pub narrative: Vec<Narrative>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_reporter: Option<bool>,
}

impl XmlModel for ReportingOrg {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "ReportingOrg",
                vec![
                    FieldSpec::new("type", FieldType::Int).required(),
                    FieldSpec::new("ref", FieldType::Str).required(),
                    FieldSpec::narratives(),
                    FieldSpec::new("secondary_reporter", FieldType::Bool),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            type_: record.require("type")?,
            ref_: record.require("ref")?,
            narrative: record.take_models("narrative")?,
            secondary_reporter: record.take("secondary_reporter")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("type", self.type_)
            .with("ref", self.ref_.as_str())
            .with_models("narrative", &self.narrative)
            .with_opt("secondary_reporter", self.secondary_reporter)
    }
}
