//! `<result>`: the results framework of an activity, down to indicator
//! periods with their targets and actuals.

use std::sync::LazyLock;

use chrono::NaiveDate;
use serde::Serialize;

use iatibind_engine::{
    CodeEnum, ConstructionError, FieldSpec, FieldType, Narratives, Record, Schema, XmlModel,
};

use super::activity::{period_is_ordered, DocumentLink, IsoDate};
use super::code_enum;

code_enum! {
    /// ResultType codelist.
    pub enum ResultType {
        Output = "1",
        Outcome = "2",
        Impact = "3",
        Other = "9",
    }
}

code_enum! {
    /// IndicatorMeasure codelist.
    pub enum IndicatorMeasure {
        Unit = "1",
        Percentage = "2",
        Nominal = "3",
        Ordinal = "4",
        Qualitative = "5",
    }
}

/// A result code from an external results framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultReference {
    pub vocabulary: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary_uri: Option<String>,
}

impl XmlModel for ResultReference {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "ResultReference",
                vec![
                    FieldSpec::new("vocabulary", FieldType::Str).required(),
                    FieldSpec::new("code", FieldType::Str).required(),
                    FieldSpec::new("vocabulary_uri", FieldType::Url),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            vocabulary: record.require("vocabulary")?,
            code: record.require("code")?,
            vocabulary_uri: record.take("vocabulary_uri")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("vocabulary", self.vocabulary.as_str())
            .with("code", self.code.as_str())
            .with_opt("vocabulary_uri", self.vocabulary_uri.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndicatorReference {
    pub vocabulary: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicator_uri: Option<String>,
}

impl XmlModel for IndicatorReference {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "IndicatorReference",
                vec![
                    FieldSpec::new("vocabulary", FieldType::Str).required(),
                    FieldSpec::new("code", FieldType::Str).required(),
                    FieldSpec::new("indicator_uri", FieldType::Url),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            vocabulary: record.require("vocabulary")?,
            code: record.require("code")?,
            indicator_uri: record.take("indicator_uri")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("vocabulary", self.vocabulary.as_str())
            .with("code", self.code.as_str())
            .with_opt("indicator_uri", self.indicator_uri.as_deref())
    }
}

/// A disaggregation such as `sex` = `female`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dimension {
    pub name: String,
    pub value: String,
}

impl XmlModel for Dimension {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "Dimension",
                vec![
                    FieldSpec::new("name", FieldType::Str).required(),
                    FieldSpec::new("value", FieldType::Str).required(),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            name: record.require("name")?,
            value: record.require("value")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("name", self.name.as_str())
            .with("value", self.value.as_str())
    }
}

/// Points at a `<location>` of the activity by its `ref`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationRef {
    #[serde(rename = "ref")]
    pub ref_: String,
}

impl XmlModel for LocationRef {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "LocationRef",
                vec![FieldSpec::new("ref", FieldType::Str).required()],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            ref_: record.require("ref")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new().with("ref", self.ref_.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Baseline {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub location: Vec<LocationRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dimension: Vec<Dimension>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub document_link: Vec<DocumentLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<Narratives>,
}

impl XmlModel for Baseline {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "Baseline",
                vec![
                    FieldSpec::new("year", FieldType::Int),
                    FieldSpec::new("iso_date", FieldType::Date),
                    FieldSpec::new("value", FieldType::Str),
                    FieldSpec::nested::<LocationRef>("location").many(),
                    FieldSpec::nested::<Dimension>("dimension").many(),
                    FieldSpec::nested::<DocumentLink>("document_link").many(),
                    FieldSpec::nested::<Narratives>("comment"),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            year: record.take("year")?,
            iso_date: record.take("iso_date")?,
            value: record.take("value")?,
            location: record.take_models("location")?,
            dimension: record.take_models("dimension")?,
            document_link: record.take_models("document_link")?,
            comment: record.take_model("comment")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with_opt("year", self.year)
            .with_opt("iso_date", self.iso_date)
            .with_opt("value", self.value.as_deref())
            .with_models("location", &self.location)
            .with_models("dimension", &self.dimension)
            .with_models("document_link", &self.document_link)
            .with_model("comment", self.comment.as_ref())
    }
}

/// `<target>` or `<actual>` of an indicator period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeriodValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub location: Vec<LocationRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dimension: Vec<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<Narratives>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub document_link: Vec<DocumentLink>,
}

impl XmlModel for PeriodValue {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "PeriodValue",
                vec![
                    FieldSpec::new("value", FieldType::Str),
                    FieldSpec::nested::<LocationRef>("location").many(),
                    FieldSpec::nested::<Dimension>("dimension").many(),
                    FieldSpec::nested::<Narratives>("comment"),
                    FieldSpec::nested::<DocumentLink>("document_link").many(),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            value: record.take("value")?,
            location: record.take_models("location")?,
            dimension: record.take_models("dimension")?,
            comment: record.take_model("comment")?,
            document_link: record.take_models("document_link")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with_opt("value", self.value.as_deref())
            .with_models("location", &self.location)
            .with_models("dimension", &self.dimension)
            .with_model("comment", self.comment.as_ref())
            .with_models("document_link", &self.document_link)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndicatorPeriod {
    pub period_start: IsoDate,
    pub period_end: IsoDate,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub target: Vec<PeriodValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actual: Vec<PeriodValue>,
}

impl XmlModel for IndicatorPeriod {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "IndicatorPeriod",
                vec![
                    FieldSpec::nested::<IsoDate>("period_start").required(),
                    FieldSpec::nested::<IsoDate>("period_end").required(),
                    FieldSpec::nested::<PeriodValue>("target").many(),
                    FieldSpec::nested::<PeriodValue>("actual").many(),
                ],
            )
            .with_check(period_is_ordered)
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            period_start: record.require_model("period_start")?,
            period_end: record.require_model("period_end")?,
            target: record.take_models("target")?,
            actual: record.take_models("actual")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with_model("period_start", Some(&self.period_start))
            .with_model("period_end", Some(&self.period_end))
            .with_models("target", &self.target)
            .with_models("actual", &self.actual)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Indicator {
    pub measure: IndicatorMeasure,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ascending: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregation_status: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Narratives>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Narratives>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub document_link: Vec<DocumentLink>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reference: Vec<IndicatorReference>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub baseline: Vec<Baseline>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub period: Vec<IndicatorPeriod>,
}

impl Indicator {
    /// Whether higher values are better; IATI defaults this to true.
    #[must_use]
    pub fn is_ascending(&self) -> bool {
        self.ascending.unwrap_or(true)
    }
}

impl XmlModel for Indicator {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "Indicator",
                vec![
                    FieldSpec::new("measure", FieldType::Code(IndicatorMeasure::CODES)).required(),
                    FieldSpec::new("ascending", FieldType::Bool),
                    FieldSpec::new("aggregation_status", FieldType::Bool),
                    FieldSpec::nested::<Narratives>("title"),
                    FieldSpec::nested::<Narratives>("description"),
                    FieldSpec::nested::<DocumentLink>("document_link").many(),
                    FieldSpec::nested::<IndicatorReference>("reference").many(),
                    FieldSpec::nested::<Baseline>("baseline").many(),
                    FieldSpec::nested::<IndicatorPeriod>("period").many(),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            measure: record.require_code("measure")?,
            ascending: record.take("ascending")?,
            aggregation_status: record.take("aggregation_status")?,
            title: record.take_model("title")?,
            description: record.take_model("description")?,
            document_link: record.take_models("document_link")?,
            reference: record.take_models("reference")?,
            baseline: record.take_models("baseline")?,
            period: record.take_models("period")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with_code("measure", Some(&self.measure))
            .with_opt("ascending", self.ascending)
            .with_opt("aggregation_status", self.aggregation_status)
            .with_model("title", self.title.as_ref())
            .with_model("description", self.description.as_ref())
            .with_models("document_link", &self.document_link)
            .with_models("reference", &self.reference)
            .with_models("baseline", &self.baseline)
            .with_models("period", &self.period)
    }
}

/// `<result>` of an activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityResult {
    #[serde(rename = "type")]
    pub type_: ResultType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregation_status: Option<bool>,
    pub title: Narratives,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Narratives>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub document_link: Vec<DocumentLink>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reference: Vec<ResultReference>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub indicator: Vec<Indicator>,
}

impl XmlModel for ActivityResult {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "Result",
                vec![
                    FieldSpec::new("type_", FieldType::Code(ResultType::CODES)).required(),
                    FieldSpec::new("aggregation_status", FieldType::Bool),
                    FieldSpec::nested::<Narratives>("title").required(),
                    FieldSpec::nested::<Narratives>("description"),
                    FieldSpec::nested::<DocumentLink>("document_link").many(),
                    FieldSpec::nested::<ResultReference>("reference").many(),
                    FieldSpec::nested::<Indicator>("indicator").many(),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            type_: record.require_code("type_")?,
            aggregation_status: record.take("aggregation_status")?,
            title: record.require_model("title")?,
            description: record.take_model("description")?,
            document_link: record.take_models("document_link")?,
            reference: record.take_models("reference")?,
            indicator: record.take_models("indicator")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with_code("type_", Some(&self.type_))
            .with_opt("aggregation_status", self.aggregation_status)
            .with_model("title", Some(&self.title))
            .with_model("description", self.description.as_ref())
            .with_models("document_link", &self.document_link)
            .with_models("reference", &self.reference)
            .with_models("indicator", &self.indicator)
    }
}
