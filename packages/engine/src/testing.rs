//! Small models shared by the unit tests.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;

use crate::error::ConstructionError;
use crate::narrative::Narrative;
use crate::schema::{CodeEnum, FieldSpec, FieldType, Schema, XmlModel};
use crate::value::Record;

#[derive(Debug, Clone, PartialEq)]
pub struct ReportingOrg {
    pub ref_: String,
    pub type_: i64,
    pub secondary_reporter: Option<bool>,
    pub narrative: Vec<Narrative>,
}

impl XmlModel for ReportingOrg {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "ReportingOrg",
                vec![
                    FieldSpec::new("ref", FieldType::Str).required(),
                    FieldSpec::new("type", FieldType::Int).required(),
                    FieldSpec::new("secondary_reporter", FieldType::Bool),
                    FieldSpec::narratives(),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            ref_: record.require("ref")?,
            type_: record.require("type")?,
            secondary_reporter: record.take("secondary_reporter")?,
            narrative: record.take_models("narrative")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("ref", self.ref_.as_str())
            .with("type", self.type_)
            .with_opt("secondary_reporter", self.secondary_reporter)
            .with_models("narrative", &self.narrative)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IsoDate {
    pub iso_date: NaiveDate,
}

impl XmlModel for IsoDate {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "IsoDate",
                vec![FieldSpec::new("iso_date", FieldType::Date).required()],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            iso_date: record.require("iso_date")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new().with("iso_date", self.iso_date)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Period {
    pub period_start: IsoDate,
    pub period_end: IsoDate,
}

impl XmlModel for Period {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "Period",
                vec![
                    FieldSpec::nested::<IsoDate>("period_start").required(),
                    FieldSpec::nested::<IsoDate>("period_end").required(),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            period_start: record.require_model("period_start")?,
            period_end: record.require_model("period_end")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with_model("period_start", Some(&self.period_start))
            .with_model("period_end", Some(&self.period_end))
    }
}

/// Same shape as [`Period`] under its own type name.
#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    pub period_start: IsoDate,
    pub period_end: IsoDate,
}

impl XmlModel for Budget {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "Budget",
                vec![
                    FieldSpec::nested::<IsoDate>("period_start").required(),
                    FieldSpec::nested::<IsoDate>("period_end").required(),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            period_start: record.require_model("period_start")?,
            period_end: record.require_model("period_end")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with_model("period_start", Some(&self.period_start))
            .with_model("period_end", Some(&self.period_end))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conditions {
    pub attached: bool,
    pub period: Option<Period>,
}

impl XmlModel for Conditions {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "Conditions",
                vec![
                    FieldSpec::new("attached", FieldType::Bool).required(),
                    FieldSpec::nested::<Period>("period"),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            attached: record.require("attached")?,
            period: record.take_model("period")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("attached", self.attached)
            .with_model("period", self.period.as_ref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrgRole {
    Funding,
    Accountable,
}

impl CodeEnum for OrgRole {
    const CODES: &'static [&'static str] = &["1", "2"];

    fn code(&self) -> &'static str {
        match self {
            OrgRole::Funding => "1",
            OrgRole::Accountable => "2",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(OrgRole::Funding),
            "2" => Some(OrgRole::Accountable),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Org {
    pub role: Option<OrgRole>,
}

impl XmlModel for Org {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new("Org", vec![FieldSpec::new("role", FieldType::Code(OrgRole::CODES))])
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            role: record.take_code("role")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new().with_code("role", self.role.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Amount {
    pub currency: Option<String>,
    pub amount: Option<Decimal>,
}

impl XmlModel for Amount {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "Amount",
                vec![
                    FieldSpec::new("currency", FieldType::Str),
                    FieldSpec::new("amount", FieldType::DecimalText),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            currency: record.take("currency")?,
            amount: record.take("amount")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with_opt("currency", self.currency.as_deref())
            .with_opt("amount", self.amount)
    }
}

/// One field of every category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sample {
    pub link: Option<String>,
    pub identifier: Option<String>,
    pub count: Option<i64>,
    pub count_min: Option<i64>,
    pub share: Option<Decimal>,
    pub day: Option<NaiveDate>,
    pub when: Option<DateTime<FixedOffset>>,
    pub amount: Option<Amount>,
    pub narrative: Vec<Narrative>,
}

fn count_at_least_min(record: &Record) -> Result<(), String> {
    let count = record.get("count").and_then(|v| match v {
        crate::value::Value::Int(i) => Some(*i),
        _ => None,
    });
    let min = record.get("count_min").and_then(|v| match v {
        crate::value::Value::Int(i) => Some(*i),
        _ => None,
    });
    match (count, min) {
        (Some(count), Some(min)) if count < min => {
            Err(format!("count {count} is below count-min {min}"))
        }
        _ => Ok(()),
    }
}

impl XmlModel for Sample {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "Sample",
                vec![
                    FieldSpec::new("link", FieldType::Url),
                    FieldSpec::new("identifier", FieldType::Text),
                    FieldSpec::new("count", FieldType::TextInt),
                    FieldSpec::new("count_min", FieldType::Int),
                    FieldSpec::new("share", FieldType::Decimal),
                    FieldSpec::new("day", FieldType::Date),
                    FieldSpec::new("when", FieldType::DateTime),
                    FieldSpec::nested::<Amount>("amount"),
                    FieldSpec::narratives(),
                ],
            )
            .with_check(count_at_least_min)
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            link: record.take("link")?,
            identifier: record.take("identifier")?,
            count: record.take("count")?,
            count_min: record.take("count_min")?,
            share: record.take("share")?,
            day: record.take("day")?,
            when: record.take("when")?,
            amount: record.take_model("amount")?,
            narrative: record.take_models("narrative")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with_opt("link", self.link.as_deref())
            .with_opt("identifier", self.identifier.as_deref())
            .with_opt("count", self.count)
            .with_opt("count_min", self.count_min)
            .with_opt("share", self.share)
            .with_opt("day", self.day)
            .with_opt("when", self.when)
            .with_model("amount", self.amount.as_ref())
            .with_models("narrative", &self.narrative)
    }
}

/// A markup override that is not a legal XML name.
#[derive(Debug, Clone, PartialEq)]
pub struct BadName {
    pub value: Option<String>,
}

impl XmlModel for BadName {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "BadName",
                vec![FieldSpec::new("value", FieldType::Str).markup("bad name")],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            value: record.take("value")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new().with_opt("value", self.value.as_deref())
    }
}

/// Narratives held under a field not named `narrative`.
#[derive(Debug, Clone, PartialEq)]
pub struct Desc {
    pub description: Vec<Narrative>,
}

impl XmlModel for Desc {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "Desc",
                vec![FieldSpec::new("description", FieldType::Narrative).many()],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            description: record.take_models("description")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new().with_models("description", &self.description)
    }
}
