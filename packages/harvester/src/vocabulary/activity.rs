//! IATI activity files: `<iati-activities>` and everything below it.
//!
//! Everything up to `<result>` is declared; results live in
//! [`result`](super::result). The CRS extensions (`<crs-add>`, `<fss>`) are
//! not, so they decode fine and show up as coverage warnings.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use iatibind_engine::{
    CodeEnum, ConstructionError, FieldSpec, FieldType, Narrative, Narratives, Record, Schema,
    Value, XmlModel,
};

use super::code_enum;
use super::organisation::ReportingOrg;
use super::result::ActivityResult;

code_enum! {
    /// Version attribute of `<iati-activities>`.
    pub enum IatiVersion {
        V2_01 = "2.01",
        V2_02 = "2.02",
        V2_03 = "2.03",
    }
}

code_enum! {
    /// OrganisationType codelist.
    pub enum OrganisationType {
        Government = "10",
        LocalGovernment = "11",
        OtherPublicSector = "15",
        InternationalNgo = "21",
        NationalNgo = "22",
        RegionalNgo = "23",
        PartnerCountryBasedNgo = "24",
        PublicPrivatePartnership = "30",
        Multilateral = "40",
        Foundation = "60",
        PrivateSector = "70",
        PrivateSectorInProviderCountry = "71",
        PrivateSectorInAidRecipientCountry = "72",
        PrivateSectorInThirdCountry = "73",
        AcademicTrainingAndResearch = "80",
        Other = "90",
    }
}

code_enum! {
    /// OrganisationRole codelist.
    pub enum OrganisationRole {
        Funding = "1",
        Accountable = "2",
        Extending = "3",
        Implementing = "4",
    }
}

code_enum! {
    /// ActivityDateType codelist.
    pub enum ActivityDateType {
        PlannedStart = "1",
        ActualStart = "2",
        PlannedEnd = "3",
        ActualEnd = "4",
    }
}

code_enum! {
    /// ActivityStatus codelist.
    pub enum ActivityStatusCode {
        Pipeline = "1",
        Implementation = "2",
        Finalisation = "3",
        Closed = "4",
        Cancelled = "5",
        Suspended = "6",
    }
}

code_enum! {
    /// OtherIdentifierType codelist.
    pub enum OtherIdentifierType {
        Internal = "A1",
        Crs = "A2",
        Previous = "A3",
        OtherActivity = "A9",
        PreviousReportingOrganisation = "B1",
        OtherOrganisation = "B9",
    }
}

code_enum! {
    /// ContactType codelist.
    pub enum ContactType {
        General = "1",
        ProjectManagement = "2",
        FinancialManagement = "3",
        Communications = "4",
    }
}

code_enum! {
    /// RelatedActivityType codelist.
    pub enum RelatedActivityType {
        Parent = "1",
        Child = "2",
        Sibling = "3",
        CoFunded = "4",
        ThirdParty = "5",
    }
}

fn percentage_in_range(record: &Record) -> Result<(), String> {
    match record.get("percentage") {
        Some(Value::Decimal(p)) if p.is_sign_negative() || *p > Decimal::ONE_HUNDRED => {
            Err(format!("percentage {p} is outside 0-100"))
        }
        _ => Ok(()),
    }
}

pub(super) fn period_is_ordered(record: &Record) -> Result<(), String> {
    let date = |name: &str| match record
        .get(name)
        .and_then(Value::as_record)
        .and_then(|r| r.get("iso_date"))
    {
        Some(Value::Date(d)) => Some(*d),
        _ => None,
    };
    match (date("period_start"), date("period_end")) {
        (Some(start), Some(end)) if end < start => {
            Err(format!("period-end {end} is before period-start {start}"))
        }
        _ => Ok(()),
    }
}

/// Any element carrying only an `iso-date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
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

/// `<value>`: an amount in its body with currency and valuation date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Money {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_date: Option<NaiveDate>,
    pub amount: Decimal,
}

impl XmlModel for Money {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "Value",
                vec![
                    FieldSpec::new("currency", FieldType::Str),
                    FieldSpec::new("value_date", FieldType::Date),
                    FieldSpec::new("amount", FieldType::DecimalText).required(),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            currency: record.take("currency")?,
            value_date: record.take("value_date")?,
            amount: record.require("amount")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with_opt("currency", self.currency.as_deref())
            .with_opt("value_date", self.value_date)
            .with("amount", self.amount)
    }
}

/// Elements that only carry a code from some vocabulary, such as
/// `<collaboration-type>`, `<flow-type>` or `<location-reach>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodedValue {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary: Option<String>,
}

impl XmlModel for CodedValue {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "CodedValue",
                vec![
                    FieldSpec::new("code", FieldType::Str).required(),
                    FieldSpec::new("vocabulary", FieldType::Str),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            code: record.require("code")?,
            vocabulary: record.take("vocabulary")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("code", self.code.as_str())
            .with_opt("vocabulary", self.vocabulary.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Description {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<i64>,
    pub narrative: Vec<Narrative>,
}

impl XmlModel for Description {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "Description",
                vec![
                    FieldSpec::new("type", FieldType::Int),
                    FieldSpec::narratives(),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            type_: record.take("type")?,
            narrative: record.take_models("narrative")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with_opt("type", self.type_)
            .with_models("narrative", &self.narrative)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipatingOrg {
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub ref_: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<OrganisationType>,
    pub role: OrganisationRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crs_channel_code: Option<String>,
    pub narrative: Vec<Narrative>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl XmlModel for ParticipatingOrg {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "ParticipatingOrg",
                vec![
                    FieldSpec::new("ref", FieldType::Str),
                    FieldSpec::new("type", FieldType::Code(OrganisationType::CODES)),
                    FieldSpec::new("role", FieldType::Code(OrganisationRole::CODES)).required(),
                    FieldSpec::new("activity_id", FieldType::Str),
                    FieldSpec::new("crs_channel_code", FieldType::Str),
                    FieldSpec::narratives(),
                    FieldSpec::new("lang", FieldType::Language),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            ref_: record.take("ref")?,
            type_: record.take_code("type")?,
            role: record.require_code("role")?,
            activity_id: record.take("activity_id")?,
            crs_channel_code: record.take("crs_channel_code")?,
            narrative: record.take_models("narrative")?,
            lang: record.take("lang")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with_opt("ref", self.ref_.as_deref())
            .with_code("type", self.type_.as_ref())
            .with_code("role", Some(&self.role))
            .with_opt("activity_id", self.activity_id.as_deref())
            .with_opt("crs_channel_code", self.crs_channel_code.as_deref())
            .with_models("narrative", &self.narrative)
            .with_opt("lang", self.lang.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityDate {
    pub iso_date: NaiveDate,
    #[serde(rename = "type")]
    pub type_: ActivityDateType,
    pub narrative: Vec<Narrative>,
}

impl XmlModel for ActivityDate {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "ActivityDate",
                vec![
                    FieldSpec::new("iso_date", FieldType::Date).required(),
                    FieldSpec::new("type_", FieldType::Code(ActivityDateType::CODES)).required(),
                    FieldSpec::narratives(),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            iso_date: record.require("iso_date")?,
            type_: record.require_code("type_")?,
            narrative: record.take_models("narrative")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("iso_date", self.iso_date)
            .with_code("type_", Some(&self.type_))
            .with_models("narrative", &self.narrative)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivityStatus {
    pub code: ActivityStatusCode,
}

impl XmlModel for ActivityStatus {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "ActivityStatus",
                vec![FieldSpec::new("code", FieldType::Code(ActivityStatusCode::CODES)).required()],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            code: record.require_code("code")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new().with_code("code", Some(&self.code))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipientCountry {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<Decimal>,
    pub narrative: Vec<Narrative>,
}

impl XmlModel for RecipientCountry {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "RecipientCountry",
                vec![
                    FieldSpec::new("code", FieldType::Str).required(),
                    FieldSpec::new("percentage", FieldType::Decimal),
                    FieldSpec::narratives(),
                ],
            )
            .with_check(percentage_in_range)
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            code: record.require("code")?,
            percentage: record.take("percentage")?,
            narrative: record.take_models("narrative")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("code", self.code.as_str())
            .with_opt("percentage", self.percentage)
            .with_models("narrative", &self.narrative)
    }
}

/// `<pos>`: "latitude longitude" in the element body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pos {
    pub text: Option<String>,
}

impl Pos {
    /// Parsed `(latitude, longitude)`.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let mut parts = self.text.as_deref()?.split_whitespace();
        let lat = parts.next()?.parse().ok()?;
        let lon = parts.next()?.parse().ok()?;
        Some((lat, lon))
    }
}

impl XmlModel for Pos {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new("Pos", vec![FieldSpec::new("text", FieldType::ElementText)])
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            text: record.take("text")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new().with_opt("text", self.text.as_deref())
    }
}

/// WGS84 unless stated otherwise.
pub const DEFAULT_SRS_NAME: &str = "http://www.opengis.net/def/crs/EPSG/0/4326";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Point {
    #[serde(rename = "srsName", skip_serializing_if = "Option::is_none")]
    pub srs_name: Option<String>,
    pub pos: Pos,
}

impl Point {
    #[must_use]
    pub fn srs_name_or_default(&self) -> &str {
        self.srs_name.as_deref().unwrap_or(DEFAULT_SRS_NAME)
    }
}

impl XmlModel for Point {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "Point",
                vec![
                    FieldSpec::new("srs_name", FieldType::Str).markup("srsName"),
                    FieldSpec::nested::<Pos>("pos").required(),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            srs_name: record.take("srs_name")?,
            pos: record.require_model("pos")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with_opt("srs_name", self.srs_name.as_deref())
            .with_model("pos", Some(&self.pos))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Location {
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub ref_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_reach: Option<CodedValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Narratives>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Narratives>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_description: Option<Narratives>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exactness: Option<CodedValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_class: Option<CodedValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_designation: Option<CodedValue>,
}

impl XmlModel for Location {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "Location",
                vec![
                    FieldSpec::new("ref", FieldType::Str),
                    FieldSpec::nested::<CodedValue>("location_reach"),
                    FieldSpec::nested::<Narratives>("name"),
                    FieldSpec::nested::<Narratives>("description"),
                    FieldSpec::nested::<Narratives>("activity_description"),
                    FieldSpec::nested::<Point>("point"),
                    FieldSpec::nested::<CodedValue>("exactness"),
                    FieldSpec::nested::<CodedValue>("location_class"),
                    FieldSpec::nested::<CodedValue>("feature_designation"),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            ref_: record.take("ref")?,
            location_reach: record.take_model("location_reach")?,
            name: record.take_model("name")?,
            description: record.take_model("description")?,
            activity_description: record.take_model("activity_description")?,
            point: record.take_model("point")?,
            exactness: record.take_model("exactness")?,
            location_class: record.take_model("location_class")?,
            feature_designation: record.take_model("feature_designation")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with_opt("ref", self.ref_.as_deref())
            .with_model("location_reach", self.location_reach.as_ref())
            .with_model("name", self.name.as_ref())
            .with_model("description", self.description.as_ref())
            .with_model("activity_description", self.activity_description.as_ref())
            .with_model("point", self.point.as_ref())
            .with_model("exactness", self.exactness.as_ref())
            .with_model("location_class", self.location_class.as_ref())
            .with_model("feature_designation", self.feature_designation.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sector {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<Decimal>,
    pub narrative: Vec<Narrative>,
}

impl XmlModel for Sector {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "Sector",
                vec![
                    FieldSpec::new("code", FieldType::Str).required(),
                    FieldSpec::new("vocabulary", FieldType::Str),
                    FieldSpec::new("vocabulary_uri", FieldType::Url),
                    FieldSpec::new("percentage", FieldType::Decimal),
                    FieldSpec::narratives(),
                ],
            )
            .with_check(percentage_in_range)
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            code: record.require("code")?,
            vocabulary: record.take("vocabulary")?,
            vocabulary_uri: record.take("vocabulary_uri")?,
            percentage: record.take("percentage")?,
            narrative: record.take_models("narrative")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("code", self.code.as_str())
            .with_opt("vocabulary", self.vocabulary.as_deref())
            .with_opt("vocabulary_uri", self.vocabulary_uri.as_deref())
            .with_opt("percentage", self.percentage)
            .with_models("narrative", &self.narrative)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Budget {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
    pub period_start: IsoDate,
    pub period_end: IsoDate,
    pub value: Money,
}

impl XmlModel for Budget {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "Budget",
                vec![
                    FieldSpec::new("type", FieldType::Int),
                    FieldSpec::new("status", FieldType::Int),
                    FieldSpec::nested::<IsoDate>("period_start").required(),
                    FieldSpec::nested::<IsoDate>("period_end").required(),
                    FieldSpec::nested::<Money>("value").required(),
                ],
            )
            .with_check(period_is_ordered)
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            type_: record.take("type")?,
            status: record.take("status")?,
            period_start: record.require_model("period_start")?,
            period_end: record.require_model("period_end")?,
            value: record.require_model("value")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with_opt("type", self.type_)
            .with_opt("status", self.status)
            .with_model("period_start", Some(&self.period_start))
            .with_model("period_end", Some(&self.period_end))
            .with_model("value", Some(&self.value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionType {
    pub code: String,
}

impl XmlModel for TransactionType {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "TransactionType",
                vec![FieldSpec::new("code", FieldType::Str).required()],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            code: record.require("code")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new().with("code", self.code.as_str())
    }
}

/// `<provider-org>` or `<receiver-org>` of a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransactionOrg {
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub ref_: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_activity_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver_activity_id: Option<String>,
    pub narrative: Vec<Narrative>,
}

impl XmlModel for TransactionOrg {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "TransactionOrg",
                vec![
                    FieldSpec::new("ref", FieldType::Str),
                    FieldSpec::new("type_", FieldType::Str),
                    FieldSpec::new("provider_activity_id", FieldType::Str),
                    FieldSpec::new("receiver_activity_id", FieldType::Str),
                    FieldSpec::narratives(),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            ref_: record.take("ref")?,
            type_: record.take("type_")?,
            provider_activity_id: record.take("provider_activity_id")?,
            receiver_activity_id: record.take("receiver_activity_id")?,
            narrative: record.take_models("narrative")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with_opt("ref", self.ref_.as_deref())
            .with_opt("type_", self.type_.as_deref())
            .with_opt("provider_activity_id", self.provider_activity_id.as_deref())
            .with_opt("receiver_activity_id", self.receiver_activity_id.as_deref())
            .with_models("narrative", &self.narrative)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub ref_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humanitarian: Option<bool>,
    pub transaction_type: TransactionType,
    pub transaction_date: IsoDate,
    pub value: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Narratives>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_org: Option<TransactionOrg>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver_org: Option<TransactionOrg>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disbursement_channel: Option<CodedValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sector: Vec<CodedValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_type: Option<CodedValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finance_type: Option<CodedValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aid_type: Vec<CodedValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tied_status: Option<CodedValue>,
}

impl XmlModel for Transaction {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "Transaction",
                vec![
                    FieldSpec::new("ref", FieldType::Str),
                    FieldSpec::new("humanitarian", FieldType::Bool),
                    FieldSpec::nested::<TransactionType>("transaction_type").required(),
                    FieldSpec::nested::<IsoDate>("transaction_date").required(),
                    FieldSpec::nested::<Money>("value").required(),
                    FieldSpec::nested::<Narratives>("description"),
                    FieldSpec::nested::<TransactionOrg>("provider_org"),
                    FieldSpec::nested::<TransactionOrg>("receiver_org"),
                    FieldSpec::nested::<CodedValue>("disbursement_channel"),
                    FieldSpec::nested::<CodedValue>("sector").many(),
                    FieldSpec::nested::<CodedValue>("flow_type"),
                    FieldSpec::nested::<CodedValue>("finance_type"),
                    FieldSpec::nested::<CodedValue>("aid_type").many(),
                    FieldSpec::nested::<CodedValue>("tied_status"),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            ref_: record.take("ref")?,
            humanitarian: record.take("humanitarian")?,
            transaction_type: record.require_model("transaction_type")?,
            transaction_date: record.require_model("transaction_date")?,
            value: record.require_model("value")?,
            description: record.take_model("description")?,
            provider_org: record.take_model("provider_org")?,
            receiver_org: record.take_model("receiver_org")?,
            disbursement_channel: record.take_model("disbursement_channel")?,
            sector: record.take_models("sector")?,
            flow_type: record.take_model("flow_type")?,
            finance_type: record.take_model("finance_type")?,
            aid_type: record.take_models("aid_type")?,
            tied_status: record.take_model("tied_status")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with_opt("ref", self.ref_.as_deref())
            .with_opt("humanitarian", self.humanitarian)
            .with_model("transaction_type", Some(&self.transaction_type))
            .with_model("transaction_date", Some(&self.transaction_date))
            .with_model("value", Some(&self.value))
            .with_model("description", self.description.as_ref())
            .with_model("provider_org", self.provider_org.as_ref())
            .with_model("receiver_org", self.receiver_org.as_ref())
            .with_model("disbursement_channel", self.disbursement_channel.as_ref())
            .with_models("sector", &self.sector)
            .with_model("flow_type", self.flow_type.as_ref())
            .with_model("finance_type", self.finance_type.as_ref())
            .with_models("aid_type", &self.aid_type)
            .with_model("tied_status", self.tied_status.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentCategory {
    pub code: String,
}

impl XmlModel for DocumentCategory {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "DocumentCategory",
                vec![FieldSpec::new("code", FieldType::Str).required()],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            code: record.require("code")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new().with("code", self.code.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentLink {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Narratives>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Narratives>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub category: Vec<DocumentCategory>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub language: Vec<CodedValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_date: Option<IsoDate>,
}

impl XmlModel for DocumentLink {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "DocumentLink",
                vec![
                    FieldSpec::new("format", FieldType::Str),
                    FieldSpec::new("url", FieldType::Url),
                    FieldSpec::nested::<Narratives>("title"),
                    FieldSpec::nested::<Narratives>("description"),
                    FieldSpec::nested::<DocumentCategory>("category").many(),
                    FieldSpec::nested::<CodedValue>("language").many(),
                    FieldSpec::nested::<IsoDate>("document_date"),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            format: record.take("format")?,
            url: record.take("url")?,
            title: record.take_model("title")?,
            description: record.take_model("description")?,
            category: record.take_models("category")?,
            language: record.take_models("language")?,
            document_date: record.take_model("document_date")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with_opt("format", self.format.as_deref())
            .with_opt("url", self.url.as_deref())
            .with_model("title", self.title.as_ref())
            .with_model("description", self.description.as_ref())
            .with_models("category", &self.category)
            .with_models("language", &self.language)
            .with_model("document_date", self.document_date.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OwnerOrg {
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub ref_: Option<String>,
    pub narrative: Vec<Narrative>,
}

impl XmlModel for OwnerOrg {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "OwnerOrg",
                vec![FieldSpec::new("ref", FieldType::Str), FieldSpec::narratives()],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            ref_: record.take("ref")?,
            narrative: record.take_models("narrative")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with_opt("ref", self.ref_.as_deref())
            .with_models("narrative", &self.narrative)
    }
}

/// Another identifier for the activity, such as the publisher's own or a
/// previous IATI identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OtherIdentifier {
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub ref_: Option<String>,
    #[serde(rename = "type")]
    pub type_: OtherIdentifierType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_org: Option<OwnerOrg>,
}

impl XmlModel for OtherIdentifier {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "OtherIdentifier",
                vec![
                    FieldSpec::new("ref", FieldType::Str),
                    FieldSpec::new("type_", FieldType::Code(OtherIdentifierType::CODES)).required(),
                    FieldSpec::nested::<OwnerOrg>("owner_org"),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            ref_: record.take("ref")?,
            type_: record.require_code("type_")?,
            owner_org: record.take_model("owner_org")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with_opt("ref", self.ref_.as_deref())
            .with_code("type_", Some(&self.type_))
            .with_model("owner_org", self.owner_org.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactInfo {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<ContactType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organisation: Option<Narratives>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<Narratives>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_name: Option<Narratives>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<Narratives>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mailing_address: Option<Narratives>,
}

impl XmlModel for ContactInfo {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "ContactInfo",
                vec![
                    FieldSpec::new("type_", FieldType::Code(ContactType::CODES)),
                    FieldSpec::nested::<Narratives>("organisation"),
                    FieldSpec::nested::<Narratives>("department"),
                    FieldSpec::nested::<Narratives>("person_name"),
                    FieldSpec::nested::<Narratives>("job_title"),
                    FieldSpec::new("telephone", FieldType::Text),
                    FieldSpec::new("email", FieldType::Text),
                    FieldSpec::new("website", FieldType::Text),
                    FieldSpec::nested::<Narratives>("mailing_address"),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            type_: record.take_code("type_")?,
            organisation: record.take_model("organisation")?,
            department: record.take_model("department")?,
            person_name: record.take_model("person_name")?,
            job_title: record.take_model("job_title")?,
            telephone: record.take("telephone")?,
            email: record.take("email")?,
            website: record.take("website")?,
            mailing_address: record.take_model("mailing_address")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with_code("type_", self.type_.as_ref())
            .with_model("organisation", self.organisation.as_ref())
            .with_model("department", self.department.as_ref())
            .with_model("person_name", self.person_name.as_ref())
            .with_model("job_title", self.job_title.as_ref())
            .with_opt("telephone", self.telephone.as_deref())
            .with_opt("email", self.email.as_deref())
            .with_opt("website", self.website.as_deref())
            .with_model("mailing_address", self.mailing_address.as_ref())
    }
}

/// A code from some vocabulary with its narratives: `<recipient-region>`,
/// `<tag>` and the like. `percentage` is only meaningful for regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipientRegion {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<Decimal>,
    pub narrative: Vec<Narrative>,
}

impl XmlModel for RecipientRegion {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "RecipientRegion",
                vec![
                    FieldSpec::new("code", FieldType::Str).required(),
                    FieldSpec::new("vocabulary", FieldType::Str),
                    FieldSpec::new("vocabulary_uri", FieldType::Url),
                    FieldSpec::new("percentage", FieldType::Decimal),
                    FieldSpec::narratives(),
                ],
            )
            .with_check(percentage_in_range)
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            code: record.require("code")?,
            vocabulary: record.take("vocabulary")?,
            vocabulary_uri: record.take("vocabulary_uri")?,
            percentage: record.take("percentage")?,
            narrative: record.take_models("narrative")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("code", self.code.as_str())
            .with_opt("vocabulary", self.vocabulary.as_deref())
            .with_opt("vocabulary_uri", self.vocabulary_uri.as_deref())
            .with_opt("percentage", self.percentage)
            .with_models("narrative", &self.narrative)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub code: String,
    pub vocabulary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary_uri: Option<String>,
    pub narrative: Vec<Narrative>,
}

impl XmlModel for Tag {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "Tag",
                vec![
                    FieldSpec::new("code", FieldType::Str).required(),
                    FieldSpec::new("vocabulary", FieldType::Str).required(),
                    FieldSpec::new("vocabulary_uri", FieldType::Url),
                    FieldSpec::narratives(),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            code: record.require("code")?,
            vocabulary: record.require("vocabulary")?,
            vocabulary_uri: record.take("vocabulary_uri")?,
            narrative: record.take_models("narrative")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("code", self.code.as_str())
            .with("vocabulary", self.vocabulary.as_str())
            .with_opt("vocabulary_uri", self.vocabulary_uri.as_deref())
            .with_models("narrative", &self.narrative)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HumanitarianScope {
    #[serde(rename = "type")]
    pub type_: String,
    pub vocabulary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary_uri: Option<String>,
    pub code: String,
    pub narrative: Vec<Narrative>,
}

impl XmlModel for HumanitarianScope {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "HumanitarianScope",
                vec![
                    FieldSpec::new("type_", FieldType::Str).required(),
                    FieldSpec::new("vocabulary", FieldType::Str).required(),
                    FieldSpec::new("vocabulary_uri", FieldType::Url),
                    FieldSpec::new("code", FieldType::Str).required(),
                    FieldSpec::narratives(),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            type_: record.require("type_")?,
            vocabulary: record.require("vocabulary")?,
            vocabulary_uri: record.take("vocabulary_uri")?,
            code: record.require("code")?,
            narrative: record.take_models("narrative")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("type_", self.type_.as_str())
            .with("vocabulary", self.vocabulary.as_str())
            .with_opt("vocabulary_uri", self.vocabulary_uri.as_deref())
            .with("code", self.code.as_str())
            .with_models("narrative", &self.narrative)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyMarker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary_uri: Option<String>,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub significance: Option<String>,
    pub narrative: Vec<Narrative>,
}

impl XmlModel for PolicyMarker {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "PolicyMarker",
                vec![
                    FieldSpec::new("vocabulary", FieldType::Str),
                    FieldSpec::new("vocabulary_uri", FieldType::Url),
                    FieldSpec::new("code", FieldType::Str).required(),
                    FieldSpec::new("significance", FieldType::Str),
                    FieldSpec::narratives(),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            vocabulary: record.take("vocabulary")?,
            vocabulary_uri: record.take("vocabulary_uri")?,
            code: record.require("code")?,
            significance: record.take("significance")?,
            narrative: record.take_models("narrative")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with_opt("vocabulary", self.vocabulary.as_deref())
            .with_opt("vocabulary_uri", self.vocabulary_uri.as_deref())
            .with("code", self.code.as_str())
            .with_opt("significance", self.significance.as_deref())
            .with_models("narrative", &self.narrative)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetItem {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Narratives>,
}

impl XmlModel for BudgetItem {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "BudgetItem",
                vec![
                    FieldSpec::new("code", FieldType::Str).required(),
                    FieldSpec::new("percentage", FieldType::Decimal),
                    FieldSpec::nested::<Narratives>("description"),
                ],
            )
            .with_check(percentage_in_range)
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            code: record.require("code")?,
            percentage: record.take("percentage")?,
            description: record.take_model("description")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("code", self.code.as_str())
            .with_opt("percentage", self.percentage)
            .with_model("description", self.description.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryBudgetItems {
    pub vocabulary: String,
    pub budget_item: Vec<BudgetItem>,
}

impl XmlModel for CountryBudgetItems {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "CountryBudgetItems",
                vec![
                    FieldSpec::new("vocabulary", FieldType::Str).required(),
                    FieldSpec::nested::<BudgetItem>("budget_item").many(),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            vocabulary: record.require("vocabulary")?,
            budget_item: record.take_models("budget_item")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("vocabulary", self.vocabulary.as_str())
            .with_models("budget_item", &self.budget_item)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedDisbursement {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    pub period_start: IsoDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_end: Option<IsoDate>,
    pub value: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_org: Option<TransactionOrg>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver_org: Option<TransactionOrg>,
}

impl XmlModel for PlannedDisbursement {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "PlannedDisbursement",
                vec![
                    FieldSpec::new("type_", FieldType::Str),
                    FieldSpec::nested::<IsoDate>("period_start").required(),
                    FieldSpec::nested::<IsoDate>("period_end"),
                    FieldSpec::nested::<Money>("value").required(),
                    FieldSpec::nested::<TransactionOrg>("provider_org"),
                    FieldSpec::nested::<TransactionOrg>("receiver_org"),
                ],
            )
            .with_check(period_is_ordered)
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            type_: record.take("type_")?,
            period_start: record.require_model("period_start")?,
            period_end: record.take_model("period_end")?,
            value: record.require_model("value")?,
            provider_org: record.take_model("provider_org")?,
            receiver_org: record.take_model("receiver_org")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with_opt("type_", self.type_.as_deref())
            .with_model("period_start", Some(&self.period_start))
            .with_model("period_end", self.period_end.as_ref())
            .with_model("value", Some(&self.value))
            .with_model("provider_org", self.provider_org.as_ref())
            .with_model("receiver_org", self.receiver_org.as_ref())
    }
}

/// Share of the activity's total spend that is capital spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CapitalSpend {
    pub percentage: Decimal,
}

impl XmlModel for CapitalSpend {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "CapitalSpend",
                vec![FieldSpec::new("percentage", FieldType::Decimal).required()],
            )
            .with_check(percentage_in_range)
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            percentage: record.require("percentage")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new().with("percentage", self.percentage)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedActivity {
    #[serde(rename = "ref")]
    pub ref_: String,
    #[serde(rename = "type")]
    pub type_: RelatedActivityType,
}

impl XmlModel for RelatedActivity {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "RelatedActivity",
                vec![
                    FieldSpec::new("ref", FieldType::Str).required(),
                    FieldSpec::new("type_", FieldType::Code(RelatedActivityType::CODES)).required(),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            ref_: record.require("ref")?,
            type_: record.require_code("type_")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("ref", self.ref_.as_str())
            .with_code("type_", Some(&self.type_))
    }
}

/// A value from the publisher's own system that resembles an IATI element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegacyData {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iati_equivalent: Option<String>,
}

impl XmlModel for LegacyData {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "LegacyData",
                vec![
                    FieldSpec::new("name", FieldType::Str).required(),
                    FieldSpec::new("value", FieldType::Str).required(),
                    FieldSpec::new("iati_equivalent", FieldType::Str),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            name: record.require("name")?,
            value: record.require("value")?,
            iati_equivalent: record.take("iati_equivalent")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("name", self.name.as_str())
            .with("value", self.value.as_str())
            .with_opt("iati_equivalent", self.iati_equivalent.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Condition {
    #[serde(rename = "type")]
    pub type_: String,
    pub narrative: Vec<Narrative>,
}

impl XmlModel for Condition {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "Condition",
                vec![
                    FieldSpec::new("type_", FieldType::Str).required(),
                    FieldSpec::narratives(),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            type_: record.require("type_")?,
            narrative: record.take_models("narrative")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("type_", self.type_.as_str())
            .with_models("narrative", &self.narrative)
    }
}

/// `<conditions>`. With `attached` false there are no conditions to list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conditions {
    pub attached: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub condition: Vec<Condition>,
}

impl XmlModel for Conditions {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "Conditions",
                vec![
                    FieldSpec::new("attached", FieldType::Bool).required(),
                    FieldSpec::nested::<Condition>("condition").many(),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            attached: record.require("attached")?,
            condition: record.take_models("condition")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("attached", self.attached)
            .with_models("condition", &self.condition)
    }
}

/// `<iati-activity>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IatiActivity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_datetime: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humanitarian: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hierarchy: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_data_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_not_provided: Option<String>,
    pub iati_identifier: String,
    pub reporting_org: ReportingOrg,
    pub title: Narratives,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<Description>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub participating_org: Vec<ParticipatingOrg>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub other_identifier: Vec<OtherIdentifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_status: Option<ActivityStatus>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub activity_date: Vec<ActivityDate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub contact_info: Vec<ContactInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_scope: Option<CodedValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recipient_country: Vec<RecipientCountry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recipient_region: Vec<RecipientRegion>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub location: Vec<Location>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sector: Vec<Sector>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tag: Vec<Tag>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub country_budget_items: Vec<CountryBudgetItems>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub humanitarian_scope: Vec<HumanitarianScope>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub policy_marker: Vec<PolicyMarker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collaboration_type: Option<CodedValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_flow_type: Option<CodedValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_finance_type: Option<CodedValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub default_aid_type: Vec<CodedValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_tied_status: Option<CodedValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub budget: Vec<Budget>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub planned_disbursement: Vec<PlannedDisbursement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capital_spend: Option<CapitalSpend>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transaction: Vec<Transaction>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub document_link: Vec<DocumentLink>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_activity: Vec<RelatedActivity>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub legacy_data: Vec<LegacyData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Conditions>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub result: Vec<ActivityResult>,
}

impl IatiActivity {
    /// Title in the default language, falling back to the first narrative.
    #[must_use]
    pub fn title_text(&self) -> Option<&str> {
        self.title
            .default_narrative()
            .or_else(|| self.title.narrative.first())
            .and_then(|n| n.text.as_deref())
    }

    /// The first date of the given type.
    #[must_use]
    pub fn date(&self, type_: ActivityDateType) -> Option<NaiveDate> {
        self.activity_date
            .iter()
            .find(|d| d.type_ == type_)
            .map(|d| d.iso_date)
    }

    /// Organisations taking part in the given role.
    pub fn participants(&self, role: OrganisationRole) -> impl Iterator<Item = &ParticipatingOrg> {
        self.participating_org.iter().filter(move |p| p.role == role)
    }
}

impl XmlModel for IatiActivity {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "IatiActivity",
                vec![
                    FieldSpec::new("last_updated_datetime", FieldType::DateTime),
                    FieldSpec::new("lang", FieldType::Language),
                    FieldSpec::new("default_currency", FieldType::Str),
                    FieldSpec::new("humanitarian", FieldType::Bool),
                    FieldSpec::new("hierarchy", FieldType::Int),
                    FieldSpec::new("linked_data_uri", FieldType::Url),
                    FieldSpec::new("budget_not_provided", FieldType::Str),
                    FieldSpec::new("iati_identifier", FieldType::Text).required(),
                    FieldSpec::nested::<ReportingOrg>("reporting_org").required(),
                    FieldSpec::nested::<Narratives>("title").required(),
                    FieldSpec::nested::<Description>("description").many(),
                    FieldSpec::nested::<ParticipatingOrg>("participating_org").many(),
                    FieldSpec::nested::<OtherIdentifier>("other_identifier").many(),
                    FieldSpec::nested::<ActivityStatus>("activity_status"),
                    FieldSpec::nested::<ActivityDate>("activity_date").many(),
                    FieldSpec::nested::<ContactInfo>("contact_info").many(),
                    FieldSpec::nested::<CodedValue>("activity_scope"),
                    FieldSpec::nested::<RecipientCountry>("recipient_country").many(),
                    FieldSpec::nested::<RecipientRegion>("recipient_region").many(),
                    FieldSpec::nested::<Location>("location").many(),
                    FieldSpec::nested::<Sector>("sector").many(),
                    FieldSpec::nested::<Tag>("tag").many(),
                    FieldSpec::nested::<CountryBudgetItems>("country_budget_items").many(),
                    FieldSpec::nested::<HumanitarianScope>("humanitarian_scope").many(),
                    FieldSpec::nested::<PolicyMarker>("policy_marker").many(),
                    FieldSpec::nested::<CodedValue>("collaboration_type"),
                    FieldSpec::nested::<CodedValue>("default_flow_type"),
                    FieldSpec::nested::<CodedValue>("default_finance_type"),
                    FieldSpec::nested::<CodedValue>("default_aid_type").many(),
                    FieldSpec::nested::<CodedValue>("default_tied_status"),
                    FieldSpec::nested::<Budget>("budget").many(),
                    FieldSpec::nested::<PlannedDisbursement>("planned_disbursement").many(),
                    FieldSpec::nested::<CapitalSpend>("capital_spend"),
                    FieldSpec::nested::<Transaction>("transaction").many(),
                    FieldSpec::nested::<DocumentLink>("document_link").many(),
                    FieldSpec::nested::<RelatedActivity>("related_activity").many(),
                    FieldSpec::nested::<LegacyData>("legacy_data").many(),
                    FieldSpec::nested::<Conditions>("conditions"),
                    FieldSpec::nested::<ActivityResult>("result").many(),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            last_updated_datetime: record.take("last_updated_datetime")?,
            lang: record.take("lang")?,
            default_currency: record.take("default_currency")?,
            humanitarian: record.take("humanitarian")?,
            hierarchy: record.take("hierarchy")?,
            linked_data_uri: record.take("linked_data_uri")?,
            budget_not_provided: record.take("budget_not_provided")?,
            iati_identifier: record.require("iati_identifier")?,
            reporting_org: record.require_model("reporting_org")?,
            title: record.require_model("title")?,
            description: record.take_models("description")?,
            participating_org: record.take_models("participating_org")?,
            other_identifier: record.take_models("other_identifier")?,
            activity_status: record.take_model("activity_status")?,
            activity_date: record.take_models("activity_date")?,
            contact_info: record.take_models("contact_info")?,
            activity_scope: record.take_model("activity_scope")?,
            recipient_country: record.take_models("recipient_country")?,
            recipient_region: record.take_models("recipient_region")?,
            location: record.take_models("location")?,
            sector: record.take_models("sector")?,
            tag: record.take_models("tag")?,
            country_budget_items: record.take_models("country_budget_items")?,
            humanitarian_scope: record.take_models("humanitarian_scope")?,
            policy_marker: record.take_models("policy_marker")?,
            collaboration_type: record.take_model("collaboration_type")?,
            default_flow_type: record.take_model("default_flow_type")?,
            default_finance_type: record.take_model("default_finance_type")?,
            default_aid_type: record.take_models("default_aid_type")?,
            default_tied_status: record.take_model("default_tied_status")?,
            budget: record.take_models("budget")?,
            planned_disbursement: record.take_models("planned_disbursement")?,
            capital_spend: record.take_model("capital_spend")?,
            transaction: record.take_models("transaction")?,
            document_link: record.take_models("document_link")?,
            related_activity: record.take_models("related_activity")?,
            legacy_data: record.take_models("legacy_data")?,
            conditions: record.take_model("conditions")?,
            result: record.take_models("result")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with_opt("last_updated_datetime", self.last_updated_datetime)
            .with_opt("lang", self.lang.as_deref())
            .with_opt("default_currency", self.default_currency.as_deref())
            .with_opt("humanitarian", self.humanitarian)
            .with_opt("hierarchy", self.hierarchy)
            .with_opt("linked_data_uri", self.linked_data_uri.as_deref())
            .with_opt("budget_not_provided", self.budget_not_provided.as_deref())
            .with("iati_identifier", self.iati_identifier.as_str())
            .with_model("reporting_org", Some(&self.reporting_org))
            .with_model("title", Some(&self.title))
            .with_models("description", &self.description)
            .with_models("participating_org", &self.participating_org)
            .with_models("other_identifier", &self.other_identifier)
            .with_model("activity_status", self.activity_status.as_ref())
            .with_models("activity_date", &self.activity_date)
            .with_models("contact_info", &self.contact_info)
            .with_model("activity_scope", self.activity_scope.as_ref())
            .with_models("recipient_country", &self.recipient_country)
            .with_models("recipient_region", &self.recipient_region)
            .with_models("location", &self.location)
            .with_models("sector", &self.sector)
            .with_models("tag", &self.tag)
            .with_models("country_budget_items", &self.country_budget_items)
            .with_models("humanitarian_scope", &self.humanitarian_scope)
            .with_models("policy_marker", &self.policy_marker)
            .with_model("collaboration_type", self.collaboration_type.as_ref())
            .with_model("default_flow_type", self.default_flow_type.as_ref())
            .with_model("default_finance_type", self.default_finance_type.as_ref())
            .with_models("default_aid_type", &self.default_aid_type)
            .with_model("default_tied_status", self.default_tied_status.as_ref())
            .with_models("budget", &self.budget)
            .with_models("planned_disbursement", &self.planned_disbursement)
            .with_model("capital_spend", self.capital_spend.as_ref())
            .with_models("transaction", &self.transaction)
            .with_models("document_link", &self.document_link)
            .with_models("related_activity", &self.related_activity)
            .with_models("legacy_data", &self.legacy_data)
            .with_model("conditions", self.conditions.as_ref())
            .with_models("result", &self.result)
    }
}

/// `<iati-activities>`: the root of an activity file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IatiActivities {
    pub generated_datetime: DateTime<FixedOffset>,
    pub version: IatiVersion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_data_default: Option<String>,
    pub iati_activity: Vec<IatiActivity>,
}

impl IatiActivities {
    /// Look up an activity by its identifier.
    #[must_use]
    pub fn find(&self, identifier: &str) -> Option<&IatiActivity> {
        self.iati_activity
            .iter()
            .find(|a| a.iati_identifier == identifier)
    }
}

impl XmlModel for IatiActivities {
    fn schema() -> &'static Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            Schema::new(
                "IatiActivities",
                vec![
                    FieldSpec::new("generated_datetime", FieldType::DateTime).required(),
                    FieldSpec::new("version", FieldType::Code(IatiVersion::CODES)).required(),
                    FieldSpec::new("linked_data_default", FieldType::Url),
                    FieldSpec::nested::<IatiActivity>("iati_activity").many(),
                ],
            )
        });
        &SCHEMA
    }

    fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
        Ok(Self {
            generated_datetime: record.require("generated_datetime")?,
            version: record.require_code("version")?,
            linked_data_default: record.take("linked_data_default")?,
            iati_activity: record.take_models("iati_activity")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("generated_datetime", self.generated_datetime)
            .with_code("version", Some(&self.version))
            .with_opt("linked_data_default", self.linked_data_default.as_deref())
            .with_models("iati_activity", &self.iati_activity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iatibind_engine::markup::{parse, render};
    use iatibind_engine::{decode, encode, BindError, QName};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_point_srs_name_markup() {
        let el = parse(
            r#"<point srsName="http://www.opengis.net/def/crs/EPSG/0/4326"><pos>31.616944 65.716944</pos></point>"#,
        )
        .unwrap();
        let decoded = decode::<Point>(&el).unwrap();
        let point = decoded.value;

        assert_eq!(point.srs_name.as_deref(), Some(DEFAULT_SRS_NAME));
        assert_eq!(point.pos.text.as_deref(), Some("31.616944 65.716944"));
        assert_eq!(point.pos.coordinates(), Some((31.616944, 65.716944)));
        assert!(decoded.warnings.is_empty());

        let encoded = encode(&point).unwrap();
        assert_eq!(
            encoded.attribute(&QName::local("srsName")),
            Some(DEFAULT_SRS_NAME)
        );
    }

    #[test]
    fn test_money_body_decimal() {
        let el = parse(r#"<value currency="EUR" value-date="2014-01-01">3000</value>"#).unwrap();
        let money = decode::<Money>(&el).unwrap().value;

        assert_eq!(money.amount, Decimal::new(3000, 0));
        assert_eq!(money.currency.as_deref(), Some("EUR"));
        assert_eq!(
            render(&encode(&money).unwrap()).unwrap(),
            r#"<value currency="EUR" value-date="2014-01-01">3000</value>"#
        );
    }

    #[test]
    fn test_participating_org_codes() {
        let el = parse(
            r#"<participating-org ref="BB-BBB-123456789" role="1" type="40">
                <narrative>Name of Agency B</narrative>
            </participating-org>"#,
        )
        .unwrap();
        let org = decode::<ParticipatingOrg>(&el).unwrap().value;
        assert_eq!(org.role, OrganisationRole::Funding);
        assert_eq!(org.type_, Some(OrganisationType::Multilateral));
    }

    #[test]
    fn test_participating_org_requires_role() {
        let el = parse(r#"<participating-org ref="X"/>"#).unwrap();
        assert!(matches!(
            decode::<ParticipatingOrg>(&el),
            Err(BindError::ModelConstruction {
                model: "ParticipatingOrg",
                ..
            })
        ));
    }

    #[test]
    fn test_budget_period_order_is_checked() {
        let el = parse(
            r#"<budget type="1" status="1">
                <period-start iso-date="2015-01-01"/>
                <period-end iso-date="2014-12-31"/>
                <value currency="EUR" value-date="2014-01-01">3000</value>
            </budget>"#,
        )
        .unwrap();
        let err = decode::<Budget>(&el).unwrap_err();
        match err {
            BindError::ModelConstruction { model, source, .. } => {
                assert_eq!(model, "Budget");
                assert!(matches!(source, ConstructionError::Constraint(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_sector_percentage_out_of_range() {
        let el = parse(r#"<sector code="111" vocabulary="1" percentage="120"/>"#).unwrap();
        assert!(decode::<Sector>(&el).is_err());

        let el = parse(r#"<sector code="111" vocabulary="1" percentage="50"/>"#).unwrap();
        assert_eq!(
            decode::<Sector>(&el).unwrap().value.percentage,
            Some(Decimal::new(50, 0))
        );
    }

    #[test]
    fn test_sector_empty_vocabulary_uri_is_absent() {
        let el = parse(r#"<sector code="111" vocabulary-uri=""/>"#).unwrap();
        assert_eq!(decode::<Sector>(&el).unwrap().value.vocabulary_uri, None);
    }

    #[test]
    fn test_activity_date_with_narrative() {
        let el = parse(
            r#"<activity-date iso-date="2012-04-15" type="1"><narrative>Planned start</narrative></activity-date>"#,
        )
        .unwrap();
        let date = decode::<ActivityDate>(&el).unwrap().value;
        assert_eq!(date.type_, ActivityDateType::PlannedStart);
        assert_eq!(date.narrative, vec![Narrative::new("Planned start")]);
    }

    #[test]
    fn test_unknown_version_rejected() {
        let el = parse(
            r#"<iati-activities version="1.05" generated-datetime="2014-09-10T07:15:37Z"/>"#,
        )
        .unwrap();
        assert!(matches!(
            decode::<IatiActivities>(&el),
            Err(BindError::Conversion { target: "code", .. })
        ));
    }
}
