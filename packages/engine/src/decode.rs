//! Decoder: markup element → field map → typed model.
//!
//! Each element is decoded against its model's descriptor in declaration
//! order, nested fields recursing into their own descriptors. Coverage
//! diagnostics run once per element, after its fields are collected.

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::classify::{Category, NARRATIVE_TAG};
use crate::diagnostics::{check_coverage, CoverageWarning, Diagnostics};
use crate::error::{BindError, ConstructionError, Result};
use crate::markup::{render, Element, QName};
use crate::schema::{Cardinality, FieldDescriptor, FieldType, ModelDescriptor, XmlModel};
use crate::value::{Record, Value};

/// Decoder behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Run coverage diagnostics on every decoded element.
    pub check_coverage: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            check_coverage: true,
        }
    }
}

/// A decoded model together with the coverage warnings raised for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub value: T,
    pub warnings: Vec<CoverageWarning>,
}

/// Decodes elements into models. Holds no state besides its options.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    options: DecodeOptions,
}

impl Decoder {
    #[must_use]
    pub fn new(options: DecodeOptions) -> Self {
        Self { options }
    }

    /// Decode an element, returning the model and its warnings.
    ///
    /// # Errors
    /// Any fatal [`BindError`]; no partial model is returned.
    pub fn decode<T: XmlModel>(&self, element: &Element) -> Result<Decoded<T>> {
        let mut diagnostics = Diagnostics::new();
        let value = self.decode_into(element, &mut diagnostics)?;
        Ok(Decoded {
            value,
            warnings: diagnostics.into_warnings(),
        })
    }

    /// Decode an element, collecting warnings into `diagnostics`.
    pub fn decode_into<T: XmlModel>(
        &self,
        element: &Element,
        diagnostics: &mut Diagnostics,
    ) -> Result<T> {
        let descriptor = T::schema().descriptor()?;
        let path = element.tag.to_string();
        let record = self.decode_record(descriptor, element, &path, diagnostics)?;

        let snapshot = record.clone();
        T::from_record(record)
            .map_err(|cause| construction_failure(descriptor, element, &path, &snapshot, cause))
    }

    /// Decode one element and its nested fields into a validated field map.
    pub fn decode_record(
        &self,
        descriptor: &ModelDescriptor,
        element: &Element,
        path: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<Record> {
        let mut record = Record::new();

        for field in &descriptor.fields {
            if let Some(value) = self.decode_field(descriptor, field, element, path, diagnostics)? {
                record.insert(field.name, value);
            }
        }

        if self.options.check_coverage {
            diagnostics.extend(check_coverage(descriptor, element, path));
        }

        if let Err(cause) = validate(descriptor, &record) {
            return Err(construction_failure(descriptor, element, path, &record, cause));
        }

        tracing::debug!(
            model = descriptor.type_name,
            path,
            fields = record.len(),
            "Decoded element"
        );
        Ok(record)
    }

    fn decode_field(
        &self,
        descriptor: &ModelDescriptor,
        field: &FieldDescriptor,
        element: &Element,
        path: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<Option<Value>> {
        let convert = |text: &str| coerce(descriptor, field, path, text);

        match field.category {
            Category::UrlAttribute => Ok(element
                .attribute(&field.markup_name)
                .filter(|url| !url.is_empty())
                .map(|url| Value::Text(url.to_string()))),

            Category::Attribute => element.attribute(&field.markup_name).map(convert).transpose(),

            Category::LanguageAttribute => Ok(language(element, &field.markup_name)
                .map(|lang| Value::Text(lang.to_string()))),

            Category::ChildText => element
                .find_child(&field.markup_name)
                .and_then(Element::text)
                .map(convert)
                .transpose(),

            Category::ElementText | Category::NumericBody => {
                element.text().map(convert).transpose()
            }

            Category::NarrativeList => {
                let nested = nested_descriptor(descriptor, field)?;
                let tag = QName::local(NARRATIVE_TAG);
                self.decode_many(nested, element.find_children(&tag), path, diagnostics)
                    .map(Some)
            }

            Category::NestedOne => {
                let nested = nested_descriptor(descriptor, field)?;
                match element.find_child(&field.markup_name) {
                    None => Ok(None),
                    Some(child) => {
                        let child_path = format!("{path}/{}", child.tag);
                        self.decode_record(nested, child, &child_path, diagnostics)
                            .map(|record| Some(Value::Record(record)))
                    }
                }
            }

            Category::NestedMany => {
                let nested = nested_descriptor(descriptor, field)?;
                self.decode_many(
                    nested,
                    element.find_children(&field.markup_name),
                    path,
                    diagnostics,
                )
                .map(Some)
            }
        }
    }

    fn decode_many<'a>(
        &self,
        nested: &ModelDescriptor,
        children: impl Iterator<Item = &'a Element>,
        path: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<Value> {
        children
            .enumerate()
            .map(|(i, child)| {
                let child_path = format!("{path}/{}[{}]", child.tag, i + 1);
                self.decode_record(nested, child, &child_path, diagnostics)
                    .map(Value::Record)
            })
            .collect::<Result<Vec<_>>>()
            .map(Value::List)
    }
}

/// Read the language attribute in either the namespaced or the bare `xml:` form.
fn language<'a>(element: &'a Element, name: &QName) -> Option<&'a str> {
    element.attribute(name).or_else(|| {
        if name.is_xml() {
            element.attribute(&QName::local(format!("xml:{}", name.local)))
        } else {
            None
        }
    })
}

fn nested_descriptor(
    descriptor: &ModelDescriptor,
    field: &FieldDescriptor,
) -> Result<&'static ModelDescriptor> {
    match field.field_type.nested_schema() {
        Some(schema) => schema.descriptor(),
        None => Err(BindError::UnmappedCategory {
            model: descriptor.type_name,
            field: field.name.to_string(),
            reason: format!("{:?} field has no nested schema", field.category),
        }),
    }
}

/// Coerce present text to the field's declared type.
fn coerce(
    descriptor: &ModelDescriptor,
    field: &FieldDescriptor,
    path: &str,
    text: &str,
) -> Result<Value> {
    let fail = || BindError::Conversion {
        model: descriptor.type_name,
        field: field.name.to_string(),
        path: path.to_string(),
        text: text.to_string(),
        target: field.field_type.target_name(),
    };
    let trimmed = text.trim();

    match field.field_type {
        FieldType::Str
        | FieldType::Url
        | FieldType::Text
        | FieldType::Language
        | FieldType::ElementText => Ok(Value::Text(text.to_string())),
        FieldType::Bool => parse_bool(trimmed).map(Value::Bool).ok_or_else(fail),
        FieldType::Int | FieldType::TextInt => {
            trimmed.parse::<i64>().map(Value::Int).map_err(|_| fail())
        }
        FieldType::Decimal | FieldType::DecimalText => {
            parse_decimal(trimmed).map(Value::Decimal).ok_or_else(fail)
        }
        FieldType::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(Value::Date)
            .map_err(|_| fail()),
        FieldType::DateTime => parse_datetime(trimmed).map(Value::DateTime).ok_or_else(fail),
        FieldType::Code(codes) => {
            if codes.contains(&trimmed) {
                Ok(Value::Text(trimmed.to_string()))
            } else {
                Err(fail())
            }
        }
        FieldType::Narrative | FieldType::Nested(_) => Err(BindError::UnmappedCategory {
            model: descriptor.type_name,
            field: field.name.to_string(),
            reason: "nested values cannot be read from text".to_string(),
        }),
    }
}

/// `1`/`true` and `0`/`false`.
fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// RFC 3339, or a naive ISO-8601 datetime taken as UTC.
fn parse_datetime(text: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(text).ok().or_else(|| {
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc().fixed_offset())
    })
}

/// Structural validation of a collected field map.
fn validate(descriptor: &ModelDescriptor, record: &Record) -> std::result::Result<(), ConstructionError> {
    if let Some(missing) = descriptor
        .fields
        .iter()
        .find(|f| f.required && f.cardinality == Cardinality::One && !record.contains(f.name))
    {
        return Err(ConstructionError::Missing(missing.name.to_string()));
    }

    if let Some(check) = descriptor.check {
        check(record).map_err(ConstructionError::Constraint)?;
    }

    Ok(())
}

fn construction_failure(
    descriptor: &ModelDescriptor,
    element: &Element,
    path: &str,
    record: &Record,
    cause: ConstructionError,
) -> BindError {
    let rendered = render(element).unwrap_or_else(|_| format!("{element:?}"));
    let fields = format!("{record:?}");

    tracing::error!(
        model = descriptor.type_name,
        path,
        element = %rendered,
        fields = %fields,
        cause = %cause,
        "Model construction failed"
    );

    BindError::ModelConstruction {
        model: descriptor.type_name,
        path: path.to_string(),
        element: rendered,
        fields,
        source: cause,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::UnusedKind;
    use crate::markup::parse;
    use crate::narrative::Narrative;
    use crate::testing::{Budget, Conditions, Desc, Org, Period, ReportingOrg, Sample};

    #[test]
    fn test_decode_reporting_org() {
        let el = parse(
            r#"<reporting-org type="22" ref="X"><narrative xml:lang="nl">A</narrative></reporting-org>"#,
        )
        .unwrap();
        let decoded = Decoder::default().decode::<ReportingOrg>(&el).unwrap();

        assert_eq!(
            decoded.value,
            ReportingOrg {
                type_: 22,
                ref_: "X".to_string(),
                narrative: vec![Narrative::new("A").with_lang("nl")],
                secondary_reporter: None,
            }
        );
        assert!(decoded.warnings.is_empty());
    }

    #[test]
    fn test_decode_narrative_with_and_without_lang() {
        let fr = parse(r#"<narrative xml:lang="fr">Mondial</narrative>"#).unwrap();
        let plain = parse("<narrative>Planned start</narrative>").unwrap();
        let decoder = Decoder::default();

        assert_eq!(
            decoder.decode::<Narrative>(&fr).unwrap().value,
            Narrative::new("Mondial").with_lang("fr")
        );
        assert_eq!(
            decoder.decode::<Narrative>(&plain).unwrap().value,
            Narrative::new("Planned start")
        );
    }

    #[test]
    fn test_decode_narratives_under_other_field_name() {
        let el = parse(r#"<desc><narrative xml:lang="fr">Mondial</narrative></desc>"#).unwrap();
        let decoded = Decoder::default().decode::<Desc>(&el).unwrap();

        assert_eq!(
            decoded.value.description,
            vec![Narrative::new("Mondial").with_lang("fr")]
        );
        // Coverage only knows the field's own markup name
        assert_eq!(decoded.warnings.len(), 1);
        assert_eq!(decoded.warnings[0].kind, UnusedKind::Element);
        assert_eq!(decoded.warnings[0].name, "narrative");
    }

    #[test]
    fn test_decode_unknown_attribute_warns_once() {
        let el = parse(r#"<reporting-org type="22" ref="X" extra="y"/>"#).unwrap();
        let decoded = Decoder::default().decode::<ReportingOrg>(&el).unwrap();

        assert_eq!(decoded.value.ref_, "X");
        assert_eq!(decoded.warnings.len(), 1);
        assert_eq!(decoded.warnings[0].kind, UnusedKind::Attribute);
        assert_eq!(decoded.warnings[0].name, "extra");
    }

    #[test]
    fn test_decode_repeatable_diagnostics() {
        let el = parse(r#"<sample extra="1"><junk/><narrative><note/></narrative></sample>"#).unwrap();
        let decoder = Decoder::default();
        let first = decoder.decode::<Sample>(&el).unwrap().warnings;
        let second = decoder.decode::<Sample>(&el).unwrap().warnings;

        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
        assert_eq!(first[0].path, "sample/narrative[1]");
        assert_eq!(first[1].name, "extra");
    }

    #[test]
    fn test_decode_without_coverage() {
        let el = parse(r#"<reporting-org type="22" ref="X" extra="y"/>"#).unwrap();
        let decoder = Decoder::new(DecodeOptions {
            check_coverage: false,
        });
        assert!(decoder.decode::<ReportingOrg>(&el).unwrap().warnings.is_empty());
    }

    #[test]
    fn test_decode_missing_required_nested() {
        let el = parse(r#"<budget><period-start iso-date="2014-01-01"/></budget>"#).unwrap();
        let err = Decoder::default().decode::<Budget>(&el).unwrap_err();

        match err {
            BindError::ModelConstruction { model, source, element, .. } => {
                assert_eq!(model, "Budget");
                assert_eq!(source, ConstructionError::Missing("period_end".to_string()));
                assert!(element.contains("period-start"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_decode_missing_optional_nested() {
        let el = parse(r#"<conditions attached="0"/>"#).unwrap();
        let decoded = Decoder::default().decode::<Conditions>(&el).unwrap();
        assert!(!decoded.value.attached);
        assert_eq!(decoded.value.period, None);
    }

    #[test]
    fn test_decode_nested_failure_aborts_document() {
        let el = parse(
            r#"<conditions attached="1"><period><period-start iso-date="2014-01-01"/></period></conditions>"#,
        )
        .unwrap();
        let err = Decoder::default().decode::<Conditions>(&el).unwrap_err();
        match err {
            BindError::ModelConstruction { model, path, .. } => {
                assert_eq!(model, "Period");
                assert_eq!(path, "conditions/period");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_decode_boolean_convention() {
        let t = parse(r#"<conditions attached="1"/>"#).unwrap();
        let f = parse(r#"<conditions attached="0"/>"#).unwrap();
        let decoder = Decoder::default();
        assert!(decoder.decode::<Conditions>(&t).unwrap().value.attached);
        assert!(!decoder.decode::<Conditions>(&f).unwrap().value.attached);
    }

    #[test]
    fn test_decode_language_forms_are_equivalent() {
        let namespaced = Element::new("narrative")
            .with_attribute(QName::xml("lang"), "nl")
            .with_text("A");
        let bare = Element::new("narrative")
            .with_attribute(QName::local("xml:lang"), "nl")
            .with_text("A");
        let decoder = Decoder::default();

        assert_eq!(
            decoder.decode::<Narrative>(&namespaced).unwrap().value,
            decoder.decode::<Narrative>(&bare).unwrap().value
        );
    }

    #[test]
    fn test_decode_empty_url_is_absent() {
        let el = parse(r#"<sample link=""/>"#).unwrap();
        assert_eq!(Decoder::default().decode::<Sample>(&el).unwrap().value.link, None);
    }

    #[test]
    fn test_decode_conversion_error() {
        let el = parse(r#"<reporting-org type="twenty" ref="X"/>"#).unwrap();
        let err = Decoder::default().decode::<ReportingOrg>(&el).unwrap_err();
        match err {
            BindError::Conversion { field, text, target, .. } => {
                assert_eq!(field, "type");
                assert_eq!(text, "twenty");
                assert_eq!(target, "integer");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_decode_unknown_code() {
        let el = parse(r#"<org role="9"/>"#).unwrap();
        let err = Decoder::default().decode::<Org>(&el).unwrap_err();
        assert!(matches!(err, BindError::Conversion { target: "code", .. }));
    }

    #[test]
    fn test_decode_child_text_body_and_scalars() {
        let el = parse(
            r#"<sample when="2014-09-10T07:15:37Z" day="2014-01-31" share="12.5">
                <identifier>NL-1</identifier>
                <count> 173 </count>
                <amount currency="EUR">1000.50</amount>
            </sample>"#,
        )
        .unwrap();
        let sample = Decoder::default().decode::<Sample>(&el).unwrap().value;

        assert_eq!(sample.identifier.as_deref(), Some("NL-1"));
        assert_eq!(sample.count, Some(173));
        assert_eq!(sample.share, Some(Decimal::new(125, 1)));
        assert_eq!(sample.day, NaiveDate::from_ymd_opt(2014, 1, 31));
        assert_eq!(
            sample.when.map(|w| w.to_rfc3339()),
            Some("2014-09-10T07:15:37+00:00".to_string())
        );
        let amount = sample.amount.unwrap();
        assert_eq!(amount.amount, Some(Decimal::new(100050, 2)));
        assert_eq!(amount.currency.as_deref(), Some("EUR"));
    }

    #[test]
    fn test_parse_datetime_naive_is_utc() {
        let dt = parse_datetime("2014-09-10T07:15:37").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_parse_decimal_scientific() {
        assert_eq!(parse_decimal("1e3"), Some(Decimal::new(1000, 0)));
        assert_eq!(parse_decimal("abc"), None);
    }

    #[test]
    fn test_cross_field_check() {
        let el = parse(r#"<sample count-min="5"><count>3</count></sample>"#).unwrap();
        let err = Decoder::default().decode::<Sample>(&el).unwrap_err();
        assert!(matches!(
            err,
            BindError::ModelConstruction {
                source: ConstructionError::Constraint(_),
                ..
            }
        ));
    }
}
