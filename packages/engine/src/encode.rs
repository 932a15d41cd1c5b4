//! Encoder: typed model → field map → markup element.
//!
//! Fields are written in declaration order. Unset values, empty strings and
//! empty lists are omitted. A nested model takes its tag from the field that
//! owns it; only the root falls back to a tag derived from the type name.

use chrono::{DateTime, FixedOffset, SecondsFormat};

use crate::classify::{tag_for_type, Category, NARRATIVE_TAG};
use crate::decode::{Decoded, Decoder};
use crate::error::{BindError, Result};
use crate::markup::{self, Element, QName};
use crate::schema::{FieldDescriptor, FieldType, ModelDescriptor, XmlModel};
use crate::value::{Record, Value};

/// Encodes models into elements. Stateless; the free functions below use a
/// default instance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Encoder;

impl Encoder {
    /// See [`encode`].
    pub fn encode<T: XmlModel>(&self, instance: &T) -> Result<Element> {
        let descriptor = T::schema().descriptor()?;
        let tag = QName::local(tag_for_type(descriptor.type_name));
        encode_with_tag(descriptor, &instance.to_record(), tag)
    }

    /// See [`encode_as`].
    pub fn encode_as<T: XmlModel>(&self, instance: &T, tag: impl Into<QName>) -> Result<Element> {
        let descriptor = T::schema().descriptor()?;
        encode_with_tag(descriptor, &instance.to_record(), tag.into())
    }
}

/// Encode a model as the root of a fragment.
///
/// # Errors
/// `UnmappedCategory` for schema defects or values that cannot be placed in
/// their field, `Encode` when the assembled fragment cannot be rendered.
pub fn encode<T: XmlModel>(instance: &T) -> Result<Element> {
    Encoder.encode(instance)
}

/// Encode a model under an explicit root tag.
pub fn encode_as<T: XmlModel>(instance: &T, tag: impl Into<QName>) -> Result<Element> {
    Encoder.encode_as(instance, tag)
}

/// Encode a model and serialize it as an indented UTF-8 document.
pub fn to_xml_string<T: XmlModel>(instance: &T) -> Result<String> {
    let element = encode(instance)?;
    Ok(markup::render_document(&element)?)
}

/// Parse a document and decode its root element.
pub fn from_xml_str<T: XmlModel>(xml: &str) -> Result<Decoded<T>> {
    let element = markup::parse(xml)?;
    Decoder::default().decode(&element)
}

fn encode_with_tag(descriptor: &ModelDescriptor, record: &Record, tag: QName) -> Result<Element> {
    let element = encode_record(descriptor, record, tag)?;
    self_check(descriptor, &element, record)?;
    Ok(element)
}

/// Build the element for one field map, recursing into nested fields.
pub fn encode_record(descriptor: &ModelDescriptor, record: &Record, tag: QName) -> Result<Element> {
    let mut element = Element::new(tag);

    for field in &descriptor.fields {
        let Some(value) = record.get(field.name) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }

        match field.category {
            Category::UrlAttribute | Category::LanguageAttribute | Category::Attribute => {
                element.set_attribute(field.markup_name.clone(), stringify(descriptor, field, value)?);
            }
            Category::ChildText => {
                let text = stringify(descriptor, field, value)?;
                element
                    .children
                    .push(Element::new(field.markup_name.clone()).with_text(text));
            }
            Category::ElementText | Category::NumericBody => {
                element.text = Some(stringify(descriptor, field, value)?);
            }
            Category::NestedOne => {
                let nested = nested_descriptor(descriptor, field)?;
                let child = encode_record(nested, record_of(descriptor, field, value)?, field.markup_name.clone())?;
                element.children.push(child);
            }
            Category::NarrativeList | Category::NestedMany => {
                let nested = nested_descriptor(descriptor, field)?;
                let Value::List(items) = value else {
                    return Err(misplaced(descriptor, field, value));
                };
                let tag = match field.category {
                    Category::NarrativeList => QName::local(NARRATIVE_TAG),
                    _ => field.markup_name.clone(),
                };
                for item in items {
                    let child = encode_record(nested, record_of(descriptor, field, item)?, tag.clone())?;
                    element.children.push(child);
                }
            }
        }
    }

    Ok(element)
}

/// Render the fragment once so unserializable names or text fail here
/// rather than in the caller's writer.
fn self_check(descriptor: &ModelDescriptor, element: &Element, record: &Record) -> Result<()> {
    match markup::render(element) {
        Ok(_) => Ok(()),
        Err(source) => {
            tracing::error!(
                model = descriptor.type_name,
                tag = %element.tag,
                error = %source,
                "Encoded fragment failed to serialize"
            );
            Err(BindError::Encode {
                model: descriptor.type_name,
                tag: element.tag.to_string(),
                fragment: format!("{element:?}"),
                instance: format!("{record:?}"),
                source,
            })
        }
    }
}

/// String form of a primitive value for an attribute or text slot.
fn stringify(descriptor: &ModelDescriptor, field: &FieldDescriptor, value: &Value) -> Result<String> {
    if !fits(&field.field_type, value) {
        return Err(misplaced(descriptor, field, value));
    }
    match value {
        Value::Text(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(if *b { "1" } else { "0" }.to_string()),
        Value::Int(i) => Ok(i.to_string()),
        Value::Decimal(d) => Ok(d.to_string()),
        Value::Date(d) => Ok(d.format("%Y-%m-%d").to_string()),
        Value::DateTime(dt) => Ok(format_datetime(dt)),
        Value::Record(_) | Value::List(_) => Err(misplaced(descriptor, field, value)),
    }
}

/// ISO-8601 with a `Z` suffix in place of a zero UTC offset.
#[must_use]
pub fn format_datetime(dt: &DateTime<FixedOffset>) -> String {
    let formatted = dt.to_rfc3339_opts(SecondsFormat::AutoSi, false);
    match formatted.strip_suffix("+00:00") {
        Some(stem) => format!("{stem}Z"),
        None => formatted,
    }
}

fn fits(field_type: &FieldType, value: &Value) -> bool {
    match field_type {
        FieldType::Str
        | FieldType::Url
        | FieldType::Text
        | FieldType::Language
        | FieldType::ElementText
        | FieldType::Code(_) => matches!(value, Value::Text(_)),
        FieldType::Bool => matches!(value, Value::Bool(_)),
        FieldType::Int | FieldType::TextInt => matches!(value, Value::Int(_)),
        FieldType::Decimal | FieldType::DecimalText => matches!(value, Value::Decimal(_)),
        FieldType::Date => matches!(value, Value::Date(_)),
        FieldType::DateTime => matches!(value, Value::DateTime(_)),
        FieldType::Narrative | FieldType::Nested(_) => false,
    }
}

fn record_of<'a>(
    descriptor: &ModelDescriptor,
    field: &FieldDescriptor,
    value: &'a Value,
) -> Result<&'a Record> {
    value.as_record().ok_or_else(|| misplaced(descriptor, field, value))
}

fn nested_descriptor(
    descriptor: &ModelDescriptor,
    field: &FieldDescriptor,
) -> Result<&'static ModelDescriptor> {
    match field.field_type.nested_schema() {
        Some(schema) => schema.descriptor(),
        None => Err(misplaced_reason(
            descriptor,
            field,
            format!("{:?} field has no nested schema", field.category),
        )),
    }
}

fn misplaced(descriptor: &ModelDescriptor, field: &FieldDescriptor, value: &Value) -> BindError {
    misplaced_reason(
        descriptor,
        field,
        format!(
            "{} value cannot be encoded as {:?} ({:?})",
            value.kind(),
            field.category,
            field.field_type
        ),
    )
}

fn misplaced_reason(descriptor: &ModelDescriptor, field: &FieldDescriptor, reason: String) -> BindError {
    BindError::UnmappedCategory {
        model: descriptor.type_name,
        field: field.name.to_string(),
        reason,
    }
}
