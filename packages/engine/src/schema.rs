//! Schema authoring surface and the field descriptor registry.
//!
//! A model type declares its fields once as a [`Schema`]. The schema
//! classifies itself on first use into an immutable [`ModelDescriptor`],
//! cached for the lifetime of the process and shared freely across threads.

use std::fmt;
use std::sync::OnceLock;

use crate::classify::{classify, markup_name, Category};
use crate::error::{BindError, ConstructionError, Result};
use crate::markup::QName;
use crate::value::Record;

/// Accessor for the schema of a nested model type.
pub type SchemaFn = fn() -> &'static Schema;

/// Cross-field validation hook, run after a field map is collected.
pub type CheckFn = fn(&Record) -> std::result::Result<(), String>;

/// Declared semantic type of a field.
#[derive(Clone, Copy)]
pub enum FieldType {
    Str,
    Bool,
    Int,
    Decimal,
    Date,
    DateTime,
    /// Enumerated code, with the allowed code strings.
    Code(&'static [&'static str]),
    /// URL-valued attribute; an empty value counts as absent.
    Url,
    /// Text of a child tag named after the field.
    Text,
    /// Text of a child tag, parsed as an integer.
    TextInt,
    /// The reserved `xml:lang` attribute.
    Language,
    /// The element's own text.
    ElementText,
    /// The element's own text, parsed as a decimal.
    DecimalText,
    /// Language-tagged narrative fragments.
    Narrative,
    /// A nested model.
    Nested(SchemaFn),
}

impl FieldType {
    /// Nested model type of this field.
    #[must_use]
    pub fn nested<T: XmlModel>() -> Self {
        FieldType::Nested(T::schema)
    }

    /// Whether values of this type are a single string-like or numeric scalar.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        !matches!(self, FieldType::Narrative | FieldType::Nested(_))
    }

    /// Human name of the coercion target, for errors.
    #[must_use]
    pub fn target_name(&self) -> &'static str {
        match self {
            FieldType::Str
            | FieldType::Url
            | FieldType::Text
            | FieldType::Language
            | FieldType::ElementText => "string",
            FieldType::Bool => "boolean",
            FieldType::Int | FieldType::TextInt => "integer",
            FieldType::Decimal | FieldType::DecimalText => "decimal",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
            FieldType::Code(_) => "code",
            FieldType::Narrative => "narrative",
            FieldType::Nested(_) => "record",
        }
    }

    /// Schema of the nested entity, for narrative and nested fields.
    #[must_use]
    pub fn nested_schema(&self) -> Option<&'static Schema> {
        match self {
            FieldType::Narrative => Some(crate::narrative::Narrative::schema()),
            FieldType::Nested(schema) => Some(schema()),
            _ => None,
        }
    }
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Code(codes) => f.debug_tuple("Code").field(codes).finish(),
            FieldType::Nested(schema) => f.debug_tuple("Nested").field(&schema().type_name()).finish(),
            FieldType::Str => f.write_str("Str"),
            FieldType::Bool => f.write_str("Bool"),
            FieldType::Int => f.write_str("Int"),
            FieldType::Decimal => f.write_str("Decimal"),
            FieldType::Date => f.write_str("Date"),
            FieldType::DateTime => f.write_str("DateTime"),
            FieldType::Url => f.write_str("Url"),
            FieldType::Text => f.write_str("Text"),
            FieldType::TextInt => f.write_str("TextInt"),
            FieldType::Language => f.write_str("Language"),
            FieldType::ElementText => f.write_str("ElementText"),
            FieldType::DecimalText => f.write_str("DecimalText"),
            FieldType::Narrative => f.write_str("Narrative"),
        }
    }
}

/// How many values a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    One,
    Many,
}

/// One field as declared by a model author.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    pub cardinality: Cardinality,
    pub markup: Option<&'static str>,
}

impl FieldSpec {
    /// An optional single-valued field.
    #[must_use]
    pub fn new(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: false,
            cardinality: Cardinality::One,
            markup: None,
        }
    }

    /// The conventional `narrative` list of language-tagged fragments.
    #[must_use]
    pub fn narratives() -> Self {
        Self::new("narrative", FieldType::Narrative).many()
    }

    /// An optional nested model.
    #[must_use]
    pub fn nested<T: XmlModel>(name: &'static str) -> Self {
        Self::new(name, FieldType::nested::<T>())
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn many(mut self) -> Self {
        self.cardinality = Cardinality::Many;
        self
    }

    /// Override the derived attribute or tag name (Clark notation accepted).
    #[must_use]
    pub fn markup(mut self, name: &'static str) -> Self {
        self.markup = Some(name);
        self
    }
}

/// Resolved, immutable metadata for one field.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub category: Category,
    pub markup_name: QName,
    pub required: bool,
    pub cardinality: Cardinality,
    pub field_type: FieldType,
}

/// Ordered field descriptors for one model type.
#[derive(Debug, Clone)]
pub struct ModelDescriptor {
    pub type_name: &'static str,
    pub fields: Vec<FieldDescriptor>,
    pub check: Option<CheckFn>,
}

impl ModelDescriptor {
    /// Look up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Markup names implied by the fields, in declaration order.
    pub fn markup_names(&self) -> impl Iterator<Item = &QName> {
        self.fields.iter().map(|f| &f.markup_name)
    }
}

/// Classification failure, cached alongside a schema.
#[derive(Debug, Clone)]
struct SchemaDefect {
    field: String,
    reason: String,
}

/// Field declarations for one model type and its cached descriptor.
pub struct Schema {
    type_name: &'static str,
    specs: Vec<FieldSpec>,
    check: Option<CheckFn>,
    descriptor: OnceLock<std::result::Result<ModelDescriptor, SchemaDefect>>,
}

impl Schema {
    #[must_use]
    pub fn new(type_name: &'static str, specs: Vec<FieldSpec>) -> Self {
        Self {
            type_name,
            specs,
            check: None,
            descriptor: OnceLock::new(),
        }
    }

    /// Attach a cross-field constraint.
    #[must_use]
    pub fn with_check(mut self, check: CheckFn) -> Self {
        self.check = Some(check);
        self
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The classified descriptor, built on first call.
    ///
    /// # Errors
    /// Returns `UnmappedCategory` if any field matches no category.
    pub fn descriptor(&self) -> Result<&ModelDescriptor> {
        self.descriptor
            .get_or_init(|| self.build())
            .as_ref()
            .map_err(|defect| BindError::UnmappedCategory {
                model: self.type_name,
                field: defect.field.clone(),
                reason: defect.reason.clone(),
            })
    }

    fn build(&self) -> std::result::Result<ModelDescriptor, SchemaDefect> {
        let fields = self
            .specs
            .iter()
            .map(|spec| {
                let category = classify(spec).ok_or_else(|| SchemaDefect {
                    field: spec.name.to_string(),
                    reason: format!(
                        "declared type {:?} with cardinality {:?} fits no category",
                        spec.field_type, spec.cardinality
                    ),
                })?;
                Ok(FieldDescriptor {
                    name: spec.name,
                    category,
                    markup_name: markup_name(spec),
                    required: spec.required,
                    cardinality: spec.cardinality,
                    field_type: spec.field_type,
                })
            })
            .collect::<std::result::Result<Vec<_>, SchemaDefect>>()?;

        tracing::debug!(model = self.type_name, fields = fields.len(), "Classified schema");

        Ok(ModelDescriptor {
            type_name: self.type_name,
            fields,
            check: self.check,
        })
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("type_name", &self.type_name)
            .field("fields", &self.specs.len())
            .field("classified", &self.descriptor.get().is_some())
            .finish()
    }
}

/// A typed record that can be decoded from and encoded to markup.
///
/// # Examples
/// ```
/// use std::sync::LazyLock;
/// use iatibind_engine::{ConstructionError, FieldSpec, FieldType, Record, Schema, XmlModel};
///
/// struct Activity { code: String }
///
/// impl XmlModel for Activity {
///     fn schema() -> &'static Schema {
///         static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
///             Schema::new("ActivityStatus", vec![FieldSpec::new("code", FieldType::Str).required()])
///         });
///         &SCHEMA
///     }
///
///     fn from_record(mut record: Record) -> Result<Self, ConstructionError> {
///         Ok(Self { code: record.require("code")? })
///     }
///
///     fn to_record(&self) -> Record {
///         Record::new().with("code", self.code.as_str())
///     }
/// }
///
/// let el = iatibind_engine::markup::parse(r#"<activity-status code="2"/>"#).unwrap();
/// let decoded = iatibind_engine::decode::<Activity>(&el).unwrap();
/// assert_eq!(decoded.value.code, "2");
/// ```
pub trait XmlModel: Sized {
    /// The model's field declarations.
    fn schema() -> &'static Schema;

    /// Build an instance from a validated field map.
    fn from_record(record: Record) -> std::result::Result<Self, ConstructionError>;

    /// Collect the instance's field values; unset fields are left out.
    fn to_record(&self) -> Record;
}

/// An enumerated code with a fixed set of code strings.
pub trait CodeEnum: Sized + Copy + 'static {
    /// All valid codes, in declaration order.
    const CODES: &'static [&'static str];

    /// The code string of this value.
    fn code(&self) -> &'static str;

    /// Look up a value by its code string.
    fn from_code(code: &str) -> Option<Self>;
}
