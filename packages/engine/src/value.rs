//! Decoded values and the transient field map built during one decode call.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;

use crate::error::ConstructionError;
use crate::schema::{CodeEnum, XmlModel};

/// Any value a field can hold after decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Strings, URLs, language tags and enumerated codes.
    Text(String),
    Bool(bool),
    Int(i64),
    Decimal(Decimal),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
    /// A nested model.
    Record(Record),
    /// A repeated field.
    List(Vec<Value>),
}

impl Value {
    /// Short name of the value kind, for error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Decimal(_) => "decimal",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
            Value::Record(_) => "record",
            Value::List(_) => "list",
        }
    }

    /// Try to get value as string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get value as record reference.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Whether the encoder should treat this value as unset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Text(s) => s.is_empty(),
            Value::List(items) => items.is_empty(),
            _ => false,
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(r)
    }
}

/// Extraction of a typed primitive from a [`Value`].
pub trait FromValue: Sized {
    /// Kind name used in `WrongKind` errors.
    const EXPECTED: &'static str;

    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! impl_from_value {
    ($ty:ty, $variant:ident, $expected:literal) => {
        impl FromValue for $ty {
            const EXPECTED: &'static str = $expected;

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_from_value!(String, Text, "text");
impl_from_value!(bool, Bool, "boolean");
impl_from_value!(i64, Int, "integer");
impl_from_value!(Decimal, Decimal, "decimal");
impl_from_value!(NaiveDate, Date, "date");
impl_from_value!(DateTime<FixedOffset>, DateTime, "datetime");

/// Field name → value map for one element.
///
/// Built by the decoder and consumed by [`XmlModel::from_record`], or built by
/// [`XmlModel::to_record`] and consumed by the encoder.
#[derive(Clone, Default, PartialEq)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    // Extraction, used by `from_record` implementations.

    /// Take an optional primitive.
    pub fn take<T: FromValue>(&mut self, name: &str) -> Result<Option<T>, ConstructionError> {
        self.remove(name).map(|v| convert(name, v)).transpose()
    }

    /// Take a primitive that must be present.
    pub fn require<T: FromValue>(&mut self, name: &str) -> Result<T, ConstructionError> {
        self.take(name)?
            .ok_or_else(|| ConstructionError::Missing(name.to_string()))
    }

    /// Take an optional nested model.
    pub fn take_model<T: XmlModel>(&mut self, name: &str) -> Result<Option<T>, ConstructionError> {
        match self.remove(name) {
            None => Ok(None),
            Some(Value::Record(record)) => T::from_record(record).map(Some),
            Some(other) => Err(wrong_kind(name, "record", &other)),
        }
    }

    /// Take a nested model that must be present.
    pub fn require_model<T: XmlModel>(&mut self, name: &str) -> Result<T, ConstructionError> {
        self.take_model(name)?
            .ok_or_else(|| ConstructionError::Missing(name.to_string()))
    }

    /// Take a repeated nested model; absent means empty.
    pub fn take_models<T: XmlModel>(&mut self, name: &str) -> Result<Vec<T>, ConstructionError> {
        self.take_items(name)?
            .into_iter()
            .map(|v| match v {
                Value::Record(record) => T::from_record(record),
                other => Err(wrong_kind(name, "record", &other)),
            })
            .collect()
    }

    /// Take an optional enumerated code.
    pub fn take_code<E: CodeEnum>(&mut self, name: &str) -> Result<Option<E>, ConstructionError> {
        self.take::<String>(name)?
            .map(|code| {
                E::from_code(&code).ok_or(ConstructionError::InvalidCode {
                    field: name.to_string(),
                    code,
                })
            })
            .transpose()
    }

    /// Take an enumerated code that must be present.
    pub fn require_code<E: CodeEnum>(&mut self, name: &str) -> Result<E, ConstructionError> {
        self.take_code(name)?
            .ok_or_else(|| ConstructionError::Missing(name.to_string()))
    }

    fn take_items(&mut self, name: &str) -> Result<Vec<Value>, ConstructionError> {
        match self.remove(name) {
            None => Ok(Vec::new()),
            Some(Value::List(items)) => Ok(items),
            Some(other) => Err(wrong_kind(name, "list", &other)),
        }
    }

    // Builders, used by `to_record` implementations.

    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value.into());
        self
    }

    #[must_use]
    pub fn with_opt<V: Into<Value>>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with(name, v),
            None => self,
        }
    }

    #[must_use]
    pub fn with_model<T: XmlModel>(mut self, name: &str, model: Option<&T>) -> Self {
        if let Some(model) = model {
            self.insert(name, Value::Record(model.to_record()));
        }
        self
    }

    #[must_use]
    pub fn with_models<T: XmlModel>(mut self, name: &str, models: &[T]) -> Self {
        let items = models.iter().map(|m| Value::Record(m.to_record())).collect();
        self.insert(name, Value::List(items));
        self
    }

    #[must_use]
    pub fn with_code<E: CodeEnum>(self, name: &str, code: Option<&E>) -> Self {
        self.with_opt(name, code.map(|c| c.code()))
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.fields.iter()).finish()
    }
}

fn convert<T: FromValue>(name: &str, value: Value) -> Result<T, ConstructionError> {
    let found = value.kind();
    T::from_value(value).ok_or_else(|| ConstructionError::WrongKind {
        field: name.to_string(),
        expected: T::EXPECTED,
        found,
    })
}

fn wrong_kind(name: &str, expected: &'static str, found: &Value) -> ConstructionError {
    ConstructionError::WrongKind {
        field: name.to_string(),
        expected,
        found: found.kind(),
    }
}
