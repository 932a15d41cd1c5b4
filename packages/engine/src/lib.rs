//! IATI Bind Engine
//!
//! Schema-driven binding between XML elements and typed records.
//! This library provides functionality for:
//! - Declaring model schemas and classifying each field into one structural category
//! - Decoding element trees into typed models, with coverage diagnostics
//! - Encoding typed models back into element trees
//!
//! # Example
//!
//! ```ignore
//! use iatibind_engine::{from_xml_str, to_xml_string};
//!
//! let decoded = from_xml_str::<ReportingOrg>(
//!     r#"<reporting-org ref="NL-KVK-1" type="22"><narrative>Org</narrative></reporting-org>"#,
//! )?;
//! for warning in &decoded.warnings {
//!     eprintln!("{warning}");
//! }
//! let xml = to_xml_string(&decoded.value)?;
//! ```

pub mod classify;
pub mod decode;
pub mod diagnostics;
pub mod encode;
pub mod error;
pub mod markup;
pub mod narrative;
pub mod schema;
pub mod value;

#[cfg(test)]
mod testing;

// Re-export commonly used items
pub use classify::{classify, Category, CATEGORY_PRIORITY};
pub use decode::{DecodeOptions, Decoded, Decoder};
pub use diagnostics::{check_coverage, CoverageWarning, Diagnostics, UnusedKind};
pub use encode::{encode, encode_as, from_xml_str, to_xml_string, Encoder};
pub use error::{BindError, ConstructionError, MarkupError, Result};
pub use markup::{Element, QName};
pub use narrative::{Narrative, Narratives};
pub use schema::{
    Cardinality, CodeEnum, FieldDescriptor, FieldSpec, FieldType, ModelDescriptor, Schema,
    XmlModel,
};
pub use value::{FromValue, Record, Value};

/// Decode an element with default options.
///
/// # Errors
/// Any fatal [`BindError`]; coverage findings are returned as warnings.
pub fn decode<T: XmlModel>(element: &Element) -> Result<Decoded<T>> {
    Decoder::default().decode(element)
}
