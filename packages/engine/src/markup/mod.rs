//! Markup layer: the owned element tree and the parser/writer adapters.
//!
//! The engine itself never tokenizes or prints markup; it works on
//! [`Element`] trees produced by [`parse`] and consumed by [`render`].

mod element;
mod parse;
mod render;

pub use element::{Element, QName, XML_NAMESPACE};
pub use parse::{element_from_node, parse, parse_bytes};
pub use render::{render, render_document, render_pretty};
