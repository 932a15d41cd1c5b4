//! iatibind harvester - IATI vocabulary, fetching and command-line tooling.
//!
//! This crate declares the IATI document models as schema data for
//! `iatibind-engine`, and adds the plumbing to fetch those documents over
//! HTTP or from disk and write them back out as YAML, JSON or XML.
//!
//! # Example
//!
//! ```
//! use iatibind_harvester::config;
//!
//! // Classify sources and validate codelist names before any request
//! assert!(config::validate_source("https://iatiregistry.org/a.xml").is_ok());
//! assert!(config::validate_codelist_name("ActivityScope").is_ok());
//! ```
//!
//! # Architecture
//!
//! - [`vocabulary`]: IATI models (activities, codelists, organisations, publishers)
//! - [`config`]: Configuration constants and input validation
//! - [`error`]: Error types and Result alias
//! - [`http`]: HTTP client with retries and size limits
//! - [`fetch`]: Loading documents from URLs, files and codelist directories
//! - [`output`]: YAML, JSON and XML output
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod http;
pub mod output;
pub mod vocabulary;

// Re-export commonly used items
pub use config::{validate_codelist_name, validate_source, Source};
pub use error::{HarvesterError, Result};
pub use fetch::{fetch_element, fetch_model, load_codelists, load_file, load_source};
