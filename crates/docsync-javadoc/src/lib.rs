//! Javadoc consistency engine for docsync.
//!
//! This crate classifies the documentation state of every type, method, and
//! field in a [`docsync_core::model::ProgramModel`] and computes the doc text
//! that resolves each finding:
//!
//! - [`hierarchy`]: super-member resolution across class and interface lineages
//! - [`doc`]: doc comment normalization, comparison, and derived facts
//! - [`reference`]: `@see` back-reference generation and detection
//! - [`bean`]: bean accessor recognition and property naming
//! - [`templates`]: template sources and doc generation
//! - [`inspect`]: the diagnostic engine
//! - [`ops`]: fix computation
//! - [`lookup`]: declaration path parsing and resolution

pub mod bean;
pub mod doc;
pub mod error_bridges;
pub mod hierarchy;
pub mod inspect;
pub mod lookup;
pub mod ops;
pub mod reference;
pub mod templates;
pub mod test_helpers;
