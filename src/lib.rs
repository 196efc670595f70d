//! docsync: Javadoc consistency checks and fixes.
//!
//! Finds declarations whose documentation is missing or has drifted from the
//! method it overrides, and computes the doc text that resolves each finding.

// Core infrastructure - re-exported from docsync-core
pub use docsync_core::adapter;
pub use docsync_core::config;
pub use docsync_core::error;
pub use docsync_core::model;
pub use docsync_core::output;
pub use docsync_core::patch;
pub use docsync_core::text;

// Javadoc engine - re-exported from docsync-javadoc
pub use docsync_javadoc::bean;
pub use docsync_javadoc::doc;
pub use docsync_javadoc::hierarchy;
pub use docsync_javadoc::inspect;
pub use docsync_javadoc::lookup;
pub use docsync_javadoc::ops;
pub use docsync_javadoc::reference;
pub use docsync_javadoc::templates;

// Front door
pub mod cli;
