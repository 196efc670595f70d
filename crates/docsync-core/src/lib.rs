//! Core infrastructure for docsync.
//!
//! This crate provides language-agnostic infrastructure:
//! - Program model arena with typed IDs for types, methods, and fields
//! - Model snapshot adapter and the doc write-back hook
//! - Doc edit IR with content-hash preconditions
//! - Analysis configuration
//! - Error types and error codes
//! - JSON output types for CLI responses
//! - Text utilities for doc comment handling

pub mod adapter;
pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod patch;
pub mod text;
