//! # Medical Rules
//!
//! The "rule book" crate - contains the fact and rule definitions consumed by the
//! diagnosis engine, along with the embedded medical dataset.
//! This crate is pure data: it performs no inference and no validation beyond
//! what deserialization enforces. Structural checks happen when the inference
//! core builds its knowledge base.

pub mod definitions;
pub mod rule_book;

pub use definitions::*;
pub use rule_book::*;
