//! # Inference Core
//!
//! The reasoning engine of the diagnosis system. This crate validates a rule book
//! from `medical_rules` into a knowledge base and infers diagnoses from symptoms.
//!
//! ## Core Components
//!
//! - **knowledge_base**: Immutable, validated store of facts and rules
//! - **working_memory**: Per-query fact store and rule application chain
//! - **chaining**: Forward chaining to a fixed point, backward proof search
//! - **explanation**: Readable steps and graph edges from either chain
//! - **engine**: The boundary presentation layers call
//!
//! ## Design Philosophy
//!
//! - **Deterministic**: The strongest derivation wins; ties go to the earlier rule
//! - **Injected**: The knowledge base is an explicit value, never global state
//! - **Monotonic**: Within a query, facts are only ever added

pub mod chaining;
pub mod engine;
pub mod error;
pub mod explanation;
pub mod knowledge_base;
pub mod working_memory;

pub use chaining::*;
pub use engine::*;
pub use error::*;
pub use explanation::*;
pub use knowledge_base::*;
pub use working_memory::*;
