//! # emsim-core: Foundational Types for Simulation Configuration
//!
//! The leaf crate of the emsim workspace. It defines the building blocks
//! every section validator in `emsim-schema` is made of; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Non-destructive extraction.** A [`Section`] reads typed fields from a
//!    borrowed `serde_json::Value` node and checks the node's keys against a
//!    static allowlist. The document tree is never mutated.
//!
//! 2. **Closed option families.** Every enumerated option is a Rust enum
//!    with no "invalid" variant. Decoding returns `Result`, and the caller
//!    attaches section/field context to the failure.
//!
//! 3. **One error type.** [`ConfigError`] carries the dotted section path
//!    and the kind of violation; the first violation aborts validation.
//!
//! 4. **Duplicate indices are errors.** [`IndexedMap::try_insert`] never
//!    overwrites.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `emsim-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod codec;
pub mod coerce;
pub mod collections;
pub mod error;
pub mod section;

pub use codec::{
    CompressionType, EigenSolverType, ExcitationWaveform, KspType, LinearSolverType,
    PreconditionerSide, ProblemType, SymbolicFactorization, TimeIntegration,
};
pub use coerce::{normalize_direction, Axis, CoerceError, Direction, Sign, SymmetricTensor};
pub use collections::{AttributeSet, IndexedMap};
pub use error::{ConfigError, ErrorKind, UnknownVariant};
pub use section::{AliasPair, Aliased, Section, Spelling};
