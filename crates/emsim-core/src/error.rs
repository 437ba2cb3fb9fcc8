//! # Error Types: Structured Configuration Errors
//!
//! Defines the error types raised while validating a simulation document.
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Every variant carries the dotted path of the section in which the
//!   violation was found (`Boundaries.LumpedPort[1]`, `Solver.Eigenmode`).
//! - Errors are never batched: the first violation aborts the pass, so each
//!   message must be self-contained.
//! - Unknown-key errors include a rendering of the residual key/value pairs
//!   so a misspelled or misplaced option is visible in the diagnostic.

use thiserror::Error;

/// Top-level error type for configuration validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A required key is absent.
    #[error("missing required key \"{key}\" under \"{section}\"")]
    MissingKey {
        /// Path of the section that should contain the key.
        section: String,
        /// The missing key.
        key: String,
    },

    /// An enumerated option holds a literal that is not accepted.
    #[error("invalid value {value:?} for \"{field}\" under \"{section}\" (expected one of: {expected})")]
    InvalidEnum {
        /// Path of the section holding the field.
        section: String,
        /// The enumerated field.
        field: String,
        /// The rejected literal.
        value: String,
        /// Comma-separated list of accepted literals.
        expected: String,
    },

    /// A value has the wrong type, wrong length, or lies outside its domain.
    #[error("malformed value for \"{field}\" under \"{section}\": {reason}")]
    Malformed {
        /// Path of the section holding the field.
        section: String,
        /// The offending field.
        field: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Mutually exclusive keys were combined, or a required alternative is missing.
    #[error("conflicting keys under \"{section}\": {reason}")]
    Conflict {
        /// Path of the section with the conflict.
        section: String,
        /// Description of the conflict.
        reason: String,
    },

    /// Two entries of an indexed collection share the same index.
    #[error("repeated \"Index\" {index} under \"{section}\"")]
    DuplicateIndex {
        /// Path of the indexed collection.
        section: String,
        /// The repeated index.
        index: u32,
    },

    /// A section contains keys that the schema does not recognize.
    #[error("unsupported configuration keyword(s) {} under \"{section}\":\n{residual}", .keys.join(", "))]
    UnknownKeys {
        /// Path of the section with residual keys.
        section: String,
        /// The unrecognized keys, in document order.
        keys: Vec<String>,
        /// Pretty-printed rendering of the residual key/value pairs.
        residual: String,
    },

    /// An entry references a mesh attribute that its primary section does not declare.
    #[error("attribute {attribute} referenced under \"{section}\" {reason}")]
    CrossReference {
        /// Path of the referencing section.
        section: String,
        /// The dangling attribute.
        attribute: i32,
        /// Why the reference is invalid.
        reason: String,
    },
}

/// Fieldless classification of a [`ConfigError`], for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`ConfigError::MissingKey`].
    MissingKey,
    /// See [`ConfigError::InvalidEnum`].
    InvalidEnum,
    /// See [`ConfigError::Malformed`].
    Malformed,
    /// See [`ConfigError::Conflict`].
    Conflict,
    /// See [`ConfigError::DuplicateIndex`].
    DuplicateIndex,
    /// See [`ConfigError::UnknownKeys`].
    UnknownKeys,
    /// See [`ConfigError::CrossReference`].
    CrossReference,
}

impl ConfigError {
    /// Path of the section in which the violation was detected.
    pub fn section(&self) -> &str {
        match self {
            Self::MissingKey { section, .. }
            | Self::InvalidEnum { section, .. }
            | Self::Malformed { section, .. }
            | Self::Conflict { section, .. }
            | Self::DuplicateIndex { section, .. }
            | Self::UnknownKeys { section, .. }
            | Self::CrossReference { section, .. } => section,
        }
    }

    /// The kind of violation, without its context.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingKey { .. } => ErrorKind::MissingKey,
            Self::InvalidEnum { .. } => ErrorKind::InvalidEnum,
            Self::Malformed { .. } => ErrorKind::Malformed,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::DuplicateIndex { .. } => ErrorKind::DuplicateIndex,
            Self::UnknownKeys { .. } => ErrorKind::UnknownKeys,
            Self::CrossReference { .. } => ErrorKind::CrossReference,
        }
    }

    /// Shorthand for a [`ConfigError::Malformed`] error.
    pub fn malformed(
        section: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Malformed {
            section: section.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`ConfigError::Conflict`] error.
    pub fn conflict(section: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Conflict {
            section: section.into(),
            reason: reason.into(),
        }
    }
}

/// A string literal that does not name any variant of an enumerated option.
///
/// Decoding never produces a configuration error by itself; the calling
/// validator converts this into [`ConfigError::InvalidEnum`] with the
/// section and field it was reading.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {family} {value:?}")]
pub struct UnknownVariant {
    /// Name of the option family (e.g. "problem type").
    pub family: &'static str,
    /// The rejected literal.
    pub value: String,
    /// Every accepted literal, in declaration order.
    pub expected: &'static [&'static str],
}

impl UnknownVariant {
    /// Attach section and field context, producing a configuration error.
    pub fn into_config_error(self, section: &str, field: &str) -> ConfigError {
        ConfigError::InvalidEnum {
            section: section.to_string(),
            field: field.to_string(),
            value: self.value,
            expected: self.expected.join(", "),
        }
    }
}
