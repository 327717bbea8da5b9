// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for SMAP parsing.

use thiserror::Error;

/// Result type for parsing operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing a SMAP document
///
/// In flexible mode only [`Error::MalformedJson`] escapes to the caller; the
/// other variants are recorded as diagnostics against the offending entity.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Input is not a parseable JSON object.
    #[error("malformed JSON: {reason}")]
    MalformedJson { reason: String },

    /// A required field was not found under any accepted key.
    #[error("missing required field `{field}` at {path}")]
    MissingRequiredField { field: &'static str, path: String },

    /// A field was present but could not be coerced to its target type.
    #[error("type mismatch for `{field}` at {path}: expected {expected}, found {actual}")]
    TypeMismatch {
        field: &'static str,
        path: String,
        expected: &'static str,
        actual: String,
    },

    /// An entity violates a structural minimum (e.g. too few vertices).
    #[error("malformed structure at {path}: {reason}")]
    MalformedStructure { path: String, reason: String },
}

impl Error {
    pub fn malformed_json(reason: impl Into<String>) -> Self {
        Error::MalformedJson {
            reason: reason.into(),
        }
    }

    pub fn missing(field: &'static str, path: impl Into<String>) -> Self {
        Error::MissingRequiredField {
            field,
            path: path.into(),
        }
    }

    pub fn mismatch(
        field: &'static str,
        path: impl Into<String>,
        expected: &'static str,
        actual: impl Into<String>,
    ) -> Self {
        Error::TypeMismatch {
            field,
            path: path.into(),
            expected,
            actual: actual.into(),
        }
    }

    pub fn structure(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedStructure {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Entity path the error refers to (`"$"` for the document root)
    pub fn path(&self) -> &str {
        match self {
            Error::MalformedJson { .. } => "$",
            Error::MissingRequiredField { path, .. }
            | Error::TypeMismatch { path, .. }
            | Error::MalformedStructure { path, .. } => path,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::malformed_json(err.to_string())
    }
}
