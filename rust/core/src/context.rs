// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mode-aware glue between the resolver, the coercer and the diagnostics
//! collector. Builders go through a [`ParseContext`] for every field so the
//! standard/flexible decision is made in one place.

use crate::coerce::{self, json_kind, Mismatch};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{Error, Result};
use crate::mode::ParseMode;
use crate::resolver::{field_path, resolve, Lookup};
use crate::schema::{Fallback, FieldSpec, Policy};
use serde_json::{Map, Value};

/// Path of the document root
pub(crate) const ROOT: &str = "$";

pub(crate) struct ParseContext {
    mode: ParseMode,
    diagnostics: Diagnostics,
}

impl ParseContext {
    pub fn new(mode: ParseMode) -> Self {
        Self {
            mode,
            diagnostics: Diagnostics::new(),
        }
    }

    #[inline]
    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    #[inline]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    /// Record an Info diagnostic; standard mode does not accumulate
    pub fn info(&mut self, path: impl Into<String>, message: impl Into<String>) {
        if self.mode.is_flexible() {
            self.diagnostics.info(path, message);
        }
    }

    /// Record a Warning diagnostic; standard mode does not accumulate
    pub fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        if self.mode.is_flexible() {
            self.diagnostics.warn(path, message);
        }
    }

    /// Entity-level failure: fatal in standard mode, a dropped entity otherwise
    pub fn absorb(&mut self, err: Error) -> Result<()> {
        if self.mode.is_standard() {
            return Err(err);
        }
        self.diagnostics.push(Diagnostic::dropped(&err));
        Ok(())
    }

    /// Field-level failure: fatal in standard mode, replaced by `substitute`
    /// otherwise
    pub fn recover(&mut self, err: Error, substitute: &str) -> Result<()> {
        if self.mode.is_standard() {
            return Err(err);
        }
        let path = err.path().to_string();
        self.diagnostics.warn(path, format!("{err}; {substitute}"));
        Ok(())
    }

    /// Raw value of `field`, `None` when it defaulted
    pub fn lookup<'a>(
        &mut self,
        obj: &'a Map<String, Value>,
        field: &FieldSpec,
        path: &str,
    ) -> Result<Option<&'a Value>> {
        match resolve(obj, field, self.mode, path)? {
            Lookup::Found { value, .. } => Ok(Some(value)),
            Lookup::Defaulted { reported, .. } => {
                if reported {
                    self.info(
                        field_path(path, field.name),
                        "missing optional field, using default",
                    );
                }
                Ok(None)
            }
        }
    }

    /// Raw value of a field that must be present
    pub fn required<'a>(
        &mut self,
        obj: &'a Map<String, Value>,
        field: &FieldSpec,
        path: &str,
    ) -> Result<&'a Value> {
        self.lookup(obj, field, path)?
            .ok_or_else(|| Error::missing(field.name, path))
    }

    /// Like [`required`](Self::required), also naming the key that matched
    pub fn required_entry<'a>(
        &mut self,
        obj: &'a Map<String, Value>,
        field: &FieldSpec,
        path: &str,
    ) -> Result<(&'static str, &'a Value)> {
        match resolve(obj, field, self.mode, path)? {
            Lookup::Found { key, value } => Ok((key, value)),
            Lookup::Defaulted { .. } => Err(Error::missing(field.name, path)),
        }
    }

    /// Apply the mismatch policy: required fields fail, optional ones fall
    /// back (flexible) or fail (standard)
    fn mismatch(&mut self, field: &FieldSpec, path: &str, m: Mismatch) -> Result<()> {
        let err = Error::mismatch(field.name, path, m.expected, m.actual);
        if field.is_required() || self.mode.is_standard() {
            return Err(err);
        }
        self.diagnostics.warn(
            field_path(path, field.name),
            format!("{err}; using default"),
        );
        Ok(())
    }

    pub fn number(&mut self, obj: &Map<String, Value>, field: &FieldSpec, path: &str) -> Result<f64> {
        let fallback = fallback_number(field);
        match self.lookup(obj, field, path)? {
            Some(raw) => match coerce::number(raw) {
                Ok(v) => Ok(v),
                Err(m) => self.mismatch(field, path, m).map(|_| fallback),
            },
            None => Ok(fallback),
        }
    }

    pub fn opt_number(
        &mut self,
        obj: &Map<String, Value>,
        field: &FieldSpec,
        path: &str,
    ) -> Result<Option<f64>> {
        match self.lookup(obj, field, path)? {
            Some(raw) => match coerce::number(raw) {
                Ok(v) => Ok(Some(v)),
                Err(m) => self.mismatch(field, path, m).map(|_| None),
            },
            None => Ok(None),
        }
    }

    pub fn text(&mut self, obj: &Map<String, Value>, field: &FieldSpec, path: &str) -> Result<String> {
        let fallback = fallback_text(field);
        match self.lookup(obj, field, path)? {
            Some(raw) => match coerce::text(raw) {
                Ok(s) => Ok(s),
                Err(m) => self.mismatch(field, path, m).map(|_| fallback.to_string()),
            },
            None => Ok(fallback.to_string()),
        }
    }

    pub fn opt_text(
        &mut self,
        obj: &Map<String, Value>,
        field: &FieldSpec,
        path: &str,
    ) -> Result<Option<String>> {
        match self.lookup(obj, field, path)? {
            Some(raw) => match coerce::text(raw) {
                Ok(s) => Ok(Some(s)),
                Err(m) => self.mismatch(field, path, m).map(|_| None),
            },
            None => Ok(None),
        }
    }

    /// Array-valued field; absent or (flexibly) mistyped arrays are empty
    pub fn array<'a>(
        &mut self,
        obj: &'a Map<String, Value>,
        field: &FieldSpec,
        path: &str,
    ) -> Result<&'a [Value]> {
        match self.lookup(obj, field, path)? {
            Some(Value::Array(items)) => Ok(items.as_slice()),
            Some(other) => {
                let m = Mismatch {
                    expected: "array",
                    actual: json_kind(other),
                };
                self.mismatch(field, path, m).map(|_| &[][..])
            }
            None => Ok(&[]),
        }
    }
}

/// Expect an entity to be a JSON object
pub(crate) fn expect_object<'a>(
    raw: &'a Value,
    field: &'static str,
    path: &str,
) -> Result<&'a Map<String, Value>> {
    raw.as_object()
        .ok_or_else(|| Error::mismatch(field, path, "object", json_kind(raw)))
}

fn fallback_of(field: &FieldSpec) -> Fallback {
    match field.policy {
        Policy::Required => Fallback::Absent,
        Policy::Optional(f) | Policy::Implicit(f) => f,
    }
}

fn fallback_number(field: &FieldSpec) -> f64 {
    match fallback_of(field) {
        Fallback::Number(v) => v,
        _ => 0.0,
    }
}

fn fallback_text(field: &FieldSpec) -> &'static str {
    match fallback_of(field) {
        Fallback::Text(s) => s,
        _ => "",
    }
}
