// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Field Resolver
//!
//! Pure lookup of a logical field inside a raw JSON object. Misses are
//! returned to the caller, which decides whether they are worth a diagnostic.

use crate::error::{Error, Result};
use crate::mode::ParseMode;
use crate::schema::{Fallback, FieldSpec, Policy};
use serde_json::{Map, Value};

/// Outcome of resolving one logical field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    /// Found under `key`
    Found { key: &'static str, value: &'a Value },
    /// Not found; `reported` says whether the miss deserves a diagnostic
    Defaulted { fallback: Fallback, reported: bool },
}

impl<'a> Lookup<'a> {
    #[inline]
    pub fn value(&self) -> Option<&'a Value> {
        match self {
            Lookup::Found { value, .. } => Some(*value),
            Lookup::Defaulted { .. } => None,
        }
    }
}

/// Resolve `field` in `object`, trying the keys `mode` accepts in order
///
/// `path` names the object being read and is only used to build the error.
pub fn resolve<'a>(
    object: &'a Map<String, Value>,
    field: &FieldSpec,
    mode: ParseMode,
    path: &str,
) -> Result<Lookup<'a>> {
    for &key in field.accepted(mode) {
        if let Some(value) = object.get(key) {
            return Ok(Lookup::Found { key, value });
        }
    }

    match field.policy {
        Policy::Required => Err(Error::missing(field.name, path)),
        Policy::Optional(fallback) => Ok(Lookup::Defaulted {
            fallback,
            reported: true,
        }),
        Policy::Implicit(fallback) => Ok(Lookup::Defaulted {
            fallback,
            reported: false,
        }),
    }
}

/// Join an entity path and a field name: `header` + `mapName` -> `header.mapName`
#[inline]
pub fn field_path(path: &str, field: &str) -> String {
    if path.is_empty() || path == "$" {
        field.to_string()
    } else {
        format!("{path}.{field}")
    }
}

/// Path of the `index`-th element of a collection: `normalPosList[3]`
#[inline]
pub fn index_path(path: &str, index: usize) -> String {
    format!("{path}[{index}]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::header;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test fixture must be an object"),
        }
    }

    #[test]
    fn test_first_present_alias_wins() {
        let obj = object(json!({"Name": "b", "name": "a"}));
        let lookup = resolve(&obj, &header::NAME, ParseMode::Flexible, "header").unwrap();
        assert_eq!(
            lookup,
            Lookup::Found {
                key: "name",
                value: &json!("a")
            }
        );
    }

    #[test]
    fn test_standard_mode_ignores_aliases() {
        let obj = object(json!({"name": "floor1"}));
        let err = resolve(&obj, &header::NAME, ParseMode::Standard, "header").unwrap_err();
        assert_eq!(err, Error::missing("mapName", "header"));
    }

    #[test]
    fn test_implicit_miss_is_silent() {
        let obj = object(json!({}));
        let lookup = resolve(&obj, &header::VERSION, ParseMode::Flexible, "header").unwrap();
        assert_eq!(
            lookup,
            Lookup::Defaulted {
                fallback: Fallback::Text(""),
                reported: false
            }
        );
        assert!(lookup.value().is_none());
    }

    #[test]
    fn test_null_counts_as_present() {
        let obj = object(json!({"mapName": null}));
        let lookup = resolve(&obj, &header::NAME, ParseMode::Standard, "header").unwrap();
        assert_eq!(lookup.value(), Some(&Value::Null));
    }

    #[test]
    fn test_paths() {
        assert_eq!(field_path("header", "mapName"), "header.mapName");
        assert_eq!(field_path("$", "header"), "header");
        assert_eq!(
            field_path(&index_path("advancedPointList", 3), "instanceName"),
            "advancedPointList[3].instanceName"
        );
    }
}
