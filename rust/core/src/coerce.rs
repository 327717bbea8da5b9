// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value Coercer
//!
//! Converts raw JSON scalars into semantic types, tolerating the usual
//! representational variance: string-encoded numbers, integer vs. float,
//! `"true"`/`"false"` strings for booleans.
//!
//! Functions here are pure; mode policy is applied by the caller.

use crate::model::{PropertyType, PropertyValue};
use serde_json::Value;

/// A raw value that cannot be read as the requested type
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    pub expected: &'static str,
    /// Raw JSON kind that was found
    pub actual: &'static str,
}

impl Mismatch {
    #[inline]
    fn new(expected: &'static str, found: &Value) -> Self {
        Self {
            expected,
            actual: json_kind(found),
        }
    }
}

/// Name of a raw JSON kind, for messages
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Parse a whole (trimmed) string as a finite number
#[inline]
fn parse_number_str(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    fast_float::parse::<f64, _>(trimmed)
        .ok()
        .filter(|v| v.is_finite())
}

/// Numeric target: JSON numbers, or strings that parse fully as a number
pub fn number(value: &Value) -> Result<f64, Mismatch> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number_str(s),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| Mismatch::new("number", value))
}

/// Boolean target: JSON booleans, or `"true"`/`"false"` in any case
pub fn boolean(value: &Value) -> Result<bool, Mismatch> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
        _ => Err(Mismatch::new("boolean", value)),
    }
}

/// String target: JSON strings only
pub fn text(value: &Value) -> Result<String, Mismatch> {
    match value {
        Value::String(s) => Ok(s.clone()),
        _ => Err(Mismatch::new("string", value)),
    }
}

/// How a property value related to its type tag
#[derive(Debug, Clone, PartialEq)]
pub enum TagCheck {
    /// No tag supplied; type inferred from the value
    Untagged,
    /// Tag matches the value's native kind
    Consistent,
    /// Value was a representational variant of the tagged type and converted
    Converted,
    /// Tag was not recognized; type inferred from the value
    UnknownTag(String),
    /// Typed field omitted; the tagged type's zero value was used
    Omitted,
    /// Tag disagrees with the value; the native kind was kept
    Disagrees { tagged: PropertyType },
}

/// Property value plus what the coercer made of its tag
#[derive(Debug, Clone, PartialEq)]
pub struct CoercedProperty {
    pub value: PropertyValue,
    pub check: TagCheck,
}

/// Value as its native JSON kind, if it is one of the four property kinds
fn native_value(raw: &Value) -> Option<PropertyValue> {
    match raw {
        Value::Bool(b) => Some(PropertyValue::Bool(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(PropertyValue::Integer(i)),
            None => n.as_f64().map(PropertyValue::Float),
        },
        Value::String(s) => Some(PropertyValue::String(s.clone())),
        _ => None,
    }
}

/// Convert `raw` to `tagged` when it is a common representation of it
fn convert_variant(
    raw: &Value,
    native: &PropertyValue,
    tagged: PropertyType,
) -> Option<PropertyValue> {
    match (tagged, native) {
        (PropertyType::Bool, PropertyValue::String(_)) => {
            boolean(raw).ok().map(PropertyValue::Bool)
        }
        (PropertyType::Integer, PropertyValue::Float(f))
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 =>
        {
            Some(PropertyValue::Integer(*f as i64))
        }
        (PropertyType::Integer, PropertyValue::String(s)) => {
            s.trim().parse::<i64>().ok().map(PropertyValue::Integer)
        }
        (PropertyType::Float, PropertyValue::Integer(i)) => Some(PropertyValue::Float(*i as f64)),
        (PropertyType::Float, PropertyValue::String(_)) => {
            number(raw).ok().map(PropertyValue::Float)
        }
        _ => None,
    }
}

/// Property target
///
/// Without a tag the value's native kind decides. With a tag, variants of
/// the tagged type are converted; real disagreements keep the native kind
/// and say so in [`TagCheck::Disagrees`]. Arrays, objects and null are not
/// property values.
pub fn property_value(raw: &Value, tag: Option<&str>) -> Result<CoercedProperty, Mismatch> {
    let native = native_value(raw)
        .ok_or_else(|| Mismatch::new("string, integer, float or boolean", raw))?;

    let Some(tag) = tag else {
        return Ok(CoercedProperty {
            value: native,
            check: TagCheck::Untagged,
        });
    };

    let Some(tagged) = PropertyType::from_tag(tag) else {
        return Ok(CoercedProperty {
            value: native,
            check: TagCheck::UnknownTag(tag.to_string()),
        });
    };

    if native.kind() == tagged {
        return Ok(CoercedProperty {
            value: native,
            check: TagCheck::Consistent,
        });
    }

    Ok(match convert_variant(raw, &native, tagged) {
        Some(value) => CoercedProperty {
            value,
            check: TagCheck::Converted,
        },
        None => CoercedProperty {
            value: native,
            check: TagCheck::Disagrees { tagged },
        },
    })
}

/// Property target for the generic `value` field
///
/// Producers fill `value` with an encoded copy and leave the typed field out
/// when it holds its zero value. A string that does not read as a tagged
/// bool or number therefore stands for that type's zero value.
pub fn encoded_property_value(raw: &Value, tag: Option<&str>) -> Result<CoercedProperty, Mismatch> {
    let coerced = property_value(raw, tag)?;
    match coerced.check {
        TagCheck::Disagrees { tagged } if tagged != PropertyType::String && raw.is_string() => {
            Ok(CoercedProperty {
                value: tagged.zero_value(),
                check: TagCheck::Omitted,
            })
        }
        _ => Ok(coerced),
    }
}
