// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property builder

use crate::coerce::{self, json_kind, TagCheck};
use crate::context::{expect_object, ParseContext};
use crate::error::{Error, Result};
use crate::model::Property;
use crate::resolver::{field_path, index_path};
use crate::schema::{advanced, property};
use serde_json::{Map, Value};

/// Build every property of an advanced entity
///
/// A bad property is dropped on its own in flexible mode; the owning entity
/// survives.
pub(crate) fn build_properties(
    ctx: &mut ParseContext,
    obj: &Map<String, Value>,
    path: &str,
) -> Result<Vec<Property>> {
    let items = ctx.array(obj, &advanced::PROPERTIES, path)?;
    let list_path = field_path(path, advanced::PROPERTIES.name);

    let mut properties = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        match build_property(ctx, item, &index_path(&list_path, i)) {
            Ok(Some(prop)) => properties.push(prop),
            Ok(None) => {}
            Err(err) => ctx.absorb(err)?,
        }
    }
    Ok(properties)
}

/// Build one property; `None` when flexible mode set its value aside
pub(crate) fn build_property(
    ctx: &mut ParseContext,
    raw: &Value,
    path: &str,
) -> Result<Option<Property>> {
    let obj = expect_object(raw, "property", path)?;

    let key = ctx.text(obj, &property::KEY, path)?;
    let tag = ctx.opt_text(obj, &property::TYPE, path)?;
    let (value_key, raw_value) = ctx.required_entry(obj, &property::VALUE, path)?;
    let value_path = field_path(path, property::VALUE.name);

    let coerced = if value_key == property::ENCODED_VALUE {
        coerce::encoded_property_value(raw_value, tag.as_deref())
    } else {
        coerce::property_value(raw_value, tag.as_deref())
    };
    let coerced = match coerced {
        Ok(coerced) => coerced,
        Err(m) if ctx.mode().is_standard() => {
            return Err(Error::mismatch(property::VALUE.name, path, m.expected, m.actual));
        }
        Err(m) => {
            ctx.warn(
                value_path,
                format!(
                    "property `{key}` has a non-scalar {} value, not stored: {raw_value}",
                    m.actual
                ),
            );
            return Ok(None);
        }
    };

    let kind = coerced.value.kind();
    let (declared_type, source_tag) = match coerced.check {
        TagCheck::Untagged => (kind, None),
        TagCheck::Consistent | TagCheck::Converted | TagCheck::Omitted => (kind, tag),
        TagCheck::UnknownTag(t) => {
            ctx.info(
                field_path(path, property::TYPE.name),
                format!("unknown type tag `{t}`, type inferred from value"),
            );
            (kind, None)
        }
        TagCheck::Disagrees { tagged } => {
            if ctx.mode().is_standard() {
                return Err(Error::mismatch(
                    property::VALUE.name,
                    path,
                    tagged.as_str(),
                    json_kind(raw_value),
                ));
            }
            ctx.warn(
                value_path,
                format!("property `{key}` is tagged {tagged} but holds a {kind} value, keeping {kind}"),
            );
            (kind, None)
        }
    };

    let prop = Property::new(key, coerced.value, declared_type)
        .ok_or_else(|| Error::structure(path, "property value does not match its type"))?;
    Ok(Some(prop.with_source_tag(source_tag)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use crate::mode::ParseMode;
    use crate::model::{PropertyType, PropertyValue};
    use serde_json::json;

    fn build(mode: ParseMode, raw: Value) -> (Result<Option<Property>>, ParseContext) {
        let mut ctx = ParseContext::new(mode);
        let result = build_property(&mut ctx, &raw, "advancedPointList[0].property[0]");
        (result, ctx)
    }

    #[test]
    fn test_typed_value_field_preferred() {
        let raw = json!({"key": "spin", "type": "bool", "value": "dHJ1ZQ==", "boolValue": true});
        let (result, ctx) = build(ParseMode::Standard, raw);
        let prop = result.unwrap().unwrap();
        assert_eq!(prop.value(), &PropertyValue::Bool(true));
        assert_eq!(prop.declared_type(), PropertyType::Bool);
        assert_eq!(prop.source_tag(), Some("bool"));
        assert!(ctx.diagnostics().is_empty());
    }

    #[test]
    fn test_untagged_infers_type() {
        let (result, _) = build(ParseMode::Flexible, json!({"key": "maxSpeed", "value": 1.2}));
        let prop = result.unwrap().unwrap();
        assert_eq!(prop.declared_type(), PropertyType::Float);
        assert_eq!(prop.source_tag(), None);
    }

    #[test]
    fn test_tag_mismatch_trusts_native_in_flexible() {
        let raw = json!({"key": "level", "type": "int", "stringValue": "high"});
        let (result, ctx) = build(ParseMode::Flexible, raw);
        let prop = result.unwrap().unwrap();
        assert_eq!(prop.value(), &PropertyValue::String("high".into()));
        assert_eq!(prop.declared_type(), PropertyType::String);
        assert_eq!(prop.source_tag(), None);
        assert_eq!(ctx.diagnostics().count(Severity::Warning), 1);
    }

    #[test]
    fn test_tag_mismatch_fails_in_standard() {
        let raw = json!({"key": "level", "type": "int", "stringValue": "high"});
        let (result, _) = build(ParseMode::Standard, raw);
        assert!(matches!(result, Err(Error::TypeMismatch { field: "value", .. })));
    }

    #[test]
    fn test_encoded_copy_of_zero_value() {
        for mode in [ParseMode::Standard, ParseMode::Flexible] {
            let raw = json!({"key": "spin", "type": "bool", "value": "ZmFsc2U="});
            let (result, ctx) = build(mode, raw);
            let prop = result.unwrap().unwrap();
            assert_eq!(prop.value(), &PropertyValue::Bool(false));
            assert_eq!(prop.source_tag(), Some("bool"));
            assert!(ctx.diagnostics().is_empty());

            let raw = json!({"key": "offset", "type": "int32", "value": "AAAAAA=="});
            let (result, _) = build(mode, raw);
            assert_eq!(result.unwrap().unwrap().value(), &PropertyValue::Integer(0));
        }
    }

    #[test]
    fn test_non_scalar_value_kept_as_diagnostic_text() {
        let raw = json!({"key": "zones", "value": [1, 2]});
        let (result, ctx) = build(ParseMode::Flexible, raw.clone());
        assert_eq!(result.unwrap(), None);
        let diag = ctx.diagnostics().iter().next().unwrap();
        assert_eq!(diag.path, "advancedPointList[0].property[0].value");
        assert!(diag.message.contains("[1,2]"));

        let (result, _) = build(ParseMode::Standard, raw);
        assert!(matches!(result, Err(Error::TypeMismatch { .. })));
    }

    #[test]
    fn test_bad_property_does_not_drop_siblings() {
        let obj = json!({"property": [
            {"key": "a", "value": 1},
            {"value": 2},
            {"key": "c", "value": "x"}
        ]});
        let mut ctx = ParseContext::new(ParseMode::Flexible);
        let props = build_properties(&mut ctx, obj.as_object().unwrap(), "advancedPointList[0]").unwrap();
        let keys: Vec<_> = props.iter().map(|p| p.key()).collect();
        assert_eq!(keys, ["a", "c"]);
        let diag = ctx.diagnostics().iter().next().unwrap();
        assert_eq!(diag.path, "advancedPointList[0].property[1]");
    }
}
