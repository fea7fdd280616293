//! Translation of validation keywords into the language-agnostic
//! `ConstraintSet` attached to each field.
//!
//! Inclusive and exclusive numeric bounds stay distinct all the way to the
//! emitted checks. Patterns are syntax-checked as ECMA-262 regular
//! expressions (what JSON Schema specifies) and degrade with a warning when
//! invalid. Non-null comes from the enclosing object's `required` list, not
//! from the field's own schema.

use serde_json::Value;

use crate::error::{GenerationWarning, WarningKind};
use crate::model::{ConstraintSet, NumberBound};
use crate::schema::SchemaNode;

/// Extracts the constraint set for one field.
///
/// A field typed via a custom override keeps its non-null requirement but
/// suppresses every value-range constraint: the external type owns its own
/// invariants, and no generated check may inspect its internals.
#[must_use]
pub fn translate(
    node: &SchemaNode,
    required: bool,
    overridden: bool,
    warnings: &mut Vec<GenerationWarning>,
) -> ConstraintSet {
    if overridden {
        return ConstraintSet {
            non_null: required,
            ..ConstraintSet::default()
        };
    }

    let pattern: Option<String> = node.pattern().and_then(|pattern| {
        if regress::Regex::new(pattern).is_ok() {
            Some(pattern.to_string())
        } else {
            warnings.push(GenerationWarning {
                path: node.location(),
                kind: WarningKind::InvalidPattern(pattern.to_string()),
            });
            None
        }
    });

    let enum_values: Vec<String> = match node.enum_values() {
        None => Vec::new(),
        Some(values) => {
            let strings: Option<Vec<String>> = values
                .iter()
                .map(|value| value.as_str().map(String::from))
                .collect();
            match strings {
                Some(strings) if !strings.is_empty() => strings,
                _ => {
                    if !values.is_empty() {
                        warnings.push(GenerationWarning {
                            path: node.location(),
                            kind: WarningKind::MixedEnumValues,
                        });
                    }
                    Vec::new()
                }
            }
        }
    };

    ConstraintSet {
        non_null: required,
        minimum: bound(node.minimum().cloned(), node.exclusive_minimum()),
        maximum: bound(node.maximum().cloned(), node.exclusive_maximum()),
        min_length: node.min_length(),
        max_length: node.max_length(),
        pattern,
        enum_values,
    }
}

/// Combines an inclusive bound keyword with its exclusive counterpart.
///
/// Draft 2020-12 spells the exclusive bound as a number of its own; draft 4
/// spells it as a boolean modifier on the inclusive keyword. Both forms are
/// honored, and the exclusive form wins when present.
fn bound(
    inclusive: Option<serde_json::Number>,
    exclusive: Option<&Value>,
) -> Option<NumberBound> {
    match (inclusive, exclusive) {
        (_, Some(Value::Number(value))) => Some(NumberBound {
            value: value.clone(),
            exclusive: true,
        }),
        (Some(value), Some(Value::Bool(true))) => Some(NumberBound {
            value,
            exclusive: true,
        }),
        (Some(value), _) => Some(NumberBound {
            value,
            exclusive: false,
        }),
        (None, _) => None,
    }
}
