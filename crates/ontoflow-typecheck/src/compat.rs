// Copyright 2025 DataStax Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use this file except
// in compliance with the License. You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software distributed under the License
// is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express
// or implied. See the License for the specific language governing permissions and limitations under
// the License.

//! Structural compatibility between an expected and an actual type.

use ontoflow_core::schema::{SchemaType, TypeTag};

use crate::coercion::{CoercionRegistry, CoercionRule};

/// Outcome of checking an actual type against an expected one.
#[derive(Debug, Clone, PartialEq)]
pub enum Compatibility {
    /// The value can be used as-is.
    Exact,
    /// Usable after applying the suggested conversion.
    Coercible(CoercionRule),
    /// Not usable; each entry is one human-readable reason.
    Incompatible(Vec<String>),
    /// Some but not all alternatives fit; an explicit annotation is needed.
    Ambiguous,
}

impl Compatibility {
    /// Whether the value can be used, directly or after coercion.
    pub fn is_usable(&self) -> bool {
        matches!(self, Compatibility::Exact | Compatibility::Coercible(_))
    }
}

/// Can a value of type `actual` be handed to a consumer expecting
/// `expected`?
///
/// The check is asymmetric: object compatibility is width subtyping in the
/// consumer's favor (the producer may carry extra fields), arrays are
/// covariant in their element type, and `any` on either side is universal.
/// When the shapes differ, the registry is consulted for a conversion.
pub fn compatible(
    expected: &SchemaType,
    actual: &SchemaType,
    registry: &CoercionRegistry,
) -> Compatibility {
    if expected.is_any() || actual.is_any() {
        return Compatibility::Exact;
    }

    // An actual union must fit for every alternative it may produce; if
    // only some alternatives fit, the caller has to disambiguate.
    if let SchemaType::Union(variants) = actual {
        return combine_actual_union(expected, variants, registry);
    }

    // An expected union is satisfied by the best-fitting variant.
    if let SchemaType::Union(variants) = expected {
        return combine_expected_union(variants, actual, registry);
    }

    match (expected, actual) {
        (SchemaType::Primitive(want), SchemaType::Primitive(have)) if want == have => {
            Compatibility::Exact
        }
        (
            SchemaType::Object {
                fields: expected_fields,
                required,
            },
            SchemaType::Object {
                fields: actual_fields,
                ..
            },
        ) => {
            let mut reasons = Vec::new();
            let mut field_rules = Vec::new();
            let mut ambiguous = false;

            for (name, expected_field) in expected_fields {
                let Some(actual_field) = actual_fields.get(name) else {
                    if required.contains(name) {
                        reasons.push(format!("missing required field '{name}'"));
                    }
                    continue;
                };
                match compatible(expected_field, actual_field, registry) {
                    Compatibility::Exact => {}
                    Compatibility::Coercible(rule) => field_rules.push((name.clone(), rule)),
                    Compatibility::Incompatible(sub) => {
                        reasons.extend(sub.into_iter().map(|r| format!("field '{name}': {r}")));
                    }
                    Compatibility::Ambiguous => ambiguous = true,
                }
            }

            if !reasons.is_empty() {
                Compatibility::Incompatible(reasons)
            } else if ambiguous {
                Compatibility::Ambiguous
            } else if field_rules.is_empty() {
                Compatibility::Exact
            } else {
                Compatibility::Coercible(object_rule(field_rules))
            }
        }
        (SchemaType::Array(expected_element), SchemaType::Array(actual_element)) => {
            match compatible(expected_element, actual_element, registry) {
                Compatibility::Exact => Compatibility::Exact,
                Compatibility::Coercible(rule) => Compatibility::Coercible(CoercionRule {
                    from: TypeTag::Array,
                    to: TypeTag::Array,
                    description: format!("each element: {}", rule.description),
                    lossless: rule.lossless,
                    marks_inferred: rule.marks_inferred,
                }),
                Compatibility::Incompatible(reasons) => Compatibility::Incompatible(
                    reasons.into_iter().map(|r| format!("element: {r}")).collect(),
                ),
                Compatibility::Ambiguous => Compatibility::Ambiguous,
            }
        }
        _ => match registry.suggest(actual.tag(), expected.tag()) {
            Some(rule) => Compatibility::Coercible(rule),
            None => Compatibility::Incompatible(vec![format!(
                "expected {expected}, found {actual}"
            )]),
        },
    }
}

fn combine_actual_union(
    expected: &SchemaType,
    variants: &[SchemaType],
    registry: &CoercionRegistry,
) -> Compatibility {
    let mut usable = 0;
    let mut rules = Vec::new();
    let mut reasons = Vec::new();

    for variant in variants {
        match compatible(expected, variant, registry) {
            Compatibility::Exact => usable += 1,
            Compatibility::Coercible(rule) => {
                usable += 1;
                rules.push(rule);
            }
            Compatibility::Incompatible(sub) => {
                reasons.extend(sub.into_iter().map(|r| format!("alternative {variant}: {r}")));
            }
            Compatibility::Ambiguous => return Compatibility::Ambiguous,
        }
    }

    if usable == variants.len() {
        match rules.into_iter().next() {
            None => Compatibility::Exact,
            Some(rule) => Compatibility::Coercible(rule),
        }
    } else if usable > 0 {
        Compatibility::Ambiguous
    } else {
        Compatibility::Incompatible(reasons)
    }
}

fn combine_expected_union(
    variants: &[SchemaType],
    actual: &SchemaType,
    registry: &CoercionRegistry,
) -> Compatibility {
    let mut best_rule = None;
    let mut reasons = Vec::new();
    let mut ambiguous = false;

    for variant in variants {
        match compatible(variant, actual, registry) {
            Compatibility::Exact => return Compatibility::Exact,
            Compatibility::Coercible(rule) => {
                best_rule.get_or_insert(rule);
            }
            Compatibility::Incompatible(sub) => {
                reasons.extend(sub.into_iter().map(|r| format!("variant {variant}: {r}")));
            }
            Compatibility::Ambiguous => ambiguous = true,
        }
    }

    if let Some(rule) = best_rule {
        Compatibility::Coercible(rule)
    } else if ambiguous {
        Compatibility::Ambiguous
    } else {
        Compatibility::Incompatible(reasons)
    }
}

fn object_rule(field_rules: Vec<(String, CoercionRule)>) -> CoercionRule {
    let lossless = field_rules.iter().all(|(_, r)| r.lossless);
    let marks_inferred = field_rules.iter().any(|(_, r)| r.marks_inferred);
    let description = field_rules
        .iter()
        .map(|(name, rule)| format!("field '{name}': {}", rule.description))
        .collect::<Vec<_>>()
        .join("; ");
    CoercionRule {
        from: TypeTag::Object,
        to: TypeTag::Object,
        description,
        lossless,
        marks_inferred,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontoflow_core::schema::SchemaType;
    use serde_json::json;

    fn ty(fragment: serde_json::Value) -> SchemaType {
        SchemaType::parse(&fragment).unwrap()
    }

    fn check(expected: serde_json::Value, actual: serde_json::Value) -> Compatibility {
        compatible(&ty(expected), &ty(actual), &CoercionRegistry::builtin())
    }

    #[test]
    fn test_reflexive() {
        for fragment in [
            json!({"type": "string"}),
            json!({"type": "array", "items": {"type": "integer"}}),
            json!({
                "type": "object",
                "properties": {"a": {"type": "number"}},
                "required": ["a"]
            }),
        ] {
            assert_eq!(check(fragment.clone(), fragment), Compatibility::Exact);
        }
    }

    #[test]
    fn test_any_is_universal() {
        assert_eq!(check(json!({}), json!({"type": "string"})), Compatibility::Exact);
        assert_eq!(check(json!({"type": "string"}), json!({})), Compatibility::Exact);
    }

    #[test]
    fn test_width_subtyping_is_asymmetric() {
        let narrow = json!({
            "type": "object",
            "properties": {"host": {"type": "string"}},
            "required": ["host"]
        });
        let wide = json!({
            "type": "object",
            "properties": {
                "host": {"type": "string"},
                "port": {"type": "integer"}
            },
            "required": ["host", "port"]
        });

        // Extra fields on the producer are fine.
        assert_eq!(check(narrow.clone(), wide.clone()), Compatibility::Exact);
        // The reverse direction misses a required field.
        let Compatibility::Incompatible(reasons) = check(wide, narrow) else {
            panic!("expected incompatible");
        };
        assert_eq!(reasons, vec!["missing required field 'port'"]);
    }

    #[test]
    fn test_primitive_coercion_suggested() {
        let result = check(json!({"type": "number"}), json!({"type": "integer"}));
        let Compatibility::Coercible(rule) = result else {
            panic!("expected coercible");
        };
        assert_eq!(rule.from, TypeTag::Integer);
        assert_eq!(rule.to, TypeTag::Number);
    }

    #[test]
    fn test_nested_field_coercion_becomes_object_rule() {
        let expected = json!({
            "type": "object",
            "properties": {"count": {"type": "number"}},
            "required": ["count"]
        });
        let actual = json!({
            "type": "object",
            "properties": {"count": {"type": "integer"}},
            "required": ["count"]
        });

        let Compatibility::Coercible(rule) = check(expected, actual) else {
            panic!("expected coercible");
        };
        assert_eq!(rule.from, TypeTag::Object);
        assert!(rule.lossless);
        assert!(rule.description.contains("count"));
    }

    #[test]
    fn test_array_covariance() {
        assert_eq!(
            check(
                json!({"type": "array", "items": {"type": "string"}}),
                json!({"type": "array", "items": {"type": "string"}}),
            ),
            Compatibility::Exact
        );
        let result = check(
            json!({"type": "array", "items": {"type": "number"}}),
            json!({"type": "array", "items": {"type": "integer"}}),
        );
        let Compatibility::Coercible(rule) = result else {
            panic!("expected coercible");
        };
        assert_eq!(rule.from, TypeTag::Array);
    }

    #[test]
    fn test_expected_union_best_of() {
        let expected = json!({"oneOf": [{"type": "string"}, {"type": "integer"}]});
        assert_eq!(check(expected.clone(), json!({"type": "integer"})), Compatibility::Exact);
        assert!(matches!(
            check(expected.clone(), json!({"type": "boolean"})),
            Compatibility::Coercible(_)
        ));
        assert!(matches!(
            check(json!({"oneOf": [{"type": "object"}, {"type": "array"}]}), json!({"type": "null"})),
            Compatibility::Incompatible(_)
        ));
    }

    #[test]
    fn test_actual_union_partial_fit_is_ambiguous() {
        let actual = json!({"oneOf": [{"type": "string"}, {"type": "object"}]});
        assert_eq!(
            check(json!({"type": "string"}), actual),
            Compatibility::Ambiguous
        );

        let actual = json!({"oneOf": [{"type": "string"}, {"type": "string"}]});
        assert_eq!(check(json!({"type": "string"}), actual), Compatibility::Exact);

        let actual = json!({"oneOf": [{"type": "object"}, {"type": "array"}]});
        assert!(matches!(
            check(json!({"type": "boolean"}), actual),
            Compatibility::Incompatible(_)
        ));
    }

    #[test]
    fn test_incompatible_reasons_are_specific() {
        let expected = json!({
            "type": "object",
            "properties": {
                "a": {"type": "string"},
                "b": {"type": "boolean"}
            },
            "required": ["a", "b"]
        });
        let actual = json!({
            "type": "object",
            "properties": {"a": {"type": "object"}},
            "required": ["a"]
        });

        let Compatibility::Incompatible(reasons) = check(expected, actual) else {
            panic!("expected incompatible");
        };
        assert_eq!(reasons.len(), 2);
        assert!(reasons.iter().any(|r| r.contains("field 'a'")));
        assert!(reasons.iter().any(|r| r.contains("'b'")));
    }
}
