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

//! Structural type representation.
//!
//! Schema fragments from ontology documents are parsed into an explicit,
//! exhaustively-matched [`SchemaType`] so that unknown or malformed shapes
//! are a checked case rather than a silent pass-through.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde_json::Value;

use crate::schema::SchemaError;

/// Kinds of primitive (non-composite) types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum PrimitiveKind {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    /// The universal type. Matches any value; checking against `any` always
    /// succeeds in either direction.
    Any,
}

/// The tag of a [`SchemaType`], without its structure.
///
/// Tags key the coercion registry and form the vocabulary of explicit type
/// annotations in binding expressions. The declaration order is significant:
/// the two-hop coercion search tries intermediate tags in this order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
    strum::VariantArray,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TypeTag {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Object,
    Array,
    Union,
    Any,
}

/// A resolved structural type.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaType {
    /// A primitive type.
    Primitive(PrimitiveKind),

    /// An object with named fields, a subset of which are required.
    Object {
        fields: IndexMap<String, SchemaType>,
        required: BTreeSet<String>,
    },

    /// A homogeneous array.
    Array(Box<SchemaType>),

    /// One of several alternatives, in declaration order.
    Union(Vec<SchemaType>),

    /// A `$ref` that has not been resolved yet, carrying its locator.
    ///
    /// Only appears between parsing and resolution. After
    /// [`SchemaResolver::resolve`](crate::schema::SchemaResolver::resolve)
    /// succeeds, no `Unresolved` node remains reachable.
    Unresolved(String),
}

impl SchemaType {
    /// The universal type.
    pub fn any() -> Self {
        SchemaType::Primitive(PrimitiveKind::Any)
    }

    /// Check if this is the universal type.
    pub fn is_any(&self) -> bool {
        matches!(self, SchemaType::Primitive(PrimitiveKind::Any))
    }

    /// Get the tag of this type.
    pub fn tag(&self) -> TypeTag {
        match self {
            SchemaType::Primitive(PrimitiveKind::Null) => TypeTag::Null,
            SchemaType::Primitive(PrimitiveKind::Boolean) => TypeTag::Boolean,
            SchemaType::Primitive(PrimitiveKind::Integer) => TypeTag::Integer,
            SchemaType::Primitive(PrimitiveKind::Number) => TypeTag::Number,
            SchemaType::Primitive(PrimitiveKind::String) => TypeTag::String,
            SchemaType::Primitive(PrimitiveKind::Any) => TypeTag::Any,
            SchemaType::Object { .. } => TypeTag::Object,
            SchemaType::Array(_) => TypeTag::Array,
            SchemaType::Union(_) => TypeTag::Union,
            SchemaType::Unresolved(_) => TypeTag::Any,
        }
    }

    /// Check that no [`SchemaType::Unresolved`] node is reachable.
    pub fn is_fully_resolved(&self) -> bool {
        match self {
            SchemaType::Primitive(_) => true,
            SchemaType::Object { fields, .. } => {
                fields.values().all(SchemaType::is_fully_resolved)
            }
            SchemaType::Array(element) => element.is_fully_resolved(),
            SchemaType::Union(variants) => variants.iter().all(SchemaType::is_fully_resolved),
            SchemaType::Unresolved(_) => false,
        }
    }

    /// Parse a schema fragment without resolving references.
    ///
    /// `$ref` nodes become [`SchemaType::Unresolved`] carrying the raw
    /// locator. Unrecognizable fragments fail with
    /// [`SchemaError::MalformedSchema`].
    pub fn parse(fragment: &Value) -> Result<SchemaType, SchemaError> {
        if let Some(locator) = fragment.get("$ref") {
            let locator = locator
                .as_str()
                .ok_or_else(|| SchemaError::malformed("$ref locator must be a string"))?;
            return Ok(SchemaType::Unresolved(locator.to_string()));
        }

        if let Some(variants) = fragment.get("oneOf").or_else(|| fragment.get("anyOf")) {
            let variants = variants
                .as_array()
                .ok_or_else(|| SchemaError::malformed("union variants must be an array"))?;
            if variants.is_empty() {
                return Err(SchemaError::malformed("union must have at least one variant"));
            }
            let variants = variants
                .iter()
                .map(SchemaType::parse)
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(SchemaType::Union(variants));
        }

        let Some(obj) = fragment.as_object() else {
            return Err(SchemaError::malformed(format!(
                "expected a schema object, got {fragment}"
            )));
        };

        // The empty schema {} is the universal type.
        if obj.is_empty() {
            return Ok(SchemaType::any());
        }

        let Some(ty) = obj.get("type").and_then(Value::as_str) else {
            return Err(SchemaError::malformed(
                "schema object has no 'type', '$ref', 'oneOf', or 'anyOf'",
            ));
        };

        match ty {
            "object" => {
                let mut fields = IndexMap::new();
                if let Some(props) = obj.get("properties") {
                    let props = props
                        .as_object()
                        .ok_or_else(|| SchemaError::malformed("'properties' must be an object"))?;
                    for (name, prop) in props {
                        fields.insert(name.clone(), SchemaType::parse(prop)?);
                    }
                }
                let mut required = BTreeSet::new();
                if let Some(names) = obj.get("required") {
                    let names = names
                        .as_array()
                        .ok_or_else(|| SchemaError::malformed("'required' must be an array"))?;
                    for name in names {
                        let name = name.as_str().ok_or_else(|| {
                            SchemaError::malformed("'required' entries must be strings")
                        })?;
                        required.insert(name.to_string());
                    }
                }
                Ok(SchemaType::Object { fields, required })
            }
            "array" => {
                let element = match obj.get("items") {
                    Some(items) => SchemaType::parse(items)?,
                    None => SchemaType::any(),
                };
                Ok(SchemaType::Array(Box::new(element)))
            }
            other => {
                let kind = other
                    .parse::<PrimitiveKind>()
                    .map_err(|_| SchemaError::malformed(format!("unknown type '{other}'")))?;
                Ok(SchemaType::Primitive(kind))
            }
        }
    }
}

impl std::fmt::Display for SchemaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaType::Primitive(kind) => write!(f, "{kind}"),
            SchemaType::Object { fields, required } => {
                if fields.is_empty() {
                    return write!(f, "object");
                }
                write!(f, "{{ ")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    let marker = if required.contains(name) { "" } else { "?" };
                    write!(f, "{name}{marker}: {ty}")?;
                }
                write!(f, " }}")
            }
            SchemaType::Array(element) => write!(f, "array<{element}>"),
            SchemaType::Union(variants) => {
                for (i, variant) in variants.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{variant}")?;
                }
                Ok(())
            }
            SchemaType::Unresolved(locator) => write!(f, "ref({locator})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_primitives() {
        for (name, kind) in [
            ("string", PrimitiveKind::String),
            ("integer", PrimitiveKind::Integer),
            ("number", PrimitiveKind::Number),
            ("boolean", PrimitiveKind::Boolean),
            ("null", PrimitiveKind::Null),
            ("any", PrimitiveKind::Any),
        ] {
            let ty = SchemaType::parse(&json!({"type": name})).unwrap();
            assert_eq!(ty, SchemaType::Primitive(kind));
        }
    }

    #[test]
    fn test_parse_empty_schema_is_any() {
        let ty = SchemaType::parse(&json!({})).unwrap();
        assert!(ty.is_any());
    }

    #[test]
    fn test_parse_object() {
        let ty = SchemaType::parse(&json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "age": {"type": "integer"}
            },
            "required": ["name"]
        }))
        .unwrap();

        let SchemaType::Object { fields, required } = &ty else {
            panic!("expected object, got {ty}");
        };
        assert_eq!(fields.len(), 2);
        assert!(required.contains("name"));
        assert!(!required.contains("age"));
    }

    #[test]
    fn test_parse_array_and_union() {
        let ty = SchemaType::parse(&json!({"type": "array", "items": {"type": "string"}})).unwrap();
        assert_eq!(ty.tag(), TypeTag::Array);

        let ty = SchemaType::parse(&json!({
            "oneOf": [{"type": "string"}, {"type": "number"}]
        }))
        .unwrap();
        assert_eq!(ty.tag(), TypeTag::Union);
    }

    #[test]
    fn test_parse_ref_is_unresolved() {
        let ty = SchemaType::parse(&json!({"$ref": "#/types/finding"})).unwrap();
        assert_eq!(ty, SchemaType::Unresolved("#/types/finding".to_string()));
        assert!(!ty.is_fully_resolved());
    }

    #[test]
    fn test_parse_malformed() {
        assert!(SchemaType::parse(&json!("string")).is_err());
        assert!(SchemaType::parse(&json!({"type": "frobnicate"})).is_err());
        assert!(SchemaType::parse(&json!({"oneOf": []})).is_err());
    }

    #[test]
    fn test_display() {
        let ty = SchemaType::parse(&json!({
            "type": "object",
            "properties": {
                "findings": {"type": "array", "items": {"type": "string"}},
                "count": {"type": "integer"}
            },
            "required": ["findings"]
        }))
        .unwrap();
        assert_eq!(
            ty.to_string(),
            "{ findings: array<string>, count?: integer }"
        );
    }

    #[test]
    fn test_tag_roundtrip() {
        assert_eq!("object".parse::<TypeTag>().unwrap(), TypeTag::Object);
        assert_eq!(TypeTag::Array.to_string(), "array");
    }
}
