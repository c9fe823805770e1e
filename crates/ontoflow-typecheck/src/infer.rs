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

//! Type inference for binding paths.

use ontoflow_core::schema::{SchemaType, TypeTag};
use ontoflow_core::workflow::{Accessor, BindingPath};

use crate::environment::StoreEnvironment;
use crate::error::InferError;

/// Infer the type a binding path produces against the given environment.
///
/// Accessors distribute over unions: alternatives where the accessor does
/// not apply are dropped, and the path is invalid only when no alternative
/// survives. Paths through `any` stay `any`. A trailing annotation narrows
/// a union to the alternatives with the annotated tag and must agree with
/// any non-union result.
pub fn infer(path: &BindingPath, env: &StoreEnvironment) -> Result<SchemaType, InferError> {
    let mut current = env
        .get(&path.root)
        .cloned()
        .ok_or_else(|| InferError::unknown_store(&path.root))?;

    for accessor in &path.accessors {
        current = apply(&current, accessor)
            .ok_or_else(|| InferError::invalid_path(path.to_string(), describe(&current, accessor)))?;
    }

    match path.annotation {
        None => Ok(current),
        Some(tag) => annotate(current, tag, path),
    }
}

/// Apply one accessor; `None` means it does not fit the type.
fn apply(ty: &SchemaType, accessor: &Accessor) -> Option<SchemaType> {
    if ty.is_any() {
        return Some(SchemaType::any());
    }
    match (ty, accessor) {
        (SchemaType::Object { fields, .. }, Accessor::Field(name)) => fields.get(name).cloned(),
        (SchemaType::Array(element), Accessor::Index(_)) => Some((**element).clone()),
        (SchemaType::Union(variants), accessor) => {
            let surviving: Vec<SchemaType> = variants
                .iter()
                .filter_map(|variant| apply(variant, accessor))
                .collect();
            match surviving.len() {
                0 => None,
                1 => surviving.into_iter().next(),
                _ => Some(SchemaType::Union(surviving)),
            }
        }
        _ => None,
    }
}

fn describe(ty: &SchemaType, accessor: &Accessor) -> String {
    match accessor {
        Accessor::Field(name) => format!("type {ty} has no field '{name}'"),
        Accessor::Index(n) => format!("type {ty} cannot be indexed with [{n}]"),
    }
}

fn annotate(ty: SchemaType, tag: TypeTag, path: &BindingPath) -> Result<SchemaType, InferError> {
    if ty.is_any() {
        return Ok(ty);
    }
    if let SchemaType::Union(variants) = ty {
        let matching: Vec<SchemaType> = variants
            .iter()
            .filter(|v| v.tag() == tag || v.is_any())
            .cloned()
            .collect();
        return match matching.len() {
            0 => Err(InferError::AnnotationMismatch {
                path: path.to_string(),
                annotation: tag,
                found: SchemaType::Union(variants).to_string(),
            }),
            1 => Ok(matching.into_iter().next().unwrap_or_else(SchemaType::any)),
            _ => Ok(SchemaType::Union(matching)),
        };
    }
    if ty.tag() == tag {
        Ok(ty)
    } else {
        Err(InferError::AnnotationMismatch {
            path: path.to_string(),
            annotation: tag,
            found: ty.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env_with(name: &str, fragment: serde_json::Value) -> StoreEnvironment {
        let mut env = StoreEnvironment::new();
        env.insert(name, SchemaType::parse(&fragment).unwrap());
        env
    }

    fn parse(text: &str) -> BindingPath {
        BindingPath::parse(text).unwrap()
    }

    #[test]
    fn test_field_and_index_walk() {
        let env = env_with(
            "scan",
            json!({
                "type": "object",
                "properties": {
                    "hosts": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {"address": {"type": "string"}},
                            "required": ["address"]
                        }
                    }
                },
                "required": ["hosts"]
            }),
        );

        let ty = infer(&parse("${scan.hosts[0].address}"), &env).unwrap();
        assert_eq!(ty.to_string(), "string");
    }

    #[test]
    fn test_unknown_store() {
        let env = StoreEnvironment::new();
        assert_eq!(
            infer(&parse("${missing}"), &env),
            Err(InferError::unknown_store("missing"))
        );
    }

    #[test]
    fn test_invalid_accessor() {
        let env = env_with("scan", json!({"type": "string"}));
        let err = infer(&parse("${scan.field}"), &env).unwrap_err();
        assert!(matches!(err, InferError::InvalidPath { .. }));

        let env = env_with(
            "scan",
            json!({"type": "object", "properties": {"a": {"type": "string"}}}),
        );
        let err = infer(&parse("${scan.b}"), &env).unwrap_err();
        let InferError::InvalidPath { detail, .. } = err else {
            panic!("expected invalid path");
        };
        assert!(detail.contains("no field 'b'"));
    }

    #[test]
    fn test_any_absorbs_accessors() {
        let env = env_with("blob", json!({}));
        let ty = infer(&parse("${blob.deep[3].path}"), &env).unwrap();
        assert!(ty.is_any());
    }

    #[test]
    fn test_union_distribution() {
        // Only the object alternative supports the field accessor.
        let env = env_with(
            "result",
            json!({
                "oneOf": [
                    {"type": "string"},
                    {
                        "type": "object",
                        "properties": {"code": {"type": "integer"}},
                        "required": ["code"]
                    }
                ]
            }),
        );

        let ty = infer(&parse("${result.code}"), &env).unwrap();
        assert_eq!(ty.to_string(), "integer");

        // No alternative supports indexing.
        let err = infer(&parse("${result[0]}"), &env).unwrap_err();
        assert!(matches!(err, InferError::InvalidPath { .. }));
    }

    #[test]
    fn test_annotation_selects_union_variant() {
        let env = env_with(
            "value",
            json!({"oneOf": [{"type": "string"}, {"type": "integer"}]}),
        );

        let ty = infer(&parse("${value:integer}"), &env).unwrap();
        assert_eq!(ty.to_string(), "integer");

        let err = infer(&parse("${value:boolean}"), &env).unwrap_err();
        assert!(matches!(err, InferError::AnnotationMismatch { .. }));
    }

    #[test]
    fn test_annotation_on_plain_type() {
        let env = env_with("count", json!({"type": "integer"}));
        assert!(infer(&parse("${count:integer}"), &env).is_ok());
        assert!(matches!(
            infer(&parse("${count:string}"), &env),
            Err(InferError::AnnotationMismatch { .. })
        ));
    }
}
