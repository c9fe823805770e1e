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

//! Schema resolution across document boundaries.
//!
//! A `$ref` locator takes one of two forms:
//!
//! - `#/path/in/document` — a location within the current document
//! - `other.yaml#/path/in/document` — a location within another document
//!
//! All documents are loaded up front into a [`DocumentSet`]; resolution
//! itself performs no I/O. Resolved types are cached by canonical location
//! (`document#/pointer`), so resolving the same location twice returns the
//! identical value. A resolution stack detects reference cycles.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::schema::{SchemaError, SchemaType};

/// An immutable set of named, pre-parsed documents.
#[derive(Debug, Clone, Default)]
pub struct DocumentSet {
    docs: BTreeMap<String, Value>,
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document under the name `$ref` locators use to address it.
    pub fn insert(&mut self, name: impl Into<String>, doc: Value) {
        self.docs.insert(name.into(), doc);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.docs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.docs.contains_key(name)
    }
}

/// Collect the names of other documents a fragment refers to.
///
/// Used by the loader to preload cross-document references transitively
/// before any analysis starts.
pub fn referenced_documents(fragment: &Value) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    collect_document_refs(fragment, &mut names);
    names
}

fn collect_document_refs(value: &Value, names: &mut BTreeSet<String>) {
    match value {
        Value::Object(fields) => {
            if let Some(locator) = fields.get("$ref").and_then(Value::as_str)
                && let Some((doc, _)) = locator.split_once('#')
                && !doc.is_empty()
            {
                names.insert(doc.to_string());
            }
            for v in fields.values() {
                collect_document_refs(v, names);
            }
        }
        Value::Array(items) => {
            for v in items {
                collect_document_refs(v, names);
            }
        }
        _ => {}
    }
}

/// Resolves schema fragments into fully resolved [`SchemaType`] values.
pub struct SchemaResolver<'d> {
    docs: &'d DocumentSet,
    cache: BTreeMap<String, SchemaType>,
    stack: Vec<String>,
}

impl<'d> SchemaResolver<'d> {
    pub fn new(docs: &'d DocumentSet) -> Self {
        SchemaResolver {
            docs,
            cache: BTreeMap::new(),
            stack: Vec::new(),
        }
    }

    /// Resolve a schema fragment appearing in document `doc`.
    ///
    /// The result contains no [`SchemaType::Unresolved`] node.
    pub fn resolve(&mut self, fragment: &Value, doc: &str) -> Result<SchemaType, SchemaError> {
        let parsed = SchemaType::parse(fragment)?;
        self.resolve_type(parsed, doc)
    }

    /// Resolve a bare locator (as used by workflow file references).
    pub fn resolve_location(&mut self, locator: &str, doc: &str) -> Result<SchemaType, SchemaError> {
        self.resolve_type(SchemaType::Unresolved(locator.to_string()), doc)
    }

    fn resolve_type(&mut self, ty: SchemaType, doc: &str) -> Result<SchemaType, SchemaError> {
        match ty {
            SchemaType::Primitive(_) => Ok(ty),
            SchemaType::Object { fields, required } => {
                let fields = fields
                    .into_iter()
                    .map(|(name, field)| Ok((name, self.resolve_type(field, doc)?)))
                    .collect::<Result<_, SchemaError>>()?;
                Ok(SchemaType::Object { fields, required })
            }
            SchemaType::Array(element) => Ok(SchemaType::Array(Box::new(
                self.resolve_type(*element, doc)?,
            ))),
            SchemaType::Union(variants) => {
                let variants = variants
                    .into_iter()
                    .map(|v| self.resolve_type(v, doc))
                    .collect::<Result<_, _>>()?;
                Ok(SchemaType::Union(variants))
            }
            SchemaType::Unresolved(locator) => self.resolve_ref(&locator, doc),
        }
    }

    fn resolve_ref(&mut self, locator: &str, doc: &str) -> Result<SchemaType, SchemaError> {
        let (doc_name, pointer) = canonical_parts(locator, doc)?;
        let canonical = format!("{doc_name}#{pointer}");

        if let Some(resolved) = self.cache.get(&canonical) {
            return Ok(resolved.clone());
        }
        if self.stack.contains(&canonical) {
            return Err(SchemaError::circular(canonical));
        }

        let document = self
            .docs
            .get(&doc_name)
            .ok_or_else(|| SchemaError::unresolved(locator, format!("unknown document '{doc_name}'")))?;
        let target = document.pointer(&pointer).ok_or_else(|| {
            SchemaError::unresolved(locator, format!("no such path in '{doc_name}'"))
        })?;

        self.stack.push(canonical.clone());
        let parsed = SchemaType::parse(target);
        let resolved = parsed.and_then(|ty| self.resolve_type(ty, &doc_name));
        self.stack.pop();

        let resolved = resolved?;
        self.cache.insert(canonical, resolved.clone());
        Ok(resolved)
    }
}

/// Split a locator into its (document, JSON pointer) parts, defaulting the
/// document to the one the reference appears in.
fn canonical_parts(locator: &str, doc: &str) -> Result<(String, String), SchemaError> {
    let Some((doc_part, pointer)) = locator.split_once('#') else {
        return Err(SchemaError::unresolved(
            locator,
            "locator must contain '#' separating document and path",
        ));
    };
    if !pointer.is_empty() && !pointer.starts_with('/') {
        return Err(SchemaError::unresolved(
            locator,
            "path part must start with '/'",
        ));
    }
    let doc_name = if doc_part.is_empty() { doc } else { doc_part };
    Ok((doc_name.to_string(), pointer.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn docs() -> DocumentSet {
        let mut docs = DocumentSet::new();
        docs.insert(
            "ontology.yaml",
            json!({
                "types": {
                    "finding": {
                        "type": "object",
                        "properties": {
                            "summary": {"type": "string"},
                            "evidence": {"$ref": "common.yaml#/types/evidence"}
                        },
                        "required": ["summary"]
                    },
                    "loop_a": {"$ref": "#/types/loop_b"},
                    "loop_b": {"$ref": "#/types/loop_a"}
                }
            }),
        );
        docs.insert(
            "common.yaml",
            json!({
                "types": {
                    "evidence": {"type": "array", "items": {"type": "string"}}
                }
            }),
        );
        docs
    }

    #[test]
    fn test_resolve_same_document_ref() {
        let docs = docs();
        let mut resolver = SchemaResolver::new(&docs);
        let ty = resolver
            .resolve(&json!({"$ref": "#/types/finding"}), "ontology.yaml")
            .unwrap();
        assert!(ty.is_fully_resolved());
        assert_eq!(
            ty.to_string(),
            "{ summary: string, evidence?: array<string> }"
        );
    }

    #[test]
    fn test_resolve_cross_document_ref() {
        let docs = docs();
        let mut resolver = SchemaResolver::new(&docs);
        let ty = resolver
            .resolve(&json!({"$ref": "common.yaml#/types/evidence"}), "ontology.yaml")
            .unwrap();
        assert_eq!(ty.to_string(), "array<string>");
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let docs = docs();
        let mut resolver = SchemaResolver::new(&docs);
        let fragment = json!({"$ref": "#/types/finding"});
        let first = resolver.resolve(&fragment, "ontology.yaml").unwrap();
        let second = resolver.resolve(&fragment, "ontology.yaml").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_circular_ref() {
        let docs = docs();
        let mut resolver = SchemaResolver::new(&docs);
        let err = resolver
            .resolve(&json!({"$ref": "#/types/loop_a"}), "ontology.yaml")
            .unwrap_err();
        assert!(matches!(err, SchemaError::CircularRef { .. }));
    }

    #[test]
    fn test_unresolved_refs() {
        let docs = docs();
        let mut resolver = SchemaResolver::new(&docs);

        let err = resolver
            .resolve(&json!({"$ref": "#/types/nonexistent"}), "ontology.yaml")
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnresolvedRef { .. }));

        let err = resolver
            .resolve(&json!({"$ref": "missing.yaml#/types/x"}), "ontology.yaml")
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnresolvedRef { .. }));
    }

    #[test]
    fn test_referenced_documents() {
        let fragment = json!({
            "type": "object",
            "properties": {
                "a": {"$ref": "common.yaml#/types/evidence"},
                "b": {"$ref": "#/types/local"},
                "c": [{"$ref": "extra.yaml#/x"}]
            }
        });
        let names = referenced_documents(&fragment);
        assert_eq!(
            names.into_iter().collect::<Vec<_>>(),
            vec!["common.yaml".to_string(), "extra.yaml".to_string()]
        );
    }
}
