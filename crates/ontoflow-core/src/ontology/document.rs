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

//! Serde form of an ontology document.
//!
//! Capability layers stay as raw strings here so that an unknown layer name
//! is collected as an [`OntologyError`](crate::ontology::OntologyError)
//! during graph construction instead of failing the whole parse.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ontology::{EdgeKind, RiskLevel};
use crate::schema::TypeTag;

/// Top-level ontology document.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct OntologyDocument {
    /// Shared schema fragments addressable via `#/types/<name>`.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub types: IndexMap<String, Value>,

    #[serde(default)]
    pub capabilities: Vec<CapabilityDef>,

    #[serde(default)]
    pub edges: Vec<EdgeDef>,

    /// Declared coercion rules, in addition to the built-in set.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coercions: Vec<CoercionDef>,
}

/// One capability as declared in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityDef {
    pub id: String,
    pub layer: String,
    pub risk: RiskLevel,
    #[serde(default)]
    pub mutating: bool,
    #[serde(default)]
    pub checkpoint: bool,
    #[serde(default)]
    pub approval: bool,
    /// Input schema fragment; absent means the universal type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
    /// Output schema fragment; absent means the universal type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
}

/// One edge as declared in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeDef {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
}

/// One declared coercion rule.
///
/// Every declared rule is a deterministic, pure function of its input by
/// contract; the document states whether it loses information and whether
/// its result must be marked as inferred rather than observed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoercionDef {
    pub from: TypeTag,
    pub to: TypeTag,
    pub description: String,
    pub lossless: bool,
    #[serde(default)]
    pub marks_inferred: bool,
}
