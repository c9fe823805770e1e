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

use serde::{Deserialize, Serialize};

use crate::schema::SchemaType;

/// The nine fixed capability layers, ordered from observation to reporting.
///
/// A capability definition declares its layer as a string; unknown layer
/// names are collected as ontology errors rather than failing the parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Layer {
    Observe,
    Detect,
    Analyze,
    Diagnose,
    Plan,
    Execute,
    Verify,
    Mitigate,
    Report,
}

/// Declared risk of a capability or workflow.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// A typed operation contract in the ontology.
///
/// Both schemas are fully resolved before the node is considered valid.
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilityNode {
    pub id: String,
    pub layer: Layer,
    pub risk: RiskLevel,
    /// Whether invoking this capability mutates external state.
    pub mutating: bool,
    /// Whether a checkpoint must exist before this capability runs.
    pub checkpoint: bool,
    /// Whether a human approval is required before this capability runs.
    pub approval: bool,
    pub input: SchemaType,
    pub output: SchemaType,
}

impl CapabilityNode {
    /// Look up the declared type of one input parameter.
    ///
    /// Returns the universal type when the input schema is not an object
    /// (nothing narrower can be claimed about individual parameters).
    pub fn parameter_type(&self, name: &str) -> SchemaType {
        match &self.input {
            SchemaType::Object { fields, .. } => fields
                .get(name)
                .cloned()
                .unwrap_or_else(SchemaType::any),
            _ => SchemaType::any(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::PrimitiveKind;

    #[test]
    fn test_layer_parse() {
        assert_eq!("detect".parse::<Layer>().unwrap(), Layer::Detect);
        assert!("banana".parse::<Layer>().is_err());
    }

    #[test]
    fn test_risk_ordering() {
        assert!(RiskLevel::Low < RiskLevel::High);
    }

    #[test]
    fn test_parameter_type() {
        let mut fields = indexmap::IndexMap::new();
        fields.insert(
            "target".to_string(),
            SchemaType::Primitive(PrimitiveKind::String),
        );
        let node = CapabilityNode {
            id: "inspect".to_string(),
            layer: Layer::Detect,
            risk: RiskLevel::Low,
            mutating: false,
            checkpoint: false,
            approval: false,
            input: SchemaType::Object {
                fields,
                required: Default::default(),
            },
            output: SchemaType::any(),
        };

        assert_eq!(
            node.parameter_type("target"),
            SchemaType::Primitive(PrimitiveKind::String)
        );
        assert!(node.parameter_type("unknown").is_any());
    }
}
