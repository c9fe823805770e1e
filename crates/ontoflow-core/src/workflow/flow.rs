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

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ontology::RiskLevel;
use crate::workflow::Step;

/// A workflow file: named workflow definitions in declaration order.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct WorkflowDocument {
    pub workflows: IndexMap<String, WorkflowDefinition>,
}

/// One declarative pipeline over ontology capabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkflowDefinition {
    /// What the workflow accomplishes; free text carried into reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,

    /// Declared overall risk of running this workflow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<RiskLevel>,

    pub steps: Vec<Step>,
}

impl WorkflowDefinition {
    /// Position of the earliest step storing its result under `name`.
    pub fn step_by_store(&self, name: &str) -> Option<usize> {
        self.steps
            .iter()
            .position(|s| s.store_as.as_deref() == Some(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document() {
        let doc: WorkflowDocument = serde_yaml_ng::from_str(
            r#"
workflows:
  triage:
    goal: Inspect and summarize a service incident
    risk: low
    steps:
      - capability: inspect_service
        store_as: scan
      - capability: summarize
        input_bindings:
          findings: "${scan.findings}"
"#,
        )
        .unwrap();

        let flow = &doc.workflows["triage"];
        assert_eq!(flow.steps.len(), 2);
        assert_eq!(flow.risk, Some(RiskLevel::Low));
        assert_eq!(flow.step_by_store("scan"), Some(0));
        assert_eq!(flow.step_by_store("missing"), None);
    }
}
