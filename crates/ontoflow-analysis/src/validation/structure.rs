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

use std::collections::HashSet;

use ontoflow_core::ontology::OntologyGraph;
use ontoflow_core::workflow::WorkflowDefinition;

use crate::validation::path::make_path;
use crate::{DiagnosticKind, Diagnostics, diagnostic};

/// Validate basic workflow structure
pub fn validate_structure(
    flow: &WorkflowDefinition,
    graph: &OntologyGraph,
    diagnostics: &mut Diagnostics,
) {
    // Warn if the workflow has no goal
    if flow.goal.as_deref().is_none_or(|g| g.trim().is_empty()) {
        diagnostics.add(
            diagnostic!(DiagnosticKind::MissingGoal, "Workflow has no goal")
                .at(make_path!("goal")),
        );
    }

    let mut seen_stores = HashSet::new();
    for (index, step) in flow.steps.iter().enumerate() {
        if !graph.contains(&step.capability) {
            let capability = &step.capability;
            diagnostics.add(
                diagnostic!(
                    DiagnosticKind::UnknownCapability,
                    "Unknown capability '{capability}'",
                    { capability }
                )
                .at(make_path!("steps", index, "capability")),
            );
        }

        if let Some(name) = &step.store_as
            && !seen_stores.insert(name)
        {
            diagnostics.add(
                diagnostic!(
                    DiagnosticKind::DuplicateStoreAs,
                    "Duplicate store name '{name}'",
                    { name }
                )
                .at(make_path!("steps", index, "store_as")),
            );
        }
    }
}
