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

use ontoflow_core::ontology::OntologyGraph;
use ontoflow_core::workflow::{Step, WorkflowDefinition};

use crate::validation::path::make_path;
use crate::{DiagnosticKind, Diagnostics, diagnostic};

/// Check that every `requires` edge of each step's capability is satisfied
/// by a strictly earlier step.
///
/// Members of the same parallel group run concurrently, so they cannot
/// satisfy each other's requirements even though one precedes the other in
/// document order. Each unsatisfied requirement gets its own diagnostic.
pub fn validate_prerequisites(
    flow: &WorkflowDefinition,
    graph: &OntologyGraph,
    diagnostics: &mut Diagnostics,
) {
    for (index, step) in flow.steps.iter().enumerate() {
        if !graph.contains(&step.capability) {
            // Already reported by the structure pass.
            continue;
        }
        for required in graph.requires(&step.capability) {
            let satisfied = flow.steps[..index]
                .iter()
                .any(|earlier| earlier.capability == required && !concurrent(earlier, step));
            if !satisfied {
                let capability = &step.capability;
                diagnostics.add(
                    diagnostic!(
                        DiagnosticKind::MissingPrerequisite,
                        "Capability '{capability}' requires '{required}', which no earlier step provides",
                        { capability, required }
                    )
                    .at(make_path!("steps", index, "capability")),
                );
            }
        }
    }
}

fn concurrent(a: &Step, b: &Step) -> bool {
    matches!(
        (&a.parallel_group, &b.parallel_group),
        (Some(x), Some(y)) if x == y
    )
}
