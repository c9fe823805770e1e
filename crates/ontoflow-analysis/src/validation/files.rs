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

use ontoflow_core::schema::SchemaResolver;
use ontoflow_core::workflow::WorkflowDefinition;

use crate::validation::ValidationContext;
use crate::validation::path::make_path;
use crate::{DiagnosticKind, Diagnostics, diagnostic};

/// Check that every `schema_refs` locator resolves against the preloaded
/// document set.
pub fn validate_files(
    flow: &WorkflowDefinition,
    ctx: &ValidationContext<'_>,
    diagnostics: &mut Diagnostics,
) {
    let mut resolver = SchemaResolver::new(ctx.docs);
    for (index, step) in flow.steps.iter().enumerate() {
        for (ref_index, locator) in step.schema_refs.iter().enumerate() {
            if let Err(err) = resolver.resolve_location(locator, ctx.workflow_doc) {
                let detail = err.to_string();
                diagnostics.add(
                    diagnostic!(
                        DiagnosticKind::MissingFile,
                        "Schema reference '{locator}' cannot be resolved: {detail}",
                        { locator, detail }
                    )
                    .at(make_path!("steps", index, "schema_refs", ref_index)),
                );
            }
        }
    }
}
