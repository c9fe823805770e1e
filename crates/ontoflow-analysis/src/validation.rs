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

use ontoflow_core::ontology::{OntologyError, OntologyGraph};
use ontoflow_core::schema::{DocumentSet, SchemaError};
use ontoflow_core::workflow::WorkflowDefinition;
use ontoflow_typecheck::CoercionRegistry;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::{Result, diagnostic};

mod bindings;
mod files;
mod gates;
mod path;
mod prerequisites;
mod structure;
pub use path::Path;
pub(crate) use path::{PathPart, make_path};


/// Everything a validation pass may consult. All of it is immutable and
/// shared across concurrently validated workflows.
pub struct ValidationContext<'a> {
    pub graph: &'a OntologyGraph,
    pub registry: &'a CoercionRegistry,
    /// Preloaded schema documents; no I/O happens during validation.
    pub docs: &'a DocumentSet,
    /// Name the workflow document is known under in `docs`, used to anchor
    /// same-document schema references.
    pub workflow_doc: &'a str,
}

/// Validate one workflow and collect all diagnostics.
///
/// Passes run in a fixed order and never abort early: a workflow with a
/// fatal diagnostic still has its remaining steps checked, so one run
/// reports everything it can.
pub fn validate(
    name: &str,
    flow: &WorkflowDefinition,
    ctx: &ValidationContext<'_>,
) -> Result<Diagnostics> {
    tracing::debug!(workflow = name, steps = flow.steps.len(), "validating workflow");

    let mut diagnostics = Diagnostics::new();
    structure::validate_structure(flow, ctx.graph, &mut diagnostics);
    prerequisites::validate_prerequisites(flow, ctx.graph, &mut diagnostics);
    files::validate_files(flow, ctx, &mut diagnostics);
    bindings::validate_bindings(flow, ctx, &mut diagnostics);
    gates::validate_gates(flow, &mut diagnostics);
    Ok(diagnostics)
}

/// Render ontology build problems as diagnostics for reporting.
pub fn ontology_diagnostics(problems: &[OntologyError]) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();
    for problem in problems {
        diagnostics.add(match problem {
            OntologyError::DuplicateId { id } => diagnostic!(
                DiagnosticKind::DuplicateCapabilityId,
                "Duplicate capability id '{id}'",
                { id }
            ),
            OntologyError::UnknownLayer { id, layer } => diagnostic!(
                DiagnosticKind::UnknownLayer,
                "Capability '{id}' declares unknown layer '{layer}'",
                { id, layer }
            ),
            OntologyError::DanglingEdge {
                source,
                target,
                kind,
                missing,
            } => {
                let kind = kind.to_string();
                diagnostic!(
                    DiagnosticKind::DanglingEdge,
                    "Edge {source} -{kind}-> {target} references unknown capability '{missing}'",
                    { source, target, kind, missing }
                )
            }
            OntologyError::RequiresCycle { path } => {
                let cycle = path.join(" -> ");
                diagnostic!(
                    DiagnosticKind::RequiresCycle,
                    "Capability requirements form a cycle: {cycle}",
                    { cycle }
                )
            }
            OntologyError::AsymmetricConflict { source, target } => diagnostic!(
                DiagnosticKind::AsymmetricConflict,
                "'{source}' conflicts_with '{target}' but the reciprocal edge is missing",
                { source, target }
            ),
            OntologyError::OrphanNode { id } => diagnostic!(
                DiagnosticKind::OrphanCapability,
                "Capability '{id}' has no edges",
                { id }
            ),
            OntologyError::Schema { id, source } => schema_diagnostic(id, source),
        });
    }
    diagnostics
}

fn schema_diagnostic(id: &str, error: &SchemaError) -> crate::Diagnostic {
    match error {
        SchemaError::UnresolvedRef { locator, detail } => diagnostic!(
            DiagnosticKind::UnresolvedSchemaRef,
            "Capability '{id}': cannot resolve '{locator}': {detail}",
            { id, locator, detail }
        ),
        SchemaError::CircularRef { locator } => diagnostic!(
            DiagnosticKind::CircularSchemaRef,
            "Capability '{id}': reference cycle through '{locator}'",
            { id, locator }
        ),
        SchemaError::MalformedSchema { detail } => diagnostic!(
            DiagnosticKind::MalformedSchema,
            "Capability '{id}': malformed schema: {detail}",
            { id, detail }
        ),
    }
}
