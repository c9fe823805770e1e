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

//! Binding parsing, inference, and type checking.
//!
//! Steps are walked in order and the store table grows only after a step
//! has been fully processed, so a binding can never reference its own
//! step's result or a later one. A step whose capability is unknown still
//! has its bindings parsed and checked (its store entry defaults to the
//! universal type), so one bad capability id does not hide binding errors.

use ontoflow_core::schema::SchemaType;
use ontoflow_core::workflow::{BindingPath, WorkflowDefinition};
use ontoflow_typecheck::{Compatibility, InferError, StoreEnvironment, compatible, infer};

use crate::validation::ValidationContext;
use crate::validation::path::make_path;
use crate::{DiagnosticKind, Diagnostics, diagnostic};

pub fn validate_bindings(
    flow: &WorkflowDefinition,
    ctx: &ValidationContext<'_>,
    diagnostics: &mut Diagnostics,
) {
    let mut env = StoreEnvironment::new();

    for (index, step) in flow.steps.iter().enumerate() {
        let node = ctx.graph.node(&step.capability);

        for (param, expr) in &step.input_bindings {
            let location = make_path!("steps", index, "input_bindings", param.clone());

            let binding = match BindingPath::parse(expr) {
                Ok(binding) => binding,
                Err(err) => {
                    let offset = err.offset;
                    let message = &err.message;
                    diagnostics.add(
                        diagnostic!(
                            DiagnosticKind::BadBindingPath,
                            "Binding '{param}': {message} at offset {offset}",
                            { param, message, offset }
                        )
                        .at(location),
                    );
                    continue;
                }
            };

            let actual = match infer(&binding, &env) {
                Ok(actual) => actual,
                Err(err) => {
                    let mut detail = err.to_string();
                    if matches!(err, InferError::UnknownStore { .. }) {
                        let known: Vec<&str> = env.names().collect();
                        if !known.is_empty() {
                            detail = format!("{detail} (in scope: {})", known.join(", "));
                        }
                    }
                    diagnostics.add(
                        diagnostic!(
                            DiagnosticKind::BadBindingPath,
                            "Binding '{param}': {detail}",
                            { param, detail }
                        )
                        .at(location),
                    );
                    continue;
                }
            };

            let expected = node
                .map(|n| n.parameter_type(param))
                .unwrap_or_else(SchemaType::any);

            match compatible(&expected, &actual, ctx.registry) {
                Compatibility::Exact => {}
                Compatibility::Coercible(rule) => {
                    let expected = expected.to_string();
                    let actual = actual.to_string();
                    diagnostics.add(
                        diagnostic!(
                            DiagnosticKind::TypeMismatch,
                            "Binding '{param}' has type {actual}, expected {expected}",
                            { param, actual, expected }
                        )
                        .at(location)
                        .suggest(rule),
                    );
                }
                Compatibility::Ambiguous => {
                    let actual = actual.to_string();
                    diagnostics.add(
                        diagnostic!(
                            DiagnosticKind::AmbiguousType,
                            "Binding '{param}' of type {actual} fits only some alternatives; add a ':tag' annotation",
                            { param, actual }
                        )
                        .at(location),
                    );
                }
                Compatibility::Incompatible(reasons) => {
                    let suggestion = ctx.registry.suggest(actual.tag(), expected.tag());
                    let expected = expected.to_string();
                    let actual = actual.to_string();
                    let mut diagnostic = diagnostic!(
                        DiagnosticKind::TypeMismatch,
                        "Binding '{param}' has type {actual}, expected {expected}",
                        { param, actual, expected, reasons }
                    )
                    .at(location);
                    if let Some(rule) = suggestion {
                        diagnostic = diagnostic.suggest(rule);
                    }
                    diagnostics.add(diagnostic);
                }
            }
        }

        // The result becomes visible only after the whole step is checked.
        if let Some(store) = &step.store_as {
            env.insert(
                store,
                node.map(|n| n.output.clone()).unwrap_or_else(SchemaType::any),
            );
        }
    }
}
