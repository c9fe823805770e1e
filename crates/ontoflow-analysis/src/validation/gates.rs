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

//! Gate condition and failure recovery checks.
//!
//! Gates run before their step, so their conditions may only reference
//! results stored by strictly earlier steps. Recovery `goto` targets must
//! likewise point backwards and carry a retry bound, otherwise the
//! declared recovery could loop forever.

use std::collections::HashSet;

use ontoflow_core::workflow::{BindingPath, RecoveryAction, WorkflowDefinition};

use crate::validation::path::make_path;
use crate::{DiagnosticKind, Diagnostics, diagnostic};

pub fn validate_gates(flow: &WorkflowDefinition, diagnostics: &mut Diagnostics) {
    for (index, step) in flow.steps.iter().enumerate() {
        let visible: HashSet<&str> = flow.steps[..index]
            .iter()
            .filter_map(|s| s.store_as.as_deref())
            .collect();

        for (gate_index, gate) in step.gates.iter().enumerate() {
            for (offset, parsed) in BindingPath::scan(&gate.condition) {
                match parsed {
                    Err(err) => {
                        let detail = &err.message;
                        diagnostics.add(
                            diagnostic!(
                                DiagnosticKind::InvalidGate,
                                "Gate condition has a malformed binding at offset {offset}: {detail}",
                                { offset, detail }
                            )
                            .at(make_path!("steps", index, "gates", gate_index, "condition")),
                        );
                    }
                    Ok(binding) if !visible.contains(binding.root.as_str()) => {
                        let root = &binding.root;
                        diagnostics.add(
                            diagnostic!(
                                DiagnosticKind::InvalidGate,
                                "Gate condition references '{root}', which no earlier step stores",
                                { root }
                            )
                            .at(make_path!("steps", index, "gates", gate_index, "condition")),
                        );
                    }
                    Ok(_) => {}
                }
            }
        }

        for (mode_index, mode) in step.failure_modes.iter().enumerate() {
            let location = make_path!("steps", index, "failure_modes", mode_index);

            if mode.action != RecoveryAction::Goto {
                if mode.goto_step.is_some() {
                    diagnostics.add(
                        diagnostic!(
                            DiagnosticKind::InvalidRecoveryLoop,
                            "goto_step is only valid with the 'goto' action"
                        )
                        .at(location),
                    );
                }
                continue;
            }

            match &mode.goto_step {
                None => {
                    diagnostics.add(
                        diagnostic!(
                            DiagnosticKind::InvalidRecoveryLoop,
                            "'goto' recovery names no goto_step"
                        )
                        .at(location.clone()),
                    );
                }
                Some(target) => {
                    let backwards = matches!(flow.step_by_store(target), Some(j) if j < index);
                    if !backwards {
                        diagnostics.add(
                            diagnostic!(
                                DiagnosticKind::InvalidRecoveryLoop,
                                "goto_step '{target}' is not the stored result of an earlier step",
                                { target }
                            )
                            .at(location.clone()),
                        );
                    }
                }
            }

            if !matches!(mode.max_retries, Some(n) if n >= 1) {
                diagnostics.add(
                    diagnostic!(
                        DiagnosticKind::InvalidRecoveryLoop,
                        "'goto' recovery requires max_retries of at least 1"
                    )
                    .at(location),
                );
            }
        }
    }
}
