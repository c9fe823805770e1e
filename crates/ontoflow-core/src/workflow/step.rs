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

/// One step of a workflow: a capability invocation with its bindings and
/// failure handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Step {
    /// Capability id this step invokes.
    pub capability: String,

    /// Free-text statement of why this step exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,

    /// Name the result is stored under for later steps to bind against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_as: Option<String>,

    /// Parameter name to binding expression, in declaration order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub input_bindings: IndexMap<String, String>,

    /// Steps sharing a group label run concurrently.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel_group: Option<String>,

    /// How a parallel group's results are combined; only meaningful on
    /// steps that carry a `parallel_group`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join: Option<JoinPolicy>,

    /// Conditions checked before the step runs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gates: Vec<Gate>,

    /// Declared reactions to step failure.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failure_modes: Vec<FailureMode>,

    /// Extra schema documents this step's bindings may reference.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schema_refs: Vec<String>,
}

/// How the results of a parallel group are combined.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum JoinPolicy {
    All,
    Any,
    First,
}

/// A pre-execution check on a step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Gate {
    /// Boolean condition; may embed `${...}` binding expressions.
    pub condition: String,
    pub action: GateAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// What happens when a gate condition fails.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GateAction {
    Stop,
    Rollback,
    Skip,
}

/// A declared reaction to a step failure class.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FailureMode {
    /// Failure class this reaction applies to (free-form, e.g. "timeout").
    pub on: String,
    pub action: RecoveryAction,
    /// Earlier step to jump back to, by its `store_as` name. Only valid
    /// with the `goto` action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goto_step: Option<String>,
    /// Retry bound; required when the action is `goto`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
}

/// What to do when a failure mode matches.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecoveryAction {
    Abort,
    Continue,
    Goto,
    Rollback,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_step() {
        let step: Step = serde_yaml_ng::from_str(
            r#"
capability: inspect_service
store_as: scan
input_bindings:
  target: "${args.host}"
parallel_group: fanout
join: all
gates:
  - condition: "${scan.count} > 0"
    action: stop
    message: nothing to inspect
failure_modes:
  - on: timeout
    action: goto
    goto_step: scan
    max_retries: 3
"#,
        )
        .unwrap();

        assert_eq!(step.capability, "inspect_service");
        assert_eq!(step.join, Some(JoinPolicy::All));
        assert_eq!(step.gates[0].action, GateAction::Stop);
        assert_eq!(step.failure_modes[0].action, RecoveryAction::Goto);
        assert_eq!(step.failure_modes[0].max_retries, Some(3));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<Step, _> =
            serde_yaml_ng::from_str("capability: x\nstore_sa: typo\n");
        assert!(result.is_err());
    }
}
