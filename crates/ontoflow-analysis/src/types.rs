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

use error_stack::ResultExt as _;
use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostics;
use crate::error::{AnalysisError, Result};

/// Whether a workflow may be executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Verdict {
    Accept,
    Reject,
}

impl Verdict {
    /// Reject iff any diagnostic blocks acceptance; warnings never do.
    pub fn from_diagnostics(diagnostics: &Diagnostics) -> Self {
        if diagnostics.has_blocking() {
            Verdict::Reject
        } else {
            Verdict::Accept
        }
    }
}

/// The validation result for one workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    /// Workflow name as declared in its document.
    pub workflow: String,
    pub verdict: Verdict,
    pub diagnostics: Diagnostics,
}

impl ValidationOutcome {
    pub fn new(workflow: impl Into<String>, diagnostics: Diagnostics) -> Self {
        Self {
            workflow: workflow.into(),
            verdict: Verdict::from_diagnostics(&diagnostics),
            diagnostics,
        }
    }
}

/// The machine-readable artifact of one validation run, covering every
/// workflow in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub outcomes: Vec<ValidationOutcome>,
}

impl ValidationReport {
    pub fn new(outcomes: Vec<ValidationOutcome>) -> Self {
        Self { outcomes }
    }

    /// Number of rejected workflows.
    pub fn rejected(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.verdict == Verdict::Reject)
            .count()
    }

    /// Pretty-printed JSON for the `--output` artifact. Field order is
    /// fixed by the struct definitions, so reruns on unchanged inputs are
    /// byte-identical.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).change_context(AnalysisError::Serialize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DiagnosticKind, diagnostic};

    #[test]
    fn test_verdict_from_diagnostics() {
        let mut diagnostics = Diagnostics::new();
        assert_eq!(Verdict::from_diagnostics(&diagnostics), Verdict::Accept);

        diagnostics.add(diagnostic!(DiagnosticKind::MissingGoal, "Workflow has no goal"));
        assert_eq!(Verdict::from_diagnostics(&diagnostics), Verdict::Accept);

        let capability = "x";
        diagnostics.add(diagnostic!(
            DiagnosticKind::UnknownCapability,
            "Unknown capability '{capability}'",
            { capability }
        ));
        assert_eq!(Verdict::from_diagnostics(&diagnostics), Verdict::Reject);
    }

    #[test]
    fn test_report_serialization_is_stable() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.add(diagnostic!(DiagnosticKind::MissingGoal, "Workflow has no goal"));
        let report = ValidationReport::new(vec![
            ValidationOutcome::new("triage", diagnostics),
            ValidationOutcome::new("repair", Diagnostics::new()),
        ]);

        assert_eq!(report.rejected(), 0);
        let first = report.to_json().unwrap();
        let second = report.to_json().unwrap();
        assert_eq!(first, second);

        let parsed: ValidationReport = serde_json::from_str(&first).unwrap();
        assert_eq!(parsed.outcomes.len(), 2);
        assert_eq!(parsed.outcomes[0].workflow, "triage");
        assert_eq!(parsed.outcomes[1].verdict, Verdict::Accept);
    }
}
