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

mod level;
mod message;

pub use level::DiagnosticLevel;
pub use message::{Diagnostic, DiagnosticKind};

/// Collection of diagnostics with utility methods
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    /// All diagnostics found
    pub diagnostics: Vec<Diagnostic>,
    pub num_fatal: u32,
    pub num_error: u32,
    pub num_warning: u32,
}

impl Diagnostics {
    /// Create a new empty diagnostics collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic, updating the per-level counts
    pub fn add(&mut self, diagnostic: Diagnostic) {
        match diagnostic.level {
            DiagnosticLevel::Fatal => self.num_fatal += 1,
            DiagnosticLevel::Error => self.num_error += 1,
            DiagnosticLevel::Warning => self.num_warning += 1,
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, mut other: Diagnostics) {
        self.num_fatal += other.num_fatal;
        self.num_error += other.num_error;
        self.num_warning += other.num_warning;
        self.diagnostics.append(&mut other.diagnostics);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.diagnostics.iter()
    }

    /// Check if there are any fatal diagnostics
    pub fn has_fatal(&self) -> bool {
        self.num_fatal > 0
    }

    /// Whether any diagnostic blocks acceptance
    pub fn has_blocking(&self) -> bool {
        self.num_fatal > 0 || self.num_error > 0
    }

    /// Get all diagnostics at a specific level
    pub fn at_level(&self, level: DiagnosticLevel) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.diagnostics.iter().filter(move |d| d.level == level)
    }

    /// Check if diagnostics are empty
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Get total count of diagnostics
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic;

    #[test]
    fn test_diagnostics_counts() {
        let mut diagnostics = Diagnostics::new();
        let name = "scan";
        diagnostics.add(diagnostic!(
            DiagnosticKind::DuplicateStoreAs,
            "Duplicate store name '{name}'",
            { name }
        ));
        diagnostics.add(diagnostic!(DiagnosticKind::MissingGoal, "Workflow has no goal"));

        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.has_fatal());
        assert!(diagnostics.has_blocking());
        assert_eq!(diagnostics.num_fatal, 1);
        assert_eq!(diagnostics.num_error, 0);
        assert_eq!(diagnostics.num_warning, 1);
    }

    #[test]
    fn test_warnings_do_not_block() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.add(diagnostic!(DiagnosticKind::MissingGoal, "Workflow has no goal"));
        assert!(!diagnostics.has_blocking());
    }

    #[test]
    fn test_extend_merges_counts() {
        let mut a = Diagnostics::new();
        let capability = "x";
        a.add(diagnostic!(
            DiagnosticKind::UnknownCapability,
            "Unknown capability '{capability}'",
            { capability }
        ));

        let mut b = Diagnostics::new();
        b.add(diagnostic!(DiagnosticKind::MissingGoal, "Workflow has no goal"));

        a.extend(b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.num_error, 1);
        assert_eq!(a.num_warning, 1);
    }
}
