#![allow(clippy::print_stdout)]
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

use ontoflow_analysis::{Diagnostic, DiagnosticLevel, Diagnostics, ValidationReport, Verdict};

/// Print one verdict line per workflow followed by its diagnostics.
///
/// Returns the number of blocking diagnostics (fatal + error) across all
/// workflows in the report.
pub fn display_report(report: &ValidationReport) -> usize {
    let mut failures = 0;
    for outcome in &report.outcomes {
        match outcome.verdict {
            Verdict::Accept if outcome.diagnostics.is_empty() => {
                println!("✅ Workflow '{}' is valid", outcome.workflow);
            }
            Verdict::Accept => {
                println!("⚠️  Workflow '{}' accepted with warnings", outcome.workflow);
            }
            Verdict::Reject => {
                println!("❌ Workflow '{}' rejected", outcome.workflow);
            }
        }
        failures += display_diagnostics(&outcome.diagnostics);
    }
    failures
}

/// Print every diagnostic in the collection, grouped by level.
///
/// Returns the number of blocking diagnostics (fatal + error).
pub fn display_diagnostics(diagnostics: &Diagnostics) -> usize {
    if diagnostics.is_empty() {
        return 0;
    }

    println!(
        "📊 Validation results: {} fatal, {} errors, {} warnings",
        diagnostics.num_fatal, diagnostics.num_error, diagnostics.num_warning
    );

    let fatal: Vec<_> = diagnostics.at_level(DiagnosticLevel::Fatal).collect();
    if !fatal.is_empty() {
        println!("\n🚨 Fatal Issues:");
        for diagnostic in fatal {
            print_diagnostic("FATAL", diagnostic);
        }
    }

    let errors: Vec<_> = diagnostics.at_level(DiagnosticLevel::Error).collect();
    if !errors.is_empty() {
        println!("\n❌ Errors:");
        for diagnostic in errors {
            print_diagnostic("ERROR", diagnostic);
        }
    }

    let warnings: Vec<_> = diagnostics.at_level(DiagnosticLevel::Warning).collect();
    if !warnings.is_empty() {
        println!("\n⚠️  Warnings:");
        for diagnostic in warnings {
            print_diagnostic("WARN", diagnostic);
        }
    }

    (diagnostics.num_fatal + diagnostics.num_error) as usize
}

/// Print a formatted diagnostic message
fn print_diagnostic(level: &str, diagnostic: &Diagnostic) {
    let path_str = if diagnostic.path.is_empty() {
        String::new()
    } else {
        format!(" ({})", diagnostic.path)
    };

    println!(
        "  {} [{}] {}{}",
        level, diagnostic.code, diagnostic.formatted, path_str
    );
    if let Some(rule) = &diagnostic.suggestion {
        println!("      suggestion: {}", rule.description);
    }
}
