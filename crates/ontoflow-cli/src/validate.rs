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

use error_stack::ResultExt as _;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ontoflow_analysis::{
    AnalysisError, ValidationContext, ValidationOutcome, ValidationReport, ontology_diagnostics,
};
use ontoflow_core::ontology::{OntologyDocument, OntologyGraph};
use ontoflow_core::schema::{DocumentSet, SchemaResolver, referenced_documents};
use ontoflow_core::workflow::WorkflowDocument;
use ontoflow_typecheck::CoercionRegistry;

use crate::args::load;
use crate::display::{display_diagnostics, display_report};
use crate::{MainError, Result};

/// Validate workflow files against a capability ontology.
///
/// Returns the number of validation failures (errors + fatal diagnostics).
pub async fn validate(
    ontology_path: &Path,
    workflow_paths: &[PathBuf],
    output_path: Option<&Path>,
) -> Result<usize> {
    let mut docs = DocumentSet::new();

    // Load the ontology and everything its schemas refer to. No file is
    // read after this phase; analysis works entirely on the DocumentSet.
    let ontology_raw: Value = load(ontology_path)?;
    let ontology: OntologyDocument = serde_json::from_value(ontology_raw.clone())
        .change_context_lazy(|| MainError::InvalidFile(ontology_path.to_owned()))?;
    let ontology_name = document_name(ontology_path);
    let ontology_base = ontology_path.parent().unwrap_or(Path::new("."));
    let referenced = referenced_documents(&ontology_raw);
    docs.insert(ontology_name.clone(), ontology_raw);
    preload_referenced(&mut docs, ontology_base, referenced);

    let mut workflow_docs = Vec::with_capacity(workflow_paths.len());
    for path in workflow_paths {
        let raw: Value = load(path)?;
        let doc: WorkflowDocument = serde_json::from_value(raw.clone())
            .change_context_lazy(|| MainError::InvalidFile(path.to_owned()))?;
        let name = document_name(path);
        let base = path.parent().unwrap_or(Path::new("."));
        let mut referenced = referenced_documents(&raw);
        referenced.extend(schema_ref_documents(&doc));
        docs.insert(name.clone(), raw);
        preload_referenced(&mut docs, base, referenced);
        workflow_docs.push((name, doc));
    }

    println!(
        "📋 Validating {} workflow file(s) against {}",
        workflow_paths.len(),
        ontology_path.display()
    );

    let graph = {
        let mut resolver = SchemaResolver::new(&docs);
        OntologyGraph::build(&ontology, &mut resolver, &ontology_name)
    };
    let graph = match graph {
        Ok(graph) => graph,
        Err(e) => {
            // An unusable ontology makes every workflow verdict
            // meaningless, so none are analyzed.
            let failures = display_diagnostics(&ontology_diagnostics(&e.problems));
            println!("❌ Ontology is unusable; workflows were not analyzed");
            return Ok(failures.max(1));
        }
    };
    if !graph.warnings().is_empty() {
        display_diagnostics(&ontology_diagnostics(graph.warnings()));
    }

    let registry = CoercionRegistry::for_document(&ontology.coercions);

    // Workflow files are independent of each other, so each file is
    // analyzed on its own task. Results are joined in input order to keep
    // the report deterministic.
    let graph = Arc::new(graph);
    let registry = Arc::new(registry);
    let docs = Arc::new(docs);

    let mut handles = Vec::with_capacity(workflow_docs.len());
    for (doc_name, doc) in workflow_docs {
        let graph = Arc::clone(&graph);
        let registry = Arc::clone(&registry);
        let docs = Arc::clone(&docs);
        handles.push(tokio::spawn(async move {
            let ctx = ValidationContext {
                graph: &graph,
                registry: &registry,
                docs: &docs,
                workflow_doc: &doc_name,
            };
            let mut outcomes = Vec::with_capacity(doc.workflows.len());
            for (name, flow) in &doc.workflows {
                let diagnostics = ontoflow_analysis::validate(name, flow, &ctx)?;
                outcomes.push(ValidationOutcome::new(name.clone(), diagnostics));
            }
            Ok::<_, error_stack::Report<AnalysisError>>(outcomes)
        }));
    }

    let mut outcomes = Vec::new();
    for handle in handles {
        let task = handle
            .await
            .change_context_lazy(|| MainError::internal("validation task panicked"))?;
        outcomes
            .extend(task.change_context_lazy(|| MainError::internal("workflow validation failed"))?);
    }

    let report = ValidationReport::new(outcomes);
    let failures = display_report(&report);

    if failures == 0 {
        println!("\n✅ Validation passed with no errors");
    } else {
        println!("\n❌ Validation completed with {failures} failure(s)");
    }

    if let Some(output_path) = output_path {
        let json = report
            .to_json()
            .change_context(MainError::SerializationError)?;
        std::fs::write(output_path, json)
            .change_context_lazy(|| MainError::WriteOutput(output_path.to_owned()))?;
        println!("📋 Report written to {}", output_path.display());
    }

    Ok(failures)
}

/// Name a file is known under in the [`DocumentSet`], as `$ref` locators
/// and `schema_refs` entries address it.
fn document_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Documents named by `schema_refs` locators across all steps.
fn schema_ref_documents(doc: &WorkflowDocument) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    for flow in doc.workflows.values() {
        for step in &flow.steps {
            for locator in &step.schema_refs {
                if let Some((name, _)) = locator.split_once('#')
                    && !name.is_empty()
                {
                    names.insert(name.to_string());
                }
            }
        }
    }
    names
}

/// Load referenced documents transitively, relative to `base`.
///
/// A referenced document that cannot be loaded is skipped rather than
/// aborting the run; the analysis passes report it as a diagnostic against
/// whatever refers to it.
fn preload_referenced(docs: &mut DocumentSet, base: &Path, names: BTreeSet<String>) {
    for name in names {
        if docs.contains(&name) {
            continue;
        }
        let path = base.join(&name);
        match load::<Value>(&path) {
            Ok(value) => {
                let nested = referenced_documents(&value);
                docs.insert(name, value);
                preload_referenced(docs, base, nested);
            }
            Err(e) => {
                tracing::debug!("could not preload referenced document '{name}': {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const ONTOLOGY: &str = r#"
capabilities:
  - id: inspect_service
    layer: detect
    risk: low
    input:
      type: object
      properties:
        target: {type: string}
    output:
      type: object
      properties:
        count: {type: integer}
  - id: analyze_findings
    layer: analyze
    risk: low
    input:
      type: object
      properties:
        count: {type: integer}
edges:
  - {source: analyze_findings, target: inspect_service, kind: requires}
"#;

    const VALID_WORKFLOW: &str = r#"
workflows:
  triage:
    goal: Inspect a service and analyze the findings
    steps:
      - capability: inspect_service
        store_as: scan
      - capability: analyze_findings
        input_bindings:
          count: "${scan.count}"
"#;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_validate_passes_clean_inputs() {
        let dir = TempDir::new().unwrap();
        let ontology = write(&dir, "ontology.yaml", ONTOLOGY);
        let workflow = write(&dir, "workflow.yaml", VALID_WORKFLOW);

        let failures = validate(&ontology, &[workflow], None).await.unwrap();
        assert_eq!(failures, 0);
    }

    #[tokio::test]
    async fn test_validate_reports_failures() {
        let dir = TempDir::new().unwrap();
        let ontology = write(&dir, "ontology.yaml", ONTOLOGY);
        let workflow = write(
            &dir,
            "workflow.yaml",
            r#"
workflows:
  broken:
    goal: Use a capability the ontology does not declare
    steps:
      - capability: teleport
"#,
        );

        let failures = validate(&ontology, &[workflow], None).await.unwrap();
        assert!(failures > 0);
    }

    #[tokio::test]
    async fn test_validate_writes_report_artifact() {
        let dir = TempDir::new().unwrap();
        let ontology = write(&dir, "ontology.yaml", ONTOLOGY);
        let workflow = write(&dir, "workflow.yaml", VALID_WORKFLOW);
        let output = dir.path().join("report.json");

        let failures = validate(&ontology, &[workflow], Some(&output)).await.unwrap();
        assert_eq!(failures, 0);

        let report: ValidationReport =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.outcomes[0].workflow, "triage");
        assert_eq!(report.rejected(), 0);
    }

    #[tokio::test]
    async fn test_unusable_ontology_skips_workflows() {
        let dir = TempDir::new().unwrap();
        let ontology = write(
            &dir,
            "ontology.yaml",
            r#"
capabilities:
  - id: inspect_service
    layer: detect
    risk: low
edges:
  - {source: inspect_service, target: ghost, kind: requires}
"#,
        );
        let workflow = write(&dir, "workflow.yaml", VALID_WORKFLOW);

        let failures = validate(&ontology, &[workflow], None).await.unwrap();
        assert!(failures > 0);
    }
}
