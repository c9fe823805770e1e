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

use std::path::PathBuf;

use crate::{args::LogLevel, error::Result, validate};

/// Ontoflow command line application.
///
/// Validates declarative workflows against a capability ontology without
/// executing anything.
#[derive(clap::Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Set the log level for Ontoflow.
    #[arg(
        long = "log-level",
        value_name = "LEVEL",
        default_value = "info",
        global = true
    )]
    pub log_level: LogLevel,

    /// Set the log level for other parts of Ontoflow.
    #[arg(
        long = "other-log-level",
        value_name = "LEVEL",
        default_value = "warn",
        global = true
    )]
    pub other_log_level: LogLevel,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "FILE", value_hint = clap::ValueHint::FilePath, global = true)]
    pub log_file: Option<PathBuf>,

    /// Omit stack traces (line numbers of errors).
    #[arg(long = "omit-stack-trace", global = true)]
    pub omit_stack_trace: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Validate workflow files against a capability ontology.
    ///
    /// Validate workflow files against an ontology without executing them. This performs
    /// ontology validation (duplicate ids, dangling edges, requirement cycles, schema
    /// references), workflow structure validation (capabilities, prerequisites, store
    /// names), binding type checking, and gate/recovery validation.
    /// Returns 0 for success, 1+ for validation failures (suitable for CI/CD pipelines).
    ///
    /// # Examples
    ///
    /// ```bash
    ///
    /// # Validate a single workflow file
    ///
    /// ontoflow validate --ontology=ontology.yaml workflow.yaml
    ///
    /// # Validate several workflow files in one run
    ///
    /// ontoflow validate --ontology=ontology.yaml triage.yaml repair.yaml
    ///
    /// # Write the machine-readable report next to the console output
    ///
    /// ontoflow validate --ontology=ontology.yaml workflow.yaml --output=report.json
    ///
    /// ```
    Validate {
        /// Path to the ontology file.
        #[arg(
            long = "ontology",
            value_name = "FILE",
            value_hint = clap::ValueHint::FilePath
        )]
        ontology_path: PathBuf,

        /// Paths to the workflow files to validate.
        #[arg(value_name = "WORKFLOW", value_hint = clap::ValueHint::FilePath, required = true)]
        workflow_paths: Vec<PathBuf>,

        /// Path to write the validation report as JSON.
        #[arg(
            long = "output",
            short = 'o',
            value_name = "FILE",
            value_hint = clap::ValueHint::FilePath
        )]
        output_path: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        tracing::debug!(
            "Executing CLI command: {}",
            match &self.command {
                Command::Validate { .. } => "validate",
            }
        );
        match self.command {
            Command::Validate {
                ontology_path,
                workflow_paths,
                output_path,
            } => {
                let failures =
                    validate::validate(&ontology_path, &workflow_paths, output_path.as_deref())
                        .await?;
                if failures > 0 {
                    std::process::exit(1);
                }
            }
        };

        Ok(())
    }
}
