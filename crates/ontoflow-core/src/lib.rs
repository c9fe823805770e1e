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

//! Core data model for ontoflow.
//!
//! This crate defines the three document families the validator works with:
//!
//! - [`schema`]: structural types (`SchemaType`) and the resolver that turns
//!   schema fragments with `$ref` locators into fully resolved types.
//! - [`ontology`]: capability nodes, typed edges, and the immutable
//!   [`ontology::OntologyGraph`] built once per run.
//! - [`workflow`]: declarative workflow definitions and the `${...}` binding
//!   expression parser.

pub mod ontology;
pub mod schema;
pub mod workflow;
