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

use thiserror::Error;

use ontoflow_core::schema::TypeTag;

/// Why a binding path could not be given a type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferError {
    /// The root name is not in the store environment.
    #[error("unknown store '{name}'")]
    UnknownStore { name: String },

    /// An accessor does not apply to the type reached so far.
    #[error("invalid path '{path}': {detail}")]
    InvalidPath { path: String, detail: String },

    /// The explicit annotation contradicts the inferred type.
    #[error("annotation ':{annotation}' does not match inferred type {found} in '{path}'")]
    AnnotationMismatch {
        path: String,
        annotation: TypeTag,
        found: String,
    },
}

impl InferError {
    pub fn unknown_store(name: impl Into<String>) -> Self {
        InferError::UnknownStore { name: name.into() }
    }

    pub fn invalid_path(path: impl Into<String>, detail: impl Into<String>) -> Self {
        InferError::InvalidPath {
            path: path.into(),
            detail: detail.into(),
        }
    }
}
