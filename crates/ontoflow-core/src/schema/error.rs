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

/// Errors produced while parsing or resolving schema fragments.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// A `$ref` names a document or pointer that does not exist.
    #[error("unresolved reference '{locator}': {detail}")]
    UnresolvedRef { locator: String, detail: String },

    /// A `$ref` chain loops back onto itself.
    #[error("circular reference through '{locator}'")]
    CircularRef { locator: String },

    /// The fragment is not a recognizable schema shape.
    #[error("malformed schema: {detail}")]
    MalformedSchema { detail: String },
}

impl SchemaError {
    pub fn unresolved(locator: impl Into<String>, detail: impl Into<String>) -> Self {
        SchemaError::UnresolvedRef {
            locator: locator.into(),
            detail: detail.into(),
        }
    }

    pub fn circular(locator: impl Into<String>) -> Self {
        SchemaError::CircularRef {
            locator: locator.into(),
        }
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        SchemaError::MalformedSchema {
            detail: detail.into(),
        }
    }
}
