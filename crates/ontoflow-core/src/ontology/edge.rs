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

/// The kind of a relation between two capabilities.
///
/// `requires`, `precedes`, and `specializes` are directed; `conflicts_with`
/// must be declared symmetrically (both directions present).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EdgeKind {
    Requires,
    SoftRequires,
    Enables,
    Precedes,
    ConflictsWith,
    AlternativeTo,
    Specializes,
}

/// A typed relation between two capability nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_kind_names() {
        assert_eq!(EdgeKind::ConflictsWith.to_string(), "conflicts_with");
        assert_eq!(
            "soft_requires".parse::<EdgeKind>().unwrap(),
            EdgeKind::SoftRequires
        );
    }
}
