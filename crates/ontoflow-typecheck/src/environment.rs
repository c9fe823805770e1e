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

use ontoflow_core::schema::SchemaType;

/// The `store_as` name to output type table built up while walking a
/// workflow's steps in order.
///
/// Entries are added only after a step has been fully checked, so a binding
/// can never see its own step's result or a later one. Names stay in
/// insertion order for deterministic reporting.
#[derive(Debug, Clone, Default)]
pub struct StoreEnvironment {
    entries: IndexMap<String, SchemaType>,
}

impl StoreEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, ty: SchemaType) {
        self.entries.insert(name.into(), ty);
    }

    pub fn get(&self, name: &str) -> Option<&SchemaType> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Known names, in the order they became visible.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let mut env = StoreEnvironment::new();
        env.insert("zeta", SchemaType::any());
        env.insert("alpha", SchemaType::any());
        assert_eq!(env.names().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
        assert!(env.contains("alpha"));
        assert!(!env.contains("omega"));
    }
}
