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

//! Coercion rules and the suggestion registry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::VariantArray;

use ontoflow_core::ontology::CoercionDef;
use ontoflow_core::schema::TypeTag;

/// A known conversion from one type tag to another.
///
/// Rules are descriptive: the validator suggests them in diagnostics, it
/// never applies them. Every rule is a deterministic function of its input
/// by contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoercionRule {
    pub from: TypeTag,
    pub to: TypeTag,
    pub description: String,
    /// Whether the conversion preserves all information.
    pub lossless: bool,
    /// Whether the result must carry inference confidence rather than
    /// observation confidence.
    #[serde(default)]
    pub marks_inferred: bool,
}

impl CoercionRule {
    /// Chain two rules into one suggested conversion.
    ///
    /// The composite is lossless only when both parts are, and marks its
    /// result inferred when either part does.
    pub fn compose(first: &CoercionRule, second: &CoercionRule) -> CoercionRule {
        CoercionRule {
            from: first.from,
            to: second.to,
            description: format!("{}, then {}", first.description, second.description),
            lossless: first.lossless && second.lossless,
            marks_inferred: first.marks_inferred || second.marks_inferred,
        }
    }
}

impl From<&CoercionDef> for CoercionRule {
    fn from(def: &CoercionDef) -> Self {
        CoercionRule {
            from: def.from,
            to: def.to,
            description: def.description.clone(),
            lossless: def.lossless,
            marks_inferred: def.marks_inferred,
        }
    }
}

/// Lookup table of coercion rules keyed by `(from, to)`.
#[derive(Debug, Clone, Default)]
pub struct CoercionRegistry {
    rules: BTreeMap<(TypeTag, TypeTag), CoercionRule>,
}

impl CoercionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in rule set: the safe widening and formatting conversions
    /// every ontology gets for free.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for (from, to, description) in [
            (TypeTag::Integer, TypeTag::Number, "widen integer to number"),
            (TypeTag::Integer, TypeTag::String, "format integer as decimal string"),
            (TypeTag::Number, TypeTag::String, "format number as decimal string"),
            (TypeTag::Boolean, TypeTag::String, "format boolean as \"true\"/\"false\""),
        ] {
            registry.register(CoercionRule {
                from,
                to,
                description: description.to_string(),
                lossless: true,
                marks_inferred: false,
            });
        }
        registry
    }

    /// Build the registry for one ontology: built-ins plus its declared
    /// rules. A declared rule replaces a built-in with the same key.
    pub fn for_document(declared: &[CoercionDef]) -> Self {
        let mut registry = Self::builtin();
        for def in declared {
            registry.register(def.into());
        }
        registry
    }

    pub fn register(&mut self, rule: CoercionRule) {
        self.rules.insert((rule.from, rule.to), rule);
    }

    /// Direct rule lookup, no composition.
    pub fn direct(&self, from: TypeTag, to: TypeTag) -> Option<&CoercionRule> {
        self.rules.get(&(from, to))
    }

    /// Suggest a conversion from `from` to `to`.
    ///
    /// A direct rule wins; otherwise one two-hop chain is searched, trying
    /// intermediate tags in [`TypeTag`] declaration order and taking the
    /// first match. Longer chains are never considered, so every suggestion
    /// stays explainable.
    pub fn suggest(&self, from: TypeTag, to: TypeTag) -> Option<CoercionRule> {
        if let Some(rule) = self.direct(from, to) {
            return Some(rule.clone());
        }
        for &mid in TypeTag::VARIANTS {
            if mid == from || mid == to {
                continue;
            }
            if let Some(first) = self.direct(from, mid)
                && let Some(second) = self.direct(mid, to)
            {
                return Some(CoercionRule::compose(first, second));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_direct() {
        let registry = CoercionRegistry::builtin();
        let rule = registry.suggest(TypeTag::Integer, TypeTag::Number).unwrap();
        assert!(rule.lossless);
        assert!(!rule.marks_inferred);
    }

    #[test]
    fn test_no_rule() {
        let registry = CoercionRegistry::builtin();
        assert!(registry.suggest(TypeTag::String, TypeTag::Boolean).is_none());
        assert!(registry.suggest(TypeTag::Object, TypeTag::Array).is_none());
    }

    #[test]
    fn test_two_hop_composition() {
        let mut registry = CoercionRegistry::new();
        registry.register(CoercionRule {
            from: TypeTag::Boolean,
            to: TypeTag::Integer,
            description: "0 or 1".to_string(),
            lossless: true,
            marks_inferred: false,
        });
        registry.register(CoercionRule {
            from: TypeTag::Integer,
            to: TypeTag::Number,
            description: "widen".to_string(),
            lossless: true,
            marks_inferred: true,
        });

        let rule = registry.suggest(TypeTag::Boolean, TypeTag::Number).unwrap();
        assert_eq!(rule.from, TypeTag::Boolean);
        assert_eq!(rule.to, TypeTag::Number);
        assert_eq!(rule.description, "0 or 1, then widen");
        assert!(rule.lossless);
        assert!(rule.marks_inferred);
    }

    #[test]
    fn test_direct_beats_two_hop() {
        let mut registry = CoercionRegistry::builtin();
        registry.register(CoercionRule {
            from: TypeTag::Integer,
            to: TypeTag::String,
            description: "direct".to_string(),
            lossless: false,
            marks_inferred: false,
        });
        // integer -> number -> string would also exist via composition.
        let rule = registry.suggest(TypeTag::Integer, TypeTag::String).unwrap();
        assert_eq!(rule.description, "direct");
    }

    #[test]
    fn test_declared_overrides_builtin() {
        let declared = vec![CoercionDef {
            from: TypeTag::Integer,
            to: TypeTag::Number,
            description: "custom widen".to_string(),
            lossless: false,
            marks_inferred: true,
        }];
        let registry = CoercionRegistry::for_document(&declared);
        let rule = registry.direct(TypeTag::Integer, TypeTag::Number).unwrap();
        assert_eq!(rule.description, "custom widen");
        assert!(!rule.lossless);
    }
}
