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

//! Diagnostic messages with error codes.
//!
//! ## Error Code Scheme
//!
//! Codes are assigned by severity and category:
//!
//! - **1xxx**: Warnings
//!   - 10xx: Workflow structure warnings
//!
//! - **2xxx**: Errors
//!   - 20xx: Workflow structure errors
//!   - 21xx: Binding and type errors
//!
//! - **3xxx**: Fatal (prevents further analysis)
//!   - 30xx: Workflow structure fatal
//!   - 31xx: Ontology fatal
//!   - 32xx: Schema resolution fatal

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use ontoflow_typecheck::CoercionRule;

use crate::{DiagnosticLevel, Path};

/// Diagnostic error codes.
///
/// Codes are organized by severity (thousands digit) and category (hundreds digit).
/// See module documentation for the full scheme.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum DiagnosticKind {
    // ==========================================================================
    // Warnings - Workflow structure (10xx)
    // ==========================================================================
    /// Capability has no edges in the ontology
    OrphanCapability = 1000,
    /// Workflow has no goal
    MissingGoal = 1001,

    // ==========================================================================
    // Errors - Workflow structure (20xx)
    // ==========================================================================
    /// Step invokes a capability the ontology does not declare
    UnknownCapability = 2000,
    /// A required capability is not satisfied by an earlier step
    MissingPrerequisite = 2001,
    /// Step references a schema that cannot be resolved
    MissingFile = 2002,
    /// Gate condition references a result that is not yet stored
    InvalidGate = 2003,
    /// Recovery target is missing, later than the step, or unbounded
    InvalidRecoveryLoop = 2004,

    // ==========================================================================
    // Errors - Bindings and types (21xx)
    // ==========================================================================
    /// Binding expression is malformed or walks a nonexistent path
    BadBindingPath = 2100,
    /// Binding type fits only some alternatives; needs an annotation
    AmbiguousType = 2101,
    /// Binding type does not match the declared parameter type
    TypeMismatch = 2102,

    // ==========================================================================
    // Fatal - Workflow structure (30xx)
    // ==========================================================================
    /// Two steps store their results under the same name
    DuplicateStoreAs = 3000,

    // ==========================================================================
    // Fatal - Ontology (31xx)
    // ==========================================================================
    /// Two capabilities share an id
    DuplicateCapabilityId = 3100,
    /// Capability declares a layer outside the fixed vocabulary
    UnknownLayer = 3101,
    /// Edge endpoint is not a declared capability
    DanglingEdge = 3102,
    /// The requires subgraph has a cycle
    RequiresCycle = 3103,
    /// conflicts_with declared in one direction only
    AsymmetricConflict = 3104,

    // ==========================================================================
    // Fatal - Schema resolution (32xx)
    // ==========================================================================
    /// $ref points at a document or pointer that does not exist
    UnresolvedSchemaRef = 3200,
    /// $ref chain refers back to itself
    CircularSchemaRef = 3201,
    /// Schema fragment is not a recognizable shape
    MalformedSchema = 3202,
}

impl DiagnosticKind {
    /// Get the numeric error code
    #[inline]
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Get the kind name in camelCase
    #[inline]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Get the severity level based on code range
    #[inline]
    pub fn level(self) -> DiagnosticLevel {
        match self.code() {
            3000..=3999 => DiagnosticLevel::Fatal,
            2000..=2999 => DiagnosticLevel::Error,
            _ => DiagnosticLevel::Warning,
        }
    }
}

/// A diagnostic with error code, message, path, and metadata.
///
/// Created via the `diagnostic!` macro with optional builder methods:
///
/// ```ignore
/// diagnostic!(DiagnosticKind::DuplicateStoreAs, "Duplicate store name '{name}'", { name })
///     .at(path)
/// ```
///
/// ## JSON Format
///
/// ```json
/// {
///   "kind": "typeMismatch",
///   "code": 2102,
///   "level": "error",
///   "formatted": "Binding 'target' has type integer, expected string",
///   "data": { "param": "target" },
///   "path": "$.steps[0].input_bindings.target",
///   "suggestion": { "from": "integer", "to": "string", ... }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// The diagnostic kind name (camelCase)
    pub kind: Cow<'static, str>,
    /// Numeric error code
    pub code: u16,
    /// The severity level
    pub level: DiagnosticLevel,
    /// Human-readable formatted message
    pub formatted: String,
    /// Structured data (null if no data)
    #[serde(skip_serializing_if = "is_null_or_empty")]
    #[serde(default = "serde_json::Value::default")]
    pub data: serde_json::Value,
    /// JSON path to the field with the issue
    #[serde(skip_serializing_if = "Path::is_empty", default)]
    pub path: Path,
    /// Suggested coercion that would repair the mismatch
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub suggestion: Option<CoercionRule>,
}

fn is_null_or_empty(value: &serde_json::Value) -> bool {
    value.is_null() || value.as_object().is_some_and(|o| o.is_empty())
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(kind: DiagnosticKind, formatted: String, data: serde_json::Value) -> Self {
        Self {
            kind: Cow::Borrowed(kind.name()),
            code: kind.code(),
            level: kind.level(),
            formatted,
            data,
            path: Path::new(),
            suggestion: None,
        }
    }

    /// Set the path for this diagnostic (builder pattern)
    #[must_use]
    pub fn at(mut self, path: Path) -> Self {
        self.path = path;
        self
    }

    /// Attach a suggested coercion (builder pattern)
    #[must_use]
    pub fn suggest(mut self, rule: CoercionRule) -> Self {
        self.suggestion = Some(rule);
        self
    }
}

/// Create a diagnostic from a kind, format string, and arguments.
///
/// # Examples
///
/// ```ignore
/// // With arguments
/// let name = "scan";
/// let diag = diagnostic!(
///     DiagnosticKind::DuplicateStoreAs,
///     "Duplicate store name '{name}'",
///     { name }
/// );
///
/// // Without arguments
/// let diag = diagnostic!(DiagnosticKind::MissingGoal, "Workflow has no goal");
///
/// // With path
/// let diag = diagnostic!(
///     DiagnosticKind::UnknownCapability,
///     "Unknown capability '{capability}'",
///     { capability }
/// ).at(make_path!("steps", 0, "capability"));
/// ```
#[macro_export]
macro_rules! diagnostic {
    // With arguments - creates formatted message and JSON data
    ($kind:expr, $fmt:literal, { $($arg:ident),* $(,)? } $(,)?) => {{
        $crate::Diagnostic::new(
            $kind,
            format!($fmt),
            serde_json::json!({ $(stringify!($arg): $arg),* }),
        )
    }};
    // Without arguments (with optional trailing comma)
    ($kind:expr, $fmt:literal $(,)?) => {{
        $crate::Diagnostic::new(
            $kind,
            $fmt.to_string(),
            serde_json::Value::Null,
        )
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontoflow_core::schema::TypeTag;

    #[test]
    fn test_diagnostic_kind_codes() {
        assert_eq!(DiagnosticKind::DuplicateStoreAs.code(), 3000);
        assert_eq!(
            DiagnosticKind::DuplicateStoreAs.level(),
            DiagnosticLevel::Fatal
        );

        assert_eq!(DiagnosticKind::UnknownCapability.code(), 2000);
        assert_eq!(
            DiagnosticKind::UnknownCapability.level(),
            DiagnosticLevel::Error
        );
        assert_eq!(DiagnosticKind::TypeMismatch.code(), 2102);
        assert_eq!(DiagnosticKind::RequiresCycle.code(), 3103);

        assert_eq!(DiagnosticKind::OrphanCapability.code(), 1000);
        assert_eq!(
            DiagnosticKind::OrphanCapability.level(),
            DiagnosticLevel::Warning
        );
    }

    #[test]
    fn test_diagnostic_kind_names() {
        assert_eq!(DiagnosticKind::DuplicateStoreAs.name(), "duplicateStoreAs");
        assert_eq!(DiagnosticKind::BadBindingPath.name(), "badBindingPath");
        assert_eq!(DiagnosticKind::TypeMismatch.name(), "typeMismatch");
    }

    #[test]
    fn test_diagnostic_macro_with_args() {
        let name = "scan";
        let diag = diagnostic!(
            DiagnosticKind::DuplicateStoreAs,
            "Duplicate store name '{name}'",
            { name }
        );

        assert_eq!(diag.kind, "duplicateStoreAs");
        assert_eq!(diag.code, 3000);
        assert_eq!(diag.level, DiagnosticLevel::Fatal);
        assert_eq!(diag.formatted, "Duplicate store name 'scan'");
        assert_eq!(diag.data.get("name").unwrap(), "scan");
        assert!(diag.path.is_empty());
        assert!(diag.suggestion.is_none());
    }

    #[test]
    fn test_diagnostic_serialization_with_suggestion() {
        use crate::make_path;

        let param = "count";
        let diag = diagnostic!(
            DiagnosticKind::TypeMismatch,
            "Binding '{param}' has type integer, expected number",
            { param }
        )
        .at(make_path!("steps", 1, "input_bindings", "count"))
        .suggest(CoercionRule {
            from: TypeTag::Integer,
            to: TypeTag::Number,
            description: "widen integer to number".to_string(),
            lossless: true,
            marks_inferred: false,
        });

        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json.get("kind").unwrap(), "typeMismatch");
        assert_eq!(json.get("code").unwrap(), 2102);
        assert_eq!(json.get("level").unwrap(), "error");
        assert_eq!(
            json.get("path").unwrap(),
            "$.steps[1].input_bindings.count"
        );
        assert_eq!(
            json.get("suggestion").unwrap().get("from").unwrap(),
            "integer"
        );
    }

    #[test]
    fn test_diagnostic_roundtrip() {
        use crate::make_path;

        let capability = "inspect_service";
        let original = diagnostic!(
            DiagnosticKind::UnknownCapability,
            "Unknown capability '{capability}'",
            { capability }
        )
        .at(make_path!("steps", 0, "capability"));

        let serialized = serde_json::to_string(&original).unwrap();
        let deserialized: Diagnostic = serde_json::from_str(&serialized).unwrap();
        assert_eq!(original, deserialized);
    }
}
