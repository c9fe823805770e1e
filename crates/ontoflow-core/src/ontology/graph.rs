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

//! Ontology graph construction and invariant checking.
//!
//! [`OntologyGraph::build`] collects every problem it finds rather than
//! stopping at the first, so one run reports the complete set. The built
//! graph is immutable; it is constructed once per process invocation and
//! shared by reference across concurrent workflow validations.

use std::collections::{BTreeSet, HashMap, HashSet};

use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;

use crate::ontology::{CapabilityNode, Edge, EdgeKind, Layer, OntologyDocument};
use crate::schema::{SchemaError, SchemaResolver, SchemaType};

/// One problem found while building an ontology graph.
///
/// `Display` and `Error` are implemented by hand because thiserror treats
/// any field named `source` as the error source, and the `source` fields
/// here are capability ids, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum OntologyError {
    DuplicateId { id: String },

    UnknownLayer { id: String, layer: String },

    DanglingEdge {
        source: String,
        target: String,
        kind: EdgeKind,
        missing: String,
    },

    RequiresCycle { path: Vec<String> },

    AsymmetricConflict { source: String, target: String },

    /// Warning: a node with no incoming or outgoing edges.
    OrphanNode { id: String },

    Schema { id: String, source: SchemaError },
}

impl std::fmt::Display for OntologyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OntologyError::DuplicateId { id } => write!(f, "duplicate capability id '{id}'"),
            OntologyError::UnknownLayer { id, layer } => {
                write!(f, "capability '{id}' declares unknown layer '{layer}'")
            }
            OntologyError::DanglingEdge {
                source,
                target,
                kind,
                missing,
            } => write!(
                f,
                "edge {source} -{kind}-> {target} references unknown capability '{missing}'"
            ),
            OntologyError::RequiresCycle { path } => {
                write!(f, "requires cycle: {}", path.join(" -> "))
            }
            OntologyError::AsymmetricConflict { source, target } => write!(
                f,
                "'{source}' conflicts_with '{target}' but the reciprocal edge is missing"
            ),
            OntologyError::OrphanNode { id } => write!(f, "capability '{id}' has no edges"),
            OntologyError::Schema { id, source } => {
                write!(f, "schema of capability '{id}': {source}")
            }
        }
    }
}

impl std::error::Error for OntologyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OntologyError::Schema { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl OntologyError {
    /// Whether this problem leaves the ontology usable.
    pub fn is_warning(&self) -> bool {
        matches!(self, OntologyError::OrphanNode { .. })
    }
}

/// The collected problems of an unusable ontology.
#[derive(Error, Debug, Clone)]
#[error("ontology has {} problem(s)", problems.len())]
pub struct OntologyBuildError {
    pub problems: Vec<OntologyError>,
}

/// An immutable capability graph for one validation run.
#[derive(Debug, Clone)]
pub struct OntologyGraph {
    nodes: IndexMap<String, CapabilityNode>,
    edges: Vec<Edge>,
    warnings: Vec<OntologyError>,
}

impl OntologyGraph {
    /// Build a graph from a parsed document, resolving all node schemas.
    ///
    /// Fails with the complete list of problems when any non-warning
    /// problem exists; construction still runs to the end so that all
    /// problems are reported together.
    pub fn build(
        doc: &OntologyDocument,
        resolver: &mut SchemaResolver<'_>,
        doc_name: &str,
    ) -> Result<OntologyGraph, OntologyBuildError> {
        let mut problems = Vec::new();
        let mut nodes: IndexMap<String, CapabilityNode> = IndexMap::new();

        // Endpoint existence is checked against every declared id, so a
        // node rejected for an unknown layer does not also produce
        // spurious dangling-edge errors.
        let mut declared: BTreeSet<&str> = BTreeSet::new();

        for def in &doc.capabilities {
            if !declared.insert(def.id.as_str()) {
                problems.push(OntologyError::DuplicateId { id: def.id.clone() });
                continue;
            }

            let layer = match def.layer.parse::<Layer>() {
                Ok(layer) => Some(layer),
                Err(_) => {
                    problems.push(OntologyError::UnknownLayer {
                        id: def.id.clone(),
                        layer: def.layer.clone(),
                    });
                    None
                }
            };

            let input = resolve_schema(def.input.as_ref(), &def.id, resolver, doc_name, &mut problems);
            let output =
                resolve_schema(def.output.as_ref(), &def.id, resolver, doc_name, &mut problems);

            if let Some(layer) = layer {
                nodes.insert(
                    def.id.clone(),
                    CapabilityNode {
                        id: def.id.clone(),
                        layer,
                        risk: def.risk,
                        mutating: def.mutating,
                        checkpoint: def.checkpoint,
                        approval: def.approval,
                        input,
                        output,
                    },
                );
            }
        }

        let mut edges = Vec::with_capacity(doc.edges.len());
        for def in &doc.edges {
            for endpoint in [&def.source, &def.target] {
                if !declared.contains(endpoint.as_str()) {
                    problems.push(OntologyError::DanglingEdge {
                        source: def.source.clone(),
                        target: def.target.clone(),
                        kind: def.kind,
                        missing: endpoint.clone(),
                    });
                }
            }
            edges.push(Edge {
                source: def.source.clone(),
                target: def.target.clone(),
                kind: def.kind,
            });
        }

        check_requires_cycles(&edges, &mut problems);
        check_conflict_symmetry(&edges, &mut problems);

        // Orphan nodes are a warning, not fatal.
        let mut connected: HashSet<&str> = HashSet::new();
        for edge in &edges {
            connected.insert(edge.source.as_str());
            connected.insert(edge.target.as_str());
        }
        for id in nodes.keys() {
            if !connected.contains(id.as_str()) {
                problems.push(OntologyError::OrphanNode { id: id.clone() });
            }
        }

        let (warnings, errors): (Vec<_>, Vec<_>) =
            problems.into_iter().partition(OntologyError::is_warning);
        if !errors.is_empty() {
            let mut problems = errors;
            problems.extend(warnings);
            return Err(OntologyBuildError { problems });
        }

        debug_assert!(
            nodes
                .values()
                .all(|n| n.input.is_fully_resolved() && n.output.is_fully_resolved())
        );

        Ok(OntologyGraph {
            nodes,
            edges,
            warnings,
        })
    }

    pub fn node(&self, id: &str) -> Option<&CapabilityNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &CapabilityNode> + '_ {
        self.nodes.values()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Capability ids that `id` requires, in declaration order.
    pub fn requires(&self, id: &str) -> impl Iterator<Item = &str> + '_ {
        let id = id.to_string();
        self.edges.iter().filter_map(move |e| {
            (e.kind == EdgeKind::Requires && e.source == id).then_some(e.target.as_str())
        })
    }

    /// Non-fatal problems found at build time.
    pub fn warnings(&self) -> &[OntologyError] {
        &self.warnings
    }
}

fn resolve_schema(
    fragment: Option<&Value>,
    id: &str,
    resolver: &mut SchemaResolver<'_>,
    doc_name: &str,
    problems: &mut Vec<OntologyError>,
) -> SchemaType {
    let Some(fragment) = fragment else {
        return SchemaType::any();
    };
    match resolver.resolve(fragment, doc_name) {
        Ok(ty) => ty,
        Err(source) => {
            problems.push(OntologyError::Schema {
                id: id.to_string(),
                source,
            });
            SchemaType::any()
        }
    }
}

/// Depth-first search restricted to `requires` edges; every back edge is
/// reported with the full cycle path.
fn check_requires_cycles(edges: &[Edge], problems: &mut Vec<OntologyError>) {
    let mut adjacency: IndexMap<&str, Vec<&str>> = IndexMap::new();
    for edge in edges {
        if edge.kind == EdgeKind::Requires {
            adjacency
                .entry(edge.source.as_str())
                .or_default()
                .push(edge.target.as_str());
            adjacency.entry(edge.target.as_str()).or_default();
        }
    }

    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        White,
        Gray,
        Black,
    }

    let mut marks: HashMap<&str, Mark> = adjacency.keys().map(|&n| (n, Mark::White)).collect();
    let roots: Vec<&str> = adjacency.keys().copied().collect();

    fn visit<'a>(
        node: &'a str,
        adjacency: &IndexMap<&'a str, Vec<&'a str>>,
        marks: &mut HashMap<&'a str, Mark>,
        stack: &mut Vec<&'a str>,
        problems: &mut Vec<OntologyError>,
    ) {
        marks.insert(node, Mark::Gray);
        stack.push(node);
        for &next in adjacency.get(node).into_iter().flatten() {
            match marks.get(next).copied().unwrap_or(Mark::White) {
                Mark::White => visit(next, adjacency, marks, stack, problems),
                Mark::Gray => {
                    let start = stack.iter().position(|&n| n == next).unwrap_or(0);
                    let mut path: Vec<String> =
                        stack[start..].iter().map(|s| s.to_string()).collect();
                    path.push(next.to_string());
                    problems.push(OntologyError::RequiresCycle { path });
                }
                Mark::Black => {}
            }
        }
        stack.pop();
        marks.insert(node, Mark::Black);
    }

    let mut stack = Vec::new();
    for root in roots {
        if marks.get(root) == Some(&Mark::White) {
            visit(root, &adjacency, &mut marks, &mut stack, problems);
        }
    }
}

fn check_conflict_symmetry(edges: &[Edge], problems: &mut Vec<OntologyError>) {
    let conflicts: HashSet<(&str, &str)> = edges
        .iter()
        .filter(|e| e.kind == EdgeKind::ConflictsWith)
        .map(|e| (e.source.as_str(), e.target.as_str()))
        .collect();

    for edge in edges {
        if edge.kind == EdgeKind::ConflictsWith
            && !conflicts.contains(&(edge.target.as_str(), edge.source.as_str()))
        {
            problems.push(OntologyError::AsymmetricConflict {
                source: edge.source.clone(),
                target: edge.target.clone(),
            });
        }
    }
}
