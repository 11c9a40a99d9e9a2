//! Reference diagram model.
//!
//! The session subsystem treats a diagram as an opaque payload: all it needs is
//! [`Graph::to_json`] and [`Graph::from_json`]. This model covers vertices,
//! edges and their attributes so that payloads can be produced, validated and
//! compared in tests and from the command line.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Vertex identifier, unique within one graph
pub type VertexId = u32;

/// Diagram engine errors
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Invalid graph encoding: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Edge refers to unknown vertex {0}")]
    UnknownVertex(VertexId),
    #[error("Duplicate vertex id {0}")]
    DuplicateVertex(VertexId),
    #[error("Vertex {id} has a non-finite {field}")]
    NonFinite { id: VertexId, field: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VertexKind {
    Boundary,
    Z,
    X,
    HBox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    #[default]
    Simple,
    Hadamard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub id: VertexId,
    pub kind: VertexKind,
    /// Phase as a multiple of pi
    #[serde(default)]
    pub phase: f64,
    pub row: f64,
    pub qubit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: VertexId,
    pub target: VertexId,
    #[serde(default)]
    pub kind: EdgeKind,
}

/// A diagram: vertices, edges and the boundary ordering
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Graph {
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub inputs: Vec<VertexId>,
    #[serde(default)]
    pub outputs: Vec<VertexId>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex and return its id.
    ///
    /// Non-finite coordinates are accepted here and rejected by [`Graph::to_json`].
    pub fn add_vertex(&mut self, kind: VertexKind, qubit: f64, row: f64) -> VertexId {
        let id = self.next_vertex_id();
        self.vertices.push(Vertex {
            id,
            kind,
            phase: 0.0,
            row,
            qubit,
        });
        id
    }

    /// One past the largest id, or the lowest free id once that would overflow
    fn next_vertex_id(&self) -> VertexId {
        match self.vertices.iter().map(|v| v.id).max() {
            None => 0,
            Some(max) => max
                .checked_add(1)
                .unwrap_or_else(|| self.lowest_unused_id()),
        }
    }

    fn lowest_unused_id(&self) -> VertexId {
        let mut ids: Vec<VertexId> = self.vertices.iter().map(|v| v.id).collect();
        ids.sort_unstable();
        ids.dedup();

        let mut candidate: VertexId = 0;
        for id in ids {
            if id != candidate {
                break;
            }
            candidate = candidate.wrapping_add(1);
        }
        candidate
    }

    /// Connect two existing vertices
    pub fn add_edge(
        &mut self,
        source: VertexId,
        target: VertexId,
        kind: EdgeKind,
    ) -> Result<(), GraphError> {
        for id in [source, target] {
            if !self.has_vertex(id) {
                return Err(GraphError::UnknownVertex(id));
            }
        }
        self.edges.push(Edge {
            source,
            target,
            kind,
        });
        Ok(())
    }

    /// Set the phase of a vertex, if it exists. The phase must be finite.
    pub fn set_phase(&mut self, id: VertexId, phase: f64) -> Result<(), GraphError> {
        if !phase.is_finite() {
            return Err(GraphError::NonFinite { id, field: "phase" });
        }
        let vertex = self
            .vertices
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(GraphError::UnknownVertex(id))?;
        vertex.phase = phase;
        Ok(())
    }

    pub fn has_vertex(&self, id: VertexId) -> bool {
        self.vertices.iter().any(|v| v.id == id)
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Serialize to the engine's JSON encoding.
    ///
    /// JSON has no NaN or infinity, so a vertex with a non-finite phase or
    /// coordinate is refused instead of being written as `null`.
    pub fn to_json(&self) -> Result<String, GraphError> {
        self.check_finite()?;
        Ok(serde_json::to_string(self)?)
    }

    fn check_finite(&self) -> Result<(), GraphError> {
        for vertex in &self.vertices {
            for (field, value) in [
                ("phase", vertex.phase),
                ("row", vertex.row),
                ("qubit", vertex.qubit),
            ] {
                if !value.is_finite() {
                    return Err(GraphError::NonFinite {
                        id: vertex.id,
                        field,
                    });
                }
            }
        }
        Ok(())
    }

    /// Parse the engine's JSON encoding, rejecting dangling references
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let graph: Graph = serde_json::from_str(json)?;
        graph.validate()?;
        Ok(graph)
    }

    fn validate(&self) -> Result<(), GraphError> {
        let mut seen = HashSet::with_capacity(self.vertices.len());
        for vertex in &self.vertices {
            if !seen.insert(vertex.id) {
                return Err(GraphError::DuplicateVertex(vertex.id));
            }
        }

        let referenced = self
            .edges
            .iter()
            .flat_map(|e| [e.source, e.target])
            .chain(self.inputs.iter().copied())
            .chain(self.outputs.iter().copied());
        for id in referenced {
            if !seen.contains(&id) {
                return Err(GraphError::UnknownVertex(id));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_qubit_cnot() -> Graph {
        let mut graph = Graph::new();
        let in0 = graph.add_vertex(VertexKind::Boundary, 0.0, 0.0);
        let in1 = graph.add_vertex(VertexKind::Boundary, 1.0, 0.0);
        let z = graph.add_vertex(VertexKind::Z, 0.0, 1.0);
        let x = graph.add_vertex(VertexKind::X, 1.0, 1.0);
        let out0 = graph.add_vertex(VertexKind::Boundary, 0.0, 2.0);
        let out1 = graph.add_vertex(VertexKind::Boundary, 1.0, 2.0);
        graph.add_edge(in0, z, EdgeKind::Simple).unwrap();
        graph.add_edge(in1, x, EdgeKind::Simple).unwrap();
        graph.add_edge(z, x, EdgeKind::Simple).unwrap();
        graph.add_edge(z, out0, EdgeKind::Simple).unwrap();
        graph.add_edge(x, out1, EdgeKind::Simple).unwrap();
        graph.inputs = vec![in0, in1];
        graph.outputs = vec![out0, out1];
        graph
    }

    #[test]
    fn test_json_round_trip_keeps_structure() {
        let mut graph = two_qubit_cnot();
        graph.set_phase(2, 0.5).unwrap();

        let restored = Graph::from_json(&graph.to_json().unwrap()).unwrap();
        assert_eq!(restored.num_vertices(), 6);
        assert_eq!(restored.num_edges(), 5);
        assert_eq!(restored, graph);
    }

    #[test]
    fn test_rejects_dangling_edge() {
        let mut graph = Graph::new();
        let v = graph.add_vertex(VertexKind::Z, 0.0, 0.0);
        assert!(matches!(
            graph.add_edge(v, 42, EdgeKind::Hadamard),
            Err(GraphError::UnknownVertex(42))
        ));

        let json = r#"{"vertices":[{"id":0,"kind":"z","row":0,"qubit":0}],
                       "edges":[{"source":0,"target":7}]}"#;
        assert!(matches!(
            Graph::from_json(json),
            Err(GraphError::UnknownVertex(7))
        ));
    }

    #[test]
    fn test_non_finite_values_are_not_encoded() {
        let mut graph = two_qubit_cnot();
        assert!(matches!(
            graph.set_phase(2, f64::NAN),
            Err(GraphError::NonFinite { id: 2, field: "phase" })
        ));
        assert!(graph.to_json().is_ok());

        graph.vertices[3].phase = f64::INFINITY;
        assert!(matches!(
            graph.to_json(),
            Err(GraphError::NonFinite { id: 3, field: "phase" })
        ));

        let mut graph = Graph::new();
        graph.add_vertex(VertexKind::Z, f64::NEG_INFINITY, 0.0);
        assert!(matches!(
            graph.to_json(),
            Err(GraphError::NonFinite { id: 0, field: "qubit" })
        ));
    }

    #[test]
    fn test_add_vertex_after_max_id() {
        let json = format!(
            r#"{{"vertices":[{{"id":0,"kind":"z","row":0,"qubit":0}},
                            {{"id":{},"kind":"x","row":1,"qubit":0}}],
                "edges":[]}}"#,
            u32::MAX
        );
        let mut graph = Graph::from_json(&json).unwrap();

        let id = graph.add_vertex(VertexKind::Z, 0.0, 2.0);
        assert_eq!(id, 1);
        assert_eq!(graph.add_vertex(VertexKind::Z, 0.0, 3.0), 2);
        assert!(Graph::from_json(&graph.to_json().unwrap()).is_ok());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(Graph::from_json("INVALID"), Err(GraphError::Json(_))));
    }
}
