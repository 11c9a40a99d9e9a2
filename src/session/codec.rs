//! Panel codec: converts live panels to tab records and back.
//!
//! Each panel kind has its own payload layout inside the record's `data`
//! string. Graph payloads are the diagram engine's own encoding; proof and
//! rule payloads are JSON objects that embed graph encodings as strings.

use crate::graph::{Graph, GraphError};
use crate::panel::{
    FileFormat, GraphPanel, Panel, ProofModel, ProofPanel, ProofStep, Rule, RulePanel,
};
use crate::session::document::{TabKind, TabRecord};
use serde::{Deserialize, Serialize};

/// Why a tab record could not be turned back into a panel
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Unknown tab type '{0}'")]
    UnknownTabType(String),

    #[error("Tab record has no data field")]
    MissingDataField,

    #[error("Invalid {kind} payload: {reason}")]
    PayloadDecode { kind: TabKind, reason: String },

    #[error("Unknown file type '{0}'")]
    UnknownFileType(String),

    #[error("Malformed tab record: {0}")]
    MalformedRecord(String),
}

impl DecodeError {
    fn payload(kind: TabKind, reason: impl ToString) -> Self {
        DecodeError::PayloadDecode {
            kind,
            reason: reason.to_string(),
        }
    }
}

/// Why a live panel could not be serialized
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("Graph encoding failed: {0}")]
    Graph(#[from] GraphError),

    #[error("Payload encoding failed: {0}")]
    Payload(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize)]
struct ProofPayload {
    initial_graph: String,
    proof_steps: Vec<ProofStepPayload>,
}

#[derive(Serialize, Deserialize)]
struct ProofStepPayload {
    display_name: String,
    rule: String,
    graph: String,
}

#[derive(Serialize, Deserialize)]
struct RulePayload {
    lhs_graph: String,
    rhs_graph: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
}

/// Serialize a live panel into a tab record
pub fn encode(panel: &Panel) -> Result<TabRecord, EncodeError> {
    let data = match panel {
        Panel::Graph(panel) => panel.graph.to_json()?,
        Panel::Proof(panel) => encode_proof(&panel.proof)?,
        Panel::Rule(panel) => encode_rule(&panel.rule)?,
    };

    Ok(TabRecord {
        kind: panel.kind().as_str().to_string(),
        name: panel.title().to_string(),
        data: Some(data),
        file_path: panel.file_path().map(str::to_string),
        file_type: panel.file_type().map(|format| format.tag().to_string()),
    })
}

/// Rebuild a live panel from a tab record
pub fn decode(record: &TabRecord) -> Result<Panel, DecodeError> {
    let kind: TabKind = record.kind.parse()?;
    let data = record.data.as_deref().ok_or(DecodeError::MissingDataField)?;
    let file_type = record
        .file_type
        .as_deref()
        .map(|tag| {
            tag.parse::<FileFormat>()
                .map_err(|_| DecodeError::UnknownFileType(tag.to_string()))
        })
        .transpose()?;

    let mut panel = match kind {
        TabKind::Graph => {
            let graph = Graph::from_json(data).map_err(|e| DecodeError::payload(kind, e))?;
            Panel::Graph(GraphPanel::new(record.name.clone(), graph))
        }
        TabKind::Proof => Panel::Proof(ProofPanel::new(record.name.clone(), decode_proof(data)?)),
        TabKind::Rule => Panel::Rule(RulePanel::new(record.name.clone(), decode_rule(data)?)),
    };

    panel.set_file(record.file_path.clone(), file_type);
    Ok(panel)
}

fn encode_proof(proof: &ProofModel) -> Result<String, EncodeError> {
    let proof_steps = proof
        .steps
        .iter()
        .map(|step| -> Result<ProofStepPayload, EncodeError> {
            Ok(ProofStepPayload {
                display_name: step.display_name.clone(),
                rule: step.rule.clone(),
                graph: step.graph.to_json()?,
            })
        })
        .collect::<Result<Vec<_>, EncodeError>>()?;

    let payload = ProofPayload {
        initial_graph: proof.initial_graph.to_json()?,
        proof_steps,
    };
    Ok(serde_json::to_string(&payload)?)
}

fn decode_proof(data: &str) -> Result<ProofModel, DecodeError> {
    let kind = TabKind::Proof;
    let payload: ProofPayload =
        serde_json::from_str(data).map_err(|e| DecodeError::payload(kind, e))?;

    let initial_graph = Graph::from_json(&payload.initial_graph)
        .map_err(|e| DecodeError::payload(kind, format!("initial_graph: {}", e)))?;

    let steps = payload
        .proof_steps
        .into_iter()
        .enumerate()
        .map(|(index, step)| -> Result<ProofStep, DecodeError> {
            let graph = Graph::from_json(&step.graph)
                .map_err(|e| DecodeError::payload(kind, format!("proof step {}: {}", index, e)))?;
            Ok(ProofStep {
                display_name: step.display_name,
                rule: step.rule,
                graph,
            })
        })
        .collect::<Result<Vec<_>, DecodeError>>()?;

    Ok(ProofModel {
        initial_graph,
        steps,
    })
}

fn encode_rule(rule: &Rule) -> Result<String, EncodeError> {
    let payload = RulePayload {
        lhs_graph: rule.lhs.to_json()?,
        rhs_graph: rule.rhs.to_json()?,
        name: rule.name.clone(),
        description: rule.description.clone(),
    };
    Ok(serde_json::to_string(&payload)?)
}

fn decode_rule(data: &str) -> Result<Rule, DecodeError> {
    let kind = TabKind::Rule;
    let payload: RulePayload =
        serde_json::from_str(data).map_err(|e| DecodeError::payload(kind, e))?;

    let lhs = Graph::from_json(&payload.lhs_graph)
        .map_err(|e| DecodeError::payload(kind, format!("lhs_graph: {}", e)))?;
    let rhs = Graph::from_json(&payload.rhs_graph)
        .map_err(|e| DecodeError::payload(kind, format!("rhs_graph: {}", e)))?;

    Ok(Rule::new(lhs, rhs, payload.name, payload.description))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeKind, VertexKind};

    fn small_graph() -> Graph {
        let mut graph = Graph::new();
        let a = graph.add_vertex(VertexKind::Z, 0.0, 0.0);
        let b = graph.add_vertex(VertexKind::X, 0.0, 1.0);
        graph.add_edge(a, b, EdgeKind::Hadamard).unwrap();
        graph
    }

    fn record(kind: &str, data: Option<&str>) -> TabRecord {
        TabRecord {
            kind: kind.to_string(),
            name: "Tab".to_string(),
            data: data.map(str::to_string),
            file_path: None,
            file_type: None,
        }
    }

    #[test]
    fn test_graph_record_carries_file_info() {
        let panel = Panel::from(
            GraphPanel::new("Saved Graph", small_graph()).with_file("/tmp/test.zxg", FileFormat::QGraph),
        );

        let record = encode(&panel).unwrap();
        assert_eq!(record.kind, "graph");
        assert_eq!(record.name, "Saved Graph");
        assert_eq!(record.file_path.as_deref(), Some("/tmp/test.zxg"));
        assert_eq!(record.file_type.as_deref(), Some("zxg"));

        let decoded = decode(&record).unwrap();
        assert_eq!(decoded, panel);
    }

    #[test]
    fn test_proof_payload_keys() {
        let mut proof = ProofModel::new(small_graph());
        proof.add_step("fuse", "spider_fusion", Graph::new());
        let panel = Panel::from(ProofPanel::new("Proof", proof));

        let record = encode(&panel).unwrap();
        let payload: serde_json::Value =
            serde_json::from_str(record.data.as_deref().unwrap()).unwrap();
        assert!(payload.get("initial_graph").is_some());
        assert_eq!(payload["proof_steps"].as_array().unwrap().len(), 1);

        assert_eq!(decode(&record).unwrap(), panel);
    }

    #[test]
    fn test_rule_payload_keys() {
        let rule = Rule::new(small_graph(), Graph::new(), "test rule", "desc");
        let panel = Panel::from(RulePanel::new("My Rule", rule));

        let record = encode(&panel).unwrap();
        let payload: serde_json::Value =
            serde_json::from_str(record.data.as_deref().unwrap()).unwrap();
        assert!(payload.get("lhs_graph").is_some());
        assert!(payload.get("rhs_graph").is_some());
        assert_eq!(payload["name"], "test rule");
        assert_eq!(payload["description"], "desc");

        assert_eq!(decode(&record).unwrap(), panel);
    }

    #[test]
    fn test_decode_failures() {
        assert!(matches!(
            decode(&record("unknown_panel", Some("{}"))),
            Err(DecodeError::UnknownTabType(_))
        ));
        assert!(matches!(
            decode(&record("graph", None)),
            Err(DecodeError::MissingDataField)
        ));
        assert!(matches!(
            decode(&record("graph", Some("INVALID"))),
            Err(DecodeError::PayloadDecode { kind: TabKind::Graph, .. })
        ));
        assert!(matches!(
            decode(&record("proof", Some(r#"{"proof_steps": []}"#))),
            Err(DecodeError::PayloadDecode { kind: TabKind::Proof, .. })
        ));
        assert!(matches!(
            decode(&record("rule", Some(r#"{"lhs_graph": "{\"vertices\":[],\"edges\":[]}"}"#))),
            Err(DecodeError::PayloadDecode { kind: TabKind::Rule, .. })
        ));
    }

    #[test]
    fn test_unknown_file_type_rejected() {
        let mut record = encode(&Panel::from(GraphPanel::new("G", Graph::new()))).unwrap();
        record.file_type = Some("docx".to_string());

        assert!(matches!(
            decode(&record),
            Err(DecodeError::UnknownFileType(tag)) if tag == "docx"
        ));
    }
}
