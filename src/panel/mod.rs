//! Live editor panels.
//!
//! A panel is the in-memory state behind one editor tab. The set of panel kinds
//! is closed: graph editors, proof (derivation) editors and rule editors.
//! Widgets and input handling belong to the UI layer; this module only holds
//! the state that has to survive a restart.

use crate::graph::Graph;
use crate::session::TabKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// On-disk format associated with a panel's file path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileFormat {
    #[serde(rename = "zxg")]
    QGraph,
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "qasm")]
    Qasm,
    #[serde(rename = "tikz")]
    Tikz,
    #[serde(rename = "zxp")]
    Proof,
    #[serde(rename = "zxr")]
    Rule,
}

/// Unrecognised file format tag
#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown file format '{0}'")]
pub struct UnknownFileFormat(pub String);

impl FileFormat {
    pub const ALL: [FileFormat; 6] = [
        FileFormat::QGraph,
        FileFormat::Json,
        FileFormat::Qasm,
        FileFormat::Tikz,
        FileFormat::Proof,
        FileFormat::Rule,
    ];

    /// Tag stored in session records, which is also the file extension
    pub fn tag(self) -> &'static str {
        match self {
            FileFormat::QGraph => "zxg",
            FileFormat::Json => "json",
            FileFormat::Qasm => "qasm",
            FileFormat::Tikz => "tikz",
            FileFormat::Proof => "zxp",
            FileFormat::Rule => "zxr",
        }
    }

    /// Guess the format from a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        extension.parse().ok()
    }

    /// Panel kind a file of this format opens as
    pub fn panel_kind(self) -> TabKind {
        match self {
            FileFormat::Proof => TabKind::Proof,
            FileFormat::Rule => TabKind::Rule,
            _ => TabKind::Graph,
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for FileFormat {
    type Err = UnknownFileFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FileFormat::ALL
            .into_iter()
            .find(|format| format.tag() == s)
            .ok_or_else(|| UnknownFileFormat(s.to_string()))
    }
}

/// Graph editor state
#[derive(Debug, Clone, PartialEq)]
pub struct GraphPanel {
    pub title: String,
    pub graph: Graph,
    pub file_path: Option<String>,
    pub file_type: Option<FileFormat>,
}

impl GraphPanel {
    pub fn new(title: impl Into<String>, graph: Graph) -> Self {
        Self {
            title: title.into(),
            graph,
            file_path: None,
            file_type: None,
        }
    }

    /// Attach the file this panel was loaded from or saved to
    pub fn with_file(mut self, path: impl Into<String>, file_type: FileFormat) -> Self {
        self.file_path = Some(path.into());
        self.file_type = Some(file_type);
        self
    }

    /// Open a derivation whose starting point is this panel's current graph
    pub fn start_derivation(&self) -> ProofPanel {
        ProofPanel::new(
            format!("Proof of {}", self.title),
            ProofModel::new(self.graph.clone()),
        )
    }
}

/// One rewrite in a derivation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofStep {
    pub display_name: String,
    pub rule: String,
    /// Graph after the rewrite was applied
    pub graph: Graph,
}

/// A derivation: a starting graph followed by rewrite steps
#[derive(Debug, Clone, PartialEq)]
pub struct ProofModel {
    pub initial_graph: Graph,
    pub steps: Vec<ProofStep>,
}

impl ProofModel {
    pub fn new(initial_graph: Graph) -> Self {
        Self {
            initial_graph,
            steps: Vec::new(),
        }
    }

    pub fn add_step(&mut self, display_name: impl Into<String>, rule: impl Into<String>, graph: Graph) {
        self.steps.push(ProofStep {
            display_name: display_name.into(),
            rule: rule.into(),
            graph,
        });
    }

    /// Graph at the end of the derivation
    pub fn current_graph(&self) -> &Graph {
        self.steps
            .last()
            .map(|step| &step.graph)
            .unwrap_or(&self.initial_graph)
    }
}

/// Proof editor state
#[derive(Debug, Clone, PartialEq)]
pub struct ProofPanel {
    pub title: String,
    pub proof: ProofModel,
    pub file_path: Option<String>,
    pub file_type: Option<FileFormat>,
}

impl ProofPanel {
    pub fn new(title: impl Into<String>, proof: ProofModel) -> Self {
        Self {
            title: title.into(),
            proof,
            file_path: None,
            file_type: None,
        }
    }

    pub fn with_file(mut self, path: impl Into<String>, file_type: FileFormat) -> Self {
        self.file_path = Some(path.into());
        self.file_type = Some(file_type);
        self
    }
}

/// A user-defined rewrite rule
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub lhs: Graph,
    pub rhs: Graph,
    pub name: String,
    pub description: String,
}

impl Rule {
    pub fn new(
        lhs: Graph,
        rhs: Graph,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            lhs,
            rhs,
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Rule editor state
#[derive(Debug, Clone, PartialEq)]
pub struct RulePanel {
    pub title: String,
    pub rule: Rule,
    pub file_path: Option<String>,
    pub file_type: Option<FileFormat>,
}

impl RulePanel {
    pub fn new(title: impl Into<String>, rule: Rule) -> Self {
        Self {
            title: title.into(),
            rule,
            file_path: None,
            file_type: None,
        }
    }

    pub fn with_file(mut self, path: impl Into<String>, file_type: FileFormat) -> Self {
        self.file_path = Some(path.into());
        self.file_type = Some(file_type);
        self
    }
}

/// The state behind one editor tab
#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    Graph(GraphPanel),
    Proof(ProofPanel),
    Rule(RulePanel),
}

impl Panel {
    pub fn kind(&self) -> TabKind {
        match self {
            Panel::Graph(_) => TabKind::Graph,
            Panel::Proof(_) => TabKind::Proof,
            Panel::Rule(_) => TabKind::Rule,
        }
    }

    /// Display title shown on the tab
    pub fn title(&self) -> &str {
        match self {
            Panel::Graph(panel) => &panel.title,
            Panel::Proof(panel) => &panel.title,
            Panel::Rule(panel) => &panel.title,
        }
    }

    pub fn file_path(&self) -> Option<&str> {
        match self {
            Panel::Graph(panel) => panel.file_path.as_deref(),
            Panel::Proof(panel) => panel.file_path.as_deref(),
            Panel::Rule(panel) => panel.file_path.as_deref(),
        }
    }

    pub fn file_type(&self) -> Option<FileFormat> {
        match self {
            Panel::Graph(panel) => panel.file_type,
            Panel::Proof(panel) => panel.file_type,
            Panel::Rule(panel) => panel.file_type,
        }
    }

    /// Replace the file association
    pub fn set_file(&mut self, file_path: Option<String>, file_type: Option<FileFormat>) {
        let (path_slot, type_slot) = match self {
            Panel::Graph(panel) => (&mut panel.file_path, &mut panel.file_type),
            Panel::Proof(panel) => (&mut panel.file_path, &mut panel.file_type),
            Panel::Rule(panel) => (&mut panel.file_path, &mut panel.file_type),
        };
        *path_slot = file_path;
        *type_slot = file_type;
    }
}

impl From<GraphPanel> for Panel {
    fn from(panel: GraphPanel) -> Self {
        Panel::Graph(panel)
    }
}

impl From<ProofPanel> for Panel {
    fn from(panel: ProofPanel) -> Self {
        Panel::Proof(panel)
    }
}

impl From<RulePanel> for Panel {
    fn from(panel: RulePanel) -> Self {
        Panel::Rule(panel)
    }
}
