use crate::session::codec::DecodeError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of panel a tab record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabKind {
    Graph,
    Proof,
    Rule,
}

impl TabKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TabKind::Graph => "graph",
            TabKind::Proof => "proof",
            TabKind::Rule => "rule",
        }
    }
}

impl fmt::Display for TabKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TabKind {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "graph" => Ok(TabKind::Graph),
            "proof" => Ok(TabKind::Proof),
            "rule" => Ok(TabKind::Rule),
            other => Err(DecodeError::UnknownTabType(other.to_string())),
        }
    }
}

/// One panel's serialized representation inside a session document.
///
/// `kind` and `file_type` are kept as raw strings so that a record written by
/// a different build, or damaged on disk, still parses and can be rejected
/// on its own during restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
}

/// Snapshot of all open tabs, written as one string on every save
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionDocument {
    pub tabs: Vec<TabRecord>,
    pub active_tab: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl SessionDocument {
    pub fn new(tabs: Vec<TabRecord>, active_tab: usize) -> Self {
        Self {
            tabs,
            active_tab,
            saved_at: Some(Utc::now()),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A session document as read back from the settings store.
///
/// Nothing in here is trusted: tab entries are kept as raw JSON values and
/// checked one at a time, and `active_tab` may be missing, negative or out
/// of range.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredSession {
    #[serde(default)]
    pub tabs: Vec<serde_json::Value>,
    #[serde(default)]
    pub active_tab: serde_json::Value,
    #[serde(default)]
    pub saved_at: Option<serde_json::Value>,
}

impl StoredSession {
    /// Parse the stored string; fails when it is not a JSON object
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    /// Saved active index, if it is a usable non-negative integer
    pub fn active_index(&self) -> Option<usize> {
        self.active_tab
            .as_u64()
            .and_then(|index| usize::try_from(index).ok())
    }

    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.saved_at
            .as_ref()
            .and_then(|value| value.as_str())
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|time| time.with_timezone(&Utc))
    }

    /// Tab records in stored order; malformed entries come back as errors
    pub fn records(&self) -> impl Iterator<Item = Result<TabRecord, DecodeError>> + '_ {
        self.tabs.iter().map(|value| {
            serde_json::from_value::<TabRecord>(value.clone())
                .map_err(|e| DecodeError::MalformedRecord(e.to_string()))
        })
    }

    /// Best-effort display name of the entry at `position`
    pub fn name_at(&self, position: usize) -> Option<String> {
        self.tabs
            .get(position)?
            .get("name")?
            .as_str()
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_shape() {
        let record = TabRecord {
            kind: "graph".to_string(),
            name: "G".to_string(),
            data: Some("{}".to_string()),
            file_path: None,
            file_type: None,
        };
        let document = SessionDocument::new(vec![record], 0);
        let value: serde_json::Value = serde_json::from_str(&document.to_json().unwrap()).unwrap();

        assert_eq!(value["active_tab"], 0);
        assert_eq!(value["tabs"][0]["type"], "graph");
        assert_eq!(value["tabs"][0]["name"], "G");
        assert!(value["tabs"][0]["file_path"].is_null());
        assert!(value["tabs"][0]["file_type"].is_null());
        assert!(value["saved_at"].is_string());
    }

    #[test]
    fn test_stored_session_is_lenient() {
        let stored = StoredSession::parse(
            r#"{"tabs":[{"type":"graph","name":"A","data":"{}"},{"name":5},"junk"],
                "active_tab":-3,"extra":true}"#,
        )
        .unwrap();

        assert_eq!(stored.len(), 3);
        assert_eq!(stored.active_index(), None);
        assert_eq!(stored.saved_at(), None);

        let records: Vec<_> = stored.records().collect();
        assert!(records[0].is_ok());
        assert!(matches!(records[1], Err(DecodeError::MalformedRecord(_))));
        assert!(matches!(records[2], Err(DecodeError::MalformedRecord(_))));
        assert_eq!(stored.name_at(0).as_deref(), Some("A"));
        assert_eq!(stored.name_at(1), None);
    }

    #[test]
    fn test_missing_fields_default() {
        let stored = StoredSession::parse("{}").unwrap();
        assert!(stored.is_empty());
        assert_eq!(stored.active_index(), None);

        assert!(StoredSession::parse("[1,2]").is_err());
        assert!(StoredSession::parse("NOT VALID JSON {{{").is_err());
    }

    #[test]
    fn test_tab_kind_tags() {
        assert_eq!("proof".parse::<TabKind>().unwrap(), TabKind::Proof);
        assert!(matches!(
            "unknown_panel".parse::<TabKind>(),
            Err(DecodeError::UnknownTabType(tag)) if tag == "unknown_panel"
        ));
    }
}
