//! Diagram file loading for the `open` command
//!
//! Supported inputs:
//! - `.zxg` / `.json`: a graph in the diagram engine's JSON encoding
//! - `.zxp`: a proof (initial graph plus steps)
//! - `.zxr`: a rewrite rule (left and right hand sides)
//!
//! Files go through the same codec as stored tab records, so a file that opens
//! here also survives a save and restore.

use crate::panel::{FileFormat, Panel};
use crate::session::{DecodeError, TabRecord, codec};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("File '{path}' not found")]
    NotFound { path: PathBuf },

    #[error("File '{path}' is not UTF-8 encoded")]
    NotUtf8 { path: PathBuf },

    #[error("IO error reading '{path}': {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("File '{path}' has an unsupported format (expected .zxg, .json, .zxp or .zxr)")]
    Unsupported { path: PathBuf },

    #[error("File '{path}' could not be opened: {source}")]
    Decode {
        path: PathBuf,
        source: DecodeError,
    },
}

/// Loads diagram files into panels
pub struct PanelLoader;

impl PanelLoader {
    /// Open `path` as a panel titled after the file name
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Panel, FileError> {
        let path = path.as_ref();
        let format = Self::detect_format(path)?;
        let content = Self::read_utf8(path)?;

        let title = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("Untitled")
            .to_string();

        let record = TabRecord {
            kind: format.panel_kind().as_str().to_string(),
            name: title,
            data: Some(content),
            file_path: Some(path.display().to_string()),
            file_type: Some(format.tag().to_string()),
        };

        debug!("Decoding {:?} as a {} panel", path, format.panel_kind());
        codec::decode(&record).map_err(|source| FileError::Decode {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Formats that can be opened; qasm and tikz need converters this crate does not ship
    fn detect_format(path: &Path) -> Result<FileFormat, FileError> {
        match FileFormat::from_path(path) {
            Some(
                format @ (FileFormat::QGraph
                | FileFormat::Json
                | FileFormat::Proof
                | FileFormat::Rule),
            ) => Ok(format),
            _ => Err(FileError::Unsupported {
                path: path.to_path_buf(),
            }),
        }
    }

    fn read_utf8(path: &Path) -> Result<String, FileError> {
        fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => FileError::NotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::InvalidData => FileError::NotUtf8 {
                path: path.to_path_buf(),
            },
            _ => FileError::IoError {
                path: path.to_path_buf(),
                source: e,
            },
        })
    }
}
