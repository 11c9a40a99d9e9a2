use crate::session::codec::{DecodeError, EncodeError};

/// A stored tab record that restore had to leave out
#[derive(Debug)]
pub struct SkippedTab {
    /// Position of the record in the stored document
    pub position: usize,
    /// Record name, when it could be read
    pub name: Option<String>,
    pub reason: DecodeError,
}

/// Outcome of one restore pass
#[derive(Debug, Default)]
pub struct RestoreReport {
    /// Number of tabs installed into the host
    pub restored: usize,
    /// Records left out, in stored order
    pub skipped: Vec<SkippedTab>,
    /// Host index of the tab that was made current
    pub active_index: Option<usize>,
}

impl RestoreReport {
    /// True iff at least one tab was installed
    pub fn success(&self) -> bool {
        self.restored > 0
    }
}

/// A live panel that save had to leave out
#[derive(Debug)]
pub struct OmittedPanel {
    /// Position of the panel in display order
    pub position: usize,
    pub title: String,
    pub reason: EncodeError,
}

/// Outcome of one save
#[derive(Debug, Default)]
pub struct SaveReport {
    /// Number of tab records written
    pub tabs_written: usize,
    /// Panels left out of the document
    pub omitted: Vec<OmittedPanel>,
    /// Active index as written to the document
    pub active_tab: Option<usize>,
    pub bytes_written: u64,
    pub duration_ms: u64,
    /// True when the stored session was removed instead of written
    pub cleared: bool,
}

/// Map an index into the original sequence onto the subsequence that survived.
///
/// `survivors` holds the original positions of the kept items in order. When
/// the item at `saved` survived, its position among the survivors is
/// returned, so skipped neighbours never shift the selection. Otherwise
/// (skipped, out of range or unknown) the first survivor is chosen. Returns
/// `None` only when nothing survived.
pub fn remap_active_index(saved: Option<usize>, survivors: &[usize]) -> Option<usize> {
    if survivors.is_empty() {
        return None;
    }

    saved
        .and_then(|saved| survivors.iter().position(|&position| position == saved))
        .or(Some(0))
}
