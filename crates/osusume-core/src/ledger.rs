use chrono::Utc;
use tracing::debug;

use crate::models::HistoryEntry;

/// User input for a new history entry; the ledger assigns the id and
/// creation date.
#[derive(Debug, Clone, Default)]
pub struct EntryDraft {
    pub title: String,
    pub media_type: String,
    pub genre: Option<String>,
    /// 1-5 scale; out-of-range values are recorded as absent.
    pub rating: Option<u8>,
}

/// Append-only, user-curated list of consumed items.
///
/// Lives independently of the live recommendation flow; the session only
/// reads it as optional request context. Ids are generation-ordered and
/// collision-free within the ledger's lifetime.
pub struct HistoryLedger {
    entries: Vec<HistoryEntry>,
    next_id: u64,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// Rebuild from a storage mirror, resuming the id counter past the
    /// highest id seen.
    pub fn from_entries(entries: Vec<HistoryEntry>) -> Self {
        let next_id = entries.iter().map(|e| e.id).max().map_or(1, |max| max + 1);
        Self { entries, next_id }
    }

    /// Record an entry. Title and type are required (after trimming);
    /// drafts missing either are rejected as a no-op.
    pub fn add_entry(&mut self, draft: EntryDraft) -> Option<&HistoryEntry> {
        let title = draft.title.trim();
        let media_type = draft.media_type.trim();
        if title.is_empty() || media_type.is_empty() {
            debug!("history entry missing title or type, rejecting");
            return None;
        }

        let entry = HistoryEntry {
            id: self.next_id,
            title: title.to_string(),
            media_type: media_type.to_string(),
            genre: draft.genre.filter(|g| !g.trim().is_empty()),
            rating: draft.rating.filter(|r| (1..=5).contains(r)),
            date_added: Utc::now(),
        };
        self.next_id += 1;
        self.entries.push(entry);
        self.entries.last()
    }

    /// Remove by id. Unknown ids are a no-op, not an error.
    pub fn remove_entry(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        before != self.entries.len()
    }

    /// The full ordered sequence, oldest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for HistoryLedger {
    fn default() -> Self {
        Self::new()
    }
}
