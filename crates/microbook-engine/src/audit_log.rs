//! Append-only audit log.

use microbook_types::{AuditEntry, AuditEvent, LogOrder};

/// Timestamped record of every book addition and fill.
///
/// Entries are never removed or rewritten. The engine appends inside the
/// same critical section as the book mutation they describe, so the log
/// order matches the order in which mutations became visible.
#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
}

impl AuditLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp `event` with the current time and append it.
    pub fn append(&mut self, event: AuditEvent) {
        self.entries.push(AuditEntry::now(event));
    }

    /// The last `n` entries (fewer if the log is shorter).
    #[must_use]
    pub fn recent_entries(&self, n: usize, order: LogOrder) -> Vec<AuditEntry> {
        let start = self.entries.len().saturating_sub(n);
        let tail = &self.entries[start..];
        match order {
            LogOrder::OldestFirst => tail.to_vec(),
            LogOrder::NewestFirst => tail.iter().rev().cloned().collect(),
        }
    }

    /// The last `n` entries rendered as text.
    #[must_use]
    pub fn recent(&self, n: usize, order: LogOrder) -> Vec<String> {
        self.recent_entries(n, order)
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[must_use]
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
