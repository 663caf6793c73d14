//! Live substring filtering over a directory listing.

use crate::navigator::Entry;

/// Stateless filter applied to the navigator's listing on every keystroke.
pub struct EntryFilter;

impl EntryFilter {
    /// Entries whose name contains `query`, ignoring case, in their original
    /// order. An empty query keeps everything.
    pub fn filter(entries: &[Entry], query: &str) -> Vec<Entry> {
        let lower_query = query.to_lowercase();
        entries
            .iter()
            .filter(|entry| entry.name().to_lowercase().contains(&lower_query))
            .cloned()
            .collect()
    }

    /// Position to select in a freshly drawn view: skip a leading parent
    /// marker when there is something else to select.
    pub fn default_selection(view: &[Entry]) -> Option<usize> {
        match view {
            [] => None,
            [first, _, ..] if first.is_parent_marker() => Some(1),
            _ => Some(0),
        }
    }
}
