//! Search History

use smallvec::SmallVec;

/// Number of searches remembered.
pub const SEARCH_HISTORY_LIMIT: usize = 5;

/// Recent searches, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHistory {
    entries: SmallVec<[String; SEARCH_HISTORY_LIMIT]>,
}

impl SearchHistory {
    /// Empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from stored entries, most recent first. Extra or duplicate entries are dropped.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let collected: Vec<String> = entries.into_iter().map(Into::into).collect();
        let mut history = Self::new();

        for entry in collected.into_iter().rev() {
            history.record(&entry);
        }

        history
    }

    /// Record a search. Repeating a term (ignoring case) moves it to the front. Blank terms are
    /// ignored.
    pub fn record(&mut self, term: &str) {
        let term = term.trim();

        if term.is_empty() {
            return;
        }

        self.entries
            .retain(|existing| !existing.eq_ignore_ascii_case(term));

        self.entries.insert(0, term.to_string());
        self.entries.truncate(SEARCH_HISTORY_LIMIT);
    }

    /// Forget every search.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries, most recent first
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn most_recent_first() {
        let mut history = SearchHistory::new();

        history.record("bralette");
        history.record("robe");

        assert_eq!(history.entries(), ["robe", "bralette"]);
    }

    #[test]
    fn capped_at_limit() {
        let mut history = SearchHistory::new();

        for term in ["a", "b", "c", "d", "e", "f", "g"] {
            history.record(term);
        }

        assert_eq!(history.len(), SEARCH_HISTORY_LIMIT);
        assert_eq!(history.entries(), ["g", "f", "e", "d", "c"]);
    }

    #[test]
    fn repeated_term_moves_to_front() {
        let mut history = SearchHistory::from_entries(["silk", "lace", "satin"]);

        history.record("LACE");

        assert_eq!(history.entries(), ["LACE", "silk", "satin"]);
    }

    #[test]
    fn blank_terms_are_ignored() {
        let mut history = SearchHistory::new();

        history.record("   ");

        assert!(history.is_empty());
    }

    #[test]
    fn from_entries_keeps_order_and_cap() {
        let history = SearchHistory::from_entries(["1", "2", "3", "4", "5", "6"]);

        assert_eq!(history.entries(), ["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn clear_empties_history() {
        let mut history = SearchHistory::from_entries(["silk"]);

        history.clear();

        assert!(history.is_empty());
    }
}
