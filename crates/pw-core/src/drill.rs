//! View-private drill-down focus on one categorical value

use thiserror::Error;
use tracing::debug;

use crate::record::{RecordSet, RecordStore, TagId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FocusError {
    #[error("'{0}' is not among the current focus candidates")]
    NotACandidate(String),

    #[error("no focus candidates available")]
    NoCandidates,

    #[error("already at the first candidate")]
    AtFirst,

    #[error("already at the last candidate")]
    AtLast,

    #[error("view does not support drill focus")]
    Unsupported,
}

/// Focus state for views that narrow onto a single entity
///
/// Candidates are the sorted distinct values of `tag` within the current
/// selection. With no active brush the focus is cleared and every value of
/// the store is offered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrillFocus {
    tag: TagId,
    candidates: Vec<String>,
    focus: Option<String>,
}

impl DrillFocus {
    pub fn new(tag: TagId) -> Self {
        Self {
            tag,
            candidates: Vec::new(),
            focus: None,
        }
    }

    pub fn tag(&self) -> TagId {
        self.tag
    }

    pub fn focus(&self) -> Option<&str> {
        self.focus.as_deref()
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Re-derive candidates and focus from the effective selection
    pub fn narrow(&mut self, store: &RecordStore, selection: &RecordSet) {
        if selection.is_empty() || store.is_full(selection) {
            self.candidates = store.distinct_tags(&store.all(), self.tag);
            self.focus = None;
            return;
        }

        self.candidates = store.distinct_tags(selection, self.tag);
        let still_present = self
            .focus
            .as_ref()
            .is_some_and(|focus| self.candidates.contains(focus));
        if !still_present {
            self.focus = self.candidates.first().cloned();
            debug!(tag = %self.tag, focus = ?self.focus, "Drill focus reseeded");
        }
    }

    /// Focus a specific candidate (dropdown change)
    pub fn select(&mut self, value: &str) -> Result<(), FocusError> {
        if self.candidates.iter().any(|c| c == value) {
            self.focus = Some(value.to_string());
            Ok(())
        } else {
            Err(FocusError::NotACandidate(value.to_string()))
        }
    }

    /// Move to the next candidate
    pub fn next(&mut self) -> Result<(), FocusError> {
        let idx = self.position();
        match idx {
            None => self.focus_index(0),
            Some(i) if i + 1 < self.candidates.len() => self.focus_index(i + 1),
            Some(_) => Err(FocusError::AtLast),
        }
    }

    /// Move to the previous candidate
    pub fn previous(&mut self) -> Result<(), FocusError> {
        let idx = self.position();
        match idx {
            None => self.focus_index(0),
            Some(i) if i > 0 => self.focus_index(i - 1),
            Some(_) => Err(FocusError::AtFirst),
        }
    }

    /// Whether a record's tag value is the focused one
    pub fn is_focused(&self, value: &str) -> bool {
        self.focus.as_deref() == Some(value)
    }

    fn position(&self) -> Option<usize> {
        let focus = self.focus.as_ref()?;
        self.candidates.iter().position(|c| c == focus)
    }

    fn focus_index(&mut self, idx: usize) -> Result<(), FocusError> {
        let value = self.candidates.get(idx).ok_or(FocusError::NoCandidates)?;
        self.focus = Some(value.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Record, RecordIdx};

    fn store(drivers: &[&str]) -> RecordStore {
        RecordStore::from_records(
            drivers
                .iter()
                .map(|d| Record::empty().with_tag(TagId::Driver, *d))
                .collect(),
        )
    }

    fn set(indices: &[usize]) -> RecordSet {
        indices.iter().copied().map(RecordIdx).collect()
    }

    #[test]
    fn test_reseed_to_sorted_first_when_focus_gone() {
        let store = store(&["X", "Z", "Y", "X"]);
        let mut drill = DrillFocus::new(TagId::Driver);
        drill.narrow(&store, &set(&[0, 3, 1]));
        drill.select("X").unwrap();

        drill.narrow(&store, &set(&[1, 2]));
        assert_eq!(drill.candidates(), ["Y", "Z"]);
        assert_eq!(drill.focus(), Some("Y"));
    }

    #[test]
    fn test_focus_kept_when_still_present() {
        let store = store(&["A", "B", "C"]);
        let mut drill = DrillFocus::new(TagId::Driver);
        drill.narrow(&store, &set(&[0, 1]));
        drill.select("B").unwrap();

        drill.narrow(&store, &set(&[1, 2]));
        assert_eq!(drill.focus(), Some("B"));
    }

    #[test]
    fn test_full_selection_clears_focus() {
        let store = store(&["B", "A"]);
        let mut drill = DrillFocus::new(TagId::Driver);
        drill.narrow(&store, &set(&[0]));
        assert_eq!(drill.focus(), Some("B"));

        drill.narrow(&store, &store.all());
        assert_eq!(drill.focus(), None);
        assert_eq!(drill.candidates(), ["A", "B"]);
    }

    #[test]
    fn test_select_rejects_unknown() {
        let store = store(&["A", "B"]);
        let mut drill = DrillFocus::new(TagId::Driver);
        drill.narrow(&store, &set(&[0]));
        assert_eq!(drill.select("B"), Err(FocusError::NotACandidate("B".into())));
        assert_eq!(drill.focus(), Some("A"));
    }

    #[test]
    fn test_step_through_candidates() {
        let store = store(&["A", "B", "C", "D"]);
        let mut drill = DrillFocus::new(TagId::Driver);
        drill.narrow(&store, &store.all());

        drill.next().unwrap();
        assert_eq!(drill.focus(), Some("A"));
        drill.next().unwrap();
        drill.next().unwrap();
        drill.next().unwrap();
        assert_eq!(drill.focus(), Some("D"));
        assert_eq!(drill.next(), Err(FocusError::AtLast));

        drill.previous().unwrap();
        assert_eq!(drill.focus(), Some("C"));
    }

    #[test]
    fn test_step_without_candidates() {
        let mut drill = DrillFocus::new(TagId::Driver);
        assert_eq!(drill.next(), Err(FocusError::NoCandidates));
    }
}
