//! The coordinator-owned brush selection

use tracing::warn;

use crate::record::{RecordSet, RecordStore};

/// Current brush state
///
/// `Everything` is the "no active brush" sentinel. An explicitly empty
/// candidate and a candidate covering the whole store both normalize to it,
/// and every consumer sees it as the full store, never as an empty set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Everything,
    Subset(RecordSet),
}

impl Selection {
    /// Turn a candidate reported by a view into a selection
    pub fn normalize(candidate: RecordSet, store: &RecordStore) -> Self {
        let reported = candidate.len();
        let kept: RecordSet = candidate.into_iter().filter(|idx| store.contains(*idx)).collect();
        if kept.len() < reported {
            warn!(
                dropped = reported - kept.len(),
                "Candidate selection referenced records outside the store"
            );
        }

        if kept.is_empty() || store.is_full(&kept) {
            Self::Everything
        } else {
            Self::Subset(kept)
        }
    }

    pub fn is_everything(&self) -> bool {
        matches!(self, Self::Everything)
    }

    /// The set handed to views and engines
    pub fn effective(&self, store: &RecordStore) -> RecordSet {
        match self {
            Self::Everything => store.all(),
            Self::Subset(set) => set.clone(),
        }
    }

    /// Number of records in the effective selection
    pub fn len(&self, store: &RecordStore) -> usize {
        match self {
            Self::Everything => store.len(),
            Self::Subset(set) => set.len(),
        }
    }
}
