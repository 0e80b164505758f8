use thiserror::Error;

use crate::drill::FocusError;
use crate::view::ViewId;

/// Errors returned by [`crate::SelectionCoordinator::dispatch`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinatorError {
    #[error("no view registered with id {0}")]
    UnknownView(ViewId),

    #[error("view {view} does not support {capability}")]
    Unsupported {
        view: ViewId,
        capability: &'static str,
    },

    #[error("drill focus error: {0}")]
    Focus(#[from] FocusError),
}

pub type Result<T> = std::result::Result<T, CoordinatorError>;
