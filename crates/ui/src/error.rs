//! Errors reported while building or mutating the layout tree.

use crate::tree::NodeId;

/// Failures of tree construction and window operations.
///
/// A stale id is an ordinary runtime condition (the window may have been
/// pruned since the id was handed out). A cell that ends up holding both an
/// element and children is a bug and panics in the layout pass instead.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum UiError {
    #[error("window {0} does not exist")]
    UnknownWindow(NodeId),

    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    #[error("{kind} node {node} cannot hold a {child}")]
    NotAContainer {
        node: NodeId,
        kind: &'static str,
        child: &'static str,
    },

    #[error("cell {0} already holds an element or children")]
    CellOccupied(NodeId),

    #[error("{0} is not a percentage between 0 and 100")]
    InvalidPercent(f32),
}

impl UiError {
    /// Static identifier for the variant, stable across message changes.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnknownWindow(_) => "UI_UNKNOWN_WINDOW",
            Self::UnknownNode(_) => "UI_UNKNOWN_NODE",
            Self::NotAContainer { .. } => "UI_NOT_A_CONTAINER",
            Self::CellOccupied(_) => "UI_CELL_OCCUPIED",
            Self::InvalidPercent(_) => "UI_INVALID_PERCENT",
        }
    }

    /// Stale ids are expected after windows are pruned; everything else means
    /// the caller built the tree wrong.
    pub const fn is_stale_id(&self) -> bool {
        matches!(self, Self::UnknownWindow(_) | Self::UnknownNode(_))
    }
}
