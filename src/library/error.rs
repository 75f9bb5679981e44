use std::path::PathBuf;

use super::model::NodeId;

/// Errors surfaced by `LibraryTree` operations.
///
/// All variants are recoverable: none of them leaves already-loaded parts of
/// the tree in an inconsistent state.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// Listing a directory failed. The directory stays unloaded so a later
    /// retry can succeed once the fault clears.
    #[error("failed to list {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The node does not exist in the tree or an ancestor is collapsed.
    #[error("node is not visible: {0}")]
    NotFound(NodeId),

    /// Expand/collapse was requested on a track.
    #[error("not a directory: {0}")]
    NotExpandable(NodeId),
}
