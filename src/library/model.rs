//! Data types for the library tree: nodes, their identifiers and per-kind
//! state.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Stable identifier of a tree node: the entry's absolute path, built by
/// joining the parent's id with the entry name. Unique within a tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(PathBuf);

impl NodeId {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub(crate) fn child(&self, name: &str) -> Self {
        Self(self.0.join(name))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// One entry in the library tree: a directory or a track.
#[derive(Clone, Debug)]
pub struct Node {
    pub id: NodeId,
    /// Lookup-only back-reference; `None` for the root. The tree owns the
    /// node's lifetime.
    pub parent: Option<NodeId>,
    /// Display name (basename of the path).
    pub name: String,
    pub kind: NodeKind,
}

#[derive(Clone, Debug)]
pub enum NodeKind {
    Directory(DirectoryState),
    Track(TrackMeta),
}

/// Per-directory state. `loaded = false` means the directory has never been
/// listed; callers must not treat its empty `children` as final.
#[derive(Clone, Debug, Default)]
pub struct DirectoryState {
    pub expanded: bool,
    pub loaded: bool,
    /// Child ids in render order: directories first, then case-insensitive
    /// by name.
    pub children: Vec<NodeId>,
}

/// Per-track metadata. Size comes from the directory listing; duration stays
/// unknown until the track is probed.
#[derive(Clone, Copy, Debug, Default)]
pub struct TrackMeta {
    pub size: Option<u64>,
    pub duration: Option<Duration>,
}

impl Node {
    pub fn is_track(&self) -> bool {
        matches!(self.kind, NodeKind::Track(_))
    }

    pub fn directory(&self) -> Option<&DirectoryState> {
        match &self.kind {
            NodeKind::Directory(state) => Some(state),
            NodeKind::Track(_) => None,
        }
    }

    pub fn track_meta(&self) -> Option<&TrackMeta> {
        match &self.kind {
            NodeKind::Track(meta) => Some(meta),
            NodeKind::Directory(_) => None,
        }
    }
}
