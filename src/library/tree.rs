//! The library tree proper: lazy loading, expand/collapse, the flattened
//! render projection and focus tracking.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use super::error::TreeError;
use super::listing::{DirectoryLister, TrackClassifier};
use super::model::{DirectoryState, Node, NodeId, NodeKind, TrackMeta};

/// Direction for [`LibraryTree::move_focus`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusDirection {
    Up,
    Down,
}

/// One renderable row of the flattened tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatRow {
    pub id: NodeId,
    /// 0 for children of the root (the root itself is never a row).
    pub depth: usize,
    /// `last_at_depth[d]` reports whether the ancestor-or-self at depth `d`
    /// is the last of its siblings. Drives the branch glyphs: a `│`
    /// continuation is drawn for every `false` ancestor entry, and the row
    /// itself gets `└` instead of `├` when the final entry is `true`.
    pub last_at_depth: Vec<bool>,
}

impl FlatRow {
    /// Whether this row is the last among its own siblings.
    pub fn is_last_sibling(&self) -> bool {
        self.last_at_depth.last().copied().unwrap_or(true)
    }
}

/// The in-memory library tree: owns every node, mediates lazy loading, and
/// answers "what should be drawn" and "what is focused" without callers
/// walking pointers themselves.
pub struct LibraryTree {
    root: NodeId,
    nodes: HashMap<NodeId, Node>,
    focused: Option<NodeId>,
}

impl LibraryTree {
    /// Create a tree rooted at `root`. Performs no I/O: the root directory
    /// starts expanded but unloaded, so nothing is visible until the first
    /// [`ensure_loaded`](Self::ensure_loaded) call succeeds.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = NodeId::new(root.as_ref());
        let name = root
            .as_path()
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.to_string());

        let mut nodes = HashMap::new();
        nodes.insert(
            root.clone(),
            Node {
                id: root.clone(),
                parent: None,
                name,
                kind: NodeKind::Directory(DirectoryState {
                    expanded: true,
                    loaded: false,
                    children: Vec::new(),
                }),
            },
        );

        Self {
            root,
            nodes,
            focused: None,
        }
    }

    pub fn root_id(&self) -> &NodeId {
        &self.root
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Load the children of `id` if it is a directory that has never been
    /// listed. Already-loaded directories and tracks are a no-op.
    ///
    /// The listing is committed in full or not at all: child nodes, the
    /// ordered `children` list and the `loaded` flag only change after the
    /// collaborator returned a complete listing. On failure the directory
    /// stays unloaded so the caller can retry once the fault clears.
    pub fn ensure_loaded(
        &mut self,
        id: &NodeId,
        lister: &dyn DirectoryLister,
        classifier: &TrackClassifier,
    ) -> Result<(), TreeError> {
        let Some(node) = self.nodes.get(id) else {
            return Err(TreeError::NotFound(id.clone()));
        };
        match &node.kind {
            NodeKind::Track(_) => return Ok(()),
            NodeKind::Directory(state) if state.loaded => return Ok(()),
            NodeKind::Directory(_) => {}
        }

        let entries = lister.list(id.as_path()).map_err(|source| TreeError::Io {
            path: id.as_path().to_path_buf(),
            source,
        })?;

        let mut children: Vec<Node> = entries
            .into_iter()
            .filter_map(|entry| {
                let kind = if entry.is_dir {
                    NodeKind::Directory(DirectoryState::default())
                } else if classifier.is_track(&entry.name) {
                    NodeKind::Track(TrackMeta {
                        size: entry.size,
                        duration: None,
                    })
                } else {
                    // Neither a directory nor audio: not part of the library.
                    return None;
                };

                Some(Node {
                    id: id.child(&entry.name),
                    parent: Some(id.clone()),
                    name: entry.name,
                    kind,
                })
            })
            .collect();

        // Directories first, then case-insensitive by name; the raw name
        // breaks ties so the order (and the last-sibling marker) is total.
        children.sort_by(|a, b| {
            a.is_track()
                .cmp(&b.is_track())
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
                .then_with(|| a.name.cmp(&b.name))
        });

        let ids: Vec<NodeId> = children.iter().map(|child| child.id.clone()).collect();
        for child in children {
            self.nodes.insert(child.id.clone(), child);
        }
        // Commit point: only now does the directory count as loaded.
        if let Some(node) = self.nodes.get_mut(id) {
            if let NodeKind::Directory(state) = &mut node.kind {
                state.children = ids;
                state.loaded = true;
            }
        }

        Ok(())
    }

    /// Flip `expanded` on a directory, loading its children first when it has
    /// never been listed. Returns the new expanded state.
    ///
    /// When the initial listing fails the flip is not committed, so the next
    /// toggle retries the listing instead of collapsing an empty shell.
    /// Collapsing a directory that contains the focused node pulls focus up
    /// to the directory itself, keeping the focused node visible.
    pub fn toggle_expand(
        &mut self,
        id: &NodeId,
        lister: &dyn DirectoryLister,
        classifier: &TrackClassifier,
    ) -> Result<bool, TreeError> {
        let expanded = match self.nodes.get(id) {
            None => return Err(TreeError::NotFound(id.clone())),
            Some(node) => match &node.kind {
                NodeKind::Track(_) => return Err(TreeError::NotExpandable(id.clone())),
                NodeKind::Directory(state) => state.expanded,
            },
        };

        if !expanded {
            self.ensure_loaded(id, lister, classifier)?;
        }

        let now_expanded = !expanded;
        if let Some(node) = self.nodes.get_mut(id) {
            if let NodeKind::Directory(state) = &mut node.kind {
                state.expanded = now_expanded;
            }
        }

        if !now_expanded {
            if let Some(focused) = self.focused.clone() {
                if self.is_descendant_of(&focused, id) {
                    self.focused = Some(id.clone());
                }
            }
        }

        Ok(now_expanded)
    }

    /// Iterate the currently visible rows in render order.
    ///
    /// Pure projection of committed state: no I/O, restartable, and
    /// deterministic until the next mutation. The root is not yielded; its
    /// children sit at depth 0.
    pub fn flatten(&self) -> Flatten<'_> {
        let mut stack = Vec::new();
        if let Some(NodeKind::Directory(state)) = self.nodes.get(&self.root).map(|n| &n.kind) {
            if state.expanded && !state.children.is_empty() {
                stack.push((state.children.as_slice(), 0));
            }
        }
        Flatten { tree: self, stack }
    }

    /// Move focus one row up or down in the current flatten order, clamping
    /// at the first and last rows (no wrap). With no current focus, either
    /// direction lands on the first visible row. Returns the focused id,
    /// `None` when nothing is visible.
    pub fn move_focus(&mut self, direction: FocusDirection) -> Option<NodeId> {
        let target = match self.focused.clone() {
            None => self.flatten().next().map(|row| row.id),
            Some(current) => {
                let mut previous: Option<NodeId> = None;
                let mut take_next = false;
                let mut target = current.clone();
                for row in self.flatten() {
                    if take_next {
                        target = row.id;
                        break;
                    }
                    if row.id == current {
                        match direction {
                            FocusDirection::Up => {
                                if let Some(prev) = previous {
                                    target = prev;
                                }
                                break;
                            }
                            FocusDirection::Down => take_next = true,
                        }
                    } else {
                        previous = Some(row.id);
                    }
                }
                Some(target)
            }
        };

        self.focused = target.clone();
        target
    }

    /// Focus `id`. Fails with [`TreeError::NotFound`] when the node is
    /// unknown or hidden behind a collapsed ancestor.
    pub fn set_focus(&mut self, id: &NodeId) -> Result<(), TreeError> {
        if !self.is_visible(id) {
            return Err(TreeError::NotFound(id.clone()));
        }
        self.focused = Some(id.clone());
        Ok(())
    }

    /// Whether `id` is currently part of the flattened view, i.e. it exists
    /// and every ancestor is expanded. The root itself is never a row.
    pub fn is_visible(&self, id: &NodeId) -> bool {
        if *id == self.root {
            return false;
        }
        let Some(node) = self.nodes.get(id) else {
            return false;
        };

        let mut current = node;
        while let Some(parent) = current.parent.as_ref() {
            let Some(parent_node) = self.nodes.get(parent) else {
                return false;
            };
            match &parent_node.kind {
                NodeKind::Directory(state) if state.expanded => current = parent_node,
                _ => return false,
            }
        }
        true
    }

    pub fn focused(&self) -> Option<&NodeId> {
        self.focused.as_ref()
    }

    pub fn focused_node(&self) -> Option<&Node> {
        self.focused.as_ref().and_then(|id| self.nodes.get(id))
    }

    /// The focused node when it is a track: the hand-off point to playback.
    pub fn selected_track(&self) -> Option<&Node> {
        self.focused_node().filter(|node| node.is_track())
    }

    /// Record a probed duration on a track node. No-op for directories and
    /// unknown ids.
    pub fn set_track_duration(&mut self, id: &NodeId, duration: Duration) {
        if let Some(node) = self.nodes.get_mut(id) {
            if let NodeKind::Track(meta) = &mut node.kind {
                meta.duration = Some(duration);
            }
        }
    }

    fn is_descendant_of(&self, id: &NodeId, ancestor: &NodeId) -> bool {
        let mut current = self.nodes.get(id).and_then(|node| node.parent.as_ref());
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.nodes.get(parent).and_then(|node| node.parent.as_ref());
        }
        false
    }
}

/// Lazy depth-first walk over the visible rows, produced by
/// [`LibraryTree::flatten`].
pub struct Flatten<'tree> {
    tree: &'tree LibraryTree,
    /// One frame per directory level: the sibling list being walked and the
    /// index of the next child to yield.
    stack: Vec<(&'tree [NodeId], usize)>,
}

impl Iterator for Flatten<'_> {
    type Item = FlatRow;

    fn next(&mut self) -> Option<FlatRow> {
        let tree = self.tree;
        loop {
            let (siblings, index) = self.stack.last_mut()?;
            if *index >= siblings.len() {
                self.stack.pop();
                continue;
            }
            let id = siblings[*index].clone();
            *index += 1;

            // After the increment, every frame's index points one past the
            // entry currently on the walk path, so "is last" falls out of a
            // length comparison.
            let last_at_depth: Vec<bool> = self
                .stack
                .iter()
                .map(|(level, next)| *next >= level.len())
                .collect();
            let depth = self.stack.len() - 1;

            // Descend into expanded directories before the next sibling.
            if let Some(NodeKind::Directory(state)) = tree.node(&id).map(|n| &n.kind) {
                if state.expanded && !state.children.is_empty() {
                    self.stack.push((state.children.as_slice(), 0));
                }
            }

            return Some(FlatRow {
                id,
                depth,
                last_at_depth,
            });
        }
    }
}
