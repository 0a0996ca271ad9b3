//! Namespace handle resolution.
//!
//! Plan statements never reference namespace paths as raw strings; every
//! distinct dotted path segment is materialized exactly once per run as a
//! [`NamespaceHandle`] chained to its parent. The table is an explicit context
//! object threaded through plan building, so repeated runs in one process
//! (tests, long-lived services) stay isolated.

use std::collections::HashMap;

/// Identifier of a materialized namespace handle, unique within one run.
pub type HandleId = usize;

/// A materialized reference to one resolved namespace path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceHandle {
    pub id: HandleId,
    /// The final segment this handle names (e.g. `b` for `a.b`).
    pub segment: String,
    /// Full dotted path up to and including this segment.
    pub path: String,
    /// Parent handle, `None` for top-level segments (parented to root).
    pub parent: Option<HandleId>,
}

/// Per-run table of namespace handles. First creation of a segment wins;
/// later lookups of the same path reuse the existing handle.
#[derive(Debug, Default)]
pub struct NamespaceTable {
    handles: Vec<NamespaceHandle>,
    by_path: HashMap<String, HandleId>,
    /// Creation order of newly materialized handles since the last drain.
    pending: Vec<HandleId>,
}

impl NamespaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a dotted path, materializing any not-yet-created segments.
    ///
    /// Returns `None` for the empty path (items registered at root).
    pub fn resolve(&mut self, dotted_path: &str) -> Option<HandleId> {
        if dotted_path.is_empty() {
            return None;
        }

        let mut parent: Option<HandleId> = None;
        let mut path = String::new();
        for segment in dotted_path.split('.') {
            if !path.is_empty() {
                path.push('.');
            }
            path.push_str(segment);

            parent = Some(match self.by_path.get(&path) {
                Some(&id) => id,
                None => {
                    let id = self.handles.len();
                    self.handles.push(NamespaceHandle {
                        id,
                        segment: segment.to_string(),
                        path: path.clone(),
                        parent,
                    });
                    self.by_path.insert(path.clone(), id);
                    self.pending.push(id);
                    id
                }
            });
        }
        parent
    }

    pub fn get(&self, id: HandleId) -> &NamespaceHandle {
        &self.handles[id]
    }

    /// Handles materialized since the last call, in creation order.
    ///
    /// The plan builder drains these into `CreateNamespaceHandle` statements
    /// ahead of the statements that reference them.
    pub fn drain_pending(&mut self) -> Vec<NamespaceHandle> {
        let pending = std::mem::take(&mut self.pending);
        pending.into_iter().map(|id| self.handles[id].clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_handle_per_distinct_segment() {
        let mut table = NamespaceTable::new();
        table.resolve("a");
        table.resolve("a.b");
        table.resolve("a.b.c");

        // Exactly three handles, each parented to the preceding segment.
        assert_eq!(table.len(), 3);
        let created = table.drain_pending();
        assert_eq!(created[0].path, "a");
        assert_eq!(created[0].parent, None);
        assert_eq!(created[1].path, "a.b");
        assert_eq!(created[1].parent, Some(created[0].id));
        assert_eq!(created[2].path, "a.b.c");
        assert_eq!(created[2].parent, Some(created[1].id));
    }

    #[test]
    fn deep_path_materializes_intermediate_segments() {
        let mut table = NamespaceTable::new();
        let leaf = table.resolve("x.y.z").unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(leaf).path, "x.y.z");
    }

    #[test]
    fn repeated_resolution_reuses_handles() {
        let mut table = NamespaceTable::new();
        let first = table.resolve("game.ui");
        table.drain_pending();
        let second = table.resolve("game.ui");

        assert_eq!(first, second);
        assert!(table.drain_pending().is_empty());
    }

    #[test]
    fn empty_path_is_root() {
        let mut table = NamespaceTable::new();
        assert_eq!(table.resolve(""), None);
        assert!(table.is_empty());
    }
}
