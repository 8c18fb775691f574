//! Graph Store
//!
//! The store owns all graph state: a mapping from vertex id to its set of
//! dependency ids, guarded by a readers-writer lock.
//!
//! # Locking Discipline
//!
//! A small set of locked primitives (`replace`, `delete`, `peek`,
//! `sorted_ids`, `snapshot`, `reset`) is the only code that touches the
//! lock. Everything else (the public query layer, resolution, the codecs)
//! composes those primitives, so the invariant "all mutation is exclusive,
//! all reads are shared" is enforced in one place.
//!
//! # Iteration
//!
//! `iter` returns an eager ascending snapshot of the vertex ids, taken once
//! under the read lock and then walked lock-free. The iteration sees an
//! immutable picture of the graph; abandoning it early holds nothing.

use std::collections::{HashMap, HashSet};
use std::fmt;

use parking_lot::RwLock;
use tracing::trace;

/// A thread-safe directed dependency graph over opaque `u64` identifiers.
///
/// Vertices carry no payload beyond their id. Each vertex owns a set of
/// outgoing dependency edges; re-inserting a vertex replaces its entire
/// edge set, and removing a vertex leaves references to it from other
/// vertices in place (they become dangling).
///
/// All methods take `&self`: the store is internally synchronized, so a
/// single instance can be shared across threads (typically behind an
/// `Arc`).
///
/// # Example
///
/// ```rust,ignore
/// let graph = DependencyGraph::new();
/// graph.insert(8, [7, 5]);
/// graph.insert(7, []);
/// graph.insert(5, []);
///
/// assert_eq!(graph.edges(8), vec![5, 7]);
/// ```
pub struct DependencyGraph {
    /// Vertex id to its set of outgoing dependency edges. The lock guard
    /// never escapes this module.
    graph: RwLock<HashMap<u64, HashSet<u64>>>,
}

impl DependencyGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            graph: RwLock::new(HashMap::new()),
        }
    }

    // ------------------------------------------------------------------
    // Locked primitives
    // ------------------------------------------------------------------

    /// Unconditionally overwrite the edge set for `ptr`, creating the
    /// vertex if it does not exist.
    fn replace(&self, ptr: u64, deps: HashSet<u64>) {
        self.graph.write().insert(ptr, deps);
    }

    /// Delete the vertex `ptr`. No-op if it does not exist.
    fn delete(&self, ptr: u64) {
        self.graph.write().remove(&ptr);
    }

    /// Cloned edge set for `ptr`, or `None` when the vertex is unknown.
    fn peek(&self, ptr: u64) -> Option<HashSet<u64>> {
        self.graph.read().get(&ptr).cloned()
    }

    /// Fresh ascending snapshot of all known vertex ids.
    fn sorted_ids(&self) -> Vec<u64> {
        let graph = self.graph.read();
        let mut ids: Vec<u64> = graph.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Deep snapshot of the whole store. Resolution, cloning, and the
    /// codecs start from this so they can work without holding the lock.
    pub(crate) fn snapshot(&self) -> HashMap<u64, HashSet<u64>> {
        self.graph.read().clone()
    }

    /// Destructively replace the whole store with `graph`.
    pub(crate) fn reset(&self, graph: HashMap<u64, HashSet<u64>>) {
        *self.graph.write() = graph;
    }

    // ------------------------------------------------------------------
    // Query layer
    // ------------------------------------------------------------------

    /// Insert `ptr` as a vertex with the given dependency edges.
    ///
    /// Duplicate dependencies are collapsed. If the vertex already exists,
    /// its entire edge set is overwritten (no merge).
    pub fn insert(&self, ptr: u64, deps: impl IntoIterator<Item = u64>) {
        let deps: HashSet<u64> = deps.into_iter().collect();
        trace!("insert vertex {} with {} edges", ptr, deps.len());
        self.replace(ptr, deps);
    }

    /// Remove the vertex `ptr` from the graph.
    ///
    /// References to `ptr` from other vertices' edge sets are left in place
    /// and become dangling. Removing an unknown vertex is a no-op.
    pub fn remove(&self, ptr: u64) {
        trace!("remove vertex {}", ptr);
        self.delete(ptr);
    }

    /// Number of known vertices.
    pub fn len(&self) -> usize {
        self.graph.read().len()
    }

    /// Whether the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.graph.read().is_empty()
    }

    /// Whether `ptr` is a known vertex.
    pub fn contains(&self, ptr: u64) -> bool {
        self.graph.read().contains_key(&ptr)
    }

    /// Direct dependency edges of `ptr`, in ascending order.
    ///
    /// Returns an empty vector when the vertex is unknown or has no
    /// dependencies; the two cases are not distinguished.
    pub fn edges(&self, ptr: u64) -> Vec<u64> {
        let mut deps: Vec<u64> = self
            .peek(ptr)
            .map(|set| set.into_iter().collect())
            .unwrap_or_default();
        deps.sort_unstable();
        deps
    }

    /// All dependencies of `ptr`, direct and transitive, in ascending order
    /// without duplicates.
    ///
    /// The closure is computed with an explicit worklist rather than
    /// recursion. Returns `None` when a cycle is reachable from `ptr`;
    /// dangling dependency ids are included in the result (they contribute
    /// nothing deeper). An unknown `ptr` yields `Some(vec![])`.
    pub fn dependencies(&self, ptr: u64) -> Option<Vec<u64>> {
        let graph = self.graph.read();

        enum Frame {
            Enter(u64),
            Exit(u64),
        }

        let mut collected: HashSet<u64> = HashSet::new();
        let mut expanded: HashSet<u64> = HashSet::new();
        // Vertices whose expansion is still in progress. An edge back into
        // this set is a cycle.
        let mut on_path: HashSet<u64> = HashSet::new();
        let mut stack = vec![Frame::Enter(ptr)];

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter(node) => {
                    if expanded.contains(&node) {
                        continue;
                    }
                    if !on_path.insert(node) {
                        return None;
                    }
                    stack.push(Frame::Exit(node));

                    if let Some(deps) = graph.get(&node) {
                        for &dep in deps {
                            collected.insert(dep);
                            if !expanded.contains(&dep) {
                                stack.push(Frame::Enter(dep));
                            }
                        }
                    }
                }
                Frame::Exit(node) => {
                    on_path.remove(&node);
                    expanded.insert(node);
                }
            }
        }

        let mut deps: Vec<u64> = collected.into_iter().collect();
        deps.sort_unstable();
        Some(deps)
    }

    /// Iterate over all vertex ids in ascending order.
    ///
    /// The ids are snapshotted once under the read lock; the returned
    /// iterator is lock-free and unaffected by concurrent mutation.
    pub fn iter(&self) -> impl Iterator<Item = u64> {
        self.sorted_ids().into_iter()
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DependencyGraph {
    /// Deep copy: every edge set is value-cloned into a brand-new store
    /// with its own lock. The clone shares no state with the source.
    fn clone(&self) -> Self {
        Self {
            graph: RwLock::new(self.snapshot()),
        }
    }
}

impl PartialEq for DependencyGraph {
    /// Content equality: same vertices with the same edge sets.
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        // Snapshot one side first so only one lock is held at a time.
        let lhs = self.snapshot();
        lhs == *other.graph.read()
    }
}

impl Eq for DependencyGraph {}

impl fmt::Display for DependencyGraph {
    /// Renders `DependencyGraph{e1, e2, ...}` with vertices in ascending
    /// order. A vertex with dependencies renders as `id:[d1 d2 ...]` with
    /// ascending deps; a vertex without renders as the bare id.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let graph = self.graph.read();
        let mut ids: Vec<u64> = graph.keys().copied().collect();
        ids.sort_unstable();

        write!(f, "DependencyGraph{{")?;
        for (i, ptr) in ids.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }

            let mut deps: Vec<u64> = graph[ptr].iter().copied().collect();
            if deps.is_empty() {
                write!(f, "{}", ptr)?;
                continue;
            }

            deps.sort_unstable();
            write!(f, "{}:[", ptr)?;
            for (j, dep) in deps.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", dep)?;
            }
            write!(f, "]")?;
        }
        write!(f, "}}")
    }
}

impl fmt::Debug for DependencyGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
