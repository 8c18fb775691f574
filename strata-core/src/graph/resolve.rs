//! Batch Resolution
//!
//! Resolution turns the graph into a deterministic topological order using
//! repeated ready-set extraction (Kahn's algorithm).
//!
//! # Algorithm
//!
//! 1. Snapshot the store into a private working copy; the source is only
//!    locked for the copy step.
//! 2. Collect every vertex whose edge set is empty (the "ready" set).
//! 3. If the working copy is nonempty but nothing is ready, the graph holds
//!    a cycle or a dangling dependency and can never resolve: fail.
//! 4. Sort the ready set ascending and emit it as the next batch.
//! 5. Delete the ready vertices and subtract them from every remaining
//!    edge set, then repeat from step 2 until the working copy is empty.
//!
//! Batches are totally ordered; vertices within a batch are mutually
//! independent and can be processed concurrently. Determinism comes purely
//! from sorting, never from map iteration order.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::DependencyGraph;

impl DependencyGraph {
    /// Resolve the graph into ordered batches of vertex ids.
    ///
    /// Each batch holds the vertices that become ready at the same round,
    /// sorted ascending. Every vertex appears in a batch strictly after all
    /// of its dependencies.
    ///
    /// Returns `None` when the graph cannot be resolved because it contains
    /// a cycle or a dangling dependency; no partial result is produced and
    /// the offending vertices are not identified.
    pub fn resolve_batches(&self) -> Option<Vec<Vec<u64>>> {
        let mut working: HashMap<u64, HashSet<u64>> = self.snapshot();
        let mut batches: Vec<Vec<u64>> = Vec::new();

        while !working.is_empty() {
            // Every vertex with zero unresolved dependencies is ready.
            let mut ready: Vec<u64> = working
                .iter()
                .filter(|(_, deps)| deps.is_empty())
                .map(|(&ptr, _)| ptr)
                .collect();

            // Nothing ready in a nonempty graph: a cycle, or an edge to a
            // vertex that does not exist and so can never become ready.
            if ready.is_empty() {
                debug!(
                    "graph is unresolvable with {} vertices remaining",
                    working.len()
                );
                return None;
            }

            ready.sort_unstable();

            let resolved: HashSet<u64> = ready.iter().copied().collect();
            for ptr in &ready {
                working.remove(ptr);
            }
            for deps in working.values_mut() {
                deps.retain(|dep| !resolved.contains(dep));
            }

            batches.push(ready);
        }

        Some(batches)
    }

    /// Resolve the graph into a single flat processing order.
    ///
    /// This is `resolve_batches` flattened: batch order is preserved and
    /// vertices within a batch stay in ascending order, so the output is
    /// fully deterministic for a given graph content.
    ///
    /// Returns `None` when the graph cannot be resolved.
    pub fn resolve(&self) -> Option<Vec<u64>> {
        let batches = self.resolve_batches()?;

        let total = batches.iter().map(Vec::len).sum();
        let mut resolved: Vec<u64> = Vec::with_capacity(total);
        for batch in batches {
            resolved.extend(batch);
        }

        Some(resolved)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
