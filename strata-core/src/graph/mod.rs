//! Dependency Graph
//!
//! This module implements a dependency graph between opaque 64-bit vertex
//! identifiers, designed to be shared across threads behind a single
//! readers-writer lock.
//!
//! # Overview
//!
//! The graph is a mapping from vertex id to its set of outgoing dependency
//! edges. A vertex present in the mapping is "known"; an id that appears
//! only inside some other vertex's edge set is a *dangling* dependency.
//! Cycles and dangling references may exist in storage; only resolution
//! rejects them.
//!
//! # Design Decisions
//!
//! 1. All graph state lives behind one `RwLock`. Mutation takes the write
//!    lock, every read takes the read lock, and neither the lock guard nor
//!    the raw map ever escapes the store module.
//!
//! 2. Resolution and cloning snapshot the store under the read lock and then
//!    work on private data, so long-running computations never block writers
//!    beyond the copy step.
//!
//! 3. Every externally observable ordering (iteration, edge lists, batches,
//!    the display form) is ascending-numeric. Output is deterministic for a
//!    given graph content regardless of hash-map iteration order.

mod codec;
mod error;
mod resolve;
mod store;

pub use error::CodecError;
pub use store::DependencyGraph;
