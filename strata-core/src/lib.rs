//! Strata Core
//!
//! This crate provides a thread-safe directed dependency graph over opaque
//! 64-bit identifiers. It implements:
//!
//! - A readers-writer-locked graph store (insert, remove, query)
//! - Transitive dependency queries
//! - Deterministic topological resolution into ordered "ready" batches
//! - Codec adapters for a structured text format (JSON) and a compact
//!   binary format (MessagePack)
//!
//! The resolved batches are the classic input to a parallel build or compile
//! scheduler: each batch can be processed concurrently once every earlier
//! batch has completed.
//!
//! # Architecture
//!
//! The crate is a single module tree:
//!
//! - `graph`: the graph store, query layer, batch resolution, and codecs
//!
//! # Example
//!
//! ```rust,ignore
//! use strata_core::DependencyGraph;
//!
//! let graph = DependencyGraph::new();
//! graph.insert(1, [0, 2]);
//! graph.insert(0, []);
//! graph.insert(2, [0]);
//!
//! // [[0], [2], [1]]: 0 has no dependencies, 2 needs 0, 1 needs both
//! let batches = graph.resolve_batches();
//! ```

pub mod graph;

pub use graph::{CodecError, DependencyGraph};
