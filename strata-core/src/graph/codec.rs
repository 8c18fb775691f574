//! Graph Codecs
//!
//! The graph exchanges data with external codecs through one canonical
//! shape: a mapping from vertex id to its ascending dependency list. Two
//! codecs consume and produce that mapping here: JSON as the structured
//! text format and MessagePack as the compact binary format. Nothing about
//! wire layout leaks into the graph itself.
//!
//! Both directions tolerate cycles and dangling references; encoding and
//! decoding never invoke resolution. The in-place `load_*` entry points
//! parse the full mapping before touching the graph, so a failed decode
//! leaves existing state intact.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use super::error::CodecError;
use super::DependencyGraph;

impl DependencyGraph {
    /// Snapshot the graph as the canonical interchange mapping: vertex id
    /// to its dependency ids in ascending order.
    pub fn encode(&self) -> BTreeMap<u64, Vec<u64>> {
        self.snapshot()
            .into_iter()
            .map(|(ptr, deps)| {
                let mut deps: Vec<u64> = deps.into_iter().collect();
                deps.sort_unstable();
                (ptr, deps)
            })
            .collect()
    }

    /// Build a fresh graph from the canonical mapping. Each entry becomes a
    /// vertex with exactly the given dependency list.
    pub fn from_mapping(mapping: BTreeMap<u64, Vec<u64>>) -> Self {
        let graph = Self::new();
        graph.load_mapping(mapping);
        graph
    }

    /// Destructively reset this graph to the mapping's content.
    pub fn load_mapping(&self, mapping: BTreeMap<u64, Vec<u64>>) {
        let graph: HashMap<u64, HashSet<u64>> = mapping
            .into_iter()
            .map(|(ptr, deps)| (ptr, deps.into_iter().collect()))
            .collect();
        self.reset(graph);
    }

    /// Encode the graph as a JSON object keyed by vertex id.
    pub fn to_json(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string(&self.encode())?)
    }

    /// Decode a fresh graph from JSON.
    pub fn from_json(data: &str) -> Result<Self, CodecError> {
        let mapping: BTreeMap<u64, Vec<u64>> = serde_json::from_str(data)?;
        Ok(Self::from_mapping(mapping))
    }

    /// Decode JSON into this graph, replacing its content. On error the
    /// graph is left unmodified.
    pub fn load_json(&self, data: &str) -> Result<(), CodecError> {
        let mapping: BTreeMap<u64, Vec<u64>> = serde_json::from_str(data)?;
        self.load_mapping(mapping);
        Ok(())
    }

    /// Encode the graph as MessagePack bytes.
    pub fn to_msgpack(&self) -> Result<Vec<u8>, CodecError> {
        Ok(rmp_serde::to_vec(&self.encode())?)
    }

    /// Decode a fresh graph from MessagePack bytes.
    pub fn from_msgpack(data: &[u8]) -> Result<Self, CodecError> {
        let mapping: BTreeMap<u64, Vec<u64>> = rmp_serde::from_slice(data)?;
        Ok(Self::from_mapping(mapping))
    }

    /// Decode MessagePack bytes into this graph, replacing its content. On
    /// error the graph is left unmodified.
    pub fn load_msgpack(&self, data: &[u8]) -> Result<(), CodecError> {
        let mapping: BTreeMap<u64, Vec<u64>> = rmp_serde::from_slice(data)?;
        self.load_mapping(mapping);
        Ok(())
    }
}

impl Serialize for DependencyGraph {
    /// Serializes as the canonical mapping, so any serde codec plugs in.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.encode().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DependencyGraph {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mapping = BTreeMap::<u64, Vec<u64>>::deserialize(deserializer)?;
        Ok(Self::from_mapping(mapping))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
