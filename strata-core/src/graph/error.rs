//! Codec error type.

use thiserror::Error;

/// Errors produced when translating a graph to or from an external codec.
///
/// Graph operations themselves never fail; the only fallible surface is the
/// boundary with the serialization formats. A failed decode leaves the
/// target graph unmodified.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodecError {
    /// The JSON codec rejected the data.
    #[error("JSON codec failed: {0}")]
    Json(#[from] serde_json::Error),

    /// MessagePack encoding failed.
    #[error("MessagePack encoding failed: {0}")]
    BinaryEncode(#[from] rmp_serde::encode::Error),

    /// MessagePack decoding failed.
    #[error("MessagePack decoding failed: {0}")]
    BinaryDecode(#[from] rmp_serde::decode::Error),
}
