//! Pluggable key/value serialization
//!
//! The store treats keys and values as opaque byte blobs produced by
//! an [`Encoder`]. Two keys are equal for storage purposes iff their
//! encoded byte forms are equal, so the encoder MUST be deterministic
//! for keys; values only need to round-trip.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StoreError};

/// Serialization seam between user types and stored bytes
pub trait Encoder {
    /// Encode a value to bytes. Must be deterministic for key types:
    /// equal keys encode to identical bytes.
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>>;

    /// Decode a value from bytes previously produced by `encode`
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T>;
}

/// Default encoder backed by bincode (compact, deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeEncoder;

impl Encoder for BincodeEncoder {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        bincode::serialize(value).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        bincode::deserialize(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}
