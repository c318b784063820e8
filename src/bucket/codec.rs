//! Bucket container codec
//!
//! Encoding and decoding of the bucket file container: a fixed header
//! identifying the layout, followed by a bincode payload.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Magic bytes identifying a dirkv bucket file
pub const MAGIC: [u8; 4] = *b"DKVB";

/// Container layout version, written by the codec itself.
/// Distinct from the caller-supplied schema version in the payload.
pub const FORMAT_VERSION: u32 = 1;

/// Header size: 4 bytes magic + 4 bytes format version
pub const HEADER_SIZE: usize = 8;

/// A single stored record
///
/// Timestamps are unix milliseconds — sub-second resolution so short
/// expirations round-trip exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// When the record was written (unix millis)
    pub created_ms: u64,

    /// When the record stops being live (unix millis), if ever
    pub expires_ms: Option<u64>,

    /// Encoded value bytes
    pub value: Vec<u8>,
}

impl Record {
    /// Create a record stamped at `now_ms`, expiring after `max_age`
    /// if one is given
    pub fn new(value: Vec<u8>, now_ms: u64, max_age: Option<Duration>) -> Self {
        Self {
            created_ms: now_ms,
            expires_ms: max_age.map(|age| now_ms + age.as_millis() as u64),
            value,
        }
    }

    /// Whether the record is past its expiration at `now_ms`
    pub fn is_expired(&self, now_ms: u64) -> bool {
        matches!(self.expires_ms, Some(expires) if now_ms >= expires)
    }
}

/// Decoded contents of one bucket file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketContents {
    /// Caller-controlled cache-generation tag
    pub schema_version: u32,

    /// Records keyed by encoded key bytes
    pub records: HashMap<Vec<u8>, Record>,
}

impl BucketContents {
    /// Encode to the on-disk container format
    ///
    /// Format: magic (4) + format_version (4, big-endian) + bincode payload
    pub fn encode(&self) -> Result<Vec<u8>> {
        let payload =
            bincode::serialize(self).map_err(|e| StoreError::Serialization(e.to_string()))?;

        let mut bytes = Vec::with_capacity(HEADER_SIZE + payload.len());
        bytes.extend_from_slice(&MAGIC);
        bytes.extend_from_slice(&FORMAT_VERSION.to_be_bytes());
        bytes.extend_from_slice(&payload);

        Ok(bytes)
    }

    /// Decode from the on-disk container format
    ///
    /// Fails with `CorruptBucket` on a short header, wrong magic, an
    /// unrecognized format version, or a payload bincode cannot parse.
    /// An unknown format version is never decoded by guesswork.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(StoreError::CorruptBucket(format!(
                "incomplete header: expected {} bytes, got {}",
                HEADER_SIZE,
                bytes.len()
            )));
        }

        if bytes[0..4] != MAGIC {
            return Err(StoreError::CorruptBucket(
                "bad magic: not a bucket file".to_string(),
            ));
        }

        let format_version = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        if format_version != FORMAT_VERSION {
            return Err(StoreError::CorruptBucket(format!(
                "unknown format version: {} (expected {})",
                format_version, FORMAT_VERSION
            )));
        }

        bincode::deserialize(&bytes[HEADER_SIZE..])
            .map_err(|e| StoreError::CorruptBucket(format!("payload: {}", e)))
    }
}
