//! Store Module
//!
//! The orchestrator tying hashing, the bucket codec, and atomic
//! writes together.
//!
//! ## Responsibilities
//! - Resolve a key to its bucket file
//! - Load buckets, pruning expired and invalidated records
//! - Persist mutations atomically
//! - Enumerate all live records across buckets
//!
//! ## Concurrency Model
//!
//! Single-process, synchronous. The store holds no mutable state —
//! every operation re-reads its bucket from disk — so all methods
//! take `&self` without locks. Each operation is atomic at the
//! single-bucket level (a reader never sees a half-written file),
//! but two writers racing on the same bucket are last-writer-wins;
//! concurrent writers need an external lock this crate does not
//! provide.

mod iter;

pub use iter::Iter;

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::bucket::{self, BucketContents, Record};
use crate::config::Config;
use crate::encoder::{BincodeEncoder, Encoder};
use crate::error::{Result, StoreError};
use crate::hash;

/// Directory-backed key-value store
///
/// Keys and values are any types the encoder can handle; each record
/// optionally carries an expiration. Records land in one of 4096
/// bucket files chosen by a hash of the encoded key, so a lookup
/// touches at most one file.
pub struct Store<E: Encoder = BincodeEncoder> {
    /// Store configuration (directory + schema version)
    config: Config,

    /// Key/value serializer
    encoder: E,
}

impl Store<BincodeEncoder> {
    /// Open a store with the given config and the default encoder
    ///
    /// The directory is not touched here; it is created lazily on the
    /// first write.
    pub fn open(config: Config) -> Self {
        Self::with_encoder(config, BincodeEncoder)
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified directory
    pub fn open_path(path: impl Into<PathBuf>) -> Self {
        let config = Config::builder().dir(path).build();
        Self::open(config)
    }
}

impl<E: Encoder> Store<E> {
    /// Open a store with a custom encoder
    ///
    /// The encoder must encode keys deterministically: two keys are
    /// the same record iff their encoded bytes are equal.
    pub fn with_encoder(config: Config, encoder: E) -> Self {
        Self { config, encoder }
    }

    // =========================================================================
    // Public Operations
    // =========================================================================

    /// Set a value for a key, overwriting any existing record
    ///
    /// With `max_age` the record expires `max_age` after now; without
    /// it the record never expires. Expired siblings found in the
    /// bucket are dropped as part of the rewrite.
    pub fn set<K, V>(&self, key: &K, value: &V, max_age: Option<Duration>) -> Result<()>
    where
        K: Serialize + ?Sized,
        V: Serialize + ?Sized,
    {
        let key_bytes = self.encoder.encode(key)?;
        let value_bytes = self.encoder.encode(value)?;
        let path = self.bucket_path(&key_bytes);

        // No separate prune rewrite: the save below persists it anyway
        let mut records = self.load_pruned(&path, false)?;

        let now = now_ms();
        records.insert(key_bytes, Record::new(value_bytes, now, max_age));

        self.save_bucket(&path, records)?;
        Ok(())
    }

    /// Get the value for a key, `None` when no live record exists
    ///
    /// `max_age` is an independent read-side freshness filter: the
    /// record must have been created within the last `max_age`. It is
    /// NOT the same condition as the record's own expiration — a
    /// record passing its own `expires` can still be filtered out
    /// here, and the filter never deletes anything.
    pub fn get<K, V>(&self, key: &K, max_age: Option<Duration>) -> Result<Option<V>>
    where
        K: Serialize + ?Sized,
        V: DeserializeOwned,
    {
        match self.get_record(key, max_age)? {
            Some(record) => Ok(Some(self.encoder.decode(&record.value)?)),
            None => Ok(None),
        }
    }

    /// Get the value for a key, failing with `KeyNotFound` when no
    /// live record exists
    pub fn require<K, V>(&self, key: &K) -> Result<V>
    where
        K: Serialize + ?Sized,
        V: DeserializeOwned,
    {
        self.get(key, None)?.ok_or(StoreError::KeyNotFound)
    }

    /// Delete a key
    ///
    /// Idempotent: deleting an absent key is not an error. The bucket
    /// file is removed when its last record goes.
    pub fn delete<K>(&self, key: &K) -> Result<()>
    where
        K: Serialize + ?Sized,
    {
        let key_bytes = self.encoder.encode(key)?;
        let path = self.bucket_path(&key_bytes);

        let mut records = self.load_pruned(&path, false)?;
        records.remove(&key_bytes);

        self.save_bucket(&path, records)?;
        Ok(())
    }

    /// Check whether a live record exists for a key
    pub fn contains<K>(&self, key: &K) -> Result<bool>
    where
        K: Serialize + ?Sized,
    {
        Ok(self.get_record(key, None)?.is_some())
    }

    /// Iterate over all live `(key, value)` pairs in the store
    ///
    /// Performs a fresh directory scan per call; see [`Iter`] for the
    /// cleanup behavior along the way.
    pub fn iter<K, V>(&self) -> Iter<'_, E, K, V>
    where
        K: DeserializeOwned,
        V: DeserializeOwned,
    {
        Iter::new(self)
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the store directory path
    pub fn dir(&self) -> &Path {
        &self.config.dir
    }

    /// Get the configured schema version
    pub fn schema_version(&self) -> u32 {
        self.config.schema_version
    }

    /// Get the encoder
    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Resolve the bucket file path a key maps to
    pub fn bucket_path_for<K>(&self, key: &K) -> Result<PathBuf>
    where
        K: Serialize + ?Sized,
    {
        let key_bytes = self.encoder.encode(key)?;
        Ok(self.bucket_path(&key_bytes))
    }

    // =========================================================================
    // Internal
    // =========================================================================

    /// Look up a key's record, applying the read-side freshness filter
    ///
    /// Reads are allowed to rewrite the bucket: pruning is persisted
    /// here so expired siblings get evicted on access.
    fn get_record<K>(&self, key: &K, max_age: Option<Duration>) -> Result<Option<Record>>
    where
        K: Serialize + ?Sized,
    {
        let key_bytes = self.encoder.encode(key)?;
        let path = self.bucket_path(&key_bytes);

        let mut records = self.load_pruned(&path, true)?;

        let Some(record) = records.remove(&key_bytes) else {
            return Ok(None);
        };

        if let Some(age) = max_age {
            let min_created = now_ms().saturating_sub(age.as_millis() as u64);
            if record.created_ms < min_created {
                return Ok(None);
            }
        }

        Ok(Some(record))
    }

    /// Resolve encoded key bytes to the bucket file path
    fn bucket_path(&self, key_bytes: &[u8]) -> PathBuf {
        self.config.dir.join(hash::bucket_id(key_bytes))
    }

    /// Load a bucket and drop dead records (shared by all operations)
    ///
    /// - Missing file → empty bucket.
    /// - Stored schema version ≠ configured → the whole bucket is
    ///   stale; delete the file and treat as empty.
    /// - Undecodable bytes → the directory is cache-like state, not a
    ///   durability log: warn, delete, treat as empty.
    /// - Records past their expiration are dropped; when `persist` is
    ///   set and anything was dropped, the bucket is rewritten (or
    ///   the file removed if nothing remains).
    fn load_pruned(&self, path: &Path, persist: bool) -> Result<HashMap<Vec<u8>, Record>> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(e.into()),
        };

        let contents = match BucketContents::decode(&bytes) {
            Ok(contents) => contents,
            Err(StoreError::CorruptBucket(reason)) => {
                warn!(path = %path.display(), %reason, "discarding corrupt bucket file");
                bucket::remove_if_exists(path)?;
                return Ok(HashMap::new());
            }
            Err(e) => return Err(e),
        };

        if contents.schema_version != self.config.schema_version {
            debug!(
                path = %path.display(),
                stored = contents.schema_version,
                current = self.config.schema_version,
                "schema version mismatch, invalidating bucket"
            );
            bucket::remove_if_exists(path)?;
            return Ok(HashMap::new());
        }

        let mut records = contents.records;
        let now = now_ms();
        let live_before = records.len();
        records.retain(|_, record| !record.is_expired(now));

        if records.len() != live_before && persist {
            debug!(
                path = %path.display(),
                dropped = live_before - records.len(),
                "pruned expired records"
            );
            records = self.save_bucket(path, records)?;
        }

        Ok(records)
    }

    /// Persist a bucket atomically, handing the records back
    ///
    /// An empty bucket is never written as a file: the path is
    /// removed instead, so a present file always holds at least one
    /// record.
    fn save_bucket(
        &self,
        path: &Path,
        records: HashMap<Vec<u8>, Record>,
    ) -> Result<HashMap<Vec<u8>, Record>> {
        if records.is_empty() {
            bucket::remove_if_exists(path)?;
            return Ok(records);
        }

        let contents = BucketContents {
            schema_version: self.config.schema_version,
            records,
        };
        bucket::write_atomic(path, &contents.encode()?)?;

        Ok(contents.records)
    }

    /// Load a bucket for a directory scan
    ///
    /// Differs from the direct key path in two ways: a file that does
    /// not decode as a bucket is skipped and LEFT IN PLACE (this is
    /// how foreign files sharing the directory are tolerated), and
    /// pruning is in-memory only — the scan never rewrites buckets.
    pub(crate) fn load_for_scan(&self, path: &Path) -> Result<HashMap<Vec<u8>, Record>> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(e.into()),
        };

        let contents = match BucketContents::decode(&bytes) {
            Ok(contents) => contents,
            Err(StoreError::CorruptBucket(_)) => {
                debug!(path = %path.display(), "skipping non-bucket file");
                return Ok(HashMap::new());
            }
            Err(e) => return Err(e),
        };

        if contents.schema_version != self.config.schema_version {
            debug!(
                path = %path.display(),
                stored = contents.schema_version,
                current = self.config.schema_version,
                "schema version mismatch, invalidating bucket"
            );
            bucket::remove_if_exists(path)?;
            return Ok(HashMap::new());
        }

        let mut records = contents.records;
        let now = now_ms();
        records.retain(|_, record| !record.is_expired(now));

        Ok(records)
    }
}

/// Current wall-clock time as unix milliseconds
///
/// A pre-epoch clock reads as 0 rather than failing; expiration
/// comparisons degrade gracefully.
fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
