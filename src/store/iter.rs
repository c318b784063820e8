//! Whole-store iteration
//!
//! Lazy scan over every bucket file in the store directory, yielding
//! all currently-live records. Leftover temp files from interrupted
//! writes are deleted along the way; anything else that is not a
//! bucket file is left alone.

use std::collections::hash_map;
use std::fs;
use std::io;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use tracing::trace;

use crate::bucket::{self, Record};
use crate::encoder::Encoder;
use crate::error::{Result, StoreError};
use crate::store::Store;

/// Iterator over all live `(key, value)` pairs of a store
///
/// One-shot and lazy: buckets are read as the iterator advances, so
/// records written or expired mid-iteration may or may not be seen.
/// Call [`Store::iter`] again for a fresh scan.
pub struct Iter<'a, E: Encoder, K, V> {
    store: &'a Store<E>,

    /// Remaining directory entries; `None` when the directory does
    /// not exist (an unwritten store is simply empty)
    entries: Option<fs::ReadDir>,

    /// Records of the bucket currently being drained
    pending: hash_map::IntoIter<Vec<u8>, Record>,

    /// Directory-open failure surfaced on the first `next()` call
    failed: Option<StoreError>,

    _types: PhantomData<fn() -> (K, V)>,
}

impl<'a, E: Encoder, K, V> Iter<'a, E, K, V> {
    pub(crate) fn new(store: &'a Store<E>) -> Self {
        let (entries, failed) = match fs::read_dir(store.dir()) {
            Ok(entries) => (Some(entries), None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => (None, None),
            Err(e) => (None, Some(e.into())),
        };

        Self {
            store,
            entries,
            pending: std::collections::HashMap::new().into_iter(),
            failed,
            _types: PhantomData,
        }
    }
}

impl<E, K, V> Iterator for Iter<'_, E, K, V>
where
    E: Encoder,
    K: DeserializeOwned,
    V: DeserializeOwned,
{
    type Item = Result<(K, V)>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.failed.take() {
            return Some(Err(err));
        }

        loop {
            // Drain the bucket loaded last, decoding as we go
            if let Some((key_bytes, record)) = self.pending.next() {
                let key = match self.store.encoder().decode(&key_bytes) {
                    Ok(key) => key,
                    Err(e) => return Some(Err(e)),
                };
                let value = match self.store.encoder().decode(&record.value) {
                    Ok(value) => value,
                    Err(e) => return Some(Err(e)),
                };
                return Some(Ok((key, value)));
            }

            // Advance to the next directory entry
            let entry = match self.entries.as_mut()?.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e.into())),
            };
            let path = entry.path();

            // Leftovers from interrupted writes are deleted on sight
            if bucket::is_temp_name(&entry.file_name()) {
                trace!(path = %path.display(), "removing stale temp file");
                if let Err(e) = bucket::remove_if_exists(&path) {
                    return Some(Err(e));
                }
                continue;
            }

            match entry.file_type() {
                Ok(file_type) if file_type.is_dir() => continue,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }

            match self.store.load_for_scan(&path) {
                Ok(records) => self.pending = records.into_iter(),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
