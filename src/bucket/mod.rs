//! Bucket file layer
//!
//! On-disk representation of a single bucket: the binary container
//! format and the crash-safe write protocol.
//!
//! ## Responsibilities
//! - Encode/decode the bucket container (codec)
//! - Atomic write via temp file + rename (file)
//! - Temp-file naming shared by writer and directory scan
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ Header                                   │
//! │ ┌───────────┬────────────────────┐       │
//! │ │ Magic (4) │ Format Version (4) │       │
//! │ └───────────┴────────────────────┘       │
//! ├──────────────────────────────────────────┤
//! │ Payload (bincode)                        │
//! │   schema_version: u32                    │
//! │   records: map<key-bytes, Record>        │
//! │     Record = (created_ms, expires_ms?,   │
//! │               value-bytes)               │
//! └──────────────────────────────────────────┘
//! ```

mod codec;
mod file;

pub use codec::{BucketContents, Record, FORMAT_VERSION, HEADER_SIZE, MAGIC};
pub use file::{is_temp_name, remove_if_exists, temp_path, write_atomic, TEMP_PREFIX};
