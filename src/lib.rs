//! # dirkv
//!
//! A directory-backed key-value store with:
//! - Hashed bucket files (one key lookup touches at most one file)
//! - Optional per-record expiration with lazy pruning
//! - Crash-safe atomic writes (temp file + rename)
//! - Schema versioning for wholesale cache invalidation
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Store                                │
//! │         (set / get / delete / contains / iter)               │
//! └───────┬───────────────────┬───────────────────┬─────────────┘
//!         │                   │                   │
//!         ▼                   ▼                   ▼
//!  ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//!  │  KeyHasher  │     │ RecordCodec │     │   Encoder   │
//!  │ (CRC32→id)  │     │  (bincode)  │     │ (pluggable) │
//!  └─────────────┘     └──────┬──────┘     └─────────────┘
//!                             │
//!                             ▼
//!                      ┌─────────────┐
//!                      │ AtomicWrite │
//!                      │ (tmp+rename)│
//!                      └─────────────┘
//! ```
//!
//! Keys are serialized to bytes, hashed to one of 4096 bucket ids,
//! and stored together with colliding keys in a single bucket file
//! under the store directory. Every operation re-reads the bucket
//! from disk; the store keeps no in-memory state.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod hash;
pub mod encoder;
pub mod bucket;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, StoreError};
pub use config::Config;
pub use encoder::{BincodeEncoder, Encoder};
pub use store::{Iter, Store};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of dirkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
