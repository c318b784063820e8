//! Key-to-bucket hashing
//!
//! Maps a key's serialized bytes to one of 4096 bucket ids, stable
//! across process restarts and platforms.
//!
//! ## Algorithm
//! CRC32 of the key bytes, folded down to 12 bits by XOR-ing the
//! checksum with itself shifted right 12 and 24 (mixes high-order
//! bits into the low 12), masked, and formatted as a zero-padded
//! 3-character lowercase hex string.
//!
//! CRC32 is a checksum, not a cryptographic hash — it is chosen for
//! speed, and the distribution over the 4096 ids is validated by
//! test rather than assumed.

/// Number of distinct bucket ids (12 bits)
pub const BUCKET_COUNT: u32 = 4096;

/// Width of a bucket id in hex characters
pub const BUCKET_ID_LEN: usize = 3;

/// Hash key bytes to a bucket id: a 3-character lowercase hex string
/// in `"000"..="fff"`.
pub fn bucket_id(key_bytes: &[u8]) -> String {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(key_bytes);
    let crc = hasher.finalize();

    // Fold the full 32 bits into the low 12 before masking
    let folded = crc ^ (crc >> 12) ^ (crc >> 24);

    format!("{:03x}", folded & (BUCKET_COUNT - 1))
}

/// Check whether a file name is a well-formed bucket id
pub fn is_bucket_name(name: &str) -> bool {
    name.len() == BUCKET_ID_LEN
        && name
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
