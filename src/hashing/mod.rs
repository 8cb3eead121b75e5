use blake3::Hasher;

use crate::tokenize::normalize_text;

/// Computes a 64-bit hash of the input data using BLAKE3, truncated from 256 bits.
///
/// BLAKE3 output does not depend on platform endianness or word size, and the
/// truncated prefix is read as little-endian, so the value is identical across runs
/// and machines. Collisions only matter for audit lookups keyed by input hash, where
/// a collision merely groups two traces together; 64 bits is ample for that.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}

/// Hash of the normalized document text, as 16 lowercase hex digits.
///
/// Normalization (see [`normalize_text`]) makes the hash insensitive to case,
/// punctuation and whitespace layout, which OCR output varies in between scans of
/// the same page.
pub fn hash_input(document_text: &str) -> String {
    format!("{:016x}", hash_to_u64(normalize_text(document_text).as_bytes()))
}

/// Full 256-bit hash over length-prefixed parts, as hex.
///
/// Used for replay fingerprints of serialized traces; the length prefix keeps
/// `["ab", "c"]` and `["a", "bc"]` apart.
pub fn hash_parts(parts: &[&[u8]]) -> String {
    let mut hasher = Hasher::new();
    for part in parts {
        hasher.update(&(part.len() as u64).to_le_bytes());
        hasher.update(part);
    }
    hasher.finalize().to_hex().to_string()
}
