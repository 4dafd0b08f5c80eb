use sha2::{Digest, Sha256};

/// Derives the stable cache key for a translatable unit.
///
/// Leading and trailing whitespace is stripped before hashing, so the same
/// fragment rendered with incidental padding maps to the same record. The
/// key identifies content only; the target language is a separate storage
/// dimension.
pub fn content_key(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.trim().as_bytes()))
}
