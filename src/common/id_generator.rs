// src/common/id_generator.rs
//! Crockford Base32 ID Generator
//!
//! Generates human-readable, prefixed IDs using Crockford Base32 encoding.
//! Format: PREFIX_XXXXXX (e.g., B_K7NP3X for audiobooks)
//!
//! Benefits:
//! - No ambiguous characters (excludes I, L, O, U)
//! - Case-insensitive
//! - ~1 billion combinations per entity type (32^6)
//! - Easy to read, type, and communicate verbally

use rand::Rng;

/// Crockford Base32 alphabet (excludes I, L, O, U to avoid confusion)
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Entity type prefixes for ID generation
#[derive(Debug, Clone, Copy)]
pub enum EntityPrefix {
    /// User account (US_)
    User,
    /// Audiobook record (B_)
    Audiobook,
    /// Stored object / file (F_)
    File,
}

impl EntityPrefix {
    /// Get the string prefix for this entity type
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::User => "US",
            EntityPrefix::Audiobook => "B",
            EntityPrefix::File => "F",
        }
    }
}

/// Generate a random Crockford Base32 string of specified length
fn generate_crockford_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..32);
            CROCKFORD_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a prefixed ID using Crockford Base32 encoding
///
/// # Returns
/// A string in format "PREFIX_XXXXXX" (e.g., "B_K7NP3X")
pub fn generate_id(prefix: EntityPrefix) -> String {
    format!("{}_{}", prefix.as_str(), generate_crockford_string(6))
}

/// Generate a raw Crockford Base32 string without prefix
/// Useful for filenames or other non-entity identifiers
#[allow(dead_code)]
pub fn generate_raw_id(length: usize) -> String {
    generate_crockford_string(length)
}

/// Generate a User ID (US_XXXXXX)
pub fn generate_user_id() -> String {
    generate_id(EntityPrefix::User)
}

/// Generate an Audiobook ID (B_XXXXXX)
pub fn generate_audiobook_id() -> String {
    generate_id(EntityPrefix::Audiobook)
}

/// Generate a File ID (F_XXXXXX) used as the object-store key component
pub fn generate_file_id() -> String {
    generate_id(EntityPrefix::File)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_id_format() {
        let book_id = generate_audiobook_id();
        assert!(book_id.starts_with("B_"));
        assert_eq!(book_id.len(), 8); // "B_" + 6 chars

        let file_id = generate_file_id();
        assert!(file_id.starts_with("F_"));
        assert_eq!(file_id.len(), 8);

        let user_id = generate_user_id();
        assert!(user_id.starts_with("US_"));
        assert_eq!(user_id.len(), 9);
    }

    #[test]
    fn test_crockford_alphabet_only() {
        let id = generate_audiobook_id();
        let random_part = &id[2..]; // Skip "B_"
        for c in random_part.chars() {
            assert!(
                CROCKFORD_ALPHABET.contains(&(c as u8)),
                "unexpected character {} in id {}",
                c,
                id
            );
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(generate_file_id()));
        }
    }
}
