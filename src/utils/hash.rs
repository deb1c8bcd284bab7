//! Stable resource identifiers derived from content-store paths.
//!
//! IDs must survive rebuilds and be identical across platforms, so they are
//! derived from a cryptographic digest of the content path rather than a
//! process-seeded hasher.
//!
//! # Usage
//!
//! ```ignore
//! use crate::utils::hash;
//!
//! let id = hash::stable_id("posts/hello-world"); // -> u64
//! assert_eq!(hash::stable_id("42"), 42);         // numeric paths pass through
//! ```

/// IDs stay within the f64-exact integer range so downstream JSON consumers
/// never lose precision.
const ID_MASK: u64 = (1 << 53) - 1;

/// Derive a stable integer ID from a content-store path.
///
/// Paths that already are decimal integers pass through unchanged; anything
/// else is hashed.
#[inline]
pub fn stable_id(path: &str) -> u64 {
    if let Ok(id) = path.parse::<u64>()
        && id <= ID_MASK
    {
        return id;
    }
    digest_id(path)
}

/// Hash a content path into the ID space.
#[inline]
pub fn digest_id(path: &str) -> u64 {
    let digest = blake3::hash(path.as_bytes());
    let bytes: [u8; 8] = digest.as_bytes()[..8].try_into().unwrap_or([0; 8]);
    u64::from_le_bytes(bytes) & ID_MASK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_path_passes_through() {
        assert_eq!(stable_id("42"), 42);
        assert_eq!(stable_id("0"), 0);
    }

    #[test]
    fn test_non_numeric_path_is_hashed() {
        let id = stable_id("posts/hello-world");
        assert_ne!(id, 0);
        assert!(id <= ID_MASK);
    }

    #[test]
    fn test_stable_across_calls() {
        assert_eq!(stable_id("posts/hello"), stable_id("posts/hello"));
        assert_ne!(stable_id("posts/hello"), stable_id("posts/world"));
    }

    #[test]
    fn test_negative_like_path_is_hashed() {
        // "-1" is not a valid u64, so it goes through the digest
        assert!(stable_id("-1") <= ID_MASK);
    }
}
