//! Shared object-key generation for storage backends.
//!
//! Key format: `{user_id}/{unix_millis}-{random}.{ext}`. The owner prefix
//! scopes the key to its user; millisecond timestamp plus a 10-character
//! alphanumeric suffix makes collisions within that namespace negligible.

use chrono::Utc;
use rand::{distr::Alphanumeric, Rng};
use uuid::Uuid;
use waveshelf_core::models::audio::extension_of;

const RANDOM_SUFFIX_LEN: usize = 10;

/// Generate an object key for `owner_id`, preserving the original file's
/// extension when it has one.
pub fn generate_object_key(owner_id: Uuid, original_file_name: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_SUFFIX_LEN)
        .map(char::from)
        .collect();

    match extension_of(original_file_name) {
        Some(ext) => format!("{}/{}-{}.{}", owner_id, millis, suffix, ext),
        None => format!("{}/{}-{}", owner_id, millis, suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_owner_scoped() {
        let owner = Uuid::new_v4();
        let key = generate_object_key(owner, "song.mp3");
        assert!(key.starts_with(&format!("{}/", owner)));
    }

    #[test]
    fn test_key_preserves_extension() {
        let key = generate_object_key(Uuid::new_v4(), "song.mp3");
        assert!(key.ends_with(".mp3"));

        let key = generate_object_key(Uuid::new_v4(), "noext");
        assert!(!key.contains('.'));
    }

    #[test]
    fn test_keys_do_not_collide() {
        let owner = Uuid::new_v4();
        let a = generate_object_key(owner, "song.mp3");
        let b = generate_object_key(owner, "song.mp3");
        assert_ne!(a, b);
    }
}
