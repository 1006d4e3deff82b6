//! Waveshelf Storage Library
//!
//! Blob storage abstraction and backends. The [`BlobStore`] trait is the
//! object-storage collaborator consumed by the upload pipeline and the
//! playback transport: a non-overwriting `put`, `remove`, time-limited
//! signed URLs, and an existence check.
//!
//! # Object key format
//!
//! Keys are owner-scoped: `{user_id}/{unix_millis}-{random}.{ext}`. The
//! owner prefix encodes ownership; the timestamp + random suffix makes
//! collisions within one owner's namespace negligible. Key generation is
//! centralized in the `keys` module so all backends stay consistent.

pub mod keys;
pub mod local;
pub mod memory;
pub mod traits;

pub use keys::generate_object_key;
pub use local::LocalBlobStore;
pub use memory::MemoryBlobStore;
pub use traits::{BlobStore, SignedUrl, StorageError, StorageResult};
