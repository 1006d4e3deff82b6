//! Record-store backends for the `audio_files` table.
//!
//! [`PgRecordStore`] talks to Postgres directly (self-hosted deployments);
//! [`MemoryRecordStore`] backs tests and offline development. Both implement
//! `waveshelf_core::RecordStore` with the same ownership-scoping rules.

pub mod memory;
pub mod postgres;

pub use memory::MemoryRecordStore;
pub use postgres::PgRecordStore;
