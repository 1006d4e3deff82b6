//! In-memory record store for tests and offline development.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use waveshelf_core::{AppError, AudioFileRecord, NewAudioFile, RecordStore};

/// Record store backed by a process-local vector.
///
/// Two inserts can land on the same millisecond, so listing breaks
/// `created_at` ties with the insertion sequence to keep the descending
/// order stable.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    rows: Mutex<Vec<(u64, AudioFileRecord)>>,
    next_seq: Mutex<u64>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert(&self, file: NewAudioFile) -> Result<AudioFileRecord, AppError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|(_, r)| r.file_path == file.file_path) {
            return Err(AppError::Database(format!(
                "duplicate key value violates unique constraint: {}",
                file.file_path
            )));
        }

        let seq = {
            let mut next = self.next_seq.lock().unwrap();
            *next += 1;
            *next
        };

        let record = AudioFileRecord {
            id: Uuid::new_v4(),
            user_id: file.user_id,
            file_name: file.file_name,
            file_path: file.file_path,
            file_size: file.file_size,
            duration: file.duration,
            mime_type: file.mime_type,
            created_at: Utc::now(),
        };
        rows.push((seq, record.clone()));
        Ok(record)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<AudioFileRecord>, AppError> {
        let rows = self.rows.lock().unwrap();
        let mut owned: Vec<_> = rows
            .iter()
            .filter(|(_, r)| r.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|(seq_a, a), (seq_b, b)| {
            (b.created_at, seq_b).cmp(&(a.created_at, seq_a))
        });
        Ok(owned.into_iter().map(|(_, r)| r).collect())
    }

    async fn get(&self, id: Uuid, user_id: Uuid) -> Result<Option<AudioFileRecord>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|(_, r)| r.id == id && r.user_id == user_id)
            .map(|(_, r)| r.clone()))
    }

    async fn update_file_name(
        &self,
        id: Uuid,
        user_id: Uuid,
        file_name: &str,
    ) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        match rows
            .iter_mut()
            .find(|(_, r)| r.id == id && r.user_id == user_id)
        {
            Some((_, record)) => {
                record.file_name = file_name.to_string();
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Audio file {} not found", id))),
        }
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|(_, r)| !(r.id == id && r.user_id == user_id));
        if rows.len() == before {
            return Err(AppError::NotFound(format!("Audio file {} not found", id)));
        }
        Ok(())
    }
}
