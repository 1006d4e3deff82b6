//! Postgres record store.
//!
//! Every statement carries the owning user's id in its WHERE clause; a
//! mutation that matches no row (wrong id or wrong owner) reports NotFound
//! instead of touching anything.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use waveshelf_core::{AppError, AudioFileRecord, NewAudioFile, RecordStore};

#[derive(sqlx::FromRow)]
struct AudioFileRow {
    id: Uuid,
    user_id: Uuid,
    file_name: String,
    file_path: String,
    file_size: i64,
    duration: f64,
    mime_type: String,
    created_at: DateTime<Utc>,
}

impl From<AudioFileRow> for AudioFileRecord {
    fn from(row: AudioFileRow) -> Self {
        AudioFileRecord {
            id: row.id,
            user_id: row.user_id,
            file_name: row.file_name,
            file_path: row.file_path,
            file_size: row.file_size,
            duration: row.duration,
            mime_type: row.mime_type,
            created_at: row.created_at,
        }
    }
}

const SELECT_COLUMNS: &str =
    "id, user_id, file_name, file_path, file_size, duration, mime_type, created_at";

/// Record store over a Postgres pool.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and run pending migrations.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect: {}", e)))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {}", e)))?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn insert(&self, file: NewAudioFile) -> Result<AudioFileRecord, AppError> {
        let row: AudioFileRow = sqlx::query_as(&format!(
            "INSERT INTO audio_files (user_id, file_name, file_path, file_size, duration, mime_type) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            SELECT_COLUMNS
        ))
        .bind(file.user_id)
        .bind(&file.file_name)
        .bind(&file.file_path)
        .bind(file.file_size)
        .bind(file.duration)
        .bind(&file.mime_type)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.into())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<AudioFileRecord>, AppError> {
        let rows: Vec<AudioFileRow> = sqlx::query_as(&format!(
            "SELECT {} FROM audio_files WHERE user_id = $1 ORDER BY created_at DESC",
            SELECT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get(&self, id: Uuid, user_id: Uuid) -> Result<Option<AudioFileRecord>, AppError> {
        let row: Option<AudioFileRow> = sqlx::query_as(&format!(
            "SELECT {} FROM audio_files WHERE id = $1 AND user_id = $2",
            SELECT_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn update_file_name(
        &self,
        id: Uuid,
        user_id: Uuid,
        file_name: &str,
    ) -> Result<(), AppError> {
        let result =
            sqlx::query("UPDATE audio_files SET file_name = $3 WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .bind(file_name)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Audio file {} not found", id)));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM audio_files WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Audio file {} not found", id)));
        }
        Ok(())
    }
}
