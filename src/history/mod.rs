//! Chat history persistence. Append-only from the core's point of view;
//! each assistant message keeps the provenance tag of the answer that
//! produced it so sessions double as an audit log.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePoolOptions, Row, SqlitePool};
use uuid::Uuid;

use crate::answer::AnswerSource;
use crate::core::errors::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: String,
    pub title: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub message_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub id: i64,
    pub session_id: String,
    pub role: String,
    pub content: String,
    /// Provenance tag, set on assistant messages only.
    pub source: Option<String>,
    pub created_at: String,
}

#[derive(Clone)]
pub struct HistoryStore {
    pool: SqlitePool,
}

impl HistoryStore {
    pub async fn new(db_path: PathBuf) -> Result<Self, ApiError> {
        let conn_str = format!("sqlite://{}?mode=rwc", db_path.to_string_lossy());
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&conn_str)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to connect to history db: {}", e)))?;

        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&pool)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to enable foreign keys: {}", e)))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                title TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
        )
        .execute(&pool)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to init sessions table: {}", e)))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                source TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY(session_id) REFERENCES sessions(id) ON DELETE CASCADE
            )",
        )
        .execute(&pool)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to init messages table: {}", e)))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_messages_session_id ON messages(session_id)")
            .execute(&pool)
            .await
            .map_err(ApiError::internal)?;

        Ok(Self { pool })
    }

    pub async fn create_session(&self, title: Option<&str>) -> Result<String, ApiError> {
        let id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO sessions (id, title) VALUES (?1, ?2)")
            .bind(&id)
            .bind(title)
            .execute(&self.pool)
            .await
            .map_err(ApiError::internal)?;
        Ok(id)
    }

    /// Append a message, creating the session row on first use.
    pub async fn append_message(
        &self,
        session_id: &str,
        role: &str,
        content: &str,
        source: Option<AnswerSource>,
    ) -> Result<(), ApiError> {
        sqlx::query("INSERT OR IGNORE INTO sessions (id) VALUES (?1)")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(ApiError::internal)?;

        sqlx::query(
            "INSERT INTO messages (session_id, role, content, source)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(session_id)
        .bind(role)
        .bind(content)
        .bind(source.map(|s| s.as_str()))
        .execute(&self.pool)
        .await
        .map_err(ApiError::internal)?;

        sqlx::query("UPDATE sessions SET updated_at = CURRENT_TIMESTAMP WHERE id = ?1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(ApiError::internal)?;

        Ok(())
    }

    pub async fn list_sessions(&self) -> Result<Vec<SessionInfo>, ApiError> {
        let rows = sqlx::query(
            "SELECT s.id, s.title, s.created_at, s.updated_at,
                    (SELECT COUNT(*) FROM messages m WHERE m.session_id = s.id) AS message_count
             FROM sessions s
             ORDER BY s.updated_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(ApiError::internal)?;

        Ok(rows
            .into_iter()
            .map(|row| SessionInfo {
                id: row.get("id"),
                title: row.get("title"),
                created_at: row.get("created_at"),
                updated_at: row.get("updated_at"),
                message_count: row.get("message_count"),
            })
            .collect())
    }

    pub async fn get_messages(&self, session_id: &str) -> Result<Vec<HistoryMessage>, ApiError> {
        let rows = sqlx::query(
            "SELECT id, session_id, role, content, source, created_at
             FROM messages
             WHERE session_id = ?1
             ORDER BY id",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(ApiError::internal)?;

        Ok(rows
            .into_iter()
            .map(|row| HistoryMessage {
                id: row.get("id"),
                session_id: row.get("session_id"),
                role: row.get("role"),
                content: row.get("content"),
                source: row.get("source"),
                created_at: row.get("created_at"),
            })
            .collect())
    }

    pub async fn delete_session(&self, session_id: &str) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = ?1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(ApiError::internal)?;
        Ok(result.rows_affected() > 0)
    }

    /// Close the connection pool. Any later query fails with a pool
    /// error instead of touching the database.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub async fn message_count(&self) -> Result<usize, ApiError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages")
            .fetch_one(&self.pool)
            .await
            .map_err(ApiError::internal)?;
        Ok(count as usize)
    }
}
