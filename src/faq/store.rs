//! Persisted FAQ vector index.
//!
//! The `faq-indexer` binary writes question embeddings with their QA
//! payloads into a sqlite file; the server loads the whole table into an
//! in-memory `FaqIndex` at startup and only ever reads from it afterwards.

use std::path::{Path, PathBuf};

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};

use crate::core::errors::ApiError;

use super::records::QaRecord;

/// One indexed question embedding with its QA payload.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub embedding: Vec<f32>,
    pub record: QaRecord,
}

/// Result of a top-1 similarity search. Lower distance means more similar.
#[derive(Debug, Clone)]
pub struct ScoredMatch<'a> {
    pub entry: &'a IndexEntry,
    pub distance: f32,
}

/// Sqlite persistence for the index. Write side is only used by the
/// offline builder; the server goes through [`FaqIndex`].
#[derive(Clone)]
pub struct FaqIndexStore {
    pool: SqlitePool,
    #[allow(dead_code)]
    db_path: PathBuf,
}

impl FaqIndexStore {
    pub async fn with_path(db_path: impl Into<PathBuf>) -> Result<Self, ApiError> {
        let db_path = db_path.into();
        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(ApiError::internal)?;

        let store = Self { pool, db_path };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), ApiError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS faq_entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                question TEXT NOT NULL,
                answer TEXT NOT NULL,
                embedding BLOB NOT NULL,
                created_at TEXT NOT NULL DEFAULT (STRFTIME('%Y-%m-%dT%H:%M:%fZ', 'now')),
                UNIQUE(question, answer)
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(ApiError::internal)?;

        Ok(())
    }

    /// Insert entries, silently skipping exact `(question, answer)`
    /// duplicates already in the store.
    pub async fn insert_batch(
        &self,
        items: Vec<(QaRecord, Vec<f32>)>,
    ) -> Result<usize, ApiError> {
        let mut inserted = 0usize;
        for (record, embedding) in items {
            let blob = serialize_embedding(&embedding);
            let result = sqlx::query(
                "INSERT OR IGNORE INTO faq_entries (question, answer, embedding)
                 VALUES (?1, ?2, ?3)",
            )
            .bind(&record.question)
            .bind(&record.answer)
            .bind(blob)
            .execute(&self.pool)
            .await
            .map_err(ApiError::internal)?;

            inserted += result.rows_affected() as usize;
        }
        Ok(inserted)
    }

    pub async fn count(&self) -> Result<usize, ApiError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM faq_entries")
            .fetch_one(&self.pool)
            .await
            .map_err(ApiError::internal)?;
        Ok(count as usize)
    }

    /// Load every entry, wholesale, in insertion order.
    pub async fn load_entries(&self) -> Result<Vec<IndexEntry>, ApiError> {
        let rows = sqlx::query("SELECT question, answer, embedding FROM faq_entries ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(ApiError::internal)?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let embedding_bytes: Vec<u8> = row.get("embedding");
            if embedding_bytes.is_empty() {
                continue;
            }
            entries.push(IndexEntry {
                embedding: deserialize_embedding(&embedding_bytes),
                record: QaRecord {
                    question: row.get("question"),
                    answer: row.get("answer"),
                },
            });
        }

        Ok(entries)
    }
}

/// Read-only in-memory index over the loaded entries. Safe to share
/// across concurrent queries behind an `Arc`; nothing mutates it after
/// load.
pub struct FaqIndex {
    entries: Vec<IndexEntry>,
}

impl FaqIndex {
    pub fn from_entries(entries: Vec<IndexEntry>) -> Self {
        Self { entries }
    }

    pub async fn open(db_path: &Path) -> Result<Self, ApiError> {
        let store = FaqIndexStore::with_path(db_path).await?;
        let entries = store.load_entries().await?;
        Ok(Self::from_entries(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top-1 nearest neighbour by cosine distance. `None` on an empty index.
    pub fn nearest(&self, query_embedding: &[f32]) -> Option<ScoredMatch<'_>> {
        let mut best: Option<ScoredMatch<'_>> = None;
        for entry in &self.entries {
            let distance = cosine_distance(query_embedding, &entry.embedding);
            let closer = match &best {
                Some(current) => distance < current.distance,
                None => true,
            };
            if closer {
                best = Some(ScoredMatch { entry, distance });
            }
        }
        best
    }
}

fn serialize_embedding(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn deserialize_embedding(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// Cosine distance `1 - cos`, clamped so it is always non-negative.
/// Degenerate vectors (length mismatch, zero norm) land at the far end of
/// the scale rather than erroring.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    (1.0 - cosine_similarity(a, b)).max(0.0)
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    let denom = norm_a * norm_b;

    if denom <= f32::EPSILON {
        0.0
    } else {
        (dot / denom).clamp(-1.0, 1.0)
    }
}
