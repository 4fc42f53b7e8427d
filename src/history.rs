/*!
 * Translation history sink.
 *
 * History is fire-and-forget from the translation core's perspective: the
 * dispatcher hands a record to the sink and moves on, and a sink failure
 * never fails a translation response. The sqlite implementation here is the
 * default durable store; tests use the in-memory variant.
 */

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::dispatch::{TranslationRequest, TranslationResult};

/// One saved translation
#[derive(Debug, Clone)]
pub struct TranslationRecord {
    /// Record id
    pub id: String,
    /// SHA-256 of the source text (the text itself is not stored)
    pub source_text_hash: String,
    /// Resolved source tag
    pub source_tag: String,
    /// Resolved target tag
    pub target_tag: String,
    /// Translated output
    pub translated_text: String,
    /// Producing backend name
    pub backend: String,
    /// Whether the result came from the fallback tier
    pub degraded: bool,
    /// RFC 3339 creation timestamp
    pub created_at: String,
}

impl TranslationRecord {
    /// Build a record from a finished translation
    pub fn from_result(request: &TranslationRequest, result: &TranslationResult) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(request.text.as_bytes());
        let source_text_hash = format!("{:x}", hasher.finalize());

        Self {
            id: Uuid::new_v4().to_string(),
            source_text_hash,
            source_tag: result.source_tag.clone(),
            target_tag: result.target_tag.clone(),
            translated_text: result.translated_text.clone(),
            backend: result
                .backend
                .map(|b| b.display_name().to_string())
                .unwrap_or_else(|| "none".to_string()),
            degraded: result.degraded,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// History persistence collaborator
#[async_trait]
pub trait HistorySink: Send + Sync {
    /// Save one record. Callers treat this as fire-and-forget.
    async fn save(&self, record: TranslationRecord) -> Result<()>;
}

/// Sink that drops every record. Used when history is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHistorySink;

#[async_trait]
impl HistorySink for NullHistorySink {
    async fn save(&self, _record: TranslationRecord) -> Result<()> {
        Ok(())
    }
}

/// Sqlite-backed history sink
#[derive(Clone)]
pub struct SqliteHistorySink {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteHistorySink {
    /// Open or create a history database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .with_context(|| format!("failed to open history db at {}", path.as_ref().display()))?;
        Self::init(conn)
    }

    /// Open the history database at the default per-user location
    pub fn open_default() -> Result<Self> {
        let dir = dirs::data_dir()
            .context("could not determine data directory")?
            .join("echopath");
        std::fs::create_dir_all(&dir)?;
        Self::open(dir.join("history.db"))
    }

    /// In-memory database, for testing
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS history (
                id TEXT PRIMARY KEY,
                source_text_hash TEXT NOT NULL,
                source_tag TEXT NOT NULL,
                target_tag TEXT NOT NULL,
                translated_text TEXT NOT NULL,
                backend TEXT NOT NULL,
                degraded INTEGER NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
            [],
        )?;
        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    /// Most recent records, newest first
    pub fn recent(&self, limit: usize) -> Result<Vec<TranslationRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            r#"
            SELECT id, source_text_hash, source_tag, target_tag,
                   translated_text, backend, degraded, created_at
            FROM history ORDER BY created_at DESC LIMIT ?1
            "#,
        )?;
        let rows = stmt.query_map([limit], |row| {
            Ok(TranslationRecord {
                id: row.get(0)?,
                source_text_hash: row.get(1)?,
                source_tag: row.get(2)?,
                target_tag: row.get(3)?,
                translated_text: row.get(4)?,
                backend: row.get(5)?,
                degraded: row.get::<_, i64>(6)? != 0,
                created_at: row.get(7)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

#[async_trait]
impl HistorySink for SqliteHistorySink {
    async fn save(&self, record: TranslationRecord) -> Result<()> {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || -> Result<()> {
            conn.lock().execute(
                r#"
                INSERT INTO history (
                    id, source_text_hash, source_tag, target_tag,
                    translated_text, backend, degraded, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    record.id,
                    record.source_text_hash,
                    record.source_tag,
                    record.target_tag,
                    record.translated_text,
                    record.backend,
                    record.degraded as i64,
                    record.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .context("history write task failed")?
    }
}
