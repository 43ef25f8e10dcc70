//! SQLite-backed document store and chat log.
//!
//! Search is keyword-based: query tokens longer than three characters
//! are matched case-insensitively against title, content, and keyword
//! metadata of published documents at or below the caller's access
//! level. No ranking beyond match; result order is insertion order.

use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use rusqlite::{params, Connection, OptionalExtension};

use crate::embedding;
use crate::types::{
    ChatMessage, ChatSummary, Document, DocumentMetadata, DocumentStatus, DocumentType,
    DocumentUpdate, NewDocument, RetrievedDocument,
};

const SCHEMA_SQL: &str = include_str!("../../../schema.sql");

pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// The one capability the query pipeline needs from a store. Kept as a
/// trait so the SQLite implementation can be swapped for a remote or
/// vector-backed one without touching the pipeline.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn search(
        &self,
        query: &str,
        max_access_level: u8,
        limit: usize,
    ) -> Result<Vec<RetrievedDocument>>;
}

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

// ── Timestamp helpers ─────────────────────────────────────────────────────

fn parse_ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn now_str() -> String {
    Utc::now().to_rfc3339()
}

// ── ID generation ─────────────────────────────────────────────────────────

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".into();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// `<TYPE-PREFIX>-<unix-ts base36>-<random base36>`, uppercased.
fn generate_doc_id(document_type: DocumentType) -> String {
    let ts = Utc::now().timestamp().max(0) as u64;
    let random: u64 = rand::thread_rng().gen_range(0..10_000);
    format!(
        "{}-{}-{}",
        document_type.prefix(),
        to_base36(ts),
        to_base36(random)
    )
    .to_uppercase()
}

fn generate_chat_id() -> String {
    let ts = Utc::now().timestamp().max(0) as u64;
    let random: u64 = rand::thread_rng().gen_range(0..1_000_000);
    format!("CHT-{}-{}", to_base36(ts), to_base36(random)).to_uppercase()
}

// ── Query tokenization ────────────────────────────────────────────────────

/// Strip punctuation, split on whitespace, keep lowercase tokens longer
/// than three characters.
fn search_tokens(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .filter(|t| t.len() > 3)
        .map(str::to_string)
        .collect()
}

// ── Row mappers ───────────────────────────────────────────────────────────

fn json_vec(s: &str) -> Vec<String> {
    serde_json::from_str(s).unwrap_or_default()
}

fn row_to_document(row: &rusqlite::Row<'_>) -> rusqlite::Result<Document> {
    let document_type: String = row.get(2)?;
    let status: String = row.get(14)?;
    let date_published: Option<String> = row.get(7)?;
    let keywords: String = row.get(9)?;
    let citations: String = row.get(10)?;
    let sections: String = row.get(11)?;
    let upload_date: String = row.get(15)?;
    let last_updated: String = row.get(16)?;
    Ok(Document {
        doc_id: row.get(0)?,
        title: row.get(1)?,
        document_type: DocumentType::parse(&document_type),
        category: row.get(3)?,
        access_level: row.get::<_, i64>(4)? as u8,
        content: row.get(5)?,
        metadata: DocumentMetadata {
            author: row.get(6)?,
            date_published: date_published.as_deref().map(parse_ts),
            jurisdiction: row.get(8)?,
            keywords: json_vec(&keywords),
            citations: json_vec(&citations),
            sections: json_vec(&sections),
            summary: row.get(12)?,
        },
        status: DocumentStatus::parse(&status),
        upload_date: parse_ts(&upload_date),
        last_updated: parse_ts(&last_updated),
        version: row.get(17)?,
    })
}

const DOCUMENT_COLUMNS: &str = "doc_id, title, document_type, category, access_level, content, \
     author, date_published, jurisdiction, keywords, citations, sections, summary, embedding, \
     status, upload_date, last_updated, version";

fn row_to_chat_summary(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChatSummary> {
    let created_at: String = row.get(2)?;
    let last_updated: String = row.get(3)?;
    Ok(ChatSummary {
        chat_id: row.get(0)?,
        title: row.get(1)?,
        created_at: parse_ts(&created_at),
        last_updated: parse_ts(&last_updated),
    })
}

fn row_to_chat_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChatMessage> {
    let created_at: String = row.get(5)?;
    Ok(ChatMessage {
        id: row.get(0)?,
        chat_id: row.get(1)?,
        sender: row.get(2)?,
        content: row.get(3)?,
        metadata: row.get(4)?,
        created_at: parse_ts(&created_at),
    })
}

// ── Store ─────────────────────────────────────────────────────────────────

impl SqliteStore {
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path).with_context(|| format!("open database {path}"))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.lock();
        conn.execute_batch(SCHEMA_SQL).context("apply schema")?;
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    // ── Documents ────────────────────────────────────────────────────

    pub fn insert_document(&self, new: &NewDocument) -> Result<Document> {
        if !(1..=3).contains(&new.access_level) {
            bail!("access_level must be 1-3, got {}", new.access_level);
        }
        let doc_id = generate_doc_id(new.document_type);
        let now = now_str();
        let embedding = serde_json::to_string(&embedding::embed(&new.content))?;
        let conn = self.lock();
        conn.execute(
            "INSERT INTO documents (doc_id, title, document_type, category, access_level, \
             content, author, date_published, jurisdiction, keywords, citations, sections, \
             summary, embedding, status, upload_date, last_updated, version) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, 1)",
            params![
                doc_id,
                new.title,
                new.document_type.as_str(),
                new.category,
                new.access_level as i64,
                new.content,
                new.metadata.author,
                new.metadata.date_published.map(|d| d.to_rfc3339()),
                new.metadata.jurisdiction,
                serde_json::to_string(&new.metadata.keywords)?,
                serde_json::to_string(&new.metadata.citations)?,
                serde_json::to_string(&new.metadata.sections)?,
                new.metadata.summary,
                embedding,
                new.status.as_str(),
                now,
                now,
            ],
        )?;
        drop(conn);
        self.get_document(&doc_id)?
            .context("document vanished after insert")
    }

    pub fn get_document(&self, doc_id: &str) -> Result<Option<Document>> {
        let conn = self.lock();
        let doc = conn
            .query_row(
                &format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE doc_id = ?1"),
                params![doc_id],
                row_to_document,
            )
            .optional()?;
        Ok(doc)
    }

    /// Apply a partial update. Version increments only when the content
    /// actually changes; `last_updated` refreshes on every update.
    pub fn update_document(&self, doc_id: &str, update: &DocumentUpdate) -> Result<Document> {
        let Some(current) = self.get_document(doc_id)? else {
            bail!("document {doc_id} not found");
        };

        if let Some(level) = update.access_level {
            if !(1..=3).contains(&level) {
                bail!("access_level must be 1-3, got {level}");
            }
        }

        let title = update.title.clone().unwrap_or(current.title);
        let category = update.category.clone().unwrap_or(current.category);
        let access_level = update.access_level.unwrap_or(current.access_level);
        let status = update.status.unwrap_or(current.status);
        let metadata = update.metadata.clone().unwrap_or(current.metadata);

        let content_changed = update
            .content
            .as_ref()
            .map(|c| *c != current.content)
            .unwrap_or(false);
        let content = update.content.clone().unwrap_or(current.content);
        let version = if content_changed {
            current.version + 1
        } else {
            current.version
        };

        let conn = self.lock();
        if content_changed {
            let embedding = serde_json::to_string(&embedding::embed(&content))?;
            conn.execute(
                "UPDATE documents SET content = ?2, embedding = ?3, version = ?4 WHERE doc_id = ?1",
                params![doc_id, content, embedding, version],
            )?;
        }
        conn.execute(
            "UPDATE documents SET title = ?2, category = ?3, access_level = ?4, author = ?5, \
             date_published = ?6, jurisdiction = ?7, keywords = ?8, citations = ?9, \
             sections = ?10, summary = ?11, status = ?12, last_updated = ?13 WHERE doc_id = ?1",
            params![
                doc_id,
                title,
                category,
                access_level as i64,
                metadata.author,
                metadata.date_published.map(|d| d.to_rfc3339()),
                metadata.jurisdiction,
                serde_json::to_string(&metadata.keywords)?,
                serde_json::to_string(&metadata.citations)?,
                serde_json::to_string(&metadata.sections)?,
                metadata.summary,
                status.as_str(),
                now_str(),
            ],
        )?;
        drop(conn);
        self.get_document(doc_id)?
            .context("document vanished after update")
    }

    pub fn list_documents(&self) -> Result<Vec<Document>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents ORDER BY upload_date DESC"
        ))?;
        let docs = stmt
            .query_map([], row_to_document)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(docs)
    }

    /// Administrative removal. The query pipeline never deletes.
    pub fn delete_document(&self, doc_id: &str) -> Result<bool> {
        let conn = self.lock();
        let n = conn.execute("DELETE FROM documents WHERE doc_id = ?1", params![doc_id])?;
        Ok(n > 0)
    }

    fn search_sync(
        &self,
        query: &str,
        max_access_level: u8,
        limit: usize,
    ) -> Result<Vec<RetrievedDocument>> {
        let tokens = search_tokens(query);
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents \
             WHERE status = 'published' AND access_level <= ?1 ORDER BY rowid"
        ))?;
        let candidates = stmt
            .query_map(params![max_access_level as i64], row_to_document)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        drop(stmt);
        drop(conn);

        let mut results = Vec::new();
        for doc in candidates {
            if results.len() >= limit {
                break;
            }
            if document_matches(&doc, &tokens) {
                results.push(RetrievedDocument::from(&doc));
            }
        }
        Ok(results)
    }

    // ── Chat log ─────────────────────────────────────────────────────

    pub fn create_chat(&self, title: &str) -> Result<ChatSummary> {
        let chat_id = generate_chat_id();
        let now = now_str();
        let conn = self.lock();
        conn.execute(
            "INSERT INTO chats (chat_id, title, created_at, last_updated) VALUES (?1, ?2, ?3, ?3)",
            params![chat_id, title, now],
        )?;
        Ok(ChatSummary {
            chat_id,
            title: title.to_string(),
            created_at: parse_ts(&now),
            last_updated: parse_ts(&now),
        })
    }

    pub fn chat_exists(&self, chat_id: &str) -> Result<bool> {
        let conn = self.lock();
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM chats WHERE chat_id = ?1",
                params![chat_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    pub fn append_chat_message(
        &self,
        chat_id: &str,
        sender: &str,
        content: &str,
        metadata: &str,
    ) -> Result<i64> {
        let now = now_str();
        let conn = self.lock();
        conn.execute(
            "INSERT INTO chat_messages (chat_id, sender, content, metadata, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![chat_id, sender, content, metadata, now],
        )?;
        let id = conn.last_insert_rowid();
        conn.execute(
            "UPDATE chats SET last_updated = ?2 WHERE chat_id = ?1",
            params![chat_id, now],
        )?;
        Ok(id)
    }

    pub fn list_chats(&self) -> Result<Vec<ChatSummary>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT chat_id, title, created_at, last_updated FROM chats ORDER BY last_updated DESC",
        )?;
        let chats = stmt
            .query_map([], row_to_chat_summary)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(chats)
    }

    pub fn list_chat_messages(&self, chat_id: &str) -> Result<Vec<ChatMessage>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, chat_id, sender, content, metadata, created_at \
             FROM chat_messages WHERE chat_id = ?1 ORDER BY id",
        )?;
        let messages = stmt
            .query_map(params![chat_id], row_to_chat_message)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(messages)
    }

    pub fn delete_chat(&self, chat_id: &str) -> Result<bool> {
        let conn = self.lock();
        conn.execute(
            "DELETE FROM chat_messages WHERE chat_id = ?1",
            params![chat_id],
        )?;
        let n = conn.execute("DELETE FROM chats WHERE chat_id = ?1", params![chat_id])?;
        Ok(n > 0)
    }

    // ── Config table ─────────────────────────────────────────────────

    pub fn get_config(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock();
        let value = conn
            .query_row(
                "SELECT value FROM config WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_config(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO config (key, value, updated_at) VALUES (?1, ?2, datetime('now')) \
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// Insert a config key only if absent (first-run seeding).
    pub fn seed_config(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock();
        conn.execute(
            "INSERT OR IGNORE INTO config (key, value, updated_at) VALUES (?1, ?2, datetime('now'))",
            params![key, value],
        )?;
        Ok(())
    }
}

/// True when at least one token matches title, content, or a keyword.
fn document_matches(doc: &Document, tokens: &[String]) -> bool {
    let title = doc.title.to_lowercase();
    let content = doc.content.to_lowercase();
    tokens.iter().any(|token| {
        title.contains(token)
            || content.contains(token)
            || doc
                .metadata
                .keywords
                .iter()
                .any(|kw| kw.to_lowercase() == *token)
    })
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn search(
        &self,
        query: &str,
        max_access_level: u8,
        limit: usize,
    ) -> Result<Vec<RetrievedDocument>> {
        self.search_sync(query, max_access_level, limit)
    }
}
