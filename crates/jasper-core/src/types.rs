use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Caller tiers ─────────────────────────────────────────────────────────

/// Trust classification of a caller. Determines which documents are
/// visible and which fallback providers may be consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Public,
    Legal,
    Judiciary,
}

impl Tier {
    /// Numeric access level gating document visibility.
    /// A document is visible iff `document.access_level <= tier.access_level()`.
    pub fn access_level(self) -> u8 {
        match self {
            Tier::Public => 1,
            Tier::Legal => 2,
            Tier::Judiciary => 3,
        }
    }

    /// Parse a tier string. Unknown input maps to `Public` (least privilege).
    pub fn parse(s: &str) -> Tier {
        match s.trim().to_lowercase().as_str() {
            "legal" => Tier::Legal,
            "judiciary" => Tier::Judiciary,
            _ => Tier::Public,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Public => "public",
            Tier::Legal => "legal",
            Tier::Judiciary => "judiciary",
        }
    }
}

impl Default for Tier {
    fn default() -> Self {
        Tier::Public
    }
}

// ── Documents ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Act,
    Judgment,
    Circular,
    Notification,
    Form,
    Template,
    Other,
}

impl DocumentType {
    /// Three-letter prefix used when assigning document IDs.
    pub fn prefix(self) -> &'static str {
        match self {
            DocumentType::Act => "ACT",
            DocumentType::Judgment => "JDG",
            DocumentType::Circular => "CIR",
            DocumentType::Notification => "NOT",
            DocumentType::Form => "FRM",
            DocumentType::Template => "TPL",
            DocumentType::Other => "DOC",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::Act => "act",
            DocumentType::Judgment => "judgment",
            DocumentType::Circular => "circular",
            DocumentType::Notification => "notification",
            DocumentType::Form => "form",
            DocumentType::Template => "template",
            DocumentType::Other => "other",
        }
    }

    pub fn parse(s: &str) -> DocumentType {
        match s {
            "act" => DocumentType::Act,
            "judgment" => DocumentType::Judgment,
            "circular" => DocumentType::Circular,
            "notification" => DocumentType::Notification,
            "form" => DocumentType::Form,
            "template" => DocumentType::Template,
            _ => DocumentType::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Draft,
    Published,
    Archived,
}

impl DocumentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentStatus::Draft => "draft",
            DocumentStatus::Published => "published",
            DocumentStatus::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> DocumentStatus {
        match s {
            "draft" => DocumentStatus::Draft,
            "archived" => DocumentStatus::Archived,
            _ => DocumentStatus::Published,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub date_published: Option<DateTime<Utc>>,
    #[serde(default)]
    pub jurisdiction: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub citations: Vec<String>,
    #[serde(default)]
    pub sections: Vec<String>,
    #[serde(default)]
    pub summary: String,
}

/// A legal document as stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique ID prefixed by document-type code, e.g. "ACT-ABC123-X9".
    pub doc_id: String,
    pub title: String,
    pub document_type: DocumentType,
    pub category: String,
    /// 1 = public, 2 = legal, 3 = judiciary.
    pub access_level: u8,
    pub content: String,
    pub metadata: DocumentMetadata,
    pub status: DocumentStatus,
    pub upload_date: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    /// Incremented whenever content changes.
    pub version: i64,
}

/// Fields required to create a document. ID, version, and timestamps
/// are assigned by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDocument {
    pub title: String,
    pub document_type: DocumentType,
    pub category: String,
    pub access_level: u8,
    pub content: String,
    #[serde(default)]
    pub metadata: DocumentMetadata,
    #[serde(default = "default_status")]
    pub status: DocumentStatus,
}

fn default_status() -> DocumentStatus {
    DocumentStatus::Published
}

/// Partial update applied to an existing document. `None` fields are
/// left untouched. Version bumps only when `content` actually changes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentUpdate {
    pub title: Option<String>,
    pub category: Option<String>,
    pub access_level: Option<u8>,
    pub content: Option<String>,
    pub metadata: Option<DocumentMetadata>,
    pub status: Option<DocumentStatus>,
}

// ── Retrieval ────────────────────────────────────────────────────────────

/// Read-only projection used uniformly by the synthesizer. Internal
/// documents carry `doc_id`; external provider results are looser and
/// may only have a description or snippet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievedDocument {
    pub doc_id: Option<String>,
    pub title: String,
    pub content: Option<String>,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub snippet: Option<String>,
    /// Where the result came from ("store" or a provider name).
    pub source: String,
}

impl RetrievedDocument {
    /// First non-empty of content / description / summary / snippet.
    pub fn best_text(&self) -> &str {
        for field in [&self.content, &self.description, &self.summary, &self.snippet] {
            if let Some(text) = field {
                if !text.trim().is_empty() {
                    return text;
                }
            }
        }
        ""
    }
}

impl From<&Document> for RetrievedDocument {
    fn from(doc: &Document) -> Self {
        RetrievedDocument {
            doc_id: Some(doc.doc_id.clone()),
            title: doc.title.clone(),
            content: Some(doc.content.clone()),
            description: None,
            summary: if doc.metadata.summary.is_empty() {
                None
            } else {
                Some(doc.metadata.summary.clone())
            },
            snippet: None,
            source: "store".into(),
        }
    }
}

// ── Query analysis ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    ArrestRights,
    FirFiling,
    PropertyRegistration,
    ConsumerComplaint,
    LegalAid,
    GeneralInfo,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::ArrestRights => "arrest_rights",
            Intent::FirFiling => "fir_filing",
            Intent::PropertyRegistration => "property_registration",
            Intent::ConsumerComplaint => "consumer_complaint",
            Intent::LegalAid => "legal_aid",
            Intent::GeneralInfo => "general_info",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Date,
    Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub entity_type: EntityType,
    pub value: String,
}

/// Per-request classification of a query. Ephemeral; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryAnalysis {
    pub intent: Intent,
    pub confidence: f64,
    pub entities: Vec<Entity>,
}

// ── Pipeline output ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub intent: String,
    pub confidence: f64,
    /// Document IDs backing the answer, or "external" for provider
    /// results without one.
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub response: String,
    pub metadata: ResponseMetadata,
}

// ── Chat log ─────────────────────────────────────────────────────────────

/// One row of a caller's chat log.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub id: i64,
    pub chat_id: String,
    /// "user" or "bot".
    pub sender: String,
    pub content: String,
    /// JSON-encoded `ResponseMetadata` for bot messages, empty otherwise.
    pub metadata: String,
    pub created_at: DateTime<Utc>,
}

/// Chat summary row (history listing).
#[derive(Debug, Clone, Serialize)]
pub struct ChatSummary {
    pub chat_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}
