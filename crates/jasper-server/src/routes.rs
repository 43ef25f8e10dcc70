use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use jasper_core::types::{ChatMessage, DocumentUpdate, NewDocument, Tier};

use crate::AppState;

/// Chat titles are cut to this many characters of the first message.
const CHAT_TITLE_LEN: usize = 30;

// ── Error helper ──────────────────────────────────────────────────────────

pub(crate) fn internal(e: impl std::fmt::Display) -> StatusCode {
    tracing::error!("internal error: {e}");
    StatusCode::INTERNAL_SERVER_ERROR
}

fn ok(data: Value) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

// ── Request body types ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(crate) struct SendMessageBody {
    pub message: String,
    pub chat_id: Option<String>,
    pub tier: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct TierQuery {
    pub tier: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct FallbackBody {
    pub query: String,
    pub tier: Option<String>,
}

// ── Handlers ──────────────────────────────────────────────────────────────

pub(crate) async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

// Chat

fn chat_title(message: &str) -> String {
    let mut title: String = message.chars().take(CHAT_TITLE_LEN).collect();
    if message.chars().count() > CHAT_TITLE_LEN {
        title.push_str("...");
    }
    title
}

fn message_json(m: &ChatMessage) -> Value {
    json!({
        "id": m.id,
        "sender": m.sender,
        "content": m.content,
        "metadata": serde_json::from_str::<Value>(&m.metadata).unwrap_or(Value::Null),
        "created_at": m.created_at.to_rfc3339(),
    })
}

pub(crate) async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SendMessageBody>,
) -> Result<Json<Value>, StatusCode> {
    let message = body.message.trim();
    if message.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let tier = Tier::parse(body.tier.as_deref().unwrap_or(""));

    let chat_id = match body.chat_id {
        Some(id) if state.store.chat_exists(&id).map_err(internal)? => id,
        Some(_) => return Err(StatusCode::NOT_FOUND),
        None => state.store.create_chat(&chat_title(message)).map_err(internal)?.chat_id,
    };

    state
        .store
        .append_chat_message(&chat_id, "user", message, "")
        .map_err(internal)?;

    let answer = state.pipeline.answer(message, tier).await;

    let metadata = serde_json::to_string(&answer.metadata).map_err(internal)?;
    state
        .store
        .append_chat_message(&chat_id, "bot", &answer.response, &metadata)
        .map_err(internal)?;

    Ok(ok(json!({
        "chat_id": chat_id,
        "response": answer.response,
        "metadata": answer.metadata,
    })))
}

pub(crate) async fn chat_history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, StatusCode> {
    let chats = state.store.list_chats().map_err(internal)?;
    let v: Vec<Value> = chats
        .iter()
        .map(|c| {
            json!({
                "chat_id": c.chat_id,
                "title": c.title,
                "created_at": c.created_at.to_rfc3339(),
                "last_updated": c.last_updated.to_rfc3339(),
            })
        })
        .collect();
    Ok(ok(json!(v)))
}

pub(crate) async fn get_chat(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    if !state.store.chat_exists(&chat_id).map_err(internal)? {
        return Err(StatusCode::NOT_FOUND);
    }
    let messages = state.store.list_chat_messages(&chat_id).map_err(internal)?;
    let v: Vec<Value> = messages.iter().map(message_json).collect();
    Ok(ok(json!({ "chat_id": chat_id, "messages": v })))
}

pub(crate) async fn delete_chat(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    if !state.store.delete_chat(&chat_id).map_err(internal)? {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(ok(json!({ "deleted": chat_id })))
}

// Documents (administrative)

pub(crate) async fn create_document(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewDocument>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let doc = state.store.insert_document(&body).map_err(|e| {
        tracing::warn!("document rejected: {e}");
        StatusCode::BAD_REQUEST
    })?;
    Ok((
        StatusCode::CREATED,
        ok(serde_json::to_value(&doc).map_err(internal)?),
    ))
}

pub(crate) async fn list_documents(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, StatusCode> {
    let docs = state.store.list_documents().map_err(internal)?;
    Ok(ok(serde_json::to_value(&docs).map_err(internal)?))
}

pub(crate) async fn get_document(
    State(state): State<Arc<AppState>>,
    Path(doc_id): Path<String>,
    Query(q): Query<TierQuery>,
) -> Result<Json<Value>, StatusCode> {
    let tier = Tier::parse(q.tier.as_deref().unwrap_or(""));
    let doc = state
        .store
        .get_document(&doc_id)
        .map_err(internal)?
        .ok_or(StatusCode::NOT_FOUND)?;
    if doc.access_level > tier.access_level() {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(ok(serde_json::to_value(&doc).map_err(internal)?))
}

pub(crate) async fn update_document(
    State(state): State<Arc<AppState>>,
    Path(doc_id): Path<String>,
    Json(body): Json<DocumentUpdate>,
) -> Result<Json<Value>, StatusCode> {
    if state.store.get_document(&doc_id).map_err(internal)?.is_none() {
        return Err(StatusCode::NOT_FOUND);
    }
    let doc = state.store.update_document(&doc_id, &body).map_err(|e| {
        tracing::warn!("document update rejected: {e}");
        StatusCode::BAD_REQUEST
    })?;
    Ok(ok(serde_json::to_value(&doc).map_err(internal)?))
}

pub(crate) async fn delete_document(
    State(state): State<Arc<AppState>>,
    Path(doc_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    if !state.store.delete_document(&doc_id).map_err(internal)? {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(ok(json!({ "deleted": doc_id })))
}

// Direct fallback passthrough, mainly for operators checking provider
// connectivity without going through the whole pipeline.

pub(crate) async fn query_fallback(
    State(state): State<Arc<AppState>>,
    Path(provider_name): Path<String>,
    Json(body): Json<FallbackBody>,
) -> Result<Json<Value>, StatusCode> {
    let tier = Tier::parse(body.tier.as_deref().unwrap_or(""));
    let provider = state
        .pipeline
        .fallback()
        .get(&provider_name)
        .ok_or(StatusCode::NOT_FOUND)?;
    if tier.access_level() < provider.min_tier().access_level() {
        return Err(StatusCode::FORBIDDEN);
    }
    let docs = provider.query(&body.query).await.map_err(internal)?;
    Ok(ok(serde_json::to_value(&docs).map_err(internal)?))
}
