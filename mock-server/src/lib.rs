use std::{collections::BTreeMap, sync::Arc, time::Duration};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub preview: String,
    pub updated_at: String,
}

#[derive(Deserialize)]
pub struct CreateNote {
    pub title: String,
    #[serde(default)]
    pub preview: String,
}

#[derive(Deserialize)]
pub struct UpdateNote {
    pub title: Option<String>,
    pub preview: Option<String>,
}

#[derive(Default)]
pub struct Notes {
    next_id: i64,
    items: BTreeMap<i64, Note>,
}

pub type Db = Arc<RwLock<Notes>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Notes::default()));
    Router::new()
        .route("/notes", get(list_notes).post(create_note))
        .route("/notes/{id}", get(get_note).put(update_note).delete(delete_note))
        .route("/faults/empty", any(empty))
        .route("/faults/not-json", any(not_json))
        .route("/faults/status/{code}", any(status))
        .route("/faults/slow", any(slow))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

async fn list_notes(State(db): State<Db>) -> Json<Vec<Note>> {
    let notes = db.read().await;
    Json(notes.items.values().rev().cloned().collect())
}

async fn create_note(
    State(db): State<Db>,
    Json(input): Json<CreateNote>,
) -> (StatusCode, Json<Note>) {
    let mut notes = db.write().await;
    notes.next_id += 1;
    let note = Note {
        id: notes.next_id,
        title: input.title.trim().to_string(),
        preview: input.preview.trim().to_string(),
        updated_at: now(),
    };
    notes.items.insert(note.id, note.clone());
    tracing::debug!(id = note.id, "note created");
    (StatusCode::CREATED, Json(note))
}

async fn get_note(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Note>, StatusCode> {
    let notes = db.read().await;
    notes.items.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_note(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateNote>,
) -> Result<Json<Note>, StatusCode> {
    let mut notes = db.write().await;
    let note = notes.items.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(title) = input.title {
        note.title = title.trim().to_string();
    }
    if let Some(preview) = input.preview {
        note.preview = preview.trim().to_string();
    }
    note.updated_at = now();
    Ok(Json(note.clone()))
}

async fn delete_note(State(db): State<Db>, Path(id): Path<i64>) -> Result<StatusCode, StatusCode> {
    let mut notes = db.write().await;
    notes
        .items
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

// --- fault injection ---

async fn empty() -> StatusCode {
    StatusCode::OK
}

async fn not_json() -> (StatusCode, &'static str) {
    (StatusCode::OK, "this is not json")
}

#[derive(Deserialize)]
pub struct StatusQuery {
    #[serde(default)]
    pub body: String,
}

async fn status(Path(code): Path<u16>, Query(query): Query<StatusQuery>) -> (StatusCode, String) {
    let code = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (code, query.body)
}

#[derive(Deserialize)]
pub struct SlowQuery {
    #[serde(default = "default_delay_ms")]
    pub ms: u64,
}

fn default_delay_ms() -> u64 {
    1_000
}

async fn slow(Query(query): Query<SlowQuery>) -> Json<serde_json::Value> {
    tokio::time::sleep(Duration::from_millis(query.ms)).await;
    Json(serde_json::json!({}))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_serializes_to_camel_case() {
        let note = Note {
            id: 1,
            title: "Test".to_string(),
            preview: "body".to_string(),
            updated_at: "2024-01-01T00:00:00+00:00".to_string(),
        };
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["title"], "Test");
        assert_eq!(json["updatedAt"], "2024-01-01T00:00:00+00:00");
        assert!(json.get("updated_at").is_none());
    }

    #[test]
    fn create_note_defaults_preview_to_empty() {
        let input: CreateNote = serde_json::from_str(r#"{"title":"No preview"}"#).unwrap();
        assert_eq!(input.title, "No preview");
        assert!(input.preview.is_empty());
    }

    #[test]
    fn create_note_rejects_missing_title() {
        let result: Result<CreateNote, _> = serde_json::from_str(r#"{"preview":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_note_all_fields_optional() {
        let input: UpdateNote = serde_json::from_str(r#"{}"#).unwrap();
        assert!(input.title.is_none());
        assert!(input.preview.is_none());
    }

    #[test]
    fn slow_query_defaults_to_one_second() {
        let query: SlowQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.ms, 1_000);
    }
}
