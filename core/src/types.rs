//! DTOs for the notes API.
//!
//! # Design
//! These mirror the mock-server's schema but are defined independently;
//! integration tests catch drift between the two crates. Field names follow
//! the wire format (`updatedAt`).

use serde::{Deserialize, Serialize};

/// A single note returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub preview: String,
    pub updated_at: String,
}

/// Request payload for creating a note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNote {
    pub title: String,
    #[serde(default)]
    pub preview: String,
}

/// Partial update; omitted fields stay unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNote {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryResponse {
    #[serde(default)]
    pub summary: String,
}
