//! Structures normalisées servies par la passerelle
//!
//! Les noms JSON (`coverWap`, `rankVo`, ...) sont ceux que lisent les clients existants.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fiche d'une série
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_name: Option<String>,
    #[serde(rename = "coverWap", default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub introduction: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_count: Option<u64>,
    /// Bloc de classement, présent seulement dans trending
    #[serde(rename = "rankVo", default, skip_serializing_if = "Option::is_none")]
    pub rank_info: Option<Value>,
}

/// Source lisible d'un épisode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quality {
    pub quality: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_path: Option<String>,
    pub is_default: i64,
}

/// Sources vidéo d'un épisode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamResult {
    pub book_id: String,
    pub episode: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_index: Option<i64>,
    pub video_url: String,
    pub cover: String,
    pub qualities: Vec<Quality>,
    pub total_episodes: usize,
}

/// Réponse de liste, normalisée depuis le primaire ou relayée du miroir
///
/// Les deux variantes se sérialisent en simple tableau JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CatalogPage {
    Primary(Vec<CatalogEntry>),
    Mirror(Vec<Value>),
}

impl CatalogPage {
    pub fn len(&self) -> usize {
        match self {
            Self::Primary(entries) => entries.len(),
            Self::Mirror(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_mirror(&self) -> bool {
        matches!(self, Self::Mirror(_))
    }
}

/// Réponse de flux, normalisée depuis le primaire ou relayée du miroir
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StreamLookup {
    Primary(StreamResult),
    Mirror(Value),
}

impl StreamLookup {
    /// URL de la source par défaut
    pub fn video_url(&self) -> Option<&str> {
        match self {
            Self::Primary(result) => Some(result.video_url.as_str()),
            Self::Mirror(value) => value.get("videoUrl").and_then(Value::as_str),
        }
    }
}
