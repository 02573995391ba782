//! Conversion des réponses de l'API primaire vers les modèles normalisés
//!
//! Les structures `Raw*` suivent le schéma du fournisseur, tous champs
//! optionnels. Un champ attendu absent (`data.newTheaterList.records`,
//! `data.suggestList`, `data.chapterList`) est une erreur de forme, ce qui
//! déclenche la bascule vers le miroir.

use crate::error::{DramaboxError, Result};
use crate::models::{CatalogEntry, Quality, StreamResult};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Chemin des fiches dans la réponse du théâtre (trending/latest)
pub const THEATER_RECORDS: &str = "/data/newTheaterList/records";
/// Chemin des suggestions de recherche
pub const SUGGEST_LIST: &str = "/data/suggestList";
/// Chemin des épisodes d'une série
pub const CHAPTER_LIST: &str = "/data/chapterList";

/// Qualité annoncée quand le CDN n'en donne pas
const DEFAULT_QUALITY: u32 = 720;

/// Fiche telle que renvoyée par le fournisseur
///
/// Les champs restent des `Value` : un type inattendu sur un champ est
/// converti au mieux ou ignoré, sans rejeter toute la liste.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct RawBook {
    book_id: Option<Value>,
    book_name: Option<Value>,
    cover_wap: Option<Value>,
    cover: Option<Value>,
    introduction: Option<Value>,
    tags: Option<Value>,
    chapter_count: Option<Value>,
    total_chapter: Option<Value>,
    rank_vo: Option<Value>,
}

/// Épisode tel que renvoyé par le fournisseur
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct RawChapter {
    chapter_index: Option<Value>,
    cover: Option<Value>,
    cdn_list: Option<Value>,
}

/// Source vidéo d'un épisode
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct RawCdn {
    quality: Option<Value>,
    video_path: Option<Value>,
    url: Option<Value>,
    is_default: Option<Value>,
}

/// Texte d'un champ : chaîne telle quelle, nombre en décimal
fn as_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Entier d'un champ : nombre (tronqué) ou chaîne numérique
fn as_i64(value: Option<&Value>) -> Option<i64> {
    let from_float = |f: f64| f.is_finite().then(|| f.trunc() as i64);
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(from_float)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(from_float))
        }
        _ => None,
    }
}

fn as_u64(value: Option<&Value>) -> Option<u64> {
    as_i64(value).and_then(|n| u64::try_from(n).ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Étiquettes convertibles en texte ; tout autre contenu donne une liste vide
fn tag_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(|t| as_text(Some(t))).collect(),
        _ => Vec::new(),
    }
}

impl RawBook {
    fn into_entry(self, keep_rank: bool) -> CatalogEntry {
        CatalogEntry {
            book_id: as_text(self.book_id.as_ref()),
            book_name: as_text(self.book_name.as_ref()),
            cover_image: non_empty(as_text(self.cover_wap.as_ref()))
                .or_else(|| as_text(self.cover.as_ref())),
            introduction: as_text(self.introduction.as_ref()),
            tags: tag_list(self.tags.as_ref()),
            chapter_count: as_u64(self.chapter_count.as_ref())
                .filter(|&count| count != 0)
                .or_else(|| as_u64(self.total_chapter.as_ref())),
            rank_info: if keep_rank { self.rank_vo } else { None },
        }
    }
}

impl RawChapter {
    fn index(&self) -> Option<i64> {
        as_i64(self.chapter_index.as_ref())
    }

    /// Sources du CDN ; une entrée qui n'est pas un objet devient une source vide
    fn cdn_sources(&mut self) -> Vec<RawCdn> {
        match self.cdn_list.take() {
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| serde_json::from_value(item).unwrap_or_default())
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl RawCdn {
    fn source(&self) -> Option<String> {
        non_empty(as_text(self.video_path.as_ref()))
            .or_else(|| non_empty(as_text(self.url.as_ref())))
    }

    fn into_quality(self) -> Quality {
        let video_path = self.source();
        Quality {
            quality: as_u64(self.quality.as_ref())
                .and_then(|q| u32::try_from(q).ok())
                .filter(|&q| q != 0)
                .unwrap_or(DEFAULT_QUALITY),
            video_path,
            is_default: as_i64(self.is_default.as_ref()).unwrap_or(0),
        }
    }
}

/// Extrait et désérialise le tableau situé à `pointer`
fn array_at<T: DeserializeOwned>(body: &Value, pointer: &str) -> Result<Vec<T>> {
    let items = body
        .pointer(pointer)
        .ok_or_else(|| DramaboxError::shape(format!("{} missing", pointer)))?;
    if !items.is_array() {
        return Err(DramaboxError::shape(format!("{} is not an array", pointer)));
    }
    serde_json::from_value(items.clone())
        .map_err(|e| DramaboxError::shape(format!("{}: {}", pointer, e)))
}

/// Fiches d'une réponse `theater`, avec le classement si `keep_rank`
///
/// Une liste vide est un succès : la page demandée n'existe simplement pas.
pub fn theater_entries(body: &Value, keep_rank: bool) -> Result<Vec<CatalogEntry>> {
    let books: Vec<RawBook> = array_at(body, THEATER_RECORDS)?;
    Ok(books.into_iter().map(|b| b.into_entry(keep_rank)).collect())
}

/// Fiches d'une réponse `search/suggest`
pub fn suggest_entries(body: &Value) -> Result<Vec<CatalogEntry>> {
    let books: Vec<RawBook> = array_at(body, SUGGEST_LIST)?;
    Ok(books.into_iter().map(|b| b.into_entry(false)).collect())
}

/// Position de l'épisode demandé, sinon du premier épisode
pub(crate) fn select_chapter(chapters: &[RawChapter], episode: i64) -> Option<usize> {
    if chapters.is_empty() {
        return None;
    }
    let wanted = episode - 1;
    Some(
        chapters
            .iter()
            .position(|ch| ch.index() == Some(wanted))
            .unwrap_or(0),
    )
}

/// Sources vidéo de l'épisode `episode` d'une réponse `chapterv2/batch/load`
///
/// Une liste d'épisodes vide est une erreur de forme : rien ne peut être lu.
pub fn stream_result(body: &Value, book_id: &str, episode: i64) -> Result<StreamResult> {
    let mut chapters: Vec<RawChapter> = array_at(body, CHAPTER_LIST)?;
    let total_episodes = chapters.len();
    let index = select_chapter(&chapters, episode)
        .ok_or_else(|| DramaboxError::shape(format!("{} is empty", CHAPTER_LIST)))?;
    let mut chapter = chapters.swap_remove(index);

    let cdn_list = chapter.cdn_sources();
    let video_url = cdn_list.first().and_then(RawCdn::source).unwrap_or_default();

    Ok(StreamResult {
        book_id: book_id.to_string(),
        episode,
        chapter_index: chapter.index(),
        video_url,
        cover: as_text(chapter.cover.as_ref()).unwrap_or_default(),
        qualities: cdn_list.into_iter().map(RawCdn::into_quality).collect(),
        total_episodes,
    })
}
