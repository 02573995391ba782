//! Chargement des épisodes d'une série

use super::DramaboxApi;
use crate::fallback::Attempt;
use crate::models::StreamResult;
use crate::normalize;
use serde::Serialize;
use tracing::debug;

pub const CHAPTER_ENDPOINT: &str = "/drama-box/chapterv2/batch/load";

/// Corps de la requête `chapterv2/batch/load`
///
/// Seuls `index` et `bookId` varient ; les autres champs reproduisent ce que
/// l'application Android envoie depuis l'onglet découverte.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterLoadRequest<'a> {
    pub boundary_index: i64,
    pub coming_play_section_id: i64,
    pub index: i64,
    pub currency_play_source: &'static str,
    pub need_end_recommend: i64,
    pub currency_play_source_name: &'static str,
    pub pre_load: bool,
    pub rid: &'static str,
    pub pull_cid: &'static str,
    pub load_direction: i64,
    pub start_up_key: &'static str,
    pub book_id: &'a str,
}

impl<'a> ChapterLoadRequest<'a> {
    pub fn new(book_id: &'a str, episode: i64) -> Self {
        Self {
            boundary_index: 0,
            coming_play_section_id: -1,
            index: episode,
            currency_play_source: "discover_new_rec_new",
            need_end_recommend: 0,
            currency_play_source_name: "",
            pre_load: false,
            rid: "",
            pull_cid: "",
            load_direction: 0,
            start_up_key: "",
            book_id,
        }
    }
}

impl DramaboxApi {
    /// Sources vidéo de l'épisode `episode` de `book_id`
    pub async fn load_chapter(&self, book_id: &str, episode: i64) -> Attempt<StreamResult> {
        debug!("Loading chapters of {} (episode {})", book_id, episode);
        let request = ChapterLoadRequest::new(book_id, episode);
        let response = self.post(CHAPTER_ENDPOINT, &request).await;
        Attempt::from_response(response, |body| {
            normalize::stream_result(&body, book_id, episode)
        })
    }
}
