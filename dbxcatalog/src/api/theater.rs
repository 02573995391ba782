//! Listes du théâtre : tendances et nouveautés

use super::DramaboxApi;
use crate::fallback::Attempt;
use crate::models::CatalogEntry;
use crate::normalize;
use serde::Serialize;
use tracing::debug;

/// Endpoint commun aux deux listes
pub const THEATER_ENDPOINT: &str = "/drama-box/he001/theater";

const TRENDING_CHANNEL: u32 = 43;
const LATEST_CHANNEL: u32 = 48;

/// Corps de la requête `theater`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TheaterRequest {
    pub new_channel_style: u8,
    pub is_need_rank: u8,
    pub page_no: i64,
    pub index: u32,
    pub channel_id: u32,
}

impl TheaterRequest {
    /// Page `page_no` des tendances (classement inclus)
    pub fn trending(page_no: i64) -> Self {
        Self {
            new_channel_style: 1,
            is_need_rank: 1,
            page_no,
            index: 1,
            channel_id: TRENDING_CHANNEL,
        }
    }

    /// Page `page_no` des nouveautés
    pub fn latest(page_no: i64) -> Self {
        Self {
            is_need_rank: 0,
            channel_id: LATEST_CHANNEL,
            ..Self::trending(page_no)
        }
    }

    fn keeps_rank(&self) -> bool {
        self.is_need_rank == 1
    }
}

impl DramaboxApi {
    /// Interroge le théâtre et normalise les fiches
    pub async fn theater(&self, request: &TheaterRequest) -> Attempt<Vec<CatalogEntry>> {
        debug!(
            "Fetching theater channel {} page {}",
            request.channel_id, request.page_no
        );
        let response = self.post(THEATER_ENDPOINT, request).await;
        Attempt::from_response(response, |body| {
            normalize::theater_entries(&body, request.keeps_rank())
        })
    }
}
