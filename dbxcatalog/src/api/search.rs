//! Recherche par mot-clé

use super::DramaboxApi;
use crate::fallback::Attempt;
use crate::models::CatalogEntry;
use crate::normalize;
use serde::Serialize;
use tracing::debug;

pub const SEARCH_ENDPOINT: &str = "/drama-box/search/suggest";

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    keyword: &'a str,
}

impl DramaboxApi {
    /// Suggestions pour `keyword`
    pub async fn search_suggest(&self, keyword: &str) -> Attempt<Vec<CatalogEntry>> {
        debug!("Searching for {:?}", keyword);
        let response = self.post(SEARCH_ENDPOINT, &SearchRequest { keyword }).await;
        Attempt::from_response(response, |body| normalize::suggest_entries(&body))
    }
}
