//! Client du miroir public
//!
//! Le miroir renvoie déjà le schéma normalisé : les réponses sont relayées
//! telles quelles, après une validation minimale (tableau pour les listes,
//! `videoUrl` non vide pour un flux).

use crate::error::{DramaboxError, Result};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// URL de base du miroir
pub const DEFAULT_MIRROR_URL: &str = "https://dramabox.sansekai.my.id/api/dramabox";

/// User-Agent de navigateur envoyé au miroir
pub const MIRROR_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Client HTTP du miroir
#[derive(Debug, Clone)]
pub struct MirrorApi {
    client: Client,
    base_url: String,
}

impl MirrorApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(MIRROR_USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
            // Espace en `%20` ; un `+` littéral est déjà échappé en `%2B`
            let encoded = url.query().map(|q| q.replace('+', "%20"));
            url.set_query(encoded.as_deref());
        }
        Ok(url)
    }

    /// GET brut sur le miroir
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        let url = self.url(path, query)?;
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .inspect_err(|e| warn!("Fallback API error [{}]: {}", path, e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("Fallback API error [{}] ({}): {}", path, status, message);
            return Err(DramaboxError::Status {
                code: status.as_u16(),
                message,
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Liste relayée depuis `path` ; tout ce qui n'est pas un tableau devient `[]`
    pub async fn list(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<Value>> {
        match self.get(path, query).await? {
            Value::Array(items) => Ok(items),
            other => {
                debug!("Fallback API [{}] returned a non-array payload: {}", path, other);
                Ok(Vec::new())
            }
        }
    }

    pub async fn trending(&self) -> Result<Vec<Value>> {
        self.list("/trending", &[]).await
    }

    pub async fn latest(&self) -> Result<Vec<Value>> {
        self.list("/latest", &[]).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Value>> {
        self.list("/search", &[("query", query)]).await
    }

    /// Flux relayé si l'objet a un `videoUrl` non vide
    pub async fn stream(&self, book_id: &str, episode: i64) -> Result<Option<Value>> {
        let episode = episode.to_string();
        let payload = self
            .get("/stream", &[("bookId", book_id), ("episode", &episode)])
            .await?;
        Ok(has_video_url(&payload).then_some(payload))
    }
}

/// Équivalent du test de vérité JavaScript sur `videoUrl`
fn has_video_url(payload: &Value) -> bool {
    match payload.get("videoUrl") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(_) => true,
    }
}
