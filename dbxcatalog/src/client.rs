//! Client haut-niveau de la passerelle DramaBox
//!
//! Chaque opération tente l'API primaire, puis le miroir une seule fois si la
//! tentative échoue. Aucune erreur ne remonte à l'appelant : un double échec
//! donne une liste vide ou `None`.

use crate::api::theater::TheaterRequest;
use crate::api::{DEFAULT_API_URL, DEFAULT_TIMEOUT, DramaboxApi};
use crate::config_ext::DramaboxConfigExt;
use crate::error::Result;
use crate::fallback::{Attempt, Decision, decide};
use crate::mirror::{DEFAULT_MIRROR_URL, MirrorApi};
use crate::models::{CatalogEntry, CatalogPage, StreamLookup};
use crate::token::TokenCache;
use dbxconfig::Config;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use url::Url;

/// Client principal de la passerelle
#[derive(Debug, Clone)]
pub struct DramaboxClient {
    api: DramaboxApi,
    mirror: MirrorApi,
}

impl DramaboxClient {
    /// Client sur les URL publiques par défaut
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Client configuré depuis la section `dramabox` de la configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::builder()
            .api_url(config.get_dramabox_api_url())
            .mirror_url(config.get_dramabox_mirror_url())
            .timeout(config.get_dramabox_timeout())
            .token_ttl(config.get_dramabox_token_ttl())
            .build()
    }

    /// Accès à l'API primaire seule
    pub fn api(&self) -> &DramaboxApi {
        &self.api
    }

    /// Accès au miroir seul
    pub fn mirror(&self) -> &MirrorApi {
        &self.mirror
    }

    /// Tendances, classement inclus
    pub async fn trending(&self, page: i64) -> CatalogPage {
        let attempt = self.api.theater(&TheaterRequest::trending(page)).await;
        self.list_or_mirror("trending", attempt, self.mirror.trending())
            .await
    }

    /// Nouveautés
    pub async fn latest(&self, page: i64) -> CatalogPage {
        let attempt = self.api.theater(&TheaterRequest::latest(page)).await;
        self.list_or_mirror("latest", attempt, self.mirror.latest())
            .await
    }

    /// Recherche par mot-clé
    pub async fn search(&self, keyword: &str) -> CatalogPage {
        let attempt = self.api.search_suggest(keyword).await;
        self.list_or_mirror("search", attempt, self.mirror.search(keyword))
            .await
    }

    /// Sources vidéo d'un épisode, `None` si introuvable des deux côtés
    pub async fn stream(&self, book_id: &str, episode: i64) -> Option<StreamLookup> {
        match decide(self.api.load_chapter(book_id, episode).await) {
            Decision::Use(result) => Some(StreamLookup::Primary(result)),
            Decision::Fallback(reason) => {
                info!("Direct API failed for stream ({}), trying fallback...", reason);
                match self.mirror.stream(book_id, episode).await {
                    Ok(payload) => payload.map(StreamLookup::Mirror),
                    Err(e) => {
                        error!("Both APIs failed for stream: {}", e);
                        None
                    }
                }
            }
        }
    }

    async fn list_or_mirror<F>(
        &self,
        operation: &str,
        attempt: Attempt<Vec<CatalogEntry>>,
        mirror: F,
    ) -> CatalogPage
    where
        F: Future<Output = Result<Vec<Value>>>,
    {
        match decide(attempt) {
            Decision::Use(entries) => CatalogPage::Primary(entries),
            Decision::Fallback(reason) => {
                info!(
                    "Direct API failed for {} ({}), trying fallback...",
                    operation, reason
                );
                match mirror.await {
                    Ok(items) => CatalogPage::Mirror(items),
                    Err(e) => {
                        error!("Both APIs failed for {}: {}", operation, e);
                        CatalogPage::Mirror(Vec::new())
                    }
                }
            }
        }
    }
}

/// Builder pour configurer un DramaboxClient
#[derive(Debug)]
pub struct ClientBuilder {
    api_url: String,
    mirror_url: String,
    timeout: Duration,
    token_ttl: Duration,
    tokens: Option<Arc<TokenCache>>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            mirror_url: DEFAULT_MIRROR_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            token_ttl: crate::token::DEFAULT_TOKEN_TTL,
            tokens: None,
        }
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Définit l'URL de base de l'API primaire
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Définit l'URL de base du miroir
    pub fn mirror_url(mut self, url: impl Into<String>) -> Self {
        self.mirror_url = url.into();
        self
    }

    /// Définit le délai appliqué à chaque appel amont
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Définit la durée de vie du token, ignorée si un cache est fourni
    pub fn token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Partage un cache de tokens existant
    pub fn token_cache(mut self, tokens: Arc<TokenCache>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Construit le client
    pub fn build(self) -> Result<DramaboxClient> {
        Url::parse(&self.api_url)?;
        Url::parse(&self.mirror_url)?;

        let tokens = self
            .tokens
            .unwrap_or_else(|| Arc::new(TokenCache::new(self.token_ttl)));

        Ok(DramaboxClient {
            api: DramaboxApi::with_timeout(self.api_url, tokens, self.timeout)?,
            mirror: MirrorApi::new(self.mirror_url, self.timeout)?,
        })
    }
}
