//! Couche d'accès à l'API DramaBox primaire
//!
//! Toutes les requêtes sont des POST JSON signés par les en-têtes du
//! [`TokenCache`]. Les sous-modules construisent les charges utiles et
//! classent chaque appel en [`Attempt`](crate::fallback::Attempt).

pub mod chapter;
pub mod search;
pub mod theater;

use crate::error::{DramaboxError, Result};
use crate::token::TokenCache;
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// URL de base de l'API DramaBox
pub const DEFAULT_API_URL: &str = "https://sapi.dramaboxdb.com";

/// Délai maximal d'un appel amont
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Client API bas-niveau pour l'API primaire
#[derive(Debug, Clone)]
pub struct DramaboxApi {
    /// Client HTTP
    client: Client,
    /// URL de base, sans slash final
    base_url: String,
    /// Jeton partagé entre toutes les requêtes
    tokens: Arc<TokenCache>,
}

impl DramaboxApi {
    /// Crée une nouvelle instance avec le délai par défaut
    pub fn new(base_url: impl Into<String>, tokens: Arc<TokenCache>) -> Result<Self> {
        Self::with_timeout(base_url, tokens, DEFAULT_TIMEOUT)
    }

    /// Crée une nouvelle instance avec un délai explicite
    pub fn with_timeout(
        base_url: impl Into<String>,
        tokens: Arc<TokenCache>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).gzip(true).build()?;
        Ok(Self::with_client(client, base_url, tokens))
    }

    /// Crée une instance autour d'un client HTTP existant
    pub fn with_client(client: Client, base_url: impl Into<String>, tokens: Arc<TokenCache>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    /// Retourne l'URL de base
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Retourne le cache de jetons
    pub fn tokens(&self) -> &Arc<TokenCache> {
        &self.tokens
    }

    /// Effectue un POST JSON signé et renvoie le corps brut
    pub(crate) async fn post<P: Serialize + ?Sized>(&self, endpoint: &str, payload: &P) -> Result<Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        let headers = self.tokens.get_valid_token().headers()?;

        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(payload)
            .send()
            .await
            .inspect_err(|e| warn!("Direct API error [{}]: {}", endpoint, e))?;

        self.handle_response(endpoint, response).await
    }

    /// Traite la réponse HTTP
    async fn handle_response(&self, endpoint: &str, response: Response) -> Result<Value> {
        let status = response.status();

        debug!("Response status: {}", status);

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Direct API error [{}] ({}): {}", endpoint, status, error_text);
            return Err(DramaboxError::Status {
                code: status.as_u16(),
                message: error_text,
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            warn!("Direct API error [{}]: failed to parse response: {}", endpoint, e);
            DramaboxError::JsonParse(e)
        })
    }
}
