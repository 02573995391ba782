//! Gestion des erreurs pour le client DramaBox
//!
//! Ces erreurs ne remontent jamais jusqu'aux routes : le client les convertit
//! en bascule vers le miroir ou en résultat vide. Elles servent au logging et
//! à la construction du client.

use thiserror::Error;

/// Type Result personnalisé pour dbxcatalog
pub type Result<T> = std::result::Result<T, DramaboxError>;

/// Erreurs possibles lors d'un appel amont
#[derive(Error, Debug)]
pub enum DramaboxError {
    /// Erreur de transport (DNS, connexion refusée, timeout…)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Réponse HTTP hors 2xx
    #[error("Upstream returned status {code}: {message}")]
    Status { code: u16, message: String },

    /// Corps de réponse qui n'est pas du JSON
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// JSON valide mais chemin attendu absent ou mal typé
    #[error("Unexpected response shape: {0}")]
    Shape(String),

    /// En-tête impossible à encoder
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// URL de base invalide dans la configuration
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Erreur de configuration (anyhow)
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),
}

impl DramaboxError {
    /// Crée une erreur de forme de réponse
    pub fn shape(message: impl Into<String>) -> Self {
        Self::Shape(message.into())
    }
}
