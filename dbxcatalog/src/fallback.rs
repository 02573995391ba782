//! Stratégie primaire puis miroir
//!
//! Un appel à l'API primaire aboutit à une [`Attempt`] ; [`decide`] en tire
//! soit un résultat à servir, soit une raison d'interroger le miroir.
//! [`Attempt::from_response`] est le seul endroit qui classe les erreurs.

use crate::error::DramaboxError;
use std::fmt;

/// Issue d'un appel à l'API primaire
#[derive(Debug)]
pub enum Attempt<T> {
    /// Charge utile trouvée et normalisée
    Success(T),
    /// L'appel a échoué (réseau, délai, statut hors 2xx, corps illisible)
    Transport(DramaboxError),
    /// L'appel a réussi mais le chemin attendu manque
    ShapeMismatch(String),
}

impl<T> Attempt<T> {
    /// Classe le résultat brut d'un appel et normalise le corps en cas de succès
    ///
    /// Toute erreur d'appel autre que [`DramaboxError::Shape`] est une erreur
    /// de transport, `JsonParse` compris.
    pub fn from_response<B, F>(response: Result<B, DramaboxError>, normalize: F) -> Self
    where
        F: FnOnce(B) -> Result<T, DramaboxError>,
    {
        match response {
            Err(DramaboxError::Shape(message)) => Self::ShapeMismatch(message),
            Err(e) => Self::Transport(e),
            Ok(body) => match normalize(body) {
                Ok(value) => Self::Success(value),
                Err(DramaboxError::Shape(message)) => Self::ShapeMismatch(message),
                Err(e) => Self::ShapeMismatch(e.to_string()),
            },
        }
    }
}

/// Pourquoi le miroir est interrogé
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    Transport(String),
    Shape(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport failure: {}", e),
            Self::Shape(e) => write!(f, "shape mismatch: {}", e),
        }
    }
}

/// Que faire d'une tentative primaire
#[derive(Debug, PartialEq)]
pub enum Decision<T> {
    Use(T),
    Fallback(FallbackReason),
}

/// Servir le résultat ou demander au miroir
pub fn decide<T>(attempt: Attempt<T>) -> Decision<T> {
    match attempt {
        Attempt::Success(value) => Decision::Use(value),
        Attempt::Transport(e) => Decision::Fallback(FallbackReason::Transport(e.to_string())),
        Attempt::ShapeMismatch(message) => Decision::Fallback(FallbackReason::Shape(message)),
    }
}
