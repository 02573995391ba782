//! Identité d'appareil et token de requête pour l'API primaire
//!
//! Chaque appel à l'API primaire porte un identifiant d'appareil et un token
//! qui en dérive : `md5(device_id + timestamp_millis + secret)`. Le cache
//! ci-dessous n'en garde qu'un et le remplace une fois sa durée de vie écoulée.

use crate::error::Result;
use chrono::{DateTime, TimeDelta, Utc};
use md5::{Digest, Md5};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

const SECRET_KEY: &str = "dramabox_secret_2024";
const APP_VERSION: &str = "430";
const APP_VERSION_NAME: &str = "4.3.0";
const PACKAGE_NAME: &str = "com.storymatrix.drama";
const CID: &str = "DRA1000042";
const USER_AGENT: &str = "okhttp/4.10.0";
/// Ancien code ISO 639 de l'indonésien, celui qu'envoie le client Android
const LANGUAGE: &str = "in";
const TIME_ZONE: &str = "+0700";

/// Durée de vie par défaut d'un token en cache
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(30 * 60);

/// Un identifiant d'appareil et le token émis pour lui
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenState {
    /// 32 caractères hexadécimaux minuscules
    pub token: String,
    /// 32 caractères hexadécimaux minuscules
    pub device_id: String,
    pub issued_at: DateTime<Utc>,
}

impl TokenState {
    /// Émet un token pour `device_id` à l'instant `issued_at`
    pub fn issue(device_id: String, issued_at: DateTime<Utc>) -> Self {
        let timestamp = issued_at.timestamp_millis().to_string();
        Self {
            token: sign(&device_id, &timestamp),
            device_id,
            issued_at,
        }
    }

    /// En-têtes d'identité client pour l'API primaire
    pub fn headers(&self) -> Result<HeaderMap> {
        let pairs: [(&'static str, String); 14] = [
            ("user-agent", USER_AGENT.to_string()),
            ("accept-encoding", "gzip".to_string()),
            ("content-type", "application/json".to_string()),
            ("tn", format!("Bearer {}", self.token)),
            ("version", APP_VERSION.to_string()),
            ("vn", APP_VERSION_NAME.to_string()),
            ("cid", CID.to_string()),
            ("package-name", PACKAGE_NAME.to_string()),
            ("apn", "1".to_string()),
            ("device-id", self.device_id.clone()),
            ("language", LANGUAGE.to_string()),
            ("current-language", LANGUAGE.to_string()),
            ("p", "43".to_string()),
            ("time-zone", TIME_ZONE.to_string()),
        ];

        let mut headers = HeaderMap::with_capacity(pairs.len());
        for (name, value) in pairs {
            headers.insert(HeaderName::from_static(name), HeaderValue::from_str(&value)?);
        }
        Ok(headers)
    }
}

/// UUID v4 aléatoire sans tirets
pub fn generate_device_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn sign(device_id: &str, timestamp: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(device_id.as_bytes());
    hasher.update(timestamp.as_bytes());
    hasher.update(SECRET_KEY.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Cache à un seul token, avec durée de vie
///
/// Partagé par toutes les requêtes d'un client. La vérification et le
/// renouvellement se font sous le verrou : un seul token par fenêtre.
#[derive(Debug)]
pub struct TokenCache {
    ttl: TimeDelta,
    slot: Mutex<Option<TokenState>>,
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_TTL)
    }
}

impl TokenCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            slot: Mutex::new(None),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<TokenState>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Token en cache, renouvelé s'il est absent ou expiré
    pub fn get_valid_token(&self) -> TokenState {
        self.get_valid_token_at(Utc::now())
    }

    /// Comme [`get_valid_token`](Self::get_valid_token), avec une horloge explicite
    pub fn get_valid_token_at(&self, now: DateTime<Utc>) -> TokenState {
        let mut slot = self.slot();
        if let Some(state) = slot.as_ref() {
            let expired = state
                .issued_at
                .checked_add_signed(self.ttl)
                .is_some_and(|expires_at| now > expires_at);
            if !expired {
                return state.clone();
            }
        }

        let state = TokenState::issue(generate_device_id(), now);
        debug!(device_id = %state.device_id, "Issued new DramaBox token");
        *slot = Some(state.clone());
        state
    }

    /// Oublie le token en cache
    pub fn clear(&self) {
        *self.slot() = None;
    }
}
