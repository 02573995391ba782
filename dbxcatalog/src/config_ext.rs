//! Extension pour intégrer la configuration DramaBox dans dbxconfig
//!
//! Ce module fournit le trait `DramaboxConfigExt` qui ajoute à
//! `dbxconfig::Config` les paramètres des API amont (section `dramabox`).

use crate::api::{DEFAULT_API_URL, DEFAULT_TIMEOUT};
use crate::mirror::DEFAULT_MIRROR_URL;
use crate::token::DEFAULT_TOKEN_TTL;
use anyhow::Result;
use dbxconfig::Config;
use serde_yaml::Value;
use std::time::Duration;

/// Trait d'extension pour la section `dramabox` de la configuration
///
/// # Exemple
///
/// ```rust,ignore
/// use dbxconfig::get_config;
/// use dbxcatalog::DramaboxConfigExt;
///
/// let config = get_config()?;
/// println!("Primary API: {}", config.get_dramabox_api_url());
/// ```
pub trait DramaboxConfigExt {
    /// URL de base de l'API primaire (`dramabox.api_url`)
    fn get_dramabox_api_url(&self) -> String;

    /// Définit l'URL de base de l'API primaire
    fn set_dramabox_api_url(&self, url: &str) -> Result<()>;

    /// URL de base du miroir (`dramabox.mirror_url`)
    fn get_dramabox_mirror_url(&self) -> String;

    /// Définit l'URL de base du miroir
    fn set_dramabox_mirror_url(&self, url: &str) -> Result<()>;

    /// Délai maximal de chaque appel amont (`dramabox.timeout_secs`)
    fn get_dramabox_timeout(&self) -> Duration;

    /// Durée de vie d'un jeton (`dramabox.token_ttl_secs`)
    fn get_dramabox_token_ttl(&self) -> Duration;
}

impl DramaboxConfigExt for Config {
    fn get_dramabox_api_url(&self) -> String {
        self.get_string_or(&["dramabox", "api_url"], DEFAULT_API_URL)
    }

    fn set_dramabox_api_url(&self, url: &str) -> Result<()> {
        self.set_value(&["dramabox", "api_url"], Value::String(url.to_string()))
    }

    fn get_dramabox_mirror_url(&self) -> String {
        self.get_string_or(&["dramabox", "mirror_url"], DEFAULT_MIRROR_URL)
    }

    fn set_dramabox_mirror_url(&self, url: &str) -> Result<()> {
        self.set_value(&["dramabox", "mirror_url"], Value::String(url.to_string()))
    }

    fn get_dramabox_timeout(&self) -> Duration {
        Duration::from_secs(self.get_u64_or(&["dramabox", "timeout_secs"], DEFAULT_TIMEOUT.as_secs()))
    }

    fn get_dramabox_token_ttl(&self) -> Duration {
        Duration::from_secs(
            self.get_u64_or(&["dramabox", "token_ttl_secs"], DEFAULT_TOKEN_TTL.as_secs()),
        )
    }
}
