//! # dbxcatalog - Passerelle vers le catalogue DramaBox
//!
//! Cette crate interroge l'API DramaBox de l'application Android, réduit ses
//! réponses à un schéma stable et bascule vers un miroir public quand l'API
//! primaire échoue.
//!
//! ## Architecture
//!
//! - `DramaboxClient` : client principal (primaire puis miroir)
//! - `token` : identifiant d'appareil, jeton MD5 et cache à durée de vie
//! - `api` : couche d'accès à l'API primaire (POST JSON signés)
//! - `mirror` : client du miroir (GET, réponses relayées telles quelles)
//! - `fallback` : tentative classée et décision de bascule
//! - `normalize` : conversion des réponses primaires
//! - `api_rest` : endpoints HTTP
//!
//! ## Structure des modules
//!
//! ```text
//! dbxcatalog/
//! ├── src/
//! │   ├── lib.rs              # Module principal (ce fichier)
//! │   ├── client.rs           # Client principal et builder
//! │   ├── models.rs           # Structures de données servies
//! │   ├── api/
//! │   │   ├── mod.rs          # API client
//! │   │   ├── theater.rs      # Tendances et nouveautés
//! │   │   ├── search.rs       # Recherche
//! │   │   └── chapter.rs      # Épisodes et sources vidéo
//! │   ├── mirror.rs           # Miroir public
//! │   ├── fallback.rs         # Décision de bascule
//! │   ├── normalize.rs        # Conversion des réponses
//! │   ├── token.rs            # Jeton et cache
//! │   ├── api_rest.rs         # Handlers HTTP
//! │   ├── server_ext.rs       # Extension de dbxserver::Server
//! │   ├── config_ext.rs       # Extension de dbxconfig::Config
//! │   └── error.rs            # Gestion des erreurs
//! ```
//!
//! ## Utilisation
//!
//! ```rust,no_run
//! use dbxcatalog::DramaboxClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = DramaboxClient::new()?;
//!
//!     let trending = client.trending(1).await;
//!     println!("{} dramas en tendance", trending.len());
//!
//!     if let Some(stream) = client.stream("41000101", 1).await {
//!         println!("Episode 1 : {:?}", stream.video_url());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Bascule
//!
//! Une tentative primaire aboutit à un succès, une erreur de transport
//! (réseau, délai de 15 s, statut hors 2xx, corps illisible) ou une erreur de
//! forme (chemin attendu absent). Les deux dernières déclenchent un unique
//! appel au miroir. Si le miroir échoue aussi, les listes sont vides et le
//! flux vaut `None`.

pub mod api;
pub mod api_rest;
pub mod client;
pub mod config_ext;
pub mod error;
pub mod fallback;
pub mod mirror;
pub mod models;
pub mod normalize;
pub mod server_ext;
pub mod token;

pub use client::{ClientBuilder, DramaboxClient};
pub use config_ext::DramaboxConfigExt;
pub use error::{DramaboxError, Result};
pub use fallback::{Attempt, Decision, FallbackReason, decide};
pub use models::{CatalogEntry, CatalogPage, Quality, StreamLookup, StreamResult};
pub use server_ext::DramaboxServerExt;
pub use token::{TokenCache, TokenState};
