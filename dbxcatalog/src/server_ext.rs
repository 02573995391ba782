//! Extension de dbxserver::Server pour monter la passerelle DramaBox
//!
//! `dbxserver` reste un serveur HTTP générique ; ce trait lui ajoute les
//! routes DramaBox sans que `dbxserver` dépende de `dbxcatalog`.

use crate::api_rest::{API_PREFIX, create_router, service_descriptor};
use crate::client::DramaboxClient;
use anyhow::Result;
use dbxconfig::Config;
use dbxserver::Server;
use std::sync::Arc;
use tracing::info;

/// Trait d'extension pour ajouter la passerelle à un serveur dbxserver
///
/// # Routes enregistrées
///
/// - `GET /` - Description du service
/// - `GET /api/dramabox/trending?page=` - Tendances
/// - `GET /api/dramabox/latest?page=` - Nouveautés
/// - `GET /api/dramabox/search?query=` - Recherche
/// - `GET /api/dramabox/stream?bookId=&episode=` - Sources vidéo d'un épisode
///
/// # Exemple
///
/// ```rust,no_run
/// use dbxcatalog::DramaboxServerExt;
/// use dbxserver::ServerBuilder;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = dbxconfig::get_config()?;
///     let mut server = ServerBuilder::new_configured(&config).build();
///     server.init_dramabox_configured(&config).await?;
///
///     server.start().await?;
///     server.wait().await;
///     Ok(())
/// }
/// ```
pub trait DramaboxServerExt {
    /// Enregistre les routes autour d'un client existant
    async fn register_dramabox(&mut self, client: Arc<DramaboxClient>);

    /// Crée le client depuis la configuration puis enregistre les routes
    async fn init_dramabox_configured(&mut self, config: &Config) -> Result<Arc<DramaboxClient>>;
}

impl DramaboxServerExt for Server {
    async fn register_dramabox(&mut self, client: Arc<DramaboxClient>) {
        self.add_router(API_PREFIX, create_router(client)).await;
        self.add_route("/", || async { service_descriptor() }).await;

        info!("API endpoints available at {}/*", API_PREFIX);
    }

    async fn init_dramabox_configured(&mut self, config: &Config) -> Result<Arc<DramaboxClient>> {
        let client = Arc::new(DramaboxClient::from_config(config)?);
        info!(
            api = %client.api().base_url(),
            mirror = %client.mirror().base_url(),
            "Initializing DramaBox client from configuration"
        );

        self.register_dramabox(client.clone()).await;
        Ok(client)
    }
}
