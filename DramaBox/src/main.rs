use dbxcatalog::DramaboxServerExt;
use dbxserver::{LoggingOptions, ServerBuilder, init_logging};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ========== PHASE 1 : Configuration et logs ==========
    let config = dbxconfig::get_config()?;
    init_logging(LoggingOptions::from_config(&config))?;
    info!("📁 Configuration loaded from {}", config.dir());

    // ========== PHASE 2 : Passerelle DramaBox ==========
    let mut server = ServerBuilder::new_configured(&config).build();
    let client = server.init_dramabox_configured(&config).await?;
    info!(
        "🎬 DramaBox gateway ready (primary {}, mirror {})",
        client.api().base_url(),
        client.mirror().base_url()
    );

    // ========== PHASE 3 : Écoute HTTP ==========
    if !config.get_listen() {
        info!("host.listen is false, not opening a socket");
        return Ok(());
    }

    let addr = server.start().await?;
    info!("✅ Listening on {}", addr);

    server.wait().await;
    info!("👋 Server stopped");
    Ok(())
}
