use tracing::info;
use ytucatalog::CatalogExt;
use ytuconfig::get_config;
use ytuserver::{ServerBuilder, logs::LoggingOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ========== PHASE 1 : Infrastructure ==========

    let mut server = ServerBuilder::new_configured().build();
    server.init_logging(LoggingOptions::from_config()).await;

    info!("📂 Config directory: {}", get_config().config_dir());

    server
        .add_route("/info", || async {
            serde_json::json!({"version": env!("CARGO_PKG_VERSION")})
        })
        .await;

    // ========== PHASE 2 : Catalogue ==========

    info!("📺 Initializing YouTube catalog...");
    server.init_catalog().await?;

    // ========== PHASE 3 : Démarrage du serveur ==========

    info!("🌐 Starting HTTP server...");
    server.start().await;

    let info = server.info();
    info!("✅ YTUniverse is ready on port {}", info.http_port);
    info!("Press Ctrl+C to stop...");
    server.wait().await;

    Ok(())
}
