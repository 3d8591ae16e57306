use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use enigma_config::ServerSettings;
use enigma_observability::{init_tracing, TracingConfig};
use hybrid_chat::handlers::{self, VisualizationFile};
use hybrid_chat::HybridChat;
use std::path::PathBuf;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    enigma_config::load_dotenv();
    init_tracing(TracingConfig::for_service("hybrid-chat"));

    let settings = ServerSettings::from_env().context("invalid server settings")?;
    let chat = web::Data::new(HybridChat::from_env().context("failed to configure hybrid chat")?);
    let visualization = web::Data::new(VisualizationFile(PathBuf::from(&settings.visualization_path)));

    tracing::info!(host = %settings.host, port = settings.port, "Starting hybrid chat server");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .app_data(chat.clone())
            .app_data(visualization.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .configure(handlers::configure)
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await?;

    Ok(())
}
