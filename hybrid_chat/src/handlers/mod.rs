use actix_web::{web, HttpResponse};
use std::path::PathBuf;

pub mod admin;
pub mod chat;

pub use admin::{clear_cache, health, prewarm, visualization};
pub use chat::{answer, document_evidence, graph_evidence};

/// Location of the exported graph page served by `/api/chat/visualization`.
#[derive(Debug, Clone)]
pub struct VisualizationFile(pub PathBuf);

/// Register every route. Expects `web::Data<HybridChat>` and
/// `web::Data<VisualizationFile>` on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/chat")
            .route("/answer", web::post().to(chat::answer))
            .route("/evidence/documents", web::get().to(chat::document_evidence))
            .route("/evidence/graph", web::get().to(chat::graph_evidence))
            .route("/cache/clear", web::post().to(admin::clear_cache))
            .route("/prewarm", web::post().to(admin::prewarm))
            .route("/visualization", web::get().to(admin::visualization)),
    )
    .route("/health", web::get().to(admin::health))
    .default_service(web::to(|| async {
        HttpResponse::NotFound().json(serde_json::json!({ "error": "Not found" }))
    }));
}
