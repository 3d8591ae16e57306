use actix_web::{web, HttpResponse};
use std::io::ErrorKind;

use super::VisualizationFile;
use crate::errors::{ChatError, ChatResult};
use crate::orchestrator::HybridChat;

pub async fn clear_cache(chat: web::Data<HybridChat>) -> HttpResponse {
    chat.clear_cache();
    HttpResponse::Ok().json(serde_json::json!({ "status": "cleared" }))
}

pub async fn prewarm(chat: web::Data<HybridChat>) -> ChatResult<HttpResponse> {
    chat.prewarm().await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "warm" })))
}

pub async fn visualization(file: web::Data<VisualizationFile>) -> ChatResult<HttpResponse> {
    let html = match tokio::fs::read_to_string(&file.0).await {
        Ok(html) => html,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ChatError::VisualizationMissing(file.0.display().to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

pub async fn health(chat: web::Data<HybridChat>) -> HttpResponse {
    let stats = chat.cache_stats();
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "hybrid-chat",
        "cache": {
            "entries": stats.entries,
            "hits": stats.hits,
            "misses": stats.misses,
        }
    }))
}
