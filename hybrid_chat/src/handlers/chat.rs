use actix_web::{web, HttpResponse};
use enigma_models::{DocumentHit, GraphHit};
use serde::{Deserialize, Serialize};

use crate::errors::{ChatError, ChatResult};
use crate::orchestrator::{HybridChat, ANSWER_TOP_K};

const MAX_DISPLAY_TOP_K: usize = 10;

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub query: String,
    #[serde(default)]
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
    pub documents: Vec<DocumentHit>,
    pub graph_hits: Vec<GraphHit>,
}

#[derive(Debug, Deserialize)]
pub struct EvidenceQuery {
    pub query: String,
    #[serde(default)]
    pub top_k: Option<usize>,
}

fn display_top_k(requested: Option<usize>) -> usize {
    requested.unwrap_or(ANSWER_TOP_K).clamp(1, MAX_DISPLAY_TOP_K)
}

/// Rejects blank queries. Accepted queries reach the pipeline verbatim.
fn non_empty(query: &str) -> ChatResult<&str> {
    if query.trim().is_empty() {
        return Err(ChatError::EmptyQuery);
    }
    Ok(query)
}

/// Answer a question, then attach display evidence. Evidence failures only
/// leave the lists empty.
pub async fn answer(chat: web::Data<HybridChat>, req: web::Json<AnswerRequest>) -> ChatResult<HttpResponse> {
    let query = non_empty(&req.query)?;
    let top_k = display_top_k(req.top_k);

    let answer = chat.answer(query).await?;
    let documents = chat.document_evidence(query, top_k).await;
    let graph_hits = chat.graph_evidence(query).await;

    Ok(HttpResponse::Ok().json(AnswerResponse {
        answer,
        documents: documents.items,
        graph_hits: graph_hits.items,
    }))
}

pub async fn document_evidence(
    chat: web::Data<HybridChat>,
    params: web::Query<EvidenceQuery>,
) -> ChatResult<HttpResponse> {
    let query = non_empty(&params.query)?;
    let evidence = chat.document_evidence(query, display_top_k(params.top_k)).await;
    Ok(HttpResponse::Ok().json(evidence))
}

pub async fn graph_evidence(
    chat: web::Data<HybridChat>,
    params: web::Query<EvidenceQuery>,
) -> ChatResult<HttpResponse> {
    let query = non_empty(&params.query)?;
    let evidence = chat.graph_evidence(query).await;
    Ok(HttpResponse::Ok().json(evidence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{configure, VisualizationFile};
    use crate::test_support::{chat, Backends};
    use actix_web::{http::StatusCode, test as actix_test, App};
    use serde_json::{json, Value};
    use serial_test::serial;
    use std::path::PathBuf;

    macro_rules! app {
        ($backends:expr) => {
            actix_test::init_service(
                App::new()
                    .app_data(web::Data::new(chat(&$backends)))
                    .app_data(web::Data::new(VisualizationFile(PathBuf::from("missing.html"))))
                    .configure(configure),
            )
            .await
        };
    }

    #[test]
    fn display_top_k_is_clamped() {
        assert_eq!(display_top_k(None), 3);
        assert_eq!(display_top_k(Some(0)), 1);
        assert_eq!(display_top_k(Some(7)), 7);
        assert_eq!(display_top_k(Some(50)), 10);
    }

    #[actix_web::test]
    #[serial]
    async fn answer_includes_evidence() {
        std::env::set_var("OPENAI_API_KEY", "sk-test");
        let backends = Backends::travel();
        let app = app!(backends);

        let req = actix_test::TestRequest::post()
            .uri("/api/chat/answer")
            .set_json(json!({"query": "park", "top_k": 1}))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: AnswerResponse = actix_test::read_body_json(resp).await;
        assert!(body.answer.contains("Central Park"));
        assert_eq!(body.documents.len(), 1);
        assert_eq!(body.documents[0].id, "doc1");
        assert_eq!(body.graph_hits.len(), 2);
    }

    #[actix_web::test]
    #[serial]
    async fn answer_failure_is_a_single_message() {
        std::env::remove_var("OPENAI_API_KEY");
        let backends = Backends::travel();
        let app = app!(backends);

        let req = actix_test::TestRequest::post()
            .uri("/api/chat/answer")
            .set_json(json!({"query": "park"}))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "Configuration error: OPENAI_API_KEY must be set"}));
        assert_eq!(backends.backend_calls(), 0);
    }

    #[actix_web::test]
    #[serial]
    async fn evidence_failure_does_not_hide_the_answer() {
        std::env::set_var("OPENAI_API_KEY", "sk-test");
        let backends = Backends::travel();
        let app = app!(backends);

        // Warm the cache for the answer's own arguments, then break the index
        // so the display fetch with a different top_k fails.
        let warm = actix_test::TestRequest::post()
            .uri("/api/chat/answer")
            .set_json(json!({"query": "park"}))
            .to_request();
        actix_test::call_service(&app, warm).await;
        backends.fail_vector();

        let req = actix_test::TestRequest::post()
            .uri("/api/chat/answer")
            .set_json(json!({"query": "park", "top_k": 5}))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: AnswerResponse = actix_test::read_body_json(resp).await;
        assert!(!body.answer.is_empty());
        assert!(body.documents.is_empty());
        assert_eq!(body.graph_hits.len(), 2);
    }

    #[actix_web::test]
    #[serial]
    async fn query_reaches_the_prompt_untrimmed() {
        std::env::set_var("OPENAI_API_KEY", "sk-test");
        let backends = Backends::travel();
        let app = app!(backends);

        let req = actix_test::TestRequest::post()
            .uri("/api/chat/answer")
            .set_json(json!({"query": "  park  "}))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let request = backends.last_request().unwrap();
        assert!(request.messages[1].content.ends_with("Question:   park  \n"));
    }

    #[actix_web::test]
    async fn blank_query_is_rejected() {
        let backends = Backends::travel();
        let app = app!(backends);

        let req = actix_test::TestRequest::post()
            .uri("/api/chat/answer")
            .set_json(json!({"query": "   "}))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(backends.backend_calls(), 0);
    }

    #[actix_web::test]
    async fn document_evidence_endpoint() {
        let backends = Backends::travel();
        let app = app!(backends);

        let req = actix_test::TestRequest::get()
            .uri("/api/chat/evidence/documents?query=Central%20Park&top_k=2")
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["items"].as_array().map(Vec::len), Some(2));
        assert_eq!(body["items"][0]["id"], "doc1");
        assert!(body.get("diagnostic").is_none());
    }

    #[actix_web::test]
    async fn graph_evidence_endpoint_reports_diagnostic() {
        let backends = Backends::travel();
        backends.fail_graph();
        let app = app!(backends);

        let req = actix_test::TestRequest::get()
            .uri("/api/chat/evidence/graph?query=park")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["items"], json!([]));
        assert_eq!(body["diagnostic"], "graph database error: connection refused");
    }
}
