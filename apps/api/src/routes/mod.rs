pub mod catalog;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::export::handlers as export;
use crate::state::AppState;
use crate::store::handlers as draft;
use crate::validation::handlers as validation;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/catalog", get(catalog::catalog_handler))
        // Form state
        .route("/api/v1/draft", get(draft::handle_get_draft))
        .route("/api/v1/draft/field", patch(draft::handle_update_field))
        .route(
            "/api/v1/draft/sets/:set/toggle",
            post(draft::handle_toggle_member),
        )
        .route("/api/v1/draft/rows/:list", post(draft::handle_append_row))
        .route(
            "/api/v1/draft/images/:slot",
            post(draft::handle_upload_image)
                .delete(draft::handle_clear_image)
                .layer(upload_limit),
        )
        // Validation and submit
        .route("/api/v1/draft/validation", get(validation::handle_validate))
        .route("/api/v1/draft/hints", get(validation::handle_hints))
        .route("/api/v1/draft/generate", post(export::handle_generate))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::draft::fixtures::submittable_draft;
    use crate::draft::ResumeDraft;
    use crate::export::JsonFileExporter;
    use crate::persistence::memory::MemoryStore;
    use crate::persistence::DebouncedSaver;
    use crate::store::ingest::test_support::png_bytes;
    use crate::store::ingest::DataUrlDecoder;
    use crate::store::FormStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const BOUNDARY: &str = "resume-test-boundary";

    fn test_state(dir: &TempDir, initial: ResumeDraft) -> AppState {
        let config = Config::for_data_dir(dir.path());
        let saver = DebouncedSaver::new(
            Arc::new(MemoryStore::default()),
            config.storage_key.clone(),
            config.persist_debounce,
        );
        AppState {
            store: Arc::new(FormStore::new(initial, saver, Arc::new(DataUrlDecoder))),
            exporter: Arc::new(JsonFileExporter::new(&config.export_dir)),
            config,
        }
    }

    async fn send(state: &AppState, req: Request<Body>) -> (StatusCode, Value) {
        let resp = build_router(state.clone()).oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_req(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn upload_req(slot: &str, content_type: &str, payload: &[u8]) -> Request<Body> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"upload\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(payload);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(format!("/api/v1/draft/images/{slot}"))
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, ResumeDraft::empty());
        let (status, body) = send(&state, get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_catalog_lists_logos() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, ResumeDraft::empty());
        let (status, body) = send(&state, get_req("/api/v1/catalog")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["logos"][0], "LeetCode");
        assert_eq!(body["databases"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_get_draft_returns_template() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, ResumeDraft::empty());
        let (status, body) = send(&state, get_req("/api/v1/draft")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["projects"].as_array().unwrap().len(), 3);
        assert_eq!(body["certs"][0]["addLink"], false);
        assert_eq!(body["personal"]["photo"], Value::Null);
    }

    #[tokio::test]
    async fn test_patch_field_by_array_and_dotted_path() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, ResumeDraft::empty());

        let (status, body) = send(
            &state,
            json_req(
                "PATCH",
                "/api/v1/draft/field",
                json!({"path": ["projects", 1, "title"], "value": "Lexer"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["applied"], true);
        assert_eq!(body["draft"]["projects"][1]["title"], "Lexer");

        let (_, body) = send(
            &state,
            json_req(
                "PATCH",
                "/api/v1/draft/field",
                json!({"path": "contact.personalEmail", "value": "a@b.dev"}),
            ),
        )
        .await;
        assert_eq!(body["applied"], true);
        assert_eq!(state.store.snapshot().contact.personal_email, "a@b.dev");
    }

    #[tokio::test]
    async fn test_patch_unresolvable_path_is_not_applied() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, ResumeDraft::empty());
        let (status, body) = send(
            &state,
            json_req(
                "PATCH",
                "/api/v1/draft/field",
                json!({"path": "projects.7.title", "value": "x"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["applied"], false);
        assert_eq!(body["draft"]["projects"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_malformed_field_updates_use_error_envelope() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, ResumeDraft::empty());
        for payload in [
            json!({"path": 42, "value": "x"}),
            json!({"path": "personal.name"}),
            json!({"path": "", "value": "x"}),
            json!({"path": "contact..github", "value": "x"}),
        ] {
            let (status, body) =
                send(&state, json_req("PATCH", "/api/v1/draft/field", payload.clone())).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR", "{payload}");
        }
        assert_eq!(*state.store.snapshot(), ResumeDraft::empty());
    }

    #[tokio::test]
    async fn test_field_update_without_json_content_type() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, ResumeDraft::empty());
        let req = Request::builder()
            .method("PATCH")
            .uri("/api/v1/draft/field")
            .body(Body::from(r#"{"path":"personal.name","value":"Asha"}"#))
            .unwrap();
        let (status, body) = send(&state, req).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"]["code"], "UNSUPPORTED_MEDIA_TYPE");
    }

    #[tokio::test]
    async fn test_toggle_with_malformed_body_is_bad_request() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, ResumeDraft::empty());
        let (status, body) = send(
            &state,
            json_req("POST", "/api/v1/draft/sets/web/toggle", json!({"items": ["React"]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_upload_without_multipart_body_is_bad_request() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, ResumeDraft::empty());
        let (status, body) = send(
            &state,
            json_req("POST", "/api/v1/draft/images/photo", json!({"file": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_upload_over_limit_is_payload_too_large() {
        let dir = TempDir::new().unwrap();
        let mut state = test_state(&dir, ResumeDraft::empty());
        state.config.max_upload_bytes = 1024;

        let (status, body) = send(&state, upload_req("photo", "image/png", &png_bytes(4096))).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
        assert!(state.store.snapshot().personal.photo.is_none());
    }

    #[tokio::test]
    async fn test_toggle_and_unknown_set() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, ResumeDraft::empty());

        let (status, body) = send(
            &state,
            json_req(
                "POST",
                "/api/v1/draft/sets/tools/toggle",
                json!({"item": "Docker"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["draft"]["skills"]["tools"], json!(["Docker"]));

        let (status, body) = send(
            &state,
            json_req(
                "POST",
                "/api/v1/draft/sets/hobbies/toggle",
                json!({"item": "Chess"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_append_rows_stops_at_five() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, ResumeDraft::empty());
        let mut applied = Vec::new();
        for _ in 0..3 {
            let (_, body) = send(&state, json_req("POST", "/api/v1/draft/rows/achieves", json!({}))).await;
            applied.push(body["applied"].as_bool().unwrap());
        }
        assert_eq!(applied, vec![true, true, false]);
        assert_eq!(state.store.snapshot().achieves.len(), 5);
    }

    #[tokio::test]
    async fn test_upload_gif_is_unsupported_media_type() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, ResumeDraft::empty());
        let (status, body) = send(&state, upload_req("photo", "image/gif", b"GIF89a")).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"]["code"], "UNSUPPORTED_MEDIA_TYPE");
        assert!(state.store.snapshot().personal.photo.is_none());
    }

    #[tokio::test]
    async fn test_upload_png_is_accepted_then_applied() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, ResumeDraft::empty());
        let (status, body) = send(&state, upload_req("portfolio", "image/png", &png_bytes(64))).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["status"], "decoding");

        for _ in 0..100 {
            if state.store.snapshot().qr.portfolio.is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let portfolio = state.store.snapshot().qr.portfolio.clone().expect("decoded");
        assert!(portfolio.as_str().starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_upload_to_unknown_slot_is_bad_request() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, ResumeDraft::empty());
        let (status, _) = send(&state, upload_req("banner", "image/png", &png_bytes(4))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_image_clears_slot() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, submittable_draft());
        let req = Request::builder()
            .method("DELETE")
            .uri("/api/v1/draft/images/photo")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&state, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["applied"], true);
        assert_eq!(body["draft"]["personal"]["photo"], Value::Null);
    }

    #[tokio::test]
    async fn test_validation_report_on_empty_draft() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, ResumeDraft::empty());
        let (status, body) = send(&state, get_req("/api/v1/draft/validation")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], false);
        assert_eq!(body["first_error"], "name");
        assert_eq!(body["errors"]["logos"], "Select exactly 4 logos");
        assert_eq!(body["errors"]["project2"], "Each project needs title, tech and 10–30 word description");
    }

    #[tokio::test]
    async fn test_hints_report_word_counts() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, submittable_draft());
        let (status, body) = send(&state, get_req("/api/v1/draft/hints")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["word_counts"][0]["field"], "projects.0.desc");
        assert_eq!(body["word_counts"][0]["words"], 15);
        assert_eq!(body["logos_selected"], 4);
    }

    #[tokio::test]
    async fn test_generate_blocked_with_422() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, ResumeDraft::empty());
        let (status, body) = send(&state, json_req("POST", "/api/v1/draft/generate", json!({}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["first_error"], "name");
        assert!(!dir.path().join("exports").exists());
    }

    #[tokio::test]
    async fn test_generate_exports_valid_draft() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, submittable_draft());
        let (status, body) = send(&state, json_req("POST", "/api/v1/draft/generate", json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        let location = body["location"].as_str().unwrap();
        assert!(std::path::Path::new(location).is_file());
        assert!(location.starts_with(dir.path().join("exports").to_str().unwrap()));
    }
}
