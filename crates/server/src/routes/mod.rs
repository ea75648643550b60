use axum::Router;
use tower_http::trace::TraceLayer;

use crate::DeploymentImpl;

pub mod auth;
pub mod files;
pub mod generate;
pub mod health;
pub mod projects;
pub mod sites;
pub mod templates;

pub fn router(deployment: DeploymentImpl) -> Router {
    let api_routes = Router::new()
        .merge(health::router(&deployment))
        .merge(generate::router(&deployment))
        .merge(auth::router(&deployment))
        .merge(projects::router(&deployment))
        .merge(files::router(&deployment))
        .merge(sites::router(&deployment))
        .merge(templates::router(&deployment));

    Router::new()
        .nest("/api", api_routes)
        .merge(sites::published_router(&deployment))
        .layer(TraceLayer::new_for_http())
        .with_state(deployment)
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
    };
    use db::DBService;
    use deployment::DeploymentConfig;
    use serde_json::{Value, json};
    use services::services::{
        generation::CodeGenerator,
        llm_client::{CompletionRequest, LlmError, TextGenerator},
    };
    use tokio_util::sync::CancellationToken;
    use tower::ServiceExt;

    use super::*;

    struct FixedGenerator(&'static str);

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    async fn app_with(code_generator: CodeGenerator) -> Router {
        let config = DeploymentConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            database_url: "sqlite::memory:".to_string(),
            api_key: None,
            generation_model: None,
            generation_timeout: Duration::from_secs(10),
            cookie_secure: false,
        };
        let db = DBService::new_in_memory().await.unwrap();
        router(DeploymentImpl::from_parts(
            config,
            db,
            code_generator,
            CancellationToken::new(),
        ))
    }

    async fn app() -> Router {
        app_with(CodeGenerator::demo()).await
    }

    struct TestResponse {
        status: StatusCode,
        headers: axum::http::HeaderMap,
        body: Vec<u8>,
    }

    impl TestResponse {
        fn json(&self) -> Value {
            serde_json::from_slice(&self.body).unwrap()
        }

        fn text(&self) -> String {
            String::from_utf8(self.body.clone()).unwrap()
        }

        /// `session=<id>` from the Set-Cookie header.
        fn session(&self) -> String {
            let set_cookie = self.headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
            set_cookie.split(';').next().unwrap().to_string()
        }
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    async fn sign_up(app: &Router, email: &str) -> String {
        let response = send(
            app,
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({ "email": email, "password": "pa55word", "fullName": "Test User" })),
        )
        .await;
        assert_eq!(response.status, StatusCode::OK);
        response.session()
    }

    #[tokio::test]
    async fn health_reports_demo_mode() {
        let app = app().await;
        let response = send(&app, Method::GET, "/api/health", None, None).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.json()["data"]["ai_configured"], false);
    }

    #[tokio::test]
    async fn generate_always_answers_200() {
        let app = app().await;

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/generate-code")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(
            &app,
            Method::POST,
            "/api/generate-code",
            None,
            Some(json!({ "prompt": "my portfolio" })),
        )
        .await;
        let body = response.json();
        assert_eq!(body["fallback"], true);
        assert_eq!(body["error"], false);
        assert_eq!(body["message"], "Demo mode - API key not configured");
        assert_eq!(body["files"].as_array().unwrap().len(), 3);
        assert!(
            body["files"][0]["content"]
                .as_str()
                .unwrap()
                .contains("Portfolio Website")
        );
    }

    #[tokio::test]
    async fn generate_uses_ai_output() {
        let generator = CodeGenerator::new(
            Some(Arc::new(FixedGenerator(
                r#"{"files":[{"name":"a.html","type":"file","path":"/a.html","content":"<html></html>"}]}"#,
            ))),
            Duration::from_secs(5),
            CancellationToken::new(),
        );
        let app = app_with(generator).await;

        let body = send(&app, Method::POST, "/api/generate-code", None, None)
            .await
            .json();
        assert_eq!(body["fallback"], false);
        assert!(body.get("message").is_none());
        assert_eq!(
            body["files"],
            json!([{ "name": "a.html", "type": "file", "path": "/a.html", "content": "<html></html>" }])
        );
    }

    #[tokio::test]
    async fn project_routes_require_session() {
        let app = app().await;
        let response = send(&app, Method::GET, "/api/projects", None, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.json()["success"], false);

        let response = send(
            &app,
            Method::GET,
            "/api/projects",
            Some("session=bogus"),
            None,
        )
        .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn sign_up_validation() {
        let app = app().await;
        let response = send(
            &app,
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({ "password": "x" })),
        )
        .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);

        sign_up(&app, "dup@example.com").await;
        let response = send(
            &app,
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({ "email": "dup@example.com", "password": "x" })),
        )
        .await;
        assert_eq!(response.status, StatusCode::CONFLICT);

        let response = send(
            &app,
            Method::POST,
            "/api/auth/signin",
            None,
            Some(json!({ "email": "dup@example.com", "password": "wrong" })),
        )
        .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn session_cookie_attributes_and_sign_out() {
        let app = app().await;
        let response = send(
            &app,
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({ "email": "c@example.com", "password": "pw" })),
        )
        .await;
        let set_cookie = response.headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("SameSite=Lax"));
        assert!(set_cookie.contains("Max-Age=2592000"));

        let cookie = response.session();
        let me = send(&app, Method::GET, "/api/auth/me", Some(&cookie), None).await;
        assert_eq!(me.json()["data"]["email"], "c@example.com");

        send(&app, Method::POST, "/api/auth/signout", Some(&cookie), None).await;
        let me = send(&app, Method::GET, "/api/auth/me", Some(&cookie), None).await;
        assert_eq!(me.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn project_file_lifecycle() {
        let app = app().await;
        let cookie = sign_up(&app, "files@example.com").await;

        let created = send(
            &app,
            Method::POST,
            "/api/projects",
            Some(&cookie),
            Some(json!({ "name": "Demo" })),
        )
        .await
        .json();
        let id = created["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(created["data"]["files"][0]["path"], "/index.html");

        let files_uri = format!("/api/projects/{}/files", id);
        let response = send(
            &app,
            Method::POST,
            &files_uri,
            Some(&cookie),
            Some(json!({ "name": "about.html", "type": "file" })),
        )
        .await;
        assert_eq!(response.status, StatusCode::OK);

        let response = send(
            &app,
            Method::POST,
            &files_uri,
            Some(&cookie),
            Some(json!({ "name": "about.html", "type": "file" })),
        )
        .await;
        assert_eq!(response.status, StatusCode::CONFLICT);

        send(
            &app,
            Method::PUT,
            &files_uri,
            Some(&cookie),
            Some(json!({ "path": "/about.html", "content": "<p>About</p>" })),
        )
        .await;
        send(
            &app,
            Method::POST,
            &format!("{}/rename", files_uri),
            Some(&cookie),
            Some(json!({ "oldPath": "/about.html", "newName": "team.html" })),
        )
        .await;

        let file = send(
            &app,
            Method::GET,
            &format!("{}?path=/team.html", files_uri),
            Some(&cookie),
            None,
        )
        .await
        .json();
        assert_eq!(file["data"]["content"], "<p>About</p>");

        let deleted = send(
            &app,
            Method::DELETE,
            &format!("{}?path=/team.html", files_uri),
            Some(&cookie),
            None,
        )
        .await
        .json();
        assert_eq!(deleted["data"]["files"].as_array().unwrap().len(), 1);

        let missing = send(
            &app,
            Method::GET,
            &format!("{}?path=/team.html", files_uri),
            Some(&cookie),
            None,
        )
        .await;
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn export_and_import_round_trip() {
        let app = app().await;
        let cookie = sign_up(&app, "export@example.com").await;
        let created = send(
            &app,
            Method::POST,
            "/api/projects",
            Some(&cookie),
            Some(json!({ "name": "Exported" })),
        )
        .await
        .json();
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let export = send(
            &app,
            Method::GET,
            &format!("/api/projects/{}/export", id),
            Some(&cookie),
            None,
        )
        .await;
        assert_eq!(export.status, StatusCode::OK);
        let disposition = export.headers.get(header::CONTENT_DISPOSITION).unwrap();
        assert_eq!(disposition, "attachment; filename=\"Exported.json\"");
        let document = export.json();
        assert!(document.get("lastModified").is_some());

        let imported = send(
            &app,
            Method::POST,
            "/api/projects/import",
            Some(&cookie),
            Some(document.clone()),
        )
        .await
        .json();
        assert_ne!(imported["data"]["id"], document["id"]);
        assert_eq!(imported["data"]["files"], document["files"]);

        let invalid = send(
            &app,
            Method::POST,
            "/api/projects/import",
            Some(&cookie),
            Some(json!({ "name": "no files" })),
        )
        .await;
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn private_projects_hidden_from_other_users() {
        let app = app().await;
        let owner = sign_up(&app, "owner@example.com").await;
        let other = sign_up(&app, "other@example.com").await;
        let created = send(
            &app,
            Method::POST,
            "/api/projects",
            Some(&owner),
            Some(json!({ "name": "Secret" })),
        )
        .await
        .json();
        let uri = format!("/api/projects/{}", created["data"]["id"].as_str().unwrap());

        assert_eq!(
            send(&app, Method::GET, &uri, Some(&other), None).await.status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            send(&app, Method::DELETE, &uri, Some(&other), None).await.status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            send(&app, Method::GET, &uri, Some(&owner), None).await.status,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn publish_and_serve_site() {
        let app = app().await;
        let cookie = sign_up(&app, "publisher@example.com").await;
        let template = send(
            &app,
            Method::POST,
            "/api/templates/startup-landing/use",
            Some(&cookie),
            None,
        )
        .await
        .json();
        let project_id = template["data"]["id"].as_str().unwrap().to_string();

        let site = send(
            &app,
            Method::POST,
            "/api/sites",
            Some(&cookie),
            Some(json!({ "projectId": project_id, "name": "Launch Day" })),
        )
        .await
        .json();
        assert_eq!(site["data"]["slug"], "launch-day");

        let page = send(&app, Method::GET, "/published/launch-day", None, None).await;
        assert_eq!(page.status, StatusCode::OK);
        assert!(page.text().contains("Launchpad"));

        let suggestion = send(
            &app,
            Method::GET,
            "/api/sites/slug?name=Launch%20Day",
            Some(&cookie),
            None,
        )
        .await
        .json();
        assert_eq!(suggestion["data"], "launch-day-1");

        let public = send(&app, Method::GET, "/api/sites/public", None, None).await.json();
        assert_eq!(public["data"][0]["views_count"], 1);
    }

    #[tokio::test]
    async fn published_pages_are_sandboxed() {
        let app = app().await;
        let cookie = sign_up(&app, "sandbox@example.com").await;
        let project = send(
            &app,
            Method::POST,
            "/api/projects",
            Some(&cookie),
            Some(json!({
                "name": "Scripted",
                "files": [{
                    "name": "index.html",
                    "type": "file",
                    "path": "/index.html",
                    "content": "<script>fetch('/api/projects',{credentials:'include'})</script>"
                }]
            })),
        )
        .await
        .json();
        send(
            &app,
            Method::POST,
            "/api/sites",
            Some(&cookie),
            Some(json!({ "projectId": project["data"]["id"], "name": "scripted" })),
        )
        .await;

        let page = send(&app, Method::GET, "/published/scripted", None, None).await;
        assert_eq!(page.status, StatusCode::OK);
        let csp = page
            .headers
            .get(header::CONTENT_SECURITY_POLICY)
            .unwrap()
            .to_str()
            .unwrap();
        assert_eq!(csp, sites::PUBLISHED_PAGE_CSP);
        assert!(csp.starts_with("sandbox"));
        assert!(!csp.contains("allow-same-origin"));
    }

    #[tokio::test]
    async fn oversized_generation_body_still_gets_a_site() {
        let app = app().await;
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/generate-code")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(vec![b' '; 3 * 1024 * 1024]))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["fallback"], true);
        assert!(
            body["files"][0]["content"]
                .as_str()
                .unwrap()
                .contains("Modern Website")
        );
    }

    #[tokio::test]
    async fn malformed_ids_use_the_error_envelope() {
        let app = app().await;
        let cookie = sign_up(&app, "ids@example.com").await;
        for uri in [
            "/api/projects/not-a-uuid",
            "/api/projects/not-a-uuid/files?path=/index.html",
            "/api/sites/not-a-uuid",
        ] {
            let response = send(&app, Method::GET, uri, Some(&cookie), None).await;
            assert_eq!(response.status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(response.json()["success"], false, "{uri}");
        }
    }

    #[tokio::test]
    async fn concurrent_file_creates_are_not_lost() {
        let app = app().await;
        let cookie = sign_up(&app, "race@example.com").await;
        let created = send(
            &app,
            Method::POST,
            "/api/projects",
            Some(&cookie),
            Some(json!({ "name": "Race" })),
        )
        .await
        .json();
        let id = created["data"]["id"].as_str().unwrap().to_string();
        let files_uri = format!("/api/projects/{}/files", id);

        let (a, b) = tokio::join!(
            send(
                &app,
                Method::POST,
                &files_uri,
                Some(&cookie),
                Some(json!({ "name": "a.html" })),
            ),
            send(
                &app,
                Method::POST,
                &files_uri,
                Some(&cookie),
                Some(json!({ "name": "b.html" })),
            )
        );
        assert_eq!(a.status, StatusCode::OK);
        assert_eq!(b.status, StatusCode::OK);

        let project = send(
            &app,
            Method::GET,
            &format!("/api/projects/{}", id),
            Some(&cookie),
            None,
        )
        .await
        .json();
        let paths: Vec<&str> = project["data"]["files"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["path"].as_str().unwrap())
            .collect();
        assert!(paths.contains(&"/a.html"));
        assert!(paths.contains(&"/b.html"));
    }

    #[tokio::test]
    async fn template_catalog_is_public() {
        let app = app().await;
        let list = send(&app, Method::GET, "/api/templates", None, None).await.json();
        assert_eq!(list["data"].as_array().unwrap().len(), 3);
        assert!(list["data"][0].get("files").is_none());

        let missing = send(&app, Method::GET, "/api/templates/nope", None, None).await;
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
    }
}
