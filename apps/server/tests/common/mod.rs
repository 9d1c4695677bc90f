#![allow(dead_code)]

use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use spendwise_server::{api::app_router, build_state, config::Config};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

pub const PASSWORD: &str = "correct horse battery";

pub struct TestApp {
    pub router: Router,
    _dir: TempDir,
}

pub struct Session {
    pub token: String,
    pub user_id: String,
    pub company_id: String,
}

fn test_config(dir: &TempDir) -> Config {
    Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: dir.path().join("test.db").to_string_lossy().to_string(),
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(30),
        jwt_secret: None,
        token_ttl: Duration::from_secs(3600),
        upload_dir: dir.path().join("uploads"),
        max_upload_bytes: 1024,
        webhook_url: None,
        webhook_timeout: Duration::from_secs(1),
        log_format: "text".to_string(),
    }
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = tempdir().unwrap();
        let config = test_config(&dir);
        let state = build_state(&config).await.unwrap();
        Self {
            router: app_router(state, &config),
            _dir: dir,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let (status, bytes) = self.send(request).await;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    async fn register(&self, body: Value) -> Session {
        let (status, json) = self
            .request(Method::POST, "/api/v1/auth/register", None, Some(body))
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {json}");
        Session {
            token: json["accessToken"].as_str().unwrap().to_string(),
            user_id: json["user"]["id"].as_str().unwrap().to_string(),
            company_id: json["company"]["id"].as_str().unwrap().to_string(),
        }
    }

    /// Registers a new company; the caller becomes its admin.
    pub async fn register_company(&self, company: &str, email: &str) -> Session {
        self.register(json!({
            "name": "Admin",
            "email": email,
            "password": PASSWORD,
            "department": "Operations",
            "companyName": company,
        }))
        .await
    }

    /// Joins an existing company as an employee.
    pub async fn join(&self, company_id: &str, email: &str, department: &str) -> Session {
        self.register(json!({
            "name": email.split('@').next().unwrap(),
            "email": email,
            "password": PASSWORD,
            "department": department,
            "companyId": company_id,
        }))
        .await
    }

    /// Joins a company and has `admin` grant the given role.
    pub async fn join_as(
        &self,
        admin: &Session,
        email: &str,
        department: &str,
        role: &str,
    ) -> Session {
        let session = self.join(&admin.company_id, email, department).await;
        let (status, json) = self
            .put(
                &format!("/api/v1/users/{}/role", session.user_id),
                &admin.token,
                json!({ "role": role }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "role change failed: {json}");
        session
    }

    pub async fn submit(&self, session: &Session, body: Value) -> Value {
        let (status, json) = self.post("/api/v1/expenses", &session.token, body).await;
        assert_eq!(status, StatusCode::CREATED, "submit failed: {json}");
        json
    }
}

pub fn today() -> String {
    chrono::Utc::now().date_naive().to_string()
}
