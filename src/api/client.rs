use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::fmt::Display;
use std::time::Duration;
use tracing::{debug, error};

use super::traits::NotesApi;
use super::types::{AuthRequest, LoginResponse, NewNote, Note, NotePatch, RegisterResponse};
use crate::session::SessionContext;
use crate::utils::{Operation, TareasError};

/// reqwest-backed client for the notes REST API.
///
/// Stateless per call apart from the session, which is asked for the current
/// token right before every authenticated request.
pub struct HttpApiClient {
    client: Client,
    base_url: String,
    session: SessionContext,
}

impl HttpApiClient {
    /// Create a client; `timeout` of `None` keeps the transport default
    pub fn new(
        base_url: &str,
        session: SessionContext,
        timeout: Option<Duration>,
    ) -> Result<Self, TareasError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TareasError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer token if one is stored; without one the request goes
    /// out bare and the server decides
    async fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token().await {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn execute(&self, request: RequestBuilder, op: Operation) -> Result<Response, TareasError> {
        debug!("Sending {} request", op);

        let response = request.send().await.map_err(|e| request_failed(op, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(request_failed(op, format!("HTTP {}", status)));
        }

        Ok(response)
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        op: Operation,
    ) -> Result<T, TareasError> {
        let response = self.execute(request, op).await?;
        response.json::<T>().await.map_err(|e| request_failed(op, e))
    }
}

fn request_failed(op: Operation, cause: impl Display) -> TareasError {
    error!("Error in {}: {}", op, cause);
    TareasError::RequestFailed(op)
}

#[async_trait]
impl NotesApi for HttpApiClient {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, TareasError> {
        let request = self
            .client
            .post(self.url("/auth/login"))
            .json(&AuthRequest { username, password });

        self.execute_json(request, Operation::Login).await
    }

    async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<RegisterResponse, TareasError> {
        let request = self
            .client
            .post(self.url("/auth/register"))
            .json(&AuthRequest { username, password });

        let body: serde_json::Value = self.execute_json(request, Operation::Register).await?;
        Ok(RegisterResponse::from_body(body))
    }

    async fn list_notes(&self) -> Result<Vec<Note>, TareasError> {
        let request = self.authorized(self.client.get(self.url("/tareas"))).await;
        self.execute_json(request, Operation::ListNotes).await
    }

    async fn get_note(&self, id: i64) -> Result<Note, TareasError> {
        let request = self
            .authorized(self.client.get(self.url(&format!("/tareas/{}", id))))
            .await;
        self.execute_json(request, Operation::GetNote(id)).await
    }

    async fn create_note(&self, note: &NewNote) -> Result<Note, TareasError> {
        let request = self
            .authorized(self.client.post(self.url("/tareas")).json(note))
            .await;
        self.execute_json(request, Operation::CreateNote).await
    }

    async fn update_note(&self, id: i64, patch: &NotePatch) -> Result<Note, TareasError> {
        let request = self
            .authorized(self.client.put(self.url(&format!("/tareas/{}", id))).json(patch))
            .await;
        self.execute_json(request, Operation::UpdateNote(id)).await
    }

    async fn delete_note(&self, id: i64) -> Result<(), TareasError> {
        let request = self
            .authorized(self.client.delete(self.url(&format!("/tareas/{}", id))))
            .await;
        // Body, if any, is ignored
        self.execute(request, Operation::DeleteNote(id)).await?;
        Ok(())
    }

    fn base_url(&self) -> String {
        self.base_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TOKEN_KEY;
    use crate::storage::MemoryCredentialStore;
    use axum::{
        extract::{Path, State},
        http::{HeaderMap, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Recorded {
        auth_headers: Arc<Mutex<Vec<Option<String>>>>,
        bodies: Arc<Mutex<Vec<Value>>>,
    }

    impl Recorded {
        fn record(&self, headers: &HeaderMap) {
            let value = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            self.auth_headers.lock().push(value);
        }
    }

    fn sample_note(id: i64) -> Value {
        json!({ "id": id, "titulo": format!("note {}", id), "descripcion": "<p>body</p>", "completada": false })
    }

    async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        if body["password"] == "longpassword" {
            (StatusCode::OK, Json(json!({ "token": "abc123" })))
        } else {
            (StatusCode::UNAUTHORIZED, Json(json!({ "error": "invalid" })))
        }
    }

    async fn register(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        match body["username"].as_str() {
            Some("taken@b.co") => (StatusCode::CONFLICT, Json(json!({ "error": "exists" }))),
            Some("noid@b.co") => (StatusCode::OK, Json(json!({ "username": "noid@b.co" }))),
            _ => (StatusCode::CREATED, Json(json!({ "id": 9, "username": body["username"] }))),
        }
    }

    async fn list(State(rec): State<Recorded>, headers: HeaderMap) -> Json<Value> {
        rec.record(&headers);
        Json(json!([sample_note(2), sample_note(1)]))
    }

    async fn create(
        State(rec): State<Recorded>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        rec.record(&headers);
        rec.bodies.lock().push(body.clone());
        let mut note = body;
        note["id"] = json!(42);
        (StatusCode::CREATED, Json(note))
    }

    async fn show(
        State(rec): State<Recorded>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Json<Value>, StatusCode> {
        rec.record(&headers);
        if id == 404 {
            Err(StatusCode::NOT_FOUND)
        } else {
            Ok(Json(sample_note(id)))
        }
    }

    async fn update(
        State(rec): State<Recorded>,
        Path(id): Path<i64>,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        rec.bodies.lock().push(body.clone());
        let mut note = sample_note(id);
        if let Some(done) = body.get("completada") {
            note["completada"] = done.clone();
        }
        Json(note)
    }

    async fn remove(Path(id): Path<i64>) -> StatusCode {
        if id == 5 {
            StatusCode::OK
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    async fn spawn_server() -> (String, Recorded) {
        let recorded = Recorded::default();
        let router = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/register", post(register))
            .route("/api/tareas", get(list).post(create))
            .route("/api/tareas/{id}", get(show).put(update).delete(remove))
            .with_state(recorded.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        (format!("http://{}/api/", addr), recorded)
    }

    fn client_with_token(base_url: &str, token: Option<&str>) -> HttpApiClient {
        let store = match token {
            Some(token) => MemoryCredentialStore::with_entry(TOKEN_KEY, token),
            None => MemoryCredentialStore::new(),
        };
        HttpApiClient::new(base_url, SessionContext::new(Arc::new(store)), None).unwrap()
    }

    #[tokio::test]
    async fn test_login_success_and_unauthorized() {
        let (base_url, _) = spawn_server().await;
        let client = client_with_token(&base_url, None);

        let resp = client.login("a@b.co", "longpassword").await.unwrap();
        assert_eq!(resp.token.as_deref(), Some("abc123"));

        let err = client.login("a@b.co", "wrongpassword").await.unwrap_err();
        assert!(matches!(err, TareasError::RequestFailed(Operation::Login)));
    }

    #[tokio::test]
    async fn test_register_outcomes() {
        let (base_url, _) = spawn_server().await;
        let client = client_with_token(&base_url, None);

        let ok = client.register("new@b.co", "longpassword").await.unwrap();
        assert!(ok.success);
        assert_eq!(ok.user.unwrap()["id"], json!(9));

        let no_id = client.register("noid@b.co", "longpassword").await.unwrap();
        assert!(!no_id.success);

        let err = client.register("taken@b.co", "longpassword").await.unwrap_err();
        assert!(matches!(err, TareasError::RequestFailed(Operation::Register)));
    }

    #[tokio::test]
    async fn test_bearer_token_read_per_call() {
        let (base_url, recorded) = spawn_server().await;
        let store = Arc::new(MemoryCredentialStore::new());
        let session = SessionContext::new(store.clone());
        let client = HttpApiClient::new(&base_url, session.clone(), None).unwrap();

        // No token: header omitted, server still answers
        client.list_notes().await.unwrap();

        session.save_token("abc123").await.unwrap();
        let notes = client.list_notes().await.unwrap();
        assert_eq!(notes.iter().map(|n| n.id).collect::<Vec<_>>(), vec![2, 1]);

        session.sign_out().await.unwrap();
        client.get_note(3).await.unwrap();

        assert_eq!(
            *recorded.auth_headers.lock(),
            vec![None, Some("Bearer abc123".to_string()), None]
        );
    }

    #[tokio::test]
    async fn test_create_returns_server_note() {
        let (base_url, recorded) = spawn_server().await;
        let client = client_with_token(&base_url, Some("abc123"));

        let created = client
            .create_note(&NewNote {
                title: "x".to_string(),
                description: "y".to_string(),
                completed: false,
            })
            .await
            .unwrap();

        assert_eq!(
            created,
            Note {
                id: 42,
                title: "x".to_string(),
                description: "y".to_string(),
                completed: false,
            }
        );
        assert_eq!(
            recorded.bodies.lock()[0],
            json!({ "titulo": "x", "descripcion": "y", "completada": false })
        );
    }

    #[tokio::test]
    async fn test_update_sends_partial_body() {
        let (base_url, recorded) = spawn_server().await;
        let client = client_with_token(&base_url, Some("abc123"));

        let patch = NotePatch {
            completed: Some(true),
            ..NotePatch::default()
        };
        let updated = client.update_note(7, &patch).await.unwrap();

        assert!(updated.completed);
        assert_eq!(recorded.bodies.lock()[0], json!({ "completada": true }));
    }

    #[tokio::test]
    async fn test_not_found_and_delete_failures() {
        let (base_url, _) = spawn_server().await;
        let client = client_with_token(&base_url, Some("abc123"));

        assert!(matches!(
            client.get_note(404).await,
            Err(TareasError::RequestFailed(Operation::GetNote(404)))
        ));
        client.delete_note(5).await.unwrap();
        assert!(matches!(
            client.delete_note(6).await,
            Err(TareasError::RequestFailed(Operation::DeleteNote(6)))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_request_failure() {
        // Bind and drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_with_token(&format!("http://{}/api", addr), Some("abc123"));
        assert!(matches!(
            client.list_notes().await,
            Err(TareasError::RequestFailed(Operation::ListNotes))
        ));
    }

    #[test]
    fn test_base_url_is_normalized() {
        let client = client_with_token("http://example.test/api///", None);
        assert_eq!(client.base_url(), "http://example.test/api");
        assert_eq!(client.url("/tareas"), "http://example.test/api/tareas");
    }
}
