//! # HTTP gateway to the file service
//!
//! [`ApiClient`] is the only place that talks HTTP. It owns a
//! [`reqwest::Client`], the base URL from [`store::ClientConfig`], and the
//! explicit [`Session`] whose token it attaches to every request except login
//! and registration.
//!
//! ## Response handling
//!
//! Every call goes through [`ApiClient::send`]:
//!
//! 1. no response at all → [`ApiError::Transport`];
//! 2. non-2xx → body classified by [`ApiError::from_response`]; a `401` on an
//!    authenticated request also ends the session;
//! 3. 2xx → body decoded, a decode failure being [`ApiError::Unexpected`].
//!
//! ## Uploads
//!
//! On native targets the file part is streamed in [`CHUNK_SIZE`] slices and
//! every slice handed to the connection advances the [`ProgressTracker`]. The
//! browser `fetch` backend cannot observe a request body, so on web the upload
//! goes through `XMLHttpRequest` instead (see `browser_upload`). Both are
//! bounded by `api.upload_timeout_secs`; a timeout surfaces as a transport
//! error.
//!
//! [`CHUNK_SIZE`]: crate::progress::CHUNK_SIZE

use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
use reqwest::multipart;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use store::ClientConfig;

use crate::error::ApiError;
use crate::models::{
    Address, AddressDraft, DashboardStats, FileRecord, Profile, ProfileUpdate, Registration,
    TokenResponse,
};
use crate::progress::ProgressTracker;
use crate::service::{AuthService, FileService, ProfileService};
use crate::session::Session;
use crate::upload::UploadIntent;

/// REST client bound to one base URL and one session.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
    upload_timeout: Duration,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: Session) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            session,
            upload_timeout: Duration::from_secs(config.api.upload_timeout_secs),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Request carrying the session's bearer token.
    fn authorized(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.http.request(method, self.url(path));
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Request without credentials (login, registration).
    fn anonymous(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    async fn send(&self, request: RequestBuilder, authenticated: bool) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!("Request failed without response: {}", e);
            ApiError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(self.rejected(status.as_u16(), &body, authenticated))
    }

    /// Classify an error response; a 401 on an authenticated call ends the
    /// session.
    fn rejected(&self, status: u16, body: &str, authenticated: bool) -> ApiError {
        tracing::debug!("Error response {}: {}", status, body);
        if authenticated && status == StatusCode::UNAUTHORIZED.as_u16() {
            tracing::info!("Server rejected the session token, ending session");
            self.session.end();
        }
        ApiError::from_response(status, body)
    }

    async fn json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        authenticated: bool,
    ) -> Result<T, ApiError> {
        let response = self.send(request, authenticated).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Unexpected(e.to_string()))
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn file_part(intent: &UploadIntent, progress: ProgressTracker) -> multipart::Part {
        use futures::StreamExt;

        let total = intent.bytes.len() as u64;
        let mut sent = 0u64;
        let chunks = crate::progress::chunked(&intent.bytes);
        let stream = futures::stream::iter(chunks).map(move |chunk| {
            sent += chunk.len() as u64;
            progress.report_bytes(sent, total);
            Ok::<_, std::io::Error>(chunk)
        });
        multipart::Part::stream_with_length(reqwest::Body::wrap_stream(stream), total)
            .file_name(intent.filename.clone())
    }

    #[cfg(not(target_arch = "wasm32"))]
    async fn send_upload(
        &self,
        intent: &UploadIntent,
        replace_existing: bool,
        progress: ProgressTracker,
    ) -> Result<FileRecord, ApiError> {
        let form = multipart::Form::new()
            .part("file", Self::file_part(intent, progress))
            .text("replace_existing", if replace_existing { "true" } else { "false" });
        let request = self
            .authorized(Method::POST, "/upload/")
            .multipart(form)
            .timeout(self.upload_timeout);
        self.json(request, true).await
    }

    #[cfg(target_arch = "wasm32")]
    async fn send_upload(
        &self,
        intent: &UploadIntent,
        replace_existing: bool,
        progress: ProgressTracker,
    ) -> Result<FileRecord, ApiError> {
        let response = crate::browser_upload::post_multipart(
            &self.url("/upload/"),
            self.session.token(),
            intent,
            replace_existing,
            self.upload_timeout,
            progress,
        )
        .await?;
        if !(200..300).contains(&response.status) {
            return Err(self.rejected(response.status, &response.body, true));
        }
        serde_json::from_str(&response.body).map_err(|e| ApiError::Unexpected(e.to_string()))
    }
}

impl AuthService for ApiClient {
    async fn login(&self, username: &str, password: &str) -> Result<(), ApiError> {
        let request = self
            .anonymous(Method::POST, "/token")
            .form(&[("username", username), ("password", password)]);
        let token: TokenResponse = self.json(request, false).await?;
        self.session.begin(&token.access_token);
        tracing::info!("Logged in as {}", username);
        Ok(())
    }

    async fn register(&self, registration: &Registration) -> Result<Profile, ApiError> {
        let request = self.anonymous(Method::POST, "/users/").json(registration);
        let profile: Profile = self.json(request, false).await?;
        tracing::info!("Registered account {}", profile.username);
        Ok(profile)
    }

    async fn logout(&self) {
        if let Err(e) = self.send(self.authorized(Method::POST, "/logout"), true).await {
            tracing::warn!("Logout error: {}", e);
        }
        self.session.end();
        tracing::info!("Logged out");
    }
}

impl FileService for ApiClient {
    async fn list_files(&self) -> Result<Vec<FileRecord>, ApiError> {
        self.json(self.authorized(Method::GET, "/files/"), true).await
    }

    async fn upload_file(
        &self,
        intent: &UploadIntent,
        replace_existing: bool,
        progress: ProgressTracker,
    ) -> Result<FileRecord, ApiError> {
        tracing::debug!(
            "Uploading {} ({} bytes, replace_existing={})",
            intent.filename,
            intent.bytes.len(),
            replace_existing
        );
        let record = self
            .send_upload(intent, replace_existing, progress.clone())
            .await?;
        progress.report(100);
        tracing::info!("Uploaded {} as file {}", record.filename, record.id);
        Ok(record)
    }

    async fn download_file(&self, file_id: i64) -> Result<Vec<u8>, ApiError> {
        let path = format!("/files/{file_id}/download");
        let response = self.send(self.authorized(Method::GET, &path), true).await?;
        let bytes = response.bytes().await.map_err(ApiError::from)?;
        Ok(bytes.to_vec())
    }

    async fn delete_file(&self, file_id: i64) -> Result<(), ApiError> {
        let path = format!("/files/{file_id}");
        self.send(self.authorized(Method::DELETE, &path), true).await?;
        tracing::info!("Deleted file {}", file_id);
        Ok(())
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.json(self.authorized(Method::GET, "/dashboard/stats"), true)
            .await
    }
}

impl ProfileService for ApiClient {
    async fn profile(&self) -> Result<Profile, ApiError> {
        self.json(self.authorized(Method::GET, "/users/me/"), true).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, ApiError> {
        let request = self.authorized(Method::PUT, "/users/me/").json(update);
        self.json(request, true).await
    }

    async fn addresses(&self) -> Result<Vec<Address>, ApiError> {
        self.json(self.authorized(Method::GET, "/users/me/addresses/"), true)
            .await
    }

    async fn create_address(&self, draft: &AddressDraft) -> Result<Address, ApiError> {
        let request = self
            .authorized(Method::POST, "/users/me/addresses/")
            .json(draft);
        self.json(request, true).await
    }

    async fn update_address(&self, address_id: i64, draft: &AddressDraft) -> Result<Address, ApiError> {
        let path = format!("/users/me/addresses/{address_id}");
        let request = self.authorized(Method::PUT, &path).json(draft);
        self.json(request, true).await
    }

    async fn delete_address(&self, address_id: i64) -> Result<(), ApiError> {
        let path = format!("/users/me/addresses/{address_id}");
        self.send(self.authorized(Method::DELETE, &path), true).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::{MemoryStore, TokenStore};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Nothing listens on port 1 of the loopback interface.
    const UNREACHABLE: &str = "http://127.0.0.1:1/api";

    fn client_for(base_url: &str, store: MemoryStore) -> ApiClient {
        let config = ClientConfig::default().with_base_url(base_url);
        ApiClient::new(&config, Session::new(store))
    }

    /// Accept one connection, answer it with `response`, and hand back the
    /// request head that was received.
    async fn serve_once(response: String) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/api", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut buf = [0u8; 1024];
            while !received.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&received).to_string()
        });
        (base_url, handle)
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalised() {
        let client = client_for("http://localhost:8000/api/", MemoryStore::new());
        assert_eq!(client.url("/files/"), "http://localhost:8000/api/files/");
    }

    #[tokio::test]
    async fn test_upload_timeout_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/api", listener.local_addr().unwrap());
        // Read the request but never answer it
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            while let Ok(n) = socket.read(&mut buf).await {
                if n == 0 {
                    break;
                }
            }
        });

        let mut config = ClientConfig::default().with_base_url(&base_url);
        config.api.upload_timeout_secs = 1;
        let store = MemoryStore::with_token("tok");
        let client = ApiClient::new(&config, Session::new(store.clone()));
        let (tracker, _progress) = ProgressTracker::channel();

        let intent = UploadIntent::new("slow.txt", b"payload".to_vec());
        let err = client.upload_file(&intent, false, tracker).await.unwrap_err();

        assert!(err.is_transport());
        assert_eq!(err.user_message("unused"), crate::error::CONNECTIVITY_MESSAGE);
        assert_eq!(store.load().as_deref(), Some("tok"));
        server.abort();
    }

    #[tokio::test]
    async fn test_logout_clears_token_when_server_unreachable() {
        let store = MemoryStore::with_token("stale-token");
        let client = client_for(UNREACHABLE, store.clone());

        client.logout().await;

        assert!(store.load().is_none());
        assert!(!client.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_failed_login_is_transport_error_and_keeps_session_empty() {
        let store = MemoryStore::new();
        let client = client_for(UNREACHABLE, store.clone());

        let err = client.login("ada", "pw").await.unwrap_err();
        assert!(err.is_transport());
        assert!(store.load().is_none());
    }

    #[tokio::test]
    async fn test_list_files_sends_bearer_token() {
        let body = r#"[{"id": 1, "filename": "a.txt", "file_type": "txt", "upload_date": "2024-03-01T10:00:00", "user_id": 2}]"#;
        let (base_url, server) = serve_once(http_response("200 OK", body)).await;
        let client = client_for(&base_url, MemoryStore::with_token("tok-123"));

        let files = client.list_files().await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].filename, "a.txt");

        let request = server.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /api/files/ http/1.1"));
        assert!(request.contains("authorization: bearer tok-123"));
    }

    #[tokio::test]
    async fn test_unauthorized_response_ends_session() {
        let body = r#"{"detail": "Could not validate credentials"}"#;
        let (base_url, server) = serve_once(http_response("401 Unauthorized", body)).await;
        let store = MemoryStore::with_token("expired");
        let client = client_for(&base_url, store.clone());

        let err = client.dashboard_stats().await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.user_message("Failed to fetch stats"), "Could not validate credentials");
        assert!(store.load().is_none());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_undecodable_success_body_is_unexpected() {
        let (base_url, server) = serve_once(http_response("200 OK", "not json")).await;
        let client = client_for(&base_url, MemoryStore::with_token("tok"));

        let err = client.profile().await.unwrap_err();
        assert!(matches!(err, ApiError::Unexpected(_)));
        assert_eq!(err.user_message("Failed to fetch profile"), "Failed to fetch profile");
        server.await.unwrap();
    }
}
