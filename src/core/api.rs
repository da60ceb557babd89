use crate::domain::model::{
    ApiMessage, LogEntry, LoginRequest, LoginResponse, ProfileResponse, RegisterRequest,
    SessionUser, Signo, SignoPayload, Usuario,
};
use crate::domain::ports::{AdminApi, AuthApi, ConfigProvider, SignoApi};
use crate::domain::session::CookieJar;
use crate::utils::error::{DicciotipsError, Result};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, COOKIE, SET_COOKIE};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use url::Url;

/// REST client for the Dicciotips backend.
///
/// Cookies set by the backend are captured from every response and replayed
/// on later requests, together with `Authorization: Bearer <token>` when a
/// `token` cookie is present.
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base_url: Url,
    cookies: Arc<RwLock<CookieJar>>,
}

impl HttpApi {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECONDS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| DicciotipsError::InvalidConfigValueError {
                field: "api_base_url".to_string(),
                value: base_url.to_string(),
                reason: format!("Invalid URL format: {}", e),
            })?;
        // a trailing slash keeps any path prefix when joining endpoints
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            cookies: Arc::new(RwLock::new(CookieJar::default())),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::with_timeout(
            config.api_base_url(),
            Duration::from_secs(config.request_timeout_seconds()),
        )
    }

    pub fn with_cookies(self, cookies: CookieJar) -> Self {
        Self {
            cookies: Arc::new(RwLock::new(cookies)),
            ..self
        }
    }

    pub async fn cookies(&self) -> CookieJar {
        self.cookies.read().await.clone()
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| DicciotipsError::ConfigError {
                message: format!("Cannot build URL for {}: {}", path, e),
            })
    }

    async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(path)?;
        tracing::debug!("📡 {} {}", method, url);

        let mut request = self.client.request(method, url);
        let jar = self.cookies.read().await;
        if let Some(cookie) = jar.cookie_header() {
            request = request.header(COOKIE, cookie);
        }
        if let Some(token) = jar.bearer_token() {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        Ok(request)
    }

    /// Sends the request, records cookies and turns non-2xx into an error.
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        tracing::debug!("📡 response status: {}", response.status());

        {
            let mut jar = self.cookies.write().await;
            for value in response.headers().get_all(SET_COOKIE) {
                if let Ok(value) = value.to_str() {
                    jar.absorb_set_cookie(value);
                }
            }
        }

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiMessage>(&body)
            .ok()
            .and_then(|m| m.message);
        tracing::warn!("❌ backend rejected request with status {}", status);
        Err(DicciotipsError::http(status.as_u16(), message))
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Any 2xx counts as saved. The body is only used when it is a signo.
    async fn saved_signo(response: Response) -> Result<Option<Signo>> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes).ok())
    }

    /// Like `json`, but an empty body reads as `null`.
    async fn json_or_null(response: Response) -> Result<serde_json::Value> {
        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl AuthApi for HttpApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        let builder = self.request(Method::POST, "/auth/login").await?.json(request);
        let response = self.send(builder).await?;
        let login: LoginResponse = Self::json(response).await?;
        if let Some(message) = &login.message {
            tracing::info!("🔑 {}", message);
        }
        Ok(login)
    }

    async fn logout(&self) -> Result<()> {
        let builder = self.request(Method::POST, "/auth/logout").await?;
        self.send(builder).await?;
        self.cookies.write().await.clear();
        Ok(())
    }

    async fn profile(&self) -> Result<Option<SessionUser>> {
        let builder = self.request(Method::GET, "/auth/profile").await?;
        let response = self.send(builder).await?;
        let profile: ProfileResponse = Self::json(response).await?;
        Ok(profile.user)
    }
}

#[async_trait]
impl AdminApi for HttpApi {
    async fn register_user(&self, request: &RegisterRequest) -> Result<serde_json::Value> {
        let builder = self
            .request(Method::POST, "/admin/register")
            .await?
            .json(request);
        let response = self.send(builder).await?;
        Self::json_or_null(response).await
    }

    async fn list_users(&self) -> Result<Vec<Usuario>> {
        let builder = self.request(Method::GET, "/admin/obtenerusuarios").await?;
        let response = self.send(builder).await?;
        Self::json(response).await
    }

    async fn delete_user(&self, id: i64) -> Result<()> {
        let builder = self
            .request(Method::DELETE, &format!("/admin/delete/{}", id))
            .await?;
        self.send(builder).await?;
        Ok(())
    }

    async fn list_logs(&self) -> Result<Vec<LogEntry>> {
        let builder = self.request(Method::GET, "/admin/logs").await?;
        let response = self.send(builder).await?;
        Self::json(response).await
    }
}

#[async_trait]
impl SignoApi for HttpApi {
    async fn list_signos(&self, query: Option<&str>) -> Result<Vec<Signo>> {
        let mut builder = self.request(Method::GET, "/api/signos").await?;
        if let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) {
            builder = builder.query(&[("query", query)]);
        }
        let response = self.send(builder).await?;

        let json_data: serde_json::Value = Self::json(response).await?;
        if !json_data.is_array() {
            return Err(DicciotipsError::InvalidResponse {
                message: "expected a JSON array of signos".to_string(),
            });
        }
        let signos: Vec<Signo> = serde_json::from_value(json_data)?;
        tracing::debug!("📡 fetched {} signos", signos.len());
        Ok(signos)
    }

    async fn get_signo(&self, id: i64) -> Result<Signo> {
        let builder = self
            .request(Method::GET, &format!("/api/signos/{}", id))
            .await?;
        let response = self.send(builder).await?;
        Self::json(response).await
    }

    async fn create_signo(&self, payload: &SignoPayload) -> Result<Option<Signo>> {
        let builder = self
            .request(Method::POST, "/api/signos")
            .await?
            .json(payload);
        let response = self.send(builder).await?;
        Self::saved_signo(response).await
    }

    async fn update_signo(&self, id: i64, payload: &SignoPayload) -> Result<Option<Signo>> {
        let builder = self
            .request(Method::PATCH, &format!("/api/signos/{}", id))
            .await?
            .json(payload);
        let response = self.send(builder).await?;
        Self::saved_signo(response).await
    }

    async fn delete_signo(&self, id: i64) -> Result<()> {
        let builder = self
            .request(Method::DELETE, &format!("/api/signos/{}", id))
            .await?;
        self.send(builder).await?;
        Ok(())
    }
}
