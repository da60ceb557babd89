use crate::domain::model::{
    LogEntry, LoginRequest, LoginResponse, RegisterRequest, SessionUser, Signo, SignoPayload,
    Usuario,
};
use crate::domain::session::SessionState;
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse>;
    async fn logout(&self) -> Result<()>;
    async fn profile(&self) -> Result<Option<SessionUser>>;
}

#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn register_user(&self, request: &RegisterRequest) -> Result<serde_json::Value>;
    async fn list_users(&self) -> Result<Vec<Usuario>>;
    async fn delete_user(&self, id: i64) -> Result<()>;
    async fn list_logs(&self) -> Result<Vec<LogEntry>>;
}

#[async_trait]
pub trait SignoApi: Send + Sync {
    async fn list_signos(&self, query: Option<&str>) -> Result<Vec<Signo>>;
    async fn get_signo(&self, id: i64) -> Result<Signo>;
    /// Returns the stored signo when the backend echoes it back.
    async fn create_signo(&self, payload: &SignoPayload) -> Result<Option<Signo>>;
    async fn update_signo(&self, id: i64, payload: &SignoPayload) -> Result<Option<Signo>>;
    async fn delete_signo(&self, id: i64) -> Result<()>;
}

/// Where the session survives between runs.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> impl std::future::Future<Output = Result<SessionState>> + Send;
    fn save(&self, state: &SessionState)
        -> impl std::future::Future<Output = Result<()>> + Send;
    fn clear(&self) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn session_path(&self) -> &str;
    fn request_timeout_seconds(&self) -> u64;
    fn debounce_ms(&self) -> u64;
    fn logs_page_size(&self) -> usize;
    fn logs_export_path(&self) -> &str;
}
