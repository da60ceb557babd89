//! In-memory backend used by unit tests.

use crate::domain::model::{
    LogEntry, LoginRequest, LoginResponse, RegisterRequest, Rol, SessionUser, Signo,
    SignoPayload, Usuario,
};
use crate::domain::ports::{AdminApi, AuthApi, SignoApi};
use crate::utils::error::{DicciotipsError, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct State {
    profile: Option<SessionUser>,
    login_rol: Option<Rol>,
    failing: bool,
    fail_status: u16,
    fail_message: Option<String>,
    malformed: bool,
    signos: Vec<Signo>,
    usuarios: Vec<Usuario>,
    logs: Vec<LogEntry>,
    registered: Vec<RegisterRequest>,
    queries: Vec<Option<String>>,
    calls: usize,
}

#[derive(Clone, Default)]
pub struct InMemoryApi {
    state: Arc<Mutex<State>>,
}

impl InMemoryApi {
    pub fn new() -> Self {
        let api = Self::default();
        api.lock().fail_status = 500;
        api
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("test state lock")
    }

    pub fn with_profile(self, user: SessionUser) -> Self {
        self.lock().profile = Some(user);
        self
    }

    pub fn with_login_rol(self, rol: Rol) -> Self {
        self.lock().login_rol = Some(rol);
        self
    }

    pub fn with_signos(self, signos: Vec<Signo>) -> Self {
        self.lock().signos = signos;
        self
    }

    pub fn with_usuarios(self, usuarios: Vec<Usuario>) -> Self {
        self.lock().usuarios = usuarios;
        self
    }

    pub fn with_logs(self, logs: Vec<LogEntry>) -> Self {
        self.lock().logs = logs;
        self
    }

    /// Every call answers with a body of the wrong shape.
    pub fn malformed(self) -> Self {
        self.lock().malformed = true;
        self
    }

    pub fn failing(self) -> Self {
        self.set_failing(true);
        self
    }

    pub fn failing_with(self, status: u16, message: &str) -> Self {
        {
            let mut state = self.lock();
            state.failing = true;
            state.fail_status = status;
            state.fail_message = Some(message.to_string());
        }
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    pub fn calls(&self) -> usize {
        self.lock().calls
    }

    pub fn queries(&self) -> Vec<Option<String>> {
        self.lock().queries.clone()
    }

    pub fn registered(&self) -> Vec<RegisterRequest> {
        self.lock().registered.clone()
    }

    pub fn signos(&self) -> Vec<Signo> {
        self.lock().signos.clone()
    }

    async fn enter(&self) -> Result<()> {
        let mut state = self.lock();
        state.calls += 1;
        if state.malformed {
            return Err(DicciotipsError::InvalidResponse {
                message: "expected a JSON array".to_string(),
            });
        }
        if state.failing {
            return Err(DicciotipsError::http(
                state.fail_status,
                state.fail_message.clone(),
            ));
        }
        Ok(())
    }
}

fn signo_from_payload(id: i64, payload: &SignoPayload) -> Signo {
    Signo {
        id: Some(id),
        palabra: payload.palabra.clone(),
        definicion: Some(payload.definicion.clone()),
        categoria: Some(payload.categoria.clone()),
        letra: Some(payload.letra.clone()),
        urls: payload.urls.clone(),
        fecha_alta: None,
    }
}

#[async_trait]
impl AuthApi for InMemoryApi {
    async fn login(&self, _request: &LoginRequest) -> Result<LoginResponse> {
        self.enter().await?;
        Ok(LoginResponse {
            message: Some("Login exitoso".to_string()),
            rol: self.lock().login_rol.clone(),
        })
    }

    async fn logout(&self) -> Result<()> {
        self.enter().await
    }

    async fn profile(&self) -> Result<Option<SessionUser>> {
        self.enter().await?;
        Ok(self.lock().profile.clone())
    }
}

#[async_trait]
impl AdminApi for InMemoryApi {
    async fn register_user(&self, request: &RegisterRequest) -> Result<serde_json::Value> {
        self.enter().await?;
        self.lock().registered.push(request.clone());
        Ok(serde_json::json!({"message": "ok"}))
    }

    async fn list_users(&self) -> Result<Vec<Usuario>> {
        self.enter().await?;
        Ok(self.lock().usuarios.clone())
    }

    async fn delete_user(&self, id: i64) -> Result<()> {
        self.enter().await?;
        self.lock().usuarios.retain(|u| u.id != id);
        Ok(())
    }

    async fn list_logs(&self) -> Result<Vec<LogEntry>> {
        self.enter().await?;
        Ok(self.lock().logs.clone())
    }
}

#[async_trait]
impl SignoApi for InMemoryApi {
    async fn list_signos(&self, query: Option<&str>) -> Result<Vec<Signo>> {
        self.lock().queries.push(query.map(str::to_string));
        self.enter().await?;
        let state = self.lock();
        Ok(match query {
            Some(q) => {
                let q = q.to_lowercase();
                state
                    .signos
                    .iter()
                    .filter(|s| s.palabra.to_lowercase().contains(&q))
                    .cloned()
                    .collect()
            }
            None => state.signos.clone(),
        })
    }

    async fn get_signo(&self, id: i64) -> Result<Signo> {
        self.enter().await?;
        self.lock()
            .signos
            .iter()
            .find(|s| s.id == Some(id))
            .cloned()
            .ok_or_else(|| DicciotipsError::http(404, None))
    }

    async fn create_signo(&self, payload: &SignoPayload) -> Result<Option<Signo>> {
        self.enter().await?;
        let mut state = self.lock();
        let id = state.signos.iter().filter_map(|s| s.id).max().unwrap_or(0) + 1;
        let signo = signo_from_payload(id, payload);
        state.signos.push(signo.clone());
        Ok(Some(signo))
    }

    async fn update_signo(&self, id: i64, payload: &SignoPayload) -> Result<Option<Signo>> {
        self.enter().await?;
        let mut state = self.lock();
        let slot = state
            .signos
            .iter_mut()
            .find(|s| s.id == Some(id))
            .ok_or_else(|| DicciotipsError::http(404, None))?;
        *slot = signo_from_payload(id, payload);
        Ok(Some(slot.clone()))
    }

    async fn delete_signo(&self, id: i64) -> Result<()> {
        self.enter().await?;
        self.lock().signos.retain(|s| s.id != Some(id));
        Ok(())
    }
}

pub fn signo(id: i64, palabra: &str, urls: &[&str]) -> Signo {
    Signo {
        id: Some(id),
        palabra: palabra.to_string(),
        definicion: Some(format!("Definición de {}", palabra)),
        categoria: Some("General".to_string()),
        letra: palabra.chars().next().map(|c| c.to_uppercase().to_string()),
        urls: urls.iter().map(|u| u.to_string()).collect(),
        fecha_alta: None,
    }
}

pub fn usuario(id: i64, username: &str, email: &str, rol: Option<&str>) -> Usuario {
    Usuario {
        id,
        username: username.to_string(),
        email: email.to_string(),
        rol: rol.map(Rol::from),
    }
}

pub fn admin() -> SessionUser {
    SessionUser {
        username: "root".to_string(),
        email: Some("root@lsa.org.ar".to_string()),
        rol: Some(Rol::Admin),
    }
}

pub fn plain_user() -> SessionUser {
    SessionUser {
        username: "ana".to_string(),
        email: None,
        rol: Some(Rol::User),
    }
}
