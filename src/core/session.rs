use crate::core::forms::LoginForm;
use crate::core::view::Redirect;
use crate::domain::model::SessionUser;
use crate::domain::ports::AuthApi;
use crate::domain::session::{CookieJar, SessionState};
use crate::utils::error::{DicciotipsError, Result};
use std::time::Duration;

pub const LOGIN_OK: &str = "Logeado correctamente";
pub const LOGIN_FAILED: &str = "Error al logearse";
const LOGIN_REDIRECT_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub message: &'static str,
    pub user: SessionUser,
    pub redirect: Redirect,
}

/// Who is logged in, shared by every page.
#[derive(Debug, Clone)]
pub struct UserSession {
    state: SessionState,
    loading: bool,
}

impl Default for UserSession {
    fn default() -> Self {
        Self::new()
    }
}

impl UserSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::default(),
            loading: true,
        }
    }

    /// Starts from a persisted state. Still loading until `initialize` runs.
    pub fn restore(state: SessionState) -> Self {
        Self {
            state,
            loading: true,
        }
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.state.user.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(SessionUser::is_admin)
    }

    pub fn set_cookies(&mut self, cookies: CookieJar) {
        self.state.cookies = cookies;
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Asks the backend who we are. Any failure means nobody is logged in.
    pub async fn initialize<A: AuthApi + ?Sized>(&mut self, api: &A) {
        match api.profile().await {
            Ok(user) => {
                tracing::debug!("Profile loaded: {:?}", user.as_ref().map(|u| &u.username));
                // the profile may omit the role that login reported
                let known_rol = self.state.user.as_ref().and_then(|u| u.rol.clone());
                self.state.user = user.map(|mut u| {
                    if u.rol.is_none() {
                        u.rol = known_rol;
                    }
                    u
                });
            }
            Err(e) => {
                tracing::debug!("No active session: {}", e);
                self.state.user = None;
            }
        }
        self.loading = false;
    }

    pub async fn login<A: AuthApi + ?Sized>(
        &mut self,
        api: &A,
        form: &LoginForm,
    ) -> Result<LoginOutcome> {
        let request = form.validate()?;

        let response = api.login(&request).await.map_err(|e| {
            tracing::warn!("Login failed for {}: {}", request.username, e);
            DicciotipsError::page(LOGIN_FAILED, e)
        })?;

        let user = SessionUser {
            username: request.username,
            email: None,
            rol: response.rol,
        };
        self.state.user = Some(user.clone());
        self.loading = false;

        let target = if user.is_admin() {
            "/_usuarios"
        } else {
            "/dashboard"
        };
        tracing::info!("✅ {} logged in", user.username);

        Ok(LoginOutcome {
            message: LOGIN_OK,
            user,
            redirect: Redirect::after(target, LOGIN_REDIRECT_DELAY),
        })
    }

    /// On failure the user stays logged in.
    pub async fn logout<A: AuthApi + ?Sized>(&mut self, api: &A) -> Result<Redirect> {
        api.logout().await.map_err(|e| {
            tracing::error!("Logout failed: {}", e);
            DicciotipsError::page("Error al desloguear", e)
        })?;
        self.state = SessionState::default();
        Ok(Redirect::now("/"))
    }
}
