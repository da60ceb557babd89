use crate::core::routing::Route;
use crate::core::view::Redirect;
use crate::domain::model::SessionUser;
use crate::domain::ports::AuthApi;
use crate::domain::session::CookieJar;

pub const SUBTITULO: &str = "Nos alegra tenerte aquí. Accedé a tus funciones personalizadas.";
const INVITADO: &str = "Invitado";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub saludo: &'static str,
    pub nombre: String,
    pub subtitulo: &'static str,
}

impl Dashboard {
    pub fn for_user(user: Option<&SessionUser>) -> Self {
        Self {
            saludo: "Bienvenido",
            nombre: user
                .and_then(|u| u.email.clone())
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| INVITADO.to_string()),
            subtitulo: SUBTITULO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub user: SessionUser,
    pub message: &'static str,
}

impl Profile {
    pub fn heading(&self) -> String {
        format!("Bienvenido, {}", self.user.email.as_deref().unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileOutcome {
    Show(Profile),
    Redirect(Redirect),
}

/// Needs a token cookie and a profile the backend accepts. Anything else goes home.
pub async fn load_profile<A: AuthApi + ?Sized>(api: &A, cookies: &CookieJar) -> ProfileOutcome {
    let home = || ProfileOutcome::Redirect(Redirect::now(Route::Home.path()));

    if cookies.bearer_token().is_none() {
        tracing::debug!("No token cookie, leaving the profile page");
        return home();
    }

    match api.profile().await {
        Ok(Some(user)) => ProfileOutcome::Show(Profile {
            user,
            message: "Inicio exitoso",
        }),
        Ok(None) => home(),
        Err(e) => {
            tracing::warn!("Profile rejected: {}", e);
            home()
        }
    }
}
