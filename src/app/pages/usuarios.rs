use crate::core::view::{visible_flash, Flash};
use crate::domain::model::{Rol, Usuario};
use crate::domain::ports::AdminApi;
use crate::utils::error::{DicciotipsError, Result};
use std::time::Instant;

/// Badge style for a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RolBadge {
    Admin,
    User,
    Guest,
    Other(String),
    Missing,
}

impl RolBadge {
    pub fn for_rol(rol: Option<&Rol>) -> Self {
        match rol {
            Some(Rol::Admin) => RolBadge::Admin,
            Some(Rol::User) => RolBadge::User,
            Some(Rol::Guest) => RolBadge::Guest,
            Some(Rol::Other(raw)) if !raw.trim().is_empty() => RolBadge::Other(raw.clone()),
            Some(Rol::Other(_)) | None => RolBadge::Missing,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            RolBadge::Admin => "admin",
            RolBadge::User => "user",
            RolBadge::Guest => "guest",
            RolBadge::Other(raw) => raw,
            RolBadge::Missing => "N/A",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsuarioRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub badge: RolBadge,
    pub deleting: bool,
}

pub const DELETE_PROMPT: &str = "¿Seguro que quieres eliminar este usuario?";

#[derive(Default)]
pub struct UsuariosPage {
    usuarios: Vec<Usuario>,
    filter: String,
    deleting_id: Option<i64>,
    flash: Option<Flash>,
}

impl UsuariosPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
    }

    pub fn total(&self) -> usize {
        self.usuarios.len()
    }

    pub fn deleting_id(&self) -> Option<i64> {
        self.deleting_id
    }

    /// Rows matching the filter on username or email.
    pub fn rows(&self) -> Vec<UsuarioRow> {
        let needle = self.filter.trim().to_lowercase();
        self.usuarios
            .iter()
            .filter(|u| {
                needle.is_empty()
                    || u.username.to_lowercase().contains(&needle)
                    || u.email.to_lowercase().contains(&needle)
            })
            .map(|u| UsuarioRow {
                id: u.id,
                username: u.username.clone(),
                email: u.email.clone(),
                badge: RolBadge::for_rol(u.rol.as_ref()),
                deleting: self.deleting_id == Some(u.id),
            })
            .collect()
    }

    pub fn error_at(&self, now: Instant) -> Option<&str> {
        visible_flash(&self.flash, now)
    }

    pub fn error(&self) -> Option<&str> {
        self.error_at(Instant::now())
    }

    pub async fn load<A: AdminApi + ?Sized>(&mut self, api: &A) -> Result<()> {
        match api.list_users().await {
            Ok(usuarios) => {
                tracing::debug!("Loaded {} users", usuarios.len());
                self.usuarios = usuarios;
                self.flash = None;
                Ok(())
            }
            Err(e) => Err(self.raise("Error al obtener los usuarios", e)),
        }
    }

    /// Marks the row as deleting once confirmed. Returns whether it was.
    pub fn begin_delete<F>(&mut self, id: i64, confirm: F) -> bool
    where
        F: FnOnce(&str) -> bool,
    {
        if !self.usuarios.iter().any(|u| u.id == id) {
            return false;
        }
        if !confirm(DELETE_PROMPT) {
            return false;
        }
        self.deleting_id = Some(id);
        true
    }

    /// Sends the delete for the row marked by `begin_delete`.
    pub async fn finish_delete<A: AdminApi + ?Sized>(&mut self, api: &A) -> Result<()> {
        let Some(id) = self.deleting_id else {
            return Ok(());
        };

        let result = api.delete_user(id).await;
        self.deleting_id = None;
        match result {
            Ok(()) => {
                self.usuarios.retain(|u| u.id != id);
                tracing::info!("🗑️ user {} deleted", id);
                Ok(())
            }
            Err(e) => Err(self.raise("Error al eliminar el usuario", e)),
        }
    }

    /// Returns `Ok(false)` when the confirmation is declined.
    pub async fn delete<A, F>(&mut self, api: &A, id: i64, confirm: F) -> Result<bool>
    where
        A: AdminApi + ?Sized,
        F: FnOnce(&str) -> bool,
    {
        if !self.begin_delete(id, confirm) {
            return Ok(false);
        }
        self.finish_delete(api).await?;
        Ok(true)
    }

    fn raise(&mut self, message: &str, cause: DicciotipsError) -> DicciotipsError {
        tracing::error!("{}: {}", message, cause);
        self.flash = Some(Flash::new(message));
        DicciotipsError::page(message, cause)
    }
}
