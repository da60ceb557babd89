use crate::core::routing::Route;
use crate::domain::model::Signo;
use crate::domain::ports::SignoApi;
use crate::utils::error::{DicciotipsError, Result};

const MAX_PREVIEW_IMAGES: usize = 3;
pub const EMPTY_MESSAGE: &str = "No hay signos registrados";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignoRow {
    pub id: Option<i64>,
    pub palabra: String,
    pub categoria: String,
    pub letra: String,
    pub preview: Vec<String>,
    pub edit_href: Option<String>,
}

impl From<&Signo> for SignoRow {
    fn from(signo: &Signo) -> Self {
        Self {
            id: signo.id,
            palabra: signo.palabra.clone(),
            categoria: signo.categoria.clone().unwrap_or_default(),
            letra: signo.letra.clone().unwrap_or_default(),
            preview: signo.urls.iter().take(MAX_PREVIEW_IMAGES).cloned().collect(),
            edit_href: signo.id.map(|id| Route::SignoEditar { id }.path()),
        }
    }
}

pub fn delete_prompt(palabra: &str) -> String {
    format!(
        "¿Estás seguro de eliminar el signo \"{}\"? Esta acción no se puede deshacer.",
        palabra
    )
}

#[derive(Default)]
pub struct SignosPage {
    signos: Vec<Signo>,
    error: Option<String>,
    loaded: bool,
}

impl SignosPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Vec<SignoRow> {
        self.signos.iter().map(SignoRow::from).collect()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Shown once loaded with nothing to list.
    pub fn empty_message(&self) -> Option<&'static str> {
        (self.loaded && self.error.is_none() && self.signos.is_empty()).then_some(EMPTY_MESSAGE)
    }

    pub async fn load<A: SignoApi + ?Sized>(&mut self, api: &A) -> Result<()> {
        self.error = None;
        match api.list_signos(None).await {
            Ok(signos) => {
                tracing::debug!("Loaded {} signos", signos.len());
                self.signos = signos;
                self.loaded = true;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Could not list signos: {}", e);
                self.error = Some("Error al cargar los signos".to_string());
                Err(DicciotipsError::page("Error al cargar los signos", e))
            }
        }
    }

    /// Returns `Ok(false)` when the confirmation is declined.
    pub async fn delete<A, F>(&mut self, api: &A, id: i64, confirm: F) -> Result<bool>
    where
        A: SignoApi + ?Sized,
        F: FnOnce(&str) -> bool,
    {
        let palabra = self
            .signos
            .iter()
            .find(|s| s.id == Some(id))
            .map(|s| s.palabra.clone())
            .ok_or_else(|| DicciotipsError::NotFound {
                message: format!("No existe el signo {}", id),
            })?;

        if !confirm(&delete_prompt(&palabra)) {
            return Ok(false);
        }

        if let Err(e) = api.delete_signo(id).await {
            tracing::error!("Deleting signo {} failed: {}", id, e);
            self.error = Some("Error al eliminar".to_string());
            return Err(DicciotipsError::page("Error al eliminar", e));
        }

        self.signos.retain(|s| s.id != Some(id));
        tracing::info!("🗑️ signo '{}' deleted", palabra);
        Ok(true)
    }
}
