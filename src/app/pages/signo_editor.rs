use crate::core::routing::Route;
use crate::core::signo_form::SignoForm;
use crate::core::view::Redirect;
use crate::domain::ports::SignoApi;
use crate::utils::error::{DicciotipsError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit { id: i64 },
}

/// Confirmation shown after a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessModal {
    pub title: &'static str,
    pub body: String,
    palabra: String,
}

impl SuccessModal {
    /// "Aceptar" leads to the signo's detail page.
    pub fn accept(&self) -> Redirect {
        Redirect::now(
            Route::SignoDetalle {
                palabra: self.palabra.clone(),
            }
            .path(),
        )
    }
}

/// Create and edit forms share everything but the request they send.
pub struct SignoEditor {
    mode: EditorMode,
    pub form: SignoForm,
    error: Option<String>,
    modal: Option<SuccessModal>,
}

impl SignoEditor {
    pub fn create() -> Self {
        Self {
            mode: EditorMode::Create,
            form: SignoForm::default(),
            error: None,
            modal: None,
        }
    }

    /// Loads the signo into the form. A failed load returns "Error al cargar el signo"
    /// and no editor.
    pub async fn edit<A: SignoApi + ?Sized>(api: &A, id: i64) -> Result<Self> {
        let mut editor = Self {
            mode: EditorMode::Edit { id },
            form: SignoForm::default(),
            error: None,
            modal: None,
        };

        match api.get_signo(id).await {
            Ok(signo) => {
                editor.form = SignoForm::from_signo(&signo);
                Ok(editor)
            }
            Err(e) => {
                tracing::warn!("Could not load signo {}: {}", id, e);
                Err(DicciotipsError::page("Error al cargar el signo", e))
            }
        }
    }

    pub fn heading(&self) -> &'static str {
        match self.mode {
            EditorMode::Create => "Crear Signo",
            EditorMode::Edit { .. } => "Editar Signo",
        }
    }

    pub fn submit_label(&self, busy: bool) -> &'static str {
        match (self.mode, busy) {
            (EditorMode::Create, false) => "Crear Signo",
            (EditorMode::Create, true) => "Creando...",
            (EditorMode::Edit { .. }, false) => "Actualizar Signo",
            (EditorMode::Edit { .. }, true) => "Actualizando...",
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn modal(&self) -> Option<&SuccessModal> {
        self.modal.as_ref()
    }

    pub async fn submit<A: SignoApi + ?Sized>(&mut self, api: &A) -> Result<&SuccessModal> {
        self.error = None;
        self.modal = None;

        let payload = match self.form.to_payload() {
            Ok(payload) => payload,
            Err(e) => {
                self.error = Some(e.user_friendly_message());
                return Err(e);
            }
        };

        let (result, fallback) = match self.mode {
            EditorMode::Create => (
                api.create_signo(&payload).await,
                "Error al crear el signo",
            ),
            EditorMode::Edit { id } => (
                api.update_signo(id, &payload).await,
                "Error al actualizar el signo",
            ),
        };

        if let Err(e) = result {
            let message = e.server_message().unwrap_or(fallback).to_string();
            tracing::error!("Saving signo '{}' failed: {}", payload.palabra, e);
            self.error = Some(message.clone());
            return Err(DicciotipsError::page(message, e));
        }

        let (title, body) = match self.mode {
            EditorMode::Create => (
                "¡Signo creado con éxito!",
                format!(
                    "El signo \"{}\" ha sido guardado correctamente.",
                    payload.palabra
                ),
            ),
            EditorMode::Edit { .. } => (
                "¡Signo actualizado!",
                format!(
                    "El signo \"{}\" ha sido actualizado correctamente.",
                    payload.palabra
                ),
            ),
        };
        tracing::info!("✅ signo '{}' saved", payload.palabra);

        Ok(self.modal.insert(SuccessModal {
            title,
            body,
            palabra: payload.palabra,
        }))
    }
}
