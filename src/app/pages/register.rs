use crate::core::forms::{FieldErrors, RegisterField, RegisterForm};
use crate::core::routing::Route;
use crate::core::view::Redirect;
use crate::domain::ports::AdminApi;
use crate::utils::error::{DicciotipsError, Result};
use std::time::Duration;

pub const REGISTER_OK: &str = "Usuario registrado correctamente";
const FIX_ERRORS: &str = "Por favor corrige los errores antes de continuar";
const REDIRECT_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

#[derive(Default)]
pub struct RegisterPage {
    pub form: RegisterForm,
    errors: FieldErrors,
    notice: Option<Notice>,
}

impl RegisterPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-checks a single field, as when it loses focus.
    pub fn touch(&mut self, field: RegisterField) -> Option<&str> {
        match self.form.check_field(field) {
            Some(message) => {
                self.errors.insert(field, message.to_string());
            }
            None => {
                self.errors.remove(&field);
            }
        }
        self.errors.get(&field).map(String::as_str)
    }

    pub fn field_error(&self, field: RegisterField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub async fn submit<A: AdminApi + ?Sized>(&mut self, api: &A) -> Result<Redirect> {
        self.notice = None;

        let request = match self.form.to_request() {
            Ok(request) => {
                self.errors.clear();
                request
            }
            Err(errors) => {
                let detail = errors
                    .iter()
                    .map(|(field, message)| format!("{}: {}", field, message))
                    .collect::<Vec<_>>()
                    .join(", ");
                tracing::debug!("Registration form rejected: {}", detail);
                self.errors = errors;
                self.notice = Some(Notice::Error(FIX_ERRORS.to_string()));
                return Err(DicciotipsError::invalid_input(format!(
                    "{} ({})",
                    FIX_ERRORS, detail
                )));
            }
        };

        match api.register_user(&request).await {
            Ok(_) => {
                tracing::info!("✅ user {} registered", request.username);
                self.form.clear();
                self.notice = Some(Notice::Success(REGISTER_OK.to_string()));
                Ok(Redirect::after(Route::Usuarios.path(), REDIRECT_DELAY))
            }
            Err(e) => {
                let message = e.server_message().unwrap_or("Error al registrar").to_string();
                tracing::error!("Registering {} failed: {}", request.username, e);
                self.notice = Some(Notice::Error(message.clone()));
                Err(DicciotipsError::page(message, e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryApi;

    fn filled() -> RegisterPage {
        let mut page = RegisterPage::new();
        page.form.username = "nuevo.user".to_string();
        page.form.email = "nuevo@mail.com".to_string();
        page.form.password = "secreto1".to_string();
        page.form.confirm_password = "secreto1".to_string();
        page
    }

    #[tokio::test]
    async fn test_success_clears_form_and_redirects() {
        let api = InMemoryApi::new();
        let mut page = filled();

        let redirect = page.submit(&api).await.unwrap();
        assert_eq!(redirect, Redirect::after("/_usuarios", Duration::from_secs(2)));
        assert_eq!(
            page.notice(),
            Some(&Notice::Success(REGISTER_OK.to_string()))
        );
        assert!(page.form.username.is_empty());
        assert_eq!(api.registered()[0].email, "nuevo@mail.com");
    }

    #[tokio::test]
    async fn test_invalid_fields_block_submission() {
        let api = InMemoryApi::new();
        let mut page = filled();
        page.form.confirm_password = "otra".to_string();
        page.form.email = "sin-arroba".to_string();

        let err = page.submit(&api).await.unwrap_err();
        assert!(err.to_string().starts_with(FIX_ERRORS));
        assert_eq!(
            page.field_error(RegisterField::ConfirmPassword),
            Some("Las contraseñas no coinciden")
        );
        assert_eq!(
            page.field_error(RegisterField::Email),
            Some("Formato de email inválido")
        );
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_touch_updates_single_field() {
        let mut page = RegisterPage::new();
        page.form.username = "ab".to_string();
        assert_eq!(page.touch(RegisterField::Username), Some("Mínimo 3 caracteres"));

        page.form.username = "abc".to_string();
        assert_eq!(page.touch(RegisterField::Username), None);
        assert_eq!(page.field_error(RegisterField::Password), None);
    }

    #[tokio::test]
    async fn test_server_message_or_fallback() {
        let api = InMemoryApi::new().failing_with(409, "El usuario ya existe");
        let mut page = filled();
        assert!(page.submit(&api).await.is_err());
        assert_eq!(
            page.notice(),
            Some(&Notice::Error("El usuario ya existe".to_string()))
        );
        assert_eq!(page.form.username, "nuevo.user");

        let api = InMemoryApi::new().failing();
        let err = page.submit(&api).await.unwrap_err();
        assert_eq!(err.to_string(), "Error al registrar");
    }
}
