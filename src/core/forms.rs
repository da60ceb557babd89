use crate::domain::model::{LoginRequest, RegisterRequest};
use crate::utils::error::{DicciotipsError, Result};
use crate::utils::validation::{is_valid_email, is_valid_username};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Checks are applied in order and the first failure is reported.
    pub fn validate(&self) -> Result<LoginRequest> {
        let username = self.username.trim();
        let password = self.password.trim();

        if username.is_empty() {
            return Err(DicciotipsError::invalid_input(
                "El usuario no puede estar vacío",
            ));
        }
        if !is_valid_username(username) {
            return Err(DicciotipsError::invalid_input(
                "Solo se permiten letras, números, puntos, guiones y guiones bajos",
            ));
        }
        if password.is_empty() {
            return Err(DicciotipsError::invalid_input(
                "La contraseña no puede estar vacía",
            ));
        }

        Ok(LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegisterField {
    Username,
    Email,
    Password,
    ConfirmPassword,
}

impl fmt::Display for RegisterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegisterField::Username => "username",
            RegisterField::Email => "email",
            RegisterField::Password => "password",
            RegisterField::ConfirmPassword => "confirmPassword",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

pub type FieldErrors = BTreeMap<RegisterField, String>;

impl RegisterForm {
    pub fn value(&self, field: RegisterField) -> &str {
        match field {
            RegisterField::Username => &self.username,
            RegisterField::Email => &self.email,
            RegisterField::Password => &self.password,
            RegisterField::ConfirmPassword => &self.confirm_password,
        }
    }

    /// Error for a single field, `None` when it is valid.
    pub fn check_field(&self, field: RegisterField) -> Option<&'static str> {
        let value = self.value(field).trim();
        match field {
            RegisterField::Username => {
                if value.is_empty() {
                    Some("Usuario requerido")
                } else if !is_valid_username(value) {
                    Some("Solo letras, números, puntos, guiones y guiones bajos")
                } else if value.chars().count() < 3 {
                    Some("Mínimo 3 caracteres")
                } else {
                    None
                }
            }
            RegisterField::Email => {
                if value.is_empty() {
                    Some("Email requerido")
                } else if !is_valid_email(value) {
                    Some("Formato de email inválido")
                } else {
                    None
                }
            }
            RegisterField::Password => {
                if value.is_empty() {
                    Some("Contraseña requerida")
                } else if value.chars().count() < 6 {
                    Some("Mínimo 6 caracteres")
                } else {
                    None
                }
            }
            RegisterField::ConfirmPassword => {
                if value.is_empty() {
                    Some("Confirmar contraseña")
                } else if value != self.password.trim() {
                    Some("Las contraseñas no coinciden")
                } else {
                    None
                }
            }
        }
    }

    pub fn field_errors(&self) -> FieldErrors {
        [
            RegisterField::Username,
            RegisterField::Email,
            RegisterField::Password,
            RegisterField::ConfirmPassword,
        ]
        .into_iter()
        .filter_map(|field| {
            self.check_field(field)
                .map(|message| (field, message.to_string()))
        })
        .collect()
    }

    pub fn to_request(&self) -> std::result::Result<RegisterRequest, FieldErrors> {
        let errors = self.field_errors();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(RegisterRequest {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.trim().to_string(),
        })
    }

    pub fn clear(&mut self) {
        *self = RegisterForm::default();
    }
}
