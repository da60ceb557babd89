use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Role string attached to an account. Compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Rol {
    Admin,
    User,
    Guest,
    Other(String),
}

impl Rol {
    pub fn is_admin(&self) -> bool {
        matches!(self, Rol::Admin)
    }
}

impl From<&str> for Rol {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "admin" => Rol::Admin,
            "user" => Rol::User,
            "guest" => Rol::Guest,
            _ => Rol::Other(s.to_string()),
        }
    }
}

impl From<String> for Rol {
    fn from(s: String) -> Self {
        Rol::from(s.as_str())
    }
}

impl From<Rol> for String {
    fn from(rol: Rol) -> Self {
        rol.to_string()
    }
}

impl fmt::Display for Rol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rol::Admin => write!(f, "admin"),
            Rol::User => write!(f, "user"),
            Rol::Guest => write!(f, "guest"),
            Rol::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// The account currently logged in, as far as the client knows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rol: Option<Rol>,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.rol.as_ref().is_some_and(Rol::is_admin)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: Option<SessionUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub rol: Option<Rol>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usuario {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub rol: Option<Rol>,
}

/// A dictionary entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signo {
    #[serde(default)]
    pub id: Option<i64>,
    pub palabra: String,
    #[serde(default)]
    pub definicion: Option<String>,
    #[serde(default)]
    pub categoria: Option<String>,
    #[serde(default)]
    pub letra: Option<String>,
    #[serde(default, deserialize_with = "deserialize_urls")]
    pub urls: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub fecha_alta: Option<NaiveDateTime>,
}

/// Body sent when creating or updating a signo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignoPayload {
    pub palabra: String,
    pub definicion: String,
    pub categoria: String,
    pub letra: String,
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogUsuario {
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    #[serde(default)]
    pub usuario: Option<LogUsuario>,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub fecha: Option<NaiveDateTime>,
}

impl LogEntry {
    pub fn username(&self) -> Option<&str> {
        self.usuario.as_ref().and_then(|u| u.username.as_deref())
    }
}

/// Error body shape used by the backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: Option<String>,
}

/// `urls` arrives as an array, as a string holding a JSON array, or as null.
fn deserialize_urls<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawUrls {
        List(Vec<String>),
        Encoded(String),
    }

    Ok(match Option::<RawUrls>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(RawUrls::List(urls)) => urls,
        Some(RawUrls::Encoded(raw)) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                Vec::new()
            } else {
                serde_json::from_str::<Vec<String>>(trimmed)
                    .unwrap_or_else(|_| vec![trimmed.to_string()])
            }
        }
    })
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

/// Accepts RFC 3339, naive ISO-8601 date-times and plain dates. Times with
/// an offset are converted to the local wall clock.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.with_timezone(&Local).naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[test]
    fn test_rol_is_case_insensitive() {
        assert_eq!(Rol::from("ADMIN"), Rol::Admin);
        assert_eq!(Rol::from("Admin"), Rol::Admin);
        assert_eq!(Rol::from("user"), Rol::User);
        assert_eq!(Rol::from("Moderador"), Rol::Other("Moderador".to_string()));
        assert!(!Rol::from("moderador").is_admin());
    }

    #[test]
    fn test_signo_urls_accept_encoded_string() {
        let signo: Signo = serde_json::from_value(json!({
            "id": 4,
            "palabra": "Casa",
            "urls": "[\"https://img/a.png\",\"https://img/b.png\"]",
            "fechaAlta": "2024-03-05T10:00:00"
        }))
        .unwrap();

        assert_eq!(signo.urls.len(), 2);
        assert_eq!(signo.urls[1], "https://img/b.png");
        assert_eq!(signo.fecha_alta.unwrap().day(), 5);
    }

    #[test]
    fn test_signo_urls_null_and_missing() {
        let signo: Signo =
            serde_json::from_value(json!({"palabra": "Perro", "urls": null})).unwrap();
        assert!(signo.urls.is_empty());

        let signo: Signo = serde_json::from_value(json!({"palabra": "Gato"})).unwrap();
        assert!(signo.urls.is_empty());
        assert!(signo.fecha_alta.is_none());
    }

    #[test]
    fn test_log_entry_timestamps() {
        let log: LogEntry = serde_json::from_value(json!({
            "id": 1,
            "usuario": {"username": "ana"},
            "descripcion": "Login",
            "fecha": "2024-03-05T14:03:22.123"
        }))
        .unwrap();
        assert_eq!(log.username(), Some("ana"));
        assert_eq!(log.fecha.unwrap().hour(), 14);

        let log: LogEntry =
            serde_json::from_value(json!({"id": 2, "fecha": "no es una fecha"})).unwrap();
        assert!(log.fecha.is_none());
        assert_eq!(log.username(), None);
    }

    #[test]
    fn test_offset_timestamps_use_local_wall_clock() {
        let raw = "2024-03-05T14:03:22Z";
        let expected = DateTime::parse_from_rfc3339(raw)
            .unwrap()
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(parse_timestamp(raw), Some(expected));

        let naive = parse_timestamp("2024-03-05 14:03:22").unwrap();
        assert_eq!((naive.day(), naive.hour(), naive.minute()), (5, 14, 3));
    }

    #[test]
    fn test_session_user_admin_check() {
        let user: SessionUser =
            serde_json::from_value(json!({"username": "root", "rol": "ADMIN"})).unwrap();
        assert!(user.is_admin());

        let user: SessionUser = serde_json::from_value(json!({"username": "ana"})).unwrap();
        assert!(!user.is_admin());
    }
}
