use chrono::{Datelike, NaiveDateTime, Timelike};
use std::time::{Duration, Instant};

/// Error banners disappear after this long.
pub const FLASH_TTL: Duration = Duration::from_secs(3);

/// Navigation requested by a page, optionally after a delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub to: String,
    pub after: Duration,
}

impl Redirect {
    pub fn now(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            after: Duration::ZERO,
        }
    }

    pub fn after(to: impl Into<String>, after: Duration) -> Self {
        Self {
            to: to.into(),
            after,
        }
    }
}

/// A message that stops showing once its time-to-live has passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub message: String,
    raised_at: Instant,
    ttl: Duration,
}

impl Flash {
    pub fn new(message: impl Into<String>) -> Self {
        Self::raised_at(message, Instant::now())
    }

    pub fn raised_at(message: impl Into<String>, at: Instant) -> Self {
        Self {
            message: message.into(),
            raised_at: at,
            ttl: FLASH_TTL,
        }
    }

    pub fn is_visible_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.raised_at) < self.ttl
    }
}

/// Visible text of an optional flash at `now`.
pub fn visible_flash(flash: &Option<Flash>, now: Instant) -> Option<&str> {
    flash
        .as_ref()
        .filter(|f| f.is_visible_at(now))
        .map(|f| f.message.as_str())
}

const MESES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// "5 de marzo de 2024, 14:03:22"
pub fn format_fecha_larga(fecha: &NaiveDateTime) -> String {
    format!(
        "{} de {} de {}, {:02}:{:02}:{:02}",
        fecha.day(),
        MESES[fecha.month0() as usize],
        fecha.year(),
        fecha.hour(),
        fecha.minute(),
        fecha.second()
    )
}

/// "05/03/2024"
pub fn format_fecha_corta(fecha: &NaiveDateTime) -> String {
    fecha.format("%d/%m/%Y").to_string()
}

/// Uppercased first character, used as an image placeholder.
pub fn initial(palabra: &str) -> String {
    palabra
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::parse_timestamp;

    #[test]
    fn test_flash_expires() {
        let start = Instant::now();
        let flash = Flash::raised_at("Error al eliminar el usuario", start);

        assert!(flash.is_visible_at(start + Duration::from_millis(2999)));
        assert!(!flash.is_visible_at(start + Duration::from_secs(3)));

        let slot = Some(flash);
        assert_eq!(
            visible_flash(&slot, start + Duration::from_secs(1)),
            Some("Error al eliminar el usuario")
        );
        assert_eq!(visible_flash(&slot, start + Duration::from_secs(4)), None);
    }

    #[test]
    fn test_spanish_dates() {
        let fecha = parse_timestamp("2024-03-05T14:03:22").unwrap();
        assert_eq!(format_fecha_larga(&fecha), "5 de marzo de 2024, 14:03:22");
        assert_eq!(format_fecha_corta(&fecha), "05/03/2024");
    }

    #[test]
    fn test_initial() {
        assert_eq!(initial("árbol"), "Á");
        assert_eq!(initial("casa"), "C");
        assert_eq!(initial(""), "");
    }
}
