use crate::core::view::format_fecha_corta;
use crate::domain::model::Signo;
use crate::domain::ports::SignoApi;
use crate::utils::error::{DicciotipsError, Result};
use std::time::Duration;

pub const ROTATION_INTERVAL: Duration = Duration::from_secs(4);
const MAX_VISIBLE_THUMBNAILS: usize = 4;

/// Main image plus thumbnails for a signo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageCarousel {
    urls: Vec<String>,
    index: usize,
}

impl ImageCarousel {
    pub fn new(urls: Vec<String>) -> Self {
        Self { urls, index: 0 }
    }

    pub fn main_image(&self) -> Option<&str> {
        self.urls.get(self.index).map(String::as_str)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn thumbnails(&self) -> &[String] {
        &self.urls
    }

    /// Thumbnails only appear when there is more than one image.
    pub fn shows_thumbnails(&self) -> bool {
        self.urls.len() > 1
    }

    pub fn visible_thumbnails(&self) -> usize {
        self.urls.len().clamp(1, MAX_VISIBLE_THUMBNAILS)
    }

    pub fn is_infinite(&self) -> bool {
        self.urls.len() > MAX_VISIBLE_THUMBNAILS
    }

    pub fn rotates(&self) -> bool {
        self.urls.len() >= 2
    }

    pub fn advance(&mut self) {
        if self.rotates() {
            self.index = (self.index + 1) % self.urls.len();
        }
    }

    pub fn select(&mut self, index: usize) -> bool {
        if index < self.urls.len() {
            self.index = index;
            true
        } else {
            false
        }
    }

    /// Shows `rounds` images, one every rotation interval, starting with the current one.
    pub async fn slideshow<F>(&mut self, rounds: usize, mut on_image: F)
    where
        F: FnMut(usize, &str),
    {
        if !self.rotates() {
            if let Some(url) = self.main_image() {
                on_image(self.index, url);
            }
            return;
        }

        let mut ticker = tokio::time::interval(ROTATION_INTERVAL);
        for round in 0..rounds {
            ticker.tick().await;
            if round > 0 {
                self.advance();
            }
            if let Some(url) = self.urls.get(self.index) {
                on_image(self.index, url);
            }
        }
    }
}

pub struct SignoDetallePage {
    palabra: String,
    signo: Option<Signo>,
    error: Option<String>,
    carousel: ImageCarousel,
}

impl SignoDetallePage {
    pub fn new(palabra: impl Into<String>) -> Self {
        Self {
            palabra: palabra.into(),
            signo: None,
            error: None,
            carousel: ImageCarousel::default(),
        }
    }

    pub fn titulo(&self) -> String {
        if self.palabra.is_empty() {
            "...".to_string()
        } else {
            self.palabra.to_uppercase()
        }
    }

    pub fn signo(&self) -> Option<&Signo> {
        self.signo.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn carousel(&self) -> &ImageCarousel {
        &self.carousel
    }

    pub fn carousel_mut(&mut self) -> &mut ImageCarousel {
        &mut self.carousel
    }

    pub fn fecha_alta(&self) -> String {
        self.signo
            .as_ref()
            .and_then(|s| s.fecha_alta.as_ref())
            .map(format_fecha_corta)
            .unwrap_or_else(|| "No disponible".to_string())
    }

    /// Prefers an exact (case-insensitive) match and falls back to the first result.
    pub async fn load<A: SignoApi + ?Sized>(&mut self, api: &A) -> Result<&Signo> {
        self.error = None;

        let respuesta = api.list_signos(Some(&self.palabra)).await;
        let resultados = match respuesta {
            Ok(resultados) => resultados,
            Err(e) => {
                self.signo = None;
                return Err(self.fail("Error al cargar el significado", Some(e)));
            }
        };

        let buscada = self.palabra.to_lowercase();
        let elegido = resultados
            .iter()
            .position(|s| s.palabra.to_lowercase() == buscada)
            .or(if resultados.is_empty() { None } else { Some(0) });

        match elegido {
            Some(i) => {
                let signo = resultados.into_iter().nth(i).ok_or_else(|| {
                    DicciotipsError::NotFound {
                        message: "No se encontró el significado".to_string(),
                    }
                })?;
                self.carousel = ImageCarousel::new(signo.urls.clone());
                Ok(self.signo.insert(signo))
            }
            None => Err(self.fail("No se encontró el significado", None)),
        }
    }

    fn fail(&mut self, message: &str, cause: Option<DicciotipsError>) -> DicciotipsError {
        self.error = Some(message.to_string());
        match cause {
            Some(cause) => {
                tracing::warn!("Signo '{}' failed to load: {}", self.palabra, cause);
                DicciotipsError::page(message, cause)
            }
            None => DicciotipsError::NotFound {
                message: message.to_string(),
            },
        }
    }
}
