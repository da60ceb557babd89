use crate::core::routing::Route;
use crate::core::view::initial;
use crate::domain::model::Signo;
use crate::domain::ports::SignoApi;
use crate::utils::error::{DicciotipsError, Result};

pub const TITULO: &str = "Diccionario de LSA";
pub const SUBTITULO: &str = "Explora los signos de la Lengua de Señas Argentina";
const SIN_DESCRIPCION: &str = "Sin descripción disponible";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignoCard {
    pub palabra: String,
    pub categoria: String,
    pub descripcion: String,
    /// First image, when there is one.
    pub imagen: Option<String>,
    /// Placeholder shown instead of (or when loading) the image.
    pub inicial: String,
    pub href: String,
}

impl From<&Signo> for SignoCard {
    fn from(signo: &Signo) -> Self {
        Self {
            palabra: signo.palabra.clone(),
            categoria: signo.categoria.clone().unwrap_or_default(),
            descripcion: signo
                .definicion
                .clone()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| SIN_DESCRIPCION.to_string()),
            imagen: signo.urls.first().cloned(),
            inicial: initial(&signo.palabra),
            href: Route::SignoDetalle {
                palabra: signo.palabra.clone(),
            }
            .path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiccionarioView {
    Loading,
    Error { message: String },
    Empty { title: String, detail: String },
    Loaded { cards: Vec<SignoCard> },
}

pub struct DiccionarioPage {
    search: Option<String>,
    view: DiccionarioView,
}

impl DiccionarioPage {
    pub fn new(search: Option<String>) -> Self {
        Self {
            search: search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            view: DiccionarioView::Loading,
        }
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn view(&self) -> &DiccionarioView {
        &self.view
    }

    /// `Resultados para: "<search>"` while searching.
    pub fn results_heading(&self) -> Option<String> {
        self.search
            .as_ref()
            .map(|s| format!("Resultados para: \"{}\"", s))
    }

    pub async fn load<A: SignoApi + ?Sized>(&mut self, api: &A) -> Result<()> {
        self.view = DiccionarioView::Loading;

        let signos = match api.list_signos(self.search.as_deref()).await {
            Ok(signos) => signos,
            Err(e) => {
                let message = match &e {
                    DicciotipsError::HttpStatus { status, .. } => {
                        format!("Error HTTP: {}", status)
                    }
                    DicciotipsError::InvalidResponse { .. } => {
                        "Formato de datos inválido".to_string()
                    }
                    other => other.user_friendly_message(),
                };
                tracing::error!("Dictionary load failed: {}", e);
                self.view = DiccionarioView::Error {
                    message: message.clone(),
                };
                return Err(DicciotipsError::page(message, e));
            }
        };

        self.view = if signos.is_empty() {
            match &self.search {
                Some(search) => DiccionarioView::Empty {
                    title: "No se encontraron coincidencias".to_string(),
                    detail: format!("Para \"{}\"", search),
                },
                None => DiccionarioView::Empty {
                    title: "No hay signos disponibles".to_string(),
                    detail: "La lista está vacía".to_string(),
                },
            }
        } else {
            DiccionarioView::Loaded {
                cards: signos.iter().map(SignoCard::from).collect(),
            }
        };
        Ok(())
    }
}
