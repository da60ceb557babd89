use crate::domain::model::{Signo, SignoPayload};
use crate::utils::error::{DicciotipsError, Result};

/// Editable state behind the create and edit forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignoForm {
    pub palabra: String,
    pub definicion: String,
    pub categoria: String,
    letra: String,
    urls: Vec<String>,
}

impl Default for SignoForm {
    fn default() -> Self {
        Self {
            palabra: String::new(),
            definicion: String::new(),
            categoria: String::new(),
            letra: String::new(),
            urls: vec![String::new()],
        }
    }
}

impl SignoForm {
    pub fn from_signo(signo: &Signo) -> Self {
        let mut form = Self {
            palabra: signo.palabra.clone(),
            definicion: signo.definicion.clone().unwrap_or_default(),
            categoria: signo.categoria.clone().unwrap_or_default(),
            letra: String::new(),
            urls: if signo.urls.is_empty() {
                vec![String::new()]
            } else {
                signo.urls.clone()
            },
        };
        form.set_letra(signo.letra.as_deref().unwrap_or_default());
        form
    }

    pub fn letra(&self) -> &str {
        &self.letra
    }

    /// Keeps only the first character, uppercased.
    pub fn set_letra(&mut self, value: &str) {
        self.letra = value
            .trim()
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
            .map(String::from)
            .unwrap_or_default();
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn add_url(&mut self) {
        self.urls.push(String::new());
    }

    pub fn set_url(&mut self, index: usize, value: impl Into<String>) {
        if let Some(slot) = self.urls.get_mut(index) {
            *slot = value.into();
        }
    }

    /// The last remaining entry stays.
    pub fn remove_url(&mut self, index: usize) -> bool {
        if self.urls.len() <= 1 || index >= self.urls.len() {
            return false;
        }
        self.urls.remove(index);
        true
    }

    /// Replaces the URL list, keeping one blank entry when empty.
    pub fn set_urls<I, S>(&mut self, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.urls = urls.into_iter().map(Into::into).collect();
        if self.urls.is_empty() {
            self.urls.push(String::new());
        }
    }

    pub fn to_payload(&self) -> Result<SignoPayload> {
        let required = [
            ("Palabra", &self.palabra),
            ("Categoría", &self.categoria),
            ("Letra", &self.letra),
            ("Definición", &self.definicion),
        ];
        if let Some((label, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(DicciotipsError::invalid_input(format!(
                "El campo {} es obligatorio",
                label
            )));
        }

        Ok(SignoPayload {
            palabra: self.palabra.trim().to_string(),
            definicion: self.definicion.trim().to_string(),
            categoria: self.categoria.trim().to_string(),
            letra: self.letra.clone(),
            urls: self
                .urls
                .iter()
                .map(|u| u.trim())
                .filter(|u| !u.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }
}
