use crate::config::DEFAULT_LOGS_PAGE_SIZE;
use crate::core::view::{format_fecha_larga, visible_flash, Flash};
use crate::domain::model::LogEntry;
use crate::domain::ports::AdminApi;
use crate::utils::error::{DicciotipsError, Result};
use std::cmp::Reverse;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

pub const UNKNOWN_USER: &str = "Desconocido";
pub const EMPTY_MESSAGE: &str = "No se encontraron logs.";
const CSV_HEADERS: [&str; 4] = ["ID", "Usuario", "Descripción", "Fecha"];

/// One slot in the pagination strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page { number: usize, active: bool },
    Ellipsis,
}

/// Page 1, the last page and everything within two of `current`. The run
/// hidden next to page 2 or the second-to-last page collapses to an ellipsis.
pub fn page_strip(current: usize, total: usize) -> Vec<PageLink> {
    if total <= 1 {
        return Vec::new();
    }
    (1..=total)
        .filter_map(|number| {
            let near = number.abs_diff(current) <= 2;
            if near || number == 1 || number == total {
                Some(PageLink::Page {
                    number,
                    active: number == current,
                })
            } else if number == 2 || number == total - 1 {
                Some(PageLink::Ellipsis)
            } else {
                None
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRow {
    pub id: i64,
    pub usuario: String,
    pub descripcion: String,
    pub fecha: String,
}

impl From<&LogEntry> for LogRow {
    fn from(log: &LogEntry) -> Self {
        Self {
            id: log.id,
            usuario: log
                .username()
                .filter(|u| !u.is_empty())
                .unwrap_or(UNKNOWN_USER)
                .to_string(),
            descripcion: log.descripcion.clone().unwrap_or_default(),
            fecha: log.fecha.as_ref().map(format_fecha_larga).unwrap_or_default(),
        }
    }
}

pub struct LogsPage {
    logs: Vec<LogEntry>,
    search: String,
    page: usize,
    page_size: usize,
    flash: Option<Flash>,
}

impl Default for LogsPage {
    fn default() -> Self {
        Self::new(DEFAULT_LOGS_PAGE_SIZE)
    }
}

impl LogsPage {
    pub fn new(page_size: usize) -> Self {
        Self {
            logs: Vec::new(),
            search: String::new(),
            page: 1,
            page_size: page_size.max(1),
            flash: None,
        }
    }

    pub async fn load<A: AdminApi + ?Sized>(&mut self, api: &A) -> Result<()> {
        match api.list_logs().await {
            Ok(mut logs) => {
                // undated entries go last
                logs.sort_by_key(|log| Reverse(log.fecha));
                tracing::debug!("Loaded {} log entries", logs.len());
                self.logs = logs;
                self.page = 1;
                self.flash = None;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Could not fetch logs: {}", e);
                self.flash = Some(Flash::new("Error al obtener los logs"));
                Err(DicciotipsError::page("Error al obtener los logs", e))
            }
        }
    }

    pub fn error_at(&self, now: Instant) -> Option<&str> {
        visible_flash(&self.flash, now)
    }

    pub fn error(&self) -> Option<&str> {
        self.error_at(Instant::now())
    }

    /// A new search starts over at page 1.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    pub fn total(&self) -> usize {
        self.logs.len()
    }

    pub fn filtered(&self) -> Vec<&LogEntry> {
        let needle = self.search.trim().to_lowercase();
        self.logs
            .iter()
            .filter(|log| {
                needle.is_empty()
                    || log
                        .descripcion
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
                    || log
                        .username()
                        .is_some_and(|u| u.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        self.filtered().len().div_ceil(self.page_size)
    }

    /// "Página X de Y"
    pub fn page_label(&self) -> String {
        format!("Página {} de {}", self.page, self.total_pages())
    }

    pub fn go_to(&mut self, page: usize) -> bool {
        if page >= 1 && page <= self.total_pages() {
            self.page = page;
            true
        } else {
            false
        }
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.page + 1)
    }

    pub fn previous(&mut self) -> bool {
        self.page > 1 && self.go_to(self.page - 1)
    }

    pub fn rows(&self) -> Vec<LogRow> {
        self.filtered()
            .into_iter()
            .skip((self.page - 1) * self.page_size)
            .take(self.page_size)
            .map(LogRow::from)
            .collect()
    }

    pub fn strip(&self) -> Vec<PageLink> {
        page_strip(self.page, self.total_pages())
    }

    /// Writes every filtered entry, not only the current page.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(CSV_HEADERS)?;

        let rows = self.filtered();
        for log in &rows {
            let row = LogRow::from(*log);
            csv.write_record([
                row.id.to_string(),
                row.usuario,
                row.descripcion,
                row.fecha,
            ])?;
        }
        csv.flush()?;
        Ok(rows.len())
    }

    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)?;
        let written = self.write_csv(file)?;
        tracing::info!("📄 exported {} logs to {}", written, path.display());
        Ok(written)
    }
}
