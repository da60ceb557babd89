//! Runs one CLI command against the backend, restoring and persisting the
//! session around it.

use crate::app::pages::dashboard::{load_profile, Dashboard, ProfileOutcome};
use crate::app::pages::diccionario::{DiccionarioPage, DiccionarioView, SUBTITULO, TITULO};
use crate::app::pages::logs::{LogsPage, PageLink, EMPTY_MESSAGE as NO_LOGS};
use crate::app::pages::register::{Notice, RegisterPage};
use crate::app::pages::signo_detalle::SignoDetallePage;
use crate::app::pages::signo_editor::SignoEditor;
use crate::app::pages::signos::SignosPage;
use crate::app::pages::usuarios::UsuariosPage;
use crate::config::cli::{Command, SignoCommand, SignoEdits, SignoFields, UsuariosCommand};
use crate::config::Settings;
use crate::core::api::HttpApi;
use crate::core::forms::LoginForm;
use crate::core::routing::{check_access, layout_for, AccessDecision, Route, NOT_FOUND_MESSAGE};
use crate::core::search::{SearchBox, SearchState};
use crate::core::session::UserSession;
use crate::domain::ports::{ConfigProvider, SessionStore};
use crate::utils::error::{DicciotipsError, Result};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

const ACCESS_DENIED: &str = "Acceso Denegado: solo el administrador puede ver esta página.";

pub type Confirm = fn(&str) -> bool;

/// Asks on stdin. Anything starting with "s" or "y" counts as yes.
pub fn prompt_stdin(question: &str) -> bool {
    print!("{} [s/N] ", question);
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match std::io::stdin().read_line(&mut answer) {
        Ok(_) => matches!(
            answer.trim().to_lowercase().chars().next(),
            Some('s') | Some('y')
        ),
        Err(_) => false,
    }
}

pub struct App<S: SessionStore, W: Write> {
    settings: Settings,
    store: S,
    api: HttpApi,
    session: UserSession,
    out: W,
    confirm: Confirm,
}

impl<S: SessionStore, W: Write> App<S, W> {
    pub async fn new(settings: Settings, store: S, out: W) -> Result<Self> {
        let state = store.load().await?;
        let api = HttpApi::from_config(&settings)?.with_cookies(state.cookies.clone());
        Ok(Self {
            settings,
            store,
            api,
            session: UserSession::restore(state),
            out,
            confirm: prompt_stdin,
        })
    }

    pub fn with_confirm(mut self, confirm: Confirm) -> Self {
        self.confirm = confirm;
        self
    }

    pub fn session(&self) -> &UserSession {
        &self.session
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub async fn run(&mut self, command: Command) -> Result<()> {
        tracing::debug!("Running {:?}", command);

        match command {
            Command::Login { username, password } => {
                let result = self.login(&username, &password).await;
                self.persist().await?;
                return result;
            }
            Command::Logout => return self.logout().await,
            _ => self.session.initialize(&self.api).await,
        }

        let result = self.dispatch(command).await;
        self.persist().await?;
        result
    }

    async fn dispatch(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Login { .. } | Command::Logout => Ok(()),
            Command::Perfil => self.perfil().await,
            Command::Dashboard => self.dashboard(),
            Command::Menu => self.menu(),
            Command::Ruta { path } => self.ruta(&path),
            Command::Diccionario { search } => self.diccionario(search).await,
            Command::Buscar => self.search(tokio::io::stdin()).await,
            Command::Signo { action } => match action {
                SignoCommand::Ver { palabra } => self.signo_ver(&palabra).await,
                SignoCommand::Listar => self.signo_listar().await,
                SignoCommand::Crear(fields) => self.signo_crear(fields).await,
                SignoCommand::Editar { id, fields } => self.signo_editar(id, fields).await,
                SignoCommand::Eliminar { id, yes } => self.signo_eliminar(id, yes).await,
            },
            Command::Usuarios { action } => match action {
                UsuariosCommand::Listar { filtro } => self.usuarios_listar(filtro).await,
                UsuariosCommand::Registrar {
                    username,
                    email,
                    password,
                    confirmar,
                } => {
                    let confirmar = confirmar.unwrap_or_else(|| password.clone());
                    self.usuarios_registrar(username, email, password, confirmar)
                        .await
                }
                UsuariosCommand::Eliminar { id, yes } => self.usuarios_eliminar(id, yes).await,
            },
            Command::Logs {
                buscar,
                pagina,
                exportar,
                archivo,
            } => {
                let export_path = exportar.then(|| {
                    archivo.unwrap_or_else(|| self.settings.logs_export_path().to_string())
                });
                self.logs(buscar, pagina, export_path).await
            }
        }
    }

    /// Saves whatever cookies the backend handed out. An empty session removes the file.
    async fn persist(&mut self) -> Result<()> {
        let cookies = self.api.cookies().await;
        self.session.set_cookies(cookies);
        let state = self.session.state();
        if state.user.is_none() && state.cookies.is_empty() {
            self.store.clear().await
        } else {
            self.store.save(state).await
        }
    }

    fn guard(&mut self, route: &Route) -> Result<()> {
        match check_access(route, self.session.user(), self.session.is_loading()) {
            AccessDecision::Allow => Ok(()),
            AccessDecision::Redirect(to) => {
                writeln!(self.out, "→ {}", to)?;
                Err(DicciotipsError::AccessDenied { path: route.path() })
            }
            AccessDecision::Deny | AccessDecision::Pending => {
                writeln!(self.out, "{}", ACCESS_DENIED)?;
                Err(DicciotipsError::AccessDenied { path: route.path() })
            }
        }
    }

    async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        let form = LoginForm::new(username, password);
        let outcome = self.session.login(&self.api, &form).await?;
        writeln!(self.out, "✅ {}", outcome.message)?;
        writeln!(self.out, "→ {}", outcome.redirect.to)?;
        Ok(())
    }

    async fn logout(&mut self) -> Result<()> {
        let redirect = self.session.logout(&self.api).await?;
        self.store.clear().await?;
        writeln!(self.out, "Sesión cerrada")?;
        writeln!(self.out, "→ {}", redirect.to)?;
        Ok(())
    }

    async fn perfil(&mut self) -> Result<()> {
        self.guard(&Route::Profile)?;
        let cookies = self.api.cookies().await;
        match load_profile(&self.api, &cookies).await {
            ProfileOutcome::Show(profile) => {
                writeln!(self.out, "{}", profile.heading())?;
                writeln!(self.out, "Usuario: {}", profile.user.username)?;
                if let Some(rol) = &profile.user.rol {
                    writeln!(self.out, "Rol: {}", rol)?;
                }
            }
            ProfileOutcome::Redirect(redirect) => {
                writeln!(self.out, "→ {}", redirect.to)?;
            }
        }
        Ok(())
    }

    fn dashboard(&mut self) -> Result<()> {
        let dash = Dashboard::for_user(self.session.user());
        writeln!(self.out, "{}", dash.saludo)?;
        writeln!(self.out, "{}", dash.nombre)?;
        writeln!(self.out, "{}", dash.subtitulo)?;
        Ok(())
    }

    fn menu(&mut self) -> Result<()> {
        let layout = layout_for(self.session.user());
        writeln!(self.out, "Dicciotips ({})", layout.brand_href)?;
        if let Some(menu) = &layout.menu {
            writeln!(self.out, "{}", menu.title)?;
            for item in &menu.items {
                writeln!(
                    self.out,
                    "  {:<20} {:<16} {}",
                    item.label, item.href, item.description
                )?;
            }
            writeln!(self.out, "{}", menu.footer)?;
        }
        if let Some(username) = &layout.username {
            writeln!(self.out, "Usuario: {}", username)?;
        }
        writeln!(self.out, "[{}]", layout.session_action)?;
        Ok(())
    }

    fn ruta(&mut self, path: &str) -> Result<()> {
        let route = Route::parse(path);
        if let Route::NotFound { .. } = route {
            writeln!(self.out, "404")?;
            writeln!(self.out, "{}", NOT_FOUND_MESSAGE)?;
            return Err(DicciotipsError::NotFound {
                message: NOT_FOUND_MESSAGE.to_string(),
            });
        }

        writeln!(self.out, "Ruta: {}", route.path())?;
        writeln!(
            self.out,
            "Layout: {}",
            if route.uses_layout() { "sí" } else { "no" }
        )?;
        self.guard(&route)?;
        writeln!(self.out, "Acceso permitido")?;
        Ok(())
    }

    async fn diccionario(&mut self, search: Option<String>) -> Result<()> {
        let mut page = DiccionarioPage::new(search);
        writeln!(self.out, "{}", TITULO)?;
        writeln!(self.out, "{}", SUBTITULO)?;
        if let Some(heading) = page.results_heading() {
            writeln!(self.out, "{}", heading)?;
        }

        page.load(&self.api).await?;
        match page.view() {
            DiccionarioView::Loaded { cards } => {
                for card in cards {
                    writeln!(
                        self.out,
                        "[{}] {} ({}) - {}",
                        card.inicial, card.palabra, card.categoria, card.descripcion
                    )?;
                    writeln!(self.out, "    {}", card.href)?;
                }
            }
            DiccionarioView::Empty { title, detail } => {
                writeln!(self.out, "{}", title)?;
                writeln!(self.out, "{}", detail)?;
            }
            DiccionarioView::Loading | DiccionarioView::Error { .. } => {}
        }
        Ok(())
    }

    /// Reads keystroke batches line by line and prints results as they settle.
    pub async fn search<R: AsyncRead + Unpin>(&mut self, input: R) -> Result<()> {
        let delay = Duration::from_millis(self.settings.debounce_ms());
        let mut search = SearchBox::new(Arc::new(self.api.clone()), delay);
        let mut rx = search.subscribe();
        let mut lines = BufReader::new(input).lines();

        loop {
            tokio::select! {
                line = lines.next_line() => match line? {
                    Some(text) => search.on_input(&text),
                    None => break,
                },
                changed = rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let state = rx.borrow_and_update().clone();
                    self.render_search(&state)?;
                }
            }
        }

        // input ended while a query was still waiting
        if search.is_pending() || rx.has_changed().unwrap_or(false) {
            if rx.changed().await.is_ok() {
                let state = rx.borrow_and_update().clone();
                self.render_search(&state)?;
            }
        }

        if !search.text().trim().is_empty() {
            writeln!(self.out, "→ {}", search.submit().path())?;
        }
        Ok(())
    }

    fn render_search(&mut self, state: &SearchState) -> Result<()> {
        match state {
            SearchState::Idle => {}
            SearchState::Results { query, signos } => {
                writeln!(self.out, "Resultados para: \"{}\"", query)?;
                if signos.is_empty() {
                    writeln!(self.out, "  No se encontraron coincidencias")?;
                }
                for signo in signos {
                    writeln!(
                        self.out,
                        "  {} → {}",
                        signo.palabra,
                        Route::SignoDetalle {
                            palabra: signo.palabra.clone()
                        }
                        .path()
                    )?;
                }
            }
            SearchState::Failed { query, message } => {
                writeln!(self.out, "⚠️ \"{}\": {}", query, message)?;
            }
        }
        Ok(())
    }

    async fn signo_ver(&mut self, palabra: &str) -> Result<()> {
        let mut page = SignoDetallePage::new(palabra);
        page.load(&self.api).await?;

        writeln!(self.out, "{}", page.titulo())?;
        if let Some(signo) = page.signo() {
            writeln!(
                self.out,
                "Definición: {}",
                signo.definicion.as_deref().unwrap_or_default()
            )?;
            writeln!(
                self.out,
                "Categoría: {}",
                signo.categoria.as_deref().unwrap_or_default()
            )?;
            writeln!(self.out, "Letra: {}", signo.letra.as_deref().unwrap_or_default())?;
        }
        writeln!(self.out, "Fecha de alta: {}", page.fecha_alta())?;

        let carousel = page.carousel();
        if let Some(main) = carousel.main_image() {
            writeln!(self.out, "Imagen: {}", main)?;
        }
        if carousel.shows_thumbnails() {
            for (i, url) in carousel.thumbnails().iter().enumerate() {
                let marker = if i == carousel.index() { "*" } else { " " };
                writeln!(self.out, " {} {}", marker, url)?;
            }
        }
        Ok(())
    }

    async fn signo_listar(&mut self) -> Result<()> {
        self.guard(&Route::SignoLista)?;
        let mut page = SignosPage::new();
        page.load(&self.api).await?;

        if let Some(empty) = page.empty_message() {
            writeln!(self.out, "{}", empty)?;
            return Ok(());
        }
        for row in page.rows() {
            writeln!(
                self.out,
                "{}\t{}\t{}\t{}\t{} imágenes\t{}",
                row.id.map(|id| id.to_string()).unwrap_or_default(),
                row.palabra,
                row.categoria,
                row.letra,
                row.preview.len(),
                row.edit_href.unwrap_or_default()
            )?;
        }
        Ok(())
    }

    async fn signo_crear(&mut self, fields: SignoFields) -> Result<()> {
        self.guard(&Route::SignoCrear)?;
        let mut editor = SignoEditor::create();
        editor.form.set_letra(fields.letra.as_deref().unwrap_or(&fields.palabra));
        editor.form.palabra = fields.palabra;
        editor.form.definicion = fields.definicion;
        editor.form.categoria = fields.categoria;
        editor.form.set_urls(fields.urls);
        self.save_signo(editor).await
    }

    async fn signo_editar(&mut self, id: i64, edits: SignoEdits) -> Result<()> {
        self.guard(&Route::SignoEditar { id })?;
        let mut editor = SignoEditor::edit(&self.api, id).await?;
        if let Some(palabra) = edits.palabra {
            editor.form.palabra = palabra;
        }
        if let Some(definicion) = edits.definicion {
            editor.form.definicion = definicion;
        }
        if let Some(categoria) = edits.categoria {
            editor.form.categoria = categoria;
        }
        if let Some(letra) = edits.letra {
            editor.form.set_letra(&letra);
        }
        if !edits.urls.is_empty() {
            editor.form.set_urls(edits.urls);
        }
        self.save_signo(editor).await
    }

    async fn save_signo(&mut self, mut editor: SignoEditor) -> Result<()> {
        writeln!(self.out, "{}", editor.heading())?;
        let modal = editor.submit(&self.api).await?;
        writeln!(self.out, "{}", modal.title)?;
        writeln!(self.out, "{}", modal.body)?;
        writeln!(self.out, "→ {}", modal.accept().to)?;
        Ok(())
    }

    async fn signo_eliminar(&mut self, id: i64, yes: bool) -> Result<()> {
        self.guard(&Route::SignoLista)?;
        let mut page = SignosPage::new();
        page.load(&self.api).await?;

        let confirm = self.confirm;
        if page.delete(&self.api, id, |q| yes || confirm(q)).await? {
            writeln!(self.out, "Signo {} eliminado", id)?;
        } else {
            writeln!(self.out, "Cancelado")?;
        }
        Ok(())
    }

    async fn usuarios_listar(&mut self, filtro: Option<String>) -> Result<()> {
        self.guard(&Route::Usuarios)?;
        let mut page = UsuariosPage::new();
        page.load(&self.api).await?;
        if let Some(filtro) = filtro {
            page.set_filter(filtro);
        }

        let rows = page.rows();
        writeln!(self.out, "{} de {} usuarios", rows.len(), page.total())?;
        for row in rows {
            writeln!(
                self.out,
                "{}\t{}\t{}\t{}",
                row.id,
                row.username,
                row.email,
                row.badge.label()
            )?;
        }
        Ok(())
    }

    async fn usuarios_registrar(
        &mut self,
        username: String,
        email: String,
        password: String,
        confirmar: String,
    ) -> Result<()> {
        self.guard(&Route::Register)?;
        let mut page = RegisterPage::new();
        page.form.username = username;
        page.form.email = email;
        page.form.password = password;
        page.form.confirm_password = confirmar;

        let result = page.submit(&self.api).await;
        match page.notice() {
            Some(Notice::Success(message)) => writeln!(self.out, "✅ {}", message)?,
            Some(Notice::Error(message)) => writeln!(self.out, "❌ {}", message)?,
            None => {}
        }
        let redirect = result?;
        writeln!(self.out, "→ {}", redirect.to)?;
        Ok(())
    }

    async fn usuarios_eliminar(&mut self, id: i64, yes: bool) -> Result<()> {
        self.guard(&Route::Usuarios)?;
        let mut page = UsuariosPage::new();
        page.load(&self.api).await?;

        let confirm = self.confirm;
        if page.delete(&self.api, id, |q| yes || confirm(q)).await? {
            writeln!(self.out, "Usuario {} eliminado", id)?;
        } else {
            writeln!(self.out, "Cancelado")?;
        }
        Ok(())
    }

    async fn logs(
        &mut self,
        buscar: Option<String>,
        pagina: usize,
        export_path: Option<String>,
    ) -> Result<()> {
        self.guard(&Route::Logs)?;
        let mut page = LogsPage::new(self.settings.logs_page_size());
        page.load(&self.api).await?;
        if let Some(buscar) = buscar {
            page.set_search(buscar);
        }
        if pagina != 1 && !page.go_to(pagina) {
            return Err(DicciotipsError::invalid_input(format!(
                "La página {} no existe",
                pagina
            )));
        }

        let filtered = page.filtered().len();
        writeln!(
            self.out,
            "Total de logs: {} | Filtrados: {} | {}",
            page.total(),
            filtered,
            page.page_label()
        )?;

        let rows = page.rows();
        if rows.is_empty() {
            writeln!(self.out, "{}", NO_LOGS)?;
        }
        for row in rows {
            writeln!(
                self.out,
                "[{}] {} | {} | {}",
                row.id, row.fecha, row.usuario, row.descripcion
            )?;
        }

        let strip = page.strip();
        if !strip.is_empty() {
            let rendered: Vec<String> = strip
                .iter()
                .map(|link| match link {
                    PageLink::Page {
                        number,
                        active: true,
                    } => format!("[{}]", number),
                    PageLink::Page { number, .. } => number.to_string(),
                    PageLink::Ellipsis => "...".to_string(),
                })
                .collect();
            writeln!(self.out, "{}", rendered.join(" "))?;
        }

        if let Some(path) = export_path {
            let written = page.export_csv(&path)?;
            writeln!(self.out, "📄 {} logs exportados a {}", written, path)?;
        }
        Ok(())
    }
}
