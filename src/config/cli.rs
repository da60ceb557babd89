use super::Overrides;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "dicciotips")]
#[command(about = "Client for the Dicciotips Argentine Sign Language dictionary")]
pub struct CliConfig {
    /// TOML configuration file
    #[arg(long, global = true, env = "DICCIOTIPS_CONFIG")]
    pub config: Option<String>,

    /// Backend base URL, e.g. http://localhost:8080
    #[arg(long, global = true, env = "DICCIOTIPS_API_URL")]
    pub api_url: Option<String>,

    /// Where the session cookies are kept between runs
    #[arg(long, global = true)]
    pub session_file: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            api_base_url: self.api_url.clone(),
            session_path: self.session_file.clone(),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start a session
    Login {
        username: String,
        #[arg(long, env = "DICCIOTIPS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// End the current session
    Logout,
    /// Show the logged-in profile
    Perfil,
    /// Welcome screen
    Dashboard,
    /// Navigation menu for the current session
    Menu,
    /// Resolve a page path and check access to it
    Ruta { path: String },
    /// Browse the dictionary
    Diccionario {
        #[arg(long)]
        search: Option<String>,
    },
    /// Search as you type, one line per keystroke batch
    Buscar,
    /// Manage signos
    Signo {
        #[command(subcommand)]
        action: SignoCommand,
    },
    /// Manage user accounts (admin only)
    Usuarios {
        #[command(subcommand)]
        action: UsuariosCommand,
    },
    /// Browse the system logs (admin only)
    Logs {
        #[arg(long)]
        buscar: Option<String>,
        #[arg(long, default_value = "1")]
        pagina: usize,
        /// Write the filtered logs as CSV
        #[arg(long)]
        exportar: bool,
        /// CSV destination, overrides the configured export path
        #[arg(long, requires = "exportar")]
        archivo: Option<String>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum SignoCommand {
    /// Show a signo by word
    Ver { palabra: String },
    /// List every signo
    Listar,
    Crear(SignoFields),
    Editar {
        id: i64,
        #[command(flatten)]
        fields: SignoEdits,
    },
    Eliminar {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Clone, Args)]
pub struct SignoFields {
    #[arg(long)]
    pub palabra: String,
    #[arg(long)]
    pub definicion: String,
    #[arg(long)]
    pub categoria: String,
    #[arg(long)]
    pub letra: Option<String>,
    /// Image URL, repeatable
    #[arg(long = "url")]
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct SignoEdits {
    #[arg(long)]
    pub palabra: Option<String>,
    #[arg(long)]
    pub definicion: Option<String>,
    #[arg(long)]
    pub categoria: Option<String>,
    #[arg(long)]
    pub letra: Option<String>,
    /// Replaces the image list, repeatable
    #[arg(long = "url")]
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum UsuariosCommand {
    Listar {
        #[arg(long)]
        filtro: Option<String>,
    },
    Registrar {
        username: String,
        email: String,
        #[arg(long, env = "DICCIOTIPS_NEW_PASSWORD", hide_env_values = true)]
        password: String,
        /// Defaults to the password
        #[arg(long)]
        confirmar: Option<String>,
    },
    Eliminar {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
}
