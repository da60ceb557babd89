pub mod dashboard;
pub mod diccionario;
pub mod logs;
pub mod register;
pub mod signo_detalle;
pub mod signo_editor;
pub mod signos;
pub mod usuarios;

pub use dashboard::{load_profile, Dashboard, ProfileOutcome};
pub use diccionario::{DiccionarioPage, DiccionarioView};
pub use logs::LogsPage;
pub use register::RegisterPage;
pub use signo_detalle::{ImageCarousel, SignoDetallePage};
pub use signo_editor::SignoEditor;
pub use signos::SignosPage;
pub use usuarios::UsuariosPage;
