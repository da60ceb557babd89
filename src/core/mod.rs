pub mod api;
pub mod forms;
pub mod routing;
pub mod search;
pub mod session;
pub mod signo_form;
pub mod view;

pub use crate::domain::ports::{AdminApi, AuthApi, ConfigProvider, SessionStore, SignoApi};
pub use crate::utils::error::Result;
pub use api::HttpApi;
pub use session::UserSession;
