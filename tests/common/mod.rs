#![allow(dead_code)]

use dicciotips::app::commands::App;
use dicciotips::{FileSessionStore, Settings};
use serde_json::json;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct Workspace {
    pub dir: TempDir,
    pub base_url: String,
}

impl Workspace {
    pub fn new(base_url: String) -> anyhow::Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
            base_url,
        })
    }

    pub fn session_path(&self) -> PathBuf {
        self.dir.path().join("session.json")
    }

    pub fn settings(&self) -> Settings {
        Settings {
            api_base_url: self.base_url.clone(),
            session_path: self.session_path().to_string_lossy().into_owned(),
            logs_export_path: self
                .dir
                .path()
                .join("logs_export.csv")
                .to_string_lossy()
                .into_owned(),
            ..Settings::default()
        }
    }

    pub async fn app(&self) -> anyhow::Result<App<FileSessionStore, Vec<u8>>> {
        let settings = self.settings();
        let store = FileSessionStore::new(self.session_path());
        Ok(App::new(settings, store, Vec::new()).await?.with_confirm(|_| false))
    }

    /// Writes a session file as if `login` had run before.
    pub fn seed_session(&self, username: &str, rol: &str) -> anyhow::Result<()> {
        let state = json!({
            "user": {"username": username, "rol": rol},
            "cookies": {"token": "tok-123"}
        });
        std::fs::write(self.session_path(), serde_json::to_vec(&state)?)?;
        Ok(())
    }
}

pub fn output(app: App<FileSessionStore, Vec<u8>>) -> String {
    String::from_utf8_lossy(&app.into_output()).into_owned()
}
