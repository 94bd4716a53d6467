use axum::extract::FromRef;

use crate::{
    services::{database::Database, uploads::UploadSettings},
    utilities::config::Config,
};

#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub uploads: UploadSettings,
}

impl AppState {
    pub fn new(database: Database, config: &Config) -> Self {
        Self {
            database,
            uploads: UploadSettings::from_config(config),
        }
    }
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.database.clone()
    }
}

impl FromRef<AppState> for UploadSettings {
    fn from_ref(state: &AppState) -> Self {
        state.uploads.clone()
    }
}
