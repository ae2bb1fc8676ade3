use crate::config::Settings;
use crate::prelude::*;
use crate::service::StatusLogService;
use crate::storage::{LocalSheet, Sheet};
use std::sync::Arc;
use tracing::info;

pub struct AppState<S> {
    pub service: Arc<StatusLogService<S>>,
    pub strict_status_codes: bool,
}

impl<S: Sheet> AppState<S> {
    pub fn new(service: StatusLogService<S>, strict_status_codes: bool) -> Arc<Self> {
        Arc::new(Self {
            service: Arc::new(service),
            strict_status_codes,
        })
    }
}

impl AppState<LocalSheet> {
    /// Opens the configured sheet and wires it into a service.
    pub fn from_settings(settings: &Settings) -> Result<Arc<Self>> {
        let sheet = LocalSheet::open(&settings.sheet.path)?;
        let timezone = settings.utc_offset()?;
        info!(
            "Using sheet {:?} with timezone {}",
            sheet.path(),
            timezone
        );

        Ok(Self::new(
            StatusLogService::new(sheet, timezone),
            settings.server.strict_status_codes,
        ))
    }
}
