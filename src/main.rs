use status_log::app_state::AppState;
use status_log::config::Settings;
use status_log::prelude::*;
use status_log::server::run_server;
use std::time::Duration;
use tracing::info;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();
    info!("Starting status-log webhook service");

    let settings = Settings::new()?;
    let app_state = AppState::from_settings(&settings)?;

    if settings.retention.enabled {
        let retention = &settings.retention;
        info!(
            "Pruning records older than {} days every {}s",
            retention.days_to_keep, retention.interval_secs
        );
        tokio::spawn(app_state.service.clone().start_cleanup_task(
            retention.days_to_keep,
            Duration::from_secs(retention.interval_secs),
        ));
    }

    run_server(app_state, &settings.server).await
}
