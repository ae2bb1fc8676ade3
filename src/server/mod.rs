mod handlers;
mod response;
mod routes;

pub use handlers::StatusParams;
pub use response::ServiceResponse;
pub use routes::{create_router, ApiDoc};

use crate::app_state::AppState;
use crate::config::ServerSettings;
use crate::error::{Result, ServerError};
use crate::storage::Sheet;
use std::net::SocketAddr;
use std::sync::Arc;

pub async fn run_server<S: Sheet + 'static>(
    app_state: Arc<AppState<S>>,
    settings: &ServerSettings,
) -> Result<()> {
    let app: axum::Router = create_router(app_state);

    let addr = SocketAddr::new(
        settings
            .host
            .parse()
            .map_err(|e| ServerError::Init(format!("Invalid host: {}", e)))?,
        settings.port,
    );
    tracing::info!("Listening on {}", addr);
    axum_server::bind(addr)
        .serve(app.into_make_service())
        .await
        .map_err(|e| ServerError::Init(format!("Server error: {}", e)))?;

    Ok(())
}
