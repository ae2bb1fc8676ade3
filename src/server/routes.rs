use super::handlers::{self, health_check, ingest_status};
use super::response::ServiceResponse;
use crate::app_state::AppState;
use crate::record::{Status, StatusRecord};
use crate::storage::Sheet;
use axum::{routing::get, Router};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(handlers::health_check, handlers::ingest_status),
    components(schemas(ServiceResponse, Status, StatusRecord, handlers::StatusParams)),
    info(title = "status-log", description = "ON/OFF sensor status webhook")
)]
pub struct ApiDoc;

pub fn create_router<S: Sheet + 'static>(app_state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/", get(health_check::<S>).post(ingest_status::<S>))
        .with_state(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
