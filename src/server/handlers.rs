use super::response::{ingest_outcome, ServiceResponse};
use crate::app_state::AppState;
use crate::storage::Sheet;
use axum::{
    extract::{FromRequest, Query, Request, State},
    http::StatusCode,
    Form, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct StatusParams {
    /// `ON` or `OFF`, exact case.
    pub status: Option<String>,
}

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is running", body = ServiceResponse))
)]
pub async fn health_check<S: Sheet + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<ServiceResponse> {
    let response = ServiceResponse::health(&state.service.health());
    tracing::debug!("Health check response: {:?}", response);
    Json(response)
}

/// `status` comes from the query string or, as sent by the sensor firmware,
/// from a form-encoded body. The query string wins when both carry it, and the
/// first occurrence wins within each. Neither source can reject the request.
#[utoipa::path(
    post,
    path = "/",
    params(StatusParams),
    request_body(content = StatusParams, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Logged, or rejected with result = error", body = ServiceResponse),
        (status = 400, description = "Invalid status, strict status codes only", body = ServiceResponse),
        (status = 500, description = "Storage failure, strict status codes only", body = ServiceResponse)
    )
)]
pub async fn ingest_status<S: Sheet + 'static>(
    State(state): State<Arc<AppState<S>>>,
    request: Request,
) -> (StatusCode, Json<ServiceResponse>) {
    let status = match status_from_query(&request) {
        Some(status) => Some(status),
        None => status_from_form(request).await,
    };

    let result = state.service.ingest(status.as_deref()).await;
    let (code, body) = ingest_outcome(result, state.strict_status_codes);
    (code, Json(body))
}

fn first_status(pairs: Vec<(String, String)>) -> Option<String> {
    pairs
        .into_iter()
        .find(|(key, _)| key == "status")
        .map(|(_, value)| value)
}

fn status_from_query(request: &Request) -> Option<String> {
    Query::<Vec<(String, String)>>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(pairs)| first_status(pairs))
}

/// Bodies without a form content type carry no status.
async fn status_from_form(request: Request) -> Option<String> {
    Form::<Vec<(String, String)>>::from_request(request, &())
        .await
        .ok()
        .and_then(|Form(pairs)| first_status(pairs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::StatusLogService;
    use crate::storage::MemorySheet;
    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;
    use axum::http::Request as HttpRequest;
    use chrono::{Offset, Utc};
    use test_case::test_case;

    fn state(strict: bool) -> Arc<AppState<MemorySheet>> {
        AppState::new(StatusLogService::new(MemorySheet::new(), Utc.fix()), strict)
    }

    fn post(uri: &str, form: Option<&str>) -> Request {
        let builder = HttpRequest::builder().method("POST").uri(uri);
        match form {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    #[tokio::test]
    async fn health_check_reports_running() {
        let Json(body) = health_check(State(state(false))).await;
        match body {
            ServiceResponse::Success {
                message, status, ..
            } => {
                assert_eq!(message, "Radar sensor logging service is running");
                assert_eq!(status, None);
            }
            other => panic!("unexpected response {:?}", other),
        }
    }

    #[test_case("/?status=ON", None ; "query")]
    #[test_case("/", Some("status=ON") ; "form body")]
    #[test_case("/?status=ON", Some("status=OFF") ; "query wins over form")]
    #[test_case("/?status=ON&status=OFF", None ; "first query value wins")]
    #[test_case("/", Some("status=ON&status=OFF") ; "first form value wins")]
    #[test_case("/?other=1", Some("status=ON") ; "unrelated query falls back to form")]
    #[tokio::test]
    async fn ingest_takes_status_from_query_or_form(uri: &str, form: Option<&str>) {
        let state = state(false);
        let (code, Json(body)) = ingest_status(State(state.clone()), post(uri, form)).await;

        assert_eq!(code, StatusCode::OK);
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["result"], "success");
        assert_eq!(value["message"], "Status logged successfully");
        assert_eq!(value["status"], "ON");
        assert_eq!(state.service.sheet().row_count().await.unwrap(), 1);
    }

    #[test_case(false, StatusCode::OK ; "lenient")]
    #[test_case(true, StatusCode::BAD_REQUEST ; "strict")]
    #[tokio::test]
    async fn lowercase_status_is_rejected(strict: bool, expected: StatusCode) {
        let state = state(strict);
        let (code, Json(body)) = ingest_status(State(state.clone()), post("/?status=on", None)).await;

        assert_eq!(code, expected);
        assert_eq!(body, ServiceResponse::error("Invalid status. Must be ON or OFF"));
        assert_eq!(state.service.sheet().row_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn body_without_form_content_type_is_ignored() {
        let state = state(false);
        let request = HttpRequest::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "text/plain")
            .body(Body::from("status=ON"))
            .unwrap();

        let (_, Json(body)) = ingest_status(State(state.clone()), request).await;
        assert!(!body.is_success());
        assert_eq!(state.service.sheet().row_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_status_is_rejected() {
        let state = state(false);
        let (_, Json(body)) = ingest_status(State(state.clone()), post("/", None)).await;
        assert!(!body.is_success());
        assert_eq!(state.service.sheet().row_count().await.unwrap(), 0);
    }
}
