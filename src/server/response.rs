use crate::error::Error;
use crate::prelude::Result;
use crate::record::{serialize_timestamp, Status};
use crate::service::{HealthReport, IngestReceipt};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, warn};
use utoipa::ToSchema;

pub const INGEST_OK_MESSAGE: &str = "Status logged successfully";
pub const HEALTH_MESSAGE: &str = "Radar sensor logging service is running";

/// JSON body of every response. `result` tells success from error; the
/// transport status code does not, unless strict status codes are enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum ServiceResponse {
    Success {
        message: String,
        #[serde(serialize_with = "serialize_timestamp")]
        #[schema(value_type = String, format = DateTime)]
        timestamp: DateTime<Utc>,
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<Status>,
    },
    Error {
        message: String,
    },
}

impl ServiceResponse {
    pub fn logged(receipt: &IngestReceipt) -> Self {
        Self::Success {
            message: INGEST_OK_MESSAGE.into(),
            timestamp: receipt.timestamp,
            status: Some(receipt.status),
        }
    }

    pub fn health(report: &HealthReport) -> Self {
        Self::Success {
            message: HEALTH_MESSAGE.into(),
            timestamp: report.timestamp,
            status: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Turns the outcome of an ingest call into a status code and body. Errors are
/// logged here and never escape as a failed request.
pub fn ingest_outcome(
    result: Result<IngestReceipt>,
    strict_status_codes: bool,
) -> (StatusCode, ServiceResponse) {
    match result {
        Ok(receipt) => (StatusCode::OK, ServiceResponse::logged(&receipt)),
        Err(Error::Status(e)) => {
            warn!(error = ?e, "Rejected status");
            let code = if strict_status_codes {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::OK
            };
            (code, ServiceResponse::error(e.to_string()))
        }
        Err(e) => {
            error!("Error processing request: {}", e);
            let code = if strict_status_codes {
                StatusCode::INTERNAL_SERVER_ERROR
            } else {
                StatusCode::OK
            };
            (code, ServiceResponse::error(e.to_string()))
        }
    }
}
