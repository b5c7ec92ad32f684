use axum::{
    http::{header::CONTENT_RANGE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use planner_blob::{unsatisfied_content_range, BlobError};
use planner_core::errors::{ErrorKind, PlannerError};
use tracing::{error, warn};

/// Message for failures with no more specific answer.
pub const GENERIC_ERROR_MESSAGE: &str = "Media streaming error";

#[derive(Debug)]
pub struct PlannerAxumError(pub anyhow::Error);

impl From<anyhow::Error> for PlannerAxumError {
    fn from(e: anyhow::Error) -> Self {
        Self(e)
    }
}

impl From<PlannerError> for PlannerAxumError {
    fn from(e: PlannerError) -> Self {
        Self(e.into_anyhow())
    }
}

impl From<BlobError> for PlannerAxumError {
    fn from(e: BlobError) -> Self {
        Self(planner_error_for(e).into_anyhow())
    }
}

/// Translate a media failure into the status and message clients see.
pub fn planner_error_for(err: BlobError) -> PlannerError {
    let planner = match &err {
        BlobError::NotFound { .. } => PlannerError::not_found("File not found"),
        BlobError::SizeUnknown { .. } => PlannerError::general_error("Unable to determine file size"),
        BlobError::Unsatisfiable { total_size } => {
            PlannerError::range_not_satisfiable("Range not satisfiable")
                .with_data(serde_json::json!({ "size": total_size }))
        }
        BlobError::Upstream { .. } => PlannerError::general_error("Failed to fetch file"),
        BlobError::Invalid { message } => PlannerError::bad_request(message.clone()),
        BlobError::Backend { .. } | BlobError::Io { .. } => {
            PlannerError::general_error(GENERIC_ERROR_MESSAGE)
        }
    };
    planner.with_source(anyhow::Error::new(err))
}

impl IntoResponse for PlannerAxumError {
    fn into_response(self) -> Response {
        let Some(planner) = self.0.chain().find_map(|e| e.downcast_ref::<PlannerError>()) else {
            // Anything unrecognised keeps its details in the log only.
            error!(error = ?self.0, "unhandled error");
            let body = PlannerError::general_error(GENERIC_ERROR_MESSAGE).to_json();
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
        };

        match planner.kind {
            ErrorKind::GeneralError => {
                error!(error = %planner, cause = ?planner.source, "request failed")
            }
            _ => warn!(error = %planner, "request rejected"),
        }

        let status = StatusCode::from_u16(planner.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // 416 carries the total size in `Content-Range` and has no body.
        if planner.kind == ErrorKind::RangeNotSatisfiable {
            let mut response = status.into_response();
            let size = planner.data.as_ref().and_then(|d| d["size"].as_u64());
            if let Some(value) = size.and_then(|s| HeaderValue::from_str(&unsatisfied_content_range(s)).ok()) {
                response.headers_mut().insert(CONTENT_RANGE, value);
            }
            return response;
        }

        let safe = planner.sanitize_for_client();
        (status, Json(safe.to_json())).into_response()
    }
}
