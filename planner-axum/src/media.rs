use axum::{
    body::Body,
    extract::{Path, State},
    http::{
        header::{ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, RANGE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use futures::TryStreamExt;
use planner_blob::{BlobError, DeliveryPlan, MediaType, ObjectLocator, OpenedMedia, DEFAULT_CONTENT_TYPE};
use planner_core::PlannerError;
use tracing::{debug, error, info, instrument};

use crate::{MediaState, PlannerAxumError};

/// Routes for `GET /{bucket}/{*path}`, to be nested under the media mount.
///
/// Requests that stop short of a path are answered with 400 before any
/// upstream call is made. `HEAD` stops once size and type are known.
pub fn media_router(state: MediaState) -> Router<()> {
    Router::new()
        .route("/", get(missing_location))
        .route("/{bucket}", get(missing_location))
        .route("/{bucket}/{*path}", get(serve_media).head(describe_media))
        .fallback(missing_location)
        .with_state(state)
}

async fn missing_location() -> PlannerAxumError {
    PlannerError::bad_request("Missing bucket or path").into()
}

fn locate(bucket: &str, path: &str) -> Result<ObjectLocator, PlannerError> {
    ObjectLocator::from_parts(Some(bucket), Some(path))
        .ok_or_else(|| PlannerError::bad_request("Missing bucket or path"))
}

#[instrument(name = "serve_media", skip_all)]
async fn serve_media(
    State(state): State<MediaState>,
    Path((bucket, path)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, PlannerAxumError> {
    let locator = locate(&bucket, &path)?;
    let range_header = headers.get(RANGE).and_then(|v| v.to_str().ok());

    debug!(object = %locator, range = ?range_header, "media request");

    let resolved = state.proxy.resolve(&locator).await?;
    let plan = state.proxy.plan(&resolved, range_header);
    let media = state.proxy.fetch(&resolved, plan).await?;

    info!(
        object = %locator,
        status = media.status_code(),
        length = media.content_length(),
        media_type = ?MediaType::from_mime(&media.metadata.content_type),
        "streaming media"
    );

    Ok(media_response(&locator, media))
}

/// Headers `GET` would send, without touching the object body.
#[instrument(name = "describe_media", skip_all)]
async fn describe_media(
    State(state): State<MediaState>,
    Path((bucket, path)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, PlannerAxumError> {
    let locator = locate(&bucket, &path)?;
    let range_header = headers.get(RANGE).and_then(|v| v.to_str().ok());

    let resolved = state.proxy.resolve(&locator).await?;
    let plan = state.proxy.plan(&resolved, range_header);
    if let DeliveryPlan::Unsatisfiable { total_size } = plan {
        return Err(BlobError::Unsatisfiable { total_size }.into());
    }

    debug!(object = %locator, status = plan.status_code(), "media head");

    let status = StatusCode::from_u16(plan.status_code()).unwrap_or(StatusCode::OK);
    let headers = media_headers(&plan, &resolved.metadata.content_type);
    Ok((status, headers).into_response())
}

fn media_headers(plan: &DeliveryPlan, content_type: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let content_type =
        HeaderValue::from_str(content_type).unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    headers.insert(CONTENT_TYPE, content_type);
    headers.insert(CONTENT_LENGTH, HeaderValue::from(plan.content_length()));
    headers.insert(ACCEPT_RANGES, HeaderValue::from_static("bytes"));
    if let Some(value) = plan.content_range().and_then(|r| HeaderValue::from_str(&r).ok()) {
        headers.insert(CONTENT_RANGE, value);
    }
    headers
}

fn media_response(locator: &ObjectLocator, media: OpenedMedia) -> Response {
    let status = StatusCode::from_u16(media.status_code()).unwrap_or(StatusCode::OK);
    let headers = media_headers(&media.plan, &media.metadata.content_type);

    // Headers are already out once the body starts; failures can only be logged.
    let key = locator.to_string();
    let body = media
        .body
        .inspect_err(move |e| error!(object = %key, error = %e, "media stream aborted"));

    (status, headers, Body::from_stream(body)).into_response()
}
