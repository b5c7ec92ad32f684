use std::any::Any;
use std::sync::Arc;

use axum::http::{
    header::{ACCEPT_RANGES, AUTHORIZATION, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, RANGE},
    HeaderValue, Method, StatusCode,
};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use planner_blob::MediaProxy;
use planner_core::PlannerError;
use tokio::net::{TcpListener, ToSocketAddrs};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::error::GENERIC_ERROR_MESSAGE;
use crate::health::health_router;
use crate::media::media_router;
use crate::{MediaState, ServerSettings};

/// Router builder for the planner API.
///
/// Routes are added with the `use_*` methods; [`PlannerApp::router`] wraps
/// them in the shared middleware stack.
pub struct PlannerApp {
    pub settings: ServerSettings,
    pub router: Router<()>,
}

impl Clone for PlannerApp {
    fn clone(&self) -> Self {
        Self {
            settings: self.settings.clone(),
            router: self.router.clone(),
        }
    }
}

impl PlannerApp {
    pub fn new(settings: ServerSettings) -> Self {
        let router = Router::new().merge(health_router(&settings.media_mount));
        Self { settings, router }
    }

    pub fn use_router(mut self, path: &str, router: Router<()>) -> Self {
        self.router = self.router.nest(path, router);
        self
    }

    /// Mount the media proxy at the configured media mount.
    pub fn use_media(self, proxy: Arc<MediaProxy>) -> Self {
        let mount = self.settings.media_mount.clone();
        self.use_router(&mount, media_router(MediaState::from_shared(proxy)))
    }

    /// The routes wrapped in panic recovery, CORS, tracing and request ids.
    pub fn router(&self) -> Router<()> {
        self.router
            .clone()
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(cors_layer(&self.settings.frontend_url))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    pub async fn listen<A>(self, addr: A) -> anyhow::Result<()>
    where
        A: ToSocketAddrs,
    {
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, "listening");
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

fn cors_layer(frontend_url: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([RANGE, CONTENT_TYPE, AUTHORIZATION])
        .expose_headers([CONTENT_RANGE, ACCEPT_RANGES, CONTENT_LENGTH])
        .allow_credentials(true);

    match HeaderValue::from_str(frontend_url.trim_end_matches('/')) {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            warn!(origin = frontend_url, "invalid frontend origin, cross-origin requests disabled");
            layer
        }
    }
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = detail, "handler panicked");

    let body = PlannerError::general_error(GENERIC_ERROR_MESSAGE).to_json();
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
