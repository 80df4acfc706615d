//! Router construction for the claims gateway.

use std::sync::Arc;

use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::{middleware as axum_mw, routing::get, Extension, Router};
use claims_core::service::ClaimsService;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::user_id::{require_user_id, USER_ID_HEADER};

/// Build the full router: `/api/health` is public, everything else needs
/// the `x-userid` header.
pub fn build_router(service: Arc<dyn ClaimsService>, cors_origin: Option<&str>) -> Router {
    let identified = Router::new()
        .route(
            "/claims/config",
            get(handlers::config::get_config).put(handlers::config::update_config),
        )
        .route(
            "/claims",
            get(handlers::claims::list_claims).post(handlers::claims::create_claim),
        )
        .route(
            "/claims/:claim_id",
            get(handlers::claims::get_claim)
                .patch(handlers::claims::update_claim)
                .delete(handlers::claims::delete_claim),
        )
        .route_layer(axum_mw::from_fn(require_user_id));

    let public = Router::new().route("/health", get(handlers::health::health));

    Router::new()
        .nest("/api", public.merge(identified))
        .layer(Extension(service))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origin))
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let allow_origin = match origin.map(HeaderValue::from_str) {
        Some(Ok(value)) => AllowOrigin::exact(value),
        Some(Err(_)) => {
            tracing::warn!(?origin, "CORS_ORIGIN is not a valid header value, allowing any");
            AllowOrigin::from(Any)
        }
        None => AllowOrigin::from(Any),
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(USER_ID_HEADER)])
}
