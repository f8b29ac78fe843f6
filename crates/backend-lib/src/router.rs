// ============================
// crates/backend-lib/src/router.rs
// ============================
//! Router assembly.
use axum::{
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::rate_limit::auth_rate_limit;
use crate::handlers;
use crate::AppState;

/// Build the application router.
///
/// Only register and login sit behind the rate limiter; everything else under
/// `/api/auth` is gated per-handler by the extractors.
pub fn create_router(state: AppState) -> Router {
    let throttled = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_rate_limit,
        ));

    let auth_routes = Router::new()
        .route("/logout", post(handlers::auth::logout))
        .route(
            "/profile",
            get(handlers::auth::get_profile).put(handlers::auth::update_profile),
        )
        .route("/change-password", put(handlers::auth::change_password))
        .route("/account", delete(handlers::auth::delete_account))
        .route("/session", get(handlers::auth::session_status))
        .route("/google", post(handlers::auth::google_sign_in))
        .merge(throttled);

    let admin_routes = Router::new().route("/users", get(handlers::admin::list_users));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/admin", admin_routes)
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.settings.cors_origin))
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    use tower_http::cors::{Any, AllowOrigin};

    let allow_origin = if origin == "*" {
        AllowOrigin::any()
    } else {
        match origin.parse::<HeaderValue>() {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                tracing::warn!(%origin, "invalid CORS origin, allowing any");
                AllowOrigin::any()
            }
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
