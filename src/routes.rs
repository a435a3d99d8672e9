use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Json},
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

use crate::database::with_deadline;
use crate::handlers::{protected, public};
use crate::middleware::{jwt_auth_middleware, require_admin_middleware};
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let body_limit = state.config.api.max_request_size_bytes;
    let cors = cors_layer(&state.config.security.cors_origins);

    let protected_routes = Router::new()
        .merge(profile_routes())
        .merge(alumni_routes())
        .merge(pekerjaan_routes())
        .merge(pekerjaan_mongo_routes())
        .merge(file_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/login", post(public::auth::login_post))
        // Protected API
        .merge(protected_routes)
        // Global middleware
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Routes that additionally require the `admin` role
fn admin_only(router: Router<AppState>) -> Router<AppState> {
    router.route_layer(middleware::from_fn(require_admin_middleware))
}

fn profile_routes() -> Router<AppState> {
    Router::new().route("/api/profile", get(protected::auth::profile_get))
}

fn alumni_routes() -> Router<AppState> {
    use protected::alumni;

    Router::new()
        .route("/api/alumni", get(alumni::alumni_list).post(alumni::alumni_create))
        .route("/api/alumni/pagination", get(alumni::alumni_page))
        .route(
            "/api/alumni/:id",
            get(alumni::alumni_get)
                .put(alumni::alumni_update)
                .delete(alumni::alumni_delete),
        )
        .route("/api/alumni/:id/kematian", put(alumni::alumni_kematian_put))
}

fn pekerjaan_routes() -> Router<AppState> {
    use protected::pekerjaan;

    let user_routes = Router::new()
        .route("/api/pekerjaan", get(pekerjaan::pekerjaan_list).post(pekerjaan::pekerjaan_create))
        .route("/api/pekerjaan/list", get(pekerjaan::pekerjaan_page))
        .route("/api/pekerjaan/trashed", get(pekerjaan::pekerjaan_trashed))
        .route("/api/pekerjaan/alumni/:alumni_id", get(pekerjaan::pekerjaan_by_alumni))
        .route("/api/pekerjaan/:id", get(pekerjaan::pekerjaan_get).put(pekerjaan::pekerjaan_update))
        .route("/api/pekerjaan/:id/soft-delete", put(pekerjaan::pekerjaan_soft_delete))
        .route("/api/pekerjaan/:id/restore", put(pekerjaan::pekerjaan_restore))
        .route("/api/pekerjaan/:id/hard-delete", delete(pekerjaan::pekerjaan_hard_delete));

    let admin_routes = admin_only(
        Router::new().route("/api/pekerjaan/:id", delete(pekerjaan::pekerjaan_delete)),
    );

    user_routes.merge(admin_routes)
}

fn pekerjaan_mongo_routes() -> Router<AppState> {
    use protected::pekerjaan_mongo as mongo;

    let user_routes = Router::new()
        .route("/api/pekerjaan-mongo", get(mongo::pekerjaan_mongo_list))
        .route("/api/pekerjaan-mongo/:id", get(mongo::pekerjaan_mongo_get));

    let admin_routes = admin_only(
        Router::new()
            .route("/api/pekerjaan-mongo", post(mongo::pekerjaan_mongo_create))
            .route("/api/pekerjaan-mongo/trashed", get(mongo::pekerjaan_mongo_trashed))
            .route("/api/pekerjaan-mongo/alumni/:alumni_id", get(mongo::pekerjaan_mongo_by_alumni))
            .route(
                "/api/pekerjaan-mongo/:id",
                put(mongo::pekerjaan_mongo_update).delete(mongo::pekerjaan_mongo_delete),
            )
            .route("/api/pekerjaan-mongo/:id/soft-delete", put(mongo::pekerjaan_mongo_soft_delete))
            .route("/api/pekerjaan-mongo/:id/restore", put(mongo::pekerjaan_mongo_restore)),
    );

    user_routes.merge(admin_routes)
}

fn file_routes() -> Router<AppState> {
    use protected::files;

    Router::new()
        .route("/api/files/upload", post(files::file_upload))
        .route("/api/files", get(files::file_list))
        .route("/api/files/:id", get(files::file_get).delete(files::file_delete))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Alumni API",
            "version": version,
            "description": "Alumni records, employment history and file uploads",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "login": "POST /api/login (public)",
                "profile": "/api/profile (protected)",
                "alumni": "/api/alumni[/:id] (protected)",
                "pekerjaan": "/api/pekerjaan[/:id] (protected, trash lifecycle scoped to owner)",
                "pekerjaan_mongo": "/api/pekerjaan-mongo[/:id] (protected, mutations admin only)",
                "files": "/api/files[/:id], /api/files/upload (protected, scoped to owner)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match with_deadline(state.config.request_timeout(), state.health.ping()).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
