use axum::middleware;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;
use super::auth::require_admin;
use super::handlers;

pub fn create_router(state: AppState) -> Router {
    // Operational endpoints
    let public = Router::new()
        .route("/health", get(handlers::ops::health_check))
        .route("/metrics", get(handlers::ops::metrics))
        .route("/ws", get(handlers::ws::handler));

    // Player-facing API
    let api = Router::new()
        // Users
        .route("/api/users", get(handlers::users::search))
        .route("/api/users/register", post(handlers::users::register))
        .route("/api/users/login", post(handlers::users::login))
        .route("/api/users/:id", get(handlers::users::detail))
        .route("/api/users/:id/predictions", get(handlers::users::predictions))
        .route("/api/users/:id/leagues", get(handlers::users::leagues))
        // Follows
        .route(
            "/api/users/:id/follow/:target",
            post(handlers::follows::follow).delete(handlers::follows::unfollow),
        )
        .route("/api/users/:id/following", get(handlers::follows::following))
        .route("/api/users/:id/followers", get(handlers::follows::followers))
        .route("/api/users/:id/ranking", get(handlers::follows::friends_ranking))
        // Matches
        .route("/api/matches", get(handlers::matches::list))
        .route("/api/matches/:id", get(handlers::matches::detail))
        .route("/api/matches/:id/predictions", get(handlers::matches::predictions))
        // Predictions
        .route("/api/predictions", put(handlers::predictions::submit))
        // Leagues
        .route("/api/leagues", post(handlers::leagues::create))
        .route("/api/leagues/join", post(handlers::leagues::join))
        .route("/api/leagues/:id/members", get(handlers::leagues::members))
        .route("/api/leagues/:id/members/:user_id", delete(handlers::leagues::leave))
        .route("/api/leagues/:id/ranking", get(handlers::leagues::ranking))
        // Rankings
        .route("/api/rankings", get(handlers::rankings::global))
        .route("/api/rankings/rounds/:round", get(handlers::rankings::round));

    // Admin routes — require Bearer token when ADMIN_TOKEN is set
    let admin = Router::new()
        .route("/api/admin/matches", post(handlers::matches::create))
        .route("/api/admin/matches/:id/settle", post(handlers::matches::settle))
        .route("/api/admin/matches/:id/reopen", post(handlers::matches::reopen))
        .layer(middleware::from_fn_with_state(state.clone(), require_admin));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public
        .merge(api)
        .merge(admin)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
