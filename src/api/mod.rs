mod filter;
mod handlers;
pub mod middleware;

use axum::{middleware::from_fn_with_state, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::store::GoalStore;

pub use filter::{build_goal_list, GoalFilter, GoalList, ListGoalsQuery};
pub use handlers::{DeleteView, FormView};
pub use middleware::{CsrfToken, SecurityConfig};

pub fn create_router(store: GoalStore, security: SecurityConfig) -> Router {
    Router::new()
        .route("/goals", get(handlers::list_goals))
        .route(
            "/goals/new",
            get(handlers::new_goal_form).post(handlers::create_goal),
        )
        .route("/goals/{id}", get(handlers::get_goal))
        .route(
            "/goals/{id}/edit",
            get(handlers::edit_goal_form).post(handlers::update_goal),
        )
        .route(
            "/goals/{id}/delete",
            get(handlers::delete_goal_form).post(handlers::delete_goal),
        )
        .route("/health", get(handlers::health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security.cors_layer())
                .layer(from_fn_with_state(security, middleware::csrf_middleware)),
        )
        .with_state(store)
}
