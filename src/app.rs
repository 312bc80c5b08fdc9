use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post, put},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/daily/:date",
            get(handlers::get_daily).post(handlers::save_daily),
        )
        .route("/api/daily/:date/view", get(handlers::get_daily_view))
        .route("/api/workouts/template", get(handlers::get_template))
        .route("/api/nutrition/targets", get(handlers::get_nutrition_targets))
        .route("/api/sleep/target", get(handlers::get_sleep_target))
        .route(
            "/api/config",
            get(handlers::get_config).put(handlers::put_config),
        )
        .route("/api/config/blocks", post(handlers::add_block))
        .route("/api/config/blocks/:block", delete(handlers::remove_block))
        .route(
            "/api/config/blocks/:block/exercises",
            post(handlers::add_exercise),
        )
        .route(
            "/api/config/blocks/:block/exercises/:exercise",
            delete(handlers::remove_exercise),
        )
        .route(
            "/api/config/blocks/:block/exercises/:exercise/sets",
            put(handlers::set_set_count),
        )
        .route(
            "/api/config/nutrition-targets",
            put(handlers::put_nutrition_targets),
        )
        .route("/api/config/sleep-target", put(handlers::put_sleep_target))
        .route("/api/history", get(handlers::get_history))
        .with_state(state)
}
