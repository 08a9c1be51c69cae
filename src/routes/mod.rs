use axum::{
    Router,
    routing::{get, post, put},
};
use sqlx::SqlitePool;

mod health;
mod ingredients;
mod recipes;
mod short_link;
mod subscriptions;
mod tags;
mod users;

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub user_command: foodgram_user::Command,
    pub recipe_command: foodgram_recipe::Command,
    pub pool: SqlitePool,
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(app_state.pool.clone())
        .route("/api/users/", get(users::list).post(users::create))
        .route("/api/users/me/", get(users::me))
        .route(
            "/api/users/me/avatar/",
            put(users::set_avatar).delete(users::clear_avatar),
        )
        .route("/api/users/set_password/", post(users::set_password))
        .route("/api/users/{id}/", get(users::retrieve))
        .route("/api/auth/token/login/", post(users::login))
        .route("/api/users/subscriptions/", get(subscriptions::list))
        .route(
            "/api/users/{id}/subscribe/",
            post(subscriptions::subscribe).delete(subscriptions::unsubscribe),
        )
        .route("/api/ingredients/", get(ingredients::list))
        .route("/api/ingredients/{id}/", get(ingredients::retrieve))
        .route("/api/tags/", get(tags::list))
        .route("/api/tags/{id}/", get(tags::retrieve))
        .route("/api/recipes/", get(recipes::list).post(recipes::create))
        .route(
            "/api/recipes/download_shopping_cart/",
            get(recipes::download_shopping_cart),
        )
        .route(
            "/api/recipes/{id}/",
            get(recipes::retrieve)
                .patch(recipes::update)
                .delete(recipes::delete),
        )
        .route(
            "/api/recipes/{id}/favorite/",
            post(recipes::favorite).delete(recipes::unfavorite),
        )
        .route(
            "/api/recipes/{id}/shopping_cart/",
            post(recipes::add_to_cart).delete(recipes::remove_from_cart),
        )
        .route("/api/recipes/{id}/get-link/", get(recipes::get_link))
        .route("/s/{token}", get(short_link::redirect))
        .with_state(app_state)
}
