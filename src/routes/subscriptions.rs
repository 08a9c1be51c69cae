use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use foodgram_recipe::ShortRecipe;
use foodgram_shared::{Error, Page, PageArgs};
use foodgram_user::UserView;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::AppState;
use crate::{auth::AuthUser, error::ApiResult};

#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub recipes_limit: Option<u64>,
}

/// Followed author with a preview of their latest recipes.
#[derive(Debug, Serialize)]
pub struct AuthorView {
    #[serde(flatten)]
    pub user: UserView,
    pub recipes: Vec<ShortRecipe>,
    pub recipes_count: u64,
}

async fn with_recipes(
    pool: &SqlitePool,
    user: UserView,
    recipes_limit: Option<u64>,
) -> foodgram_shared::Result<AuthorView> {
    Ok(AuthorView {
        recipes: foodgram_recipe::short_by_author(pool, user.id, recipes_limit).await?,
        recipes_count: foodgram_recipe::count_by_author(pool, user.id).await?,
        user,
    })
}

pub async fn list(
    State(app): State<AppState>,
    user: AuthUser,
    Query(query): Query<SubscriptionQuery>,
) -> ApiResult<Json<Page<AuthorView>>> {
    let args = PageArgs {
        page: query.page,
        limit: query.limit,
    };
    let authors = foodgram_user::subscriptions(&app.pool, user.id(), args).await?;

    let mut results = Vec::with_capacity(authors.results.len());
    for author in authors.results {
        results.push(with_recipes(&app.pool, author, query.recipes_limit).await?);
    }

    Ok(Json(Page {
        count: authors.count,
        page: authors.page,
        limit: authors.limit,
        results,
    }))
}

pub async fn subscribe(
    State(app): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Query(query): Query<SubscriptionQuery>,
) -> ApiResult<impl IntoResponse> {
    app.user_command.subscribe(user.id(), id).await?;

    let Some(author) = foodgram_user::find_view(&app.pool, id, Some(user.id())).await? else {
        return Err(Error::NotFound("user").into());
    };

    Ok((
        StatusCode::CREATED,
        Json(with_recipes(&app.pool, author, query.recipes_limit).await?),
    ))
}

pub async fn unsubscribe(
    State(app): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    app.user_command.unsubscribe(user.id(), id).await?;

    Ok(StatusCode::NO_CONTENT)
}
