use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use axum_extra::extract::Query;
use foodgram_recipe::{
    CreateInput, RecipeFilter, RecipeView, ShortRecipe, UpdateInput, UserList, shopping_list,
    short_link,
};
use foodgram_shared::{Error, Page, PageArgs};
use serde::Deserialize;
use serde_json::json;

use super::AppState;
use crate::{auth::AuthUser, error::ApiResult};

/// Query string of `GET /api/recipes/`; `tags` may repeat.
#[derive(Debug, Default, Deserialize)]
pub struct RecipeQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub author: Option<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_cart: Option<String>,
}

fn flag(value: Option<&str>) -> bool {
    matches!(value, Some("1" | "true"))
}

impl From<RecipeQuery> for RecipeFilter {
    fn from(value: RecipeQuery) -> Self {
        Self {
            author: value.author,
            is_favorited: flag(value.is_favorited.as_deref()),
            is_in_shopping_cart: flag(value.is_in_shopping_cart.as_deref()),
            tags: value.tags,
            page: PageArgs {
                page: value.page,
                limit: value.limit,
            },
        }
    }
}

async fn load(app: &AppState, id: i64, viewer: Option<i64>) -> ApiResult<RecipeView> {
    let Some(recipe) = foodgram_recipe::find(&app.pool, id, viewer).await? else {
        return Err(Error::NotFound("recipe").into());
    };

    Ok(recipe)
}

pub async fn list(
    State(app): State<AppState>,
    user: Option<AuthUser>,
    Query(query): Query<RecipeQuery>,
) -> ApiResult<Json<Page<RecipeView>>> {
    let viewer = user.map(|u| u.id());
    let filter = RecipeFilter::from(query);

    Ok(Json(foodgram_recipe::filter(&app.pool, &filter, viewer).await?))
}

pub async fn create(
    State(app): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateInput>,
) -> ApiResult<impl IntoResponse> {
    let id = app.recipe_command.create(user.id(), input).await?;

    Ok((StatusCode::CREATED, Json(load(&app, id, Some(user.id())).await?)))
}

pub async fn retrieve(
    State(app): State<AppState>,
    user: Option<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<Json<RecipeView>> {
    let viewer = user.map(|u| u.id());

    Ok(Json(load(&app, id, viewer).await?))
}

pub async fn update(
    State(app): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(input): Json<UpdateInput>,
) -> ApiResult<Json<RecipeView>> {
    app.recipe_command.update(&user.0, id, input).await?;

    Ok(Json(load(&app, id, Some(user.id())).await?))
}

pub async fn delete(
    State(app): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    app.recipe_command.delete(&user.0, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn add(
    app: &AppState,
    list: UserList,
    user_id: i64,
    id: i64,
) -> ApiResult<(StatusCode, Json<ShortRecipe>)> {
    let recipe = app.recipe_command.add_to_list(list, user_id, id).await?;

    Ok((StatusCode::CREATED, Json(recipe)))
}

async fn remove(app: &AppState, list: UserList, user_id: i64, id: i64) -> ApiResult<StatusCode> {
    app.recipe_command.remove_from_list(list, user_id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn favorite(
    State(app): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<(StatusCode, Json<ShortRecipe>)> {
    add(&app, UserList::Favorite, user.id(), id).await
}

pub async fn unfavorite(
    State(app): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    remove(&app, UserList::Favorite, user.id(), id).await
}

pub async fn add_to_cart(
    State(app): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<(StatusCode, Json<ShortRecipe>)> {
    add(&app, UserList::ShoppingCart, user.id(), id).await
}

pub async fn remove_from_cart(
    State(app): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    remove(&app, UserList::ShoppingCart, user.id(), id).await
}

pub async fn download_shopping_cart(
    State(app): State<AppState>,
    user: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let items = shopping_list::totals(&app.pool, user.id()).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"shopping_list.txt\"",
            ),
        ],
        shopping_list::render(&items),
    ))
}

pub async fn get_link(
    State(app): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let Some(token) = foodgram_recipe::find_short_link(&app.pool, id).await? else {
        return Err(Error::NotFound("recipe").into());
    };

    let url = short_link::absolute_url(&app.config.server.base_url, &token);

    Ok(Json(json!({ "short-link": url })))
}
