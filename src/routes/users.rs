use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use foodgram_shared::{Error, Page, PageArgs};
use foodgram_user::{AvatarInput, LoginInput, RegisterInput, SetPasswordInput, UserView};
use serde_json::json;

use super::AppState;
use crate::{auth::AuthUser, error::ApiResult};

pub async fn create(
    State(app): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> ApiResult<impl IntoResponse> {
    let user = app.user_command.register(input).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list(
    State(app): State<AppState>,
    user: Option<AuthUser>,
    Query(args): Query<PageArgs>,
) -> ApiResult<Json<Page<UserView>>> {
    let viewer = user.map(|u| u.id());

    Ok(Json(foodgram_user::list(&app.pool, args, viewer).await?))
}

pub async fn me(State(app): State<AppState>, user: AuthUser) -> ApiResult<Json<UserView>> {
    let Some(view) = foodgram_user::find_view(&app.pool, user.id(), Some(user.id())).await? else {
        return Err(Error::NotFound("user").into());
    };

    Ok(Json(view))
}

pub async fn retrieve(
    State(app): State<AppState>,
    user: Option<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserView>> {
    let viewer = user.map(|u| u.id());
    let Some(view) = foodgram_user::find_view(&app.pool, id, viewer).await? else {
        return Err(Error::NotFound("user").into());
    };

    Ok(Json(view))
}

pub async fn login(
    State(app): State<AppState>,
    Json(input): Json<LoginInput>,
) -> ApiResult<impl IntoResponse> {
    let token = app.user_command.login(input).await?;

    Ok(Json(json!({ "auth_token": token })))
}

pub async fn set_password(
    State(app): State<AppState>,
    user: AuthUser,
    Json(input): Json<SetPasswordInput>,
) -> ApiResult<StatusCode> {
    app.user_command.set_password(user.id(), input).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_avatar(
    State(app): State<AppState>,
    user: AuthUser,
    Json(input): Json<AvatarInput>,
) -> ApiResult<impl IntoResponse> {
    let avatar = app.user_command.set_avatar(user.id(), input).await?;

    Ok(Json(json!({ "avatar": avatar })))
}

pub async fn clear_avatar(State(app): State<AppState>, user: AuthUser) -> ApiResult<StatusCode> {
    app.user_command.clear_avatar(user.id()).await?;

    Ok(StatusCode::NO_CONTENT)
}
