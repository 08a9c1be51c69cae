use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use foodgram_recipe::short_link;

use super::AppState;
use crate::error::ApiResult;

/// `GET /s/{token}`: 302 to the recipe page.
pub async fn redirect(
    State(app): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = short_link::resolve(&app.pool, &token).await?;

    tracing::debug!(token = token.as_str(), recipe_id = id, "short link resolved");

    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, format!("/recipes/{id}/"))],
    ))
}
