use axum::{
    Json,
    extract::{Path, State},
};
use foodgram_recipe::{TagView, tag};
use foodgram_shared::Error;

use super::AppState;
use crate::error::ApiResult;

pub async fn list(State(app): State<AppState>) -> ApiResult<Json<Vec<TagView>>> {
    Ok(Json(tag::list(&app.pool).await?))
}

pub async fn retrieve(
    State(app): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<TagView>> {
    let Some(tag) = tag::find(&app.pool, id).await? else {
        return Err(Error::NotFound("tag").into());
    };

    Ok(Json(tag))
}
