use axum::{
    Json,
    extract::{Path, Query, State},
};
use foodgram_recipe::{IngredientView, ingredient};
use foodgram_shared::Error;
use serde::Deserialize;

use super::AppState;
use crate::error::ApiResult;

#[derive(Debug, Default, Deserialize)]
pub struct IngredientQuery {
    pub name: Option<String>,
}

pub async fn list(
    State(app): State<AppState>,
    Query(query): Query<IngredientQuery>,
) -> ApiResult<Json<Vec<IngredientView>>> {
    Ok(Json(
        ingredient::list(&app.pool, query.name.as_deref()).await?,
    ))
}

pub async fn retrieve(
    State(app): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<IngredientView>> {
    let Some(ingredient) = ingredient::find(&app.pool, id).await? else {
        return Err(Error::NotFound("ingredient").into());
    };

    Ok(Json(ingredient))
}
