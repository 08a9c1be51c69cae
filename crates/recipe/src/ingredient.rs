use foodgram_db::table::Ingredient;
use sea_query::{Expr, ExprTrait, LikeExpr, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::{SqlitePool, prelude::FromRow};

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct IngredientView {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}

/// Ingredients ordered by name, optionally narrowed to a name prefix.
///
/// Prefix matching relies on SQLite `LIKE`, which ignores case for ASCII only.
pub async fn list(
    pool: &SqlitePool,
    prefix: Option<&str>,
) -> foodgram_shared::Result<Vec<IngredientView>> {
    let mut statement = Query::select()
        .columns([Ingredient::Id, Ingredient::Name, Ingredient::MeasurementUnit])
        .from(Ingredient::Table)
        .order_by(Ingredient::Name, Order::Asc)
        .order_by(Ingredient::Id, Order::Asc)
        .to_owned();

    if let Some(prefix) = prefix.filter(|p| !p.is_empty()) {
        let pattern = LikeExpr::new(format!("{}%", escape_like(prefix))).escape('\\');
        statement.and_where(Expr::col(Ingredient::Name).like(pattern));
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, IngredientView, _>(&sql, values)
        .fetch_all(pool)
        .await?)
}

pub async fn find(pool: &SqlitePool, id: i64) -> foodgram_shared::Result<Option<IngredientView>> {
    let statement = Query::select()
        .columns([Ingredient::Id, Ingredient::Name, Ingredient::MeasurementUnit])
        .from(Ingredient::Table)
        .and_where(Expr::col(Ingredient::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, IngredientView, _>(&sql, values)
        .fetch_optional(pool)
        .await?)
}
