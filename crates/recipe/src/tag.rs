use foodgram_db::table::Tag;
use sea_query::{Expr, ExprTrait, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::{SqlitePool, prelude::FromRow};

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct TagView {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

pub async fn list(pool: &SqlitePool) -> foodgram_shared::Result<Vec<TagView>> {
    let statement = Query::select()
        .columns([Tag::Id, Tag::Name, Tag::Slug])
        .from(Tag::Table)
        .order_by(Tag::Slug, Order::Asc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, TagView, _>(&sql, values)
        .fetch_all(pool)
        .await?)
}

pub async fn find(pool: &SqlitePool, id: i64) -> foodgram_shared::Result<Option<TagView>> {
    let statement = Query::select()
        .columns([Tag::Id, Tag::Name, Tag::Slug])
        .from(Tag::Table)
        .and_where(Expr::col(Tag::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, TagView, _>(&sql, values)
        .fetch_optional(pool)
        .await?)
}
