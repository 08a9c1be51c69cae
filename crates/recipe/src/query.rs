use foodgram_db::table::{Favorite, Recipe, RecipeTag, ShoppingCart, Tag};
use foodgram_shared::{Page, PageArgs};
use foodgram_user::UserView;
use sea_query::{Expr, ExprTrait, Func, Order, Query, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::{SqlitePool, prelude::FromRow};

use crate::{TagView, UserList, user_list};

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct RecipeIngredientView {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeView {
    pub id: i64,
    pub tags: Vec<TagView>,
    pub author: UserView,
    pub ingredients: Vec<RecipeIngredientView>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i64,
}

/// Compact recipe used by favorites, cart and subscription listings.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct ShortRecipe {
    pub id: i64,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: i64,
}

#[derive(Debug, Default, Clone)]
pub struct RecipeFilter {
    pub author: Option<i64>,
    /// Tag slugs; a recipe matches when it carries any of them.
    pub tags: Vec<String>,
    /// Only applied for an authenticated viewer.
    pub is_favorited: bool,
    /// Only applied for an authenticated viewer.
    pub is_in_shopping_cart: bool,
    pub page: PageArgs,
}

#[derive(FromRow)]
struct RecipeRow {
    id: i64,
    author_id: i64,
    name: String,
    image: Option<String>,
    text: String,
    cooking_time: i64,
}

fn select_row() -> SelectStatement {
    Query::select()
        .columns([
            Recipe::Id,
            Recipe::AuthorId,
            Recipe::Name,
            Recipe::Image,
            Recipe::Text,
            Recipe::CookingTime,
        ])
        .from(Recipe::Table)
        .to_owned()
}

fn select_short() -> SelectStatement {
    Query::select()
        .columns([Recipe::Id, Recipe::Name, Recipe::Image, Recipe::CookingTime])
        .from(Recipe::Table)
        .to_owned()
}

async fn tags_of(pool: &SqlitePool, recipe_id: i64) -> foodgram_shared::Result<Vec<TagView>> {
    let tagged = Query::select()
        .column(RecipeTag::TagId)
        .from(RecipeTag::Table)
        .and_where(Expr::col(RecipeTag::RecipeId).eq(recipe_id))
        .to_owned();

    let statement = Query::select()
        .columns([Tag::Id, Tag::Name, Tag::Slug])
        .from(Tag::Table)
        .and_where(Expr::col(Tag::Id).in_subquery(tagged))
        .order_by(Tag::Id, Order::Asc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, TagView, _>(&sql, values)
        .fetch_all(pool)
        .await?)
}

async fn ingredients_of(
    pool: &SqlitePool,
    recipe_id: i64,
) -> foodgram_shared::Result<Vec<RecipeIngredientView>> {
    let rows = sqlx::query_as::<_, RecipeIngredientView>(
        r#"
SELECT i.id, i.name, i.measurement_unit, ri.amount
FROM recipe_ingredient ri
JOIN ingredient i ON i.id = ri.ingredient_id
WHERE ri.recipe_id = ?
ORDER BY ri.id
"#,
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

async fn load_view(
    pool: &SqlitePool,
    row: RecipeRow,
    viewer: Option<i64>,
) -> foodgram_shared::Result<RecipeView> {
    let Some(author) = foodgram_user::find_view(pool, row.author_id, viewer).await? else {
        foodgram_shared::not_found!("user");
    };

    let (is_favorited, is_in_shopping_cart) = match viewer {
        Some(viewer) => (
            user_list::contains(pool, UserList::Favorite, viewer, row.id).await?,
            user_list::contains(pool, UserList::ShoppingCart, viewer, row.id).await?,
        ),
        None => (false, false),
    };

    Ok(RecipeView {
        id: row.id,
        tags: tags_of(pool, row.id).await?,
        author,
        ingredients: ingredients_of(pool, row.id).await?,
        is_favorited,
        is_in_shopping_cart,
        name: row.name,
        image: row.image,
        text: row.text,
        cooking_time: row.cooking_time,
    })
}

pub async fn find(
    pool: &SqlitePool,
    id: i64,
    viewer: Option<i64>,
) -> foodgram_shared::Result<Option<RecipeView>> {
    let statement = select_row()
        .and_where(Expr::col(Recipe::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let Some(row) = sqlx::query_as_with::<_, RecipeRow, _>(&sql, values)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };

    Ok(Some(load_view(pool, row, viewer).await?))
}

pub async fn find_short(
    pool: &SqlitePool,
    id: i64,
) -> foodgram_shared::Result<Option<ShortRecipe>> {
    let statement = select_short()
        .and_where(Expr::col(Recipe::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, ShortRecipe, _>(&sql, values)
        .fetch_optional(pool)
        .await?)
}

pub(crate) async fn author_of(pool: &SqlitePool, id: i64) -> foodgram_shared::Result<Option<i64>> {
    let statement = Query::select()
        .column(Recipe::AuthorId)
        .from(Recipe::Table)
        .and_where(Expr::col(Recipe::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|(author_id,)| author_id))
}

/// Stored short link token of a recipe.
pub async fn find_short_link(
    pool: &SqlitePool,
    id: i64,
) -> foodgram_shared::Result<Option<String>> {
    let statement = Query::select()
        .column(Recipe::ShortLink)
        .from(Recipe::Table)
        .and_where(Expr::col(Recipe::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, (String,), _>(&sql, values)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|(token,)| token))
}

fn apply_filter(statement: &mut SelectStatement, filter: &RecipeFilter, viewer: Option<i64>) {
    if let Some(author) = filter.author {
        statement.and_where(Expr::col(Recipe::AuthorId).eq(author));
    }

    if !filter.tags.is_empty() {
        let slugs = Query::select()
            .column(Tag::Id)
            .from(Tag::Table)
            .and_where(Expr::col(Tag::Slug).is_in(filter.tags.iter().map(|t| t.to_owned())))
            .to_owned();

        let tagged = Query::select()
            .column(RecipeTag::RecipeId)
            .from(RecipeTag::Table)
            .and_where(Expr::col(RecipeTag::TagId).in_subquery(slugs))
            .to_owned();

        statement.and_where(Expr::col(Recipe::Id).in_subquery(tagged));
    }

    let Some(viewer) = viewer else {
        return;
    };

    if filter.is_favorited {
        let favorites = Query::select()
            .column(Favorite::RecipeId)
            .from(Favorite::Table)
            .and_where(Expr::col(Favorite::UserId).eq(viewer))
            .to_owned();

        statement.and_where(Expr::col(Recipe::Id).in_subquery(favorites));
    }

    if filter.is_in_shopping_cart {
        let cart = Query::select()
            .column(ShoppingCart::RecipeId)
            .from(ShoppingCart::Table)
            .and_where(Expr::col(ShoppingCart::UserId).eq(viewer))
            .to_owned();

        statement.and_where(Expr::col(Recipe::Id).in_subquery(cart));
    }
}

/// Newest first.
pub async fn filter(
    pool: &SqlitePool,
    filter: &RecipeFilter,
    viewer: Option<i64>,
) -> foodgram_shared::Result<Page<RecipeView>> {
    let mut count = Query::select()
        .expr(Func::count(Expr::col(Recipe::Id)))
        .from(Recipe::Table)
        .to_owned();
    apply_filter(&mut count, filter, viewer);

    let (sql, values) = count.build_sqlx(SqliteQueryBuilder);
    let (total,) = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
        .fetch_one(pool)
        .await?;

    let mut statement = select_row();
    apply_filter(&mut statement, filter, viewer);
    statement
        .order_by(Recipe::CreatedAt, Order::Desc)
        .order_by(Recipe::Id, Order::Desc)
        .limit(filter.page.limit())
        .offset(filter.page.offset());

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, RecipeRow, _>(&sql, values)
        .fetch_all(pool)
        .await?;

    let mut results = Vec::with_capacity(rows.len());
    for row in rows {
        results.push(load_view(pool, row, viewer).await?);
    }

    Ok(Page::new(filter.page, u64::try_from(total).unwrap_or_default(), results))
}

/// Latest recipes of an author, capped at `limit` when given.
pub async fn short_by_author(
    pool: &SqlitePool,
    author_id: i64,
    limit: Option<u64>,
) -> foodgram_shared::Result<Vec<ShortRecipe>> {
    let mut statement = select_short()
        .and_where(Expr::col(Recipe::AuthorId).eq(author_id))
        .order_by(Recipe::CreatedAt, Order::Desc)
        .order_by(Recipe::Id, Order::Desc)
        .to_owned();

    if let Some(limit) = limit {
        statement.limit(limit);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, ShortRecipe, _>(&sql, values)
        .fetch_all(pool)
        .await?)
}

pub async fn count_by_author(pool: &SqlitePool, author_id: i64) -> foodgram_shared::Result<u64> {
    let statement = Query::select()
        .expr(Func::count(Expr::col(Recipe::Id)))
        .from(Recipe::Table)
        .and_where(Expr::col(Recipe::AuthorId).eq(author_id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let (count,) = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
        .fetch_one(pool)
        .await?;

    Ok(u64::try_from(count).unwrap_or_default())
}
