use std::fmt;

use foodgram_db::table::{Favorite, ShoppingCart};
use sea_query::{Expr, ExprTrait, Iden, OnConflict, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqlitePool;

use crate::ShortRecipe;

/// Per-user recipe collections sharing the `(user_id, recipe_id)` shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserList {
    Favorite,
    ShoppingCart,
}

impl fmt::Display for UserList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserList::Favorite => f.write_str("favorites"),
            UserList::ShoppingCart => f.write_str("shopping cart"),
        }
    }
}

trait ListTable: Iden + Copy + Send + Sync + 'static {
    const TABLE: Self;
    const USER_ID: Self;
    const RECIPE_ID: Self;
}

impl ListTable for Favorite {
    const TABLE: Self = Favorite::Table;
    const USER_ID: Self = Favorite::UserId;
    const RECIPE_ID: Self = Favorite::RecipeId;
}

impl ListTable for ShoppingCart {
    const TABLE: Self = ShoppingCart::Table;
    const USER_ID: Self = ShoppingCart::UserId;
    const RECIPE_ID: Self = ShoppingCart::RecipeId;
}

async fn contains_in<T: ListTable>(
    pool: &SqlitePool,
    user_id: i64,
    recipe_id: i64,
) -> foodgram_shared::Result<bool> {
    let statement = Query::select()
        .column(T::RECIPE_ID)
        .from(T::TABLE)
        .and_where(Expr::col(T::USER_ID).eq(user_id))
        .and_where(Expr::col(T::RECIPE_ID).eq(recipe_id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}

/// Inserts the pair, returning false when it was already there.
async fn insert_into<T: ListTable>(
    pool: &SqlitePool,
    user_id: i64,
    recipe_id: i64,
) -> foodgram_shared::Result<bool> {
    let statement = Query::insert()
        .into_table(T::TABLE)
        .columns([T::USER_ID, T::RECIPE_ID])
        .values_panic([user_id.into(), recipe_id.into()])
        .on_conflict(
            OnConflict::columns([T::USER_ID, T::RECIPE_ID])
                .do_nothing()
                .to_owned(),
        )
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(result.rows_affected() > 0)
}

async fn delete_from<T: ListTable>(
    pool: &SqlitePool,
    user_id: i64,
    recipe_id: i64,
) -> foodgram_shared::Result<bool> {
    let statement = Query::delete()
        .from_table(T::TABLE)
        .and_where(Expr::col(T::USER_ID).eq(user_id))
        .and_where(Expr::col(T::RECIPE_ID).eq(recipe_id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(result.rows_affected() > 0)
}

pub async fn contains(
    pool: &SqlitePool,
    list: UserList,
    user_id: i64,
    recipe_id: i64,
) -> foodgram_shared::Result<bool> {
    match list {
        UserList::Favorite => contains_in::<Favorite>(pool, user_id, recipe_id).await,
        UserList::ShoppingCart => contains_in::<ShoppingCart>(pool, user_id, recipe_id).await,
    }
}

impl super::Command {
    pub async fn add_to_list(
        &self,
        list: UserList,
        user_id: i64,
        recipe_id: i64,
    ) -> foodgram_shared::Result<ShortRecipe> {
        let Some(recipe) = crate::find_short(&self.read_db, recipe_id).await? else {
            foodgram_shared::not_found!("recipe");
        };

        let inserted = match list {
            UserList::Favorite => {
                insert_into::<Favorite>(&self.write_db, user_id, recipe_id).await?
            }
            UserList::ShoppingCart => {
                insert_into::<ShoppingCart>(&self.write_db, user_id, recipe_id).await?
            }
        };

        if !inserted {
            foodgram_shared::user!("Recipe is already in {list}");
        }

        tracing::info!(user_id, recipe_id, list = %list, "recipe added to list");

        Ok(recipe)
    }

    pub async fn remove_from_list(
        &self,
        list: UserList,
        user_id: i64,
        recipe_id: i64,
    ) -> foodgram_shared::Result<()> {
        if crate::find_short(&self.read_db, recipe_id).await?.is_none() {
            foodgram_shared::not_found!("recipe");
        }

        let deleted = match list {
            UserList::Favorite => {
                delete_from::<Favorite>(&self.write_db, user_id, recipe_id).await?
            }
            UserList::ShoppingCart => {
                delete_from::<ShoppingCart>(&self.write_db, user_id, recipe_id).await?
            }
        };

        if !deleted {
            foodgram_shared::user!("Recipe is not in {list}");
        }

        tracing::info!(user_id, recipe_id, list = %list, "recipe removed from list");

        Ok(())
    }
}
