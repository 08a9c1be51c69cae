use std::collections::HashSet;

use foodgram_db::table::{Ingredient, Recipe, RecipeIngredient, RecipeTag, Tag};
use foodgram_shared::{Error, now};
use sea_query::{Expr, ExprTrait, Func, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};
use validator::Validate;

use crate::short_link::{self, EXHAUSTED, RandomTokens, TokenSource};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IngredientAmount {
    pub id: i64,
    #[validate(range(min = 1, max = 32767))]
    pub amount: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInput {
    #[validate(length(min = 1), nested)]
    pub ingredients: Vec<IngredientAmount>,
    #[validate(length(min = 1))]
    pub tags: Vec<i64>,
    #[validate(length(min = 1))]
    pub image: String,
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    #[validate(length(min = 1))]
    pub text: String,
    #[validate(range(min = 1, max = 1500))]
    pub cooking_time: i64,
}

impl super::Command {
    pub async fn create(&self, author_id: i64, input: CreateInput) -> foodgram_shared::Result<i64> {
        let mut source = RandomTokens::new(self.policy.length);

        self.create_with(author_id, input, &mut source).await
    }

    /// Creates a recipe drawing its short link from `source`.
    ///
    /// The token is allocated inside an immediate transaction, so the lookup and
    /// the insert hold the write lock together and other writers queue behind
    /// it. A unique violation on insert still rolls back and retries the whole
    /// round, up to `insert_retries` times.
    pub async fn create_with<S: TokenSource + Send + ?Sized>(
        &self,
        author_id: i64,
        input: CreateInput,
        source: &mut S,
    ) -> foodgram_shared::Result<i64> {
        input.validate()?;
        check_relations(&self.read_db, &input.ingredients, &input.tags).await?;

        let created_at = now();

        for attempt in 1..=self.policy.insert_retries {
            let mut tx = self.write_db.begin_with("BEGIN IMMEDIATE").await?;
            let short_link =
                short_link::allocate(&mut *tx, source, self.policy.max_attempts).await?;

            let statement = Query::insert()
                .into_table(Recipe::Table)
                .columns([
                    Recipe::AuthorId,
                    Recipe::Name,
                    Recipe::Image,
                    Recipe::Text,
                    Recipe::CookingTime,
                    Recipe::ShortLink,
                    Recipe::CreatedAt,
                ])
                .values_panic([
                    author_id.into(),
                    input.name.to_owned().into(),
                    input.image.to_owned().into(),
                    input.text.to_owned().into(),
                    input.cooking_time.into(),
                    short_link.to_owned().into(),
                    created_at.into(),
                ])
                .to_owned();

            let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
            let id = match sqlx::query_with(&sql, values).execute(&mut *tx).await {
                Ok(result) => result.last_insert_rowid(),
                Err(e) if short_link::is_conflict(&e) => {
                    tracing::warn!(
                        attempt,
                        short_link = short_link.as_str(),
                        "short link taken by a concurrent insert"
                    );
                    tx.rollback().await?;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            replace_relations(&mut *tx, id, &input.ingredients, &input.tags).await?;
            tx.commit().await?;

            tracing::info!(
                recipe_id = id,
                author_id,
                short_link = short_link.as_str(),
                "recipe created"
            );

            return Ok(id);
        }

        Err(Error::Unavailable(EXHAUSTED.to_owned()))
    }
}

async fn count_existing<T>(
    pool: &SqlitePool,
    table: T,
    id: T,
    ids: &HashSet<i64>,
) -> foodgram_shared::Result<usize>
where
    T: sea_query::Iden + Copy + 'static,
{
    let statement = Query::select()
        .expr(Func::count(Expr::col(id)))
        .from(table)
        .and_where(Expr::col(id).is_in(ids.iter().copied()))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let (count,) = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
        .fetch_one(pool)
        .await?;

    Ok(usize::try_from(count).unwrap_or_default())
}

/// Rejects duplicate or unknown ingredient and tag references.
pub(crate) async fn check_relations(
    pool: &SqlitePool,
    ingredients: &[IngredientAmount],
    tags: &[i64],
) -> foodgram_shared::Result<()> {
    let ingredient_ids: HashSet<i64> = ingredients.iter().map(|i| i.id).collect();
    if ingredient_ids.len() != ingredients.len() {
        foodgram_shared::user!("Ingredients must not repeat");
    }

    let tag_ids: HashSet<i64> = tags.iter().copied().collect();
    if tag_ids.len() != tags.len() {
        foodgram_shared::user!("Tags must not repeat");
    }

    if count_existing(pool, Ingredient::Table, Ingredient::Id, &ingredient_ids).await?
        != ingredient_ids.len()
    {
        foodgram_shared::user!("Unknown ingredient");
    }

    if count_existing(pool, Tag::Table, Tag::Id, &tag_ids).await? != tag_ids.len() {
        foodgram_shared::user!("Unknown tag");
    }

    Ok(())
}

/// Replaces the ingredient and tag rows of `recipe_id` in bulk.
pub(crate) async fn replace_relations(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    ingredients: &[IngredientAmount],
    tags: &[i64],
) -> foodgram_shared::Result<()> {
    let statements = [
        Query::delete()
            .from_table(RecipeIngredient::Table)
            .and_where(Expr::col(RecipeIngredient::RecipeId).eq(recipe_id))
            .to_owned(),
        Query::delete()
            .from_table(RecipeTag::Table)
            .and_where(Expr::col(RecipeTag::RecipeId).eq(recipe_id))
            .to_owned(),
    ];

    for statement in statements {
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *conn).await?;
    }

    let mut statement = Query::insert()
        .into_table(RecipeIngredient::Table)
        .columns([
            RecipeIngredient::RecipeId,
            RecipeIngredient::IngredientId,
            RecipeIngredient::Amount,
        ])
        .to_owned();

    for ingredient in ingredients {
        statement.values_panic([
            recipe_id.into(),
            ingredient.id.into(),
            ingredient.amount.into(),
        ]);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&mut *conn).await?;

    let mut statement = Query::insert()
        .into_table(RecipeTag::Table)
        .columns([RecipeTag::RecipeId, RecipeTag::TagId])
        .to_owned();

    for tag in tags {
        statement.values_panic([recipe_id.into(), (*tag).into()]);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&mut *conn).await?;

    Ok(())
}
