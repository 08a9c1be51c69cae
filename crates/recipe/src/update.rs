use foodgram_db::table::Recipe;
use foodgram_user::AuthUser;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Deserialize;
use validator::Validate;

use crate::create::{IngredientAmount, check_relations, replace_relations};

/// Partial update. Ingredients and tags are required and replace the
/// current sets; scalar fields left out keep their value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateInput {
    #[validate(length(min = 1), nested)]
    pub ingredients: Option<Vec<IngredientAmount>>,
    #[validate(length(min = 1))]
    pub tags: Option<Vec<i64>>,
    #[validate(length(min = 1))]
    pub image: Option<String>,
    #[validate(length(min = 1, max = 256))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub text: Option<String>,
    #[validate(range(min = 1, max = 1500))]
    pub cooking_time: Option<i64>,
}

impl super::Command {
    pub async fn update(
        &self,
        user: &AuthUser,
        id: i64,
        input: UpdateInput,
    ) -> foodgram_shared::Result<()> {
        let Some(author_id) = crate::query::author_of(&self.read_db, id).await? else {
            foodgram_shared::not_found!("recipe");
        };

        if !user.can_edit(author_id) {
            return Err(foodgram_shared::Error::Forbidden);
        }

        input.validate()?;

        let Some(ingredients) = input.ingredients.as_deref() else {
            foodgram_shared::user!("ingredients: this field is required");
        };

        let Some(tags) = input.tags.as_deref() else {
            foodgram_shared::user!("tags: this field is required");
        };

        check_relations(&self.read_db, ingredients, tags).await?;

        let mut statement = Query::update().table(Recipe::Table).to_owned();
        let mut changed = false;

        if let Some(name) = &input.name {
            statement.value(Recipe::Name, name.to_owned());
            changed = true;
        }

        if let Some(text) = &input.text {
            statement.value(Recipe::Text, text.to_owned());
            changed = true;
        }

        if let Some(image) = &input.image {
            statement.value(Recipe::Image, image.to_owned());
            changed = true;
        }

        if let Some(cooking_time) = input.cooking_time {
            statement.value(Recipe::CookingTime, cooking_time);
            changed = true;
        }

        let mut tx = self.write_db.begin().await?;

        if changed {
            statement.and_where(Expr::col(Recipe::Id).eq(id));
            let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
            sqlx::query_with(&sql, values).execute(&mut *tx).await?;
        }

        replace_relations(&mut *tx, id, ingredients, tags).await?;
        tx.commit().await?;

        tracing::info!(recipe_id = id, user_id = user.id, "recipe updated");

        Ok(())
    }
}
