use foodgram_db::table::Recipe;
use foodgram_user::AuthUser;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;

impl super::Command {
    /// Deletes a recipe; ingredient, tag, favorite and cart rows cascade.
    pub async fn delete(&self, user: &AuthUser, id: i64) -> foodgram_shared::Result<()> {
        let Some(author_id) = crate::query::author_of(&self.read_db, id).await? else {
            foodgram_shared::not_found!("recipe");
        };

        if !user.can_edit(author_id) {
            return Err(foodgram_shared::Error::Forbidden);
        }

        let statement = Query::delete()
            .from_table(Recipe::Table)
            .and_where(Expr::col(Recipe::Id).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.write_db).await?;

        tracing::info!(recipe_id = id, user_id = user.id, "recipe deleted");

        Ok(())
    }
}
