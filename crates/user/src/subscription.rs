use foodgram_db::table::Subscription;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;

use crate::{query::is_subscribed, repository};

impl super::Command {
    pub async fn subscribe(&self, user_id: i64, author_id: i64) -> foodgram_shared::Result<()> {
        if !repository::exists(&self.read_db, author_id).await? {
            foodgram_shared::not_found!("user");
        }

        if user_id == author_id {
            foodgram_shared::user!("You cannot subscribe to yourself");
        }

        if is_subscribed(&self.read_db, user_id, author_id).await? {
            foodgram_shared::user!("You are already subscribed to this author");
        }

        let statement = Query::insert()
            .into_table(Subscription::Table)
            .columns([Subscription::UserId, Subscription::AuthorId])
            .values_panic([user_id.into(), author_id.into()])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        match sqlx::query_with(&sql, values).execute(&self.write_db).await {
            Ok(_) => {}
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                foodgram_shared::user!("You are already subscribed to this author");
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(user_id, author_id, "subscribed");

        Ok(())
    }

    pub async fn unsubscribe(&self, user_id: i64, author_id: i64) -> foodgram_shared::Result<()> {
        if !repository::exists(&self.read_db, author_id).await? {
            foodgram_shared::not_found!("user");
        }

        let statement = Query::delete()
            .from_table(Subscription::Table)
            .and_where(Expr::col(Subscription::UserId).eq(user_id))
            .and_where(Expr::col(Subscription::AuthorId).eq(author_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&self.write_db).await?;

        if result.rows_affected() == 0 {
            foodgram_shared::user!("You are not subscribed to this author");
        }

        tracing::info!(user_id, author_id, "unsubscribed");

        Ok(())
    }
}
