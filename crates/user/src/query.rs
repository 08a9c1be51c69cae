use foodgram_db::table::{Subscription, User};
use foodgram_shared::{Page, PageArgs};
use sea_query::{Expr, ExprTrait, Func, Order, Query, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::{SqlitePool, prelude::FromRow};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserView {
    pub email: String,
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    pub avatar: Option<String>,
}

#[derive(FromRow)]
struct UserViewRow {
    id: i64,
    email: String,
    username: String,
    first_name: String,
    last_name: String,
    avatar: Option<String>,
}

impl UserViewRow {
    fn into_view(self, is_subscribed: bool) -> UserView {
        UserView {
            email: self.email,
            id: self.id,
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            is_subscribed,
            avatar: self.avatar,
        }
    }
}

fn select_view() -> SelectStatement {
    Query::select()
        .columns([
            User::Id,
            User::Email,
            User::Username,
            User::FirstName,
            User::LastName,
            User::Avatar,
        ])
        .from(User::Table)
        .to_owned()
}

/// Whether `user_id` follows `author_id`.
pub async fn is_subscribed(
    pool: &SqlitePool,
    user_id: i64,
    author_id: i64,
) -> foodgram_shared::Result<bool> {
    let statement = Query::select()
        .column(Subscription::Id)
        .from(Subscription::Table)
        .and_where(Expr::col(Subscription::UserId).eq(user_id))
        .and_where(Expr::col(Subscription::AuthorId).eq(author_id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}

async fn with_subscription(
    pool: &SqlitePool,
    row: UserViewRow,
    viewer: Option<i64>,
) -> foodgram_shared::Result<UserView> {
    let is_subscribed = match viewer {
        Some(viewer) => is_subscribed(pool, viewer, row.id).await?,
        None => false,
    };

    Ok(row.into_view(is_subscribed))
}

pub async fn find_view(
    pool: &SqlitePool,
    id: i64,
    viewer: Option<i64>,
) -> foodgram_shared::Result<Option<UserView>> {
    let statement = select_view()
        .and_where(Expr::col(User::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let Some(row) = sqlx::query_as_with::<_, UserViewRow, _>(&sql, values)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };

    Ok(Some(with_subscription(pool, row, viewer).await?))
}

async fn paginate(
    pool: &SqlitePool,
    mut statement: SelectStatement,
    count: SelectStatement,
    args: PageArgs,
) -> foodgram_shared::Result<(u64, Vec<UserViewRow>)> {
    let (sql, values) = count.build_sqlx(SqliteQueryBuilder);
    let (total,) = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
        .fetch_one(pool)
        .await?;

    statement
        .order_by(User::Username, Order::Asc)
        .limit(args.limit())
        .offset(args.offset());

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, UserViewRow, _>(&sql, values)
        .fetch_all(pool)
        .await?;

    Ok((u64::try_from(total).unwrap_or_default(), rows))
}

pub async fn list(
    pool: &SqlitePool,
    args: PageArgs,
    viewer: Option<i64>,
) -> foodgram_shared::Result<Page<UserView>> {
    let count = Query::select()
        .expr(Func::count(Expr::col(User::Id)))
        .from(User::Table)
        .to_owned();

    let (total, rows) = paginate(pool, select_view(), count, args).await?;

    let mut results = Vec::with_capacity(rows.len());
    for row in rows {
        results.push(with_subscription(pool, row, viewer).await?);
    }

    Ok(Page::new(args, total, results))
}

/// Authors followed by `user_id`.
pub async fn subscriptions(
    pool: &SqlitePool,
    user_id: i64,
    args: PageArgs,
) -> foodgram_shared::Result<Page<UserView>> {
    let followed = Query::select()
        .column(Subscription::AuthorId)
        .from(Subscription::Table)
        .and_where(Expr::col(Subscription::UserId).eq(user_id))
        .to_owned();

    let statement = select_view()
        .and_where(Expr::col(User::Id).in_subquery(followed.to_owned()))
        .to_owned();

    let count = Query::select()
        .expr(Func::count(Expr::col(Subscription::Id)))
        .from(Subscription::Table)
        .and_where(Expr::col(Subscription::UserId).eq(user_id))
        .to_owned();

    let (total, rows) = paginate(pool, statement, count, args).await?;

    Ok(Page::new(
        args,
        total,
        rows.into_iter().map(|row| row.into_view(true)).collect(),
    ))
}
