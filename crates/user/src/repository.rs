use foodgram_db::table::User;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqlitePool, prelude::FromRow};

#[derive(FromRow)]
pub struct UserRow {
    pub id: i64,
    pub password: String,
    pub is_superuser: bool,
}

pub enum FindType {
    Id(i64),
    Email(String),
    Username(String),
}

pub(crate) async fn find(
    pool: &SqlitePool,
    arg_type: FindType,
) -> foodgram_shared::Result<Option<UserRow>> {
    let mut statement = Query::select()
        .columns([User::Id, User::Password, User::IsSuperuser])
        .from(User::Table)
        .limit(1)
        .to_owned();

    match arg_type {
        FindType::Id(id) => statement.and_where(Expr::col(User::Id).eq(id)),
        FindType::Email(email) => statement.and_where(Expr::col(User::Email).eq(email)),
        FindType::Username(username) => {
            statement.and_where(Expr::col(User::Username).eq(username))
        }
    };

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, UserRow, _>(&sql, values)
        .fetch_optional(pool)
        .await?)
}

pub(crate) struct CreateRow {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

pub(crate) async fn create(pool: &SqlitePool, row: CreateRow) -> Result<i64, sqlx::Error> {
    let statement = Query::insert()
        .into_table(User::Table)
        .columns([
            User::Email,
            User::Username,
            User::FirstName,
            User::LastName,
            User::Password,
            User::IsSuperuser,
            User::CreatedAt,
        ])
        .values_panic([
            row.email.into(),
            row.username.into(),
            row.first_name.into(),
            row.last_name.into(),
            row.password.into(),
            false.into(),
            foodgram_shared::now().into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(result.last_insert_rowid())
}

pub(crate) async fn set_superuser(
    pool: &SqlitePool,
    id: i64,
    is_superuser: bool,
) -> foodgram_shared::Result<()> {
    let statement = Query::update()
        .table(User::Table)
        .value(User::IsSuperuser, is_superuser)
        .and_where(Expr::col(User::Id).eq(id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}

#[derive(Default)]
pub(crate) struct UpdateRow {
    pub id: i64,
    pub password: Option<String>,
    pub avatar: Option<Option<String>>,
}

pub(crate) async fn update(pool: &SqlitePool, row: UpdateRow) -> foodgram_shared::Result<()> {
    let mut statement = Query::update()
        .table(User::Table)
        .and_where(Expr::col(User::Id).eq(row.id))
        .to_owned();

    if let Some(password) = row.password {
        statement.value(User::Password, password);
    }

    if let Some(avatar) = row.avatar {
        statement.value(User::Avatar, avatar);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}

pub(crate) async fn exists(pool: &SqlitePool, id: i64) -> foodgram_shared::Result<bool> {
    Ok(find(pool, FindType::Id(id)).await?.is_some())
}
