//! Short links: fixed-length tokens that address a recipe as `/s/{token}`.
//!
//! The unique index on `recipe.short_link` is the authority on uniqueness.
//! [`allocate`] only checks the table so that the common case never hits the
//! index; callers still treat a unique violation on insert ([`is_conflict`])
//! as a signal to draw a new token.

use foodgram_db::table::Recipe;
use rand::seq::index;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqliteConnection, SqlitePool};

pub const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

pub(crate) const EXHAUSTED: &str = "could not allocate a unique short link, try again";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortLinkPolicy {
    /// Token length, at most `ALPHABET.len()` since symbols never repeat.
    pub length: usize,
    /// Candidates drawn per allocation before giving up.
    pub max_attempts: usize,
    /// Allocate+insert rounds when a concurrent insert takes the token first.
    pub insert_retries: usize,
}

impl ShortLinkPolicy {
    /// Rejects a policy that cannot produce tokens.
    pub fn validate(&self) -> foodgram_shared::Result<()> {
        if !(1..=ALPHABET.len()).contains(&self.length) {
            foodgram_shared::user!("short link length must be between 1 and 62");
        }

        if self.max_attempts < 1 {
            foodgram_shared::user!("short link max_attempts must be at least 1");
        }

        if self.insert_retries < 1 {
            foodgram_shared::user!("short link insert_retries must be at least 1");
        }

        Ok(())
    }
}

impl Default for ShortLinkPolicy {
    fn default() -> Self {
        Self {
            length: 8,
            max_attempts: 16,
            insert_retries: 3,
        }
    }
}

pub trait TokenSource {
    fn next_token(&mut self) -> String;
}

pub struct RandomTokens {
    length: usize,
}

impl RandomTokens {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl TokenSource for RandomTokens {
    fn next_token(&mut self) -> String {
        generate(self.length)
    }
}

/// Draws `length` distinct symbols of [`ALPHABET`].
///
/// A `length` above `ALPHABET.len()` yields the whole alphabet shuffled;
/// [`ShortLinkPolicy::validate`] keeps configured lengths in range.
pub fn generate(length: usize) -> String {
    let mut rng = rand::rng();

    index::sample(&mut rng, ALPHABET.len(), Ord::min(length, ALPHABET.len()))
        .iter()
        .map(|i| ALPHABET[i] as char)
        .collect()
}

async fn exists(conn: &mut SqliteConnection, token: &str) -> foodgram_shared::Result<bool> {
    let statement = Query::select()
        .column(Recipe::Id)
        .from(Recipe::Table)
        .and_where(Expr::col(Recipe::ShortLink).eq(token))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
        .fetch_optional(conn)
        .await?;

    Ok(row.is_some())
}

/// Draws candidates from `source` until one is free in `recipe.short_link`.
///
/// Runs on the connection of the creation transaction, which is opened with
/// `BEGIN IMMEDIATE` so no other writer can commit between lookup and insert.
/// Fails with [`foodgram_shared::Error::Unavailable`]
/// after `max_attempts` collisions.
pub async fn allocate<S: TokenSource + ?Sized>(
    conn: &mut SqliteConnection,
    source: &mut S,
    max_attempts: usize,
) -> foodgram_shared::Result<String> {
    for attempt in 1..=max_attempts {
        let candidate = source.next_token();

        if !exists(&mut *conn, &candidate).await? {
            return Ok(candidate);
        }

        tracing::debug!(attempt, candidate = candidate.as_str(), "short link collision");
    }

    tracing::error!(max_attempts, "short link space looks exhausted");

    Err(foodgram_shared::Error::Unavailable(EXHAUSTED.to_owned()))
}

/// Recipe id holding `token`.
pub async fn resolve(pool: &SqlitePool, token: &str) -> foodgram_shared::Result<i64> {
    let statement = Query::select()
        .column(Recipe::Id)
        .from(Recipe::Table)
        .and_where(Expr::col(Recipe::ShortLink).eq(token))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let Some((id,)) = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
        .fetch_optional(pool)
        .await?
    else {
        foodgram_shared::not_found!("recipe");
    };

    Ok(id)
}

pub fn absolute_url(base_url: &str, token: &str) -> String {
    format!("{}/s/{token}", base_url.trim_end_matches('/'))
}

/// Whether `err` is the unique index on `recipe.short_link` rejecting an insert.
pub fn is_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(e) => {
            e.is_unique_violation() && e.message().contains("recipe.short_link")
        }
        _ => false,
    }
}
