#![allow(dead_code)]

use std::{path::PathBuf, str::FromStr};

use foodgram_recipe::{
    Command, CreateInput, IngredientAmount, ShortLinkPolicy, TokenSource, import,
};
use foodgram_shared::State;
use foodgram_user::{RegisterInput, TokenSettings};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use sqlx_migrator::{Migrate, Plan};

pub const FLOUR: i64 = 1;
pub const MILK: i64 = 2;
pub const EGG: i64 = 3;
pub const BREAKFAST: i64 = 1;
pub const DINNER: i64 = 2;

/// Pools on the database file at `path`, the write pool holding one connection.
pub async fn connect_state(path: PathBuf) -> anyhow::Result<State> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    let write_db = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts.clone())
        .await?;
    let read_db = SqlitePool::connect_with(opts).await?;

    Ok(State { read_db, write_db })
}

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<State> {
    let State { read_db, write_db } = connect_state(path).await?;

    let mut conn = write_db.acquire().await?;
    foodgram_db::migrator()?
        .run(&mut *conn, &Plan::apply_all())
        .await?;
    drop(conn);

    import::ingredients(&write_db, "flour,g\nmilk,ml\negg,pcs\n".as_bytes()).await?;
    import::tags(&write_db, "Breakfast,breakfast\nDinner,dinner\n".as_bytes()).await?;

    Ok(State { read_db, write_db })
}

pub fn command(state: State) -> Command {
    command_with(state, ShortLinkPolicy::default())
}

pub fn command_with(state: State, policy: ShortLinkPolicy) -> Command {
    Command::new(state, policy).expect("valid short link policy")
}

pub fn user_command(state: State) -> foodgram_user::Command {
    foodgram_user::Command::new(
        state,
        TokenSettings {
            secret: "test_secret_key_minimum_32_characters_long".to_owned(),
            lifetime_seconds: 3600,
        },
    )
}

pub async fn create_users(
    state: &State,
    names: impl IntoIterator<Item = &str>,
) -> anyhow::Result<Vec<i64>> {
    let cmd = user_command(state.clone());
    let mut ids = vec![];
    for name in names {
        let user = cmd
            .register(RegisterInput {
                email: format!("{name}@foodgram.localhost"),
                username: name.to_owned(),
                first_name: name.to_owned(),
                last_name: "Doe".to_owned(),
                password: "my_password".to_owned(),
            })
            .await?;
        ids.push(user.id);
    }

    Ok(ids)
}

pub fn create_input(name: &str) -> CreateInput {
    CreateInput {
        ingredients: vec![
            IngredientAmount {
                id: FLOUR,
                amount: 200,
            },
            IngredientAmount {
                id: MILK,
                amount: 250,
            },
        ],
        tags: vec![BREAKFAST],
        image: "data:image/png;base64,iVBORw0KGgo=".to_owned(),
        name: name.to_owned(),
        text: format!("How to cook {name}"),
        cooking_time: 15,
    }
}

/// Hands out the given tokens in order, repeating the last one forever.
pub struct Scripted {
    tokens: Vec<String>,
    next: usize,
}

impl Scripted {
    pub fn new(tokens: &[&str]) -> Self {
        Self {
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            next: 0,
        }
    }

    pub fn drawn(&self) -> usize {
        self.next
    }
}

impl TokenSource for Scripted {
    fn next_token(&mut self) -> String {
        let token = self.tokens[self.next.min(self.tokens.len() - 1)].to_owned();
        self.next += 1;
        token
    }
}
