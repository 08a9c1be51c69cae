use std::{path::PathBuf, str::FromStr};

use foodgram_shared::State;
use foodgram_user::{Command, RegisterInput, TokenSettings};
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<State> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    foodgram_db::migrator()?
        .run(&mut *conn, &Plan::apply_all())
        .await?;

    Ok(State::single(pool))
}

pub fn command(state: State) -> Command {
    Command::new(
        state,
        TokenSettings {
            secret: "test_secret_key_minimum_32_characters_long".to_owned(),
            lifetime_seconds: 3600,
        },
    )
}

pub fn register_input(name: &str) -> RegisterInput {
    RegisterInput {
        email: format!("{name}@foodgram.localhost"),
        username: name.to_owned(),
        first_name: name.to_owned(),
        last_name: "Doe".to_owned(),
        password: "my_password".to_owned(),
    }
}

#[allow(dead_code)]
pub async fn create_users(
    cmd: &Command,
    names: impl IntoIterator<Item = &str>,
) -> anyhow::Result<Vec<i64>> {
    let mut ids = vec![];
    for name in names {
        ids.push(cmd.register(register_input(name)).await?.id);
    }

    Ok(ids)
}
