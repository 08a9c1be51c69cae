use clap::ValueEnum;
use foodgram::Config;
use foodgram_shared::State;

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Role {
    Promote,
    Demote,
}

pub async fn set_role(config: &Config, email: String, role: Role) -> anyhow::Result<()> {
    let pool = foodgram::db::create_pool(&config.database.url, 1).await?;
    let command = foodgram_user::Command::new(State::single(pool.clone()), config.token_settings());

    match command.set_superuser(email.to_owned(), role == Role::Promote).await {
        Ok(()) => {}
        Err(foodgram_shared::Error::NotFound(_)) => {
            tracing::error!("user {email} not found");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }

    match role {
        Role::Promote => tracing::info!("{email} now have admin access"),
        Role::Demote => tracing::info!("{email} no longer has admin access"),
    }

    pool.close().await;

    Ok(())
}
