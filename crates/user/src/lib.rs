mod jwt;
mod login;
mod password;
mod profile;
mod query;
mod register;
mod repository;
mod subscription;

use std::ops::Deref;

use foodgram_shared::State;

pub use jwt::{AuthUser, Claims, TokenSettings};
pub use login::LoginInput;
pub use profile::{AvatarInput, SetPasswordInput};
pub use query::*;
pub use register::RegisterInput;

#[derive(Clone)]
pub struct Command {
    state: State,
    tokens: TokenSettings,
}

impl Deref for Command {
    type Target = State;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl Command {
    pub fn new(state: State, tokens: TokenSettings) -> Self {
        Self { state, tokens }
    }

    /// Resolves a bearer token to a user that still exists.
    pub async fn authenticate(&self, token: &str) -> foodgram_shared::Result<AuthUser> {
        let claims = self.tokens.decode(token)?;
        let Ok(id) = claims.sub.parse::<i64>() else {
            return Err(foodgram_shared::Error::Unauthorized);
        };

        let Some(user) = repository::find(&self.read_db, repository::FindType::Id(id)).await?
        else {
            tracing::warn!(user_id = id, "token refers to a missing user");
            return Err(foodgram_shared::Error::Unauthorized);
        };

        Ok(AuthUser {
            id: user.id,
            is_superuser: user.is_superuser,
        })
    }

    pub async fn set_superuser(
        &self,
        email: impl Into<String>,
        is_superuser: bool,
    ) -> foodgram_shared::Result<()> {
        let email = email.into();
        let Some(user) =
            repository::find(&self.read_db, repository::FindType::Email(email.to_owned())).await?
        else {
            foodgram_shared::not_found!("user");
        };

        repository::set_superuser(&self.write_db, user.id, is_superuser).await?;

        tracing::info!(user_id = user.id, is_superuser, "superuser flag updated");

        Ok(())
    }
}
