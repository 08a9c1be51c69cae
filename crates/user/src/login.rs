use serde::Deserialize;
use validator::Validate;

use crate::{
    password::verify_password,
    repository::{self, FindType},
};

#[derive(Debug, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl super::Command {
    /// Exchanges credentials for a signed token.
    pub async fn login(&self, input: LoginInput) -> foodgram_shared::Result<String> {
        input.validate()?;

        let Some(user) = repository::find(&self.read_db, FindType::Email(input.email)).await?
        else {
            foodgram_shared::user!("Unable to log in with provided credentials");
        };

        if !verify_password(&input.password, &user.password)? {
            tracing::warn!(user_id = user.id, "login with wrong password");
            foodgram_shared::user!("Unable to log in with provided credentials");
        }

        self.tokens.encode(user.id)
    }
}
