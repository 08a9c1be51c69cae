use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::{
    UserView,
    password::hash_password,
    repository::{self, CreateRow, FindType},
};

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("username pattern is valid"));

fn validate_username(value: &str) -> Result<(), ValidationError> {
    if value.eq_ignore_ascii_case("me") {
        return Err(ValidationError::new("username")
            .with_message(format!("Username {value} is not allowed").into()));
    }

    if !USERNAME_RE.is_match(value) {
        return Err(ValidationError::new("username")
            .with_message("Username may contain only letters, digits and @/./+/-/_".into()));
    }

    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(email, length(max = 254))]
    pub email: String,
    #[validate(length(min = 1, max = 150), custom(function = "validate_username"))]
    pub username: String,
    #[validate(length(max = 150))]
    #[serde(default)]
    pub first_name: String,
    #[validate(length(max = 150))]
    #[serde(default)]
    pub last_name: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

impl super::Command {
    pub async fn register(&self, input: RegisterInput) -> foodgram_shared::Result<UserView> {
        input.validate()?;

        if repository::find(&self.read_db, FindType::Email(input.email.to_owned()))
            .await?
            .is_some()
        {
            foodgram_shared::user!("A user with that email already exists");
        }

        if repository::find(&self.read_db, FindType::Username(input.username.to_owned()))
            .await?
            .is_some()
        {
            foodgram_shared::user!("A user with that username already exists");
        }

        let password = hash_password(&input.password)?;

        let id = match repository::create(
            &self.write_db,
            CreateRow {
                email: input.email.to_owned(),
                username: input.username.to_owned(),
                first_name: input.first_name.to_owned(),
                last_name: input.last_name.to_owned(),
                password,
            },
        )
        .await
        {
            Ok(id) => id,
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                foodgram_shared::user!("A user with that email or username already exists");
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(user_id = id, username = input.username.as_str(), "user registered");

        Ok(UserView {
            email: input.email,
            id,
            username: input.username,
            first_name: input.first_name,
            last_name: input.last_name,
            is_subscribed: false,
            avatar: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_reserved_and_malformed_usernames() {
        assert!(validate_username("Me").is_err());
        assert!(validate_username("john doe").is_err());
        assert!(validate_username("john.doe+food@home").is_ok());
    }
}
