use serde::Deserialize;
use validator::Validate;

use crate::{
    password::{hash_password, verify_password},
    repository::{self, FindType, UpdateRow},
};

#[derive(Debug, Deserialize, Validate)]
pub struct SetPasswordInput {
    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
    #[validate(length(min = 1))]
    pub current_password: String,
}

/// Avatar payload, usually a `data:` URL. Stored as given.
#[derive(Debug, Deserialize, Validate)]
pub struct AvatarInput {
    #[validate(length(min = 1))]
    pub avatar: String,
}

impl super::Command {
    pub async fn set_password(
        &self,
        user_id: i64,
        input: SetPasswordInput,
    ) -> foodgram_shared::Result<()> {
        input.validate()?;

        let Some(user) = repository::find(&self.read_db, FindType::Id(user_id)).await? else {
            foodgram_shared::not_found!("user");
        };

        if !verify_password(&input.current_password, &user.password)? {
            tracing::warn!(user_id, "password change with wrong current password");
            foodgram_shared::user!("Invalid password");
        }

        repository::update(
            &self.write_db,
            UpdateRow {
                id: user.id,
                password: Some(hash_password(&input.new_password)?),
                ..Default::default()
            },
        )
        .await?;

        tracing::info!(user_id, "password changed");

        Ok(())
    }

    pub async fn set_avatar(
        &self,
        user_id: i64,
        input: AvatarInput,
    ) -> foodgram_shared::Result<String> {
        input.validate()?;

        if !repository::exists(&self.read_db, user_id).await? {
            foodgram_shared::not_found!("user");
        }

        repository::update(
            &self.write_db,
            UpdateRow {
                id: user_id,
                avatar: Some(Some(input.avatar.to_owned())),
                ..Default::default()
            },
        )
        .await?;

        Ok(input.avatar)
    }

    pub async fn clear_avatar(&self, user_id: i64) -> foodgram_shared::Result<()> {
        repository::update(
            &self.write_db,
            UpdateRow {
                id: user_id,
                avatar: Some(None),
                ..Default::default()
            },
        )
        .await
    }
}
