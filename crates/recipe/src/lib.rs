mod create;
mod delete;
pub mod import;
pub mod ingredient;
mod query;
pub mod short_link;
pub mod shopping_list;
pub mod tag;
mod update;
mod user_list;

use std::ops::Deref;

use foodgram_shared::State;

pub use create::{CreateInput, IngredientAmount};
pub use ingredient::IngredientView;
pub use query::*;
pub use short_link::{RandomTokens, ShortLinkPolicy, TokenSource};
pub use tag::TagView;
pub use update::UpdateInput;
pub use user_list::{UserList, contains};

#[derive(Clone)]
pub struct Command {
    state: State,
    policy: ShortLinkPolicy,
}

impl Deref for Command {
    type Target = State;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl Command {
    pub fn new(state: State, policy: ShortLinkPolicy) -> foodgram_shared::Result<Self> {
        policy.validate()?;

        Ok(Self { state, policy })
    }

    pub fn policy(&self) -> ShortLinkPolicy {
        self.policy
    }
}
