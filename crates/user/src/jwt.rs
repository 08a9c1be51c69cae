use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

/// User information extracted from a verified token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub is_superuser: bool,
}

impl AuthUser {
    /// Owner-or-superuser rule for mutating a resource.
    pub fn can_edit(&self, owner_id: i64) -> bool {
        self.is_superuser || self.id == owner_id
    }
}

#[derive(Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub lifetime_seconds: i64,
}

impl TokenSettings {
    pub fn encode(&self, user_id: i64) -> foodgram_shared::Result<String> {
        let now = foodgram_shared::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: now + self.lifetime_seconds,
            iat: now,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| foodgram_shared::Error::Unknown(e.into()))
    }

    pub fn decode(&self, token: &str) -> foodgram_shared::Result<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!("rejected token: {e}");
            foodgram_shared::Error::Unauthorized
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(secret: &str) -> TokenSettings {
        TokenSettings {
            secret: secret.to_owned(),
            lifetime_seconds: 3600,
        }
    }

    #[test]
    fn decodes_its_own_tokens() {
        let tokens = settings("test_secret_key_minimum_32_characters_long");
        let token = tokens.encode(42).unwrap();
        let claims = tokens.decode(&token).unwrap();

        assert_eq!(claims.sub, "42");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn rejects_tokens_signed_with_another_secret() {
        let token = settings("test_secret_key_minimum_32_characters_long")
            .encode(42)
            .unwrap();

        let result = settings("another_secret_key_minimum_32_characters").decode(&token);

        assert!(matches!(result, Err(foodgram_shared::Error::Unauthorized)));
    }

    #[test]
    fn owner_or_superuser_can_edit() {
        let owner = AuthUser {
            id: 1,
            is_superuser: false,
        };
        let admin = AuthUser {
            id: 2,
            is_superuser: true,
        };
        let other = AuthUser {
            id: 3,
            is_superuser: false,
        };

        assert!(owner.can_edit(1));
        assert!(admin.can_edit(1));
        assert!(!other.can_edit(1));
    }
}
