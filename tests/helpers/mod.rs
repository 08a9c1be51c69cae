#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use foodgram::{
    AppState, Config,
    config::{DatabaseConfig, JwtConfig, ObservabilityConfig, ServerConfig, ShortLinkConfig},
};
use foodgram_shared::State;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use temp_dir::TempDir;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    _dir: TempDir,
}

pub fn test_config(url: String) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8000,
            base_url: "http://localhost:8000".to_string(),
        },
        database: DatabaseConfig {
            url,
            max_connections: 4,
        },
        jwt: JwtConfig {
            secret: "test_secret_key_minimum_32_characters_long".to_string(),
            expiration_days: 7,
        },
        observability: ObservabilityConfig::default(),
        short_link: ShortLinkConfig::default(),
    }
}

/// Migrated temp-dir database seeded with three ingredients and two tags.
pub async fn spawn_app() -> anyhow::Result<TestApp> {
    let dir = TempDir::new()?;
    let url = format!("sqlite:{}", dir.child("db.sqlite3").display());
    let config = test_config(url);

    let write_pool = foodgram::db::create_write_pool(&config.database.url).await?;
    foodgram::db::migrate(&write_pool).await?;
    let read_pool = foodgram::db::create_pool(&config.database.url, 4).await?;

    foodgram_recipe::import::ingredients(&write_pool, "flour,g\nmilk,ml\negg,pcs\n".as_bytes())
        .await?;
    foodgram_recipe::import::tags(&write_pool, "Breakfast,breakfast\nDinner,dinner\n".as_bytes())
        .await?;

    let shared = State {
        read_db: read_pool.clone(),
        write_db: write_pool,
    };

    let state = AppState {
        user_command: foodgram_user::Command::new(shared.clone(), config.token_settings()),
        recipe_command: foodgram_recipe::Command::new(shared, (&config.short_link).into())?,
        config,
        pool: read_pool,
    };

    Ok(TestApp {
        router: foodgram::router(state.clone()),
        state,
        _dir: dir,
    })
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Token {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await?.to_bytes();

        Ok((status, headers, bytes))
    }

    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> anyhow::Result<(StatusCode, Value)> {
        let (status, _, bytes) = self.request(method, uri, token, body).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        Ok((status, value))
    }

    /// Registers `name` and returns its id and an auth token.
    pub async fn signup(&self, name: &str) -> anyhow::Result<(i64, String)> {
        let (status, user) = self
            .json(
                Method::POST,
                "/api/users/",
                None,
                Some(json!({
                    "email": format!("{name}@foodgram.localhost"),
                    "username": name,
                    "first_name": name,
                    "last_name": "Doe",
                    "password": "my_password",
                })),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED, "{user}");

        let (status, body) = self
            .json(
                Method::POST,
                "/api/auth/token/login/",
                None,
                Some(json!({
                    "email": format!("{name}@foodgram.localhost"),
                    "password": "my_password",
                })),
            )
            .await?;
        assert_eq!(status, StatusCode::OK, "{body}");

        let id = user["id"].as_i64().unwrap();
        let token = body["auth_token"].as_str().unwrap().to_owned();

        Ok((id, token))
    }

    pub async fn create_recipe(
        &self,
        token: &str,
        name: &str,
        tags: &[i64],
    ) -> anyhow::Result<Value> {
        let (status, recipe) = self
            .json(
                Method::POST,
                "/api/recipes/",
                Some(token),
                Some(recipe_body(name, tags)),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED, "{recipe}");

        Ok(recipe)
    }
}

pub fn recipe_body(name: &str, tags: &[i64]) -> Value {
    json!({
        "ingredients": [{"id": 1, "amount": 200}, {"id": 2, "amount": 250}],
        "tags": tags,
        "image": "data:image/png;base64,iVBORw0KGgo=",
        "name": name,
        "text": format!("How to cook {name}"),
        "cooking_time": 15,
    })
}
