use axum::http::{Method, StatusCode};
use serde_json::json;

mod helpers;

#[tokio::test]
async fn register_login_and_me() -> anyhow::Result<()> {
    let app = helpers::spawn_app().await?;
    let (id, token) = app.signup("john").await?;

    let (status, me) = app.json(Method::GET, "/api/users/me/", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], id);
    assert_eq!(me["email"], "john@foodgram.localhost");
    assert!(me.get("password").is_none());

    let (status, _) = app.json(Method::GET, "/api/users/me/", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .json(
            Method::POST,
            "/api/auth/token/login/",
            None,
            Some(json!({"email": "john@foodgram.localhost", "password": "wrong_password"})),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Unable to log in with provided credentials");

    let (status, _) = app
        .json(
            Method::POST,
            "/api/users/",
            None,
            Some(json!({
                "email": "john@foodgram.localhost",
                "username": "other",
                "first_name": "John",
                "last_name": "Doe",
                "password": "my_password",
            })),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, page) = app.json(Method::GET, "/api/users/", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 1);

    let (status, _) = app.json(Method::GET, "/api/users/9999/", None, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn subscriptions_include_recipe_previews() -> anyhow::Result<()> {
    let app = helpers::spawn_app().await?;
    let (john, john_token) = app.signup("john").await?;
    let (albert, albert_token) = app.signup("albert").await?;

    for name in ["pancakes", "soup", "steak"] {
        app.create_recipe(&albert_token, name, &[1]).await?;
    }

    let (status, author) = app
        .json(
            Method::POST,
            &format!("/api/users/{albert}/subscribe/?recipes_limit=1"),
            Some(&john_token),
            None,
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(author["is_subscribed"], true);
    assert_eq!(author["recipes_count"], 3);
    assert_eq!(author["recipes"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .json(
            Method::POST,
            &format!("/api/users/{john}/subscribe/"),
            Some(&john_token),
            None,
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, page) = app
        .json(
            Method::GET,
            "/api/users/subscriptions/?recipes_limit=2",
            Some(&john_token),
            None,
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["username"], "albert");
    assert_eq!(page["results"][0]["recipes"].as_array().unwrap().len(), 2);
    assert_eq!(page["results"][0]["recipes"][0]["name"], "steak");

    let (status, _) = app
        .json(
            Method::DELETE,
            &format!("/api/users/{albert}/subscribe/"),
            Some(&john_token),
            None,
        )
        .await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .json(
            Method::DELETE,
            &format!("/api/users/{albert}/subscribe/"),
            Some(&john_token),
            None,
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn avatar_can_be_set_and_cleared() -> anyhow::Result<()> {
    let app = helpers::spawn_app().await?;
    let (_, token) = app.signup("john").await?;
    let avatar = "data:image/png;base64,iVBORw0KGgo=";

    let (status, body) = app
        .json(
            Method::PUT,
            "/api/users/me/avatar/",
            Some(&token),
            Some(json!({ "avatar": avatar })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["avatar"], avatar);

    let (_, me) = app.json(Method::GET, "/api/users/me/", Some(&token), None).await?;
    assert_eq!(me["avatar"], avatar);

    let (status, _) = app
        .json(Method::DELETE, "/api/users/me/avatar/", Some(&token), None)
        .await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, me) = app.json(Method::GET, "/api/users/me/", Some(&token), None).await?;
    assert!(me["avatar"].is_null());

    let (status, _) = app
        .json(
            Method::PUT,
            "/api/users/me/avatar/",
            None,
            Some(json!({ "avatar": avatar })),
        )
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn set_password_requires_current_password() -> anyhow::Result<()> {
    let app = helpers::spawn_app().await?;
    let (_, token) = app.signup("john").await?;

    let (status, body) = app
        .json(
            Method::POST,
            "/api/users/set_password/",
            Some(&token),
            Some(json!({"new_password": "my_new_password", "current_password": "wrong_password"})),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid password");

    let (status, _) = app
        .json(
            Method::POST,
            "/api/users/set_password/",
            Some(&token),
            Some(json!({"new_password": "my_new_password", "current_password": "my_password"})),
        )
        .await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app
        .json(
            Method::POST,
            "/api/auth/token/login/",
            None,
            Some(json!({"email": "john@foodgram.localhost", "password": "my_new_password"})),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["auth_token"].is_string());

    Ok(())
}
