use std::collections::HashSet;

use foodgram_recipe::{ShortLinkPolicy, short_link};
use foodgram_shared::Error;
use temp_dir::TempDir;

mod helpers;

use helpers::Scripted;

#[tokio::test]
async fn created_recipe_resolves_through_its_short_link() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = helpers::command(state.clone());
    let ids = helpers::create_users(&state, ["john"]).await?;

    let recipe_id = cmd.create(ids[0], helpers::create_input("pancakes")).await?;
    let token = foodgram_recipe::find_short_link(&state.read_db, recipe_id)
        .await?
        .unwrap();

    assert_eq!(token.len(), 8);
    assert!(token.bytes().all(|b| short_link::ALPHABET.contains(&b)));
    assert_eq!(short_link::resolve(&state.read_db, &token).await?, recipe_id);

    Ok(())
}

#[tokio::test]
async fn unknown_token_is_not_found() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;

    let err = short_link::resolve(&state.read_db, "doesnotexist")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound("recipe")));

    Ok(())
}

#[tokio::test]
async fn collision_draws_a_new_token() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = helpers::command(state.clone());
    let ids = helpers::create_users(&state, ["john"]).await?;

    let mut source = Scripted::new(&["aB3dE7gH", "aB3dE7gH", "zQ1wX9mN"]);
    let first = cmd
        .create_with(ids[0], helpers::create_input("pancakes"), &mut source)
        .await?;
    let second = cmd
        .create_with(ids[0], helpers::create_input("waffles"), &mut source)
        .await?;

    assert_eq!(source.drawn(), 3);
    assert_eq!(
        foodgram_recipe::find_short_link(&state.read_db, first).await?,
        Some("aB3dE7gH".to_owned())
    );
    assert_eq!(
        foodgram_recipe::find_short_link(&state.read_db, second).await?,
        Some("zQ1wX9mN".to_owned())
    );
    assert_eq!(short_link::resolve(&state.read_db, "aB3dE7gH").await?, first);
    assert_eq!(short_link::resolve(&state.read_db, "zQ1wX9mN").await?, second);

    Ok(())
}

#[tokio::test]
async fn exhausted_attempts_are_unavailable() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = helpers::command_with(
        state.clone(),
        ShortLinkPolicy {
            length: 8,
            max_attempts: 3,
            insert_retries: 3,
        },
    );
    let ids = helpers::create_users(&state, ["john"]).await?;

    cmd.create_with(
        ids[0],
        helpers::create_input("pancakes"),
        &mut Scripted::new(&["aB3dE7gH"]),
    )
    .await?;

    let mut source = Scripted::new(&["aB3dE7gH"]);
    let err = cmd
        .create_with(ids[0], helpers::create_input("waffles"), &mut source)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Unavailable(_)));
    assert_eq!(source.drawn(), 3);

    let page = foodgram_recipe::filter(&state.read_db, &Default::default(), None).await?;
    assert_eq!(page.count, 1);

    Ok(())
}

#[tokio::test]
async fn writers_on_separate_connections_racing_for_a_token() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let other = helpers::connect_state(dir.child("db.sqlite3")).await?;
    let ids = helpers::create_users(&state, ["john", "jane"]).await?;
    let john = helpers::command(state.clone());
    let jane = helpers::command(other);

    for round in 0..10 {
        let contested = format!("RACEtk{round:02}");
        let left_fresh = format!("LEFTtk{round:02}");
        let right_fresh = format!("RGHTtk{round:02}");
        let mut left = Scripted::new(&[contested.as_str(), left_fresh.as_str()]);
        let mut right = Scripted::new(&[contested.as_str(), right_fresh.as_str()]);

        let (first, second) = tokio::join!(
            john.create_with(ids[0], helpers::create_input("pancakes"), &mut left),
            jane.create_with(ids[1], helpers::create_input("waffles"), &mut right),
        );
        let (first, second) = (first?, second?);

        let links = [
            foodgram_recipe::find_short_link(&state.read_db, first).await?,
            foodgram_recipe::find_short_link(&state.read_db, second).await?,
        ];
        assert_ne!(links[0], links[1]);
        assert!(links.contains(&Some(contested.clone())));
        assert_eq!(left.drawn() + right.drawn(), 3);
    }

    let page = foodgram_recipe::filter(&state.read_db, &Default::default(), None).await?;
    assert_eq!(page.count, 20);

    Ok(())
}

#[tokio::test]
async fn out_of_range_policy_is_rejected() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;

    let err = foodgram_recipe::Command::new(
        state,
        ShortLinkPolicy {
            length: 63,
            ..Default::default()
        },
    )
    .err()
    .unwrap();
    assert!(matches!(err, Error::User(_)));

    Ok(())
}

#[tokio::test]
async fn duplicate_insert_is_classified_as_conflict() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = helpers::command(state.clone());
    let ids = helpers::create_users(&state, ["john"]).await?;

    cmd.create_with(
        ids[0],
        helpers::create_input("pancakes"),
        &mut Scripted::new(&["aB3dE7gH"]),
    )
    .await?;

    let err = sqlx::query(
        "INSERT INTO recipe (author_id, name, image, text, cooking_time, short_link, created_at)
         VALUES (?, 'copy', 'img', 'text', 5, 'aB3dE7gH', 0)",
    )
    .bind(ids[0])
    .execute(&state.write_db)
    .await
    .unwrap_err();
    assert!(short_link::is_conflict(&err));

    let err = sqlx::query("INSERT INTO tag (name, slug) VALUES ('Other', 'breakfast')")
        .execute(&state.write_db)
        .await
        .unwrap_err();
    assert!(!short_link::is_conflict(&err));

    Ok(())
}

#[tokio::test]
async fn concurrent_creates_get_distinct_tokens() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = helpers::command(state.clone());
    let ids = helpers::create_users(&state, ["john"]).await?;

    let creates = (0..20).map(|i| {
        let cmd = cmd.clone();
        let author = ids[0];
        async move {
            cmd.create(author, helpers::create_input(&format!("recipe {i}")))
                .await
        }
    });

    let mut tokens = HashSet::new();
    for id in futures::future::join_all(creates).await {
        let id = id?;
        let token = foodgram_recipe::find_short_link(&state.read_db, id)
            .await?
            .unwrap();
        assert_eq!(short_link::resolve(&state.read_db, &token).await?, id);
        tokens.insert(token);
    }

    assert_eq!(tokens.len(), 20);

    Ok(())
}
