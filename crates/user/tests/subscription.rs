use foodgram_shared::{Error, PageArgs};
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn subscribe_and_list() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = helpers::command(state.clone());
    let ids = helpers::create_users(&cmd, ["john", "albert", "zoe"]).await?;

    cmd.subscribe(ids[0], ids[1]).await?;
    cmd.subscribe(ids[0], ids[2]).await?;

    let page = foodgram_user::subscriptions(&state.read_db, ids[0], PageArgs::default()).await?;
    assert_eq!(page.count, 2);
    assert!(page.results.iter().all(|u| u.is_subscribed));

    let albert = foodgram_user::find_view(&state.read_db, ids[1], Some(ids[0]))
        .await?
        .unwrap();
    assert!(albert.is_subscribed);

    let john = foodgram_user::find_view(&state.read_db, ids[0], Some(ids[1]))
        .await?
        .unwrap();
    assert!(!john.is_subscribed);

    Ok(())
}

#[tokio::test]
async fn rejects_self_and_duplicate_subscriptions() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = helpers::command(state);
    let ids = helpers::create_users(&cmd, ["john", "albert"]).await?;

    assert!(matches!(
        cmd.subscribe(ids[0], ids[0]).await,
        Err(Error::User(_))
    ));

    cmd.subscribe(ids[0], ids[1]).await?;
    assert!(matches!(
        cmd.subscribe(ids[0], ids[1]).await,
        Err(Error::User(_))
    ));

    assert!(matches!(
        cmd.subscribe(ids[0], 9999).await,
        Err(Error::NotFound(_))
    ));

    Ok(())
}

#[tokio::test]
async fn unsubscribe_requires_existing_subscription() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = helpers::command(state);
    let ids = helpers::create_users(&cmd, ["john", "albert"]).await?;

    assert!(matches!(
        cmd.unsubscribe(ids[0], ids[1]).await,
        Err(Error::User(_))
    ));

    cmd.subscribe(ids[0], ids[1]).await?;
    cmd.unsubscribe(ids[0], ids[1]).await?;

    Ok(())
}
