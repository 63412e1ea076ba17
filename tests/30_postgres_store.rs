// Runs against a real Postgres only when TEST_DATABASE_URL is set.
// Each run gets its own schema, dropped at the end.

use anyhow::{Context, Result};
use uuid::Uuid;

use message_api::config::AppConfig;
use message_api::database::{
    DatabaseManager, MessageChanges, MessageStore, NewMessage, NewUser, PgMessageStore, StoreError, User,
};

async fn test_store() -> Result<Option<(PgMessageStore, String)>> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set; skipping Postgres store test");
        return Ok(None);
    };

    let mut config = AppConfig::default().database;
    config.url = Some(url);
    let schema = format!("test_{}", Uuid::new_v4().simple());

    let pool = DatabaseManager::connect(&config, Some(&schema))
        .await
        .context("failed to connect to test database")?;
    DatabaseManager::init_schema(&pool, Some(&schema)).await?;

    Ok(Some((PgMessageStore::new(pool), schema)))
}

async fn new_user(store: &PgMessageStore, username: &str) -> Result<User> {
    Ok(store
        .create_user(NewUser {
            username: username.into(),
            password: "mypassword".into(),
        })
        .await?)
}

fn new_message(title: &str, author: Uuid) -> NewMessage {
    NewMessage {
        title: title.into(),
        body: "mybody".into(),
        author,
    }
}

fn move_to(author: Uuid) -> MessageChanges {
    MessageChanges {
        author: Some(author),
        ..Default::default()
    }
}

#[tokio::test]
async fn postgres_store_keeps_author_lists_in_sync() -> Result<()> {
    let Some((store, schema)) = test_store().await? else {
        return Ok(());
    };

    let result = author_list_scenario(&store).await;
    DatabaseManager::drop_schema(store.pool(), &schema).await?;
    store.close().await;
    result
}

#[tokio::test]
async fn postgres_store_tolerates_vanished_authors() -> Result<()> {
    let Some((store, schema)) = test_store().await? else {
        return Ok(());
    };

    let result = vanished_author_scenario(&store).await;
    DatabaseManager::drop_schema(store.pool(), &schema).await?;
    store.close().await;
    result
}

#[tokio::test]
async fn postgres_store_handles_opposite_author_swaps() -> Result<()> {
    let Some((store, schema)) = test_store().await? else {
        return Ok(());
    };

    let result = opposite_swaps_scenario(&store).await;
    DatabaseManager::drop_schema(store.pool(), &schema).await?;
    store.close().await;
    result
}

async fn author_list_scenario(store: &PgMessageStore) -> Result<()> {
    let user = store
        .create_user(NewUser {
            username: "myuser".into(),
            password: "mypassword".into(),
        })
        .await?;
    assert!(user.messages.is_empty());

    // Create prepends
    let first = store
        .create_message(NewMessage {
            title: "mytitle".into(),
            body: "mybody".into(),
            author: user.id,
        })
        .await?;
    let second = store
        .create_message(NewMessage {
            title: "anothertitle".into(),
            body: "anotherbody".into(),
            author: user.id,
        })
        .await?;
    let author = store.find_user(user.id).await?.context("user missing")?;
    assert_eq!(author.messages, vec![second.id, first.id]);

    // Unknown author leaves no orphan
    let err = store
        .create_message(NewMessage {
            title: "orphan".into(),
            body: "nobody".into(),
            author: Uuid::new_v4(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::AuthorNotFound(_)));
    assert_eq!(store.list_messages().await?.len(), 2);

    // Partial update
    let updated = store
        .update_message(
            first.id,
            MessageChanges {
                title: Some("changed".into()),
                ..Default::default()
            },
        )
        .await?
        .context("update should find the message")?;
    assert_eq!(updated.title, "changed");
    assert_eq!(updated.body, "mybody");
    assert!(store
        .update_message(Uuid::new_v4(), MessageChanges::default())
        .await?
        .is_none());

    // Delete unlinks by id
    let deleted = store.delete_message(second.id).await?.context("delete should find the message")?;
    assert_eq!(deleted.id, second.id);
    assert!(store.find_message(second.id).await?.is_none());
    let author = store.find_user(user.id).await?.context("user missing")?;
    assert_eq!(author.messages, vec![first.id]);
    assert!(store.delete_message(second.id).await?.is_none());

    // Primitives are retry-safe
    assert!(store.link_message_to_author(first.id, user.id).await?);
    assert!(store.link_message_to_author(first.id, user.id).await?);
    assert!(store.unlink_message_from_author(second.id, user.id).await?);
    let author = store.find_user(user.id).await?.context("user missing")?;
    assert_eq!(author.messages, vec![first.id]);

    // Duplicate usernames map to a typed error
    let err = store
        .create_user(NewUser {
            username: "myuser".into(),
            password: "x".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::UsernameTaken(_)));

    // Empty update returns the stored row
    let unchanged = store
        .update_message(first.id, MessageChanges::default())
        .await?
        .context("update should find the message")?;
    assert_eq!(unchanged, updated);

    store.health_check().await?;
    Ok(())
}

async fn vanished_author_scenario(store: &PgMessageStore) -> Result<()> {
    let gone = new_user(store, "gone").await?;
    let other = new_user(store, "other").await?;
    let doomed = store.create_message(new_message("doomed", gone.id)).await?;
    let moved = store.create_message(new_message("moved", gone.id)).await?;

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(gone.id)
        .execute(store.pool())
        .await?;

    let deleted = store.delete_message(doomed.id).await?.context("delete should find the message")?;
    assert_eq!(deleted.id, doomed.id);
    assert!(store.find_message(doomed.id).await?.is_none());

    let updated = store
        .update_message(moved.id, move_to(other.id))
        .await?
        .context("update should find the message")?;
    assert_eq!(updated.author, other.id);
    let other = store.find_user(other.id).await?.context("user missing")?;
    assert_eq!(other.messages, vec![moved.id]);
    Ok(())
}

async fn opposite_swaps_scenario(store: &PgMessageStore) -> Result<()> {
    let left = new_user(store, "left").await?;
    let right = new_user(store, "right").await?;
    let a = store.create_message(new_message("a", left.id)).await?;
    let b = store.create_message(new_message("b", right.id)).await?;

    for round in 0..10 {
        let (to_a, to_b) = if round % 2 == 0 {
            (right.id, left.id)
        } else {
            (left.id, right.id)
        };
        let (moved_a, moved_b) = tokio::join!(
            store.update_message(a.id, move_to(to_a)),
            store.update_message(b.id, move_to(to_b)),
        );
        assert_eq!(moved_a?.context("message a missing")?.author, to_a);
        assert_eq!(moved_b?.context("message b missing")?.author, to_b);
    }

    // Ten swaps leave both messages where they started
    let left = store.find_user(left.id).await?.context("user missing")?;
    let right = store.find_user(right.id).await?.context("user missing")?;
    assert_eq!(left.messages, vec![a.id]);
    assert_eq!(right.messages, vec![b.id]);
    Ok(())
}
