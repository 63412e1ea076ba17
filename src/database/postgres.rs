use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::{Message, MessageChanges, NewMessage, NewUser, User};
use crate::database::store::{MessageStore, StoreError, StoreResult};

const MESSAGE_COLUMNS: &str = "id, title, body, author";
const USER_COLUMNS: &str = "id, username, password, messages";

/// Postgres unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// `MessageStore` over a Postgres pool. Multi-step writes run in one transaction.
#[derive(Clone)]
pub struct PgMessageStore {
    pool: PgPool,
}

impl PgMessageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

async fn link(conn: &mut PgConnection, message_id: Uuid, author: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE users SET messages = array_prepend($1::uuid, array_remove(messages, $1::uuid)) WHERE id = $2",
    )
    .bind(message_id)
    .bind(author)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

async fn unlink(conn: &mut PgConnection, message_id: Uuid, author: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET messages = array_remove(messages, $1::uuid) WHERE id = $2")
        .bind(message_id)
        .bind(author)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Lock the author row for the rest of the transaction
async fn lock_user(conn: &mut PgConnection, id: Uuid) -> Result<bool, sqlx::Error> {
    let found = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(found.is_some())
}

/// Lock several user rows in id order and return the ids that exist.
/// Concurrent author swaps in opposite directions always take their locks in the same order.
async fn lock_users(conn: &mut PgConnection, ids: &[Uuid]) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE id = ANY($1) ORDER BY id FOR UPDATE")
        .bind(ids)
        .fetch_all(conn)
        .await
}

#[async_trait]
impl MessageStore for PgMessageStore {
    async fn list_messages(&self) -> StoreResult<Vec<Message>> {
        let sql = format!("SELECT {} FROM messages", MESSAGE_COLUMNS);
        let messages = sqlx::query_as::<_, Message>(&sql).fetch_all(&self.pool).await?;
        debug!("Listed {} messages", messages.len());
        Ok(messages)
    }

    async fn find_message(&self, id: Uuid) -> StoreResult<Option<Message>> {
        let sql = format!("SELECT {} FROM messages WHERE id = $1", MESSAGE_COLUMNS);
        let message = sqlx::query_as::<_, Message>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(message)
    }

    async fn create_message(&self, new: NewMessage) -> StoreResult<Message> {
        let mut tx = self.pool.begin().await?;

        if !lock_user(&mut tx, new.author).await? {
            tx.rollback().await?;
            return Err(StoreError::AuthorNotFound(new.author));
        }

        let sql = format!(
            "INSERT INTO messages ({cols}) VALUES ($1, $2, $3, $4) RETURNING {cols}",
            cols = MESSAGE_COLUMNS
        );
        let message = sqlx::query_as::<_, Message>(&sql)
            .bind(Uuid::new_v4())
            .bind(&new.title)
            .bind(&new.body)
            .bind(new.author)
            .fetch_one(&mut *tx)
            .await?;

        link(&mut tx, message.id, message.author).await?;
        tx.commit().await?;

        debug!("Created message {} for author {}", message.id, message.author);
        Ok(message)
    }

    async fn update_message(&self, id: Uuid, changes: MessageChanges) -> StoreResult<Option<Message>> {
        let mut tx = self.pool.begin().await?;

        let sql = format!("SELECT {} FROM messages WHERE id = $1 FOR UPDATE", MESSAGE_COLUMNS);
        let Some(current) = sqlx::query_as::<_, Message>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        if changes.is_empty() {
            tx.rollback().await?;
            debug!("No changes for message {}", id);
            return Ok(Some(current));
        }

        if let Some(new_author) = changes.author.filter(|author| *author != current.author) {
            let locked = lock_users(&mut tx, &[current.author, new_author]).await?;
            if !locked.contains(&new_author) {
                tx.rollback().await?;
                return Err(StoreError::AuthorNotFound(new_author));
            }
            link(&mut tx, id, new_author).await?;
            if !unlink(&mut tx, id, current.author).await? {
                debug!("Previous author {} of message {} no longer exists", current.author, id);
            }
        }

        let sql = format!(
            "UPDATE messages SET title = COALESCE($2, title), body = COALESCE($3, body), author = COALESCE($4, author) \
             WHERE id = $1 RETURNING {}",
            MESSAGE_COLUMNS
        );
        let updated = sqlx::query_as::<_, Message>(&sql)
            .bind(id)
            .bind(changes.title)
            .bind(changes.body)
            .bind(changes.author)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        debug!("Updated message {}", id);
        Ok(Some(updated))
    }

    async fn delete_message(&self, id: Uuid) -> StoreResult<Option<Message>> {
        let mut tx = self.pool.begin().await?;

        let sql = format!("DELETE FROM messages WHERE id = $1 RETURNING {}", MESSAGE_COLUMNS);
        let Some(message) = sqlx::query_as::<_, Message>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        if !unlink(&mut tx, message.id, message.author).await? {
            debug!("Author {} of message {} no longer exists; nothing to unlink", message.author, id);
        }
        tx.commit().await?;

        debug!("Deleted message {}", id);
        Ok(Some(message))
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create_user(&self, new: NewUser) -> StoreResult<User> {
        let sql = format!(
            "INSERT INTO users (id, username, password, messages) VALUES ($1, $2, $3, '{{}}') RETURNING {}",
            USER_COLUMNS
        );
        let result = sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&new.username)
            .bind(&new.password)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                warn!("Username already taken: {}", new.username);
                Err(StoreError::UsernameTaken(new.username))
            }
            Err(other) => Err(other.into()),
        }
    }

    async fn link_message_to_author(&self, message_id: Uuid, author: Uuid) -> StoreResult<bool> {
        let mut conn = self.pool.acquire().await?;
        Ok(link(&mut conn, message_id, author).await?)
    }

    async fn unlink_message_from_author(&self, message_id: Uuid, author: Uuid) -> StoreResult<bool> {
        let mut conn = self.pool.acquire().await?;
        Ok(unlink(&mut conn, message_id, author).await?)
    }

    async fn health_check(&self) -> StoreResult<()> {
        DatabaseManager::health_check(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
