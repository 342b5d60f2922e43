use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

use crate::config::MessageStoreConfig;
use crate::domain::model::Message;
use crate::domain::repository::MessageRepository;
use crate::error::{MessageStoreError, Result};

/// 消息查询行结构（用于 SQL 查询结果映射）
#[derive(sqlx::FromRow)]
struct MessageRow {
    id: String,
    sender_id: String,
    receiver_id: String,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Message {
            id: row.id,
            sender_id: row.sender_id,
            receiver_id: row.receiver_id,
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL 消息仓储
pub struct PostgresMessageStore {
    pool: Pool<Postgres>,
}

impl PostgresMessageStore {
    /// 创建 PostgreSQL 消息仓储
    ///
    /// 未配置连接串时返回 `Ok(None)`，由装配层回退到内存存储。
    pub async fn new(config: &MessageStoreConfig) -> Result<Option<Self>> {
        let url = match &config.postgres_url {
            Some(url) => url,
            None => return Ok(None),
        };

        let pool = PgPoolOptions::new()
            .max_connections(config.postgres_max_connections)
            .connect(url)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;

        Ok(Some(store))
    }

    /// 初始化数据库表结构（如果不存在）
    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id TEXT PRIMARY KEY,
                sender_id TEXT NOT NULL,
                receiver_id TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TIMESTAMP WITH TIME ZONE NOT NULL,
                updated_at TIMESTAMP WITH TIME ZONE NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_messages_receiver_id
            ON messages(receiver_id)
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl MessageRepository for PostgresMessageStore {
    async fn insert(&self, message: &Message) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, sender_id, receiver_id, content, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&message.id)
        .bind(&message.sender_id)
        .bind(&message.receiver_id)
        .bind(&message.content)
        .bind(message.created_at)
        .bind(message.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Message>> {
        let rows: Vec<MessageRow> = sqlx::query_as(
            r#"
            SELECT id, sender_id, receiver_id, content, created_at, updated_at
            FROM messages
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Message::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Message> {
        let row: Option<MessageRow> = sqlx::query_as(
            r#"
            SELECT id, sender_id, receiver_id, content, created_at, updated_at
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Message::from)
            .ok_or_else(|| MessageStoreError::NotFound(id.to_string()))
    }

    async fn update_content(
        &self,
        id: &str,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Message> {
        let row: Option<MessageRow> = sqlx::query_as(
            r#"
            UPDATE messages
            SET content = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, sender_id, receiver_id, content, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(content)
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Message::from)
            .ok_or_else(|| MessageStoreError::NotFound(id.to_string()))
    }

    async fn delete(&self, id: &str) -> Result<Message> {
        let row: Option<MessageRow> = sqlx::query_as(
            r#"
            DELETE FROM messages
            WHERE id = $1
            RETURNING id, sender_id, receiver_id, content, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Message::from)
            .ok_or_else(|| MessageStoreError::NotFound(id.to_string()))
    }
}
