use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::model::Message;
use crate::domain::repository::MessageRepository;
use crate::error::{MessageStoreError, Result};

/// 内存消息仓储
///
/// 用于未配置 PostgreSQL 时的回退实现和单元测试。Vec 保持插入
/// 顺序，使 find_all 的创建顺序排序天然成立。
#[derive(Default)]
pub struct InMemoryMessageStore {
    inner: Arc<RwLock<Vec<Message>>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageStore {
    async fn insert(&self, message: &Message) -> Result<()> {
        let mut guard = self.inner.write().await;
        guard.push(message.clone());
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Message>> {
        let guard = self.inner.read().await;
        Ok(guard.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Message> {
        let guard = self.inner.read().await;
        guard
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| MessageStoreError::NotFound(id.to_string()))
    }

    async fn update_content(
        &self,
        id: &str,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Message> {
        let mut guard = self.inner.write().await;
        let message = guard
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| MessageStoreError::NotFound(id.to_string()))?;
        message.content = content.to_string();
        message.updated_at = updated_at;
        Ok(message.clone())
    }

    async fn delete(&self, id: &str) -> Result<Message> {
        let mut guard = self.inner.write().await;
        let position = guard
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| MessageStoreError::NotFound(id.to_string()))?;
        Ok(guard.remove(position))
    }
}
