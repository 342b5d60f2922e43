//! 消息领域服务
//!
//! 承载五个消息操作的业务规则：校验 → 持久化 → 尽力而为的通知。
//! 持久化成功是返回给调用方的唯一信号，通知链路的任何失败都在
//! 这里被记录并吞掉。

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::domain::model::{Message, NewMessage, NotificationEvent, UpdateMessage};
use crate::domain::repository::{MessageRepository, NotificationPublisher};
use crate::error::{MessageStoreError, Result};

pub struct MessageDomainService {
    repository: Arc<dyn MessageRepository>,
    /// 未配置 Broker 时为 None，创建消息时跳过通知
    publisher: Option<Arc<dyn NotificationPublisher>>,
    publish_timeout: Duration,
}

impl MessageDomainService {
    pub fn new(
        repository: Arc<dyn MessageRepository>,
        publisher: Option<Arc<dyn NotificationPublisher>>,
        publish_timeout: Duration,
    ) -> Self {
        Self {
            repository,
            publisher,
            publish_timeout,
        }
    }

    /// 创建消息
    ///
    /// 记录在本调用返回前已持久化完成；通知在持久化之后发出，
    /// 发布失败或超时不影响返回值。
    pub async fn create_message(&self, new_message: NewMessage) -> Result<Message> {
        new_message.validate()?;

        let now = Utc::now();
        let message = Message {
            id: Uuid::new_v4().to_string(),
            sender_id: new_message.sender_id,
            receiver_id: new_message.receiver_id,
            content: new_message.content,
            created_at: now,
            updated_at: now,
        };

        self.repository.insert(&message).await.inspect_err(|e| {
            error!(error = %e, message_id = %message.id, "Failed to create message");
        })?;

        self.notify_receiver(&message).await;

        Ok(message)
    }

    /// 查询全部消息（创建顺序）
    pub async fn list_messages(&self) -> Result<Vec<Message>> {
        self.repository.find_all().await.inspect_err(|e| {
            error!(error = %e, "Failed to list messages");
        })
    }

    /// 按 id 查询消息
    pub async fn get_message(&self, id: &str) -> Result<Message> {
        self.repository.find_by_id(id).await.inspect_err(|e| {
            if matches!(e, MessageStoreError::Storage(_)) {
                error!(error = %e, message_id = %id, "Failed to get message");
            }
        })
    }

    /// 更新消息内容（部分更新）
    ///
    /// content 缺省时为 no-op，原样返回已存储的记录，updated_at
    /// 不刷新；提供 content 时替换内容并刷新 updated_at。
    pub async fn update_message(&self, id: &str, update: UpdateMessage) -> Result<Message> {
        match update.content {
            None => self.repository.find_by_id(id).await,
            Some(content) => {
                if content.trim().is_empty() {
                    return Err(MessageStoreError::Validation(
                        "content must not be empty".to_string(),
                    ));
                }
                self.repository
                    .update_content(id, &content, Utc::now())
                    .await
                    .inspect_err(|e| {
                        if matches!(e, MessageStoreError::Storage(_)) {
                            error!(error = %e, message_id = %id, "Failed to update message");
                        }
                    })
            }
        }
    }

    /// 删除消息，返回被删记录
    pub async fn delete_message(&self, id: &str) -> Result<Message> {
        self.repository.delete(id).await.inspect_err(|e| {
            if matches!(e, MessageStoreError::Storage(_)) {
                error!(error = %e, message_id = %id, "Failed to delete message");
            }
        })
    }

    /// 向接收方发布通知事件（尽力而为，最多一次投递尝试）
    async fn notify_receiver(&self, message: &Message) {
        let Some(publisher) = &self.publisher else {
            debug!(message_id = %message.id, "Notification publisher not configured, skipping");
            return;
        };

        let event = NotificationEvent::for_message(message);
        match tokio::time::timeout(self.publish_timeout, publisher.publish(&event)).await {
            Ok(Ok(())) => {
                debug!(message_id = %message.id, user_id = %event.user_id, "Notification sent");
            }
            Ok(Err(e)) => {
                warn!(error = %e, message_id = %message.id, "Failed to send notification");
            }
            Err(_) => {
                warn!(
                    message_id = %message.id,
                    timeout_ms = self.publish_timeout.as_millis() as u64,
                    "Notification publish timed out"
                );
            }
        }
    }
}
