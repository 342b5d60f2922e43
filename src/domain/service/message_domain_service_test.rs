//! 消息领域服务行为测试

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::model::{NewMessage, NotificationEvent, UpdateMessage};
use crate::domain::repository::NotificationPublisher;
use crate::domain::service::MessageDomainService;
use crate::error::{MessageStoreError, Result};
use crate::infrastructure::persistence::InMemoryMessageStore;

/// 记录型发布器测试替身：收集每一个发出的事件
#[derive(Default)]
struct RecordingPublisher {
    events: Mutex<Vec<NotificationEvent>>,
}

impl RecordingPublisher {
    fn recorded(&self) -> Vec<NotificationEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationPublisher for RecordingPublisher {
    async fn publish(&self, event: &NotificationEvent) -> Result<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// 故障型发布器测试替身：模拟 Broker 不可达
struct FailingPublisher;

#[async_trait]
impl NotificationPublisher for FailingPublisher {
    async fn publish(&self, _event: &NotificationEvent) -> Result<()> {
        Err(MessageStoreError::Publish("broker unreachable".to_string()))
    }
}

/// 挂起型发布器测试替身：模拟响应极慢的 Broker
struct HangingPublisher;

#[async_trait]
impl NotificationPublisher for HangingPublisher {
    async fn publish(&self, _event: &NotificationEvent) -> Result<()> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(())
    }
}

/// 全量故障仓储测试替身：模拟持久化层不可用
struct BrokenMessageStore;

#[async_trait]
impl crate::domain::repository::MessageRepository for BrokenMessageStore {
    async fn insert(&self, _message: &crate::domain::model::Message) -> Result<()> {
        Err(MessageStoreError::Storage("connection refused".to_string()))
    }

    async fn find_all(&self) -> Result<Vec<crate::domain::model::Message>> {
        Err(MessageStoreError::Storage("connection refused".to_string()))
    }

    async fn find_by_id(&self, _id: &str) -> Result<crate::domain::model::Message> {
        Err(MessageStoreError::Storage("connection refused".to_string()))
    }

    async fn update_content(
        &self,
        _id: &str,
        _content: &str,
        _updated_at: chrono::DateTime<Utc>,
    ) -> Result<crate::domain::model::Message> {
        Err(MessageStoreError::Storage("connection refused".to_string()))
    }

    async fn delete(&self, _id: &str) -> Result<crate::domain::model::Message> {
        Err(MessageStoreError::Storage("connection refused".to_string()))
    }
}

fn service_with(publisher: Option<Arc<dyn NotificationPublisher>>) -> MessageDomainService {
    MessageDomainService::new(
        Arc::new(InMemoryMessageStore::new()),
        publisher,
        Duration::from_millis(500),
    )
}

fn new_message(sender: &str, receiver: &str, content: &str) -> NewMessage {
    NewMessage {
        sender_id: sender.to_string(),
        receiver_id: receiver.to_string(),
        content: content.to_string(),
    }
}

/// 测试：创建消息返回生成的 id 且 created_at == updated_at
#[tokio::test]
async fn test_create_generates_id_and_timestamps() {
    let service = service_with(None);

    let message = service
        .create_message(new_message("u1", "u2", "hi"))
        .await
        .unwrap();

    assert!(!message.id.is_empty());
    assert_eq!(message.sender_id, "u1");
    assert_eq!(message.receiver_id, "u2");
    assert_eq!(message.content, "hi");
    assert_eq!(message.created_at, message.updated_at);
}

/// 测试：创建后按 id 查询应返回相同的记录
#[tokio::test]
async fn test_find_by_id_returns_created_message() {
    let service = service_with(None);

    let created = service
        .create_message(new_message("u1", "u2", "hi"))
        .await
        .unwrap();
    let fetched = service.get_message(&created.id).await.unwrap();

    assert_eq!(fetched, created);
}

/// 测试：list 按创建顺序稳定返回
#[tokio::test]
async fn test_list_messages_in_creation_order() {
    let service = service_with(None);

    let first = service
        .create_message(new_message("u1", "u2", "first"))
        .await
        .unwrap();
    let second = service
        .create_message(new_message("u2", "u1", "second"))
        .await
        .unwrap();

    let all = service.list_messages().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, first.id);
    assert_eq!(all[1].id, second.id);
}

/// 测试：更新替换内容并刷新 updated_at
#[tokio::test]
async fn test_update_replaces_content_and_refreshes_updated_at() {
    let service = service_with(None);

    let created = service
        .create_message(new_message("u1", "u2", "old text"))
        .await
        .unwrap();

    let updated = service
        .update_message(
            &created.id,
            UpdateMessage {
                content: Some("new text".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.content, "new text");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.created_at);
}

/// 测试：缺省 content 的更新是 no-op，记录原样返回
#[tokio::test]
async fn test_update_without_content_is_noop() {
    let service = service_with(None);

    let created = service
        .create_message(new_message("u1", "u2", "hi"))
        .await
        .unwrap();

    let result = service
        .update_message(&created.id, UpdateMessage::default())
        .await
        .unwrap();

    assert_eq!(result, created);
}

/// 测试：更新为空内容应被拒绝
#[tokio::test]
async fn test_update_with_empty_content_is_rejected() {
    let service = service_with(None);

    let created = service
        .create_message(new_message("u1", "u2", "hi"))
        .await
        .unwrap();

    let result = service
        .update_message(
            &created.id,
            UpdateMessage {
                content: Some("  ".to_string()),
            },
        )
        .await;

    assert!(matches!(result, Err(MessageStoreError::Validation(_))));
}

/// 测试：更新不存在的消息返回 NotFound
#[tokio::test]
async fn test_update_missing_message_is_not_found() {
    let service = service_with(None);

    let result = service
        .update_message(
            "missing",
            UpdateMessage {
                content: Some("text".to_string()),
            },
        )
        .await;

    assert!(matches!(result, Err(MessageStoreError::NotFound(_))));
}

/// 测试：删除返回被删记录，随后查询返回 NotFound
#[tokio::test]
async fn test_delete_then_find_is_not_found() {
    let service = service_with(None);

    let created = service
        .create_message(new_message("u1", "u2", "hi"))
        .await
        .unwrap();

    let deleted = service.delete_message(&created.id).await.unwrap();
    assert_eq!(deleted, created);

    let result = service.get_message(&created.id).await;
    assert!(matches!(result, Err(MessageStoreError::NotFound(_))));

    let result = service.delete_message(&created.id).await;
    assert!(matches!(result, Err(MessageStoreError::NotFound(_))));
}

/// 测试：非法创建既不持久化也不发布
#[tokio::test]
async fn test_invalid_create_persists_nothing_and_publishes_nothing() {
    let publisher = Arc::new(RecordingPublisher::default());
    let service = service_with(Some(publisher.clone()));

    let result = service.create_message(new_message("u1", "u2", "")).await;
    assert!(matches!(result, Err(MessageStoreError::Validation(_))));

    let result = service.create_message(new_message("", "u2", "hi")).await;
    assert!(matches!(result, Err(MessageStoreError::Validation(_))));

    assert!(service.list_messages().await.unwrap().is_empty());
    assert!(publisher.recorded().is_empty());
}

/// 测试：挂起的 Broker 被发布截止时间截断，不拖住消息创建
#[tokio::test]
async fn test_hanging_broker_does_not_stall_create() {
    let publish_timeout = Duration::from_millis(50);
    let service = MessageDomainService::new(
        Arc::new(InMemoryMessageStore::new()),
        Some(Arc::new(HangingPublisher)),
        publish_timeout,
    );

    let started = std::time::Instant::now();
    let created = service
        .create_message(new_message("u1", "u2", "hi"))
        .await
        .unwrap();

    // 创建耗时受发布截止时间约束，远小于 Broker 的挂起时长
    assert!(
        started.elapsed() < Duration::from_secs(5),
        "create should not wait for a hanging broker"
    );

    let fetched = service.get_message(&created.id).await.unwrap();
    assert_eq!(fetched, created);
}

/// 测试：持久化层故障以 Storage 错误穿透每个操作
#[tokio::test]
async fn test_storage_failure_surfaces_as_storage_error() {
    let service = MessageDomainService::new(
        Arc::new(BrokenMessageStore),
        None,
        Duration::from_millis(500),
    );

    assert!(matches!(
        service.create_message(new_message("u1", "u2", "hi")).await,
        Err(MessageStoreError::Storage(_))
    ));
    assert!(matches!(
        service.list_messages().await,
        Err(MessageStoreError::Storage(_))
    ));
    assert!(matches!(
        service.get_message("m1").await,
        Err(MessageStoreError::Storage(_))
    ));
    assert!(matches!(
        service
            .update_message(
                "m1",
                UpdateMessage {
                    content: Some("new".to_string()),
                },
            )
            .await,
        Err(MessageStoreError::Storage(_))
    ));
    assert!(matches!(
        service.delete_message("m1").await,
        Err(MessageStoreError::Storage(_))
    ));
}

/// 测试：Broker 故障不影响创建的返回值和持久化结果
#[tokio::test]
async fn test_broker_failure_does_not_affect_create() {
    let service = service_with(Some(Arc::new(FailingPublisher)));

    let created = service
        .create_message(new_message("u1", "u2", "hi"))
        .await
        .unwrap();

    let fetched = service.get_message(&created.id).await.unwrap();
    assert_eq!(fetched, created);
}

/// 测试：通知事件面向接收方，载荷与约定格式一致
#[tokio::test]
async fn test_notification_event_targets_receiver() {
    let publisher = Arc::new(RecordingPublisher::default());
    let service = service_with(Some(publisher.clone()));

    let before = Utc::now();
    service
        .create_message(new_message("u1", "u2", "hi"))
        .await
        .unwrap();
    let after = Utc::now();

    let events = publisher.recorded();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].user_id, "u2");
    assert_eq!(events[0].message, "New message received: hi");
    assert!(events[0].timestamp >= before && events[0].timestamp <= after);

    // 每次创建恰好一次投递尝试
    service
        .create_message(new_message("u2", "u1", "reply"))
        .await
        .unwrap();
    assert_eq!(publisher.recorded().len(), 2);
}
