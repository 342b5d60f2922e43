//! 仓储接口定义（Port）

use async_trait::async_trait;

use crate::domain::model::{Message, NotificationEvent};
use crate::error::Result;

/// 消息仓储接口
///
/// 并发控制委托给底层存储（PostgreSQL 行级原子性 / 内存实现的
/// RwLock），仓储之上不再加应用级锁。
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// 持久化一条已构造好的消息记录
    async fn insert(&self, message: &Message) -> Result<()>;

    /// 按创建顺序返回全部消息（稳定排序，无分页）
    async fn find_all(&self) -> Result<Vec<Message>>;

    /// 按 id 查找，不存在时返回 `NotFound`
    async fn find_by_id(&self, id: &str) -> Result<Message>;

    /// 原子地替换内容并刷新 updated_at，返回更新后的记录
    async fn update_content(
        &self,
        id: &str,
        content: &str,
        updated_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<Message>;

    /// 删除并返回被删记录的最终状态
    async fn delete(&self, id: &str) -> Result<Message>;
}

/// 通知发布接口
///
/// 契约：每次调用最多一次投递尝试，不重试、不落盘失败事件。
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    async fn publish(&self, event: &NotificationEvent) -> Result<()>;
}
