//! 统一异常处理模块

use thiserror::Error;

/// 消息存储服务错误类型
///
/// 四类错误对应不同的传播策略：`Validation` 和 `NotFound` 属于
/// 调用方错误；`Storage` 属于基础设施错误；`Publish` 只在通知
/// 链路内部出现，创建消息的调用方永远看不到它。
#[derive(Debug, Error)]
pub enum MessageStoreError {
    /// 输入校验失败（标识符格式错误、必填文本为空）
    #[error("Validation error: {0}")]
    Validation(String),

    /// 消息未找到
    #[error("Message not found: {0}")]
    NotFound(String),

    /// 持久化层错误
    #[error("Storage error: {0}")]
    Storage(String),

    /// Broker 发布错误（内部记录日志后吞掉，不向上传播）
    #[error("Publish error: {0}")]
    Publish(String),
}

/// 消息存储服务结果类型
pub type Result<T> = std::result::Result<T, MessageStoreError>;

impl From<sqlx::Error> for MessageStoreError {
    fn from(err: sqlx::Error) -> Self {
        MessageStoreError::Storage(err.to_string())
    }
}
