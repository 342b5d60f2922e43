//! 领域模型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MessageStoreError, Result};

/// 参与者标识符的最大长度
const MAX_ID_LEN: usize = 64;

/// 消息实体
///
/// `id` 由存储层生成后不可变；`created_at` 创建时设置一次，
/// `updated_at` 在每次内容变更时刷新。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 创建消息命令
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
}

impl NewMessage {
    /// 在任何存储操作之前执行的显式校验
    ///
    /// 标识符只做格式校验，不做跨实体存在性校验（参与者身份由
    /// 上游网关断言）。自发自收（sender == receiver）不做限制。
    pub fn validate(&self) -> Result<()> {
        validate_participant_id("senderId", &self.sender_id)?;
        validate_participant_id("receiverId", &self.receiver_id)?;
        if self.content.trim().is_empty() {
            return Err(MessageStoreError::Validation(
                "content must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// 更新消息命令（部分更新：content 缺省时为 no-op）
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMessage {
    pub content: Option<String>,
}

/// 发往 Broker 的通知事件（只出不进，无需反序列化）
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    /// 通知的目标用户（消息接收方）
    pub user_id: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl NotificationEvent {
    /// 为新创建的消息构造接收方通知
    pub fn for_message(message: &Message) -> Self {
        Self {
            user_id: message.receiver_id.clone(),
            message: format!("New message received: {}", message.content),
            timestamp: Utc::now(),
        }
    }
}

fn validate_participant_id(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(MessageStoreError::Validation(format!(
            "{field} must not be empty"
        )));
    }
    if value.len() > MAX_ID_LEN {
        return Err(MessageStoreError::Validation(format!(
            "{field} exceeds {MAX_ID_LEN} characters"
        )));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(MessageStoreError::Validation(format!(
            "{field} contains invalid characters"
        )));
    }
    Ok(())
}
