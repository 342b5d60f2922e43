//! 服务配置
//!
//! 所有配置项来自环境变量，未设置时使用代码内默认值。

use std::env;

#[derive(Clone, Debug)]
pub struct MessageStoreConfig {
    /// PostgreSQL 连接串（未配置时回退到内存存储）
    pub postgres_url: Option<String>,
    pub postgres_max_connections: u32,
    /// Kafka 集群地址（未配置时不启用通知发布）
    pub kafka_bootstrap: Option<String>,
    /// 通知事件写入的 topic
    pub kafka_notify_topic: String,
    pub kafka_timeout_ms: u64,
    /// 生产者 acks 级别："1" 为非持久投递，"all" 为持久投递
    pub kafka_required_acks: String,
    /// 单次通知发布的截止时间，超时即放弃
    pub publish_timeout_ms: u64,
}

impl MessageStoreConfig {
    /// 从环境变量加载
    pub fn from_env() -> Self {
        let postgres_url = env::var("MESSAGE_POSTGRES_URL").ok();

        let postgres_max_connections = env::var("MESSAGE_POSTGRES_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let kafka_bootstrap = env::var("MESSAGE_KAFKA_BOOTSTRAP_SERVERS").ok();

        let kafka_notify_topic = env::var("MESSAGE_KAFKA_NOTIFY_TOPIC")
            .unwrap_or_else(|_| "message-notifications".to_string());

        let kafka_timeout_ms = env::var("MESSAGE_KAFKA_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(5000);

        let kafka_required_acks =
            env::var("MESSAGE_KAFKA_REQUIRED_ACKS").unwrap_or_else(|_| "1".to_string());

        let publish_timeout_ms = env::var("MESSAGE_PUBLISH_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(2000);

        Self {
            postgres_url,
            postgres_max_connections,
            kafka_bootstrap,
            kafka_notify_topic,
            kafka_timeout_ms,
            kafka_required_acks,
            publish_timeout_ms,
        }
    }
}

impl Default for MessageStoreConfig {
    fn default() -> Self {
        Self {
            postgres_url: None,
            postgres_max_connections: 10,
            kafka_bootstrap: None,
            kafka_notify_topic: "message-notifications".to_string(),
            kafka_timeout_ms: 5000,
            kafka_required_acks: "1".to_string(),
            publish_timeout_ms: 2000,
        }
    }
}
