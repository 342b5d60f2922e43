//! Wire 风格的依赖注入模块
//!
//! 按依赖顺序构建仓储、发布器和领域服务。PostgreSQL 与 Kafka
//! 均为可选依赖：前者缺失时回退到内存存储，后者缺失或初始化
//! 失败时禁用通知发布，服务本身照常启动。

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use crate::config::MessageStoreConfig;
use crate::domain::repository::{MessageRepository, NotificationPublisher};
use crate::domain::service::MessageDomainService;
use crate::infrastructure::messaging::KafkaNotificationPublisher;
use crate::infrastructure::persistence::{InMemoryMessageStore, PostgresMessageStore};

/// 就绪状态（通过健康检查暴露，而不是在 publish 内部隐式重连）
#[derive(Clone, Copy, Debug)]
pub struct HealthState {
    /// 是否连接到持久化存储（false 表示运行在内存回退上）
    pub durable_storage: bool,
    /// Broker 生产者是否已建立
    pub broker_ready: bool,
}

/// 应用上下文 - 包含所有已初始化的服务
pub struct ApplicationContext {
    pub service: Arc<MessageDomainService>,
    pub health: HealthState,
}

/// 构建应用上下文
pub async fn initialize(config: &MessageStoreConfig) -> Result<ApplicationContext> {
    // 1. 构建消息仓储（PostgreSQL，失败或未配置时回退内存存储）
    let (repository, durable_storage) = build_repository(config).await;

    // 2. 构建通知发布器（可选）
    let publisher = build_publisher(config);
    let broker_ready = publisher.is_some();

    // 3. 构建领域服务
    let service = Arc::new(MessageDomainService::new(
        repository,
        publisher,
        Duration::from_millis(config.publish_timeout_ms),
    ));

    Ok(ApplicationContext {
        service,
        health: HealthState {
            durable_storage,
            broker_ready,
        },
    })
}

async fn build_repository(
    config: &MessageStoreConfig,
) -> (Arc<dyn MessageRepository>, bool) {
    match PostgresMessageStore::new(config).await {
        Ok(Some(store)) => {
            info!("Connected to PostgreSQL");
            (Arc::new(store), true)
        }
        Ok(None) => {
            warn!("MESSAGE_POSTGRES_URL not set, using in-memory message store");
            (Arc::new(InMemoryMessageStore::new()), false)
        }
        Err(err) => {
            warn!(error = %err, "Failed to connect to PostgreSQL, using in-memory message store");
            (Arc::new(InMemoryMessageStore::new()), false)
        }
    }
}

fn build_publisher(config: &MessageStoreConfig) -> Option<Arc<dyn NotificationPublisher>> {
    let bootstrap = config.kafka_bootstrap.as_ref()?;

    match KafkaNotificationPublisher::new(bootstrap, config) {
        Ok(publisher) => {
            info!(topic = %config.kafka_notify_topic, "Kafka notification publisher created");
            Some(Arc::new(publisher))
        }
        Err(err) => {
            // 启动时的 Broker 故障不致命，服务在无通知模式下运行
            warn!(error = %err, "Failed to create Kafka producer, notifications disabled");
            None
        }
    }
}
