//! Kafka 通知发布器
//!
//! 生产者在进程启动时创建一次并长期持有；每次 publish 只做一次
//! 投递尝试，失败不重试。

use std::time::Duration;

use async_trait::async_trait;
use rdkafka::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use serde_json::to_vec;

use crate::config::MessageStoreConfig;
use crate::domain::model::NotificationEvent;
use crate::domain::repository::NotificationPublisher;
use crate::error::{MessageStoreError, Result};

pub struct KafkaNotificationPublisher {
    producer: FutureProducer,
    topic: String,
    send_timeout: Duration,
}

impl KafkaNotificationPublisher {
    /// 创建 Kafka 通知发布器
    ///
    /// `request.required.acks` 对应投递持久性级别（"1" 非持久，
    /// "all" 持久），默认与源队列的非持久声明一致。
    pub fn new(bootstrap_servers: &str, config: &MessageStoreConfig) -> Result<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", bootstrap_servers)
            .set("message.timeout.ms", config.kafka_timeout_ms.to_string())
            .set("request.required.acks", &config.kafka_required_acks)
            .create()
            .map_err(|e| {
                MessageStoreError::Publish(format!("failed to create Kafka producer: {e}"))
            })?;

        Ok(Self {
            producer,
            topic: config.kafka_notify_topic.clone(),
            send_timeout: Duration::from_millis(config.kafka_timeout_ms),
        })
    }
}

#[async_trait]
impl NotificationPublisher for KafkaNotificationPublisher {
    async fn publish(&self, event: &NotificationEvent) -> Result<()> {
        let payload = to_vec(event)
            .map_err(|e| MessageStoreError::Publish(format!("failed to encode event: {e}")))?;

        // 按目标用户分区，同一接收方的通知保持分区内有序
        let record = FutureRecord::to(&self.topic)
            .payload(&payload)
            .key(&event.user_id);

        self.producer
            .send(record, self.send_timeout)
            .await
            .map_err(|(err, _)| {
                MessageStoreError::Publish(format!("failed to publish notification: {err}"))
            })?;

        Ok(())
    }
}
