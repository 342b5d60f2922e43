pub mod kafka_publisher;

pub use kafka_publisher::KafkaNotificationPublisher;
