//! 应用启动器 - 负责配置加载、服务装配和优雅停机

use anyhow::Result;
use tracing::info;

use crate::config::MessageStoreConfig;
use crate::service::wire;

pub struct ApplicationBootstrap;

impl ApplicationBootstrap {
    /// 运行应用的主入口点
    pub async fn run() -> Result<()> {
        let config = MessageStoreConfig::from_env();
        let context = wire::initialize(&config).await?;

        info!(
            durable_storage = context.health.durable_storage,
            broker_ready = context.health.broker_ready,
            "Message Store started"
        );

        // 服务以库形式被上层传输层消费；二进制入口只负责装配、
        // 就绪上报和停机信号
        tokio::signal::ctrl_c().await?;

        info!("shutdown signal received");
        info!("message store stopped");

        Ok(())
    }
}
