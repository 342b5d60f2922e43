//! 消息存储服务
//!
//! 提供消息的持久化 CRUD 能力，并在消息创建成功后向外部 Broker
//! 发布一条尽力而为（at-most-once）的通知事件。持久化是唯一的
//! 可靠数据源，通知失败不影响消息创建。

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod service;
