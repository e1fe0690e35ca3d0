//! 基础设施层：日志、数据库连接和存储实现

#[cfg(feature = "database")]
pub mod database;
pub mod logger;
pub mod repository;
