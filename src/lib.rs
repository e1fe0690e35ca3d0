//! # Comida al Paso
//!
//! 小吃摊库存管理 REST 后端：分类和商品的创建与查询，写操作使用 JWT 认证，读操作公开。
//!
//! - `app`：路由表、状态和各资源的处理器
//! - `core`：错误、响应、认证、校验和中间件
//! - `infrastructure`：日志、数据库连接和存储实现
//! - `config`：启动时加载一次的只读配置

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use app::{build_app, create_routes, AppState};
pub use config::Config;
