//! 核心层：错误、响应、认证、校验和中间件

pub mod auth;
pub mod error;
pub mod middleware;
pub mod response;
pub mod validation;
