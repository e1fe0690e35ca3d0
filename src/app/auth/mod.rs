//! 令牌签发

pub mod handler;
pub mod model;
