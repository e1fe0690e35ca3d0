//! 令牌请求模型

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::validation::FieldErrors;

#[derive(Debug, Default, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(
        required(message = "Este campo es requerido."),
        length(min = 1, message = "Este campo no puede estar en blanco.")
    )]
    pub username: Option<String>,
    #[validate(
        required(message = "Este campo es requerido."),
        length(min = 1, message = "Este campo no puede estar en blanco.")
    )]
    pub password: Option<String>,
}

impl TokenRequest {
    /// 返回 (用户名, 密码)
    pub fn validated(self) -> Result<(String, String), FieldErrors> {
        self.validate()?;
        Ok((
            self.username.unwrap_or_default(),
            self.password.unwrap_or_default(),
        ))
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(
        required(message = "Este campo es requerido."),
        length(min = 1, message = "Este campo no puede estar en blanco.")
    )]
    pub refresh: Option<String>,
}

impl RefreshRequest {
    pub fn validated(self) -> Result<String, FieldErrors> {
        self.validate()?;
        Ok(self.refresh.unwrap_or_default())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccessToken {
    pub access: String,
}
