//! 分类数据模型

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{
    error::CoreError,
    validation::{message_of, parse_required_text, parse_text},
};

pub const NAME_REQUIRED: &str = "Nombre es requerido";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
}

/// 校验通过、待持久化的分类
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub name: String,
    pub description: String,
}

const NAME_MAX_CHARS: usize = 100;

/// 创建分类请求
#[derive(Debug, Default, Deserialize)]
pub struct CreateCategoryRequest {
    pub nombre: Option<Value>,
    pub descripcion: Option<Value>,
}

impl CreateCategoryRequest {
    /// 校验并转换成 `NewCategory`；失败时返回 `{"error": ...}`
    pub fn validated(self) -> Result<NewCategory, CoreError> {
        let name = match self.nombre.as_ref() {
            Some(value) => parse_required_text(value, NAME_MAX_CHARS).map_err(|e| {
                let message = match e.code.as_ref() {
                    "blank" => NAME_REQUIRED.to_string(),
                    _ => message_of(&e),
                };
                CoreError::BadRequest(message)
            })?,
            None => return Err(CoreError::BadRequest(NAME_REQUIRED.to_string())),
        };
        let description = match self.descripcion.as_ref() {
            Some(value) => parse_text(value).map_err(|e| CoreError::BadRequest(message_of(&e)))?,
            None => String::new(),
        };

        Ok(NewCategory { name, description })
    }
}
