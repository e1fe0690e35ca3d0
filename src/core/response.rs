//! 核心响应处理模块

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{ser::SerializeMap, Serialize, Serializer};

/// 创建成功的响应：`{"mensaje": ..., "<clave>": recurso}`，状态码 201
pub struct Created<T> {
    pub mensaje: &'static str,
    pub key: &'static str,
    pub data: T,
}

impl<T> Created<T> {
    pub fn new(mensaje: &'static str, key: &'static str, data: T) -> Self {
        Self { mensaje, key, data }
    }
}

impl<T: Serialize> Serialize for Created<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("mensaje", self.mensaje)?;
        map.serialize_entry(self.key, &self.data)?;
        map.end()
    }
}

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self)).into_response()
    }
}
