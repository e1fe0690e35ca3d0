//! 商品数据模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::validation::{parse_price, parse_required_text, parse_stock, FieldErrors};

/// 商品列表项：分类名和分类描述来自所属分类
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct ProductListing {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "precio", with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i32,
    #[serde(rename = "descripcion")]
    pub description: String,
}

/// 创建成功时返回的商品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedProduct {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "precio", with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i32,
}

impl From<ProductListing> for CreatedProduct {
    fn from(listing: ProductListing) -> Self {
        Self {
            name: listing.name,
            category: listing.category,
            price: listing.price,
            stock: listing.stock,
        }
    }
}

/// 待持久化的商品，分类已经解析为 id
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub category_id: i64,
    pub price: Decimal,
    pub stock: i32,
}

/// 校验通过的创建请求，分类仍是名字
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub category_name: String,
    pub price: Decimal,
    pub stock: i32,
}

const PRODUCT_NAME_MAX_CHARS: usize = 200;
const CATEGORY_NAME_MAX_CHARS: usize = 100;

/// 创建商品请求；字段保持原始 JSON 值，在 `validated` 里逐个解析
#[derive(Debug, Default, Deserialize)]
pub struct CreateProductRequest {
    pub nombre_producto: Option<Value>,
    pub nombre_categoria: Option<Value>,
    pub precio: Option<Value>,
    pub stock: Option<Value>,
}

impl CreateProductRequest {
    /// 解析所有字段，收集每个字段的错误
    pub fn validated(self) -> Result<ProductDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = errors.required("nombre_producto", self.nombre_producto.as_ref(), |v| {
            parse_required_text(v, PRODUCT_NAME_MAX_CHARS)
        });
        let category_name = errors.required("nombre_categoria", self.nombre_categoria.as_ref(), |v| {
            parse_required_text(v, CATEGORY_NAME_MAX_CHARS)
        });
        let price = errors.required("precio", self.precio.as_ref(), parse_price);
        let stock = match self.stock.as_ref() {
            Some(value) => errors.parsed("stock", value, parse_stock),
            None => Some(0),
        };

        match (name, category_name, price, stock) {
            (Some(name), Some(category_name), Some(price), Some(stock)) => Ok(ProductDraft {
                name,
                category_name,
                price,
                stock,
            }),
            _ => Err(errors),
        }
    }
}
