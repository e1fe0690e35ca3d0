//! 校验辅助：字段错误表和通用的自定义校验函数

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::{borrow::Cow, collections::BTreeMap, str::FromStr};
use validator::{ValidationError, ValidationErrors};

pub const REQUIRED: &str = "Este campo es requerido.";
pub const BLANK: &str = "Este campo no puede estar en blanco.";
pub const NOT_A_STRING: &str = "No es una cadena válida.";

/// 价格最多的整数位数
const PRICE_INTEGER_DIGITS: u32 = 8;
/// 价格的小数位数
pub const PRICE_SCALE: u32 = 2;

/// 字段名 -> 错误信息列表，序列化为 `{"campo": ["mensaje"]}`
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// 必填字段：缺失时记录 REQUIRED，否则按 `parse` 解析
    pub fn required<T, F>(&mut self, field: &str, value: Option<&Value>, parse: F) -> Option<T>
    where
        F: FnOnce(&Value) -> Result<T, ValidationError>,
    {
        match value {
            Some(value) => self.parsed(field, value, parse),
            None => {
                self.add(field, REQUIRED);
                None
            }
        }
    }

    /// 解析字段值，失败时记录错误信息
    pub fn parsed<T, F>(&mut self, field: &str, value: &Value, parse: F) -> Option<T>
    where
        F: FnOnce(&Value) -> Result<T, ValidationError>,
    {
        match parse(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                self.add(field, message_of(&e));
                None
            }
        }
    }

    /// 第一个字段的第一条错误
    pub fn first_message(&self) -> Option<&str> {
        self.0
            .values()
            .next()
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(err: ValidationErrors) -> Self {
        let mut errors = FieldErrors::new();
        for (field, field_errors) in err.field_errors() {
            for error in field_errors {
                errors.add(field.to_string(), message_of(error));
            }
        }
        errors
    }
}

/// 错误的提示信息，没有时退回错误码
pub fn message_of(error: &ValidationError) -> String {
    error
        .message
        .as_ref()
        .map(|msg| msg.to_string())
        .unwrap_or_else(|| error.code.to_string())
}

fn invalid(code: &'static str, message: String) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::from(message));
    error
}

/// 拒绝空字符串和只有空白的字符串
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("blank", BLANK.to_string()));
    }
    Ok(())
}

/// 文本字段：字符串去掉首尾空白，数字转成文本，其他类型报错
pub fn parse_text(value: &Value) -> Result<String, ValidationError> {
    match value {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(invalid("invalid", NOT_A_STRING.to_string())),
    }
}

/// 必填文本：不能为空白，最多 `max_chars` 个字符
pub fn parse_required_text(value: &Value, max_chars: usize) -> Result<String, ValidationError> {
    let text = parse_text(value)?;
    not_blank(&text)?;
    if text.chars().count() > max_chars {
        return Err(invalid(
            "max_length",
            format!(
                "Asegúrese de que este campo no tenga más de {} caracteres.",
                max_chars
            ),
        ));
    }
    Ok(text)
}

/// 解析价格：接受数字或数字字符串，最多两位小数（按书写的位数算）、八位整数，不能为负
pub fn parse_price(value: &Value) -> Result<Decimal, ValidationError> {
    let invalid_number = || invalid("invalid", "Se requiere un número válido.".to_string());

    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return Err(invalid_number()),
    };
    let price = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| invalid_number())?;

    if price.is_sign_negative() && !price.is_zero() {
        return Err(invalid(
            "min_value",
            "Asegúrese de que este valor sea mayor o igual a 0.".to_string(),
        ));
    }
    if price.scale() > PRICE_SCALE {
        return Err(invalid(
            "max_decimal_places",
            format!(
                "Asegúrese de que no haya más de {} decimales.",
                PRICE_SCALE
            ),
        ));
    }
    let digits = price.mantissa().abs().to_string().len() as u32;
    if digits.saturating_sub(price.scale()) > PRICE_INTEGER_DIGITS {
        return Err(invalid(
            "max_whole_digits",
            format!(
                "Asegúrese de que no haya más de {} dígitos antes del punto decimal.",
                PRICE_INTEGER_DIGITS
            ),
        ));
    }

    let mut price = price;
    price.rescale(PRICE_SCALE);
    Ok(price)
}

/// 解析库存：非负整数，可以是数字或数字字符串
pub fn parse_stock(value: &Value) -> Result<i32, ValidationError> {
    let parsed = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    let stock = parsed
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| invalid("invalid", "Se requiere un número entero válido.".to_string()))?;

    if stock < 0 {
        return Err(invalid(
            "min_value",
            "Asegúrese de que este valor sea mayor o igual a 0.".to_string(),
        ));
    }
    Ok(stock)
}
