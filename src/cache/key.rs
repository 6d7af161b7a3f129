//! 缓存键生成
//!
//! 结构化参数先序列化为 JSON，再按键名递归排序，保证同一逻辑请求
//! 无论字段顺序如何都得到相同的键。

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{helpers, WordSaverResult};

/// 由命名空间前缀和参数生成缓存键
///
/// 标量参数直接拼接（`translation:hello`），对象和数组使用规范化 JSON
/// （`translation:{"targetLang":"zh-CN","word":"hello"}`）。
pub fn generate_key<P: Serialize + ?Sized>(prefix: &str, params: &P) -> WordSaverResult<String> {
    if prefix.trim().is_empty() {
        return Err(helpers::invalid_argument("缓存键前缀不能为空"));
    }

    let value = serde_json::to_value(params)?;
    let rendered = match value {
        Value::String(s) => s,
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        structured => serde_json::to_string(&canonicalize(structured))?,
    };

    Ok(format!("{}:{}", prefix, rendered))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));

            let mut sorted = Map::new();
            for (key, value) in entries {
                sorted.insert(key, canonicalize(value));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WordSaverError;
    use serde_json::json;

    #[test]
    fn test_scalar_keys() {
        assert_eq!(generate_key("definition", "hello").unwrap(), "definition:hello");
        assert_eq!(generate_key("page", &3).unwrap(), "page:3");
    }

    #[test]
    fn test_structured_keys_ignore_field_order() {
        let a = generate_key("translation", &json!({"word": "hello", "targetLang": "zh-CN"})).unwrap();
        let b = generate_key("translation", &json!({"targetLang": "zh-CN", "word": "hello"})).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, r#"translation:{"targetLang":"zh-CN","word":"hello"}"#);
    }

    #[test]
    fn test_nested_objects_are_sorted() {
        let a = generate_key("q", &json!({"b": {"y": 1, "x": 2}, "a": [ {"d": 1, "c": 2} ]})).unwrap();
        assert_eq!(a, r#"q:{"a":[{"c":2,"d":1}],"b":{"x":2,"y":1}}"#);
    }

    #[test]
    fn test_case_differs_without_caller_lowercasing() {
        let upper = generate_key("translation", &json!({"word": "Hello", "targetLang": "zh-CN"})).unwrap();
        let lower = generate_key("translation", &json!({"word": "hello", "targetLang": "zh-CN"})).unwrap();
        assert_ne!(upper, lower);
    }

    #[test]
    fn test_empty_prefix_is_rejected() {
        assert!(matches!(
            generate_key("", "hello"),
            Err(WordSaverError::InvalidArgument(_))
        ));
    }
}
