//! Рекурсивное преобразование [`Value`] в JSON-безопасное дерево.
//!
//! На каждом узле действует строгий порядок приоритетов:
//!
//! 1. Упорядоченный словарь — сначала его собственный конвертер;
//!    без него откат к обычной рекурсии по значениям. Без этой
//!    первоочередной проверки упорядоченный словарь закодировался бы
//!    как обычный объект и потерял порядок ключей при декодировании.
//! 2. Обычный словарь — рекурсия по значениям, ключи без изменений.
//! 3. Список — рекурсия по элементам.
//! 4. Тип с зарегистрированным конвертером — вызов конвертера, его
//!    нагрузка оборачивается в маркер-объект `{"$<id>": payload}`.
//! 5. JSON-примитивы проходят без изменений.
//! 6. Всё остальное — ошибка `UnsupportedType`, значение никогда не
//!    сериализуется молча.

use serde_json::{Map as JsonMap, Number, Value as JsonValue};

use super::{
    type_ids::{
        marker_key, TYPE_BYTES, TYPE_DATE, TYPE_DATETIME, TYPE_DEQUE, TYPE_NDARRAY, TYPE_OMAP,
        TYPE_SET,
    },
    JsonCodec,
};
use crate::{
    error::{CodecError, CodecResult},
    value::Value,
};

/// Идентификатор типа значения для поиска в реестре.
/// Примитивы и обычные контейнеры идентификатора не имеют.
fn type_id_of(value: &Value) -> Option<&str> {
    match value {
        Value::Bytes(_) => Some(TYPE_BYTES),
        Value::DateTime(_) => Some(TYPE_DATETIME),
        Value::Date(_) => Some(TYPE_DATE),
        Value::Set(_) => Some(TYPE_SET),
        Value::Deque(_) => Some(TYPE_DEQUE),
        Value::OrderedMap(_) => Some(TYPE_OMAP),
        Value::Array(_) => Some(TYPE_NDARRAY),
        Value::Custom(c) => Some(c.type_id()),
        _ => None,
    }
}

/// Преобразует значение в JSON-дерево, пригодное для текстовой записи.
pub fn to_encoded(codec: &JsonCodec, value: &Value) -> CodecResult<JsonValue> {
    match value {
        // Упорядоченный словарь структурно тоже словарь, поэтому
        // проверяется раньше общего случая.
        Value::OrderedMap(map) => match codec.registry().get(TYPE_OMAP) {
            Some(conv) => Ok(wrap_marker(TYPE_OMAP, conv.encode(codec, value)?)),
            None => {
                let mut obj = JsonMap::new();
                for (k, v) in map.iter() {
                    obj.insert(k.to_string(), to_encoded(codec, v)?);
                }
                Ok(JsonValue::Object(obj))
            }
        },
        Value::Map(map) => {
            let mut obj = JsonMap::new();
            for (k, v) in map.iter() {
                obj.insert(k.clone(), to_encoded(codec, v)?);
            }
            Ok(JsonValue::Object(obj))
        }
        Value::List(items) => {
            let items = items
                .iter()
                .map(|item| to_encoded(codec, item))
                .collect::<CodecResult<Vec<_>>>()?;
            Ok(JsonValue::Array(items))
        }
        Value::Null => Ok(JsonValue::Null),
        Value::Bool(b) => Ok(JsonValue::Bool(*b)),
        Value::Int(i) => Ok(JsonValue::Number(Number::from(*i))),
        Value::Float(f) => Number::from_f64(*f)
            .map(JsonValue::Number)
            .ok_or(CodecError::NonFiniteFloat(*f)),
        Value::Str(s) => Ok(JsonValue::String(s.clone())),
        other => {
            let type_id = type_id_of(other);
            let conv = type_id.and_then(|id| codec.registry().get(id));
            match (type_id, conv) {
                (Some(id), Some(conv)) => Ok(wrap_marker(id, conv.encode(codec, other)?)),
                _ => Err(CodecError::UnsupportedType {
                    type_name: other.type_name(),
                }),
            }
        }
    }
}

fn wrap_marker(type_id: &str, payload: JsonValue) -> JsonValue {
    let mut obj = JsonMap::new();
    obj.insert(marker_key(type_id), payload);
    JsonValue::Object(obj)
}
