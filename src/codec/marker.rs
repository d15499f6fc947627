//! Восстановление типизированных значений из разобранного JSON-дерева.
//!
//! Обход идёт снизу вверх: дети объекта декодируются раньше, чем сам
//! объект проверяется на маркер. Поэтому к моменту вызова загрузчика
//! вложенные типизированные значения в нагрузке уже восстановлены.
//!
//! Объект с единственным ключом `"$<id>"`, где `id` зарегистрирован
//! в реестре, всегда трактуется как маркер. Это осознанное допущение
//! замкнутого мира: формат полагается на то, что такие объекты не
//! встречаются в обычных данных пользователя.

use serde_json::{Map as JsonMap, Value as JsonValue};

use super::{type_ids::strip_marker, JsonCodec};
use crate::{
    error::{CodecError, CodecResult},
    value::Value,
};

/// Пользовательский хук разрешения маркеров. Вызывается для каждого
/// объектного литерала до стандартной проверки; `Some` прерывает
/// стандартную обработку.
pub type MarkerHook =
    dyn Fn(&JsonCodec, &JsonMap<String, JsonValue>) -> Option<CodecResult<Value>> + Send + Sync;

/// Декодирует JSON-дерево в [`Value`], распознавая маркеры типов.
pub fn from_encoded(
    codec: &JsonCodec,
    json: &JsonValue,
    hook: Option<&MarkerHook>,
) -> CodecResult<Value> {
    match json {
        JsonValue::Null => Ok(Value::Null),
        JsonValue::Bool(b) => Ok(Value::Bool(*b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if let Some(u) = n.as_u64() {
                // За пределами i64 целое приходится представлять как float.
                Ok(Value::Float(u as f64))
            } else {
                Ok(Value::Float(n.as_f64().unwrap_or(f64::NAN)))
            }
        }
        JsonValue::String(s) => Ok(Value::Str(s.clone())),
        JsonValue::Array(items) => {
            let items = items
                .iter()
                .map(|item| from_encoded(codec, item, hook))
                .collect::<CodecResult<Vec<_>>>()?;
            Ok(Value::List(items))
        }
        JsonValue::Object(obj) => {
            if let Some(hook_fn) = hook {
                if let Some(resolved) = hook_fn(codec, obj) {
                    return resolved;
                }
            }
            if obj.len() == 1 {
                if let Some((key, raw_payload)) = obj.iter().next() {
                    if let Some(type_id) = strip_marker(key) {
                        if let Some(conv) = codec.registry().get(type_id) {
                            let conv = std::sync::Arc::clone(conv);
                            let payload = from_encoded(codec, raw_payload, hook)?;
                            return conv.decode(codec, payload).map_err(|e| {
                                CodecError::Decode {
                                    type_id: type_id.to_string(),
                                    payload: raw_payload.to_string(),
                                    reason: e.to_string(),
                                }
                            });
                        }
                    }
                }
            }
            let mut map = std::collections::HashMap::with_capacity(obj.len());
            for (k, v) in obj {
                map.insert(k.clone(), from_encoded(codec, v, hook)?);
            }
            Ok(Value::Map(map))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_plain_data_passes_through() {
        let codec = JsonCodec::new();
        let v = from_encoded(&codec, &json!({"a": [1, 2.5, "x", null, true]}), None).unwrap();
        match v {
            Value::Map(m) => {
                assert_eq!(
                    m.get("a"),
                    Some(&Value::List(vec![
                        Value::Int(1),
                        Value::Float(2.5),
                        Value::Str("x".into()),
                        Value::Null,
                        Value::Bool(true),
                    ]))
                );
            }
            other => panic!("expected map, got {other:?}"),
        }
    }

    #[test]
    fn test_unregistered_marker_stays_a_map() {
        let codec = JsonCodec::new();
        let v = from_encoded(&codec, &json!({"$unknown": 1}), None).unwrap();
        assert!(matches!(v, Value::Map(_)));
    }

    /// Тест проверяет, что многоключевой объект с ключом-маркером
    /// остаётся обычным словарём: маркер обязан быть единственным
    /// ключом.
    #[test]
    fn test_multi_key_object_is_not_a_marker() {
        let codec = JsonCodec::new();
        let v = from_encoded(&codec, &json!({"$set": [1], "other": 2}), None).unwrap();
        assert!(matches!(v, Value::Map(_)));
    }

    /// Тест проверяет оборачивание ошибки загрузчика в `Decode`
    /// с идентификатором типа и сырой нагрузкой.
    #[test]
    fn test_loader_failure_becomes_decode_error() {
        let codec = JsonCodec::new();
        // Нагрузка даты заведомо не разбирается.
        let err = from_encoded(&codec, &json!({"$date": "not-a-date"}), None).unwrap_err();
        match err {
            CodecError::Decode { type_id, payload, .. } => {
                assert_eq!(type_id, "date");
                assert!(payload.contains("not-a-date"));
            }
            other => panic!("expected Decode, got {other:?}"),
        }
    }

    /// Тест проверяет, что вложенные маркеры восстановлены к моменту
    /// вызова внешнего загрузчика.
    #[test]
    fn test_bottom_up_decoding() {
        let codec = JsonCodec::new();
        let v = from_encoded(
            &codec,
            &json!({"$set": [{"$datetime": "2020-01-01T00:00:00+00:00"}]}),
            None,
        )
        .unwrap();
        match v {
            Value::Set(set) => {
                assert_eq!(set.len(), 1);
                assert!(matches!(set.iter().next(), Some(Value::DateTime(_))));
            }
            other => panic!("expected set, got {other:?}"),
        }
    }

    /// Тест проверяет, что хук перекрывает стандартное разрешение.
    #[test]
    fn test_hook_overrides_default_resolution() {
        let codec = JsonCodec::new();
        let hook = |_codec: &JsonCodec, obj: &JsonMap<String, JsonValue>| {
            if obj.contains_key("$date") {
                Some(Ok(Value::Str("intercepted".into())))
            } else {
                None
            }
        };
        let v = from_encoded(&codec, &json!({"$date": "2020-01-01"}), Some(&hook)).unwrap();
        assert_eq!(v, Value::Str("intercepted".into()));
    }
}
