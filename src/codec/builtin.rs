//! Встроенные конвертеры: байты, метки времени, даты, множества,
//! очереди, упорядоченные словари и числовые массивы.
//!
//! Составные конвертеры (set, deque, omap, ndarray) сами рекурсивно
//! прогоняют свои элементы через движок, поэтому вложенные
//! типизированные значения внутри них кодируются и восстанавливаются
//! как обычно.

use std::collections::{BTreeSet, VecDeque};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Number, Value as JsonValue};

use super::{
    registry::{Converter, RegistryBuilder},
    type_ids::{
        TYPE_BYTES, TYPE_DATE, TYPE_DATETIME, TYPE_DEQUE, TYPE_NDARRAY, TYPE_OMAP, TYPE_SET,
    },
    JsonCodec,
};
use crate::{
    error::{CodecError, CodecResult},
    value::{NumArray, OrderedMap, Value},
};

/// Регистрирует все встроенные конвертеры.
pub(super) fn register_builtins(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .register(BytesConverter)
        .register(DateTimeConverter)
        .register(DateConverter)
        .register(SetConverter)
        .register(DequeConverter)
        .register(OmapConverter)
        .register(NdArrayConverter)
}

fn mismatch(expected: &'static str, got: &Value) -> CodecError {
    CodecError::TypeMismatch {
        expected,
        actual: got.type_name(),
    }
}

/// Байтовый буфер <-> base64-текст.
pub struct BytesConverter;

impl Converter for BytesConverter {
    fn type_id(&self) -> &str {
        TYPE_BYTES
    }

    fn encode(&self, _codec: &JsonCodec, value: &Value) -> CodecResult<JsonValue> {
        match value {
            Value::Bytes(b) => Ok(JsonValue::String(base64::encode(b))),
            other => Err(mismatch("bytes", other)),
        }
    }

    fn decode(&self, _codec: &JsonCodec, payload: Value) -> CodecResult<Value> {
        match payload {
            Value::Str(s) => base64::decode(&s)
                .map(Value::Bytes)
                .map_err(|e| CodecError::TypeMismatch {
                    expected: "base64 text",
                    actual: e.to_string(),
                }),
            other => Err(mismatch("base64 text", &other)),
        }
    }
}

/// Метка времени <-> RFC 3339-текст.
pub struct DateTimeConverter;

impl Converter for DateTimeConverter {
    fn type_id(&self) -> &str {
        TYPE_DATETIME
    }

    fn encode(&self, _codec: &JsonCodec, value: &Value) -> CodecResult<JsonValue> {
        match value {
            Value::DateTime(dt) => Ok(JsonValue::String(dt.to_rfc3339())),
            other => Err(mismatch("datetime", other)),
        }
    }

    fn decode(&self, _codec: &JsonCodec, payload: Value) -> CodecResult<Value> {
        match payload {
            Value::Str(s) => parse_datetime(&s).map(Value::DateTime),
            other => Err(mismatch("ISO-8601 text", &other)),
        }
    }
}

/// Разбирает RFC 3339; наивные метки без зоны считаются UTC.
fn parse_datetime(s: &str) -> CodecResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| CodecError::TypeMismatch {
            expected: "ISO-8601 text",
            actual: format!("'{s}' ({e})"),
        })
}

/// Календарная дата <-> `YYYY-MM-DD`.
pub struct DateConverter;

impl Converter for DateConverter {
    fn type_id(&self) -> &str {
        TYPE_DATE
    }

    fn encode(&self, _codec: &JsonCodec, value: &Value) -> CodecResult<JsonValue> {
        match value {
            Value::Date(d) => Ok(JsonValue::String(d.format("%Y-%m-%d").to_string())),
            other => Err(mismatch("date", other)),
        }
    }

    fn decode(&self, _codec: &JsonCodec, payload: Value) -> CodecResult<Value> {
        match payload {
            Value::Str(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .map(Value::Date)
                .map_err(|e| CodecError::TypeMismatch {
                    expected: "YYYY-MM-DD text",
                    actual: format!("'{s}' ({e})"),
                }),
            other => Err(mismatch("YYYY-MM-DD text", &other)),
        }
    }
}

/// Множество <-> список членов.
pub struct SetConverter;

impl Converter for SetConverter {
    fn type_id(&self) -> &str {
        TYPE_SET
    }

    fn encode(&self, codec: &JsonCodec, value: &Value) -> CodecResult<JsonValue> {
        match value {
            Value::Set(set) => {
                let items = set
                    .iter()
                    .map(|member| codec.to_encoded(member))
                    .collect::<CodecResult<Vec<_>>>()?;
                Ok(JsonValue::Array(items))
            }
            other => Err(mismatch("set", other)),
        }
    }

    fn decode(&self, _codec: &JsonCodec, payload: Value) -> CodecResult<Value> {
        match payload {
            Value::List(items) => Ok(Value::Set(items.into_iter().collect::<BTreeSet<_>>())),
            other => Err(mismatch("list of members", &other)),
        }
    }
}

/// Двусторонняя очередь <-> список элементов (от головы к хвосту).
pub struct DequeConverter;

impl Converter for DequeConverter {
    fn type_id(&self) -> &str {
        TYPE_DEQUE
    }

    fn encode(&self, codec: &JsonCodec, value: &Value) -> CodecResult<JsonValue> {
        match value {
            Value::Deque(q) => {
                let items = q
                    .iter()
                    .map(|item| codec.to_encoded(item))
                    .collect::<CodecResult<Vec<_>>>()?;
                Ok(JsonValue::Array(items))
            }
            other => Err(mismatch("deque", other)),
        }
    }

    fn decode(&self, _codec: &JsonCodec, payload: Value) -> CodecResult<Value> {
        match payload {
            Value::List(items) => Ok(Value::Deque(items.into_iter().collect::<VecDeque<_>>())),
            other => Err(mismatch("list of elements", &other)),
        }
    }
}

/// Упорядоченный словарь <-> список пар `[ключ, значение]`.
pub struct OmapConverter;

impl Converter for OmapConverter {
    fn type_id(&self) -> &str {
        TYPE_OMAP
    }

    fn encode(&self, codec: &JsonCodec, value: &Value) -> CodecResult<JsonValue> {
        match value {
            Value::OrderedMap(map) => {
                let pairs = map
                    .iter()
                    .map(|(k, v)| {
                        Ok(JsonValue::Array(vec![
                            JsonValue::String(k.to_string()),
                            codec.to_encoded(v)?,
                        ]))
                    })
                    .collect::<CodecResult<Vec<_>>>()?;
                Ok(JsonValue::Array(pairs))
            }
            other => Err(mismatch("omap", other)),
        }
    }

    fn decode(&self, _codec: &JsonCodec, payload: Value) -> CodecResult<Value> {
        let items = match payload {
            Value::List(items) => items,
            other => return Err(mismatch("list of [key, value] pairs", &other)),
        };
        let mut map = OrderedMap::new();
        for pair in items {
            match pair {
                Value::List(mut kv) if kv.len() == 2 => {
                    let v = kv.pop().unwrap_or(Value::Null);
                    match kv.pop() {
                        Some(Value::Str(k)) => {
                            map.insert(k, v);
                        }
                        other => {
                            return Err(mismatch(
                                "string key in [key, value] pair",
                                &other.unwrap_or(Value::Null),
                            ))
                        }
                    }
                }
                other => return Err(mismatch("[key, value] pair", &other)),
            }
        }
        Ok(Value::OrderedMap(map))
    }
}

/// Числовой массив <-> вложенные списки.
pub struct NdArrayConverter;

impl Converter for NdArrayConverter {
    fn type_id(&self) -> &str {
        TYPE_NDARRAY
    }

    fn encode(&self, _codec: &JsonCodec, value: &Value) -> CodecResult<JsonValue> {
        match value {
            Value::Array(arr) => nest(arr.shape(), arr.data()),
            other => Err(mismatch("ndarray", other)),
        }
    }

    fn decode(&self, _codec: &JsonCodec, payload: Value) -> CodecResult<Value> {
        let mut shape = Vec::new();
        infer_shape(&payload, &mut shape);
        let mut data = Vec::new();
        flatten(&payload, 0, &shape, &mut data)?;
        NumArray::new(shape, data)
            .map(Value::Array)
            .ok_or_else(ragged)
    }
}

/// Сворачивает плоские данные во вложенные JSON-списки по форме.
fn nest(shape: &[usize], data: &[f64]) -> CodecResult<JsonValue> {
    if shape.is_empty() {
        // Нульмерный массив: скалярная нагрузка.
        return number(data[0]);
    }
    if shape.len() == 1 {
        let items = data.iter().map(|f| number(*f)).collect::<CodecResult<Vec<_>>>()?;
        return Ok(JsonValue::Array(items));
    }
    let stride: usize = shape[1..].iter().product();
    if stride == 0 {
        // Нулевая внутренняя ось: данных нет, но структура вложенных
        // пустых списков сохраняется.
        let empty = nest(&shape[1..], &[])?;
        return Ok(JsonValue::Array(vec![empty; shape[0]]));
    }
    let items = data
        .chunks(stride)
        .map(|chunk| nest(&shape[1..], chunk))
        .collect::<CodecResult<Vec<_>>>()?;
    Ok(JsonValue::Array(items))
}

fn number(f: f64) -> CodecResult<JsonValue> {
    Number::from_f64(f)
        .map(JsonValue::Number)
        .ok_or(CodecError::NonFiniteFloat(f))
}

fn ragged() -> CodecError {
    CodecError::TypeMismatch {
        expected: "rectangular numeric array",
        actual: "ragged nested lists".to_string(),
    }
}

/// Выводит форму по цепочке первых элементов.
fn infer_shape(value: &Value, shape: &mut Vec<usize>) {
    if let Value::List(items) = value {
        shape.push(items.len());
        if let Some(first) = items.first() {
            infer_shape(first, shape);
        }
    }
}

/// Разбирает вложенные списки в плоские данные, строго сверяя каждую
/// ветвь с выведенной формой. Рваные списки отбраковываются.
fn flatten(value: &Value, depth: usize, shape: &[usize], data: &mut Vec<f64>) -> CodecResult<()> {
    match value {
        Value::List(items) => {
            if depth >= shape.len() || items.len() != shape[depth] {
                return Err(ragged());
            }
            for item in items {
                flatten(item, depth + 1, shape, data)?;
            }
            Ok(())
        }
        Value::Int(i) => {
            if depth != shape.len() {
                return Err(ragged());
            }
            data.push(*i as f64);
            Ok(())
        }
        Value::Float(f) => {
            if depth != shape.len() {
                return Err(ragged());
            }
            data.push(*f);
            Ok(())
        }
        other => Err(mismatch("number or nested list", other)),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_bytes_roundtrip() {
        let codec = JsonCodec::new();
        let conv = BytesConverter;
        let payload = conv
            .encode(&codec, &Value::Bytes(b"hello".to_vec()))
            .unwrap();
        assert_eq!(payload, JsonValue::String("aGVsbG8=".to_string()));
        let back = conv
            .decode(&codec, Value::Str("aGVsbG8=".to_string()))
            .unwrap();
        assert_eq!(back, Value::Bytes(b"hello".to_vec()));
    }

    #[test]
    fn test_bytes_rejects_bad_base64() {
        let codec = JsonCodec::new();
        let err = BytesConverter
            .decode(&codec, Value::Str("!!!".to_string()))
            .unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { .. }));
    }

    /// Тест проверяет разбор наивной метки времени без зоны.
    #[test]
    fn test_datetime_naive_fallback() {
        let parsed = parse_datetime("2020-05-01T12:30:00.250").unwrap();
        let expected = Utc.with_ymd_and_hms(2020, 5, 1, 12, 30, 0).unwrap()
            + chrono::Duration::milliseconds(250);
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_datetime_rfc3339_roundtrip() {
        let dt = Utc.with_ymd_and_hms(2021, 1, 2, 3, 4, 5).unwrap();
        let codec = JsonCodec::new();
        let payload = DateTimeConverter
            .encode(&codec, &Value::DateTime(dt))
            .unwrap();
        let back = match payload {
            JsonValue::String(s) => parse_datetime(&s).unwrap(),
            other => panic!("expected string payload, got {other:?}"),
        };
        assert_eq!(back, dt);
    }

    #[test]
    fn test_ndarray_nested_shape() {
        let arr = NumArray::new(vec![2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let payload = nest(arr.shape(), arr.data()).unwrap();
        assert_eq!(
            payload,
            serde_json::json!([[1.0, 2.0], [3.0, 4.0]])
        );
    }

    /// Тест проверяет, что массив с нулевой внутренней осью кодируется
    /// вложенными пустыми списками, а не аварийно завершает процесс.
    #[test]
    fn test_ndarray_zero_sized_axis() {
        let arr = NumArray::new(vec![2, 0], vec![]).unwrap();
        let payload = nest(arr.shape(), arr.data()).unwrap();
        assert_eq!(payload, serde_json::json!([[], []]));

        let arr = NumArray::new(vec![2, 0, 3], vec![]).unwrap();
        let payload = nest(arr.shape(), arr.data()).unwrap();
        assert_eq!(payload, serde_json::json!([[], []]));
    }

    #[test]
    fn test_ndarray_rejects_ragged_input() {
        let codec = JsonCodec::new();
        let ragged = Value::List(vec![
            Value::List(vec![Value::Int(1), Value::Int(2)]),
            Value::List(vec![Value::Int(3)]),
        ]);
        let err = NdArrayConverter.decode(&codec, ragged).unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { .. }));
    }

    #[test]
    fn test_omap_decode_preserves_order() {
        let codec = JsonCodec::new();
        let pairs = Value::List(vec![
            Value::List(vec![Value::Str("b".into()), Value::Int(1)]),
            Value::List(vec![Value::Str("a".into()), Value::Int(2)]),
        ]);
        let decoded = OmapConverter.decode(&codec, pairs).unwrap();
        match decoded {
            Value::OrderedMap(m) => {
                let keys: Vec<&str> = m.keys().collect();
                assert_eq!(keys, vec!["b", "a"]);
            }
            other => panic!("expected omap, got {other:?}"),
        }
    }
}
