//! Таблица конвертеров: идентификатор типа -> функции кодирования
//! и декодирования.
//!
//! Регистрация явная, через [`RegistryBuilder`]; повторная регистрация
//! одного идентификатора перекрывает предыдущую запись (побеждает
//! последняя). Построенный реестр неизменяем и безопасно разделяется
//! между потоками.

use std::{collections::HashMap, sync::Arc};

use serde_json::Value as JsonValue;

use super::{type_ids::MARKER, JsonCodec};
use crate::{error::CodecResult, value::Value};

/// Пара encode/decode, привязанная к одному идентификатору типа.
///
/// `encode` возвращает полезную нагрузку маркера (обёртку
/// `{"$<id>": payload}` строит сам движок). `decode` получает полезную
/// нагрузку, уже декодированную снизу вверх: вложенные маркеры в ней
/// восстановлены до типизированных значений.
pub trait Converter: Send + Sync {
    /// Идентификатор типа, за который отвечает конвертер.
    fn type_id(&self) -> &str;

    /// Кодирует значение в JSON-нагрузку маркера.
    fn encode(&self, codec: &JsonCodec, value: &Value) -> CodecResult<JsonValue>;

    /// Восстанавливает значение из декодированной нагрузки.
    fn decode(&self, codec: &JsonCodec, payload: Value) -> CodecResult<Value>;
}

/// Неизменяемый реестр конвертеров.
pub struct ConverterRegistry {
    entries: HashMap<String, Arc<dyn Converter>>,
}

impl ConverterRegistry {
    /// Ищет конвертер по идентификатору типа.
    pub fn get(&self, type_id: &str) -> Option<&Arc<dyn Converter>> {
        self.entries.get(type_id)
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.entries.contains_key(type_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Зарегистрированные идентификаторы (порядок не определён).
    pub fn type_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }
}

/// Строитель реестра. Одноразовый шаг настройки: после `build()`
/// реестр больше не меняется.
#[derive(Default)]
pub struct RegistryBuilder {
    entries: HashMap<String, Arc<dyn Converter>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Регистрирует конвертер. Если идентификатор уже занят, запись
    /// перекрывается. Конвертер с пустым идентификатором или с
    /// символом маркера внутри отбраковывается с предупреждением,
    /// построение реестра продолжается.
    pub fn register(mut self, converter: impl Converter + 'static) -> Self {
        let id = converter.type_id().to_string();
        if id.is_empty() || id.contains(MARKER) {
            tracing::warn!(
                type_id = %id,
                "invalid converter type id: must be non-empty and must not \
                 contain '{MARKER}'; converter skipped"
            );
            return self;
        }
        if self.entries.insert(id.clone(), Arc::new(converter)).is_some() {
            tracing::debug!(type_id = %id, "converter overridden");
        }
        self
    }

    pub fn build(self) -> ConverterRegistry {
        ConverterRegistry {
            entries: self.entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fake {
        id: &'static str,
        tag: &'static str,
    }

    impl Converter for Fake {
        fn type_id(&self) -> &str {
            self.id
        }

        fn encode(&self, _codec: &JsonCodec, _value: &Value) -> CodecResult<JsonValue> {
            Ok(JsonValue::String(self.tag.to_string()))
        }

        fn decode(&self, _codec: &JsonCodec, _payload: Value) -> CodecResult<Value> {
            Ok(Value::Str(self.tag.to_string()))
        }
    }

    /// Тест проверяет, что при повторной регистрации одного
    /// идентификатора побеждает последняя запись.
    #[test]
    fn test_last_registration_wins() {
        let registry = RegistryBuilder::new()
            .register(Fake {
                id: "thing",
                tag: "first",
            })
            .register(Fake {
                id: "thing",
                tag: "second",
            })
            .build();
        assert_eq!(registry.len(), 1);
        let codec = JsonCodec::new();
        let conv = registry.get("thing").unwrap();
        let payload = conv.encode(&codec, &Value::Null).unwrap();
        assert_eq!(payload, JsonValue::String("second".to_string()));
    }

    /// Тест проверяет, что некорректные идентификаторы отбраковываются
    /// без прерывания построения.
    #[test]
    fn test_invalid_ids_are_skipped() {
        let registry = RegistryBuilder::new()
            .register(Fake { id: "", tag: "a" })
            .register(Fake {
                id: "$bad",
                tag: "b",
            })
            .register(Fake { id: "ok", tag: "c" })
            .build();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("ok"));
        assert!(!registry.contains("$bad"));
    }
}
