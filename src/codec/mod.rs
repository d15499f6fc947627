//! Движок типизированной JSON-сериализации.
//!
//! ## Архитектура
//!
//! Кодирование: значение [`Value`] проходит через рекурсивный
//! преобразователь ([`convert`]), который по реестру конвертеров
//! ([`registry`]) строит JSON-безопасное дерево с маркер-объектами
//! `{"$<id>": payload}`; дерево записывается в текст ([`writer`]) и
//! при необходимости сжимается ([`compression`]).
//!
//! Декодирование зеркально: текст разбирается в JSON-дерево, обход
//! снизу вверх ([`marker`]) распознаёт маркеры и восстанавливает
//! типизированные значения через загрузчики реестра.
//!
//! ```no_run
//! use typson::{JsonCodec, Value, DumpOptions, LoadOptions};
//!
//! let codec = JsonCodec::new();
//! let text = codec.dumps(&Value::Int(42), &DumpOptions::default())?;
//! let back = codec.loads(&text, &LoadOptions::default())?;
//! assert_eq!(back, Value::Int(42));
//! # Ok::<(), typson::CodecError>(())
//! ```
//!
//! ## Модули
//!
//! - [`registry`] — таблица конвертеров и её строитель
//! - [`builtin`] — встроенные конвертеры
//! - [`convert`] — рекурсивное кодирование в JSON-дерево
//! - [`marker`] — декодирование маркеров снизу вверх
//! - [`writer`] — запись дерева в текст
//! - [`comments`] — удаление комментариев перед разбором
//! - [`compression`] — сжатие и распаковка
//! - [`type_ids`] — идентификаторы встроенных типов
//! - [`options`] — настройки кодирования и декодирования

pub mod builtin;
pub mod comments;
pub mod compression;
pub mod convert;
pub mod marker;
pub mod options;
pub mod registry;
pub mod type_ids;
pub mod writer;

use std::sync::Arc;

use serde_json::Value as JsonValue;

pub use marker::MarkerHook;
pub use options::{DumpOptions, LoadOptions};
pub use registry::{Converter, ConverterRegistry, RegistryBuilder};

use crate::{error::CodecResult, value::Value};

/// Расширяемый кодек типизированного JSON.
///
/// Владеет неизменяемым реестром конвертеров; клоны разделяют один
/// реестр и безопасны для одновременного использования из нескольких
/// потоков. Несколько независимых кодеков с разными реестрами могут
/// сосуществовать в одном процессе.
#[derive(Clone)]
pub struct JsonCodec {
    registry: Arc<ConverterRegistry>,
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonCodec {
    /// Кодек со встроенными конвертерами.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Строитель кодека. Встроенные конвертеры уже зарегистрированы;
    /// повторная регистрация их идентификаторов перекрывает встроенную
    /// запись (побеждает последняя).
    pub fn builder() -> CodecBuilder {
        CodecBuilder {
            inner: builtin::register_builtins(RegistryBuilder::new()),
        }
    }

    /// Реестр конвертеров этого кодека.
    pub fn registry(&self) -> &ConverterRegistry {
        &self.registry
    }

    /// Преобразует значение в JSON-безопасное дерево.
    pub fn to_encoded(&self, value: &Value) -> CodecResult<JsonValue> {
        convert::to_encoded(self, value)
    }

    /// Восстанавливает значение из JSON-дерева.
    pub fn from_encoded(&self, json: &JsonValue) -> CodecResult<Value> {
        marker::from_encoded(self, json, None)
    }

    /// Кодирует значение в JSON-текст.
    pub fn dumps(&self, value: &Value, opts: &DumpOptions) -> CodecResult<String> {
        let tree = convert::to_encoded(self, value)?;
        let text = writer::write_json(&tree, opts);
        if opts.compress {
            compression::compress_text(&text, compression::DEFAULT_COMPRESSION_LEVEL)
        } else {
            Ok(text)
        }
    }

    /// Декодирует значение из JSON-текста.
    pub fn loads(&self, input: &str, opts: &LoadOptions) -> CodecResult<Value> {
        let text = if opts.decompress {
            compression::decompress_text(input)?
        } else {
            input.to_string()
        };
        let text = if opts.strip_comments {
            comments::strip_comments(&text)
        } else {
            text
        };
        let tree: JsonValue = serde_json::from_str(&text)?;
        marker::from_encoded(self, &tree, opts.marker_hook.as_deref())
    }
}

/// Строитель [`JsonCodec`]: одноразовый шаг настройки реестра.
pub struct CodecBuilder {
    inner: RegistryBuilder,
}

impl CodecBuilder {
    /// Регистрирует конвертер; существующая запись с тем же
    /// идентификатором перекрывается.
    pub fn register(mut self, converter: impl Converter + 'static) -> Self {
        self.inner = self.inner.register(converter);
        self
    }

    pub fn build(self) -> JsonCodec {
        JsonCodec {
            registry: Arc::new(self.inner.build()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dumps_loads_roundtrip() {
        let codec = JsonCodec::new();
        let value = Value::List(vec![Value::Int(1), Value::Str("two".into())]);
        let text = codec.dumps(&value, &DumpOptions::default()).unwrap();
        let back = codec.loads(&text, &LoadOptions::default()).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_compressed_roundtrip() {
        let codec = JsonCodec::new();
        let value = Value::Str("compress me ".repeat(20));
        let text = codec
            .dumps(
                &value,
                &DumpOptions {
                    compress: true,
                    ..DumpOptions::default()
                },
            )
            .unwrap();
        let back = codec
            .loads(
                &text,
                &LoadOptions {
                    decompress: true,
                    ..LoadOptions::default()
                },
            )
            .unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_loads_with_comments() {
        let codec = JsonCodec::new();
        let back = codec
            .loads(
                "{\n  \"a\": 1 // answer\n}",
                &LoadOptions {
                    strip_comments: true,
                    ..LoadOptions::default()
                },
            )
            .unwrap();
        match back {
            Value::Map(m) => assert_eq!(m.get("a"), Some(&Value::Int(1))),
            other => panic!("expected map, got {other:?}"),
        }
    }

    /// Тест проверяет, что клоны кодека разделяют один реестр.
    #[test]
    fn test_clones_share_registry() {
        let codec = JsonCodec::new();
        let clone = codec.clone();
        assert_eq!(codec.registry().len(), clone.registry().len());
        assert!(Arc::ptr_eq(&codec.registry, &clone.registry));
    }
}
