//! Идентификаторы встроенных типов и символ-маркер формата.
//!
//! Каждый типизированный вид значения помечается в JSON объектом
//! с единственным ключом `"$<идентификатор>"`. Используется в модулях
//! `convert`, `marker` и `builtin`.

/// Символ, с которого начинается ключ маркер-объекта.
pub const MARKER: char = '$';

/// Байтовый буфер (base64-текст)
pub const TYPE_BYTES: &str = "bytes";
/// Метка времени (RFC 3339)
pub const TYPE_DATETIME: &str = "datetime";
/// Календарная дата (YYYY-MM-DD)
pub const TYPE_DATE: &str = "date";
/// Множество (список членов)
pub const TYPE_SET: &str = "set";
/// Двусторонняя очередь (список элементов)
pub const TYPE_DEQUE: &str = "deque";
/// Упорядоченный словарь (список пар [ключ, значение])
pub const TYPE_OMAP: &str = "omap";
/// Числовой массив (вложенные списки)
pub const TYPE_NDARRAY: &str = "ndarray";

/// Собирает ключ маркер-объекта для идентификатора типа.
pub fn marker_key(type_id: &str) -> String {
    format!("{MARKER}{type_id}")
}

/// Если `key` выглядит как ключ маркера, возвращает идентификатор типа.
pub fn strip_marker(key: &str) -> Option<&str> {
    key.strip_prefix(MARKER)
}
