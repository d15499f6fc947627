//! Настройки кодирования и декодирования.
//!
//! Структуры с настройками вместо позиционных флагов; значения по
//! умолчанию повторяют поведение движка без настроек: компактный
//! вывод, ASCII-экранирование включено, сжатие выключено.

use std::sync::Arc;

use super::marker::MarkerHook;

/// Настройки кодирования в текст.
#[derive(Debug, Clone)]
pub struct DumpOptions {
    /// Ширина отступа в пробелах; `None` — компактный вывод.
    pub indent: Option<usize>,
    /// Сортировать ключи объектов лексикографически.
    pub sort_keys: bool,
    /// Короткая форма «красивого» вывода: отступ 4 + сортировка ключей.
    pub pretty: bool,
    /// Фиксированное число знаков после запятой для чисел с плавающей
    /// точкой; `None` — кратчайшая точная запись.
    pub float_precision: Option<usize>,
    /// Экранировать все не-ASCII символы как `\uXXXX`.
    pub ensure_ascii: bool,
    /// Сжать результат и вернуть его в base64-тексте.
    pub compress: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            indent: None,
            sort_keys: false,
            pretty: false,
            float_precision: None,
            ensure_ascii: true,
            compress: false,
        }
    }
}

impl DumpOptions {
    /// Настройки «красивого» вывода.
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Self::default()
        }
    }

    /// Действующие отступ и сортировка с учётом `pretty`.
    pub(crate) fn effective(&self) -> (Option<usize>, bool) {
        if self.pretty {
            (Some(4), true)
        } else {
            (self.indent, self.sort_keys)
        }
    }
}

/// Настройки декодирования из текста.
#[derive(Clone, Default)]
pub struct LoadOptions {
    /// Вход сжат и закодирован в base64-тексте.
    pub decompress: bool,
    /// Удалить комментарии перед разбором (JSON с комментариями).
    pub strip_comments: bool,
    /// Пользовательский хук разрешения маркеров.
    pub marker_hook: Option<Arc<MarkerHook>>,
}

impl std::fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadOptions")
            .field("decompress", &self.decompress)
            .field("strip_comments", &self.strip_comments)
            .field("marker_hook", &self.marker_hook.is_some())
            .finish()
    }
}
