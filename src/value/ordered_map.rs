//! Словарь с сохранением порядка вставки ключей.
//!
//! Обычный `Value::Map` не гарантирует порядок ключей; `OrderedMap`
//! хранит пары в векторе и отдаёт их ровно в том порядке, в котором
//! они были вставлены. Повторная вставка существующего ключа заменяет
//! значение на месте, не меняя позицию ключа.

use super::Value;

/// Упорядоченный ассоциативный массив `String -> Value`.
///
/// Сравнение на равенство чувствительно к порядку: две карты с одними
/// и теми же парами, но в разном порядке, не равны.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct OrderedMap {
    entries: Vec<(String, Value)>,
}

impl OrderedMap {
    /// Создаёт пустую карту.
    pub fn new() -> Self {
        Self::default()
    }

    /// Число пар в карте.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Вставляет пару. Если ключ уже существует, значение заменяется
    /// на месте, позиция ключа сохраняется. Возвращает старое значение.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        for (k, v) in self.entries.iter_mut() {
            if *k == key {
                return Some(std::mem::replace(v, value));
            }
        }
        self.entries.push((key, value));
        None
    }

    /// Возвращает значение по ключу, если оно есть.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Удаляет пару по ключу, сдвигая последующие элементы.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    /// Итератор по парам в порядке вставки.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Итератор по ключам в порядке вставки.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl FromIterator<(String, Value)> for OrderedMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut map = OrderedMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for OrderedMap {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Тест проверяет, что порядок ключей совпадает с порядком вставки.
    #[test]
    fn test_insertion_order_preserved() {
        let mut m = OrderedMap::new();
        m.insert("b", Value::Int(1));
        m.insert("a", Value::Int(2));
        m.insert("c", Value::Int(3));
        let keys: Vec<&str> = m.keys().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    /// Тест проверяет, что повторная вставка заменяет значение,
    /// не меняя позицию ключа.
    #[test]
    fn test_insert_replaces_in_place() {
        let mut m = OrderedMap::new();
        m.insert("x", Value::Int(1));
        m.insert("y", Value::Int(2));
        let old = m.insert("x", Value::Int(10));
        assert_eq!(old, Some(Value::Int(1)));
        assert_eq!(m.get("x"), Some(&Value::Int(10)));
        let keys: Vec<&str> = m.keys().collect();
        assert_eq!(keys, vec!["x", "y"]);
    }

    /// Тест проверяет чувствительность равенства к порядку ключей.
    #[test]
    fn test_eq_is_order_sensitive() {
        let a: OrderedMap = [("a".to_string(), Value::Int(1)), ("b".to_string(), Value::Int(2))]
            .into_iter()
            .collect();
        let b: OrderedMap = [("b".to_string(), Value::Int(2)), ("a".to_string(), Value::Int(1))]
            .into_iter()
            .collect();
        assert_ne!(a, b);
    }

    #[test]
    fn test_remove() {
        let mut m = OrderedMap::new();
        m.insert("a", Value::Int(1));
        m.insert("b", Value::Int(2));
        assert_eq!(m.remove("a"), Some(Value::Int(1)));
        assert_eq!(m.remove("a"), None);
        assert_eq!(m.len(), 1);
    }
}
