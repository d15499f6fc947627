//! Запись JSON-дерева в текст.
//!
//! Писатель рукописный: ему нужны возможности, которых нет у готового
//! сериализатора — фиксированная точность чисел с плавающей точкой,
//! ASCII-экранирование всех не-ASCII символов и сортировка ключей
//! поверх дерева с сохранённым порядком вставки.

use serde_json::Value as JsonValue;

use super::options::DumpOptions;

/// Записывает JSON-дерево в строку согласно настройкам.
pub fn write_json(value: &JsonValue, opts: &DumpOptions) -> String {
    let (indent, sort_keys) = opts.effective();
    let mut out = String::new();
    let w = Writer {
        indent,
        sort_keys,
        float_precision: opts.float_precision,
        ensure_ascii: opts.ensure_ascii,
    };
    w.write_value(&mut out, value, 0);
    out
}

struct Writer {
    indent: Option<usize>,
    sort_keys: bool,
    float_precision: Option<usize>,
    ensure_ascii: bool,
}

impl Writer {
    fn write_value(&self, out: &mut String, value: &JsonValue, level: usize) {
        match value {
            JsonValue::Null => out.push_str("null"),
            JsonValue::Bool(true) => out.push_str("true"),
            JsonValue::Bool(false) => out.push_str("false"),
            JsonValue::Number(n) => self.write_number(out, n),
            JsonValue::String(s) => self.write_string(out, s),
            JsonValue::Array(items) => self.write_array(out, items, level),
            JsonValue::Object(obj) => self.write_object(out, obj, level),
        }
    }

    fn write_number(&self, out: &mut String, n: &serde_json::Number) {
        match (self.float_precision, n.as_f64()) {
            // Точность применяется только к числам с плавающей точкой.
            (Some(prec), Some(f)) if n.is_f64() => {
                out.push_str(&format!("{f:.prec$}"));
            }
            _ => out.push_str(&n.to_string()),
        }
    }

    fn write_string(&self, out: &mut String, s: &str) {
        out.push('"');
        for c in s.chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if (c as u32) < 0x20 => {
                    out.push_str(&format!("\\u{:04x}", c as u32));
                }
                c if self.ensure_ascii && !c.is_ascii() => {
                    let cp = c as u32;
                    if cp > 0xFFFF {
                        // За пределами BMP — суррогатная пара.
                        let v = cp - 0x10000;
                        out.push_str(&format!("\\u{:04x}", 0xD800 + (v >> 10)));
                        out.push_str(&format!("\\u{:04x}", 0xDC00 + (v & 0x3FF)));
                    } else {
                        out.push_str(&format!("\\u{cp:04x}"));
                    }
                }
                c => out.push(c),
            }
        }
        out.push('"');
    }

    fn write_array(&self, out: &mut String, items: &[JsonValue], level: usize) {
        if items.is_empty() {
            out.push_str("[]");
            return;
        }
        out.push('[');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            self.newline_indent(out, level + 1);
            self.write_value(out, item, level + 1);
        }
        self.newline_indent(out, level);
        out.push(']');
    }

    fn write_object(
        &self,
        out: &mut String,
        obj: &serde_json::Map<String, JsonValue>,
        level: usize,
    ) {
        if obj.is_empty() {
            out.push_str("{}");
            return;
        }
        let mut entries: Vec<(&String, &JsonValue)> = obj.iter().collect();
        if self.sort_keys {
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        }
        out.push('{');
        for (i, (key, val)) in entries.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            self.newline_indent(out, level + 1);
            self.write_string(out, key);
            out.push(':');
            if self.indent.is_some() {
                out.push(' ');
            }
            self.write_value(out, val, level + 1);
        }
        self.newline_indent(out, level);
        out.push('}');
    }

    fn newline_indent(&self, out: &mut String, level: usize) {
        if let Some(width) = self.indent {
            out.push('\n');
            for _ in 0..(width * level) {
                out.push(' ');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::codec::options::DumpOptions;

    #[test]
    fn test_compact_output() {
        let v = json!({"a": [1, 2], "b": null});
        let s = write_json(&v, &DumpOptions::default());
        assert_eq!(s, r#"{"a":[1,2],"b":null}"#);
    }

    #[test]
    fn test_pretty_output() {
        let v = json!({"b": 1, "a": [true]});
        let s = write_json(&v, &DumpOptions::pretty());
        let expected = "{\n    \"a\": [\n        true\n    ],\n    \"b\": 1\n}";
        assert_eq!(s, expected);
    }

    /// Тест проверяет, что без сортировки ключи идут в порядке вставки.
    #[test]
    fn test_unsorted_keys_keep_insertion_order() {
        let v = json!({"b": 1, "a": 2});
        let s = write_json(&v, &DumpOptions::default());
        assert_eq!(s, r#"{"b":1,"a":2}"#);
    }

    #[test]
    fn test_float_precision() {
        let v = json!({"pi": 3.14159265, "n": 7});
        let opts = DumpOptions {
            float_precision: Some(2),
            ..DumpOptions::default()
        };
        let s = write_json(&v, &opts);
        // Целые числа точность не трогает.
        assert_eq!(s, r#"{"pi":3.14,"n":7}"#);
    }

    #[test]
    fn test_ensure_ascii_escapes_non_ascii() {
        let v = json!("héllo");
        let s = write_json(&v, &DumpOptions::default());
        assert_eq!(s, r#""h\u00e9llo""#);

        let opts = DumpOptions {
            ensure_ascii: false,
            ..DumpOptions::default()
        };
        assert_eq!(write_json(&v, &opts), "\"héllo\"");
    }

    /// Тест проверяет суррогатную пару для символа за пределами BMP.
    #[test]
    fn test_ensure_ascii_surrogate_pair() {
        let v = json!("🎉");
        let s = write_json(&v, &DumpOptions::default());
        assert_eq!(s, r#""\ud83c\udf89""#);
    }

    #[test]
    fn test_control_chars_escaped() {
        let v = json!("a\nb\u{1}");
        let s = write_json(&v, &DumpOptions::default());
        assert_eq!(s, r#""a\nb\u0001""#);
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(write_json(&json!({}), &DumpOptions::pretty()), "{}");
        assert_eq!(write_json(&json!([]), &DumpOptions::pretty()), "[]");
    }
}
