//! Удаление комментариев из JSON-текста перед разбором.
//!
//! Поддерживаются строчные (`// ...`) и блочные (`/* ... */`)
//! комментарии вне строковых литералов. Переводы строк сохраняются,
//! чтобы позиции ошибок разбора оставались осмысленными.

/// Возвращает текст без комментариев.
pub fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' => match chars.peek() {
                Some('/') => {
                    chars.next();
                    // До конца строки; сам перевод строки сохраняем.
                    for c in chars.by_ref() {
                        if c == '\n' {
                            out.push('\n');
                            break;
                        }
                    }
                }
                Some('*') => {
                    chars.next();
                    let mut prev = '\0';
                    for c in chars.by_ref() {
                        if c == '\n' {
                            out.push('\n');
                        }
                        if prev == '*' && c == '/' {
                            break;
                        }
                        prev = c;
                    }
                }
                _ => out.push(c),
            },
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_comments_removed() {
        let s = "{\n  \"a\": 1, // count\n  \"b\": 2\n}";
        let stripped = strip_comments(s);
        assert_eq!(stripped, "{\n  \"a\": 1, \n  \"b\": 2\n}");
        let v: serde_json::Value = serde_json::from_str(&stripped).unwrap();
        assert_eq!(v["a"], 1);
    }

    #[test]
    fn test_block_comments_removed() {
        let s = "{\"a\": /* inline */ 1}";
        assert_eq!(strip_comments(s), "{\"a\":  1}");
    }

    /// Тест проверяет, что `//` внутри строкового литерала не
    /// считается комментарием.
    #[test]
    fn test_slashes_inside_strings_kept() {
        let s = r#"{"url": "http://example.com"}"#;
        assert_eq!(strip_comments(s), s);
    }

    #[test]
    fn test_escaped_quote_does_not_end_string() {
        let s = r#"{"a": "say \"hi\" // not a comment"}"#;
        assert_eq!(strip_comments(s), s);
    }

    #[test]
    fn test_multiline_block_comment_keeps_newlines() {
        let s = "{\n/* one\ntwo */\"a\": 1}";
        assert_eq!(strip_comments(s), "{\n\n\"a\": 1}");
    }
}
