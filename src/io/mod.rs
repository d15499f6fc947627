//! Файловое хранение закодированных значений.

pub mod file;

pub use file::{detect_format, persist, retrieve, FileFormat};
