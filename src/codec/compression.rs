//! Сжатие и распаковка данных с помощью zlib.
//!
//! Содержит функции компрессии и декомпрессии для байтов и текста,
//! а также текстобезопасный вариант (base64) для встраивания сжатых
//! данных в текстовый транспорт.

use std::io::{Read, Write};

use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};

use crate::error::{CodecError, CodecResult};

/// Уровень сжатия по умолчанию: баланс между скоростью и размером.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Сжимает срез байтов в zlib-поток.
pub fn compress_bytes(data: &[u8], level: u32) -> CodecResult<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Сжимает текст и возвращает результат в base64.
pub fn compress_text(s: &str, level: u32) -> CodecResult<String> {
    let compressed = compress_bytes(s.as_bytes(), level)?;
    Ok(base64::encode(&compressed))
}

/// Распаковывает zlib-поток.
///
/// Вход, не являющийся корректным zlib-потоком, даёт ошибку
/// `CorruptPayload`, а не мусор на выходе.
pub fn decompress_bytes(data: &[u8]) -> CodecResult<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| CodecError::CorruptPayload(e.to_string()))?;
    Ok(out)
}

/// Распаковывает base64-текст, полученный из [`compress_text`].
pub fn decompress_text(s: &str) -> CodecResult<String> {
    let compressed =
        base64::decode(s).map_err(|e| CodecError::CorruptPayload(e.to_string()))?;
    let bytes = decompress_bytes(&compressed)?;
    String::from_utf8(bytes).map_err(|e| CodecError::CorruptPayload(e.to_string()))
}
