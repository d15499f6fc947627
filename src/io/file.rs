//! Долговечная запись и чтение JSON-файлов.
//!
//! Режим сжатия выводится только из расширения файла, содержимое не
//! инспектируется: `.json`/`.js` — несжатый UTF-8 текст, `.gz` —
//! zlib-сжатые байты того же текста, `.tmp` наследует режим
//! расширения под ним.
//!
//! Запись атомарна: полезные данные пишутся во временный файл
//! `<путь>.tmp`, затем атомарным переименованием попадают на целевой
//! путь. Прерывание между записью и переименованием оставляет целевой
//! файл (или его отсутствие) нетронутым; частично записанный файл на
//! целевом пути не виден никогда.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    time::Instant,
};

use crate::{
    codec::{
        compression::{compress_bytes, decompress_bytes, DEFAULT_COMPRESSION_LEVEL},
        DumpOptions, JsonCodec, LoadOptions,
    },
    error::{CodecError, CodecResult},
    value::Value,
};

/// Режим хранения файла, выведенный из расширения.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Несжатый UTF-8 текст (`.json`, `.js`).
    Plain,
    /// zlib-сжатые байты (`.gz`).
    Compressed,
}

/// Определяет режим хранения по расширению (без учёта регистра).
/// `.tmp` рекурсивно наследует режим расширения под ним.
pub fn detect_format(path: &Path) -> CodecResult<FileFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("json") | Some("js") => Ok(FileFormat::Plain),
        Some("gz") => Ok(FileFormat::Compressed),
        Some("tmp") => detect_format(&path.with_extension("")),
        _ => Err(CodecError::UnknownExtension(path.to_path_buf())),
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}

/// Кодирует значение и записывает его в файл.
///
/// Существующий файл без флага `overwrite` не трогается: вызов
/// завершается ошибкой `RefuseOverwrite`. Возвращает записанный
/// (несжатый) текст.
pub fn persist(
    codec: &JsonCodec,
    value: &Value,
    path: &Path,
    opts: &DumpOptions,
    overwrite: bool,
) -> CodecResult<String> {
    let format = detect_format(path)?;
    if path.exists() && !overwrite {
        return Err(CodecError::RefuseOverwrite(path.to_path_buf()));
    }

    let started = Instant::now();
    // Сжатие файла задаётся расширением, а не настройками кодирования.
    let text = codec.dumps(
        value,
        &DumpOptions {
            compress: false,
            ..opts.clone()
        },
    )?;
    let payload = match format {
        FileFormat::Compressed => compress_bytes(text.as_bytes(), DEFAULT_COMPRESSION_LEVEL)?,
        FileFormat::Plain => text.clone().into_bytes(),
    };

    let tmp = tmp_path(path);
    if let Err(e) = write_all_synced(&tmp, &payload) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }

    tracing::info!(
        path = %path.display(),
        bytes = payload.len(),
        elapsed = ?started.elapsed(),
        "dump complete"
    );
    Ok(text)
}

fn write_all_synced(path: &Path, payload: &[u8]) -> CodecResult<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(payload)?;
    file.sync_all()?;
    Ok(())
}

/// Читает файл и декодирует значение.
pub fn retrieve(codec: &JsonCodec, path: &Path, opts: &LoadOptions) -> CodecResult<Value> {
    let format = detect_format(path)?;
    if !path.exists() {
        return Err(CodecError::NotFound(path.to_path_buf()));
    }

    let started = Instant::now();
    let raw = fs::read(path)?;
    let text = match format {
        FileFormat::Compressed => String::from_utf8(decompress_bytes(&raw)?)
            .map_err(|e| CodecError::CorruptPayload(e.to_string()))?,
        FileFormat::Plain => {
            String::from_utf8(raw).map_err(|e| CodecError::CorruptPayload(e.to_string()))?
        }
    };
    let value = codec.loads(
        &text,
        &LoadOptions {
            decompress: false,
            ..opts.clone()
        },
    )?;

    tracing::info!(
        path = %path.display(),
        elapsed = ?started.elapsed(),
        "load complete"
    );
    Ok(value)
}
