use std::{io, path::PathBuf};

use thiserror::Error;

pub type CodecResult<T> = Result<T, CodecError>;

#[derive(Error, Debug)]
pub enum CodecError {
    // ==== System / External ====
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON syntax error: {0}")]
    Json(#[from] serde_json::Error),

    // ==== Encode ====
    #[error("{type_name} is not JSON serializable")]
    UnsupportedType { type_name: String },

    #[error("non-finite float {0} is not representable in JSON")]
    NonFiniteFloat(f64),

    // ==== Decode ====
    #[error("loader for '{type_id}' failed on payload {payload}: {reason}")]
    Decode {
        type_id: String,
        payload: String,
        reason: String,
    },

    #[error("expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: String,
    },

    #[error("corrupt payload: {0}")]
    CorruptPayload(String),

    // ==== File persistence ====
    #[error("'{}' doesn't exist", .0.display())]
    NotFound(PathBuf),

    #[error("'{}' already exists and overwrite is not allowed", .0.display())]
    RefuseOverwrite(PathBuf),

    #[error(
        "'{}' is not a valid json file: extension has to be '.json' or '.js' \
         for uncompressed, '.gz' for compressed",
        .0.display()
    )]
    UnknownExtension(PathBuf),
}
