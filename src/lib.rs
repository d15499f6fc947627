/// Serialization engine: registry, recursive converter, marker decoding,
/// text writer, compression.
pub mod codec;
/// Common error types: encoding, decoding, compression, file persistence.
pub mod error;
/// Atomic file persistence with extension-driven compression.
pub mod io;
/// Value model: primitives, containers, typed values, custom extensions.
pub mod value;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// Codec facade, builder, registry, and options.
pub use codec::{
    CodecBuilder, Converter, ConverterRegistry, DumpOptions, JsonCodec, LoadOptions, MarkerHook,
    RegistryBuilder,
};
/// Operation errors and result type.
pub use error::{CodecError, CodecResult};
/// File persistence: persist, retrieve, format detection.
pub use io::{detect_format, persist, retrieve, FileFormat};
/// Value model: Value and its typed companions.
pub use value::{CustomObject, CustomValue, NumArray, OrderedMap, Value};
