//! UBJSON-style binary form of the structured value
//!
//! Every value starts with a one-byte type marker. Multi-byte numbers are
//! big-endian. The format is self-delimiting: containers carry explicit end
//! markers (or an up-front count), strings carry a length.
//!
//! # Markers
//!
//! ```text
//! Z          null
//! T / F      true / false
//! i I l L    int8 / int16 / int32 / int64
//! U          uint8                      (read only)
//! d D        float32 / float64          (float32 read only)
//! C          char, one byte             (read only)
//! H          high-precision decimal     (read only)
//! S          string: length + UTF-8
//! [ ... ]    array
//! { ... }    object: (length + UTF-8 name, value)*
//! N          no-op, skipped             (read only)
//!
//! Optimized containers (read only), directly after [ or {:
//!   $ <type>  # <count>    every element shares <type>, no end marker
//!   # <count>              <count> elements, no end marker
//! ```
//!
//! Lengths and counts are themselves marked integers.

mod reader;
mod writer;

pub use reader::{BinaryReader, MAX_DEPTH};
pub use writer::BinaryWriter;

use crate::error::{CodecError, Result};
use crate::value::Value;

pub(crate) const NULL: u8 = b'Z';
pub(crate) const TRUE: u8 = b'T';
pub(crate) const FALSE: u8 = b'F';
pub(crate) const INT8: u8 = b'i';
pub(crate) const UINT8: u8 = b'U';
pub(crate) const INT16: u8 = b'I';
pub(crate) const INT32: u8 = b'l';
pub(crate) const INT64: u8 = b'L';
pub(crate) const FLOAT32: u8 = b'd';
pub(crate) const FLOAT64: u8 = b'D';
pub(crate) const CHAR: u8 = b'C';
pub(crate) const HIGH_PRECISION: u8 = b'H';
pub(crate) const STRING: u8 = b'S';
pub(crate) const ARRAY_START: u8 = b'[';
pub(crate) const ARRAY_END: u8 = b']';
pub(crate) const OBJECT_START: u8 = b'{';
pub(crate) const OBJECT_END: u8 = b'}';
pub(crate) const NOOP: u8 = b'N';
pub(crate) const CONTAINER_TYPE: u8 = b'$';
pub(crate) const CONTAINER_COUNT: u8 = b'#';

/// Encode a value as a complete binary document
pub fn to_binary(value: &Value, compact_integers: bool) -> Result<Vec<u8>> {
    let mut writer = BinaryWriter::new(Vec::new()).compact_integers(compact_integers);
    writer.write_value(value)?;
    Ok(writer.into_inner())
}

/// Decode a complete binary document.
///
/// The buffer must hold exactly one document; trailing bytes are an error.
pub fn from_binary(bytes: &[u8]) -> Result<Value> {
    let mut reader = BinaryReader::new(bytes);
    let value = reader.read_value()?;
    let consumed = reader.position();
    if consumed != bytes.len() as u64 {
        return Err(CodecError::parse(
            consumed,
            format!("{} trailing bytes after document", bytes.len() as u64 - consumed),
        ));
    }
    Ok(value)
}
