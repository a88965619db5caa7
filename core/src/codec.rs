//! State codec
//!
//! Explicit mapping between [`GeneratorState`] and its structured value, plus
//! a small facade bundling the text, binary and compression passes with the
//! options they take.

use crate::binary;
use crate::compress;
use crate::error::{CodecError, Result};
use crate::state::GeneratorState;
use crate::text;
use crate::value::{Object, Value};

/// Field holding word 0
pub const FIELD_STATE0: &str = "state0";

/// Field holding word 1
pub const FIELD_STATE1: &str = "state1";

/// Map a state to an object with `state0` then `state1`, each word stored as
/// a signed 64-bit integer with the same bit pattern.
pub fn encode_structured(state: &GeneratorState) -> Value {
    let (s0, s1) = state.signed_words();
    let mut obj = Object::with_capacity(2);
    obj.insert(FIELD_STATE0, s0);
    obj.insert(FIELD_STATE1, s1);
    Value::Object(obj)
}

/// Rebuild a state from its structured value.
///
/// Extra fields are ignored.
pub fn decode_structured(value: &Value) -> Result<GeneratorState> {
    let obj = value.as_object().ok_or(CodecError::TypeMismatch {
        field: "<root>",
        expected: "object",
        found: value.kind(),
    })?;
    let state0 = word(obj, FIELD_STATE0)?;
    let state1 = word(obj, FIELD_STATE1)?;
    Ok(GeneratorState::new(state0, state1))
}

fn word(obj: &Object, field: &'static str) -> Result<u64> {
    let value = obj.get(field).ok_or(CodecError::MissingField(field))?;
    value
        .as_i64()
        .map(|v| v as u64)
        .ok_or(CodecError::TypeMismatch {
            field,
            expected: "integer",
            found: value.kind(),
        })
}

/// Options shared by every encode call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    /// Pretty-print the text form
    pub pretty_text: bool,
    /// Smallest integer markers in the binary form
    pub compact_integers: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            pretty_text: true,
            compact_integers: true,
        }
    }
}

/// Stateless bundle of encode/decode passes
#[derive(Debug, Clone, Copy, Default)]
pub struct StateCodec {
    options: CodecOptions,
}

impl StateCodec {
    pub fn new(options: CodecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> CodecOptions {
        self.options
    }

    pub fn encode_structured(&self, state: &GeneratorState) -> Value {
        encode_structured(state)
    }

    pub fn decode_structured(&self, value: &Value) -> Result<GeneratorState> {
        decode_structured(value)
    }

    pub fn to_text(&self, value: &Value) -> Result<String> {
        text::to_text(value, self.options.pretty_text)
    }

    pub fn from_text(&self, text: &str) -> Result<Value> {
        text::from_text(text)
    }

    pub fn to_binary(&self, value: &Value) -> Result<Vec<u8>> {
        binary::to_binary(value, self.options.compact_integers)
    }

    pub fn from_binary(&self, bytes: &[u8]) -> Result<Value> {
        binary::from_binary(bytes)
    }

    pub fn compress(&self, bytes: &[u8]) -> Vec<u8> {
        compress::compress(bytes)
    }

    pub fn decompress(&self, frame: &[u8]) -> Result<Vec<u8>> {
        compress::decompress(frame)
    }
}
