//! Binary document reader
//!
//! Reads one marked value from any byte source. Truncation anywhere inside
//! the value is reported as a parse error carrying the byte offset.

use super::*;
use crate::value::Object;
use byteorder::{BigEndian, ByteOrder, ReadBytesExt};
use std::io::{self, Read};

/// Deepest container nesting accepted
pub const MAX_DEPTH: usize = 128;

/// Largest element count accepted for an optimized container
const MAX_CONTAINER_COUNT: u64 = 1 << 24;

/// Reader for the binary form
pub struct BinaryReader<R: Read> {
    reader: R,
    peeked: Option<u8>,
    position: u64,
    depth: usize,
}

impl<R: Read> BinaryReader<R> {
    /// Create a new binary reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            peeked: None,
            position: 0,
            depth: 0,
        }
    }

    /// Bytes consumed so far
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Read one complete value
    pub fn read_value(&mut self) -> Result<Value> {
        let marker = self.read_marker()?;
        self.read_typed(marker, self.position - 1)
    }

    /// Next marker byte, skipping no-ops
    fn read_marker(&mut self) -> Result<u8> {
        loop {
            let marker = self.next_byte()?;
            if marker != NOOP {
                return Ok(marker);
            }
        }
    }

    /// Payload of a value whose marker has already been consumed. `start` is
    /// where the value begins: its marker, or its payload inside a typed
    /// container.
    fn read_typed(&mut self, marker: u8, start: u64) -> Result<Value> {
        let value = match marker {
            NULL => Value::Null,
            TRUE => Value::Bool(true),
            FALSE => Value::Bool(false),
            INT8 | UINT8 | INT16 | INT32 | INT64 => Value::Int(self.read_int_payload(marker)?),
            FLOAT32 => {
                let mut buf = [0u8; 4];
                self.fill(&mut buf)?;
                Value::Float(BigEndian::read_f32(&buf) as f64)
            }
            FLOAT64 => {
                let mut buf = [0u8; 8];
                self.fill(&mut buf)?;
                Value::Float(BigEndian::read_f64(&buf))
            }
            CHAR => {
                let byte = self.next_byte()?;
                if !byte.is_ascii() {
                    return Err(CodecError::parse(start, format!("invalid char 0x{:02x}", byte)));
                }
                Value::String(char::from(byte).to_string())
            }
            STRING => Value::String(self.read_string()?),
            HIGH_PRECISION => {
                let digits = self.read_string()?;
                parse_high_precision(&digits)
                    .ok_or_else(|| CodecError::parse(start, format!("invalid number {:?}", digits)))?
            }
            ARRAY_START => self.read_array(start)?,
            OBJECT_START => self.read_object(start)?,
            other => {
                return Err(CodecError::parse(start, format!("unknown marker 0x{:02x}", other)));
            }
        };
        Ok(value)
    }

    fn read_array(&mut self, start: u64) -> Result<Value> {
        self.enter(start)?;
        let mut items = Vec::new();
        match self.read_container_header()? {
            Some((element_type, count)) => {
                items.reserve(count.min(1024) as usize);
                for _ in 0..count {
                    let item = match element_type {
                        Some(marker) => self.read_typed(marker, self.position)?,
                        None => self.read_value()?,
                    };
                    items.push(item);
                }
            }
            None => loop {
                let marker = self.read_marker()?;
                if marker == ARRAY_END {
                    break;
                }
                items.push(self.read_typed(marker, self.position - 1)?);
            },
        }
        self.depth -= 1;
        tracing::trace!(len = items.len(), "read array");
        Ok(Value::Array(items))
    }

    fn read_object(&mut self, start: u64) -> Result<Value> {
        self.enter(start)?;
        let mut obj = Object::new();
        match self.read_container_header()? {
            Some((element_type, count)) => {
                for _ in 0..count {
                    let marker = self.read_marker()?;
                    let name = self.read_name(marker)?;
                    let value = match element_type {
                        Some(marker) => self.read_typed(marker, self.position)?,
                        None => self.read_value()?,
                    };
                    obj.insert(name, value);
                }
            }
            None => loop {
                let marker = self.read_marker()?;
                if marker == OBJECT_END {
                    break;
                }
                let name = self.read_name(marker)?;
                let value = self.read_value()?;
                obj.insert(name, value);
            },
        }
        self.depth -= 1;
        tracing::trace!(len = obj.len(), "read object");
        Ok(Value::Object(obj))
    }

    /// Optional `$type #count` / `#count` header directly after a container
    /// start. `None` means the container runs until its end marker.
    fn read_container_header(&mut self) -> Result<Option<(Option<u8>, u64)>> {
        let element_type = match self.peek_byte()? {
            CONTAINER_TYPE => {
                self.next_byte()?;
                let marker = self.next_byte()?;
                // Every element must consume input, or a short header could
                // declare millions of them
                if matches!(
                    marker,
                    NOOP | NULL | TRUE | FALSE | CONTAINER_TYPE | CONTAINER_COUNT
                ) {
                    return Err(CodecError::parse(
                        self.position - 1,
                        format!("invalid container element type 0x{:02x}", marker),
                    ));
                }
                if self.peek_byte()? != CONTAINER_COUNT {
                    return Err(CodecError::parse(
                        self.position,
                        "container type without count",
                    ));
                }
                Some(marker)
            }
            CONTAINER_COUNT => None,
            _ => return Ok(None),
        };

        self.next_byte()?; // '#'
        let at = self.position;
        let count = self.read_length()?;
        if count > MAX_CONTAINER_COUNT {
            return Err(CodecError::parse(
                at,
                format!("container count {} exceeds {}", count, MAX_CONTAINER_COUNT),
            ));
        }
        Ok(Some((element_type, count)))
    }

    fn enter(&mut self, start: u64) -> Result<()> {
        if self.depth >= MAX_DEPTH {
            return Err(CodecError::parse(
                start,
                format!("nesting deeper than {}", MAX_DEPTH),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    /// Object field name: an unmarked string whose length marker is `marker`
    fn read_name(&mut self, marker: u8) -> Result<String> {
        let at = self.position.saturating_sub(1);
        let len = self.read_int_payload(marker)?;
        let len = u64::try_from(len)
            .map_err(|_| CodecError::parse(at, format!("negative length {}", len)))?;
        self.read_utf8(len)
    }

    /// Marked length followed by UTF-8 bytes
    fn read_string(&mut self) -> Result<String> {
        let len = self.read_length()?;
        self.read_utf8(len)
    }

    fn read_utf8(&mut self, len: u64) -> Result<String> {
        let start = self.position;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes).map_err(|e| CodecError::parse(start, e.to_string()))
    }

    /// Marked non-negative integer
    fn read_length(&mut self) -> Result<u64> {
        let at = self.position;
        let marker = self.read_marker()?;
        let len = self.read_int_payload(marker)?;
        u64::try_from(len).map_err(|_| CodecError::parse(at, format!("negative length {}", len)))
    }

    fn read_int_payload(&mut self, marker: u8) -> Result<i64> {
        let at = self.position.saturating_sub(1);
        let value = match marker {
            INT8 => self.next_byte()? as i8 as i64,
            UINT8 => self.next_byte()? as i64,
            INT16 => {
                let mut buf = [0u8; 2];
                self.fill(&mut buf)?;
                BigEndian::read_i16(&buf) as i64
            }
            INT32 => {
                let mut buf = [0u8; 4];
                self.fill(&mut buf)?;
                BigEndian::read_i32(&buf) as i64
            }
            INT64 => {
                let mut buf = [0u8; 8];
                self.fill(&mut buf)?;
                BigEndian::read_i64(&buf)
            }
            other => {
                return Err(CodecError::parse(
                    at,
                    format!("expected integer marker, found 0x{:02x}", other),
                ));
            }
        };
        Ok(value)
    }

    // =========================================================================
    // Byte-level access
    // =========================================================================

    fn next_byte(&mut self) -> Result<u8> {
        let byte = match self.peeked.take() {
            Some(byte) => byte,
            None => self.reader.read_u8().map_err(|e| self.io_error(e))?,
        };
        self.position += 1;
        Ok(byte)
    }

    fn peek_byte(&mut self) -> Result<u8> {
        if let Some(byte) = self.peeked {
            return Ok(byte);
        }
        let byte = self.reader.read_u8().map_err(|e| self.io_error(e))?;
        self.peeked = Some(byte);
        Ok(byte)
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut offset = 0;
        if !buf.is_empty()
            && let Some(byte) = self.peeked.take()
        {
            buf[0] = byte;
            self.position += 1;
            offset = 1;
        }
        self.reader
            .read_exact(&mut buf[offset..])
            .map_err(|e| self.io_error(e))?;
        self.position += (buf.len() - offset) as u64;
        Ok(())
    }

    /// Read exactly `len` bytes without trusting `len` for the allocation
    fn read_bytes(&mut self, len: u64) -> Result<Vec<u8>> {
        let start = self.position;
        let mut bytes = Vec::new();
        let mut remaining = len;
        if remaining > 0
            && let Some(byte) = self.peeked.take()
        {
            bytes.push(byte);
            remaining -= 1;
        }
        let read = (&mut self.reader).take(remaining).read_to_end(&mut bytes);
        read.map_err(|e| self.io_error(e))?;
        if (bytes.len() as u64) < len {
            return Err(CodecError::parse(
                start,
                format!("length {} exceeds remaining {} bytes", len, bytes.len()),
            ));
        }
        self.position += len;
        Ok(bytes)
    }

    fn io_error(&self, e: io::Error) -> CodecError {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            CodecError::parse(self.position, "unexpected end of document")
        } else {
            CodecError::Io(e)
        }
    }
}

/// `H` payloads: integers first (with bit-pattern reuse above i64::MAX),
/// then decimals.
fn parse_high_precision(digits: &str) -> Option<Value> {
    if let Ok(v) = digits.parse::<i64>() {
        return Some(Value::Int(v));
    }
    if let Ok(v) = digits.parse::<u64>() {
        return Some(Value::Int(v as i64));
    }
    digits
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Value::Float)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> Result<Value> {
        BinaryReader::new(bytes).read_value()
    }

    fn demo_bytes() -> Vec<u8> {
        let mut obj = Object::new();
        obj.insert("state0", 1311768467139281697i64);
        obj.insert("state1", 4294967295i64);
        to_binary(&Value::Object(obj), true).unwrap()
    }

    #[test]
    fn test_roundtrip_demo_object() {
        let bytes = demo_bytes();
        let value = from_binary(&bytes).unwrap();
        assert_eq!(value.get("state0"), Some(&Value::Int(1311768467139281697)));
        assert_eq!(value.get("state1"), Some(&Value::Int(4294967295)));
    }

    #[test]
    fn test_roundtrip_nested() {
        let mut inner = Object::new();
        inner.insert("pi", 3.25);
        inner.insert("tags", vec![Value::from("a"), Value::Null, Value::Bool(false)]);
        let mut outer = Object::new();
        outer.insert("inner", inner);
        outer.insert("n", -40_000i64);
        let value = Value::Object(outer);

        let bytes = to_binary(&value, true).unwrap();
        assert_eq!(from_binary(&bytes).unwrap(), value);
    }

    #[test]
    fn test_truncated_by_one_byte() {
        let bytes = demo_bytes();
        let err = from_binary(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(matches!(err, CodecError::Parse { .. }), "got {:?}", err);
    }

    #[test]
    fn test_every_truncation_fails() {
        let bytes = demo_bytes();
        for len in 0..bytes.len() {
            assert!(
                matches!(from_binary(&bytes[..len]), Err(CodecError::Parse { .. })),
                "prefix of {} bytes decoded",
                len
            );
        }
    }

    #[test]
    fn test_length_longer_than_buffer() {
        let err = decode(&[b'S', b'i', 10, b'a', b'b']).unwrap_err();
        match err {
            CodecError::Parse { offset, reason } => {
                assert_eq!(offset, 3);
                assert!(reason.contains("exceeds"), "{}", reason);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_length() {
        assert!(matches!(
            decode(&[b'S', b'i', 0xFF]),
            Err(CodecError::Parse { .. })
        ));
    }

    #[test]
    fn test_unknown_marker() {
        let err = decode(&[b'Q']).unwrap_err();
        assert!(err.to_string().contains("unknown marker 0x51"), "{}", err);
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut bytes = demo_bytes();
        bytes.push(b'Z');
        assert!(matches!(from_binary(&bytes), Err(CodecError::Parse { .. })));
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(matches!(
            decode(&[b'S', b'i', 2, 0xC3, 0x28]),
            Err(CodecError::Parse { .. })
        ));
    }

    #[test]
    fn test_noop_skipped() {
        let value = decode(&[b'N', b'[', b'N', b'i', 1, b'N', b']']).unwrap();
        assert_eq!(value, Value::Array(vec![Value::Int(1)]));
    }

    #[test]
    fn test_read_only_markers() {
        assert_eq!(decode(&[b'U', 200]).unwrap(), Value::Int(200));
        assert_eq!(
            decode(&[b'd', 0x3F, 0xC0, 0x00, 0x00]).unwrap(),
            Value::Float(1.5)
        );
        assert_eq!(decode(&[b'C', b'x']).unwrap(), Value::from("x"));

        let mut hp = vec![b'H', b'i', 20];
        hp.extend_from_slice(b"18446744073709551615");
        assert_eq!(decode(&hp).unwrap(), Value::Int(-1));
    }

    #[test]
    fn test_counted_array() {
        let value = decode(&[b'[', b'#', b'i', 2, b'i', 7, b'T']).unwrap();
        assert_eq!(value, Value::Array(vec![Value::Int(7), Value::Bool(true)]));
    }

    #[test]
    fn test_typed_counted_array() {
        let value = decode(&[b'[', b'$', b'i', b'#', b'i', 3, 1, 2, 3]).unwrap();
        assert_eq!(
            value,
            Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
    }

    #[test]
    fn test_typed_counted_object() {
        let bytes = [
            b'{', b'$', b'L', b'#', b'i', 1, b'i', 1, b'k', 0, 0, 0, 0, 0, 0, 0, 9,
        ];
        let value = decode(&bytes).unwrap();
        assert_eq!(value.get("k"), Some(&Value::Int(9)));
    }

    #[test]
    fn test_zero_width_element_type_rejected() {
        for marker in [b'Z', b'T', b'F'] {
            let array = [b'[', b'$', marker, b'#', b'l', 1, 0, 0, 0];
            let err = decode(&array).unwrap_err();
            assert!(err.to_string().contains("element type"), "{}", err);

            let object = [b'{', b'$', marker, b'#', b'i', 1, b'i', 1, b'k'];
            assert!(matches!(decode(&object), Err(CodecError::Parse { offset: 2, .. })));
        }
    }

    #[test]
    fn test_nested_zero_width_arrays_rejected() {
        let mut bytes = vec![b'[', b'#', b'i', 4];
        for _ in 0..4 {
            bytes.extend_from_slice(&[b'[', b'$', b'Z', b'#', b'l', 1, 0, 0, 0]);
        }
        assert!(matches!(from_binary(&bytes), Err(CodecError::Parse { .. })));
    }

    #[test]
    fn test_typed_element_error_offset() {
        // The element starts at its payload, there is no marker byte
        let err = decode(&[b'[', b'$', b'C', b'#', b'i', 2, b'a', 0xFF]).unwrap_err();
        match err {
            CodecError::Parse { offset, reason } => {
                assert_eq!(offset, 7);
                assert!(reason.contains("invalid char"), "{}", reason);
            }
            other => panic!("expected parse error, got {:?}", other),
        }

        let err = decode(&[b'[', b'C', 0xFF]).unwrap_err();
        assert!(matches!(err, CodecError::Parse { offset: 1, .. }), "{:?}", err);
    }

    #[test]
    fn test_type_without_count() {
        assert!(matches!(
            decode(&[b'[', b'$', b'i', b'i', 1]),
            Err(CodecError::Parse { .. })
        ));
    }

    #[test]
    fn test_unmatched_object_start() {
        let err = decode(&[b'{', b'i', 1, b'a', b'Z']).unwrap_err();
        assert!(err.to_string().contains("unexpected end"), "{}", err);
    }

    #[test]
    fn test_nesting_limit() {
        let mut bytes = vec![b'['; MAX_DEPTH + 1];
        bytes.extend(std::iter::repeat_n(b']', MAX_DEPTH + 1));
        let err = decode(&bytes).unwrap_err();
        assert!(err.to_string().contains("nesting"), "{}", err);

        let mut ok = vec![b'['; MAX_DEPTH];
        ok.extend(std::iter::repeat_n(b']', MAX_DEPTH));
        assert!(decode(&ok).is_ok());
    }
}
