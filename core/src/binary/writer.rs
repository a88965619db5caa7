//! Binary document writer

use super::*;
use crate::value::Object;
use byteorder::{BigEndian, WriteBytesExt};
use std::io::{self, Write};

/// Writer for the binary form
pub struct BinaryWriter<W: Write> {
    writer: W,
    compact_integers: bool,
}

impl<W: Write> BinaryWriter<W> {
    /// Create a new binary writer (compact integers enabled)
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            compact_integers: true,
        }
    }

    /// Write every integer with the smallest marker that holds it, or always
    /// as int64 when disabled.
    pub fn compact_integers(mut self, enabled: bool) -> Self {
        self.compact_integers = enabled;
        self
    }

    /// Write one marked value, recursing into containers
    pub fn write_value(&mut self, value: &Value) -> io::Result<()> {
        match value {
            Value::Null => self.writer.write_u8(NULL),
            Value::Bool(true) => self.writer.write_u8(TRUE),
            Value::Bool(false) => self.writer.write_u8(FALSE),
            Value::Int(v) => self.write_int(*v),
            Value::Float(v) => {
                self.writer.write_u8(FLOAT64)?;
                self.writer.write_f64::<BigEndian>(*v)
            }
            Value::String(s) => {
                self.writer.write_u8(STRING)?;
                self.write_str(s)
            }
            Value::Array(items) => {
                self.writer.write_u8(ARRAY_START)?;
                for item in items {
                    self.write_value(item)?;
                }
                self.writer.write_u8(ARRAY_END)
            }
            Value::Object(obj) => self.write_object(obj),
        }
    }

    fn write_object(&mut self, obj: &Object) -> io::Result<()> {
        self.writer.write_u8(OBJECT_START)?;
        for (name, value) in obj.iter() {
            // Field names are unmarked strings
            self.write_str(name)?;
            self.write_value(value)?;
        }
        self.writer.write_u8(OBJECT_END)
    }

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.write_int(s.len() as i64)?;
        self.writer.write_all(s.as_bytes())
    }

    fn write_int(&mut self, v: i64) -> io::Result<()> {
        if !self.compact_integers {
            self.writer.write_u8(INT64)?;
            return self.writer.write_i64::<BigEndian>(v);
        }
        if let Ok(v) = i8::try_from(v) {
            self.writer.write_u8(INT8)?;
            self.writer.write_i8(v)
        } else if let Ok(v) = i16::try_from(v) {
            self.writer.write_u8(INT16)?;
            self.writer.write_i16::<BigEndian>(v)
        } else if let Ok(v) = i32::try_from(v) {
            self.writer.write_u8(INT32)?;
            self.writer.write_i32::<BigEndian>(v)
        } else {
            self.writer.write_u8(INT64)?;
            self.writer.write_i64::<BigEndian>(v)
        }
    }

    /// Consume the writer and return the inner writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}
