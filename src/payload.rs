//! Self-describing payload codec.
//!
//! A payload is an opcode plus a flat parameter stream. Each parameter is a
//! `u32` little-endian length followed by that many value bytes; the wire
//! carries no type tag, so the reader's call site fixes the interpretation.
//! Integers are little-endian two's complement at the width of the record,
//! floats are IEEE-754 little-endian, booleans a single 0x00/0x01 byte,
//! strings UTF-8 without a terminator.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Error, Result};

/// Application-defined operation code.
pub type OpCode = u16;

/// Byte width of a parameter record's length prefix.
const LENGTH_PREFIX_SIZE: usize = 4;

/// Plaintext of one record: an opcode plus its parameter stream.
///
/// Wire layout: big-endian `op_code` followed by the raw parameter bytes.
/// The enclosing frame bounds the total length, so `parameters` is simply
/// the tail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    /// Application-defined tag for this message.
    pub op_code: OpCode,
    /// Concatenated parameter records, opaque until read.
    pub parameters: Bytes,
}

impl Payload {
    /// Serializes the payload to wire bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = BytesMut::with_capacity(2 + self.parameters.len());
        buf.put_u16(self.op_code);
        buf.put_slice(&self.parameters);
        buf.to_vec()
    }

    /// Parses a payload from wire bytes, capturing everything after the
    /// opcode as the parameter stream.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        if data.len() < 2 {
            return Err(Error::malformed("payload shorter than its opcode"));
        }
        Ok(Self {
            op_code: u16::from_be_bytes([data[0], data[1]]),
            parameters: Bytes::copy_from_slice(&data[2..]),
        })
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A value that can be appended to a payload as one parameter record.
///
/// Implemented for booleans, fixed-width integers, floats, strings, and
/// byte buffers; the encoded width is what later distinguishes e.g. an
/// `i16` record from an `i64` one.
pub trait Param: sealed::Sealed {
    #[doc(hidden)]
    fn put(&self, buf: &mut BytesMut);
}

/// A value that can be decoded from one parameter record.
pub trait FromParam: Sized + sealed::Sealed {
    #[doc(hidden)]
    fn from_param(value: &[u8]) -> Result<Self>;
}

macro_rules! numeric_param {
    ($($ty:ty => $width:literal),* $(,)?) => {$(
        impl sealed::Sealed for $ty {}

        impl Param for $ty {
            fn put(&self, buf: &mut BytesMut) {
                buf.put_u32_le(std::mem::size_of::<$ty>() as u32);
                buf.put_slice(&self.to_le_bytes());
            }
        }

        impl FromParam for $ty {
            fn from_param(value: &[u8]) -> Result<Self> {
                let bytes: [u8; std::mem::size_of::<$ty>()] =
                    value.try_into().map_err(|_| Error::WidthMismatch {
                        expected: $width,
                        actual: value.len(),
                    })?;
                Ok(<$ty>::from_le_bytes(bytes))
            }
        }
    )*};
}

numeric_param! {
    i8 => "1",
    u8 => "1",
    i16 => "2",
    u16 => "2",
    i32 => "4",
    u32 => "4",
    i64 => "8",
    u64 => "8",
    f32 => "4",
    f64 => "8",
}

impl sealed::Sealed for bool {}

impl Param for bool {
    fn put(&self, buf: &mut BytesMut) {
        buf.put_u32_le(1);
        buf.put_u8(u8::from(*self));
    }
}

impl FromParam for bool {
    fn from_param(value: &[u8]) -> Result<Self> {
        match value {
            [0x00] => Ok(false),
            [0x01] => Ok(true),
            [byte] => Err(Error::InvalidBool(*byte)),
            _ => Err(Error::WidthMismatch {
                expected: "1",
                actual: value.len(),
            }),
        }
    }
}

fn put_raw(buf: &mut BytesMut, value: &[u8]) {
    debug_assert!(value.len() <= u32::MAX as usize);
    buf.put_u32_le(value.len() as u32);
    buf.put_slice(value);
}

impl sealed::Sealed for &str {}

impl Param for &str {
    fn put(&self, buf: &mut BytesMut) {
        put_raw(buf, self.as_bytes());
    }
}

impl sealed::Sealed for String {}

impl Param for String {
    fn put(&self, buf: &mut BytesMut) {
        put_raw(buf, self.as_bytes());
    }
}

impl FromParam for String {
    fn from_param(value: &[u8]) -> Result<Self> {
        Ok(String::from_utf8(value.to_vec())?)
    }
}

impl sealed::Sealed for &[u8] {}

impl Param for &[u8] {
    fn put(&self, buf: &mut BytesMut) {
        put_raw(buf, self);
    }
}

impl sealed::Sealed for Vec<u8> {}

impl Param for Vec<u8> {
    fn put(&self, buf: &mut BytesMut) {
        put_raw(buf, self);
    }
}

impl FromParam for Vec<u8> {
    fn from_param(value: &[u8]) -> Result<Self> {
        Ok(value.to_vec())
    }
}

impl sealed::Sealed for Bytes {}

impl Param for Bytes {
    fn put(&self, buf: &mut BytesMut) {
        put_raw(buf, self);
    }
}

impl FromParam for Bytes {
    fn from_param(value: &[u8]) -> Result<Self> {
        Ok(Bytes::copy_from_slice(value))
    }
}

/// Imperative constructor for a [`Payload`].
///
/// Each [`add_param`](Self::add_param) appends one parameter record;
/// [`build`](Self::build) consumes the builder.
#[derive(Debug)]
pub struct PayloadBuilder {
    op_code: OpCode,
    parameters: BytesMut,
}

impl PayloadBuilder {
    /// Starts a payload for the given opcode.
    pub fn new(op_code: OpCode) -> Self {
        Self {
            op_code,
            parameters: BytesMut::new(),
        }
    }

    /// Appends one parameter record.
    pub fn add_param<T: Param>(mut self, value: T) -> Self {
        value.put(&mut self.parameters);
        self
    }

    /// Builds the final payload.
    pub fn build(self) -> Payload {
        Payload {
            op_code: self.op_code,
            parameters: self.parameters.freeze(),
        }
    }
}

/// Cursor over a payload's parameter stream.
///
/// Reads advance strictly in order; a failed read leaves the cursor where
/// it was.
pub struct PayloadReader<'a> {
    parameters: &'a [u8],
    cursor: usize,
}

impl<'a> PayloadReader<'a> {
    /// Positions a reader at the payload's first parameter.
    pub fn new(payload: &'a Payload) -> Self {
        Self {
            parameters: &payload.parameters,
            cursor: 0,
        }
    }

    /// Whether any bytes remain past the cursor.
    pub fn has_more(&self) -> bool {
        self.cursor < self.parameters.len()
    }

    /// Value length of the next record, without advancing.
    pub fn peek_next_param_size(&self) -> Result<usize> {
        let remaining = &self.parameters[self.cursor..];
        if remaining.len() < LENGTH_PREFIX_SIZE {
            return Err(Error::Truncated {
                needed: LENGTH_PREFIX_SIZE,
                remaining: remaining.len(),
            });
        }
        let mut prefix = remaining;
        Ok(prefix.get_u32_le() as usize)
    }

    /// The next record's value bytes and the cursor position past them.
    fn peek_value(&self) -> Result<(&'a [u8], usize)> {
        let length = self.peek_next_param_size()?;
        let start = self.cursor + LENGTH_PREFIX_SIZE;
        let remaining = self.parameters.len() - start;
        if length > remaining {
            return Err(Error::Truncated {
                needed: length,
                remaining,
            });
        }
        Ok((&self.parameters[start..start + length], start + length))
    }

    /// Decodes the next record as `T` and advances past it.
    pub fn read_param<T: FromParam>(&mut self) -> Result<T> {
        let (value, end) = self.peek_value()?;
        let decoded = T::from_param(value)?;
        self.cursor = end;
        Ok(decoded)
    }

    /// Reads a signed integer whose width comes from the record itself.
    pub fn read_int(&mut self) -> Result<i64> {
        match self.peek_next_param_size()? {
            1 => self.read_param::<i8>().map(i64::from),
            2 => self.read_param::<i16>().map(i64::from),
            4 => self.read_param::<i32>().map(i64::from),
            8 => self.read_param::<i64>(),
            actual => Err(Error::WidthMismatch {
                expected: "1, 2, 4, or 8",
                actual,
            }),
        }
    }

    /// Reads an unsigned integer whose width comes from the record itself.
    pub fn read_uint(&mut self) -> Result<u64> {
        match self.peek_next_param_size()? {
            1 => self.read_param::<u8>().map(u64::from),
            2 => self.read_param::<u16>().map(u64::from),
            4 => self.read_param::<u32>().map(u64::from),
            8 => self.read_param::<u64>(),
            actual => Err(Error::WidthMismatch {
                expected: "1, 2, 4, or 8",
                actual,
            }),
        }
    }

    /// Reads a float whose width comes from the record itself.
    pub fn read_float(&mut self) -> Result<f64> {
        match self.peek_next_param_size()? {
            4 => self.read_param::<f32>().map(f64::from),
            8 => self.read_param::<f64>(),
            actual => Err(Error::WidthMismatch {
                expected: "4 or 8",
                actual,
            }),
        }
    }
}
