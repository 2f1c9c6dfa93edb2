use bytes::{
    BufMut as _,
    Bytes,
    BytesMut,
};

use crate::{
    varint::{
        zigzag_encode_32,
        zigzag_encode_64,
    },
    wire_type::{
        key,
        MAX_FIELD_NUMBER,
        MIN_FIELD_NUMBER,
    },
    EncodeError,
    WireType,
};

/// The largest length prefix the writer will emit.
pub const MAX_LENGTH: usize = i32::MAX as usize;

/// An append-only sink for protobuf wire data.
///
/// Primitive writes return `&mut Self` so they can be chained. Writes that validate
/// their input (tags and length prefixes) return a `Result` wrapping the same.
///
/// Submessages are framed with [`Writer::fork`] and [`Writer::ldelim`]: everything
/// written between the two calls is prefixed with its length once the block is
/// closed.
///
/// # Examples
/// ```
/// use v4_wire::{
///     WireType,
///     Writer,
/// };
///
/// let mut writer = Writer::new();
/// writer.write_tag(1, WireType::LengthDelimited)?.fork();
/// writer.write_tag(2, WireType::Varint)?.write_varint(150);
/// writer.ldelim()?;
/// assert_eq!(&[0x0a, 0x03, 0x10, 0x96, 0x01][..], &writer.finish()?[..]);
/// # Ok::<(), v4_wire::EncodeError>(())
/// ```
#[derive(Debug, Default)]
pub struct Writer {
    buf: BytesMut,
    forks: Vec<usize>,
}

impl Writer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            forks: Vec::new(),
        }
    }

    /// The number of bytes written so far, including those of open forks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Writes the key `(field_number << 3) | wire_type` as a varint.
    ///
    /// # Errors
    /// Returns an error if `field_number` is outside `1..=2^29-1`.
    pub fn write_tag(
        &mut self,
        field_number: u32,
        wire_type: WireType,
    ) -> Result<&mut Self, EncodeError> {
        if !(MIN_FIELD_NUMBER..=MAX_FIELD_NUMBER).contains(&field_number) {
            return Err(EncodeError::field_number_out_of_range(field_number));
        }
        Ok(self.write_varint(key(field_number, wire_type)))
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "each byte only carries the low seven bits"
    )]
    pub fn write_varint(&mut self, mut value: u64) -> &mut Self {
        while value >= 0x80 {
            self.buf.put_u8((value as u8 & 0x7f) | 0x80);
            value >>= 7;
        }
        self.buf.put_u8(value as u8);
        self
    }

    /// Writes `value` zig-zag mapped, as used by `sint64` fields.
    pub fn write_zigzag(&mut self, value: i64) -> &mut Self {
        self.write_varint(zigzag_encode_64(value))
    }

    /// Writes `value` zig-zag mapped, as used by `sint32` fields.
    pub fn write_zigzag32(&mut self, value: i32) -> &mut Self {
        self.write_varint(u64::from(zigzag_encode_32(value)))
    }

    pub fn write_fixed32(&mut self, value: u32) -> &mut Self {
        self.buf.put_u32_le(value);
        self
    }

    pub fn write_fixed64(&mut self, value: u64) -> &mut Self {
        self.buf.put_u64_le(value);
        self
    }

    pub fn write_sfixed32(&mut self, value: i32) -> &mut Self {
        self.buf.put_i32_le(value);
        self
    }

    pub fn write_sfixed64(&mut self, value: i64) -> &mut Self {
        self.buf.put_i64_le(value);
        self
    }

    pub fn write_float(&mut self, value: f32) -> &mut Self {
        self.buf.put_f32_le(value);
        self
    }

    pub fn write_double(&mut self, value: f64) -> &mut Self {
        self.buf.put_f64_le(value);
        self
    }

    pub fn write_uint32(&mut self, value: u32) -> &mut Self {
        self.write_varint(u64::from(value))
    }

    /// Writes an `int32` value.
    ///
    /// Negative values are sign-extended to 64 bits and so always take ten bytes.
    pub fn write_int32(&mut self, value: i32) -> &mut Self {
        self.write_int64(i64::from(value))
    }

    pub fn write_uint64(&mut self, value: u64) -> &mut Self {
        self.write_varint(value)
    }

    #[expect(
        clippy::cast_sign_loss,
        reason = "int64 is written as its two's complement bit pattern"
    )]
    pub fn write_int64(&mut self, value: i64) -> &mut Self {
        self.write_varint(value as u64)
    }

    pub fn write_bool(&mut self, value: bool) -> &mut Self {
        self.write_varint(u64::from(value))
    }

    /// Writes `bytes` prefixed with their length.
    ///
    /// # Errors
    /// Returns an error if `bytes` is longer than [`MAX_LENGTH`].
    pub fn write_length_delimited(&mut self, bytes: &[u8]) -> Result<&mut Self, EncodeError> {
        self.write_length(bytes.len())?;
        self.buf.put_slice(bytes);
        Ok(self)
    }

    /// Writes the utf8 bytes of `value` prefixed with their length.
    ///
    /// # Errors
    /// See [`Writer::write_length_delimited`].
    pub fn write_string(&mut self, value: &str) -> Result<&mut Self, EncodeError> {
        self.write_length_delimited(value.as_bytes())
    }

    /// Alias of [`Writer::write_length_delimited`] for `bytes` fields.
    ///
    /// # Errors
    /// See [`Writer::write_length_delimited`].
    pub fn write_bytes(&mut self, value: &[u8]) -> Result<&mut Self, EncodeError> {
        self.write_length_delimited(value)
    }

    /// Writes a repeated scalar field in packed form: one tag, then a single
    /// length-delimited block holding every element back to back.
    ///
    /// Nothing is written if `elements` is empty.
    ///
    /// # Errors
    /// Returns an error if `field_number` is invalid or the block is too long.
    pub fn write_packed<T, F>(
        &mut self,
        field_number: u32,
        elements: &[T],
        mut write_element: F,
    ) -> Result<&mut Self, EncodeError>
    where
        F: for<'w> FnMut(&'w mut Self, &T) -> &'w mut Self,
    {
        if elements.is_empty() {
            return Ok(self);
        }
        self.write_tag(field_number, WireType::LengthDelimited)?.fork();
        for element in elements {
            write_element(self, element);
        }
        self.ldelim()
    }

    /// Opens a length-delimited block.
    pub fn fork(&mut self) -> &mut Self {
        self.forks.push(self.buf.len());
        self
    }

    /// Closes the most recently opened block, prefixing its contents with their length.
    ///
    /// # Errors
    /// Returns an error if no block is open, or if the block is longer than
    /// [`MAX_LENGTH`].
    pub fn ldelim(&mut self) -> Result<&mut Self, EncodeError> {
        let start = self.forks.pop().ok_or_else(EncodeError::no_open_fork)?;
        let body = self.buf.split_off(start);
        self.write_length(body.len())?;
        self.buf.unsplit(body);
        Ok(self)
    }

    /// Consumes the writer, returning everything written.
    ///
    /// # Errors
    /// Returns an error if a block opened by [`Writer::fork`] was never closed.
    pub fn finish(self) -> Result<Bytes, EncodeError> {
        if !self.forks.is_empty() {
            return Err(EncodeError::unclosed_forks(self.forks.len()));
        }
        Ok(self.buf.freeze())
    }

    fn write_length(&mut self, length: usize) -> Result<&mut Self, EncodeError> {
        if length > MAX_LENGTH {
            return Err(EncodeError::length_out_of_range(length));
        }
        Ok(self.write_varint(length as u64))
    }
}
