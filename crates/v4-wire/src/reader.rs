use tracing::trace;

use crate::{
    varint::{
        zigzag_decode_32,
        zigzag_decode_64,
        MAX_VARINT_LEN,
    },
    DecodeError,
    Tag,
    WireType,
};

/// How deeply messages (and groups) may nest before decoding is aborted.
pub const DEFAULT_RECURSION_LIMIT: u32 = 100;

/// A cursor over protobuf wire data.
///
/// The reader borrows its input; length-delimited values are returned as views
/// into it without copying. Nested messages are decoded against the same reader
/// with an end bound computed by [`Reader::limit`].
#[derive(Clone, Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
    recursion_limit: u32,
    depth: u32,
}

impl<'a> Reader<'a> {
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            depth: 0,
        }
    }

    #[must_use]
    pub fn with_recursion_limit(mut self, recursion_limit: u32) -> Self {
        self.recursion_limit = recursion_limit;
        self
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The length of the whole underlying buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    /// Returns the absolute end bound of a value of `length` bytes starting at the
    /// current position.
    ///
    /// # Errors
    /// Returns an error if fewer than `length` bytes remain.
    pub fn limit(&self, length: u64) -> Result<usize, DecodeError> {
        usize::try_from(length)
            .ok()
            .and_then(|length| self.pos.checked_add(length))
            .filter(|end| *end <= self.buf.len())
            .ok_or_else(|| DecodeError::length_overrun(self.pos, length, self.buf.len()))
    }

    /// Reads a field key.
    ///
    /// # Errors
    /// Returns an error if the key is not a valid varint, names an unknown wire
    /// type, or carries a field number outside `1..=2^29-1`.
    pub fn read_tag(&mut self) -> Result<Tag, DecodeError> {
        Tag::from_key(self.read_varint()?)
    }

    /// Reads a base-128 varint of at most ten bytes.
    ///
    /// # Errors
    /// Returns an error if the input ends mid-varint, or if the varint runs past
    /// ten bytes or its tenth byte carries more than the final bit of a 64-bit value.
    pub fn read_varint(&mut self) -> Result<u64, DecodeError> {
        let start = self.pos;
        let mut value = 0u64;
        for index in 0..MAX_VARINT_LEN {
            let Some(&byte) = self.buf.get(self.pos) else {
                return Err(DecodeError::truncated(index + 1, index));
            };
            self.pos += 1;
            if index == MAX_VARINT_LEN - 1 && byte > 1 {
                return Err(DecodeError::malformed_varint(start));
            }
            value |= u64::from(byte & 0x7f) << (7 * index);
            if byte < 0x80 {
                return Ok(value);
            }
        }
        Err(DecodeError::malformed_varint(start))
    }

    /// Reads a `uint32`, keeping the low 32 bits of the varint.
    ///
    /// # Errors
    /// See [`Reader::read_varint`].
    #[expect(
        clippy::cast_possible_truncation,
        reason = "32-bit varint fields are truncated on decode"
    )]
    pub fn read_uint32(&mut self) -> Result<u32, DecodeError> {
        self.read_varint().map(|value| value as u32)
    }

    /// Reads an `int32`, keeping the low 32 bits of the (sign-extended) varint.
    ///
    /// # Errors
    /// See [`Reader::read_varint`].
    #[expect(
        clippy::cast_possible_truncation,
        reason = "32-bit varint fields are truncated on decode"
    )]
    pub fn read_int32(&mut self) -> Result<i32, DecodeError> {
        self.read_int64().map(|value| value as i32)
    }

    /// # Errors
    /// See [`Reader::read_varint`].
    pub fn read_uint64(&mut self) -> Result<u64, DecodeError> {
        self.read_varint()
    }

    /// # Errors
    /// See [`Reader::read_varint`].
    #[expect(
        clippy::cast_possible_wrap,
        reason = "int64 is read back from its two's complement bit pattern"
    )]
    pub fn read_int64(&mut self) -> Result<i64, DecodeError> {
        self.read_varint().map(|value| value as i64)
    }

    /// Reads a `bool`; any non-zero varint is `true`.
    ///
    /// # Errors
    /// See [`Reader::read_varint`].
    pub fn read_bool(&mut self) -> Result<bool, DecodeError> {
        self.read_varint().map(|value| value != 0)
    }

    /// Reads a zig-zag mapped `sint64`.
    ///
    /// # Errors
    /// See [`Reader::read_varint`].
    pub fn read_zigzag(&mut self) -> Result<i64, DecodeError> {
        self.read_varint().map(zigzag_decode_64)
    }

    /// Reads a zig-zag mapped `sint32`.
    ///
    /// # Errors
    /// See [`Reader::read_varint`].
    #[expect(
        clippy::cast_possible_truncation,
        reason = "32-bit varint fields are truncated on decode"
    )]
    pub fn read_zigzag32(&mut self) -> Result<i32, DecodeError> {
        self.read_varint()
            .map(|value| zigzag_decode_32(value as u32))
    }

    /// # Errors
    /// Returns an error if fewer than 4 bytes remain.
    pub fn read_fixed32(&mut self) -> Result<u32, DecodeError> {
        self.take_array().map(u32::from_le_bytes)
    }

    /// # Errors
    /// Returns an error if fewer than 8 bytes remain.
    pub fn read_fixed64(&mut self) -> Result<u64, DecodeError> {
        self.take_array().map(u64::from_le_bytes)
    }

    /// # Errors
    /// Returns an error if fewer than 4 bytes remain.
    pub fn read_sfixed32(&mut self) -> Result<i32, DecodeError> {
        self.take_array().map(i32::from_le_bytes)
    }

    /// # Errors
    /// Returns an error if fewer than 8 bytes remain.
    pub fn read_sfixed64(&mut self) -> Result<i64, DecodeError> {
        self.take_array().map(i64::from_le_bytes)
    }

    /// # Errors
    /// Returns an error if fewer than 4 bytes remain.
    pub fn read_float(&mut self) -> Result<f32, DecodeError> {
        self.take_array().map(f32::from_le_bytes)
    }

    /// # Errors
    /// Returns an error if fewer than 8 bytes remain.
    pub fn read_double(&mut self) -> Result<f64, DecodeError> {
        self.take_array().map(f64::from_le_bytes)
    }

    /// Reads a length prefix and returns a view of the bytes it covers.
    ///
    /// # Errors
    /// Returns an error if the prefix is malformed or claims more bytes than remain.
    pub fn read_length_delimited(&mut self) -> Result<&'a [u8], DecodeError> {
        let length = self.read_varint()?;
        let end = self.limit(length)?;
        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Reads a length-delimited value and validates it as utf8.
    ///
    /// # Errors
    /// Returns an error if the value is not framed correctly or is not valid utf8.
    pub fn read_string(&mut self) -> Result<&'a str, DecodeError> {
        let bytes = self.read_length_delimited()?;
        std::str::from_utf8(bytes).map_err(DecodeError::invalid_utf8)
    }

    /// Skips over the value of a field whose tag was just read.
    ///
    /// Groups are skipped up to their matching end-group tag.
    ///
    /// # Errors
    /// Returns an error if the value is truncated or malformed, or if `tag` is an
    /// end-group with no open group.
    pub fn skip(&mut self, tag: Tag) -> Result<(), DecodeError> {
        trace!(
            field_number = tag.field_number(),
            wire_type = %tag.wire_type(),
            position = self.pos,
            "skipping field",
        );
        match tag.wire_type() {
            WireType::Varint => {
                self.read_varint()?;
            }
            WireType::SixtyFourBit => self.advance(8)?,
            WireType::LengthDelimited => {
                self.read_length_delimited()?;
            }
            WireType::StartGroup => self.skip_group(tag.field_number())?,
            WireType::EndGroup => {
                return Err(DecodeError::unexpected_end_group(tag.field_number()));
            }
            WireType::ThirtyTwoBit => self.advance(4)?,
        }
        Ok(())
    }

    /// Enters a nested message, failing if the recursion limit is reached.
    pub(crate) fn descend(&mut self) -> Result<(), DecodeError> {
        if self.depth >= self.recursion_limit {
            return Err(DecodeError::recursion_limit_reached(self.recursion_limit));
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn skip_group(&mut self, field_number: u32) -> Result<(), DecodeError> {
        let mut open = vec![field_number];
        while let Some(&innermost) = open.last() {
            let tag = self.read_tag()?;
            match tag.wire_type() {
                WireType::StartGroup => {
                    let depth = u32::try_from(open.len()).unwrap_or(u32::MAX);
                    if self.depth.saturating_add(depth) >= self.recursion_limit {
                        return Err(DecodeError::recursion_limit_reached(self.recursion_limit));
                    }
                    open.push(tag.field_number());
                }
                WireType::EndGroup if tag.field_number() == innermost => {
                    open.pop();
                }
                WireType::EndGroup => {
                    return Err(DecodeError::unexpected_end_group(tag.field_number()));
                }
                _ => self.skip(tag)?,
            }
        }
        Ok(())
    }

    fn advance(&mut self, count: usize) -> Result<(), DecodeError> {
        if self.remaining() < count {
            return Err(DecodeError::truncated(count, self.remaining()));
        }
        self.pos += count;
        Ok(())
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let remaining = self.remaining();
        let array = self
            .buf
            .get(self.pos..)
            .and_then(|rest| rest.first_chunk::<N>())
            .copied()
            .ok_or_else(|| DecodeError::truncated(N, remaining))?;
        self.pos += N;
        Ok(array)
    }
}
