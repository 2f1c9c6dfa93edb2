//! Encode and merge helpers for every field kind, shared by all message implementations.
//!
//! Each scalar kind module exposes the same set of functions:
//!
//! - `encode`: writes the field unless it is at its canonical zero;
//! - `encode_always`: writes the field unconditionally (map entries, explicit presence);
//! - `encode_optional`: writes the field if it is present;
//! - `encode_repeated`: writes all elements (packed for numeric kinds);
//! - `merge`, `merge_optional`, `merge_repeated`: the decoding counterparts. Repeated
//!   numeric fields accept both the packed and the unpacked form.
//!
//! A field arriving with a wire type that does not match its declaration is an error.

use crate::{
    DecodeError,
    EncodeError,
    Reader,
    Tag,
    WireType,
    Writer,
};

/// Reads a packed block of scalars, calling `read` until the block is exhausted.
fn merge_packed<T, F>(
    values: &mut Vec<T>,
    reader: &mut Reader<'_>,
    mut read: F,
) -> Result<(), DecodeError>
where
    F: FnMut(&mut Reader<'_>) -> Result<T, DecodeError>,
{
    let length = reader.read_varint()?;
    let end = reader.limit(length)?;
    while reader.position() < end {
        values.push(read(reader)?);
    }
    if reader.position() != end {
        return Err(DecodeError::end_mismatch(reader.position(), end));
    }
    Ok(())
}

macro_rules! scalar_kind {
    ($(#[$doc:meta])* $kind:ident, $ty:ty, $wire_type:expr, $write:ident, $read:ident) => {
        $(#[$doc])*
        pub mod $kind {
            use super::*;

            pub const WIRE_TYPE: WireType = $wire_type;

            /// # Errors
            /// Returns an error if `field_number` is out of range.
            pub fn encode(
                field_number: u32,
                value: &$ty,
                writer: &mut Writer,
            ) -> Result<(), EncodeError> {
                if *value != <$ty>::default() {
                    encode_always(field_number, value, writer)?;
                }
                Ok(())
            }

            /// # Errors
            /// Returns an error if `field_number` is out of range.
            pub fn encode_always(
                field_number: u32,
                value: &$ty,
                writer: &mut Writer,
            ) -> Result<(), EncodeError> {
                writer.write_tag(field_number, WIRE_TYPE)?.$write(*value);
                Ok(())
            }

            /// # Errors
            /// Returns an error if `field_number` is out of range.
            pub fn encode_optional(
                field_number: u32,
                value: &Option<$ty>,
                writer: &mut Writer,
            ) -> Result<(), EncodeError> {
                if let Some(value) = value {
                    encode_always(field_number, value, writer)?;
                }
                Ok(())
            }

            /// Writes `values` as a single packed block.
            ///
            /// # Errors
            /// Returns an error if `field_number` is out of range or the block is too long.
            pub fn encode_repeated(
                field_number: u32,
                values: &[$ty],
                writer: &mut Writer,
            ) -> Result<(), EncodeError> {
                writer.write_packed(field_number, values, |writer, value| writer.$write(*value))?;
                Ok(())
            }

            /// # Errors
            /// Returns an error if the wire type does not match or the value is malformed.
            pub fn merge(
                tag: Tag,
                value: &mut $ty,
                reader: &mut Reader<'_>,
            ) -> Result<(), DecodeError> {
                tag.expect_wire_type(WIRE_TYPE)?;
                *value = reader.$read()?;
                Ok(())
            }

            /// # Errors
            /// Returns an error if the wire type does not match or the value is malformed.
            pub fn merge_optional(
                tag: Tag,
                value: &mut Option<$ty>,
                reader: &mut Reader<'_>,
            ) -> Result<(), DecodeError> {
                tag.expect_wire_type(WIRE_TYPE)?;
                *value = Some(reader.$read()?);
                Ok(())
            }

            /// Appends either one unpacked element or a whole packed block.
            ///
            /// # Errors
            /// Returns an error if the wire type is neither the element's nor
            /// length-delimited, or if an element is malformed.
            pub fn merge_repeated(
                tag: Tag,
                values: &mut Vec<$ty>,
                reader: &mut Reader<'_>,
            ) -> Result<(), DecodeError> {
                if tag.wire_type() == WireType::LengthDelimited {
                    return merge_packed(values, reader, |reader| reader.$read());
                }
                tag.expect_wire_type(WIRE_TYPE)?;
                values.push(reader.$read()?);
                Ok(())
            }
        }
    };
}

scalar_kind!(
    /// `uint32` fields.
    uint32, u32, WireType::Varint, write_uint32, read_uint32
);
scalar_kind!(
    /// `uint64` fields.
    uint64, u64, WireType::Varint, write_uint64, read_uint64
);
scalar_kind!(
    /// `int32` fields. Negative values take ten bytes on the wire.
    int32, i32, WireType::Varint, write_int32, read_int32
);
scalar_kind!(
    /// `int64` fields.
    int64, i64, WireType::Varint, write_int64, read_int64
);
scalar_kind!(
    /// Zig-zag mapped `sint32` fields.
    sint32, i32, WireType::Varint, write_zigzag32, read_zigzag32
);
scalar_kind!(
    /// Zig-zag mapped `sint64` fields.
    sint64, i64, WireType::Varint, write_zigzag, read_zigzag
);
scalar_kind!(
    /// `bool` fields.
    bool, bool, WireType::Varint, write_bool, read_bool
);
scalar_kind!(
    /// `fixed32` fields.
    fixed32, u32, WireType::ThirtyTwoBit, write_fixed32, read_fixed32
);
scalar_kind!(
    /// `sfixed32` fields.
    sfixed32, i32, WireType::ThirtyTwoBit, write_sfixed32, read_sfixed32
);
scalar_kind!(
    /// `float` fields.
    float, f32, WireType::ThirtyTwoBit, write_float, read_float
);
scalar_kind!(
    /// `fixed64` fields.
    fixed64, u64, WireType::SixtyFourBit, write_fixed64, read_fixed64
);
scalar_kind!(
    /// `sfixed64` fields.
    sfixed64, i64, WireType::SixtyFourBit, write_sfixed64, read_sfixed64
);
scalar_kind!(
    /// `double` fields.
    double, f64, WireType::SixtyFourBit, write_double, read_double
);

/// `string` fields.
pub mod string {
    use super::*;

    pub const WIRE_TYPE: WireType = WireType::LengthDelimited;

    /// # Errors
    /// Returns an error if `field_number` is out of range or `value` is too long.
    pub fn encode(field_number: u32, value: &str, writer: &mut Writer) -> Result<(), EncodeError> {
        if !value.is_empty() {
            encode_always(field_number, value, writer)?;
        }
        Ok(())
    }

    /// # Errors
    /// Returns an error if `field_number` is out of range or `value` is too long.
    pub fn encode_always(
        field_number: u32,
        value: &str,
        writer: &mut Writer,
    ) -> Result<(), EncodeError> {
        writer.write_tag(field_number, WIRE_TYPE)?.write_string(value)?;
        Ok(())
    }

    /// # Errors
    /// Returns an error if `field_number` is out of range or `value` is too long.
    pub fn encode_optional(
        field_number: u32,
        value: &Option<String>,
        writer: &mut Writer,
    ) -> Result<(), EncodeError> {
        if let Some(value) = value {
            encode_always(field_number, value, writer)?;
        }
        Ok(())
    }

    /// Writes one entry per element, empty strings included.
    ///
    /// # Errors
    /// Returns an error if `field_number` is out of range or an element is too long.
    pub fn encode_repeated(
        field_number: u32,
        values: &[String],
        writer: &mut Writer,
    ) -> Result<(), EncodeError> {
        for value in values {
            encode_always(field_number, value, writer)?;
        }
        Ok(())
    }

    /// # Errors
    /// Returns an error if the wire type does not match or the value is not utf8.
    pub fn merge(tag: Tag, value: &mut String, reader: &mut Reader<'_>) -> Result<(), DecodeError> {
        tag.expect_wire_type(WIRE_TYPE)?;
        let read = reader.read_string()?;
        value.clear();
        value.push_str(read);
        Ok(())
    }

    /// # Errors
    /// Returns an error if the wire type does not match or the value is not utf8.
    pub fn merge_optional(
        tag: Tag,
        value: &mut Option<String>,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeError> {
        merge(tag, value.get_or_insert_with(String::new), reader)
    }

    /// # Errors
    /// Returns an error if the wire type does not match or the value is not utf8.
    pub fn merge_repeated(
        tag: Tag,
        values: &mut Vec<String>,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeError> {
        tag.expect_wire_type(WIRE_TYPE)?;
        values.push(reader.read_string()?.to_owned());
        Ok(())
    }
}

/// `bytes` fields.
pub mod bytes {
    use ::bytes::Bytes;

    use super::*;

    pub const WIRE_TYPE: WireType = WireType::LengthDelimited;

    /// # Errors
    /// Returns an error if `field_number` is out of range or `value` is too long.
    pub fn encode(field_number: u32, value: &[u8], writer: &mut Writer) -> Result<(), EncodeError> {
        if !value.is_empty() {
            encode_always(field_number, value, writer)?;
        }
        Ok(())
    }

    /// # Errors
    /// Returns an error if `field_number` is out of range or `value` is too long.
    pub fn encode_always(
        field_number: u32,
        value: &[u8],
        writer: &mut Writer,
    ) -> Result<(), EncodeError> {
        writer.write_tag(field_number, WIRE_TYPE)?.write_bytes(value)?;
        Ok(())
    }

    /// # Errors
    /// Returns an error if `field_number` is out of range or `value` is too long.
    pub fn encode_optional(
        field_number: u32,
        value: &Option<Bytes>,
        writer: &mut Writer,
    ) -> Result<(), EncodeError> {
        if let Some(value) = value {
            encode_always(field_number, value, writer)?;
        }
        Ok(())
    }

    /// Writes one entry per element, empty blobs included.
    ///
    /// # Errors
    /// Returns an error if `field_number` is out of range or an element is too long.
    pub fn encode_repeated(
        field_number: u32,
        values: &[Bytes],
        writer: &mut Writer,
    ) -> Result<(), EncodeError> {
        for value in values {
            encode_always(field_number, value, writer)?;
        }
        Ok(())
    }

    /// # Errors
    /// Returns an error if the wire type does not match or the value is truncated.
    pub fn merge(tag: Tag, value: &mut Bytes, reader: &mut Reader<'_>) -> Result<(), DecodeError> {
        tag.expect_wire_type(WIRE_TYPE)?;
        *value = Bytes::copy_from_slice(reader.read_length_delimited()?);
        Ok(())
    }

    /// # Errors
    /// Returns an error if the wire type does not match or the value is truncated.
    pub fn merge_optional(
        tag: Tag,
        value: &mut Option<Bytes>,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeError> {
        merge(tag, value.get_or_insert_with(Bytes::new), reader)
    }

    /// # Errors
    /// Returns an error if the wire type does not match or the value is truncated.
    pub fn merge_repeated(
        tag: Tag,
        values: &mut Vec<Bytes>,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeError> {
        tag.expect_wire_type(WIRE_TYPE)?;
        values.push(Bytes::copy_from_slice(reader.read_length_delimited()?));
        Ok(())
    }
}

/// Open enum fields, carried on the wire as `int32`.
pub mod enumeration {
    use super::*;

    pub const WIRE_TYPE: WireType = WireType::Varint;

    /// An open protobuf enum: every `i32` maps to some value, so ordinals unknown to
    /// this build survive a decode/encode round trip.
    pub trait Enumeration: Copy + Default + PartialEq {
        fn from_i32(value: i32) -> Self;

        fn to_i32(self) -> i32;
    }

    /// # Errors
    /// Returns an error if `field_number` is out of range.
    pub fn encode<E: Enumeration>(
        field_number: u32,
        value: &E,
        writer: &mut Writer,
    ) -> Result<(), EncodeError> {
        if value.to_i32() != 0 {
            encode_always(field_number, value, writer)?;
        }
        Ok(())
    }

    /// # Errors
    /// Returns an error if `field_number` is out of range.
    pub fn encode_always<E: Enumeration>(
        field_number: u32,
        value: &E,
        writer: &mut Writer,
    ) -> Result<(), EncodeError> {
        writer
            .write_tag(field_number, WIRE_TYPE)?
            .write_int32(value.to_i32());
        Ok(())
    }

    /// # Errors
    /// Returns an error if `field_number` is out of range.
    pub fn encode_optional<E: Enumeration>(
        field_number: u32,
        value: &Option<E>,
        writer: &mut Writer,
    ) -> Result<(), EncodeError> {
        if let Some(value) = value {
            encode_always(field_number, value, writer)?;
        }
        Ok(())
    }

    /// Writes `values` as a single packed block of `int32`s.
    ///
    /// # Errors
    /// Returns an error if `field_number` is out of range or the block is too long.
    pub fn encode_repeated<E: Enumeration>(
        field_number: u32,
        values: &[E],
        writer: &mut Writer,
    ) -> Result<(), EncodeError> {
        writer.write_packed(field_number, values, |writer, value| {
            writer.write_int32(value.to_i32())
        })?;
        Ok(())
    }

    /// # Errors
    /// Returns an error if the wire type does not match or the value is malformed.
    pub fn merge<E: Enumeration>(
        tag: Tag,
        value: &mut E,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeError> {
        tag.expect_wire_type(WIRE_TYPE)?;
        *value = E::from_i32(reader.read_int32()?);
        Ok(())
    }

    /// # Errors
    /// Returns an error if the wire type does not match or the value is malformed.
    pub fn merge_optional<E: Enumeration>(
        tag: Tag,
        value: &mut Option<E>,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeError> {
        merge(tag, value.get_or_insert_with(E::default), reader)
    }

    /// # Errors
    /// Returns an error if the wire type is neither varint nor length-delimited, or
    /// if an element is malformed.
    pub fn merge_repeated<E: Enumeration>(
        tag: Tag,
        values: &mut Vec<E>,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeError> {
        let read = |reader: &mut Reader<'_>| reader.read_int32().map(E::from_i32);
        if tag.wire_type() == WireType::LengthDelimited {
            return merge_packed(values, reader, read);
        }
        tag.expect_wire_type(WIRE_TYPE)?;
        values.push(read(reader)?);
        Ok(())
    }
}

/// Embedded message fields.
///
/// Submessages have explicit presence: schema fields hold them as `Option` and go
/// through [`encode_optional`]/[`merge_optional`]. A set submessage is written even
/// when it is at its default.
pub mod message {
    use super::*;
    use crate::Message;

    pub const WIRE_TYPE: WireType = WireType::LengthDelimited;

    /// Writes `value` as a length-delimited submessage, whatever its contents.
    ///
    /// # Errors
    /// Returns an error if `field_number` is out of range or the submessage fails to
    /// encode.
    pub fn encode<M: Message>(
        field_number: u32,
        value: &M,
        writer: &mut Writer,
    ) -> Result<(), EncodeError> {
        writer.write_tag(field_number, WIRE_TYPE)?.fork();
        value.encode_raw(writer)?;
        writer.ldelim()?;
        Ok(())
    }

    /// Same as [`encode`]; present for symmetry with the scalar kinds.
    ///
    /// # Errors
    /// See [`encode`].
    pub fn encode_always<M: Message>(
        field_number: u32,
        value: &M,
        writer: &mut Writer,
    ) -> Result<(), EncodeError> {
        encode(field_number, value, writer)
    }

    /// # Errors
    /// See [`encode`].
    pub fn encode_optional<M: Message>(
        field_number: u32,
        value: &Option<M>,
        writer: &mut Writer,
    ) -> Result<(), EncodeError> {
        if let Some(value) = value {
            encode(field_number, value, writer)?;
        }
        Ok(())
    }

    /// Writes one length-delimited entry per element.
    ///
    /// # Errors
    /// See [`encode`].
    pub fn encode_repeated<M: Message>(
        field_number: u32,
        values: &[M],
        writer: &mut Writer,
    ) -> Result<(), EncodeError> {
        for value in values {
            encode(field_number, value, writer)?;
        }
        Ok(())
    }

    /// Merges the submessage into `value`; repeated occurrences accumulate.
    ///
    /// # Errors
    /// Returns an error if the wire type does not match or the submessage is malformed.
    pub fn merge<M: Message>(
        tag: Tag,
        value: &mut M,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeError> {
        tag.expect_wire_type(WIRE_TYPE)?;
        let length = reader.read_varint()?;
        value.merge_from(reader, Some(length))
    }

    /// # Errors
    /// See [`merge`].
    pub fn merge_optional<M: Message>(
        tag: Tag,
        value: &mut Option<M>,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeError> {
        merge(tag, value.get_or_insert_with(M::default), reader)
    }

    /// # Errors
    /// See [`merge`].
    pub fn merge_repeated<M: Message>(
        tag: Tag,
        values: &mut Vec<M>,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeError> {
        tag.expect_wire_type(WIRE_TYPE)?;
        let length = reader.read_varint()?;
        values.push(M::decode_from(reader, Some(length))?);
        Ok(())
    }
}

/// Map fields, carried as repeated entry messages with the key in field 1 and the
/// value in field 2.
///
/// Entries are written in key order with both key and value present. When decoding,
/// a missing key or value takes its default and a repeated key keeps the last entry.
pub mod map {
    use std::collections::BTreeMap;

    use super::*;

    const KEY: u32 = 1;
    const VALUE: u32 = 2;

    /// # Errors
    /// Returns an error if `field_number` is out of range or an entry fails to encode.
    pub fn encode<K, V, KE, VE>(
        field_number: u32,
        values: &BTreeMap<K, V>,
        encode_key: KE,
        encode_value: VE,
        writer: &mut Writer,
    ) -> Result<(), EncodeError>
    where
        KE: Fn(u32, &K, &mut Writer) -> Result<(), EncodeError>,
        VE: Fn(u32, &V, &mut Writer) -> Result<(), EncodeError>,
    {
        for (key, value) in values {
            writer.write_tag(field_number, WireType::LengthDelimited)?.fork();
            encode_key(KEY, key, writer)?;
            encode_value(VALUE, value, writer)?;
            writer.ldelim()?;
        }
        Ok(())
    }

    /// # Errors
    /// Returns an error if the wire type does not match or the entry is malformed.
    pub fn merge<K, V, KM, VM>(
        tag: Tag,
        values: &mut BTreeMap<K, V>,
        merge_key: KM,
        merge_value: VM,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeError>
    where
        K: Default + Ord,
        V: Default,
        KM: Fn(Tag, &mut K, &mut Reader<'_>) -> Result<(), DecodeError>,
        VM: Fn(Tag, &mut V, &mut Reader<'_>) -> Result<(), DecodeError>,
    {
        tag.expect_wire_type(WireType::LengthDelimited)?;
        let length = reader.read_varint()?;
        let end = reader.limit(length)?;
        let mut key = K::default();
        let mut value = V::default();
        reader.descend()?;
        while reader.position() < end {
            let tag = reader.read_tag()?;
            match tag.field_number() {
                KEY => merge_key(tag, &mut key, reader)?,
                VALUE => merge_value(tag, &mut value, reader)?,
                _ => reader.skip(tag)?,
            }
        }
        reader.ascend();
        if reader.position() != end {
            return Err(DecodeError::end_mismatch(reader.position(), end));
        }
        values.insert(key, value);
        Ok(())
    }
}
