use bytes::Bytes;

use crate::{
    DecodeError,
    EncodeError,
    Reader,
    Tag,
    Writer,
};

/// A value with a fixed protobuf wire representation.
///
/// Implementors provide the two per-message halves: [`Message::encode_raw`] walks
/// the fields in ascending field-number order and [`Message::merge_field`]
/// dispatches one field read off the wire. The provided methods build the framing
/// around them.
///
/// A message's [`Default`] is its canonical zero: the value every absent field
/// decodes to. Partially specified values are built from it with struct update
/// syntax.
pub trait Message: Default {
    /// Writes every field that is not at its canonical zero.
    ///
    /// # Errors
    /// Returns an error if a field's value cannot be represented on the wire.
    fn encode_raw(&self, writer: &mut Writer) -> Result<(), EncodeError>;

    /// Reads the value of the field announced by `tag` into `self`.
    ///
    /// Unknown field numbers must be passed to [`Reader::skip`].
    ///
    /// # Errors
    /// Returns an error if the field value is malformed or framed with a wire type
    /// that does not match its declaration.
    fn merge_field(&mut self, tag: Tag, reader: &mut Reader<'_>) -> Result<(), DecodeError>;

    /// Encodes `self` into a fresh buffer.
    ///
    /// # Errors
    /// See [`Message::encode_raw`].
    fn encode(&self) -> Result<Bytes, EncodeError> {
        let mut writer = Writer::new();
        self.encode_raw(&mut writer)?;
        writer.finish()
    }

    /// Decodes a message that spans all of `buf`.
    ///
    /// # Errors
    /// Returns an error if `buf` is not a well-formed encoding of `Self`.
    fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        Self::decode_from(&mut Reader::new(buf), None)
    }

    /// Decodes a message from `reader`.
    ///
    /// With a `length` the message occupies that many bytes from the current
    /// position, otherwise it runs to the end of the reader's buffer.
    ///
    /// # Errors
    /// Returns an error if the bytes are not a well-formed encoding of `Self`, or if
    /// decoding does not end exactly on the message's end bound.
    fn decode_from(reader: &mut Reader<'_>, length: Option<u64>) -> Result<Self, DecodeError> {
        let mut message = Self::default();
        message.merge_from(reader, length)?;
        Ok(message)
    }

    /// Merges the fields of an encoded message into `self`.
    ///
    /// Scalar fields are overwritten, repeated fields are appended to and singular
    /// submessages are merged recursively.
    ///
    /// # Errors
    /// See [`Message::decode_from`].
    fn merge_from(&mut self, reader: &mut Reader<'_>, length: Option<u64>) -> Result<(), DecodeError> {
        let end = match length {
            Some(length) => reader.limit(length)?,
            None => reader.len(),
        };
        reader.descend()?;
        while reader.position() < end {
            let tag = reader.read_tag()?;
            self.merge_field(tag, reader)?;
        }
        reader.ascend();
        if reader.position() != end {
            return Err(DecodeError::end_mismatch(reader.position(), end));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;
    use crate::{
        field,
        DecodeErrorKind,
    };

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Pair {
        a: u32,
        b: String,
    }

    impl Message for Pair {
        fn encode_raw(&self, writer: &mut Writer) -> Result<(), EncodeError> {
            field::uint32::encode(1, &self.a, writer)?;
            field::string::encode(2, &self.b, writer)?;
            Ok(())
        }

        fn merge_field(&mut self, tag: Tag, reader: &mut Reader<'_>) -> Result<(), DecodeError> {
            match tag.field_number() {
                1 => field::uint32::merge(tag, &mut self.a, reader),
                2 => field::string::merge(tag, &mut self.b, reader),
                _ => reader.skip(tag),
            }
        }
    }

    #[test]
    fn default_value_encodes_to_nothing() {
        assert!(Pair::default().encode().unwrap().is_empty());
    }

    #[test]
    fn empty_buffer_decodes_to_default() {
        assert_eq!(Pair::default(), Pair::decode(&[]).unwrap());
    }

    #[test]
    fn fields_may_arrive_in_any_order() {
        let pair = Pair::decode(&hex!("12 01 78 08 05")).unwrap();
        assert_eq!(
            Pair {
                a: 5,
                b: "x".to_string(),
            },
            pair
        );
    }

    #[test]
    fn later_scalar_occurrences_win() {
        let pair = Pair::decode(&hex!("08 05 08 06")).unwrap();
        assert_eq!(6, pair.a);
    }

    #[test]
    fn decoding_with_a_length_stops_at_the_bound() {
        let buf = hex!("08 05 08 06");
        let mut reader = Reader::new(&buf);
        let pair = Pair::decode_from(&mut reader, Some(2)).unwrap();
        assert_eq!(5, pair.a);
        assert_eq!(2, reader.position());
    }

    #[test]
    fn field_straddling_the_bound_is_a_framing_error() {
        let buf = hex!("08 96 01");
        let mut reader = Reader::new(&buf);
        let err = Pair::decode_from(&mut reader, Some(2)).unwrap_err();
        assert_eq!(
            &DecodeErrorKind::EndMismatch {
                position: 3,
                end: 2
            },
            err.kind()
        );
    }
}
