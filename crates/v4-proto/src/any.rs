use bytes::Bytes;
use v4_wire::{
    field,
    DecodeError,
    EncodeError,
    Message,
    Reader,
    Tag,
    Writer,
};

use crate::Name;

/// A message of any type, carried as its type URL and encoded bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Any {
    pub type_url: String,
    pub value: Bytes,
}

impl Any {
    /// Packs `message` into an envelope.
    ///
    /// # Errors
    /// Returns an error if `message` fails to encode.
    pub fn from_msg<M: Name>(message: &M) -> Result<Self, EncodeError> {
        Ok(Self {
            type_url: M::type_url(),
            value: message.encode()?,
        })
    }

    /// Unpacks the envelope as an `M`.
    ///
    /// # Errors
    /// Returns an error if the envelope carries another type or its bytes do not
    /// decode as an `M`.
    pub fn to_msg<M: Name>(&self) -> Result<M, AnyError> {
        let expected = M::type_url();
        if self.type_url != expected {
            return Err(AnyError::TypeMismatch {
                expected,
                actual: self.type_url.clone(),
            });
        }
        M::decode(&self.value).map_err(AnyError::Decode)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnyError {
    #[error("expected a message of type `{expected}`, got `{actual}`")]
    TypeMismatch { expected: String, actual: String },
    #[error("failed to decode the enveloped message")]
    Decode(#[source] DecodeError),
}

impl Message for Any {
    fn encode_raw(&self, writer: &mut Writer) -> Result<(), EncodeError> {
        field::string::encode(1, &self.type_url, writer)?;
        field::bytes::encode(2, &self.value, writer)?;
        Ok(())
    }

    fn merge_field(&mut self, tag: Tag, reader: &mut Reader<'_>) -> Result<(), DecodeError> {
        match tag.field_number() {
            1 => field::string::merge(tag, &mut self.type_url, reader)
                .map_err(|err| err.push("Any", "type_url")),
            2 => field::bytes::merge(tag, &mut self.value, reader)
                .map_err(|err| err.push("Any", "value")),
            _ => reader.skip(tag),
        }
    }
}

impl Name for Any {
    const NAME: &'static str = "Any";
    const PACKAGE: &'static str = "google.protobuf";
}
