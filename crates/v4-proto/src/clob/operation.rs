use bytes::Bytes;
use serde_json::{
    Map,
    Value,
};
use v4_wire::{
    field,
    DecodeError,
    EncodeError,
    Message,
    Reader,
    Tag,
    Writer,
};

use super::{
    ClobMatch,
    OrderRemoval,
};
use crate::{
    amino::{
        Amino,
        AminoError,
        AminoOptions,
        ObjectReader,
        ObjectWriter,
    },
    Name,
};

/// One entry of the operations queue proposed with a block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OperationRaw {
    #[default]
    None,
    Match(ClobMatch),
    /// The raw bytes of the transaction that placed a short-term order.
    ShortTermOrderPlacement(Bytes),
    OrderRemoval(OrderRemoval),
}

impl Message for OperationRaw {
    fn encode_raw(&self, writer: &mut Writer) -> Result<(), EncodeError> {
        match self {
            Self::None => Ok(()),
            Self::Match(clob_match) => field::message::encode(1, clob_match, writer),
            Self::ShortTermOrderPlacement(tx) => field::bytes::encode_always(2, tx, writer),
            Self::OrderRemoval(removal) => field::message::encode(3, removal, writer),
        }
    }

    fn merge_field(&mut self, tag: Tag, reader: &mut Reader<'_>) -> Result<(), DecodeError> {
        match tag.field_number() {
            1 => {
                let mut clob_match = match std::mem::take(self) {
                    Self::Match(clob_match) => clob_match,
                    _ => ClobMatch::default(),
                };
                let result = field::message::merge(tag, &mut clob_match, reader);
                *self = Self::Match(clob_match);
                result.map_err(|err| err.push("OperationRaw", "match"))
            }
            2 => {
                let mut tx = Bytes::new();
                field::bytes::merge(tag, &mut tx, reader)
                    .map_err(|err| err.push("OperationRaw", "short_term_order_placement"))?;
                *self = Self::ShortTermOrderPlacement(tx);
                Ok(())
            }
            3 => {
                let mut removal = match std::mem::take(self) {
                    Self::OrderRemoval(removal) => removal,
                    _ => OrderRemoval::default(),
                };
                let result = field::message::merge(tag, &mut removal, reader);
                *self = Self::OrderRemoval(removal);
                result.map_err(|err| err.push("OperationRaw", "order_removal"))
            }
            _ => reader.skip(tag),
        }
    }
}

impl Name for OperationRaw {
    const NAME: &'static str = "OperationRaw";
    const PACKAGE: &'static str = "dydxprotocol.clob";
}

impl Amino for OperationRaw {
    fn to_amino(&self, options: &AminoOptions) -> Map<String, Value> {
        let mut object = ObjectWriter::new(options);
        object
            .absent("match")
            .absent("short_term_order_placement")
            .absent("order_removal");
        match self {
            Self::None => {}
            Self::Match(clob_match) => {
                object.present("match", clob_match);
            }
            Self::ShortTermOrderPlacement(tx) => {
                object.present("short_term_order_placement", tx);
            }
            Self::OrderRemoval(removal) => {
                object.present("order_removal", removal);
            }
        }
        object.finish()
    }

    fn from_amino(object: &Map<String, Value>) -> Result<Self, AminoError> {
        let reader = ObjectReader::new(object);
        if let Some(removal) = reader.optional("order_removal")? {
            return Ok(Self::OrderRemoval(removal));
        }
        if let Some(tx) = reader.optional("short_term_order_placement")? {
            return Ok(Self::ShortTermOrderPlacement(tx));
        }
        if let Some(clob_match) = reader.optional("match")? {
            return Ok(Self::Match(clob_match));
        }
        Ok(Self::None)
    }
}

amino_value_for_message!(OperationRaw);

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_placement_is_still_written() {
        let operation = OperationRaw::ShortTermOrderPlacement(Bytes::new());
        let encoded = operation.encode().unwrap();
        assert_eq!(&hex!("12 00")[..], &encoded[..]);
        assert_eq!(operation, OperationRaw::decode(&encoded).unwrap());
    }

    #[test]
    fn placement_bytes_are_base64_in_amino() {
        let operation = OperationRaw::ShortTermOrderPlacement(Bytes::from_static(b"tx"));
        let value = operation.to_amino_value(&AminoOptions::default());
        assert_eq!(json!({"short_term_order_placement": "dHg="}), value);
        assert_eq!(operation, OperationRaw::from_amino_value(&value).unwrap());
    }
}
