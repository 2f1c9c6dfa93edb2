//! Price vote extensions (`dydxprotocol.ve`).

use std::collections::BTreeMap;

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

message! {
    pub struct PricePair in "dydxprotocol.ve" {
        1 singular bytes spot_price: Bytes,
        2 singular bytes pnl_price: Bytes,
    }
}

/// The prices a validator's daemons observed, keyed by market id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DaemonVoteExtension {
    pub prices: BTreeMap<u32, PricePair>,
}

impl Message for DaemonVoteExtension {
    fn encode_raw(&self, writer: &mut Writer) -> Result<(), EncodeError> {
        field::map::encode(
            1,
            &self.prices,
            field::uint32::encode_always,
            field::message::encode,
            writer,
        )
    }

    fn merge_field(&mut self, tag: Tag, reader: &mut Reader<'_>) -> Result<(), DecodeError> {
        match tag.field_number() {
            1 => field::map::merge(
                tag,
                &mut self.prices,
                field::uint32::merge,
                field::message::merge,
                reader,
            )
            .map_err(|err| err.push("DaemonVoteExtension", "prices")),
            _ => reader.skip(tag),
        }
    }
}

impl Name for DaemonVoteExtension {
    const NAME: &'static str = "DaemonVoteExtension";
    const PACKAGE: &'static str = "dydxprotocol.ve";
}

impl Amino for DaemonVoteExtension {
    fn to_amino(&self, options: &AminoOptions) -> Map<String, Value> {
        let mut object = ObjectWriter::new(options);
        object.field("prices", &self.prices);
        object.finish()
    }

    fn from_amino(object: &Map<String, Value>) -> Result<Self, AminoError> {
        let reader = ObjectReader::new(object);
        Ok(Self {
            prices: reader.field("prices")?,
        })
    }
}

amino_value_for_message!(DaemonVoteExtension);
