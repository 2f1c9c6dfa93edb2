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
    pub struct PerpetualClobMetadata in "dydxprotocol.clob" {
        /// The perpetual this pair trades.
        1 singular uint32 perpetual_id: u32,
    }
}

message! {
    pub struct SpotClobMetadata in "dydxprotocol.clob" {
        1 singular uint32 base_asset_id: u32,
        2 singular uint32 quote_asset_id: u32,
    }
}

proto_enum! {
    pub enum ClobPairStatus {
        Unspecified = 0 => "STATUS_UNSPECIFIED",
        Active = 1 => "STATUS_ACTIVE",
        Paused = 2 => "STATUS_PAUSED",
        CancelOnly = 3 => "STATUS_CANCEL_ONLY",
        PostOnly = 4 => "STATUS_POST_ONLY",
    }
}

/// What a clob pair trades.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClobPairMetadata {
    Perpetual(PerpetualClobMetadata),
    Spot(SpotClobMetadata),
}

/// A single order book.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClobPair {
    pub id: u32,
    pub metadata: Option<ClobPairMetadata>,
    /// Order sizes must be a multiple of this many base quantums.
    pub step_base_quantums: u64,
    /// Order prices must be a multiple of this many subticks.
    pub subticks_per_tick: u32,
    /// The exponent that converts base quantums to quote quantums.
    pub quantum_conversion_exponent: i32,
    pub min_order_base_quantums: u64,
    pub status: ClobPairStatus,
}

impl ClobPair {
    /// The perpetual traded on this pair, if it is a perpetual market.
    #[must_use]
    pub fn perpetual_id(&self) -> Option<u32> {
        match &self.metadata {
            Some(ClobPairMetadata::Perpetual(metadata)) => Some(metadata.perpetual_id),
            _ => None,
        }
    }
}

impl Message for ClobPair {
    fn encode_raw(&self, writer: &mut Writer) -> Result<(), EncodeError> {
        field::uint32::encode(1, &self.id, writer)?;
        match &self.metadata {
            Some(ClobPairMetadata::Perpetual(metadata)) => {
                field::message::encode(2, metadata, writer)?;
            }
            Some(ClobPairMetadata::Spot(metadata)) => {
                field::message::encode(3, metadata, writer)?;
            }
            None => {}
        }
        field::uint64::encode(4, &self.step_base_quantums, writer)?;
        field::uint32::encode(5, &self.subticks_per_tick, writer)?;
        field::sint32::encode(6, &self.quantum_conversion_exponent, writer)?;
        field::uint64::encode(7, &self.min_order_base_quantums, writer)?;
        field::enumeration::encode(8, &self.status, writer)?;
        Ok(())
    }

    fn merge_field(&mut self, tag: Tag, reader: &mut Reader<'_>) -> Result<(), DecodeError> {
        let push = |field_name| move |err: DecodeError| err.push("ClobPair", field_name);
        match tag.field_number() {
            1 => field::uint32::merge(tag, &mut self.id, reader).map_err(push("id")),
            2 => {
                let mut metadata = match self.metadata.take() {
                    Some(ClobPairMetadata::Perpetual(metadata)) => metadata,
                    _ => PerpetualClobMetadata::default(),
                };
                let result = field::message::merge(tag, &mut metadata, reader);
                self.metadata = Some(ClobPairMetadata::Perpetual(metadata));
                result.map_err(push("perpetual_clob_metadata"))
            }
            3 => {
                let mut metadata = match self.metadata.take() {
                    Some(ClobPairMetadata::Spot(metadata)) => metadata,
                    _ => SpotClobMetadata::default(),
                };
                let result = field::message::merge(tag, &mut metadata, reader);
                self.metadata = Some(ClobPairMetadata::Spot(metadata));
                result.map_err(push("spot_clob_metadata"))
            }
            4 => field::uint64::merge(tag, &mut self.step_base_quantums, reader)
                .map_err(push("step_base_quantums")),
            5 => field::uint32::merge(tag, &mut self.subticks_per_tick, reader)
                .map_err(push("subticks_per_tick")),
            6 => field::sint32::merge(tag, &mut self.quantum_conversion_exponent, reader)
                .map_err(push("quantum_conversion_exponent")),
            7 => field::uint64::merge(tag, &mut self.min_order_base_quantums, reader)
                .map_err(push("min_order_base_quantums")),
            8 => field::enumeration::merge(tag, &mut self.status, reader).map_err(push("status")),
            _ => reader.skip(tag),
        }
    }
}

impl Name for ClobPair {
    const NAME: &'static str = "ClobPair";
    const PACKAGE: &'static str = "dydxprotocol.clob";
}

impl Amino for ClobPair {
    fn to_amino(&self, options: &AminoOptions) -> Map<String, Value> {
        let mut object = ObjectWriter::new(options);
        object
            .field("id", &self.id)
            .absent("perpetual_clob_metadata")
            .absent("spot_clob_metadata");
        match &self.metadata {
            Some(ClobPairMetadata::Perpetual(metadata)) => {
                object.present("perpetual_clob_metadata", metadata);
            }
            Some(ClobPairMetadata::Spot(metadata)) => {
                object.present("spot_clob_metadata", metadata);
            }
            None => {}
        }
        object
            .field("step_base_quantums", &self.step_base_quantums)
            .field("subticks_per_tick", &self.subticks_per_tick)
            .field("quantum_conversion_exponent", &self.quantum_conversion_exponent)
            .field("min_order_base_quantums", &self.min_order_base_quantums)
            .field("status", &self.status);
        object.finish()
    }

    fn from_amino(object: &Map<String, Value>) -> Result<Self, AminoError> {
        let reader = ObjectReader::new(object);
        let spot = reader
            .optional("spot_clob_metadata")?
            .map(ClobPairMetadata::Spot);
        let perpetual = reader
            .optional("perpetual_clob_metadata")?
            .map(ClobPairMetadata::Perpetual);
        Ok(Self {
            id: reader.field("id")?,
            metadata: spot.or(perpetual),
            step_base_quantums: reader.field("step_base_quantums")?,
            subticks_per_tick: reader.field("subticks_per_tick")?,
            quantum_conversion_exponent: reader.field("quantum_conversion_exponent")?,
            min_order_base_quantums: reader.field("min_order_base_quantums")?,
            status: reader.field("status")?,
        })
    }
}

amino_value_for_message!(ClobPair);

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use serde_json::json;

    use super::*;

    fn btc_usd() -> ClobPair {
        ClobPair {
            id: 0,
            metadata: Some(ClobPairMetadata::Perpetual(PerpetualClobMetadata {
                perpetual_id: 0,
            })),
            step_base_quantums: 1_000_000,
            subticks_per_tick: 100_000,
            quantum_conversion_exponent: -9,
            min_order_base_quantums: 0,
            status: ClobPairStatus::Active,
        }
    }

    #[test]
    fn negative_exponent_is_zigzag_encoded() {
        let encoded = btc_usd().encode().unwrap();
        assert_eq!(
            &hex!("12 00 20 c0 84 3d 28 a0 8d 06 30 11 40 01")[..],
            &encoded[..]
        );
        assert_eq!(btc_usd(), ClobPair::decode(&encoded).unwrap());
        assert_eq!(Some(0), btc_usd().perpetual_id());
    }

    #[test]
    fn metadata_switches_to_the_last_member_seen() {
        let pair = ClobPair::decode(&hex!("12 02 08 05 1a 02 10 02")).unwrap();
        assert_eq!(
            Some(ClobPairMetadata::Spot(SpotClobMetadata {
                base_asset_id: 0,
                quote_asset_id: 2,
            })),
            pair.metadata
        );
        assert_eq!(None, pair.perpetual_id());
    }

    #[test]
    fn amino_of_a_perpetual_pair() {
        assert_eq!(
            json!({
                "id": 0,
                "perpetual_clob_metadata": {"perpetual_id": 0},
                "step_base_quantums": "1000000",
                "subticks_per_tick": 100_000,
                "quantum_conversion_exponent": -9,
                "status": "STATUS_ACTIVE",
            }),
            btc_usd().to_amino_value(&AminoOptions::default())
        );
    }
}
