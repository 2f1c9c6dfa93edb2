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

use super::OrderId;
use crate::{
    amino::{
        Amino,
        AminoError,
        AminoOptions,
        ObjectReader,
        ObjectWriter,
    },
    subaccounts::SubaccountId,
    Name,
};

/// One match of the book: exactly one of the three kinds, or none when the value
/// was decoded from a buffer that carried no member.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ClobMatch {
    #[default]
    None,
    MatchOrders(MatchOrders),
    MatchPerpetualLiquidation(MatchPerpetualLiquidation),
    MatchPerpetualDeleveraging(MatchPerpetualDeleveraging),
}

impl ClobMatch {
    /// The schema name of the member that is set, for display.
    #[must_use]
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::MatchOrders(_) => "match_orders",
            Self::MatchPerpetualLiquidation(_) => "match_perpetual_liquidation",
            Self::MatchPerpetualDeleveraging(_) => "match_perpetual_deleveraging",
        }
    }
}

/// Merges into the member named by `tag`: the same member merges, another one is
/// replaced.
macro_rules! merge_member {
    ($this:expr, $variant:ident, $tag:expr, $reader:expr) => {{
        if !matches!($this, ClobMatch::$variant(_)) {
            *$this = ClobMatch::$variant(Default::default());
        }
        match $this {
            ClobMatch::$variant(member) => field::message::merge($tag, member, $reader),
            _ => Ok(()),
        }
    }};
}

impl Message for ClobMatch {
    fn encode_raw(&self, writer: &mut Writer) -> Result<(), EncodeError> {
        match self {
            Self::None => Ok(()),
            Self::MatchOrders(member) => field::message::encode(1, member, writer),
            Self::MatchPerpetualLiquidation(member) => field::message::encode(2, member, writer),
            Self::MatchPerpetualDeleveraging(member) => field::message::encode(3, member, writer),
        }
    }

    fn merge_field(&mut self, tag: Tag, reader: &mut Reader<'_>) -> Result<(), DecodeError> {
        match tag.field_number() {
            1 => merge_member!(self, MatchOrders, tag, reader)
                .map_err(|err| err.push("ClobMatch", "match_orders")),
            2 => merge_member!(self, MatchPerpetualLiquidation, tag, reader)
                .map_err(|err| err.push("ClobMatch", "match_perpetual_liquidation")),
            3 => merge_member!(self, MatchPerpetualDeleveraging, tag, reader)
                .map_err(|err| err.push("ClobMatch", "match_perpetual_deleveraging")),
            _ => reader.skip(tag),
        }
    }
}

impl Name for ClobMatch {
    const NAME: &'static str = "ClobMatch";
    const PACKAGE: &'static str = "dydxprotocol.clob";
}

impl Amino for ClobMatch {
    fn to_amino(&self, options: &AminoOptions) -> Map<String, Value> {
        let mut object = ObjectWriter::new(options);
        object
            .absent("match_orders")
            .absent("match_perpetual_liquidation")
            .absent("match_perpetual_deleveraging");
        match self {
            Self::None => {}
            Self::MatchOrders(member) => {
                object.present("match_orders", member);
            }
            Self::MatchPerpetualLiquidation(member) => {
                object.present("match_perpetual_liquidation", member);
            }
            Self::MatchPerpetualDeleveraging(member) => {
                object.present("match_perpetual_deleveraging", member);
            }
        }
        object.finish()
    }

    /// With several members present the last one in field order wins, as it
    /// would on the wire.
    fn from_amino(object: &Map<String, Value>) -> Result<Self, AminoError> {
        let reader = ObjectReader::new(object);
        if let Some(member) = reader.optional("match_perpetual_deleveraging")? {
            return Ok(Self::MatchPerpetualDeleveraging(member));
        }
        if let Some(member) = reader.optional("match_perpetual_liquidation")? {
            return Ok(Self::MatchPerpetualLiquidation(member));
        }
        if let Some(member) = reader.optional("match_orders")? {
            return Ok(Self::MatchOrders(member));
        }
        Ok(Self::None)
    }
}

amino_value_for_message!(ClobMatch);

message! {
    /// A fill against one maker order.
    pub struct MakerFill in "dydxprotocol.clob" {
        1 singular uint64 fill_amount: u64,
        2 optional message maker_order_id: Option<OrderId>,
    }
}

message! {
    /// A taker order matched against one or more maker orders.
    pub struct MatchOrders in "dydxprotocol.clob" {
        1 optional message taker_order_id: Option<OrderId>,
        2 repeated message fills: Vec<MakerFill>,
    }
}

message! {
    /// A liquidation order matched against one or more maker orders.
    pub struct MatchPerpetualLiquidation in "dydxprotocol.clob" {
        1 optional message liquidated: Option<SubaccountId>,
        2 singular uint32 clob_pair_id: u32,
        3 singular uint32 perpetual_id: u32,
        4 singular uint64 total_size: u64,
        5 singular bool is_buy: bool,
        6 repeated message fills: Vec<MakerFill>,
    }
}

message! {
    /// A subaccount's position closed out against offsetting subaccounts.
    pub struct MatchPerpetualDeleveraging in "dydxprotocol.clob" {
        1 optional message liquidated: Option<SubaccountId>,
        2 singular uint32 perpetual_id: u32,
        3 repeated message fills: Vec<Fill>,
        /// Set when deleveraging happens at the final settlement price.
        4 singular bool is_final_settlement: bool,
    }
}

message! {
    pub struct Fill in "dydxprotocol.clob" as "MatchPerpetualDeleveraging.Fill" {
        1 optional message offsetting_subaccount_id: Option<SubaccountId>,
        2 singular uint64 fill_amount: u64,
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use serde_json::json;

    use super::*;

    fn liquidation() -> MatchPerpetualLiquidation {
        MatchPerpetualLiquidation {
            clob_pair_id: 1,
            total_size: 5,
            ..MatchPerpetualLiquidation::default()
        }
    }

    #[test]
    fn none_encodes_to_nothing() {
        assert!(ClobMatch::None.encode().unwrap().is_empty());
        assert_eq!(ClobMatch::None, ClobMatch::decode(&[]).unwrap());
    }

    #[test]
    fn member_is_written_at_its_field_number() {
        let clob_match = ClobMatch::MatchPerpetualLiquidation(liquidation());
        let encoded = clob_match.encode().unwrap();
        assert_eq!(&hex!("12 04 10 01 20 05")[..], &encoded[..]);
        assert_eq!(clob_match, ClobMatch::decode(&encoded).unwrap());
        assert_eq!("match_perpetual_liquidation", clob_match.variant_name());
    }

    #[test]
    fn repeated_member_merges_and_another_member_replaces() {
        let merged = ClobMatch::decode(&hex!("12 02 10 01 12 02 20 05")).unwrap();
        assert_eq!(ClobMatch::MatchPerpetualLiquidation(liquidation()), merged);

        let replaced = ClobMatch::decode(&hex!("12 02 10 01 1a 02 10 04")).unwrap();
        assert_eq!(
            ClobMatch::MatchPerpetualDeleveraging(MatchPerpetualDeleveraging {
                perpetual_id: 4,
                ..MatchPerpetualDeleveraging::default()
            }),
            replaced
        );
    }

    #[test]
    fn nested_fill_has_a_qualified_name() {
        assert_eq!(
            "/dydxprotocol.clob.MatchPerpetualDeleveraging.Fill",
            Fill::type_url()
        );
    }

    #[test]
    fn amino_shows_only_the_set_member() {
        let clob_match = ClobMatch::MatchOrders(MatchOrders::default());
        let value = clob_match.to_amino_value(&AminoOptions::default());
        let object = value.as_object().unwrap();
        assert_eq!(
            vec!["match_orders"],
            object.keys().map(String::as_str).collect::<Vec<_>>()
        );
        assert_eq!(clob_match, ClobMatch::from_amino_value(&value).unwrap());
        assert_eq!(
            ClobMatch::None,
            ClobMatch::from_amino_value(&json!({"match_orders": null})).unwrap()
        );
    }
}
