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
    BlockRateLimitConfiguration,
    ClobPair,
    EquityTierLimitConfiguration,
    GoodTil,
    LiquidationsConfig,
    OperationRaw,
    Order,
    OrderId,
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
    /// Governance: adds a clob pair.
    pub struct MsgCreateClobPair in "dydxprotocol.clob" {
        /// The address that controls the module.
        1 singular string authority: String,
        2 optional message clob_pair: Option<ClobPair>,
    }
}

message! {
    pub struct MsgCreateClobPairResponse in "dydxprotocol.clob" {}
}

message! {
    /// The operations the block proposer matched, in execution order.
    pub struct MsgProposedOperations in "dydxprotocol.clob" {
        1 repeated message operations_queue: Vec<OperationRaw>,
    }
}

message! {
    pub struct MsgProposedOperationsResponse in "dydxprotocol.clob" {}
}

message! {
    pub struct MsgPlaceOrder in "dydxprotocol.clob" {
        1 optional message order: Option<Order>,
    }
}

message! {
    pub struct MsgPlaceOrderResponse in "dydxprotocol.clob" {}
}

/// Cancels an order. The expiry must be of the same kind as the order's own.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MsgCancelOrder {
    pub order_id: Option<OrderId>,
    pub good_til: Option<GoodTil>,
}

impl Message for MsgCancelOrder {
    fn encode_raw(&self, writer: &mut Writer) -> Result<(), EncodeError> {
        field::message::encode_optional(1, &self.order_id, writer)?;
        GoodTil::encode(self.good_til.as_ref(), 2, writer)?;
        Ok(())
    }

    fn merge_field(&mut self, tag: Tag, reader: &mut Reader<'_>) -> Result<(), DecodeError> {
        match tag.field_number() {
            1 => field::message::merge_optional(tag, &mut self.order_id, reader)
                .map_err(|err| err.push("MsgCancelOrder", "order_id")),
            2 => GoodTil::merge_block(tag, &mut self.good_til, reader)
                .map_err(|err| err.push("MsgCancelOrder", "good_til_block")),
            3 => GoodTil::merge_block_time(tag, &mut self.good_til, reader)
                .map_err(|err| err.push("MsgCancelOrder", "good_til_block_time")),
            _ => reader.skip(tag),
        }
    }
}

impl Name for MsgCancelOrder {
    const NAME: &'static str = "MsgCancelOrder";
    const PACKAGE: &'static str = "dydxprotocol.clob";
}

impl Amino for MsgCancelOrder {
    fn to_amino(&self, options: &AminoOptions) -> Map<String, Value> {
        let mut object = ObjectWriter::new(options);
        object.optional("order_id", &self.order_id);
        GoodTil::to_amino(self.good_til.as_ref(), &mut object);
        object.finish()
    }

    fn from_amino(object: &Map<String, Value>) -> Result<Self, AminoError> {
        let reader = ObjectReader::new(object);
        Ok(Self {
            order_id: reader.optional("order_id")?,
            good_til: GoodTil::from_amino(&reader)?,
        })
    }
}

amino_value_for_message!(MsgCancelOrder);

message! {
    pub struct MsgCancelOrderResponse in "dydxprotocol.clob" {}
}

message! {
    /// Governance: replaces a clob pair's parameters.
    pub struct MsgUpdateClobPair in "dydxprotocol.clob" {
        1 singular string authority: String,
        2 optional message clob_pair: Option<ClobPair>,
    }
}

message! {
    pub struct MsgUpdateClobPairResponse in "dydxprotocol.clob" {}
}

message! {
    pub struct MsgUpdateEquityTierLimitConfiguration in "dydxprotocol.clob" {
        1 singular string authority: String,
        2 optional message equity_tier_limit_config: Option<EquityTierLimitConfiguration>,
    }
}

message! {
    pub struct MsgUpdateEquityTierLimitConfigurationResponse in "dydxprotocol.clob" {}
}

message! {
    pub struct MsgUpdateBlockRateLimitConfiguration in "dydxprotocol.clob" {
        1 singular string authority: String,
        3 optional message block_rate_limit_config: Option<BlockRateLimitConfiguration>,
    }
}

message! {
    pub struct MsgUpdateBlockRateLimitConfigurationResponse in "dydxprotocol.clob" {}
}

message! {
    pub struct MsgUpdateLiquidationsConfig in "dydxprotocol.clob" {
        1 singular string authority: String,
        2 optional message liquidations_config: Option<LiquidationsConfig>,
    }
}

message! {
    pub struct MsgUpdateLiquidationsConfigResponse in "dydxprotocol.clob" {}
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use serde_json::json;

    use super::*;

    #[test]
    fn cancel_by_block_time_uses_field_three() {
        let cancel = MsgCancelOrder {
            order_id: Some(OrderId::default()),
            good_til: Some(GoodTil::BlockTime(1)),
        };
        let encoded = cancel.encode().unwrap();
        assert_eq!(&hex!("0a 02 0a 00 1d 01 00 00 00")[..], &encoded[..]);
        assert_eq!(cancel, MsgCancelOrder::decode(&encoded).unwrap());
    }

    #[test]
    fn rate_limit_config_skips_field_two() {
        let msg = MsgUpdateBlockRateLimitConfiguration {
            authority: "gov".to_string(),
            ..MsgUpdateBlockRateLimitConfiguration::default()
        };
        assert_eq!(&hex!("0a 03 67 6f 76")[..], &msg.encode().unwrap()[..]);

        let msg = MsgUpdateBlockRateLimitConfiguration {
            block_rate_limit_config: Some(BlockRateLimitConfiguration::default()),
            ..msg
        };
        assert_eq!(
            &hex!("0a 03 67 6f 76 1a 00")[..],
            &msg.encode().unwrap()[..]
        );
    }

    #[test]
    fn cancel_without_an_order_id_encodes_only_the_expiry() {
        let cancel = MsgCancelOrder {
            order_id: None,
            good_til: Some(GoodTil::Block(4)),
        };
        let encoded = cancel.encode().unwrap();
        assert_eq!(&hex!("10 04")[..], &encoded[..]);
        assert_eq!(cancel, MsgCancelOrder::decode(&encoded).unwrap());
        assert_eq!(
            json!({"good_til_block": 4}),
            cancel.to_amino_value(&AminoOptions::default())
        );
    }

    #[test]
    fn responses_are_empty_objects() {
        assert!(MsgPlaceOrderResponse::default().encode().unwrap().is_empty());
        assert_eq!(
            MsgPlaceOrderResponse::default(),
            MsgPlaceOrderResponse::decode(&hex!("08 01")).unwrap()
        );
        assert_eq!(
            json!({}),
            MsgPlaceOrderResponse::default().to_amino_value(&AminoOptions::default())
        );
    }

    #[test]
    fn place_order_envelope() {
        let msg = MsgPlaceOrder::default().to_amino_msg(&AminoOptions::default());
        assert_eq!("/dydxprotocol.clob.MsgPlaceOrder", msg.type_url);
        assert_eq!(
            json!({"type": "/dydxprotocol.clob.MsgPlaceOrder", "value": msg.value.clone()}),
            serde_json::to_value(&msg).unwrap()
        );
    }
}
