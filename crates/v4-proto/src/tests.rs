//! Conformance of the schema types against `prost` mirrors, and round trips
//! through the wire and the Amino bridge.

use std::collections::BTreeMap;

use bytes::Bytes;
use proptest::prelude::*;
use v4_wire::{
    Enumeration as _,
    Message as _,
};

use crate::{
    amino::{
        Amino as _,
        AminoOptions,
        Omission,
    },
    clob::{
        ConditionType,
        GoodTil,
        MsgCancelOrder,
        Order,
        OrderId,
        Side,
        TimeInForce,
    },
    perpetuals::{
        MarketPremiums,
        PremiumStore,
    },
    subaccounts::SubaccountId,
    ve::{
        DaemonVoteExtension,
        PricePair,
    },
};

#[derive(Clone, PartialEq, prost::Message)]
struct RefSubaccountId {
    #[prost(string, tag = "1")]
    owner: String,
    #[prost(uint32, tag = "2")]
    number: u32,
}

#[derive(Clone, PartialEq, prost::Message)]
struct RefOrderId {
    #[prost(message, optional, tag = "1")]
    subaccount_id: Option<RefSubaccountId>,
    #[prost(fixed32, tag = "2")]
    client_id: u32,
    #[prost(uint32, tag = "3")]
    order_flags: u32,
    #[prost(uint32, tag = "4")]
    clob_pair_id: u32,
}

#[derive(Clone, PartialEq, prost::Oneof)]
enum RefGoodTil {
    #[prost(uint32, tag = "5")]
    GoodTilBlock(u32),
    #[prost(fixed32, tag = "6")]
    GoodTilBlockTime(u32),
}

#[derive(Clone, PartialEq, prost::Message)]
struct RefOrder {
    #[prost(message, optional, tag = "1")]
    order_id: Option<RefOrderId>,
    #[prost(int32, tag = "2")]
    side: i32,
    #[prost(uint64, tag = "3")]
    quantums: u64,
    #[prost(uint64, tag = "4")]
    subticks: u64,
    #[prost(oneof = "RefGoodTil", tags = "5, 6")]
    good_til: Option<RefGoodTil>,
    #[prost(int32, tag = "7")]
    time_in_force: i32,
    #[prost(bool, tag = "8")]
    reduce_only: bool,
    #[prost(uint32, tag = "9")]
    client_metadata: u32,
    #[prost(int32, tag = "10")]
    condition_type: i32,
    #[prost(uint64, tag = "11")]
    conditional_order_trigger_subticks: u64,
}

/// An `Order` as a newer schema might define it.
#[derive(Clone, PartialEq, prost::Message)]
struct RefOrderV2 {
    #[prost(message, optional, tag = "1")]
    order_id: Option<RefOrderId>,
    #[prost(uint64, tag = "3")]
    quantums: u64,
    #[prost(string, tag = "12")]
    twap_parameters: String,
    #[prost(sfixed64, repeated, tag = "13")]
    builder_fees: Vec<i64>,
}

#[derive(Clone, PartialEq, prost::Message)]
struct RefMarketPremiums {
    #[prost(uint32, tag = "1")]
    perpetual_id: u32,
    #[prost(sint32, repeated, tag = "2")]
    premiums: Vec<i32>,
}

#[derive(Clone, PartialEq, prost::Message)]
struct RefPremiumStore {
    #[prost(message, repeated, tag = "1")]
    all_market_premiums: Vec<RefMarketPremiums>,
    #[prost(uint32, tag = "2")]
    num_premiums: u32,
}

#[derive(Clone, PartialEq, prost::Message)]
struct RefPricePair {
    #[prost(bytes = "vec", tag = "1")]
    spot_price: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pnl_price: Vec<u8>,
}

#[derive(Clone, PartialEq, prost::Message)]
struct RefDaemonVoteExtension {
    #[prost(btree_map = "uint32, message", tag = "1")]
    prices: BTreeMap<u32, RefPricePair>,
}

impl From<&OrderId> for RefOrderId {
    fn from(id: &OrderId) -> Self {
        Self {
            subaccount_id: id.subaccount_id.as_ref().map(|subaccount_id| RefSubaccountId {
                owner: subaccount_id.owner.clone(),
                number: subaccount_id.number,
            }),
            client_id: id.client_id,
            order_flags: id.order_flags,
            clob_pair_id: id.clob_pair_id,
        }
    }
}

impl From<&Order> for RefOrder {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.order_id.as_ref().map(RefOrderId::from),
            side: order.side.to_i32(),
            quantums: order.quantums,
            subticks: order.subticks,
            good_til: order.good_til.map(|good_til| match good_til {
                GoodTil::Block(height) => RefGoodTil::GoodTilBlock(height),
                GoodTil::BlockTime(time) => RefGoodTil::GoodTilBlockTime(time),
            }),
            time_in_force: order.time_in_force.to_i32(),
            reduce_only: order.reduce_only,
            client_metadata: order.client_metadata,
            condition_type: order.condition_type.to_i32(),
            conditional_order_trigger_subticks: order.conditional_order_trigger_subticks,
        }
    }
}

impl From<&PremiumStore> for RefPremiumStore {
    fn from(store: &PremiumStore) -> Self {
        Self {
            all_market_premiums: store
                .all_market_premiums
                .iter()
                .map(|premiums| RefMarketPremiums {
                    perpetual_id: premiums.perpetual_id,
                    premiums: premiums.premiums.clone(),
                })
                .collect(),
            num_premiums: store.num_premiums,
        }
    }
}

prop_compose! {
    fn arb_order_id()(
        subaccount_id in prop::option::of(("[a-z0-9]{0,43}", 0u32..=128_000)),
        client_id in any::<u32>(),
        order_flags in prop_oneof![Just(0u32), Just(32), Just(64), any::<u32>()],
        clob_pair_id in any::<u32>(),
    ) -> OrderId {
        OrderId {
            subaccount_id: subaccount_id.map(|(owner, number)| SubaccountId {
                owner,
                number,
            }),
            client_id,
            order_flags,
            clob_pair_id,
        }
    }
}

fn arb_good_til() -> impl Strategy<Value = Option<GoodTil>> {
    prop_oneof![
        Just(None),
        any::<u32>().prop_map(|height| Some(GoodTil::Block(height))),
        any::<u32>().prop_map(|time| Some(GoodTil::BlockTime(time))),
    ]
}

prop_compose! {
    /// Enum fields may carry ordinals unknown to this build.
    fn arb_order()(
        order_id in prop::option::of(arb_order_id()),
        side in any::<i32>().prop_map(Side::from_i32),
        quantums in any::<u64>(),
        subticks in any::<u64>(),
        good_til in arb_good_til(),
        time_in_force in (-1i32..5).prop_map(TimeInForce::from_i32),
        reduce_only in any::<bool>(),
        client_metadata in any::<u32>(),
        condition_type in (0i32..4).prop_map(ConditionType::from_i32),
        conditional_order_trigger_subticks in any::<u64>(),
    ) -> Order {
        Order {
            order_id,
            side,
            quantums,
            subticks,
            good_til,
            time_in_force,
            reduce_only,
            client_metadata,
            condition_type,
            conditional_order_trigger_subticks,
        }
    }
}

/// Orders whose enums all carry known members, as the Amino side names them.
fn arb_named_order() -> impl Strategy<Value = Order> {
    (
        arb_order(),
        0i32..3,
        0i32..4,
        0i32..3,
    )
        .prop_map(|(order, side, time_in_force, condition_type)| Order {
            side: Side::from_i32(side),
            time_in_force: TimeInForce::from_i32(time_in_force),
            condition_type: ConditionType::from_i32(condition_type),
            ..order
        })
}

prop_compose! {
    fn arb_premium_store()(
        all_market_premiums in prop::collection::vec(
            (any::<u32>(), prop::collection::vec(any::<i32>(), 0..12)),
            0..4,
        ),
        num_premiums in any::<u32>(),
    ) -> PremiumStore {
        PremiumStore {
            all_market_premiums: all_market_premiums
                .into_iter()
                .map(|(perpetual_id, premiums)| MarketPremiums {
                    perpetual_id,
                    premiums,
                })
                .collect(),
            num_premiums,
        }
    }
}

fn arb_omission() -> impl Strategy<Value = Omission> {
    prop_oneof![
        Just(Omission::Upstream),
        Just(Omission::Defaults),
        Just(Omission::Nothing),
    ]
}

proptest! {
    #[test]
    fn order_encoding_matches_the_reference_encoder(order in arb_order()) {
        let ours = order.encode().unwrap();
        let reference = prost::Message::encode_to_vec(&RefOrder::from(&order));
        prop_assert_eq!(&reference[..], &ours[..]);
        prop_assert_eq!(order, Order::decode(&reference).unwrap());
    }

    #[test]
    fn premium_store_encoding_matches_the_reference_encoder(store in arb_premium_store()) {
        let ours = store.encode().unwrap();
        let reference = prost::Message::encode_to_vec(&RefPremiumStore::from(&store));
        prop_assert_eq!(&reference[..], &ours[..]);
        prop_assert_eq!(store, PremiumStore::decode(&reference).unwrap());
    }

    #[test]
    fn order_survives_the_amino_bridge(order in arb_named_order(), omit in arb_omission()) {
        let options = AminoOptions::with_omission(omit);
        let value = order.to_amino_value(&options);
        prop_assert_eq!(&order, &Order::from_amino_value(&value).unwrap());

        let msg = order.to_amino_msg(&options);
        prop_assert_eq!("/dydxprotocol.clob.Order", msg.type_url.as_str());
        prop_assert_eq!(order, Order::from_amino_msg(&msg).unwrap());
    }

    #[test]
    fn orders_from_a_newer_schema_keep_their_known_fields(
        order_id in arb_order_id(),
        quantums in any::<u64>(),
        twap_parameters in "\\PC{0,12}",
        builder_fees in prop::collection::vec(any::<i64>(), 0..4),
    ) {
        let newer = RefOrderV2 {
            order_id: Some(RefOrderId::from(&order_id)),
            quantums,
            twap_parameters,
            builder_fees,
        };
        let decoded = Order::decode(&prost::Message::encode_to_vec(&newer)).unwrap();
        prop_assert_eq!(
            Order {
                order_id: Some(order_id),
                quantums,
                ..Order::default()
            },
            decoded
        );
    }

    #[test]
    fn vote_extensions_written_by_the_reference_encoder_decode(
        prices in prop::collection::btree_map(
            any::<u32>(),
            (prop::collection::vec(any::<u8>(), 0..8), prop::collection::vec(any::<u8>(), 0..8)),
            0..6,
        ),
    ) {
        let reference = RefDaemonVoteExtension {
            prices: prices
                .iter()
                .map(|(id, (spot_price, pnl_price))| {
                    (*id, RefPricePair {
                        spot_price: spot_price.clone(),
                        pnl_price: pnl_price.clone(),
                    })
                })
                .collect(),
        };
        let expected = DaemonVoteExtension {
            prices: prices
                .into_iter()
                .map(|(id, (spot_price, pnl_price))| {
                    (id, PricePair {
                        spot_price: Bytes::from(spot_price),
                        pnl_price: Bytes::from(pnl_price),
                    })
                })
                .collect(),
        };
        let decoded =
            DaemonVoteExtension::decode(&prost::Message::encode_to_vec(&reference)).unwrap();
        prop_assert_eq!(&expected, &decoded);
        prop_assert_eq!(expected, DaemonVoteExtension::decode(&decoded.encode().unwrap()).unwrap());
    }
}

fn long_term_order() -> Order {
    Order {
        order_id: Some(OrderId {
            subaccount_id: Some(SubaccountId {
                owner: "dydx1abc".to_string(),
                number: 0,
            }),
            client_id: 7,
            order_flags: 64,
            clob_pair_id: 1,
        }),
        side: Side::Buy,
        quantums: 1_000_000,
        subticks: 100_000,
        good_til: Some(GoodTil::BlockTime(1_700_000_000)),
        ..Order::default()
    }
}

#[test]
fn long_term_order_amino() {
    insta::assert_json_snapshot!(
        "long_term_order_amino",
        long_term_order().to_amino_value(&AminoOptions::default())
    );
}

#[test]
fn cancel_order_amino_without_omission() {
    let cancel = MsgCancelOrder {
        order_id: Some(OrderId::default()),
        good_til: Some(GoodTil::Block(20)),
    };
    insta::assert_json_snapshot!(
        "cancel_order_amino_without_omission",
        cancel.to_amino_value(&AminoOptions::with_omission(Omission::Nothing))
    );
}

#[test]
fn default_order_amino_keeps_its_thirty_two_bit_fields() {
    let object = Order::default().to_amino(&AminoOptions::default());
    let keys = object.keys().map(String::as_str).collect::<Vec<_>>();
    assert_eq!(
        vec![
            "client_metadata",
            "condition_type",
            "reduce_only",
            "side",
            "time_in_force",
        ],
        keys
    );
}

#[test]
fn default_order_matches_the_reference_encoder_and_is_empty() {
    assert!(Order::default().encode().unwrap().is_empty());
    assert!(prost::Message::encode_to_vec(&RefOrder::default()).is_empty());
    let unset = Order::decode(&[]).unwrap();
    assert_eq!(None, unset.order_id);
}
