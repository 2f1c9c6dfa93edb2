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
    subaccounts::SubaccountId,
    Name,
};

proto_enum! {
    pub enum Side {
        Unspecified = 0 => "SIDE_UNSPECIFIED",
        Buy = 1 => "SIDE_BUY",
        Sell = 2 => "SIDE_SELL",
    }
}

proto_enum! {
    pub enum TimeInForce {
        /// Good until cancelled or expired; may rest on the book.
        Unspecified = 0 => "TIME_IN_FORCE_UNSPECIFIED",
        /// Immediate-or-cancel: whatever does not fill at once is cancelled.
        Ioc = 1 => "TIME_IN_FORCE_IOC",
        /// Rejected if any part of it would match on placement.
        PostOnly = 2 => "TIME_IN_FORCE_POST_ONLY",
        FillOrKill = 3 => "TIME_IN_FORCE_FILL_OR_KILL",
    }
}

proto_enum! {
    pub enum ConditionType {
        /// Not a conditional order.
        Unspecified = 0 => "CONDITION_TYPE_UNSPECIFIED",
        StopLoss = 1 => "CONDITION_TYPE_STOP_LOSS",
        TakeProfit = 2 => "CONDITION_TYPE_TAKE_PROFIT",
    }
}

const LONG_TERM_FLAG: u32 = 0x40;
const CONDITIONAL_FLAG: u32 = 0x20;

message! {
    /// Uniquely identifies an order.
    pub struct OrderId in "dydxprotocol.clob" {
        1 optional message subaccount_id: Option<SubaccountId>,
        /// Chosen by the client; distinguishes orders of the same subaccount.
        2 singular fixed32 client_id: u32,
        /// Bitfield of `0x40` (long-term) and `0x20` (conditional). See
        /// [`OrderId::order_kind`].
        3 singular uint32 order_flags: u32,
        4 singular uint32 clob_pair_id: u32,
    }
}

/// The lifecycle class of an order, derived from its flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderKind {
    ShortTerm,
    LongTerm,
    Conditional,
}

#[derive(Debug, thiserror::Error)]
#[error("order flags `{flags:#04x}` name neither a short-term, long-term nor conditional order")]
pub struct InvalidOrderFlags {
    flags: u32,
}

impl InvalidOrderFlags {
    #[must_use]
    pub fn flags(&self) -> u32 {
        self.flags
    }
}

impl OrderId {
    /// Classifies the order by its flags.
    ///
    /// # Errors
    /// Returns an error if both flags are set or any other bit is.
    pub fn order_kind(&self) -> Result<OrderKind, InvalidOrderFlags> {
        match self.order_flags {
            0 => Ok(OrderKind::ShortTerm),
            LONG_TERM_FLAG => Ok(OrderKind::LongTerm),
            CONDITIONAL_FLAG => Ok(OrderKind::Conditional),
            flags => Err(InvalidOrderFlags {
                flags,
            }),
        }
    }
}

message! {
    pub struct OrdersFilledDuringLatestBlock in "dydxprotocol.clob" {
        1 repeated message order_ids: Vec<OrderId>,
    }
}

message! {
    pub struct PotentiallyPrunableOrders in "dydxprotocol.clob" {
        1 repeated message order_ids: Vec<OrderId>,
    }
}

message! {
    /// How much of an order has filled, and when its fill state may be pruned.
    pub struct OrderFillState in "dydxprotocol.clob" {
        1 singular uint64 fill_amount: u64,
        2 singular uint32 prunable_block_height: u32,
    }
}

message! {
    pub struct StatefulOrderTimeSliceValue in "dydxprotocol.clob" {
        1 repeated message order_ids: Vec<OrderId>,
    }
}

message! {
    pub struct LongTermOrderPlacement in "dydxprotocol.clob" {
        1 optional message order: Option<Order>,
        2 optional message placement_index: Option<TransactionOrdering>,
    }
}

message! {
    pub struct ConditionalOrderPlacement in "dydxprotocol.clob" {
        1 optional message order: Option<Order>,
        2 optional message placement_index: Option<TransactionOrdering>,
        /// Set once the order's condition has triggered.
        3 optional message trigger_index: Option<TransactionOrdering>,
    }
}

message! {
    /// The position of a transaction within the chain.
    pub struct TransactionOrdering in "dydxprotocol.clob" {
        1 singular uint32 block_height: u32,
        2 singular uint32 transaction_index: u32,
    }
}

/// When an order expires. Short-term orders expire at a block height, stateful
/// orders at a block time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GoodTil {
    /// The last block height at which the order may be placed.
    Block(u32),
    /// Unix seconds; the order expires once a block's time reaches it.
    BlockTime(u32),
}

impl GoodTil {
    pub(crate) fn encode(
        good_til: Option<&Self>,
        block_field: u32,
        writer: &mut Writer,
    ) -> Result<(), EncodeError> {
        match good_til {
            Some(Self::Block(height)) => field::uint32::encode_always(block_field, height, writer),
            Some(Self::BlockTime(time)) => {
                field::fixed32::encode_always(block_field + 1, time, writer)
            }
            None => Ok(()),
        }
    }

    pub(crate) fn merge_block(
        tag: Tag,
        good_til: &mut Option<Self>,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeError> {
        let mut height = 0;
        field::uint32::merge(tag, &mut height, reader)?;
        *good_til = Some(Self::Block(height));
        Ok(())
    }

    pub(crate) fn merge_block_time(
        tag: Tag,
        good_til: &mut Option<Self>,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeError> {
        let mut time = 0;
        field::fixed32::merge(tag, &mut time, reader)?;
        *good_til = Some(Self::BlockTime(time));
        Ok(())
    }

    #[must_use]
    pub fn block(&self) -> Option<u32> {
        match self {
            Self::Block(height) => Some(*height),
            Self::BlockTime(_) => None,
        }
    }

    #[must_use]
    pub fn block_time(&self) -> Option<u32> {
        match self {
            Self::Block(_) => None,
            Self::BlockTime(time) => Some(*time),
        }
    }

    pub(crate) fn to_amino(good_til: Option<&Self>, object: &mut ObjectWriter<'_>) {
        object
            .optional("good_til_block", &good_til.and_then(Self::block))
            .optional("good_til_block_time", &good_til.and_then(Self::block_time));
    }

    /// Both members set is read as the block time, as the last one on the wire
    /// would win.
    pub(crate) fn from_amino(reader: &ObjectReader<'_>) -> Result<Option<Self>, AminoError> {
        let block = reader.optional("good_til_block")?;
        let block_time = reader.optional("good_til_block_time")?;
        Ok(block_time.map(Self::BlockTime).or(block.map(Self::Block)))
    }
}

/// An order on the book.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Order {
    pub order_id: Option<OrderId>,
    pub side: Side,
    /// Size in base quantums; a multiple of the pair's step size.
    pub quantums: u64,
    /// Price in subticks; a multiple of the pair's subticks per tick.
    pub subticks: u64,
    pub good_til: Option<GoodTil>,
    pub time_in_force: TimeInForce,
    pub reduce_only: bool,
    /// Opaque to the protocol; set by the client.
    pub client_metadata: u32,
    pub condition_type: ConditionType,
    /// The price at which a conditional order triggers. Zero unless
    /// `condition_type` is set.
    pub conditional_order_trigger_subticks: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum InvalidCondition {
    #[error("order has trigger subticks but no condition type")]
    TriggerWithoutCondition,
    #[error("conditional order of type `{condition_type}` has no trigger subticks")]
    ConditionWithoutTrigger { condition_type: ConditionType },
}

impl Order {
    /// Checks that trigger subticks are set exactly when the order is conditional.
    ///
    /// # Errors
    /// Returns an error if the condition type and the trigger subticks disagree.
    pub fn validate_condition(&self) -> Result<(), InvalidCondition> {
        match (self.condition_type, self.conditional_order_trigger_subticks) {
            (ConditionType::Unspecified, 0) => Ok(()),
            (ConditionType::Unspecified, _) => Err(InvalidCondition::TriggerWithoutCondition),
            (condition_type, 0) => Err(InvalidCondition::ConditionWithoutTrigger {
                condition_type,
            }),
            _ => Ok(()),
        }
    }

    #[must_use]
    pub fn is_short_term(&self) -> bool {
        matches!(self.good_til, Some(GoodTil::Block(_)))
    }

    #[must_use]
    pub fn is_stateful(&self) -> bool {
        matches!(self.good_til, Some(GoodTil::BlockTime(_)))
    }
}

impl Message for Order {
    fn encode_raw(&self, writer: &mut Writer) -> Result<(), EncodeError> {
        field::message::encode_optional(1, &self.order_id, writer)?;
        field::enumeration::encode(2, &self.side, writer)?;
        field::uint64::encode(3, &self.quantums, writer)?;
        field::uint64::encode(4, &self.subticks, writer)?;
        GoodTil::encode(self.good_til.as_ref(), 5, writer)?;
        field::enumeration::encode(7, &self.time_in_force, writer)?;
        field::bool::encode(8, &self.reduce_only, writer)?;
        field::uint32::encode(9, &self.client_metadata, writer)?;
        field::enumeration::encode(10, &self.condition_type, writer)?;
        field::uint64::encode(11, &self.conditional_order_trigger_subticks, writer)?;
        Ok(())
    }

    fn merge_field(&mut self, tag: Tag, reader: &mut Reader<'_>) -> Result<(), DecodeError> {
        let (result, field_name) = match tag.field_number() {
            1 => (
                field::message::merge_optional(tag, &mut self.order_id, reader),
                "order_id",
            ),
            2 => (
                field::enumeration::merge(tag, &mut self.side, reader),
                "side",
            ),
            3 => (
                field::uint64::merge(tag, &mut self.quantums, reader),
                "quantums",
            ),
            4 => (
                field::uint64::merge(tag, &mut self.subticks, reader),
                "subticks",
            ),
            5 => (
                GoodTil::merge_block(tag, &mut self.good_til, reader),
                "good_til_block",
            ),
            6 => (
                GoodTil::merge_block_time(tag, &mut self.good_til, reader),
                "good_til_block_time",
            ),
            7 => (
                field::enumeration::merge(tag, &mut self.time_in_force, reader),
                "time_in_force",
            ),
            8 => (
                field::bool::merge(tag, &mut self.reduce_only, reader),
                "reduce_only",
            ),
            9 => (
                field::uint32::merge(tag, &mut self.client_metadata, reader),
                "client_metadata",
            ),
            10 => (
                field::enumeration::merge(tag, &mut self.condition_type, reader),
                "condition_type",
            ),
            11 => (
                field::uint64::merge(tag, &mut self.conditional_order_trigger_subticks, reader),
                "conditional_order_trigger_subticks",
            ),
            _ => return reader.skip(tag),
        };
        result.map_err(|err| err.push("Order", field_name))
    }
}

impl Name for Order {
    const NAME: &'static str = "Order";
    const PACKAGE: &'static str = "dydxprotocol.clob";
}

impl Amino for Order {
    fn to_amino(&self, options: &AminoOptions) -> Map<String, Value> {
        let mut object = ObjectWriter::new(options);
        object
            .optional("order_id", &self.order_id)
            .field("side", &self.side)
            .field("quantums", &self.quantums)
            .field("subticks", &self.subticks);
        GoodTil::to_amino(self.good_til.as_ref(), &mut object);
        object
            .field("time_in_force", &self.time_in_force)
            .field("reduce_only", &self.reduce_only)
            .field("client_metadata", &self.client_metadata)
            .field("condition_type", &self.condition_type)
            .field(
                "conditional_order_trigger_subticks",
                &self.conditional_order_trigger_subticks,
            );
        object.finish()
    }

    fn from_amino(object: &Map<String, Value>) -> Result<Self, AminoError> {
        let reader = ObjectReader::new(object);
        Ok(Self {
            order_id: reader.optional("order_id")?,
            side: reader.field("side")?,
            quantums: reader.field("quantums")?,
            subticks: reader.field("subticks")?,
            good_til: GoodTil::from_amino(&reader)?,
            time_in_force: reader.field("time_in_force")?,
            reduce_only: reader.field("reduce_only")?,
            client_metadata: reader.field("client_metadata")?,
            condition_type: reader.field("condition_type")?,
            conditional_order_trigger_subticks: reader.field("conditional_order_trigger_subticks")?,
        })
    }
}

amino_value_for_message!(Order);
