//! The central limit order book (`dydxprotocol.clob`).

mod block_rate_limit_config;
mod clob_pair;
mod equity_tier_limit_config;
mod liquidations;
mod liquidations_config;
mod matches;
mod operation;
mod order;
mod order_removals;
mod process_proposer_matches_events;
mod tx;

pub use block_rate_limit_config::{
    BlockRateLimitConfiguration,
    MaxPerNBlocksRateLimit,
};
pub use clob_pair::{
    ClobPair,
    ClobPairMetadata,
    ClobPairStatus,
    PerpetualClobMetadata,
    SpotClobMetadata,
};
pub use equity_tier_limit_config::{
    EquityTierLimit,
    EquityTierLimitConfiguration,
};
pub use liquidations::SubaccountLiquidationInfo;
pub use liquidations_config::{
    LiquidationsConfig,
    SubaccountBlockLimits,
};
pub use matches::{
    ClobMatch,
    Fill,
    MakerFill,
    MatchOrders,
    MatchPerpetualDeleveraging,
    MatchPerpetualLiquidation,
};
pub use operation::OperationRaw;
pub use order::{
    ConditionType,
    ConditionalOrderPlacement,
    GoodTil,
    InvalidCondition,
    InvalidOrderFlags,
    LongTermOrderPlacement,
    Order,
    OrderFillState,
    OrderId,
    OrderKind,
    OrdersFilledDuringLatestBlock,
    PotentiallyPrunableOrders,
    Side,
    StatefulOrderTimeSliceValue,
    TimeInForce,
    TransactionOrdering,
};
pub use order_removals::{
    OrderRemoval,
    RemovalReason,
};
pub use process_proposer_matches_events::ProcessProposerMatchesEvents;
pub use tx::{
    MsgCancelOrder,
    MsgCancelOrderResponse,
    MsgCreateClobPair,
    MsgCreateClobPairResponse,
    MsgPlaceOrder,
    MsgPlaceOrderResponse,
    MsgProposedOperations,
    MsgProposedOperationsResponse,
    MsgUpdateBlockRateLimitConfiguration,
    MsgUpdateBlockRateLimitConfigurationResponse,
    MsgUpdateClobPair,
    MsgUpdateClobPairResponse,
    MsgUpdateEquityTierLimitConfiguration,
    MsgUpdateEquityTierLimitConfigurationResponse,
    MsgUpdateLiquidationsConfig,
    MsgUpdateLiquidationsConfigResponse,
};
