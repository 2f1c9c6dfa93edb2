use bytes::Bytes;

message! {
    /// How many open orders a subaccount may hold, by net collateral.
    pub struct EquityTierLimitConfiguration in "dydxprotocol.clob" {
        1 repeated message short_term_order_equity_tiers: Vec<EquityTierLimit>,
        2 repeated message stateful_order_equity_tiers: Vec<EquityTierLimit>,
    }
}

message! {
    pub struct EquityTierLimit in "dydxprotocol.clob" {
        /// The net collateral, a serialized big integer, needed for this tier.
        1 singular bytes usd_tnc_required: Bytes,
        2 singular uint32 limit: u32,
    }
}
