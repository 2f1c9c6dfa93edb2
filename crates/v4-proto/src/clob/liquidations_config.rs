message! {
    /// Parameters of the liquidation process.
    pub struct LiquidationsConfig in "dydxprotocol.clob" {
        /// The largest fee, in parts per million of the position, charged on a
        /// liquidation.
        1 singular uint32 max_liquidation_fee_ppm: u32,
        2 optional message subaccount_block_limits: Option<SubaccountBlockLimits>,
    }
}

message! {
    /// Per-block limits on how much a single subaccount may be liquidated.
    pub struct SubaccountBlockLimits in "dydxprotocol.clob" {
        1 singular uint64 max_quantums_insurance_lost: u64,
    }
}
