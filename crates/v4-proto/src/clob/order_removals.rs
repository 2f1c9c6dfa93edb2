use super::OrderId;

proto_enum! {
    /// Why the block proposer removed an order.
    pub enum RemovalReason {
        Unspecified = 0 => "REMOVAL_REASON_UNSPECIFIED",
        Undercollateralized = 1 => "REMOVAL_REASON_UNDERCOLLATERALIZED",
        InvalidReduceOnly = 2 => "REMOVAL_REASON_INVALID_REDUCE_ONLY",
        PostOnlyWouldCrossMakerOrder = 3 => "REMOVAL_REASON_POST_ONLY_WOULD_CROSS_MAKER_ORDER",
        InvalidSelfTrade = 4 => "REMOVAL_REASON_INVALID_SELF_TRADE",
        ConditionalFokCouldNotBeFullyFilled = 5
            => "REMOVAL_REASON_CONDITIONAL_FOK_COULD_NOT_BE_FULLY_FILLED",
        ConditionalIocWouldRestOnBook = 6 => "REMOVAL_REASON_CONDITIONAL_IOC_WOULD_REST_ON_BOOK",
        FullyFilled = 7 => "REMOVAL_REASON_FULLY_FILLED",
        ViolatesIsolatedSubaccountConstraints = 8
            => "REMOVAL_REASON_VIOLATES_ISOLATED_SUBACCOUNT_CONSTRAINTS",
        FinalSettlement = 9 => "REMOVAL_REASON_FINAL_SETTLEMENT",
    }
}

message! {
    /// A stateful order the proposer removed from the book.
    pub struct OrderRemoval in "dydxprotocol.clob" {
        1 optional message order_id: Option<OrderId>,
        2 singular enumeration removal_reason: RemovalReason,
    }
}
