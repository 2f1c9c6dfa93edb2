use super::OrderId;

message! {
    /// Order state changes produced while processing a block's matches.
    pub struct ProcessProposerMatchesEvents in "dydxprotocol.clob" {
        1 repeated message placed_long_term_order_ids: Vec<OrderId>,
        2 repeated message expired_stateful_order_ids: Vec<OrderId>,
        3 repeated message order_ids_filled_in_last_block: Vec<OrderId>,
        4 repeated message placed_stateful_cancellation_order_ids: Vec<OrderId>,
        5 repeated message removed_stateful_order_ids: Vec<OrderId>,
        6 repeated message conditional_order_ids_triggered_in_last_block: Vec<OrderId>,
        7 repeated message placed_conditional_order_ids: Vec<OrderId>,
        8 singular uint32 block_height: u32,
    }
}
