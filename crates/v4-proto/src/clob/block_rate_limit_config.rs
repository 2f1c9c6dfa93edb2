message! {
    /// Per-subaccount rate limits on order placement and cancellation.
    pub struct BlockRateLimitConfiguration in "dydxprotocol.clob" {
        1 repeated message max_short_term_orders_per_n_blocks: Vec<MaxPerNBlocksRateLimit>,
        2 repeated message max_stateful_orders_per_n_blocks: Vec<MaxPerNBlocksRateLimit>,
        3 repeated message max_short_term_order_cancellations_per_n_blocks:
            Vec<MaxPerNBlocksRateLimit>,
    }
}

message! {
    /// At most `limit` events over any window of `num_blocks` blocks.
    pub struct MaxPerNBlocksRateLimit in "dydxprotocol.clob" {
        1 singular uint32 num_blocks: u32,
        2 singular uint32 limit: u32,
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use v4_wire::Message as _;

    use super::*;

    #[test]
    fn only_the_populated_list_is_written() {
        let config = BlockRateLimitConfiguration {
            max_short_term_orders_per_n_blocks: vec![MaxPerNBlocksRateLimit {
                num_blocks: 1,
                limit: 100,
            }],
            ..BlockRateLimitConfiguration::default()
        };
        let encoded = config.encode().unwrap();
        assert_eq!(&hex!("0a 04 08 01 10 64")[..], &encoded[..]);

        let decoded = BlockRateLimitConfiguration::decode(&encoded).unwrap();
        assert_eq!(config, decoded);
        assert!(decoded.max_stateful_orders_per_n_blocks.is_empty());
        assert!(decoded
            .max_short_term_order_cancellations_per_n_blocks
            .is_empty());
    }
}
