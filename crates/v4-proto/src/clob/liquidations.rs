message! {
    /// What has been liquidated from one subaccount in the current block.
    pub struct SubaccountLiquidationInfo in "dydxprotocol.clob" {
        /// The perpetuals liquidated so far, in liquidation order.
        1 repeated uint32 perpetuals_liquidated: Vec<u32>,
        2 singular uint64 notional_liquidated: u64,
        3 singular uint64 quantums_insurance_lost: u64,
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use v4_wire::Message as _;

    use super::*;

    #[test]
    fn perpetual_ids_are_packed() {
        let info = SubaccountLiquidationInfo {
            perpetuals_liquidated: vec![1, 300, 2],
            ..SubaccountLiquidationInfo::default()
        };
        let encoded = info.encode().unwrap();
        assert_eq!(&hex!("0a 04 01 ac 02 02")[..], &encoded[..]);
        assert_eq!(info, SubaccountLiquidationInfo::decode(&encoded).unwrap());
    }

    #[test]
    fn unpacked_perpetual_ids_decode_the_same() {
        let decoded = SubaccountLiquidationInfo::decode(&hex!("08 01 08 ac 02 08 02")).unwrap();
        assert_eq!(vec![1, 300, 2], decoded.perpetuals_liquidated);
    }
}
