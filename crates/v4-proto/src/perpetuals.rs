//! Perpetual markets and their funding state (`dydxprotocol.perpetuals`).

use bytes::Bytes;

proto_enum! {
    pub enum PerpetualMarketType {
        Unspecified = 0 => "PERPETUAL_MARKET_TYPE_UNSPECIFIED",
        /// Positions share collateral with the rest of the subaccount.
        Cross = 1 => "PERPETUAL_MARKET_TYPE_CROSS",
        /// Positions are margined on their own.
        Isolated = 2 => "PERPETUAL_MARKET_TYPE_ISOLATED",
    }
}

message! {
    pub struct PerpetualParams in "dydxprotocol.perpetuals" {
        1 singular uint32 id: u32,
        /// Display name, e.g. `BTC-USD`.
        2 singular string ticker: String,
        /// The oracle market supplying the index price.
        3 singular uint32 market_id: u32,
        /// The exponent converting base quantums to whole units.
        4 singular sint32 atomic_resolution: i32,
        5 singular sint32 default_funding_ppm: i32,
        6 singular uint32 liquidity_tier: u32,
        7 singular enumeration market_type: PerpetualMarketType,
    }
}

message! {
    pub struct Perpetual in "dydxprotocol.perpetuals" {
        1 optional message params: Option<PerpetualParams>,
        /// Accumulated funding, a serialized big integer.
        2 singular bytes funding_index: Bytes,
        3 singular bytes open_interest: Bytes,
    }
}

message! {
    /// The premium samples collected for one market.
    pub struct MarketPremiums in "dydxprotocol.perpetuals" {
        1 singular uint32 perpetual_id: u32,
        2 repeated sint32 premiums: Vec<i32>,
    }
}

message! {
    pub struct PremiumStore in "dydxprotocol.perpetuals" {
        1 repeated message all_market_premiums: Vec<MarketPremiums>,
        /// How many premium samples have been taken.
        2 singular uint32 num_premiums: u32,
    }
}

message! {
    /// Margin requirements shared by a group of perpetuals.
    pub struct LiquidityTier in "dydxprotocol.perpetuals" {
        1 singular uint32 id: u32,
        2 singular string name: String,
        3 singular uint32 initial_margin_ppm: u32,
        /// Maintenance margin as a fraction of initial margin, in parts per million.
        4 singular uint32 maintenance_fraction_ppm: u32,
        5 singular uint64 base_position_notional: u64,
        6 singular uint64 impact_notional: u64,
        7 singular uint64 open_interest_lower_cap: u64,
        8 singular uint64 open_interest_upper_cap: u64,
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use serde_json::json;
    use v4_wire::Message as _;

    use super::*;
    use crate::amino::{
        Amino as _,
        AminoOptions,
    };

    #[test]
    fn premiums_are_packed_zigzag() {
        let premiums = MarketPremiums {
            perpetual_id: 1,
            premiums: vec![-1, 1, -64],
        };
        let encoded = premiums.encode().unwrap();
        assert_eq!(&hex!("08 01 12 03 01 02 7f")[..], &encoded[..]);
        assert_eq!(premiums, MarketPremiums::decode(&encoded).unwrap());
    }

    #[test]
    fn empty_premiums_write_nothing() {
        let store = PremiumStore {
            all_market_premiums: vec![MarketPremiums::default()],
            num_premiums: 0,
        };
        assert_eq!(&hex!("0a 00")[..], &store.encode().unwrap()[..]);
    }

    #[test]
    fn perpetual_without_params_leaves_them_out() {
        let perpetual = Perpetual {
            funding_index: Bytes::from_static(&[0x02, 0x01]),
            ..Perpetual::default()
        };
        let encoded = perpetual.encode().unwrap();
        assert_eq!(&hex!("12 02 02 01")[..], &encoded[..]);
        assert_eq!(perpetual, Perpetual::decode(&encoded).unwrap());
        assert!(perpetual
            .to_amino(&AminoOptions::default())
            .get("params")
            .is_none());
    }

    #[test]
    fn params_amino_uses_names_and_signed_numbers() {
        let params = PerpetualParams {
            ticker: "BTC-USD".to_string(),
            atomic_resolution: -10,
            market_type: PerpetualMarketType::Cross,
            ..PerpetualParams::default()
        };
        assert_eq!(
            json!({
                "id": 0,
                "ticker": "BTC-USD",
                "market_id": 0,
                "atomic_resolution": -10,
                "default_funding_ppm": 0,
                "liquidity_tier": 0,
                "market_type": "PERPETUAL_MARKET_TYPE_CROSS",
            }),
            params.to_amino_value(&AminoOptions::default())
        );
    }
}
