//! Subaccounts and the positions they hold (`dydxprotocol.subaccounts`).

use bytes::Bytes;

message! {
    /// Identifies a subaccount: an owner address plus a subaccount number.
    pub struct SubaccountId in "dydxprotocol.subaccounts" {
        /// The bech32 address of the owning account.
        1 singular string owner: String,
        /// Unique per owner; valid numbers are 0 to 128000.
        2 singular uint32 number: u32,
    }
}

message! {
    /// A position in a single asset.
    pub struct AssetPosition in "dydxprotocol.subaccounts" {
        1 singular uint32 asset_id: u32,
        /// A serialized big integer; negative for a borrow.
        2 singular bytes quantums: Bytes,
        3 singular uint64 index: u64,
    }
}

message! {
    /// A position in a single perpetual.
    pub struct PerpetualPosition in "dydxprotocol.subaccounts" {
        1 singular uint32 perpetual_id: u32,
        2 singular bytes quantums: Bytes,
        /// The funding index last applied to the position.
        3 singular bytes funding_index: Bytes,
    }
}

message! {
    pub struct Subaccount in "dydxprotocol.subaccounts" {
        1 optional message id: Option<SubaccountId>,
        2 repeated message asset_positions: Vec<AssetPosition>,
        3 repeated message perpetual_positions: Vec<PerpetualPosition>,
        4 singular bool margin_enabled: bool,
        5 singular string asset_yield_index: String,
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
    fn subaccount_with_id_and_positions() {
        let subaccount = Subaccount {
            id: Some(SubaccountId {
                owner: "dydx1".to_string(),
                number: 2,
            }),
            asset_positions: vec![AssetPosition {
                asset_id: 0,
                quantums: Bytes::from_static(&[0x02, 0x0f]),
                index: 0,
            }],
            margin_enabled: true,
            ..Subaccount::default()
        };
        let encoded = subaccount.encode().unwrap();
        assert_eq!(
            &hex!("0a 09 0a 05 64 79 64 78 31 10 02 12 04 12 02 02 0f 20 01")[..],
            &encoded[..]
        );
        assert_eq!(subaccount, Subaccount::decode(&encoded).unwrap());
    }

    #[test]
    fn amino_of_asset_position_drops_empty_blob_and_zero_index() {
        let position = AssetPosition {
            asset_id: 0,
            quantums: Bytes::new(),
            index: 0,
        };
        assert_eq!(
            json!({"asset_id": 0}),
            position.to_amino_value(&AminoOptions::default())
        );
    }

    #[test]
    fn subaccount_without_id_has_no_id_key() {
        let object = Subaccount::default().to_amino(&AminoOptions::default());
        assert!(!object.contains_key("id"));
        assert_eq!(Some(&json!([])), object.get("asset_positions"));
    }
}
