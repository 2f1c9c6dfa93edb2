//! A caller-owned table from type URL to the conversions of the registered
//! message.

use bytes::Bytes;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;
use v4_wire::{
    DecodeError,
    EncodeError,
    Message,
};

use crate::{
    amino::{
        Amino,
        AminoError,
        AminoOptions,
    },
    clob,
    perpetuals,
    ratelimit,
    subaccounts,
    ve,
    Any,
    Name,
};

type DecodeToAmino = fn(&[u8], &AminoOptions) -> Result<Value, RegistryError>;
type EncodeFromAmino = fn(&Value) -> Result<Bytes, RegistryError>;

#[derive(Clone, Copy)]
struct Entry {
    decode_to_amino: DecodeToAmino,
    encode_from_amino: EncodeFromAmino,
}

fn decode_to_amino<M: Message + Name + Amino>(
    bytes: &[u8],
    options: &AminoOptions,
) -> Result<Value, RegistryError> {
    let message = M::decode(bytes).map_err(|source| RegistryError::decode(M::type_url(), source))?;
    Ok(message.to_amino_value(options))
}

fn encode_from_amino<M: Message + Name + Amino>(value: &Value) -> Result<Bytes, RegistryError> {
    let message =
        M::from_amino_value(value).map_err(|source| RegistryError::amino(M::type_url(), source))?;
    message
        .encode()
        .map_err(|source| RegistryError::encode(M::type_url(), source))
}

/// Maps type URLs to the wire and Amino conversions of their messages.
///
/// A registry holds no global state; independent registries may coexist and
/// are cheap to clone.
#[derive(Clone, Default)]
pub struct Registry {
    entries: IndexMap<String, Entry>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("type_urls", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Registry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every message type of this crate.
    #[must_use]
    pub fn with_dydx_types() -> Self {
        let mut registry = Self::new();
        registry
            .register::<subaccounts::SubaccountId>()
            .register::<subaccounts::AssetPosition>()
            .register::<subaccounts::PerpetualPosition>()
            .register::<subaccounts::Subaccount>()
            .register::<clob::OrderId>()
            .register::<clob::OrdersFilledDuringLatestBlock>()
            .register::<clob::PotentiallyPrunableOrders>()
            .register::<clob::OrderFillState>()
            .register::<clob::StatefulOrderTimeSliceValue>()
            .register::<clob::LongTermOrderPlacement>()
            .register::<clob::ConditionalOrderPlacement>()
            .register::<clob::Order>()
            .register::<clob::TransactionOrdering>()
            .register::<clob::ClobMatch>()
            .register::<clob::MakerFill>()
            .register::<clob::MatchOrders>()
            .register::<clob::MatchPerpetualLiquidation>()
            .register::<clob::MatchPerpetualDeleveraging>()
            .register::<clob::Fill>()
            .register::<clob::ClobPair>()
            .register::<clob::PerpetualClobMetadata>()
            .register::<clob::SpotClobMetadata>()
            .register::<clob::LiquidationsConfig>()
            .register::<clob::SubaccountBlockLimits>()
            .register::<clob::EquityTierLimitConfiguration>()
            .register::<clob::EquityTierLimit>()
            .register::<clob::BlockRateLimitConfiguration>()
            .register::<clob::MaxPerNBlocksRateLimit>()
            .register::<clob::OrderRemoval>()
            .register::<clob::ProcessProposerMatchesEvents>()
            .register::<clob::SubaccountLiquidationInfo>()
            .register::<clob::OperationRaw>()
            .register::<clob::MsgCreateClobPair>()
            .register::<clob::MsgCreateClobPairResponse>()
            .register::<clob::MsgProposedOperations>()
            .register::<clob::MsgProposedOperationsResponse>()
            .register::<clob::MsgPlaceOrder>()
            .register::<clob::MsgPlaceOrderResponse>()
            .register::<clob::MsgCancelOrder>()
            .register::<clob::MsgCancelOrderResponse>()
            .register::<clob::MsgUpdateClobPair>()
            .register::<clob::MsgUpdateClobPairResponse>()
            .register::<clob::MsgUpdateEquityTierLimitConfiguration>()
            .register::<clob::MsgUpdateEquityTierLimitConfigurationResponse>()
            .register::<clob::MsgUpdateBlockRateLimitConfiguration>()
            .register::<clob::MsgUpdateBlockRateLimitConfigurationResponse>()
            .register::<clob::MsgUpdateLiquidationsConfig>()
            .register::<clob::MsgUpdateLiquidationsConfigResponse>()
            .register::<perpetuals::PerpetualParams>()
            .register::<perpetuals::Perpetual>()
            .register::<perpetuals::MarketPremiums>()
            .register::<perpetuals::PremiumStore>()
            .register::<perpetuals::LiquidityTier>()
            .register::<ratelimit::LimitParams>()
            .register::<ratelimit::Limiter>()
            .register::<ve::DaemonVoteExtension>()
            .register::<ve::PricePair>();
        registry
    }

    /// Adds `M` under its type URL, replacing an earlier registration of the same URL.
    pub fn register<M: Message + Name + Amino>(&mut self) -> &mut Self {
        let type_url = M::type_url();
        debug!(%type_url, "registering message type");
        self.entries.insert(
            type_url,
            Entry {
                decode_to_amino: decode_to_amino::<M>,
                encode_from_amino: encode_from_amino::<M>,
            },
        );
        self
    }

    #[must_use]
    pub fn contains(&self, type_url: &str) -> bool {
        self.entries.contains_key(type_url)
    }

    /// The registered type URLs in registration order.
    pub fn type_urls(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn get(&self, type_url: &str) -> Result<&Entry, RegistryError> {
        self.entries.get(type_url).ok_or_else(|| {
            debug!(type_url, "no message type registered for type url");
            RegistryError::unknown_type_url(type_url)
        })
    }

    /// Decodes `bytes` as the message registered under `type_url` and renders its
    /// Amino object.
    ///
    /// # Errors
    /// Returns an error if `type_url` is not registered or `bytes` do not decode.
    pub fn decode_to_amino(
        &self,
        type_url: &str,
        bytes: &[u8],
        options: &AminoOptions,
    ) -> Result<Value, RegistryError> {
        (self.get(type_url)?.decode_to_amino)(bytes, options)
    }

    /// Reads the Amino object of the message registered under `type_url` and
    /// encodes it.
    ///
    /// # Errors
    /// Returns an error if `type_url` is not registered or `value` does not convert.
    pub fn encode_from_amino(&self, type_url: &str, value: &Value) -> Result<Bytes, RegistryError> {
        (self.get(type_url)?.encode_from_amino)(value)
    }

    /// Renders the Amino object of the message carried in `any`.
    ///
    /// # Errors
    /// Returns an error if the type of `any` is not registered or its bytes do not
    /// decode.
    pub fn decode_any(&self, any: &Any, options: &AminoOptions) -> Result<Value, RegistryError> {
        self.decode_to_amino(&any.type_url, &any.value, options)
    }
}

#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct RegistryError(RegistryErrorKind);

impl RegistryError {
    #[must_use]
    pub fn kind(&self) -> &RegistryErrorKind {
        &self.0
    }

    fn unknown_type_url(type_url: &str) -> Self {
        Self(RegistryErrorKind::UnknownTypeUrl {
            type_url: type_url.to_string(),
        })
    }

    fn decode(type_url: String, source: DecodeError) -> Self {
        Self(RegistryErrorKind::Decode {
            type_url,
            source,
        })
    }

    fn encode(type_url: String, source: EncodeError) -> Self {
        Self(RegistryErrorKind::Encode {
            type_url,
            source,
        })
    }

    fn amino(type_url: String, source: AminoError) -> Self {
        Self(RegistryErrorKind::Amino {
            type_url,
            source,
        })
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RegistryErrorKind {
    #[error("no message type is registered for `{type_url}`")]
    UnknownTypeUrl { type_url: String },
    #[error("failed to decode `{type_url}` from its protobuf encoding")]
    Decode {
        type_url: String,
        source: DecodeError,
    },
    #[error("failed to encode `{type_url}` to protobuf")]
    Encode {
        type_url: String,
        source: EncodeError,
    },
    #[error("failed to read `{type_url}` from amino json")]
    Amino {
        type_url: String,
        source: AminoError,
    },
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use serde_json::json;

    use super::*;
    use crate::clob::{
        BlockRateLimitConfiguration,
        MaxPerNBlocksRateLimit,
        Order,
    };

    #[test]
    fn empty_registry_knows_nothing() {
        let registry = Registry::new();
        assert!(registry.is_empty());
        let err = registry
            .decode_to_amino("/dydxprotocol.clob.Order", &[], &AminoOptions::default())
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            RegistryErrorKind::UnknownTypeUrl { type_url } if type_url == "/dydxprotocol.clob.Order"
        ));
    }

    #[test]
    fn every_registered_type_has_a_distinct_url() {
        let registry = Registry::with_dydx_types();
        let urls = registry.type_urls().collect::<Vec<_>>();
        assert_eq!(registry.len(), urls.len());
        assert_eq!(Some(&"/dydxprotocol.subaccounts.SubaccountId"), urls.first());
        assert!(registry.contains("/dydxprotocol.clob.MatchPerpetualDeleveraging.Fill"));
        assert!(registry.contains("/dydxprotocol.ve.DaemonVoteExtension"));
        assert!(!registry.contains("/google.protobuf.Any"));
    }

    #[test]
    fn every_registered_type_converts_its_default() {
        let registry = Registry::with_dydx_types();
        for type_url in registry.type_urls() {
            let value = registry
                .decode_to_amino(type_url, &[], &AminoOptions::default())
                .unwrap();
            let bytes = registry.encode_from_amino(type_url, &value).unwrap();
            assert!(bytes.is_empty(), "{type_url}");
            let again = registry
                .decode_to_amino(type_url, &bytes, &AminoOptions::default())
                .unwrap();
            assert_eq!(value, again, "{type_url}");
        }
    }

    #[test]
    fn rate_limits_cross_between_bytes_and_amino() {
        let registry = Registry::with_dydx_types();
        let url = BlockRateLimitConfiguration::type_url();
        let value = registry
            .decode_to_amino(&url, &hex!("0a 04 08 01 10 64"), &AminoOptions::default())
            .unwrap();
        assert_eq!(
            json!({
                "max_short_term_orders_per_n_blocks": [{"num_blocks": 1, "limit": 100}],
                "max_stateful_orders_per_n_blocks": [],
                "max_short_term_order_cancellations_per_n_blocks": [],
            }),
            value
        );
        let config = BlockRateLimitConfiguration {
            max_short_term_orders_per_n_blocks: vec![MaxPerNBlocksRateLimit {
                num_blocks: 1,
                limit: 100,
            }],
            ..BlockRateLimitConfiguration::default()
        };
        assert_eq!(
            config.encode().unwrap(),
            registry.encode_from_amino(&url, &value).unwrap()
        );
    }

    #[test]
    fn decode_any_dispatches_on_the_envelope_url() {
        let registry = Registry::with_dydx_types();
        let any = Any::from_msg(&Order::default()).unwrap();
        let value = registry.decode_any(&any, &AminoOptions::default()).unwrap();
        assert_eq!(Some(&json!("SIDE_UNSPECIFIED")), value.get("side"));
    }

    #[test]
    fn failures_name_the_type_url() {
        let registry = Registry::with_dydx_types();
        let err = registry
            .decode_to_amino(
                "/dydxprotocol.clob.OrderId",
                &hex!("0a 05 0a"),
                &AminoOptions::default(),
            )
            .unwrap_err();
        assert_eq!(
            "failed to decode `/dydxprotocol.clob.OrderId` from its protobuf encoding",
            err.to_string()
        );

        let err = registry
            .encode_from_amino("/dydxprotocol.clob.OrderId", &json!([]))
            .unwrap_err();
        assert!(matches!(err.kind(), RegistryErrorKind::Amino { .. }));
    }
}
