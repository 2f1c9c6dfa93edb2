//! Withdrawal rate limits (`dydxprotocol.ratelimit`).

use bytes::Bytes;

message! {
    /// The rate limits that apply to one denomination.
    pub struct LimitParams in "dydxprotocol.ratelimit" {
        1 singular string denom: String,
        2 repeated message limiters: Vec<Limiter>,
    }
}

message! {
    /// The maximum of `baseline_minimum` and `baseline_tvl_ppm` of the total value
    /// locked may be withdrawn per `period_sec`.
    pub struct Limiter in "dydxprotocol.ratelimit" {
        2 singular uint32 period_sec: u32,
        /// A serialized big integer.
        3 singular bytes baseline_minimum: Bytes,
        4 singular uint32 baseline_tvl_ppm: u32,
    }
}
