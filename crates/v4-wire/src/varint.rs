//! Base-128 varints and the zig-zag mapping used by `sint32`/`sint64` fields.

/// The longest a varint encoding a 64-bit value can be.
pub const MAX_VARINT_LEN: usize = 10;

/// The number of bytes `value` occupies when encoded as a varint.
#[must_use]
pub const fn encoded_len(value: u64) -> usize {
    // 7 payload bits per byte; `| 1` gives zero a length of one.
    let bits = 64 - (value | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}

/// Maps a signed 32-bit integer onto an unsigned one so that small magnitudes stay small.
#[must_use]
#[expect(
    clippy::cast_sign_loss,
    reason = "zig-zag is a bit-level reinterpretation of the shifted value"
)]
pub const fn zigzag_encode_32(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

/// Inverse of [`zigzag_encode_32`].
#[must_use]
#[expect(
    clippy::cast_possible_wrap,
    reason = "zig-zag is a bit-level reinterpretation of the shifted value"
)]
pub const fn zigzag_decode_32(value: u32) -> i32 {
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}

/// Maps a signed 64-bit integer onto an unsigned one so that small magnitudes stay small.
#[must_use]
#[expect(
    clippy::cast_sign_loss,
    reason = "zig-zag is a bit-level reinterpretation of the shifted value"
)]
pub const fn zigzag_encode_64(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of [`zigzag_encode_64`].
#[must_use]
#[expect(
    clippy::cast_possible_wrap,
    reason = "zig-zag is a bit-level reinterpretation of the shifted value"
)]
pub const fn zigzag_decode_64(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}
