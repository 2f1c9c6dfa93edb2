#![doc = include_str!("../README.md")]

#[cfg(feature = "benchmark")]
mod benchmarks;
mod error;
pub mod field;
mod message;
mod reader;
pub mod varint;
mod wire_type;
mod writer;


pub use error::{
    DecodeError,
    DecodeErrorKind,
    EncodeError,
    EncodeErrorKind,
};
pub use field::enumeration::Enumeration;
pub use message::Message;
pub use reader::{
    Reader,
    DEFAULT_RECURSION_LIMIT,
};
pub use wire_type::{
    key,
    Tag,
    WireType,
    MAX_FIELD_NUMBER,
    MIN_FIELD_NUMBER,
};
pub use writer::{
    Writer,
    MAX_LENGTH,
};
