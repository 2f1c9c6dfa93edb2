#![doc = include_str!("../README.md")]

#[macro_use]
mod macros;

pub mod amino;
mod any;
pub mod clob;
mod name;
pub mod perpetuals;
pub mod ratelimit;
mod registry;
pub mod subaccounts;
pub mod ve;

#[cfg(test)]
mod tests;

pub use any::{
    Any,
    AnyError,
};
pub use name::Name;
pub use registry::{
    Registry,
    RegistryError,
    RegistryErrorKind,
};
pub use v4_wire;
pub use v4_wire::Message;
