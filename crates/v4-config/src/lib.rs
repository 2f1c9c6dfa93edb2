//! A trait to read a config from the environment.
//!
//! # Example
//! ```no_run
//! use serde::{
//!     Deserialize,
//!     Serialize,
//! };
//! use v4_config as config;
//!
//! #[derive(Clone, Debug, Serialize, Deserialize)]
//! #[serde(deny_unknown_fields)]
//! pub struct MyConfig {
//!     pub log: String,
//!     pub amino_omit: String,
//! }
//!
//! impl config::Config for MyConfig {
//!     const PREFIX: &'static str = "MY_TOOL_";
//! }
//!
//! let config: MyConfig = config::get().unwrap();
//! ```
use serde::{
    de::DeserializeOwned,
    Serialize,
};


#[cfg(feature = "tests")]
pub use tests::{
    config_should_reject_unknown_var,
    example_env_config_is_up_to_date,
};

/// Utility function to get a config without having to import the `Config` trait.
///
/// # Errors
/// See [`Config::get`].
pub fn get<T: Config>() -> Result<T, figment::Error> {
    T::get()
}

pub trait Config: Serialize + DeserializeOwned {
    /// The prefix of every variable of this config, e.g. `V4_PROTO_UTILS_`.
    const PREFIX: &'static str;

    /// Reads `RUST_LOG` as `log`, then every variable starting with [`Config::PREFIX`].
    ///
    /// # Errors
    /// Returns an error if a variable is missing, unknown to a config that denies
    /// unknown fields, or of the wrong type.
    fn get() -> Result<Self, figment::Error> {
        Self::get_with_prefix(Self::PREFIX, _internal::Internal)
    }

    #[doc(hidden)]
    fn get_with_prefix(
        prefix: &str,
        _internal: _internal::Internal,
    ) -> Result<Self, figment::Error> {
        use figment::{
            providers::Env as FigmentEnv,
            Figment,
        };
        Figment::new()
            .merge(FigmentEnv::prefixed("RUST_").split("_").only(&["log"]))
            .merge(FigmentEnv::prefixed(prefix))
            .extract()
    }
}

mod _internal {
    pub struct Internal;
}
