use std::io::Read as _;

use base64::{
    prelude::BASE64_STANDARD,
    Engine as _,
};
use clap::ValueEnum;
use v4_eyre::eyre::{
    Result,
    WrapErr as _,
};

/// How wire bytes are written as text.
#[derive(ValueEnum, Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Encoding {
    #[default]
    Base64,
    Hex,
}

impl Encoding {
    pub(crate) fn decode(self, text: &str) -> Result<Vec<u8>> {
        match self {
            Self::Base64 => BASE64_STANDARD
                .decode(text)
                .wrap_err("failed to decode input as base64"),
            Self::Hex => hex::decode(text.strip_prefix("0x").unwrap_or(text))
                .wrap_err("failed to decode input as hex"),
        }
    }

    pub(crate) fn encode(self, bytes: &[u8]) -> String {
        match self {
            Self::Base64 => BASE64_STANDARD.encode(bytes),
            Self::Hex => hex::encode(bytes),
        }
    }
}

/// Returns `input` itself, or all of stdin if it is `-`, without surrounding
/// whitespace.
pub(crate) fn read(input: String) -> Result<String> {
    let text = if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .wrap_err("failed to read input from stdin")?;
        text
    } else {
        input
    };
    Ok(text.trim().to_string())
}
