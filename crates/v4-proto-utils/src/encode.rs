use tracing::debug;
use v4_eyre::eyre::{
    bail,
    Result,
    WrapErr as _,
};
use v4_proto::{
    amino::AminoMsg,
    Registry,
};

pub use crate::input::Encoding;
use crate::input;

#[derive(clap::Args, Debug)]
pub struct Args {
    /// Amino JSON of the message, or `-` to read it from stdin
    #[arg(value_name = "JSON")]
    input: String,

    /// The type URL of the message. If absent the input must be a
    /// `{"type": .., "value": ..}` envelope
    #[arg(long)]
    type_url: Option<String>,

    /// How to write the encoded bytes
    #[arg(long, default_value_t = Encoding::Base64, value_enum)]
    encoding: Encoding,
}

/// Reads `input` as the Amino JSON of a message and prints its wire encoding.
///
/// # Errors
///
/// Returns an error if the input is not JSON, does not convert to the message, or
/// the type URL is unknown.
pub fn run(
    Args {
        input,
        type_url,
        encoding,
    }: Args,
) -> Result<()> {
    let json: serde_json::Value =
        serde_json::from_str(&input::read(input)?).wrap_err("failed to parse input as json")?;
    let (type_url, value) = match type_url {
        Some(type_url) => (type_url, json),
        None => {
            let Ok(AminoMsg {
                type_url,
                value,
            }) = serde_json::from_value(json)
            else {
                bail!("input is not a `{{\"type\": .., \"value\": ..}}` envelope; pass --type-url");
            };
            (type_url, value)
        }
    };
    debug!(%type_url, "encoding message");

    let bytes = Registry::with_dydx_types()
        .encode_from_amino(&type_url, &value)
        .wrap_err("failed to convert amino json to protobuf")?;
    println!("{}", encoding.encode(&bytes));
    Ok(())
}
