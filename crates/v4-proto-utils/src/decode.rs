use clap::ValueEnum;
use tracing::debug;
use v4_eyre::eyre::{
    Result,
    WrapErr as _,
};
use v4_proto::{
    amino::{
        AminoMsg,
        AminoOptions,
        Omission,
    },
    Registry,
};

pub use crate::input::Encoding;
use crate::{
    input,
    Config,
};

#[derive(clap::Args, Debug)]
pub struct Args {
    /// Encoded message bytes, or `-` to read them from stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// The type URL of the message, e.g. `/dydxprotocol.clob.Order`
    #[arg(long)]
    type_url: String,

    /// How the input bytes are written
    #[arg(long, default_value_t = Encoding::Base64, value_enum)]
    encoding: Encoding,

    /// Configure formatting of output
    #[arg(short, long, default_value_t = Format::Json, value_enum)]
    format: Format,

    /// Which zero-valued fields to leave out: `upstream`, `defaults` or `nothing`
    /// [default: the `V4_PROTO_UTILS_AMINO_OMIT` setting]
    #[arg(long)]
    omit: Option<Omission>,

    /// Wrap the output in a `{"type": .., "value": ..}` envelope
    #[arg(long)]
    envelope: bool,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Format {
    Json,
    Pretty,
}

/// Decodes `input` as the message named by its type URL and prints its Amino JSON.
///
/// # Errors
///
/// Returns an error if the input cannot be read or decoded, or the type URL is
/// unknown.
pub fn run(
    Args {
        input,
        type_url,
        encoding,
        format,
        omit,
        envelope,
    }: Args,
    config: &Config,
) -> Result<()> {
    let bytes = encoding.decode(&input::read(input)?)?;
    let options = AminoOptions::with_omission(omit.unwrap_or(config.amino_omit));
    debug!(%type_url, len = bytes.len(), ?options, "decoding message");

    let value = Registry::with_dydx_types()
        .decode_to_amino(&type_url, &bytes, &options)
        .wrap_err("failed to convert input to amino json")?;
    let output = if envelope {
        serde_json::to_value(AminoMsg {
            type_url,
            value,
        })
        .wrap_err("failed to wrap amino json in its envelope")?
    } else {
        value
    };
    let rendered = match format {
        Format::Json => serde_json::to_string(&output),
        Format::Pretty => serde_json::to_string_pretty(&output),
    }
    .wrap_err("failed to json-encode")?;
    println!("{rendered}");
    Ok(())
}
