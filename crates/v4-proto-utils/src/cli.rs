use clap::{
    Parser,
    Subcommand,
};

use super::{
    decode,
    encode,
};

/// Converts dYdX v4 messages between protobuf wire bytes and Amino JSON
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the type URLs of every known message
    Types,

    /// Decode wire bytes from an arg or stdin and print their Amino JSON
    #[command(arg_required_else_help = true)]
    Decode(decode::Args),

    /// Encode Amino JSON from an arg or stdin and print the wire bytes
    #[command(arg_required_else_help = true)]
    Encode(encode::Args),
}

#[must_use]
pub fn get() -> Command {
    Cli::parse().command
}
