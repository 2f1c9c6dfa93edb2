use v4_eyre::eyre::Result;
use v4_proto::Registry;

/// Prints the type URL of every known message, one per line.
///
/// # Errors
///
/// Infallible; returns a `Result` like the other subcommands.
pub fn run() -> Result<()> {
    for type_url in Registry::with_dydx_types().type_urls() {
        println!("{type_url}");
    }
    Ok(())
}
