use v4_eyre::eyre::{
    Result,
    WrapErr as _,
};
use v4_proto_utils::{
    cli::{
        self,
        Command,
    },
    decode,
    encode,
    types,
    Config,
};

fn main() -> Result<()> {
    v4_eyre::install()
        .expect("the v4 eyre install hook must be called before eyre reports are constructed");
    let command = cli::get();
    let config: Config =
        v4_config::get().wrap_err("failed to read configuration from the environment")?;
    v4_telemetry::configure()
        .set_filter_directives(&config.log)
        .set_pretty_print(true)
        .try_init()
        .wrap_err("failed to initialize logging")?;
    match command {
        Command::Types => types::run(),
        Command::Decode(args) => decode::run(args, &config),
        Command::Encode(args) => encode::run(args),
    }
}
