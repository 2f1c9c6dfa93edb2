//! Initialize logging in the `v4-*` binaries.
//!
//! # Examples
//! ```no_run
//! v4_telemetry::configure()
//!     .set_filter_directives("info")
//!     .try_init()
//!     .expect("must be able to initialize telemetry");
//! tracing::info!("telemetry initialized");
//! ```
use std::io::IsTerminal as _;

use tracing_subscriber::{
    filter::{
        LevelFilter,
        ParseError,
    },
    layer::SubscriberExt as _,
    util::{
        SubscriberInitExt as _,
        TryInitError,
    },
    EnvFilter,
};

/// The errors that can occur when initializing telemetry.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct Error(ErrorKind);

impl Error {
    fn filter_directives(source: ParseError) -> Self {
        Self(ErrorKind::FilterDirectives(source))
    }

    fn init_subscriber(source: TryInitError) -> Self {
        Self(ErrorKind::InitSubscriber(source))
    }
}

#[derive(Debug, thiserror::Error)]
enum ErrorKind {
    #[error("failed to parse filter directives")]
    FilterDirectives(#[source] ParseError),
    #[error("failed installing global tracing subscriber")]
    InitSubscriber(#[source] TryInitError),
}

#[must_use = "the telemetry config must be initialized to be useful"]
pub fn configure() -> Config {
    Config::new()
}

struct BoxedMakeWriter(Box<dyn MakeWriter + Send + Sync + 'static>);

impl BoxedMakeWriter {
    fn new<M>(make_writer: M) -> Self
    where
        M: MakeWriter + Send + Sync + 'static,
    {
        Self(Box::new(make_writer))
    }
}

pub trait MakeWriter {
    fn make_writer(&self) -> Box<dyn std::io::Write + Send + Sync + 'static>;
}

impl<F, W> MakeWriter for F
where
    F: Fn() -> W,
    W: std::io::Write + Send + Sync + 'static,
{
    fn make_writer(&self) -> Box<dyn std::io::Write + Send + Sync + 'static> {
        Box::new((self)())
    }
}

impl MakeWriter for BoxedMakeWriter {
    fn make_writer(&self) -> Box<dyn std::io::Write + Send + Sync + 'static> {
        self.0.make_writer()
    }
}

pub struct Config {
    filter_directives: String,
    force_terminal: bool,
    pretty_print: bool,
    writer: BoxedMakeWriter,
}

impl Config {
    #[must_use = "telemetry must be initialized to be useful"]
    fn new() -> Self {
        Self {
            filter_directives: String::new(),
            force_terminal: false,
            pretty_print: false,
            writer: BoxedMakeWriter::new(std::io::stderr),
        }
    }
}

impl Config {
    #[must_use = "telemetry must be initialized to be useful"]
    pub fn set_filter_directives(mut self, filter_directives: &str) -> Self {
        self.filter_directives = filter_directives.to_string();
        self
    }

    /// Treats the output as a terminal even if stderr is not one.
    #[must_use = "telemetry must be initialized to be useful"]
    pub fn set_force_terminal(mut self, force_terminal: bool) -> Self {
        self.force_terminal = force_terminal;
        self
    }

    /// Writes compact human readable lines instead of json when the output is a
    /// terminal.
    #[must_use = "telemetry must be initialized to be useful"]
    pub fn set_pretty_print(mut self, pretty_print: bool) -> Self {
        self.pretty_print = pretty_print;
        self
    }

    #[must_use = "telemetry must be initialized to be useful"]
    pub fn set_writer<M>(mut self, writer: M) -> Self
    where
        M: MakeWriter + Send + Sync + 'static,
    {
        self.writer = BoxedMakeWriter::new(writer);
        self
    }

    /// Initialize telemetry, consuming the config.
    ///
    /// # Errors
    /// Fails if the filter directives could not be parsed or if the global tracing
    /// subscriber could not be installed.
    pub fn try_init(self) -> Result<(), Error> {
        let Self {
            filter_directives,
            force_terminal,
            pretty_print,
            writer,
        } = self;

        let env_filter = {
            let builder = EnvFilter::builder().with_default_directive(LevelFilter::INFO.into());
            builder
                .parse(filter_directives)
                .map_err(Error::filter_directives)?
        };

        let make_writer = move || writer.make_writer();
        let (compact_layer, json_layer) =
            if pretty_print && (force_terminal || std::io::stderr().is_terminal()) {
                let layer = tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(make_writer);
                (Some(layer), None)
            } else {
                let layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(make_writer);
                (None, Some(layer))
            };

        tracing_subscriber::registry()
            .with(compact_layer)
            .with(json_layer)
            .with(env_filter)
            .try_init()
            .map_err(Error::init_subscriber)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::Write,
        sync::{
            Arc,
            Mutex,
        },
    };

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn bad_directives_are_rejected() {
        let err = super::configure()
            .set_filter_directives("v4_proto=loud")
            .try_init()
            .unwrap_err();
        assert_eq!("failed to parse filter directives", err.to_string());
    }

    // Installs the global subscriber; the only test in this crate that may do so.
    #[test]
    fn events_are_written_as_json_lines() {
        let buffer = Buffer::default();
        let writer = buffer.clone();
        super::configure()
            .set_filter_directives("debug")
            .set_writer(move || writer.clone())
            .try_init()
            .unwrap();
        tracing::debug!(type_url = "/dydxprotocol.clob.Order", "decoding message");
        tracing::trace!("filtered out");

        let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        let line: Vec<_> = output.lines().collect();
        assert_eq!(1, line.len(), "{output}");
        assert!(line[0].contains(r#""message":"decoding message""#), "{output}");
        assert!(
            line[0].contains(r#""type_url":"/dydxprotocol.clob.Order""#),
            "{output}"
        );
    }
}
