//! Log output.
//!
//! Events go to stderr as plain lines. Info events carry no prefix; other
//! levels are prefixed with their name, e.g. `WARN: uv found but ...`.

use std::fmt;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Event formatter that renders `LEVEL: message` lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixFormat;

impl<S, N> FormatEvent<S, N> for PrefixFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let prefix = match *event.metadata().level() {
            Level::ERROR => "ERROR: ",
            Level::WARN => "WARN: ",
            Level::INFO => "",
            Level::DEBUG => "DEBUG: ",
            Level::TRACE => "TRACE: ",
        };
        writer.write_str(prefix)?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Install the global subscriber, writing to stderr.
///
/// Does nothing if a subscriber is already installed.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing::subscriber::set_global_default(subscriber(filter, std::io::stderr));
}

fn subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .event_format(PrefixFormat)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(filter: &str, emit: impl FnOnce()) -> String {
        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = subscriber(EnvFilter::new(filter), move || writer.clone());
        tracing::subscriber::with_default(subscriber, emit);
        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_prefixes() {
        let out = capture("debug", || {
            tracing::info!("Node.js is satisfied");
            tracing::warn!("npx is missing");
            tracing::error!("no viable install strategy");
            tracing::debug!("fix: install sudo");
        });
        assert_eq!(
            out,
            "Node.js is satisfied\nWARN: npx is missing\nERROR: no viable install strategy\nDEBUG: fix: install sudo\n"
        );
    }

    #[test]
    fn test_filter_hides_debug() {
        let out = capture(DEFAULT_FILTER, || {
            tracing::debug!("hidden");
            tracing::info!("[dry-run] would run: npm install -g @openai/codex");
        });
        assert_eq!(out, "[dry-run] would run: npm install -g @openai/codex\n");
    }
}
