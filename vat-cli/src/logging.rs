use anyhow::{Context, Result};
use chrono::Local;
use std::{
    fs::File,
    io::{self, IsTerminal},
    path::Path,
    sync::Mutex,
};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

const DEFAULT_DIRECTIVE: &str = "info";

// --- Formatter ---

struct LocalFmt;

impl<S, N> FormatEvent<S, N> for LocalFmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();

        if ansi {
            write!(writer, "\x1b[2m")?
        }
        write!(
            writer,
            "{} ",
            Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )?;
        if ansi {
            write!(writer, "\x1b[0m")?
        }

        let (pre, post) = if ansi {
            match *meta.level() {
                Level::ERROR => ("\x1b[1;31m", "\x1b[0m"),
                Level::WARN => ("\x1b[1;33m", "\x1b[0m"),
                Level::INFO => ("\x1b[1;32m", "\x1b[0m"),
                Level::DEBUG => ("\x1b[1;34m", "\x1b[0m"),
                Level::TRACE => ("\x1b[1;35m", "\x1b[0m"),
            }
        } else {
            ("", "")
        };
        write!(writer, "{}{:>5}{} ", pre, meta.level(), post)?;

        if ansi {
            write!(writer, "\x1b[36m{}\x1b[0m ", meta.target())?;
        } else {
            write!(writer, "{} ", meta.target())?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

// --- Filter ---

/// Picks the filter directive: `RUST_LOG` first, then the configured level,
/// then `info`. Blank values count as unset.
fn filter_directive(
    env: Option<&str>,
    configured: Option<&str>,
) -> String {
    [env, configured]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|directive| !directive.is_empty())
        .unwrap_or(DEFAULT_DIRECTIVE)
        .to_ascii_lowercase()
}

fn make_filter(configured: Option<&str>) -> Result<EnvFilter> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = filter_directive(env.as_deref(), configured);
    EnvFilter::try_new(&directive).with_context(|| format!("invalid log level '{directive}'"))
}

// --- Public API ---

/// Initializes logging. Call once at startup.
///
/// - Stderr: coloured when attached to a terminal, plain when piped.
/// - File: records are appended to `log_file` when one is given. The
///   directory must already exist.
/// - Level: `RUST_LOG`, else `level`, else INFO.
pub fn init_logging(
    level: Option<&str>,
    log_file: Option<&Path>,
) -> Result<()> {
    let filter = make_filter(level)?;

    let file_layer = log_file
        .map(|path| {
            File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file '{}'", path.display()))
        })
        .transpose()?
        .map(|file| {
            tracing_subscriber::fmt::layer()
                .event_format(LocalFmt)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
        });

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("logging already initialized")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn env_directive_wins() {
        assert_eq!(filter_directive(Some("debug"), Some("warn")), "debug");
    }

    #[test]
    fn configured_level_used_without_env() {
        assert_eq!(filter_directive(None, Some("WARN")), "warn");
    }

    #[test]
    fn blank_values_fall_through_to_info() {
        assert_eq!(filter_directive(Some("  "), None), "info");
        assert_eq!(filter_directive(None, None), "info");
    }

    #[test]
    fn invalid_configured_level_is_rejected() {
        assert!(EnvFilter::try_new(filter_directive(None, Some("vat_core=loud"))).is_err());
    }
}
