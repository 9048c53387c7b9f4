//! Logging integration.
//!
//! The registrar logs through [`tracing`]. This module provides the
//! recommended line format for those logs, an ANSI-stripping writer for when
//! colored logs end up in a file, and a one-call subscriber setup.

use std::borrow::Cow;
use std::io;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;

use crate::colors::Palette;

/// The recommended log line layout.
pub const RECOMMENDED_FORMAT: &str = "[{level}] Admin registrar: {message}";

static ANSI_ESCAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new("\x01?\x1b\\[((?:\\d|;)*)([a-zA-Z])\x02?").expect("ANSI escape pattern is valid")
});

/// Removes ANSI escape sequences from `text`.
///
/// # Examples
///
/// ```
/// use django_rs_admin_registrar::logging::strip_ansi;
///
/// assert_eq!(strip_ansi("\x1b[1;32mProduct\x1b[0m"), "Product");
/// ```
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    ANSI_ESCAPE.replace_all(text, "")
}

/// Formats events as `[LEVEL] Admin registrar: message`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistrarFormatter {
    palette: Palette,
}

impl RegistrarFormatter {
    /// Creates a formatter painting the prefix with `palette`.
    pub const fn new(palette: Palette) -> Self {
        Self { palette }
    }
}

impl<S, N> FormatEvent<S, N> for RegistrarFormatter
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
        write!(
            writer,
            "[{}] {}: ",
            event.metadata().level(),
            self.palette.paint(self.palette.cyan, "Admin registrar")
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// A [`MakeWriter`] that strips ANSI escape sequences from everything written.
#[derive(Debug, Clone, Copy)]
pub struct StripAnsi<M> {
    inner: M,
}

impl<M> StripAnsi<M> {
    /// Wraps another writer factory.
    pub const fn new(inner: M) -> Self {
        Self { inner }
    }
}

impl<'a, M: MakeWriter<'a>> MakeWriter<'a> for StripAnsi<M> {
    type Writer = StripAnsiWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        StripAnsiWriter::new(self.inner.make_writer())
    }
}

/// The writer produced by [`StripAnsi`].
///
/// Output is held back until a newline, so an escape sequence or a UTF-8
/// character split across two writes is still handled as a whole. A trailing
/// partial line goes out on [`flush`](io::Write::flush) or drop.
#[derive(Debug)]
pub struct StripAnsiWriter<W: io::Write> {
    inner: W,
    pending: Vec<u8>,
}

impl<W: io::Write> StripAnsiWriter<W> {
    /// Wraps a writer.
    pub const fn new(inner: W) -> Self {
        Self {
            inner,
            pending: Vec::new(),
        }
    }

    fn write_stripped(&mut self, end: usize) -> io::Result<()> {
        let chunk: Vec<u8> = self.pending.drain(..end).collect();
        let text = String::from_utf8_lossy(&chunk);
        self.inner.write_all(strip_ansi(&text).as_bytes())
    }
}

impl<W: io::Write> io::Write for StripAnsiWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        if let Some(last_newline) = self.pending.iter().rposition(|&b| b == b'\n') {
            self.write_stripped(last_newline + 1)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            self.write_stripped(self.pending.len())?;
        }
        self.inner.flush()
    }
}

impl<W: io::Write> Drop for StripAnsiWriter<W> {
    fn drop(&mut self) {
        io::Write::flush(self).ok();
    }
}

/// Installs a global subscriber using [`RegistrarFormatter`].
///
/// `level` is an `EnvFilter` directive such as `"debug"` or
/// `"django_rs_admin_registrar=debug"`. Without colors, output goes through
/// [`StripAnsi`] so stray escape sequences never reach the log. Installing
/// twice is a no-op.
pub fn setup_logging(level: &str, colored: bool) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    if colored {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .event_format(RegistrarFormatter::new(Palette::ansi()))
            .with_writer(io::stderr)
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .event_format(RegistrarFormatter::new(Palette::plain()))
            .with_writer(StripAnsi::new(io::stderr))
            .try_init()
            .ok();
    }
}
