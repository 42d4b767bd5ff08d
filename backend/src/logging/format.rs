//! Pipe-delimited log line format.
//!
//! `L|HH:MM:SS.mmm|worker|logger|message` — one line per event, local time,
//! single-letter level. The logger column is the event's `logger` field when
//! present, otherwise the module target, so the audit trail can keep its own
//! name without spans.

use std::fmt;

use chrono::{DateTime, Local};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Event formatter producing the pipe-delimited line.
pub struct LineFormat;

#[derive(Default)]
struct LineVisitor {
    logger: Option<String>,
    message: String,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "logger" => self.logger = Some(value.to_owned()),
            "message" => self.message = value.to_owned(),
            _ => {}
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "logger" => self.logger = Some(format!("{value:?}")),
            "message" => self.message = format!("{value:?}"),
            _ => {}
        }
    }
}

fn level_letter(level: &Level) -> char {
    match *level {
        Level::TRACE => 'T',
        Level::DEBUG => 'D',
        Level::INFO => 'I',
        Level::WARN => 'W',
        Level::ERROR => 'E',
    }
}

fn worker_name() -> String {
    let current = std::thread::current();
    match current.name() {
        Some(name) if !name.is_empty() => name.to_owned(),
        _ => format!("{:?}", current.id()),
    }
}

/// Render one line without the trailing newline.
#[must_use]
pub fn render_line(
    level: &Level,
    at: DateTime<Local>,
    worker: &str,
    logger: &str,
    message: &str,
) -> String {
    format!(
        "{}|{}|{}|{}|{}",
        level_letter(level),
        at.format("%H:%M:%S%.3f"),
        worker,
        logger,
        message,
    )
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);
        let metadata = event.metadata();
        let logger = visitor
            .logger
            .unwrap_or_else(|| metadata.target().to_owned());
        writeln!(
            writer,
            "{}",
            render_line(
                metadata.level(),
                Local::now(),
                &worker_name(),
                &logger,
                &visitor.message,
            )
        )
    }
}
