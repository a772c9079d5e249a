use crate::logger::LogPipeline;
use crate::record::{LogLevel, LogMessage};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// Targets whose events are never forwarded. The HTTP stack used by the
/// remote sink logs through `tracing` as well; forwarding it would turn
/// every delivery into more deliveries.
pub const DEFAULT_IGNORED_TARGETS: &[&str] = &[
    "hyper",
    "hyper_util",
    "reqwest",
    "h2",
    "rustls",
    "tokio",
    "runtime",
    "want",
    "mio",
    "request_log_sink",
];

/// Field names carrying an error trace.
const TRACE_FIELDS: &[&str] = &["trace", "error.trace", "backtrace"];

/// `tracing_subscriber` layer that routes `tracing` events into
/// [`AppLogger`](crate::logger::AppLogger)s, using the event target as
/// the logger context.
///
/// This is how code that only knows the `tracing` macros ends up in the
/// same console format and the same remote collector.
pub struct AppLoggerLayer {
    pipeline: LogPipeline,
    max_level: Level,
    ignored_targets: Vec<String>,
}

impl AppLoggerLayer {
    pub fn new(pipeline: LogPipeline, max_level: Level, ignored_targets: Vec<String>) -> Self {
        AppLoggerLayer {
            pipeline,
            max_level,
            ignored_targets,
        }
    }

    fn is_ignored(&self, target: &str) -> bool {
        self.ignored_targets.iter().any(|prefix| {
            target == prefix.as_str()
                || (target.starts_with(prefix.as_str()) && target[prefix.len()..].starts_with("::"))
        })
    }
}

pub fn map_level(level: &Level) -> LogLevel {
    match *level {
        Level::ERROR => LogLevel::Error,
        Level::WARN => LogLevel::Warn,
        Level::INFO => LogLevel::Info,
        Level::DEBUG => LogLevel::Debug,
        Level::TRACE => LogLevel::Verbose,
    }
}

impl<S> Layer<S> for AppLoggerLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if *meta.level() > self.max_level || self.is_ignored(meta.target()) {
            return;
        }

        let mut fields = BTreeMap::new();
        let mut message: Option<String> = None;

        let mut visitor = FieldVisitor { fields: &mut fields, message: &mut message };
        event.record(&mut visitor);

        let trace = TRACE_FIELDS
            .iter()
            .find_map(|name| fields.remove(*name))
            .map(|v| match v {
                Value::String(s) => s,
                other => other.to_string(),
            });

        let logger = self.pipeline.logger(meta.target());
        let message = build_message(message, fields);
        match map_level(meta.level()) {
            LogLevel::Error => logger.error(message, trace.as_deref()),
            LogLevel::Warn => logger.warn(message),
            LogLevel::Info => logger.info(message),
            LogLevel::Debug => logger.debug(message),
            LogLevel::Verbose => logger.verbose(message),
        }
    }
}

/// Message text with remaining fields appended as `key=value`. An event
/// without a message becomes a structured payload of its fields.
fn build_message(message: Option<String>, fields: BTreeMap<String, Value>) -> LogMessage {
    match message {
        Some(text) if fields.is_empty() => LogMessage::Text(text),
        Some(mut text) => {
            for (key, value) in &fields {
                match value {
                    Value::String(s) => text.push_str(&format!(" {}={}", key, s)),
                    other => text.push_str(&format!(" {}={}", key, other)),
                }
            }
            LogMessage::Text(text)
        }
        None => LogMessage::Structured(Value::Object(fields.into_iter().collect())),
    }
}

use tracing::field::{Field, Visit};

pub struct FieldVisitor<'a> {
    pub fields: &'a mut BTreeMap<String, Value>,
    pub message: &'a mut Option<String>,
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.fields.insert(field.name().to_string(), Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.fields.insert(field.name().to_string(), Value::String(format!("{:?}", value)));
        }
    }
}
