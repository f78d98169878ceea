//! Minimal stderr subscriber for `tracing`
//!
//! Filtering follows `RUST_LOG`: a comma separated list of `level` or
//! `target=level` entries. Without `RUST_LOG` nothing is printed unless the
//! caller asks for a default level.

use std::env;
use std::fmt::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Metadata, Subscriber};

struct StringVisitor<'a> {
    string: &'a mut String,
}

impl Visit for StringVisitor<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.string, "{:?} ", value);
        } else {
            let _ = write!(self.string, "{} = {:?}; ", field.name(), value);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LogFilter {
    target: Option<String>,
    level: Option<Level>,
}

fn string_to_level(string: &str) -> Option<Level> {
    match string.to_lowercase().as_str() {
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "warn" | "warning" => Some(Level::WARN),
        "trace" => Some(Level::TRACE),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

fn parse_filters(value: &str) -> Vec<LogFilter> {
    value
        .split(',')
        .filter(|f| !f.trim().is_empty())
        .map(|filter| {
            let filter = filter.trim();
            match filter.split_once('=') {
                Some((target, level)) => LogFilter {
                    target: Some(target.to_string()),
                    level: string_to_level(level),
                },
                None => match string_to_level(filter) {
                    Some(level) => LogFilter { target: None, level: Some(level) },
                    None => LogFilter { target: Some(filter.to_string()), level: None },
                },
            }
        })
        .collect()
}

/// Prints `LEVEL target: message` lines to stderr
pub struct StderrTracer {
    filters: Vec<LogFilter>,
}

static NEXT_SPAN: AtomicU64 = AtomicU64::new(1);

impl StderrTracer {
    /// Install as the global subscriber. `default_level` applies when
    /// `RUST_LOG` is unset; `None` keeps logging off in that case.
    pub fn register(
        default_level: Option<Level>,
    ) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
        let filters = match env::var("RUST_LOG") {
            Ok(value) => parse_filters(&value),
            Err(_) => match default_level {
                Some(level) => vec![LogFilter { target: None, level: Some(level) }],
                None => return Ok(()),
            },
        };
        tracing::subscriber::set_global_default(StderrTracer { filters })
    }

    fn matches(&self, metadata: &Metadata<'_>) -> bool {
        if self.filters.is_empty() {
            return true;
        }
        self.filters.iter().any(|filter| {
            // a level filter lets through that level and everything more severe
            let level_ok = filter.level.map_or(true, |level| *metadata.level() <= level);
            let target_ok = filter
                .target
                .as_ref()
                .map_or(true, |target| metadata.target().starts_with(target.as_str()));
            level_ok && target_ok
        })
    }
}

impl Subscriber for StderrTracer {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.matches(metadata)
    }

    fn new_span(&self, _span: &Attributes<'_>) -> Id {
        Id::from_u64(NEXT_SPAN.fetch_add(1, Ordering::Relaxed))
    }

    fn record(&self, _span: &Id, _values: &Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event<'_>) {
        let metadata = event.metadata();
        let mut text = String::new();
        event.record(&mut StringVisitor { string: &mut text });
        eprintln!("{} {}: {}", metadata.level(), metadata.target(), text.trim_end());
    }

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filters() {
        let filters = parse_filters("info,tz_compiler::shortcuts=trace, rayon");
        assert_eq!(
            filters,
            vec![
                LogFilter { target: None, level: Some(Level::INFO) },
                LogFilter { target: Some("tz_compiler::shortcuts".to_string()), level: Some(Level::TRACE) },
                LogFilter { target: Some("rayon".to_string()), level: None },
            ]
        );
    }

    #[test]
    fn test_level_names() {
        assert_eq!(string_to_level("WARNING"), Some(Level::WARN));
        assert_eq!(string_to_level("loud"), None);
    }
}
