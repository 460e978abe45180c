//! File-based tracing with a level that can be changed at runtime
//!
//! The library only emits `tracing` events; hosts that want them on disk call
//! [`init_file_tracing`] once and adjust verbosity with [`set_tracing_level`].

use std::sync::atomic::{AtomicU8, Ordering};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, FromRepr};
use tracing::{Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, Registry};

use crate::constants::TRACE_LOG_FILE_NAME;

static CURRENT_LEVEL: AtomicU8 = AtomicU8::new(TracingLevel::Warn as u8);

/// Verbosity of the file subscriber, from least to most verbose
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumString,
    AsRefStr,
    FromRepr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[repr(u8)]
pub enum TracingLevel {
    /// Errors only
    Error,
    /// Errors and warnings
    Warn,
    /// Adds informational events
    Info,
    /// Adds resolution decisions
    Debug,
    /// Everything, including per-hop resolution
    Trace,
}

impl From<Level> for TracingLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::ERROR => Self::Error,
            Level::WARN => Self::Warn,
            Level::INFO => Self::Info,
            Level::DEBUG => Self::Debug,
            Level::TRACE => Self::Trace,
        }
    }
}

/// Layer passing events at or below the level last given to [`set_tracing_level`]
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeLevelFilter;

impl<S: Subscriber> Layer<S> for RuntimeLevelFilter {
    fn enabled(&self, metadata: &tracing::Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        TracingLevel::from(*metadata.level()) <= current_tracing_level()
    }
}

/// Initialize file-based tracing with a fixed filename in the temp directory
///
/// Returns a `WorkerGuard` that must be kept alive for logging to work.
/// Fails if a global subscriber is already installed.
pub fn init_file_tracing() -> crate::error::Result<WorkerGuard> {
    let temp_dir = std::env::temp_dir();

    let file_appender = tracing_appender::rolling::never(&temp_dir, TRACE_LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true);

    Registry::default()
        .with(RuntimeLevelFilter)
        .with(file_layer)
        .try_init()
        .map_err(|e| crate::error::Error::cannot("install tracing subscriber", e))?;

    // Logging here would create the file before anyone asked for output
    Ok(guard)
}

/// Change the file subscriber's level for the whole process
pub fn set_tracing_level(level: TracingLevel) {
    CURRENT_LEVEL.store(level as u8, Ordering::Relaxed);
    tracing::info!(%level, "Tracing level changed");
}

/// The level last set with [`set_tracing_level`]
pub fn current_tracing_level() -> TracingLevel {
    TracingLevel::from_repr(CURRENT_LEVEL.load(Ordering::Relaxed)).unwrap_or(TracingLevel::Warn)
}

/// Path of the trace log file
pub fn get_trace_log_path() -> std::path::PathBuf { std::env::temp_dir().join(TRACE_LOG_FILE_NAME) }

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests")]
mod tests {
    use super::*;

    #[test]
    fn test_levels_parse_from_config_spellings() {
        assert_eq!("DEBUG".parse::<TracingLevel>().unwrap(), TracingLevel::Debug);
        assert_eq!(TracingLevel::Warn.as_ref(), "warn");
        assert!("verbose".parse::<TracingLevel>().is_err());
    }

    #[test]
    fn test_event_levels_order_by_verbosity() {
        assert!(TracingLevel::from(Level::ERROR) < TracingLevel::from(Level::WARN));
        assert!(TracingLevel::from(Level::TRACE) > TracingLevel::Debug);
        assert_eq!(TracingLevel::from_repr(TracingLevel::Info as u8), Some(TracingLevel::Info));
    }

    #[test]
    fn test_trace_log_path_uses_fixed_name() {
        assert!(get_trace_log_path().ends_with(TRACE_LOG_FILE_NAME));
    }
}
