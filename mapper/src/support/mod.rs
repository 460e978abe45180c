//! Ambient support shared by the mapper: tracing setup

pub mod tracing;

pub use self::tracing::{
    RuntimeLevelFilter, TracingLevel, current_tracing_level, get_trace_log_path, init_file_tracing,
    set_tracing_level,
};
