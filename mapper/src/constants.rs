// ============================================================================
// BUILT-IN KIND NAMES
// ============================================================================

/// Top of the kind hierarchy; every kind is assignable to it
pub const KIND_OBJECT: &str = "Object";

// Primitive kinds
pub const KIND_BOOL: &str = "bool";
pub const KIND_CHAR: &str = "char";
pub const KIND_F64: &str = "f64";
pub const KIND_I64: &str = "i64";

// String kind
pub const KIND_STRING: &str = "String";

// Container kinds
pub const KIND_ARRAY: &str = "Array";
pub const KIND_COLLECTION: &str = "Collection";
pub const KIND_LIST: &str = "List";
pub const KIND_MAP: &str = "Map";
pub const KIND_SET: &str = "Set";

/// Kind of the `class` placeholder property
pub const KIND_CLASS: &str = "Class";

// ============================================================================
// PROPERTY CONSTANTS
// ============================================================================

/// Placeholder property resolvable on every struct shape; never default-mapped
pub const CLASS_PROPERTY: &str = "class";

// ============================================================================
// MAPPING CONSTANTS
// ============================================================================

/// Default maximum depth of nested mapping calls within one top-level call
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Build class maps on demand for unregistered pairs unless configured otherwise
pub const DEFAULT_AUTO_CLASS_MAPS: bool = true;

/// Write null source values into destinations unless configured otherwise
pub const DEFAULT_MAP_NULLS: bool = true;

/// File name of the trace log written by `support::tracing`
pub const TRACE_LOG_FILE_NAME: &str = "shape_mapper_trace.log";
