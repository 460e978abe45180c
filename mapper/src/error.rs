use thiserror::Error;

// Error message prefixes
const MSG_CANNOT_PREFIX: &str = "Cannot";
const MSG_INVALID_PREFIX: &str = "Invalid";
const MSG_UNKNOWN_PREFIX: &str = "Unknown";

/// Result type for the `shape_mapper` library
pub type Result<T> = std::result::Result<T, error_stack::Report<Error>>;

/// Error categories surfaced by resolution and mapping
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A mapping configuration problem, detected when a key is first resolved
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A converter failed or no converter exists for an immutable pair
    #[error("Conversion failed: {0}")]
    Conversion(String),

    /// The object factory could not produce a destination instance
    #[error("Instantiation failed: {0}")]
    Instantiation(String),

    /// Nested mapping went deeper than the configured limit
    #[error("Recursion limit of {limit} exceeded while mapping {type_name}")]
    RecursionLimit {
        /// The configured maximum depth
        limit:     usize,
        /// The destination type being mapped when the limit was hit
        type_name: String,
    },

    /// An assignability check failed where strict compatibility is required
    #[error("Structural mismatch: expected {expected}, found {found}")]
    StructuralMismatch {
        /// The type that was required
        expected: String,
        /// The type that was supplied
        found:    String,
    },
}

impl Error {
    /// Create a "Cannot X" configuration error
    pub fn cannot(action: &str, reason: impl std::fmt::Display) -> Self {
        Self::Configuration(format!("{MSG_CANNOT_PREFIX} {action}: {reason}"))
    }

    /// Create an "Invalid X" configuration error
    pub fn invalid(what: &str, details: impl std::fmt::Display) -> Self {
        Self::Configuration(format!("{MSG_INVALID_PREFIX} {what}: {details}"))
    }

    /// Create an "Unknown X" configuration error
    pub fn unknown(what: &str, name: impl std::fmt::Display) -> Self {
        Self::Configuration(format!("{MSG_UNKNOWN_PREFIX} {what} '{name}'"))
    }

    /// Error for a path expression that does not parse
    pub fn malformed_expression(expression: &str, details: impl std::fmt::Display) -> Self {
        Self::Configuration(format!(
            "{MSG_INVALID_PREFIX} property expression '{expression}': {details}"
        ))
    }

    /// Error for an expression that names no property of the shape
    pub fn unresolvable(shape: impl std::fmt::Display, expression: &str) -> Self {
        Self::Configuration(format!(
            "Expression '{expression}' does not resolve to a property of {shape}"
        ))
    }

    /// Error for a nested hop whose owner differs from the type its parent produces
    pub fn owner_mismatch(
        hop: &str,
        owner: impl std::fmt::Display,
        produced: impl std::fmt::Display,
    ) -> Self {
        Self::Configuration(format!(
            "Property '{hop}' is declared on {owner} but its parent produces {produced}"
        ))
    }

    /// Error for a failed strict assignability check
    pub fn mismatch(expected: impl std::fmt::Display, found: impl std::fmt::Display) -> Self {
        Self::StructuralMismatch {
            expected: expected.to_string(),
            found:    found.to_string(),
        }
    }

    /// Error for a converter that cannot handle its input
    pub fn conversion(
        source: impl std::fmt::Display,
        destination: impl std::fmt::Display,
        reason: impl std::fmt::Display,
    ) -> Self {
        Self::Conversion(format!("{source} -> {destination}: {reason}"))
    }

    /// Error for a destination type the object factory cannot build
    pub fn instantiation(type_name: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        Self::Instantiation(format!("{type_name}: {reason}"))
    }

    /// True for errors raised from mapping configuration
    pub const fn is_configuration(&self) -> bool { matches!(self, Self::Configuration(_)) }
}
