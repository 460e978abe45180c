//! Field correspondences inside a class map

use std::fmt;

use super::direction::MappingDirection;
use crate::metadata::PropertyRef;

/// One correspondence between a property of A and a property of B
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap {
    a:            PropertyRef,
    b:            PropertyRef,
    direction:    MappingDirection,
    converter_id: Option<String>,
    by_default:   bool,
}

impl FieldMap {
    /// Create a correspondence
    pub const fn new(
        a: PropertyRef,
        b: PropertyRef,
        direction: MappingDirection,
        converter_id: Option<String>,
        by_default: bool,
    ) -> Self {
        Self {
            a,
            b,
            direction,
            converter_id,
            by_default,
        }
    }

    /// Property on the A side
    pub const fn a(&self) -> &PropertyRef { &self.a }

    /// Property on the B side
    pub const fn b(&self) -> &PropertyRef { &self.b }

    /// Allowed direction
    pub const fn direction(&self) -> MappingDirection { self.direction }

    /// Converter id to use instead of structural mapping
    pub fn converter_id(&self) -> Option<&str> { self.converter_id.as_deref() }

    /// True if added by the default-matching pass
    pub const fn is_by_default(&self) -> bool { self.by_default }

    /// The same correspondence with A and B swapped
    #[must_use]
    pub fn flip(&self) -> Self {
        Self {
            a:            self.b.clone(),
            b:            self.a.clone(),
            direction:    self.direction.flip(),
            converter_id: self.converter_id.clone(),
            by_default:   self.by_default,
        }
    }
}

impl fmt::Display for FieldMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = match self.direction {
            MappingDirection::Bidirectional => "<->",
            MappingDirection::AToB => "->",
            MappingDirection::BToA => "<-",
        };
        write!(f, "{} {arrow} {}", self.a.expression(), self.b.expression())?;
        if let Some(id) = &self.converter_id {
            write!(f, " (converter: {id})")?;
        }
        Ok(())
    }
}
