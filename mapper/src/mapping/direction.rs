//! Direction a field correspondence applies in

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Which way a field correspondence may be applied
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "PascalCase")]
#[strum(serialize_all = "PascalCase")]
pub enum MappingDirection {
    /// A to B and B to A
    #[default]
    Bidirectional,
    /// A to B only
    AToB,
    /// B to A only
    BToA,
}

impl MappingDirection {
    /// The same direction seen from the other side
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Bidirectional => Self::Bidirectional,
            Self::AToB => Self::BToA,
            Self::BToA => Self::AToB,
        }
    }

    /// True if values may flow from A to B
    pub const fn allows_a_to_b(self) -> bool { matches!(self, Self::Bidirectional | Self::AToB) }

    /// True if values may flow from B to A
    pub const fn allows_b_to_a(self) -> bool { matches!(self, Self::Bidirectional | Self::BToA) }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_flip_swaps_one_way_directions() {
        assert_eq!(MappingDirection::AToB.flip(), MappingDirection::BToA);
        assert_eq!(MappingDirection::Bidirectional.flip(), MappingDirection::Bidirectional);
        assert!(MappingDirection::BToA.allows_b_to_a());
        assert!(!MappingDirection::BToA.allows_a_to_b());
    }

    #[test]
    fn test_names_round_trip() {
        assert_eq!(MappingDirection::AToB.to_string(), "AToB");
        assert_eq!(MappingDirection::from_str("BToA"), Ok(MappingDirection::BToA));
    }
}
