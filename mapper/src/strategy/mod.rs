//! Mapping strategies and their cache
//!
//! A [`MappingStrategyKey`] identifies one mapping situation. The first call
//! for a key resolves a [`MappingStrategy`] through a [`StrategyResolver`];
//! the [`StrategyCache`] hands the same strategy to every later call.

mod cache;
mod key;
mod mapping_strategy;
mod resolve;


pub use cache::StrategyCache;
pub use key::MappingStrategyKey;
pub use mapping_strategy::{MappingStrategy, StrategyKind};
pub use resolve::{PlanSource, StrategyResolver};
