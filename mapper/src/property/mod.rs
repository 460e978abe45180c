//! Property path expressions and their resolution

mod path_parser;
mod resolver;

#[cfg(test)]
mod tests;

pub use path_parser::{PathStep, parse_path};
pub use resolver::{NameMatching, PropertyResolver, is_class_placeholder};
