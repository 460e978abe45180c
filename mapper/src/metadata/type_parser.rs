//! Parser for type expressions with support for nested generics
//!
//! This module uses nom to parse type expressions like:
//! - `Person`
//! - `List<Name>`
//! - `Map<String, List<Name>>`
//! - `Holder<T>` where `T` is substituted by the caller

use nom::bytes::complete::take_while1;
use nom::character::complete::{char, multispace0};
use nom::combinator::{all_consuming, opt};
use nom::multi::separated_list1;
use nom::sequence::{delimited, preceded, terminated};
use nom::{IResult, Parser};

/// A parsed, not yet interned, type expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeExpr {
    /// Raw kind or type parameter name
    pub name: String,
    /// Generic arguments in order
    pub args: Vec<TypeExpr>,
}

impl TypeExpr {
    /// Create an expression with no arguments
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }
}

impl std::fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            let args: Vec<String> = self.args.iter().map(ToString::to_string).collect();
            write!(f, "<{}>", args.join(", "))?;
        }
        Ok(())
    }
}

/// Parse an identifier (alphanumeric + underscore)
fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_').parse(input)
}

/// Parse generic arguments recursively
fn generics(input: &str) -> IResult<&str, Vec<TypeExpr>> {
    delimited(
        preceded(multispace0, char('<')),
        separated_list1(preceded(multispace0, char(',')), type_expr),
        preceded(multispace0, char('>')),
    )
    .parse(input)
}

fn type_expr(input: &str) -> IResult<&str, TypeExpr> {
    let (input, name) = preceded(multispace0, identifier).parse(input)?;
    let (input, args) = opt(generics).parse(input)?;
    Ok((
        input,
        TypeExpr {
            name: name.to_string(),
            args: args.unwrap_or_default(),
        },
    ))
}

/// Parse a complete type expression, rejecting trailing input
pub fn parse_type_expr(input: &str) -> Result<TypeExpr, String> {
    all_consuming(terminated(type_expr, multispace0))
        .parse(input)
        .map(|(_, parsed)| parsed)
        .map_err(|e| format!("Failed to parse type expression '{input}': {e:?}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests")]
mod tests {
    use super::*;

    #[test]
    fn test_simple_type() {
        let parsed = parse_type_expr("Person").unwrap();
        assert_eq!(parsed, TypeExpr::simple("Person"));
    }

    #[test]
    fn test_nested_generics() {
        let parsed = parse_type_expr("Map<String, List<Name>>").unwrap();
        assert_eq!(parsed.name, "Map");
        assert_eq!(parsed.args.len(), 2);
        assert_eq!(parsed.args[0], TypeExpr::simple("String"));
        assert_eq!(parsed.args[1].name, "List");
        assert_eq!(parsed.args[1].args, vec![TypeExpr::simple("Name")]);
        assert_eq!(parsed.to_string(), "Map<String, List<Name>>");
    }

    #[test]
    fn test_whitespace_is_tolerated() {
        let parsed = parse_type_expr("  Map < String ,i64 >  ").unwrap();
        assert_eq!(parsed.to_string(), "Map<String, i64>");
    }

    #[test]
    fn test_malformed_expressions_are_rejected() {
        assert!(parse_type_expr("").is_err());
        assert!(parse_type_expr("List<").is_err());
        assert!(parse_type_expr("List<>").is_err());
        assert!(parse_type_expr("Map<String, i64> extra").is_err());
    }
}
