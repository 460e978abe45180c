//! Parser for property path expressions
//!
//! This module uses nom to parse path expressions like:
//! - `name`
//! - `name.first`
//! - `names['first']`
//! - `grades[0].letter`
//! - `byLevel[GOLD]`
//!
//! Segments are separated by `.`; a segment is a name optionally followed by
//! bracket selectors, or selectors alone when the root shape is a container.

use nom::branch::alt;
use nom::bytes::complete::{take_while, take_while1};
use nom::character::complete::{char, i64 as integer, multispace0};
use nom::combinator::{all_consuming, map, verify};
use nom::multi::{many0, many1, separated_list1};
use nom::sequence::{delimited, pair};
use nom::{IResult, Parser};

use crate::error::{Error, Result};
use crate::metadata::MapKey;

/// One step of a parsed path expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
    /// A property name
    Name(String),
    /// A bracket selector
    Select(MapKey),
}

fn identifier(input: &str) -> IResult<&str, &str> {
    verify(
        take_while1(|c: char| c.is_alphanumeric() || c == '_'),
        |name: &str| !name.starts_with(|c: char| c.is_ascii_digit()),
    )
    .parse(input)
}

fn quoted(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('\''), take_while(|c| c != '\''), char('\'')),
        delimited(char('"'), take_while(|c| c != '"'), char('"')),
    ))
    .parse(input)
}

fn selector(input: &str) -> IResult<&str, MapKey> {
    delimited(
        pair(char('['), multispace0),
        alt((
            map(quoted, |key: &str| MapKey::Str(key.to_string())),
            map(integer, MapKey::Int),
            map(identifier, |constant: &str| MapKey::Constant(constant.to_string())),
        )),
        pair(multispace0, char(']')),
    )
    .parse(input)
}

fn segment(input: &str) -> IResult<&str, Vec<PathStep>> {
    alt((
        map(pair(identifier, many0(selector)), |(name, selectors)| {
            std::iter::once(PathStep::Name(name.to_string()))
                .chain(selectors.into_iter().map(PathStep::Select))
                .collect()
        }),
        map(many1(selector), |selectors| {
            selectors.into_iter().map(PathStep::Select).collect()
        }),
    ))
    .parse(input)
}

fn path(input: &str) -> IResult<&str, Vec<PathStep>> {
    map(separated_list1(char('.'), segment), |segments| {
        segments.into_iter().flatten().collect()
    })
    .parse(input)
}

/// Parse a complete path expression into steps
pub fn parse_path(expression: &str) -> Result<Vec<PathStep>> {
    all_consuming(path)
        .parse(expression.trim())
        .map(|(_, steps)| steps)
        .map_err(|e| Error::malformed_expression(expression, format!("{e:?}")).into())
}
